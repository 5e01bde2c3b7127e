//! Core error type definitions

use crate::types::HookPhase;
use std::path::PathBuf;

/// Result type alias for kiln operations
pub type Result<T> = std::result::Result<T, Error>;

/// The build component whose callable raised an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailedComponent {
    /// Initializer, identified by its registration index
    Initializer { index: usize },
    /// Lifecycle hook bound to a task
    Hook { phase: HookPhase, task: String },
    /// Task action
    Task { name: String },
}

/// Core error type for kiln operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A task with the same name is already registered
    DuplicateTask { name: String },

    /// A requested or depended-on task has no registration
    UnknownTask {
        name: String,
        required_by: Option<String>,
    },

    /// The dependency graph reachable from the request contains a cycle
    CyclicDependency { task: String, cycle: Vec<String> },

    /// The build request named no tasks
    NoTasksRequested,

    /// The user interrupted the build
    Interrupted,

    /// An initializer, hook or task action failed during the build
    BuildFailure {
        component: FailedComponent,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A property required by a task is not set
    MissingProperty { key: String },

    /// A `key=value` override could not be parsed
    InvalidPropertyOverride { entry: String },

    /// A task name failed validation
    InvalidTaskName { name: String, message: String },

    /// Build descriptor could not be interpreted
    Descriptor { path: PathBuf, message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    Configuration { message: String },
}
