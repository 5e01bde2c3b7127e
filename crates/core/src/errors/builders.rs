//! Builder methods for creating errors with context

use super::types::{Error, FailedComponent};
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create a duplicate task registration error
    #[must_use]
    pub fn duplicate_task(name: impl Into<String>) -> Self {
        Error::DuplicateTask { name: name.into() }
    }

    /// Create an unknown task error for a directly requested task
    #[must_use]
    pub fn unknown_task(name: impl Into<String>) -> Self {
        Error::UnknownTask {
            name: name.into(),
            required_by: None,
        }
    }

    /// Create an unknown task error for a dependency of another task
    #[must_use]
    pub fn unknown_dependency(name: impl Into<String>, required_by: impl Into<String>) -> Self {
        Error::UnknownTask {
            name: name.into(),
            required_by: Some(required_by.into()),
        }
    }

    /// Create a cyclic dependency error; `task` is the name that closed the loop
    #[must_use]
    pub fn cyclic_dependency(task: impl Into<String>, cycle: Vec<String>) -> Self {
        Error::CyclicDependency {
            task: task.into(),
            cycle,
        }
    }

    /// Wrap an error raised by an initializer, hook or task action
    #[must_use]
    pub fn build_failure(component: FailedComponent, source: anyhow::Error) -> Self {
        Error::BuildFailure {
            component,
            message: format!("{source:#}"),
            source: Some(source.into()),
        }
    }

    /// Create a missing property error
    #[must_use]
    pub fn missing_property(key: impl Into<String>) -> Self {
        Error::MissingProperty { key: key.into() }
    }

    /// Create an invalid property override error
    #[must_use]
    pub fn invalid_property_override(entry: impl Into<String>) -> Self {
        Error::InvalidPropertyOverride {
            entry: entry.into(),
        }
    }

    /// Create an invalid task name error
    #[must_use]
    pub fn invalid_task_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidTaskName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a build descriptor error
    #[must_use]
    pub fn descriptor(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Descriptor {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
