//! Display implementations for error types

use super::types::{Error, FailedComponent};
use crate::types::HookPhase;
use std::fmt;

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Before => write!(f, "before"),
            HookPhase::After => write!(f, "after"),
        }
    }
}

impl fmt::Display for FailedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedComponent::Initializer { index } => write!(f, "initializer #{index}"),
            FailedComponent::Hook { phase, task } => write!(f, "{phase} hook of task '{task}'"),
            FailedComponent::Task { name } => write!(f, "task '{name}'"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateTask { name } => {
                write!(f, "task '{name}' is already registered")
            }
            Error::UnknownTask { name, required_by } => match required_by {
                Some(parent) => write!(f, "task '{name}' required by '{parent}' not found"),
                None => write!(f, "task '{name}' not found"),
            },
            Error::CyclicDependency { task, cycle } => {
                if cycle.is_empty() {
                    write!(f, "cyclic dependency detected involving task '{task}'")
                } else {
                    write!(
                        f,
                        "cyclic dependency detected involving task '{task}': {}",
                        cycle.join(" -> ")
                    )
                }
            }
            Error::NoTasksRequested => write!(f, "no tasks given"),
            Error::Interrupted => write!(f, "Build aborted"),
            Error::BuildFailure {
                component, message, ..
            } => {
                write!(f, "{component} failed: {message}")
            }
            Error::MissingProperty { key } => {
                write!(f, "property '{key}' is not set")
            }
            Error::InvalidPropertyOverride { entry } => {
                write!(f, "'{entry}' is not a property definition")
            }
            Error::InvalidTaskName { name, message } => {
                write!(f, "invalid task name '{name}': {message}")
            }
            Error::Descriptor { path, message } => {
                write!(f, "invalid build descriptor '{}': {message}", path.display())
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
        }
    }
}
