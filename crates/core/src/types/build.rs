//! Per-invocation build results

use super::project::Project;
use crate::errors::Error;
use serde::Serialize;
use std::fmt;

/// Lifecycle state of a single build invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildPhase {
    /// Activating environments and running initializers
    Init,
    /// Computing the execution plan
    Resolving,
    /// Running hooks and task actions
    Executing,
    /// Every planned task completed
    Done,
    /// Aborted by the first error
    Failed,
}

impl BuildPhase {
    /// Check whether a transition to `next` is allowed
    #[must_use]
    pub fn can_transition_to(self, next: BuildPhase) -> bool {
        matches!(
            (self, next),
            (BuildPhase::Init, BuildPhase::Resolving)
                | (BuildPhase::Resolving, BuildPhase::Executing)
                | (BuildPhase::Executing, BuildPhase::Done)
                | (
                    BuildPhase::Init | BuildPhase::Resolving | BuildPhase::Executing,
                    BuildPhase::Failed
                )
        )
    }

    /// Check whether the phase is terminal
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, BuildPhase::Done | BuildPhase::Failed)
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildPhase::Init => "initializing",
            BuildPhase::Resolving => "resolving tasks",
            BuildPhase::Executing => "executing tasks",
            BuildPhase::Done => "done",
            BuildPhase::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// Timing of one executed task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskExecutionRecord {
    /// Name of the executed task
    pub task_name: String,
    /// Wall-clock time spent in the task action
    pub elapsed_milliseconds: u64,
}

impl TaskExecutionRecord {
    #[must_use]
    pub fn new(task_name: impl Into<String>, elapsed_milliseconds: u64) -> Self {
        Self {
            task_name: task_name.into(),
            elapsed_milliseconds,
        }
    }
}

impl fmt::Display for TaskExecutionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} ms]", self.task_name, self.elapsed_milliseconds)
    }
}

/// Report of a completed build
#[derive(Debug, Clone)]
pub struct BuildSummary<'a> {
    /// The project as it stands at build completion
    pub project: &'a Project,
    /// Executed tasks in execution order
    pub task_records: Vec<TaskExecutionRecord>,
}

impl BuildSummary<'_> {
    /// Names of the executed tasks, in execution order
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.task_records.iter().map(|r| r.task_name.as_str())
    }

    /// Sum of all recorded task timings
    #[must_use]
    pub fn total_milliseconds(&self) -> u64 {
        self.task_records
            .iter()
            .map(|r| r.elapsed_milliseconds)
            .sum()
    }
}

/// A build that stopped at its first error.
///
/// Records of the tasks that completed before the failure are kept so the
/// caller can still report partial progress.
#[derive(Debug, thiserror::Error)]
#[error("build aborted while {phase}")]
pub struct BuildAborted {
    /// Phase the build was in when it failed
    pub phase: BuildPhase,
    /// The originating error, unmodified
    #[source]
    pub error: Error,
    /// Tasks that completed before the failure
    pub task_records: Vec<TaskExecutionRecord>,
}

impl BuildAborted {
    #[must_use]
    pub fn new(phase: BuildPhase, error: Error, task_records: Vec<TaskExecutionRecord>) -> Self {
        Self {
            phase,
            error,
            task_records,
        }
    }
}
