//! Lifecycle hooks and initializers

use crate::definition::{Action, ActionContext};
use crate::registry::TaskRegistry;
use kiln_core::{EnvironmentGate, HookPhase, Project};
use std::fmt;
use std::sync::Arc;

/// Callable run once per build before task resolution
pub type InitializerFn =
    dyn Fn(&mut Project, &mut TaskRegistry) -> anyhow::Result<()> + Send + Sync;

/// An action bound to run before or after a task
#[derive(Clone)]
pub struct ActionHook {
    phase: HookPhase,
    target_task: String,
    environments: EnvironmentGate,
    action: Arc<dyn Action>,
}

impl ActionHook {
    /// Hook running before `task`
    pub fn before<F>(task: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut Project, &ActionContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::from_action(HookPhase::Before, task, action)
    }

    /// Hook running after `task`
    pub fn after<F>(task: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut Project, &ActionContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::from_action(HookPhase::After, task, action)
    }

    /// Hook from any [`Action`] implementation
    pub fn from_action(
        phase: HookPhase,
        task: impl Into<String>,
        action: impl Action + 'static,
    ) -> Self {
        Self {
            phase,
            target_task: task.into(),
            environments: EnvironmentGate::always(),
            action: Arc::new(action),
        }
    }

    /// Restrict the hook to builds with one of `environments` active
    #[must_use]
    pub fn only_in<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environments = EnvironmentGate::only(environments);
        self
    }

    pub fn phase(&self) -> HookPhase {
        self.phase
    }

    pub fn target_task(&self) -> &str {
        &self.target_task
    }

    pub fn environments(&self) -> &EnvironmentGate {
        &self.environments
    }

    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }
}

impl fmt::Debug for ActionHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHook")
            .field("phase", &self.phase)
            .field("target_task", &self.target_task)
            .field("environments", &self.environments)
            .finish_non_exhaustive()
    }
}

/// Setup callable run before the task graph is resolved.
///
/// Initializers may register further tasks or set properties depending on
/// the environments active for the build.
#[derive(Clone)]
pub struct Initializer {
    environments: EnvironmentGate,
    callable: Arc<InitializerFn>,
}

impl Initializer {
    pub fn new<F>(callable: F) -> Self
    where
        F: Fn(&mut Project, &mut TaskRegistry) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            environments: EnvironmentGate::always(),
            callable: Arc::new(callable),
        }
    }

    /// Restrict the initializer to builds with one of `environments` active
    #[must_use]
    pub fn only_in<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environments = EnvironmentGate::only(environments);
        self
    }

    pub fn environments(&self) -> &EnvironmentGate {
        &self.environments
    }

    /// Invoke the initializer
    pub fn run(&self, project: &mut Project, registry: &mut TaskRegistry) -> anyhow::Result<()> {
        (self.callable)(project, registry)
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("environments", &self.environments)
            .finish_non_exhaustive()
    }
}
