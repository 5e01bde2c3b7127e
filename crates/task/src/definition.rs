//! Task definitions and the action capability they carry

use kiln_core::{HookPhase, Project};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Context handed to an action alongside the project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionContext<'a> {
    /// Task being executed, or targeted by the running hook
    pub task_name: &'a str,
    /// Set when the action runs as a lifecycle hook
    pub phase: Option<HookPhase>,
}

impl<'a> ActionContext<'a> {
    /// Context for a task action
    #[must_use]
    pub fn task(task_name: &'a str) -> Self {
        Self {
            task_name,
            phase: None,
        }
    }

    /// Context for a hook bound to `task_name`
    #[must_use]
    pub fn hook(task_name: &'a str, phase: HookPhase) -> Self {
        Self {
            task_name,
            phase: Some(phase),
        }
    }
}

/// Something that can be run against the project: a task body or a hook.
///
/// Implemented for every matching closure, so plain functions can be
/// registered directly.
pub trait Action: Send + Sync {
    fn execute(&self, project: &mut Project, context: &ActionContext<'_>) -> anyhow::Result<()>;
}

impl<F> Action for F
where
    F: Fn(&mut Project, &ActionContext<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn execute(&self, project: &mut Project, context: &ActionContext<'_>) -> anyhow::Result<()> {
        self(project, context)
    }
}

/// A named unit of build work.
///
/// Ordering and equality consider the name only.
#[derive(Clone)]
pub struct Task {
    name: String,
    description: Vec<String>,
    dependencies: Vec<String>,
    action: Arc<dyn Action>,
}

impl Task {
    /// Create a task whose action is a closure
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut Project, &ActionContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::from_action(name, action)
    }

    /// Create a task from any [`Action`] implementation
    pub fn from_action(name: impl Into<String>, action: impl Action + 'static) -> Self {
        Self {
            name: name.into(),
            description: Vec::new(),
            dependencies: Vec::new(),
            action: Arc::new(action),
        }
    }

    /// Append a description fragment
    #[must_use]
    pub fn describe(mut self, fragment: impl Into<String>) -> Self {
        self.description.push(fragment.into());
        self
    }

    /// Declare a dependency; repeated names are kept once, at first declaration
    #[must_use]
    pub fn depends_on(mut self, task_name: impl Into<String>) -> Self {
        let task_name = task_name.into();
        if !self.dependencies.contains(&task_name) {
            self.dependencies.push(task_name);
        }
        self
    }

    /// Declare several dependencies in order
    #[must_use]
    pub fn depends_on_all<I, S>(self, task_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        task_names
            .into_iter()
            .fold(self, |task, name| task.depends_on(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Description fragments joined by spaces
    pub fn description_text(&self) -> String {
        self.description.join(" ")
    }

    /// Dependency names in declaration order
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Task {}

impl PartialOrd for Task {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Task {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
