//! Registry of tasks, hooks and initializers for one reactor

use crate::definition::Task;
use crate::hooks::{ActionHook, Initializer};
use indexmap::IndexMap;
use kiln_core::{Error, HookPhase, Result};

/// Store of everything plugins and descriptors register.
///
/// Registered entries are never mutated or removed; during a build the
/// resolver and execution manager treat the registry as read-only.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: IndexMap<String, Task>,
    hooks: Vec<ActionHook>,
    initializers: Vec<Initializer>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task; names must be unique
    pub fn register_task(&mut self, task: Task) -> Result<()> {
        validate_task_name(task.name())?;

        if self.tasks.contains_key(task.name()) {
            return Err(Error::duplicate_task(task.name()));
        }

        tracing::debug!(
            task = task.name(),
            dependencies = ?task.dependencies(),
            "Registered task"
        );
        self.tasks.insert(task.name().to_string(), task);
        Ok(())
    }

    /// Register a lifecycle hook
    pub fn register_hook(&mut self, hook: ActionHook) {
        tracing::debug!(
            task = hook.target_task(),
            phase = %hook.phase(),
            environments = %hook.environments(),
            "Registered hook"
        );
        self.hooks.push(hook);
    }

    /// Register an initializer
    pub fn register_initializer(&mut self, initializer: Initializer) {
        tracing::debug!(
            environments = %initializer.environments(),
            "Registered initializer"
        );
        self.initializers.push(initializer);
    }

    /// Look up a task by name
    pub fn lookup(&self, name: &str) -> Result<&Task> {
        self.tasks
            .get(name)
            .ok_or_else(|| Error::unknown_task(name))
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// All tasks in registration order
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.tasks.values().collect()
    }

    /// Hooks for `task` in `phase`, in registration order
    pub fn hooks_for<'a>(
        &'a self,
        task: &'a str,
        phase: HookPhase,
    ) -> impl Iterator<Item = &'a ActionHook> + 'a {
        self.hooks
            .iter()
            .filter(move |hook| hook.phase() == phase && hook.target_task() == task)
    }

    pub fn hooks(&self) -> &[ActionHook] {
        &self.hooks
    }

    /// Initializers in registration order
    pub fn initializers(&self) -> &[Initializer] {
        &self.initializers
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Task names must be non-empty and free of whitespace
fn validate_task_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_task_name(name, "name cannot be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(Error::invalid_task_name(
            name,
            "name cannot contain whitespace",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str) -> Task {
        Task::new(name, |_, _| Ok(()))
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = TaskRegistry::new();
        registry.register_task(task("compile")).unwrap();

        let err = registry.register_task(task("compile")).unwrap_err();
        assert!(matches!(err, Error::DuplicateTask { ref name } if name == "compile"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let mut registry = TaskRegistry::new();
        assert!(matches!(
            registry.register_task(task("")),
            Err(Error::InvalidTaskName { .. })
        ));
        assert!(matches!(
            registry.register_task(task("run tests")),
            Err(Error::InvalidTaskName { .. })
        ));
    }

    #[test]
    fn test_dependencies_are_not_validated_at_registration() {
        let mut registry = TaskRegistry::new();
        registry
            .register_task(task("package").depends_on("missing"))
            .unwrap();
        assert!(registry.contains("package"));
    }

    #[test]
    fn test_lookup_unknown_task() {
        let registry = TaskRegistry::new();
        let err = registry.lookup("ghost").unwrap_err();
        assert_eq!(err.to_string(), "task 'ghost' not found");
    }

    #[test]
    fn test_all_tasks_in_registration_order() {
        let mut registry = TaskRegistry::new();
        for name in ["publish", "analyze", "compile"] {
            registry.register_task(task(name)).unwrap();
        }
        let names: Vec<&str> = registry.all_tasks().into_iter().map(Task::name).collect();
        assert_eq!(names, ["publish", "analyze", "compile"]);
    }

    #[test]
    fn test_hooks_for_filters_by_task_and_phase() {
        let mut registry = TaskRegistry::new();
        registry.register_hook(ActionHook::before("compile", |_, _| Ok(())));
        registry.register_hook(ActionHook::after("compile", |_, _| Ok(())));
        registry.register_hook(ActionHook::before("compile", |_, _| Ok(())).only_in(["ci"]));
        registry.register_hook(ActionHook::before("test", |_, _| Ok(())));

        let before: Vec<&ActionHook> = registry.hooks_for("compile", HookPhase::Before).collect();
        assert_eq!(before.len(), 2);
        assert!(before[0].environments().is_unconditional());
        assert!(!before[1].environments().is_unconditional());
        assert_eq!(registry.hooks_for("compile", HookPhase::After).count(), 1);
        assert_eq!(registry.hooks().len(), 4);
    }
}
