mod dispatch;
mod state;

pub use state::BuildState;

use crate::hooks::Initializer;
use crate::registry::TaskRegistry;
use crate::resolver::resolve;
use kiln_core::{
    ActiveEnvironments, BuildAborted, BuildPhase, BuildSummary, Error, FailedComponent, Project,
    Result,
};
use kiln_utils::InterruptFlag;

/// Drives a single build: initializers, resolution, then ordered execution.
///
/// Everything runs on the calling thread, one callable at a time. The first
/// error aborts the build; records of tasks that already finished travel
/// back inside [`BuildAborted`]. A raised [`InterruptFlag`] is checked before
/// every initializer, hook and task and aborts the build with
/// [`Error::Interrupted`].
#[derive(Debug, Default, Clone)]
pub struct ExecutionManager {
    interrupt: InterruptFlag,
}

impl ExecutionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `interrupt` to stop builds between callables
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn interrupt(&self) -> &InterruptFlag {
        &self.interrupt
    }

    /// Run one build of `requested` with `environments` active
    pub fn run<'p, E, T>(
        &self,
        registry: &mut TaskRegistry,
        project: &'p mut Project,
        environments: &[E],
        requested: &[T],
    ) -> std::result::Result<BuildSummary<'p>, BuildAborted>
    where
        E: AsRef<str>,
        T: AsRef<str>,
    {
        let span = kiln_utils::tracing::build_span(&project.name, requested.len());
        let _guard = span.enter();

        let mut build = BuildState::new();

        project.active_environments = environments
            .iter()
            .map(|env| env.as_ref().to_string())
            .collect::<ActiveEnvironments>();
        tracing::info!(
            project = %project.name,
            environments = ?project.active_environments,
            "Starting build"
        );

        if let Err(error) = self.run_initializers(registry, project) {
            return Err(build.fail(error));
        }

        let registry: &TaskRegistry = registry;

        build.advance(BuildPhase::Resolving);
        let plan = match resolve(requested, registry) {
            Ok(plan) => plan,
            Err(error) => return Err(build.fail(error)),
        };

        build.advance(BuildPhase::Executing);
        tracing::info!(plan = ?plan.tasks(), "Executing {} task(s)", plan.len());

        for task_name in plan.iter() {
            let outcome = registry.lookup(task_name).and_then(|task| {
                dispatch::execute_task(registry, task, project, &mut build, &self.interrupt)
            });
            if let Err(error) = outcome {
                return Err(build.fail(error));
            }
        }

        let task_records = build.finish();
        let project: &'p Project = project;
        tracing::info!(tasks = task_records.len(), "Build completed");

        Ok(BuildSummary {
            project,
            task_records,
        })
    }

    /// Run every initializer whose gate admits the active environments
    fn run_initializers(&self, registry: &mut TaskRegistry, project: &mut Project) -> Result<()> {
        // Snapshot so initializers can register into the registry while we iterate
        let initializers: Vec<Initializer> = registry.initializers().to_vec();

        for (index, initializer) in initializers.iter().enumerate() {
            if !initializer
                .environments()
                .admits(&project.active_environments)
            {
                tracing::debug!(
                    index,
                    environments = %initializer.environments(),
                    "Skipping initializer"
                );
                continue;
            }

            dispatch::check_interrupt(&self.interrupt)?;
            tracing::debug!(index, "Running initializer");
            initializer
                .run(project, registry)
                .map_err(|source| Error::build_failure(FailedComponent::Initializer { index }, source))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Task;
    use crate::hooks::ActionHook;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    fn journaled(name: &str, journal: &Journal) -> Task {
        let journal = Arc::clone(journal);
        let entry = name.to_string();
        Task::new(name, move |_, _| {
            journal.lock().unwrap().push(entry.clone());
            Ok(())
        })
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[test]
    fn test_runs_plan_in_order() {
        let journal = Journal::default();
        let mut registry = TaskRegistry::new();
        registry.register_task(journaled("compile", &journal)).unwrap();
        registry
            .register_task(journaled("test", &journal).depends_on("compile"))
            .unwrap();
        let mut project = Project::new("/tmp/order");

        let summary = ExecutionManager::new()
            .run::<&str, &str>(&mut registry, &mut project, &[], &["test"])
            .unwrap();

        assert_eq!(entries(&journal), ["compile", "test"]);
        assert_eq!(summary.task_names().collect::<Vec<_>>(), ["compile", "test"]);
    }

    #[test]
    fn test_active_environments_are_set_on_project() {
        let mut registry = TaskRegistry::new();
        registry
            .register_task(Task::new("check", |project, _| {
                anyhow::ensure!(project.is_environment_active("ci"), "ci not active");
                Ok(())
            }))
            .unwrap();
        let mut project = Project::new("/tmp/envs");

        let summary = ExecutionManager::new()
            .run(&mut registry, &mut project, &["ci", "dev"], &["check"])
            .unwrap();

        assert_eq!(summary.project.active_environments.len(), 2);
    }

    #[test]
    fn test_initializer_failure_runs_no_task() {
        let journal = Journal::default();
        let mut registry = TaskRegistry::new();
        registry.register_task(journaled("compile", &journal)).unwrap();
        registry.register_initializer(Initializer::new(|_, _| anyhow::bail!("no toolchain")));
        let mut project = Project::new("/tmp/init-fail");

        let aborted = ExecutionManager::new()
            .run::<&str, &str>(&mut registry, &mut project, &[], &["compile"])
            .unwrap_err();

        assert_eq!(aborted.phase, BuildPhase::Init);
        assert!(matches!(
            aborted.error,
            Error::BuildFailure { component: FailedComponent::Initializer { index: 0 }, .. }
        ));
        assert!(aborted.task_records.is_empty());
        assert!(entries(&journal).is_empty());
    }

    #[test]
    fn test_gated_initializer_registers_task() {
        let mut registry = TaskRegistry::new();
        registry.register_initializer(
            Initializer::new(|_, registry| {
                registry.register_task(Task::new("deploy", |_, _| Ok(())))?;
                Ok(())
            })
            .only_in(["prod"]),
        );

        let mut project = Project::new("/tmp/gated");
        let aborted = ExecutionManager::new()
            .run::<&str, &str>(&mut registry, &mut project, &[], &["deploy"])
            .unwrap_err();
        assert_eq!(aborted.phase, BuildPhase::Resolving);
        assert!(matches!(aborted.error, Error::UnknownTask { .. }));

        let mut project = Project::new("/tmp/gated");
        let summary = ExecutionManager::new()
            .run(&mut registry, &mut project, &["prod"], &["deploy"])
            .unwrap();
        assert_eq!(summary.task_records.len(), 1);
    }

    #[test]
    fn test_resolution_error_is_unmodified() {
        let mut registry = TaskRegistry::new();
        let mut project = Project::new("/tmp/resolve");

        let aborted = ExecutionManager::new()
            .run::<&str, &str>(&mut registry, &mut project, &[], &[])
            .unwrap_err();

        assert_eq!(aborted.phase, BuildPhase::Resolving);
        assert!(matches!(aborted.error, Error::NoTasksRequested));
    }

    #[test]
    fn test_after_hook_failure_keeps_task_record() {
        let journal = Journal::default();
        let mut registry = TaskRegistry::new();
        registry.register_task(journaled("compile", &journal)).unwrap();
        registry
            .register_task(journaled("test", &journal).depends_on("compile"))
            .unwrap();
        registry.register_hook(ActionHook::after("compile", |_, _| anyhow::bail!("report failed")));
        let mut project = Project::new("/tmp/after");

        let aborted = ExecutionManager::new()
            .run::<&str, &str>(&mut registry, &mut project, &[], &["test"])
            .unwrap_err();

        assert_eq!(aborted.phase, BuildPhase::Executing);
        assert_eq!(aborted.task_records.len(), 1);
        assert_eq!(aborted.task_records[0].task_name, "compile");
        assert_eq!(entries(&journal), ["compile"]);
        assert_eq!(
            aborted.error.to_string(),
            "after hook of task 'compile' failed: report failed"
        );
    }

    #[test]
    fn test_interrupt_stops_before_next_task() {
        let journal = Journal::default();
        let interrupt = InterruptFlag::new();
        let mut registry = TaskRegistry::new();
        let raiser = interrupt.clone();
        let log = Arc::clone(&journal);
        registry
            .register_task(Task::new("compile", move |_, _| {
                log.lock().unwrap().push("compile".to_string());
                raiser.raise();
                Ok(())
            }))
            .unwrap();
        registry
            .register_task(journaled("test", &journal).depends_on("compile"))
            .unwrap();
        let mut project = Project::new("/tmp/interrupt");

        let aborted = ExecutionManager::new()
            .with_interrupt(interrupt)
            .run::<&str, &str>(&mut registry, &mut project, &[], &["test"])
            .unwrap_err();

        assert!(matches!(aborted.error, Error::Interrupted));
        assert_eq!(aborted.error.to_string(), "Build aborted");
        assert_eq!(aborted.phase, BuildPhase::Executing);
        assert_eq!(entries(&journal), ["compile"]);
        assert_eq!(aborted.task_records.len(), 1);
        assert_eq!(aborted.task_records[0].task_name, "compile");
    }

    #[test]
    fn test_interrupt_skips_remaining_hooks() {
        let journal = Journal::default();
        let interrupt = InterruptFlag::new();
        let mut registry = TaskRegistry::new();
        registry.register_task(journaled("compile", &journal)).unwrap();
        let raiser = interrupt.clone();
        registry.register_hook(ActionHook::before("compile", move |_, _| {
            raiser.raise();
            Ok(())
        }));
        let log = Arc::clone(&journal);
        registry.register_hook(ActionHook::before("compile", move |_, _| {
            log.lock().unwrap().push("second hook".to_string());
            Ok(())
        }));
        let mut project = Project::new("/tmp/interrupt-hooks");

        let aborted = ExecutionManager::new()
            .with_interrupt(interrupt)
            .run::<&str, &str>(&mut registry, &mut project, &[], &["compile"])
            .unwrap_err();

        assert!(matches!(aborted.error, Error::Interrupted));
        assert!(entries(&journal).is_empty());
        assert!(aborted.task_records.is_empty());
    }

    #[test]
    fn test_failure_after_interrupt_is_reported_as_interrupt() {
        let interrupt = InterruptFlag::new();
        let mut registry = TaskRegistry::new();
        let raiser = interrupt.clone();
        registry
            .register_task(Task::new("package", move |_, _| {
                raiser.raise();
                anyhow::bail!("child killed")
            }))
            .unwrap();
        let mut project = Project::new("/tmp/interrupt-failure");

        let aborted = ExecutionManager::new()
            .with_interrupt(interrupt)
            .run::<&str, &str>(&mut registry, &mut project, &[], &["package"])
            .unwrap_err();

        assert!(matches!(aborted.error, Error::Interrupted));
    }

    #[test]
    fn test_raised_interrupt_prevents_initializers() {
        let interrupt = InterruptFlag::new();
        interrupt.raise();
        let mut registry = TaskRegistry::new();
        registry.register_initializer(Initializer::new(|_, _| anyhow::bail!("must not run")));
        let mut project = Project::new("/tmp/interrupt-init");

        let aborted = ExecutionManager::new()
            .with_interrupt(interrupt)
            .run::<&str, &str>(&mut registry, &mut project, &[], &["compile"])
            .unwrap_err();

        assert_eq!(aborted.phase, BuildPhase::Init);
        assert!(matches!(aborted.error, Error::Interrupted));
    }
}
