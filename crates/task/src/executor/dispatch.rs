//! Hook and action dispatch for a single planned task

use super::state::BuildState;
use crate::definition::{ActionContext, Task};
use crate::hooks::ActionHook;
use crate::registry::TaskRegistry;
use kiln_core::{Error, FailedComponent, HookPhase, Project, Result, TaskExecutionRecord};
use kiln_utils::{InterruptFlag, Timer};

/// Fail with [`Error::Interrupted`] once the user has asked the build to stop
pub(super) fn check_interrupt(interrupt: &InterruptFlag) -> Result<()> {
    if interrupt.is_raised() {
        tracing::warn!("Build interrupted");
        return Err(Error::Interrupted);
    }
    Ok(())
}

/// Prefer the interrupt over an error it most likely caused
fn interrupted_or(interrupt: &InterruptFlag, error: Error) -> Error {
    if interrupt.is_raised() {
        Error::Interrupted
    } else {
        error
    }
}

/// Run before hooks, the timed action, then after hooks
pub(super) fn execute_task(
    registry: &TaskRegistry,
    task: &Task,
    project: &mut Project,
    build: &mut BuildState,
    interrupt: &InterruptFlag,
) -> Result<()> {
    let span = kiln_utils::tracing::task_span(task.name());
    let _guard = span.enter();

    run_hooks(registry, task.name(), HookPhase::Before, project, interrupt)?;

    check_interrupt(interrupt)?;
    tracing::info!("Executing task");
    let timer = Timer::start();
    task.action()
        .execute(project, &ActionContext::task(task.name()))
        .map_err(|source| {
            interrupted_or(
                interrupt,
                Error::build_failure(
                    FailedComponent::Task {
                        name: task.name().to_string(),
                    },
                    source,
                ),
            )
        })?;
    let elapsed = timer.stop().millis();

    tracing::info!(duration_ms = elapsed, "Task completed");
    build.record(TaskExecutionRecord::new(task.name(), elapsed));

    run_hooks(registry, task.name(), HookPhase::After, project, interrupt)
}

fn run_hooks(
    registry: &TaskRegistry,
    task_name: &str,
    phase: HookPhase,
    project: &mut Project,
    interrupt: &InterruptFlag,
) -> Result<()> {
    let hooks: Vec<&ActionHook> = registry
        .hooks_for(task_name, phase)
        .filter(|hook| hook.environments().admits(&project.active_environments))
        .collect();

    let context = ActionContext::hook(task_name, phase);
    for hook in hooks {
        check_interrupt(interrupt)?;
        tracing::debug!(phase = %phase, "Running hook");
        hook.action().execute(project, &context).map_err(|source| {
            interrupted_or(
                interrupt,
                Error::build_failure(
                    FailedComponent::Hook {
                        phase,
                        task: task_name.to_string(),
                    },
                    source,
                ),
            )
        })?;
    }

    Ok(())
}
