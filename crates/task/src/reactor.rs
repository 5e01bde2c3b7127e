//! Top-level façade owning the project and registry of one process

use crate::definition::Task;
use crate::executor::ExecutionManager;
use crate::registry::TaskRegistry;
use kiln_core::{BuildAborted, BuildPhase, BuildSummary, Error, Project, Result};
use kiln_utils::InterruptFlag;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Populates a fresh project and registry, typically from a build descriptor
pub trait ProjectLoader {
    fn load(&self, project: &mut Project, registry: &mut TaskRegistry) -> Result<()>;
}

impl<F> ProjectLoader for F
where
    F: Fn(&mut Project, &mut TaskRegistry) -> Result<()>,
{
    fn load(&self, project: &mut Project, registry: &mut TaskRegistry) -> Result<()> {
        self(project, registry)
    }
}

/// Prepares a project through its loader and runs builds against it
pub struct Reactor {
    loader: Box<dyn ProjectLoader>,
    execution_manager: ExecutionManager,
    project: Option<Project>,
    registry: TaskRegistry,
}

impl Reactor {
    pub fn new(loader: impl ProjectLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            execution_manager: ExecutionManager::new(),
            project: None,
            registry: TaskRegistry::new(),
        }
    }

    /// Stop builds at the next task or hook once `interrupt` is raised
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.execution_manager = self.execution_manager.with_interrupt(interrupt);
        self
    }

    /// Load the project in `project_directory`, then apply `property_overrides`.
    ///
    /// Overrides are applied after the loader has run and therefore win over
    /// any value the loader sets. A previously prepared project is discarded.
    pub fn prepare_build<I, K, V>(
        &mut self,
        property_overrides: I,
        project_directory: impl AsRef<Path>,
    ) -> Result<&Project>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let basedir = normalize_directory(project_directory.as_ref())?;

        tracing::debug!(basedir = %basedir.display(), "Preparing build");

        let mut project = Project::new(basedir);
        let mut registry = TaskRegistry::new();
        self.loader.load(&mut project, &mut registry)?;
        project.apply_overrides(property_overrides);

        tracing::info!(
            project = %project.name,
            version = %project.version,
            tasks = registry.len(),
            "Project prepared"
        );

        self.registry = registry;
        Ok(self.project.insert(project))
    }

    /// Registered tasks in registration order
    pub fn get_tasks(&self) -> Vec<&Task> {
        self.registry.all_tasks()
    }

    /// The prepared project, if any
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn project_mut(&mut self) -> Option<&mut Project> {
        self.project.as_mut()
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Build `tasks` with `environments` active
    pub fn build<E, T>(
        &mut self,
        environments: &[E],
        tasks: &[T],
    ) -> std::result::Result<BuildSummary<'_>, BuildAborted>
    where
        E: AsRef<str>,
        T: AsRef<str>,
    {
        let Self {
            execution_manager,
            project,
            registry,
            ..
        } = self;

        let Some(project) = project.as_mut() else {
            return Err(BuildAborted::new(
                BuildPhase::Init,
                Error::configuration("no project prepared"),
                Vec::new(),
            ));
        };

        execution_manager.run(registry, project, environments, tasks)
    }
}

/// Absolute form of `directory` with `.` and `..` components folded away
fn normalize_directory(directory: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(directory)
        .map_err(|e| Error::file_system(directory, "resolve project directory", e))?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

impl fmt::Debug for Reactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactor")
            .field("project", &self.project)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
