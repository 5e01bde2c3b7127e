//! Loads a build descriptor into a project and task registry

use crate::descriptor::{BuildDescriptor, HookDescriptor, InitializerDescriptor, TaskDescriptor};
use kiln_core::{Error, Project, Result, DESCRIPTOR_FILENAME};
use kiln_task::{ActionHook, CommandAction, Initializer, ProjectLoader, Task, TaskRegistry};
use std::path::{Path, PathBuf};

/// Reads `build.json` (or a custom descriptor name) from the project directory
#[derive(Debug, Clone)]
pub struct DescriptorLoader {
    descriptor_name: String,
}

impl DescriptorLoader {
    /// Create a loader for the default descriptor name
    pub fn new() -> Self {
        Self {
            descriptor_name: DESCRIPTOR_FILENAME.to_string(),
        }
    }

    /// Set the descriptor file name looked up in the project directory
    pub fn descriptor_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor_name = name.into();
        self
    }

    /// Path of the descriptor inside `directory`
    pub fn descriptor_path(&self, directory: &Path) -> PathBuf {
        directory.join(&self.descriptor_name)
    }

    /// Read and parse the descriptor in `directory`
    pub fn read(&self, directory: &Path) -> Result<BuildDescriptor> {
        let path = self.descriptor_path(directory);
        if !path.is_file() {
            return Err(Error::descriptor(&path, "no build descriptor found"));
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::file_system(&path, "read build descriptor", e))?;

        serde_json::from_str(&content).map_err(|e| Error::descriptor(&path, e.to_string()))
    }
}

impl Default for DescriptorLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectLoader for DescriptorLoader {
    fn load(&self, project: &mut Project, registry: &mut TaskRegistry) -> Result<()> {
        let descriptor = self.read(&project.basedir)?;
        tracing::debug!(
            path = %self.descriptor_path(&project.basedir).display(),
            tasks = descriptor.tasks.len(),
            "Loaded build descriptor"
        );
        apply(descriptor, project, registry)
    }
}

/// Populate `project` and `registry` from a parsed descriptor
pub fn apply(
    descriptor: BuildDescriptor,
    project: &mut Project,
    registry: &mut TaskRegistry,
) -> Result<()> {
    let BuildDescriptor {
        name,
        version,
        properties,
        dependencies,
        build_dependencies,
        tasks,
        hooks,
        initializers,
    } = descriptor;

    if let Some(name) = name {
        project.name = name;
    }
    if let Some(version) = version {
        project.version = version;
    }
    for (key, value) in properties {
        project.set_property(key, value);
    }
    for dependency in dependencies {
        project.depends_on(dependency);
    }
    for dependency in build_dependencies {
        project.build_depends_on(dependency);
    }

    for (name, task) in tasks {
        registry.register_task(build_task(name, task))?;
    }
    for hook in hooks {
        registry.register_hook(build_hook(hook));
    }
    for initializer in initializers {
        registry.register_initializer(build_initializer(initializer));
    }

    Ok(())
}

fn build_task(name: String, descriptor: TaskDescriptor) -> Task {
    let task = match descriptor.command {
        Some(command) => Task::from_action(name, CommandAction::new(command)),
        None => Task::new(name, |_, _| Ok(())),
    };

    descriptor
        .description
        .fragments()
        .into_iter()
        .fold(task, Task::describe)
        .depends_on_all(descriptor.depends)
}

fn build_hook(descriptor: HookDescriptor) -> ActionHook {
    let hook = ActionHook::from_action(
        descriptor.phase,
        descriptor.task,
        CommandAction::new(descriptor.command),
    );
    if descriptor.environments.is_empty() {
        hook
    } else {
        hook.only_in(descriptor.environments)
    }
}

fn build_initializer(descriptor: InitializerDescriptor) -> Initializer {
    let InitializerDescriptor {
        environments,
        properties,
    } = descriptor;

    let initializer = Initializer::new(move |project, _| {
        for (key, value) in &properties {
            project.set_property(key.clone(), value.clone());
        }
        Ok(())
    });
    if environments.is_empty() {
        initializer
    } else {
        initializer.only_in(environments)
    }
}
