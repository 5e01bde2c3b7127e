//! Serialized form of a build descriptor

use indexmap::IndexMap;
use kiln_core::{Dependency, HookPhase, PropertyValue};
use serde::{Deserialize, Serialize};

/// Contents of a `build.json` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildDescriptor {
    /// Project name; defaults to the directory name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Initial project properties, in declaration order
    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub build_dependencies: Vec<Dependency>,
    /// Tasks, registered in declaration order
    #[serde(default)]
    pub tasks: IndexMap<String, TaskDescriptor>,
    #[serde(default)]
    pub hooks: Vec<HookDescriptor>,
    #[serde(default)]
    pub initializers: Vec<InitializerDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDescriptor {
    #[serde(default)]
    pub description: Description,
    #[serde(default)]
    pub depends: Vec<String>,
    /// Command line to run; a task without one only aggregates its dependencies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// A description given as one string or as several fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Fragments(Vec<String>),
}

impl Description {
    pub fn fragments(&self) -> Vec<String> {
        match self {
            Description::Text(text) if text.is_empty() => Vec::new(),
            Description::Text(text) => vec![text.clone()],
            Description::Fragments(fragments) => fragments.clone(),
        }
    }
}

impl Default for Description {
    fn default() -> Self {
        Description::Fragments(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookDescriptor {
    pub phase: HookPhase,
    pub task: String,
    /// Environments gating the hook; empty means always
    #[serde(default)]
    pub environments: Vec<String>,
    pub command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitializerDescriptor {
    #[serde(default)]
    pub environments: Vec<String>,
    /// Properties set when the initializer runs
    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,
}
