//! Domain types for the build engine

pub mod build;
pub mod dependency;
pub mod environment;
pub mod project;

pub use build::*;
pub use dependency::*;
pub use environment::*;
pub use project::*;

/// Whether a hook runs before or after its target task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookPhase {
    Before,
    After,
}
