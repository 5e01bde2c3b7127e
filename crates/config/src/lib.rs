//! Build descriptor loading for kiln
//!
//! This crate reads a project's `build.json` into the project model and task
//! registry, and parses `key=value` property overrides given on the command
//! line.

pub mod descriptor;
pub mod loader;
pub mod overrides;

pub use descriptor::*;
pub use loader::*;
pub use overrides::*;
