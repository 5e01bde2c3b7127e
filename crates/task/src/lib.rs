//! Task graph resolution and execution for kiln
//!
//! This crate holds the task registry, the dependency resolver that turns a
//! request into an ordered plan, the execution manager that runs the plan
//! with lifecycle hooks, and the reactor façade tying them to a project.

pub mod command;
pub mod definition;
pub mod executor;
pub mod hooks;
pub mod reactor;
pub mod registry;
pub mod resolver;

pub use command::*;
pub use definition::*;
pub use executor::*;
pub use hooks::*;
pub use reactor::*;
pub use registry::*;
pub use resolver::*;
