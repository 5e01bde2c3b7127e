//! Core domain types, errors, and constants for `kiln`.
//!
//! This crate holds the passive data model the build engine operates on
//! together with the single error taxonomy shared by every other crate.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias covering registration,
//!   resolution and execution failures.
//! - **`types`**: `Project`, `Dependency`, environment gating and the build
//!   summary records produced by one build invocation.
//! - **`constants`**: file names, environment variable names and well-known
//!   property keys.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, FailedComponent, Result},
    types::*,
};
