//! Error types for kiln operations

mod builders;
mod conversions;
mod display;
mod types;

pub use builders::*;
pub use types::{Error, FailedComponent, Result};
