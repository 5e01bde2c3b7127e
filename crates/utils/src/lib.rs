//! Shared utilities and pure functions for kiln
//!
//! This crate provides the small helpers used throughout the kiln
//! workspace: build timing, timestamp formatting, interrupt tracking and
//! tracing setup.

pub mod interrupt;
pub mod time;
pub mod timer;
pub mod tracing;

pub use interrupt::InterruptFlag;
pub use time::*;
pub use timer::*;
