//! Command-line front end for kiln

pub mod app;
pub mod options;
pub mod output;

pub use app::run;
pub use options::Options;
