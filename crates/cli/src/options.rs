//! Command-line options

use clap::Parser;
use kiln_core::KILN_ENV_VAR;
use tracing::Level;

#[derive(Parser, Debug, Clone)]
#[command(name = "kiln")]
#[command(about = "Task-oriented build tool", long_about = None)]
#[command(version)]
#[command(override_usage = "kiln [OPTIONS] [TASKS]...")]
pub struct Options {
    /// List tasks
    #[arg(short = 't', long)]
    pub list_tasks: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Root directory to execute in
    #[arg(
        short = 'D',
        long,
        value_name = "PROJECT_DIRECTORY",
        default_value = "."
    )]
    pub project_directory: String,

    /// Activate the given environment for this build; may be repeated
    #[arg(short = 'E', long = "environment", value_name = "ENVIRONMENT")]
    pub environments: Vec<String>,

    /// Set or override a property value
    #[arg(short = 'P', value_name = "PROPERTY=VALUE")]
    pub property_overrides: Vec<String>,

    /// Print debug messages
    #[arg(short = 'X', long)]
    pub debug: bool,

    /// Quiet mode; print only warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Very quiet mode; print only errors
    #[arg(short = 'Q', long)]
    pub very_quiet: bool,

    /// Disable colored output
    #[arg(short = 'C', long)]
    pub no_color: bool,

    /// Tasks to build
    pub tasks: Vec<String>,
}

impl Options {
    pub fn is_quiet(&self) -> bool {
        self.quiet || self.very_quiet
    }

    /// Log level selected by the output flags
    pub fn log_level(&self) -> Level {
        if self.debug {
            Level::DEBUG
        } else if self.very_quiet {
            Level::ERROR
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }

    /// Environments from `-E`, falling back to the comma-separated `KILN_ENV`
    pub fn active_environments(&self) -> Vec<String> {
        if !self.environments.is_empty() {
            return self.environments.clone();
        }

        std::env::var(KILN_ENV_VAR)
            .map(|value| split_environments(&value))
            .unwrap_or_default()
    }
}

fn split_environments(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|env| !env.is_empty())
        .map(String::from)
        .collect()
}
