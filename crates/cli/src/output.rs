//! Console rendering of build status, summaries and task listings

use chrono::{DateTime, Local};
use crossterm::style::Stylize;
use kiln_core::{Project, TaskExecutionRecord};
use kiln_task::Task;
use kiln_utils::{duration_millis, format_timestamp};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

const RULE_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 20;

/// Whether console output is coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    colored: bool,
}

impl Style {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Colour only when stdout is a terminal and colour was not disabled
    pub fn detect(no_color: bool) -> Self {
        Self::new(!no_color && io::stdout().is_terminal())
    }

    pub fn is_colored(self) -> bool {
        self.colored
    }

    fn bold(self, text: &str) -> String {
        if self.colored {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(self, text: &str) -> String {
        if self.colored {
            text.bold().green().to_string()
        } else {
            text.to_string()
        }
    }

    fn failure(self, text: &str) -> String {
        if self.colored {
            text.bold().red().to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn write_rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

/// Version banner and start time
pub fn write_banner(
    out: &mut impl Write,
    style: Style,
    started_at: &DateTime<Local>,
) -> io::Result<()> {
    let banner = format!("kiln version {}", env!("CARGO_PKG_VERSION"));
    writeln!(out, "{}", style.bold(&banner))?;
    writeln!(out, "Build started at {}", format_timestamp(started_at))?;
    write_rule(out)
}

/// `BUILD SUCCESSFUL` or `BUILD FAILED - <message>` between two rules
pub fn write_status(out: &mut impl Write, style: Style, failure: Option<&str>) -> io::Result<()> {
    write_rule(out)?;
    match failure {
        None => writeln!(out, "{}", style.success("BUILD SUCCESSFUL"))?,
        Some(message) => writeln!(
            out,
            "{}",
            style.failure(&format!("BUILD FAILED - {message}"))
        )?,
    }
    write_rule(out)
}

/// Project header and the executed tasks with their timings
pub fn write_summary(
    out: &mut impl Write,
    project: &Project,
    environments: &[String],
    records: &[TaskExecutionRecord],
) -> io::Result<()> {
    writeln!(out, "Build Summary")?;
    writeln!(out, "{:>LABEL_WIDTH$}: {}", "Project", project.name)?;
    writeln!(out, "{:>LABEL_WIDTH$}: {}", "Version", project.version)?;
    writeln!(
        out,
        "{:>LABEL_WIDTH$}: {}",
        "Base directory",
        project.basedir.display()
    )?;
    writeln!(
        out,
        "{:>LABEL_WIDTH$}: {}",
        "Environments",
        environments.join(", ")
    )?;

    let tasks: String = records.iter().map(|record| format!(" {record}")).collect();
    writeln!(out, "{:>LABEL_WIDTH$}:{tasks}", "Tasks")
}

/// Finish time and overall duration
pub fn write_elapsed(
    out: &mut impl Write,
    finished_at: &DateTime<Local>,
    elapsed: Duration,
) -> io::Result<()> {
    writeln!(out, "Build finished at {}", format_timestamp(finished_at))?;
    writeln!(
        out,
        "Build took {} seconds ({} ms)",
        elapsed.as_secs(),
        duration_millis(elapsed)
    )
}

/// Tasks sorted by name with descriptions and dependencies
pub fn write_task_list(
    out: &mut impl Write,
    project_name: &str,
    mut tasks: Vec<&Task>,
) -> io::Result<()> {
    writeln!(out, "Tasks found for project \"{project_name}\":")?;

    tasks.sort();
    let column = tasks
        .iter()
        .map(|task| task.name().chars().count())
        .max()
        .unwrap_or(0)
        + 4;

    for task in tasks {
        let description = match task.description_text() {
            text if text.is_empty() => "<no description available>".to_string(),
            text => text,
        };
        writeln!(out, "{:>column$} - {description}", task.name())?;

        if !task.dependencies().is_empty() {
            writeln!(
                out,
                "{}depends on tasks: {}",
                " ".repeat(column + 3),
                task.dependencies().join(" ")
            )?;
        }
    }

    Ok(())
}
