//! External command helpers for task actions

use crate::definition::{Action, ActionContext};
use anyhow::{bail, Context as _};
use kiln_core::{Project, PropertyValue, Result};
use std::process::Command;

/// Incrementally assembles a command line from project properties.
///
/// ```ignore
/// let command = CommandBuilder::new("pylint", &project)
///     .arg_with_property("--rcfile={}", "pylint_rcfile")?
///     .arg_if_property_truthy("--verbose", "verbose");
/// ```
#[derive(Debug, Clone)]
pub struct CommandBuilder<'p> {
    project: &'p Project,
    parts: Vec<String>,
}

impl<'p> CommandBuilder<'p> {
    pub fn new(program: impl Into<String>, project: &'p Project) -> Self {
        Self {
            project,
            parts: vec![program.into()],
        }
    }

    /// Append a literal argument
    #[must_use]
    pub fn arg(mut self, argument: impl Into<String>) -> Self {
        self.parts.push(argument.into());
        self
    }

    /// Append several literal arguments in order
    #[must_use]
    pub fn args_from<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parts.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Append `template` with its first `{}` replaced by the value of `property`.
    ///
    /// Fails when the property is not set.
    pub fn arg_with_property(mut self, template: &str, property: &str) -> Result<Self> {
        let value = self.project.get_mandatory_property(property)?;
        self.parts.push(fill_template(template, value));
        Ok(self)
    }

    /// Like [`arg_with_property`](Self::arg_with_property), but the argument
    /// is dropped when `property` is unset or falsy
    #[must_use]
    pub fn arg_with_truthy_property(mut self, template: &str, property: &str) -> Self {
        if let Some(value) = self
            .project
            .get_property(property)
            .filter(|_| self.project.is_truthy(property))
        {
            self.parts.push(fill_template(template, value));
        }
        self
    }

    /// Append `argument` only when `property` is truthy
    #[must_use]
    pub fn arg_if_property_truthy(mut self, argument: impl Into<String>, property: &str) -> Self {
        if self.project.is_truthy(property) {
            self.parts.push(argument.into());
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.parts[0]
    }

    /// Arguments after the program name
    pub fn args(&self) -> &[String] {
        &self.parts[1..]
    }

    /// The command line as a single shell-quoted string
    pub fn as_string(&self) -> String {
        shlex::try_join(self.parts.iter().map(String::as_str))
            .unwrap_or_else(|_| self.parts.join(" "))
    }

    /// A process command running in the project's base directory
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args()).current_dir(&self.project.basedir);
        command
    }
}

fn fill_template(template: &str, value: &PropertyValue) -> String {
    let rendered = match value {
        PropertyValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    template.replacen("{}", &rendered, 1)
}

/// Task action running a shell-style command line in the project directory.
///
/// Each word of the command line is expanded against the project properties
/// (`$name`, `${name}`, `$$`) after splitting, so property values never get
/// re-split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAction {
    command_line: String,
}

impl CommandAction {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
        }
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Split and expand the command line into program and arguments
    pub fn words(&self, project: &Project) -> anyhow::Result<Vec<String>> {
        let words = shlex::split(&self.command_line)
            .with_context(|| format!("invalid quoting in command '{}'", self.command_line))?;
        if words.is_empty() {
            bail!("empty command");
        }

        words
            .iter()
            .map(|word| project.expand(word).map_err(anyhow::Error::from))
            .collect()
    }
}

impl Action for CommandAction {
    fn execute(&self, project: &mut Project, context: &ActionContext<'_>) -> anyhow::Result<()> {
        let words = self.words(project)?;
        let (program, args) = words.split_first().context("empty command")?;
        let builder =
            CommandBuilder::new(program.as_str(), project).args_from(args.iter().cloned());

        tracing::debug!(
            task = context.task_name,
            command = %builder.as_string(),
            directory = %project.basedir.display(),
            "Running command"
        );

        let status = builder
            .to_command()
            .status()
            .with_context(|| format!("could not run '{program}'"))?;

        if !status.success() {
            match status.code() {
                Some(code) => bail!("command '{}' exited with status {code}", self.command_line),
                None => bail!("command '{}' was terminated by a signal", self.command_line),
            }
        }

        Ok(())
    }
}
