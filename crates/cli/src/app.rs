//! The `kiln` command flow: prepare, list or build, then report

use crate::options::Options;
use crate::output::{self, Style};
use chrono::Local;
use kiln_config::{parse_property_overrides, DescriptorLoader};
use kiln_core::{TaskExecutionRecord, VERBOSE_PROPERTY};
use kiln_task::Reactor;
use kiln_utils::{InterruptFlag, Timer};
use std::io::{self, Write};
use std::process::ExitCode;

/// A failed prepare or build, with whatever tasks completed before it
struct Failure {
    report: eyre::Report,
    message: String,
    records: Vec<TaskExecutionRecord>,
}

impl Failure {
    fn new<E>(error: E, message: String, records: Vec<TaskExecutionRecord>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            report: eyre::Report::new(error),
            message,
            records,
        }
    }
}

/// Run the command described by `options` and map the outcome to an exit code
pub fn run(options: &Options) -> ExitCode {
    let overrides = match parse_property_overrides(&options.property_overrides) {
        Ok(overrides) => overrides,
        Err(e) => {
            eprintln!("Usage error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let style = Style::detect(options.no_color);
    if let Err(e) = kiln_utils::tracing::init(options.log_level(), style.is_colored()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if options.list_tasks {
        let mut reactor = Reactor::new(DescriptorLoader::new());
        return list_tasks(&mut reactor, overrides, options);
    }

    let interrupt = InterruptFlag::new();
    if let Err(e) = interrupt.register_signals() {
        tracing::warn!(error = %e, "Failed to register interrupt handlers");
    }
    let mut reactor = Reactor::new(DescriptorLoader::new()).with_interrupt(interrupt);

    let started_at = Local::now();
    let timer = Timer::start();
    let environments = options.active_environments();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !options.very_quiet {
        report_io(output::write_banner(&mut out, style, &started_at));
    }

    let outcome = prepare_and_build(&mut reactor, overrides, options, &environments);

    let elapsed = timer.stop().elapsed();
    let finished_at = Local::now();

    if let Err(failure) = &outcome {
        tracing::debug!(error = %failure.message, "Build failed");
        if options.debug {
            eprintln!("{:?}", failure.report);
        }
    }

    if !options.very_quiet {
        let (failure_message, records) = match &outcome {
            Ok(records) => (None, records.as_slice()),
            Err(failure) => (Some(failure.message.as_str()), failure.records.as_slice()),
        };
        report_io(output::write_status(&mut out, style, failure_message));
        if let Some(project) = reactor.project() {
            report_io(output::write_summary(&mut out, project, &environments, records));
        }
        report_io(output::write_elapsed(&mut out, &finished_at, elapsed));
    }

    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn prepare_and_build<I>(
    reactor: &mut Reactor,
    overrides: I,
    options: &Options,
    environments: &[String],
) -> Result<Vec<TaskExecutionRecord>, Failure>
where
    I: IntoIterator<Item = (String, String)>,
{
    if let Err(e) = reactor.prepare_build(overrides, &options.project_directory) {
        let message = e.to_string();
        return Err(Failure::new(e, message, Vec::new()));
    }

    if options.verbose || options.debug {
        tracing::debug!("Verbose output enabled");
        if let Some(project) = reactor.project_mut() {
            project.set_property(VERBOSE_PROPERTY, true);
        }
    }

    match reactor.build(environments, options.tasks.as_slice()) {
        Ok(summary) => Ok(summary.task_records),
        Err(mut aborted) => {
            let message = aborted.error.to_string();
            let records = std::mem::take(&mut aborted.task_records);
            Err(Failure::new(aborted, message, records))
        }
    }
}

fn list_tasks<I>(reactor: &mut Reactor, overrides: I, options: &Options) -> ExitCode
where
    I: IntoIterator<Item = (String, String)>,
{
    let project_name = match reactor.prepare_build(overrides, &options.project_directory) {
        Ok(project) => project.name.clone(),
        Err(e) => {
            eprintln!("{e}");
            if options.debug {
                eprintln!("{:?}", eyre::Report::new(e));
            }
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match output::write_task_list(&mut out, &project_name, reactor.get_tasks()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to write task list: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Console write failures are reported but never change the build outcome
fn report_io(result: io::Result<()>) {
    if let Err(e) = result {
        let _ = writeln!(io::stderr(), "Failed to write output: {e}");
    }
}
