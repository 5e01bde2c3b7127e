use kiln_core::KILN_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// `default_level` applies unless `KILN_LOG` holds a filter directive.
/// Output goes to stderr, with ANSI colours only when stderr is a terminal
/// and `ansi` is requested.
pub fn init(
    default_level: Level,
    ansi: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_env(KILN_LOG_VAR)
        .or_else(|_| EnvFilter::try_new(default_level.as_str().to_ascii_lowercase()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi && is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span for the whole build
pub fn build_span(project: &str, requested: usize) -> Span {
    span!(Level::INFO, "build", project = %project, requested = %requested)
}

/// Create a span for task execution
pub fn task_span(name: &str) -> Span {
    span!(Level::INFO, "task", task_name = %name)
}
