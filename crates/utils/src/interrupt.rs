//! User interrupt tracking for a running build
//!
//! An [`InterruptFlag`] is raised from a signal handler and polled by the
//! build between callables, so an interrupt stops the build at the next task
//! or hook boundary and is reported like any other build failure.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag raised when the user asks the build to stop
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag on SIGINT and SIGTERM instead of terminating the process.
    ///
    /// A second signal while the flag is raised exits with status 1.
    pub fn register_signals(&self) -> io::Result<()> {
        #[cfg(unix)]
        {
            use signal_hook::consts::{SIGINT, SIGTERM};

            for signal in [SIGINT, SIGTERM] {
                signal_hook::flag::register_conditional_shutdown(
                    signal,
                    1,
                    Arc::clone(&self.raised),
                )?;
                signal_hook::flag::register(signal, Arc::clone(&self.raised))?;
            }
            tracing::debug!("Registered interrupt handlers");
        }
        Ok(())
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
