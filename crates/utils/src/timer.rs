//! Wall-clock timers for task and build timing

use std::time::{Duration, Instant};

/// Entry point for timing an operation
#[derive(Debug, Clone, Copy)]
pub struct Timer;

impl Timer {
    /// Start a new timer
    #[must_use]
    pub fn start() -> RunningTimer {
        RunningTimer {
            started_at: Instant::now(),
        }
    }
}

/// A timer that has been started and not yet stopped.
///
/// Elapsed time can only be read after [`RunningTimer::stop`].
#[derive(Debug, Clone, Copy)]
pub struct RunningTimer {
    started_at: Instant,
}

impl RunningTimer {
    /// Stop the timer
    #[must_use]
    pub fn stop(self) -> StoppedTimer {
        StoppedTimer {
            elapsed: self.started_at.elapsed(),
        }
    }
}

/// A stopped timer holding the measured duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppedTimer {
    elapsed: Duration,
}

impl StoppedTimer {
    /// Measured duration
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Measured duration in whole milliseconds
    #[must_use]
    pub fn millis(&self) -> u64 {
        duration_millis(self.elapsed)
    }
}

/// Convert a duration to whole milliseconds, saturating at `u64::MAX`
#[must_use]
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
