//! Question-to-answer elapsed time measurement.

use crate::error::{Result, TimerError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time, as an offset from an arbitrary origin.
pub trait TimeSource: Send {
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced time source. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    millis: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(by, Ordering::SeqCst);
    }
}

impl TimeSource for VirtualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Measures how long a question stayed on screen.
#[derive(Debug)]
pub struct ElapsedClock<T: TimeSource = SystemClock> {
    source: T,
    started_at: Option<Duration>,
}

impl<T: TimeSource> ElapsedClock<T> {
    pub fn new(source: T) -> Self {
        Self {
            source,
            started_at: None,
        }
    }

    /// Begin measuring from zero, discarding any previous start.
    pub fn start(&mut self) {
        self.started_at = Some(self.source.now());
    }

    /// Forget the current measurement.
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since [`start`](Self::start). Calling this before `start` is a
    /// caller bug and reports [`TimerError::ClockNotStarted`].
    pub fn elapsed(&self) -> Result<Duration> {
        let started_at = self.started_at.ok_or(TimerError::ClockNotStarted)?;
        Ok(self.source.now().saturating_sub(started_at))
    }
}
