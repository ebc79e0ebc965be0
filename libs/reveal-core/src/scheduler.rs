//! The single pending auto-reveal countdown.
//!
//! Expiry is delivered as a [`Countdown`] value posted back to the host's
//! event loop, which hands it to
//! [`AdaptiveController::countdown_expired`](crate::AdaptiveController::countdown_expired).
//! A countdown that was already posted when `cancel` ran is still delivered;
//! the controller discards it because its generation no longer matches.

use crate::clock::{TimeSource, VirtualClock};
use crate::types::CardId;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Identity of one arming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub card_id: CardId,
    pub generation: u64,
}

/// Owner of at most one pending countdown.
pub trait DelayScheduler {
    /// Cancel any pending countdown, then deliver `countdown` once after
    /// `delay` unless cancelled first. `delay` must be positive.
    fn arm(&mut self, delay: Duration, countdown: Countdown);

    /// Cancel the pending countdown, if any.
    fn cancel(&mut self);

    fn is_pending(&self) -> bool;
}

/// Scheduler backed by a sleeping tokio task per arming.
///
/// Must be armed from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: UnboundedSender<Countdown>,
    pending: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver the host loop polls for expiries.
    pub fn channel() -> (Self, UnboundedReceiver<Countdown>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx, pending: None }, rx)
    }
}

impl DelayScheduler for TokioScheduler {
    fn arm(&mut self, delay: Duration, countdown: Countdown) {
        debug_assert!(!delay.is_zero(), "armed a countdown with zero delay");
        self.cancel();

        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the host loop has shut down.
            let _ = tx.send(countdown);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug)]
struct Pending {
    deadline: Duration,
    delay: Duration,
    countdown: Countdown,
}

/// Deterministic scheduler driven by a [`VirtualClock`].
///
/// Clones share the pending countdown, so a test can keep a handle and
/// poll for expiries while the controller owns another.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    clock: VirtualClock,
    pending: Arc<Mutex<Option<Pending>>>,
}

impl ManualScheduler {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Take the pending countdown if its deadline has passed.
    pub fn poll_expired(&self) -> Option<Countdown> {
        let mut pending = self.pending.lock().ok()?;
        let due = pending
            .as_ref()
            .map(|p| self.clock.now() >= p.deadline)
            .unwrap_or(false);
        if due {
            pending.take().map(|p| p.countdown)
        } else {
            None
        }
    }

    /// Advance virtual time and return the countdown that expired, if any.
    pub fn advance(&self, by: Duration) -> Option<Countdown> {
        self.clock.advance(by);
        self.poll_expired()
    }

    /// Delay the pending countdown was armed with.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending
            .lock()
            .ok()
            .and_then(|p| p.as_ref().map(|p| p.delay))
    }
}

impl DelayScheduler for ManualScheduler {
    fn arm(&mut self, delay: Duration, countdown: Countdown) {
        debug_assert!(!delay.is_zero(), "armed a countdown with zero delay");
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(Pending {
                deadline: self.clock.now() + delay,
                delay,
                countdown,
            });
        }
    }

    fn cancel(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.take();
        }
    }

    fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|p| p.is_some())
            .unwrap_or(false)
    }
}
