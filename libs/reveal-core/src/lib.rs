//! Adaptive per-card auto-reveal for flashcard review sessions.
//!
//! Provides:
//! - Countdown that reveals the answer when a card's delay expires
//! - Response-time measurement between question and answer
//! - Delay policies that adapt each card's delay after grading
//! - JSON persistence of per-card timing state
//! - Shared types (CardId, CardTimingState, Ease, etc.)

pub mod clock;
pub mod controller;
pub mod error;
pub mod input;
pub mod policy;
pub mod scheduler;
pub mod store;
pub mod types;

pub use clock::{ElapsedClock, SystemClock, TimeSource, VirtualClock};
pub use controller::{AdaptiveController, Phase, ReviewHost};
pub use error::{Result, TimerError};
pub use input::{parse_delay_input, DelayInput, TimerEdit};
pub use policy::{get_policy, Adjustment, AdjustmentKind, DelayPolicy};
pub use scheduler::{Countdown, DelayScheduler, ManualScheduler, TokioScheduler};
pub use store::{JsonTimerFile, MemoryBackend, TimerBackend, TimerStore, Timers};
pub use types::{CardId, CardTimingState, Ease, PolicyKind, RevealSettings, SessionState};
