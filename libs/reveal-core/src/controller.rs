//! Review session state machine.
//!
//! The host forwards its four events (question shown, answer shown, card
//! graded, session state changed) to an [`AdaptiveController`]. The
//! controller arms the auto-reveal countdown, measures how long each
//! question stayed up and feeds that into the configured [`DelayPolicy`].
//!
//! All methods are expected to run on the host's single event loop.

use crate::clock::{ElapsedClock, SystemClock, TimeSource};
use crate::error::{Result, TimerError};
use crate::input::TimerEdit;
use crate::policy::{self, Adjustment, DelayPolicy};
use crate::scheduler::{Countdown, DelayScheduler};
use crate::store::TimerStore;
use crate::types::{CardId, CardTimingState, Ease, RevealSettings, SessionState};
use std::time::Duration;

/// What the controller needs from the embedding application.
pub trait ReviewHost {
    /// Reveal the answer of the current card now.
    fn reveal_answer(&mut self);

    /// Card currently shown by the host, if any.
    fn current_card(&self) -> Option<CardId>;

    /// Whether the host is still showing the question side.
    fn is_question_side(&self) -> bool;
}

/// Where the controller is within the current card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    QuestionShown(CardId),
    AnswerShown(CardId),
}

impl Phase {
    pub fn card(&self) -> Option<&CardId> {
        match self {
            Self::Idle => None,
            Self::QuestionShown(id) | Self::AnswerShown(id) => Some(id),
        }
    }
}

/// Per-card adaptive auto-reveal.
pub struct AdaptiveController<S: DelayScheduler, T: TimeSource = SystemClock> {
    settings: RevealSettings,
    policy: Box<dyn DelayPolicy>,
    store: TimerStore,
    scheduler: S,
    clock: ElapsedClock<T>,
    phase: Phase,
    generation: u64,
    last_reveal_elapsed: Option<Duration>,
}

impl<S: DelayScheduler, T: TimeSource> AdaptiveController<S, T> {
    pub fn new(settings: RevealSettings, store: TimerStore, scheduler: S, time: T) -> Self {
        let policy = policy::from_settings(&settings);
        Self {
            settings,
            policy,
            store,
            scheduler,
            clock: ElapsedClock::new(time),
            phase: Phase::Idle,
            generation: 0,
            last_reveal_elapsed: None,
        }
    }

    /// Replace the policy chosen from the settings.
    pub fn with_policy(mut self, policy: Box<dyn DelayPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn store(&self) -> &TimerStore {
        &self.store
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Card under review, whichever side is showing.
    pub fn current_card(&self) -> Option<&CardId> {
        self.phase.card()
    }

    /// Response time recorded for the current card and not yet graded.
    pub fn last_reveal_elapsed(&self) -> Option<Duration> {
        self.last_reveal_elapsed
    }

    /// The host displayed the question of `card_id`.
    ///
    /// Returns the delay the countdown was armed with, if one was armed.
    pub fn question_shown(&mut self, card_id: CardId) -> Option<Duration> {
        self.scheduler.cancel();
        self.generation += 1;
        self.last_reveal_elapsed = None;
        self.phase = Phase::QuestionShown(card_id.clone());

        if !self.settings.enabled {
            self.clock.reset();
            tracing::debug!(card = %card_id, "auto reveal disabled, not arming");
            return None;
        }

        self.clock.start();

        let state = self.store.get(&card_id);
        if !state.is_timed() {
            tracing::debug!(card = %card_id, "card has no timer");
            return None;
        }

        let delay = Duration::from_millis(state.delay_ms);
        self.scheduler.arm(
            delay,
            Countdown {
                card_id: card_id.clone(),
                generation: self.generation,
            },
        );
        tracing::debug!(card = %card_id, delay_ms = state.delay_ms, generation = self.generation, "countdown armed");
        Some(delay)
    }

    /// A countdown delivered by the scheduler.
    ///
    /// Reveals the answer through the host only if the countdown is the
    /// latest one armed and the host still shows that card's question.
    /// Returns whether the reveal was triggered.
    pub fn countdown_expired(&mut self, countdown: Countdown, host: &mut impl ReviewHost) -> bool {
        let current = countdown.generation == self.generation
            && self.settings.enabled
            && self.phase == Phase::QuestionShown(countdown.card_id.clone())
            && host.current_card().as_ref() == Some(&countdown.card_id)
            && host.is_question_side();

        if !current {
            tracing::debug!(
                card = %countdown.card_id,
                generation = countdown.generation,
                current_generation = self.generation,
                "ignoring stale countdown"
            );
            return false;
        }

        tracing::debug!(card = %countdown.card_id, "countdown expired, revealing answer");
        host.reveal_answer();
        true
    }

    /// The host displayed the answer of `card_id`, by user action or timer.
    ///
    /// Returns the measured response time.
    pub fn answer_shown(&mut self, card_id: CardId) -> Option<Duration> {
        if self.phase != Phase::QuestionShown(card_id.clone()) {
            tracing::warn!(card = %card_id, phase = ?self.phase, "answer shown without its question");
            return None;
        }
        self.scheduler.cancel();
        self.phase = Phase::AnswerShown(card_id.clone());

        if !self.settings.enabled || !self.clock.is_running() {
            return None;
        }

        match self.clock.elapsed() {
            Ok(elapsed) => {
                tracing::debug!(card = %card_id, elapsed_ms = elapsed.as_millis() as u64, "answer revealed");
                self.last_reveal_elapsed = Some(elapsed);
                Some(elapsed)
            }
            Err(e) => {
                tracing::warn!(card = %card_id, error = %e, "could not measure response time");
                None
            }
        }
    }

    /// The user graded `card_id`. Applies the delay policy and persists.
    pub fn card_graded(&mut self, card_id: CardId, ease: Ease) -> Option<Adjustment> {
        if self.phase != Phase::AnswerShown(card_id.clone()) {
            tracing::warn!(card = %card_id, phase = ?self.phase, "grade for a card whose answer is not shown");
            return None;
        }
        if !self.settings.enabled {
            tracing::debug!(card = %card_id, "auto reveal disabled, not adapting");
            return None;
        }
        let Some(elapsed) = self.last_reveal_elapsed.take() else {
            tracing::debug!(card = %card_id, "no response time recorded, not adapting");
            return None;
        };

        let previous = self.store.get(&card_id);
        let adjustment = self.policy.adjust(&previous, ease, elapsed);
        tracing::debug!(
            card = %card_id,
            ease = ease.to_value(),
            elapsed_ms = elapsed.as_millis() as u64,
            kind = ?adjustment.kind,
            delay_before = previous.delay_ms,
            delay_after = adjustment.new_state.delay_ms,
            "timer adjusted"
        );

        self.store.set(card_id, adjustment.new_state);
        self.store.save();
        Some(adjustment)
    }

    /// The host moved between top-level states. Leaving review resets
    /// everything transient.
    pub fn session_state_changed(&mut self, new: SessionState, old: SessionState) {
        if new == SessionState::Review {
            return;
        }
        tracing::debug!(from = old.as_str(), to = new.as_str(), "left review");
        self.reset();
    }

    /// Drop the countdown and all per-card measurement.
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.clock.reset();
        self.phase = Phase::Idle;
        self.last_reveal_elapsed = None;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
        if !enabled {
            self.scheduler.cancel();
        }
        tracing::info!(enabled, "auto reveal toggled");
    }

    /// Flip the global switch, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.settings.enabled);
        self.settings.enabled
    }

    /// Apply a user-entered delay (in seconds) to a card.
    ///
    /// Invalid input is rejected before anything changes.
    pub fn set_timer(&mut self, card_id: CardId, input: &str) -> Result<TimerEdit> {
        let edit = self.store.edit(card_id.clone(), input)?;
        tracing::info!(card = %card_id, edit = ?edit, "timer edited manually");
        if edit != TimerEdit::Cancelled {
            self.rearm(&card_id);
        }
        Ok(edit)
    }

    /// [`set_timer`](Self::set_timer) for the card under review.
    pub fn set_timer_for_current(&mut self, input: &str) -> Result<TimerEdit> {
        let card_id = self.current_card().cloned().ok_or(TimerError::NoCurrentCard)?;
        self.set_timer(card_id, input)
    }

    /// Remove a card's stored state, reverting it to the zero default.
    pub fn clear_timer(&mut self, card_id: &CardId) -> Option<CardTimingState> {
        let removed = self.store.clear(card_id);
        tracing::info!(card = %card_id, "timer cleared");
        self.rearm(card_id);
        removed
    }

    /// Follow a stored delay change on the question currently showing.
    ///
    /// The countdown is replaced by one for the time left under the new
    /// delay, or dropped if the card is no longer timed or that time has
    /// already passed.
    fn rearm(&mut self, card_id: &CardId) {
        if !self.settings.enabled || self.phase != Phase::QuestionShown(card_id.clone()) {
            return;
        }
        self.scheduler.cancel();
        self.generation += 1;

        let state = self.store.get(card_id);
        let Ok(elapsed) = self.clock.elapsed() else {
            return;
        };
        let remaining = Duration::from_millis(state.delay_ms).saturating_sub(elapsed);
        if remaining.is_zero() {
            tracing::debug!(card = %card_id, "countdown dropped after edit");
            return;
        }
        self.scheduler.arm(
            remaining,
            Countdown {
                card_id: card_id.clone(),
                generation: self.generation,
            },
        );
        tracing::debug!(
            card = %card_id,
            remaining_ms = remaining.as_millis() as u64,
            generation = self.generation,
            "countdown re-armed after edit"
        );
    }
}
