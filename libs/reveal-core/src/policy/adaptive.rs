//! Streak-driven adaptive delay.
//!
//! The delay converges toward the user's actual response time: a fast
//! correct answer tightens it at once, repeated comfortable answers step it
//! down slowly, and repeated misses step it back up.

use super::{Adjustment, AdjustmentKind, DelayPolicy};
use crate::types::{CardTimingState, Ease, RevealSettings};
use std::time::Duration;

/// Adaptive policy with configurable step and thresholds.
#[derive(Debug, Clone)]
pub struct Adaptive {
    pub step_ms: u64,
    pub streak_to_tighten: u32,
    pub misses_to_relax: u32,
}

impl Default for Adaptive {
    fn default() -> Self {
        Self::from(&RevealSettings::default())
    }
}

impl From<&RevealSettings> for Adaptive {
    fn from(settings: &RevealSettings) -> Self {
        Self {
            step_ms: settings.step_ms,
            streak_to_tighten: settings.streak_to_tighten.max(1),
            misses_to_relax: settings.misses_to_relax.max(1),
        }
    }
}

impl DelayPolicy for Adaptive {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn adjust(&self, state: &CardTimingState, ease: Ease, elapsed: Duration) -> Adjustment {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        if state.delay_ms == 0 {
            if !ease.is_correct() {
                return Adjustment::unchanged(state);
            }
            return Adjustment {
                new_state: CardTimingState {
                    delay_ms: elapsed_ms,
                    ..*state
                },
                kind: AdjustmentKind::Bootstrapped,
            };
        }

        if ease.is_correct() && elapsed_ms < state.delay_ms {
            return Adjustment {
                new_state: CardTimingState::with_delay(elapsed_ms),
                kind: AdjustmentKind::Tightened,
            };
        }

        if ease.is_correct() {
            self.comfortable(state)
        } else {
            self.missed(state)
        }
    }
}

impl Adaptive {
    fn comfortable(&self, state: &CardTimingState) -> Adjustment {
        let streak = state.streak.saturating_add(1);
        if streak >= self.streak_to_tighten {
            return Adjustment {
                new_state: CardTimingState {
                    delay_ms: state.delay_ms.saturating_sub(self.step_ms),
                    streak: 0,
                    wrong_counter: state.wrong_counter,
                },
                kind: AdjustmentKind::SteppedDown,
            };
        }
        Adjustment {
            new_state: CardTimingState { streak, ..*state },
            kind: AdjustmentKind::StreakAdvanced,
        }
    }

    fn missed(&self, state: &CardTimingState) -> Adjustment {
        let wrong_counter = state.wrong_counter.saturating_add(1);
        if wrong_counter >= self.misses_to_relax {
            return Adjustment {
                new_state: CardTimingState {
                    delay_ms: state.delay_ms.saturating_add(self.step_ms),
                    streak: 0,
                    wrong_counter: 0,
                },
                kind: AdjustmentKind::SteppedUp,
            };
        }
        Adjustment {
            new_state: CardTimingState {
                delay_ms: state.delay_ms,
                streak: 0,
                wrong_counter,
            },
            kind: AdjustmentKind::MissCounted,
        }
    }
}
