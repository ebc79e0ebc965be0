//! Fixed delays: only manual overrides change a card's timer.

use super::{Adjustment, DelayPolicy};
use crate::types::{CardTimingState, Ease};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct Fixed;

impl DelayPolicy for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn adjust(&self, state: &CardTimingState, _ease: Ease, _elapsed: Duration) -> Adjustment {
        Adjustment::unchanged(state)
    }
}
