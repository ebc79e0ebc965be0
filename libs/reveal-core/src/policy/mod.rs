//! Delay policies that revise a card's timing state after grading.

pub mod adaptive;
pub mod fixed;

use crate::types::{CardTimingState, Ease, PolicyKind, RevealSettings};
use serde::Serialize;
use std::time::Duration;

/// Which branch of a policy produced an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// First correct answer on an untimed card set the delay.
    Bootstrapped,
    /// Correct and faster than the delay: delay cut to the response time.
    Tightened,
    /// Correct but not faster: streak advanced.
    StreakAdvanced,
    /// Streak reached its threshold: delay stepped down.
    SteppedDown,
    /// Incorrect: miss counted.
    MissCounted,
    /// Misses reached their threshold: delay stepped up.
    SteppedUp,
    Unchanged,
}

/// Result of applying a policy to one grading event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub new_state: CardTimingState,
    pub kind: AdjustmentKind,
}

impl Adjustment {
    pub fn unchanged(state: &CardTimingState) -> Self {
        Self {
            new_state: *state,
            kind: AdjustmentKind::Unchanged,
        }
    }
}

/// Trait for delay adjustment policies.
pub trait DelayPolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// Revise a card's state given its grade and the time taken to reveal.
    fn adjust(&self, state: &CardTimingState, ease: Ease, elapsed: Duration) -> Adjustment;
}

/// Get policy by name.
pub fn get_policy(name: &str) -> Option<Box<dyn DelayPolicy>> {
    PolicyKind::from_str(name).map(|kind| from_settings(&RevealSettings {
        policy: kind,
        ..Default::default()
    }))
}

/// Build the policy selected by the settings.
pub fn from_settings(settings: &RevealSettings) -> Box<dyn DelayPolicy> {
    match settings.policy {
        PolicyKind::Adaptive => Box::new(adaptive::Adaptive::from(settings)),
        PolicyKind::Fixed => Box::new(fixed::Fixed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(get_policy("adaptive").map(|p| p.name()), Some("adaptive"));
        assert_eq!(get_policy("fixed").map(|p| p.name()), Some("fixed"));
        assert!(get_policy("sm2").is_none());
    }
}
