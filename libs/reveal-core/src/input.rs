//! Parsing of manually entered delays.

use crate::error::{Result, TimerError};
use crate::types::CardTimingState;

/// What a user asked for when editing a card's timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayInput {
    /// Empty input: leave everything as it is.
    Cancelled,
    /// Zero: remove the card's stored state.
    Clear,
    /// Positive delay in milliseconds.
    Set(u64),
}

/// Outcome of a manual timer edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEdit {
    /// Empty input, nothing changed.
    Cancelled,
    /// Delay overwritten; counters kept.
    Set(CardTimingState),
    /// Entry removed; holds what was stored before.
    Cleared(Option<CardTimingState>),
}

/// Parse a delay given in seconds (`"3"`, `"2.5"`).
///
/// Negative, non-numeric and non-finite values are rejected.
pub fn parse_delay_input(input: &str) -> Result<DelayInput> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DelayInput::Cancelled);
    }

    let invalid = || TimerError::InvalidDelay {
        input: trimmed.to_string(),
    };
    let seconds: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid());
    }

    if seconds == 0.0 {
        return Ok(DelayInput::Clear);
    }
    // Any positive delay keeps the card timed, however short.
    let millis = ((seconds * 1000.0).round() as u64).max(1);
    Ok(DelayInput::Set(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_cancels() {
        assert_eq!(parse_delay_input("").unwrap(), DelayInput::Cancelled);
        assert_eq!(parse_delay_input("   ").unwrap(), DelayInput::Cancelled);
    }

    #[test]
    fn seconds_become_millis() {
        assert_eq!(parse_delay_input("3").unwrap(), DelayInput::Set(3000));
        assert_eq!(parse_delay_input(" 2.5 ").unwrap(), DelayInput::Set(2500));
    }

    #[test]
    fn zero_clears() {
        assert_eq!(parse_delay_input("0").unwrap(), DelayInput::Clear);
        assert_eq!(parse_delay_input("0.0").unwrap(), DelayInput::Clear);
    }

    #[test]
    fn tiny_positive_delay_stays_timed() {
        assert_eq!(parse_delay_input("0.0004").unwrap(), DelayInput::Set(1));
        assert_eq!(parse_delay_input("0.001").unwrap(), DelayInput::Set(1));
    }

    #[test]
    fn rejects_negative_and_garbage() {
        for input in ["-1", "abc", "NaN", "inf", "3s"] {
            assert!(
                matches!(parse_delay_input(input), Err(TimerError::InvalidDelay { .. })),
                "accepted {input:?}"
            );
        }
    }
}
