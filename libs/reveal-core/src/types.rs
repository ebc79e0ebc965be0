//! Core types for per-card reveal timing.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a reviewed card.
///
/// Stored as a string so it can key the JSON document directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for CardId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Adaptive timing state of a single card.
///
/// A `delay_ms` of zero means the card has no automatic reveal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTimingState {
    #[serde(rename = "timer", default, deserialize_with = "deserialize_millis")]
    pub delay_ms: u64,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub wrong_counter: u32,
}

impl CardTimingState {
    /// State with only the delay set.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Default::default()
        }
    }

    /// Whether this card is auto-revealed at all.
    pub fn is_timed(&self) -> bool {
        self.delay_ms > 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMillis {
    Whole(u64),
    Float(f64),
}

/// Older documents stored the timer as a float; round and clamp at zero.
/// Whole numbers are read exactly.
fn deserialize_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StoredMillis::deserialize(deserializer)? {
        StoredMillis::Whole(millis) => Ok(millis),
        StoredMillis::Float(value) if value.is_finite() && value > 0.0 => Ok(value.round() as u64),
        StoredMillis::Float(_) => Ok(0),
    }
}

/// Grade given to an answered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Again,
    Hard,
    Good,
    Easy,
}

impl Ease {
    /// Convert to the host's ordinal grade (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from the host's ordinal grade.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Anything above "again" counts as a correct answer.
    pub fn is_correct(self) -> bool {
        self.to_value() > 1
    }
}

/// Top-level state of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    DeckBrowser,
    Overview,
    Review,
    Other,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeckBrowser => "deck_browser",
            Self::Overview => "overview",
            Self::Review => "review",
            Self::Other => "other",
        }
    }
}

/// Which delay policy revises card state after grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Adaptive,
    Fixed,
}

impl Default for PolicyKind {
    fn default() -> Self {
        Self::Adaptive
    }
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Fixed => "fixed",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "adaptive" => Some(Self::Adaptive),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Reveal timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    /// Global auto-reveal switch.
    pub enabled: bool,
    pub policy: PolicyKind,
    /// Amount the delay moves by on slow convergence, in milliseconds.
    pub step_ms: u64,
    /// Consecutive comfortable correct answers before the delay shrinks.
    pub streak_to_tighten: u32,
    /// Consecutive misses before the delay grows.
    pub misses_to_relax: u32,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: PolicyKind::default(),
            step_ms: 1000,
            streak_to_tighten: 2,
            misses_to_relax: 2,
        }
    }
}
