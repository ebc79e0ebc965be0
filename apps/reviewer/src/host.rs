//! Terminal side of the review session.

use reveal_core::{CardId, ReviewHost, TimeSource};
use std::time::Duration;
use tokio::time::Instant;

/// Which side of the current card the terminal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Question,
    Answer,
}

/// Review state as the terminal presents it.
#[derive(Debug)]
pub struct TerminalHost {
    card: Option<CardId>,
    side: Side,
    reveal_requested: bool,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self {
            card: None,
            side: Side::Question,
            reveal_requested: false,
        }
    }

    pub fn show_question(&mut self, card: CardId) {
        self.card = Some(card);
        self.side = Side::Question;
        self.reveal_requested = false;
    }

    pub fn show_answer(&mut self) {
        self.side = Side::Answer;
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Whether the controller asked for the answer since the last check.
    pub fn take_reveal_request(&mut self) -> bool {
        std::mem::take(&mut self.reveal_requested)
    }
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewHost for TerminalHost {
    fn reveal_answer(&mut self) {
        self.reveal_requested = true;
    }

    fn current_card(&self) -> Option<CardId> {
        self.card.clone()
    }

    fn is_question_side(&self) -> bool {
        self.side == Side::Question
    }
}

/// Time source on the tokio clock, so paused-time tests measure the same
/// virtual time the scheduler sleeps on.
#[derive(Debug, Clone, Copy)]
pub struct TokioTime {
    origin: Instant,
}

impl TokioTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TokioTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
