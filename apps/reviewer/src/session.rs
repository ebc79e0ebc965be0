//! Interactive review loop.
//!
//! Lines typed by the user and expired countdowns both arrive on the same
//! single-threaded loop, so the controller never sees two events at once.

use crate::deck::DeckCard;
use crate::host::{TerminalHost, TokioTime};
use reveal_core::{
    AdaptiveController, AdjustmentKind, CardId, Countdown, Ease, SessionState, TimerEdit,
    TokioScheduler,
};
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub type Controller = AdaptiveController<TokioScheduler, TokioTime>;

const HELP: &str =
    "enter: show answer | 1-4: grade | t: toggle auto reveal | s <seconds>: set timer | q: quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Reveal,
    Grade(Ease),
    Toggle,
    SetTimer(String),
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Reveal,
        "t" => Input::Toggle,
        "q" => Input::Quit,
        "s" => Input::SetTimer(String::new()),
        _ => {
            if let Some(value) = line.strip_prefix("s ") {
                return Input::SetTimer(value.trim().to_string());
            }
            match line.parse::<u8>().ok().and_then(Ease::from_value) {
                Some(ease) => Input::Grade(ease),
                None => Input::Unknown(line.to_string()),
            }
        }
    }
}

/// What happened during a session.
#[derive(Debug, Default)]
pub struct SessionSummary {
    pub reviewed: usize,
    pub auto_revealed: usize,
    pub adjustments: Vec<(CardId, AdjustmentKind)>,
    pub quit_early: bool,
}

enum Step {
    Reveal { auto: bool },
    Quit,
}

/// Review `cards` in order until the deck is done or the user quits.
pub async fn run_review<W: Write>(
    cards: &[DeckCard],
    controller: &mut Controller,
    expiries: &mut UnboundedReceiver<Countdown>,
    lines: &mut UnboundedReceiver<String>,
    out: &mut W,
) -> anyhow::Result<SessionSummary> {
    let mut host = TerminalHost::new();
    let mut summary = SessionSummary::default();

    controller.session_state_changed(SessionState::Review, SessionState::Overview);
    writeln!(out, "{HELP}")?;
    writeln!(
        out,
        "auto reveal {} ({} timers)",
        if controller.is_enabled() { "ON" } else { "OFF" },
        controller.policy_name()
    )?;

    for (idx, card) in cards.iter().enumerate() {
        host.show_question(card.id.clone());
        writeln!(out, "\n[{}/{}] Q: {}", idx + 1, cards.len(), card.question)?;
        if let Some(delay) = controller.question_shown(card.id.clone()) {
            writeln!(out, "(auto reveal in {})", format_delay(delay))?;
        }

        let step = loop {
            tokio::select! {
                Some(countdown) = expiries.recv() => {
                    if controller.countdown_expired(countdown, &mut host) && host.take_reveal_request() {
                        break Step::Reveal { auto: true };
                    }
                }
                line = lines.recv() => {
                    let Some(line) = line else { break Step::Quit };
                    match parse_input(&line) {
                        Input::Reveal => break Step::Reveal { auto: false },
                        Input::Quit => break Step::Quit,
                        Input::Grade(_) => writeln!(out, "show the answer before grading")?,
                        other => handle_setting(other, controller, out)?,
                    }
                }
            }
        };

        if let Step::Reveal { auto } = step {
            if auto {
                summary.auto_revealed += 1;
                writeln!(out, "(time's up)")?;
            }
        } else {
            summary.quit_early = true;
            break;
        }

        host.show_answer();
        let elapsed = controller.answer_shown(card.id.clone());
        writeln!(out, "A: {}", card.answer)?;
        if let Some(elapsed) = elapsed {
            writeln!(out, "(answered after {})", format_delay(elapsed))?;
        }
        writeln!(out, "grade: 1 again, 2 hard, 3 good, 4 easy")?;

        let ease = loop {
            let Some(line) = lines.recv().await else { break None };
            match parse_input(&line) {
                Input::Grade(ease) => break Some(ease),
                Input::Quit => break None,
                Input::Reveal => writeln!(out, "grade with 1-4")?,
                other => handle_setting(other, controller, out)?,
            }
        };
        let Some(ease) = ease else {
            summary.quit_early = true;
            break;
        };

        if let Some(adjustment) = controller.card_graded(card.id.clone(), ease) {
            let delay = Duration::from_millis(adjustment.new_state.delay_ms);
            writeln!(
                out,
                "timer {}: {}",
                describe(adjustment.kind),
                format_delay(delay)
            )?;
            summary.adjustments.push((card.id.clone(), adjustment.kind));
        }
        summary.reviewed += 1;
    }

    controller.session_state_changed(SessionState::Overview, SessionState::Review);
    writeln!(
        out,
        "\nreviewed {} card(s), {} revealed by timer",
        summary.reviewed, summary.auto_revealed
    )?;
    Ok(summary)
}

/// Toggle and set-timer work on either side of the card.
fn handle_setting<W: Write>(
    input: Input,
    controller: &mut Controller,
    out: &mut W,
) -> std::io::Result<()> {
    match input {
        Input::Toggle => {
            let state = if controller.toggle() { "ON" } else { "OFF" };
            writeln!(out, "per-card auto reveal is now {state}")
        }
        Input::SetTimer(value) => match controller.set_timer_for_current(&value) {
            Ok(TimerEdit::Cancelled) => writeln!(out, "timer unchanged"),
            Ok(TimerEdit::Set(state)) => writeln!(
                out,
                "timer set to {}",
                format_delay(Duration::from_millis(state.delay_ms))
            ),
            Ok(TimerEdit::Cleared(_)) => writeln!(out, "timer cleared"),
            Err(e) => writeln!(out, "{e}"),
        },
        Input::Unknown(text) => writeln!(out, "unknown command {text:?}\n{HELP}"),
        Input::Reveal | Input::Grade(_) | Input::Quit => Ok(()),
    }
}

fn describe(kind: AdjustmentKind) -> &'static str {
    match kind {
        AdjustmentKind::Bootstrapped => "started",
        AdjustmentKind::Tightened => "tightened",
        AdjustmentKind::StreakAdvanced => "kept (streak)",
        AdjustmentKind::SteppedDown => "shortened",
        AdjustmentKind::MissCounted => "kept (miss)",
        AdjustmentKind::SteppedUp => "lengthened",
        AdjustmentKind::Unchanged => "unchanged",
    }
}

pub fn format_delay(delay: Duration) -> String {
    format!("{:.1}s", delay.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input(""), Input::Reveal);
        assert_eq!(parse_input("  \n"), Input::Reveal);
        assert_eq!(parse_input("3"), Input::Grade(Ease::Good));
        assert_eq!(parse_input("t"), Input::Toggle);
        assert_eq!(parse_input("s 2.5"), Input::SetTimer("2.5".to_string()));
        assert_eq!(parse_input("s"), Input::SetTimer(String::new()));
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("7"), Input::Unknown("7".to_string()));
        assert_eq!(parse_input("hello"), Input::Unknown("hello".to_string()));
    }

    #[test]
    fn formats_delay_in_seconds() {
        assert_eq!(format_delay(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_delay(Duration::ZERO), "0.0s");
    }
}
