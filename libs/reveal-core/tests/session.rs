//! Whole review sessions driven through the controller with virtual time
//! and a real timer file.

use std::time::Duration;

use pretty_assertions::assert_eq;
use reveal_core::{
    AdaptiveController, AdjustmentKind, CardId, CardTimingState, Ease, ManualScheduler,
    ReviewHost, RevealSettings, SessionState, TimerStore, VirtualClock,
};
use tempfile::TempDir;

#[derive(Default)]
struct Reviewer {
    card: Option<CardId>,
    question_side: bool,
    auto_reveals: Vec<CardId>,
}

impl ReviewHost for Reviewer {
    fn reveal_answer(&mut self) {
        if let Some(card) = self.card.clone() {
            self.auto_reveals.push(card);
        }
        self.question_side = false;
    }

    fn current_card(&self) -> Option<CardId> {
        self.card.clone()
    }

    fn is_question_side(&self) -> bool {
        self.question_side
    }
}

struct Session {
    controller: AdaptiveController<ManualScheduler, VirtualClock>,
    scheduler: ManualScheduler,
    host: Reviewer,
}

impl Session {
    fn open(store: TimerStore) -> Self {
        let time = VirtualClock::new();
        let scheduler = ManualScheduler::new(time.clone());
        let controller =
            AdaptiveController::new(RevealSettings::default(), store, scheduler.clone(), time);
        let mut session = Self {
            controller,
            scheduler,
            host: Reviewer::default(),
        };
        session
            .controller
            .session_state_changed(SessionState::Review, SessionState::Overview);
        session
    }

    /// Show a card, let the user think for `think_ms` (or until the timer
    /// reveals), then grade it.
    fn review(&mut self, card: &str, think_ms: u64, ease: Ease) -> Option<AdjustmentKind> {
        let card_id = CardId::from(card);
        self.host.card = Some(card_id.clone());
        self.host.question_side = true;
        self.controller.question_shown(card_id.clone());

        let mut remaining = think_ms;
        while remaining > 0 && self.host.question_side {
            remaining -= 1;
            if let Some(countdown) = self.scheduler.advance(Duration::from_millis(1)) {
                self.controller.countdown_expired(countdown, &mut self.host);
            }
        }

        self.host.question_side = false;
        self.controller.answer_shown(card_id.clone());
        self.controller.card_graded(card_id, ease).map(|a| a.kind)
    }

    fn close(mut self) {
        self.controller
            .session_state_changed(SessionState::Overview, SessionState::Review);
    }
}

#[test]
fn delay_converges_across_sessions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timers.json");

    let mut first = Session::open(TimerStore::open_file(&path));
    assert_eq!(first.review("a", 4000, Ease::Good), Some(AdjustmentKind::Bootstrapped));
    assert_eq!(first.review("b", 2000, Ease::Again), Some(AdjustmentKind::Unchanged));
    assert!(first.host.auto_reveals.is_empty());
    first.close();

    let mut second = Session::open(TimerStore::open_file(&path));
    assert_eq!(
        second.controller.store().get(&CardId::from("a")),
        CardTimingState::with_delay(4000)
    );

    // User is slower than the delay: the timer reveals at 4000 ms.
    assert_eq!(second.review("a", 6000, Ease::Good), Some(AdjustmentKind::StreakAdvanced));
    assert_eq!(second.review("a", 6000, Ease::Good), Some(AdjustmentKind::SteppedDown));
    assert_eq!(
        second.host.auto_reveals,
        vec![CardId::from("a"), CardId::from("a")]
    );

    // Faster than the 3000 ms delay tightens immediately.
    assert_eq!(second.review("a", 1800, Ease::Easy), Some(AdjustmentKind::Tightened));
    second.close();

    let third = Session::open(TimerStore::open_file(&path));
    assert_eq!(
        third.controller.store().get(&CardId::from("a")),
        CardTimingState::with_delay(1800)
    );
}

#[test]
fn misses_push_delay_back_up() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open(TimerStore::open_file(dir.path().join("timers.json")));
    session
        .controller
        .set_timer(CardId::from("c"), "2")
        .unwrap();

    assert_eq!(session.review("c", 500, Ease::Again), Some(AdjustmentKind::MissCounted));
    assert_eq!(session.review("c", 500, Ease::Again), Some(AdjustmentKind::SteppedUp));
    assert_eq!(
        session.controller.store().get(&CardId::from("c")),
        CardTimingState::with_delay(3000)
    );
}

#[test]
fn corrupt_file_starts_empty_and_is_rewritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timers.json");
    std::fs::write(&path, "not json at all").unwrap();

    let mut session = Session::open(TimerStore::open_file(&path));
    assert!(session.controller.store().is_empty());
    session.review("d", 1500, Ease::Hard);
    session.close();

    let reopened = TimerStore::open_file(&path);
    assert_eq!(reopened.get(&CardId::from("d")).delay_ms, 1500);
}
