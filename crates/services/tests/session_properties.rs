use std::collections::HashSet;

use proptest::prelude::*;
use quiz_core::model::{OptionIndex, QuestionBank, QuestionDraft, SessionConfig};
use quiz_core::time::fixed_clock;
use quiz_services::{RecordingPresenter, SessionController};

#[derive(Debug, Clone, Copy)]
enum Action {
    Tick,
    Select(u8),
    Skip,
    Next,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::Tick),
        2 => (0u8..4).prop_map(Action::Select),
        1 => Just(Action::Skip),
        2 => Just(Action::Next),
    ]
}

fn bank_of(size: usize) -> QuestionBank {
    QuestionBank::new((0..size).map(|i| {
        QuestionDraft::new(format!("Q{i}"), ["a", "b", "c", "d"], (i % 4) as u8)
    }))
    .unwrap()
}

fn controller(seed: u64) -> SessionController<RecordingPresenter> {
    SessionController::new(RecordingPresenter::new())
        .with_clock(fixed_clock())
        .with_seed(seed)
}

proptest! {
    #[test]
    fn question_set_is_distinct_subset(
        bank_size in 1usize..30,
        count in 1u32..40,
        seed in any::<u64>(),
    ) {
        let bank = bank_of(bank_size);
        let mut ctl = controller(seed);
        ctl.start_session(SessionConfig::new(count, 10).unwrap(), &bank).unwrap();

        let set = ctl.session().question_set();
        prop_assert_eq!(set.len(), (count as usize).min(bank_size));
        let ids: HashSet<_> = set.iter().map(|q| q.id()).collect();
        prop_assert_eq!(ids.len(), set.len());
        for q in set {
            prop_assert_eq!(bank.get(q.id()), Some(q));
        }
    }

    #[test]
    fn finished_session_has_every_slot_filled(
        count in 1u32..8,
        seconds in 1u32..6,
        seed in any::<u64>(),
        actions in prop::collection::vec(action(), 0..80),
    ) {
        let bank = bank_of(10);
        let mut ctl = controller(seed);
        ctl.start_session(SessionConfig::new(count, seconds).unwrap(), &bank).unwrap();

        for action in actions {
            if ctl.session().is_finished() {
                break;
            }
            // Rejections are no-ops; ignore them.
            let _ = match action {
                Action::Tick => ctl.tick().map(|_| ()),
                Action::Select(i) => {
                    ctl.select_answer(OptionIndex::from_u8(i).unwrap()).map(|_| ())
                }
                Action::Skip => ctl.skip(),
                Action::Next => ctl.advance().map(|_| ()),
            };
        }
        while !ctl.session().is_finished() {
            ctl.advance().unwrap();
        }

        let total = ctl.session().question_set().len();
        prop_assert_eq!(ctl.session().answers().len(), total);
        prop_assert!(ctl.session().answers().iter().all(Option::is_some));

        let result = ctl.compute_result().unwrap();
        prop_assert_eq!(result.correct_count + result.wrong_count, total);
        prop_assert!(result.percentage <= 100);
        prop_assert_eq!(ctl.build_review().unwrap().len(), total);
    }

    #[test]
    fn second_selection_never_overwrites(
        first in 0u8..4,
        second in 0u8..4,
        ticks in 0u32..5,
        seed in any::<u64>(),
    ) {
        let bank = bank_of(5);
        let mut ctl = controller(seed);
        ctl.start_session(SessionConfig::new(2, 10).unwrap(), &bank).unwrap();
        for _ in 0..ticks {
            ctl.tick().unwrap();
        }
        ctl.select_answer(OptionIndex::from_u8(first).unwrap()).unwrap();
        let recorded = ctl.session().answers()[0];

        ctl.tick().ok();
        prop_assert!(ctl.select_answer(OptionIndex::from_u8(second).unwrap()).is_err());
        prop_assert_eq!(ctl.session().answers()[0], recorded);
        prop_assert_eq!(recorded.map(|r| r.seconds_taken), Some(ticks));
    }
}
