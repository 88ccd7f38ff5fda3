//! Presentation seam between the session controller and whatever draws the quiz.

use serde::Serialize;

use quiz_core::model::{OptionIndex, Question, QuestionId};

/// Top-level screens of the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Start,
    Quiz,
    Result,
    Review,
}

/// Sound cue requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    Wrong,
    Neutral,
}

/// Implemented by the host. The controller only ever talks to presentation
/// through these calls.
pub trait PresentationPort {
    fn show_screen(&mut self, screen: Screen);

    /// `index` is zero-based.
    fn render_question(
        &mut self,
        question: &Question,
        index: usize,
        total: usize,
        time_remaining: u32,
    );

    fn update_progress(&mut self, percent: u32);

    /// Countdown changed. Hosts that draw the timer from `render_question` alone can ignore it.
    fn update_timer(&mut self, _time_remaining: u32, _seconds_per_question: u32) {}

    fn reveal_correct_answer(&mut self, correct: OptionIndex);

    fn highlight_selection(&mut self, selected: OptionIndex, was_correct: bool);

    fn play_feedback(&mut self, feedback: Feedback);
}

impl<P: PresentationPort + ?Sized> PresentationPort for &mut P {
    fn show_screen(&mut self, screen: Screen) {
        (**self).show_screen(screen);
    }

    fn render_question(
        &mut self,
        question: &Question,
        index: usize,
        total: usize,
        time_remaining: u32,
    ) {
        (**self).render_question(question, index, total, time_remaining);
    }

    fn update_progress(&mut self, percent: u32) {
        (**self).update_progress(percent);
    }

    fn update_timer(&mut self, time_remaining: u32, seconds_per_question: u32) {
        (**self).update_timer(time_remaining, seconds_per_question);
    }

    fn reveal_correct_answer(&mut self, correct: OptionIndex) {
        (**self).reveal_correct_answer(correct);
    }

    fn highlight_selection(&mut self, selected: OptionIndex, was_correct: bool) {
        (**self).highlight_selection(selected, was_correct);
    }

    fn play_feedback(&mut self, feedback: Feedback) {
        (**self).play_feedback(feedback);
    }
}

//
// ─── RECORDING PRESENTER ───────────────────────────────────────────────────────
//

/// One call received by a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    ShowScreen(Screen),
    RenderQuestion {
        question_id: QuestionId,
        index: usize,
        total: usize,
        time_remaining: u32,
    },
    UpdateProgress(u32),
    UpdateTimer {
        time_remaining: u32,
        seconds_per_question: u32,
    },
    RevealCorrectAnswer(OptionIndex),
    HighlightSelection {
        selected: OptionIndex,
        was_correct: bool,
    },
    PlayFeedback(Feedback),
}

/// Presenter that records every call, for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    /// Drain recorded calls, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<PresenterCall> {
        std::mem::take(&mut self.calls)
    }

    #[must_use]
    pub fn feedback(&self) -> Vec<Feedback> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PresenterCall::PlayFeedback(f) => Some(*f),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn last_screen(&self) -> Option<Screen> {
        self.calls.iter().rev().find_map(|call| match call {
            PresenterCall::ShowScreen(s) => Some(*s),
            _ => None,
        })
    }
}

impl PresentationPort for RecordingPresenter {
    fn show_screen(&mut self, screen: Screen) {
        self.calls.push(PresenterCall::ShowScreen(screen));
    }

    fn render_question(
        &mut self,
        question: &Question,
        index: usize,
        total: usize,
        time_remaining: u32,
    ) {
        self.calls.push(PresenterCall::RenderQuestion {
            question_id: question.id(),
            index,
            total,
            time_remaining,
        });
    }

    fn update_progress(&mut self, percent: u32) {
        self.calls.push(PresenterCall::UpdateProgress(percent));
    }

    fn update_timer(&mut self, time_remaining: u32, seconds_per_question: u32) {
        self.calls.push(PresenterCall::UpdateTimer {
            time_remaining,
            seconds_per_question,
        });
    }

    fn reveal_correct_answer(&mut self, correct: OptionIndex) {
        self.calls.push(PresenterCall::RevealCorrectAnswer(correct));
    }

    fn highlight_selection(&mut self, selected: OptionIndex, was_correct: bool) {
        self.calls.push(PresenterCall::HighlightSelection {
            selected,
            was_correct,
        });
    }

    fn play_feedback(&mut self, feedback: Feedback) {
        self.calls.push(PresenterCall::PlayFeedback(feedback));
    }
}
