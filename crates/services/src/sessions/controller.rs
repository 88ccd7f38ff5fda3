use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use quiz_core::Clock;
use quiz_core::model::{ConfigError, OptionIndex, QuestionBank, SessionConfig};

use super::plan::QuestionSetBuilder;
use super::state::{AdvanceOutcome, QuizSession, TickOutcome};
use super::view::{ReviewItem, SessionResult};
use crate::error::{Operation, Rejection, SessionError};
use crate::ports::{Feedback, PresentationPort, Screen};

/// Drives a [`QuizSession`] and turns its transitions into presentation calls.
///
/// Owns the time source, the shuffle RNG, and the presenter. One instance
/// serves any number of consecutive sessions; starting a new one discards the
/// old one.
pub struct SessionController<P> {
    session: QuizSession,
    screen: Screen,
    clock: Clock,
    rng: StdRng,
    presenter: P,
}

impl<P: PresentationPort> SessionController<P> {
    /// Controller on the system clock with an OS-seeded shuffle.
    #[must_use]
    pub fn new(presenter: P) -> Self {
        Self {
            session: QuizSession::new(),
            screen: Screen::Start,
            clock: Clock::default(),
            rng: StdRng::from_os_rng(),
            presenter,
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Make question-set shuffles reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Whether the host should keep its one-second timer running.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.session.awaiting_answer()
    }

    fn show(&mut self, screen: Screen) {
        self.screen = screen;
        self.presenter.show_screen(screen);
    }

    fn render_current(&mut self) {
        let (Some(question), Some(progress)) =
            (self.session.current_question(), self.session.progress())
        else {
            return;
        };
        let time_remaining = self.session.time_remaining().unwrap_or(0);
        self.presenter.render_question(
            question,
            progress.current_index,
            progress.total,
            time_remaining,
        );
        self.presenter.update_progress(progress.percent);
        if let Some(config) = self.session.config() {
            self.presenter
                .update_timer(time_remaining, config.seconds_per_question());
        }
    }

    /// Shuffle the bank, pick the question set, and show the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidConfig` if the bank is empty. The current
    /// session, if any, is left untouched in that case.
    pub fn start_session(
        &mut self,
        config: SessionConfig,
        bank: &QuestionBank,
    ) -> Result<(), SessionError> {
        if bank.is_empty() {
            return Err(ConfigError::EmptyBank.into());
        }
        if self.session.is_in_progress() {
            debug!("discarding unfinished session");
        }

        let question_set =
            QuestionSetBuilder::new(bank, config.question_count()).build(&mut self.rng);
        let total = question_set.len();
        self.session.start(config, question_set, self.clock.now())?;
        debug!(
            total,
            seconds_per_question = config.seconds_per_question(),
            "session started"
        );

        self.show(Screen::Quiz);
        self.render_current();
        Ok(())
    }

    /// One second of countdown. Reveals the answer when time runs out.
    ///
    /// # Errors
    ///
    /// Rejected unless a question is in progress and unanswered.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        let outcome = self.session.tick()?;
        let budget = self
            .session
            .config()
            .map_or(0, |c| c.seconds_per_question());
        match outcome {
            TickOutcome::Counting { time_remaining } => {
                self.presenter.update_timer(time_remaining, budget);
            }
            TickOutcome::TimedOut { correct, .. } => {
                debug!(index = ?self.session.current_index(), "question timed out");
                self.presenter.update_timer(0, budget);
                self.presenter.reveal_correct_answer(correct);
                self.presenter.play_feedback(Feedback::Wrong);
            }
        }
        Ok(outcome)
    }

    /// Record a choice and return whether it was correct.
    ///
    /// # Errors
    ///
    /// Rejected unless a question is in progress and unanswered.
    pub fn select_answer(&mut self, selected: OptionIndex) -> Result<bool, SessionError> {
        let outcome = self.session.select_answer(selected)?;
        if let Some(question) = self.session.current_question() {
            debug!(
                question = %question.id(),
                selected = selected.value(),
                correct = outcome.was_correct,
                seconds = outcome.record.seconds_taken,
                "answer recorded"
            );
        }
        self.presenter.reveal_correct_answer(outcome.correct);
        self.presenter
            .highlight_selection(selected, outcome.was_correct);
        self.presenter.play_feedback(if outcome.was_correct {
            Feedback::Correct
        } else {
            Feedback::Wrong
        });
        Ok(outcome.was_correct)
    }

    /// Give up on the current question. No sound is played.
    ///
    /// # Errors
    ///
    /// Rejected unless a question is in progress and unanswered.
    pub fn skip(&mut self) -> Result<(), SessionError> {
        let outcome = self.session.skip()?;
        debug!(index = ?self.session.current_index(), "question skipped");
        self.presenter.reveal_correct_answer(outcome.correct);
        Ok(())
    }

    /// Move on; shows the result screen after the last question.
    ///
    /// # Errors
    ///
    /// Rejected unless a session is in progress.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        let outcome = self.session.advance(self.clock.now())?;
        match outcome {
            AdvanceOutcome::Next { index } => {
                debug!(index, "next question");
                self.render_current();
            }
            AdvanceOutcome::Finished => {
                debug!("session finished");
                self.show(Screen::Result);
            }
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Rejected unless the session has finished.
    pub fn compute_result(&self) -> Result<SessionResult, SessionError> {
        self.session.compute_result()
    }

    /// # Errors
    ///
    /// Rejected unless the session has finished.
    pub fn build_review(&self) -> Result<Vec<ReviewItem>, SessionError> {
        self.session.build_review()
    }

    /// Switch from the result screen to the answer review.
    ///
    /// # Errors
    ///
    /// Rejected unless the session has finished.
    pub fn open_review(&mut self) -> Result<Vec<ReviewItem>, SessionError> {
        let review = self.session.build_review()?;
        self.show(Screen::Review);
        Ok(review)
    }

    /// Leave the result or review screen. Ends the session.
    ///
    /// # Errors
    ///
    /// Rejected while a session is in progress.
    pub fn go_home(&mut self) -> Result<(), SessionError> {
        if self.session.is_in_progress() {
            return Err(SessionError::rejected(
                Operation::GoHome,
                Rejection::NotFinished,
            ));
        }
        self.session.reset();
        self.show(Screen::Start);
        Ok(())
    }
}

impl<P> std::fmt::Debug for SessionController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("session", &self.session)
            .field("screen", &self.screen)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
