use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{AnswerRecord, OptionIndex, Question, SessionConfig};
use quiz_core::time::elapsed_seconds;

use super::progress::SessionProgress;
use super::view::{ReviewItem, SessionResult};
use crate::error::{Operation, Rejection, SessionError};

//
// ─── PHASE & OUTCOMES ──────────────────────────────────────────────────────────
//

/// Coarse lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    InProgress {
        index: usize,
        time_remaining: u32,
        answered: bool,
    },
    Finished,
}

/// What a `tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting { time_remaining: u32 },
    TimedOut { correct: OptionIndex, record: AnswerRecord },
}

/// What `select_answer` recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: OptionIndex,
    pub correct: OptionIndex,
    pub was_correct: bool,
    pub record: AnswerRecord,
}

/// What `skip` recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipOutcome {
    pub correct: OptionIndex,
    pub record: AnswerRecord,
}

/// Where `advance` landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Next { index: usize },
    Finished,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Everything one play-through owns. Dropped as a unit when the session ends
/// or a new one starts.
#[derive(Clone)]
struct SessionState {
    config: SessionConfig,
    question_set: Vec<Question>,
    answers: Vec<Option<AnswerRecord>>,
    current_index: usize,
    time_remaining: u32,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn in_progress(&self) -> bool {
        self.finished_at.is_none()
    }

    fn current_answered(&self) -> bool {
        self.answers
            .get(self.current_index)
            .is_some_and(Option::is_some)
    }

    fn elapsed_on_current(&self) -> u32 {
        self.config
            .seconds_per_question()
            .saturating_sub(self.time_remaining)
    }

    fn record_current(&mut self, record: AnswerRecord) -> bool {
        match self.answers.get_mut(self.current_index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(record);
                true
            }
            _ => false,
        }
    }

    fn current_question(&self) -> Option<&Question> {
        self.question_set.get(self.current_index)
    }
}

/// Pure quiz state machine: `Idle → InProgress(index, time) → Finished`.
///
/// Performs no I/O. Every transition either changes state and returns an
/// outcome describing what happened, or returns
/// `SessionError::InvalidOperation` and leaves state untouched.
#[derive(Clone, Default)]
pub struct QuizSession {
    state: Option<SessionState>,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session over an already-chosen question set.
    ///
    /// Any previous session is discarded in full.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidConfig` if `question_set` is empty.
    pub fn start(
        &mut self,
        config: SessionConfig,
        question_set: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if question_set.is_empty() {
            return Err(quiz_core::model::ConfigError::EmptyBank.into());
        }

        self.state = Some(SessionState {
            config,
            answers: vec![None; question_set.len()],
            question_set,
            current_index: 0,
            time_remaining: config.seconds_per_question(),
            started_at,
            finished_at: None,
        });
        Ok(())
    }

    /// Drop the session and return to `Idle`.
    pub fn reset(&mut self) {
        self.state = None;
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match &self.state {
            None => SessionPhase::Idle,
            Some(s) if s.in_progress() => SessionPhase::InProgress {
                index: s.current_index,
                time_remaining: s.time_remaining,
                answered: s.current_answered(),
            },
            Some(_) => SessionPhase::Finished,
        }
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase(), SessionPhase::InProgress { .. })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase(), SessionPhase::Finished)
    }

    /// True while a question is on screen and still counting down.
    #[must_use]
    pub fn awaiting_answer(&self) -> bool {
        matches!(
            self.phase(),
            SessionPhase::InProgress {
                answered: false,
                ..
            }
        )
    }

    #[must_use]
    pub fn config(&self) -> Option<SessionConfig> {
        self.state.as_ref().map(|s| s.config)
    }

    #[must_use]
    pub fn question_set(&self) -> &[Question] {
        self.state
            .as_ref()
            .map_or(&[][..], |s| s.question_set.as_slice())
    }

    /// Answer slots, one per question; `None` means not yet answered.
    #[must_use]
    pub fn answers(&self) -> &[Option<AnswerRecord>] {
        self.state.as_ref().map_or(&[][..], |s| s.answers.as_slice())
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.state
            .as_ref()
            .filter(|s| s.in_progress())
            .map(|s| s.current_index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.state
            .as_ref()
            .filter(|s| s.in_progress())
            .and_then(SessionState::current_question)
    }

    #[must_use]
    pub fn time_remaining(&self) -> Option<u32> {
        self.state
            .as_ref()
            .filter(|s| s.in_progress())
            .map(|s| s.time_remaining)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.state.as_ref().map(|s| s.started_at)
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.state.as_ref().and_then(|s| s.finished_at)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.state
            .as_ref()
            .map(|s| SessionProgress::new(s.question_set.len(), s.current_index))
    }

    fn active_mut(&mut self, op: Operation) -> Result<&mut SessionState, SessionError> {
        match self.state.as_mut() {
            Some(s) if s.in_progress() => Ok(s),
            _ => Err(SessionError::rejected(op, Rejection::NotInProgress)),
        }
    }

    fn unanswered_mut(&mut self, op: Operation) -> Result<&mut SessionState, SessionError> {
        let state = self.active_mut(op)?;
        if state.current_answered() {
            return Err(SessionError::rejected(op, Rejection::AlreadyAnswered));
        }
        Ok(state)
    }

    fn finished(&self, op: Operation) -> Result<&SessionState, SessionError> {
        match self.state.as_ref() {
            Some(s) if !s.in_progress() => Ok(s),
            _ => Err(SessionError::rejected(op, Rejection::NotFinished)),
        }
    }

    /// Count down one second on the current question.
    ///
    /// On reaching zero the question is recorded as unanswered with the full
    /// time budget. The index does not move; `advance` does that.
    ///
    /// # Errors
    ///
    /// Rejected unless a question is in progress and unanswered.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        let state = self.unanswered_mut(Operation::Tick)?;
        state.time_remaining = state.time_remaining.saturating_sub(1);
        if state.time_remaining > 0 {
            return Ok(TickOutcome::Counting {
                time_remaining: state.time_remaining,
            });
        }

        let record = AnswerRecord::unanswered(state.config.seconds_per_question());
        state.record_current(record);
        let correct = state
            .current_question()
            .map(Question::correct)
            .ok_or(SessionError::rejected(Operation::Tick, Rejection::NotInProgress))?;
        Ok(TickOutcome::TimedOut { correct, record })
    }

    /// Record the user's choice for the current question.
    ///
    /// # Errors
    ///
    /// Rejected unless a question is in progress and unanswered; a second
    /// selection for the same question is therefore ignored.
    pub fn select_answer(&mut self, selected: OptionIndex) -> Result<AnswerOutcome, SessionError> {
        let state = self.unanswered_mut(Operation::SelectAnswer)?;
        let correct = state
            .current_question()
            .map(Question::correct)
            .ok_or(SessionError::rejected(
                Operation::SelectAnswer,
                Rejection::NotInProgress,
            ))?;
        let record = AnswerRecord::answered(selected, state.elapsed_on_current());
        state.record_current(record);

        Ok(AnswerOutcome {
            selected,
            correct,
            was_correct: selected == correct,
            record,
        })
    }

    /// Give up on the current question without choosing.
    ///
    /// # Errors
    ///
    /// Rejected unless a question is in progress and unanswered.
    pub fn skip(&mut self) -> Result<SkipOutcome, SessionError> {
        let state = self.unanswered_mut(Operation::Skip)?;
        let correct = state
            .current_question()
            .map(Question::correct)
            .ok_or(SessionError::rejected(Operation::Skip, Rejection::NotInProgress))?;
        let record = AnswerRecord::unanswered(state.elapsed_on_current());
        state.record_current(record);
        Ok(SkipOutcome { correct, record })
    }

    /// Move to the next question, finishing the session after the last one.
    ///
    /// An unanswered current question is first recorded as unanswered with
    /// the full time budget, so no slot is ever left empty.
    ///
    /// # Errors
    ///
    /// Rejected unless a session is in progress.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<AdvanceOutcome, SessionError> {
        let state = self.active_mut(Operation::Advance)?;
        let budget = state.config.seconds_per_question();
        state.record_current(AnswerRecord::unanswered(budget));

        state.current_index += 1;
        if state.current_index >= state.question_set.len() {
            state.current_index = state.question_set.len();
            state.time_remaining = 0;
            state.finished_at = Some(now);
            return Ok(AdvanceOutcome::Finished);
        }

        state.time_remaining = budget;
        Ok(AdvanceOutcome::Next {
            index: state.current_index,
        })
    }

    fn answered_pairs(state: &SessionState) -> impl Iterator<Item = (&Question, &AnswerRecord)> {
        state
            .question_set
            .iter()
            .zip(state.answers.iter())
            .filter_map(|(q, a)| a.as_ref().map(|a| (q, a)))
    }

    /// Score a finished session.
    ///
    /// # Errors
    ///
    /// Rejected unless the session has finished.
    pub fn compute_result(&self) -> Result<SessionResult, SessionError> {
        let state = self.finished(Operation::ComputeResult)?;
        let elapsed = state
            .finished_at
            .map_or(0, |end| elapsed_seconds(state.started_at, end));
        Ok(SessionResult::from_records(
            Self::answered_pairs(state),
            elapsed,
        ))
    }

    /// Per-question projection of questions and answers.
    ///
    /// # Errors
    ///
    /// Rejected unless the session has finished.
    pub fn build_review(&self) -> Result<Vec<ReviewItem>, SessionError> {
        let state = self.finished(Operation::BuildReview)?;
        Ok(Self::answered_pairs(state)
            .map(|(q, a)| ReviewItem::from_record(q, a))
            .collect())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(state) = &self.state else {
            return f.debug_struct("QuizSession").field("phase", &"idle").finish();
        };
        f.debug_struct("QuizSession")
            .field("questions_len", &state.question_set.len())
            .field("current_index", &state.current_index)
            .field("time_remaining", &state.time_remaining)
            .field("started_at", &state.started_at)
            .field("finished_at", &state.finished_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::QuestionBank;
    use quiz_core::time::fixed_now;

    fn opt(i: u8) -> OptionIndex {
        OptionIndex::from_u8(i).unwrap()
    }

    fn started(count: usize, seconds: u32) -> QuizSession {
        let set: Vec<Question> = QuestionBank::builtin()
            .questions()
            .iter()
            .take(count)
            .cloned()
            .collect();
        let config = SessionConfig::new(count as u32, seconds).unwrap();
        let mut session = QuizSession::new();
        session.start(config, set, fixed_now()).unwrap();
        session
    }

    fn correct_of_current(session: &QuizSession) -> OptionIndex {
        session.current_question().unwrap().correct()
    }

    fn wrong_of_current(session: &QuizSession) -> OptionIndex {
        let correct = correct_of_current(session);
        OptionIndex::all().find(|i| *i != correct).unwrap()
    }

    #[test]
    fn new_session_is_idle() {
        let session = QuizSession::new();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.question_set().is_empty());
        assert!(session.progress().is_none());
    }

    #[test]
    fn start_with_empty_set_fails() {
        let mut session = QuizSession::new();
        let err = session
            .start(SessionConfig::default(), Vec::new(), fixed_now())
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn start_enters_first_question_with_full_timer() {
        let session = started(3, 12);
        assert_eq!(
            session.phase(),
            SessionPhase::InProgress {
                index: 0,
                time_remaining: 12,
                answered: false
            }
        );
        assert_eq!(session.answers(), &[None, None, None]);
    }

    #[test]
    fn select_records_elapsed_time_and_correctness() {
        let mut session = started(2, 12);
        for _ in 0..3 {
            session.tick().unwrap();
        }
        let right = correct_of_current(&session);
        let outcome = session.select_answer(right).unwrap();
        assert!(outcome.was_correct);
        assert_eq!(outcome.record.seconds_taken, 3);
        assert!(!session.awaiting_answer());
    }

    #[test]
    fn second_selection_is_ignored() {
        let mut session = started(2, 12);
        let wrong = wrong_of_current(&session);
        let first = session.select_answer(wrong).unwrap().record;

        let right = correct_of_current(&session);
        let err = session.select_answer(right).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidOperation {
                operation: Operation::SelectAnswer,
                reason: Rejection::AlreadyAnswered
            }
        );
        assert_eq!(session.answers()[0], Some(first));
    }

    #[test]
    fn timer_expiry_records_full_budget_without_advancing() {
        let mut session = started(2, 3);
        assert_eq!(
            session.tick().unwrap(),
            TickOutcome::Counting { time_remaining: 2 }
        );
        session.tick().unwrap();
        let outcome = session.tick().unwrap();
        let TickOutcome::TimedOut { record, .. } = outcome else {
            panic!("expected timeout, got {outcome:?}");
        };
        assert_eq!(record, AnswerRecord::unanswered(3));
        assert_eq!(session.current_index(), Some(0));

        // Countdown stops once the question is answered.
        assert!(session.tick().unwrap_err().is_invalid_operation());
        assert!(session.select_answer(opt(0)).is_err());
    }

    #[test]
    fn skip_records_elapsed_time() {
        let mut session = started(2, 12);
        session.tick().unwrap();
        session.tick().unwrap();
        let outcome = session.skip().unwrap();
        assert_eq!(outcome.record, AnswerRecord::unanswered(2));
        assert!(session.skip().is_err());
    }

    #[test]
    fn advance_fills_gap_and_resets_timer() {
        let mut session = started(2, 12);
        session.tick().unwrap();
        let outcome = session.advance(fixed_now()).unwrap();
        assert_eq!(outcome, AdvanceOutcome::Next { index: 1 });
        assert_eq!(session.answers()[0], Some(AnswerRecord::unanswered(12)));
        assert_eq!(session.time_remaining(), Some(12));
    }

    #[test]
    fn advancing_past_last_question_finishes() {
        let mut session = started(1, 12);
        let end = fixed_now() + Duration::seconds(9);
        assert_eq!(session.advance(end).unwrap(), AdvanceOutcome::Finished);
        assert!(session.is_finished());
        assert_eq!(session.finished_at(), Some(end));
        assert!(session.current_question().is_none());
        assert!(session.advance(end).is_err());
        assert!(session.tick().is_err());
    }

    #[test]
    fn result_and_review_need_finished_session() {
        let session = started(2, 12);
        assert!(session.compute_result().is_err());
        assert!(session.build_review().is_err());
        assert!(QuizSession::new().compute_result().is_err());
    }

    #[test]
    fn result_counts_only_correct_selections() {
        let mut session = started(3, 12);
        let right = correct_of_current(&session);
        session.select_answer(right).unwrap();
        session.advance(fixed_now()).unwrap();
        let wrong = wrong_of_current(&session);
        session.select_answer(wrong).unwrap();
        session.advance(fixed_now()).unwrap();
        session.skip().unwrap();
        session
            .advance(fixed_now() + Duration::milliseconds(20_600))
            .unwrap();

        let result = session.compute_result().unwrap();
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.wrong_count, 2);
        assert_eq!(result.percentage, 33);
        assert_eq!(result.total_elapsed_seconds, 21);

        let review = session.build_review().unwrap();
        assert_eq!(review.len(), 3);
        assert!(review[0].was_correct);
        assert_eq!(review[1].wrong_pick(), Some(wrong));
        assert!(!review[2].user_selection.is_answered());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = started(2, 12);
        session.reset();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.answers().is_empty());
    }
}
