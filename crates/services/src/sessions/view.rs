use serde::Serialize;

use quiz_core::model::{AnswerRecord, OPTION_COUNT, OptionIndex, Question, QuestionId, Selection};

use super::progress::rounded_percent;

/// Final score of a finished session.
///
/// Presentation-agnostic: no pre-formatted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    pub correct_count: usize,
    pub wrong_count: usize,
    pub total_questions: usize,
    /// `round(100 * correct / total)`, ties rounding up.
    pub percentage: u32,
    pub total_elapsed_seconds: u64,
}

impl SessionResult {
    pub(crate) fn from_records<'a>(
        pairs: impl IntoIterator<Item = (&'a Question, &'a AnswerRecord)>,
        total_elapsed_seconds: u64,
    ) -> Self {
        let mut total_questions = 0;
        let mut correct_count = 0;
        for (question, record) in pairs {
            total_questions += 1;
            if record.is_correct_for(question) {
                correct_count += 1;
            }
        }

        Self {
            correct_count,
            wrong_count: total_questions - correct_count,
            total_questions,
            percentage: rounded_percent(correct_count, total_questions),
            total_elapsed_seconds,
        }
    }
}

/// One row of the answer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub question_id: QuestionId,
    pub question_text: String,
    pub options: [String; OPTION_COUNT],
    pub correct: OptionIndex,
    pub user_selection: Selection,
    pub was_correct: bool,
    pub seconds_taken: u32,
}

impl ReviewItem {
    #[must_use]
    pub fn from_record(question: &Question, record: &AnswerRecord) -> Self {
        Self {
            question_id: question.id(),
            question_text: question.text().to_string(),
            options: question.options().clone(),
            correct: question.correct(),
            user_selection: record.selection,
            was_correct: record.is_correct_for(question),
            seconds_taken: record.seconds_taken,
        }
    }

    /// The option the user picked, if it was not the correct one.
    #[must_use]
    pub fn wrong_pick(&self) -> Option<OptionIndex> {
        self.user_selection
            .option()
            .filter(|picked| *picked != self.correct)
    }
}
