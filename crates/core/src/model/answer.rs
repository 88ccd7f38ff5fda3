use serde::Serialize;

use crate::model::question::{OptionIndex, Question};

/// What the user chose for a question.
///
/// `Unanswered` covers skips, timeouts, and advancing without a choice. It is
/// never equal to any option, so it can never score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Option(OptionIndex),
    Unanswered,
}

impl Selection {
    #[must_use]
    pub fn option(self) -> Option<OptionIndex> {
        match self {
            Selection::Option(index) => Some(index),
            Selection::Unanswered => None,
        }
    }

    #[must_use]
    pub fn is_answered(self) -> bool {
        matches!(self, Selection::Option(_))
    }
}

impl From<Option<OptionIndex>> for Selection {
    fn from(value: Option<OptionIndex>) -> Self {
        value.map_or(Selection::Unanswered, Selection::Option)
    }
}

/// Recorded outcome for one slot of a question set. Written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub selection: Selection,
    pub seconds_taken: u32,
}

impl AnswerRecord {
    #[must_use]
    pub fn answered(index: OptionIndex, seconds_taken: u32) -> Self {
        Self {
            selection: Selection::Option(index),
            seconds_taken,
        }
    }

    #[must_use]
    pub fn unanswered(seconds_taken: u32) -> Self {
        Self {
            selection: Selection::Unanswered,
            seconds_taken,
        }
    }

    #[must_use]
    pub fn is_correct_for(&self, question: &Question) -> bool {
        match self.selection {
            Selection::Option(index) => question.is_correct(index),
            Selection::Unanswered => false,
        }
    }
}
