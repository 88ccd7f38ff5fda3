use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs exactly {OPTION_COUNT} options, got {0}")]
    WrongOptionCount(usize),

    #[error("option {0} cannot be empty")]
    EmptyOption(usize),

    #[error("invalid option index: {0}")]
    InvalidOptionIndex(u8),
}

//
// ─── OPTION INDEX ──────────────────────────────────────────────────────────────
//

/// Position of an option within a question, always in `0..=3`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// Converts a zero-based option position to an `OptionIndex`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidOptionIndex` if the value is not in the range 0-3.
    pub fn from_u8(value: u8) -> Result<Self, QuestionError> {
        if usize::from(value) < OPTION_COUNT {
            Ok(Self(value))
        } else {
            Err(QuestionError::InvalidOptionIndex(value))
        }
    }

    /// All option positions in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..OPTION_COUNT as u8).map(Self)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }

    /// Letter label shown next to the option (`A` to `D`).
    #[must_use]
    pub fn label(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl TryFrom<u8> for OptionIndex {
    type Error = QuestionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

impl From<OptionIndex> for u8 {
    fn from(index: OptionIndex) -> Self {
        index.0
    }
}

impl fmt::Debug for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionIndex({})", self.0)
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question as written in a bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct: u8,
}

impl QuestionDraft {
    #[must_use]
    pub fn new<S: Into<String>>(
        text: impl Into<String>,
        options: [S; OPTION_COUNT],
        correct: u8,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct,
        }
    }

    /// Validate the draft and assign it an id.
    ///
    /// Text and options are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text or any option is blank, the option
    /// count is not four, or the correct index is out of range.
    pub fn validate(self, id: QuestionId) -> Result<Question, QuestionError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let count = self.options.len();
        let options: [String; OPTION_COUNT] = self
            .options
            .into_iter()
            .map(|opt| opt.trim().to_string())
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| QuestionError::WrongOptionCount(count))?;

        if let Some(pos) = options.iter().position(String::is_empty) {
            return Err(QuestionError::EmptyOption(pos));
        }

        let correct = OptionIndex::from_u8(self.correct)?;

        Ok(Question {
            id,
            text,
            options,
            correct,
        })
    }
}

/// A multiple-choice question with four options and one correct answer.
///
/// Immutable once loaded into a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; OPTION_COUNT],
    correct: OptionIndex,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> &str {
        &self.options[index.as_usize()]
    }

    #[must_use]
    pub fn correct(&self) -> OptionIndex {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, index: OptionIndex) -> bool {
        self.correct == index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
