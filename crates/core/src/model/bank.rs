use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{OPTION_COUNT, Question, QuestionDraft, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("failed to parse TOML question bank: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON question bank: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk layout shared by TOML and JSON banks.
///
/// ```toml
/// [[questions]]
/// text = "What is the capital of France?"
/// options = ["Paris", "Rome", "Madrid", "Berlin"]
/// correct = 0
/// ```
#[derive(Debug, Deserialize)]
struct BankFile {
    questions: Vec<QuestionDraft>,
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Static, ordered source list of questions.
///
/// A bank may be empty; starting a session from an empty bank is rejected by
/// the session layer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

type BuiltinQuestion = (&'static str, [&'static str; OPTION_COUNT], u8);

const BUILTIN: [BuiltinQuestion; 10] = [
    (
        "What is the capital of France?",
        ["Paris", "Rome", "Madrid", "Berlin"],
        0,
    ),
    (
        "Which planet is called the Red Planet?",
        ["Venus", "Mars", "Jupiter", "Saturn"],
        1,
    ),
    (
        "What is 9 × 7?",
        ["56", "63", "72", "49"],
        1,
    ),
    (
        "Which gas do plants primarily absorb?",
        ["Oxygen", "Nitrogen", "Carbon Dioxide", "Hydrogen"],
        2,
    ),
    (
        "The Statue of Liberty was gifted by?",
        ["UK", "Germany", "France", "Spain"],
        2,
    ),
    (
        "Which language runs in a web browser?",
        ["Python", "C++", "JavaScript", "Java"],
        2,
    ),
    (
        "Which element's chemical symbol is 'O'?",
        ["Gold", "Oxygen", "Silver", "Iron"],
        1,
    ),
    (
        "Who painted the Mona Lisa?",
        ["Van Gogh", "Picasso", "Leonardo da Vinci", "Rembrandt"],
        2,
    ),
    (
        "Speed of light is approx.?",
        ["3 × 10^5 km/s", "3 × 10^8 m/s", "3 × 10^5 m/s", "3 × 10^8 km/s"],
        1,
    ),
    (
        "Which is the smallest prime number?",
        ["0", "1", "2", "3"],
        2,
    ),
];

impl QuestionBank {
    /// Validate drafts into a bank. Ids are assigned by position.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidQuestion` for the first draft that fails validation.
    pub fn new(drafts: impl IntoIterator<Item = QuestionDraft>) -> Result<Self, BankError> {
        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate(QuestionId::new(index as u64))
                    .map_err(|source| BankError::InvalidQuestion { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { questions })
    }

    /// Parse a bank from TOML text (`[[questions]]` tables).
    ///
    /// # Errors
    ///
    /// Returns `BankError` on malformed TOML or invalid questions.
    pub fn from_toml_str(raw: &str) -> Result<Self, BankError> {
        let file: BankFile = toml::from_str(raw)?;
        Self::new(file.questions)
    }

    /// Parse a bank from JSON text (`{"questions": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns `BankError` on malformed JSON or invalid questions.
    pub fn from_json_str(raw: &str) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(raw)?;
        Self::new(file.questions)
    }

    /// The general-knowledge bank shipped with the quiz.
    #[must_use]
    pub fn builtin() -> Self {
        let questions = BUILTIN
            .iter()
            .enumerate()
            .filter_map(|(index, (text, options, correct))| {
                QuestionDraft::new(*text, *options, *correct)
                    .validate(QuestionId::new(index as u64))
                    .ok()
            })
            .collect();
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
