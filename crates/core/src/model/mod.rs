mod answer;
mod bank;
mod config;
mod ids;
mod question;

pub use ids::QuestionId;

pub use answer::{AnswerRecord, Selection};
pub use bank::{BankError, QuestionBank};
pub use config::{ConfigError, SessionConfig};
pub use question::{OPTION_COUNT, OptionIndex, Question, QuestionDraft, QuestionError};
