use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("seconds per question must be > 0")]
    InvalidSecondsPerQuestion,

    #[error("question bank is empty")]
    EmptyBank,
}

/// Settings fixed for the duration of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSessionConfig")]
pub struct SessionConfig {
    question_count: u32,
    seconds_per_question: u32,
}

#[derive(Deserialize)]
struct RawSessionConfig {
    question_count: u32,
    seconds_per_question: u32,
}

impl TryFrom<RawSessionConfig> for SessionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSessionConfig) -> Result<Self, Self::Error> {
        Self::new(raw.question_count, raw.seconds_per_question)
    }
}

impl SessionConfig {
    pub const DEFAULT_QUESTION_COUNT: u32 = 10;
    pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 12;

    /// # Errors
    ///
    /// Returns `ConfigError` if either value is zero.
    pub fn new(question_count: u32, seconds_per_question: u32) -> Result<Self, ConfigError> {
        if question_count == 0 {
            return Err(ConfigError::InvalidQuestionCount);
        }
        if seconds_per_question == 0 {
            return Err(ConfigError::InvalidSecondsPerQuestion);
        }
        Ok(Self {
            question_count,
            seconds_per_question,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            question_count: Self::DEFAULT_QUESTION_COUNT,
            seconds_per_question: Self::DEFAULT_SECONDS_PER_QUESTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_are_rejected() {
        assert_eq!(
            SessionConfig::new(0, 12).unwrap_err(),
            ConfigError::InvalidQuestionCount
        );
        assert_eq!(
            SessionConfig::new(5, 0).unwrap_err(),
            ConfigError::InvalidSecondsPerQuestion
        );
    }

    #[test]
    fn defaults_match_start_screen() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.question_count(), 10);
        assert_eq!(cfg.seconds_per_question(), 12);
    }

    #[test]
    fn deserialize_validates() {
        let ok: SessionConfig =
            serde_json::from_str(r#"{"question_count":5,"seconds_per_question":8}"#).unwrap();
        assert_eq!(ok, SessionConfig::new(5, 8).unwrap());

        let bad = serde_json::from_str::<SessionConfig>(
            r#"{"question_count":0,"seconds_per_question":8}"#,
        );
        assert!(bad.is_err());
    }
}
