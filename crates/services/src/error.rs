//! Shared error types for the services crate.

use std::fmt;

use thiserror::Error;

use quiz_core::model::ConfigError;

/// Session operations that can be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Tick,
    SelectAnswer,
    Skip,
    Advance,
    ComputeResult,
    BuildReview,
    GoHome,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Tick => "tick",
            Operation::SelectAnswer => "select answer",
            Operation::Skip => "skip",
            Operation::Advance => "advance",
            Operation::ComputeResult => "compute result",
            Operation::BuildReview => "build review",
            Operation::GoHome => "go home",
        };
        f.write_str(name)
    }
}

/// Why an operation was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("no session is in progress")]
    NotInProgress,
    #[error("current question is already answered")]
    AlreadyAnswered,
    #[error("session has not finished")]
    NotFinished,
}

/// Errors emitted by session services.
///
/// `InvalidOperation` never changes state; hosts may log and ignore it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error("{operation} rejected: {reason}")]
    InvalidOperation {
        operation: Operation,
        reason: Rejection,
    },
}

impl SessionError {
    pub(crate) fn rejected(operation: Operation, reason: Rejection) -> Self {
        Self::InvalidOperation { operation, reason }
    }

    #[must_use]
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }
}
