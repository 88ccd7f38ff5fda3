mod controller;
mod plan;
mod progress;
mod state;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::SessionController;
pub use plan::QuestionSetBuilder;
pub use progress::{SessionProgress, rounded_percent};
pub use state::{
    AdvanceOutcome, AnswerOutcome, QuizSession, SessionPhase, SkipOutcome, TickOutcome,
};
pub use view::{ReviewItem, SessionResult};
