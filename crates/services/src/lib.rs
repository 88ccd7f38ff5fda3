#![forbid(unsafe_code)]

pub mod error;
pub mod input;
pub mod ports;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{Operation, Rejection, SessionError};
pub use input::InputEvent;
pub use ports::{Feedback, PresentationPort, PresenterCall, RecordingPresenter, Screen};

pub use sessions::{
    AdvanceOutcome, QuestionSetBuilder, QuizSession, ReviewItem, SessionController, SessionPhase,
    SessionProgress, SessionResult, TickOutcome,
};
