//! Input port: discrete events the host feeds into the controller.

use quiz_core::model::{OptionIndex, QuestionBank, SessionConfig};

use crate::error::SessionError;
use crate::ports::{PresentationPort, Screen};
use crate::sessions::SessionController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Start(SessionConfig),
    SelectOption(OptionIndex),
    Skip,
    Next,
    TimerTick,
    OpenReview,
    GoHome,
}

impl InputEvent {
    /// Keyboard shortcuts of the quiz screen: `1`-`4` pick an option, `n`
    /// moves on, `s` skips. Other keys map to nothing.
    #[must_use]
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'n' => Some(Self::Next),
            's' => Some(Self::Skip),
            digit @ '1'..='4' => {
                let value = digit.to_digit(10)? as u8 - 1;
                OptionIndex::from_u8(value).ok().map(Self::SelectOption)
            }
            _ => None,
        }
    }
}

impl<P: PresentationPort> SessionController<P> {
    /// Route one input event to the matching operation.
    ///
    /// Keyboard-originated events (`SelectOption`, `Skip`, `Next`) are
    /// ignored unless the quiz screen is showing.
    ///
    /// # Errors
    ///
    /// Propagates the error of the routed operation.
    pub fn dispatch(&mut self, event: InputEvent, bank: &QuestionBank) -> Result<(), SessionError> {
        match event {
            InputEvent::Start(config) => self.start_session(config, bank),
            InputEvent::SelectOption(_) | InputEvent::Skip | InputEvent::Next
                if self.screen() != Screen::Quiz =>
            {
                Ok(())
            }
            InputEvent::SelectOption(index) => self.select_answer(index).map(|_| ()),
            InputEvent::Skip => self.skip(),
            InputEvent::Next => self.advance().map(|_| ()),
            InputEvent::TimerTick => self.tick().map(|_| ()),
            InputEvent::OpenReview => self.open_review().map(|_| ()),
            InputEvent::GoHome => self.go_home(),
        }
    }
}
