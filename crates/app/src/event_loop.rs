use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use quiz_core::model::{QuestionBank, SessionConfig};
use quiz_services::{AdvanceOutcome, InputEvent, Screen, SessionController, SessionError};

use crate::settings::AppSettings;
use crate::terminal::TerminalPresenter;

/// A line typed by the user, interpreted for the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Input(InputEvent),
    Quit,
}

/// Map a typed line to a command. Unknown input maps to `None`.
#[must_use]
pub fn parse_command(line: &str, screen: Screen, config: SessionConfig) -> Option<HostCommand> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Some(HostCommand::Quit);
    }
    let key = line.chars().next().map(|c| c.to_ascii_lowercase());

    let event = match (screen, key) {
        (Screen::Start, None | Some('s')) => InputEvent::Start(config),
        (Screen::Quiz, Some(key)) => InputEvent::from_key(key)?,
        (Screen::Result, Some('r')) => InputEvent::OpenReview,
        (Screen::Result | Screen::Review, Some('p' | 'h')) => InputEvent::GoHome,
        _ => return None,
    };
    Some(HostCommand::Input(event))
}

fn dispatch<W: Write>(
    controller: &mut SessionController<TerminalPresenter<W>>,
    event: InputEvent,
    bank: &QuestionBank,
) -> Result<(), SessionError> {
    match event {
        InputEvent::Next if controller.screen() == Screen::Quiz => {
            if controller.advance()? == AdvanceOutcome::Finished {
                let result = controller.compute_result()?;
                info!(
                    correct = result.correct_count,
                    total = result.total_questions,
                    "session complete"
                );
                controller.presenter_mut().render_result(&result);
            }
            Ok(())
        }
        InputEvent::OpenReview => {
            let review = controller.open_review()?;
            controller.presenter_mut().render_review(&review);
            Ok(())
        }
        other => controller.dispatch(other, bank),
    }
}

/// Run the quiz until stdin closes or the user quits.
///
/// # Errors
///
/// Fails on stdin read errors or an unusable session configuration.
pub async fn run(settings: AppSettings, bank: QuestionBank) -> anyhow::Result<()> {
    let config = settings.session_config(&bank)?;
    let presenter = TerminalPresenter::new(std::io::stdout(), settings.animate);
    let mut controller = SessionController::new(presenter);
    if let Some(seed) = settings.seed {
        controller = controller.with_seed(seed);
    }
    controller.go_home()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_command(&line, controller.screen(), config) {
                    Some(HostCommand::Quit) => break,
                    Some(HostCommand::Input(event)) => {
                        let restarts_timer =
                            matches!(event, InputEvent::Start(_) | InputEvent::Next);
                        match dispatch(&mut controller, event, &bank) {
                            Ok(()) if restarts_timer => ticker.reset(),
                            Ok(()) => {}
                            Err(err @ SessionError::InvalidOperation { .. }) => {
                                debug!(%err, "ignored");
                            }
                            Err(err) => warn!(%err, "input rejected"),
                        }
                    }
                    None => debug!(line = %line, "unrecognised input"),
                }
            }
            _ = ticker.tick(), if controller.needs_tick() => {
                if let Err(err) = controller.tick() {
                    debug!(%err, "tick ignored");
                }
            }
        }
    }

    Ok(())
}
