use crate::core::events::UiCommand;
use crate::modules::playback::controller::PlaybackController;
use crate::modules::playback::navigator::Direction;
use crate::utils::{VOLUME_STEP, step_rate, volume_to_percent};
use tracing::debug;

/// What the run loop should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Keep running, optionally flashing a message on the status line.
    Continue(Option<String>),
    Quit,
}

impl CommandOutcome {
    fn message(text: impl Into<String>) -> Self {
        CommandOutcome::Continue(Some(text.into()))
    }

    fn silent() -> Self {
        CommandOutcome::Continue(None)
    }
}

/// Translates interactive [`UiCommand`]s into controller calls.
///
/// Controller errors are turned into status messages; they never stop the loop.
pub struct CommandHandler;

impl CommandHandler {
    pub fn handle(&self, command: UiCommand, controller: &mut PlaybackController) -> CommandOutcome {
        debug!(?command, "ui command");

        match command {
            UiCommand::TogglePlayPause => match controller.toggle_play_pause() {
                Ok(()) => CommandOutcome::silent(),
                Err(e) => CommandOutcome::message(format!("Error: {}", e)),
            },

            UiCommand::NextTrack => Self::navigate(controller, Direction::Next),
            UiCommand::PreviousTrack => Self::navigate(controller, Direction::Previous),

            UiCommand::SeekForward => {
                controller.seek_forward();
                CommandOutcome::silent()
            }
            UiCommand::SeekBackward => {
                controller.seek_backward();
                CommandOutcome::silent()
            }

            UiCommand::VolumeUp | UiCommand::VolumeDown => {
                let step = if command == UiCommand::VolumeUp {
                    VOLUME_STEP
                } else {
                    -VOLUME_STEP
                };
                let volume = controller.session().volume + step;
                controller.set_volume(volume);
                CommandOutcome::message(format!(
                    "Volume: {}%",
                    volume_to_percent(controller.session().volume)
                ))
            }

            UiCommand::ToggleMute => {
                controller.toggle_mute();
                if controller.session().is_muted {
                    CommandOutcome::message("Muted")
                } else {
                    CommandOutcome::message(format!(
                        "Volume: {}%",
                        volume_to_percent(controller.session().volume)
                    ))
                }
            }

            UiCommand::ToggleRepeat => {
                let mode = controller.toggle_repeat_mode();
                CommandOutcome::message(format!("Repeat: {}", mode))
            }

            UiCommand::ToggleShuffle => {
                let enabled = controller.toggle_shuffle();
                CommandOutcome::message(if enabled { "Shuffle on" } else { "Shuffle off" })
            }

            UiCommand::ToggleFavorite => match controller.toggle_current_favorite() {
                Some(true) => CommandOutcome::message("Added to favorites"),
                Some(false) => CommandOutcome::message("Removed from favorites"),
                None => CommandOutcome::message("No track selected"),
            },

            UiCommand::FasterRate | UiCommand::SlowerRate => {
                let faster = command == UiCommand::FasterRate;
                let rate = step_rate(controller.session().playback_rate, faster);
                controller.set_playback_rate(rate);
                CommandOutcome::message(format!("Speed: {}x", rate))
            }

            UiCommand::Quit => CommandOutcome::Quit,
        }
    }

    fn navigate(controller: &mut PlaybackController, direction: Direction) -> CommandOutcome {
        match controller.advance(direction) {
            Ok(true) => CommandOutcome::silent(),
            Ok(false) => CommandOutcome::message(match direction {
                Direction::Next => "End of playlist",
                Direction::Previous => "Start of playlist",
            }),
            Err(e) => CommandOutcome::message(format!("Error: {}", e)),
        }
    }
}
