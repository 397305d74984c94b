use crate::application::app::Application;
use crate::application::config::AppConfig;
use crate::cli_handlers::{CliCommand, open_controller};
use crate::modules::playback::controller::PlaybackController;
use crate::modules::playback::rodio_surface::RodioSurface;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::utils::APP_NAME;
use anyhow::Result;
use crossbeam_channel::unbounded;
use tracing::debug;

/// Where the interactive session starts.
#[derive(Debug, Clone, PartialEq)]
pub enum StartAt {
    /// Last selected track, or the first one.
    Resume,
    Index(usize),
    Album(String),
    Artist(String),
}

pub struct PlayCommand {
    pub start: StartAt,
    pub config: AppConfig,
}

/// Starts playback at `start`. `Ok(false)` when there is nothing to start from.
fn start_playback(controller: &mut PlaybackController, start: &StartAt) -> Result<bool> {
    let result = match start {
        StartAt::Resume => {
            let index = controller.session().current_index.unwrap_or(0);
            controller.play_index(index).map(|_| true)
        }
        StartAt::Index(index) => {
            if *index >= controller.catalog().len() {
                return Ok(false);
            }
            controller.play_index(*index).map(|_| true)
        }
        StartAt::Album(album) => controller.play_album(album),
        StartAt::Artist(artist) => controller.play_artist(artist),
    };

    match result {
        Ok(started) => Ok(started),
        // Load failures are published to the UI and skip ahead on their own.
        Err(e) if e.is_load_failure() => {
            debug!(error = %e, "first track failed to load");
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

impl CliCommand for PlayCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let ui = TerminalRenderer::new();

        let (events_tx, events_rx) = unbounded();
        let surface = RodioSurface::new(events_tx)?;
        let mut controller = open_controller(&self.config, Box::new(surface))?;

        if controller.catalog().is_empty() {
            ui.print_error(&format!(
                "Playlist is empty. Run '{} add <URL|FILE|DIR>' first.",
                APP_NAME
            ));
            return Ok(());
        }

        if !start_playback(&mut controller, &self.start)? {
            ui.print_error(&match &self.start {
                StartAt::Index(index) => format!(
                    "Invalid index {} (playlist has {} tracks)",
                    index,
                    controller.catalog().len()
                ),
                StartAt::Album(album) => format!("No tracks on album '{}'", album),
                StartAt::Artist(artist) => format!("No tracks by '{}'", artist),
                StartAt::Resume => "Nothing to play".to_string(),
            });
            return Ok(());
        }

        let mut app = Application::new(controller)
            .with_media_events(events_rx)
            .with_ui_renderer(Box::new(ui));

        app.init()?;
        let result = app.run();
        app.cleanup()?;
        result
    }
}
