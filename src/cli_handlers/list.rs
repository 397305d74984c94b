use crate::application::config::AppConfig;
use crate::cli_handlers::{CliCommand, open_silent_controller};
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::utils::APP_NAME;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Tracks,
    Favorites,
    Albums,
    Artists,
}

pub struct ListCommand {
    pub view: ListView,
    pub config: AppConfig,
}

impl CliCommand for ListCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let controller = open_silent_controller(&self.config)?;
        let catalog = controller.catalog();
        let ui = TerminalRenderer::new();

        if catalog.is_empty() {
            ui.print_error(&format!(
                "Playlist is empty. Run '{} add <URL|FILE|DIR>' first.",
                APP_NAME
            ));
            return Ok(());
        }

        match self.view {
            ListView::Tracks => {
                ui.print_track_list(catalog.tracks().iter().enumerate(), |id| {
                    catalog.is_favorite(id)
                });
            }
            ListView::Favorites => {
                let favorites: Vec<_> = catalog
                    .tracks()
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| catalog.is_favorite(&t.id))
                    .collect();
                if favorites.is_empty() {
                    ui.print_message("No favorites yet");
                } else {
                    ui.print_track_list(favorites, |_| true);
                }
            }
            ListView::Albums => ui.print_albums(catalog.albums()),
            ListView::Artists => ui.print_artists(catalog.artists()),
        }

        Ok(())
    }
}
