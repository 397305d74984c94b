use crate::application::config::AppConfig;
use crate::cli_handlers::{CliCommand, open_silent_controller};
use crate::core::models::SourceKind;
use crate::modules::library::playlist_io::{
    default_export_name, read_playlist_file, write_playlist_file,
};
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;

// ── Import ────────────────────────────────────────────────────────────────────
pub struct ImportCommand {
    pub file: PathBuf,
    pub config: AppConfig,
}

impl CliCommand for ImportCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let ui = TerminalRenderer::new();
        let inputs = read_playlist_file(&self.file)?;

        if inputs.is_empty() {
            ui.print_error("No importable tracks found (each needs a title and a url)");
            return Ok(());
        }

        let mut controller = open_silent_controller(&self.config)?;
        let added = controller.import_tracks(inputs, SourceKind::Imported);

        ui.print_message(&format!(
            "✓ Imported {} tracks from {}",
            added.len(),
            self.file.display()
        ));
        Ok(())
    }
}

// ── Export ────────────────────────────────────────────────────────────────────
pub struct ExportCommand {
    pub file: Option<PathBuf>,
    pub config: AppConfig,
}

impl CliCommand for ExportCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let controller = open_silent_controller(&self.config)?;
        let ui = TerminalRenderer::new();

        let tracks = controller.catalog().tracks();
        if tracks.is_empty() {
            ui.print_error("Playlist is empty, nothing to export");
            return Ok(());
        }

        let path = self
            .file
            .unwrap_or_else(|| PathBuf::from(default_export_name(Utc::now())));
        write_playlist_file(&path, tracks)?;

        ui.print_message(&format!(
            "✓ Exported {} tracks to {}",
            tracks.len(),
            path.display()
        ));
        Ok(())
    }
}
