use crate::application::config::AppConfig;
use crate::cli_handlers::{CliCommand, open_silent_controller};
use crate::core::models::{SourceKind, TrackInput};
use crate::modules::library::playlist_io::title_from_location;
use crate::modules::library::scanner::{read_track_input, scan_directory};
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::{Result, bail};
use std::path::Path;
use url::Url;

// ── Add ───────────────────────────────────────────────────────────────────────
pub struct AddCommand {
    pub target: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub config: AppConfig,
}

impl AddCommand {
    /// Applies the command-line overrides. Titles only apply to single tracks.
    fn apply_overrides(&self, input: &mut TrackInput, single: bool) {
        if single && self.title.is_some() {
            input.title = self.title.clone();
        }
        if self.artist.is_some() {
            input.artist = self.artist.clone();
        }
        if self.album.is_some() {
            input.album = self.album.clone();
        }
        if self.genre.is_some() {
            input.genre = self.genre.clone();
        }
    }
}

/// Classifies an `add` target: http(s) URL, audio file or directory.
pub(crate) fn inputs_for_target(target: &str) -> Result<(Vec<TrackInput>, SourceKind)> {
    if let Ok(url) = Url::parse(target) {
        if matches!(url.scheme(), "http" | "https") {
            let input = TrackInput {
                title: title_from_location(url.path()),
                url: Some(url.to_string()),
                ..TrackInput::default()
            };
            return Ok((vec![input], SourceKind::Online));
        }
    }

    let path = Path::new(target);
    if path.is_dir() {
        Ok((scan_directory(path)?, SourceKind::Local))
    } else if path.is_file() {
        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Ok((vec![read_track_input(&absolute)], SourceKind::Local))
    } else {
        bail!("'{}' is not an http(s) URL, a file or a directory", target)
    }
}

impl CliCommand for AddCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let ui = TerminalRenderer::new();
        let (mut inputs, kind) = inputs_for_target(&self.target)?;

        if inputs.is_empty() {
            ui.print_error(&format!("No audio files found in {}", self.target));
            return Ok(());
        }

        let single = inputs.len() == 1;
        for input in &mut inputs {
            self.apply_overrides(input, single);
        }

        let mut controller = open_silent_controller(&self.config)?;
        let added = controller.import_tracks(inputs, kind);

        if let [track] = added.as_slice() {
            ui.print_message(&format!("✓ Added: {}  ({})", track, track.id));
        } else {
            ui.print_message(&format!("✓ Added {} tracks", added.len()));
        }
        Ok(())
    }
}

// ── Remove ────────────────────────────────────────────────────────────────────
pub struct RemoveCommand {
    pub id: String,
    pub config: AppConfig,
}

impl CliCommand for RemoveCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let ui = TerminalRenderer::new();
        let mut controller = open_silent_controller(&self.config)?;

        match controller.remove_track(&self.id) {
            Some(track) => ui.print_message(&format!("Removed: {}", track)),
            None => ui.print_error(&format!("No track with id '{}'", self.id)),
        }
        Ok(())
    }
}

// ── Favorite ──────────────────────────────────────────────────────────────────
pub struct FavoriteCommand {
    pub id: String,
    pub config: AppConfig,
}

impl CliCommand for FavoriteCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let ui = TerminalRenderer::new();
        let mut controller = open_silent_controller(&self.config)?;

        let Some(title) = controller.catalog().find(&self.id).map(|t| t.title.clone()) else {
            ui.print_error(&format!("No track with id '{}'", self.id));
            return Ok(());
        };

        if controller.toggle_favorite(&self.id) {
            ui.print_message(&format!("♥ Added to favorites: {}", title));
        } else {
            ui.print_message(&format!("Removed from favorites: {}", title));
        }
        Ok(())
    }
}

// ── Clear ─────────────────────────────────────────────────────────────────────
pub struct ClearCommand {
    pub config: AppConfig,
}

impl CliCommand for ClearCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let ui = TerminalRenderer::new();
        let mut controller = open_silent_controller(&self.config)?;

        let removed = controller.clear_playlist();
        ui.print_message(&format!("Playlist cleared ({} tracks removed)", removed));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn urls_become_online_tracks() {
        let (inputs, kind) = inputs_for_target("https://cdn.example.com/sets/night-drive.mp3").unwrap();
        assert_eq!(kind, SourceKind::Online);
        assert_eq!(inputs[0].title.as_deref(), Some("night-drive"));
        assert_eq!(
            inputs[0].url.as_deref(),
            Some("https://cdn.example.com/sets/night-drive.mp3")
        );
    }

    #[test]
    fn files_and_directories_become_local_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Intro.mp3");
        fs::write(&file, b"").unwrap();
        fs::write(dir.path().join("cover.png"), b"").unwrap();

        let (inputs, kind) = inputs_for_target(file.to_str().unwrap()).unwrap();
        assert_eq!(kind, SourceKind::Local);
        assert_eq!(inputs[0].title.as_deref(), Some("Intro"));

        let (inputs, _) = inputs_for_target(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(inputs.len(), 1);
    }

    #[test]
    fn unknown_targets_are_rejected() {
        assert!(inputs_for_target("ftp://example.com/a.mp3").is_err());
        assert!(inputs_for_target("/definitely/not/here.mp3").is_err());
    }

    #[test]
    fn title_override_only_applies_to_single_tracks() {
        let cmd = AddCommand {
            target: String::new(),
            title: Some("Custom".into()),
            artist: Some("Someone".into()),
            album: None,
            genre: None,
            config: AppConfig::default(),
        };

        let mut single = TrackInput::titled("file-name");
        cmd.apply_overrides(&mut single, true);
        assert_eq!(single.title.as_deref(), Some("Custom"));
        assert_eq!(single.artist.as_deref(), Some("Someone"));

        let mut many = TrackInput::titled("file-name");
        cmd.apply_overrides(&mut many, false);
        assert_eq!(many.title.as_deref(), Some("file-name"));
    }
}
