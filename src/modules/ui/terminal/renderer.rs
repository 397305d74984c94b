use crate::application::state::PlayerSnapshot;
use crate::core::events::UiCommand;
use crate::core::models::{PlaybackStats, Track, TransportState};
use crate::core::traits::UiRenderer;
use crate::modules::library::catalog::{AlbumGroup, ArtistGroup};
use crate::modules::playback::playback_progress::PlaybackProgress;
use crate::modules::ui::progress_formatter::{ProgressFormatter, format_listening_time};
use crate::utils::volume_to_percent;
use anyhow::Result;
use crossterm::{
    ExecutableCommand, cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{self, ClearType},
};
use std::io::{Write, stdout};
use std::time::Duration;

const KEY_HELP: &str = "[Space: Play/Pause | N/B: Next/Prev | ←/→: Seek | +/-: Vol | M: Mute | R: Repeat | S: Shuffle | F: Fav | [/]: Speed | Q: Quit]";

pub struct TerminalRenderer {
    initialized: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self { initialized: false }
    }

    pub fn print_message(&self, message: &str) {
        println!("{}", message);
    }

    pub fn print_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    /// One line per track: `[index] Artist - Title [M:SS]`, favorites starred.
    pub fn print_track_list<'a>(
        &self,
        tracks: impl IntoIterator<Item = (usize, &'a Track)>,
        is_favorite: impl Fn(&str) -> bool,
    ) {
        for (index, track) in tracks {
            let star = if is_favorite(&track.id) { "♥ " } else { "" };
            println!("[{}] {}{}  ({})", index, star, track, track.id);
        }
    }

    pub fn print_search_results(&self, query: &str, results: &[(usize, &Track)]) {
        if results.is_empty() {
            println!("No tracks found matching: '{}'", query);
        } else {
            println!("Found {} matches:", results.len());
            self.print_track_list(results.iter().copied(), |_| false);
        }
    }

    pub fn print_albums<'a>(&self, albums: impl IntoIterator<Item = &'a AlbumGroup>) {
        for album in albums {
            println!(
                "{} - {} ({}) · {} tracks",
                album.artist,
                album.title,
                album.year,
                album.track_ids.len()
            );
        }
    }

    pub fn print_artists<'a>(&self, artists: impl IntoIterator<Item = &'a ArtistGroup>) {
        for artist in artists {
            println!(
                "{} · {} albums · {} tracks",
                artist.name,
                artist.albums.len(),
                artist.track_ids.len()
            );
        }
    }

    pub fn print_stats(&self, stats: &PlaybackStats, track_count: usize, favorites: usize) {
        println!("Tracks in playlist: {}", track_count);
        println!("Favorites:          {}", favorites);
        println!("Tracks played:      {}", stats.total_tracks_played);
        println!(
            "Listening time:     {}",
            format_listening_time(stats.total_listening_time)
        );
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Single status line describing the player.
pub fn status_line(snapshot: &PlayerSnapshot, message: Option<&str>) -> String {
    let session = &snapshot.session;
    let icon = match session.transport {
        TransportState::Playing => "▶",
        TransportState::Paused => "⏸",
        TransportState::Loading => "…",
        TransportState::Idle | TransportState::Ended => "■",
    };

    let mut line = match &snapshot.current_track {
        Some(track) => {
            let progress = PlaybackProgress::new(session.current_time, session.duration)
                .map(|p| {
                    ProgressFormatter::compact_formatter()
                        .format(p.elapsed(), p.total(), p.percentage())
                        .combined_label
                })
                .unwrap_or_else(|| "--:--".to_string());
            let heart = if snapshot.is_favorite { " ♥" } else { "" };
            format!(
                "{} {}: {} - {}{} [{}]",
                icon,
                session.transport.label(),
                track.artist,
                track.title,
                heart,
                progress
            )
        }
        None => format!("{} {}", icon, session.transport.label()),
    };

    let volume = if session.is_muted {
        "Muted".to_string()
    } else {
        format!("Vol {}%", volume_to_percent(session.volume))
    };
    line.push_str(&format!(
        " | {} | {} {} | Shuffle {} | {}x",
        volume,
        session.repeat_mode.symbol(),
        session.repeat_mode,
        if session.shuffle_enabled { "on" } else { "off" },
        session.playback_rate
    ));

    if let Some(message) = message {
        line.push_str(" | ");
        line.push_str(message);
    }
    line
}

/// Key bindings of the interactive player.
pub fn map_key(code: KeyCode) -> Option<UiCommand> {
    let command = match code {
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => UiCommand::TogglePlayPause,
        KeyCode::Char('n') | KeyCode::Char('N') => UiCommand::NextTrack,
        KeyCode::Char('b') | KeyCode::Char('B') => UiCommand::PreviousTrack,
        KeyCode::Right => UiCommand::SeekForward,
        KeyCode::Left => UiCommand::SeekBackward,
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => UiCommand::VolumeUp,
        KeyCode::Char('-') | KeyCode::Down => UiCommand::VolumeDown,
        KeyCode::Char('m') | KeyCode::Char('M') => UiCommand::ToggleMute,
        KeyCode::Char('r') | KeyCode::Char('R') => UiCommand::ToggleRepeat,
        KeyCode::Char('s') | KeyCode::Char('S') => UiCommand::ToggleShuffle,
        KeyCode::Char('f') | KeyCode::Char('F') => UiCommand::ToggleFavorite,
        KeyCode::Char(']') => UiCommand::FasterRate,
        KeyCode::Char('[') => UiCommand::SlowerRate,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => UiCommand::Quit,
        _ => return None,
    };
    Some(command)
}

impl UiRenderer for TerminalRenderer {
    fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.initialized = true;
        println!("{}\r", KEY_HELP);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.initialized {
            terminal::disable_raw_mode()?;
            self.initialized = false;
            println!();
        }
        Ok(())
    }

    fn render(&mut self, snapshot: &PlayerSnapshot, message: Option<&str>) -> Result<()> {
        let mut stdout = stdout();

        stdout.execute(cursor::MoveToColumn(0))?;
        stdout.execute(terminal::Clear(ClearType::CurrentLine))?;

        print!("{}", status_line(snapshot, message));

        stdout.flush()?;
        Ok(())
    }

    fn poll_input(&mut self) -> Result<Vec<UiCommand>> {
        let mut commands = Vec::new();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind == KeyEventKind::Release {
                    continue;
                }
                commands.extend(map_key(code));
            }
        }

        Ok(commands)
    }
}
