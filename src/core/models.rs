use crate::modules::ui::progress_formatter::format_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_YEAR: &str = "Unknown Year";
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

/// Where a track's playable content comes from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Remote URL streamed by the output.
    #[default]
    Online,
    /// A file on this machine.
    Local,
    /// Entry brought in from a playlist file; may be either a URL or a path.
    Imported,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Online => "online",
            SourceKind::Local => "local",
            SourceKind::Imported => "imported",
        }
    }
}

/// A catalog entry: display metadata plus play statistics.
///
/// Field names on the wire match the stored `playlist_data` document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_artist")]
    pub artist: String,
    #[serde(default = "default_album")]
    pub album: String,
    #[serde(default = "default_year")]
    pub year: String,
    #[serde(default = "default_genre")]
    pub genre: String,

    /// Length in seconds; 0 means unknown.
    #[serde(rename = "duration", default)]
    pub duration_seconds: f64,

    #[serde(rename = "source", default)]
    pub source_kind: SourceKind,

    /// URL or filesystem path of the playable content.
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,

    #[serde(default)]
    pub play_count: u32,

    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

fn default_title() -> String {
    UNKNOWN_TITLE.to_string()
}

fn default_artist() -> String {
    UNKNOWN_ARTIST.to_string()
}

fn default_album() -> String {
    UNKNOWN_ALBUM.to_string()
}

fn default_year() -> String {
    UNKNOWN_YEAR.to_string()
}

fn default_genre() -> String {
    UNKNOWN_GENRE.to_string()
}

/// Partial metadata used to create a [`Track`]. Anything missing is defaulted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackInput {
    pub id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<f64>,
    #[serde(alias = "path")]
    pub url: Option<String>,
    pub cover: Option<String>,
    pub bitrate: Option<String>,
    pub play_count: Option<u32>,
}

impl TrackInput {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

impl Track {
    /// Builds a track from partial metadata, assigning a fresh id when none is given.
    pub fn from_input(input: TrackInput, source_kind: SourceKind) -> Self {
        let id = input
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(generate_track_id);

        Track {
            id,
            title: non_blank(input.title).unwrap_or_else(default_title),
            artist: non_blank(input.artist).unwrap_or_else(default_artist),
            album: non_blank(input.album).unwrap_or_else(default_album),
            year: non_blank(input.year).unwrap_or_else(default_year),
            genre: non_blank(input.genre).unwrap_or_else(default_genre),
            duration_seconds: sanitize_seconds(input.duration.unwrap_or(0.0)),
            source_kind,
            location: non_blank(input.url),
            cover: non_blank(input.cover),
            bitrate: non_blank(input.bitrate),
            play_count: input.play_count.unwrap_or(0),
            added_at: Utc::now(),
        }
    }

    pub fn format_duration(&self) -> String {
        format_time(self.duration_seconds)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration_str = if self.duration_seconds > 0.0 {
            self.format_duration()
        } else {
            "--:--".to_string()
        };

        write!(f, "{} - {} [{}]", self.artist, self.title, duration_str)
    }
}

pub fn generate_track_id() -> String {
    format!("track_{}", uuid::Uuid::new_v4().simple())
}

/// Clamps a seconds value to a finite, non-negative number.
pub fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// What happens when the current track finishes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the start of the finished track.
    #[default]
    #[serde(rename = "none")]
    Off,
    /// Replay the finished track.
    #[serde(rename = "one")]
    One,
    /// Continue with the next track, wrapping at the end.
    #[serde(rename = "all")]
    All,
}

impl RepeatMode {
    /// none → one → all → none
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Off => "none",
            RepeatMode::One => "one",
            RepeatMode::All => "all",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            RepeatMode::Off => "→",
            RepeatMode::One => "🔂",
            RepeatMode::All => "🔁",
        }
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(RepeatMode::Off),
            "one" => Ok(RepeatMode::One),
            "all" => Ok(RepeatMode::All),
            other => Err(format!("unknown repeat mode '{}'", other)),
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport classification of the playback session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    /// No track loaded.
    #[default]
    Idle,
    /// Waiting for the media surface to finish loading.
    Loading,
    Playing,
    Paused,
    /// Transient: the track just finished and the end handler is branching.
    Ended,
}

impl TransportState {
    pub fn label(&self) -> &'static str {
        match self {
            TransportState::Idle => "Not Playing",
            TransportState::Loading => "Loading",
            TransportState::Playing => "Now Playing",
            TransportState::Paused => "Paused",
            TransportState::Ended => "Ended",
        }
    }
}

/// Lifetime listening totals.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStats {
    #[serde(default)]
    pub total_tracks_played: u64,
    /// Seconds.
    #[serde(default)]
    pub total_listening_time: f64,
}

impl PlaybackStats {
    pub fn record_completion(&mut self, duration_seconds: f64) {
        self.total_tracks_played += 1;
        self.total_listening_time += sanitize_seconds(duration_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_input_fills_sentinels_and_assigns_id() {
        let track = Track::from_input(TrackInput::default(), SourceKind::Local);
        assert!(track.id.starts_with("track_"));
        assert_eq!(track.title, UNKNOWN_TITLE);
        assert_eq!(track.artist, UNKNOWN_ARTIST);
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert_eq!(track.year, UNKNOWN_YEAR);
        assert_eq!(track.genre, UNKNOWN_GENRE);
        assert_eq!(track.duration_seconds, 0.0);
        assert_eq!(track.play_count, 0);
        assert_eq!(track.source_kind, SourceKind::Local);
    }

    #[test]
    fn from_input_keeps_given_id_and_rejects_negative_duration() {
        let input = TrackInput {
            id: Some("abc".into()),
            duration: Some(-4.0),
            ..TrackInput::titled("Song")
        };
        let track = Track::from_input(input, SourceKind::Online);
        assert_eq!(track.id, "abc");
        assert_eq!(track.title, "Song");
        assert_eq!(track.duration_seconds, 0.0);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_track_id(), generate_track_id());
    }

    #[test]
    fn track_reads_stored_field_names() {
        let json = r#"{
            "id": "1",
            "title": "Midnight City",
            "artist": "M83",
            "duration": 244,
            "playCount": 42,
            "url": "https://example.com/a.mp3",
            "source": "online",
            "addedAt": "2024-01-01T00:00:00Z"
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.duration_seconds, 244.0);
        assert_eq!(track.play_count, 42);
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert_eq!(track.location.as_deref(), Some("https://example.com/a.mp3"));
    }

    #[test]
    fn repeat_mode_cycles_and_parses() {
        assert_eq!(RepeatMode::Off.cycle(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycle(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycle(), RepeatMode::Off);
        assert_eq!("ALL".parse::<RepeatMode>(), Ok(RepeatMode::All));
        assert!("sometimes".parse::<RepeatMode>().is_err());
        assert_eq!(serde_json::to_string(&RepeatMode::Off).unwrap(), "\"none\"");
    }

    #[test]
    fn stats_ignore_unknown_duration() {
        let mut stats = PlaybackStats::default();
        stats.record_completion(180.0);
        stats.record_completion(f64::NAN);
        assert_eq!(stats.total_tracks_played, 2);
        assert_eq!(stats.total_listening_time, 180.0);
    }

    #[test]
    fn display_uses_placeholder_for_unknown_duration() {
        let track = Track::from_input(TrackInput::titled("Intro"), SourceKind::Local);
        assert_eq!(track.to_string(), "Unknown Artist - Intro [--:--]");
    }
}
