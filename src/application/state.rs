use crate::core::models::{PlaybackStats, RepeatMode, Track, TransportState};
use serde::Serialize;

pub const DEFAULT_VOLUME: f32 = 0.7;
pub const DEFAULT_PLAYBACK_RATE: f32 = 1.0;

/// Playback preferences restored at start-up.
///
/// Each field is validated on its own; a bad stored value only resets that field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preferences {
    pub volume: f32,
    pub repeat_mode: RepeatMode,
    pub shuffle_enabled: bool,
    pub playback_rate: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            repeat_mode: RepeatMode::Off,
            shuffle_enabled: false,
            playback_rate: DEFAULT_PLAYBACK_RATE,
        }
    }
}

impl Preferences {
    /// Parses a stored volume; non-numbers are rejected, numbers are clamped.
    pub fn parse_volume(raw: &str) -> Option<f32> {
        raw.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
    }

    pub fn parse_repeat(raw: &str) -> Option<RepeatMode> {
        // Stored either bare (`all`) or JSON-quoted (`"all"`).
        raw.trim().trim_matches('"').parse().ok()
    }

    pub fn parse_shuffle(raw: &str) -> Option<bool> {
        serde_json::from_str::<bool>(raw.trim()).ok()
    }

    pub fn parse_rate(raw: &str) -> Option<f32> {
        raw.trim()
            .parse::<f32>()
            .ok()
            .filter(|r| r.is_finite() && *r > 0.0)
    }
}

/// State of the playback session, owned and mutated only by the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSession {
    /// Selected position in the catalog; `None` when nothing is selected.
    pub current_index: Option<usize>,
    pub transport: TransportState,
    pub current_time: f64,
    /// 0 while unknown.
    pub duration: f64,
    pub volume: f32,
    pub is_muted: bool,
    /// Last non-zero volume, restored on unmute.
    pub pre_mute_volume: f32,
    pub playback_rate: f32,
    pub repeat_mode: RepeatMode,
    pub shuffle_enabled: bool,
}

impl PlaybackSession {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            current_index: None,
            transport: TransportState::Idle,
            current_time: 0.0,
            duration: 0.0,
            volume: prefs.volume,
            is_muted: prefs.volume == 0.0,
            pre_mute_volume: if prefs.volume > 0.0 {
                prefs.volume
            } else {
                DEFAULT_VOLUME
            },
            playback_rate: prefs.playback_rate,
            repeat_mode: prefs.repeat_mode,
            shuffle_enabled: prefs.shuffle_enabled,
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            volume: self.volume,
            repeat_mode: self.repeat_mode,
            shuffle_enabled: self.shuffle_enabled,
            playback_rate: self.playback_rate,
        }
    }

    /// Index as stored: -1 when nothing is selected.
    pub fn current_index_raw(&self) -> i64 {
        self.current_index.map(|i| i as i64).unwrap_or(-1)
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::from_preferences(&Preferences::default())
    }
}

/// Read-only copy of everything a UI needs to draw the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub session: PlaybackSession,
    pub current_track: Option<Track>,
    pub is_favorite: bool,
    pub catalog_len: usize,
    pub stats: PlaybackStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_parsing_clamps_and_rejects_garbage() {
        assert_eq!(Preferences::parse_volume("0.25"), Some(0.25));
        assert_eq!(Preferences::parse_volume("1.7"), Some(1.0));
        assert_eq!(Preferences::parse_volume("-2"), Some(0.0));
        assert_eq!(Preferences::parse_volume("NaN"), None);
        assert_eq!(Preferences::parse_volume("loud"), None);
    }

    #[test]
    fn repeat_parsing_accepts_quoted_values() {
        assert_eq!(Preferences::parse_repeat("one"), Some(RepeatMode::One));
        assert_eq!(Preferences::parse_repeat("\"all\""), Some(RepeatMode::All));
        assert_eq!(Preferences::parse_repeat("twice"), None);
    }

    #[test]
    fn shuffle_and_rate_parsing() {
        assert_eq!(Preferences::parse_shuffle("true"), Some(true));
        assert_eq!(Preferences::parse_shuffle("false"), Some(false));
        assert_eq!(Preferences::parse_shuffle("yes"), None);
        assert_eq!(Preferences::parse_rate("1.5"), Some(1.5));
        assert_eq!(Preferences::parse_rate("0"), None);
        assert_eq!(Preferences::parse_rate("-1"), None);
    }

    #[test]
    fn session_from_muted_preferences_keeps_a_restorable_volume() {
        let prefs = Preferences {
            volume: 0.0,
            ..Preferences::default()
        };
        let session = PlaybackSession::from_preferences(&prefs);
        assert!(session.is_muted);
        assert_eq!(session.pre_mute_volume, DEFAULT_VOLUME);
        assert_eq!(session.current_index_raw(), -1);
    }
}
