use crate::application::state::Preferences;
use crate::core::models::PlaybackStats;
use crate::core::traits::KeyValueStore;
use crate::modules::library::catalog::PlaylistData;
use tracing::{debug, warn};

pub const PLAYLIST_KEY: &str = "playlist_data";
pub const VOLUME_KEY: &str = "player_volume";
pub const REPEAT_KEY: &str = "player_repeat";
pub const SHUFFLE_KEY: &str = "player_shuffle";
pub const RATE_KEY: &str = "player_rate";
pub const STATS_KEY: &str = "playback_stats";

/// Typed, best-effort access to the key/value store.
///
/// Nothing here ever fails: read errors and malformed values fall back to
/// defaults, write errors are logged and dropped.
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load_playlist(&self) -> PlaylistData {
        self.read_json(PLAYLIST_KEY).unwrap_or_default()
    }

    pub fn save_playlist(&mut self, data: &PlaylistData) {
        self.write_json(PLAYLIST_KEY, data);
    }

    pub fn load_stats(&self) -> PlaybackStats {
        self.read_json(STATS_KEY).unwrap_or_default()
    }

    pub fn save_stats(&mut self, stats: &PlaybackStats) {
        self.write_json(STATS_KEY, stats);
    }

    /// Each preference is validated independently.
    pub fn load_preferences(&self) -> Preferences {
        let defaults = Preferences::default();

        Preferences {
            volume: self
                .read_parsed(VOLUME_KEY, Preferences::parse_volume)
                .unwrap_or(defaults.volume),
            repeat_mode: self
                .read_parsed(REPEAT_KEY, Preferences::parse_repeat)
                .unwrap_or(defaults.repeat_mode),
            shuffle_enabled: self
                .read_parsed(SHUFFLE_KEY, Preferences::parse_shuffle)
                .unwrap_or(defaults.shuffle_enabled),
            playback_rate: self
                .read_parsed(RATE_KEY, Preferences::parse_rate)
                .unwrap_or(defaults.playback_rate),
        }
    }

    pub fn save_volume(&mut self, volume: f32) {
        self.write_raw(VOLUME_KEY, &volume.to_string());
    }

    pub fn save_repeat(&mut self, mode: crate::core::models::RepeatMode) {
        self.write_raw(REPEAT_KEY, mode.as_str());
    }

    pub fn save_shuffle(&mut self, enabled: bool) {
        self.write_raw(SHUFFLE_KEY, if enabled { "true" } else { "false" });
    }

    pub fn save_rate(&mut self, rate: f32) {
        self.write_raw(RATE_KEY, &rate.to_string());
    }

    pub fn save_preferences(&mut self, prefs: &Preferences) {
        self.save_volume(prefs.volume);
        self.save_repeat(prefs.repeat_mode);
        self.save_shuffle(prefs.shuffle_enabled);
        self.save_rate(prefs.playback_rate);
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "could not read stored value");
                None
            }
        }
    }

    fn read_parsed<T>(&self, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.read_raw(key)?;
        let parsed = parse(&raw);
        if parsed.is_none() {
            warn!(key, value = %raw, "ignoring invalid stored value");
        }
        parsed
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored document is malformed, using defaults");
                None
            }
        }
    }

    fn write_json<T: serde::Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.write_raw(key, &json),
            Err(e) => warn!(key, error = %e, "could not serialize value"),
        }
    }

    fn write_raw(&mut self, key: &str, value: &str) {
        match self.store.set(key, value) {
            Ok(()) => debug!(key, "persisted"),
            Err(e) => warn!(key, error = %e, "could not persist value"),
        }
    }
}
