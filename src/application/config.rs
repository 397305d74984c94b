use crate::modules::storage::json_backend::default_storage_dir;
use crate::utils::APP_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.toml";

/// Settings read from `config.toml`. Every field is optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where `storage.json` lives; defaults to the config directory.
    pub storage_dir: Option<PathBuf>,
    pub load_timeout_secs: f64,
    pub error_advance_delay_ms: u64,
    pub max_auto_advance: u32,
    pub seek_step_secs: f64,
    pub search_min_score: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            load_timeout_secs: 15.0,
            error_advance_delay_ms: 2000,
            max_auto_advance: 3,
            seek_step_secs: 10.0,
            search_min_score: 0,
        }
    }
}

impl AppConfig {
    /// Reads the config at `path`, or the default location when `None`.
    ///
    /// A missing default file yields defaults; an explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path()?, false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_storage_dir(),
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        let defaults = ControllerSettings::default();
        ControllerSettings {
            load_timeout: positive_secs(self.load_timeout_secs).unwrap_or(defaults.load_timeout),
            error_advance_delay: Duration::from_millis(self.error_advance_delay_ms),
            max_auto_advance: self.max_auto_advance,
            seek_step: if self.seek_step_secs.is_finite() && self.seek_step_secs > 0.0 {
                self.seek_step_secs
            } else {
                defaults.seek_step
            },
            search_min_score: self.search_min_score,
        }
    }
}

/// Timing knobs of the playback controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// How long a load may stay pending before it counts as failed
    pub load_timeout: Duration,
    /// Pause before skipping past a track that failed to play
    pub error_advance_delay: Duration,
    /// Consecutive failures tolerated before auto-advance gives up
    pub max_auto_advance: u32,
    /// Seconds moved by one seek step
    pub seek_step: f64,
    /// Fuzzy matches scoring below this are hidden
    pub search_min_score: i64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(15),
            error_advance_delay: Duration::from_millis(2000),
            max_auto_advance: 3,
            seek_step: 10.0,
            search_min_score: 0,
        }
    }
}

fn positive_secs(secs: f64) -> Option<Duration> {
    (secs.is_finite() && secs > 0.0).then(|| Duration::from_secs_f64(secs))
}

/// `<config_dir>/harmony-stream/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("Could not find config directory")?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let config = AppConfig::from_toml(
            "max_auto_advance = 5\nstorage_dir = \"/tmp/hs\"\n",
        )
        .unwrap();
        assert_eq!(config.max_auto_advance, 5);
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/hs")));
        assert_eq!(config.error_advance_delay_ms, 2000);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(AppConfig::from_toml("max_auto_advance = \"many\"").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "seek_step_secs = 5.0\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.controller_settings().seek_step, 5.0);
    }

    #[test]
    fn nonsensical_values_fall_back_in_settings() {
        let config = AppConfig {
            load_timeout_secs: -1.0,
            seek_step_secs: f64::NAN,
            ..AppConfig::default()
        };
        let settings = config.controller_settings();
        assert_eq!(settings.load_timeout, Duration::from_secs(15));
        assert_eq!(settings.seek_step, 10.0);
    }
}
