use crate::application::state::PlayerSnapshot;
use crate::core::error::SurfaceError;
use crate::core::events::{LoadToken, UiCommand};
use anyhow::Result;
use std::path::PathBuf;
use std::time::Instant;

/// Resolved, playable location of a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    Remote(url::Url),
    File(PathBuf),
}

impl std::fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceDescriptor::Remote(url) => write!(f, "{}", url),
            SourceDescriptor::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Abstraction over the audio decode/output primitive.
///
/// `load` only starts the work; completion and failures arrive later as
/// [`MediaEvent`](crate::core::events::MediaEvent)s tagged with the given token.
pub trait MediaSurface {
    /// Replace whatever is loaded with `source`
    fn load(&mut self, token: LoadToken, source: &SourceDescriptor) -> Result<(), SurfaceError>;

    /// Start or resume output of the loaded source
    fn play(&mut self) -> Result<(), SurfaceError>;

    fn pause(&mut self);

    /// Jump to an absolute position in seconds
    fn seek(&mut self, seconds: f64);

    /// Set volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);

    fn set_playback_rate(&mut self, rate: f32);

    /// Drop the loaded source, if any
    fn unload(&mut self) {}

    /// Give the surface a chance to emit time/ended events.
    /// Default implementation does nothing
    fn poll(&mut self) {}
}

/// Abstraction for persistent key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Source of the current instant, injectable so timers can be driven in tests.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Abstraction for UI rendering
pub trait UiRenderer {
    /// Initialize the UI (setup terminal, etc.)
    fn init(&mut self) -> Result<()>;

    /// Cleanup the UI (restore terminal, etc.)
    fn cleanup(&mut self) -> Result<()>;

    /// Render current state
    fn render(&mut self, snapshot: &PlayerSnapshot, message: Option<&str>) -> Result<()>;

    /// Poll for user input (non-blocking)
    fn poll_input(&mut self) -> Result<Vec<UiCommand>>;
}
