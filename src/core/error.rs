use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by the playback controller to the calling layer.
///
/// Catalog and navigator operations never produce these; they report
/// "nothing to do" as `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    /// The track has no usable source (missing URL, missing file, bad path).
    #[error("track cannot be resolved: {0}")]
    TrackUnresolvable(String),

    /// The output refused to start (autoplay or permission policy).
    #[error("playback not allowed: {0}")]
    PlaybackNotAllowed(String),

    /// The media surface reported an error while loading or decoding.
    #[error("media error: {0}")]
    MediaDecode(String),

    /// A load did not complete within the configured timeout.
    #[error("track load timed out after {0:?}")]
    LoadTimedOut(Duration),

    /// Navigation was requested with no tracks in the catalog.
    #[error("the playlist is empty")]
    EmptyCatalog,

    /// An index did not point into the catalog.
    #[error("invalid index {index} (playlist has {len} tracks)")]
    InvalidIndex { index: usize, len: usize },
}

/// Stable classification of a [`PlayerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TrackUnresolvable,
    PlaybackNotAllowed,
    MediaDecodeError,
    LoadTimeout,
    EmptyCatalog,
    InvalidIndex,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TrackUnresolvable => "track-unresolvable",
            ErrorKind::PlaybackNotAllowed => "playback-not-allowed",
            ErrorKind::MediaDecodeError => "media-decode-error",
            ErrorKind::LoadTimeout => "load-timeout",
            ErrorKind::EmptyCatalog => "empty-catalog",
            ErrorKind::InvalidIndex => "invalid-index",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PlayerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlayerError::TrackUnresolvable(_) => ErrorKind::TrackUnresolvable,
            PlayerError::PlaybackNotAllowed(_) => ErrorKind::PlaybackNotAllowed,
            PlayerError::MediaDecode(_) => ErrorKind::MediaDecodeError,
            PlayerError::LoadTimedOut(_) => ErrorKind::LoadTimeout,
            PlayerError::EmptyCatalog => ErrorKind::EmptyCatalog,
            PlayerError::InvalidIndex { .. } => ErrorKind::InvalidIndex,
        }
    }

    /// Whether this failure means the current track could not be played
    /// (and auto-advance should be considered).
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            PlayerError::TrackUnresolvable(_)
                | PlayerError::MediaDecode(_)
                | PlayerError::LoadTimedOut(_)
        )
    }
}

/// Errors returned by a [`MediaSurface`](crate::core::traits::MediaSurface) command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("source unavailable: {0}")]
    Unresolvable(String),

    #[error("playback rejected: {0}")]
    NotAllowed(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

impl From<SurfaceError> for PlayerError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::Unresolvable(msg) => PlayerError::TrackUnresolvable(msg),
            SurfaceError::NotAllowed(msg) => PlayerError::PlaybackNotAllowed(msg),
            SurfaceError::Decode(msg) => PlayerError::MediaDecode(msg),
        }
    }
}
