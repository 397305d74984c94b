use crate::core::error::PlayerError;
use crate::core::models::{RepeatMode, Track, TransportState};

/// Identifies one `load` request to the media surface.
///
/// Every load gets a fresh token; events carrying an older token belong to a
/// superseded track and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(pub u64);

/// Events emitted by a media surface for a given load.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The source is decodable and its length is known (0 if not).
    LoadedMetadata { token: LoadToken, duration: f64 },

    /// Playback position advanced.
    TimeUpdate { token: LoadToken, position: f64 },

    /// The track played to its natural end.
    Ended { token: LoadToken },

    /// Loading or decoding failed.
    Error { token: LoadToken, reason: String },
}

impl MediaEvent {
    pub fn token(&self) -> LoadToken {
        match self {
            MediaEvent::LoadedMetadata { token, .. }
            | MediaEvent::TimeUpdate { token, .. }
            | MediaEvent::Ended { token }
            | MediaEvent::Error { token, .. } => *token,
        }
    }
}

/// Notifications published by the playback controller to its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Transport moved to a new state
    TransportChanged { state: TransportState },

    /// A different track became current (or none)
    TrackChanged {
        index: Option<usize>,
        track: Option<Track>,
    },

    /// Position or duration changed
    PositionChanged { current: f64, duration: f64 },

    VolumeChanged { volume: f32, muted: bool },

    RateChanged { rate: f32 },

    RepeatChanged { mode: RepeatMode },

    ShuffleChanged { enabled: bool },

    /// Tracks were added, removed or cleared
    CatalogChanged { len: usize },

    FavoriteChanged { id: String, favorite: bool },

    /// A failure the user should hear about
    Failure { error: PlayerError },

    /// An automatic skip was scheduled after a failure
    AutoAdvanceScheduled { attempt: u32 },
}

/// Intent coming from the interactive UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    SeekForward,
    SeekBackward,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
    ToggleFavorite,
    FasterRate,
    SlowerRate,
    Quit,
}

/// Sender half handed to media surfaces
pub type MediaEventSender = crossbeam_channel::Sender<MediaEvent>;

/// Receiver half drained by the application loop
pub type MediaEventReceiver = crossbeam_channel::Receiver<MediaEvent>;

/// Subscription to controller notifications
pub type PlayerEventReceiver = crossbeam_channel::Receiver<PlayerEvent>;
