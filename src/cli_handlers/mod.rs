mod library;
mod list;
mod play;
mod playlist;
mod search;
mod settings;
mod stats;

pub use library::{AddCommand, ClearCommand, FavoriteCommand, RemoveCommand};
pub use list::{ListCommand, ListView};
pub use play::{PlayCommand, StartAt};
pub use playlist::{ExportCommand, ImportCommand};
pub use search::SearchCommand;
pub use settings::{MuteCommand, RateCommand, RepeatCommand, ShuffleCommand, VolumeCommand};
pub use stats::StatsCommand;

use crate::application::config::AppConfig;
use crate::cli::Commands;
use crate::core::traits::MediaSurface;
use crate::modules::playback::controller::PlaybackController;
use crate::modules::playback::silent_surface::SilentSurface;
use crate::modules::storage::json_backend::JsonStorageBackend;
use anyhow::Result;

/// Every CLI command implements this trait.
///
/// Commands own their arguments and are consumed on execution, so they run exactly once.
pub trait CliCommand {
    fn execute(self: Box<Self>) -> Result<()>;
}

/// Converts a parsed [`Commands`] variant into a boxed [`CliCommand`] ready to execute.
pub fn from_cli(cmd: Commands, config: AppConfig) -> Box<dyn CliCommand> {
    match cmd {
        Commands::Play {
            index,
            album,
            artist,
        } => {
            let start = match (index, album, artist) {
                (_, Some(album), _) => StartAt::Album(album),
                (_, _, Some(artist)) => StartAt::Artist(artist),
                (Some(index), _, _) => StartAt::Index(index),
                (None, None, None) => StartAt::Resume,
            };
            Box::new(PlayCommand { start, config })
        }
        Commands::Add {
            target,
            title,
            artist,
            album,
            genre,
        } => Box::new(AddCommand {
            target,
            title,
            artist,
            album,
            genre,
            config,
        }),
        Commands::Remove { id } => Box::new(RemoveCommand { id, config }),
        Commands::List {
            favorites,
            albums,
            artists,
        } => {
            let view = if favorites {
                ListView::Favorites
            } else if albums {
                ListView::Albums
            } else if artists {
                ListView::Artists
            } else {
                ListView::Tracks
            };
            Box::new(ListCommand { view, config })
        }
        Commands::Search { query } => Box::new(SearchCommand { query, config }),
        Commands::Favorite { id } => Box::new(FavoriteCommand { id, config }),
        Commands::Clear => Box::new(ClearCommand { config }),
        Commands::Import { file } => Box::new(ImportCommand { file, config }),
        Commands::Export { file } => Box::new(ExportCommand { file, config }),
        Commands::Volume { volume } => Box::new(VolumeCommand { volume, config }),
        Commands::Mute => Box::new(MuteCommand { config }),
        Commands::Shuffle { enabled } => Box::new(ShuffleCommand { enabled, config }),
        Commands::Repeat { mode } => Box::new(RepeatCommand { mode, config }),
        Commands::Rate { rate } => Box::new(RateCommand { rate, config }),
        Commands::Stats => Box::new(StatsCommand { config }),
    }
}

/// Controller over the configured store, driving `surface`.
pub(crate) fn open_controller(
    config: &AppConfig,
    surface: Box<dyn MediaSurface>,
) -> Result<PlaybackController> {
    let storage = JsonStorageBackend::open_in(&config.storage_dir()?)?;
    Ok(PlaybackController::new(
        surface,
        Box::new(storage),
        config.controller_settings(),
    ))
}

/// Controller for commands that only touch the playlist or preferences.
pub(crate) fn open_silent_controller(config: &AppConfig) -> Result<PlaybackController> {
    open_controller(config, Box::new(SilentSurface))
}
