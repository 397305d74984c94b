use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::models::RepeatMode;
use crate::utils::APP_NAME;

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Terminal playlist player for streams and local files", long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive player
    Play {
        /// Playlist position to start from (defaults to the last selected track)
        #[arg(conflicts_with_all = ["album", "artist"])]
        index: Option<usize>,

        /// Start from the first track of this album
        #[arg(long, conflicts_with = "artist")]
        album: Option<String>,

        /// Start from the first track by this artist
        #[arg(long)]
        artist: Option<String>,
    },

    /// Add a stream URL, an audio file or a directory of audio files
    Add {
        /// URL, file or directory
        target: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        artist: Option<String>,

        #[arg(long)]
        album: Option<String>,

        #[arg(long)]
        genre: Option<String>,
    },

    /// Remove a track by id
    Remove { id: String },

    /// Show the playlist
    List {
        /// Only favorite tracks
        #[arg(long, conflicts_with_all = ["albums", "artists"])]
        favorites: bool,

        /// Group by album
        #[arg(long, conflicts_with = "artists")]
        albums: bool,

        /// Group by artist
        #[arg(long)]
        artists: bool,
    },

    /// Fuzzy search by title, artist, album or genre
    Search { query: String },

    /// Toggle the favorite flag of a track
    Favorite { id: String },

    /// Remove every track
    Clear,

    /// Import tracks from a JSON or M3U playlist
    Import { file: PathBuf },

    /// Export the playlist as JSON
    Export {
        /// Output file (defaults to a dated name in the current directory)
        file: Option<PathBuf>,
    },

    /// Show or set the volume (0-100)
    Volume {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        volume: Option<u8>,
    },

    /// Toggle mute
    Mute,

    /// Show or set shuffle (toggles when no value is given)
    Shuffle { enabled: Option<bool> },

    /// Show or set the repeat mode: none, one or all (cycles when omitted)
    Repeat { mode: Option<RepeatMode> },

    /// Show or set the playback rate
    Rate { rate: Option<f32> },

    /// Show listening statistics
    Stats,
}
