use crate::core::models::{SourceKind, Track, TrackInput};
use crate::modules::library::search_engine::SearchEngine;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

/// Persisted shape of the catalog plus the selected position.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistData {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub favorites: Vec<String>,
    /// -1 when nothing is selected.
    #[serde(default = "no_index")]
    pub current_index: i64,
}

fn no_index() -> i64 {
    -1
}

/// Tracks sharing an album title.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumGroup {
    pub title: String,
    /// Artist of the first track seen on this album
    pub artist: String,
    pub year: String,
    pub cover: Option<String>,
    pub track_ids: Vec<String>,
}

/// Tracks sharing an artist name.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistGroup {
    pub name: String,
    pub track_ids: Vec<String>,
    pub albums: BTreeSet<String>,
}

/// Ordered collection of tracks, favorites and album/artist groupings.
///
/// Insertion order is the sequential playback order. Groupings are rebuilt
/// from scratch after every mutation of the sequence.
pub struct TrackCatalog {
    tracks: Vec<Track>,
    favorites: HashSet<String>,
    albums: BTreeMap<String, AlbumGroup>,
    artists: BTreeMap<String, ArtistGroup>,
    search_engine: SearchEngine,
}

impl TrackCatalog {
    pub fn new() -> Self {
        Self::with_search_engine(SearchEngine::new())
    }

    pub fn with_search_engine(search_engine: SearchEngine) -> Self {
        Self {
            tracks: Vec::new(),
            favorites: HashSet::new(),
            albums: BTreeMap::new(),
            artists: BTreeMap::new(),
            search_engine,
        }
    }

    /// Rebuilds a catalog from stored data.
    ///
    /// Tracks without an id get one, duplicate ids are dropped (first wins) and
    /// favorites that reference no track are discarded.
    pub fn from_data(data: PlaylistData, search_engine: SearchEngine) -> Self {
        let mut catalog = Self::with_search_engine(search_engine);
        let mut seen = HashSet::new();

        for mut track in data.tracks {
            if track.id.trim().is_empty() {
                track.id = crate::core::models::generate_track_id();
            }
            if !seen.insert(track.id.clone()) {
                warn!(id = %track.id, "dropping stored track with duplicate id");
                continue;
            }
            track.duration_seconds = crate::core::models::sanitize_seconds(track.duration_seconds);
            catalog.tracks.push(track);
        }

        catalog.favorites = data
            .favorites
            .into_iter()
            .filter(|id| seen.contains(id))
            .collect();

        catalog.rebuild_groupings();
        catalog
    }

    /// Snapshot for persistence; favorites are listed in catalog order.
    pub fn to_data(&self, current_index: Option<usize>) -> PlaylistData {
        PlaylistData {
            tracks: self.tracks.clone(),
            favorites: self.favorites().iter().map(|t| t.id.clone()).collect(),
            current_index: current_index.map(|i| i as i64).unwrap_or(-1),
        }
    }

    // ── Sequence ──────────────────────────────────────────────────────────────

    /// Appends a new track built from `input`.
    pub fn add_track(&mut self, input: TrackInput, source_kind: SourceKind) -> Track {
        let mut track = Track::from_input(input, source_kind);
        // Ids must stay unique even when the caller supplies one.
        while self.index_of(&track.id).is_some() {
            track.id = crate::core::models::generate_track_id();
        }

        debug!(id = %track.id, title = %track.title, "track added");
        self.tracks.push(track.clone());
        self.rebuild_groupings();
        track
    }

    /// Removes a track by id, returning its former index and the track.
    pub fn remove_track(&mut self, id: &str) -> Option<(usize, Track)> {
        let index = self.index_of(id)?;
        let removed = self.tracks.remove(index);
        self.favorites.remove(&removed.id);
        self.rebuild_groupings();

        debug!(id = %removed.id, index, "track removed");
        Some((index, removed))
    }

    /// Empties the catalog; returns how many tracks were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.tracks.len();
        self.tracks.clear();
        self.favorites.clear();
        self.rebuild_groupings();
        count
    }

    /// Counts one activation of the track at `index`.
    pub fn record_play(&mut self, index: usize) -> Option<&Track> {
        let track = self.tracks.get_mut(index)?;
        track.play_count = track.play_count.saturating_add(1);
        Some(&*track)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Sum of known track durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.tracks.iter().map(|t| t.duration_seconds).sum()
    }

    // ── Favorites ─────────────────────────────────────────────────────────────

    /// Flips the favorite flag and returns the new state.
    ///
    /// Unknown ids are never marked as favorites.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        if self.favorites.remove(id) {
            return false;
        }
        if self.index_of(id).is_none() {
            return false;
        }
        self.favorites.insert(id.to_string());
        true
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Favorite tracks in catalog order.
    pub fn favorites(&self) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|t| self.favorites.contains(&t.id))
            .collect()
    }

    // ── Search & groupings ────────────────────────────────────────────────────

    /// Fuzzy match over title/artist/album/genre, best first.
    pub fn search(&self, query: &str) -> Vec<(usize, &Track)> {
        self.search_engine
            .search(&self.tracks, query)
            .into_iter()
            .map(|result| (result.index, result.track))
            .collect()
    }

    pub fn albums(&self) -> impl Iterator<Item = &AlbumGroup> {
        self.albums.values()
    }

    pub fn artists(&self) -> impl Iterator<Item = &ArtistGroup> {
        self.artists.values()
    }

    pub fn album(&self, title: &str) -> Option<&AlbumGroup> {
        self.albums.get(title)
    }

    pub fn artist(&self, name: &str) -> Option<&ArtistGroup> {
        self.artists.get(name)
    }

    /// Index of the first track on `album`.
    pub fn first_index_of_album(&self, album: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.album == album)
    }

    /// Index of the first track by `artist`.
    pub fn first_index_of_artist(&self, artist: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.artist == artist)
    }

    fn rebuild_groupings(&mut self) {
        self.albums.clear();
        self.artists.clear();

        for track in &self.tracks {
            self.albums
                .entry(track.album.clone())
                .or_insert_with(|| AlbumGroup {
                    title: track.album.clone(),
                    artist: track.artist.clone(),
                    year: track.year.clone(),
                    cover: track.cover.clone(),
                    track_ids: Vec::new(),
                })
                .track_ids
                .push(track.id.clone());

            let artist = self
                .artists
                .entry(track.artist.clone())
                .or_insert_with(|| ArtistGroup {
                    name: track.artist.clone(),
                    track_ids: Vec::new(),
                    albums: BTreeSet::new(),
                });
            artist.track_ids.push(track.id.clone());
            artist.albums.insert(track.album.clone());
        }
    }
}

impl Default for TrackCatalog {
    fn default() -> Self {
        Self::new()
    }
}
