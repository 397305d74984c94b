use crate::core::models::Track;
use crate::modules::library::catalog::TrackCatalog;
use rand::seq::IndexedRandom;

/// A navigation result: the track to play and where it sits in the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavTarget<'a> {
    pub index: usize,
    pub track: &'a Track,
}

/// Which way the user (or the end handler) wants to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Picks the next/previous track from the catalog.
///
/// Sequential `next` wraps to the first track after the last one, while
/// `previous` stops at the first track. Shuffled `next` picks uniformly
/// among every track except the current one, so the same track is never
/// played twice in a row unless it is the only one. Repeat modes are not
/// handled here.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueNavigator;

impl QueueNavigator {
    pub fn new() -> Self {
        Self
    }

    pub fn step<'a>(
        &self,
        direction: Direction,
        catalog: &'a TrackCatalog,
        current_index: Option<usize>,
        shuffle_enabled: bool,
    ) -> Option<NavTarget<'a>> {
        match direction {
            Direction::Next => self.next(catalog, current_index, shuffle_enabled),
            Direction::Previous => self.previous(catalog, current_index),
        }
    }

    /// Returns `None` only when the catalog is empty.
    pub fn next<'a>(
        &self,
        catalog: &'a TrackCatalog,
        current_index: Option<usize>,
        shuffle_enabled: bool,
    ) -> Option<NavTarget<'a>> {
        let len = catalog.len();
        if len == 0 {
            return None;
        }

        let index = if shuffle_enabled {
            Self::random_index_except(len, current_index)?
        } else {
            // No current track behaves like position -1.
            current_index.map(|idx| (idx + 1) % len).unwrap_or(0)
        };

        catalog.get(index).map(|track| NavTarget { index, track })
    }

    /// Returns `None` at the first track, with no current track, or on an empty catalog.
    pub fn previous<'a>(
        &self,
        catalog: &'a TrackCatalog,
        current_index: Option<usize>,
    ) -> Option<NavTarget<'a>> {
        let index = current_index.filter(|idx| *idx > 0)? - 1;
        catalog.get(index).map(|track| NavTarget { index, track })
    }

    fn random_index_except(len: usize, current_index: Option<usize>) -> Option<usize> {
        if len == 1 {
            return Some(0);
        }

        let candidates: Vec<usize> = (0..len).filter(|i| Some(*i) != current_index).collect();
        let mut rng = rand::rng();
        candidates.choose(&mut rng).copied()
    }
}
