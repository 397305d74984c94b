use crate::core::models::Track;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Result of a fuzzy search operation
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    /// Position in the catalog
    pub index: usize,
    pub track: &'a Track,
    /// Match score (higher is better)
    pub score: i64,
}

/// Search engine for finding tracks with fuzzy matching
pub struct SearchEngine {
    matcher: SkimMatcherV2,
    min_score: i64,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::with_min_score(0)
    }

    /// Matches scoring below `min_score` are discarded.
    pub fn with_min_score(min_score: i64) -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
            min_score,
        }
    }

    /// Perform a fuzzy search across the catalog
    ///
    /// Results are sorted by relevance (best matches first); ties keep catalog
    /// order. An empty query returns every track in catalog order.
    pub fn search<'a>(&self, tracks: &'a [Track], query: &str) -> Vec<SearchResult<'a>> {
        let query = query.trim();
        if query.is_empty() {
            return tracks
                .iter()
                .enumerate()
                .map(|(index, track)| SearchResult {
                    index,
                    track,
                    score: 0,
                })
                .collect();
        }

        let query_lower = query.to_lowercase();

        let mut results: Vec<SearchResult> = tracks
            .iter()
            .enumerate()
            .filter_map(|(index, track)| {
                self.score_track(track, &query_lower)
                    .filter(|score| *score >= self.min_score)
                    .map(|score| SearchResult {
                        index,
                        track,
                        score,
                    })
            })
            .collect();

        // Stable sort keeps catalog order between equal scores.
        results.sort_by(|a, b| b.score.cmp(&a.score));

        results
    }

    /// Best score across title, artist, album, genre and the combined key.
    fn score_track(&self, track: &Track, query: &str) -> Option<i64> {
        let combined = format!(
            "{} {} {} {}",
            track.title, track.artist, track.album, track.genre
        )
        .to_lowercase();

        [
            track.title.as_str(),
            track.artist.as_str(),
            track.album.as_str(),
            track.genre.as_str(),
            combined.as_str(),
        ]
        .into_iter()
        .filter_map(|field| self.matcher.fuzzy_match(field, query))
        .max()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}
