use crate::core::models::{Track, TrackInput};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const EXPORT_NAME: &str = "HarmonyStream Playlist";
pub const EXPORT_VERSION: &str = "1.0";

/// Exported playlist document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlaylistFile {
    pub name: String,
    pub version: String,
    pub date: DateTime<Utc>,
    pub tracks: Vec<ExportedTrack>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportedTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct ImportDocument {
    #[serde(default)]
    tracks: Vec<TrackInput>,
}

/// Reads a `.json`, `.m3u` or `.m3u8` playlist.
///
/// Only entries with both a title and a location are returned.
pub fn read_playlist_file(path: &Path) -> Result<Vec<TrackInput>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let inputs = match extension.as_str() {
        "json" => parse_json_playlist(&content)
            .with_context(|| format!("Invalid playlist JSON in {}", path.display()))?,
        "m3u" | "m3u8" => parse_m3u(&content),
        other => bail!("Unsupported playlist format '{}'", other),
    };

    Ok(inputs.into_iter().filter(is_importable).collect())
}

pub fn parse_json_playlist(content: &str) -> Result<Vec<TrackInput>> {
    let document: ImportDocument = serde_json::from_str(content)?;
    Ok(document.tracks)
}

/// Extended M3U: `#EXTINF:<seconds>,<title>` lines describe the next location.
/// Locations without one are titled after their file name.
pub fn parse_m3u(content: &str) -> Vec<TrackInput> {
    let mut inputs = Vec::new();
    let mut pending = TrackInput::default();

    for line in content.lines().map(str::trim) {
        if let Some(info) = line.strip_prefix("#EXTINF:") {
            pending = TrackInput::default();
            if let Some((length, title)) = info.split_once(',') {
                pending.duration = length
                    .split_whitespace()
                    .next()
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|d| *d > 0.0);
                let title = title.trim();
                if !title.is_empty() {
                    pending.title = Some(title.to_string());
                }
            }
        } else if !line.is_empty() && !line.starts_with('#') {
            let mut input = std::mem::take(&mut pending);
            if input.title.is_none() {
                input.title = title_from_location(line);
            }
            input.url = Some(line.to_string());
            inputs.push(input);
        }
    }

    inputs
}

pub(crate) fn title_from_location(location: &str) -> Option<String> {
    let name = location.rsplit(['/', '\\']).next()?;
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
    (!stem.is_empty()).then(|| stem.to_string())
}

fn is_importable(input: &TrackInput) -> bool {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    present(&input.title) && present(&input.url)
}

pub fn export_document(tracks: &[Track], date: DateTime<Utc>) -> PlaylistFile {
    PlaylistFile {
        name: EXPORT_NAME.to_string(),
        version: EXPORT_VERSION.to_string(),
        date,
        tracks: tracks
            .iter()
            .map(|t| ExportedTrack {
                title: t.title.clone(),
                artist: t.artist.clone(),
                album: t.album.clone(),
                duration: t.duration_seconds,
                url: t.location.clone(),
            })
            .collect(),
    }
}

pub fn export_json(tracks: &[Track]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export_document(tracks, Utc::now()))?)
}

pub fn write_playlist_file(path: &Path, tracks: &[Track]) -> Result<()> {
    let json = export_json(tracks)?;
    fs::write(path, json).with_context(|| format!("Could not write {}", path.display()))?;
    Ok(())
}

/// `harmonystream-playlist-<YYYY-MM-DD>.json`
pub fn default_export_name(date: DateTime<Utc>) -> String {
    format!("harmonystream-playlist-{}.json", date.format("%Y-%m-%d"))
}
