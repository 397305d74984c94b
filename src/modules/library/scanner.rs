use crate::core::models::TrackInput;
use crate::utils::SUPPORTED_EXTENSIONS;
use anyhow::{Result, bail};
use lofty::prelude::*;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Collects every supported audio file under `root`, in path order.
pub fn scan_directory(root: &Path) -> Result<Vec<TrackInput>> {
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let inputs = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && is_audio_file(e.path()))
        .map(|entry| read_track_input(entry.path()))
        .collect();

    Ok(inputs)
}

/// Metadata for a single file. Unreadable tags fall back to the file name.
pub fn read_track_input(path: &Path) -> TrackInput {
    let mut input = TrackInput {
        title: path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned()),
        url: Some(path.to_string_lossy().into_owned()),
        ..TrackInput::default()
    };

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let properties = tagged.properties();
            let duration = properties.duration().as_secs_f64();
            if duration > 0.0 {
                input.duration = Some(duration);
            }
            input.bitrate = properties
                .audio_bitrate()
                .map(|kbps| format!("{} kbps", kbps));

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(title) = tag.title() {
                    input.title = Some(title.into_owned());
                }
                input.artist = tag.artist().map(|s| s.into_owned());
                input.album = tag.album().map(|s| s.into_owned());
                input.genre = tag.genre().map(|s| s.into_owned());
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    input
}

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn recognises_supported_extensions() {
        assert!(is_audio_file(Path::new("a/b/song.MP3")));
        assert!(is_audio_file(Path::new("x.flac")));
        assert!(is_audio_file(Path::new("x.m4a")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("README")));
    }

    #[test]
    fn scan_skips_other_files_and_falls_back_to_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.mp3"), b"not really audio").unwrap();
        fs::write(dir.path().join("sub").join("a.ogg"), b"nope").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();

        let inputs = scan_directory(dir.path()).unwrap();
        let titles: Vec<String> = inputs.iter().filter_map(|i| i.title.clone()).collect();
        assert_eq!(titles, vec!["b", "a"]);
        assert!(inputs[0].url.as_deref().unwrap().ends_with("b.mp3"));
        assert_eq!(inputs[0].duration, None);
    }

    #[test]
    fn scanning_a_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("x.mp3");
        fs::write(&file, b"").unwrap();
        assert!(scan_directory(&file).is_err());
    }
}
