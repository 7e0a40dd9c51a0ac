//! Media file classification.
//!
//! [`ExtensionSets::classify`] inspects a directory entry and yields a typed
//! [`MediaEntry`] from its lower-cased extension. Classification is total and
//! side-effect free: unknown extensions yield
//! [`MediaKind::Unsupported`] and are excluded from all downstream
//! processing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The media family a file belongs to, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A video container eligible for audio conversion.
    Video,
    /// An audio file carrying ID3-style tag frames (e.g. `.mp3`).
    AudioId3,
    /// An audio file carrying MP4-style tag atoms (e.g. `.m4a`).
    AudioMp4,
    /// Anything else. Never processed.
    Unsupported,
}

impl MediaKind {
    /// Whether this entry is a tag-bearing audio file.
    pub fn is_audio(self) -> bool {
        matches!(self, MediaKind::AudioId3 | MediaKind::AudioMp4)
    }
}

/// A classified directory entry.
///
/// Created per scan iteration, immutable, discarded after the file is
/// processed.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// Lower-cased extension without the leading dot. Empty if absent.
    pub extension: String,
    /// Classified media family.
    pub kind: MediaKind,
}

impl MediaEntry {
    /// Counter category for this entry (its extension family).
    pub fn category(&self) -> &str {
        if self.extension.is_empty() {
            "(none)"
        } else {
            &self.extension
        }
    }
}

/// The extension sets driving classification.
///
/// Defaults mirror the containers the tool has always handled; callers may
/// override any set through [`BatchConfig`](crate::BatchConfig).
#[derive(Debug, Clone)]
pub struct ExtensionSets {
    /// Video container extensions, candidates for audio conversion.
    pub video: BTreeSet<String>,
    /// ID3-style audio extensions.
    pub id3: BTreeSet<String>,
    /// MP4-style audio extensions.
    pub mp4: BTreeSet<String>,
}

impl Default for ExtensionSets {
    fn default() -> Self {
        let collect = |extensions: &[&str]| {
            extensions
                .iter()
                .map(|extension| extension.to_string())
                .collect::<BTreeSet<_>>()
        };
        Self {
            video: collect(&[
                "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "mpeg", "mpg", "ts", "vob",
                "m4v", "3gp",
            ]),
            id3: collect(&["mp3"]),
            mp4: collect(&["m4a", "mp4"]),
        }
    }
}

impl ExtensionSets {
    /// Classify a filesystem entry by its extension.
    ///
    /// Tag-capable audio families win over the video set when an extension
    /// (notably `mp4`) appears in both; the convert scan checks
    /// [`is_video`](ExtensionSets::is_video) directly and is unaffected.
    pub fn classify(&self, path: &Path) -> MediaEntry {
        let extension = extension_of(path);
        let kind = if self.id3.contains(&extension) {
            MediaKind::AudioId3
        } else if self.mp4.contains(&extension) {
            MediaKind::AudioMp4
        } else if self.video.contains(&extension) {
            MediaKind::Video
        } else {
            MediaKind::Unsupported
        };
        MediaEntry {
            path: path.to_path_buf(),
            extension,
            kind,
        }
    }

    /// Whether the path's extension is in the video set.
    pub fn is_video(&self, path: &Path) -> bool {
        self.video.contains(&extension_of(path))
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .unwrap_or_default()
}
