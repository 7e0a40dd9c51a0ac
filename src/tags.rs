//! Tag container adapters.
//!
//! [`TagStore`] is the capability seam over the two supported tag container
//! families: ID3-style frames and MP4-style atoms. The production
//! implementation, [`LoftyTagStore`], is backed by the
//! [`lofty`](https://crates.io/crates/lofty) crate and exposes exactly two
//! operations per family: read the generic artist/title keys, and strip all
//! embedded tags.
//!
//! # Safety caveat
//!
//! [`TagStore::strip`] mutates files in place with no backup. This is
//! irreversible by design: directories handed to the strip operation must be
//! treated as disposable staging areas.

use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, TagType};

use crate::classify::{MediaEntry, MediaKind};
use crate::error::TunedeckError;

/// Generic artist/title metadata read from a tag container.
///
/// Absent fields signal missing tag data, which is distinct from an empty
/// string: values that are empty after trimming are normalized to `None`.
#[derive(Debug, Clone, Default)]
pub struct TagRecord {
    /// All artist values joined with `" / "` in list order.
    pub artist: Option<String>,
    /// The first title value.
    pub title: Option<String>,
    /// Whether any tag block was present at all.
    pub present: bool,
}

impl TagRecord {
    /// Both fields required for renaming are available.
    pub fn is_complete(&self) -> bool {
        self.artist.is_some() && self.title.is_some()
    }

    /// Names of the required fields that are missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.artist.is_none() {
            missing.push("artist");
        }
        if self.title.is_none() {
            missing.push("title");
        }
        missing
    }
}

/// Read/strip capability over a tag container.
///
/// Implementations must be polymorphic over the entry's
/// [`MediaKind`](crate::MediaKind): the same call works for ID3-style and
/// MP4-style files.
pub trait TagStore {
    /// Read the generic artist/title keys from `entry`.
    ///
    /// Fails with [`TunedeckError::TagUnparsable`] when the container cannot
    /// be parsed; callers treat that as a per-file skip, not a fatal error.
    fn read(&self, entry: &MediaEntry) -> Result<TagRecord, TunedeckError>;

    /// Remove all embedded tag frames/atoms and persist the file.
    ///
    /// Returns `Ok(false)` when no tag block is present (a no-op, not an
    /// error) so callers can distinguish "nothing to do" from "unwritable".
    fn strip(&self, entry: &MediaEntry) -> Result<bool, TunedeckError>;
}

/// [`TagStore`] implementation backed by `lofty`.
#[derive(Debug, Default)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    /// Create a new store.
    pub fn new() -> Self {
        Self
    }

    fn tag_type(kind: MediaKind) -> Option<TagType> {
        match kind {
            MediaKind::AudioId3 => Some(TagType::Id3v2),
            MediaKind::AudioMp4 => Some(TagType::Mp4Ilst),
            _ => None,
        }
    }
}

impl TagStore for LoftyTagStore {
    fn read(&self, entry: &MediaEntry) -> Result<TagRecord, TunedeckError> {
        log::debug!("Reading tags from {}", entry.path.display());
        let tagged = Probe::open(&entry.path)
            .and_then(|probe| probe.read())
            .map_err(|_| TunedeckError::TagUnparsable {
                path: entry.path.clone(),
            })?;

        let Some(tag) = tagged.primary_tag() else {
            return Ok(TagRecord::default());
        };

        let artists: Vec<&str> = tag
            .get_strings(&ItemKey::TrackArtist)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect();
        let artist = if artists.is_empty() {
            None
        } else {
            Some(artists.join(" / "))
        };
        let title = tag
            .get_string(&ItemKey::TrackTitle)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(TagRecord {
            artist,
            title,
            present: true,
        })
    }

    fn strip(&self, entry: &MediaEntry) -> Result<bool, TunedeckError> {
        let Some(tag_type) = Self::tag_type(entry.kind) else {
            return Ok(false);
        };

        let tagged = Probe::open(&entry.path)
            .and_then(|probe| probe.read())
            .map_err(|_| TunedeckError::TagUnparsable {
                path: entry.path.clone(),
            })?;

        if tagged.tag(tag_type).is_none() {
            log::debug!("No {tag_type:?} tag present in {}", entry.path.display());
            return Ok(false);
        }

        tag_type
            .remove_from_path(&entry.path)
            .map_err(|error| TunedeckError::TagWrite {
                path: entry.path.clone(),
                reason: error.to_string(),
            })?;
        log::info!("Stripped {tag_type:?} tag from {}", entry.path.display());
        Ok(true)
    }
}
