//! Rename-from-tags batch integration tests.
//!
//! These drive [`BatchRunner::rename_from_tags`] against real temporary
//! directories, with a map-backed tag store standing in for the tag codec.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tunedeck::{
    BatchConfig, BatchRunner, MediaEntry, ScanDepth, TagRecord, TagStore, TunedeckError,
};

/// Tag store that answers from a fixed map keyed by file name.
///
/// Files missing from the map report an unparsable container, standing in
/// for a corrupt header.
struct MapTagStore {
    records: HashMap<String, TagRecord>,
}

impl MapTagStore {
    fn new(entries: &[(&str, Option<&str>, Option<&str>)]) -> Self {
        let records = entries
            .iter()
            .map(|(name, artist, title)| {
                (
                    name.to_string(),
                    TagRecord {
                        artist: artist.map(str::to_string),
                        title: title.map(str::to_string),
                        present: artist.is_some() || title.is_some(),
                    },
                )
            })
            .collect();
        Self { records }
    }
}

impl TagStore for MapTagStore {
    fn read(&self, entry: &MediaEntry) -> Result<TagRecord, TunedeckError> {
        let name = entry
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        self.records
            .get(name)
            .cloned()
            .ok_or_else(|| TunedeckError::TagUnparsable {
                path: entry.path.clone(),
            })
    }

    fn strip(&self, _entry: &MediaEntry) -> Result<bool, TunedeckError> {
        Ok(false)
    }
}

fn touch(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("failed to create test file");
}

fn runner(store: MapTagStore) -> BatchRunner {
    BatchRunner::new(BatchConfig::default()).with_tag_store(Box::new(store))
}

#[test]
fn renames_from_artist_and_title() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "track01.mp3", "audio");

    let store = MapTagStore::new(&[("track01.mp3", Some("Artist"), Some("Title"))]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    assert!(dir.path().join("Artist - Title.mp3").is_file());
    assert!(!dir.path().join("track01.mp3").exists());
    let totals = counters.totals();
    assert_eq!((totals.found, totals.succeeded), (1, 1));
    assert!(counters.is_balanced());
}

#[test]
fn multi_valued_artist_joins_then_sanitizes() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "Song.mp3", "audio");

    // The joined artist carries a slash; sanitization strips it and the
    // whitespace run collapses.
    let store = MapTagStore::new(&[(
        "Song.mp3",
        Some("Artist A / Artist B"),
        Some("My Title"),
    )]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    assert!(dir.path().join("Artist A Artist B - My Title.mp3").is_file());
    assert_eq!(counters.totals().succeeded, 1);
}

#[test]
fn missing_tags_skip_without_touching_the_file() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "no_title.mp3", "audio");
    touch(dir.path(), "no_tags.m4a", "audio");

    let store = MapTagStore::new(&[
        ("no_title.mp3", Some("Artist"), None),
        ("no_tags.m4a", None, None),
    ]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    assert!(dir.path().join("no_title.mp3").is_file());
    assert!(dir.path().join("no_tags.m4a").is_file());
    let totals = counters.totals();
    assert_eq!((totals.found, totals.succeeded, totals.skipped), (2, 0, 2));
    assert!(counters.is_balanced());
}

#[test]
fn collision_renames_at_most_one_file() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "a.mp3", "first recording");
    touch(dir.path(), "b.mp3", "second recording");

    // Both files resolve to the same candidate name.
    let store = MapTagStore::new(&[
        ("a.mp3", Some("Artist"), Some("Title")),
        ("b.mp3", Some("Artist"), Some("Title")),
    ]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    let totals = counters.totals();
    assert_eq!((totals.found, totals.succeeded, totals.skipped), (2, 1, 1));

    // Enumeration is sorted, so a.mp3 wins and b.mp3 is left alone with its
    // contents intact: no data loss.
    let renamed = dir.path().join("Artist - Title.mp3");
    assert_eq!(fs::read_to_string(&renamed).unwrap(), "first recording");
    assert_eq!(
        fs::read_to_string(dir.path().join("b.mp3")).unwrap(),
        "second recording"
    );
}

#[test]
fn already_correct_name_is_skipped() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "Artist - Title.mp3", "audio");

    let store = MapTagStore::new(&[("Artist - Title.mp3", Some("Artist"), Some("Title"))]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    assert!(dir.path().join("Artist - Title.mp3").is_file());
    let totals = counters.totals();
    assert_eq!((totals.succeeded, totals.skipped), (0, 1));
}

#[test]
fn unreadable_container_counts_as_error() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "mystery.mp3", "not in the map");

    let store = MapTagStore::new(&[]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    let totals = counters.totals();
    assert_eq!((totals.found, totals.errored), (1, 1));
    assert!(counters.is_balanced());
    assert!(dir.path().join("mystery.mp3").is_file());
}

#[test]
fn unsupported_files_are_not_counted() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "notes.txt", "text");
    touch(dir.path(), "clip.wmv", "video");

    let store = MapTagStore::new(&[]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    assert_eq!(counters.totals().found, 0);
}

#[test]
fn recursive_scan_reaches_subdirectories() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("inner")).unwrap();
    touch(&dir.path().join("inner"), "deep.mp3", "audio");

    let store = MapTagStore::new(&[("deep.mp3", Some("Artist"), Some("Title"))]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    assert!(dir.path().join("inner/Artist - Title.mp3").is_file());
    assert_eq!(counters.totals().succeeded, 1);
}

#[test]
fn top_level_scan_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("inner")).unwrap();
    touch(&dir.path().join("inner"), "deep.mp3", "audio");

    let config = BatchConfig {
        rename_scan_depth: ScanDepth::TopLevel,
        ..BatchConfig::default()
    };
    let store = MapTagStore::new(&[("deep.mp3", Some("Artist"), Some("Title"))]);
    let counters = BatchRunner::new(config)
        .with_tag_store(Box::new(store))
        .rename_from_tags(dir.path())
        .unwrap();

    assert_eq!(counters.totals().found, 0);
    assert!(dir.path().join("inner/deep.mp3").is_file());
}

#[test]
fn missing_directory_is_an_error() {
    let store = MapTagStore::new(&[]);
    let result = runner(store).rename_from_tags(Path::new("/nonexistent/tunedeck-test"));
    assert!(result.is_err());
}

#[test]
fn category_counters_are_keyed_by_extension() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "one.mp3", "audio");
    touch(dir.path(), "two.m4a", "audio");

    let store = MapTagStore::new(&[
        ("one.mp3", Some("A"), Some("B")),
        ("two.m4a", None, None),
    ]);
    let counters = runner(store).rename_from_tags(dir.path()).unwrap();

    let categories: Vec<_> = counters.categories().map(|(name, _)| name).collect();
    assert_eq!(categories, vec!["m4a", "mp3"]);
    for (_, tally) in counters.categories() {
        assert!(tally.is_balanced());
    }
}
