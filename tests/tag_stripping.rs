//! Tag-stripping batch integration tests.
//!
//! Runner policy is exercised through a scripted tag store; the
//! `LoftyTagStore` paths that need real media use garbage files (unparsable
//! containers) or fixtures under `tests/fixtures/` that are skipped when
//! absent.

use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tunedeck::{
    BatchConfig, BatchRunner, ExtensionSets, LoftyTagStore, MediaEntry, TagStore, TunedeckError,
};

/// Tag store that reports tags present for `tagged_*` files and absent
/// otherwise, failing on `corrupt_*` files.
struct ScriptedTagStore;

impl TagStore for ScriptedTagStore {
    fn read(&self, entry: &MediaEntry) -> Result<tunedeck::TagRecord, TunedeckError> {
        Err(TunedeckError::TagUnparsable {
            path: entry.path.clone(),
        })
    }

    fn strip(&self, entry: &MediaEntry) -> Result<bool, TunedeckError> {
        let name = entry
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if name.starts_with("corrupt_") {
            return Err(TunedeckError::TagUnparsable {
                path: entry.path.clone(),
            });
        }
        Ok(name.starts_with("tagged_"))
    }
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), "payload").expect("failed to create test file");
}

#[test]
fn strip_outcomes_map_to_counters() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "tagged_song.mp3");
    touch(dir.path(), "bare_song.mp3");
    touch(dir.path(), "corrupt_song.m4a");
    touch(dir.path(), "ignored.txt");

    let runner =
        BatchRunner::new(BatchConfig::default()).with_tag_store(Box::new(ScriptedTagStore));
    let counters = runner.strip_tags(dir.path()).unwrap();

    let totals = counters.totals();
    assert_eq!(
        (totals.found, totals.succeeded, totals.skipped, totals.errored),
        (3, 1, 1, 1)
    );
    assert!(counters.is_balanced());
}

#[test]
fn strip_is_idempotent_under_the_runner() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "bare_song.mp3");

    let runner =
        BatchRunner::new(BatchConfig::default()).with_tag_store(Box::new(ScriptedTagStore));

    // An already-bare file is a no-op skip on every pass, and its content is
    // unaffected.
    for _ in 0..2 {
        let counters = runner.strip_tags(dir.path()).unwrap();
        let totals = counters.totals();
        assert_eq!((totals.found, totals.skipped), (1, 1));
    }
    assert_eq!(
        fs::read_to_string(dir.path().join("bare_song.mp3")).unwrap(),
        "payload"
    );
}

#[test]
fn lofty_store_rejects_garbage_containers() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("garbage.mp3"), b"this is not an mpeg stream").unwrap();

    let entry = ExtensionSets::default().classify(&dir.path().join("garbage.mp3"));
    let store = LoftyTagStore::new();

    assert!(matches!(
        store.read(&entry),
        Err(TunedeckError::TagUnparsable { .. })
    ));
    assert!(matches!(
        store.strip(&entry),
        Err(TunedeckError::TagUnparsable { .. })
    ));
}

#[test]
fn lofty_store_ignores_non_audio_entries() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("clip.mkv"), b"video").unwrap();

    let entry = ExtensionSets::default().classify(&dir.path().join("clip.mkv"));
    assert_eq!(LoftyTagStore::new().strip(&entry).unwrap(), false);
}

#[test]
fn lofty_strip_round_trip_on_fixture() {
    // Real-container coverage; generated fixtures are not checked in.
    let fixture = Path::new("tests/fixtures/tagged.mp3");
    if !fixture.exists() {
        return;
    }

    let dir = tempdir().unwrap();
    let target = dir.path().join("tagged.mp3");
    fs::copy(fixture, &target).unwrap();

    let entry = ExtensionSets::default().classify(&target);
    let store = LoftyTagStore::new();

    assert!(store.read(&entry).unwrap().present);
    assert!(store.strip(&entry).unwrap(), "first strip removes the tag");
    assert!(!store.strip(&entry).unwrap(), "second strip is a no-op");
    assert!(!store.read(&entry).unwrap().is_complete());
}
