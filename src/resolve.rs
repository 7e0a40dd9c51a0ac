//! Conflict-safe rename planning.
//!
//! A [`RenamePlan`] is computed in full before any filesystem mutation, so at
//! most one rename ever happens per file and an existing file is never
//! overwritten. Collisions are skipped, not suffixed: the policy is strict
//! and non-interactive.

use std::path::{Path, PathBuf};

use crate::sanitize::sanitize_name;
use crate::tags::TagRecord;

/// The outcome decided for one candidate rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameDecision {
    /// The file should be renamed to the candidate path.
    Apply,
    /// The file already carries the candidate name.
    SkipIdentical,
    /// Artist or title tags are missing; no name can be derived.
    SkipMissingTags,
    /// A filesystem entry already exists at the candidate path.
    SkipCollision,
    /// The tag container could not be read at all.
    SkipUnreadable,
}

impl RenameDecision {
    /// Short human-readable reason, used in per-file reporting.
    pub fn reason(self) -> &'static str {
        match self {
            RenameDecision::Apply => "rename",
            RenameDecision::SkipIdentical => "filename already correct",
            RenameDecision::SkipMissingTags => "missing artist or title tag",
            RenameDecision::SkipCollision => "target name already exists",
            RenameDecision::SkipUnreadable => "tag container unreadable",
        }
    }
}

/// A fully-decided rename for one file.
#[derive(Debug, Clone)]
pub struct RenamePlan {
    /// The file as it exists on disk.
    pub original_path: PathBuf,
    /// The sanitized candidate file name (with extension).
    pub candidate_name: String,
    /// The candidate name resolved against the original's parent directory.
    pub candidate_path: PathBuf,
    /// The decision, computed before any filesystem mutation.
    pub decision: RenameDecision,
}

impl RenamePlan {
    /// Plan a rename of `original` from its tag record.
    ///
    /// The candidate name is `"{artist} - {title}.{extension}"` with both
    /// fields passed through [`sanitize_name`]. The original extension is
    /// preserved as-is.
    pub fn from_tags(original: &Path, record: &TagRecord) -> Self {
        let (candidate_name, candidate_path) = match (&record.artist, &record.title) {
            (Some(artist), Some(title)) => {
                let stem = format!("{} - {}", sanitize_name(artist), sanitize_name(title));
                let name = match original.extension().and_then(|extension| extension.to_str()) {
                    Some(extension) => format!("{stem}.{extension}"),
                    None => stem,
                };
                let path = match original.parent() {
                    Some(parent) => parent.join(&name),
                    None => PathBuf::from(&name),
                };
                (name, path)
            }
            _ => (String::new(), original.to_path_buf()),
        };

        let decision = resolve(original, &candidate_path, record.is_complete());
        Self {
            original_path: original.to_path_buf(),
            candidate_name,
            candidate_path,
            decision,
        }
    }

    /// Plan recording that the file's tags could not be read.
    pub fn unreadable(original: &Path) -> Self {
        Self {
            original_path: original.to_path_buf(),
            candidate_name: String::new(),
            candidate_path: original.to_path_buf(),
            decision: RenameDecision::SkipUnreadable,
        }
    }
}

/// Decide whether a rename to `candidate` may proceed.
///
/// First-match policy, evaluated in order:
///
/// 1. required tags missing → [`RenameDecision::SkipMissingTags`]
/// 2. `candidate == original` (case-sensitive path equality) →
///    [`RenameDecision::SkipIdentical`]
/// 3. anything already exists at `candidate` →
///    [`RenameDecision::SkipCollision`] — never overwritten, regardless of
///    content
/// 4. otherwise → [`RenameDecision::Apply`]
pub fn resolve(original: &Path, candidate: &Path, tags_present: bool) -> RenameDecision {
    if !tags_present {
        return RenameDecision::SkipMissingTags;
    }
    if candidate == original {
        return RenameDecision::SkipIdentical;
    }
    if candidate.exists() {
        return RenameDecision::SkipCollision;
    }
    RenameDecision::Apply
}
