//! Batch pipeline orchestration.
//!
//! [`BatchRunner`] drives one pass over a directory for a given operation:
//! enumerate entries, classify, run the per-file transform, commit, and
//! accumulate [`BatchCounters`]. Runs are single-threaded and fail-open: a
//! per-file failure increments the `errored` counter and the run proceeds to
//! the next file. Only two conditions abort a run before any file is
//! touched: a failed external-tool probe and a directory that cannot be
//! scanned.
//!
//! # Example
//!
//! ```no_run
//! use tunedeck::{BatchConfig, BatchRunner, TunedeckError};
//!
//! let runner = BatchRunner::new(BatchConfig::default());
//! let counters = runner.rename_from_tags("Audio_For_Renaming".as_ref())?;
//! println!("{}", counters.to_json());
//! # Ok::<(), TunedeckError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::classify::{ExtensionSets, MediaEntry};
use crate::counters::BatchCounters;
use crate::error::TunedeckError;
use crate::resolve::{RenameDecision, RenamePlan};
use crate::tags::{LoftyTagStore, TagStore};
use crate::transcode::{AudioTranscoder, ConvertJob, DEFAULT_BITRATE, FfmpegTranscoder};

/// Extension given to converted audio output.
const AUDIO_OUTPUT_EXTENSION: &str = "mp3";

/// How deep a batch operation scans its input directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDepth {
    /// Direct children of the input directory only.
    TopLevel,
    /// The whole directory tree.
    Recursive,
}

/// Configuration for a [`BatchRunner`].
///
/// Replaces global constants with an explicit structure: extension sets,
/// overwrite policy, target bitrate, and one scan-depth option per
/// operation. The depth asymmetry between conversion (top-level) and the
/// tag operations (recursive) is deliberate and independently configurable.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Extension sets driving classification.
    pub extensions: ExtensionSets,
    /// Whether conversion may overwrite existing outputs.
    pub overwrite: bool,
    /// Target audio bitrate for conversion.
    pub bitrate: String,
    /// Scan depth for the convert operation.
    pub convert_scan_depth: ScanDepth,
    /// Scan depth for tag stripping.
    pub strip_scan_depth: ScanDepth,
    /// Scan depth for renaming from tags.
    pub rename_scan_depth: ScanDepth,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extensions: ExtensionSets::default(),
            overwrite: false,
            bitrate: DEFAULT_BITRATE.to_string(),
            convert_scan_depth: ScanDepth::TopLevel,
            strip_scan_depth: ScanDepth::Recursive,
            rename_scan_depth: ScanDepth::Recursive,
        }
    }
}

/// What happened to one file during a batch run.
#[derive(Debug, Clone)]
pub enum OutcomeStatus {
    /// The transform was applied.
    Succeeded(String),
    /// The file was skipped by policy; never counted as an error.
    Skipped(String),
    /// The transform failed; the run continues with the next file.
    Errored(String),
}

/// A per-file report delivered to a [`BatchObserver`].
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// The file that was processed.
    pub path: PathBuf,
    /// Counter category (extension family).
    pub category: String,
    /// What happened, with a human-readable reason.
    pub status: OutcomeStatus,
}

/// Trait for receiving per-file outcomes as a run progresses.
///
/// The CLI renders these as colored status lines; the default observer
/// discards them.
pub trait BatchObserver {
    /// Called once per processed file, in processing order.
    fn on_outcome(&self, outcome: &FileOutcome);
}

/// An observer that discards all outcomes.
#[derive(Debug, Default)]
pub struct NoOpBatchObserver;

impl BatchObserver for NoOpBatchObserver {
    fn on_outcome(&self, _outcome: &FileOutcome) {}
}

/// Orchestrates one batch operation over one directory.
///
/// The tag store, transcoder, and observer are injectable seams; defaults
/// are the production implementations.
pub struct BatchRunner {
    config: BatchConfig,
    tags: Box<dyn TagStore>,
    transcoder: Box<dyn AudioTranscoder>,
    observer: Arc<dyn BatchObserver>,
}

impl BatchRunner {
    /// Create a runner with production collaborators.
    pub fn new(config: BatchConfig) -> Self {
        let transcoder = FfmpegTranscoder::new().with_bitrate(&config.bitrate);
        Self {
            config,
            tags: Box::new(LoftyTagStore::new()),
            transcoder: Box::new(transcoder),
            observer: Arc::new(NoOpBatchObserver),
        }
    }

    /// Substitute the tag store.
    #[must_use]
    pub fn with_tag_store(mut self, tags: Box<dyn TagStore>) -> Self {
        self.tags = tags;
        self
    }

    /// Substitute the external transcoder.
    #[must_use]
    pub fn with_transcoder(mut self, transcoder: Box<dyn AudioTranscoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    /// Attach a per-file outcome observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Convert every eligible video file in `input_dir` to an audio file in
    /// `output_dir`.
    ///
    /// The transcoder is probed first; an unavailable tool aborts the whole
    /// batch with zero files processed. An existing output under the
    /// no-overwrite policy is skipped before the tool is ever invoked.
    pub fn convert(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<BatchCounters, TunedeckError> {
        self.transcoder.probe()?;

        let mut counters = BatchCounters::new();
        for path in self.scan(input_dir, self.config.convert_scan_depth)? {
            if !self.config.extensions.is_video(&path) {
                continue;
            }
            let entry = self.config.extensions.classify(&path);
            let category = entry.category().to_string();
            counters.found(&category);

            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                counters.skipped(&category);
                self.report(&entry, &category, OutcomeStatus::Skipped(
                    "file name is not valid unicode".to_string(),
                ));
                continue;
            };
            let target = output_dir.join(format!("{stem}.{AUDIO_OUTPUT_EXTENSION}"));

            if !self.config.overwrite && target.exists() {
                counters.skipped(&category);
                self.report(&entry, &category, OutcomeStatus::Skipped(format!(
                    "output {} already exists",
                    target.display()
                )));
                continue;
            }

            let job = ConvertJob {
                source: path.clone(),
                target: target.clone(),
                overwrite: self.config.overwrite,
            };
            match self.transcoder.transcode(&job) {
                Ok(()) => {
                    counters.succeeded(&category);
                    self.report(&entry, &category, OutcomeStatus::Succeeded(format!(
                        "converted to {}",
                        target.display()
                    )));
                }
                Err(error) => {
                    counters.errored(&category);
                    self.report(&entry, &category, OutcomeStatus::Errored(error.to_string()));
                }
            }
        }
        debug_assert!(counters.is_balanced());
        Ok(counters)
    }

    /// Strip all embedded tags from every audio file under `dir`.
    ///
    /// Files that carry no tag block count as skipped, not errored, so a
    /// second pass over the same directory is a clean no-op.
    pub fn strip_tags(&self, dir: &Path) -> Result<BatchCounters, TunedeckError> {
        let mut counters = BatchCounters::new();
        for path in self.scan(dir, self.config.strip_scan_depth)? {
            let entry = self.config.extensions.classify(&path);
            if !entry.kind.is_audio() {
                continue;
            }
            let category = entry.category().to_string();
            counters.found(&category);

            match self.tags.strip(&entry) {
                Ok(true) => {
                    counters.succeeded(&category);
                    self.report(&entry, &category, OutcomeStatus::Succeeded(
                        "tags removed".to_string(),
                    ));
                }
                Ok(false) => {
                    counters.skipped(&category);
                    self.report(&entry, &category, OutcomeStatus::Skipped(
                        "no tags present".to_string(),
                    ));
                }
                Err(error) => {
                    counters.errored(&category);
                    self.report(&entry, &category, OutcomeStatus::Errored(error.to_string()));
                }
            }
        }
        debug_assert!(counters.is_balanced());
        Ok(counters)
    }

    /// Rename every audio file under `dir` to `"{artist} - {title}"` derived
    /// from its own tags.
    ///
    /// The decision for each file is computed in full before any filesystem
    /// mutation; at most one rename happens per file and an existing file is
    /// never overwritten.
    pub fn rename_from_tags(&self, dir: &Path) -> Result<BatchCounters, TunedeckError> {
        let mut counters = BatchCounters::new();
        for path in self.scan(dir, self.config.rename_scan_depth)? {
            let entry = self.config.extensions.classify(&path);
            if !entry.kind.is_audio() {
                continue;
            }
            let category = entry.category().to_string();
            counters.found(&category);

            let record = match self.tags.read(&entry) {
                Ok(record) => record,
                Err(error) => {
                    let plan = RenamePlan::unreadable(&entry.path);
                    counters.errored(&category);
                    self.report(&entry, &category, OutcomeStatus::Errored(format!(
                        "{}: {error}",
                        plan.decision.reason()
                    )));
                    continue;
                }
            };

            let plan = RenamePlan::from_tags(&entry.path, &record);
            match plan.decision {
                RenameDecision::Apply => {
                    match fs::rename(&plan.original_path, &plan.candidate_path) {
                        Ok(()) => {
                            counters.succeeded(&category);
                            self.report(&entry, &category, OutcomeStatus::Succeeded(format!(
                                "renamed to '{}'",
                                plan.candidate_name
                            )));
                        }
                        Err(source) => {
                            counters.errored(&category);
                            let error = TunedeckError::RenameFailed {
                                from: plan.original_path.clone(),
                                to: plan.candidate_path.clone(),
                                source,
                            };
                            self.report(&entry, &category, OutcomeStatus::Errored(
                                error.to_string(),
                            ));
                        }
                    }
                }
                RenameDecision::SkipMissingTags => {
                    counters.skipped(&category);
                    self.report(&entry, &category, OutcomeStatus::Skipped(format!(
                        "missing tag(s): {}",
                        record.missing_fields().join(", ")
                    )));
                }
                decision => {
                    counters.skipped(&category);
                    self.report(&entry, &category, OutcomeStatus::Skipped(
                        decision.reason().to_string(),
                    ));
                }
            }
        }
        debug_assert!(counters.is_balanced());
        Ok(counters)
    }

    /// Enumerate regular files under `dir`, sorted lexicographically by file
    /// name for deterministic processing order.
    fn scan(&self, dir: &Path, depth: ScanDepth) -> Result<Vec<PathBuf>, TunedeckError> {
        if !dir.is_dir() {
            return Err(TunedeckError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input directory not found: {}", dir.display()),
            )));
        }
        let max_depth = match depth {
            ScanDepth::TopLevel => 1,
            ScanDepth::Recursive => usize::MAX,
        };
        let mut files = Vec::new();
        for result in WalkDir::new(dir)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
        {
            match result {
                Ok(entry) if entry.file_type().is_file() => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(error) => {
                    log::warn!("Skipping unreadable entry under {}: {error}", dir.display());
                }
            }
        }
        Ok(files)
    }

    fn report(&self, entry: &MediaEntry, category: &str, status: OutcomeStatus) {
        let outcome = FileOutcome {
            path: entry.path.clone(),
            category: category.to_string(),
            status,
        };
        match &outcome.status {
            OutcomeStatus::Succeeded(message) => {
                log::info!("{}: {message}", outcome.path.display());
            }
            OutcomeStatus::Skipped(message) => {
                log::debug!("{}: skipped ({message})", outcome.path.display());
            }
            OutcomeStatus::Errored(message) => {
                log::warn!("{}: {message}", outcome.path.display());
            }
        }
        self.observer.on_outcome(&outcome);
    }
}
