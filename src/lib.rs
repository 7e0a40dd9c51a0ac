//! # tunedeck
//!
//! Batch media toolbox — fetch remote media, convert local videos to MP3,
//! strip embedded tags, and rename audio files from their own metadata.
//!
//! The heart of the crate is a conflict-safe batch pipeline: one pass over a
//! directory that classifies each file by container, runs the per-file
//! transform, and commits results without ever overwriting an existing file.
//! Collisions are skipped, not suffixed or merged, and every run ends with
//! per-category counters where `found == succeeded + skipped + errored`.
//!
//! ## Quick Start
//!
//! ### Rename audio files from their tags
//!
//! ```no_run
//! use tunedeck::{BatchConfig, BatchRunner};
//!
//! let runner = BatchRunner::new(BatchConfig::default());
//! let counters = runner.rename_from_tags("Audio_For_Renaming".as_ref()).unwrap();
//! let totals = counters.totals();
//! println!("{} renamed, {} skipped", totals.succeeded, totals.skipped);
//! ```
//!
//! ### Convert videos to MP3
//!
//! ```no_run
//! use tunedeck::{BatchConfig, BatchRunner};
//!
//! let runner = BatchRunner::new(BatchConfig::default());
//! runner
//!     .convert("VideosToConvert".as_ref(), "ConvertedMP3s".as_ref())
//!     .unwrap();
//! ```
//!
//! ### Strip all embedded tags
//!
//! ```no_run
//! use tunedeck::{BatchConfig, BatchRunner};
//!
//! let runner = BatchRunner::new(BatchConfig::default());
//! runner.strip_tags("Audio_For_Tag_Removal".as_ref()).unwrap();
//! ```
//!
//! ## Features
//!
//! - **Conflict-safe renaming** — `"{artist} - {title}"` derived from the
//!   file's own tags, sanitized for common filesystems, with strict
//!   skip-on-collision semantics
//! - **Tag handling** — generic artist/title reads and full tag stripping
//!   for ID3-style and MP4-style containers via
//!   [`lofty`](https://crates.io/crates/lofty)
//! - **Video-to-audio conversion** — per-file FFmpeg invocations with a
//!   pre-run version probe and captured diagnostics on failure
//! - **Remote fetch** — quality-tiered downloads through an external
//!   downloader with progress reporting
//! - **Fail-open batches** — per-file errors are counted and reported, the
//!   run continues; only missing tools and unscannable directories abort
//!
//! ## Requirements
//!
//! `ffmpeg` must be on `PATH` for conversion, and `yt-dlp` for downloads.
//! Tag operations have no external requirements.

pub mod batch;
pub mod classify;
pub mod counters;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod resolve;
pub mod sanitize;
pub mod tags;
pub mod transcode;

pub use batch::{
    BatchConfig, BatchObserver, BatchRunner, FileOutcome, NoOpBatchObserver, OutcomeStatus,
    ScanDepth,
};
pub use classify::{ExtensionSets, MediaEntry, MediaKind};
pub use counters::{BatchCounters, Tally};
pub use error::TunedeckError;
pub use fetch::{
    FetchClient, FetchObserver, FetchProgress, NoOpFetchObserver, QualitySelector, YtDlpFetcher,
    extract_watch_url,
};
pub use layout::Layout;
pub use resolve::{RenameDecision, RenamePlan, resolve};
pub use sanitize::sanitize_name;
pub use tags::{LoftyTagStore, TagRecord, TagStore};
pub use transcode::{AudioTranscoder, ConvertJob, DEFAULT_BITRATE, FfmpegTranscoder};
