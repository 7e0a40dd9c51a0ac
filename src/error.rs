//! Error types for the `tunedeck` crate.
//!
//! This module defines [`TunedeckError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry rich context to aid
//! debugging, including file paths and captured diagnostic output from
//! external tools.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `tunedeck` operations.
///
/// Every public method that can fail returns `Result<T, TunedeckError>`.
/// Whether a variant is fatal to a batch run or merely fails one file is
/// decided at the [`BatchRunner`](crate::BatchRunner) boundary: only
/// [`ToolMissing`](TunedeckError::ToolMissing) and
/// [`DirectoryCreate`](TunedeckError::DirectoryCreate) abort a run before
/// any file is touched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TunedeckError {
    /// A required working directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: IoError,
    },

    /// A required external tool is not invocable.
    ///
    /// Raised by the pre-run version probe. This is a fatal precondition
    /// failure: the batch aborts with zero files processed.
    #[error("Required tool `{tool}` is not available: {reason}")]
    ToolMissing {
        /// Executable name that was probed.
        tool: String,
        /// Why the probe failed.
        reason: String,
    },

    /// The file's tag container could not be parsed.
    ///
    /// Corrupt header or unknown internal format. Per-file recoverable.
    #[error("Could not parse tag container in {path}")]
    TagUnparsable {
        /// The file whose tags were unreadable.
        path: PathBuf,
    },

    /// Tag data could not be written back to the file.
    #[error("Failed to rewrite tags in {path}: {reason}")]
    TagWrite {
        /// The file that could not be rewritten.
        path: PathBuf,
        /// Underlying reason from the tag codec.
        reason: String,
    },

    /// The external transcoder exited with a non-zero status.
    #[error("Transcode of {path} failed ({status}): {stderr}")]
    TranscodeFailed {
        /// Source file being transcoded.
        path: PathBuf,
        /// Exit status description.
        status: String,
        /// Captured diagnostic output.
        stderr: String,
    },

    /// A filesystem rename failed.
    #[error("Failed to rename {from} to {to}: {source}")]
    RenameFailed {
        /// Original path.
        from: PathBuf,
        /// Intended target path.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: IoError,
    },

    /// The remote fetch client reported a failure.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}
