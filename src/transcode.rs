//! External audio transcoding boundary.
//!
//! Transcoding is delegated to an external process (FFmpeg by default),
//! invoked once per file with an explicit argument list and an exit-status
//! check. [`AudioTranscoder`] is the seam the batch runner talks to;
//! [`FfmpegTranscoder`] is the production implementation and tests can
//! substitute their own.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::TunedeckError;

/// Default audio bitrate handed to the encoder.
pub const DEFAULT_BITRATE: &str = "192k";

/// One file-to-file conversion.
///
/// The target path always carries the audio output extension; under a
/// no-overwrite policy an existing target must be skipped by the caller
/// before the tool is ever invoked, so a partial overwrite cannot happen.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    /// The video file to read.
    pub source: PathBuf,
    /// The audio file to produce.
    pub target: PathBuf,
    /// Whether the tool may replace an existing target (`-y` vs `-n`).
    pub overwrite: bool,
}

/// The external transcoding tool seam.
pub trait AudioTranscoder {
    /// Verify the tool is invocable before any file is processed.
    ///
    /// Failure is a fatal precondition: the whole batch aborts with zero
    /// files processed.
    fn probe(&self) -> Result<(), TunedeckError>;

    /// Run one conversion to completion.
    fn transcode(&self, job: &ConvertJob) -> Result<(), TunedeckError>;
}

/// [`AudioTranscoder`] that shells out to FFmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: String,
    bitrate: String,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegTranscoder {
    /// Create a transcoder invoking `ffmpeg` from `PATH` at the default
    /// bitrate.
    pub fn new() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            bitrate: DEFAULT_BITRATE.to_string(),
        }
    }

    /// Use a different executable name or path.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the target audio bitrate (e.g. `"192k"`).
    #[must_use]
    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = bitrate.into();
        self
    }
}

impl AudioTranscoder for FfmpegTranscoder {
    fn probe(&self) -> Result<(), TunedeckError> {
        let status = Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|error| TunedeckError::ToolMissing {
                tool: self.program.clone(),
                reason: error.to_string(),
            })?;
        if !status.success() {
            return Err(TunedeckError::ToolMissing {
                tool: self.program.clone(),
                reason: format!("version probe exited with {status}"),
            });
        }
        log::debug!("{} version probe succeeded", self.program);
        Ok(())
    }

    fn transcode(&self, job: &ConvertJob) -> Result<(), TunedeckError> {
        log::info!(
            "Transcoding {} -> {}",
            job.source.display(),
            job.target.display()
        );
        let output = Command::new(&self.program)
            .arg("-i")
            .arg(&job.source)
            .args(["-vn", "-acodec", "libmp3lame", "-ab", &self.bitrate])
            .arg(if job.overwrite { "-y" } else { "-n" })
            .arg(&job.target)
            .output()
            .map_err(|error| TunedeckError::TranscodeFailed {
                path: job.source.clone(),
                status: "failed to spawn".to_string(),
                stderr: error.to_string(),
            })?;

        if !output.status.success() {
            return Err(TunedeckError::TranscodeFailed {
                path: job.source.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
