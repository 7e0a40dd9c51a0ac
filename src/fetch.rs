//! Remote media fetch boundary.
//!
//! Fetching is delegated to an external downloader (yt-dlp by default),
//! treated as a stable collaborator: the crate only knows how to ask it for
//! a title, request a download with a quality selector and an output
//! template, and relay its progress lines to a [`FetchObserver`].

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

use crate::error::TunedeckError;

/// Progress template handed to the downloader so its output can be parsed
/// line by line: `percent|rate|eta`.
const PROGRESS_TEMPLATE: &str =
    "download:%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s";

/// The target quality tier for a remote fetch.
///
/// Each selector maps to a fixed downloader format string; there is no
/// free-form format passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySelector {
    /// Best available quality (4K if available).
    Best,
    /// Capped at 1080p.
    Height1080,
    /// Capped at 720p.
    Height720,
    /// Capped at 480p.
    Height480,
    /// Capped at 360p.
    Height360,
    /// Audio only, extracted to MP3.
    AudioOnly,
}

impl QualitySelector {
    /// Parse a user-facing label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "best" => Some(QualitySelector::Best),
            "1080p" | "1080" => Some(QualitySelector::Height1080),
            "720p" | "720" => Some(QualitySelector::Height720),
            "480p" | "480" => Some(QualitySelector::Height480),
            "360p" | "360" => Some(QualitySelector::Height360),
            "audio" | "mp3" => Some(QualitySelector::AudioOnly),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            QualitySelector::Best => "Best",
            QualitySelector::Height1080 => "1080p",
            QualitySelector::Height720 => "720p",
            QualitySelector::Height480 => "480p",
            QualitySelector::Height360 => "360p",
            QualitySelector::AudioOnly => "Audio MP3",
        }
    }

    /// The downloader format string for this tier.
    pub fn format_string(self) -> &'static str {
        match self {
            QualitySelector::Best => {
                "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"
            }
            QualitySelector::Height1080 => {
                "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080][ext=mp4]/best[height<=1080]"
            }
            QualitySelector::Height720 => {
                "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]/best[height<=720][ext=mp4]/best[height<=720]"
            }
            QualitySelector::Height480 => {
                "bestvideo[height<=480][ext=mp4]+bestaudio[ext=m4a]/best[height<=480][ext=mp4]/best[height<=480]"
            }
            QualitySelector::Height360 => {
                "bestvideo[height<=360][ext=mp4]+bestaudio[ext=m4a]/best[height<=360][ext=mp4]/best[height<=360]"
            }
            QualitySelector::AudioOnly => "bestaudio/best",
        }
    }
}

/// A snapshot of download progress parsed from the downloader's output.
#[derive(Debug, Clone, Default)]
pub struct FetchProgress {
    /// Completion percentage (0.0 – 100.0), if reported.
    pub percent: Option<f32>,
    /// Transfer rate as reported (e.g. `"1.21MiB/s"`).
    pub rate: Option<String>,
    /// Estimated time remaining as reported (e.g. `"00:12"`).
    pub eta: Option<String>,
}

/// Trait for receiving progress updates during a download.
///
/// Observers are infallible: they observe but cannot halt the fetch.
pub trait FetchObserver {
    /// Called for every progress line the downloader emits.
    fn on_progress(&self, progress: &FetchProgress);
}

/// An observer that discards all notifications.
#[derive(Debug, Default)]
pub struct NoOpFetchObserver;

impl FetchObserver for NoOpFetchObserver {
    fn on_progress(&self, _progress: &FetchProgress) {}
}

/// The remote fetch client seam.
pub trait FetchClient {
    /// Verify the downloader is invocable.
    fn probe(&self) -> Result<(), TunedeckError>;

    /// Fetch the remote resource's title without downloading it.
    fn title(&self, url: &str) -> Result<String, TunedeckError>;

    /// Download `url` at the requested quality into `output_template`.
    fn download(
        &self,
        url: &str,
        quality: QualitySelector,
        output_template: &str,
        observer: &dyn FetchObserver,
    ) -> Result<(), TunedeckError>;
}

/// [`FetchClient`] that shells out to yt-dlp.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: String,
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpFetcher {
    /// Create a fetcher invoking `yt-dlp` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: "yt-dlp".to_string(),
        }
    }

    /// Use a different executable name or path.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl FetchClient for YtDlpFetcher {
    fn probe(&self) -> Result<(), TunedeckError> {
        let status = Command::new(&self.program)
            .arg("--version")
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
        Ok(())
    }

    fn title(&self, url: &str) -> Result<String, TunedeckError> {
        let output = Command::new(&self.program)
            .args(["--no-warnings", "--skip-download", "--print", "title", url])
            .output()
            .map_err(|error| TunedeckError::Fetch(error.to_string()))?;
        if !output.status.success() {
            return Err(TunedeckError::Fetch(format!(
                "could not query title for {url}: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let title = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if title.is_empty() {
            return Err(TunedeckError::Fetch(format!("empty title for {url}")));
        }
        Ok(title)
    }

    fn download(
        &self,
        url: &str,
        quality: QualitySelector,
        output_template: &str,
        observer: &dyn FetchObserver,
    ) -> Result<(), TunedeckError> {
        log::info!("Downloading {url} at {}", quality.label());
        let mut command = Command::new(&self.program);
        command
            .args(["-f", quality.format_string()])
            .args(["-o", output_template])
            .args(["--newline", "--no-check-certificates"])
            .args(["--progress-template", PROGRESS_TEMPLATE]);
        if quality == QualitySelector::AudioOnly {
            command.args(["-x", "--audio-format", "mp3", "--audio-quality", "192K"]);
        } else {
            command.args(["--recode-video", "mp4"]);
        }
        command.arg(url).stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = command
            .spawn()
            .map_err(|error| TunedeckError::Fetch(error.to_string()))?;

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line?;
                if let Some(progress) = parse_progress_line(&line) {
                    observer.on_progress(&progress);
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(TunedeckError::Fetch(format!(
                "downloader exited with {} for {url}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Parse one `percent|rate|eta` progress line. Returns `None` for any other
/// output the downloader interleaves.
fn parse_progress_line(line: &str) -> Option<FetchProgress> {
    let mut parts = line.trim().splitn(3, '|');
    let percent_part = parts.next()?.trim();
    let rate_part = parts.next()?.trim();
    let eta_part = parts.next()?.trim();

    let percent = percent_part
        .trim_end_matches('%')
        .trim()
        .parse::<f32>()
        .ok();
    let keep = |value: &str| {
        if value.is_empty() || value == "N/A" {
            None
        } else {
            Some(value.to_string())
        }
    };
    Some(FetchProgress {
        percent,
        rate: keep(rate_part),
        eta: keep(eta_part),
    })
}

/// Normalize free text to a canonical watch URL.
///
/// Accepts full watch/short/embed URLs or a bare 11-character video id.
pub fn extract_watch_url(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if is_video_id(trimmed) {
        return Some(watch_url(trimmed));
    }
    for marker in ["watch?v=", "youtu.be/", "/shorts/", "/embed/", "/v/"] {
        if let Some(index) = trimmed.find(marker) {
            let id: String = trimmed[index + marker.len()..]
                .chars()
                .take_while(|character| is_id_character(*character))
                .take(11)
                .collect();
            if is_video_id(&id) {
                return Some(watch_url(&id));
            }
        }
    }
    None
}

fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

fn is_id_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_' || character == '-'
}

fn is_video_id(value: &str) -> bool {
    value.len() == 11 && value.chars().all(is_id_character)
}
