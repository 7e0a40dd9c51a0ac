use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tunedeck::{
    BatchConfig, BatchCounters, BatchObserver, BatchRunner, FetchClient, FetchObserver,
    FetchProgress, FileOutcome, Layout, OutcomeStatus, QualitySelector, ScanDepth, YtDlpFetcher,
    extract_watch_url, sanitize_name,
};

const CLI_AFTER_HELP: &str = "Examples:\n  tunedeck download https://youtu.be/dQw4w9WgXcQ --quality 720p\n  tunedeck convert --bitrate 192k\n  tunedeck rename --json\n  tunedeck strip-tags --top-level\n  tunedeck completions zsh > _tunedeck";

#[derive(Debug, Parser)]
#[command(
    name = "tunedeck",
    version,
    about = "Fetch remote media, convert videos to MP3, strip tags, and rename tracks from metadata",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Allow overwriting existing conversion outputs.
    #[arg(long)]
    overwrite: bool,

    /// Print the run summary as machine-readable JSON.
    #[arg(long)]
    json: bool,

    /// Root directory for the operation subdirectories.
    /// Defaults to the executable's directory.
    #[arg(long)]
    root: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download a remote video or audio track.
    #[command(
        about = "Download remote media",
        after_help = "Examples:\n  tunedeck download dQw4w9WgXcQ\n  tunedeck download https://youtu.be/dQw4w9WgXcQ --quality audio"
    )]
    Download {
        /// Watch URL, shorts/embed URL, or bare 11-character video id.
        url: String,

        /// Quality tier: best | 1080p | 720p | 480p | 360p | audio.
        #[arg(long, default_value = "best")]
        quality: String,
    },

    /// Convert videos in the conversion input directory to MP3.
    #[command(
        about = "Convert videos to MP3",
        after_help = "Examples:\n  tunedeck convert\n  tunedeck convert --input ~/clips --output ~/music --bitrate 128k"
    )]
    Convert {
        /// Source directory. Defaults to VideosToConvert under the root.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Destination directory. Defaults to ConvertedMP3s under the root.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Target audio bitrate.
        #[arg(long, default_value = "192k")]
        bitrate: String,
    },

    /// Remove all embedded tags from audio files. Irreversible.
    #[command(
        about = "Strip embedded tags",
        after_help = "Files are rewritten in place with no backup; treat the\ndirectory as a disposable staging area.\n\nExamples:\n  tunedeck strip-tags\n  tunedeck strip-tags --dir ~/staging --top-level"
    )]
    StripTags {
        /// Target directory. Defaults to Audio_For_Tag_Removal under the root.
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Scan only the directory's direct children.
        #[arg(long)]
        top_level: bool,
    },

    /// Rename audio files to "{artist} - {title}" from their tags.
    #[command(
        about = "Rename audio files from tags",
        after_help = "Collisions are skipped, never overwritten.\n\nExamples:\n  tunedeck rename\n  tunedeck rename --dir ~/inbox --json"
    )]
    Rename {
        /// Target directory. Defaults to Audio_For_Renaming under the root.
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Scan only the directory's direct children.
        #[arg(long)]
        top_level: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Renders per-file outcomes as colored status lines.
struct TerminalReport {
    verbose: bool,
}

impl BatchObserver for TerminalReport {
    fn on_outcome(&self, outcome: &FileOutcome) {
        let name = outcome
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.path.display().to_string());
        match &outcome.status {
            OutcomeStatus::Succeeded(message) => {
                println!("{} {name}: {message}", "ok".green().bold());
            }
            OutcomeStatus::Skipped(message) => {
                println!("{} {name}: {message}", "skip".yellow().bold());
            }
            OutcomeStatus::Errored(message) => {
                eprintln!("{} {name}: {message}", "error".red().bold());
            }
        }
        if self.verbose {
            eprintln!("  {} [{}]", outcome.path.display(), outcome.category);
        }
    }
}

/// Drives an indicatif bar from downloader progress lines.
struct TerminalFetchProgress {
    bar: ProgressBar,
}

impl TerminalFetchProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos:>3}% {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl FetchObserver for TerminalFetchProgress {
    fn on_progress(&self, progress: &FetchProgress) {
        if let Some(percent) = progress.percent {
            self.bar.set_position(percent.clamp(0.0, 100.0) as u64);
        }
        let mut message = String::new();
        if let Some(rate) = &progress.rate {
            message.push_str(rate);
        }
        if let Some(eta) = &progress.eta {
            if !message.is_empty() {
                message.push_str(" | ");
            }
            message.push_str("ETA ");
            message.push_str(eta);
        }
        self.bar.set_message(message);
    }
}

fn print_summary(counters: &BatchCounters, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&counters.to_json())?);
        return Ok(());
    }
    println!("\n{}", "Summary".cyan().bold());
    for (category, tally) in counters.categories() {
        println!(
            "  {category}: {} found, {} succeeded, {} skipped, {} errored",
            tally.found, tally.succeeded, tally.skipped, tally.errored
        );
    }
    let totals = counters.totals();
    println!(
        "  {}: {} found, {} succeeded, {} skipped, {} errored",
        "total".bold(),
        totals.found,
        totals.succeeded,
        totals.skipped,
        totals.errored
    );
    Ok(())
}

fn layout_for(global: &GlobalOptions) -> Result<Layout, Box<dyn std::error::Error>> {
    match &global.root {
        Some(root) => Ok(Layout::new(root.clone())),
        None => Ok(Layout::discover()?),
    }
}

fn batch_config(global: &GlobalOptions) -> BatchConfig {
    BatchConfig {
        overwrite: global.overwrite,
        ..BatchConfig::default()
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download { url, quality } => {
            let quality = QualitySelector::parse(&quality)
                .ok_or(format!("unsupported --quality: {quality}"))?;
            let url = extract_watch_url(&url).ok_or("invalid URL or video id")?;

            let layout = layout_for(&cli.global)?;
            let download_dir = layout.download_path();
            layout.ensure(&download_dir)?;

            let fetcher = YtDlpFetcher::new();
            fetcher.probe()?;

            let title = fetcher.title(&url)?;
            println!(
                "{} {} ({})",
                "downloading".cyan().bold(),
                title,
                quality.label()
            );

            let template = download_dir.join(format!("{}.%(ext)s", sanitize_name(&title)));
            let progress = TerminalFetchProgress::new();
            fetcher.download(
                &url,
                quality,
                &template.to_string_lossy(),
                &progress,
            )?;
            progress.finish();
            println!(
                "{} saved under {}",
                "success:".green().bold(),
                download_dir.display()
            );
        }
        Commands::Convert {
            input,
            output,
            bitrate,
        } => {
            let layout = layout_for(&cli.global)?;
            let input = input.unwrap_or_else(|| layout.convert_input_path());
            let output = output.unwrap_or_else(|| layout.convert_output_path());
            layout.ensure(&input)?;
            layout.ensure(&output)?;

            let mut config = batch_config(&cli.global);
            config.bitrate = bitrate;
            let runner = BatchRunner::new(config).with_observer(Arc::new(TerminalReport {
                verbose: cli.global.verbose,
            }));
            let counters = runner.convert(&input, &output)?;
            print_summary(&counters, cli.global.json)?;
        }
        Commands::StripTags { dir, top_level } => {
            let layout = layout_for(&cli.global)?;
            let dir = dir.unwrap_or_else(|| layout.strip_path());
            layout.ensure(&dir)?;

            let mut config = batch_config(&cli.global);
            if top_level {
                config.strip_scan_depth = ScanDepth::TopLevel;
            }
            let runner = BatchRunner::new(config).with_observer(Arc::new(TerminalReport {
                verbose: cli.global.verbose,
            }));
            let counters = runner.strip_tags(&dir)?;
            print_summary(&counters, cli.global.json)?;
        }
        Commands::Rename { dir, top_level } => {
            let layout = layout_for(&cli.global)?;
            let dir = dir.unwrap_or_else(|| layout.rename_path());
            layout.ensure(&dir)?;

            let mut config = batch_config(&cli.global);
            if top_level {
                config.rename_scan_depth = ScanDepth::TopLevel;
            }
            let runner = BatchRunner::new(config).with_observer(Arc::new(TerminalReport {
                verbose: cli.global.verbose,
            }));
            let counters = runner.rename_from_tags(&dir)?;
            print_summary(&counters, cli.global.json)?;
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "tunedeck", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
