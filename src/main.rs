//! albumcut
//!
//! # What this program is
//! A command-line tool that cuts one long recording (a live set, a full-album
//! upload) into individually tagged tracks, driven by a CSV schedule.
//!
//! # How a run works
//! - Load and normalize the schedule (missing starts/ends are inferred).
//! - Decode the source once.
//! - For every track: slice, write a temporary WAV, re-encode with ffmpeg,
//!   then stamp ID3 tags and the shared cover art.
//!
//! A broken schedule or an undecodable source stops the run before anything
//! is written. A track that fails later is reported and skipped.
//!
//! # Exit codes
//! - 0: the run completed (individual tracks may have failed; see the log)
//! - 1: fatal error
//! - 2: every track failed

mod config;
mod core;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::core::AlbumJob;
use crate::core::encode::FfmpegEncoder;
use crate::core::types::RunSummary;

/// Split a long recording into tagged tracks.
#[derive(Parser, Debug)]
#[command(name = "albumcut")]
#[command(version)]
struct Args {
    /// Source recording (mp3, mp4, webm by default)
    input_media: PathBuf,

    /// CSV schedule: one row per track
    metadata: PathBuf,

    /// Image embedded as front cover in every track
    cover_art: PathBuf,

    /// Directory the album folder is created in [default: output.root or the current directory]
    #[arg(short, long, env = "ALBUMCUT_OUTPUT_ROOT")]
    output_root: Option<PathBuf>,

    /// Config file (TOML); overrides ALBUMCUT_CONFIG_PATH and the XDG default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "albumcut=debug"
    } else {
        "albumcut=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(args) {
        Ok(summary) if summary.all_failed() => {
            error!(
                dir = %summary.output_directory.display(),
                failed = summary.failed.len(),
                "Every track failed"
            );
            ExitCode::from(2)
        }
        Ok(summary) => {
            for f in &summary.failed {
                warn!(row = f.index + 1, title = %f.title, reason = %f.reason, "Track not written");
            }
            info!(
                dir = %summary.output_directory.display(),
                written = summary.written.len(),
                failed = summary.failed.len(),
                "Processing complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> Result<RunSummary> {
    let settings = load_settings(args.config.as_deref())?;

    let output_root = match args.output_root.or_else(|| settings.output.root.clone()) {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    let job = AlbumJob {
        input_media: args.input_media,
        schedule: args.metadata,
        cover_art: args.cover_art,
        output_root,
    };
    info!(
        input = %job.input_media.display(),
        schedule = %job.schedule.display(),
        root = %job.output_root.display(),
        "Starting album run"
    );

    let encoder = FfmpegEncoder::new(&settings.encoder);
    let summary = crate::core::run_album(&job, &settings, &encoder)
        .with_context(|| format!("Failed to process {}", job.input_media.display()))?;
    Ok(summary)
}

/// An explicitly named config must load and validate. Without one, the
/// config is optional and problems fall back to defaults.
fn load_settings(explicit: Option<&std::path::Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        let settings = Settings::load(Some(path))
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        settings
            .validate()
            .map_err(|msg| anyhow::anyhow!("Invalid config {}: {msg}", path.display()))?;
        return Ok(settings);
    }

    if let Some(path) = config::resolve_config_path() {
        debug!(path = %path.display(), "Looking for config file");
    }
    match Settings::load(None) {
        Ok(s) => match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => {
                warn!(error = %msg, "Invalid config, using defaults");
                Ok(Settings::default())
            }
        },
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Ok(Settings::default())
        }
    }
}
