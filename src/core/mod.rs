//! core/mod.rs
//!
//! The album pipeline, run once per invocation:
//!   (A) schedule -> Vec<TrackRecord>      (load + normalize; fatal on error)
//!   (B) source   -> AudioBuffer           (decode once; fatal on error)
//!   (C) per track: slice -> intermediate WAV -> encode -> tag -> commit
//!       (a failing track is reported and skipped; the album carries on)
//!
//! Nothing is written to disk until (A) and (B) have succeeded.
//! Tracks are processed strictly one after another.

pub mod audio;
pub mod encode;
pub mod output;
pub mod schedule;
pub mod tags;
pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Settings;

use audio::{AudioBuffer, DecodeError, SliceError};
use encode::{EncodeError, TrackEncoder};
use output::{IntermediateArtifact, OutputError};
use schedule::ScheduleError;
use tags::TagError;
use types::{AlbumContext, CoverArt, RunSummary, TrackFailure, TrackRecord};

/// Inputs of one album run.
#[derive(Debug, Clone)]
pub struct AlbumJob {
    pub input_media: PathBuf,
    pub schedule: PathBuf,
    pub cover_art: PathBuf,
    /// The album directory is created inside this one.
    pub output_root: PathBuf,
}

/// Errors that stop the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported input format {:?} for {} (supported: {})", extension, path.display(), supported.join(", "))]
    UnsupportedFormat {
        path: PathBuf,
        extension: String,
        supported: Vec<String>,
    },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("failed to read cover art {}: {source}", path.display())]
    CoverArt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Errors that cost one track.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error(transparent)]
    Slice(#[from] SliceError),

    #[error("failed to write intermediate {}: {source}", path.display())]
    Intermediate {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("re-encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("tagging failed: {0}")]
    Tag(#[from] TagError),

    #[error("failed to move finished track to {}: {source}", path.display())]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Run the whole pipeline for one album.
pub fn run_album(
    job: &AlbumJob,
    settings: &Settings,
    encoder: &dyn TrackEncoder,
) -> Result<RunSummary, PipelineError> {
    let supported = settings.input_extensions();
    if !audio::is_supported(&job.input_media, &supported) {
        return Err(PipelineError::UnsupportedFormat {
            path: job.input_media.clone(),
            extension: job
                .input_media
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
            supported,
        });
    }

    // Stage A
    let records = schedule::load_schedule(&job.schedule, settings.schedule.cursor)?;
    info!(tracks = records.len(), "Schedule normalized");

    let cover_art = read_cover_art(&job.cover_art)?;

    // Stage B
    let recording = audio::decode_file(&job.input_media)?;

    let album_name = records
        .first()
        .map(|r| r.meta.album.clone())
        .unwrap_or_default();
    for r in records.iter().filter(|r| r.meta.album != album_name) {
        warn!(
            row = r.index + 1,
            album = %r.meta.album,
            expected = %album_name,
            "Track names a different album; it still goes into the first track's album"
        );
    }

    let ctx = AlbumContext {
        output_directory: output::ensure_album_dir(&job.output_root, &album_name)?,
        album_name,
        cover_art,
    };
    info!(
        album = %ctx.album_name,
        dir = %ctx.output_directory.display(),
        sample_rate = recording.sample_rate(),
        channels = recording.channels(),
        "Writing album"
    );

    // Stage C
    let names = output::plan_file_names(
        &records,
        &settings.encoder.extension,
        settings.output.collisions,
    );

    let mut summary = RunSummary {
        output_directory: ctx.output_directory.clone(),
        ..RunSummary::default()
    };

    for (record, name) in records.iter().zip(names) {
        let final_path = ctx.output_directory.join(name);
        match process_track(record, &final_path, &ctx, &recording, settings, encoder) {
            Ok(()) => {
                info!(
                    track = record.meta.track_number,
                    title = %record.meta.title,
                    span = %record.span,
                    path = %final_path.display(),
                    "Track written"
                );
                summary.written.push(final_path);
            }
            Err(e) => {
                error!(
                    track = record.meta.track_number,
                    title = %record.meta.title,
                    error = %e,
                    "Skipping track"
                );
                summary.failed.push(TrackFailure {
                    index: record.index,
                    title: record.meta.title.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

fn read_cover_art(path: &Path) -> Result<CoverArt, PipelineError> {
    let data = fs::read(path).map_err(|source| PipelineError::CoverArt {
        path: path.to_path_buf(),
        source,
    })?;
    let mime_type = tags::sniff_mime(&data);
    if !infer::is_image(&data) {
        warn!(
            path = %path.display(),
            mime = %mime_type,
            "Cover art type not recognized; embedding as-is"
        );
    }
    Ok(CoverArt { data, mime_type })
}

/// Slice, encode and tag one track into `final_path`.
///
/// On failure nothing is left behind for this track and `final_path` is
/// untouched: the encoder writes to a staging file that only replaces
/// `final_path` once it is fully tagged.
fn process_track(
    record: &TrackRecord,
    final_path: &Path,
    ctx: &AlbumContext,
    recording: &AudioBuffer,
    settings: &Settings,
    encoder: &dyn TrackEncoder,
) -> Result<(), TrackError> {
    let slice = recording.slice(record.span, settings.slicing.overrun)?;
    debug!(
        track = record.meta.track_number,
        span = %record.span,
        span_ms = record.span.duration_ms(),
        frames = slice.frames(),
        "Sliced track"
    );

    let artifact = IntermediateArtifact::new(output::intermediate_path(final_path));
    audio::write_wav(artifact.path(), &slice).map_err(|source| TrackError::Intermediate {
        path: artifact.path().to_path_buf(),
        source,
    })?;

    let staged = IntermediateArtifact::new(output::staging_path(final_path));
    encoder.encode(artifact.path(), staged.path(), &record.meta)?;
    drop(artifact);

    tags::write_track_tags(staged.path(), &record.meta, &ctx.cover_art)?;
    if settings.tagging.verify {
        tags::verify_track_tags(staged.path(), &record.meta, &ctx.cover_art)?;
    }

    output::commit(staged.path(), final_path).map_err(|source| TrackError::Commit {
        path: final_path.to_path_buf(),
        source,
    })
}
