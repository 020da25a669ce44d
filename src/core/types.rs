//! Core data types shared between the pipeline stages.
//!
//! These are plain bags of data: no filesystem, decoding or tagging code.
//! `TrackRecord` is one row of the schedule after normalization; it is
//! read-only from slicing onwards.

use std::fmt;
use std::path::PathBuf;

/// Millisecond offset into the source recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, other: Timestamp) -> Timestamp {
        Timestamp(self.0.saturating_add(other.0))
    }
}

/// Renders as `HH:MM:SS`, with `.mmm` only when there is a sub-second part.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0 / 1000;
        let ms = self.0 % 1000;
        let (h, m, s) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);
        if ms == 0 {
            write!(f, "{h:02}:{m:02}:{s:02}")
        } else {
            write!(f, "{h:02}:{m:02}:{s:02}.{ms:03}")
        }
    }
}

/// Half-open `[start, end)` range in the source recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Span {
    pub fn duration_ms(&self) -> u64 {
        self.end.as_millis().saturating_sub(self.start.as_millis())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The text fields stamped into every output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMeta {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub date: String,
    pub comment: String,
    /// Tag ordering only; uniqueness is not enforced.
    pub track_number: u32,
}

/// One schedule row with both boundaries resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Zero-based position in the schedule table.
    pub index: usize,
    pub meta: TrackMeta,
    pub span: Span,
}

/// Shared cover image, embedded identically into every track.
#[derive(Debug, Clone)]
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Per-album state resolved before any track is processed.
#[derive(Debug, Clone)]
pub struct AlbumContext {
    /// Taken from the first record.
    pub album_name: String,
    pub output_directory: PathBuf,
    pub cover_art: CoverArt,
}

/// A track that was skipped, with the reason already rendered for display.
#[derive(Debug, Clone)]
pub struct TrackFailure {
    pub index: usize,
    pub title: String,
    pub reason: String,
}

/// What one album run produced.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub output_directory: PathBuf,
    pub written: Vec<PathBuf>,
    pub failed: Vec<TrackFailure>,
}

impl RunSummary {
    pub fn all_failed(&self) -> bool {
        self.written.is_empty() && !self.failed.is_empty()
    }
}
