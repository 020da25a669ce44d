//! core/schedule/mod.rs
//!
//! Schedule Loader/Normalizer.
//!
//! Two explicit stages, same as the rest of core:
//!   (A) read the table -> Vec<ScheduleRow>   (text fields + optional timings)
//!   (B) normalize      -> Vec<TrackRecord>   (every row has start < end)
//!
//! Any error here is fatal for the run: later rows may depend on the
//! inference cursor, so a partial schedule is never handed downstream.

mod load;
mod normalize;
mod time;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::CursorPolicy;

use super::types::{Timestamp, TrackMeta, TrackRecord};

pub use load::{read_schedule, read_schedule_from};
pub use normalize::normalize;
pub use time::parse_hms;

/// A schedule row as read from the table, before boundary inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub meta: TrackMeta,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub duration: Option<Timestamp>,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("failed to open schedule {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schedule table: {0}")]
    Csv(#[from] csv::Error),

    #[error("schedule is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("schedule has no tracks")]
    Empty,

    #[error("row {row}: invalid {column} value {value:?} (expected HH:MM:SS)")]
    BadTimestamp {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: invalid track number {value:?} (expected a positive integer)")]
    BadTrackNumber { row: usize, value: String },

    #[error("row {row} ({title}): end and duration are both missing")]
    MissingEnd { row: usize, title: String },

    #[error("row {row} ({title}): start {start} is not before end {end}")]
    EmptySpan {
        row: usize,
        title: String,
        start: Timestamp,
        end: Timestamp,
    },
}

/// Read and normalize in one go.
pub fn load_schedule(path: &Path, policy: CursorPolicy) -> Result<Vec<TrackRecord>, ScheduleError> {
    let rows = read_schedule(path)?;
    normalize(&rows, policy)
}

#[cfg(test)]
mod tests;
