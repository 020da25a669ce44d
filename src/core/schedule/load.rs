//! Read the schedule table (CSV with a header row) into `ScheduleRow`s.
//!
//! Columns are validated by name up front so a table missing, say, `genre`
//! fails with a message naming `genre` rather than a deserializer error on
//! the first row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::parse_hms;
use super::{ScheduleError, ScheduleRow};
use crate::core::tags::util::parse_slash_pair_u32;
use crate::core::types::{Timestamp, TrackMeta};

/// Text columns every schedule must carry.
const REQUIRED_COLUMNS: &[&str] = &["title", "artist", "album", "genre", "date", "comment"];

/// The track number column and its accepted spellings.
const TRACK_COLUMNS: &[&str] = &["track", "track_number"];

const START_COLUMN: &str = "start_HH:MM:SS";
const END_COLUMN: &str = "end_HH:MM:SS";
const DURATION_COLUMN: &str = "duration_HH:MM:SS";

/// Row shape as it appears in the table. Every cell is text; conversion
/// happens in `into_row` so errors can name the row and column.
#[derive(Debug, Deserialize)]
struct RawRow {
    title: String,
    artist: String,
    album: String,
    genre: String,
    date: String,
    comment: String,
    #[serde(alias = "track_number")]
    track: String,
    #[serde(rename = "start_HH:MM:SS", alias = "start", default)]
    start: Option<String>,
    #[serde(rename = "end_HH:MM:SS", alias = "end", default)]
    end: Option<String>,
    #[serde(rename = "duration_HH:MM:SS", alias = "duration", default)]
    duration: Option<String>,
}

impl RawRow {
    fn into_row(self, row: usize) -> Result<ScheduleRow, ScheduleError> {
        let track_number = match parse_slash_pair_u32(Some(self.track.as_str())) {
            (Some(n), _) if n > 0 => n,
            _ => {
                return Err(ScheduleError::BadTrackNumber {
                    row,
                    value: self.track,
                });
            }
        };

        Ok(ScheduleRow {
            start: timing(row, START_COLUMN, self.start)?,
            end: timing(row, END_COLUMN, self.end)?,
            duration: timing(row, DURATION_COLUMN, self.duration)?,
            meta: TrackMeta {
                title: self.title,
                artist: self.artist,
                album: self.album,
                genre: self.genre,
                date: self.date,
                comment: self.comment,
                track_number,
            },
        })
    }
}

fn timing(
    row: usize,
    column: &'static str,
    value: Option<String>,
) -> Result<Option<Timestamp>, ScheduleError> {
    match value {
        None => Ok(None),
        Some(v) => match parse_hms(&v) {
            Some(ts) => Ok(Some(ts)),
            None => Err(ScheduleError::BadTimestamp {
                row,
                column,
                value: v,
            }),
        },
    }
}

/// Read a schedule from a CSV file on disk.
pub fn read_schedule(path: &Path) -> Result<Vec<ScheduleRow>, ScheduleError> {
    let file = File::open(path).map_err(|source| ScheduleError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_schedule_from(file)?;
    debug!(path = %path.display(), rows = rows.len(), "Schedule table read");
    Ok(rows)
}

/// Read a schedule from any CSV source.
pub fn read_schedule_from<R: Read>(source: R) -> Result<Vec<ScheduleRow>, ScheduleError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    check_columns(&headers)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let raw: RawRow = record.deserialize(Some(&headers))?;
        rows.push(raw.into_row(i + 1)?);
    }

    if rows.is_empty() {
        return Err(ScheduleError::Empty);
    }
    Ok(rows)
}

fn check_columns(headers: &csv::StringRecord) -> Result<(), ScheduleError> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !has(c))
        .map(|c| c.to_string())
        .collect();
    if !TRACK_COLUMNS.iter().any(|c| has(c)) {
        missing.push(TRACK_COLUMNS[0].to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ScheduleError::MissingColumns(missing))
    }
}
