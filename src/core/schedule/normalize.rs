//! Boundary inference.
//!
//! A cursor starts at 0 and is threaded through the rows as an explicit
//! accumulator:
//! - missing `start` -> cursor
//! - missing `end`   -> start + duration, and the cursor moves to that end
//! - explicit `end`  -> used verbatim; the cursor only follows it under
//!   `CursorPolicy::FollowExplicit`
//!
//! Explicit boundaries are never corrected against their neighbours.

use tracing::{debug, warn};

use super::{ScheduleError, ScheduleRow};
use crate::config::CursorPolicy;
use crate::core::types::{Span, Timestamp, TrackRecord};

/// Resolve every row's span. Fails on the first row that cannot be resolved.
pub fn normalize(
    rows: &[ScheduleRow],
    policy: CursorPolicy,
) -> Result<Vec<TrackRecord>, ScheduleError> {
    if rows.is_empty() {
        return Err(ScheduleError::Empty);
    }

    let mut out: Vec<TrackRecord> = Vec::with_capacity(rows.len());
    let mut cursor = Timestamp::ZERO;

    for (index, row) in rows.iter().enumerate() {
        let (span, next_cursor) = resolve_span(index, row, cursor, policy)?;
        cursor = next_cursor;

        if let Some(prev) = out.last() {
            if span.start < prev.span.end {
                warn!(
                    row = index + 1,
                    start = %span.start,
                    previous_end = %prev.span.end,
                    "Track overlaps the previous track; keeping explicit boundaries"
                );
            }
        }

        debug!(row = index + 1, title = %row.meta.title, span = %span, "Resolved track span");
        out.push(TrackRecord {
            index,
            meta: row.meta.clone(),
            span,
        });
    }

    Ok(out)
}

/// One step of the fold: returns the row's span and the cursor for the next row.
fn resolve_span(
    index: usize,
    row: &ScheduleRow,
    cursor: Timestamp,
    policy: CursorPolicy,
) -> Result<(Span, Timestamp), ScheduleError> {
    let start = row.start.unwrap_or(cursor);

    let (end, next_cursor) = match row.end {
        Some(end) => {
            let next = match policy {
                CursorPolicy::InferredOnly => cursor,
                CursorPolicy::FollowExplicit => end,
            };
            (end, next)
        }
        None => {
            let duration = row.duration.ok_or_else(|| ScheduleError::MissingEnd {
                row: index + 1,
                title: row.meta.title.clone(),
            })?;
            let end = start.saturating_add(duration);
            (end, end)
        }
    };

    if start >= end {
        return Err(ScheduleError::EmptySpan {
            row: index + 1,
            title: row.meta.title.clone(),
            start,
            end,
        });
    }

    Ok((Span { start, end }, next_cursor))
}
