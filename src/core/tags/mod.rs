//! core/tags/mod.rs
//!
//! ID3 tag read/write utilities.
//! Public API:
//! - [`write_track_tags`] stamps a track's metadata and the shared cover art.
//! - [`read_track_tags`] reads the same fields back.
//! - [`verify_track_tags`] checks a written file against what we meant to write.

mod art;
mod read;
pub(crate) mod util;
mod write;

use std::path::PathBuf;

use thiserror::Error;

pub use art::sniff_mime;
pub use read::{read_track_tags, verify_track_tags};
pub use write::write_track_tags;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to write tags to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    #[error("failed to read tags from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    #[error("{field} reads back as {found:?}, expected {expected:?}")]
    Mismatch {
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("embedded cover art does not match the source image")]
    CoverMismatch,
}
