//! core/audio/mod.rs
//!
//! Decoded source audio and slicing.
//!
//! - [`decode_file`] turns the source recording into an [`AudioBuffer`]
//!   (interleaved f32, loaded once, never mutated).
//! - [`AudioBuffer::slice`] copies out one `[start, end)` range.
//! - [`write_wav`] writes a slice as the intermediate artifact the encoder reads.

mod buffer;
mod decode;
mod wav;

use std::path::{Path, PathBuf};

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

use super::types::{Span, Timestamp};

pub use buffer::{AudioBuffer, AudioSlice};
pub use decode::decode_file;
pub use wav::write_wav;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to probe {}: {source}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },

    #[error("no decodable audio track in {}", path.display())]
    NoAudioTrack { path: PathBuf },

    #[error("failed to create decoder for {}: {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },

    #[error("error while decoding {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },

    #[error("{}: stream format changed mid-file ({from_rate} Hz/{from_channels} ch -> {to_rate} Hz/{to_channels} ch)", path.display())]
    FormatChanged {
        path: PathBuf,
        from_rate: u32,
        from_channels: u16,
        to_rate: u32,
        to_channels: u16,
    },

    #[error("{} contains no audio", path.display())]
    Empty { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum SliceError {
    #[error("span {span} ends past the end of the recording ({duration})")]
    PastEnd { span: Span, duration: Timestamp },

    #[error("span {span} is empty within a recording of {duration}")]
    Empty { span: Span, duration: Timestamp },
}

/// Case-insensitive extension check against the configured source formats.
pub fn is_supported(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests;
