//! core/tags/read.rs
//! Read back the fields `write_track_tags` owns.
//!
//! Missing frames read as empty strings, which is also how an empty schedule
//! cell is written (the frame is removed).

use std::path::Path;

use id3::frame::Content;
use id3::{Tag, TagLike};

use super::TagError;
use super::art::first_picture;
use super::util::parse_slash_pair_u32;
use crate::core::types::{CoverArt, TrackMeta};

/// The tag fields of one output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub date: String,
    pub comment: String,
    pub track_number: Option<u32>,
    /// (image_bytes, mime) of the first embedded picture.
    pub cover: Option<(Vec<u8>, String)>,
}

pub fn read_track_tags(path: &Path) -> Result<TagSnapshot, TagError> {
    let tag = Tag::read_from_path(path).map_err(|source| TagError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(TagSnapshot {
        title: text_frame(&tag, "TIT2"),
        artist: text_frame(&tag, "TPE1"),
        album: text_frame(&tag, "TALB"),
        genre: text_frame(&tag, "TCON"),
        date: text_frame(&tag, "TDRC"),
        comment: first_comment(&tag),
        track_number: parse_slash_pair_u32(Some(text_frame(&tag, "TRCK").as_str())).0,
        cover: first_picture(&tag),
    })
}

/// Read `path` back and compare against what was meant to be written.
pub fn verify_track_tags(path: &Path, meta: &TrackMeta, cover: &CoverArt) -> Result<(), TagError> {
    let snap = read_track_tags(path)?;

    let fields = [
        ("title", meta.title.as_str(), snap.title.as_str()),
        ("artist", meta.artist.as_str(), snap.artist.as_str()),
        ("album", meta.album.as_str(), snap.album.as_str()),
        ("genre", meta.genre.as_str(), snap.genre.as_str()),
        ("date", meta.date.as_str(), snap.date.as_str()),
        ("comment", meta.comment.as_str(), snap.comment.as_str()),
    ];
    for (field, expected, found) in fields {
        if expected.trim() != found {
            return Err(TagError::Mismatch {
                field,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }

    match &snap.cover {
        Some((data, _)) if *data == cover.data => Ok(()),
        _ => Err(TagError::CoverMismatch),
    }
}

/// Get the "plain text" value of a specific ID3 frame id, or "" if absent.
fn text_frame(tag: &Tag, id: &str) -> String {
    match tag.get(id).map(|f| f.content()) {
        Some(Content::Text(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Find the first COMM frame and return its text.
fn first_comment(tag: &Tag) -> String {
    for frame in tag.frames() {
        if frame.id() != "COMM" {
            continue;
        }
        if let Content::Comment(c) = frame.content() {
            return c.text.clone();
        }
    }
    String::new()
}
