//! Write a track's ID3 tag: the six text fields, track number and cover art.

use std::path::Path;

use id3::frame::{Comment, Picture, PictureType};
use id3::{Tag, TagLike, Version};

use super::TagError;
use crate::core::types::{CoverArt, TrackMeta};

const COVER_DESCRIPTION: &str = "Cover art";

/// Helper: set/remove a plain text frame (T***)
fn set_text_opt(tag: &mut Tag, id: &str, v: &str) {
    let v = v.trim();
    if v.is_empty() {
        let _ = tag.remove(id); // TagLike::remove returns Vec<Frame>; discard it
    } else {
        tag.set_text(id, v.to_string());
    }
}

/// Helper: replace all COMM frames with a single "eng" comment (or none).
fn set_comment(tag: &mut Tag, text: &str) {
    let _ = tag.remove("COMM");
    let text = text.trim();
    if !text.is_empty() {
        let _ = tag.add_frame(Comment {
            lang: "eng".to_string(),
            description: String::new(),
            text: text.to_string(),
        });
    }
}

/// Helper: replace every embedded picture with the shared front cover.
fn set_cover(tag: &mut Tag, cover: &CoverArt) {
    tag.remove_all_pictures();
    let _ = tag.add_frame(Picture {
        mime_type: cover.mime_type.clone(),
        picture_type: PictureType::CoverFront,
        description: COVER_DESCRIPTION.to_string(),
        data: cover.data.clone(),
    });
}

/// Stamp `meta` and `cover` onto the file at `path`.
///
/// Frames already present (for example whatever the encoder wrote) are kept
/// unless we own them; the fields we own are overwritten.
pub fn write_track_tags(path: &Path, meta: &TrackMeta, cover: &CoverArt) -> Result<(), TagError> {
    // Load existing tag if possible; otherwise start fresh.
    let mut tag = Tag::read_from_path(path).unwrap_or_else(|_| Tag::new());

    set_text_opt(&mut tag, "TIT2", &meta.title);
    set_text_opt(&mut tag, "TPE1", &meta.artist);
    set_text_opt(&mut tag, "TALB", &meta.album);
    set_text_opt(&mut tag, "TCON", &meta.genre);
    // Date stays text; schedules carry anything from "1999" to "1999-04-01".
    set_text_opt(&mut tag, "TDRC", &meta.date);
    tag.set_text("TRCK", meta.track_number.to_string());

    set_comment(&mut tag, &meta.comment);
    set_cover(&mut tag, cover);

    tag.write_to_path(path, Version::Id3v24)
        .map_err(|source| TagError::Write {
            path: path.to_path_buf(),
            source,
        })
}
