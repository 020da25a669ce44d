use id3::Tag;
use id3::frame::Content;

/// MIME type declared for embedded cover art when sniffing finds nothing.
const FALLBACK_MIME: &str = "image/jpeg";

/// Guess the MIME type of an image from its leading bytes.
pub fn sniff_mime(data: &[u8]) -> String {
    match infer::get(data) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => {
            kind.mime_type().to_string()
        }
        _ => FALLBACK_MIME.to_string(),
    }
}

/// Returns (image_bytes, mime) for the first embedded picture (APIC/PIC).
pub(crate) fn first_picture(tag: &Tag) -> Option<(Vec<u8>, String)> {
    for f in tag.frames() {
        if f.id() != "APIC" && f.id() != "PIC" {
            continue;
        }
        if let Content::Picture(p) = f.content() {
            return Some((p.data.clone(), p.mime_type.clone()));
        }
    }
    None
}
