//! core/output.rs
//! Output Materializer: where files go and what they are called.
//!
//! - The album directory is `<root>/<album>` and creating it is idempotent.
//! - Track files are `<title>.<ext>`; a title already used earlier in the
//!   same run gets its track number appended (or overwrites, by policy).
//! - Intermediate artifacts are owned by a guard that deletes them on drop.
//! - A track is encoded and tagged under a staging name and only renamed
//!   onto its final name once complete, so a failed track never touches a
//!   file that was already there.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CollisionPolicy;

use super::types::TrackRecord;

#[derive(Debug, Error)]
#[error("failed to create output directory {}: {source}", path.display())]
pub struct OutputError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Create (if needed) and return the album directory under `root`.
pub fn ensure_album_dir(root: &Path, album: &str) -> Result<PathBuf, OutputError> {
    let dir = root.join(sanitize_component(album, "album"));
    fs::create_dir_all(&dir).map_err(|source| OutputError {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Make `name` safe as a single path component.
///
/// Path separators and control characters become `_`; names that would be
/// empty or refer to `.`/`..` fall back to `fallback`.
pub fn sanitize_component(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Final file name (without directory) for every record, in schedule order.
pub fn plan_file_names(
    records: &[TrackRecord],
    extension: &str,
    policy: CollisionPolicy,
) -> Vec<String> {
    let ext = extension.trim().trim_start_matches('.');
    let mut used: HashSet<String> = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());

    for r in records {
        let fallback = format!("track-{}", r.meta.track_number);
        let stem = sanitize_component(&r.meta.title, &fallback);
        let mut name = format!("{stem}.{ext}");

        if policy == CollisionPolicy::AppendTrackNumber && used.contains(&name.to_lowercase()) {
            let n = r.meta.track_number;
            name = format!("{stem} ({n}).{ext}");
            let mut k = 2;
            while used.contains(&name.to_lowercase()) {
                name = format!("{stem} ({n}-{k}).{ext}");
                k += 1;
            }
            warn!(
                title = %r.meta.title,
                file = %name,
                "Duplicate track title; appending track number"
            );
        }

        // Compare case-insensitively so names stay distinct on case-folding filesystems.
        used.insert(name.to_lowercase());
        out.push(name);
    }

    out
}

/// Path of the transient file the encoder reads for `final_path`.
pub fn intermediate_path(final_path: &Path) -> PathBuf {
    let stem = final_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "track".to_string());
    final_path.with_file_name(format!("{stem}_temp.wav"))
}

/// Path a track is encoded and tagged under before it is committed.
///
/// Keeps the final extension so the encoder still picks the right format.
pub fn staging_path(final_path: &Path) -> PathBuf {
    let stem = final_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "track".to_string());
    match final_path.extension() {
        Some(ext) => final_path.with_file_name(format!("{stem}.part.{}", ext.to_string_lossy())),
        None => final_path.with_file_name(format!("{stem}.part")),
    }
}

/// Move a finished staging file onto its final name, replacing whatever is there.
pub fn commit(staged: &Path, final_path: &Path) -> std::io::Result<()> {
    fs::rename(staged, final_path)?;
    debug!(path = %final_path.display(), "Committed track");
    Ok(())
}

/// A transient file that is removed when the guard goes away, whatever
/// happened in between.
#[derive(Debug)]
pub struct IntermediateArtifact {
    path: PathBuf,
}

impl IntermediateArtifact {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for IntermediateArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed intermediate artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove intermediate artifact"
            ),
        }
    }
}
