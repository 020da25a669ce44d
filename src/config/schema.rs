use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/albumcut/config.toml` or `~/.config/albumcut/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags (applied by `main`)
/// 2) Environment variables (prefix `ALBUMCUT__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub schedule: ScheduleSettings,
    pub slicing: SlicingSettings,
    pub encoder: EncoderSettings,
    pub tagging: TaggingSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Source extensions we know how to decode (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "mp4".into(), "webm".into()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Which boundaries move the inference cursor forward.
    pub cursor: CursorPolicy,
}

/// How the running `start` cursor advances while normalizing a schedule.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorPolicy {
    /// Only an inferred `end` (start + duration) advances the cursor.
    /// An explicit `end` is used for its own row and then forgotten.
    #[default]
    #[serde(alias = "inferred_only")]
    InferredOnly,
    /// Every resolved `end`, explicit or inferred, advances the cursor.
    #[serde(alias = "follow_explicit")]
    FollowExplicit,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlicingSettings {
    /// What to do when a track's `end` lies past the end of the recording.
    pub overrun: OverrunPolicy,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverrunPolicy {
    /// Truncate to the end of the recording.
    #[default]
    Clamp,
    /// Reject the track.
    Fail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    /// Encoder executable, resolved through `PATH` unless absolute.
    pub program: String,
    /// Target bitrate passed as `-ab`.
    pub bitrate: String,
    /// Extension (and therefore container) of the final files.
    pub extension: String,
    /// Hard limit for one encoder invocation.
    pub timeout_secs: u64,
    /// Also stamp metadata through the encoder (`-metadata key=value`).
    pub container_metadata: bool,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            bitrate: "192k".to_string(),
            extension: "mp3".to_string(),
            timeout_secs: 600,
            container_metadata: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaggingSettings {
    /// Re-read tags after writing and fail the track if they differ.
    pub verify: bool,
}

impl Default for TaggingSettings {
    fn default() -> Self {
        Self { verify: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory the album folder is created in. Defaults to the working directory.
    pub root: Option<PathBuf>,
    /// How to name a track whose file name is already taken in this run.
    pub collisions: CollisionPolicy,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// `Title (3).mp3` for the later of two tracks named `Title`.
    #[default]
    #[serde(alias = "append_track_number")]
    AppendTrackNumber,
    /// Later tracks replace earlier files of the same name.
    Overwrite,
}
