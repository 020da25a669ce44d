//! core/encode.rs
//! Re-encode an intermediate artifact into the final format.
//!
//! The encoder is an external process. Each call is scoped: stderr is
//! captured, the exit status decides success, and a hard timeout kills the
//! child. Nothing here retries.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::config::EncoderSettings;

use super::types::TrackMeta;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Keep error messages readable when the encoder is chatty.
const STDERR_TAIL_BYTES: usize = 2048;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} did not finish within {}s", timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("lost track of {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Turns an intermediate artifact into a final track file.
pub trait TrackEncoder {
    /// Encode `input` into `output`, stamping `meta` where the encoder supports it.
    fn encode(&self, input: &Path, output: &Path, meta: &TrackMeta) -> Result<(), EncodeError>;
}

/// `ffmpeg` (or anything with the same command line).
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
    bitrate: String,
    timeout: Duration,
    container_metadata: bool,
}

impl FfmpegEncoder {
    pub fn new(settings: &EncoderSettings) -> Self {
        Self {
            program: PathBuf::from(&settings.program),
            bitrate: settings.bitrate.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            container_metadata: settings.container_metadata,
        }
    }

    fn args(&self, input: &Path, output: &Path, meta: &TrackMeta) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-nostdin", "-y", "-loglevel", "error", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(input.as_os_str().to_owned());
        for a in ["-vn", "-ab", self.bitrate.as_str(), "-map_metadata", "0"] {
            args.push(a.into());
        }

        if self.container_metadata {
            let track = meta.track_number.to_string();
            let fields = [
                ("comment", meta.comment.as_str()),
                ("album", meta.album.as_str()),
                ("genre", meta.genre.as_str()),
                ("date", meta.date.as_str()),
                ("title", meta.title.as_str()),
                ("artist", meta.artist.as_str()),
                ("track", track.as_str()),
            ];
            for (key, value) in fields {
                args.push("-metadata".into());
                args.push(format!("{key}={value}").into());
            }
        }

        args.push(output.as_os_str().to_owned());
        args
    }
}

impl TrackEncoder for FfmpegEncoder {
    fn encode(&self, input: &Path, output: &Path, meta: &TrackMeta) -> Result<(), EncodeError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(input, output, meta));
        debug!(
            program = %self.program.display(),
            input = %input.display(),
            output = %output.display(),
            "Running encoder"
        );
        run_scoped(cmd, self.timeout)
    }
}

/// Run `cmd` to completion (or until `timeout`), treating a non-zero exit as failure.
pub fn run_scoped(mut cmd: Command, timeout: Duration) -> Result<(), EncodeError> {
    let program = cmd.get_program().to_string_lossy().into_owned();

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| EncodeError::Spawn {
            program: program.clone(),
            source,
        })?;

    // Drain stderr on its own thread so a full pipe can never stall the child.
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });
    let collect_stderr = |reader: Option<thread::JoinHandle<Vec<u8>>>| {
        reader
            .and_then(|h| h.join().ok())
            .map(|bytes| tail(&String::from_utf8_lossy(&bytes)))
            .unwrap_or_default()
    };

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if started.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = collect_stderr(stderr_reader);
                return Err(EncodeError::TimedOut { program, timeout });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                let _ = child.kill();
                return Err(EncodeError::Wait { program, source });
            }
        }
    };

    let stderr = collect_stderr(stderr_reader);
    if status.success() {
        if !stderr.is_empty() {
            debug!(program = %program, stderr = %stderr, "Encoder finished with output");
        }
        Ok(())
    } else {
        Err(EncodeError::Failed {
            program,
            status,
            stderr,
        })
    }
}

fn tail(s: &str) -> String {
    let s = s.trim();
    if s.len() <= STDERR_TAIL_BYTES {
        return s.to_string();
    }
    let mut cut = s.len() - STDERR_TAIL_BYTES;
    while !s.is_char_boundary(cut) {
        cut += 1;
    }
    format!("...{}", &s[cut..])
}
