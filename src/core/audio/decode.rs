//! core/audio/decode.rs
//! Decode a whole file into an `AudioBuffer` with Symphonia.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

use super::{AudioBuffer, DecodeError};

/// Decode every packet of the first audio track in `path`.
///
/// Corrupt packets are skipped; a change of sample rate or channel count
/// mid-stream is an error since it would break millisecond addressing.
pub fn decode_file(path: &Path) -> Result<AudioBuffer, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| DecodeError::Probe {
            path: path.to_path_buf(),
            source,
        })?;

    let mut format = probed.format;

    // Containers such as mp4/webm may carry video too; take the first track we can decode.
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::NoAudioTrack {
            path: path.to_path_buf(),
        })?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|source| DecodeError::Codec {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples: Vec<f32> = Vec::new();
    let mut layout: Option<(u32, u16)> = None;
    let mut skipped_packets: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(source) => {
                return Err(DecodeError::Decode {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupt packet; skip.
                debug!(path = %path.display(), error = msg, "Skipping undecodable packet");
                skipped_packets += 1;
                continue;
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(source) => {
                return Err(DecodeError::Decode {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let spec = SignalSpec::new(decoded.spec().rate, decoded.spec().channels.clone());
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let this = (spec.rate, spec.channels.count() as u16);
        match layout {
            None => layout = Some(this),
            Some(first) if first != this => {
                return Err(DecodeError::FormatChanged {
                    path: path.to_path_buf(),
                    from_rate: first.0,
                    from_channels: first.1,
                    to_rate: this.0,
                    to_channels: this.1,
                });
            }
            Some(_) => {}
        }

        let mut sbuf = SampleBuffer::<f32>::new(frames as u64, spec);
        sbuf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sbuf.samples());
    }

    let Some((sample_rate, channels)) = layout else {
        return Err(DecodeError::Empty {
            path: path.to_path_buf(),
        });
    };

    let buffer = AudioBuffer::new(sample_rate, channels, samples);
    info!(
        path = %path.display(),
        sample_rate,
        channels,
        duration = %buffer.duration(),
        skipped_packets,
        "Decoded source recording"
    );
    Ok(buffer)
}
