use super::*;
use crate::config::OverrunPolicy;
use crate::core::types::{Span, Timestamp};

fn span(start_ms: u64, end_ms: u64) -> Span {
    Span {
        start: Timestamp::from_millis(start_ms),
        end: Timestamp::from_millis(end_ms),
    }
}

/// 1 kHz stereo buffer where frame `i` holds `(i, -i)` scaled down.
fn ramp(frames: usize) -> AudioBuffer {
    let mut samples = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let v = i as f32 / 100_000.0;
        samples.push(v);
        samples.push(-v);
    }
    AudioBuffer::new(1000, 2, samples)
}

fn write_tone(path: &Path, rate: u32, channels: u16, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let s = ((i % 64) as i16 - 32) * 256;
        for _ in 0..channels {
            w.write_sample(s).unwrap();
        }
    }
    w.finalize().unwrap();
}

#[test]
fn buffer_reports_frames_and_duration() {
    let buf = ramp(2500);
    assert_eq!(buf.frames(), 2500);
    assert_eq!(buf.duration(), Timestamp::from_millis(2500));
}

#[test]
fn trailing_partial_frame_is_dropped() {
    let buf = AudioBuffer::new(1000, 2, vec![0.0; 5]);
    assert_eq!(buf.frames(), 2);
}

#[test]
fn slice_copies_the_exact_range() {
    let buf = ramp(1000);
    let s = buf.slice(span(100, 250), OverrunPolicy::Fail).unwrap();

    assert_eq!(s.frames(), 150);
    assert_eq!(s.channels, 2);
    assert_eq!(s.sample_rate, 1000);
    assert_eq!(s.samples[0], 100.0 / 100_000.0);
    assert_eq!(s.samples[1], -100.0 / 100_000.0);
    assert_eq!(s.samples[s.samples.len() - 2], 249.0 / 100_000.0);
}

#[test]
fn slicing_is_idempotent() {
    let buf = ramp(1000);
    let a = buf.slice(span(10, 900), OverrunPolicy::Clamp).unwrap();
    let b = buf.slice(span(10, 900), OverrunPolicy::Clamp).unwrap();
    assert_eq!(a, b);
    assert_eq!(buf.frames(), 1000);
}

#[test]
fn adjacent_slices_share_no_frames_and_lose_none() {
    let buf = ramp(1000);
    let a = buf.slice(span(0, 400), OverrunPolicy::Fail).unwrap();
    let b = buf.slice(span(400, 1000), OverrunPolicy::Fail).unwrap();
    assert_eq!(a.frames() + b.frames(), buf.frames());
    assert_eq!(b.samples[0], 400.0 / 100_000.0);
}

#[test]
fn overrun_is_clamped_or_rejected_by_policy() {
    let buf = ramp(1000);

    let clamped = buf.slice(span(900, 5000), OverrunPolicy::Clamp).unwrap();
    assert_eq!(clamped.frames(), 100);

    assert!(matches!(
        buf.slice(span(900, 5000), OverrunPolicy::Fail),
        Err(SliceError::PastEnd { .. })
    ));

    // Ending exactly at the end is not an overrun.
    assert!(buf.slice(span(900, 1000), OverrunPolicy::Fail).is_ok());
}

#[test]
fn slice_starting_past_the_end_is_empty_even_when_clamping() {
    let buf = ramp(1000);
    assert!(matches!(
        buf.slice(span(1000, 2000), OverrunPolicy::Clamp),
        Err(SliceError::Empty { .. })
    ));
}

#[test]
fn extension_check_is_case_insensitive() {
    let exts = vec!["mp3".to_string(), "webm".to_string()];
    assert!(is_supported(Path::new("/a/b.MP3"), &exts));
    assert!(is_supported(Path::new("set.webm"), &exts));
    assert!(!is_supported(Path::new("set.flac"), &exts));
    assert!(!is_supported(Path::new("set"), &exts));
}

#[test]
fn decodes_wav_into_interleaved_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_tone(&path, 8000, 2, 8000 * 3);

    let buf = decode_file(&path).unwrap();
    assert_eq!(buf.sample_rate(), 8000);
    assert_eq!(buf.channels(), 2);
    assert_eq!(buf.frames(), 8000 * 3);
    assert_eq!(buf.duration(), Timestamp::from_millis(3000));
}

#[test]
fn wav_round_trips_through_the_decoder() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src.wav");
    write_tone(&src, 8000, 1, 8000);
    let buf = decode_file(&src).unwrap();

    let slice = buf.slice(span(250, 750), OverrunPolicy::Fail).unwrap();
    let out = dir.path().join("slice.wav");
    write_wav(&out, &slice).unwrap();

    let back = decode_file(&out).unwrap();
    assert_eq!(back.channels(), 1);
    assert_eq!(back.frames(), 4000);
    assert_eq!(back.duration(), Timestamp::from_millis(500));
}

#[test]
fn decoding_garbage_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.wav");
    std::fs::write(&path, b"this is not a riff file").unwrap();
    assert!(decode_file(&path).is_err());

    assert!(matches!(
        decode_file(&dir.path().join("missing.wav")),
        Err(DecodeError::Open { .. })
    ));
}
