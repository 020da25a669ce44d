use std::path::Path;

use super::AudioSlice;

/// Write `slice` as 16-bit PCM WAV.
pub fn write_wav(path: &Path, slice: &AudioSlice) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: slice.channels,
        sample_rate: slice.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in &slice.samples {
        writer.write_sample(to_i16(s))?;
    }
    writer.finalize()
}

fn to_i16(s: f32) -> i16 {
    (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}
