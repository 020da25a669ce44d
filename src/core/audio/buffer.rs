use tracing::warn;

use super::SliceError;
use crate::config::OverrunPolicy;
use crate::core::types::{Span, Timestamp};

/// The whole source recording, interleaved f32 samples.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

/// An owned copy of part of an [`AudioBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSlice {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioSlice {
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }
}

impl AudioBuffer {
    /// `samples` must be interleaved; a trailing partial frame is dropped.
    pub fn new(sample_rate: u32, channels: u16, mut samples: Vec<f32>) -> Self {
        let channels = channels.max(1);
        let whole = samples.len() - samples.len() % usize::from(channels);
        samples.truncate(whole);
        Self {
            sample_rate: sample_rate.max(1),
            channels,
            samples,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    pub fn duration(&self) -> Timestamp {
        let ms = self.frames() as u128 * 1000 / u128::from(self.sample_rate);
        Timestamp::from_millis(ms as u64)
    }

    /// Frame index of a millisecond offset (floor).
    fn frame_at(&self, t: Timestamp) -> usize {
        let f = u128::from(t.as_millis()) * u128::from(self.sample_rate) / 1000;
        usize::try_from(f).unwrap_or(usize::MAX)
    }

    /// Copy out `[span.start, span.end)`.
    ///
    /// An end past the recording is truncated under `OverrunPolicy::Clamp`
    /// and rejected under `OverrunPolicy::Fail`. A range with no frames left
    /// is always an error.
    pub fn slice(&self, span: Span, policy: OverrunPolicy) -> Result<AudioSlice, SliceError> {
        let total = self.frames();
        let start = self.frame_at(span.start);
        let mut end = self.frame_at(span.end);

        if end > total {
            match policy {
                OverrunPolicy::Fail => {
                    return Err(SliceError::PastEnd {
                        span,
                        duration: self.duration(),
                    });
                }
                OverrunPolicy::Clamp => {
                    warn!(
                        span = %span,
                        duration = %self.duration(),
                        "Track ends past the recording; clamping to the end"
                    );
                    end = total;
                }
            }
        }

        if start >= end {
            return Err(SliceError::Empty {
                span,
                duration: self.duration(),
            });
        }

        let ch = usize::from(self.channels);
        Ok(AudioSlice {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: self.samples[start * ch..end * ch].to_vec(),
        })
    }
}
