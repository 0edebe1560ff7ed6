#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampler::SampleDescriptor;

/// A sample whose audio is already in memory.
///
/// `data` holds `channel_count * frame_count` values, either frame-major
/// (interleaved) or channel after channel. Deserializing goes through
/// [`new`](Self::new), so a stored sample is checked like a built one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SampleDataFields"))]
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDataDescriptor {
    descriptor: SampleDescriptor,
    sample_rate: f32,
    is_interleaved: bool,
    channel_count: usize,
    frame_count: usize,
    data: Vec<f32>,
}

impl SampleDataDescriptor {
    /// Wrap `data`, checking its shape against the descriptor. End-point
    /// sentinels are resolved to `frame_count`.
    pub fn new(
        descriptor: SampleDescriptor,
        sample_rate: f32,
        is_interleaved: bool,
        channel_count: usize,
        frame_count: usize,
        data: Vec<f32>,
    ) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::invalid(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        if channel_count == 0 {
            return Err(Error::invalid("sample needs at least one channel"));
        }
        let expected = channel_count
            .checked_mul(frame_count)
            .ok_or_else(|| Error::invalid("sample dimensions overflow"))?;
        if data.len() != expected {
            return Err(Error::invalid(format!(
                "{channel_count} channels x {frame_count} frames needs {expected} values, got {}",
                data.len()
            )));
        }

        let descriptor = descriptor.resolve(frame_count)?;
        Ok(Self {
            descriptor,
            sample_rate,
            is_interleaved,
            channel_count,
            frame_count,
            data,
        })
    }

    pub fn descriptor(&self) -> &SampleDescriptor {
        &self.descriptor
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn is_interleaved(&self) -> bool {
        self.is_interleaved
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// One value, wherever the layout put it.
    pub fn sample(&self, channel: usize, frame: usize) -> Option<f32> {
        if channel >= self.channel_count || frame >= self.frame_count {
            return None;
        }
        let index = if self.is_interleaved {
            frame * self.channel_count + channel
        } else {
            channel * self.frame_count + frame
        };
        Some(self.data[index])
    }

    /// Every frame of one channel.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        let frames = if channel < self.channel_count {
            self.frame_count
        } else {
            0
        };
        (0..frames).filter_map(move |frame| self.sample(channel, frame))
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct SampleDataFields {
    descriptor: SampleDescriptor,
    sample_rate: f32,
    is_interleaved: bool,
    channel_count: usize,
    frame_count: usize,
    data: Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<SampleDataFields> for SampleDataDescriptor {
    type Error = Error;

    fn try_from(fields: SampleDataFields) -> Result<Self> {
        Self::new(
            fields.descriptor,
            fields.sample_rate,
            fields.is_interleaved,
            fields.channel_count,
            fields.frame_count,
            fields.data,
        )
    }
}
