// Purpose - host-side buffers and WAV output

use std::path::Path;

use crate::error::{Error, Result};

/// Planar (one `Vec` per channel) audio owned by the host.
///
/// Nodes never own their I/O; this is the convenient way to hold the
/// buffers handed to [`DspNode::process`](crate::nodes::DspNode::process).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    frames: usize,
}

impl AudioBuffer {
    /// Silent buffer.
    pub fn new(channel_count: usize, frames: usize) -> Self {
        Self {
            channels: vec![vec![0.0; frames]; channel_count],
            frames,
        }
    }

    /// Fill each sample from `f(channel, frame)`.
    pub fn from_fn(
        channel_count: usize,
        frames: usize,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Self {
        let channels = (0..channel_count)
            .map(|channel| (0..frames).map(|frame| f(channel, frame)).collect())
            .collect();
        Self { channels, frames }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        &mut self.channels[channel]
    }

    /// Borrow every channel, in the shape `process` takes for input.
    pub fn channels(&self) -> Vec<&[f32]> {
        self.channels.iter().map(Vec::as_slice).collect()
    }

    /// Borrow every channel mutably, in the shape `process` takes for output.
    pub fn channels_mut(&mut self) -> Vec<&mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice).collect()
    }

    pub fn fill(&mut self, value: f32) {
        for channel in &mut self.channels {
            channel.fill(value);
        }
    }

    /// Frame-major copy: `[l0, r0, l1, r1, ...]`.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames * self.channels.len());
        for frame in 0..self.frames {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Largest absolute sample across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Write as 32-bit float WAV. WAV headers hold 1 to 65535 channels;
    /// anything else is rejected before the file is created.
    pub fn write_wav(&self, path: impl AsRef<Path>, sample_rate: u32) -> Result<()> {
        let channels = u16::try_from(self.channels.len())
            .ok()
            .filter(|&count| count > 0)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "wav files hold 1 to {} channels, got {}",
                    u16::MAX,
                    self.channels.len()
                ))
            })?;
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path.as_ref(), spec)?;
        for sample in self.interleaved() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        tracing::debug!(
            path = %path.as_ref().display(),
            channels = self.channels.len(),
            frames = self.frames,
            "wrote wav"
        );
        Ok(())
    }
}
