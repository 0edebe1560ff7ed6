use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampler::{SampleDataDescriptor, SampleDescriptor};

/// A sample that still lives on disk. Loading is explicit and blocking.
///
/// The descriptor refers to the file; it never owns or removes it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFileDescriptor {
    pub descriptor: SampleDescriptor,
    pub path: PathBuf,
}

impl SampleFileDescriptor {
    pub fn new(descriptor: SampleDescriptor, path: impl Into<PathBuf>) -> Result<Self> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            path: path.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the WAV file into an interleaved in-memory sample.
    ///
    /// Integer PCM is scaled to -1..1. Not for the audio thread.
    pub fn load(&self) -> Result<SampleDataDescriptor> {
        self.descriptor.validate()?;

        let mut reader = hound::WavReader::open(&self.path)?;
        let spec = reader.spec();
        let channel_count = spec.channels as usize;

        let data: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Float, 32) => {
                reader.samples::<f32>().collect::<std::result::Result<_, _>>()?
            }
            (hound::SampleFormat::Int, bits @ 8..=32) => {
                let scale = 1.0 / (1u64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 * scale))
                    .collect::<std::result::Result<_, _>>()?
            }
            (format, bits) => {
                return Err(Error::UnsupportedFormat(format!(
                    "{bits}-bit {format:?} in {}",
                    self.path.display()
                )))
            }
        };

        if channel_count == 0 {
            return Err(Error::UnsupportedFormat(format!(
                "no channels in {}",
                self.path.display()
            )));
        }
        let frame_count = data.len() / channel_count;

        tracing::debug!(
            path = %self.path.display(),
            channel_count,
            frame_count,
            sample_rate = spec.sample_rate,
            "loaded sample"
        );

        SampleDataDescriptor::new(
            self.descriptor,
            spec.sample_rate as f32,
            true,
            channel_count,
            frame_count,
            data,
        )
    }
}
