//! Sample descriptors: which note/velocity zone a recording covers, where
//! it starts, ends and loops, and where its audio lives.
//!
//! Pure data. Choosing a sample for a note and playing it back happen
//! elsewhere. All points are sample-frame positions (fractional allowed)
//! counted from the first frame of the sample.

mod data;
mod file;

pub use data::SampleDataDescriptor;
pub use file::SampleFileDescriptor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MAX_MIDI_VALUE: u8 = 127;

/// Zone, playback and loop points of one sample.
///
/// An `end_point` of 0 means "the last frame of the sample" and is resolved
/// once the sample length is known. Same for `loop_end_point` on a looping
/// sample.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDescriptor {
    pub note_number: u8,
    pub note_frequency: f32,
    pub minimum_note_number: u8,
    pub maximum_note_number: u8,
    pub minimum_velocity: u8,
    pub maximum_velocity: u8,
    pub is_looping: bool,
    pub loop_start_point: f32,
    pub loop_end_point: f32,
    pub start_point: f32,
    pub end_point: f32,
}

impl SampleDescriptor {
    pub fn builder(note_number: u8, note_frequency: f32) -> SampleDescriptorBuilder {
        SampleDescriptorBuilder {
            descriptor: SampleDescriptor {
                note_number,
                note_frequency,
                minimum_note_number: 0,
                maximum_note_number: MAX_MIDI_VALUE,
                minimum_velocity: 0,
                maximum_velocity: MAX_MIDI_VALUE,
                is_looping: false,
                loop_start_point: 0.0,
                loop_end_point: 0.0,
                start_point: 0.0,
                end_point: 0.0,
            },
        }
    }

    /// Check every field. Descriptors built with the builder always pass;
    /// ones that arrived over the wire are checked when wrapped into a data
    /// or file descriptor.
    pub fn validate(&self) -> Result<()> {
        if self.note_number > MAX_MIDI_VALUE {
            return Err(Error::invalid(format!("note number {} above 127", self.note_number)));
        }
        if !(self.note_frequency.is_finite() && self.note_frequency > 0.0) {
            return Err(Error::invalid(format!(
                "note frequency must be positive, got {}",
                self.note_frequency
            )));
        }
        check_range(
            "note",
            self.minimum_note_number,
            self.maximum_note_number,
        )?;
        check_range("velocity", self.minimum_velocity, self.maximum_velocity)?;

        for (name, point) in [
            ("start", self.start_point),
            ("end", self.end_point),
            ("loop start", self.loop_start_point),
            ("loop end", self.loop_end_point),
        ] {
            if !point.is_finite() || point < 0.0 {
                return Err(Error::invalid(format!(
                    "{name} point must be a non-negative frame position, got {point}"
                )));
            }
        }
        // A zero end is the "to the end" sentinel, checked again once resolved
        if self.end_point != 0.0 && self.start_point > self.end_point {
            return Err(Error::invalid(format!(
                "start point {} after end point {}",
                self.start_point, self.end_point
            )));
        }
        if self.loop_end_point != 0.0 && self.loop_start_point > self.loop_end_point {
            return Err(Error::invalid(format!(
                "loop start {} after loop end {}",
                self.loop_start_point, self.loop_end_point
            )));
        }
        Ok(())
    }

    /// Whether this sample should answer `note` played at `velocity`.
    pub fn contains(&self, note: u8, velocity: u8) -> bool {
        (self.minimum_note_number..=self.maximum_note_number).contains(&note)
            && (self.minimum_velocity..=self.maximum_velocity).contains(&velocity)
    }

    /// Replace the "to the end" sentinels with `frame_count` and check the
    /// points fit inside the sample.
    pub(crate) fn resolve(mut self, frame_count: usize) -> Result<Self> {
        let frames = frame_count as f32;
        if self.end_point == 0.0 {
            self.end_point = frames;
        }
        if self.is_looping && self.loop_end_point == 0.0 {
            self.loop_end_point = self.end_point;
        }
        self.validate()?;
        if self.start_point > frames || self.end_point > frames || self.loop_end_point > frames {
            return Err(Error::invalid(format!(
                "points run past the {frame_count}-frame sample (start {}, end {}, loop end {})",
                self.start_point, self.end_point, self.loop_end_point
            )));
        }
        // Sentinels are filled now, so a zero end is a real position
        if self.start_point > self.end_point {
            return Err(Error::invalid(format!(
                "start point {} after end point {}",
                self.start_point, self.end_point
            )));
        }
        if self.is_looping && self.loop_start_point > self.loop_end_point {
            return Err(Error::invalid(format!(
                "loop start {} after loop end {}",
                self.loop_start_point, self.loop_end_point
            )));
        }
        Ok(self)
    }
}

fn check_range(name: &str, min: u8, max: u8) -> Result<()> {
    if min > max || max > MAX_MIDI_VALUE {
        return Err(Error::invalid(format!("{name} range {min}..={max} is inverted or above 127")));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SampleDescriptorBuilder {
    descriptor: SampleDescriptor,
}

impl SampleDescriptorBuilder {
    pub fn note_range(mut self, minimum: u8, maximum: u8) -> Self {
        self.descriptor.minimum_note_number = minimum;
        self.descriptor.maximum_note_number = maximum;
        self
    }

    pub fn velocity_range(mut self, minimum: u8, maximum: u8) -> Self {
        self.descriptor.minimum_velocity = minimum;
        self.descriptor.maximum_velocity = maximum;
        self
    }

    pub fn points(mut self, start: f32, end: f32) -> Self {
        self.descriptor.start_point = start;
        self.descriptor.end_point = end;
        self
    }

    pub fn looping(mut self, loop_start: f32, loop_end: f32) -> Self {
        self.descriptor.is_looping = true;
        self.descriptor.loop_start_point = loop_start;
        self.descriptor.loop_end_point = loop_end;
        self
    }

    pub fn build(self) -> Result<SampleDescriptor> {
        self.descriptor.validate()?;
        Ok(self.descriptor)
    }
}

/// Where a sample's audio comes from. Exactly one of the two.
///
/// Serialized externally tagged: `{"Data": {..}}` or `{"File": {..}}`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSource {
    Data(SampleDataDescriptor),
    File(SampleFileDescriptor),
}

impl SampleSource {
    pub fn descriptor(&self) -> &SampleDescriptor {
        match self {
            SampleSource::Data(data) => data.descriptor(),
            SampleSource::File(file) => &file.descriptor,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SampleSource::Data(_))
    }

    /// In-memory audio, reading the file first if needed. Blocking I/O:
    /// call off the audio thread.
    pub fn into_data(self) -> Result<SampleDataDescriptor> {
        match self {
            SampleSource::Data(data) => Ok(data),
            SampleSource::File(file) => file.load(),
        }
    }
}

impl From<SampleDataDescriptor> for SampleSource {
    fn from(data: SampleDataDescriptor) -> Self {
        SampleSource::Data(data)
    }
}

impl From<SampleFileDescriptor> for SampleSource {
    fn from(file: SampleFileDescriptor) -> Self {
        SampleSource::File(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_cover_everything() {
        let descriptor = SampleDescriptor::builder(60, 261.63).build().unwrap();
        assert!(descriptor.contains(0, 0));
        assert!(descriptor.contains(127, 127));
        assert!(!descriptor.is_looping);
    }

    #[test]
    fn test_contains_respects_zone() {
        let descriptor = SampleDescriptor::builder(60, 261.63)
            .note_range(48, 72)
            .velocity_range(64, 127)
            .build()
            .unwrap();
        assert!(descriptor.contains(60, 100));
        assert!(descriptor.contains(48, 64));
        assert!(!descriptor.contains(47, 100));
        assert!(!descriptor.contains(60, 63));
    }

    #[test]
    fn test_rejects_inverted_points() {
        let start_after_end = SampleDescriptor::builder(60, 261.63).points(100.0, 50.0).build();
        assert!(matches!(start_after_end, Err(Error::InvalidArgument(_))));

        let loop_inverted = SampleDescriptor::builder(60, 261.63)
            .points(0.0, 1000.0)
            .looping(800.0, 200.0)
            .build();
        assert!(matches!(loop_inverted, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_bad_zone_and_frequency() {
        assert!(SampleDescriptor::builder(60, 261.63).note_range(72, 48).build().is_err());
        assert!(SampleDescriptor::builder(60, 261.63).velocity_range(0, 200).build().is_err());
        assert!(SampleDescriptor::builder(60, 0.0).build().is_err());
        assert!(SampleDescriptor::builder(200, 440.0).build().is_err());
    }

    #[test]
    fn test_resolve_fills_end_sentinels() {
        let descriptor = SampleDescriptor::builder(60, 261.63)
            .points(50.0, 0.0)
            .looping(100.0, 0.0)
            .build()
            .unwrap()
            .resolve(2000)
            .unwrap();
        assert_eq!(descriptor.start_point, 50.0);
        assert_eq!(descriptor.end_point, 2000.0);
        assert_eq!(descriptor.loop_end_point, 2000.0);
    }

    #[test]
    fn test_resolve_rechecks_order() {
        // Loop start lies beyond the resolved end
        let descriptor = SampleDescriptor::builder(60, 261.63)
            .looping(3000.0, 0.0)
            .build()
            .unwrap();
        assert!(descriptor.resolve(2000).is_err());
    }

    #[test]
    fn test_resolve_rejects_start_in_empty_sample() {
        // The end sentinel resolves to 0 frames, behind the start point
        let descriptor = SampleDescriptor::builder(60, 261.63)
            .points(50.0, 0.0)
            .build()
            .unwrap();
        assert!(matches!(descriptor.resolve(0), Err(Error::InvalidArgument(_))));

        let looping = SampleDescriptor::builder(60, 261.63)
            .looping(10.0, 0.0)
            .build()
            .unwrap();
        assert!(looping.resolve(0).is_err());

        let empty = SampleDescriptor::builder(60, 261.63).build().unwrap();
        let resolved = empty.resolve(0).unwrap();
        assert_eq!(resolved.end_point, 0.0);
    }

    #[test]
    fn test_resolve_rejects_points_past_the_end() {
        let descriptor = SampleDescriptor::builder(60, 261.63)
            .points(0.0, 5000.0)
            .build()
            .unwrap();
        assert!(descriptor.resolve(4000).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_source_json_keeps_variant() {
        let data = SampleDataDescriptor::new(
            SampleDescriptor::builder(60, 261.63).build().unwrap(),
            48_000.0,
            false,
            1,
            4,
            vec![0.0, 0.5, -0.5, 0.25],
        )
        .unwrap();
        let file = SampleFileDescriptor::new(
            SampleDescriptor::builder(72, 523.25).build().unwrap(),
            "piano/c5.wav",
        )
        .unwrap();

        for source in [SampleSource::from(data), SampleSource::from(file)] {
            let json = serde_json::to_string(&source).unwrap();
            let back: SampleSource = serde_json::from_str(&json).unwrap();
            assert_eq!(back.is_loaded(), source.is_loaded());
            assert_eq!(back, source);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_descriptor_json_shape() {
        let descriptor = SampleDescriptor::builder(69, 440.0)
            .points(0.0, 48_000.0)
            .build()
            .unwrap();
        let json = serde_json::to_value(descriptor).unwrap();
        assert_eq!(json["note_number"], 69);
        assert_eq!(json["end_point"], 48_000.0);

        let back: SampleDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, descriptor);
    }
}
