use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::delay::DelayLine;
use crate::dsp::lfo::SineLfo;
use crate::dsp::saturation::{sanitize, STATE_LIMIT};
use crate::nodes::factory::NodeKind;
use crate::nodes::node::{DspNode, NodeCore, NodeSettings};
use crate::nodes::param::{ParameterAddress, ParameterDef, ParameterUnit};

/*
Modulated Delay (Chorus / Flanger)
==================================

Both effects mix the dry signal with a copy read from a delay line whose
length is swept by an LFO. As the delay time moves, the copy is pitched
slightly up and down; mixed back with the dry signal that reads as
several voices (chorus) or as a moving comb filter (flanger). They are
the same algorithm. Only the delay window and the default settings
differ:

  variant   delay window   character
  -------   ------------   -----------------------------------------
  chorus    5 - 30 ms      separate voices, gentle detune
  flanger   1 - 10 ms      short enough that the comb notches sweep

Per sample:

  lfo      = sin(2π · phase)                  phase offset ¼ cycle per channel
  delay    = centre + half_window · depth · lfo
  wet      = line.read(delay)                 linear interpolation
  line    ← dry + feedback · wet              sanitized before the write
  out      = (1 - mix) · dry + mix · wet

Feedback is limited to ±0.95 by the parameter table, which keeps the
recursion stable; the written sample is additionally flushed of
NaN/inf and hard-limited so nothing can run away.

Parameters
----------

  Frequency   LFO rate in Hz                   0.1 .. 10
  Depth       fraction of the delay window     0 .. 1
  Feedback    amount of wet fed back           -0.95 .. 0.95
  DryWetMix   0 = dry, 1 = wet                 0 .. 1
*/

pub const CHORUS_MIN_DELAY_MS: f32 = 5.0;
pub const CHORUS_MAX_DELAY_MS: f32 = 30.0;
pub const FLANGER_MIN_DELAY_MS: f32 = 1.0;
pub const FLANGER_MAX_DELAY_MS: f32 = 10.0;

/// LFO phase offset between adjacent channels, in cycles.
const CHANNEL_PHASE_OFFSET: f32 = 0.25;

/// Parameter addresses shared by both variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum ModulatedDelayParameter {
    Frequency = 0,
    Depth = 1,
    Feedback = 2,
    DryWetMix = 3,
}

impl From<ModulatedDelayParameter> for ParameterAddress {
    fn from(param: ModulatedDelayParameter) -> Self {
        param as ParameterAddress
    }
}

pub static CHORUS_PARAMETERS: [ParameterDef; 4] = [
    ParameterDef::ramped(0, "frequency", "Frequency", ParameterUnit::Hertz, 1.0, 0.1, 10.0),
    ParameterDef::ramped(1, "depth", "Depth", ParameterUnit::Generic, 0.0, 0.0, 1.0),
    ParameterDef::ramped(2, "feedback", "Feedback", ParameterUnit::Generic, 0.0, -0.95, 0.95),
    ParameterDef::ramped(3, "dry_wet_mix", "Dry/Wet Mix", ParameterUnit::Mix, 0.0, 0.0, 1.0),
];

pub static FLANGER_PARAMETERS: [ParameterDef; 4] = [
    ParameterDef::ramped(0, "frequency", "Frequency", ParameterUnit::Hertz, 1.0, 0.1, 10.0),
    ParameterDef::ramped(1, "depth", "Depth", ParameterUnit::Generic, 1.0, 0.0, 1.0),
    ParameterDef::ramped(2, "feedback", "Feedback", ParameterUnit::Generic, 0.0, -0.95, 0.95),
    ParameterDef::ramped(3, "dry_wet_mix", "Dry/Wet Mix", ParameterUnit::Mix, 0.5, 0.0, 1.0),
];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulatedDelayType {
    Chorus,
    Flanger,
}

impl ModulatedDelayType {
    pub fn parameters(self) -> &'static [ParameterDef] {
        match self {
            ModulatedDelayType::Chorus => &CHORUS_PARAMETERS,
            ModulatedDelayType::Flanger => &FLANGER_PARAMETERS,
        }
    }

    /// (min, max) delay window in milliseconds.
    pub fn delay_range_ms(self) -> (f32, f32) {
        match self {
            ModulatedDelayType::Chorus => (CHORUS_MIN_DELAY_MS, CHORUS_MAX_DELAY_MS),
            ModulatedDelayType::Flanger => (FLANGER_MIN_DELAY_MS, FLANGER_MAX_DELAY_MS),
        }
    }
}

/// Chorus or flanger, selected at construction.
pub struct ModulatedDelayNode {
    core: NodeCore,
    variant: ModulatedDelayType,
    lines: Vec<DelayLine>,
    lfos: Vec<SineLfo>,
    sample_rate: f32,
}

impl ModulatedDelayNode {
    pub fn new(variant: ModulatedDelayType, settings: NodeSettings) -> Self {
        let name = match variant {
            ModulatedDelayType::Chorus => "chorus",
            ModulatedDelayType::Flanger => "flanger",
        };
        Self {
            core: NodeCore::new(name, variant.parameters(), settings),
            variant,
            lines: Vec::new(),
            lfos: Vec::new(),
            sample_rate: 0.0,
        }
    }

    pub fn chorus() -> Self {
        Self::new(ModulatedDelayType::Chorus, NodeSettings::default())
    }

    pub fn flanger() -> Self {
        Self::new(ModulatedDelayType::Flanger, NodeSettings::default())
    }

    pub fn variant(&self) -> ModulatedDelayType {
        self.variant
    }
}

impl DspNode for ModulatedDelayNode {
    fn kind(&self) -> NodeKind {
        match self.variant {
            ModulatedDelayType::Chorus => NodeKind::Chorus,
            ModulatedDelayType::Flanger => NodeKind::Flanger,
        }
    }

    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn allocate(&mut self, channel_count: usize, sample_rate: f64) {
        let (_, max_ms) = self.variant.delay_range_ms();
        // Two guard samples for the interpolated read
        let capacity = (max_ms as f64 * sample_rate / 1000.0).ceil() as usize + 2;

        self.sample_rate = sample_rate as f32;
        self.lines = (0..channel_count)
            .map(|_| DelayLine::with_capacity(capacity))
            .collect();
        self.lfos = (0..channel_count)
            .map(|channel| SineLfo::with_phase(channel as f32 * CHANNEL_PHASE_OFFSET))
            .collect();
    }

    fn release(&mut self) {
        self.lines = Vec::new();
        self.lfos = Vec::new();
    }

    fn render(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], range: Range<usize>) {
        let (min_ms, max_ms) = self.variant.delay_range_ms();
        let centre_ms = 0.5 * (min_ms + max_ms);
        let half_window_ms = 0.5 * (max_ms - min_ms);
        let samples_per_ms = self.sample_rate / 1000.0;

        for frame in range {
            let frequency = self.core.tick(ModulatedDelayParameter::Frequency as usize);
            let depth = self.core.tick(ModulatedDelayParameter::Depth as usize);
            let feedback = self.core.tick(ModulatedDelayParameter::Feedback as usize);
            let mix = self.core.tick(ModulatedDelayParameter::DryWetMix as usize);

            for (channel, (line, lfo)) in self.lines.iter_mut().zip(&mut self.lfos).enumerate() {
                let modulation = lfo.next(frequency, self.sample_rate);
                let delay_ms = centre_ms + half_window_ms * depth * modulation;

                let dry = inputs[channel][frame];
                let wet = line.read_interpolated(delay_ms * samples_per_ms);
                line.write(sanitize(dry + feedback * wet, STATE_LIMIT));

                outputs[channel][frame] = (1.0 - mix) * dry + mix * wet;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::io::AudioBuffer;

    const SAMPLE_RATE: f64 = 48_000.0;

    fn run(node: &mut ModulatedDelayNode, input: &AudioBuffer) -> AudioBuffer {
        let mut output = AudioBuffer::new(input.channel_count(), input.frames());
        node.process(
            &input.channels(),
            &mut output.channels_mut(),
            input.frames(),
            0,
        )
        .unwrap();
        output
    }

    #[test]
    fn test_default_chorus_is_dry() {
        let mut node = ModulatedDelayNode::chorus();
        node.init(2, SAMPLE_RATE).unwrap();

        let input = AudioBuffer::from_fn(2, 512, |_, n| (n as f32 * 0.05).sin());
        let output = run(&mut node, &input);

        for channel in 0..2 {
            for (a, b) in output.channel(channel).iter().zip(input.channel(channel)) {
                assert!((a - b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_wet_signal_is_delayed_by_window_centre() {
        let mut node = ModulatedDelayNode::chorus();
        node.set_parameter(ModulatedDelayParameter::DryWetMix.into(), 1.0, true)
            .unwrap();
        node.init(1, SAMPLE_RATE).unwrap();

        // Depth 0: the delay sits at the 17.5 ms centre = 840 samples
        let input = AudioBuffer::from_fn(1, 2048, |_, n| if n == 0 { 1.0 } else { 0.0 });
        let output = run(&mut node, &input);

        let peak = output
            .channel(0)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(index, _)| index)
            .unwrap();
        assert_eq!(peak, 840);
    }

    #[test]
    fn test_flanger_modifies_signal() {
        let mut node = ModulatedDelayNode::flanger();
        node.init(1, SAMPLE_RATE).unwrap();

        let input = AudioBuffer::from_fn(1, 4096, |_, n| (n as f32 * 0.1).sin());
        let output = run(&mut node, &input);

        let difference: f32 = output
            .channel(0)
            .iter()
            .zip(input.channel(0))
            .map(|(a, b)| (a - b).abs())
            .sum();
        assert!(difference > 1.0);
    }

    #[test]
    fn test_max_feedback_stays_bounded() {
        for variant in [ModulatedDelayType::Chorus, ModulatedDelayType::Flanger] {
            let mut node = ModulatedDelayNode::new(variant, NodeSettings::default());
            node.set_parameter(ModulatedDelayParameter::Feedback.into(), 0.95, true)
                .unwrap();
            node.set_parameter(ModulatedDelayParameter::Depth.into(), 1.0, true)
                .unwrap();
            node.set_parameter(ModulatedDelayParameter::DryWetMix.into(), 1.0, true)
                .unwrap();
            node.init(2, SAMPLE_RATE).unwrap();

            let input = AudioBuffer::from_fn(2, 512, |_, _| 1.0);
            for _ in 0..400 {
                let output = run(&mut node, &input);
                for channel in 0..2 {
                    for sample in output.channel(channel) {
                        assert!(sample.is_finite());
                        assert!(sample.abs() <= STATE_LIMIT + 1.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut node = ModulatedDelayNode::chorus();
        node.set_parameter(ModulatedDelayParameter::Feedback.into(), 3.0, true)
            .unwrap();
        assert_eq!(
            node.get_parameter(ModulatedDelayParameter::Feedback.into())
                .unwrap(),
            0.95
        );
        assert!(matches!(
            node.get_parameter(4),
            Err(Error::UnknownParameter { address: 4 })
        ));
    }

    #[test]
    fn test_reinit_resizes_delay_lines() {
        let mut node = ModulatedDelayNode::flanger();
        node.init(1, 44_100.0).unwrap();
        let small = node.lines[0].capacity();

        node.init(3, 96_000.0).unwrap();
        assert_eq!(node.lines.len(), 3);
        assert!(node.lines[0].capacity() > small);

        node.deinit();
        assert!(node.lines.is_empty());
    }

    #[test]
    fn test_channels_are_offset_in_phase() {
        let mut node = ModulatedDelayNode::chorus();
        node.init(2, SAMPLE_RATE).unwrap();
        assert!((node.lfos[1].phase() - CHANNEL_PHASE_OFFSET).abs() < 1e-6);
    }
}
