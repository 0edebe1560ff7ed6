use std::ops::Range;

use crate::dsp::oscillator::{phase_distortion_sine, PhaseAccumulator};
use crate::nodes::factory::NodeKind;
use crate::nodes::node::{DspNode, NodeCore, NodeSettings};
use crate::nodes::param::{ParameterAddress, ParameterDef, ParameterUnit};

/// Parameter addresses for [`PhaseDistortionOscillatorNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum PhaseDistortionParameter {
    Frequency = 0,
    Amplitude = 1,
    PhaseDistortion = 2,
    DetuningOffset = 3,
    DetuningMultiplier = 4,
}

impl From<PhaseDistortionParameter> for ParameterAddress {
    fn from(param: PhaseDistortionParameter) -> Self {
        param as ParameterAddress
    }
}

pub static PHASE_DISTORTION_PARAMETERS: [ParameterDef; 5] = [
    ParameterDef::ramped(0, "frequency", "Frequency", ParameterUnit::Hertz, 440.0, 0.0, 20_000.0),
    ParameterDef::ramped(1, "amplitude", "Amplitude", ParameterUnit::LinearGain, 1.0, 0.0, 10.0),
    ParameterDef::ramped(2, "phase_distortion", "Phase Distortion", ParameterUnit::Generic, 0.0, -1.0, 1.0),
    ParameterDef::ramped(3, "detuning_offset", "Detuning Offset", ParameterUnit::Hertz, 0.0, -1000.0, 1000.0),
    ParameterDef::ramped(4, "detuning_multiplier", "Detuning Multiplier", ParameterUnit::Generic, 1.0, 0.9, 1.11),
];

/// Sine oscillator with a bendable phase. Generates; ignores inputs.
///
/// Effective pitch is `frequency * detuning_multiplier + detuning_offset`,
/// clamped to 0 .. Nyquist. The same signal is written to every channel.
pub struct PhaseDistortionOscillatorNode {
    core: NodeCore,
    phase: PhaseAccumulator,
    sample_rate: f32,
}

impl PhaseDistortionOscillatorNode {
    pub fn new(settings: NodeSettings) -> Self {
        Self {
            core: NodeCore::new(
                "phase_distortion_oscillator",
                &PHASE_DISTORTION_PARAMETERS,
                settings,
            ),
            phase: PhaseAccumulator::new(),
            sample_rate: 0.0,
        }
    }
}

impl Default for PhaseDistortionOscillatorNode {
    fn default() -> Self {
        Self::new(NodeSettings::default())
    }
}

impl DspNode for PhaseDistortionOscillatorNode {
    fn kind(&self) -> NodeKind {
        NodeKind::PhaseDistortionOscillator
    }

    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn consumes_input(&self) -> bool {
        false
    }

    fn allocate(&mut self, _channel_count: usize, sample_rate: f64) {
        self.sample_rate = sample_rate as f32;
        self.phase.reset();
    }

    fn release(&mut self) {
        self.phase.reset();
    }

    fn render(&mut self, _inputs: &[&[f32]], outputs: &mut [&mut [f32]], range: Range<usize>) {
        let channels = self.core.channel_count();
        let nyquist = 0.5 * self.sample_rate;

        for frame in range {
            let frequency = self.core.tick(PhaseDistortionParameter::Frequency as usize);
            let amplitude = self.core.tick(PhaseDistortionParameter::Amplitude as usize);
            let distortion = self.core.tick(PhaseDistortionParameter::PhaseDistortion as usize);
            let offset = self.core.tick(PhaseDistortionParameter::DetuningOffset as usize);
            let multiplier = self.core.tick(PhaseDistortionParameter::DetuningMultiplier as usize);

            let pitch = (frequency * multiplier + offset).clamp(0.0, nyquist);
            let phase = self.phase.next(pitch, self.sample_rate);
            let sample = amplitude * phase_distortion_sine(phase, distortion);

            for output in outputs.iter_mut().take(channels) {
                output[frame] = sample;
            }
        }
    }
}
