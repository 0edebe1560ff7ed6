use std::ops::Range;

use crate::dsp::filter::{Korg35Coefficients, Korg35Lowpass};
use crate::nodes::factory::NodeKind;
use crate::nodes::node::{DspNode, NodeCore, NodeSettings};
use crate::nodes::param::{ParameterAddress, ParameterDef, ParameterUnit};

/// Parameter addresses for [`KorgLowPassFilterNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum KorgLowPassParameter {
    CutoffFrequency = 0,
    Resonance = 1,
    Saturation = 2,
}

impl From<KorgLowPassParameter> for ParameterAddress {
    fn from(param: KorgLowPassParameter) -> Self {
        param as ParameterAddress
    }
}

pub static KORG_LOW_PASS_PARAMETERS: [ParameterDef; 3] = [
    ParameterDef::ramped(0, "cutoff_frequency", "Cutoff Frequency", ParameterUnit::Hertz, 1000.0, 0.0, 22_050.0),
    ParameterDef::ramped(1, "resonance", "Resonance", ParameterUnit::Generic, 1.0, 0.0, 2.0),
    ParameterDef::ramped(2, "saturation", "Saturation", ParameterUnit::Generic, 0.0, 0.0, 10.0),
];

/// Resonant MS-20 style low-pass with input saturation.
///
/// Coefficients are recomputed only on samples where cutoff or resonance
/// actually moved, so a settled filter costs no `tan()` per sample.
pub struct KorgLowPassFilterNode {
    core: NodeCore,
    filters: Vec<Korg35Lowpass>,
    coeffs: Korg35Coefficients,
    last_cutoff: f32,
    last_resonance: f32,
    sample_rate: f32,
}

impl KorgLowPassFilterNode {
    pub fn new(settings: NodeSettings) -> Self {
        let cutoff = KORG_LOW_PASS_PARAMETERS[0].default;
        let resonance = KORG_LOW_PASS_PARAMETERS[1].default;
        Self {
            core: NodeCore::new("korg_low_pass_filter", &KORG_LOW_PASS_PARAMETERS, settings),
            filters: Vec::new(),
            coeffs: Korg35Coefficients::new(cutoff, resonance, 44_100.0),
            last_cutoff: f32::NAN,
            last_resonance: f32::NAN,
            sample_rate: 0.0,
        }
    }
}

impl Default for KorgLowPassFilterNode {
    fn default() -> Self {
        Self::new(NodeSettings::default())
    }
}

impl DspNode for KorgLowPassFilterNode {
    fn kind(&self) -> NodeKind {
        NodeKind::KorgLowPassFilter
    }

    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn allocate(&mut self, channel_count: usize, sample_rate: f64) {
        self.sample_rate = sample_rate as f32;
        self.filters = vec![Korg35Lowpass::new(); channel_count];
        // Force a coefficient refresh on the first sample
        self.last_cutoff = f32::NAN;
        self.last_resonance = f32::NAN;
    }

    fn release(&mut self) {
        self.filters = Vec::new();
    }

    fn render(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], range: Range<usize>) {
        for frame in range {
            let cutoff = self.core.tick(KorgLowPassParameter::CutoffFrequency as usize);
            let resonance = self.core.tick(KorgLowPassParameter::Resonance as usize);
            let saturation = self.core.tick(KorgLowPassParameter::Saturation as usize);

            if cutoff != self.last_cutoff || resonance != self.last_resonance {
                self.coeffs = Korg35Coefficients::new(cutoff, resonance, self.sample_rate);
                self.last_cutoff = cutoff;
                self.last_resonance = resonance;
            }

            for (channel, filter) in self.filters.iter_mut().enumerate() {
                outputs[channel][frame] =
                    filter.next_sample(inputs[channel][frame], &self.coeffs, saturation);
            }
        }
    }
}
