use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::nodes::korg_lowpass::{KorgLowPassFilterNode, KORG_LOW_PASS_PARAMETERS};
use crate::nodes::modulated_delay::{ModulatedDelayNode, ModulatedDelayType};
use crate::nodes::node::{DspNode, NodeSettings};
use crate::nodes::param::ParameterDef;
use crate::nodes::phase_distortion::{PhaseDistortionOscillatorNode, PHASE_DISTORTION_PARAMETERS};

/// Every node type the crate can build.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Chorus,
    Flanger,
    PhaseDistortionOscillator,
    KorgLowPassFilter,
}

impl NodeKind {
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Chorus,
            NodeKind::Flanger,
            NodeKind::PhaseDistortionOscillator,
            NodeKind::KorgLowPassFilter,
        ]
    }

    /// Stable identifier used by presets and the command line.
    pub fn identifier(&self) -> &'static str {
        match self {
            NodeKind::Chorus => "chorus",
            NodeKind::Flanger => "flanger",
            NodeKind::PhaseDistortionOscillator => "phase_distortion_oscillator",
            NodeKind::KorgLowPassFilter => "korg_low_pass_filter",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Chorus => "Chorus",
            NodeKind::Flanger => "Flanger",
            NodeKind::PhaseDistortionOscillator => "Phase Distortion Oscillator",
            NodeKind::KorgLowPassFilter => "Korg Low Pass Filter",
        }
    }

    pub fn parameters(&self) -> &'static [ParameterDef] {
        match self {
            NodeKind::Chorus => ModulatedDelayType::Chorus.parameters(),
            NodeKind::Flanger => ModulatedDelayType::Flanger.parameters(),
            NodeKind::PhaseDistortionOscillator => &PHASE_DISTORTION_PARAMETERS,
            NodeKind::KorgLowPassFilter => &KORG_LOW_PASS_PARAMETERS,
        }
    }

    /// Whether the node generates audio rather than transforming its input.
    pub fn is_generator(&self) -> bool {
        matches!(self, NodeKind::PhaseDistortionOscillator)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NodeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.identifier() == s)
            .ok_or_else(|| Error::invalid(format!("unknown node kind '{s}'")))
    }
}

/// Build a fresh, uninitialized node with default settings.
pub fn create_node(kind: NodeKind) -> Box<dyn DspNode> {
    create_node_with(kind, NodeSettings::default())
}

pub fn create_node_with(kind: NodeKind, settings: NodeSettings) -> Box<dyn DspNode> {
    match kind {
        NodeKind::Chorus => Box::new(ModulatedDelayNode::new(ModulatedDelayType::Chorus, settings)),
        NodeKind::Flanger => {
            Box::new(ModulatedDelayNode::new(ModulatedDelayType::Flanger, settings))
        }
        NodeKind::PhaseDistortionOscillator => {
            Box::new(PhaseDistortionOscillatorNode::new(settings))
        }
        NodeKind::KorgLowPassFilter => Box::new(KorgLowPassFilterNode::new(settings)),
    }
}
