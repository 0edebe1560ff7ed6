//! Processing nodes and the lifecycle they share.
//!
//! Each node owns one [`ParameterRamper`](crate::dsp::ParameterRamper) per
//! parameter and implements [`DspNode`]. Parameter tables are plain
//! `static` data: address, identifier, default and bounds.

/// Node type enumeration and construction.
pub mod factory;
/// Control-thread parameter queue.
pub mod handle;
/// MS-20 style resonant low-pass filter.
pub mod korg_lowpass;
/// Chorus and flanger.
pub mod modulated_delay;
/// `DspNode` trait, shared `NodeCore` state machine.
pub mod node;
/// Parameter tables and lookup.
pub mod param;
/// Phase-distortion sine oscillator.
pub mod phase_distortion;

pub use factory::{create_node, create_node_with, NodeKind};
pub use handle::{ParameterEvent, ParameterHandle, Ramp};
pub use korg_lowpass::{KorgLowPassFilterNode, KorgLowPassParameter};
pub use modulated_delay::{ModulatedDelayNode, ModulatedDelayParameter, ModulatedDelayType};
pub use node::{DspNode, NodeCore, NodeSettings, NodeState, ScheduledParameter};
pub use param::{ParameterAddress, ParameterDef, ParameterUnit};
pub use phase_distortion::{PhaseDistortionOscillatorNode, PhaseDistortionParameter};
