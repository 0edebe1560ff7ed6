//! Low-level DSP primitives used by the processing nodes.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so nodes can embed them directly. They stay focused on the
//! signal-processing math; lifecycle and parameter plumbing live in
//! [`crate::nodes`].

/// Circular delay buffer with interpolated reads.
pub mod delay;
/// Korg-35 style resonant low-pass core.
pub mod filter;
/// Sine LFO for delay-time modulation.
pub mod lfo;
/// Phase accumulator and phase-distortion shaping.
pub mod oscillator;
/// Sample-accurate linear parameter smoothing.
pub mod ramper;
/// Waveshaping and runaway-state guards.
pub mod saturation;

pub use ramper::{ramp_samples, ParameterRamper};
