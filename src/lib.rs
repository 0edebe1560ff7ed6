//! Click-free parameter ramping and a small set of audio processing nodes.
//!
//! - [`dsp`]: building blocks with no lifecycle (ramper, delay line, LFO,
//!   filter and oscillator kernels).
//! - [`nodes`]: the `init` / `process` / `deinit` node contract and the
//!   chorus, flanger, phase-distortion oscillator and Korg low-pass nodes.
//! - [`automation`]: timed parameter changes turned into per-block events.
//! - [`sampler`]: sample zone, loop and source descriptors.

pub mod automation;
pub mod dsp;
pub mod error;
pub mod io;
pub mod nodes;
#[cfg(feature = "serde")]
pub mod preset;
pub mod sampler;

pub use error::{Error, Result};

/// Largest block the bundled tools render in one `process` call.
pub const MAX_BLOCK_SIZE: usize = 2048;
