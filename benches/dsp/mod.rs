//! Benchmarks for low-level DSP kernels.

mod delay;
mod filter;
mod oscillator;
mod ramper;

pub use delay::bench_delay;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use ramper::bench_ramper;
