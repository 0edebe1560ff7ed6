//! Benchmarks for the phase-distortion sine kernel.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ramped_dsp::dsp::oscillator::{phase_distortion_sine, PhaseAccumulator};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, distortion) in [("pure", 0.0f32), ("distorted", 0.8)] {
            let mut phase = PhaseAccumulator::new();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        let p = phase.next(440.0, SAMPLE_RATE as f32);
                        *sample = phase_distortion_sine(p, distortion);
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
