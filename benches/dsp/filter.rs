//! Benchmarks for the Korg35 low-pass kernel.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ramped_dsp::dsp::filter::{Korg35Coefficients, Korg35Lowpass};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = input.clone();

        // Fixed coefficients
        let coeffs = Korg35Coefficients::new(1000.0, 1.5, SAMPLE_RATE as f32);
        let mut filter = Korg35Lowpass::new();
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| {
                for (x, y) in input.iter().zip(buffer.iter_mut()) {
                    *y = filter.next_sample(*x, &coeffs, 0.0);
                }
                black_box(&buffer);
            })
        });

        // Cutoff moving every sample, coefficient cost included
        let mut filter = Korg35Lowpass::new();
        group.bench_with_input(BenchmarkId::new("sweep_saturated", size), &size, |b, _| {
            b.iter(|| {
                for (i, (x, y)) in input.iter().zip(buffer.iter_mut()).enumerate() {
                    let cutoff = 200.0 + i as f32 * 10.0;
                    let coeffs = Korg35Coefficients::new(cutoff, 1.5, SAMPLE_RATE as f32);
                    *y = filter.next_sample(*x, &coeffs, 2.0);
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
