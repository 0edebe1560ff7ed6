//! Benchmarks for the fractional delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ramped_dsp::dsp::delay::DelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin()).collect();
        let mut output = vec![0.0f32; size];

        // 30 ms at 48 kHz, the chorus worst case
        let mut line = DelayLine::with_capacity(1442);
        group.bench_with_input(BenchmarkId::new("interpolated", size), &size, |b, _| {
            b.iter(|| {
                for (i, (x, y)) in input.iter().zip(output.iter_mut()).enumerate() {
                    *y = line.read_interpolated(800.0 + (i as f32 * 0.37) % 40.0);
                    line.write(*x);
                }
                black_box(&output);
            })
        });
    }

    group.finish();
}
