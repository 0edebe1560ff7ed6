//! Benchmarks for per-sample parameter ramping.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ramped_dsp::dsp::ParameterRamper;

use crate::BLOCK_SIZES;

pub fn bench_ramper(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ramper");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Settled: the common case once a knob stops moving
        let mut ramper = ParameterRamper::new(0.5);
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = ramper.tick();
                }
                black_box(&buffer);
            })
        });

        // Always mid-ramp
        let mut ramper = ParameterRamper::new(0.0);
        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("ramping", size), &size, |b, _| {
            b.iter(|| {
                flip = !flip;
                ramper.set_target(if flip { 1.0 } else { 0.0 }, size as u32 * 4);
                for sample in buffer.iter_mut() {
                    *sample = ramper.tick();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
