//! Oscillator into filter into chorus, the way a small patch would run.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ramped_dsp::io::AudioBuffer;
use ramped_dsp::nodes::{create_node, KorgLowPassParameter, ModulatedDelayParameter, NodeKind};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chain");

    for &size in BLOCK_SIZES {
        let mut osc = create_node(NodeKind::PhaseDistortionOscillator);
        let mut filter = create_node(NodeKind::KorgLowPassFilter);
        let mut chorus = create_node(NodeKind::Chorus);

        filter
            .set_parameter(KorgLowPassParameter::Saturation.into(), 2.0, true)
            .unwrap();
        chorus
            .set_parameter(ModulatedDelayParameter::Depth.into(), 0.7, true)
            .unwrap();
        chorus
            .set_parameter(ModulatedDelayParameter::DryWetMix.into(), 0.5, true)
            .unwrap();
        for node in [&mut osc, &mut filter, &mut chorus] {
            node.init(2, SAMPLE_RATE).unwrap();
        }

        let mut voice = AudioBuffer::new(2, size);
        let mut filtered = AudioBuffer::new(2, size);

        group.bench_with_input(BenchmarkId::new("osc_filter_chorus", size), &size, |b, _| {
            b.iter(|| {
                osc.process(&[], &mut voice.channels_mut(), size, 0).unwrap();
                filter
                    .process(&voice.channels(), &mut filtered.channels_mut(), size, 0)
                    .unwrap();
                chorus
                    .process(&filtered.channels(), &mut voice.channels_mut(), size, 0)
                    .unwrap();
                black_box(voice.channel(0));
            })
        });
    }

    group.finish();
}
