//! Each node kind on its own, stereo, with a parameter moving every block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use ramped_dsp::io::AudioBuffer;
use ramped_dsp::nodes::{create_node, NodeKind};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/nodes");

    for &kind in NodeKind::all() {
        for &size in BLOCK_SIZES {
            let mut node = create_node(kind);
            node.init(2, SAMPLE_RATE).unwrap();
            let input = AudioBuffer::from_fn(2, size, |_, n| (n as f32 * 0.05).sin());
            let mut output = AudioBuffer::new(2, size);
            let first = node.parameters()[0];
            let mut flip = false;

            group.bench_with_input(BenchmarkId::new(kind.identifier(), size), &size, |b, _| {
                b.iter(|| {
                    flip = !flip;
                    let value = if flip { first.max } else { first.min };
                    node.set_parameter(first.address, value, false).unwrap();
                    node.process(&input.channels(), &mut output.channels_mut(), size, 0)
                        .unwrap();
                    black_box(output.channel(0));
                })
            });
        }
    }

    group.finish();
}
