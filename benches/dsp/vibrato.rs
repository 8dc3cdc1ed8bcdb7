//! Benchmarks for the shared vibrato LFO, with and without depth.

use std::hint::black_box;

use bio_synth::dsp::lfo::Vibrato;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_vibrato(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/vibrato");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        for (label, depth) in [("off", 0.0f32), ("on", 0.02)] {
            let mut vibrato = Vibrato::new();
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| {
                    for out in buffer.iter_mut() {
                        *out = vibrato.next_factor(black_box(depth), 5.0, 48_000.0);
                    }
                })
            });
        }
    }

    group.finish();
}
