//! Benchmarks for the stateless waveform function.

use std::hint::black_box;

use bio_synth::dsp::oscillator::{phase_increment, sample, wrap_phase, Waveform};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_waveform(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/waveform");
    let increment = phase_increment(440.0, 48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for waveform in Waveform::ALL {
            let mut phase = 0.0f64;
            group.bench_with_input(BenchmarkId::new(waveform.name(), size), &size, |b, _| {
                b.iter(|| {
                    for out in buffer.iter_mut() {
                        *out = sample(black_box(phase), black_box(waveform));
                        phase = wrap_phase(phase + increment);
                    }
                })
            });
        }
    }

    group.finish();
}
