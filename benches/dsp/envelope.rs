//! Benchmarks for the attack/release envelope.

use std::hint::black_box;

use bio_synth::dsp::envelope::{Envelope, EnvelopeCoeffs};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let coeffs = EnvelopeCoeffs::new(0.5, 0.5, 48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Envelope::new();
        env.gate_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    env.next_sample(black_box(&coeffs));
                    *out = env.level();
                }
            })
        });

        // Holding at full level
        let hold = EnvelopeCoeffs::new(0.0, 0.5, 48_000.0);
        let mut env = Envelope::new();
        env.gate_on();
        env.next_sample(&hold);
        group.bench_with_input(BenchmarkId::new("hold", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    env.next_sample(black_box(&hold));
                    *out = env.level();
                }
            })
        });

        // Release phase (ramping down)
        let mut env = Envelope::new();
        env.gate_on();
        env.next_sample(&hold);
        env.gate_off();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    env.next_sample(black_box(&coeffs));
                    *out = env.level();
                }
            })
        });
    }

    group.finish();
}
