//! Benchmarks for complete PolySynth renders.
//!
//! These mirror real use: a held chord under breath-driven vibrato, a fully
//! busy pool, and the worst case where every voice is stolen each buffer.

use std::hint::black_box;

use bio_synth::{NoteSink, PolySynth, SynthConfig, Waveform};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const CHANNELS: usize = 2;

pub fn bench_poly(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/poly");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * CHANNELS];

        // === IDLE POOL ===
        // Nothing sounding: the cost floor of a render call
        let (mut idle, _idle_handle) = PolySynth::new(SynthConfig::default());
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| idle.render(black_box(&mut buffer), CHANNELS))
        });

        // === TRIAD WITH VIBRATO ===
        // The typical patch: sine triad, breath vibrato
        let config = SynthConfig::default().with_vibrato(0.02, 5.0);
        let (mut triad, _triad_handle) = PolySynth::new(config);
        for f in [261.63, 329.63, 392.0] {
            triad.note_on(f);
        }
        group.bench_with_input(BenchmarkId::new("triad_vibrato", size), &size, |b, _| {
            b.iter(|| triad.render(black_box(&mut buffer), CHANNELS))
        });

        // === FULL POOL ===
        // Every voice busy, triangle wave
        let config = SynthConfig::default()
            .with_max_voices(16)
            .with_waveform(Waveform::Triangle)
            .with_vibrato(0.02, 5.0);
        let (mut full, _full_handle) = PolySynth::new(config);
        for i in 0..16 {
            full.note_on(110.0 * (i + 1) as f32);
        }
        group.bench_with_input(BenchmarkId::new("full_pool_16", size), &size, |b, _| {
            b.iter(|| full.render(black_box(&mut buffer), CHANNELS))
        });

        // === STEAL EVERY BUFFER ===
        // Control thread floods note-ons through the queue
        let config = SynthConfig::default().with_queue_capacity(1_024);
        let (mut flooded, mut handle) = PolySynth::new(config);
        let mut note = 0u32;
        group.bench_with_input(BenchmarkId::new("steal_flood", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..16 {
                    note = note.wrapping_add(1);
                    handle.note_on(100.0 + (note % 64) as f32 * 7.0);
                }
                flooded.render(black_box(&mut buffer), CHANNELS)
            })
        });
    }

    group.finish();
}
