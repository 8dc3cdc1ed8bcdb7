/// Demonstrates polyphonic synthesis without real-time audio
/// Shows voice allocation, the slot-0 steal, release tails and vibrato

use bio_synth::{NoteSink, PolySynth, SynthConfig, Waveform};

fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

fn main() {
    println!("=== Offline Render Demo ===\n");

    let config = SynthConfig::new(48_000.0)
        .with_max_voices(4)
        .with_waveform(Waveform::Triangle)
        .with_master_gain(0.2)
        .with_envelope(0.05, 0.2);
    let block_size = 256;

    // Control and render sides, as they would be split across threads
    let (mut poly, mut handle) = PolySynth::new(config);
    println!("Created PolySynth with {} voices\n", poly.max_voices());

    println!("Playing C major triad (C4, E4, G4)");
    for f in [261.63, 329.63, 392.0] {
        handle.note_on(f);
    }

    let mut buffer = vec![0.0f32; block_size];
    for _ in 0..20 {
        poly.render_mono(&mut buffer);
    }
    println!("  Active voices: {}", poly.active_voice_count());
    println!("  Peak amplitude: {:.3}", peak(&buffer));

    println!("\nAdding B4 (fills the pool)");
    handle.note_on(493.88);
    poly.render_mono(&mut buffer);
    println!("  Active voices: {}", poly.active_voice_count());

    println!("\nAdding D5 - pool is full, slot 0 is stolen");
    handle.note_on(587.33);
    poly.render_mono(&mut buffer);
    for (i, voice) in poly.voices().iter().enumerate() {
        println!(
            "  voice {i}: {:>7.2} Hz  amp {:.3}  {:?}",
            voice.frequency(),
            voice.amplitude(),
            voice.state()
        );
    }

    println!("\nAdding vibrato (depth 0.03, 6 Hz)");
    handle.set_vibrato_depth(0.03);
    handle.set_vibrato_speed(6.0);
    for _ in 0..40 {
        poly.render_mono(&mut buffer);
    }
    println!("  Vibrato phase: {:.3} rad", poly.vibrato_phase());

    println!("\nAll notes off");
    handle.all_notes_off();
    let mut blocks = 0;
    while poly.active_voice_count() > 0 {
        poly.render_mono(&mut buffer);
        blocks += 1;
    }
    println!(
        "  Released after {blocks} blocks ({:.1} ms)",
        blocks as f32 * block_size as f32 / poly.sample_rate() * 1_000.0
    );

    poly.render_mono(&mut buffer);
    println!("  Peak after release: {:.3}", peak(&buffer));
}
