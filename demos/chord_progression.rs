/// Runs the biometric control chain against an offline synth
/// Simulated breathing and skin conductance pick chords, gain and vibrato

use std::f32::consts::TAU;

use bio_synth::{
    control::{BioNormalizer, BreathTimbre, ChordClock, ScalePlayer, SensorLine},
    PolySynth, SynthConfig,
};

const CONTROL_RATE: f32 = 60.0;

fn main() {
    println!("=== Chord Progression Demo ===\n");

    let (mut poly, _handle) = PolySynth::new(SynthConfig::new(48_000.0));
    let mut bio = BioNormalizer::default();
    let mut player = ScalePlayer::default();
    let mut clock = ChordClock::default();
    let timbre = BreathTimbre::default();

    let dt = 1.0 / CONTROL_RATE;
    let frames_per_tick = (poly.sample_rate() / CONTROL_RATE) as usize;
    let mut buffer = vec![0.0f32; frames_per_tick * 2];

    // 40 seconds of control frames
    for tick in 0..(40.0 * CONTROL_RATE) as usize {
        let t = tick as f32 * dt;
        let breath = 0.5 - 0.5 * (TAU * t / 5.0).cos();
        let gsr = 0.5 - 0.5 * (TAU * t / 30.0).cos();
        let line = SensorLine {
            gsr: Some((300.0 + 500.0 * gsr) as i32),
            distance: Some((25.0 + 15.0 * breath) as i32),
        };

        let state = bio.update(line);
        timbre.apply(state.breath, poly.params());
        if let Some(choice) = clock.tick(dt, state, &mut player, &mut poly) {
            let names: Vec<String> = player
                .active_notes()
                .iter()
                .map(|f| format!("{f:.1}"))
                .collect();
            println!(
                "{t:>5.1}s  root {} oct {:>2}  [{}]  breath {:.2} gsr {:.2}",
                choice.root,
                choice.octave,
                names.join(", "),
                state.breath,
                state.gsr
            );
        }

        poly.render(&mut buffer, 2);
    }

    println!("\nRendered {} frames", poly.frames_rendered());
}
