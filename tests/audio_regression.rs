use bio_synth::{
    control::{BioState, BreathTimbre, ChordClock, ScalePlayer},
    synth::VoiceState,
    NoteSink, PolySynth, StealPolicy, SynthConfig, Waveform,
};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 256;

fn render_seconds(poly: &mut PolySynth, seconds: f32, channels: usize) -> Vec<f32> {
    let frames = (seconds * poly.sample_rate()).ceil() as usize;
    let mut out = Vec::with_capacity(frames * channels);
    let mut block = vec![0.0f32; BLOCK * channels];
    let mut remaining = frames;
    while remaining > 0 {
        let n = remaining.min(BLOCK);
        poly.render(&mut block[..n * channels], channels);
        out.extend_from_slice(&block[..n * channels]);
        remaining -= n;
    }
    out
}

#[test]
fn renders_silence_with_no_notes() {
    let (mut poly, handle) = PolySynth::new(SynthConfig::new(SAMPLE_RATE));
    for gain in [0.0, 0.1, 1.0, 250.0] {
        handle.set_master_gain(gain);
        let samples = render_seconds(&mut poly, 0.05, 2);
        assert!(samples.iter().all(|&s| s == 0.0), "gain {gain} leaked sound");
    }
}

#[test]
fn every_note_released_for_release_time_is_reclaimed() {
    let config = SynthConfig::new(SAMPLE_RATE).with_envelope(0.01, 0.2);
    let (mut poly, mut handle) = PolySynth::new(config);

    for f in [27.5f32, 110.0, 261.63, 440.0, 1_234.5, 8_000.0] {
        handle.note_on(f);
        handle.note_off(f);
        // one block of slack for the queue hop plus one envelope step
        render_seconds(&mut poly, 0.2 + (BLOCK + 1) as f32 / SAMPLE_RATE, 1);
        assert_eq!(poly.active_voice_count(), 0, "{f} Hz still active");
        assert!(poly.voices().iter().all(|v| v.amplitude() == 0.0));
    }
}

#[test]
fn held_chord_decays_after_all_notes_off() {
    let config = SynthConfig::new(SAMPLE_RATE).with_envelope(0.01, 0.2);
    let (mut poly, mut handle) = PolySynth::new(config);
    for f in [261.63, 329.63, 392.0] {
        handle.note_on(f);
    }
    let held = render_seconds(&mut poly, 0.1, 2);
    assert!(held.iter().any(|s| s.abs() > 0.01));
    assert_eq!(poly.active_voice_count(), 3);

    handle.all_notes_off();
    render_seconds(&mut poly, 0.21, 2);
    assert_eq!(poly.active_voice_count(), 0);
    assert!(render_seconds(&mut poly, 0.01, 2).iter().all(|&s| s == 0.0));
}

#[test]
fn steal_replaces_lowest_index_only() {
    let voices = 6;
    let config = SynthConfig::new(SAMPLE_RATE).with_max_voices(voices);
    let (mut poly, mut handle) = PolySynth::new(config);

    let freqs: Vec<f32> = (0..voices).map(|i| 100.0 + 50.0 * i as f32).collect();
    for &f in &freqs {
        handle.note_on(f);
    }
    handle.note_on(999.0);
    render_seconds(&mut poly, 0.01, 1);

    let pool = poly.voices();
    assert_eq!(pool[0].frequency(), 999.0);
    for i in 1..voices {
        assert_eq!(pool[i].frequency(), freqs[i]);
        assert_eq!(pool[i].state(), VoiceState::Sounding);
    }
}

#[test]
fn alternative_policy_keeps_first_slot() {
    let config = SynthConfig::new(SAMPLE_RATE)
        .with_max_voices(3)
        .with_steal_policy(StealPolicy::OldestReleasing)
        .with_envelope(0.0, 1.0);
    let (mut poly, _handle) = PolySynth::new(config);
    poly.note_on(100.0);
    poly.note_on(200.0);
    poly.note_on(300.0);
    poly.note_off(200.0);
    poly.note_on(400.0);

    let pool = poly.voices();
    assert_eq!(pool[0].frequency(), 100.0);
    assert_eq!(pool[1].frequency(), 400.0);
}

#[test]
fn output_never_exceeds_ceiling() {
    for waveform in Waveform::ALL {
        let config = SynthConfig::new(SAMPLE_RATE)
            .with_max_voices(12)
            .with_waveform(waveform)
            .with_master_gain(10.0)
            .with_max_amplitude(0.9)
            .with_vibrato(0.05, 7.0);
        let (mut poly, mut handle) = PolySynth::new(config);
        for i in 0..12 {
            handle.note_on(55.0 * (i + 1) as f32);
        }
        let samples = render_seconds(&mut poly, 0.25, 2);
        assert!(
            samples.iter().all(|s| s.abs() <= 0.9),
            "{} exceeded the ceiling",
            waveform.name()
        );
    }
}

#[test]
fn parameter_changes_apply_on_next_buffer() {
    let config = SynthConfig::new(SAMPLE_RATE).with_envelope(0.0, 0.2);
    let (mut poly, mut handle) = PolySynth::new(config);
    handle.note_on(440.0);
    let loud = render_seconds(&mut poly, 0.01, 1);

    handle.set_master_gain(0.0);
    let muted = render_seconds(&mut poly, 0.01, 1);

    assert!(loud.iter().any(|&s| s != 0.0));
    assert!(muted.iter().all(|&s| s == 0.0));
}

#[test]
fn render_thread_and_control_thread_run_concurrently() {
    use std::thread;

    let config = SynthConfig::new(SAMPLE_RATE)
        .with_envelope(0.001, 0.001)
        .with_queue_capacity(1_024);
    let (mut poly, mut handle) = PolySynth::new(config);

    let control = thread::spawn(move || {
        for i in 0..500 {
            let f = 200.0 + (i % 13) as f32 * 10.0;
            handle.note_on(f);
            handle.set_vibrato_depth((i % 5) as f32 * 0.01);
            handle.note_off(f);
        }
        handle.all_notes_off();
        handle
    });

    let mut block = vec![0.0f32; BLOCK * 2];
    for _ in 0..400 {
        poly.render(&mut block, 2);
        assert!(block.iter().all(|s| s.abs() <= 0.9));
    }
    let _handle = control.join().unwrap();

    render_seconds(&mut poly, 0.05, 2);
    assert_eq!(poly.active_voice_count(), 0);
}

#[test]
fn chord_clock_drives_an_offline_synth() {
    let (mut poly, _handle) = PolySynth::new(SynthConfig::new(SAMPLE_RATE));
    let mut player = ScalePlayer::default();
    let mut clock = ChordClock::default();
    let breath = BreathTimbre::default();
    let bio = BioState {
        gsr: 0.4,
        breath: 0.8,
        ..BioState::default()
    };

    breath.apply(bio.breath, poly.params());
    let choice = clock.tick(10.0, bio, &mut player, &mut poly).unwrap();
    assert_eq!(poly.active_voice_count(), choice.notes);

    let samples = render_seconds(&mut poly, 0.05, 1);
    assert!(samples.iter().any(|s| s.abs() > 0.001));
    assert!(samples.iter().all(|s| s.abs() <= 0.9));
}
