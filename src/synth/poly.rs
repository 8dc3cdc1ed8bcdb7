use std::sync::Arc;

use rtrb::{Consumer, RingBuffer};
use tracing::debug;

use crate::{
    dsp::{envelope::EnvelopeCoeffs, lfo::Vibrato},
    synth::{
        allocator::{self, StealPolicy},
        config::SynthConfig,
        handle::SynthHandle,
        message::{NoteSink, SynthMessage},
        params::{ParamSnapshot, SynthParams},
        voice::Voice,
    },
};

/// Note-off matches voices whose frequency is within this many Hz.
pub const FREQUENCY_TOLERANCE: f32 = 0.01;

/// Fixed pool of voices plus the shared vibrato, rendered on the audio thread.
///
/// Everything the render path touches is allocated in [`PolySynth::new`];
/// [`render`](Self::render) itself does no allocation, takes no locks and does
/// `O(max_voices)` work per frame.
pub struct PolySynth {
    voices: Box<[Voice]>,
    rx: Consumer<SynthMessage>,
    params: Arc<SynthParams>,
    vibrato: Vibrato,
    sample_rate: f64,
    steal_policy: StealPolicy,
    note_counter: u64,
    frame_counter: u64,
}

impl PolySynth {
    /// Build the render-side synth and the control-side handle that feeds it.
    pub fn new(config: SynthConfig) -> (Self, SynthHandle) {
        let max_voices = config.voice_count();
        let sample_rate = config.effective_sample_rate();
        let (tx, rx) = RingBuffer::<SynthMessage>::new(config.queue_capacity.max(1));
        let params = Arc::new(SynthParams::from_config(&config));

        debug!(
            max_voices,
            sample_rate,
            policy = ?config.steal_policy,
            waveform = config.waveform.name(),
            "created poly synth"
        );

        let synth = Self {
            voices: vec![Voice::new(); max_voices].into_boxed_slice(),
            rx,
            params: Arc::clone(&params),
            vibrato: Vibrato::new(),
            sample_rate: sample_rate as f64,
            steal_policy: config.steal_policy,
            note_counter: 0,
            frame_counter: 0,
        };
        let handle = SynthHandle::new(tx, params, max_voices);

        (synth, handle)
    }

    /// Fill `out` with `out.len() / channels` interleaved frames.
    ///
    /// Every channel of a frame receives the same mono sample. A trailing
    /// partial frame is zeroed.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        if channels == 0 {
            out.fill(0.0);
            return;
        }

        self.drain_messages();

        let snapshot = self.params.snapshot();
        let coeffs = EnvelopeCoeffs::new(
            snapshot.attack_time,
            snapshot.release_time,
            self.sample_rate as f32,
        );

        let mut frames = out.chunks_exact_mut(channels);
        for frame in &mut frames {
            let sample = self.next_frame(&snapshot, &coeffs);
            frame.fill(sample);
        }
        frames.into_remainder().fill(0.0);

        self.frame_counter += (out.len() / channels) as u64;
    }

    /// Single-channel convenience for [`render`](Self::render).
    pub fn render_mono(&mut self, out: &mut [f32]) {
        self.render(out, 1);
    }

    #[inline]
    fn next_frame(&mut self, snapshot: &ParamSnapshot, coeffs: &EnvelopeCoeffs) -> f32 {
        let frequency_scale = self.vibrato.next_factor(
            snapshot.vibrato_depth,
            snapshot.vibrato_speed,
            self.sample_rate,
        );

        let mut mix = 0.0f32;
        for voice in self.voices.iter_mut() {
            if !voice.is_audible() {
                continue;
            }
            mix += voice.next_sample(frequency_scale, snapshot.waveform, coeffs, self.sample_rate);
        }

        (mix * snapshot.master_gain).clamp(-snapshot.max_amplitude, snapshot.max_amplitude)
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.pop() {
            self.apply(msg);
        }
    }

    fn apply(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { frequency } => self.start_note(frequency),
            SynthMessage::NoteOff { frequency } => self.release_note(frequency),
            SynthMessage::AllNotesOff => self.release_all(),
        }
    }

    fn start_note(&mut self, frequency: f32) {
        // inf/NaN would poison the slot's phase for every later note
        let frequency = if frequency.is_finite() { frequency } else { 0.0 };
        let idx = allocator::allocate(&self.voices, self.steal_policy);
        self.note_counter += 1;
        self.voices[idx].start(frequency, self.note_counter);
    }

    fn release_note(&mut self, frequency: f32) {
        // every matching voice, so duplicated pitches all let go together
        for voice in self.voices.iter_mut() {
            if voice.is_active() && (voice.frequency() - frequency).abs() < FREQUENCY_TOLERANCE {
                voice.release();
            }
        }
    }

    fn release_all(&mut self) {
        for voice in self.voices.iter_mut() {
            voice.release();
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn max_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn params(&self) -> &Arc<SynthParams> {
        &self.params
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate as f32
    }

    pub fn steal_policy(&self) -> StealPolicy {
        self.steal_policy
    }

    pub fn vibrato_phase(&self) -> f64 {
        self.vibrato.phase()
    }

    /// Frames rendered since construction.
    pub fn frames_rendered(&self) -> u64 {
        self.frame_counter
    }
}

/// Direct access for offline use, where the caller owns the synth and no
/// queue hop is needed.
impl NoteSink for PolySynth {
    fn note_on(&mut self, frequency: f32) {
        self.start_note(frequency);
    }

    fn note_off(&mut self, frequency: f32) {
        self.release_note(frequency);
    }

    fn all_notes_off(&mut self) {
        self.release_all();
    }
}
