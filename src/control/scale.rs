//! Scale degrees to frequencies, and chord playback on top of a [`NoteSink`].

use tracing::trace;

use crate::synth::message::NoteSink;

/// C4.
pub const DEFAULT_BASE_FREQUENCY: f32 = 261.63;

/// Semitone offsets of the major scale from its root.
pub const MAJOR_SCALE: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Plays scale degrees and chords, remembering which pitches it started.
///
/// Degrees wrap around the scale without changing octave: degree 7 is the
/// root again, degree -1 is the seventh. Chords that run past the top of the
/// scale therefore fold back into the same octave.
#[derive(Debug, Clone)]
pub struct ScalePlayer {
    base_frequency: f32,
    active_notes: Vec<f32>,
}

impl Default for ScalePlayer {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_FREQUENCY)
    }
}

impl ScalePlayer {
    pub fn new(base_frequency: f32) -> Self {
        Self {
            base_frequency,
            active_notes: Vec::with_capacity(8),
        }
    }

    pub fn base_frequency(&self) -> f32 {
        self.base_frequency
    }

    pub fn frequency(&self, degree: i32, octave: i32) -> f32 {
        let step = degree.rem_euclid(MAJOR_SCALE.len() as i32) as usize;
        let semitone = MAJOR_SCALE[step] + 12 * octave;
        self.base_frequency * 2.0_f32.powf(semitone as f32 / 12.0)
    }

    pub fn play_note(&mut self, sink: &mut impl NoteSink, degree: i32, octave: i32) {
        let frequency = self.frequency(degree, octave);
        if !self.active_notes.contains(&frequency) {
            self.active_notes.push(frequency);
        }
        trace!(degree, octave, frequency, "note on");
        sink.note_on(frequency);
    }

    pub fn stop_note(&mut self, sink: &mut impl NoteSink, degree: i32, octave: i32) {
        let frequency = self.frequency(degree, octave);
        self.active_notes.retain(|&f| f != frequency);
        trace!(degree, octave, frequency, "note off");
        sink.note_off(frequency);
    }

    pub fn play_chord(
        &mut self,
        sink: &mut impl NoteSink,
        root: i32,
        octave: i32,
        intervals: &[i32],
    ) {
        for &interval in intervals {
            self.play_note(sink, root + interval, octave);
        }
    }

    pub fn stop_chord(
        &mut self,
        sink: &mut impl NoteSink,
        root: i32,
        octave: i32,
        intervals: &[i32],
    ) {
        for &interval in intervals {
            self.stop_note(sink, root + interval, octave);
        }
    }

    pub fn stop_all(&mut self, sink: &mut impl NoteSink) {
        sink.all_notes_off();
        self.active_notes.clear();
    }

    /// Pitches started and not yet stopped, in start order.
    pub fn active_notes(&self) -> &[f32] {
        &self.active_notes
    }
}
