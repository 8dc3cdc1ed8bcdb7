/// Note events queued from the control thread to the render thread.
///
/// Each message is applied whole at the top of a render buffer, so the
/// render side never observes a half-written voice.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { frequency: f32 },
    NoteOff { frequency: f32 },
    AllNotesOff,
}

/// Anything that accepts note intent by frequency.
///
/// Implemented by [`SynthHandle`](crate::synth::SynthHandle) for live use and
/// by [`PolySynth`](crate::synth::PolySynth) for offline rendering, so the
/// control-rate collaborators do not care which one they drive.
pub trait NoteSink {
    fn note_on(&mut self, frequency: f32);
    fn note_off(&mut self, frequency: f32);
    fn all_notes_off(&mut self);
}
