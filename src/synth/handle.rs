use std::sync::Arc;

use rtrb::Producer;
use tracing::warn;

use crate::{
    dsp::oscillator::Waveform,
    synth::{
        message::{NoteSink, SynthMessage},
        params::SynthParams,
    },
};

/// Control-thread side of a [`PolySynth`](crate::synth::PolySynth).
///
/// Note events go through a wait-free ring buffer; scalar parameters are
/// stored straight into shared atomics. Nothing here can block the render
/// thread.
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
    params: Arc<SynthParams>,
    max_voices: usize,
    capacity: usize,
}

impl SynthHandle {
    pub(crate) fn new(
        tx: Producer<SynthMessage>,
        params: Arc<SynthParams>,
        max_voices: usize,
    ) -> Self {
        let capacity = tx.slots();
        Self {
            tx,
            params,
            max_voices,
            capacity,
        }
    }

    /// Queue a message. A full queue drops the event; the render thread has
    /// fallen badly behind and a late note is worse than a missing one.
    pub fn send(&mut self, msg: SynthMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => true,
            Err(_) => {
                warn!(?msg, "synth control queue full, dropping event");
                false
            }
        }
    }

    pub fn params(&self) -> &Arc<SynthParams> {
        &self.params
    }

    pub fn max_voices(&self) -> usize {
        self.max_voices
    }

    /// Events queued but not yet picked up by the render thread.
    pub fn pending(&self) -> usize {
        self.capacity - self.tx.slots()
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.params.set_waveform(waveform);
    }

    pub fn set_master_gain(&self, gain: f32) {
        self.params.set_master_gain(gain);
    }

    pub fn set_max_amplitude(&self, ceiling: f32) {
        self.params.set_max_amplitude(ceiling);
    }

    pub fn set_attack_time(&self, seconds: f32) {
        self.params.set_attack_time(seconds);
    }

    pub fn set_release_time(&self, seconds: f32) {
        self.params.set_release_time(seconds);
    }

    pub fn set_vibrato_depth(&self, depth: f32) {
        self.params.set_vibrato_depth(depth);
    }

    pub fn set_vibrato_speed(&self, hz: f32) {
        self.params.set_vibrato_speed(hz);
    }
}

impl NoteSink for SynthHandle {
    fn note_on(&mut self, frequency: f32) {
        self.send(SynthMessage::NoteOn { frequency });
    }

    fn note_off(&mut self, frequency: f32) {
        self.send(SynthMessage::NoteOff { frequency });
    }

    fn all_notes_off(&mut self) {
        self.send(SynthMessage::AllNotesOff);
    }
}
