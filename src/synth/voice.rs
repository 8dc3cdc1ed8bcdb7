use crate::dsp::{
    envelope::{Envelope, EnvelopeCoeffs, EnvelopeStage},
    oscillator::{self, Waveform},
};

/// Below this an inactive voice no longer contributes to the mix.
pub(crate) const SILENCE_THRESHOLD: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Sounding,  // Gate high, attacking or holding
    Releasing, // Gate low, envelope falling toward zero
}

/// One oscillator plus its envelope, stored by value in the pool.
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    active: bool,
    frequency: f32,
    phase: f64,
    envelope: Envelope,
    age: u64,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

impl Voice {
    pub const fn new() -> Self {
        Self {
            active: false,
            frequency: 0.0,
            phase: 0.0,
            envelope: Envelope::silent(),
            age: 0,
        }
    }

    /// Claim the voice for a new note.
    ///
    /// Phase and the current envelope level carry over, so a stolen or
    /// still-ringing slot glides into the new note without a reset.
    pub fn start(&mut self, frequency: f32, age: u64) {
        self.active = true;
        self.frequency = frequency;
        self.age = age;
        if !self.phase.is_finite() {
            self.phase = 0.0;
        }
        self.envelope.gate_on();
    }

    /// Drop the gate. The voice stays active until the envelope reaches zero.
    pub fn release(&mut self) {
        self.envelope.gate_off();
    }

    /// Render one sample at `frequency · frequency_scale`.
    ///
    /// Runs the envelope step first, so a voice deactivates on the same
    /// sample its level reaches zero.
    #[inline]
    pub fn next_sample(
        &mut self,
        frequency_scale: f64,
        waveform: Waveform,
        coeffs: &EnvelopeCoeffs,
        sample_rate: f64,
    ) -> f32 {
        let increment =
            oscillator::phase_increment(self.frequency as f64 * frequency_scale, sample_rate);

        if self.envelope.next_sample(coeffs) {
            self.active = false;
        }

        let out = oscillator::sample(self.phase, waveform) * self.envelope.level();
        self.phase = oscillator::wrap_phase(self.phase + increment);
        out
    }

    /// Whether the mixer should render this voice at all.
    #[inline]
    pub fn is_audible(&self) -> bool {
        self.active || self.envelope.level() > SILENCE_THRESHOLD
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_free(&self) -> bool {
        !self.active
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn amplitude(&self) -> f32 {
        self.envelope.level()
    }

    pub fn target_amplitude(&self) -> f32 {
        self.envelope.target()
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        if !self.active {
            VoiceState::Free
        } else if matches!(
            self.envelope.stage(),
            EnvelopeStage::Release | EnvelopeStage::Idle
        ) {
            VoiceState::Releasing
        } else {
            VoiceState::Sounding
        }
    }
}
