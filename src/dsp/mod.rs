//! Low-level DSP primitives used by the voice pool and the mixer.
//!
//! Everything in here is allocation-free and realtime-safe: plain `Copy`
//! state advanced one sample at a time. Orchestration (which voice plays,
//! when parameters change) lives in [`crate::synth`].

/// Two-stage linear attack/release envelope.
pub mod envelope;
/// Shared vibrato LFO.
pub mod lfo;
/// Stateless waveform shapes and phase helpers.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeCoeffs, EnvelopeStage};
pub use lfo::Vibrato;
pub use oscillator::Waveform;
