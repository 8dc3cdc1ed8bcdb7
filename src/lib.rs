pub mod control; // Biometric signals to notes and timbre
pub mod dsp; // Waveforms, envelope, vibrato
pub mod synth; // Voice pool, control surface, realtime mixer

pub use dsp::oscillator::Waveform;
pub use synth::{NoteSink, PolySynth, StealPolicy, SynthConfig, SynthHandle};
