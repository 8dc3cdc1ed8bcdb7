//! Control-rate collaborators: biometric normalisation, timbre mapping and
//! note/chord selection.
//!
//! Nothing here runs on the audio thread. These types are ticked from a slow
//! loop (tens of Hz) and talk to the synth only through
//! [`NoteSink`](crate::synth::NoteSink) and
//! [`SynthParams`](crate::synth::SynthParams).

/// When to change chord and which one to play.
pub mod chords;
/// Scale degree to frequency mapping and chord playback.
pub mod scale;
/// Sensor line parsing and level normalisation.
pub mod sensors;
/// Biometric level to gain, vibrato and waveform.
pub mod timbre;

pub use chords::{BreathTrigger, ChordChoice, ChordClock};
pub use scale::ScalePlayer;
pub use sensors::{BioNormalizer, BioState, MicLeveler, SensorLine};
pub use timbre::{BreathTimbre, MicTimbre};
