// Purpose: voice pool, control surface and the realtime mixer.
// The render side (`PolySynth`) and the control side (`SynthHandle`) only
// share a wait-free ring buffer and a block of atomics.

pub mod allocator;
pub mod config;
pub mod handle;
pub mod message;
pub mod params;
pub mod poly;
pub mod voice;

pub use allocator::StealPolicy;
pub use config::SynthConfig;
pub use handle::SynthHandle;
pub use message::{NoteSink, SynthMessage};
pub use params::SynthParams;
pub use poly::PolySynth;
pub use voice::{Voice, VoiceState};
