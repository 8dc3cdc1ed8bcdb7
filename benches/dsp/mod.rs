mod envelope;
mod oscillator;
mod vibrato;

pub use envelope::bench_envelope;
pub use oscillator::bench_waveform;
pub use vibrato::bench_vibrato;
