//! Lock-free scalar parameters shared between the control and render threads.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::{dsp::oscillator::Waveform, synth::config::SynthConfig};

/// An `f32` stored as its bit pattern.
///
/// Relaxed ordering is enough: each parameter is independent and a value that
/// lands one buffer late is inaudible.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Timbre and envelope settings, written by the control thread and read by
/// the render thread once per buffer.
#[derive(Debug)]
pub struct SynthParams {
    waveform: AtomicU8,
    master_gain: AtomicF32,
    max_amplitude: AtomicF32,
    attack_time: AtomicF32,
    release_time: AtomicF32,
    vibrato_depth: AtomicF32,
    vibrato_speed: AtomicF32,
}

/// Plain copy of [`SynthParams`] taken at the top of a render buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub waveform: Waveform,
    pub master_gain: f32,
    pub max_amplitude: f32,
    pub attack_time: f32,
    pub release_time: f32,
    pub vibrato_depth: f32,
    pub vibrato_speed: f32,
}

impl SynthParams {
    pub fn from_config(config: &SynthConfig) -> Self {
        Self {
            waveform: AtomicU8::new(config.waveform.as_u8()),
            master_gain: AtomicF32::new(config.master_gain),
            max_amplitude: AtomicF32::new(config.max_amplitude),
            attack_time: AtomicF32::new(config.attack_time),
            release_time: AtomicF32::new(config.release_time),
            vibrato_depth: AtomicF32::new(config.vibrato_depth),
            vibrato_speed: AtomicF32::new(config.vibrato_speed),
        }
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_u8(self.waveform.load(Ordering::Relaxed))
    }

    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform.store(waveform.as_u8(), Ordering::Relaxed);
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain.load()
    }

    /// Not range-checked: callers clamp to [0, 1]. The output clip still
    /// bounds whatever comes out.
    pub fn set_master_gain(&self, gain: f32) {
        self.master_gain.store(gain);
    }

    pub fn max_amplitude(&self) -> f32 {
        self.max_amplitude.load()
    }

    pub fn set_max_amplitude(&self, ceiling: f32) {
        self.max_amplitude.store(ceiling);
    }

    pub fn attack_time(&self) -> f32 {
        self.attack_time.load()
    }

    pub fn set_attack_time(&self, seconds: f32) {
        self.attack_time.store(seconds);
    }

    pub fn release_time(&self) -> f32 {
        self.release_time.load()
    }

    pub fn set_release_time(&self, seconds: f32) {
        self.release_time.store(seconds);
    }

    pub fn vibrato_depth(&self) -> f32 {
        self.vibrato_depth.load()
    }

    pub fn set_vibrato_depth(&self, depth: f32) {
        self.vibrato_depth.store(depth);
    }

    pub fn vibrato_speed(&self) -> f32 {
        self.vibrato_speed.load()
    }

    pub fn set_vibrato_speed(&self, hz: f32) {
        self.vibrato_speed.store(hz);
    }

    /// Read every parameter once, sanitising the ones that would otherwise
    /// produce non-finite or unbounded output.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            waveform: self.waveform(),
            master_gain: finite_or(self.master_gain(), 0.0),
            max_amplitude: finite_or(self.max_amplitude(), 0.0).clamp(0.0, 1.0),
            attack_time: self.attack_time(),
            release_time: self.release_time(),
            vibrato_depth: finite_or(self.vibrato_depth(), 0.0),
            vibrato_speed: finite_or(self.vibrato_speed(), 0.0),
        }
    }
}

impl Default for SynthParams {
    fn default() -> Self {
        Self::from_config(&SynthConfig::default())
    }
}

#[inline]
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
