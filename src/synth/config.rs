#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::oscillator::Waveform, synth::allocator::StealPolicy};

pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Construction-time settings for a [`PolySynth`](crate::synth::PolySynth).
///
/// `max_voices`, `sample_rate`, `steal_policy` and `queue_capacity` are fixed
/// once the synth exists; everything else seeds the live
/// [`SynthParams`](crate::synth::params::SynthParams).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f32,
    pub max_voices: usize,
    pub waveform: Waveform,
    pub master_gain: f32,
    pub max_amplitude: f32,
    pub attack_time: f32,
    pub release_time: f32,
    pub vibrato_depth: f32,
    pub vibrato_speed: f32,
    pub steal_policy: StealPolicy,
    pub queue_capacity: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_voices: 8,
            waveform: Waveform::Sine,
            master_gain: 0.1,
            max_amplitude: 0.9,
            attack_time: 0.01,
            release_time: 0.2,
            vibrato_depth: 0.0,
            vibrato_speed: 5.0,
            steal_policy: StealPolicy::FirstSlot,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl SynthConfig {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn with_max_voices(mut self, voices: usize) -> Self {
        self.max_voices = voices;
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain;
        self
    }

    pub fn with_max_amplitude(mut self, ceiling: f32) -> Self {
        self.max_amplitude = ceiling;
        self
    }

    pub fn with_envelope(mut self, attack_time: f32, release_time: f32) -> Self {
        self.attack_time = attack_time;
        self.release_time = release_time;
        self
    }

    pub fn with_vibrato(mut self, depth: f32, speed: f32) -> Self {
        self.vibrato_depth = depth;
        self.vibrato_speed = speed;
        self
    }

    pub fn with_steal_policy(mut self, policy: StealPolicy) -> Self {
        self.steal_policy = policy;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Pool size actually allocated. An empty pool would leave nothing to
    /// steal, so it is bumped to one voice.
    pub fn voice_count(&self) -> usize {
        self.max_voices.max(1)
    }

    /// Render sample rate, falling back to 48 kHz for nonsense values.
    pub fn effective_sample_rate(&self) -> f32 {
        if self.sample_rate.is_finite() && self.sample_rate > 0.0 {
            self.sample_rate
        } else {
            48_000.0
        }
    }
}
