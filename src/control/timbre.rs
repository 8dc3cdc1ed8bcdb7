//! Biometric levels to timbre parameters.

use crate::{control::sensors::lerp, dsp::oscillator::Waveform, synth::params::SynthParams};

/// Deeper breathing plays louder and wobbles more.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreathTimbre {
    pub min_gain: f32,
    pub max_gain: f32,
    pub max_vibrato_depth: f32,
}

impl Default for BreathTimbre {
    fn default() -> Self {
        Self {
            min_gain: 0.05,
            max_gain: 0.2,
            max_vibrato_depth: 0.05,
        }
    }
}

impl BreathTimbre {
    pub fn apply(&self, breath: f32, params: &SynthParams) {
        let breath = breath.clamp(0.0, 1.0);
        params.set_master_gain(lerp(self.min_gain, self.max_gain, breath));
        params.set_vibrato_depth(lerp(0.0, self.max_vibrato_depth, breath));
    }
}

/// Blowing into the microphone adds vibrato on top of the breath mapping and
/// flips the waveform to triangle when it gets loud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicTimbre {
    /// Speed at zero mic level. Speed is rebuilt from this every tick so it
    /// does not ratchet upward while the player keeps blowing.
    pub base_vibrato_speed: f32,
    pub extra_vibrato_depth: f32,
    pub extra_vibrato_speed: f32,
    pub max_vibrato_depth: f32,
    pub max_vibrato_speed: f32,
    pub triangle_threshold: f32,
}

impl Default for MicTimbre {
    fn default() -> Self {
        Self {
            base_vibrato_speed: 5.0,
            extra_vibrato_depth: 0.01,
            extra_vibrato_speed: 2.0,
            max_vibrato_depth: 0.05,
            max_vibrato_speed: 10.0,
            triangle_threshold: 0.7,
        }
    }
}

impl MicTimbre {
    /// Runs after [`BreathTimbre::apply`] on the same tick: it adds to the
    /// depth the breath mapping just wrote.
    pub fn apply(&self, mic: f32, params: &SynthParams) {
        let mic = mic.clamp(0.0, 1.0);

        let depth = params.vibrato_depth() + self.extra_vibrato_depth * mic;
        let speed = self.base_vibrato_speed + self.extra_vibrato_speed * mic;
        params.set_vibrato_depth(depth.min(self.max_vibrato_depth).max(0.0));
        params.set_vibrato_speed(speed.min(self.max_vibrato_speed).max(0.0));

        let waveform = if mic > self.triangle_threshold {
            Waveform::Triangle
        } else {
            Waveform::Sine
        };
        params.set_waveform(waveform);
    }
}
