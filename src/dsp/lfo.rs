//! Shared vibrato LFO.

use std::f64::consts::TAU;

use crate::dsp::oscillator::wrap_phase;

/*
Vibrato
=======

One low-frequency sine runs for the whole synth, not one per voice. Every
sounding voice reads the same factor on the same sample, so a chord bends as
a block instead of shimmering apart.

  vibrato_phase += 2π · speed / sample_rate      (wrapped into [0, 2π))
  factor         = 1 + depth · sin(vibrato_phase)
  voice freq     = base_freq · factor

Depth is a ratio, not cents: 0.01 swings the pitch ±1 %, roughly ±17 cents.
Typical speeds sit in the 2-7 Hz vibrato range.

Depth 0 short-circuits to a factor of exactly 1.0. Multiplying by 1.0 is
exact in IEEE arithmetic, so a synth with no depth renders bit-for-bit the
same samples as one with no vibrato stage at all. The phase keeps advancing
regardless, so turning depth up mid-note picks up a running LFO rather than
restarting it.
*/

#[derive(Debug, Clone, Copy, Default)]
pub struct Vibrato {
    phase: f64,
}

impl Vibrato {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one sample and return the frequency multiplier for it.
    #[inline]
    pub fn next_factor(&mut self, depth: f32, speed: f32, sample_rate: f64) -> f64 {
        self.phase = wrap_phase(self.phase + TAU * speed as f64 / sample_rate);

        if depth == 0.0 {
            return 1.0;
        }
        1.0 + depth as f64 * self.phase.sin()
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}
