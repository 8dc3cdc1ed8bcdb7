/*
Attack/Release Envelope
=======================

Each voice carries a two-stage linear envelope. There is no decay and no
sustain level: the envelope climbs to full volume while the note is held and
falls to silence once it is let go.

Vocabulary
----------

  level       Current output value (0.0 to 1.0). Multiplies the waveform.

  target      Where the level is heading: 1.0 while the gate is high
              (attacking or holding), 0.0 once the gate drops (releasing).

  coefficient How much `level` moves per sample. Derived from the stage time
              and the render sample rate:

                  coefficient = sample_duration / stage_time
                              = 1 / (stage_time · sample_rate)

              Attack of 0.01 s at 48 kHz → 1/480 per sample, so a note
              starting from silence is at full volume after 480 samples.


The Shape
---------

  Level
    1.0 ┐    ╱‾‾‾‾‾‾‾‾‾‾‾╲
        │   ╱             ╲
        │  ╱               ╲
    0.0 └─╱─────────────────╲──→ Time
         attack    held    release

Unlike a retriggering ADSR, note-on does not reset the level. A reused voice
ramps up from whatever it was still sounding, which keeps a stolen voice from
clicking down to zero first.


Per-Sample Step
---------------

    if target > level:  level += attack,  capped at 1
    if target < level:  level -= release, floored at 0 → finished
    otherwise:          hold

"Finished" is the only signal the voice uses to return to the free pool. A
voice whose gate dropped before it made any sound (level already 0, target
0) is finished on its next step as well, otherwise it would sit in the pool
as active forever.

Zero-length stages are legal: a stage time of 0 (or anything non-positive or
NaN) becomes a coefficient of 1, a one-sample jump.


Coefficient Caching
-------------------

The coefficients only depend on configuration and sample rate, never on voice
state, so the mixer computes them once per render buffer and hands the same
`EnvelopeCoeffs` to every voice.
*/

/// Levels at or below this are treated as silence when releasing.
///
/// Linear f32 ramps accumulate rounding error; without a floor a release can
/// stall a hair above zero for one extra step.
const RELEASE_FLOOR: f32 = 1.0e-7;

/// Per-sample ramp increments shared by every voice for one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeCoeffs {
    pub attack: f32,
    pub release: f32,
}

impl EnvelopeCoeffs {
    pub fn new(attack_time: f32, release_time: f32, sample_rate: f32) -> Self {
        let sample_duration = 1.0 / sample_rate;
        Self {
            attack: coefficient(attack_time, sample_duration),
            release: coefficient(release_time, sample_duration),
        }
    }
}

#[inline]
fn coefficient(stage_time: f32, sample_duration: f32) -> f32 {
    // `!(x > 0)` also catches NaN
    if !(stage_time > 0.0) {
        return 1.0;
    }
    (sample_duration / stage_time).min(1.0)
}

/// Coarse view of where an envelope is, for meters and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Hold,
    Release,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Envelope {
    level: f32,
    target: f32,
}

impl Envelope {
    pub fn new() -> Self {
        Self::silent()
    }

    pub const fn silent() -> Self {
        Self {
            level: 0.0,
            target: 0.0,
        }
    }

    /// Gate high: head for full volume from the current level.
    pub fn gate_on(&mut self) {
        self.target = 1.0;
    }

    /// Gate low: head for silence from the current level.
    pub fn gate_off(&mut self) {
        self.target = 0.0;
    }

    /// Advance one sample. Returns `true` when the release has reached zero.
    #[inline]
    pub fn next_sample(&mut self, coeffs: &EnvelopeCoeffs) -> bool {
        if self.target > self.level {
            self.level = (self.level + coeffs.attack).min(1.0);
            false
        } else if self.target < self.level {
            self.level -= coeffs.release;
            if self.level <= RELEASE_FLOOR {
                self.level = 0.0;
                return true;
            }
            false
        } else {
            self.target <= 0.0
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn stage(&self) -> EnvelopeStage {
        if self.target > self.level {
            EnvelopeStage::Attack
        } else if self.target < self.level {
            EnvelopeStage::Release
        } else if self.target > 0.0 {
            EnvelopeStage::Hold
        } else {
            EnvelopeStage::Idle
        }
    }
}
