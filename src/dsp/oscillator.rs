use std::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Waveform Generator
==================

Every voice in the pool shares one stateless function that turns a phase
angle into a sample. The voice owns its phase accumulator; this module only
knows the shapes.

Vocabulary
----------

  phase       Position inside one cycle, in radians, kept in [0, 2π).

  increment   How far the phase moves per sample:

                  increment = 2π · frequency / sample_rate

              At 440 Hz and 48 kHz that is ≈ 0.0576 rad per sample.

  wrap        Subtracting 2π once the accumulator passes a full cycle. Without
              it the f64 accumulator grows forever and loses the fractional
              bits that carry the actual pitch.


The Shapes
----------

  Sine      sin(phase)
            Pure fundamental. Continuous everywhere.

  Triangle  Built from the normalised ramp s = phase/π − 1 ∈ [-1, 1):

                triangle = 2 · (|s| − 0.5)

            Starts at +1, hits -1 at phase π, climbs back to +1.
            Continuous, corners at 0 and π.

  Square    +1 for phase < π, else -1. Jumps at 0 and π.

  Saw       phase/π − 1. Rises from -1 to +1, snaps back at 2π.


  phase:  0        π        2π
  sine:   0 ╱‾‾╲   0   ╲__╱ 0
  tri:    1 ╲      -1     ╱ 1
  square: 1 ‾‾‾‾‾‾‾|_______ -1
  saw:   -1 ╱╱╱╱╱╱╱0╱╱╱╱╱╱╱ 1

No band-limiting is applied. The synth is meant for slow, soft pads where the
aliasing of square and saw at low pitches is acceptable.
*/

/// Closed set of oscillator shapes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Waveform {
    #[default]
    Sine = 0,
    Square = 1,
    Saw = 2,
    Triangle = 3,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Saw,
        Waveform::Triangle,
    ];

    /// Decode the tag stored in an atomic. Unknown tags fall back to sine.
    #[inline]
    pub fn from_u8(tag: u8) -> Self {
        match tag {
            1 => Waveform::Square,
            2 => Waveform::Saw,
            3 => Waveform::Triangle,
            _ => Waveform::Sine,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Saw => "saw",
            Waveform::Triangle => "triangle",
        }
    }
}

/// Sample `waveform` at `phase` (radians, expected in [0, 2π)).
///
/// Output is always in [-1, 1].
#[inline]
pub fn sample(phase: f64, waveform: Waveform) -> f32 {
    match waveform {
        Waveform::Sine => phase.sin() as f32,
        Waveform::Square => {
            if phase < PI {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Saw => (phase / PI - 1.0) as f32,
        Waveform::Triangle => {
            let saw = phase / PI - 1.0;
            (2.0 * (saw.abs() - 0.5)) as f32
        }
    }
}

/// Per-sample phase step for `frequency` Hz.
#[inline]
pub fn phase_increment(frequency: f64, sample_rate: f64) -> f64 {
    TAU * frequency / sample_rate
}

/// Fold a phase accumulator back into [0, 2π).
///
/// The common case (one step past the end) costs a compare and a subtract;
/// anything further out, including negative phase from a large negative
/// vibrato swing, goes through `rem_euclid`.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    if (0.0..TAU).contains(&phase) {
        phase
    } else if (TAU..2.0 * TAU).contains(&phase) {
        phase - TAU
    } else {
        let wrapped = phase.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if wrapped >= TAU {
            0.0
        } else {
            wrapped
        }
    }
}
