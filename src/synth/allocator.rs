//! Voice allocation and stealing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::synth::voice::{Voice, VoiceState};

/// What to do when a note-on finds every voice busy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StealPolicy {
    /// Always take slot 0, whatever it is doing. Abrupt, but deterministic:
    /// with N voices busy the (N+1)-th note replaces the lowest index.
    #[default]
    FirstSlot,
    /// Take the oldest voice that is already releasing; if none is, the
    /// oldest voice overall.
    OldestReleasing,
    /// Take the voice with the lowest envelope level.
    Quietest,
}

/// Pick the slot for a new note.
///
/// The first inactive voice wins; otherwise `policy` chooses a victim.
/// `voices` must not be empty.
pub fn allocate(voices: &[Voice], policy: StealPolicy) -> usize {
    if let Some(idx) = voices.iter().position(Voice::is_free) {
        return idx;
    }
    steal(voices, policy)
}

fn steal(voices: &[Voice], policy: StealPolicy) -> usize {
    match policy {
        StealPolicy::FirstSlot => 0,
        StealPolicy::OldestReleasing => voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age())
            .or_else(|| voices.iter().enumerate().min_by_key(|(_, v)| v.age()))
            .map_or(0, |(idx, _)| idx),
        StealPolicy::Quietest => voices
            .iter()
            .enumerate()
            // strict `<` keeps the lowest index on ties
            .fold((0, f32::INFINITY), |(best, level), (idx, v)| {
                if v.amplitude() < level {
                    (idx, v.amplitude())
                } else {
                    (best, level)
                }
            })
            .0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{envelope::EnvelopeCoeffs, oscillator::Waveform};

    fn busy_pool(levels_after: &[usize]) -> Vec<Voice> {
        let coeffs = EnvelopeCoeffs::new(0.01, 0.01, 1_000.0);
        levels_after
            .iter()
            .enumerate()
            .map(|(i, &samples)| {
                let mut voice = Voice::new();
                voice.start(100.0 * (i + 1) as f32, i as u64);
                for _ in 0..samples {
                    voice.next_sample(1.0, Waveform::Sine, &coeffs, 1_000.0);
                }
                voice
            })
            .collect()
    }

    #[test]
    fn free_voice_is_preferred() {
        let mut pool = busy_pool(&[5, 5, 5]);
        pool[1] = Voice::new();
        for policy in [
            StealPolicy::FirstSlot,
            StealPolicy::OldestReleasing,
            StealPolicy::Quietest,
        ] {
            assert_eq!(allocate(&pool, policy), 1);
        }
    }

    #[test]
    fn first_slot_always_steals_zero() {
        let pool = busy_pool(&[10, 1, 1, 1]);
        assert_eq!(allocate(&pool, StealPolicy::FirstSlot), 0);
    }

    #[test]
    fn oldest_releasing_prefers_releasing_voices() {
        let mut pool = busy_pool(&[10, 10, 10]);
        pool[2].release();
        assert_eq!(allocate(&pool, StealPolicy::OldestReleasing), 2);

        pool[1].release();
        assert_eq!(allocate(&pool, StealPolicy::OldestReleasing), 1);
    }

    #[test]
    fn oldest_releasing_falls_back_to_oldest() {
        let pool = busy_pool(&[10, 10, 10]);
        assert_eq!(allocate(&pool, StealPolicy::OldestReleasing), 0);
    }

    #[test]
    fn quietest_takes_lowest_level() {
        let pool = busy_pool(&[10, 3, 1, 7]);
        assert_eq!(allocate(&pool, StealPolicy::Quietest), 2);
    }
}
