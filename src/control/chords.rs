//! Deciding when and what to play from biometric state.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{
    control::{
        scale::ScalePlayer,
        sensors::{lerp, BioState},
    },
    synth::message::NoteSink,
};

/// Chord rooted on a scale degree, as chosen by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordChoice {
    pub root: i32,
    pub octave: i32,
    pub notes: usize,
}

/// Changes chord on a breath-driven clock, picking the root from skin
/// conductance.
///
/// Faster breathing shortens the interval between chords; deeper breathing
/// lifts the octave and thickens the chord.
#[derive(Debug, Clone)]
pub struct ChordClock {
    /// Interval at full breath, seconds.
    pub min_interval: f32,
    /// Interval at no breath, seconds.
    pub max_interval: f32,
    /// Roots to choose from, indexed by GSR.
    pub degrees: Vec<i32>,
    pub calm_chord: Vec<i32>,
    pub mid_chord: Vec<i32>,
    pub intense_chord: Vec<i32>,
    timer: f32,
}

impl Default for ChordClock {
    fn default() -> Self {
        Self {
            min_interval: 2.5,
            max_interval: 6.0,
            // I, IV, V, vi
            degrees: vec![0, 3, 4, 5],
            calm_chord: vec![0, 2, 4],
            mid_chord: vec![0, 2, 4],
            intense_chord: vec![0, 2, 4, 6],
            timer: 0.0,
        }
    }
}

impl ChordClock {
    /// Advance by `dt` seconds; on expiry replace whatever is sounding with a
    /// new chord.
    pub fn tick(
        &mut self,
        dt: f32,
        bio: BioState,
        player: &mut ScalePlayer,
        sink: &mut impl NoteSink,
    ) -> Option<ChordChoice> {
        let breath = bio.breath.clamp(0.0, 1.0);
        let gsr = bio.gsr.clamp(0.0, 1.0);

        let interval = lerp(self.max_interval, self.min_interval, breath);
        self.timer += dt;
        if self.timer < interval || self.degrees.is_empty() {
            return None;
        }
        self.timer = 0.0;

        let idx = (gsr * (self.degrees.len() - 1) as f32).floor() as usize;
        let root = self.degrees[idx.min(self.degrees.len() - 1)];
        let octave = if breath < 0.6 { -1 } else { 0 };
        let chord = if breath < 0.33 {
            &self.calm_chord
        } else if breath < 0.66 {
            &self.mid_chord
        } else {
            &self.intense_chord
        };

        player.stop_all(sink);
        player.play_chord(sink, root, octave, chord);

        let choice = ChordChoice {
            root,
            octave,
            notes: chord.len(),
        };
        debug!(?choice, breath, gsr, "chord change");
        Some(choice)
    }

    pub fn elapsed(&self) -> f32 {
        self.timer
    }
}

/// Fires a note or chord when a breath into the microphone crosses a
/// threshold, with hysteresis and a minimum retrigger time.
#[derive(Debug, Clone)]
pub struct BreathTrigger {
    /// Level at or above which an armed trigger fires.
    pub trigger_threshold: f32,
    /// Level at or below which a fired trigger re-arms.
    pub release_threshold: f32,
    /// Minimum seconds between two firings.
    pub min_retrigger_time: f32,
    pub play_chord: bool,
    pub chord_shape: Vec<i32>,
    pub base_octave: i32,
    pub max_extra_octave: i32,
    /// Restrict roots to these degrees. Empty means the whole scale.
    pub allowed_degrees: Vec<i32>,
    armed: bool,
    since_last: f32,
    rng: StdRng,
}

impl Default for BreathTrigger {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl BreathTrigger {
    /// Deterministic variant for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            trigger_threshold: 0.35,
            release_threshold: 0.2,
            min_retrigger_time: 0.4,
            play_chord: true,
            chord_shape: vec![0, 2, 4],
            base_octave: 0,
            max_extra_octave: 1,
            allowed_degrees: Vec::new(),
            armed: true,
            since_last: 0.0,
            rng,
        }
    }

    /// Advance by `dt` seconds with the current mic `level`.
    ///
    /// `bio` steers degree and octave selection when a sensor board is
    /// connected; without one both are drawn at random.
    pub fn tick(
        &mut self,
        dt: f32,
        level: f32,
        bio: Option<BioState>,
        player: &mut ScalePlayer,
        sink: &mut impl NoteSink,
    ) -> Option<ChordChoice> {
        self.since_last += dt;
        let level = level.clamp(0.0, 1.0);

        let mut fired = None;
        if self.armed
            && level >= self.trigger_threshold
            && self.since_last >= self.min_retrigger_time
        {
            fired = Some(self.fire(bio, player, sink));
            self.armed = false;
            self.since_last = 0.0;
        }

        if !self.armed && level <= self.release_threshold {
            self.armed = true;
        }
        fired
    }

    fn fire(
        &mut self,
        bio: Option<BioState>,
        player: &mut ScalePlayer,
        sink: &mut impl NoteSink,
    ) -> ChordChoice {
        let root = self.choose_degree(bio);
        let octave = self.choose_octave(bio);

        player.stop_all(sink);
        let notes = if self.play_chord && !self.chord_shape.is_empty() {
            player.play_chord(sink, root, octave, &self.chord_shape);
            self.chord_shape.len()
        } else {
            player.play_note(sink, root, octave);
            1
        };

        let choice = ChordChoice {
            root,
            octave,
            notes,
        };
        debug!(?choice, "breath trigger");
        choice
    }

    fn choose_degree(&mut self, bio: Option<BioState>) -> i32 {
        if !self.allowed_degrees.is_empty() {
            let selector = match bio {
                Some(state) => state.gsr.clamp(0.0, 1.0),
                None => self.rng.gen::<f32>(),
            };
            let len = self.allowed_degrees.len();
            let idx = ((selector * len as f32).floor() as usize).min(len - 1);
            return self.allowed_degrees[idx];
        }

        match bio {
            Some(state) => lerp(0.0, 6.0, state.gsr.clamp(0.0, 1.0)).round() as i32,
            None => self.rng.gen_range(0..7),
        }
    }

    fn choose_octave(&mut self, bio: Option<BioState>) -> i32 {
        if self.max_extra_octave <= 0 {
            return self.base_octave;
        }
        let extra = match bio {
            Some(state) => {
                lerp(0.0, self.max_extra_octave as f32, state.breath.clamp(0.0, 1.0)).round() as i32
            }
            None => self.rng.gen_range(0..=self.max_extra_octave),
        };
        self.base_octave + extra
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::scale::tests::{Event, Recorder};

    fn bio(gsr: f32, breath: f32) -> BioState {
        BioState {
            gsr,
            breath,
            ..BioState::default()
        }
    }

    #[test]
    fn clock_waits_for_breath_scaled_interval() {
        let mut clock = ChordClock::default();
        let mut player = ScalePlayer::default();
        let mut sink = Recorder::default();

        // no breath: 6 s interval
        for _ in 0..59 {
            assert!(clock.tick(0.1, bio(0.0, 0.0), &mut player, &mut sink).is_none());
        }
        let choice = clock.tick(0.11, bio(0.0, 0.0), &mut player, &mut sink);
        assert_eq!(
            choice,
            Some(ChordChoice {
                root: 0,
                octave: -1,
                notes: 3
            })
        );
        assert_eq!(sink.events[0], Event::AllOff);
        assert_eq!(sink.events.len(), 4);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn deep_breath_picks_dense_chord_high() {
        let mut clock = ChordClock::default();
        let mut player = ScalePlayer::default();
        let mut sink = Recorder::default();

        let choice = clock
            .tick(2.5, bio(1.0, 1.0), &mut player, &mut sink)
            .unwrap();
        assert_eq!(choice.root, 5);
        assert_eq!(choice.octave, 0);
        assert_eq!(choice.notes, 4);
        assert_eq!(player.active_notes().len(), 4);
    }

    #[test]
    fn gsr_selects_root() {
        let mut player = ScalePlayer::default();
        let mut sink = Recorder::default();
        let roots: Vec<i32> = [0.0, 0.34, 0.67, 1.0]
            .iter()
            .map(|&gsr| {
                let mut clock = ChordClock::default();
                clock
                    .tick(10.0, bio(gsr, 0.0), &mut player, &mut sink)
                    .unwrap()
                    .root
            })
            .collect();
        assert_eq!(roots, vec![0, 3, 4, 5]);
    }

    #[test]
    fn trigger_has_hysteresis_and_holdoff() {
        let mut trigger = BreathTrigger::seeded(7);
        let mut player = ScalePlayer::default();
        let mut sink = Recorder::default();

        // too soon after start
        assert!(trigger
            .tick(0.1, 0.9, None, &mut player, &mut sink)
            .is_none());
        assert!(trigger
            .tick(0.4, 0.9, None, &mut player, &mut sink)
            .is_some());
        assert!(!trigger.is_armed());

        // still loud: no retrigger
        assert!(trigger
            .tick(1.0, 0.9, None, &mut player, &mut sink)
            .is_none());
        // between thresholds: still disarmed
        trigger.tick(0.1, 0.3, None, &mut player, &mut sink);
        assert!(!trigger.is_armed());
        // quiet: re-arm
        trigger.tick(0.1, 0.1, None, &mut player, &mut sink);
        assert!(trigger.is_armed());
        assert!(trigger
            .tick(0.1, 0.5, None, &mut player, &mut sink)
            .is_some());
    }

    #[test]
    fn trigger_uses_bio_state_when_available() {
        let mut trigger = BreathTrigger::seeded(1);
        let mut player = ScalePlayer::default();
        let mut sink = Recorder::default();

        let choice = trigger
            .tick(1.0, 1.0, Some(bio(0.5, 1.0)), &mut player, &mut sink)
            .unwrap();
        assert_eq!(choice.root, 3);
        assert_eq!(choice.octave, 1);
        assert_eq!(choice.notes, 3);
    }

    #[test]
    fn allowed_degrees_restrict_roots() {
        let mut trigger = BreathTrigger::seeded(3);
        trigger.allowed_degrees = vec![0, 3, 4, 5];
        trigger.play_chord = false;
        let mut player = ScalePlayer::default();
        let mut sink = Recorder::default();

        let choice = trigger
            .tick(1.0, 1.0, Some(bio(1.0, 0.0)), &mut player, &mut sink)
            .unwrap();
        assert_eq!(choice.root, 5);
        assert_eq!(choice.octave, 0);
        assert_eq!(choice.notes, 1);

        for _ in 0..50 {
            trigger.tick(1.0, 0.0, None, &mut player, &mut sink);
            if let Some(choice) = trigger.tick(1.0, 1.0, None, &mut player, &mut sink) {
                assert!(trigger.allowed_degrees.contains(&choice.root));
                assert!((0..=1).contains(&choice.octave));
            }
        }
    }
}
