//! BioSynthApp - wires sensors, control loop and audio together

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use color_eyre::eyre::{bail, Result as EyreResult, WrapErr};
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use tracing::{debug, info};

use bio_synth::{
    control::{
        BioNormalizer, BreathTimbre, BreathTrigger, ChordClock, MicLeveler, MicTimbre,
        ScalePlayer, SensorLine,
    },
    NoteSink, SynthConfig, SynthHandle,
};

use super::{
    audio::{self, MicIn},
    input::{self, Simulator},
    Args, SourceArg,
};

/// How often the current biometric state is logged.
const STATUS_INTERVAL: Duration = Duration::from_secs(2);

pub struct BioSynthApp {
    args: Args,
}

impl BioSynthApp {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    fn synth_config(&self) -> SynthConfig {
        SynthConfig::default()
            .with_max_voices(self.args.voices)
            .with_waveform(self.args.wave.into())
            .with_master_gain(self.args.gain)
            .with_envelope(self.args.attack, self.args.release)
            .with_steal_policy(self.args.policy.into())
    }

    /// Run until Ctrl-C, end of sensor input or `--seconds` elapses.
    pub fn run(self) -> EyreResult<()> {
        if self.args.source == SourceArg::None && !self.args.mic {
            bail!("nothing to drive the synth: pass --source stdin|sim or --mic");
        }
        if !(self.args.control_rate > 0.0) {
            bail!("control rate must be positive, got {}", self.args.control_rate);
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_ctrlc = Arc::clone(&stop);
        ctrlc::set_handler(move || stop_for_ctrlc.store(true, Ordering::SeqCst))
            .wrap_err("failed to install Ctrl-C handler")?;

        let (out, mut handle) = audio::start_output(self.synth_config())?;
        let mic = if self.args.mic {
            Some(audio::start_mic(MicLeveler::default())?)
        } else {
            None
        };

        let sensor_rx = match self.args.source {
            SourceArg::Stdin => {
                let (tx, rx) = bounded::<SensorLine>(64);
                input::spawn_stdin_reader(tx).wrap_err("failed to spawn stdin reader")?;
                Some(rx)
            }
            SourceArg::Sim | SourceArg::None => None,
        };

        info!(
            source = ?self.args.source,
            mic = self.args.mic,
            voices = handle.max_voices(),
            sample_rate = out.sample_rate,
            channels = out.channels,
            "biosynth running, Ctrl-C to stop"
        );

        let mut control = ControlLoop::new(self.args.source);
        let dt = 1.0 / self.args.control_rate;
        let tick = Duration::from_secs_f32(dt);
        let started = Instant::now();
        let mut last_status = started;

        while !stop.load(Ordering::SeqCst) {
            if let Some(limit) = self.args.seconds {
                if started.elapsed().as_secs_f32() >= limit {
                    break;
                }
            }

            if let Some(rx) = &sensor_rx {
                if !control.drain_sensor(rx) {
                    info!("sensor input closed");
                    break;
                }
            }

            control.tick(dt, mic.as_ref(), &mut handle);

            if last_status.elapsed() >= STATUS_INTERVAL {
                last_status = Instant::now();
                let bio = control.bio.state();
                debug!(
                    gsr = bio.gsr,
                    breath = bio.breath,
                    inhale = bio.is_inhale,
                    mic = ?mic.as_ref().map(MicIn::level),
                    pending = handle.pending(),
                    "status"
                );
            }

            thread::sleep(tick);
        }

        info!("stopping");
        handle.all_notes_off();
        let release = handle.params().release_time().max(0.0);
        thread::sleep(Duration::from_secs_f32(release) + Duration::from_millis(50));

        Ok(())
    }
}

/// Collaborators ticked once per control frame.
struct ControlLoop {
    source: SourceArg,
    simulator: Simulator,
    bio: BioNormalizer,
    player: ScalePlayer,
    clock: ChordClock,
    trigger: BreathTrigger,
    breath_timbre: BreathTimbre,
    mic_timbre: MicTimbre,
}

impl ControlLoop {
    fn new(source: SourceArg) -> Self {
        Self {
            source,
            simulator: Simulator::default(),
            bio: BioNormalizer::default(),
            player: ScalePlayer::default(),
            clock: ChordClock::default(),
            trigger: BreathTrigger::default(),
            breath_timbre: BreathTimbre::default(),
            mic_timbre: MicTimbre::default(),
        }
    }

    fn has_bio(&self) -> bool {
        self.source != SourceArg::None
    }

    /// Fold every queued reading in. `false` once the reader has gone away.
    fn drain_sensor(&mut self, rx: &Receiver<SensorLine>) -> bool {
        loop {
            match rx.try_recv() {
                Ok(line) => {
                    self.bio.update(line);
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn tick(&mut self, dt: f32, mic: Option<&MicIn>, handle: &mut SynthHandle) {
        if self.source == SourceArg::Sim {
            let line = self.simulator.next(dt);
            self.bio.update(line);
        }

        let bio = self.has_bio().then(|| self.bio.state());
        if let Some(state) = bio {
            self.breath_timbre.apply(state.breath, handle.params());
            self.clock.tick(dt, state, &mut self.player, handle);
        }

        if let Some(mic) = mic {
            let level = mic.level();
            self.mic_timbre.apply(level, handle.params());
            self.trigger.tick(dt, level, bio, &mut self.player, handle);
        }
    }
}
