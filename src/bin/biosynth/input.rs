//! Sensor sources for the control loop.

use std::{
    f32::consts::TAU,
    io::{self, BufRead},
    thread::{self, JoinHandle},
};

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use bio_synth::control::SensorLine;

/// Read sensor lines from stdin on a background thread.
///
/// The sender is dropped at end of input, which the control loop sees as a
/// disconnected channel.
pub fn spawn_stdin_reader(tx: Sender<SensorLine>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("sensor-stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(%err, "sensor read failed");
                        break;
                    }
                };
                match SensorLine::parse(&line) {
                    Some(reading) => {
                        if tx.send(reading).is_err() {
                            break;
                        }
                    }
                    None => debug!(%line, "ignoring unrecognised sensor line"),
                }
            }
        })
}

/// Fake sensor board: a slow breathing cycle and a drifting GSR.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    time: f32,
}

impl Simulator {
    /// Seconds per simulated breath.
    const BREATH_PERIOD: f32 = 4.0;
    /// Seconds per GSR drift cycle.
    const GSR_PERIOD: f32 = 47.0;

    pub fn next(&mut self, dt: f32) -> SensorLine {
        self.time += dt;

        let breath = 0.5 - 0.5 * (TAU * self.time / Self::BREATH_PERIOD).cos();
        let gsr = 0.5 - 0.5 * (TAU * self.time / Self::GSR_PERIOD).cos();

        SensorLine {
            gsr: Some((300.0 + 500.0 * gsr).round() as i32),
            distance: Some((25.0 + 15.0 * breath).round() as i32),
        }
    }
}
