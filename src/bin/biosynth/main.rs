//! biosynth - biometric-driven polyphonic synthesizer
//!
//! Run with: cargo run -- --source sim
//! Feed a sensor board with: cat /dev/ttyUSB0 | cargo run -- --source stdin

mod app;
mod audio;
mod input;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use app::BioSynthApp;
use bio_synth::{StealPolicy, Waveform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// `GSR:<n>,DIST:<n>` lines on standard input
    Stdin,
    /// Synthetic slow breathing and skin-conductance curves
    Sim,
    /// No sensor board
    None,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WaveArg {
    Sine,
    Square,
    Saw,
    Triangle,
}

impl From<WaveArg> for Waveform {
    fn from(wave: WaveArg) -> Self {
        match wave {
            WaveArg::Sine => Waveform::Sine,
            WaveArg::Square => Waveform::Square,
            WaveArg::Saw => Waveform::Saw,
            WaveArg::Triangle => Waveform::Triangle,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    FirstSlot,
    OldestReleasing,
    Quietest,
}

impl From<PolicyArg> for StealPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::FirstSlot => StealPolicy::FirstSlot,
            PolicyArg::OldestReleasing => StealPolicy::OldestReleasing,
            PolicyArg::Quietest => StealPolicy::Quietest,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Where biometric readings come from
    #[arg(long, value_enum, default_value_t = SourceArg::Sim)]
    pub source: SourceArg,

    /// Trigger chords by blowing into the default input device
    #[arg(long)]
    pub mic: bool,

    /// Size of the voice pool
    #[arg(long, default_value_t = 8)]
    pub voices: usize,

    /// Starting waveform (the mic mapping may override it)
    #[arg(long, value_enum, default_value_t = WaveArg::Sine)]
    pub wave: WaveArg,

    /// Master gain before breath mapping takes over
    #[arg(long, default_value_t = 0.1)]
    pub gain: f32,

    /// Attack time in seconds
    #[arg(long, default_value_t = 0.01)]
    pub attack: f32,

    /// Release time in seconds
    #[arg(long, default_value_t = 0.2)]
    pub release: f32,

    /// Voice stealing policy when the pool is full
    #[arg(long, value_enum, default_value_t = PolicyArg::FirstSlot)]
    pub policy: PolicyArg,

    /// Control loop rate in Hz
    #[arg(long, default_value_t = 60.0)]
    pub control_rate: f32,

    /// Stop after this many seconds
    #[arg(long)]
    pub seconds: Option<f32>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    BioSynthApp::new(args).run()
}
