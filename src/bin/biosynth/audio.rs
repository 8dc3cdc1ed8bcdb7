//! cpal glue: the output stream that owns the synth, and the optional
//! breath microphone.

use std::sync::Arc;

use color_eyre::eyre::{bail, eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tracing::{info, warn};

use bio_synth::{
    control::MicLeveler,
    synth::{params::AtomicF32, PolySynth, SynthConfig, SynthHandle},
};

/// Running output stream. Dropping it stops audio.
pub struct AudioOut {
    _stream: cpal::Stream,
    pub sample_rate: f32,
    pub channels: usize,
}

/// Open the default output device and move a fresh synth into its callback.
pub fn start_output(config: SynthConfig) -> EyreResult<(AudioOut, SynthHandle)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    if supported.sample_format() != SampleFormat::F32 {
        bail!(
            "output device wants {:?} samples, only f32 is supported",
            supported.sample_format()
        );
    }

    let sample_rate = supported.sample_rate().0 as f32;
    let channels = supported.channels() as usize;
    let (mut synth, handle) = PolySynth::new(SynthConfig {
        sample_rate,
        ..config
    });

    let stream = device
        .build_output_stream(
            &supported.config(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                synth.render(data, channels);
            },
            |err| warn!(%err, "output stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    info!(
        device = %device.name().unwrap_or_default(),
        sample_rate, channels, "audio output running"
    );

    Ok((
        AudioOut {
            _stream: stream,
            sample_rate,
            channels,
        },
        handle,
    ))
}

/// Running microphone stream publishing its smoothed level.
pub struct MicIn {
    _stream: cpal::Stream,
    level: Arc<AtomicF32>,
}

impl MicIn {
    pub fn level(&self) -> f32 {
        self.level.load()
    }
}

pub fn start_mic(mut leveler: MicLeveler) -> EyreResult<MicIn> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| eyre!("no default input device available"))?;
    let supported = device
        .default_input_config()
        .wrap_err("failed to fetch default input config")?;
    if supported.sample_format() != SampleFormat::F32 {
        bail!(
            "input device delivers {:?} samples, only f32 is supported",
            supported.sample_format()
        );
    }

    let level = Arc::new(AtomicF32::new(0.0));
    let level_out = Arc::clone(&level);

    let stream = device
        .build_input_stream(
            &supported.config(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // interleaved channels are fine for an RMS estimate
                level_out.store(leveler.process(data));
            },
            |err| warn!(%err, "input stream error"),
            None,
        )
        .wrap_err("failed to build input stream")?;
    stream.play().wrap_err("failed to start input stream")?;

    info!(
        device = %device.name().unwrap_or_default(),
        "breath microphone running"
    );

    Ok(MicIn {
        _stream: stream,
        level,
    })
}
