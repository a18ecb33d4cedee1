//! Real-time audio playback using cpal
//!
//! The engine is moved into the audio callback, so nothing on the audio
//! thread locks or logs. Faults come back out through an atomic counter.
//! The mix line is written to every channel.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::Engine;
use crate::config::Patch;

/// Real-time audio player
pub struct Player {
    stream: Option<Stream>,
    running: Arc<AtomicBool>,
    frames: Arc<AtomicU64>,
    faults: Arc<AtomicU64>,
    sample_rate: u32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            stream: None,
            running: Arc::new(AtomicBool::new(false)),
            frames: Arc::new(AtomicU64::new(0)),
            faults: Arc::new(AtomicU64::new(0)),
            sample_rate: 0,
        }
    }

    /// Start playing a patch.
    ///
    /// The engine is built at the device's sample rate so pitch stays in tune
    /// whatever rate the patch names.
    pub fn start(&mut self, patch: &Patch) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;

        let config = device.default_output_config()?;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        let sample_rate = stream_config.sample_rate.0;
        if sample_rate != patch.audio.sample_rate {
            tracing::info!(
                "Device runs at {} Hz, patch asks for {} Hz; using the device rate",
                sample_rate,
                patch.audio.sample_rate
            );
        }
        self.sample_rate = sample_rate;

        let engine = Engine::with_sample_rate(patch, sample_rate).without_fault_logging();
        self.faults = engine.fault_counter();
        let gain = patch.audio.gain;

        self.running.store(true, Ordering::SeqCst);

        let stream = match sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(&device, &stream_config, engine, gain)?,
            SampleFormat::I16 => self.build_stream::<i16>(&device, &stream_config, engine, gain)?,
            SampleFormat::U16 => self.build_stream::<u16>(&device, &stream_config, engine, gain)?,
            _ => return Err(anyhow!("Unsupported sample format")),
        };

        stream.play()?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.stream = None;
    }

    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Flag that stops playback when cleared, for signal handlers
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Frames handed to the device so far
    pub fn frames_played(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Samples that faulted on the audio thread so far
    pub fn fault_count(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }

    /// Rate the engine runs at, zero before `start`
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
        &self,
        device: &Device,
        config: &StreamConfig,
        mut engine: Engine,
        gain: f32,
    ) -> Result<Stream> {
        let channels = config.channels as usize;
        let running = self.running.clone();
        let frames = self.frames.clone();

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if !running.load(Ordering::SeqCst) {
                    // Fill with silence when stopped
                    for sample in data.iter_mut() {
                        *sample = T::from_sample(0.0f32);
                    }
                    return;
                }

                let mut count = 0;
                for frame in data.chunks_mut(channels) {
                    let sample = (engine.process().mix * gain).clamp(-1.0, 1.0);
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = T::from_sample(sample);
                    }
                    count += 1;
                }
                frames.fetch_add(count, Ordering::Relaxed);
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device()
        .and_then(|d| d.name().ok())
}
