//! WAV file recorder
//!
//! Records chosen output lines to a multi-channel WAV file, one channel per
//! line, scaling volts to full scale with a fixed gain.

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::synth::{OutputFrame, OutputLine};

/// WAV file recorder
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    lines: Vec<OutputLine>,
    gain: f32,
    sample_rate: u32,
    frames_written: u64,
}

impl Recorder {
    /// Create a new recorder
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `sample_rate` - Sample rate in Hz
    /// * `lines` - Output lines to record, one channel each
    /// * `gain` - Volts to full scale
    pub fn new(path: &Path, sample_rate: u32, lines: &[OutputLine], gain: f32) -> Result<Self> {
        if lines.is_empty() {
            bail!("at least one output line must be recorded");
        }

        let spec = WavSpec {
            channels: lines.len() as u16,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            lines: lines.to_vec(),
            gain,
            sample_rate,
            frames_written: 0,
        })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of frames written
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / self.sample_rate as f64
    }

    /// Write one output frame
    pub fn write_frame(&mut self, frame: &OutputFrame) -> Result<()> {
        for &line in &self.lines {
            self.writer
                .write_sample(frame.line(line) * self.gain)
                .context("failed to write sample")?;
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Write a buffer of frames
    pub fn write_buffer(&mut self, buffer: &[OutputFrame]) -> Result<()> {
        for frame in buffer {
            self.write_frame(frame)?;
        }
        Ok(())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to properly close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}
