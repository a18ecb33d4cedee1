//! Patch schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::engine::CvSource;
use crate::synth::{LfoConfig, Params, Variant};

/// A patch: knob positions, the cables plugged into the inputs, and how to
/// run the voice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Patch {
    /// Audio output settings
    pub audio: AudioConfig,

    /// Secondary stage
    pub variant: Variant,

    /// Knob values
    pub params: Params,

    /// CV sources, unpatched inputs read 0 V
    pub inputs: InputPatch,
}

impl Patch {
    /// Validate the patch
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if !self.audio.gain.is_finite() || self.audio.gain <= 0.0 || self.audio.gain > 1.0 {
            bail!("Gain must be greater than 0.0 and at most 1.0");
        }

        for (name, value, min, max) in self.params.ranges() {
            if !(min..=max).contains(&value) {
                bail!(
                    "Parameter '{}' must be between {} and {}, got {}",
                    name,
                    min,
                    max,
                    value
                );
            }
        }

        for (name, source) in self.inputs.sources() {
            match source {
                CvSource::Constant(volts) if !volts.is_finite() => {
                    bail!("Input '{}' must be a finite voltage", name);
                }
                CvSource::Lfo { lfo } => validate_lfo(name, lfo)?,
                _ => {}
            }
        }

        Ok(())
    }
}

fn validate_lfo(name: &str, lfo: &LfoConfig) -> Result<()> {
    if !(0.01..=100.0).contains(&lfo.frequency) {
        bail!("LFO on input '{}' must run between 0.01 and 100 Hz", name);
    }
    if !lfo.amplitude.is_finite() || !lfo.offset.is_finite() {
        bail!("LFO on input '{}' must have a finite amplitude and offset", name);
    }
    Ok(())
}

/// Audio output configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Volts to full scale for rendered and played audio (default: 0.1)
    #[serde(default = "default_gain")]
    pub gain: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            gain: default_gain(),
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_gain() -> f32 { 0.1 }

/// Sources for every voice input
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputPatch {
    pub pitch: PitchPatch,
    pub pitch_all: CvSource,
    pub fm: CvSource,
    pub fm_amount: CvSource,
    pub psychedelic_all: CvSource,
    pub saw_psychedelic: CvSource,
    pub triangle_psychedelic: CvSource,
    pub wavefold: CvSource,
    pub resample: CvSource,
}

impl InputPatch {
    /// Every input with its name
    pub fn sources(&self) -> [(&'static str, &CvSource); 12] {
        [
            ("pitch.sine", &self.pitch.sine),
            ("pitch.saw", &self.pitch.saw),
            ("pitch.triangle", &self.pitch.triangle),
            ("pitch.square", &self.pitch.square),
            ("pitch_all", &self.pitch_all),
            ("fm", &self.fm),
            ("fm_amount", &self.fm_amount),
            ("psychedelic_all", &self.psychedelic_all),
            ("saw_psychedelic", &self.saw_psychedelic),
            ("triangle_psychedelic", &self.triangle_psychedelic),
            ("wavefold", &self.wavefold),
            ("resample", &self.resample),
        ]
    }

    /// Names of the inputs with something plugged in
    pub fn patched(&self) -> Vec<&'static str> {
        self.sources()
            .into_iter()
            .filter(|(_, source)| !source.is_unpatched())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Per-oscillator pitch CV; any oscillator may be left out
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PitchPatch {
    pub sine: CvSource,
    pub saw: CvSource,
    pub triangle: CvSource,
    pub square: CvSource,
}
