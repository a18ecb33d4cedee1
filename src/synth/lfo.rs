//! Low Frequency Oscillator for CV
//!
//! Stands in for a patch cable: produces a voltage that swings around an
//! offset, sampled once per audio sample.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// LFO waveform shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LfoShape {
    #[default]
    Sine,
    Triangle,
    Saw,
    Square,
    SampleAndHold,
}

/// LFO settings as written in a patch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LfoConfig {
    pub shape: LfoShape,
    /// Frequency in Hz
    pub frequency: f32,
    /// Peak swing in volts
    pub amplitude: f32,
    /// Centre voltage
    pub offset: f32,
}

impl Default for LfoConfig {
    fn default() -> Self {
        Self {
            shape: LfoShape::Sine,
            frequency: 0.5,
            amplitude: 1.0,
            offset: 0.0,
        }
    }
}

/// Low Frequency Oscillator
#[derive(Debug, Clone)]
pub struct Lfo {
    config: LfoConfig,
    phase: f32,
    sample_rate: f32,
    /// Last sample-and-hold value
    sh_value: f32,
    /// RNG state for S&H
    rng_state: u64,
}

impl Lfo {
    /// Create an LFO running at `sample_rate`
    pub fn new(config: LfoConfig, sample_rate: f32) -> Self {
        let mut lfo = Self {
            config,
            phase: 0.0,
            sample_rate,
            sh_value: 0.0,
            rng_state: 12345,
        };
        lfo.set_frequency(config.frequency);
        lfo
    }

    /// Set LFO frequency in Hz
    pub fn set_frequency(&mut self, hz: f32) {
        self.config.frequency = hz.clamp(0.01, 100.0);
    }

    pub fn frequency(&self) -> f32 {
        self.config.frequency
    }

    /// Reset phase
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Next voltage, `offset +/- amplitude`
    pub fn process(&mut self) -> f32 {
        let increment = self.config.frequency / self.sample_rate;
        let raw = match self.config.shape {
            LfoShape::Sine => (self.phase * 2.0 * PI).sin(),
            LfoShape::Triangle => {
                if self.phase < 0.25 {
                    4.0 * self.phase
                } else if self.phase < 0.75 {
                    2.0 - 4.0 * self.phase
                } else {
                    4.0 * self.phase - 4.0
                }
            }
            LfoShape::Saw => 2.0 * self.phase - 1.0,
            LfoShape::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoShape::SampleAndHold => {
                // New value on each wrap
                if self.phase < increment {
                    self.sh_value = self.random();
                }
                self.sh_value
            }
        };

        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        self.config.offset + raw * self.config.amplitude
    }

    /// xorshift for sample-and-hold, in -1..=1
    fn random(&mut self) -> f32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        ((x as f64 / u64::MAX as f64) * 2.0 - 1.0) as f32
    }
}
