//! Output mixer
//!
//! Scales each shaped oscillator to volts and combines the lines. Nothing is
//! clamped: the final output can leave the nominal +/-5 V or +/-10 V range.

use serde::Serialize;

use super::frame::{OscillatorKind, PerOscillator};

/// Volts per unit of shaped signal
pub const OUTPUT_GAIN: f32 = 5.0;

/// Gain applied to the resampled product
pub const RESAMPLE_GAIN: f32 = 5.0;

/// Voltages written by one sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OutputFrame {
    /// Per-oscillator output lines
    pub lines: PerOscillator<f32>,
    /// Final combined output
    pub mix: f32,
}

impl OutputFrame {
    /// Voltage on one of the five outputs
    pub fn line(&self, line: OutputLine) -> f32 {
        match line {
            OutputLine::Oscillator(kind) => self.lines[kind],
            OutputLine::Mix => self.mix,
        }
    }

    /// First non-finite voltage, if any
    pub fn first_non_finite(&self) -> Option<(OutputLine, f32)> {
        OutputLine::ALL
            .into_iter()
            .map(|line| (line, self.line(line)))
            .find(|(_, value)| !value.is_finite())
    }
}

/// One of the five output lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLine {
    Oscillator(OscillatorKind),
    Mix,
}

impl OutputLine {
    pub const ALL: [OutputLine; 5] = [
        OutputLine::Oscillator(OscillatorKind::Sine),
        OutputLine::Oscillator(OscillatorKind::Saw),
        OutputLine::Oscillator(OscillatorKind::Triangle),
        OutputLine::Oscillator(OscillatorKind::Square),
        OutputLine::Mix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputLine::Oscillator(kind) => kind.name(),
            OutputLine::Mix => "mix",
        }
    }

    /// Parse a line name as used on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        OutputLine::ALL.into_iter().find(|line| line.name() == name)
    }
}

/// Voltage of one oscillator line
#[inline]
pub fn line(volume: f32, shaped: f32) -> f32 {
    OUTPUT_GAIN * volume * shaped
}

/// Plain sum of the four lines
#[inline]
pub fn additive(lines: &PerOscillator<f32>) -> f32 {
    OscillatorKind::MIX_ORDER
        .iter()
        .fold(0.0, |sum, &kind| sum + lines[kind])
}

/// Additive mix multiplied by the resampled sum and the resample factor
#[inline]
pub fn resampled_product(lines: &PerOscillator<f32>, resampled: f32, factor: f32) -> f32 {
    RESAMPLE_GAIN * additive(lines) * resampled * factor
}
