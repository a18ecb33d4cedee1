//! Windowed-sinc resampler
//!
//! Reads an eight-sample alternating reference wave at a position picked by
//! the input value and the resample CV, reconstructing it with a 9-tap
//! windowed sinc. Taps that fall outside the reference are skipped, not
//! zero-padded, and the sum starts from a fixed bias.

use std::f32::consts::PI;

use super::frame::{ControlFrame, OscillatorKind, PerOscillator};
use super::mixer;
use super::psychedelic::TrianglePolarity;
use super::secondary::{SecondaryProcessor, Variant};

/// Length of the reference waveform
pub const REFERENCE_LEN: usize = 8;

/// Taps on each side of the read position
pub const HALF_TAPS: i32 = 4;

/// Starting value of the interpolation sum
pub const BIAS: f32 = 0.4;

/// Phase below which the resampler input reads -1
pub const INPUT_THRESHOLD: f32 = 0.5;

/// `+1, -1, +1, ...`
#[inline]
pub fn reference_waveform() -> [f32; REFERENCE_LEN] {
    let mut wave = [0.0; REFERENCE_LEN];
    for (i, sample) in wave.iter_mut().enumerate() {
        *sample = if i % 2 == 0 { 1.0 } else { -1.0 };
    }
    wave
}

/// Normalized sinc, exactly 1 at zero
#[inline]
pub fn sinc(t: f32) -> f32 {
    if t == 0.0 {
        return 1.0;
    }
    let x = PI * t;
    x.sin() / x
}

/// Window weight for tap offset `i`
#[inline]
pub fn window(i: i32) -> f32 {
    0.54 - 0.46 * (2.0 * PI * i as f32 / 8.0).cos()
}

/// Read position into the reference for input `x` at resample CV `cv`
#[inline]
pub fn read_index(x: f32, cv: f32) -> f32 {
    let rate = 0.5 + cv;
    (x + 1.0) * 0.5 * (REFERENCE_LEN - 1) as f32 * rate
}

/// Resample the reference at the position picked by `x` and `cv`
pub fn resample(x: f32, cv: f32) -> f32 {
    let wave = reference_waveform();
    let index = read_index(x, cv);
    let base = index.floor();
    let frac = index - base;
    let i0 = base as i32;

    let mut value = BIAS;
    for i in -HALF_TAPS..=HALF_TAPS {
        let idx = i0.saturating_add(i);
        if idx < 0 || idx >= REFERENCE_LEN as i32 {
            continue;
        }
        let weight = sinc(i as f32 - frac) * window(i);
        value += weight * wave[idx as usize];
    }
    value
}

/// Resampler input for one oscillator phase
#[inline]
pub fn input_from_phase(phase: f32) -> f32 {
    if phase < INPUT_THRESHOLD {
        -1.0
    } else {
        1.0
    }
}

/// Resample factor for this frame, the product of CV and knob
#[inline]
pub fn factor(frame: &ControlFrame) -> f32 {
    frame.inputs.resample * frame.params.resample
}

/// Multiplies the additive mix by the volume-weighted resampled squares
#[derive(Debug, Clone, Copy, Default)]
pub struct Resampler;

impl Resampler {
    pub fn new() -> Self {
        Self
    }
}

impl SecondaryProcessor for Resampler {
    fn variant(&self) -> Variant {
        Variant::Resample
    }

    fn triangle_polarity(&self) -> TrianglePolarity {
        TrianglePolarity::Inverted
    }

    fn square_phase(&self, before: f32, _after: f32) -> f32 {
        before
    }

    fn shape_square(&self, square: f32, _phase: f32, _frame: &ControlFrame) -> f32 {
        square
    }

    fn mix(&self, lines: &PerOscillator<f32>, phases: &PerOscillator<f32>, frame: &ControlFrame) -> f32 {
        let factor = factor(frame);
        let volume = &frame.params.volume;

        let resampled: f32 = OscillatorKind::MIX_ORDER
            .iter()
            .map(|&kind| resample(input_from_phase(phases[kind]), factor) * volume[kind])
            .sum();

        mixer::resampled_product(lines, resampled, factor)
    }
}
