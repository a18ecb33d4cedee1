//! Digital wavefolder
//!
//! The input is pushed around by a sine of itself, then reflected once about
//! the threshold it crossed. A value that still lies outside the window after
//! that single reflection is left where it is.

use std::f32::consts::PI;

use super::frame::{ControlFrame, PerOscillator};
use super::mixer;
use super::psychedelic::TrianglePolarity;
use super::secondary::{SecondaryProcessor, Variant};

/// Fold `x` against `threshold` with sine modulation
#[inline]
pub fn wavefold(x: f32, threshold: f32, modulation: f32) -> f32 {
    let folded = x + modulation * (2.0 * PI * x).sin();

    if folded > threshold {
        threshold - (folded - threshold)
    } else if folded < -threshold {
        -threshold - (folded + threshold)
    } else {
        folded
    }
}

/// Fold threshold for this frame.
///
/// The knob is added twice: once directly and once inside its own CV term.
#[inline]
pub fn threshold(frame: &ControlFrame) -> f32 {
    let amount = frame.params.wavefold;
    amount + (amount + frame.inputs.wavefold * amount)
}

/// Folds the square line; the final output is the plain sum of all lines
#[derive(Debug, Clone, Copy, Default)]
pub struct Wavefolder;

impl Wavefolder {
    pub fn new() -> Self {
        Self
    }
}

impl SecondaryProcessor for Wavefolder {
    fn variant(&self) -> Variant {
        Variant::Wavefold
    }

    fn triangle_polarity(&self) -> TrianglePolarity {
        TrianglePolarity::Normal
    }

    fn square_phase(&self, _before: f32, after: f32) -> f32 {
        after
    }

    fn shape_square(&self, square: f32, phase: f32, frame: &ControlFrame) -> f32 {
        let modulation = (2.0 * PI * phase).sin();
        wavefold(square, threshold(frame), modulation)
    }

    fn mix(&self, lines: &PerOscillator<f32>, _phases: &PerOscillator<f32>, _frame: &ControlFrame) -> f32 {
        mixer::additive(lines)
    }
}
