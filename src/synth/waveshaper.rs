//! Raw waveforms and the shaping blend
//!
//! Every function here is pure and takes a phase in [0, 1) or a raw sample.
//! Shaping blends a raw value toward a harmonically richer target:
//!
//! ```text
//! shaped = r                          if a == 0.0
//! shaped = (1 - a) * r + a * target   otherwise
//! ```
//!
//! The bypass compares against exactly zero. A tiny non-zero amount still
//! goes through the blend.

use std::f32::consts::PI;

/// Triangle from phase, 1.0 at phase 0 and -1.0 at phase 0.5
#[inline]
pub fn triangle(phase: f32) -> f32 {
    2.0 * ((2.0 * phase - 1.0).abs() - 0.5)
}

/// Sine from phase
#[inline]
pub fn sine(phase: f32) -> f32 {
    (2.0 * PI * phase).sin()
}

/// Rising ramp in [0, 2), not centred on zero
#[inline]
pub fn saw(phase: f32) -> f32 {
    2.0 * (phase - phase.floor())
}

/// Square, low for the first half of the cycle
#[inline]
pub fn square(phase: f32) -> f32 {
    if phase < 0.5 {
        -1.0
    } else {
        1.0
    }
}

/// Fold target shared by sine and triangle
#[inline]
pub fn fold_target(raw: f32) -> f32 {
    0.5 * ((3.0 * PI * raw).sin() + (5.0 * PI * raw).cos())
}

/// Harmonic shaper for the saw
#[inline]
pub fn saw_shaper(raw: f32) -> f32 {
    0.8 * ((4.0 * PI * raw).sin() + (6.0 * PI * raw).cos())
}

/// Linear blend with an exact bypass at `amount == 0.0`
#[inline]
pub fn blend(raw: f32, amount: f32, target: impl FnOnce(f32) -> f32) -> f32 {
    if amount == 0.0 {
        return raw;
    }
    (1.0 - amount) * raw + amount * target(raw)
}

#[inline]
pub fn shape_sine(raw: f32, amount: f32) -> f32 {
    blend(raw, amount, fold_target)
}

#[inline]
pub fn shape_triangle(raw: f32, amount: f32) -> f32 {
    blend(raw, amount, fold_target)
}

#[inline]
pub fn shape_saw(raw: f32, amount: f32) -> f32 {
    blend(raw, amount, |r| 0.5 * saw_shaper(r))
}
