//! Pitch and FM resolution
//!
//! All four oscillators follow the same 1V/oct law referenced to C4:
//!
//! ```text
//! freq = FREQ_C4 * 2^(pitch + pitch_cv + pitch_all + fm_depth * fm_input)
//! ```
//!
//! The exponent is not clamped. Extreme CV can push the frequency far above
//! the sample rate or down to zero.

use super::frame::{ControlFrame, PerOscillator};

/// Frequency of C4 in Hz
pub const FREQ_C4: f32 = 261.6256;

/// Shared FM depth.
///
/// The FM amount CV is attenuverted by the FM amount knob before being
/// multiplied by the knob a second time, so the knob acts quadratically on
/// the CV.
#[inline]
pub fn fm_depth(fm: f32, fm_amount: f32, fm_amount_cv: f32) -> f32 {
    fm + fm_amount * (fm_amount_cv * fm_amount)
}

/// Frequency in Hz for one oscillator
#[inline]
pub fn frequency(pitch: f32, pitch_cv: f32, pitch_all: f32, fm_depth: f32, fm_input: f32) -> f32 {
    FREQ_C4 * (pitch + pitch_cv + pitch_all + fm_depth * fm_input).exp2()
}

/// Frequencies of all four oscillators for this frame
pub fn resolve(frame: &ControlFrame) -> PerOscillator<f32> {
    let params = &frame.params;
    let inputs = &frame.inputs;
    let depth = fm_depth(params.fm, params.fm_amount, inputs.fm_amount);

    PerOscillator::from_fn(|kind| {
        frequency(
            params.pitch[kind],
            inputs.pitch[kind],
            inputs.pitch_all,
            depth,
            inputs.fm,
        )
    })
}
