//! Psychedelic CV resolution
//!
//! Turns shaping knobs, per-oscillator CVs and the shared psychedelic CV into
//! the blend amount each waveshaper receives. The composition is different
//! for each oscillator:
//!
//! ```text
//! sine     = sine_shape + all * sine_shape * knob
//! saw      = saw_shape + saw_cv + all * knob
//! triangle = triangle_shape + triangle_cv +/- all * knob
//! ```
//!
//! The square has no shaping amount.

use super::frame::ControlFrame;

/// Sign of the shared CV on the triangle path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrianglePolarity {
    #[default]
    Normal,
    Inverted,
}

/// Blend amounts for one sample
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeAmounts {
    pub sine: f32,
    pub saw: f32,
    pub triangle: f32,
}

/// Resolve all shaping amounts for this frame
pub fn resolve(frame: &ControlFrame, polarity: TrianglePolarity) -> ShapeAmounts {
    let params = &frame.params;
    let inputs = &frame.inputs;
    let knob = params.psychedelic_knob;
    let all = inputs.psychedelic_all;

    let triangle_all = match polarity {
        TrianglePolarity::Normal => all,
        TrianglePolarity::Inverted => -all,
    };

    ShapeAmounts {
        sine: params.sine_shape + all * params.sine_shape * knob,
        saw: params.saw_shape + inputs.saw_psychedelic + all * knob,
        triangle: params.triangle_shape + inputs.triangle_psychedelic + triangle_all * knob,
    }
}
