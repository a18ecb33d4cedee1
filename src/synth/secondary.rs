//! Secondary processing stage
//!
//! The two variants of the voice share the oscillators and waveshapers and
//! differ only here: the wavefolder reshapes the square line and sums the
//! lines, the resampler leaves the square alone and multiplies the summed
//! lines by a resampled reference.

use serde::{Deserialize, Serialize};

use super::fold::Wavefolder;
use super::frame::{ControlFrame, PerOscillator};
use super::psychedelic::TrianglePolarity;
use super::resampler::Resampler;

/// Trait for the variant-specific stage of the voice.
///
/// Implementations run on the audio thread once per sample and must not
/// allocate, block or lock.
pub trait SecondaryProcessor: Send + Sync {
    /// Which variant this is
    fn variant(&self) -> Variant;

    /// Sign of the shared psychedelic CV on the triangle
    fn triangle_polarity(&self) -> TrianglePolarity;

    /// Phase the raw square is read at, given the phase before and after
    /// this sample's advance
    fn square_phase(&self, before: f32, after: f32) -> f32;

    /// Final shape of the raw square, given the advanced square phase
    fn shape_square(&self, square: f32, phase: f32, frame: &ControlFrame) -> f32;

    /// Combine the four output lines into the final output
    fn mix(&self, lines: &PerOscillator<f32>, phases: &PerOscillator<f32>, frame: &ControlFrame) -> f32;
}

/// Voice variant, picked once when the voice is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Wavefolded square, additive mix
    #[default]
    Wavefold,
    /// Windowed-sinc resampler, multiplicative mix
    Resample,
}

impl Variant {
    /// Build the processor for this variant
    pub fn processor(self) -> Box<dyn SecondaryProcessor> {
        match self {
            Variant::Wavefold => Box::new(Wavefolder::new()),
            Variant::Resample => Box::new(Resampler::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Wavefold => "wavefold",
            Variant::Resample => "resample",
        }
    }
}
