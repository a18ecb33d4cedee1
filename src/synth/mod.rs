//! The Hutara voice
//!
//! Four phase-accumulating oscillators, per-oscillator waveshaping and one of
//! two secondary stages, evaluated one sample at a time.

mod fault;
mod fold;
mod frame;
mod lfo;
mod mixer;
mod oscillator;
mod pitch;
mod psychedelic;
mod resampler;
mod secondary;
mod voice;
mod waveshaper;

pub use fault::EngineFault;
pub use fold::{wavefold, Wavefolder};
pub use frame::{ControlFrame, Inputs, OscillatorKind, Params, PerOscillator};
pub use lfo::{Lfo, LfoConfig, LfoShape};
pub use mixer::{OutputFrame, OutputLine, OUTPUT_GAIN};
pub use oscillator::EngineState;
pub use pitch::FREQ_C4;
pub use psychedelic::TrianglePolarity;
pub use resampler::{resample, Resampler};
pub use secondary::{SecondaryProcessor, Variant};
pub use voice::{process_sample, Voice};
