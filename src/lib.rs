//! Hutara - cross-modulated four-oscillator CV voice
//!
//! Four phase-accumulating oscillators with per-oscillator waveshaping,
//! shared FM and psychedelic CV, and either a wavefolder or a windowed-sinc
//! resampler on the way out. Everything runs one sample at a time.

pub mod config;
pub mod synth;
pub mod engine;

pub use config::Patch;
pub use engine::Engine;
