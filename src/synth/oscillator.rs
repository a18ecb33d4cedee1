//! Phase accumulator bank
//!
//! Each oscillator keeps a phase in [0, 1) that advances by
//! `frequency * sample_time` per sample and wraps with a single subtraction.
//! When one step exceeds a full cycle the phase stays at or above 1.0 after
//! the wrap; nothing folds it back with a modulo.

use super::frame::{OscillatorKind, PerOscillator};

/// Advance one phase by one sample
#[inline]
pub fn advance(phase: f32, frequency: f32, sample_time: f32) -> f32 {
    let mut next = phase + frequency * sample_time;
    if next >= 1.0 {
        next -= 1.0;
    }
    next
}

/// Phase state of one voice, owned exclusively by that voice
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineState {
    phases: PerOscillator<f32>,
}

impl EngineState {
    /// All phases at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from explicit phases
    pub fn with_phases(phases: PerOscillator<f32>) -> Self {
        Self { phases }
    }

    /// Current phase of one oscillator
    pub fn phase(&self, kind: OscillatorKind) -> f32 {
        self.phases[kind]
    }

    /// All current phases
    pub fn phases(&self) -> &PerOscillator<f32> {
        &self.phases
    }

    /// The state one sample later, leaving `self` untouched
    pub fn advanced(&self, frequencies: &PerOscillator<f32>, sample_time: f32) -> Self {
        Self {
            phases: PerOscillator::from_fn(|kind| {
                advance(self.phases[kind], frequencies[kind], sample_time)
            }),
        }
    }

    /// Reset every phase to zero
    pub fn reset(&mut self) {
        self.phases = PerOscillator::splat(0.0);
    }
}
