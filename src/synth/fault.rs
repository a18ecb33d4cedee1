//! Per-sample fault descriptor

use thiserror::Error;

/// Why a sample could not be produced.
///
/// A faulted sample leaves the caller's output frame and the voice's phase
/// state exactly as they were before the call.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EngineFault {
    #[error("sample time must be finite and positive, got {0}")]
    InvalidSampleTime(f32),

    #[error("{0} phase is not finite")]
    NonFinitePhase(&'static str),

    #[error("{line} output is not finite ({value})")]
    NonFinite { line: &'static str, value: f32 },
}
