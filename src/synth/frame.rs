//! Per-sample control snapshot
//!
//! A `ControlFrame` holds every knob value and every input voltage the voice
//! reads during one sample. The host builds it, the voice only borrows it.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// The four oscillators of the voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorKind {
    Sine,
    Saw,
    Triangle,
    Square,
}

impl OscillatorKind {
    /// All oscillators, in the order their output lines are summed
    pub const MIX_ORDER: [OscillatorKind; 4] = [
        OscillatorKind::Triangle,
        OscillatorKind::Sine,
        OscillatorKind::Saw,
        OscillatorKind::Square,
    ];

    /// Lower-case name, as used in patch files and logs
    pub fn name(self) -> &'static str {
        match self {
            OscillatorKind::Sine => "sine",
            OscillatorKind::Saw => "saw",
            OscillatorKind::Triangle => "triangle",
            OscillatorKind::Square => "square",
        }
    }
}

/// One value per oscillator
///
/// In patch files all four entries must be given; a partial map is rejected
/// rather than silently filled with zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerOscillator<T> {
    pub sine: T,
    pub saw: T,
    pub triangle: T,
    pub square: T,
}

impl<T: Copy> PerOscillator<T> {
    /// Same value for every oscillator
    pub fn splat(value: T) -> Self {
        Self {
            sine: value,
            saw: value,
            triangle: value,
            square: value,
        }
    }

    /// Build from a function of the oscillator kind
    pub fn from_fn(mut f: impl FnMut(OscillatorKind) -> T) -> Self {
        Self {
            sine: f(OscillatorKind::Sine),
            saw: f(OscillatorKind::Saw),
            triangle: f(OscillatorKind::Triangle),
            square: f(OscillatorKind::Square),
        }
    }
}

impl<T> Index<OscillatorKind> for PerOscillator<T> {
    type Output = T;

    fn index(&self, kind: OscillatorKind) -> &T {
        match kind {
            OscillatorKind::Sine => &self.sine,
            OscillatorKind::Saw => &self.saw,
            OscillatorKind::Triangle => &self.triangle,
            OscillatorKind::Square => &self.square,
        }
    }
}

impl<T> IndexMut<OscillatorKind> for PerOscillator<T> {
    fn index_mut(&mut self, kind: OscillatorKind) -> &mut T {
        match kind {
            OscillatorKind::Sine => &mut self.sine,
            OscillatorKind::Saw => &mut self.saw,
            OscillatorKind::Triangle => &mut self.triangle,
            OscillatorKind::Square => &mut self.square,
        }
    }
}

/// Knob values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Pitch offset in octaves (-4..4)
    pub pitch: PerOscillator<f32>,
    /// Output level (0..1)
    pub volume: PerOscillator<f32>,
    /// FM depth (-0.7..1.23)
    pub fm: f32,
    /// FM amount, also attenuverts the FM amount CV (-0.5..0.6)
    pub fm_amount: f32,
    /// Sine shaping amount (-0.5..1.5)
    pub sine_shape: f32,
    /// Saw shaping amount (-0.5..1)
    pub saw_shape: f32,
    /// Triangle shaping amount (-0.5..1)
    pub triangle_shape: f32,
    /// Attenuverter for the shared psychedelic CV (-0.5..1)
    pub psychedelic_knob: f32,
    /// Wavefold amount (0..1)
    pub wavefold: f32,
    /// Resample amount (0..0.8)
    pub resample: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            pitch: PerOscillator::splat(0.0),
            volume: PerOscillator::splat(1.0),
            fm: 0.0,
            fm_amount: 0.0,
            sine_shape: 0.0,
            saw_shape: 0.0,
            triangle_shape: 0.0,
            psychedelic_knob: 0.0,
            wavefold: 0.5,
            resample: 0.8,
        }
    }
}

impl Params {
    /// Documented knob ranges, as `(name, value, min, max)`
    pub fn ranges(&self) -> [(&'static str, f32, f32, f32); 16] {
        [
            ("pitch.sine", self.pitch.sine, -4.0, 4.0),
            ("pitch.saw", self.pitch.saw, -4.0, 4.0),
            ("pitch.triangle", self.pitch.triangle, -4.0, 4.0),
            ("pitch.square", self.pitch.square, -4.0, 4.0),
            ("volume.sine", self.volume.sine, 0.0, 1.0),
            ("volume.saw", self.volume.saw, 0.0, 1.0),
            ("volume.triangle", self.volume.triangle, 0.0, 1.0),
            ("volume.square", self.volume.square, 0.0, 1.0),
            ("fm", self.fm, -0.7, 1.23),
            ("fm_amount", self.fm_amount, -0.5, 0.6),
            ("sine_shape", self.sine_shape, -0.5, 1.5),
            ("saw_shape", self.saw_shape, -0.5, 1.0),
            ("triangle_shape", self.triangle_shape, -0.5, 1.0),
            ("psychedelic_knob", self.psychedelic_knob, -0.5, 1.0),
            ("wavefold", self.wavefold, 0.0, 1.0),
            ("resample", self.resample, 0.0, 0.8),
        ]
    }
}

/// Input voltages (1.0 = 1 V), all zero when unpatched
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Inputs {
    /// Per-oscillator pitch CV, 1V/oct
    pub pitch: PerOscillator<f32>,
    /// Pitch CV added to every oscillator, 1V/oct
    pub pitch_all: f32,
    /// Shared FM input
    pub fm: f32,
    /// FM amount CV
    pub fm_amount: f32,
    /// Shared psychedelic CV
    pub psychedelic_all: f32,
    pub saw_psychedelic: f32,
    pub triangle_psychedelic: f32,
    /// Wavefold amount CV
    pub wavefold: f32,
    /// Resample CV
    pub resample: f32,
}

/// Everything the voice reads during one sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlFrame {
    pub params: Params,
    pub inputs: Inputs,
}
