//! CV sources
//!
//! Each voice input is fed by a constant voltage or an LFO. The bank
//! evaluates every source once per sample.

use serde::{Deserialize, Serialize};

use crate::config::InputPatch;
use crate::synth::{Inputs, Lfo, LfoConfig, OscillatorKind, PerOscillator};

/// Where an input's voltage comes from.
///
/// In a patch a bare number is a constant, `{ lfo: { ... } }` is an LFO.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CvSource {
    Constant(f32),
    Lfo { lfo: LfoConfig },
}

impl Default for CvSource {
    fn default() -> Self {
        CvSource::Constant(0.0)
    }
}

impl CvSource {
    /// Whether the source leaves its input unpatched
    pub fn is_unpatched(&self) -> bool {
        matches!(self, CvSource::Constant(v) if *v == 0.0)
    }
}

/// A running CV source
#[derive(Debug, Clone)]
enum Cv {
    Constant(f32),
    Lfo(Lfo),
}

impl Cv {
    fn new(source: &CvSource, sample_rate: f32) -> Self {
        match source {
            CvSource::Constant(volts) => Cv::Constant(*volts),
            CvSource::Lfo { lfo } => Cv::Lfo(Lfo::new(*lfo, sample_rate)),
        }
    }

    #[inline]
    fn next(&mut self) -> f32 {
        match self {
            Cv::Constant(volts) => *volts,
            Cv::Lfo(lfo) => lfo.process(),
        }
    }

    fn reset(&mut self) {
        if let Cv::Lfo(lfo) = self {
            lfo.reset();
        }
    }
}

/// Every input's source, sampled together
#[derive(Debug, Clone)]
pub struct CvBank {
    pitch: PerOscillator<Cv>,
    pitch_all: Cv,
    fm: Cv,
    fm_amount: Cv,
    psychedelic_all: Cv,
    saw_psychedelic: Cv,
    triangle_psychedelic: Cv,
    wavefold: Cv,
    resample: Cv,
}

impl CvBank {
    /// Build the bank for a patch's inputs at `sample_rate`
    pub fn new(patch: &InputPatch, sample_rate: f32) -> Self {
        let cv = |source: &CvSource| Cv::new(source, sample_rate);
        Self {
            pitch: PerOscillator {
                sine: cv(&patch.pitch.sine),
                saw: cv(&patch.pitch.saw),
                triangle: cv(&patch.pitch.triangle),
                square: cv(&patch.pitch.square),
            },
            pitch_all: cv(&patch.pitch_all),
            fm: cv(&patch.fm),
            fm_amount: cv(&patch.fm_amount),
            psychedelic_all: cv(&patch.psychedelic_all),
            saw_psychedelic: cv(&patch.saw_psychedelic),
            triangle_psychedelic: cv(&patch.triangle_psychedelic),
            wavefold: cv(&patch.wavefold),
            resample: cv(&patch.resample),
        }
    }

    /// Input voltages for the next sample
    pub fn next_inputs(&mut self) -> Inputs {
        let mut pitch = PerOscillator::splat(0.0);
        for kind in OscillatorKind::MIX_ORDER {
            pitch[kind] = self.pitch[kind].next();
        }

        Inputs {
            pitch,
            pitch_all: self.pitch_all.next(),
            fm: self.fm.next(),
            fm_amount: self.fm_amount.next(),
            psychedelic_all: self.psychedelic_all.next(),
            saw_psychedelic: self.saw_psychedelic.next(),
            triangle_psychedelic: self.triangle_psychedelic.next(),
            wavefold: self.wavefold.next(),
            resample: self.resample.next(),
        }
    }

    /// Restart every LFO from phase zero
    pub fn reset(&mut self) {
        for kind in OscillatorKind::MIX_ORDER {
            self.pitch[kind].reset();
        }
        for cv in [
            &mut self.pitch_all,
            &mut self.fm,
            &mut self.fm_amount,
            &mut self.psychedelic_all,
            &mut self.saw_psychedelic,
            &mut self.triangle_psychedelic,
            &mut self.wavefold,
            &mut self.resample,
        ] {
            cv.reset();
        }
    }
}
