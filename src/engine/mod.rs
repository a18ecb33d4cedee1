//! Host runtime for the voice
//!
//! Feeds the voice a control frame each sample and keeps the last good
//! output frame for when a sample faults.

mod cv;
mod player;
mod recorder;

pub use cv::{CvBank, CvSource};
pub use player::{default_device_name, Player};
pub use recorder::Recorder;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::Patch;
use crate::synth::{ControlFrame, OutputFrame, Params, Variant, Voice};

/// The voice plus everything plugged into it
pub struct Engine {
    voice: Voice,
    params: Params,
    cv: CvBank,
    sample_rate: u32,
    sample_time: f32,
    /// Last good output, held through faults
    last: OutputFrame,
    /// Faulted samples so far, readable from other threads
    faults: Arc<AtomicU64>,
    /// Length of the current run of faulted samples
    fault_run: u64,
    log_faults: bool,
}

impl Engine {
    /// Create an engine for the given patch at the patch's sample rate
    pub fn new(patch: &Patch) -> Self {
        Self::with_sample_rate(patch, patch.audio.sample_rate)
    }

    /// Create an engine for the given patch running at `sample_rate`
    pub fn with_sample_rate(patch: &Patch, sample_rate: u32) -> Self {
        Self {
            voice: Voice::new(patch.variant),
            params: patch.params,
            cv: CvBank::new(&patch.inputs, sample_rate as f32),
            sample_rate,
            sample_time: 1.0 / sample_rate as f32,
            last: OutputFrame::default(),
            faults: Arc::new(AtomicU64::new(0)),
            fault_run: 0,
            log_faults: true,
        }
    }

    /// Stop logging faults from `process`, for engines running on the audio
    /// thread. Faults are still counted.
    pub fn without_fault_logging(mut self) -> Self {
        self.log_faults = false;
        self
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn variant(&self) -> Variant {
        self.voice.variant()
    }

    /// Number of samples that faulted so far
    pub fn fault_count(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }

    /// Shared fault counter, readable after the engine has moved elsewhere
    pub fn fault_counter(&self) -> Arc<AtomicU64> {
        self.faults.clone()
    }

    /// Most recent good output
    pub fn last_frame(&self) -> &OutputFrame {
        &self.last
    }

    /// Generate the next output frame.
    ///
    /// A faulted sample returns the previous frame again.
    pub fn process(&mut self) -> OutputFrame {
        let frame = ControlFrame {
            params: self.params,
            inputs: self.cv.next_inputs(),
        };

        match self.voice.process(&frame, self.sample_time, &mut self.last) {
            Ok(()) => {
                if self.fault_run > 0 {
                    if self.log_faults {
                        tracing::info!("Voice recovered after {} faulted samples", self.fault_run);
                    }
                    self.fault_run = 0;
                }
            }
            Err(fault) => {
                self.faults.fetch_add(1, Ordering::Relaxed);
                if self.fault_run == 0 && self.log_faults {
                    tracing::warn!("Holding previous output: {}", fault);
                }
                self.fault_run += 1;
            }
        }

        self.last
    }

    /// Fill a buffer with frames
    pub fn fill_buffer(&mut self, buffer: &mut [OutputFrame]) {
        for frame in buffer.iter_mut() {
            *frame = self.process();
        }
    }

    /// Reset phases, LFOs and the held frame
    pub fn reset(&mut self) {
        self.voice.reset();
        self.cv.reset();
        self.last = OutputFrame::default();
        self.fault_run = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{LfoConfig, LfoShape};

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new(&Patch::default());

        assert_eq!(engine.sample_rate(), 44100);
        assert_eq!(engine.variant(), Variant::Wavefold);
        assert_eq!(engine.fault_count(), 0);
    }

    #[test]
    fn test_engine_at_device_rate() {
        use crate::synth::{OscillatorKind, FREQ_C4};

        let patch = Patch::default();
        let mut engine = Engine::with_sample_rate(&patch, 48000);
        assert_eq!(engine.sample_rate(), 48000);

        // Plain saw reads 2 * phase, so one step at C4 shows the increment
        let phase = FREQ_C4 * (1.0 / 48000.0);
        let frame = engine.process();
        assert!((frame.lines.saw - 5.0 * 2.0 * phase).abs() < 1e-6);
        assert!((engine.voice.state().phase(OscillatorKind::Sine) - phase).abs() < 1e-9);

        // The patch's own rate gives a different step
        let mut at_patch_rate = Engine::new(&patch);
        assert!(at_patch_rate.process().lines.saw > frame.lines.saw);
    }

    #[test]
    fn test_engine_produces_audio() {
        let mut engine = Engine::new(&Patch::default());

        let mut max_mix = 0.0f32;
        for _ in 0..1000 {
            let frame = engine.process();
            assert!(frame.first_non_finite().is_none());
            max_mix = max_mix.max(frame.mix.abs());
        }
        assert!(max_mix > 0.0, "Expected non-zero output");
        assert_eq!(engine.fault_count(), 0);
    }

    #[test]
    fn test_engine_fill_buffer() {
        let mut engine = Engine::new(&Patch::default());

        let mut buffer = vec![OutputFrame::default(); 512];
        engine.fill_buffer(&mut buffer);

        assert!(buffer.iter().any(|f| f.lines.sine.abs() > 0.0));
        assert_eq!(engine.last_frame(), &buffer[511]);
    }

    #[test]
    fn test_engine_holds_frame_through_faults() {
        let mut patch = Patch::default();
        // Square wave between -400 and +400 V/oct: every other half-cycle
        // overflows the pitch
        patch.inputs.pitch_all = CvSource::Lfo {
            lfo: LfoConfig {
                shape: LfoShape::Square,
                frequency: 100.0,
                amplitude: 400.0,
                offset: 0.0,
            },
        };
        let mut engine = Engine::new(&patch).without_fault_logging();
        let counter = engine.fault_counter();

        // First half-cycle at +400 V: pitch overflows, output stays silent
        for _ in 0..221 {
            assert_eq!(engine.process(), OutputFrame::default());
        }
        assert_eq!(engine.fault_count(), 221);
        assert_eq!(counter.load(Ordering::Relaxed), 221);

        // -400 V: frequency underflows to zero, samples succeed again
        for _ in 0..10 {
            engine.process();
        }
        assert_eq!(engine.fault_count(), 221);
        assert!(engine.last_frame().lines.square != 0.0);
    }

    #[test]
    fn test_lfo_modulates_output() {
        let mut still = Patch::default();
        still.params.sine_shape = 0.5;
        let mut moving = still.clone();
        moving.inputs.psychedelic_all = CvSource::Lfo {
            lfo: LfoConfig {
                shape: LfoShape::Sine,
                frequency: 5.0,
                amplitude: 2.0,
                offset: 1.0,
            },
        };
        moving.params.psychedelic_knob = 1.0;
        still.params.psychedelic_knob = 1.0;

        let mut a = Engine::new(&still);
        let mut b = Engine::new(&moving);
        let differs = (0..200).any(|_| a.process().lines.sine != b.process().lines.sine);
        assert!(differs);
    }

    #[test]
    fn test_engine_reset() {
        let mut engine = Engine::new(&Patch::default());
        let first = engine.process();
        for _ in 0..100 {
            engine.process();
        }
        engine.reset();
        assert_eq!(engine.process(), first);
    }
}
