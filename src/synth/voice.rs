//! The per-sample voice
//!
//! One call resolves pitch, advances the phases, shapes each oscillator, runs
//! the secondary stage and writes five voltages. The work per call is fixed:
//! four phase updates, a handful of transcendental calls and at most four
//! 9-tap sums. Nothing allocates and nothing locks.
//!
//! A call either succeeds and commits both the new phases and the new output
//! frame, or returns an [`EngineFault`] and commits neither. The host decides
//! what to do with the stale frame.

use super::fault::EngineFault;
use super::frame::{ControlFrame, OscillatorKind, PerOscillator};
use super::mixer::{self, OutputFrame};
use super::oscillator::EngineState;
use super::secondary::{SecondaryProcessor, Variant};
use super::{pitch, psychedelic, waveshaper};

/// Produce one sample.
///
/// `state` is only updated when the sample succeeds.
pub fn process_sample(
    state: &mut EngineState,
    processor: &dyn SecondaryProcessor,
    frame: &ControlFrame,
    sample_time: f32,
    out: &mut OutputFrame,
) -> Result<(), EngineFault> {
    if !(sample_time.is_finite() && sample_time > 0.0) {
        return Err(EngineFault::InvalidSampleTime(sample_time));
    }

    let frequencies = pitch::resolve(frame);
    let next = state.advanced(&frequencies, sample_time);
    let phases = *next.phases();

    if let Some(kind) = OscillatorKind::MIX_ORDER
        .into_iter()
        .find(|&kind| !phases[kind].is_finite())
    {
        return Err(EngineFault::NonFinitePhase(kind.name()));
    }

    let amounts = psychedelic::resolve(frame, processor.triangle_polarity());
    let square_phase =
        processor.square_phase(state.phase(OscillatorKind::Square), phases.square);
    let shaped = PerOscillator {
        sine: waveshaper::shape_sine(waveshaper::sine(phases.sine), amounts.sine),
        saw: waveshaper::shape_saw(waveshaper::saw(phases.saw), amounts.saw),
        triangle: waveshaper::shape_triangle(
            waveshaper::triangle(phases.triangle),
            amounts.triangle,
        ),
        square: processor.shape_square(waveshaper::square(square_phase), phases.square, frame),
    };

    let volume = &frame.params.volume;
    let lines = PerOscillator::from_fn(|kind| mixer::line(volume[kind], shaped[kind]));
    let result = OutputFrame {
        lines,
        mix: processor.mix(&lines, &phases, frame),
    };

    if let Some((line, value)) = result.first_non_finite() {
        return Err(EngineFault::NonFinite {
            line: line.name(),
            value,
        });
    }

    *state = next;
    *out = result;
    Ok(())
}

/// A voice: phase state plus the secondary stage picked at construction
pub struct Voice {
    state: EngineState,
    processor: Box<dyn SecondaryProcessor>,
}

impl Voice {
    /// Create a voice of the given variant with all phases at zero
    pub fn new(variant: Variant) -> Self {
        Self::with_processor(variant.processor())
    }

    /// Create a voice around a custom secondary stage
    pub fn with_processor(processor: Box<dyn SecondaryProcessor>) -> Self {
        Self {
            state: EngineState::new(),
            processor,
        }
    }

    /// Replace the phase state
    pub fn with_state(mut self, state: EngineState) -> Self {
        self.state = state;
        self
    }

    pub fn variant(&self) -> Variant {
        self.processor.variant()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Reset all phases to zero
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Produce one sample into `out`
    #[inline]
    pub fn process(
        &mut self,
        frame: &ControlFrame,
        sample_time: f32,
        out: &mut OutputFrame,
    ) -> Result<(), EngineFault> {
        process_sample(&mut self.state, self.processor.as_ref(), frame, sample_time, out)
    }
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("variant", &self.variant())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::pitch::FREQ_C4;
    use crate::synth::resampler;
    use std::f32::consts::PI;

    const SAMPLE_TIME: f32 = 1.0 / 44100.0;

    #[test]
    fn test_first_sample_at_defaults() {
        let mut voice = Voice::new(Variant::Wavefold);
        let mut out = OutputFrame::default();
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();

        let phase = FREQ_C4 * SAMPLE_TIME;
        assert_eq!(voice.state().phase(OscillatorKind::Triangle), phase);

        let expected = 5.0 * waveshaper::triangle(phase);
        assert_eq!(out.lines.triangle, expected);
        assert!(out.lines.triangle != 0.0 && out.lines.triangle < 5.0);
    }

    #[test]
    fn test_zero_sine_shape_gives_plain_sine() {
        let mut voice = Voice::new(Variant::Resample);
        let mut frame = ControlFrame::default();
        frame.params.sine_shape = 0.0;
        frame.params.psychedelic_knob = 0.7;
        frame.params.volume.sine = 0.6;
        frame.inputs.psychedelic_all = 3.0;
        frame.params.pitch.sine = 2.0;

        let mut out = OutputFrame::default();
        for _ in 0..500 {
            voice.process(&frame, SAMPLE_TIME, &mut out).unwrap();
            let phase = voice.state().phase(OscillatorKind::Sine);
            let volume = 0.6;
            assert_eq!(out.lines.sine, 5.0 * volume * (2.0 * PI * phase).sin());
        }
    }

    #[test]
    fn test_square_folds_to_zero_at_half_threshold() {
        let mut voice = Voice::new(Variant::Wavefold);
        let mut frame = ControlFrame::default();
        // Threshold 0.25 + (0.25 + 0 * 0.25) = 0.5
        frame.params.wavefold = 0.25;

        let mut out = OutputFrame::default();
        for _ in 0..200 {
            voice.process(&frame, SAMPLE_TIME, &mut out).unwrap();
            assert!(out.lines.square.abs() < 1e-5, "{}", out.lines.square);
        }
    }

    #[test]
    fn test_square_unfolded_below_threshold() {
        let mut voice = Voice::new(Variant::Wavefold);
        let mut out = OutputFrame::default();
        // Default threshold is 1.0, so +/-1 passes through
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();
        assert!((out.lines.square + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_wavefold_mix_is_sum_of_lines() {
        let mut voice = Voice::new(Variant::Wavefold);
        let mut frame = ControlFrame::default();
        frame.params.saw_shape = 0.3;
        frame.params.volume.triangle = 0.5;

        let mut out = OutputFrame::default();
        for _ in 0..100 {
            voice.process(&frame, SAMPLE_TIME, &mut out).unwrap();
            assert_eq!(out.mix, mixer::additive(&out.lines));
        }
    }

    #[test]
    fn test_resample_mix_at_full_rate() {
        let state = EngineState::with_phases(PerOscillator::splat(0.6));
        let mut voice = Voice::new(Variant::Resample).with_state(state);
        let mut frame = ControlFrame::default();
        // factor = 0.625 * 0.8 = 0.5, rate = 1.0, every input reads x = 1
        frame.inputs.resample = 0.625;

        let mut out = OutputFrame::default();
        voice.process(&frame, SAMPLE_TIME, &mut out).unwrap();

        let resampled = 4.0 * resampler::resample(1.0, 0.5);
        assert!((resampled - 1.28).abs() < 1e-4);
        let expected = 5.0 * mixer::additive(&out.lines) * resampled * 0.5;
        assert!((out.mix - expected).abs() < 1e-3 * expected.abs().max(1.0));
    }

    #[test]
    fn test_resample_without_cv_is_silent() {
        let mut voice = Voice::new(Variant::Resample);
        let mut out = OutputFrame::default();
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();
        assert_eq!(out.mix, 0.0);
        // Lines are still written
        assert!(out.lines.triangle != 0.0);
    }

    #[test]
    fn test_resample_passes_square_through() {
        let mut voice = Voice::new(Variant::Resample);
        let mut frame = ControlFrame::default();
        frame.params.wavefold = 0.0;
        let mut out = OutputFrame::default();
        voice.process(&frame, SAMPLE_TIME, &mut out).unwrap();
        assert_eq!(out.lines.square, -5.0);
    }

    #[test]
    fn test_resample_square_reads_phase_before_advance() {
        let state = EngineState::with_phases(PerOscillator::splat(0.499));
        let mut voice = Voice::new(Variant::Resample).with_state(state);
        let mut out = OutputFrame::default();
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();

        assert!(voice.state().phase(OscillatorKind::Square) >= 0.5);
        assert_eq!(out.lines.square, -5.0);

        // The edge shows up one sample later
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();
        assert_eq!(out.lines.square, 5.0);
    }

    #[test]
    fn test_wavefold_square_reads_phase_after_advance() {
        let state = EngineState::with_phases(PerOscillator::splat(0.499));
        let mut voice = Voice::new(Variant::Wavefold).with_state(state);
        let mut out = OutputFrame::default();
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();

        // Default threshold 1.0 leaves +1 in place
        assert!((out.lines.square - 5.0).abs() < 1e-4, "{}", out.lines.square);
    }

    #[test]
    fn test_triangle_polarity_differs_by_variant() {
        let mut frame = ControlFrame::default();
        frame.params.triangle_shape = 0.1;
        frame.params.psychedelic_knob = 0.5;
        frame.inputs.psychedelic_all = 2.0;

        let mut fold_out = OutputFrame::default();
        let mut resample_out = OutputFrame::default();
        Voice::new(Variant::Wavefold)
            .process(&frame, SAMPLE_TIME, &mut fold_out)
            .unwrap();
        Voice::new(Variant::Resample)
            .process(&frame, SAMPLE_TIME, &mut resample_out)
            .unwrap();

        assert_ne!(fold_out.lines.triangle, resample_out.lines.triangle);
        assert_eq!(fold_out.lines.saw, resample_out.lines.saw);
        assert_eq!(fold_out.lines.sine, resample_out.lines.sine);
    }

    #[test]
    fn test_volume_scales_only_own_line() {
        let mut loud = ControlFrame::default();
        loud.params.sine_shape = 0.2;
        let mut quiet = loud;
        quiet.params.volume.saw = 0.0;

        let mut a = OutputFrame::default();
        let mut b = OutputFrame::default();
        Voice::new(Variant::Wavefold).process(&loud, SAMPLE_TIME, &mut a).unwrap();
        Voice::new(Variant::Wavefold).process(&quiet, SAMPLE_TIME, &mut b).unwrap();

        assert_eq!(b.lines.saw, 0.0);
        assert_eq!(a.lines.sine, b.lines.sine);
        assert_eq!(a.lines.triangle, b.lines.triangle);
        assert_eq!(a.lines.square, b.lines.square);
    }

    #[test]
    fn test_invalid_sample_time_faults() {
        let mut voice = Voice::new(Variant::Wavefold);
        let held = OutputFrame {
            lines: PerOscillator::splat(1.25),
            mix: 5.0,
        };

        for sample_time in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mut out = held;
            let result = voice.process(&ControlFrame::default(), sample_time, &mut out);
            assert!(matches!(result, Err(EngineFault::InvalidSampleTime(_))));
            assert_eq!(out, held);
        }
        assert_eq!(voice.state(), &EngineState::new());
    }

    #[test]
    fn test_overflowing_pitch_holds_previous_frame() {
        let mut voice = Voice::new(Variant::Wavefold);
        let mut out = OutputFrame::default();
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();
        let held = out;
        let state = *voice.state();

        let mut frame = ControlFrame::default();
        frame.inputs.pitch_all = 200.0;
        let result = voice.process(&frame, SAMPLE_TIME, &mut out);

        assert!(matches!(result, Err(EngineFault::NonFinitePhase(_))));
        assert_eq!(out, held);
        assert_eq!(voice.state(), &state);

        // The next good frame carries on from the held state
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();
        let expected = 2.0 * FREQ_C4 * SAMPLE_TIME;
        assert!((voice.state().phase(OscillatorKind::Sine) - expected).abs() < 1e-7);
    }

    #[test]
    fn test_overflowing_mix_reports_mix_line() {
        let mut voice = Voice::new(Variant::Resample);
        let mut frame = ControlFrame::default();
        frame.params.volume.square = 0.0;
        frame.params.resample = 1.0;
        frame.inputs.resample = 1.0e38;

        let mut out = OutputFrame::default();
        let result = voice.process(&frame, SAMPLE_TIME, &mut out);
        match result {
            Err(EngineFault::NonFinite { line, .. }) => assert_eq!(line, "mix"),
            other => panic!("expected a mix fault, got {:?}", other),
        }
        assert_eq!(out, OutputFrame::default());
    }

    #[test]
    fn test_pathological_pitch_keeps_phase_above_one() {
        let mut voice = Voice::new(Variant::Wavefold);
        let mut frame = ControlFrame::default();
        // About 2.4 cycles per sample at 44.1 kHz
        frame.inputs.pitch_all = 8.6;

        let mut out = OutputFrame::default();
        voice.process(&frame, SAMPLE_TIME, &mut out).unwrap();
        let phase = voice.state().phase(OscillatorKind::Saw);
        assert!(phase >= 1.0, "phase {}", phase);
        // Saw reads the fractional part, so its line stays in range
        assert!((0.0..10.0).contains(&out.lines.saw));
    }

    #[test]
    fn test_reset_returns_to_phase_zero() {
        let mut voice = Voice::new(Variant::Resample);
        let mut out = OutputFrame::default();
        voice
            .process(&ControlFrame::default(), SAMPLE_TIME, &mut out)
            .unwrap();
        voice.reset();
        assert_eq!(voice.state(), &EngineState::new());
        assert_eq!(voice.variant(), Variant::Resample);
    }
}
