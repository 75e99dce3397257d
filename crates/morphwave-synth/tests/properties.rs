//! Property-based tests for the oscillator's per-sample maths.

use morphwave_synth::quantize::TransposeQuantizer;
use morphwave_synth::unison::{Detune, voice_ratios};
use morphwave_synth::{DistortionType, MAX_UNISON, StackStyle};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every distortion reads inside the cycle and never returns a
    /// non-finite window.
    #[test]
    fn distorted_phase_stays_in_cycle(
        index in 0usize..DistortionType::ALL.len(),
        phase in 0.0f32..1.0,
        amount in 0.0f32..=1.0,
        offset in 0.0f32..1.0,
        modulator in -1.0f32..=1.0,
    ) {
        let distortion = DistortionType::ALL[index];
        let value = distortion.value(amount);
        let (read, window) = distortion.apply(phase, value, offset, modulator);
        prop_assert!((0.0..=1.0).contains(&read), "{} read {read}", distortion.name());
        prop_assert!(window.is_finite());
        prop_assert!(window.abs() <= 1.0 + 1e-6);
    }

    /// With a normal stack, each pair detunes symmetrically around the
    /// played pitch.
    #[test]
    fn normal_stack_pairs_are_symmetric(
        voices in 1usize..=MAX_UNISON,
        amount in 0.0f32..=1.0,
        range in 0.0f32..48.0,
        power in -5.0f32..5.0,
    ) {
        let detune = Detune { amount, range, power };
        let mut ratios = [0.0; MAX_UNISON];
        voice_ratios(voices, &detune, StackStyle::Normal, &mut ratios);
        let first = voices % 2;
        if first == 1 {
            prop_assert_eq!(ratios[0], 1.0);
        }
        for pair in (first..voices).step_by(2) {
            let product = ratios[pair] * ratios[pair + 1];
            prop_assert!((product - 1.0).abs() < 1e-3, "pair at {pair}: {product}");
        }
    }

    /// Quantised transposes land on an allowed pitch class.
    #[test]
    fn quantized_transpose_is_allowed(
        mask in 1u16..0x1000,
        transpose in -48.0f32..48.0,
        note in 0.0f32..127.0,
        global in any::<bool>(),
    ) {
        let mut quantizer = TransposeQuantizer::new();
        quantizer.set_mask(mask);
        quantizer.set_global(global);
        let snapped = quantizer.quantize(transpose, note);
        let pitch = if global { note + snapped } else { snapped };
        let class = (pitch.round() as i32).rem_euclid(12);
        prop_assert!(mask & (1 << class) != 0, "class {class} not in {mask:#b}");
    }
}
