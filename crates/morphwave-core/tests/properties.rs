//! Property-based tests for morphwave-core math.
//!
//! Covers the end-point and range guarantees the keyframe and oscillator
//! code depend on.

use morphwave_core::{CrossfadeRamp, cubic_tween, lerp, power_scale, wrap_unit};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Blending at t = 0 and t = 1 reproduces the end points exactly.
    #[test]
    fn lerp_end_points_exact(from in -1000.0f32..1000.0, to in -1000.0f32..1000.0) {
        prop_assert_eq!(lerp(from, to, 0.0), from);
        prop_assert_eq!(lerp(from, to, 1.0), to);
    }

    /// power_scale keeps [-1, 1] inside [-1, 1] and preserves sign.
    #[test]
    fn power_scale_stays_in_range(value in -1.0f32..=1.0, power in -20.0f32..20.0) {
        let out = power_scale(value, power);
        prop_assert!(out.is_finite());
        prop_assert!(out.abs() <= 1.0 + 1e-5, "power_scale({}, {}) = {}", value, power, out);
        prop_assert!(out * value >= 0.0);
    }

    /// power_scale is monotonic in its input for any power.
    #[test]
    fn power_scale_monotonic(a in -1.0f32..=1.0, b in -1.0f32..=1.0, power in -12.0f32..12.0) {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        prop_assert!(power_scale(lo, power) <= power_scale(hi, power) + 1e-6);
    }

    /// cubic_tween always starts at `from` and ends at `to`.
    #[test]
    fn cubic_tween_end_points(
        prev in -1.0f32..1.0, from in -1.0f32..1.0, to in -1.0f32..1.0, next in -1.0f32..1.0,
        range_prev in 0.0f32..64.0, range in 1.0f32..64.0, range_next in 0.0f32..64.0,
    ) {
        let start = cubic_tween(prev, from, to, next, range_prev, range, range_next, 0.0);
        let end = cubic_tween(prev, from, to, next, range_prev, range, range_next, 1.0);
        prop_assert!((start - from).abs() < 1e-5);
        prop_assert!((end - to).abs() < 1e-5);
    }

    /// wrap_unit lands in [0, 1).
    #[test]
    fn wrap_unit_range(x in -100.0f32..100.0) {
        let w = wrap_unit(x);
        prop_assert!((0.0..1.0).contains(&w), "wrap_unit({}) = {}", x, w);
    }

    /// A ramp reaches exactly 1.0 after `length` advances and never overshoots.
    #[test]
    fn crossfade_ramp_monotonic(length in 1u32..2000) {
        let mut ramp = CrossfadeRamp::new(length);
        ramp.restart();
        let mut last = 0.0;
        for _ in 0..length {
            let v = ramp.advance();
            prop_assert!(v >= last && v <= 1.0);
            last = v;
        }
        prop_assert_eq!(ramp.value(), 1.0);
    }
}
