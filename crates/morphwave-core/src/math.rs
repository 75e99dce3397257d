//! Mathematical utility functions for wavetable DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Tweening
//!
//! | Function | Points | Use Case |
//! |----------|--------|----------|
//! | [`lerp`] | 2 | Linear keyframe blends, crossfades |
//! | [`cubic_tween`] | 4 + spacing | Cubic keyframe blends over uneven keyframe gaps |
//! | [`cubic_interpolate`] | 4 | Fractional reads from a guard-padded wave buffer |
//!
//! # Curves
//!
//! [`power_scale`] maps `[-1, 1]` onto itself through an exponential bend.
//! Positive powers push values toward zero, negative powers push them toward
//! the edges, and powers near zero fall back to the identity.

use core::f32::consts::{FRAC_PI_2, FRAC_PI_4, SQRT_2};
use libm::{expf, floorf, log2f, powf, sinf, cosf};

/// Powers smaller than this in magnitude make [`power_scale`] an identity.
///
/// `exp(power) - 1` approaches zero as `power` does, so the curve is
/// evaluated only outside this band.
pub const POWER_SCALE_EPSILON: f32 = 0.01;

/// Linear interpolation between two values.
///
/// Written as `from * (1 - t) + to * t` so that `t = 0.0` returns `from`
/// and `t = 1.0` returns `to` bit-for-bit. Keyframe interpolation relies on
/// that: blending at either end must reproduce the bounding keyframe.
///
/// # Example
/// ```rust
/// use morphwave_core::lerp;
///
/// assert_eq!(lerp(0.3, 0.7, 0.0), 0.3);
/// assert_eq!(lerp(0.3, 0.7, 1.0), 0.7);
/// ```
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from * (1.0 - t) + to * t
}

/// Signed exponential curve.
///
/// Returns `sign(value) * (exp(power * |value|) - 1) / (exp(power) - 1)`.
/// Inputs in `[-1, 1]` stay in `[-1, 1]`, with `±1` and `0` as fixed points.
/// For `|power| < POWER_SCALE_EPSILON` the value passes through unchanged.
///
/// # Example
/// ```rust
/// use morphwave_core::power_scale;
///
/// assert_eq!(power_scale(0.25, 0.0), 0.25);
/// assert!(power_scale(0.5, 4.0) < 0.5);
/// assert!(power_scale(0.5, -4.0) > 0.5);
/// assert!((power_scale(1.0, 7.0) - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn power_scale(value: f32, power: f32) -> f32 {
    if power.abs() < POWER_SCALE_EPSILON {
        return value;
    }
    let magnitude = (expf(power * value.abs()) - 1.0) / (expf(power) - 1.0);
    if value < 0.0 { -magnitude } else { magnitude }
}

/// Cubic blend between two keyframe values that accounts for keyframe spacing.
///
/// `range_prev`, `range` and `range_next` are the gaps between consecutive
/// keyframe positions (`prev -> from`, `from -> to`, `to -> next`). The end
/// slopes are scaled by how the neighbouring gaps compare to the current one
/// so unevenly spaced keyframes still produce a smooth curve:
///
/// ```text
/// slope_from = (to - prev) / (1 + range_prev / range)
/// slope_to   = (next - from) / (1 + range_next / range)
/// value = lerp(from, to, t)
///       + t (1 - t) [ (1 - t)(slope_from - delta) + t (delta - slope_to) ]
/// ```
///
/// A zero neighbour gap removes that end's slope contribution.
#[inline]
pub fn cubic_tween(
    point_prev: f32,
    point_from: f32,
    point_to: f32,
    point_next: f32,
    range_prev: f32,
    range: f32,
    range_next: f32,
    t: f32,
) -> f32 {
    let mut slope_from = 0.0;
    let mut slope_to = 0.0;
    if range_prev > 0.0 && range > 0.0 {
        slope_from = (point_to - point_prev) / (1.0 + range_prev / range);
    }
    if range_next > 0.0 && range > 0.0 {
        slope_to = (point_next - point_from) / (1.0 + range_next / range);
    }

    let delta = point_to - point_from;
    let inverse_t = 1.0 - t;
    let movement = lerp(point_from, point_to, t);
    let smooth = t * inverse_t * (inverse_t * (slope_from - delta) + t * (delta - slope_to));
    movement + smooth
}

/// 4-point Catmull-Rom interpolation between `y1` and `y2`.
///
/// # Arguments
/// * `y0`..`y3` - Consecutive samples; the result lies on the `y1 -> y2` span
/// * `t` - Fractional position in `[0, 1)`
#[inline]
pub fn cubic_interpolate(y0: f32, y1: f32, y2: f32, y3: f32, t: f32) -> f32 {
    let c1 = 0.5 * (y2 - y0);
    let c2 = y0 - 2.5 * y1 + 2.0 * y2 - 0.5 * y3;
    let c3 = 0.5 * (y3 - y0) + 1.5 * (y1 - y2);
    ((c3 * t + c2) * t + c1) * t + y1
}

/// Wrap a value into `[0, 1)`.
#[inline]
pub fn wrap_unit(x: f32) -> f32 {
    let wrapped = x - floorf(x);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Equal-power crossfade gains for position `t` in `[0, 1]`.
///
/// Returns `(fade_out, fade_in)` with `fade_out² + fade_in² = 1`.
#[inline]
pub fn equal_power_fade(t: f32) -> (f32, f32) {
    let angle = t.clamp(0.0, 1.0) * FRAC_PI_2;
    (cosf(angle), sinf(angle))
}

/// Constant-power pan law, normalised so the centre position is unity gain.
///
/// # Arguments
/// * `pan` - `-1.0` (left) to `1.0` (right)
///
/// # Returns
/// `(left_gain, right_gain)`
#[inline]
pub fn constant_power_pan(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    (cosf(angle) * SQRT_2, sinf(angle) * SQRT_2)
}

/// Amplitude-squared level curve used for oscillator levels and envelopes.
#[inline]
pub fn amplitude_to_gain(amplitude: f32) -> f32 {
    amplitude * amplitude
}

/// Convert a (fractional) MIDI note number to frequency in Hz (A4 = 440 Hz).
#[inline]
pub fn midi_to_freq(note: f32) -> f32 {
    440.0 * powf(2.0, (note - 69.0) / 12.0)
}

/// Convert frequency in Hz to a fractional MIDI note number.
#[inline]
pub fn freq_to_midi(freq: f32) -> f32 {
    69.0 + 12.0 * log2f(freq / 440.0)
}

/// Convert cents to a frequency ratio. 100 cents = 1 semitone.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    powf(2.0, cents / 1200.0)
}

/// Convert semitones to a frequency ratio.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    powf(2.0, semitones / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_exact() {
        let from = 0.123_456_7;
        let to = -9.876_543;
        assert_eq!(lerp(from, to, 0.0), from);
        assert_eq!(lerp(from, to, 1.0), to);
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_power_scale_identity_near_zero() {
        for &v in &[-1.0, -0.4, 0.0, 0.3, 1.0] {
            assert_eq!(power_scale(v, 0.0), v);
            assert_eq!(power_scale(v, 0.005), v);
        }
    }

    #[test]
    fn test_power_scale_fixed_points() {
        for &power in &[-8.0, -1.0, 2.0, 10.0] {
            assert!((power_scale(1.0, power) - 1.0).abs() < 1e-5);
            assert!((power_scale(-1.0, power) + 1.0).abs() < 1e-5);
            assert_eq!(power_scale(0.0, power), 0.0);
        }
    }

    #[test]
    fn test_power_scale_odd_symmetry() {
        let a = power_scale(0.6, 3.0);
        let b = power_scale(-0.6, 3.0);
        assert!((a + b).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_tween_endpoints() {
        let v0 = cubic_tween(0.0, 1.0, 3.0, 2.0, 10.0, 20.0, 5.0, 0.0);
        let v1 = cubic_tween(0.0, 1.0, 3.0, 2.0, 10.0, 20.0, 5.0, 1.0);
        assert!((v0 - 1.0).abs() < 1e-6);
        assert!((v1 - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_tween_linear_when_collinear() {
        // Evenly spaced collinear points reduce to a straight line.
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let v = cubic_tween(0.0, 1.0, 2.0, 3.0, 1.0, 1.0, 1.0, t);
            assert!((v - (1.0 + t)).abs() < 1e-5, "t={t}: {v}");
        }
    }

    #[test]
    fn test_cubic_interpolate_hits_samples() {
        assert!((cubic_interpolate(0.0, 1.0, 2.0, 3.0, 0.0) - 1.0).abs() < 1e-6);
        assert!((cubic_interpolate(0.0, 1.0, 2.0, 3.0, 0.5) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_unit() {
        assert_eq!(wrap_unit(0.25), 0.25);
        assert!((wrap_unit(1.75) - 0.75).abs() < 1e-6);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_equal_power_fade_sums_to_unity_power() {
        for i in 0..=8 {
            let (a, b) = equal_power_fade(i as f32 / 8.0);
            assert!((a * a + b * b - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_constant_power_pan_centre_is_unity() {
        let (l, r) = constant_power_pan(0.0);
        assert!((l - 1.0).abs() < 1e-5);
        assert!((r - 1.0).abs() < 1e-5);
        let (l, r) = constant_power_pan(-1.0);
        assert!(r.abs() < 1e-5);
        assert!((l - SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_midi_conversions() {
        assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-3);
        assert!((midi_to_freq(57.0) - 220.0).abs() < 1e-3);
        assert!((freq_to_midi(880.0) - 81.0).abs() < 1e-4);
        assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-6);
        assert!((semitones_to_ratio(-12.0) - 0.5).abs() < 1e-6);
    }
}
