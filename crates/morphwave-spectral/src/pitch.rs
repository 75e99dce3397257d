//! Period detection for sampled audio.
//!
//! [`detect_period`] finds the cycle length of a roughly periodic signal by
//! comparing the waveform with itself one candidate period later, across
//! several consecutive cycles. The error of a candidate period `p` is
//!
//! ```text
//! E(p) = mean_{c, j} (x(s_j + (c + 1) p) - x(s_j + c p))^2 + DC_PENALTY * dc(p)^2
//! ```
//!
//! where `s_j` are evenly spaced points over one cycle and `dc(p)` is the
//! mean of the first cycle. The search runs in two passes: whole-sample
//! periods over `[MIN_PERIOD, max_period]`, then tenth-of-a-sample periods
//! within one sample of the coarse winner.

/// Shortest period considered, in samples.
pub const MIN_PERIOD: usize = 300;
/// Longest period considered when the caller has no better bound.
pub const DEFAULT_MAX_PERIOD: usize = 4096;

const POINTS_PER_CYCLE: usize = 128;
const MAX_WAVES: usize = 4;
const DC_PENALTY: f32 = 0.1;
const LOCAL_MIN_THRESHOLD: f32 = 0.05;
const FINE_STEP: f32 = 0.1;

/// Estimate the period of `samples` in (fractional) samples.
///
/// `max_period` is clamped so that at least two full cycles fit in the
/// buffer. Returns `None` when the buffer is too short to hold two cycles of
/// [`MIN_PERIOD`] or carries no signal.
pub fn detect_period(samples: &[f32], max_period: usize) -> Option<f32> {
    let longest = samples.len().saturating_sub(2) / 2;
    let max_period = max_period.min(longest);
    if max_period < MIN_PERIOD {
        return None;
    }

    let power = samples.iter().map(|x| x * x).sum::<f32>() / samples.len() as f32;
    if power <= f32::EPSILON {
        return None;
    }
    let threshold = LOCAL_MIN_THRESHOLD * power;

    let errors: Vec<f32> = (MIN_PERIOD..=max_period)
        .map(|period| period_error(samples, period as f32))
        .collect();

    let coarse = first_local_minimum(&errors, threshold)
        .or_else(|| global_minimum(&errors))
        .map(|i| (MIN_PERIOD + i) as f32)?;

    let mut best_period = coarse;
    let mut best_error = f32::MAX;
    let steps = (2.0 / FINE_STEP).round() as i32;
    for step in 0..=steps {
        let period = coarse - 1.0 + step as f32 * FINE_STEP;
        if period < MIN_PERIOD as f32 || period > max_period as f32 {
            continue;
        }
        let error = period_error(samples, period);
        if error < best_error {
            best_error = error;
            best_period = period;
        }
    }
    Some(best_period)
}

/// Error of `period` as a candidate cycle length, lower is better.
///
/// # Panics
/// Panics if the buffer cannot hold two cycles of `period`.
pub fn period_error(samples: &[f32], period: f32) -> f32 {
    let available = (samples.len() - 1) as f32;
    let waves = ((available / period) as usize).saturating_sub(1).min(MAX_WAVES);
    assert!(waves > 0, "period {period} too long for {} samples", samples.len());

    let point_step = period / POINTS_PER_CYCLE as f32;
    let mut squared_error = 0.0;
    let mut dc = 0.0;
    for j in 0..POINTS_PER_CYCLE {
        let start = j as f32 * point_step;
        let mut previous = read_linear(samples, start);
        dc += previous;
        for wave in 1..=waves {
            let current = read_linear(samples, start + wave as f32 * period);
            let delta = current - previous;
            squared_error += delta * delta;
            previous = current;
        }
    }

    dc /= POINTS_PER_CYCLE as f32;
    squared_error / (waves * POINTS_PER_CYCLE) as f32 + DC_PENALTY * dc * dc
}

fn read_linear(samples: &[f32], position: f32) -> f32 {
    let index = position as usize;
    let t = position - index as f32;
    let a = samples[index.min(samples.len() - 1)];
    let b = samples[(index + 1).min(samples.len() - 1)];
    a + (b - a) * t
}

fn first_local_minimum(errors: &[f32], threshold: f32) -> Option<usize> {
    (1..errors.len().saturating_sub(1)).find(|&i| {
        errors[i] < threshold && errors[i] <= errors[i - 1] && errors[i] < errors[i + 1]
    })
}

fn global_minimum(errors: &[f32]) -> Option<usize> {
    errors
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_error_is_smallest_at_true_period() {
        let signal = sine(100.0, 44100.0, 8192);
        let at_period = period_error(&signal, 441.0);
        let off_period = period_error(&signal, 400.0);
        assert!(at_period < 1e-4, "{at_period}");
        assert!(off_period > at_period * 100.0);
    }

    #[test]
    fn test_detects_sine_period() {
        let signal = sine(100.0, 44100.0, 44100);
        let period = detect_period(&signal, DEFAULT_MAX_PERIOD).unwrap_or(0.0);
        assert!((period - 441.0).abs() <= 1.0, "period = {period}");
    }

    #[test]
    fn test_prefers_fundamental_over_multiples() {
        // 1 kHz is shorter than MIN_PERIOD; 75 Hz gives 588 samples.
        let signal = sine(75.0, 44100.0, 20000);
        let period = detect_period(&signal, DEFAULT_MAX_PERIOD).unwrap_or(0.0);
        assert!((period - 588.0).abs() <= 1.0, "period = {period}");
    }

    #[test]
    fn test_short_or_silent_input() {
        assert_eq!(detect_period(&[0.5; 200], DEFAULT_MAX_PERIOD), None);
        assert_eq!(detect_period(&vec![0.0; 10000], DEFAULT_MAX_PERIOD), None);
    }
}
