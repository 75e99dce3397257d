//! Parameter smoothing for zipper-free oscillator controls.
//!
//! Oscillator controls (level, pan, unison blend, stereo spread) are read once
//! per audio block but applied per sample. [`SmoothedParam`] glides between
//! block targets so a new block never starts with a step.
//!
//! Wave buffer swaps need something different: a ramp with a fixed length
//! that restarts every time a new buffer is published. [`CrossfadeRamp`]
//! provides that.
//!
//! ```rust
//! use morphwave_core::SmoothedParam;
//!
//! let mut level = SmoothedParam::with_config(0.0, 48000.0, 5.0);
//! level.set_target(0.8);
//! for _ in 0..480 {
//!     let _gain = level.advance();
//! }
//! assert!((level.get() - 0.8).abs() < 0.1);
//! ```

use libm::expf;

/// A parameter that exponentially approaches its target.
///
/// One-pole lowpass: `y[n] = y[n-1] + coeff * (target - y[n-1])`, with
/// `coeff = 1 - exp(-1 / (tau * sample_rate))`. A smoothing time of zero
/// makes changes instant.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a parameter at `initial` with smoothing disabled.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 44100.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create a parameter with sample rate and smoothing time configured.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Set the value the parameter glides toward.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value` with no glide.
    ///
    /// Used on voice reset so a fresh note does not sweep from the previous
    /// note's settings.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update the sample rate and recompute the smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Set the smoothing time constant in milliseconds.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the value is within `1e-6` of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Fixed-length linear ramp from 0 to 1.
///
/// `restart` rewinds to 0; each `advance` moves one sample closer to 1 and
/// holds there once the ramp length has elapsed. The oscillator uses one
/// ramp per voice to fade from the previous wave buffer into the newly
/// rendered one.
#[derive(Debug, Clone)]
pub struct CrossfadeRamp {
    length: u32,
    remaining: u32,
}

impl CrossfadeRamp {
    /// Create a ramp spanning `length` samples (at least one), already finished.
    pub fn new(length: u32) -> Self {
        let length = length.max(1);
        Self {
            length,
            remaining: 0,
        }
    }

    /// Create a ramp spanning `time_ms` at `sample_rate`.
    pub fn from_time(time_ms: f32, sample_rate: f32) -> Self {
        Self::new((time_ms / 1000.0 * sample_rate) as u32)
    }

    /// Ramp length in samples.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Rewind to the start of the ramp.
    #[inline]
    pub fn restart(&mut self) {
        self.remaining = self.length;
    }

    /// Jump to the end of the ramp.
    #[inline]
    pub fn finish(&mut self) {
        self.remaining = 0;
    }

    /// Current position in `[0, 1]` without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        1.0 - self.remaining as f32 / self.length as f32
    }

    /// Advance one sample and return the position in `[0, 1]`.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        self.value()
    }

    /// True once the ramp has reached 1.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Samples left until the ramp reaches 1.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothed_param_instant_when_no_smoothing() {
        let mut param = SmoothedParam::new(1.0);
        param.set_target(0.5);
        assert!((param.advance() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn smoothed_param_converges() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        param.set_target(1.0);
        for _ in 0..(48000 * 50 / 1000) {
            param.advance();
        }
        assert!((param.get() - 1.0).abs() < 0.01, "got {}", param.get());
    }

    #[test]
    fn smoothed_param_immediate_settles() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        param.set_immediate(0.7);
        assert!(param.is_settled());
        assert_eq!(param.advance(), 0.7);
    }

    #[test]
    fn crossfade_ramp_reaches_one_in_length_samples() {
        let mut ramp = CrossfadeRamp::new(4);
        assert!(ramp.is_finished());
        ramp.restart();
        assert_eq!(ramp.value(), 0.0);
        let values: [f32; 5] = core::array::from_fn(|_| ramp.advance());
        assert_eq!(values, [0.25, 0.5, 0.75, 1.0, 1.0]);
        assert!(ramp.is_finished());
    }

    #[test]
    fn crossfade_ramp_from_time() {
        let ramp = CrossfadeRamp::from_time(7.0, 48000.0);
        assert_eq!(ramp.length(), 336);
        assert_eq!(CrossfadeRamp::new(0).length(), 1);
    }
}
