//! Cyclic slew limiter.

use super::{Component, ComponentType};
use crate::error::Result;
use crate::json::f32_or;
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, TweenRanges};
use morphwave_core::lerp;
use morphwave_spectral::{WAVEFORM_SIZE, WaveFrame};
use serde_json::{Map, Value};

const MIN_RUN_RISE: f32 = 1e-5;

/// Rate limits for one keyframe, as the fraction of the cycle a full-scale
/// rise (or fall) may take.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlewLimitKeyframe {
    /// Rise time; zero disables the rise limit.
    pub slew_up_run_rise: f32,
    /// Fall time; zero disables the fall limit.
    pub slew_down_run_rise: f32,
}

impl SlewLimitKeyframe {
    /// Largest rise per sample.
    pub fn up_limit(&self) -> f32 {
        delta_limit(self.slew_up_run_rise)
    }

    /// Largest fall per sample.
    pub fn down_limit(&self) -> f32 {
        delta_limit(self.slew_down_run_rise)
    }
}

fn delta_limit(run_rise: f32) -> f32 {
    2.0 / (WAVEFORM_SIZE as f32 * run_rise.max(MIN_RUN_RISE))
}

impl KeyframeData for SlewLimitKeyframe {
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32) {
        self.slew_up_run_rise = lerp(from.slew_up_run_rise, to.slew_up_run_rise, t);
        self.slew_down_run_rise = lerp(from.slew_down_run_rise, to.slew_down_run_rise, t);
    }

    fn smooth_interpolate(
        &mut self,
        prev: &Self,
        from: &Self,
        to: &Self,
        next: &Self,
        t: f32,
        ranges: TweenRanges,
    ) {
        self.slew_up_run_rise = ranges.tween(
            prev.slew_up_run_rise,
            from.slew_up_run_rise,
            to.slew_up_run_rise,
            next.slew_up_run_rise,
            t,
        );
        self.slew_down_run_rise = ranges.tween(
            prev.slew_down_run_rise,
            from.slew_down_run_rise,
            to.slew_down_run_rise,
            next.slew_down_run_rise,
            t,
        );
    }
}

/// Modifier limiting how fast the wave may rise and fall.
///
/// The wave is a loop, so the limiter runs around it twice and only the
/// second lap is kept; by then its state no longer depends on where it
/// started.
#[derive(Debug, Clone, PartialEq)]
pub struct SlewLimitModifier {
    track: KeyframeTrack<SlewLimitKeyframe>,
}

impl SlewLimitModifier {
    /// A limiter with no keyframes.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
        }
    }

    /// Set the limits of keyframe `index`.
    pub fn set_run_rise(&mut self, index: usize, up: f32, down: f32) {
        if let Some(keyframe) = self.track.data_mut(index) {
            keyframe.slew_up_run_rise = up.max(0.0);
            keyframe.slew_down_run_rise = down.max(0.0);
        }
    }
}

impl Default for SlewLimitModifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SlewLimitModifier {
    type Keyframe = SlewLimitKeyframe;
    const TYPE: ComponentType = ComponentType::SlewLimiter;

    fn track(&self) -> &KeyframeTrack<SlewLimitKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<SlewLimitKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> SlewLimitKeyframe {
        SlewLimitKeyframe::default()
    }

    fn render_keyframe(&self, keyframe: &SlewLimitKeyframe, frame: &mut WaveFrame) {
        let up = keyframe.up_limit();
        let down = keyframe.down_limit();
        let source = frame.time_domain.clone();
        let mut current = source[source.len() - 1];

        for lap in 0..2 {
            for (i, &target) in source.iter().enumerate() {
                let delta = target - current;
                if delta > up {
                    current += up;
                } else if delta < -down {
                    current -= down;
                } else {
                    current = target;
                }
                if lap == 1 {
                    frame.time_domain[i] = current;
                }
            }
        }
        frame.to_frequency_domain();
    }

    fn keyframe_to_json(&self, keyframe: &SlewLimitKeyframe, out: &mut Map<String, Value>) {
        out.insert("slew_up_run_rise".into(), keyframe.slew_up_run_rise.into());
        out.insert("slew_down_run_rise".into(), keyframe.slew_down_run_rise.into());
    }

    fn keyframe_from_json(&self, keyframe: &mut SlewLimitKeyframe, data: &Value) -> Result<()> {
        keyframe.slew_up_run_rise = f32_or(data, "slew_up_run_rise", 0.0);
        keyframe.slew_down_run_rise = f32_or(data, "slew_down_run_rise", 0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphwave_spectral::{PredefinedWaveFrames, Shape};

    fn square_through(up: f32, down: f32) -> WaveFrame {
        let mut limiter = SlewLimitModifier::new();
        limiter.insert_new_keyframe(0);
        limiter.set_run_rise(0, up, down);
        let mut frame = PredefinedWaveFrames::get(Shape::Square).clone();
        limiter.render(&mut frame, 0.0);
        frame
    }

    #[test]
    fn test_zero_run_rise_passes_through() {
        let frame = square_through(0.0, 0.0);
        assert_eq!(frame.time_domain, PredefinedWaveFrames::get(Shape::Square).time_domain);
    }

    #[test]
    fn test_rise_is_limited() {
        let frame = square_through(0.25, 0.0);
        let limit = 2.0 / (WAVEFORM_SIZE as f32 * 0.25);
        for pair in frame.time_domain.windows(2) {
            assert!(pair[1] - pair[0] <= limit + 1e-6);
        }
        // the fall stays instantaneous
        let half = WAVEFORM_SIZE / 2;
        assert_eq!(frame.time_domain[half], -1.0);
    }

    #[test]
    fn test_second_lap_settles_the_loop() {
        // a quarter-cycle rise from -1 finishes within the first half
        let frame = square_through(0.25, 0.0);
        let quarter = WAVEFORM_SIZE / 4;
        assert!((frame.time_domain[0] - (-1.0 + 2.0 / (WAVEFORM_SIZE as f32 * 0.25))).abs() < 1e-5);
        assert_eq!(frame.time_domain[quarter + 8], 1.0);
    }
}
