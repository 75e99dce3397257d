//! Fade-in and fade-out windowing of the cycle.

use super::{Component, ComponentType};
use crate::error::Result;
use crate::json::{f32_or, i32_or};
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, TweenRanges};
use morphwave_core::lerp;
use morphwave_spectral::{WAVEFORM_SIZE, WaveFrame};
use serde_json::{Map, Value};
use std::f32::consts::PI;

/// Curve of the window edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowShape {
    /// Raised cosine.
    #[default]
    Cos,
    /// Quarter sine.
    HalfSin,
    /// Straight ramp.
    Linear,
    /// Silent until fully open.
    Square,
    /// Ramp modulated by a cosine.
    Wiggle,
}

impl WindowShape {
    fn from_index(index: i32) -> Self {
        match index {
            1 => WindowShape::HalfSin,
            2 => WindowShape::Linear,
            3 => WindowShape::Square,
            4 => WindowShape::Wiggle,
            _ => WindowShape::Cos,
        }
    }

    fn index(self) -> i32 {
        self as i32
    }

    /// Gain at `t` in `[0, 1]`, from the silent edge (0) to the open part (1).
    pub fn value(self, t: f32) -> f32 {
        match self {
            WindowShape::Cos => 0.5 - 0.5 * (PI * t).cos(),
            WindowShape::HalfSin => (0.5 * PI * t).sin(),
            WindowShape::Linear => t,
            WindowShape::Square => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            WindowShape::Wiggle => t * (PI * (1.5 * t + 0.5)).cos(),
        }
    }
}

/// Window edges for one keyframe, as fractions of the cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveWindowKeyframe {
    /// End of the fade-in.
    pub left_position: f32,
    /// Start of the fade-out.
    pub right_position: f32,
}

impl Default for WaveWindowKeyframe {
    fn default() -> Self {
        Self {
            left_position: 0.0,
            right_position: 1.0,
        }
    }
}

impl KeyframeData for WaveWindowKeyframe {
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32) {
        self.left_position = lerp(from.left_position, to.left_position, t);
        self.right_position = lerp(from.right_position, to.right_position, t);
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
        self.left_position = ranges.tween(
            prev.left_position,
            from.left_position,
            to.left_position,
            next.left_position,
            t,
        );
        self.right_position = ranges.tween(
            prev.right_position,
            from.right_position,
            to.right_position,
            next.right_position,
            t,
        );
    }
}

/// Modifier fading the cycle in from its start and out towards its end.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveWindowModifier {
    track: KeyframeTrack<WaveWindowKeyframe>,
    window_shape: WindowShape,
}

impl WaveWindowModifier {
    /// A raised-cosine window with no keyframes.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
            window_shape: WindowShape::Cos,
        }
    }

    /// Edge curve.
    pub fn window_shape(&self) -> WindowShape {
        self.window_shape
    }

    /// Set the edge curve.
    pub fn set_window_shape(&mut self, shape: WindowShape) {
        self.window_shape = shape;
    }

    /// Set the edges of keyframe `index`.
    pub fn set_positions(&mut self, index: usize, left: f32, right: f32) {
        if let Some(keyframe) = self.track.data_mut(index) {
            keyframe.left_position = left.clamp(0.0, 1.0);
            keyframe.right_position = right.clamp(keyframe.left_position, 1.0);
        }
    }

    /// Window gain at cycle fraction `x`.
    pub fn gain(&self, keyframe: &WaveWindowKeyframe, x: f32) -> f32 {
        let left = keyframe.left_position;
        let right = keyframe.right_position;
        if x < left {
            self.window_shape.value(x / left)
        } else if x > right {
            self.window_shape.value((1.0 - x) / (1.0 - right))
        } else {
            1.0
        }
    }
}

impl Default for WaveWindowModifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for WaveWindowModifier {
    type Keyframe = WaveWindowKeyframe;
    const TYPE: ComponentType = ComponentType::WaveWindow;

    fn track(&self) -> &KeyframeTrack<WaveWindowKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<WaveWindowKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> WaveWindowKeyframe {
        WaveWindowKeyframe::default()
    }

    fn render_keyframe(&self, keyframe: &WaveWindowKeyframe, frame: &mut WaveFrame) {
        let size = WAVEFORM_SIZE as f32;
        for (i, sample) in frame.time_domain.iter_mut().enumerate() {
            *sample *= self.gain(keyframe, i as f32 / size);
        }
        frame.to_frequency_domain();
    }

    fn keyframe_to_json(&self, keyframe: &WaveWindowKeyframe, out: &mut Map<String, Value>) {
        out.insert("left_position".into(), keyframe.left_position.into());
        out.insert("right_position".into(), keyframe.right_position.into());
    }

    fn keyframe_from_json(&self, keyframe: &mut WaveWindowKeyframe, data: &Value) -> Result<()> {
        keyframe.left_position = f32_or(data, "left_position", 0.0);
        keyframe.right_position = f32_or(data, "right_position", 1.0);
        Ok(())
    }

    fn settings_to_json(&self, out: &mut Map<String, Value>) {
        out.insert("window_shape".into(), self.window_shape.index().into());
    }

    fn settings_from_json(&mut self, data: &Value) -> Result<()> {
        self.window_shape = WindowShape::from_index(i32_or(data, "window_shape", 0));
        Ok(())
    }
}
