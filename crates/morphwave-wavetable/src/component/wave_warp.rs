//! Power-curve warps along both axes of the wave.

use super::{Component, ComponentType};
use crate::error::Result;
use crate::json::{bool_or, f32_or};
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, TweenRanges};
use morphwave_core::{lerp, power_scale};
use morphwave_spectral::{WAVEFORM_SIZE, WaveFrame};
use serde_json::{Map, Value};

/// Warp amounts for one keyframe. Zero leaves an axis alone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaveWarpKeyframe {
    /// Time-axis bend.
    pub horizontal_power: f32,
    /// Amplitude-axis bend.
    pub vertical_power: f32,
}

impl KeyframeData for WaveWarpKeyframe {
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32) {
        self.horizontal_power = lerp(from.horizontal_power, to.horizontal_power, t);
        self.vertical_power = lerp(from.vertical_power, to.vertical_power, t);
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
        self.horizontal_power = ranges.tween(
            prev.horizontal_power,
            from.horizontal_power,
            to.horizontal_power,
            next.horizontal_power,
            t,
        );
        self.vertical_power = ranges.tween(
            prev.vertical_power,
            from.vertical_power,
            to.vertical_power,
            next.vertical_power,
            t,
        );
    }
}

/// Modifier bending the wave's time axis and amplitude axis.
///
/// A symmetric warp bends each axis around its centre; an asymmetric warp
/// bends it from one end to the other.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveWarpModifier {
    track: KeyframeTrack<WaveWarpKeyframe>,
    horizontal_asymmetric: bool,
    vertical_asymmetric: bool,
}

impl WaveWarpModifier {
    /// A symmetric warp with no keyframes.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
            horizontal_asymmetric: false,
            vertical_asymmetric: false,
        }
    }

    /// Whether the time axis bends end to end.
    pub fn horizontal_asymmetric(&self) -> bool {
        self.horizontal_asymmetric
    }

    /// Bend the time axis end to end instead of around its centre.
    pub fn set_horizontal_asymmetric(&mut self, asymmetric: bool) {
        self.horizontal_asymmetric = asymmetric;
    }

    /// Whether the amplitude axis bends end to end.
    pub fn vertical_asymmetric(&self) -> bool {
        self.vertical_asymmetric
    }

    /// Bend the amplitude axis end to end instead of around zero.
    pub fn set_vertical_asymmetric(&mut self, asymmetric: bool) {
        self.vertical_asymmetric = asymmetric;
    }

    /// Set the warp powers of keyframe `index`.
    pub fn set_powers(&mut self, index: usize, horizontal: f32, vertical: f32) {
        if let Some(keyframe) = self.track.data_mut(index) {
            keyframe.horizontal_power = horizontal;
            keyframe.vertical_power = vertical;
        }
    }

    fn warp_horizontal(&self, x: f32, power: f32) -> f32 {
        if self.horizontal_asymmetric {
            power_scale(x, power)
        } else {
            0.5 * (power_scale(2.0 * x - 1.0, power) + 1.0)
        }
    }

    fn warp_vertical(&self, y: f32, power: f32) -> f32 {
        if self.vertical_asymmetric {
            2.0 * power_scale(0.5 * (y + 1.0), power) - 1.0
        } else {
            power_scale(y, power)
        }
    }
}

impl Default for WaveWarpModifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for WaveWarpModifier {
    type Keyframe = WaveWarpKeyframe;
    const TYPE: ComponentType = ComponentType::WaveWarp;

    fn track(&self) -> &KeyframeTrack<WaveWarpKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<WaveWarpKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> WaveWarpKeyframe {
        WaveWarpKeyframe::default()
    }

    fn render_keyframe(&self, keyframe: &WaveWarpKeyframe, frame: &mut WaveFrame) {
        let source = frame.time_domain.clone();
        let size = WAVEFORM_SIZE as f32;
        for (i, sample) in frame.time_domain.iter_mut().enumerate() {
            let x = self.warp_horizontal(i as f32 / size, keyframe.horizontal_power);
            let position = x * size;
            let index = position.floor();
            let t = position - index;
            let from = source[(index as usize) % WAVEFORM_SIZE];
            let to = source[(index as usize + 1) % WAVEFORM_SIZE];
            *sample = self.warp_vertical(lerp(from, to, t), keyframe.vertical_power);
        }
        frame.to_frequency_domain();
    }

    fn keyframe_to_json(&self, keyframe: &WaveWarpKeyframe, out: &mut Map<String, Value>) {
        out.insert("horizontal_power".into(), keyframe.horizontal_power.into());
        out.insert("vertical_power".into(), keyframe.vertical_power.into());
    }

    fn keyframe_from_json(&self, keyframe: &mut WaveWarpKeyframe, data: &Value) -> Result<()> {
        keyframe.horizontal_power = f32_or(data, "horizontal_power", 0.0);
        keyframe.vertical_power = f32_or(data, "vertical_power", 0.0);
        Ok(())
    }

    fn settings_to_json(&self, out: &mut Map<String, Value>) {
        out.insert("horizontal_asymmetric".into(), self.horizontal_asymmetric.into());
        out.insert("vertical_asymmetric".into(), self.vertical_asymmetric.into());
    }

    fn settings_from_json(&mut self, data: &Value) -> Result<()> {
        self.horizontal_asymmetric = bool_or(data, "horizontal_asymmetric", false);
        self.vertical_asymmetric = bool_or(data, "vertical_asymmetric", false);
        Ok(())
    }
}
