//! Waves drawn as a curve through points.

use super::{Component, ComponentType};
use crate::error::Result;
use crate::json::{f32_or, field, i32_or};
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack};
use crate::line_generator::{LineGenerator, MAX_LINE_POINTS};
use morphwave_core::{lerp, power_scale};
use morphwave_spectral::WaveFrame;
use serde_json::{Map, Value};

/// Points per line in a new line source.
pub const DEFAULT_LINE_POINTS: usize = 3;

/// One drawn curve.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveLineSourceKeyframe {
    /// The curve.
    pub line: LineGenerator,
    /// Bends how points travel towards this keyframe when it is the blend
    /// target. Zero moves them linearly.
    pub pull_power: f32,
}

impl KeyframeData for WaveLineSourceKeyframe {
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32) {
        if t <= 0.0 {
            self.clone_from(from);
            return;
        }
        if t >= 1.0 {
            self.clone_from(to);
            return;
        }
        let pulled = power_scale(t, to.pull_power);
        self.line.interpolate(&from.line, &to.line, pulled);
        self.pull_power = lerp(from.pull_power, to.pull_power, t);
    }
}

/// Source component rendering a [`LineGenerator`] per keyframe.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveLineSource {
    track: KeyframeTrack<WaveLineSourceKeyframe>,
    num_points: usize,
}

impl WaveLineSource {
    /// An empty line source.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
            num_points: DEFAULT_LINE_POINTS,
        }
    }

    /// Points per line.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Resample every keyframe's line to `num_points` evenly spaced points.
    pub fn set_num_points(&mut self, num_points: usize) {
        self.num_points = num_points.clamp(2, MAX_LINE_POINTS);
        let count = self.num_points;
        for keyframe in self.track.data_iter_mut() {
            let values: Vec<f32> = (0..count)
                .map(|i| keyframe.line.value_at(i as f32 / (count - 1) as f32))
                .collect();
            let name = keyframe.line.name().to_string();
            keyframe.line.init_linear(count);
            for (i, value) in values.into_iter().enumerate() {
                let x = keyframe.line.point(i).0;
                keyframe.line.set_point(i, (x, 1.0 - value));
            }
            keyframe.line.set_name(name);
        }
    }

    /// Line at keyframe `index`.
    pub fn line_mut(&mut self, index: usize) -> Option<&mut LineGenerator> {
        self.track.data_mut(index).map(|k| &mut k.line)
    }

    /// Set the pull power of keyframe `index`.
    pub fn set_pull_power(&mut self, index: usize, pull_power: f32) {
        if let Some(keyframe) = self.track.data_mut(index) {
            keyframe.pull_power = pull_power;
        }
    }
}

impl Default for WaveLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for WaveLineSource {
    type Keyframe = WaveLineSourceKeyframe;
    const TYPE: ComponentType = ComponentType::LineSource;

    fn track(&self) -> &KeyframeTrack<WaveLineSourceKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<WaveLineSourceKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> WaveLineSourceKeyframe {
        let mut line = LineGenerator::new();
        if self.num_points != 3 {
            // keep a triangle-like shape at any point count
            line.init_linear(self.num_points);
            let last = self.num_points - 1;
            for i in 0..self.num_points {
                let x = i as f32 / last as f32;
                line.set_point(i, (x, (1.0 - 2.0 * x).abs()));
            }
        }
        WaveLineSourceKeyframe {
            line,
            pull_power: 0.0,
        }
    }

    fn render_keyframe(&self, keyframe: &WaveLineSourceKeyframe, frame: &mut WaveFrame) {
        keyframe.line.render(&mut frame.time_domain);
        for sample in &mut frame.time_domain {
            *sample = 2.0 * *sample - 1.0;
        }
        frame.to_frequency_domain();
    }

    fn keyframe_to_json(&self, keyframe: &WaveLineSourceKeyframe, out: &mut Map<String, Value>) {
        out.insert("line".into(), keyframe.line.state_to_json());
        out.insert("pull_power".into(), keyframe.pull_power.into());
    }

    fn keyframe_from_json(&self, keyframe: &mut WaveLineSourceKeyframe, data: &Value) -> Result<()> {
        keyframe.line.json_to_state(field(data, "line")?)?;
        keyframe.pull_power = f32_or(data, "pull_power", 0.0);
        Ok(())
    }

    fn settings_to_json(&self, out: &mut Map<String, Value>) {
        out.insert("num_points".into(), self.num_points.into());
    }

    fn settings_from_json(&mut self, data: &Value) -> Result<()> {
        let num_points = i32_or(data, "num_points", DEFAULT_LINE_POINTS as i32);
        self.num_points = (num_points.max(2) as usize).min(MAX_LINE_POINTS);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renders_triangle() {
        let mut source = WaveLineSource::new();
        source.insert_new_keyframe(0);
        let mut frame = WaveFrame::new();
        source.render(&mut frame, 0.0);
        let n = frame.time_domain.len();
        assert!((frame.time_domain[0] + 1.0).abs() < 1e-5);
        assert!((frame.time_domain[n / 2] - 1.0).abs() < 1e-5);
        assert!((frame.time_domain[n / 4]).abs() < 1e-5);
    }

    #[test]
    fn test_set_num_points_keeps_shape() {
        let mut source = WaveLineSource::new();
        source.insert_new_keyframe(0);
        source.set_num_points(9);
        let line = &source.track().keyframes()[0].data.line;
        assert_eq!(line.num_points(), 9);
        assert!(line.value_at(0.0).abs() < 1e-5);
        assert!((line.value_at(0.5) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pull_power_bends_travel() {
        let mut source = WaveLineSource::new();
        source.insert_new_keyframe(0);
        source.insert_new_keyframe(100);
        if let Some(line) = source.line_mut(1) {
            line.set_point(1, (1.0 / 3.0, 1.0));
        }
        let straight = source.interpolated(50.0).line.point(1).1;
        source.set_pull_power(1, 6.0);
        let pulled = source.interpolated(50.0).line.point(1).1;
        assert!(pulled < straight, "{pulled} vs {straight}");
    }
}
