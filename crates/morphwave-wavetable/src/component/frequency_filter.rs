//! Brick-shaped spectral filter applied per harmonic.

use super::{Component, ComponentType};
use crate::error::Result;
use crate::json::{bool_or, f32_or, i32_or};
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, TweenRanges};
use morphwave_core::{lerp, power_scale};
use morphwave_spectral::WaveFrame;
use serde_json::{Map, Value};

const MAX_COMB_POWER: f32 = 20.0;

/// Filter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterStyle {
    /// Pass harmonics below the cutoff.
    #[default]
    LowPass,
    /// Pass harmonics around the cutoff.
    BandPass,
    /// Pass harmonics above the cutoff.
    HighPass,
    /// Peaks at every multiple of the cutoff harmonic.
    Comb,
}

impl FilterStyle {
    fn from_index(index: i32) -> Self {
        match index {
            1 => FilterStyle::BandPass,
            2 => FilterStyle::HighPass,
            3 => FilterStyle::Comb,
            _ => FilterStyle::LowPass,
        }
    }

    fn index(self) -> i32 {
        self as i32
    }
}

/// Filter settings for one keyframe.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyFilterKeyframe {
    /// Cutoff as a power of two of the harmonic index.
    pub cutoff: f32,
    /// Slope width; zero is a hard edge.
    pub shape: f32,
}

impl Default for FrequencyFilterKeyframe {
    fn default() -> Self {
        Self {
            cutoff: 4.0,
            shape: 0.5,
        }
    }
}

impl KeyframeData for FrequencyFilterKeyframe {
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32) {
        self.cutoff = lerp(from.cutoff, to.cutoff, t);
        self.shape = lerp(from.shape, to.shape, t);
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
        self.cutoff = ranges.tween(prev.cutoff, from.cutoff, to.cutoff, next.cutoff, t);
        self.shape = ranges.tween(prev.shape, from.shape, to.shape, next.shape, t);
    }
}

/// Modifier scaling every harmonic by a filter response.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyFilterModifier {
    track: KeyframeTrack<FrequencyFilterKeyframe>,
    style: FilterStyle,
    normalize: bool,
}

impl FrequencyFilterModifier {
    /// A low-pass filter with normalisation on.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
            style: FilterStyle::LowPass,
            normalize: true,
        }
    }

    /// Filter response.
    pub fn style(&self) -> FilterStyle {
        self.style
    }

    /// Set the filter response.
    pub fn set_style(&mut self, style: FilterStyle) {
        self.style = style;
    }

    /// Whether filtered frames are brought back to full scale.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Turn output normalisation on or off.
    pub fn set_normalize(&mut self, normalize: bool) {
        self.normalize = normalize;
    }

    /// Set the filter of keyframe `index`.
    pub fn set_filter(&mut self, index: usize, cutoff: f32, shape: f32) {
        if let Some(keyframe) = self.track.data_mut(index) {
            keyframe.cutoff = cutoff;
            keyframe.shape = shape.clamp(0.0, 1.0);
        }
    }

    /// Gain of harmonic `index` under `keyframe`.
    pub fn multiplier(&self, keyframe: &FrequencyFilterKeyframe, index: usize) -> f32 {
        let cutoff = keyframe.cutoff.exp2();
        let ramp = 1.0 + keyframe.shape * keyframe.shape * cutoff;
        let delta = index as f32 - cutoff;
        match self.style {
            FilterStyle::LowPass => (1.0 - delta / ramp).clamp(0.0, 1.0),
            FilterStyle::BandPass => (1.0 - delta.abs() / ramp).clamp(0.0, 1.0),
            FilterStyle::HighPass => (1.0 + delta / ramp).clamp(0.0, 1.0),
            FilterStyle::Comb => {
                let phase = (index as f32 / cutoff).fract();
                let tooth = 1.0 - (2.0 * phase - 1.0).abs();
                power_scale(tooth, (2.0 * keyframe.shape - 1.0) * MAX_COMB_POWER)
            }
        }
    }
}

impl Default for FrequencyFilterModifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FrequencyFilterModifier {
    type Keyframe = FrequencyFilterKeyframe;
    const TYPE: ComponentType = ComponentType::FrequencyFilter;

    fn track(&self) -> &KeyframeTrack<FrequencyFilterKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<FrequencyFilterKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> FrequencyFilterKeyframe {
        FrequencyFilterKeyframe::default()
    }

    fn render_keyframe(&self, keyframe: &FrequencyFilterKeyframe, frame: &mut WaveFrame) {
        for (index, bin) in frame.frequency_domain.iter_mut().enumerate() {
            *bin *= self.multiplier(keyframe, index);
        }
        frame.to_time_domain();
        if self.normalize {
            frame.normalize(true);
            frame.to_frequency_domain();
        }
    }

    fn keyframe_to_json(&self, keyframe: &FrequencyFilterKeyframe, out: &mut Map<String, Value>) {
        out.insert("cutoff".into(), keyframe.cutoff.into());
        out.insert("shape".into(), keyframe.shape.into());
    }

    fn keyframe_from_json(&self, keyframe: &mut FrequencyFilterKeyframe, data: &Value) -> Result<()> {
        keyframe.cutoff = f32_or(data, "cutoff", 4.0);
        keyframe.shape = f32_or(data, "shape", 0.5);
        Ok(())
    }

    fn settings_to_json(&self, out: &mut Map<String, Value>) {
        out.insert("style".into(), self.style.index().into());
        out.insert("normalize".into(), self.normalize.into());
    }

    fn settings_from_json(&mut self, data: &Value) -> Result<()> {
        self.style = FilterStyle::from_index(i32_or(data, "style", 0));
        self.normalize = bool_or(data, "normalize", true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphwave_spectral::{PredefinedWaveFrames, Shape};

    fn saw() -> WaveFrame {
        PredefinedWaveFrames::get(Shape::Saw).clone()
    }

    #[test]
    fn test_hard_lowpass_zeroes_above_cutoff() {
        let mut filter = FrequencyFilterModifier::new();
        filter.insert_new_keyframe(0);
        filter.set_filter(0, 4.0, 0.0);
        let mut frame = saw();
        filter.render(&mut frame, 0.0);
        for bin in &frame.frequency_domain[18..] {
            assert!(bin.norm() < 1e-2, "{}", bin.norm());
        }
        assert!(frame.frequency_domain[1].norm() > 1.0);
        assert!((frame.max_zero_offset() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_highpass_keeps_top() {
        let mut filter = FrequencyFilterModifier::new();
        filter.set_style(FilterStyle::HighPass);
        filter.set_normalize(false);
        filter.insert_new_keyframe(0);
        filter.set_filter(0, 6.0, 0.0);
        let keyframe = filter.interpolated(0.0);
        assert_eq!(filter.multiplier(&keyframe, 10), 0.0);
        assert_eq!(filter.multiplier(&keyframe, 64), 1.0);
        assert_eq!(filter.multiplier(&keyframe, 500), 1.0);
    }

    #[test]
    fn test_bandpass_peaks_at_cutoff() {
        let mut filter = FrequencyFilterModifier::new();
        filter.set_style(FilterStyle::BandPass);
        let keyframe = FrequencyFilterKeyframe {
            cutoff: 5.0,
            shape: 0.5,
        };
        assert_eq!(filter.multiplier(&keyframe, 32), 1.0);
        assert!(filter.multiplier(&keyframe, 30) < 1.0);
        assert_eq!(filter.multiplier(&keyframe, 200), 0.0);
    }

    #[test]
    fn test_comb_teeth() {
        let mut filter = FrequencyFilterModifier::new();
        filter.set_style(FilterStyle::Comb);
        let keyframe = FrequencyFilterKeyframe {
            cutoff: 3.0,
            shape: 0.5,
        };
        // linear teeth of width 8
        assert!((filter.multiplier(&keyframe, 4) - 1.0).abs() < 1e-6);
        assert!(filter.multiplier(&keyframe, 8).abs() < 1e-6);
        assert!((filter.multiplier(&keyframe, 2) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_json_keeps_style() {
        let mut filter = FrequencyFilterModifier::new();
        filter.set_style(FilterStyle::Comb);
        filter.set_normalize(false);
        filter.insert_new_keyframe(0);
        filter.set_filter(0, 7.5, 0.25);
        let mut restored = FrequencyFilterModifier::new();
        restored.json_to_state(&filter.state_to_json()).unwrap();
        assert_eq!(restored, filter);
    }
}
