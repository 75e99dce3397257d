//! Sine wave folder.

use super::{Component, ComponentType};
use crate::error::Result;
use crate::json::f32_or;
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, TweenRanges};
use morphwave_core::lerp;
use morphwave_spectral::WaveFrame;
use serde_json::{Map, Value};

const MIN_FOLD_PEAK: f32 = 1e-5;

/// Fold amount for one keyframe.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFoldKeyframe {
    /// Multiplier on the folding depth; 1 leaves a normalised wave unchanged.
    pub wave_fold_boost: f32,
}

impl Default for WaveFoldKeyframe {
    fn default() -> Self {
        Self {
            wave_fold_boost: 1.0,
        }
    }
}

impl KeyframeData for WaveFoldKeyframe {
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32) {
        self.wave_fold_boost = lerp(from.wave_fold_boost, to.wave_fold_boost, t);
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
        self.wave_fold_boost = ranges.tween(
            prev.wave_fold_boost,
            from.wave_fold_boost,
            to.wave_fold_boost,
            next.wave_fold_boost,
            t,
        );
    }
}

/// Modifier folding the wave back on itself through a sine.
///
/// Samples are first mapped onto `[-pi/2, pi/2]` by `asin` of the
/// peak-normalised value, scaled by the boost (and by the original peak when
/// it exceeds 1), then sent through `sin`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFoldModifier {
    track: KeyframeTrack<WaveFoldKeyframe>,
}

impl WaveFoldModifier {
    /// A folder with no keyframes.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
        }
    }

    /// Set the boost of keyframe `index`.
    pub fn set_boost(&mut self, index: usize, boost: f32) {
        if let Some(keyframe) = self.track.data_mut(index) {
            keyframe.wave_fold_boost = boost;
        }
    }
}

impl Default for WaveFoldModifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for WaveFoldModifier {
    type Keyframe = WaveFoldKeyframe;
    const TYPE: ComponentType = ComponentType::WaveFolder;

    fn track(&self) -> &KeyframeTrack<WaveFoldKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<WaveFoldKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> WaveFoldKeyframe {
        WaveFoldKeyframe::default()
    }

    fn render_keyframe(&self, keyframe: &WaveFoldKeyframe, frame: &mut WaveFrame) {
        let peak = frame.max_zero_offset();
        if peak < MIN_FOLD_PEAK {
            return;
        }
        let boost = peak.max(1.0) * keyframe.wave_fold_boost;
        for sample in &mut frame.time_domain {
            let angle = (*sample / peak).clamp(-1.0, 1.0).asin();
            *sample = (boost * angle).sin();
        }
        frame.to_frequency_domain();
    }

    fn keyframe_to_json(&self, keyframe: &WaveFoldKeyframe, out: &mut Map<String, Value>) {
        out.insert("wave_fold_boost".into(), keyframe.wave_fold_boost.into());
    }

    fn keyframe_from_json(&self, keyframe: &mut WaveFoldKeyframe, data: &Value) -> Result<()> {
        keyframe.wave_fold_boost = f32_or(data, "wave_fold_boost", 1.0);
        Ok(())
    }
}
