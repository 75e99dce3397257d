//! Octave-looping source.
//!
//! A Shepard tone source holds one wave and spans the whole table without
//! keyframes: position 0 plays the wave, the last position plays the wave an
//! octave up, and positions between blend the two in the source's
//! [`WaveSourceMode`] domain, as a [`WaveSource`](super::WaveSource) does.
//! Tables built from it are flagged so the oscillator can fold the octave
//! back on wrap.

use super::wave_source::{wave_keyframe_from_json, wave_keyframe_to_json};
use super::{Component, ComponentType, WaveSourceKeyframe, WaveSourceMode};
use crate::error::Result;
use crate::json::i32_or;
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, NUM_OSCILLATOR_WAVE_FRAMES};
use morphwave_spectral::WaveFrame;
use serde_json::{Map, Value};

/// Source blending a wave into its own octave across the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ShepardToneSource {
    track: KeyframeTrack<WaveSourceKeyframe>,
    mode: WaveSourceMode,
}

impl ShepardToneSource {
    /// An empty Shepard tone source.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
            mode: WaveSourceMode::Time,
        }
    }

    /// Blend domain between the wave and its octave.
    pub fn mode(&self) -> WaveSourceMode {
        self.mode
    }

    /// Set the blend domain.
    pub fn set_mode(&mut self, mode: WaveSourceMode) {
        self.mode = mode;
        for keyframe in self.track.data_iter_mut() {
            keyframe.mode = mode;
        }
    }

    /// Wave at keyframe `index`.
    pub fn wave_frame_mut(&mut self, index: usize) -> Option<&mut WaveFrame> {
        self.track.data_mut(index).map(|k| &mut k.frame)
    }

    /// The wave moved up one octave: harmonic `i` becomes harmonic `2i`.
    pub fn octave_up(frame: &WaveFrame) -> WaveFrame {
        let mut looped = WaveFrame::new();
        let bins = frame.frequency_domain.len();
        for (i, bin) in frame.frequency_domain.iter().enumerate().take(bins.div_ceil(2)) {
            looped.frequency_domain[2 * i] = *bin;
        }
        looped.to_time_domain();
        looped
    }
}

impl Default for ShepardToneSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ShepardToneSource {
    type Keyframe = WaveSourceKeyframe;
    const TYPE: ComponentType = ComponentType::ShepardToneSource;

    fn track(&self) -> &KeyframeTrack<WaveSourceKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<WaveSourceKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> WaveSourceKeyframe {
        WaveSourceKeyframe::new(self.mode)
    }

    fn has_keyframes(&self) -> bool {
        false
    }

    fn render(&self, frame: &mut WaveFrame, position: f32) {
        let Some(first) = self.track.get(0) else {
            return;
        };
        let base = &first.data;
        let mut looped = WaveSourceKeyframe::new(self.mode);
        looped.frame = Self::octave_up(&base.frame);

        let t = position / (NUM_OSCILLATOR_WAVE_FRAMES - 1) as f32;
        let mut blended = WaveSourceKeyframe::new(self.mode);
        blended.interpolate(base, &looped, t.clamp(0.0, 1.0));
        self.render_keyframe(&blended, frame);
    }

    fn render_keyframe(&self, keyframe: &WaveSourceKeyframe, frame: &mut WaveFrame) {
        frame.copy_from(&keyframe.frame);
    }

    fn keyframe_to_json(&self, keyframe: &WaveSourceKeyframe, out: &mut Map<String, Value>) {
        wave_keyframe_to_json(keyframe, out);
    }

    fn keyframe_from_json(&self, keyframe: &mut WaveSourceKeyframe, data: &Value) -> Result<()> {
        wave_keyframe_from_json(keyframe, data)
    }

    fn settings_to_json(&self, out: &mut Map<String, Value>) {
        out.insert("interpolation".into(), self.mode.index().into());
    }

    fn settings_from_json(&mut self, data: &Value) -> Result<()> {
        self.mode = WaveSourceMode::from_index(i32_or(data, "interpolation", 0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphwave_spectral::{PredefinedWaveFrames, Shape, WAVEFORM_SIZE};

    fn shepard() -> ShepardToneSource {
        let mut source = ShepardToneSource::new();
        source.insert_new_keyframe(0);
        if let Some(frame) = source.wave_frame_mut(0) {
            frame.copy_from(PredefinedWaveFrames::get(Shape::Sin));
        }
        source
    }

    #[test]
    fn test_ends_are_wave_and_octave() {
        let source = shepard();
        let mut frame = WaveFrame::new();
        source.render(&mut frame, 0.0);
        assert_eq!(frame.time_domain, PredefinedWaveFrames::get(Shape::Sin).time_domain);

        source.render(&mut frame, (NUM_OSCILLATOR_WAVE_FRAMES - 1) as f32);
        let eighth = WAVEFORM_SIZE / 8;
        // a sine an octave up peaks at an eighth of the cycle
        assert!((frame.time_domain[eighth] - 1.0).abs() < 1e-3);
        assert!(frame.frequency_domain[1].norm() < 1e-2);
        assert!(frame.frequency_domain[2].norm() > 100.0);
    }

    #[test]
    fn test_midpoint_follows_blend_mode() {
        let middle = ((NUM_OSCILLATOR_WAVE_FRAMES - 1) / 2) as f32;
        let t = middle / (NUM_OSCILLATOR_WAVE_FRAMES - 1) as f32;
        let fundamental = PredefinedWaveFrames::get(Shape::Sin).frequency_domain[1].norm();

        let mut source = shepard();
        let mut frame = WaveFrame::new();
        source.render(&mut frame, middle);
        let time_ratio = frame.frequency_domain[1].norm() / fundamental;

        source.set_mode(WaveSourceMode::Frequency);
        source.render(&mut frame, middle);
        let freq_ratio = frame.frequency_domain[1].norm() / fundamental;

        // time blends scale amplitude linearly, frequency blends tween sqrt amplitude
        assert!((time_ratio - (1.0 - t)).abs() < 1e-3, "time {time_ratio}");
        assert!((freq_ratio - (1.0 - t) * (1.0 - t)).abs() < 1e-3, "freq {freq_ratio}");
    }

    #[test]
    fn test_mode_survives_state() {
        let mut source = shepard();
        source.set_mode(WaveSourceMode::Frequency);
        let mut out = Map::new();
        source.settings_to_json(&mut out);

        let mut restored = ShepardToneSource::new();
        restored.settings_from_json(&Value::Object(out)).unwrap();
        assert_eq!(restored.mode(), WaveSourceMode::Frequency);
    }

    #[test]
    fn test_spans_whole_table() {
        let source = shepard();
        assert!(!source.has_keyframes());
        assert_eq!(source.last_keyframe_position(), NUM_OSCILLATOR_WAVE_FRAMES - 1);
    }
}
