//! Harmonic phase rotation.

use super::{Component, ComponentType};
use crate::error::Result;
use crate::json::{f32_or, i32_or};
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, TweenRanges};
use morphwave_core::lerp;
use morphwave_spectral::{Complex32, WaveFrame};
use serde_json::{Map, Value};

/// How the phase offset is spread over the harmonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseShiftStyle {
    /// Harmonic `i` turns by `phase * i`: a time shift.
    #[default]
    Normal,
    /// As `Normal`, with odd harmonics turning the other way.
    EvenOdd,
    /// Every harmonic turns by `phase`.
    Harmonic,
    /// As `Harmonic`, with odd harmonics turning the other way.
    HarmonicEvenOdd,
    /// Blend towards zero phase on every harmonic.
    Clear,
}

impl PhaseShiftStyle {
    fn from_index(index: i32) -> Self {
        match index {
            1 => PhaseShiftStyle::EvenOdd,
            2 => PhaseShiftStyle::Harmonic,
            3 => PhaseShiftStyle::HarmonicEvenOdd,
            4 => PhaseShiftStyle::Clear,
            _ => PhaseShiftStyle::Normal,
        }
    }

    fn index(self) -> i32 {
        self as i32
    }

    fn rotation(self, phase: f32, harmonic: usize) -> f32 {
        let odd_sign = if harmonic % 2 == 1 { -1.0 } else { 1.0 };
        match self {
            PhaseShiftStyle::Normal => phase * harmonic as f32,
            PhaseShiftStyle::EvenOdd => odd_sign * phase * harmonic as f32,
            PhaseShiftStyle::Harmonic => phase,
            PhaseShiftStyle::HarmonicEvenOdd => odd_sign * phase,
            PhaseShiftStyle::Clear => 0.0,
        }
    }
}

/// Rotation and wet amount for one keyframe.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseKeyframe {
    /// Rotation in radians.
    pub phase: f32,
    /// Wet amount in `[0, 1]`.
    pub mix: f32,
}

impl Default for PhaseKeyframe {
    fn default() -> Self {
        Self {
            phase: 0.0,
            mix: 1.0,
        }
    }
}

impl KeyframeData for PhaseKeyframe {
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32) {
        self.phase = lerp(from.phase, to.phase, t);
        self.mix = lerp(from.mix, to.mix, t);
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
        self.phase = ranges.tween(prev.phase, from.phase, to.phase, next.phase, t);
        self.mix = ranges.tween(prev.mix, from.mix, to.mix, next.mix, t);
    }
}

/// Modifier rotating harmonic phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseModifier {
    track: KeyframeTrack<PhaseKeyframe>,
    style: PhaseShiftStyle,
}

impl PhaseModifier {
    /// A time-shift modifier.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
            style: PhaseShiftStyle::Normal,
        }
    }

    /// Spread style.
    pub fn style(&self) -> PhaseShiftStyle {
        self.style
    }

    /// Set the spread style.
    pub fn set_style(&mut self, style: PhaseShiftStyle) {
        self.style = style;
    }

    /// Set the rotation and mix of keyframe `index`.
    pub fn set_phase(&mut self, index: usize, phase: f32, mix: f32) {
        if let Some(keyframe) = self.track.data_mut(index) {
            keyframe.phase = phase;
            keyframe.mix = mix.clamp(0.0, 1.0);
        }
    }
}

impl Default for PhaseModifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PhaseModifier {
    type Keyframe = PhaseKeyframe;
    const TYPE: ComponentType = ComponentType::PhaseModifier;

    fn track(&self) -> &KeyframeTrack<PhaseKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<PhaseKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> PhaseKeyframe {
        PhaseKeyframe::default()
    }

    fn render_keyframe(&self, keyframe: &PhaseKeyframe, frame: &mut WaveFrame) {
        // DC has no phase to turn
        for (harmonic, bin) in frame.frequency_domain.iter_mut().enumerate().skip(1) {
            let shifted = if self.style == PhaseShiftStyle::Clear {
                Complex32::new(bin.norm(), 0.0)
            } else {
                let rotation = self.style.rotation(keyframe.phase, harmonic);
                *bin * Complex32::from_polar(1.0, -rotation)
            };
            *bin = *bin + (shifted - *bin) * keyframe.mix;
        }
        frame.to_time_domain();
    }

    fn keyframe_to_json(&self, keyframe: &PhaseKeyframe, out: &mut Map<String, Value>) {
        out.insert("phase".into(), keyframe.phase.into());
        out.insert("mix".into(), keyframe.mix.into());
    }

    fn keyframe_from_json(&self, keyframe: &mut PhaseKeyframe, data: &Value) -> Result<()> {
        keyframe.phase = f32_or(data, "phase", 0.0);
        keyframe.mix = f32_or(data, "mix", 1.0);
        Ok(())
    }

    fn settings_to_json(&self, out: &mut Map<String, Value>) {
        out.insert("style".into(), self.style.index().into());
    }

    fn settings_from_json(&mut self, data: &Value) -> Result<()> {
        self.style = PhaseShiftStyle::from_index(i32_or(data, "style", 0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphwave_spectral::{PredefinedWaveFrames, Shape, WAVEFORM_SIZE};
    use std::f32::consts::TAU;

    #[test]
    fn test_normal_style_shifts_in_time() {
        let mut modifier = PhaseModifier::new();
        modifier.insert_new_keyframe(0);
        // a quarter cycle later
        modifier.set_phase(0, TAU / 4.0, 1.0);
        let mut frame = PredefinedWaveFrames::get(Shape::Saw).clone();
        modifier.render(&mut frame, 0.0);
        let original = &PredefinedWaveFrames::get(Shape::Saw).time_domain;
        let quarter = WAVEFORM_SIZE / 4;
        for i in (0..WAVEFORM_SIZE).step_by(101) {
            let expected = original[(i + WAVEFORM_SIZE - quarter) % WAVEFORM_SIZE];
            assert!((frame.time_domain[i] - expected).abs() < 1e-3, "sample {i}");
        }
    }

    #[test]
    fn test_zero_mix_is_identity() {
        let mut modifier = PhaseModifier::new();
        modifier.set_style(PhaseShiftStyle::HarmonicEvenOdd);
        modifier.insert_new_keyframe(0);
        modifier.set_phase(0, 1.3, 0.0);
        let mut frame = PredefinedWaveFrames::get(Shape::Square).clone();
        modifier.render(&mut frame, 0.0);
        let original = PredefinedWaveFrames::get(Shape::Square);
        for (a, b) in frame.time_domain.iter().zip(&original.time_domain) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rotation_keeps_amplitudes() {
        let mut modifier = PhaseModifier::new();
        modifier.set_style(PhaseShiftStyle::Harmonic);
        modifier.insert_new_keyframe(0);
        modifier.set_phase(0, 2.0, 1.0);
        let mut frame = PredefinedWaveFrames::get(Shape::Saw).clone();
        let before: Vec<f32> = frame.frequency_domain.iter().map(|b| b.norm()).collect();
        modifier.render(&mut frame, 0.0);
        for (bin, amplitude) in frame.frequency_domain.iter().zip(before).skip(1).take(100) {
            assert!((bin.norm() - amplitude).abs() < 1e-2 * amplitude.max(1.0));
        }
    }

    #[test]
    fn test_clear_zeroes_phases() {
        let mut modifier = PhaseModifier::new();
        modifier.set_style(PhaseShiftStyle::Clear);
        modifier.insert_new_keyframe(0);
        let mut frame = PredefinedWaveFrames::get(Shape::Saw).clone();
        modifier.render(&mut frame, 0.0);
        for bin in &frame.frequency_domain[1..64] {
            assert!(bin.im.abs() < 1e-3 * bin.norm().max(1.0));
            assert!(bin.re >= 0.0);
        }
    }

    #[test]
    fn test_style_rotation() {
        assert_eq!(PhaseShiftStyle::Normal.rotation(0.5, 3), 1.5);
        assert_eq!(PhaseShiftStyle::EvenOdd.rotation(0.5, 3), -1.5);
        assert_eq!(PhaseShiftStyle::EvenOdd.rotation(0.5, 2), 1.0);
        assert_eq!(PhaseShiftStyle::Harmonic.rotation(0.5, 7), 0.5);
        assert_eq!(PhaseShiftStyle::HarmonicEvenOdd.rotation(0.5, 7), -0.5);
    }
}
