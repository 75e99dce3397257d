//! Drawn or pasted single-cycle waves.

use super::{Component, ComponentType};
use crate::encoding::{decode_f32, encode_f32};
use crate::error::Result;
use crate::json::{i32_or, str_field};
use crate::keyframe::{InterpolationStyle, KeyframeData, KeyframeTrack, TweenRanges};
use morphwave_core::lerp;
use morphwave_spectral::{Complex32, WAVEFORM_SIZE, WaveFrame};
use serde_json::{Map, Value};
use std::f32::consts::{PI, TAU};

/// Domain a [`WaveSource`] blends its keyframes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveSourceMode {
    /// Blend samples.
    #[default]
    Time,
    /// Blend harmonic amplitudes and phases.
    Frequency,
}

impl WaveSourceMode {
    pub(crate) fn from_index(index: i32) -> Self {
        if index == 1 {
            WaveSourceMode::Frequency
        } else {
            WaveSourceMode::Time
        }
    }

    pub(crate) fn index(self) -> i32 {
        match self {
            WaveSourceMode::Time => 0,
            WaveSourceMode::Frequency => 1,
        }
    }
}

/// One stored wave.
///
/// `mode` is the blend mode of the scratch keyframe being written into; the
/// owning [`WaveSource`] sets it before interpolating.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSourceKeyframe {
    /// The wave, both domains in sync.
    pub frame: WaveFrame,
    /// Blend domain used when this keyframe is an interpolation target.
    pub mode: WaveSourceMode,
}

impl WaveSourceKeyframe {
    /// A silent keyframe.
    pub fn new(mode: WaveSourceMode) -> Self {
        Self {
            frame: WaveFrame::new(),
            mode,
        }
    }

    /// Replace the wave with `samples` and resync its spectrum.
    pub fn set_time_domain(&mut self, samples: &[f32]) {
        let len = samples.len().min(WAVEFORM_SIZE);
        self.frame.time_domain[..len].copy_from_slice(&samples[..len]);
        self.frame.time_domain[len..].fill(0.0);
        self.frame.to_frequency_domain();
    }

    /// Replace the wave with a copy of `frame`.
    pub fn set_frame(&mut self, frame: &WaveFrame) {
        self.frame.copy_from(frame);
    }
}

impl KeyframeData for WaveSourceKeyframe {
    fn interpolate(&mut self, from: &Self, to: &Self, t: f32) {
        if t <= 0.0 {
            self.frame.copy_from(&from.frame);
            return;
        }
        if t >= 1.0 {
            self.frame.copy_from(&to.frame);
            return;
        }

        match self.mode {
            WaveSourceMode::Time => {
                for ((out, a), b) in self
                    .frame
                    .time_domain
                    .iter_mut()
                    .zip(&from.frame.time_domain)
                    .zip(&to.frame.time_domain)
                {
                    *out = lerp(*a, *b, t);
                }
                self.frame.to_frequency_domain();
            }
            WaveSourceMode::Frequency => {
                blend_spectra(
                    &mut self.frame.frequency_domain,
                    &from.frame.frequency_domain,
                    &to.frame.frequency_domain,
                    t,
                );
                self.frame.to_time_domain();
            }
        }
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
        if t <= 0.0 || t >= 1.0 {
            self.interpolate(from, to, t);
            return;
        }

        match self.mode {
            WaveSourceMode::Time => {
                for i in 0..WAVEFORM_SIZE {
                    self.frame.time_domain[i] = ranges.tween(
                        prev.frame.time_domain[i],
                        from.frame.time_domain[i],
                        to.frame.time_domain[i],
                        next.frame.time_domain[i],
                        t,
                    );
                }
                self.frame.to_frequency_domain();
            }
            WaveSourceMode::Frequency => {
                let bins = self.frame.frequency_domain.len();
                for i in 0..bins {
                    let p = prev.frame.frequency_domain[i];
                    let a = from.frame.frequency_domain[i];
                    let b = to.frame.frequency_domain[i];
                    let n = next.frame.frequency_domain[i];

                    let amplitude = ranges
                        .tween(p.norm().sqrt(), a.norm().sqrt(), b.norm().sqrt(), n.norm().sqrt(), t)
                        .max(0.0);
                    let phase_from = a.arg();
                    let phase_prev = phase_from + wrap_phase(p.arg() - phase_from);
                    let phase_to = phase_from + wrap_phase(b.arg() - phase_from);
                    let phase_next = phase_to + wrap_phase(n.arg() - phase_to);
                    let phase = ranges.tween(phase_prev, phase_from, phase_to, phase_next, t);
                    self.frame.frequency_domain[i] = Complex32::from_polar(amplitude * amplitude, phase);
                }
                self.frame.to_time_domain();
            }
        }
    }
}

/// Blend two spectra bin by bin.
///
/// Amplitudes blend on a square-root curve; phases travel the shorter way
/// around the circle.
pub(crate) fn blend_spectra(dest: &mut [Complex32], from: &[Complex32], to: &[Complex32], t: f32) {
    for ((out, a), b) in dest.iter_mut().zip(from).zip(to) {
        let amplitude = lerp(a.norm().sqrt(), b.norm().sqrt(), t);
        let phase_from = a.arg();
        let phase = phase_from + t * wrap_phase(b.arg() - phase_from);
        *out = Complex32::from_polar(amplitude * amplitude, phase);
    }
}

/// Wrap a phase difference into `[-pi, pi]`.
pub(crate) fn wrap_phase(phase: f32) -> f32 {
    phase - TAU * ((phase + PI) / TAU).floor()
}

/// Source component holding one wave per keyframe.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSource {
    track: KeyframeTrack<WaveSourceKeyframe>,
    mode: WaveSourceMode,
}

impl WaveSource {
    /// An empty wave source.
    pub fn new() -> Self {
        Self {
            track: KeyframeTrack::new(InterpolationStyle::Linear),
            mode: WaveSourceMode::Time,
        }
    }

    /// Blend domain.
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

    /// Insert a keyframe at `position` holding a copy of `frame`.
    pub fn insert_frame(&mut self, position: i32, frame: &WaveFrame) -> usize {
        let mut keyframe = WaveSourceKeyframe::new(self.mode);
        keyframe.set_frame(frame);
        self.track.insert(position, keyframe)
    }
}

impl Default for WaveSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for WaveSource {
    type Keyframe = WaveSourceKeyframe;
    const TYPE: ComponentType = ComponentType::WaveSource;

    fn track(&self) -> &KeyframeTrack<WaveSourceKeyframe> {
        &self.track
    }

    fn track_mut(&mut self) -> &mut KeyframeTrack<WaveSourceKeyframe> {
        &mut self.track
    }

    fn default_keyframe(&self) -> WaveSourceKeyframe {
        WaveSourceKeyframe::new(self.mode)
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

pub(crate) fn wave_keyframe_to_json(keyframe: &WaveSourceKeyframe, out: &mut Map<String, Value>) {
    out.insert("wave_data".into(), encode_f32(&keyframe.frame.time_domain).into());
}

pub(crate) fn wave_keyframe_from_json(keyframe: &mut WaveSourceKeyframe, data: &Value) -> Result<()> {
    let samples = decode_f32(str_field(data, "wave_data")?)?;
    keyframe.set_time_domain(&samples);
    Ok(())
}
