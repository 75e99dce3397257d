//! Canonical wave shapes, built once per process.
//!
//! Every default keyframe and the "init" wavetables start from one of these.
//! Frames are created lazily on first access and never mutated afterwards,
//! so they are safe to read from any thread.

use crate::wave_frame::{WAVEFORM_SIZE, WaveFrame};
use rustfft::num_complex::Complex32;
use std::f32::consts::PI;
use std::sync::OnceLock;

const SATURATION_DRIVE: f32 = 3.0;
const PULSE_DUTY: f32 = 0.25;

static FRAMES: OnceLock<[WaveFrame; Shape::COUNT]> = OnceLock::new();

/// The predefined shapes, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Pure sine.
    Sin,
    /// Sine pushed through `tanh`.
    SaturatedSin,
    /// Triangle, peaking at a quarter cycle.
    Triangle,
    /// 50% square.
    Square,
    /// 25% pulse.
    Pulse,
    /// Band-limited rising saw.
    Saw,
}

impl Shape {
    /// Number of predefined shapes.
    pub const COUNT: usize = 6;

    /// All shapes in table order.
    pub const ALL: [Shape; Self::COUNT] = [
        Shape::Sin,
        Shape::SaturatedSin,
        Shape::Triangle,
        Shape::Square,
        Shape::Pulse,
        Shape::Saw,
    ];

    /// Table index of this shape.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Sin => "sin",
            Shape::SaturatedSin => "saturated sin",
            Shape::Triangle => "triangle",
            Shape::Square => "square",
            Shape::Pulse => "pulse",
            Shape::Saw => "saw",
        }
    }
}

/// Access to the shared predefined frames.
pub struct PredefinedWaveFrames;

impl PredefinedWaveFrames {
    /// The frame for `shape`, with both domains in sync.
    pub fn get(shape: Shape) -> &'static WaveFrame {
        &Self::frames()[shape.index()]
    }

    /// Force construction of every frame.
    pub fn init() {
        let _ = Self::frames();
    }

    fn frames() -> &'static [WaveFrame; Shape::COUNT] {
        FRAMES.get_or_init(|| Shape::ALL.map(build))
    }
}

fn build(shape: Shape) -> WaveFrame {
    match shape {
        Shape::Sin => from_phase(|phase| (2.0 * PI * phase).sin()),
        Shape::SaturatedSin => from_phase(|phase| {
            (SATURATION_DRIVE * (2.0 * PI * phase).sin()).tanh() / SATURATION_DRIVE.tanh()
        }),
        Shape::Triangle => from_phase(|phase| {
            if phase < 0.25 {
                4.0 * phase
            } else if phase < 0.75 {
                2.0 - 4.0 * phase
            } else {
                4.0 * phase - 4.0
            }
        }),
        Shape::Square => from_phase(|phase| if phase < 0.5 { 1.0 } else { -1.0 }),
        Shape::Pulse => from_phase(|phase| if phase < PULSE_DUTY { 1.0 } else { -1.0 }),
        Shape::Saw => saw(),
    }
}

fn from_phase(shape: impl Fn(f32) -> f32) -> WaveFrame {
    let mut frame = WaveFrame::new();
    for (i, sample) in frame.time_domain.iter_mut().enumerate() {
        *sample = shape(i as f32 / WAVEFORM_SIZE as f32);
    }
    frame.to_frequency_domain();
    frame
}

// Additive saw: harmonic k at 2 / (pi k) with alternating sign, up to Nyquist.
fn saw() -> WaveFrame {
    let mut frame = WaveFrame::new();
    let half = WAVEFORM_SIZE / 2;
    let scale = half as f32 * 2.0 / PI;
    for k in 1..half {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        frame.frequency_domain[k] = Complex32::new(0.0, -sign * scale / k as f32);
    }
    frame.to_time_domain();
    frame.normalize(true);
    frame.to_frequency_domain();
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_peaks_at_one() {
        for shape in Shape::ALL {
            let frame = PredefinedWaveFrames::get(shape);
            let peak = frame.max_zero_offset();
            assert!((peak - 1.0).abs() < 1e-4, "{}: peak {peak}", shape.name());
        }
    }

    #[test]
    fn test_domains_are_consistent() {
        for shape in Shape::ALL {
            let stored = PredefinedWaveFrames::get(shape);
            let mut resynced = stored.clone();
            resynced.to_time_domain();
            for (a, b) in resynced.time_domain.iter().zip(&stored.time_domain) {
                assert!((a - b).abs() < 1e-4, "{}: {a} vs {b}", shape.name());
            }
        }
    }

    #[test]
    fn test_saw_rises_through_first_half() {
        let saw = PredefinedWaveFrames::get(Shape::Saw);
        let quarter = saw.time_domain[WAVEFORM_SIZE / 4];
        assert!((quarter - 0.5).abs() < 0.1, "quarter = {quarter}");
        assert!(saw.time_domain[3 * WAVEFORM_SIZE / 4] < -0.4);
    }

    #[test]
    fn test_square_has_only_odd_harmonics() {
        let square = PredefinedWaveFrames::get(Shape::Square);
        assert!(square.frequency_domain[1].norm() > 100.0);
        assert!(square.frequency_domain[2].norm() < 1e-2);
        assert!(square.frequency_domain[3].norm() > 100.0);
    }
}
