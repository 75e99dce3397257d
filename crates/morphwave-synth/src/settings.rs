//! Serializable oscillator parameters.

use crate::distortion::DistortionType;
use crate::morph::SpectralMorph;
use crate::unison::StackStyle;
use serde::{Deserialize, Serialize};

/// Every parameter a [`SynthOscillator`](crate::SynthOscillator) reads.
///
/// Missing fields deserialize to their defaults, so presets only need to
/// name what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorSettings {
    /// Unison voices, 1 to 16.
    pub unison_voices: u32,
    /// Unison detune amount, 0 to 1.
    pub detune: f32,
    /// Full-scale detune in semitones.
    pub detune_range: f32,
    /// Detune spacing curve; 0 spaces voices evenly.
    pub detune_power: f32,
    /// Per-pair frequency multipliers.
    pub stack_style: StackStyle,
    /// 0 plays only the centre pair, 1 only the detuned voices.
    pub unison_blend: f32,
    /// 0 sums voices to mono, 1 splits them hard left and right.
    pub stereo_spread: f32,
    /// Position in the table, 0 (first frame) to 1 (last frame).
    pub wave_frame: f32,
    /// Per-voice spread of the table position, -1 to 1.
    pub frame_spread: f32,
    /// Spectral morph type.
    pub spectral_morph: SpectralMorph,
    /// Spectral morph amount, 0 to 1.
    pub spectral_morph_amount: f32,
    /// Distortion type.
    pub distortion: DistortionType,
    /// Distortion amount, 0 to 1.
    pub distortion_amount: f32,
    /// Where in the cycle the distortion is anchored, 0 to 1.
    pub distortion_phase: f32,
    /// How much of the phase is randomised on reset, 0 to 1.
    pub random_phase: f32,
    /// Transpose in semitones.
    pub transpose: f32,
    /// Fine tune in semitones, -1 to 1.
    pub tune: f32,
    /// Allowed pitch classes for the transpose (bit 0 = C). 0 disables
    /// quantisation.
    pub transpose_quantize: u16,
    /// Snap the sounding pitch rather than the transpose alone.
    pub quantize_global: bool,
    /// Follow the played note. When off the table plays at its native pitch.
    pub keytrack: bool,
    /// Output amplitude, 0 to 1, applied squared.
    pub level: f32,
    /// Pan, -1 (left) to 1 (right).
    pub pan: f32,
}

impl Default for OscillatorSettings {
    fn default() -> Self {
        Self {
            unison_voices: 1,
            detune: 0.2,
            detune_range: 2.0,
            detune_power: 1.5,
            stack_style: StackStyle::Normal,
            unison_blend: 0.8,
            stereo_spread: 1.0,
            wave_frame: 0.0,
            frame_spread: 0.0,
            spectral_morph: SpectralMorph::None,
            spectral_morph_amount: 0.5,
            distortion: DistortionType::None,
            distortion_amount: 0.5,
            distortion_phase: 0.0,
            random_phase: 1.0,
            transpose: 0.0,
            tune: 0.0,
            transpose_quantize: 0,
            quantize_global: false,
            keytrack: true,
            level: std::f32::consts::FRAC_1_SQRT_2,
            pan: 0.0,
        }
    }
}
