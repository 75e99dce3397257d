//! Phase distortion applied per sample before the wave buffer is read.
//!
//! A distortion remaps the playback phase and may return a window gain. The
//! control amount is remapped once per block with [`DistortionType::value`],
//! then [`DistortionType::apply`] runs per sample.

use morphwave_core::{lerp, wrap_unit};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Highest sync ratio, in native cycles per cycle.
pub const MAX_SYNC: f32 = 16.0;
/// Most phase steps the quantizer uses, as a power of two above 2.
const QUANTIZE_BITS: f32 = 10.0;
/// Narrowest pulse width.
const MIN_PULSE_WIDTH: f32 = 1.0 / 64.0;

/// How the oscillator distorts its read phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistortionType {
    /// Plain playback.
    #[default]
    None,
    /// Hard sync.
    Sync,
    /// Hard sync with a half-sine window over the native cycle.
    Formant,
    /// Phase quantisation.
    Quantize,
    /// Asymmetric ease of the phase.
    Bend,
    /// Compress one half of the cycle, stretch the other.
    Squeeze,
    /// Play the cycle faster and stay silent for the rest.
    PulseWidth,
    /// Phase modulation from oscillator A.
    FmOscA,
    /// Phase modulation from oscillator B.
    FmOscB,
    /// Phase modulation from the sample player.
    FmSample,
    /// Ring modulation from oscillator A.
    RmOscA,
    /// Ring modulation from oscillator B.
    RmOscB,
    /// Ring modulation from the sample player.
    RmSample,
}

impl DistortionType {
    /// Every distortion, in control order.
    pub const ALL: [DistortionType; 13] = [
        DistortionType::None,
        DistortionType::Sync,
        DistortionType::Formant,
        DistortionType::Quantize,
        DistortionType::Bend,
        DistortionType::Squeeze,
        DistortionType::PulseWidth,
        DistortionType::FmOscA,
        DistortionType::FmOscB,
        DistortionType::FmSample,
        DistortionType::RmOscA,
        DistortionType::RmOscB,
        DistortionType::RmSample,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            DistortionType::None => "None",
            DistortionType::Sync => "Sync",
            DistortionType::Formant => "Formant",
            DistortionType::Quantize => "Quantize",
            DistortionType::Bend => "Bend",
            DistortionType::Squeeze => "Squeeze",
            DistortionType::PulseWidth => "Pulse Width",
            DistortionType::FmOscA => "FM <- Osc A",
            DistortionType::FmOscB => "FM <- Osc B",
            DistortionType::FmSample => "FM <- Sample",
            DistortionType::RmOscA => "RM <- Osc A",
            DistortionType::RmOscB => "RM <- Osc B",
            DistortionType::RmSample => "RM <- Sample",
        }
    }

    /// True for the frequency-modulation types.
    pub fn is_fm(self) -> bool {
        matches!(
            self,
            DistortionType::FmOscA | DistortionType::FmOscB | DistortionType::FmSample
        )
    }

    /// True for the ring-modulation types.
    pub fn is_rm(self) -> bool {
        matches!(
            self,
            DistortionType::RmOscA | DistortionType::RmOscB | DistortionType::RmSample
        )
    }

    /// True when the distortion reads an external modulator buffer.
    pub fn uses_modulator(self) -> bool {
        self.is_fm() || self.is_rm()
    }

    /// Remap a control amount in `[0, 1]` to the per-sample value.
    ///
    /// | Type | Value |
    /// |------|-------|
    /// | sync, formant | sync ratio `16^amount` |
    /// | quantize | step count `2^(1 + (1 - amount)^3 * 10)` |
    /// | pulse width | phase scale `1 / max(1 - amount, 1/64)` |
    /// | FM | modulation depth `amount^2` |
    /// | others | `amount` |
    pub fn value(self, amount: f32) -> f32 {
        let amount = amount.clamp(0.0, 1.0);
        match self {
            DistortionType::Sync | DistortionType::Formant => MAX_SYNC.powf(amount),
            DistortionType::Quantize => {
                let inverse = 1.0 - amount;
                (1.0 + inverse * inverse * inverse * QUANTIZE_BITS).exp2()
            }
            DistortionType::PulseWidth => 1.0 / (1.0 - amount).max(MIN_PULSE_WIDTH),
            DistortionType::FmOscA | DistortionType::FmOscB | DistortionType::FmSample => {
                amount * amount
            }
            DistortionType::None
            | DistortionType::Bend
            | DistortionType::Squeeze
            | DistortionType::RmOscA
            | DistortionType::RmOscB
            | DistortionType::RmSample => amount,
        }
    }

    /// Distort `phase` in `[0, 1)`.
    ///
    /// `value` comes from [`value`](Self::value), `offset` rotates where in
    /// the cycle the distortion is anchored, and `modulator` is the external
    /// sample for FM and RM (ignored otherwise).
    ///
    /// Returns the phase to read and the gain to apply to the read sample.
    #[inline]
    pub fn apply(self, phase: f32, value: f32, offset: f32, modulator: f32) -> (f32, f32) {
        let local = if offset == 0.0 {
            phase
        } else {
            wrap_unit(phase - offset)
        };
        let (distorted, window) = self.remap(local, value, modulator);
        let distorted = if offset == 0.0 {
            distorted
        } else {
            wrap_unit(distorted + offset)
        };
        (distorted, window)
    }

    #[inline]
    fn remap(self, phase: f32, value: f32, modulator: f32) -> (f32, f32) {
        match self {
            DistortionType::None => (phase, 1.0),
            DistortionType::Sync => (wrap_unit(phase * value), 1.0),
            DistortionType::Formant => (wrap_unit(phase * value), (PI * phase).sin()),
            DistortionType::Quantize => ((phase * value).floor() / value, 1.0),
            DistortionType::Bend => (bend(phase, value), 1.0),
            DistortionType::Squeeze => (squeeze(phase, value), 1.0),
            DistortionType::PulseWidth => {
                let scaled = phase * value;
                if scaled >= 1.0 {
                    (0.0, 0.0)
                } else {
                    (scaled, 1.0)
                }
            }
            DistortionType::FmOscA | DistortionType::FmOscB | DistortionType::FmSample => {
                (wrap_unit(phase + modulator * value), 1.0)
            }
            DistortionType::RmOscA | DistortionType::RmOscB | DistortionType::RmSample => {
                (phase, lerp(1.0, modulator, value))
            }
        }
    }
}

// Cubic Hermite from (0, 0) to (1, 1) with start slope 1 + 2a and end slope
// 1 - a. Slopes stay inside the monotone region for a in [0, 1].
#[inline]
fn bend(phase: f32, amount: f32) -> f32 {
    let start_slope = 1.0 + 2.0 * amount;
    let end_slope = 1.0 - amount;
    let p2 = phase * phase;
    let p3 = p2 * phase;
    let bent = (p3 - 2.0 * p2 + phase) * start_slope + (-2.0 * p3 + 3.0 * p2) + (p3 - p2) * end_slope;
    bent.clamp(0.0, 1.0)
}

// The first half of the output cycle is read from [0, pivot], the second
// from [pivot, 1].
#[inline]
fn squeeze(phase: f32, amount: f32) -> f32 {
    let pivot = 0.5 - 0.25 * amount;
    if phase < pivot {
        0.5 * phase / pivot
    } else {
        0.5 + 0.5 * (phase - pivot) / (1.0 - pivot)
    }
}
