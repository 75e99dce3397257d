//! Preset and oscillator parameter validation.
//!
//! Every numeric [`OscillatorSettings`] field has a documented range in
//! [`OSCILLATOR_PARAMS`]. [`validate_preset`] checks all of them and reports
//! every violation at once.
//!
//! # Example
//!
//! ```rust
//! use morphwave_config::{validate_param_value, validate_preset, Preset};
//!
//! validate_preset(&Preset::new("Init")).expect("defaults are valid");
//! assert!(validate_param_value("detune", 1.5).is_err());
//! ```

use morphwave_synth::{MAX_UNISON, OscillatorSettings};
use thiserror::Error;

use crate::Preset;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// A field that is not a plain number holds an unusable value.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Range metadata for one numeric oscillator parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Field name as it appears in preset files.
    pub name: &'static str,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Default value.
    pub default: f32,
}

impl ParamRange {
    const fn new(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self { name, min, max, default }
    }

    /// Whether `value` lies inside the range. NaN never does.
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Every numeric oscillator parameter with its range and default.
pub const OSCILLATOR_PARAMS: &[ParamRange] = &[
    ParamRange::new("unison_voices", 1.0, MAX_UNISON as f32, 1.0),
    ParamRange::new("detune", 0.0, 1.0, 0.2),
    ParamRange::new("detune_range", 0.0, 48.0, 2.0),
    ParamRange::new("detune_power", -5.0, 5.0, 1.5),
    ParamRange::new("unison_blend", 0.0, 1.0, 0.8),
    ParamRange::new("stereo_spread", 0.0, 1.0, 1.0),
    ParamRange::new("wave_frame", 0.0, 1.0, 0.0),
    ParamRange::new("frame_spread", -1.0, 1.0, 0.0),
    ParamRange::new("spectral_morph_amount", 0.0, 1.0, 0.5),
    ParamRange::new("distortion_amount", 0.0, 1.0, 0.5),
    ParamRange::new("distortion_phase", 0.0, 1.0, 0.0),
    ParamRange::new("random_phase", 0.0, 1.0, 1.0),
    ParamRange::new("transpose", -48.0, 48.0, 0.0),
    ParamRange::new("tune", -1.0, 1.0, 0.0),
    ParamRange::new("level", 0.0, 1.0, std::f32::consts::FRAC_1_SQRT_2),
    ParamRange::new("pan", -1.0, 1.0, 0.0),
];

/// Bits a transpose quantize mask may set, one per pitch class.
const PITCH_CLASS_MASK: u16 = 0x0FFF;

/// Lowest and highest accepted sample rate hints.
const SAMPLE_RATE_RANGE: (u32, u32) = (8000, 384_000);

/// Look up the range of a parameter by name.
///
/// Names are matched case-insensitively; spaces and dashes count as
/// underscores.
pub fn param_range(name: &str) -> Option<&'static ParamRange> {
    let normalized = normalize_param_name(name);
    OSCILLATOR_PARAMS.iter().find(|p| p.name == normalized)
}

fn normalize_param_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Validate a single parameter value.
pub fn validate_param_value(name: &str, value: f32) -> ValidationResult<()> {
    let range = param_range(name).ok_or_else(|| ValidationError::UnknownParameter(name.to_string()))?;
    if range.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: range.name.to_string(),
            value,
            min: range.min,
            max: range.max,
        })
    }
}

/// The numeric fields of `settings`, in [`OSCILLATOR_PARAMS`] order.
pub fn numeric_values(settings: &OscillatorSettings) -> [(&'static str, f32); 16] {
    [
        ("unison_voices", settings.unison_voices as f32),
        ("detune", settings.detune),
        ("detune_range", settings.detune_range),
        ("detune_power", settings.detune_power),
        ("unison_blend", settings.unison_blend),
        ("stereo_spread", settings.stereo_spread),
        ("wave_frame", settings.wave_frame),
        ("frame_spread", settings.frame_spread),
        ("spectral_morph_amount", settings.spectral_morph_amount),
        ("distortion_amount", settings.distortion_amount),
        ("distortion_phase", settings.distortion_phase),
        ("random_phase", settings.random_phase),
        ("transpose", settings.transpose),
        ("tune", settings.tune),
        ("level", settings.level),
        ("pan", settings.pan),
    ]
}

fn collect_settings_errors(settings: &OscillatorSettings, errors: &mut Vec<ValidationError>) {
    for (name, value) in numeric_values(settings) {
        if let Err(e) = validate_param_value(name, value) {
            errors.push(e);
        }
    }
    if settings.transpose_quantize & !PITCH_CLASS_MASK != 0 {
        errors.push(ValidationError::InvalidFormat {
            param: "transpose_quantize".to_string(),
            reason: format!(
                "mask {:#06x} sets bits above the twelve pitch classes",
                settings.transpose_quantize
            ),
        });
    }
}

fn finish(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate every oscillator parameter.
pub fn validate_settings(settings: &OscillatorSettings) -> ValidationResult<()> {
    let mut errors = Vec::new();
    collect_settings_errors(settings, &mut errors);
    finish(errors)
}

/// Validate a preset.
///
/// Checks the name, the sample rate hint and every oscillator parameter.
/// A single problem is returned as is; several are wrapped in
/// [`ValidationError::Multiple`].
///
/// # Example
///
/// ```rust,no_run
/// use morphwave_config::{Preset, validate_preset};
///
/// let preset = Preset::load("my_preset.toml").unwrap();
/// validate_preset(&preset).expect("preset should be valid");
/// ```
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if preset.name.trim().is_empty() {
        errors.push(ValidationError::InvalidFormat {
            param: "name".to_string(),
            reason: "preset name is empty".to_string(),
        });
    }

    let (min_rate, max_rate) = SAMPLE_RATE_RANGE;
    if !(min_rate..=max_rate).contains(&preset.sample_rate) {
        errors.push(ValidationError::OutOfRange {
            param: "sample_rate".to_string(),
            value: preset.sample_rate as f32,
            min: min_rate as f32,
            max: max_rate as f32,
        });
    }

    if let Some(wavetable) = &preset.wavetable
        && wavetable.trim().is_empty()
    {
        errors.push(ValidationError::InvalidFormat {
            param: "wavetable".to_string(),
            reason: "wavetable reference is empty".to_string(),
        });
    }

    collect_settings_errors(&preset.oscillator, &mut errors);
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_settings() {
        let defaults = OscillatorSettings::default();
        for (range, (name, value)) in OSCILLATOR_PARAMS.iter().zip(numeric_values(&defaults)) {
            assert_eq!(range.name, name);
            assert_eq!(range.default, value, "{name}");
            assert!(range.contains(value), "{name} default out of range");
        }
    }

    #[test]
    fn test_param_range_lookup() {
        assert_eq!(param_range("detune").map(|p| p.max), Some(1.0));
        assert!(param_range("Unison Voices").is_some());
        assert!(param_range("stereo-spread").is_some());
        assert!(param_range("drive").is_none());
    }

    #[test]
    fn test_validate_param_value() {
        assert!(validate_param_value("transpose", -48.0).is_ok());
        assert!(validate_param_value("transpose", 48.0).is_ok());
        assert!(matches!(
            validate_param_value("transpose", 60.0),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_param_value("level", f32::NAN),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(
            validate_param_value("drive", 0.5),
            Err(ValidationError::UnknownParameter("drive".to_string()))
        );
    }

    #[test]
    fn test_unison_voice_bounds() {
        let zero = OscillatorSettings {
            unison_voices: 0,
            ..Default::default()
        };
        assert!(validate_settings(&zero).is_err());
        let max = OscillatorSettings {
            unison_voices: MAX_UNISON as u32,
            ..Default::default()
        };
        assert!(validate_settings(&max).is_ok());
    }

    #[test]
    fn test_quantize_mask_bits() {
        let ok = OscillatorSettings {
            transpose_quantize: 0x0FFF,
            ..Default::default()
        };
        assert!(validate_settings(&ok).is_ok());
        let bad = OscillatorSettings {
            transpose_quantize: 0x1001,
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&bad),
            Err(ValidationError::InvalidFormat { ref param, .. }) if param == "transpose_quantize"
        ));
    }

    #[test]
    fn test_preset_reports_every_problem() {
        let mut preset = Preset::new(" ").with_sample_rate(1000);
        preset.oscillator.detune = 2.0;
        preset.oscillator.pan = -3.0;

        match validate_preset(&preset) {
            Err(ValidationError::Multiple(errors)) => {
                assert_eq!(errors.len(), 4);
                let text = ValidationError::Multiple(errors).to_string();
                assert!(text.contains("'detune'"));
                assert!(text.contains("'pan'"));
                assert!(text.contains("'sample_rate'"));
                assert!(text.contains("'name'"));
            }
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_single_problem_is_not_wrapped() {
        let mut preset = Preset::new("One");
        preset.oscillator.tune = 4.0;
        assert!(matches!(
            validate_preset(&preset),
            Err(ValidationError::OutOfRange { ref param, .. }) if param == "tune"
        ));
    }

    #[test]
    fn test_empty_wavetable_reference() {
        let preset = Preset::new("Empty").with_wavetable("");
        assert!(matches!(
            validate_preset(&preset),
            Err(ValidationError::InvalidFormat { ref param, .. }) if param == "wavetable"
        ));
    }
}
