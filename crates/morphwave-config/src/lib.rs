//! Presets and file handling for the morphwave oscillator.
//!
//! This crate stores [`OscillatorSettings`](morphwave_synth::OscillatorSettings)
//! as TOML presets, checks them against their documented ranges, and finds
//! and loads the wavetable files those presets play.
//!
//! # Features
//!
//! - **Presets**: Load and save oscillator patches from TOML files
//! - **Validation**: Report every out-of-range parameter at once
//! - **Wavetable files**: Load and save creator JSON, resolve preset references
//! - **Paths**: Platform-specific preset, wavetable and config directories
//! - **Factory Presets**: Built-in patches that play built-in tables
//!
//! # Example
//!
//! ```rust,no_run
//! use morphwave_config::{Preset, preset_wavetable, user_presets_dir, validate_preset};
//! use morphwave_synth::{OscillatorSettings, SpectralMorph};
//!
//! let preset = Preset::new("Vowel Pad")
//!     .with_wavetable("basic_shapes")
//!     .with_oscillator(OscillatorSettings {
//!         unison_voices: 5,
//!         spectral_morph: SpectralMorph::FormScale,
//!         spectral_morph_amount: 0.3,
//!         ..Default::default()
//!     });
//! validate_preset(&preset).unwrap();
//!
//! let creator = preset_wavetable(&preset, None).unwrap();
//! preset.save(user_presets_dir().join("vowel_pad.toml")).unwrap();
//! ```

mod error;
mod preset;
mod wavetable_file;

/// Platform-specific paths for presets, wavetables and configuration.
#[cfg(feature = "std")]
pub mod paths;

/// Preset and parameter validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset, is_factory_preset,
};
#[cfg(feature = "std")]
pub use paths::{
    ensure_user_config_dir, ensure_user_presets_dir, ensure_user_wavetables_dir, find_preset,
    find_wavetable, list_system_presets, list_user_presets, list_user_wavetables, name_from_path,
    system_presets_dir, user_config_dir, user_presets_dir, user_wavetables_dir,
};
pub use preset::Preset;
pub use validation::{
    OSCILLATOR_PARAMS, ParamRange, ValidationError, ValidationResult, param_range, validate_param_value,
    validate_preset, validate_settings,
};
pub use wavetable_file::{
    BUILTIN_WAVETABLES, builtin_wavetable, find_wavetable_file, load_wavetable, preset_wavetable,
    resolve_wavetable, save_wavetable,
};
