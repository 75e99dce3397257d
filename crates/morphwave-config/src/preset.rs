//! Preset file format and operations.

use morphwave_synth::OscillatorSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// An oscillator patch stored as TOML.
///
/// A preset names its oscillator settings and, optionally, the wavetable they
/// play. Settings missing from the file take their defaults, so a preset only
/// needs to list what it changes.
///
/// # TOML Format
///
/// ```toml
/// name = "Glass Pad"
/// description = "Wide detuned vocoded pad"
/// sample_rate = 48000
/// wavetable = "basic_shapes"
///
/// [oscillator]
/// unison_voices = 7
/// detune = 0.35
/// wave_frame = 0.4
/// spectral_morph = "vocode"
/// spectral_morph_amount = 0.3
/// ```
///
/// `wavetable` is either a built-in table name (see
/// [`BUILTIN_WAVETABLES`](crate::BUILTIN_WAVETABLES)) or a path to a
/// wavetable JSON file. Relative paths resolve against the preset's own
/// directory first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    /// Rendering tools use this when no rate is given on the command line.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Wavetable to play: a built-in name or a file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wavetable: Option<String>,

    /// Oscillator parameters.
    #[serde(default)]
    pub oscillator: OscillatorSettings,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Create a preset with default oscillator settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            wavetable: None,
            oscillator: OscillatorSettings::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the wavetable reference.
    pub fn with_wavetable(mut self, wavetable: impl Into<String>) -> Self {
        self.wavetable = Some(wavetable.into());
        self
    }

    /// Replace the oscillator settings.
    pub fn with_oscillator(mut self, oscillator: OscillatorSettings) -> Self {
        self.oscillator = oscillator;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        tracing::info!(name = %preset.name, path = %path.display(), "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::info!(name = %self.name, path = %path.display(), "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
