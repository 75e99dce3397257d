//! Factory presets bundled with morphwave.
//!
//! These presets are always available without external files. Each one plays
//! a built-in wavetable, so they work before any table has been imported.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "supersaw",
    "glass_pad",
    "formant_sync",
    "shepard_rise",
    "harmonic_bell",
];

/// TOML content for factory presets.
///
/// These are embedded at compile time and always available.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("supersaw", SUPERSAW_PRESET),
    ("glass_pad", GLASS_PAD_PRESET),
    ("formant_sync", FORMANT_SYNC_PRESET),
    ("shepard_rise", SHEPARD_RISE_PRESET),
    ("harmonic_bell", HARMONIC_BELL_PRESET),
];

/// Initialization preset - one voice, no morph, no distortion.
const INIT_PRESET: &str = r#"
name = "Init"
description = "Single saw voice with every effect off"
sample_rate = 48000
wavetable = "init"

[oscillator]
unison_voices = 1
random_phase = 0.0
"#;

/// Seven detuned saws spread across the stereo field.
const SUPERSAW_PRESET: &str = r#"
name = "Supersaw"
description = "Seven wide detuned saws"
sample_rate = 48000
wavetable = "init"

[oscillator]
unison_voices = 7
detune = 0.3
detune_range = 2.0
detune_power = 1.5
unison_blend = 0.85
stereo_spread = 1.0
random_phase = 1.0
"#;

/// Soft vocoded pad moving through the basic shapes.
const GLASS_PAD_PRESET: &str = r#"
name = "Glass Pad"
description = "Vocoded triangle-to-square pad with gentle frame spread"
sample_rate = 48000
wavetable = "basic_shapes"

[oscillator]
unison_voices = 5
detune = 0.15
wave_frame = 0.4
frame_spread = 0.1
spectral_morph = "vocode"
spectral_morph_amount = 0.35
stereo_spread = 0.8
level = 0.6
"#;

/// Hard-synced formant sweep, the classic vowel growl.
const FORMANT_SYNC_PRESET: &str = r#"
name = "Formant Sync"
description = "Windowed hard sync over a square for vowel-like tones"
sample_rate = 48000
wavetable = "basic_shapes"

[oscillator]
unison_voices = 3
detune = 0.1
wave_frame = 0.6
distortion = "formant"
distortion_amount = 0.45
"#;

/// Shepard-style spectral morph on a sine, for endless risers.
const SHEPARD_RISE_PRESET: &str = r#"
name = "Shepard Rise"
description = "Octave-folding spectral morph on a sine"
sample_rate = 48000
wavetable = "basic_shapes"

[oscillator]
unison_voices = 2
detune = 0.05
unison_blend = 0.5
spectral_morph = "shepard_tone"
spectral_morph_amount = 0.5
"#;

/// Inharmonic partials over a power-chord stack.
const HARMONIC_BELL_PRESET: &str = r#"
name = "Harmonic Bell"
description = "Stretched partials stacked as a power chord"
sample_rate = 48000
wavetable = "basic_shapes"

[oscillator]
unison_voices = 4
detune = 0.0
stack_style = "power_chord"
unison_blend = 0.6
spectral_morph = "inharmonic_scale"
spectral_morph_amount = 0.2
transpose = 12.0
transpose_quantize = 2193
"#;

/// Get all factory presets.
///
/// Returns a vector of all built-in presets.
///
/// # Example
///
/// ```rust
/// use morphwave_config::factory_presets;
///
/// let presets = factory_presets();
/// for preset in &presets {
///     println!("{}: {:?}", preset.name, preset.description);
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// Matches either the lookup name (`glass_pad`) or the display name
/// (`Glass Pad`), case-insensitively.
///
/// # Example
///
/// ```rust
/// use morphwave_config::get_factory_preset;
///
/// let preset = get_factory_preset("supersaw").expect("supersaw exists");
/// assert_eq!(preset.oscillator.unison_voices, 7);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(preset_name, _)| preset_name.to_lowercase() == name_lower)
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Get the lookup names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a preset name is a factory preset.
///
/// # Example
///
/// ```rust
/// use morphwave_config::is_factory_preset;
///
/// assert!(is_factory_preset("glass_pad"));
/// assert!(!is_factory_preset("my_custom_preset"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BUILTIN_WAVETABLES, validate_preset};
    use morphwave_synth::{DistortionType, SpectralMorph, StackStyle};

    #[test]
    fn test_names_match_table() {
        assert_eq!(FACTORY_PRESET_NAMES, factory_preset_names().as_slice());
        assert_eq!(factory_presets().len(), FACTORY_PRESET_NAMES.len());
    }

    #[test]
    fn test_get_factory_preset() {
        let preset = get_factory_preset("glass_pad").expect("glass_pad should exist");
        assert_eq!(preset.name, "Glass Pad");
        assert_eq!(preset.oscillator.spectral_morph, SpectralMorph::Vocode);

        // By display name, any case
        let preset = get_factory_preset("FORMANT SYNC").expect("display name lookup");
        assert_eq!(preset.oscillator.distortion, DistortionType::Formant);

        assert!(get_factory_preset("nonexistent").is_none());
        assert!(!is_factory_preset("nonexistent"));
    }

    #[test]
    fn test_all_factory_presets_valid() {
        for (name, toml) in FACTORY_PRESETS_TOML {
            let preset = Preset::from_toml(toml)
                .unwrap_or_else(|e| panic!("factory preset '{name}' should parse: {e}"));
            assert!(preset.description.is_some(), "'{name}' needs a description");
            validate_preset(&preset).unwrap_or_else(|e| panic!("'{name}' invalid: {e}"));
        }
    }

    #[test]
    fn test_factory_presets_use_builtin_tables() {
        for preset in factory_presets() {
            let table = preset.wavetable.as_deref().expect("factory presets name a table");
            assert!(BUILTIN_WAVETABLES.contains(&table), "{}: {table}", preset.name);
        }
    }

    #[test]
    fn test_harmonic_bell_quantizes_to_major_seventh() {
        let bell = get_factory_preset("harmonic_bell").unwrap();
        // C, E, G and B
        assert_eq!(bell.oscillator.transpose_quantize, (1 << 0) | (1 << 4) | (1 << 7) | (1 << 11));
        assert_eq!(bell.oscillator.stack_style, StackStyle::PowerChord);
    }
}
