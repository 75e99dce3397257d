//! Integration tests for morphwave-config.
//!
//! These tests verify end-to-end functionality across modules: presets on
//! disk, the wavetables they reference, and playback of both.

use morphwave_config::{
    ConfigError, Preset, ValidationError, factory_presets, load_wavetable, preset_wavetable,
    save_wavetable, validate_preset,
};
use morphwave_synth::{OscillatorOutput, OscillatorSettings, SpectralMorph, SynthOscillator};
use morphwave_wavetable::{AudioLoadStyle, Wavetable, WavetableCreator};
use std::path::Path;
use tempfile::TempDir;

fn play(preset: &Preset, base_dir: Option<&Path>) -> OscillatorOutput {
    let creator = preset_wavetable(preset, base_dir).expect("wavetable should resolve");
    let mut table = Wavetable::new(1);
    creator.render(&mut table);
    table.publish();
    let reader = table.reader();

    let mut osc = SynthOscillator::with_seed(preset.sample_rate as f32, 3);
    osc.set_settings(&preset.oscillator);
    let mut out = OscillatorOutput::new(512);
    osc.reset(0);
    osc.process(&reader.mark_used(), 60.0, None, &mut out);
    out
}

/// Every factory preset resolves its table and makes sound.
#[test]
fn test_factory_presets_play() {
    for preset in factory_presets() {
        let out = play(&preset, None);
        let left = &out.levelled.left;
        assert!(left.iter().all(|s| s.is_finite()), "{} produced NaN", preset.name);
        assert!(left.iter().any(|s| s.abs() > 1e-3), "{} is silent", preset.name);
    }
}

/// A preset saved beside its wavetable finds it again through a relative path.
#[test]
fn test_preset_with_relative_wavetable() {
    let temp_dir = TempDir::new().unwrap();

    let samples: Vec<f32> = (0..8192)
        .map(|i| (i as f32 * 0.031).sin() * 0.5 + (i as f32 * 0.007).sin() * 0.25)
        .collect();
    let mut creator = WavetableCreator::new();
    creator.init_from_audio(&samples, 44100.0, AudioLoadStyle::WavetableSplice);
    creator.set_name("Drift");
    save_wavetable(&creator, temp_dir.path().join("tables").join("drift.json")).unwrap();

    let preset = Preset::new("Drift Pad")
        .with_wavetable("tables/drift.json")
        .with_oscillator(OscillatorSettings {
            unison_voices: 3,
            wave_frame: 0.5,
            spectral_morph: SpectralMorph::Smear,
            spectral_morph_amount: 0.4,
            ..Default::default()
        });
    let preset_path = temp_dir.path().join("drift_pad.toml");
    preset.save(&preset_path).unwrap();

    let loaded = Preset::load(&preset_path).unwrap();
    assert_eq!(loaded, preset);
    validate_preset(&loaded).unwrap();

    let table = load_wavetable(temp_dir.path().join("tables/drift.json")).unwrap();
    assert_eq!(table.name(), "Drift");

    let out = play(&loaded, preset_path.parent());
    assert!(out.raw.left.iter().any(|s| s.abs() > 1e-3));
}

/// Hand-edited preset files are validated after parsing.
#[test]
fn test_out_of_range_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("loud.toml");
    std::fs::write(
        &path,
        "name = \"Loud\"\n[oscillator]\nlevel = 2.5\nunison_voices = 40\n",
    )
    .unwrap();

    let preset = Preset::load(&path).unwrap();
    let err: ConfigError = validate_preset(&preset).unwrap_err().into();
    match err {
        ConfigError::Validation(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected two validation errors, got {other:?}"),
    }
}

/// Missing files surface with their path.
#[test]
fn test_missing_files() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");
    let err = Preset::load(&missing).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));

    let preset = Preset::new("Lost").with_wavetable("nope_table_4242.json");
    assert!(matches!(
        preset_wavetable(&preset, Some(temp_dir.path())),
        Err(ConfigError::WavetableNotFound(_))
    ));
}
