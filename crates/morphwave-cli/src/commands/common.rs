//! Shared CLI helpers used across multiple commands.

use indicatif::{ProgressBar, ProgressStyle};
use morphwave_config::{Preset, find_preset, get_factory_preset};
use morphwave_synth::OscillatorSettings;
use morphwave_wavetable::{BackgroundRenderer, RenderComplete, Wavetable, WavetableCreator};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("Invalid parameter format: '{s}' (expected key=value)")),
    }
}

/// Load a preset by name or path.
///
/// Searches in this order:
/// 1. Factory presets (by name)
/// 2. User and system presets, or a direct path to a `.toml` file
///
/// Returns the directory the preset came from, for resolving relative
/// wavetable references.
pub fn load_preset(name: &str) -> anyhow::Result<(Preset, Option<PathBuf>)> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok((preset, None));
    }

    if let Some(path) = find_preset(name) {
        let preset = Preset::load(&path)?;
        return Ok((preset, path.parent().map(Path::to_path_buf)));
    }

    anyhow::bail!(
        "Preset '{name}' not found. Use 'morphwave presets list' to see available presets."
    )
}

/// Apply `key=value` overrides to oscillator settings.
///
/// Values are read as TOML scalars, so numbers, booleans and binary masks
/// (`0b100010010001`) work; anything else is taken as a string, which is
/// how enum names such as `vocode` arrive.
pub fn apply_overrides(
    settings: &OscillatorSettings,
    overrides: &[(String, String)],
) -> anyhow::Result<OscillatorSettings> {
    if overrides.is_empty() {
        return Ok(settings.clone());
    }

    let mut value = toml::Value::try_from(settings)?;
    let table = value
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("oscillator settings did not serialize to a table"))?;

    for (key, raw) in overrides {
        if !table.contains_key(key) {
            anyhow::bail!("Unknown oscillator parameter '{key}'");
        }
        table.insert(key.clone(), parse_scalar(raw));
    }

    value
        .try_into()
        .map_err(|e| anyhow::anyhow!("Invalid oscillator parameter: {e}"))
}

fn parse_scalar(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("v = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("v"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

/// Render `creator` on a background thread, showing a spinner until the
/// table is published.
///
/// The renderer is returned so its reader stays valid for playback.
pub fn render_in_background(
    creator: &WavetableCreator,
) -> anyhow::Result<(BackgroundRenderer, RenderComplete)> {
    let renderer = BackgroundRenderer::spawn(Wavetable::new(1))?;
    if !renderer.submit(creator) {
        anyhow::bail!("wavetable render thread exited before rendering");
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    spinner.set_message("Rendering wavetable");

    let complete = loop {
        if let Some(complete) = renderer.wait(Duration::from_millis(50)) {
            break complete;
        }
        spinner.tick();
        if spinner.elapsed() > Duration::from_secs(600) {
            spinner.abandon_with_message("render timed out");
            anyhow::bail!("wavetable render did not finish");
        }
    };
    spinner.finish_and_clear();

    tracing::info!(
        frames = complete.num_frames,
        generation = complete.generation,
        "wavetable rendered"
    );
    Ok((renderer, complete))
}

/// Linear amplitude in dB, floored at -120.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

/// Largest absolute sample.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphwave_synth::{SpectralMorph, StackStyle};

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("detune = 0.4").unwrap(),
            ("detune".to_string(), "0.4".to_string())
        );
        assert!(parse_key_val("detune").is_err());
        assert!(parse_key_val("=3").is_err());
    }

    #[test]
    fn test_overrides_parse_each_kind() {
        let settings = apply_overrides(
            &OscillatorSettings::default(),
            &pairs(&[
                ("unison_voices", "6"),
                ("detune", "1"),
                ("keytrack", "false"),
                ("spectral_morph", "form_scale"),
                ("stack_style", "major_chord"),
                ("transpose_quantize", "0b10010001"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.unison_voices, 6);
        assert_eq!(settings.detune, 1.0);
        assert!(!settings.keytrack);
        assert_eq!(settings.spectral_morph, SpectralMorph::FormScale);
        assert_eq!(settings.stack_style, StackStyle::MajorChord);
        assert_eq!(settings.transpose_quantize, 0b1001_0001);
    }

    #[test]
    fn test_overrides_reject_unknown_and_mistyped() {
        let base = OscillatorSettings::default();
        assert!(apply_overrides(&base, &pairs(&[("drive", "1")])).is_err());
        assert!(apply_overrides(&base, &pairs(&[("spectral_morph", "warp")])).is_err());
        assert!(apply_overrides(&base, &pairs(&[("keytrack", "maybe")])).is_err());
    }

    #[test]
    fn test_linear_to_db() {
        assert_eq!(linear_to_db(0.0), -120.0);
        assert!((linear_to_db(1.0)).abs() < 1e-6);
        assert!((linear_to_db(0.5) + 6.0206).abs() < 1e-3);
    }
}
