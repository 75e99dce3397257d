//! Wavetable JSON files and the built-in tables presets can name.

use morphwave_wavetable::WavetableCreator;
use std::path::{Path, PathBuf};

use crate::Preset;
use crate::error::ConfigError;

/// Names a preset can use instead of a wavetable file.
///
/// - `init`: the default group, a single saw frame
/// - `basic_shapes`: the six predefined shapes spread across the table
pub const BUILTIN_WAVETABLES: &[&str] = &["init", "basic_shapes"];

/// Create one of the [`BUILTIN_WAVETABLES`] by name (case-insensitive).
pub fn builtin_wavetable(name: &str) -> Option<WavetableCreator> {
    match name.trim().to_lowercase().as_str() {
        "init" => Some(WavetableCreator::new()),
        "basic_shapes" => {
            let mut creator = WavetableCreator::new();
            creator.init_predefined_waves();
            Some(creator)
        }
        _ => None,
    }
}

/// Load a wavetable from a JSON file.
///
/// Older formats are migrated on load.
pub fn load_wavetable(path: impl AsRef<Path>) -> Result<WavetableCreator, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let creator = WavetableCreator::from_json_str(&content)
        .map_err(|e| ConfigError::invalid_wavetable(path, e))?;
    tracing::info!(
        path = %path.display(),
        name = creator.name(),
        groups = creator.groups().len(),
        "loaded wavetable"
    );
    Ok(creator)
}

/// Save a wavetable as pretty-printed JSON at the current format version.
pub fn save_wavetable(creator: &WavetableCreator, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
    }

    let content = creator
        .to_json_string()
        .map_err(|e| ConfigError::invalid_wavetable(path, e))?;
    std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
    tracing::info!(path = %path.display(), "saved wavetable");
    Ok(())
}

/// Resolve a wavetable reference to a file path.
///
/// Relative references are tried against `base_dir` first, then as given,
/// then in the user wavetables directory.
pub fn find_wavetable_file(reference: &str, base_dir: Option<&Path>) -> Option<PathBuf> {
    let path = Path::new(reference);
    if path.is_relative()
        && let Some(candidate) = base_dir.map(|dir| dir.join(path))
        && candidate.is_file()
    {
        return Some(candidate);
    }

    #[cfg(feature = "std")]
    {
        crate::paths::find_wavetable(reference)
    }
    #[cfg(not(feature = "std"))]
    {
        path.is_file().then(|| path.to_path_buf())
    }
}

/// Load whatever a wavetable reference names: a built-in table or a file.
pub fn resolve_wavetable(reference: &str, base_dir: Option<&Path>) -> Result<WavetableCreator, ConfigError> {
    if let Some(creator) = builtin_wavetable(reference) {
        return Ok(creator);
    }
    let path = find_wavetable_file(reference, base_dir)
        .ok_or_else(|| ConfigError::WavetableNotFound(reference.to_string()))?;
    load_wavetable(path)
}

/// Load the wavetable a preset plays.
///
/// A preset without a reference plays the `init` table. `base_dir` is the
/// directory the preset was loaded from, if any.
pub fn preset_wavetable(preset: &Preset, base_dir: Option<&Path>) -> Result<WavetableCreator, ConfigError> {
    match &preset.wavetable {
        Some(reference) => resolve_wavetable(reference, base_dir),
        None => Ok(WavetableCreator::new()),
    }
}
