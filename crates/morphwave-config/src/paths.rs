//! Platform-specific paths for presets, wavetables and configuration.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/morphwave/` (Linux), `~/Library/Application Support/morphwave/` (macOS), `%APPDATA%\morphwave\` (Windows)
//! - **User presets**: `<user config>/presets/`
//! - **User wavetables**: `<user config>/wavetables/`
//! - **System presets**: `/usr/share/morphwave/presets/` (Linux), `/Library/Application Support/morphwave/presets/` (macOS)
//!
//! # Example
//!
//! ```rust,no_run
//! use morphwave_config::paths;
//!
//! println!("User presets: {:?}", paths::user_presets_dir());
//!
//! if let Some(path) = paths::find_wavetable("vox") {
//!     println!("Found wavetable at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "morphwave";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Subdirectory name for wavetables.
const WAVETABLES_SUBDIR: &str = "wavetables";

/// Extension of preset files.
pub const PRESET_EXTENSION: &str = "toml";

/// Extension of wavetable files.
pub const WAVETABLE_EXTENSION: &str = "json";

/// Returns the user-specific configuration directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/morphwave/`
/// - macOS: `~/Library/Application Support/morphwave/`
/// - Windows: `%APPDATA%\morphwave\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Returns the user-specific wavetables directory.
pub fn user_wavetables_dir() -> PathBuf {
    user_config_dir().join(WAVETABLES_SUBDIR)
}

/// Returns the system-wide presets directory.
///
/// This directory is typically read-only.
///
/// # Platform Paths
///
/// - Linux: `/usr/share/morphwave/presets/`
/// - macOS: `/Library/Application Support/morphwave/presets/`
/// - Windows: `%PROGRAMDATA%\morphwave\presets\`
pub fn system_presets_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/usr/share").join(APP_NAME).join(PRESETS_SUBDIR)
    }
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library/Application Support").join(APP_NAME).join(PRESETS_SUBDIR)
    }
    #[cfg(target_os = "windows")]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"))
            .join(APP_NAME)
            .join(PRESETS_SUBDIR)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join(PRESETS_SUBDIR)
    }
}

fn with_extension(name: &str, extension: &str) -> String {
    if Path::new(name).extension().is_some_and(|ext| ext == extension) {
        name.to_string()
    } else {
        format!("{name}.{extension}")
    }
}

fn find_in(name: &str, extension: &str, search: &[PathBuf]) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = with_extension(name, extension);
    search
        .iter()
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.is_file())
}

/// Find a preset file by name.
///
/// Searches in the following order:
/// 1. The name as a path (absolute or relative to the working directory)
/// 2. User presets directory
/// 3. System presets directory
///
/// The `.toml` extension is optional.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_in(name, PRESET_EXTENSION, &[user_presets_dir(), system_presets_dir()])
}

/// Find a wavetable file by name.
///
/// Tries the name as a path, then the user wavetables directory. The
/// `.json` extension is optional.
pub fn find_wavetable(name: &str) -> Option<PathBuf> {
    find_in(name, WAVETABLE_EXTENSION, &[user_wavetables_dir()])
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
        tracing::debug!(dir = %dir.display(), "created directory");
    }
    Ok(dir)
}

/// Ensure the user presets directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_presets_dir())
}

/// Ensure the user wavetables directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_wavetables_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_wavetables_dir())
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    ensure_dir(user_config_dir())
}

/// List all preset files in the user presets directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_files_in_dir(&user_presets_dir(), PRESET_EXTENSION)
}

/// List all preset files in the system presets directory.
pub fn list_system_presets() -> Vec<PathBuf> {
    list_files_in_dir(&system_presets_dir(), PRESET_EXTENSION)
}

/// List all wavetable files in the user wavetables directory.
pub fn list_user_wavetables() -> Vec<PathBuf> {
    list_files_in_dir(&user_wavetables_dir(), WAVETABLE_EXTENSION)
}

/// Files in `dir` with the given extension, sorted by path.
pub fn list_files_in_dir(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    files
}

/// Get the preset or wavetable name from a file path.
///
/// # Example
///
/// ```rust
/// use morphwave_config::paths::name_from_path;
/// use std::path::Path;
///
/// let name = name_from_path(Path::new("/path/to/glass_pad.toml"));
/// assert_eq!(name, Some("glass_pad".to_string()));
/// ```
pub fn name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
