//! Error types for configuration operations.

use morphwave_wavetable::StateError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving presets and wavetables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Preset not found
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Wavetable file not found
    #[error("wavetable not found: {0}")]
    WavetableNotFound(String),

    /// A wavetable file held JSON the creator could not load.
    #[error("invalid wavetable '{path}': {source}")]
    InvalidWavetable {
        /// Path of the offending file.
        path: PathBuf,
        /// What the state loader rejected.
        #[source]
        source: StateError,
    },

    /// Validation errors
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid wavetable error.
    pub fn invalid_wavetable(path: impl Into<PathBuf>, source: StateError) -> Self {
        ConfigError::InvalidWavetable {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    // --- factory methods ---

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = ConfigError::read_file("/some/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/path"))
        );
    }

    #[test]
    fn invalid_wavetable_factory_produces_correct_variant() {
        let err = ConfigError::invalid_wavetable("/t.json", StateError::missing("groups"));
        assert!(
            matches!(err, ConfigError::InvalidWavetable { ref path, .. } if path == std::path::Path::new("/t.json"))
        );
    }

    // --- Display formatting ---

    #[test]
    fn write_file_display() {
        let err = ConfigError::write_file("/a/b.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to write file"), "got: {msg}");
        assert!(msg.contains("/a/b.toml"), "got: {msg}");
    }

    #[test]
    fn create_dir_display() {
        let err = ConfigError::create_dir("/a/b", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to create directory"), "got: {msg}");
        assert!(msg.contains("/a/b"), "got: {msg}");
    }

    #[test]
    fn not_found_display() {
        let err = ConfigError::PresetNotFound("glass-pad".to_string());
        assert_eq!(err.to_string(), "preset not found: glass-pad");
        let err = ConfigError::WavetableNotFound("vox".to_string());
        assert_eq!(err.to_string(), "wavetable not found: vox");
    }

    #[test]
    fn invalid_wavetable_display_names_path_and_cause() {
        let err = ConfigError::invalid_wavetable("/w/vox.json", StateError::missing("groups"));
        let msg = err.to_string();
        assert!(msg.contains("/w/vox.json"), "got: {msg}");
        assert!(msg.contains("missing field 'groups'"), "got: {msg}");
    }

    // --- Error::source() chain ---

    #[test]
    fn io_variants_expose_source() {
        assert!(ConfigError::read_file("/x", mock_io_err()).source().is_some());
        assert!(ConfigError::write_file("/x", mock_io_err()).source().is_some());
        assert!(ConfigError::create_dir("/x", mock_io_err()).source().is_some());
    }

    #[test]
    fn invalid_wavetable_source_is_state_error() {
        let err = ConfigError::invalid_wavetable("/x", StateError::missing("groups"));
        let source = err.source().expect("source");
        assert!(source.downcast_ref::<StateError>().is_some());
    }

    #[test]
    fn not_found_source_is_none() {
        assert!(ConfigError::PresetNotFound("p".to_string()).source().is_none());
        assert!(ConfigError::WavetableNotFound("w".to_string()).source().is_none());
    }
}
