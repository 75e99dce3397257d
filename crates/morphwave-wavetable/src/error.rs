//! Error types for wavetable state loading.

use thiserror::Error;

/// Errors raised while reading saved wavetable state.
///
/// Rendering never fails; only the JSON boundary does.
#[derive(Debug, Error)]
pub enum StateError {
    /// The input was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field was absent.
    #[error("missing field '{0}'")]
    MissingField(String),

    /// A field held a value of the wrong kind.
    #[error("field '{field}' should be {expected}")]
    WrongType {
        /// Name of the offending field.
        field: String,
        /// What the field should have held.
        expected: &'static str,
    },

    /// A component's `type` named nothing this crate knows.
    #[error("unknown component type: {0}")]
    UnknownComponent(String),

    /// A base64 payload failed to decode.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A version string could not be parsed.
    #[error("invalid version string: {0}")]
    InvalidVersion(String),
}

impl StateError {
    /// Create a missing-field error.
    pub fn missing(field: impl Into<String>) -> Self {
        StateError::MissingField(field.into())
    }

    /// Create a wrong-type error.
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        StateError::WrongType {
            field: field.into(),
            expected,
        }
    }
}

/// Result alias for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StateError::missing("keyframes").to_string(), "missing field 'keyframes'");
        assert_eq!(
            StateError::wrong_type("position", "an integer").to_string(),
            "field 'position' should be an integer"
        );
        assert_eq!(
            StateError::UnknownComponent("Wave Mangler".into()).to_string(),
            "unknown component type: Wave Mangler"
        );
    }
}
