//! Error types for plexus.
//!
//! The per-frame computation never fails; errors only come from the
//! configuration surface (validation and JSON persistence).

use std::io;
use thiserror::Error;

/// Errors that can occur while validating, loading or saving a configuration.
#[derive(Error, Debug)]
pub enum PlexusError {
    /// Failed to read or write a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration JSON was malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is outside its valid range.
    #[error("Invalid config field `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}

/// Result type using [`PlexusError`].
pub type Result<T> = std::result::Result<T, PlexusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = PlexusError::InvalidConfig {
            field: "size_blend",
            reason: "must be within [0, 1], got 1.5".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid config field `size_blend`: must be within [0, 1], got 1.5"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: PlexusError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, PlexusError::Io(_)));
    }
}
