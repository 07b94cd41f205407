//! Error handling for Echopad
//!
//! Losing a round is a game outcome, not an error. Everything here is a
//! system fault: profile/config file I/O, JSON, and WAV export.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Echopad operations
pub type Result<T> = std::result::Result<T, EchoError>;

/// Main error type for Echopad operations
#[derive(Error, Debug)]
pub enum EchoError {
    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No data directory available for the profile")]
    NoProfileLocation,

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Key '{key}' is mapped to more than one pad")]
    DuplicateKey { key: char },

    // Tone Export Errors
    #[error("Tone export failed: {reason}")]
    ToneExport { reason: String },

    // Serialization Errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EchoError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EchoError::FileReadError { .. } => "FILE_READ",
            EchoError::FileWriteError { .. } => "FILE_WRITE",
            EchoError::DirectoryCreateError { .. } => "DIRECTORY_CREATE",
            EchoError::NoProfileLocation => "NO_PROFILE_LOCATION",
            EchoError::InvalidConfig { .. } => "INVALID_CONFIG",
            EchoError::DuplicateKey { .. } => "DUPLICATE_KEY",
            EchoError::ToneExport { .. } => "TONE_EXPORT",
            EchoError::Json(_) => "JSON",
            EchoError::Io(_) => "IO_ERROR",
        }
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            EchoError::FileReadError { .. } | EchoError::Json(_) => {
                Some("The profile or config file may be corrupt. Remove it to start fresh.")
            }
            EchoError::FileWriteError { .. } | EchoError::DirectoryCreateError { .. } => {
                Some("Check permissions on the data directory or pass --profile <path>.")
            }
            EchoError::NoProfileLocation => Some("Pass --profile <path> to choose a location."),
            EchoError::DuplicateKey { .. } => Some("Give every pad its own key in the config."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = EchoError::DuplicateKey { key: 'q' };
        assert_eq!(err.error_code(), "DUPLICATE_KEY");
        assert_eq!(err.to_string(), "Key 'q' is mapped to more than one pad");
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = EchoError::FileWriteError {
            path: PathBuf::from("/nope/profile.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.recovery_suggestion().is_some());
        assert!(EchoError::InvalidConfig {
            reason: "x".to_string()
        }
        .recovery_suggestion()
        .is_none());
    }
}
