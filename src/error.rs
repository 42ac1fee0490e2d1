//! Custom error types for OptiKit
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::Path;

use thiserror::Error;

/// The main error type for OptiKit operations
#[derive(Error, Debug)]
pub enum OptikitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Regex compilation errors
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Malformed user input (module names, app versions)
    #[error("{0}")]
    Validation(String),

    /// A version string that is not `X.Y.Z+B`
    #[error("Invalid version format: {0}. Expected format: X.Y.Z+B (e.g., 1.2.3+45)")]
    InvalidVersion(String),

    /// The working directory does not satisfy a command's requirements
    #[error("{message}")]
    Precondition {
        message: String,
        hint: Option<String>,
    },

    /// External command exited with a non-zero status
    #[error("Command `{command}` failed ({status}): {detail}")]
    CommandFailed {
        command: String,
        status: String,
        detail: String,
    },

    /// External command could not be started at all
    #[error("Failed to start `{command}`: {message}")]
    CommandSpawn { command: String, message: String },

    /// A file the command needs is missing
    #[error("{entity_type} not found at {path}")]
    NotFound {
        entity_type: &'static str,
        path: String,
    },

    /// Index outside of a numbered listing
    #[error("Invalid {listing} index: {index}. Please choose a number between 1 and {max}")]
    InvalidIndex {
        listing: &'static str,
        index: usize,
        max: usize,
    },
}

impl OptikitError {
    /// Create a precondition error with a remediation hint
    pub fn precondition(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create a precondition error without a hint
    pub fn precondition_only(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a "not found" error for a project file
    pub fn file_not_found(entity_type: &'static str, path: &Path) -> Self {
        Self::NotFound {
            entity_type,
            path: path.display().to_string(),
        }
    }

    /// Remediation hint, if this error carries one
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Precondition { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Check if this is a failure of an external command
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. } | Self::CommandSpawn { .. })
    }
}

impl From<std::io::Error> for OptikitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OptikitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for OptikitError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<regex::Error> for OptikitError {
    fn from(err: regex::Error) -> Self {
        Self::Pattern(err.to_string())
    }
}

/// Result type alias for OptiKit operations
pub type OptikitResult<T> = Result<T, OptikitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_display() {
        let err = OptikitError::InvalidVersion("1.2".into());
        assert_eq!(
            err.to_string(),
            "Invalid version format: 1.2. Expected format: X.Y.Z+B (e.g., 1.2.3+45)"
        );
    }

    #[test]
    fn test_precondition_hint() {
        let err = OptikitError::precondition(
            "iOS project directory not found.",
            "Run 'flutter create .' to add iOS support.",
        );
        assert_eq!(err.to_string(), "iOS project directory not found.");
        assert_eq!(
            err.hint(),
            Some("Run 'flutter create .' to add iOS support.")
        );
        assert!(OptikitError::Validation("x".into()).hint().is_none());
    }

    #[test]
    fn test_invalid_index_display() {
        let err = OptikitError::InvalidIndex {
            listing: "backup",
            index: 7,
            max: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid backup index: 7. Please choose a number between 1 and 3"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OptikitError = io_err.into();
        assert!(matches!(err, OptikitError::Io(_)));
        assert!(!err.is_command_failure());
    }
}
