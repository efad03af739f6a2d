//! Error types for the Vibecoder engine.

use crate::conversation::TransportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Vibecoder workspace.
///
/// Validation and application errors are recovered locally by the caller;
/// transport errors end the current exchange but leave the session usable.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VibeError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// One or more operations in a batch failed validation.
    /// The batch was rejected and no state changed.
    #[error("Operation batch rejected: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A validated batch failed while being applied
    #[error("Failed to apply operations: {0}")]
    Application(String),

    /// The AI transport call failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Asset generation or tray error
    #[error("Asset error: {0}")]
    Asset(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VibeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an Application error
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Asset error
    pub fn asset(message: impl Into<String>) -> Self {
        Self::Asset(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation rejection
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an application error
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application(_))
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Validation messages, empty for every other variant.
    pub fn validation_errors(&self) -> &[String] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Plain-language text suitable for the transcript or a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => {
                format!("I couldn't apply those changes: {}", errors.join("; "))
            }
            Self::Application(message) => {
                format!("Something went wrong while applying changes: {message}")
            }
            Self::Transport(err) => err.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for VibeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for VibeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for VibeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (transitional, for adapter code)
impl From<anyhow::Error> for VibeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, VibeError>`.
pub type Result<T> = std::result::Result<T, VibeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_messages() {
        let err = VibeError::Validation(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.to_string(), "Operation batch rejected: first; second");
        assert!(err.is_validation());
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_transport_conversion() {
        let err: VibeError = TransportError::RateLimited.into();
        assert!(err.is_transport());
        assert!(err.user_message().contains("Too many requests"));
    }

    #[test]
    fn test_not_found_helper() {
        let err = VibeError::not_found("section", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: section 'abc'");
    }
}
