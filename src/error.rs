//! Error handling for BrandMeld
//!
//! This module defines the error types used throughout the application,
//! providing clear error messages and proper error propagation.

use std::io;
use thiserror::Error;

/// Result type alias for BrandMeld operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for BrandMeld operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP client could not be built or a transport error occurred
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Home directory could not be determined
    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// Invalid command line arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// User input rejected before calling the generation service
    #[error("{message}")]
    InvalidInput { message: String },

    /// Storage key contains characters the backend cannot represent
    #[error("Invalid storage key: {key}")]
    InvalidStorageKey { key: String },

    /// No history item with this id
    #[error("History item not found: {id}")]
    HistoryItemNotFound { id: i64 },

    /// API key environment variable is not set
    #[error("API key not found: environment variable {var} is not set")]
    MissingApiKey { var: String },

    /// The generation service failed; the message is user-facing
    #[error("{message}")]
    GenerationFailed {
        operation: &'static str,
        message: String,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {field} - {reason}")]
    ConfigValidation { field: String, reason: String },

    /// Generic error with custom message
    #[error("{message}")]
    Custom { message: String },
}

impl Error {
    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom {
            message: message.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Error::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation<S: Into<String>>(field: S, reason: S) -> Self {
        Error::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a generation failure for the given collaborator operation
    pub fn generation_failed<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Error::GenerationFailed {
            operation,
            message: message.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Error::InvalidArguments { .. }
                | Error::MissingApiKey { .. }
                | Error::HomeDirectoryNotFound
        )
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Database(_) => "database",
            Error::Http(_) => "http",
            Error::HomeDirectoryNotFound => "system",
            Error::InvalidArguments { .. } => "arguments",
            Error::InvalidInput { .. } => "input",
            Error::InvalidStorageKey { .. } => "storage",
            Error::HistoryItemNotFound { .. } => "history",
            Error::MissingApiKey { .. } | Error::ConfigValidation { .. } => "config",
            Error::GenerationFailed { .. } => "generation",
            Error::Custom { .. } => "custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_error() {
        let err = Error::custom("test message");
        assert_eq!(err.to_string(), "test message");
        assert_eq!(err.category(), "custom");
    }

    #[test]
    fn test_invalid_input_is_shown_verbatim() {
        let err = Error::invalid_input("Please fill in both fields.");
        assert_eq!(err.to_string(), "Please fill in both fields.");
        assert_eq!(err.category(), "input");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_generation_failed_hides_operation() {
        let err = Error::generation_failed("audit", "Failed to audit content from AI.");
        assert_eq!(err.to_string(), "Failed to audit content from AI.");
        assert_eq!(err.category(), "generation");
        assert!(matches!(
            err,
            Error::GenerationFailed {
                operation: "audit",
                ..
            }
        ));
    }

    #[test]
    fn test_config_validation_error() {
        let err = Error::config_validation("generation.model", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: generation.model - must not be empty"
        );
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_missing_api_key() {
        let err = Error::MissingApiKey {
            var: "API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API key not found: environment variable API_KEY is not set"
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::custom("x").is_recoverable());
        assert!(Error::generation_failed("generate", "x").is_recoverable());
        assert!(!Error::invalid_arguments("x").is_recoverable());
        assert!(!Error::HomeDirectoryNotFound.is_recoverable());
    }

    #[test]
    fn test_history_item_not_found() {
        let err = Error::HistoryItemNotFound { id: 42 };
        assert_eq!(err.to_string(), "History item not found: 42");
        assert_eq!(err.category(), "history");
    }
}
