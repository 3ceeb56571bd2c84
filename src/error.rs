//! Error types for query launching.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for query-launch operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// The query engine rejected the request (syntax errors, unreachable host, etc.)
    ///
    /// `response_detail` carries whatever body the engine sent back with the failure.
    #[error("{message}")]
    Engine {
        message: String,
        response_detail: Option<String>,
    },

    /// The typed confirmation phrase did not match.
    #[error("Type DROP to confirm.")]
    ConfirmationMismatch,

    /// Persistent key-value store errors (unreadable file, malformed JSON, etc.)
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration errors (invalid config file, bad engine URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (poisoned state, unexpected transitions, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LaunchError {
    /// Creates an engine error without response detail.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
            response_detail: None,
        }
    }

    /// Creates an engine error carrying the engine's response detail.
    pub fn engine_with_detail(msg: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
            response_detail: Some(detail.into()),
        }
    }

    /// Creates a persistence error with the given message.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the message shown to the user in a notification.
    ///
    /// Engine errors append the response detail when the engine supplied one.
    pub fn notification_message(&self) -> String {
        match self {
            Self::Engine {
                message,
                response_detail: Some(detail),
            } if !detail.is_empty() => format!("{message} - {detail}"),
            other => other.to_string(),
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Engine { .. } => "Engine Error",
            Self::ConfirmationMismatch => "Confirmation Error",
            Self::Persistence(_) => "Persistence Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using LaunchError.
pub type Result<T> = std::result::Result<T, LaunchError>;
