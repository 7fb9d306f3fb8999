//! Error types for AgentDesk
//!
//! This module defines the error types used by the backend client and the
//! controllers, using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for AgentDesk operations
///
/// Controllers downcast `anyhow::Error` values to this enum to decide how a
/// failure is surfaced (banner, download fallback, disabled control).
#[derive(Error, Debug)]
pub enum AgentDeskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced a response (connect, DNS, reset, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("Server error (status {status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server {
        /// HTTP status code returned by the backend
        status: u16,
        /// Message extracted from the `error`/`detail` field, if any
        message: Option<String>,
    },

    /// The backend refused to render a file as text
    #[error("Binary file cannot be viewed as text: {0}")]
    BinaryFile(String),

    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The action is disabled while another one is in flight
    #[error("Action unavailable: {0}")]
    Busy(String),

    /// Probe status change outside the allowed transitions
    #[error("Invalid probe transition: {from} -> {to}")]
    InvalidTransition {
        /// Status before the attempted change
        from: String,
        /// Requested status
        to: String,
    },

    /// Model name that was not reported by the last probe
    #[error("Model not discovered by the last connection check: {0}")]
    UnknownModel(String),

    /// Interactive prompt failures
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// URL construction errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl AgentDeskError {
    /// Message reported by the server, if this error carries one
    ///
    /// # Examples
    ///
    /// ```
    /// use agentdesk::error::AgentDeskError;
    ///
    /// let err = AgentDeskError::Server { status: 404, message: Some("Session not found".into()) };
    /// assert_eq!(err.server_message(), Some("Session not found"));
    /// assert_eq!(AgentDeskError::Transport("refused".into()).server_message(), None);
    /// ```
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for AgentDesk operations
///
/// Uses `anyhow::Error` so call sites can attach context while controllers
/// still recover the typed [`AgentDeskError`] with `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;

/// Extract the server-provided message from an error chain, if any
pub fn server_message(err: &anyhow::Error) -> Option<String> {
    err.downcast_ref::<AgentDeskError>()
        .and_then(AgentDeskError::server_message)
        .map(str::to_string)
}

/// Build a user-facing banner text from a failure
///
/// Server messages are surfaced verbatim; anything else collapses to the
/// generic `fallback` (the full error is logged by the caller).
pub fn banner_text(err: &anyhow::Error, fallback: &str) -> String {
    server_message(err).unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = AgentDeskError::Config("invalid base url".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid base url");
    }

    #[test]
    fn test_server_error_display_with_message() {
        let error = AgentDeskError::Server {
            status: 500,
            message: Some("disk full".to_string()),
        };
        assert_eq!(error.to_string(), "Server error (status 500): disk full");
    }

    #[test]
    fn test_server_error_display_without_message() {
        let error = AgentDeskError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(error.to_string(), "Server error (status 502): no details");
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = AgentDeskError::InvalidTransition {
            from: "unknown".to_string(),
            to: "connected".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid probe transition: unknown -> connected"
        );
    }

    #[test]
    fn test_banner_text_prefers_server_message() {
        let err: anyhow::Error = AgentDeskError::Server {
            status: 404,
            message: Some("File not found".to_string()),
        }
        .into();
        assert_eq!(banner_text(&err, "Failed to load file"), "File not found");
    }

    #[test]
    fn test_banner_text_falls_back_for_transport() {
        let err: anyhow::Error = AgentDeskError::Transport("connection refused".to_string()).into();
        assert_eq!(
            banner_text(&err, "Failed to load file"),
            "Failed to load file"
        );
    }

    #[test]
    fn test_server_message_survives_context() {
        let err = anyhow::Error::from(AgentDeskError::Server {
            status: 400,
            message: Some("Invalid path".to_string()),
        })
        .context("listing directory");
        assert_eq!(server_message(&err), Some("Invalid path".to_string()));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: AgentDeskError = io_error.into();
        assert!(matches!(error, AgentDeskError::Io(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: AgentDeskError = yaml_error.into();
        assert!(matches!(error, AgentDeskError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AgentDeskError>();
    }
}
