//! Application error types.
//!
//! Configuration problems are fatal per event (they are authoring bugs,
//! not transient failures); gateway errors propagate uncaught so that
//! webhook redelivery remains the only retry path.

use thiserror::Error;

/// Application-level errors surfaced by event processing.
#[derive(Debug, Error)]
pub enum AppError {
    /// No configuration file exists for the target repository.
    #[error("repository is not configured")]
    UnsupportedRepo,

    /// Reviewer-group configuration is inconsistent (name collision or cycle).
    #[error("configuration conflict: {message}")]
    ConfigConflict { message: String },

    /// The webhook payload is missing or malformed.
    #[error("invalid payload: {message}")]
    InvalidPayload { message: String },

    /// GitHub API request failed.
    #[error("GitHub API error: {message}")]
    GitHubApi {
        message: String,
        status_code: Option<u16>,
        endpoint: Option<String>,
    },

    /// Network request failed.
    #[error("network error: {message}")]
    Network { message: String },

    /// Internal application error.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a configuration conflict error.
    pub fn config_conflict(message: impl Into<String>) -> Self {
        Self::ConfigConflict {
            message: message.into(),
        }
    }

    /// Create an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    /// Create a GitHub API error without request context.
    pub fn github_api(message: impl Into<String>) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: None,
            endpoint: None,
        }
    }

    /// Create a GitHub API error with status code and endpoint.
    pub fn github_api_full(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Conversions from common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("request timed out")
        } else if err.is_connect() {
            Self::network("failed to connect to server")
        } else if err.is_status() {
            Self::github_api(format!("HTTP error: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_payload(format!("JSON error: {}", err))
    }
}
