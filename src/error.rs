//! Error types for cursornav
//!
//! This module defines the error taxonomy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for cursornav
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Store Query Errors
    // ============================================================================
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Quota exceeded, retry after {retry_after_seconds}s")]
    QuotaExceeded { retry_after_seconds: u64 },

    #[error("Malformed query: {message}")]
    MalformedQuery { message: String },

    #[error("Store error: {message}")]
    Unknown { message: String },

    // ============================================================================
    // Navigation Errors
    // ============================================================================
    #[error("Operation superseded by a filter change")]
    Superseded,

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a quota exceeded error
    pub fn quota_exceeded(retry_after_seconds: u64) -> Self {
        Self::QuotaExceeded {
            retry_after_seconds,
        }
    }

    /// Create a malformed query error
    pub fn malformed_query(message: impl Into<String>) -> Self {
        Self::MalformedQuery {
            message: message.into(),
        }
    }

    /// Create an unknown store error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Check if this error is retryable under the navigator's retry policy
    ///
    /// Only transient unavailability and quota exhaustion qualify.
    /// Authorization failures and malformed queries surface immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Unavailable { .. } | Error::QuotaExceeded { .. } | Error::Timeout { .. }
        )
    }

    /// Check if this error is quota-related (retried with longer backoff)
    pub fn is_quota(&self) -> bool {
        matches!(self, Error::QuotaExceeded { .. })
    }

    /// Map an HTTP status code and body into the store error taxonomy
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Unauthorized { message: body },
            400 | 422 => Self::MalformedQuery { message: body },
            429 => Self::QuotaExceeded {
                retry_after_seconds: 60,
            },
            500..=599 => Self::Unavailable {
                message: format!("HTTP {status}: {body}"),
            },
            _ => Self::Unknown {
                message: format!("HTTP {status}: {body}"),
            },
        }
    }
}

/// Result type alias for cursornav
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
