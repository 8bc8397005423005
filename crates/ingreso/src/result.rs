//! Result and error types for Ingreso.

use thiserror::Error;

/// Result type for Ingreso operations
pub type IngresoResult<T> = Result<T, IngresoError>;

/// Errors that can occur while driving a login scenario
#[derive(Debug, Error)]
pub enum IngresoError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}. Install Chromium or set CHROMIUM_PATH")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Connection to browser failed
    #[error("Failed to connect to browser: {message}")]
    Connection {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A readiness condition was not met within its bounded wait
    #[error("Timed out after {ms}ms waiting for {condition}")]
    Timeout {
        /// Condition that was being waited for
        condition: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// JavaScript evaluation in the page failed
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// An observed value did not match the expected value
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngresoError {
    /// Whether this error is a bounded-wait expiry.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error is an expected-value mismatch.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_includes_condition_and_ms() {
        let err = IngresoError::Timeout {
            condition: "visibility of #email".to_string(),
            ms: 10_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("10000ms"));
        assert!(msg.contains("#email"));
    }

    #[test]
    fn test_error_kind_predicates() {
        let timeout = IngresoError::Timeout {
            condition: "x".to_string(),
            ms: 1,
        };
        let assertion = IngresoError::Assertion {
            message: "y".to_string(),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_assertion());
        assert!(assertion.is_assertion());
        assert!(!assertion.is_timeout());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: IngresoError = io.into();
        assert!(matches!(err, IngresoError::Io(_)));
    }
}
