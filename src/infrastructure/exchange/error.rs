//! # Exchange Errors
//!
//! Error types for the exchange collaborator.
//!
//! These represent transport- and exchange-side failures. The engine
//! never retries them internally; `is_retryable` tells the caller's
//! transport layer whether a retry can help.
//!
//! # Examples
//!
//! ```
//! use trade_resolver::infrastructure::exchange::ExchangeError;
//!
//! let error = ExchangeError::timeout("request timed out after 5000ms");
//! assert!(error.is_retryable());
//!
//! let error = ExchangeError::authentication("invalid API key");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for exchange collaborator operations.
#[derive(Debug, Clone, Error)]
pub enum ExchangeError {
    /// Request timed out.
    #[error("exchange timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error.
    #[error("exchange connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Authentication or authorization failure.
    #[error("exchange authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("exchange rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// The exchange rejected the request.
    #[error("exchange rejected request: {message}")]
    Rejected {
        /// Error message.
        message: String,
        /// Exchange-specific error code.
        error_code: Option<String>,
    },

    /// An order, offer, market, or account the exchange does not know.
    #[error("not found on exchange: {0}")]
    NotFound(String),

    /// Internal exchange error.
    #[error("exchange internal error: {0}")]
    Internal(String),
}

impl ExchangeError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: None,
        }
    }

    /// Creates a rate limited error with a retry hint.
    #[must_use]
    pub fn rate_limited_with_retry(message: impl Into<String>, retry_after_ms: u64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: Some(retry_after_ms),
        }
    }

    /// Creates a rejection error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            error_code: None,
        }
    }

    /// Creates a rejection error with an exchange error code.
    #[must_use]
    pub fn rejected_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            error_code: Some(code.into()),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is transient and may succeed on
    /// retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns the retry delay in milliseconds, if the exchange gave
    /// one.
    #[must_use]
    pub const fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Result type for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_retryable() {
        assert!(ExchangeError::timeout("test").is_retryable());
    }

    #[test]
    fn rate_limited_carries_retry_hint() {
        let error = ExchangeError::rate_limited_with_retry("slow down", 1000);
        assert!(error.is_retryable());
        assert_eq!(error.retry_after_ms(), Some(1000));
    }

    #[test]
    fn rejection_is_not_retryable() {
        let error = ExchangeError::rejected_with_code("bad price", "ERR_PRICE");
        assert!(!error.is_retryable());
        assert!(error.to_string().contains("bad price"));
    }

    #[test]
    fn not_found_names_the_subject() {
        let error = ExchangeError::not_found("order 42");
        assert!(error.to_string().contains("order 42"));
    }
}
