//! # Application Errors
//!
//! Error types for the lifecycle verbs.
//!
//! # Error Hierarchy
//!
//! ```text
//! EngineError
//! ├── Domain(DomainError)       - resolution failures
//! ├── Exchange(ExchangeError)   - collaborator failures, unchanged
//! ├── NotPlaced                 - a verb that needs an exchange id
//! └── NoFollowup                - followup on an unresolved output
//! ```
//!
//! Collaborator failures are propagated, never reinterpreted; retry is
//! the transport's responsibility.

use crate::domain::errors::DomainError;
use crate::infrastructure::exchange::ExchangeError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Resolution failure.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Collaborator failure, propagated unchanged.
    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    /// A lifecycle verb was called on an entity without an exchange id.
    #[error("{entity} has not been placed, no exchange id")]
    NotPlaced {
        /// The entity kind ("order" or "offer").
        entity: &'static str,
    },

    /// A followup was requested before side, pair, and output resolved.
    #[error("order has no resolvable output to follow up on")]
    NoFollowup,
}

impl EngineError {
    /// Creates a not-placed error.
    #[must_use]
    pub const fn not_placed(entity: &'static str) -> Self {
        Self::NotPlaced { entity }
    }

    /// Returns true if this error is retryable at the transport level.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Exchange(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_convert() {
        let err: EngineError = DomainError::NonConvergence { passes: 3 }.into();
        assert!(err.to_string().contains("domain error"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn exchange_retryability_passes_through() {
        let err: EngineError = ExchangeError::timeout("slow").into();
        assert!(err.is_retryable());

        let err: EngineError = ExchangeError::rejected("no").into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn not_placed_names_the_entity() {
        let err = EngineError::not_placed("offer");
        assert!(err.to_string().contains("offer"));
    }
}
