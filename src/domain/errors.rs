//! # Domain Errors
//!
//! Error taxonomy for the resolution engine.
//!
//! Every failure raised by the resolver is synchronous and maps onto one of
//! the variants below:
//!
//! - [`DomainError::UnknownField`] — a field name the entity schema does not know
//! - [`DomainError::TypeMismatch`] — a value that cannot be coerced to the field's kind
//! - [`DomainError::FieldConflict`] — the same logical field supplied twice in one call
//! - [`DomainError::InvalidEnum`] — a value outside a closed vocabulary
//! - [`DomainError::NonConvergence`] — the derivation loop exceeded its pass bound
//!
//! Retry is never attempted here; transport-level failures belong to
//! [`ExchangeError`](crate::infrastructure::exchange::ExchangeError).
//!
//! # Examples
//!
//! ```
//! use trade_resolver::domain::errors::DomainError;
//!
//! let err = DomainError::unknown_field("Order", "prce");
//! assert!(err.to_string().contains("prce"));
//! ```

use crate::domain::fields::Field;
use crate::domain::value_objects::arithmetic::ArithmeticError;
use thiserror::Error;

/// Error type for resolution and value-object construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A field name not present in the entity's schema.
    #[error("unknown field `{name}` for {entity}")]
    UnknownField {
        /// Entity kind the schema belongs to ("Order" or "Offer").
        entity: &'static str,
        /// The offending field name.
        name: String,
    },

    /// A value that cannot be coerced to the field's declared kind.
    #[error("type mismatch for `{field}`: expected {expected}, got {got}")]
    TypeMismatch {
        /// The field being sanitized.
        field: Field,
        /// Human-readable expected kind.
        expected: &'static str,
        /// Debug rendering of the rejected value.
        got: String,
    },

    /// The same logical field was supplied twice in a single call, e.g.
    /// via a positional shortcut and a keyword.
    #[error("conflicting values for `{field}` in a single call")]
    FieldConflict {
        /// The doubly-supplied field.
        field: Field,
    },

    /// A value outside a closed vocabulary (side, type, context, ...).
    #[error("invalid {kind} value: `{value}`")]
    InvalidEnum {
        /// The vocabulary name.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A pair constructed from two identical instruments.
    #[error("pair sides must differ: {0}")]
    IdenticalInstruments(String),

    /// A pair string that does not split into two codes.
    #[error("unparseable pair: `{0}`")]
    InvalidPair(String),

    /// An instrument constructed from an empty code.
    #[error("instrument code must not be empty")]
    EmptyInstrumentCode,

    /// A positional value that cannot be classified onto a field.
    #[error("ambiguous positional value: {0}")]
    AmbiguousArgument(String),

    /// The derivation loop exceeded its pass bound without stabilizing.
    #[error("derivation did not converge after {passes} passes")]
    NonConvergence {
        /// Number of passes executed before giving up.
        passes: usize,
    },

    /// An arithmetic failure surfaced through a derivation rule.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates an unknown-field error.
    #[must_use]
    pub fn unknown_field(entity: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownField {
            entity,
            name: name.into(),
        }
    }

    /// Creates a type-mismatch error.
    #[must_use]
    pub fn type_mismatch(field: Field, expected: &'static str, got: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field,
            expected,
            got: got.into(),
        }
    }

    /// Creates a field-conflict error.
    #[must_use]
    pub const fn conflict(field: Field) -> Self {
        Self::FieldConflict { field }
    }

    /// Creates an invalid-vocabulary error.
    #[must_use]
    pub fn invalid_enum(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnum {
            kind,
            value: value.into(),
        }
    }

    /// Returns true if this error indicates a caller mistake rather than
    /// an engine defect.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::NonConvergence { .. } | Self::Arithmetic(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_names_entity_and_field() {
        let err = DomainError::unknown_field("Offer", "price");
        assert!(err.to_string().contains("Offer"));
        assert!(err.to_string().contains("price"));
        assert!(err.is_input_error());
    }

    #[test]
    fn conflict_names_field() {
        let err = DomainError::conflict(Field::Side);
        assert!(err.to_string().contains("side"));
    }

    #[test]
    fn non_convergence_is_not_an_input_error() {
        let err = DomainError::NonConvergence { passes: 64 };
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn arithmetic_error_converts() {
        let err: DomainError = ArithmeticError::DivisionByZero.into();
        assert_eq!(err.to_string(), "division by zero");
    }
}
