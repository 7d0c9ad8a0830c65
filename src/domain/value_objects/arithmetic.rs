//! # Exact Decimal Arithmetic
//!
//! Checked base-10 arithmetic and the two rounding modes used by
//! derivation rules.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//! - [`add`], [`subtract`], [`multiply`], [`divide`] - exact operations
//! - [`round_down`] - truncation toward zero at a fractional-digit count
//! - [`round_significant`] - rounding to a significant-digit count
//!
//! All operations work on [`rust_decimal::Decimal`], so `1.1 + 2.2` is
//! exactly `3.3` and `1.1 × 2.2` is exactly `2.42` — no binary-float
//! artifacts.
//!
//! # Examples
//!
//! ```
//! use trade_resolver::domain::value_objects::arithmetic::{add, multiply};
//! use rust_decimal::Decimal;
//!
//! let a: Decimal = "1.1".parse().unwrap();
//! let b: Decimal = "2.2".parse().unwrap();
//! assert_eq!(add(a, b).unwrap(), "3.3".parse().unwrap());
//! assert_eq!(multiply(a, b).unwrap(), "2.42".parse().unwrap());
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error type for arithmetic operations.
///
/// Represents failures that can occur during checked arithmetic,
/// including overflow, underflow, division by zero, and invalid values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic operation resulted in underflow.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,

    /// A significant-digit count of zero.
    #[error("significant digits must be positive")]
    InvalidPrecision,

    /// Invalid value provided (e.g., negative when positive required).
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Trait for checked arithmetic operations.
///
/// Provides safe arithmetic methods that return `Result` instead of
/// panicking on overflow, underflow, or division by zero.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely subtract two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would underflow.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely divide two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Exact addition.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if the result would overflow.
#[inline]
pub fn add(a: Decimal, b: Decimal) -> ArithmeticResult<Decimal> {
    a.safe_add(b)
}

/// Exact subtraction.
///
/// # Errors
///
/// Returns `ArithmeticError::Underflow` if the result would underflow.
#[inline]
pub fn subtract(a: Decimal, b: Decimal) -> ArithmeticResult<Decimal> {
    a.safe_sub(b)
}

/// Exact multiplication.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if the result would overflow.
#[inline]
pub fn multiply(a: Decimal, b: Decimal) -> ArithmeticResult<Decimal> {
    a.safe_mul(b)
}

/// Exact division.
///
/// # Errors
///
/// Returns `ArithmeticError::DivisionByZero` if `b` is zero.
#[inline]
pub fn divide(a: Decimal, b: Decimal) -> ArithmeticResult<Decimal> {
    a.safe_div(b)
}

/// Truncates `value` toward zero at `digits` fractional digits.
///
/// No rounding away from zero ever occurs; `round_down(2.9e-9, 9)` is
/// exactly `2e-9`.
///
/// # Examples
///
/// ```
/// use trade_resolver::domain::value_objects::arithmetic::round_down;
/// use rust_decimal::Decimal;
///
/// let x = Decimal::from_scientific("2.9115832281587436e-9").unwrap();
/// assert_eq!(round_down(x, 9), Decimal::from_scientific("2e-9").unwrap());
/// ```
#[must_use]
pub fn round_down(value: Decimal, digits: u32) -> Decimal {
    value.trunc_with_scale(digits)
}

/// Rounds `value` half-away-from-zero to `digits` significant digits.
///
/// # Errors
///
/// Returns `ArithmeticError::InvalidPrecision` if `digits` is zero.
///
/// # Examples
///
/// ```
/// use trade_resolver::domain::value_objects::arithmetic::round_significant;
/// use rust_decimal::Decimal;
///
/// let x: Decimal = "1.987654321".parse().unwrap();
/// assert_eq!(round_significant(x, 5).unwrap(), "1.9877".parse().unwrap());
/// ```
pub fn round_significant(value: Decimal, digits: u32) -> ArithmeticResult<Decimal> {
    if digits == 0 {
        return Err(ArithmeticError::InvalidPrecision);
    }
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }

    // floor(log10(|value|)), found by walking powers of ten; the decimal
    // range is bounded at 28 digits either side so the walk is short.
    let abs = value.abs();
    let mut magnitude: i64 = 0;
    let mut probe = Decimal::ONE;
    if abs >= Decimal::ONE {
        while let Some(next) = probe.checked_mul(Decimal::TEN) {
            if next > abs {
                break;
            }
            probe = next;
            magnitude += 1;
        }
    } else {
        while probe > abs {
            probe = probe.safe_div(Decimal::TEN)?;
            magnitude -= 1;
        }
    }

    let scale = i64::from(digits) - 1 - magnitude;
    if scale >= 0 {
        let scale = u32::try_from(scale.min(28)).unwrap_or(28);
        Ok(value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero))
    } else {
        // Rounding lands left of the decimal point: shift down, round at
        // zero fractional digits, shift back.
        let mut factor = Decimal::ONE;
        for _ in 0..(-scale) {
            factor = factor.safe_mul(Decimal::TEN)?;
        }
        let shifted = value.safe_div(factor)?;
        let rounded = shifted.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        rounded.safe_mul(factor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    mod exact_operations {
        use super::*;

        #[test]
        fn add_has_no_float_drift() {
            assert_eq!(add(dec("1.1"), dec("2.2")).unwrap(), dec("3.3"));
        }

        #[test]
        fn subtract_is_exact() {
            assert_eq!(subtract(dec("3.3"), dec("2.2")).unwrap(), dec("1.1"));
        }

        #[test]
        fn multiply_has_no_float_drift() {
            assert_eq!(multiply(dec("1.1"), dec("2.2")).unwrap(), dec("2.42"));
        }

        #[test]
        fn divide_is_exact() {
            assert_eq!(divide(dec("2000"), dec("1000")).unwrap(), dec("2"));
        }

        #[test]
        fn divide_by_zero_fails() {
            assert_eq!(
                divide(dec("1"), Decimal::ZERO),
                Err(ArithmeticError::DivisionByZero)
            );
        }

        #[test]
        fn add_overflow_fails() {
            assert_eq!(
                add(Decimal::MAX, Decimal::MAX),
                Err(ArithmeticError::Overflow)
            );
        }
    }

    mod rounding_down {
        use super::*;

        #[test]
        fn truncates_tiny_values() {
            let x = Decimal::from_scientific("2.9115832281587436e-9").unwrap();
            assert_eq!(round_down(x, 9), Decimal::from_scientific("2e-9").unwrap());
        }

        #[test]
        fn truncates_toward_zero() {
            assert_eq!(round_down(dec("1.999"), 2), dec("1.99"));
            assert_eq!(round_down(dec("-1.999"), 2), dec("-1.99"));
        }

        #[test]
        fn no_op_when_already_coarser() {
            assert_eq!(round_down(dec("1.5"), 4), dec("1.5"));
        }
    }

    mod rounding_significant {
        use super::*;

        #[test]
        fn rounds_to_five_digits() {
            assert_eq!(
                round_significant(dec("1.987654321"), 5).unwrap(),
                dec("1.9877")
            );
        }

        #[test]
        fn rounds_small_values() {
            assert_eq!(
                round_significant(dec("0.00012345"), 2).unwrap(),
                dec("0.00012")
            );
        }

        #[test]
        fn rounds_left_of_the_point() {
            assert_eq!(round_significant(dec("123456"), 2).unwrap(), dec("120000"));
        }

        #[test]
        fn zero_stays_zero() {
            assert_eq!(round_significant(Decimal::ZERO, 3).unwrap(), Decimal::ZERO);
        }

        #[test]
        fn negative_values_round_away_from_zero() {
            assert_eq!(round_significant(dec("-1.98765"), 4).unwrap(), dec("-1.988"));
        }

        #[test]
        fn zero_digits_is_rejected() {
            assert_eq!(
                round_significant(dec("1.5"), 0),
                Err(ArithmeticError::InvalidPrecision)
            );
        }
    }

    mod checked_trait {
        use super::*;

        #[test]
        fn safe_div_by_zero_fails() {
            assert_eq!(
                dec("100").safe_div(Decimal::ZERO),
                Err(ArithmeticError::DivisionByZero)
            );
        }

        #[test]
        fn safe_mul_works() {
            assert_eq!(dec("10").safe_mul(dec("5")).unwrap(), dec("50"));
        }
    }
}
