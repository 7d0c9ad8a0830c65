//! # Instrument Value Object
//!
//! Identity of a tradable currency or asset.
//!
//! Equality and hashing are by canonical code only; display name and
//! decimal precision are supplementary metadata consumed by rounding
//! rules. Instruments are immutable once constructed.
//!
//! # Examples
//!
//! ```
//! use trade_resolver::domain::value_objects::instrument::Instrument;
//!
//! let btc = Instrument::new("btc").unwrap();
//! let also_btc = Instrument::with_precision("BTC", 8).unwrap();
//! assert_eq!(btc, also_btc);
//! assert_eq!(btc.code(), "BTC");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A tradable currency or asset identity.
///
/// # Invariants
///
/// - `code` is non-empty and stored uppercased
/// - equality and hashing consider `code` only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    code: String,
    name: Option<String>,
    precision: Option<u32>,
}

impl Instrument {
    /// Creates an instrument from its canonical code.
    ///
    /// The code is uppercased; `"btc"` and `"BTC"` construct equal
    /// instruments.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyInstrumentCode` if the code is empty
    /// or whitespace.
    pub fn new(code: impl AsRef<str>) -> DomainResult<Self> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(DomainError::EmptyInstrumentCode);
        }
        Ok(Self {
            code: code.to_uppercase(),
            name: None,
            precision: None,
        })
    }

    /// Creates an instrument with a decimal precision.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyInstrumentCode` if the code is empty.
    pub fn with_precision(code: impl AsRef<str>, precision: u32) -> DomainResult<Self> {
        let mut instrument = Self::new(code)?;
        instrument.precision = Some(precision);
        Ok(instrument)
    }

    /// Creates an instrument with a display name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyInstrumentCode` if the code is empty.
    pub fn with_name(code: impl AsRef<str>, name: impl Into<String>) -> DomainResult<Self> {
        let mut instrument = Self::new(code)?;
        instrument.name = Some(name.into());
        Ok(instrument)
    }

    /// Returns the canonical code (uppercased).
    #[inline]
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the display name, if any.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the decimal precision, if known.
    #[inline]
    #[must_use]
    pub const fn precision(&self) -> Option<u32> {
        self.precision
    }
}

impl PartialEq for Instrument {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Instrument {}

impl Hash for Instrument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn code_is_uppercased() {
        let instrument = Instrument::new("eth").unwrap();
        assert_eq!(instrument.code(), "ETH");
    }

    #[test]
    fn equality_ignores_metadata() {
        let bare = Instrument::new("BTC").unwrap();
        let rich = Instrument::with_precision("BTC", 8).unwrap();
        assert_eq!(bare, rich);
    }

    #[test]
    fn hashing_follows_equality() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Instrument::new("BTC").unwrap());
        assert!(set.contains(&Instrument::with_precision("btc", 8).unwrap()));
    }

    #[test]
    fn empty_code_is_rejected() {
        assert!(matches!(
            Instrument::new("  "),
            Err(DomainError::EmptyInstrumentCode)
        ));
    }

    #[test]
    fn name_and_precision_are_kept() {
        let usd = Instrument::with_name("USD", "US Dollar").unwrap();
        assert_eq!(usd.name(), Some("US Dollar"));
        let btc = Instrument::with_precision("BTC", 8).unwrap();
        assert_eq!(btc.precision(), Some(8));
    }
}
