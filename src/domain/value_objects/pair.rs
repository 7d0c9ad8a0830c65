//! # Pair Value Object
//!
//! A trading pair of two distinct instruments.
//!
//! Construction is unordered, storage is ordered: `Pair::new(a, b)`
//! stores `a` as base and `b` as quote, but a pair built the other way
//! round compares equal. Parsing accepts `/`, `_`, or `-` separators.
//!
//! # Examples
//!
//! ```
//! use trade_resolver::domain::value_objects::pair::Pair;
//!
//! let btc_usd: Pair = "BTC/USD".parse().unwrap();
//! let usd_btc: Pair = "USD_BTC".parse().unwrap();
//! assert_eq!(btc_usd, usd_btc);
//! assert_eq!(btc_usd.base().code(), "BTC");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::instrument::Instrument;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Separators accepted when parsing a pair from a string.
const SEPARATORS: [char; 3] = ['/', '_', '-'];

/// An unordered-construction, ordered-storage pair of distinct
/// instruments.
///
/// # Invariants
///
/// - `base != quote`
/// - equality holds regardless of construction order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    base: Instrument,
    quote: Instrument,
}

impl Pair {
    /// Creates a pair from base and quote instruments.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IdenticalInstruments` if both sides carry
    /// the same code.
    pub fn new(base: Instrument, quote: Instrument) -> DomainResult<Self> {
        if base == quote {
            return Err(DomainError::IdenticalInstruments(base.code().to_string()));
        }
        Ok(Self { base, quote })
    }

    /// Creates a pair from two codes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyInstrumentCode` for an empty code and
    /// `DomainError::IdenticalInstruments` if the codes match.
    ///
    /// # Examples
    ///
    /// ```
    /// use trade_resolver::domain::value_objects::pair::Pair;
    ///
    /// let pair = Pair::from_codes("BTC", "USD").unwrap();
    /// assert_eq!(pair.to_string(), "BTC/USD");
    /// assert!(Pair::from_codes("BTC", "BTC").is_err());
    /// ```
    pub fn from_codes(base: impl AsRef<str>, quote: impl AsRef<str>) -> DomainResult<Self> {
        Self::new(Instrument::new(base)?, Instrument::new(quote)?)
    }

    /// Returns the base instrument.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> &Instrument {
        &self.base
    }

    /// Returns the quote instrument.
    #[inline]
    #[must_use]
    pub const fn quote(&self) -> &Instrument {
        &self.quote
    }

    /// Returns true if either side carries the given instrument.
    #[must_use]
    pub fn contains(&self, instrument: &Instrument) -> bool {
        self.base == *instrument || self.quote == *instrument
    }

    /// Returns the side opposite to the given instrument, if the
    /// instrument belongs to the pair.
    #[must_use]
    pub fn other(&self, instrument: &Instrument) -> Option<&Instrument> {
        if self.base == *instrument {
            Some(&self.quote)
        } else if self.quote == *instrument {
            Some(&self.base)
        } else {
            None
        }
    }

    /// Returns the pair with base and quote swapped.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        (self.base == other.base && self.quote == other.quote)
            || (self.base == other.quote && self.quote == other.base)
    }
}

impl Eq for Pair {}

impl Hash for Pair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent: hash the codes in sorted order so that
        // equal pairs hash equally regardless of construction order.
        let (first, second) = if self.base.code() <= self.quote.code() {
            (self.base.code(), self.quote.code())
        } else {
            (self.quote.code(), self.base.code())
        };
        first.hash(state);
        second.hash(state);
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base.code(), self.quote.code())
    }
}

impl FromStr for Pair {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator = s
            .chars()
            .find(|c| SEPARATORS.contains(c))
            .ok_or_else(|| DomainError::InvalidPair(s.to_string()))?;
        let mut parts = s.splitn(2, separator);
        let base = parts.next().unwrap_or_default();
        let quote = parts.next().unwrap_or_default();
        if base.is_empty() || quote.is_empty() {
            return Err(DomainError::InvalidPair(s.to_string()));
        }
        Self::from_codes(base, quote)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn keeps_construction_order_in_storage() {
            let pair = Pair::from_codes("BTC", "USD").unwrap();
            assert_eq!(pair.base().code(), "BTC");
            assert_eq!(pair.quote().code(), "USD");
        }

        #[test]
        fn identical_sides_are_rejected() {
            assert!(matches!(
                Pair::from_codes("BTC", "btc"),
                Err(DomainError::IdenticalInstruments(_))
            ));
        }
    }

    mod equality {
        use super::*;

        #[test]
        fn is_order_independent() {
            let a = Pair::from_codes("BTC", "USD").unwrap();
            let b = Pair::from_codes("USD", "BTC").unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn hash_is_order_independent() {
            use std::collections::HashSet;
            let mut set = HashSet::new();
            set.insert(Pair::from_codes("BTC", "USD").unwrap());
            assert!(set.contains(&Pair::from_codes("USD", "BTC").unwrap()));
        }

        #[test]
        fn different_pairs_differ() {
            let a = Pair::from_codes("BTC", "USD").unwrap();
            let b = Pair::from_codes("ETH", "USD").unwrap();
            assert_ne!(a, b);
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn accepts_all_separators() {
            for raw in ["BTC/USD", "BTC_USD", "BTC-USD"] {
                let pair: Pair = raw.parse().unwrap();
                assert_eq!(pair.to_string(), "BTC/USD");
            }
        }

        #[test]
        fn rejects_missing_separator() {
            assert!(matches!(
                "BTCUSD".parse::<Pair>(),
                Err(DomainError::InvalidPair(_))
            ));
        }

        #[test]
        fn rejects_empty_side() {
            assert!("BTC/".parse::<Pair>().is_err());
            assert!("/USD".parse::<Pair>().is_err());
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn other_returns_the_opposite_side() {
            let pair = Pair::from_codes("BTC", "USD").unwrap();
            let btc = Instrument::new("BTC").unwrap();
            assert_eq!(pair.other(&btc).unwrap().code(), "USD");
            let eth = Instrument::new("ETH").unwrap();
            assert!(pair.other(&eth).is_none());
        }

        #[test]
        fn inverted_swaps_sides_but_stays_equal() {
            let pair = Pair::from_codes("BTC", "USD").unwrap();
            let inverted = pair.inverted();
            assert_eq!(inverted.base().code(), "USD");
            assert_eq!(pair, inverted);
        }
    }
}
