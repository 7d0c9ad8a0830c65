//! # Ticker Value Object
//!
//! Current quote of a market, and the named price points shortcut
//! substitution resolves against.
//!
//! # Examples
//!
//! ```
//! use trade_resolver::domain::value_objects::ticker::{PricePoint, Ticker};
//! use rust_decimal::Decimal;
//!
//! let ticker = Ticker::new(
//!     "100".parse().unwrap(),
//!     "102".parse().unwrap(),
//!     "101".parse().unwrap(),
//! );
//! assert_eq!(ticker.mid(), "101".parse::<Decimal>().unwrap());
//! assert_eq!(PricePoint::Mid.select(&ticker), ticker.mid());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A market quote snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    bid: Decimal,
    ask: Decimal,
    last: Decimal,
    mid: Decimal,
}

impl Ticker {
    /// Creates a ticker; the mid price is the bid/ask midpoint.
    #[must_use]
    pub fn new(bid: Decimal, ask: Decimal, last: Decimal) -> Self {
        let two = Decimal::new(2, 0);
        let mid = (bid + ask) / two;
        Self {
            bid,
            ask,
            last,
            mid,
        }
    }

    /// Best bid price.
    #[inline]
    #[must_use]
    pub const fn bid(&self) -> Decimal {
        self.bid
    }

    /// Best ask price.
    #[inline]
    #[must_use]
    pub const fn ask(&self) -> Decimal {
        self.ask
    }

    /// Last traded price.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> Decimal {
        self.last
    }

    /// Bid/ask midpoint.
    #[inline]
    #[must_use]
    pub const fn mid(&self) -> Decimal {
        self.mid
    }
}

/// A named price point on a ticker.
///
/// A price supplied as the text `"bid"`, `"ask"`, `"last"`, or `"mid"`
/// is replaced by the corresponding point of the market's current quote
/// during shortcut substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PricePoint {
    /// Best bid.
    Bid = 0,
    /// Best ask.
    Ask = 1,
    /// Last trade.
    Last = 2,
    /// Bid/ask midpoint.
    Mid = 3,
}

impl PricePoint {
    /// Selects this point from a ticker.
    #[must_use]
    pub const fn select(self, ticker: &Ticker) -> Decimal {
        match self {
            Self::Bid => ticker.bid(),
            Self::Ask => ticker.ask(),
            Self::Last => ticker.last(),
            Self::Mid => ticker.mid(),
        }
    }
}

impl fmt::Display for PricePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid => write!(f, "bid"),
            Self::Ask => write!(f, "ask"),
            Self::Last => write!(f, "last"),
            Self::Mid => write!(f, "mid"),
        }
    }
}

impl FromStr for PricePoint {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bid" => Ok(Self::Bid),
            "ask" => Ok(Self::Ask),
            "last" => Ok(Self::Last),
            "mid" => Ok(Self::Mid),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn mid_is_the_midpoint() {
        let ticker = Ticker::new(dec("100"), dec("102"), dec("99"));
        assert_eq!(ticker.mid(), dec("101"));
    }

    #[test]
    fn select_picks_each_point() {
        let ticker = Ticker::new(dec("100"), dec("102"), dec("99"));
        assert_eq!(PricePoint::Bid.select(&ticker), dec("100"));
        assert_eq!(PricePoint::Ask.select(&ticker), dec("102"));
        assert_eq!(PricePoint::Last.select(&ticker), dec("99"));
        assert_eq!(PricePoint::Mid.select(&ticker), dec("101"));
    }

    #[test]
    fn parses_named_points_only() {
        assert_eq!("MID".parse::<PricePoint>().unwrap(), PricePoint::Mid);
        assert!("vwap".parse::<PricePoint>().is_err());
    }
}
