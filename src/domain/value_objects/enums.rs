//! # Domain Enums
//!
//! Closed vocabularies for order and offer attributes.
//!
//! This module provides the enumerations the sanitation step coerces
//! string input into:
//!
//! - [`Side`] - buy or sell direction of a trade
//! - [`OrderKind`] - limit or market execution
//! - [`TradeContext`] - spot or margin trading context
//! - [`OfferSide`] - lend or borrow direction of a funding offer
//! - [`OfferKind`] - normal or hidden funding offer
//!
//! All vocabularies are lowercase on the wire (`"buy"`, `"limit"`,
//! `"spot"`, ...); parsing is case-insensitive and a value outside the
//! vocabulary is a [`DomainError::InvalidEnum`].

use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade side indicating buy or sell direction.
///
/// # Examples
///
/// ```
/// use trade_resolver::domain::value_objects::enums::Side;
///
/// let side: Side = "buy".parse().unwrap();
/// assert_eq!(side.opposite(), Side::Sell);
/// assert_eq!(side.to_string(), "buy");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    /// Buy order - acquiring the base instrument.
    Buy = 0,
    /// Sell order - disposing of the base instrument.
    Sell = 1,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns true if this is a buy order.
    #[inline]
    #[must_use]
    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }

    /// Returns true if this is a sell order.
    #[inline]
    #[must_use]
    pub const fn is_sell(self) -> bool {
        matches!(self, Self::Sell)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Side {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(DomainError::invalid_enum("side", s)),
        }
    }
}

/// Execution kind of an order.
///
/// A limit order carries a price; a market order executes at whatever
/// the book offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum OrderKind {
    /// Priced order resting on the book.
    Limit = 0,
    /// Unpriced order executing immediately.
    Market = 1,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit => write!(f, "limit"),
            Self::Market => write!(f, "market"),
        }
    }
}

impl FromStr for OrderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "limit" => Ok(Self::Limit),
            "market" => Ok(Self::Market),
            _ => Err(DomainError::invalid_enum("order type", s)),
        }
    }
}

/// Trading context of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TradeContext {
    /// Plain spot trading.
    Spot = 0,
    /// Margin trading against borrowed funds.
    Margin = 1,
}

impl fmt::Display for TradeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Margin => write!(f, "margin"),
        }
    }
}

impl FromStr for TradeContext {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spot" => Ok(Self::Spot),
            "margin" => Ok(Self::Margin),
            _ => Err(DomainError::invalid_enum("context", s)),
        }
    }
}

/// Direction of a margin-funding offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum OfferSide {
    /// Offering funds to the market.
    Lend = 0,
    /// Taking funds from the market.
    Borrow = 1,
}

impl OfferSide {
    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Lend => Self::Borrow,
            Self::Borrow => Self::Lend,
        }
    }
}

impl fmt::Display for OfferSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lend => write!(f, "lend"),
            Self::Borrow => write!(f, "borrow"),
        }
    }
}

impl FromStr for OfferSide {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lend" => Ok(Self::Lend),
            "borrow" => Ok(Self::Borrow),
            _ => Err(DomainError::invalid_enum("offer side", s)),
        }
    }
}

/// Visibility kind of a funding offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum OfferKind {
    /// Visible offer paying the normal fee rate.
    Normal = 0,
    /// Hidden offer paying the hidden fee rate.
    Hidden = 1,
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Hidden => write!(f, "hidden"),
        }
    }
}

impl FromStr for OfferKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "hidden" => Ok(Self::Hidden),
            _ => Err(DomainError::invalid_enum("offer type", s)),
        }
    }
}
