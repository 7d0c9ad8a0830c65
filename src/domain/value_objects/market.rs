//! # Market Value Objects
//!
//! A market binds a symbol to a trading context on an exchange, together
//! with its limit bands and fee schedule.
//!
//! This module provides:
//! - [`MarketContext`] - spot, margin, or funding
//! - [`MarketSymbol`] - a [`Pair`] for spot/margin, a bare [`Instrument`] for funding
//! - [`LimitBand`] - per-field min/max/precision/significant-digits
//! - [`Limits`] / [`FeeSchedule`] - all-`None` templates merged on update
//! - [`Market`] - the bound market
//! - [`MarketCatalog`] - immutable lookup shared across resolutions
//!
//! # Examples
//!
//! ```
//! use trade_resolver::domain::value_objects::market::{Limits, LimitBand, Market};
//! use trade_resolver::domain::value_objects::pair::Pair;
//!
//! let pair: Pair = "BTC/USD".parse().unwrap();
//! let mut market = Market::spot(pair, "bitfinex");
//! let mut limits = Limits::default();
//! limits.amount = LimitBand::with_precision(8);
//! market.merge_limits(&limits);
//! assert_eq!(market.limits().amount.precision, Some(8));
//! ```

use crate::domain::value_objects::enums::TradeContext;
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::pair::Pair;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Context a market trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum MarketContext {
    /// Spot market over a pair.
    Spot = 0,
    /// Margin market over a pair.
    Margin = 1,
    /// Funding market over a single instrument.
    Funding = 2,
}

impl fmt::Display for MarketContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Margin => write!(f, "margin"),
            Self::Funding => write!(f, "funding"),
        }
    }
}

impl From<TradeContext> for MarketContext {
    fn from(ctx: TradeContext) -> Self {
        match ctx {
            TradeContext::Spot => Self::Spot,
            TradeContext::Margin => Self::Margin,
        }
    }
}

/// Symbol a market is keyed by: a pair for spot/margin, a bare
/// instrument for funding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketSymbol {
    /// Pair symbol (spot and margin markets).
    Pair(Pair),
    /// Single-instrument symbol (funding markets).
    Instrument(Instrument),
}

impl MarketSymbol {
    /// Returns the pair, if this is a pair symbol.
    #[must_use]
    pub const fn as_pair(&self) -> Option<&Pair> {
        match self {
            Self::Pair(pair) => Some(pair),
            Self::Instrument(_) => None,
        }
    }

    /// Returns the instrument, if this is a funding symbol.
    #[must_use]
    pub const fn as_instrument(&self) -> Option<&Instrument> {
        match self {
            Self::Instrument(instrument) => Some(instrument),
            Self::Pair(_) => None,
        }
    }
}

impl fmt::Display for MarketSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pair(pair) => write!(f, "{pair}"),
            Self::Instrument(instrument) => write!(f, "{instrument}"),
        }
    }
}

/// Min/max/precision/significant-digits band for one numeric field.
///
/// All members default to `None`; merging overwrites only the members
/// the other band actually sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LimitBand {
    /// Minimum accepted value.
    pub min: Option<Decimal>,
    /// Maximum accepted value.
    pub max: Option<Decimal>,
    /// Fractional digits values are truncated to.
    pub precision: Option<u32>,
    /// Significant digits values are rounded to.
    pub significant_digits: Option<u32>,
}

impl LimitBand {
    /// Creates a band that only sets a truncation precision.
    #[must_use]
    pub const fn with_precision(precision: u32) -> Self {
        Self {
            min: None,
            max: None,
            precision: Some(precision),
            significant_digits: None,
        }
    }

    /// Overlays the set members of `other` onto this band.
    pub fn merge(&mut self, other: &Self) {
        if other.min.is_some() {
            self.min = other.min;
        }
        if other.max.is_some() {
            self.max = other.max;
        }
        if other.precision.is_some() {
            self.precision = other.precision;
        }
        if other.significant_digits.is_some() {
            self.significant_digits = other.significant_digits;
        }
    }
}

/// Per-field limit bands of a market.
///
/// `duration` and `daily_rate` only carry meaning on funding markets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Limits {
    /// Band for the amount field.
    pub amount: LimitBand,
    /// Band for the price field.
    pub price: LimitBand,
    /// Band for the total field.
    pub total: LimitBand,
    /// Band for the funding duration field, in days.
    pub duration: LimitBand,
    /// Band for the funding daily-rate field.
    pub daily_rate: LimitBand,
}

impl Limits {
    /// Overlays the set members of `other` field by field.
    ///
    /// Merging never clears a previously known member.
    pub fn merge(&mut self, other: &Self) {
        self.amount.merge(&other.amount);
        self.price.merge(&other.price);
        self.total.merge(&other.total);
        self.duration.merge(&other.duration);
        self.daily_rate.merge(&other.daily_rate);
    }
}

/// Fee percentages of a market, as fractions (0.001 = 0.1%).
///
/// Trading markets use maker/taker; funding markets use normal/hidden.
/// All members default to `None` and merge member-wise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee for resting (maker) executions.
    pub maker: Option<Decimal>,
    /// Fee for aggressing (taker) executions.
    pub taker: Option<Decimal>,
    /// Fee for visible funding offers.
    pub normal: Option<Decimal>,
    /// Fee for hidden funding offers.
    pub hidden: Option<Decimal>,
}

impl FeeSchedule {
    /// Creates a maker/taker schedule for a trading market.
    #[must_use]
    pub const fn trading(maker: Decimal, taker: Decimal) -> Self {
        Self {
            maker: Some(maker),
            taker: Some(taker),
            normal: None,
            hidden: None,
        }
    }

    /// Creates a normal/hidden schedule for a funding market.
    #[must_use]
    pub const fn funding(normal: Decimal, hidden: Decimal) -> Self {
        Self {
            maker: None,
            taker: None,
            normal: Some(normal),
            hidden: Some(hidden),
        }
    }

    /// Overlays the set members of `other` onto this schedule.
    pub fn merge(&mut self, other: &Self) {
        if other.maker.is_some() {
            self.maker = other.maker;
        }
        if other.taker.is_some() {
            self.taker = other.taker;
        }
        if other.normal.is_some() {
            self.normal = other.normal;
        }
        if other.hidden.is_some() {
            self.hidden = other.hidden;
        }
    }
}

/// A market: symbol + context + owning exchange + limits + fees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    symbol: MarketSymbol,
    context: MarketContext,
    exchange: String,
    limits: Limits,
    fees: FeeSchedule,
}

impl Market {
    /// Creates a spot market over a pair.
    #[must_use]
    pub fn spot(pair: Pair, exchange: impl Into<String>) -> Self {
        Self::new(MarketSymbol::Pair(pair), MarketContext::Spot, exchange)
    }

    /// Creates a margin market over a pair.
    #[must_use]
    pub fn margin(pair: Pair, exchange: impl Into<String>) -> Self {
        Self::new(MarketSymbol::Pair(pair), MarketContext::Margin, exchange)
    }

    /// Creates a funding market over a single instrument.
    #[must_use]
    pub fn funding(instrument: Instrument, exchange: impl Into<String>) -> Self {
        Self::new(
            MarketSymbol::Instrument(instrument),
            MarketContext::Funding,
            exchange,
        )
    }

    /// Creates a market with all-`None` limits and fees.
    #[must_use]
    pub fn new(symbol: MarketSymbol, context: MarketContext, exchange: impl Into<String>) -> Self {
        Self {
            symbol,
            context,
            exchange: exchange.into(),
            limits: Limits::default(),
            fees: FeeSchedule::default(),
        }
    }

    /// Returns the market symbol.
    #[inline]
    #[must_use]
    pub const fn symbol(&self) -> &MarketSymbol {
        &self.symbol
    }

    /// Returns the pair, if this is a pair market.
    #[must_use]
    pub const fn pair(&self) -> Option<&Pair> {
        self.symbol.as_pair()
    }

    /// Returns the funding instrument, if this is a funding market.
    #[must_use]
    pub const fn instrument(&self) -> Option<&Instrument> {
        self.symbol.as_instrument()
    }

    /// Returns the trading context.
    #[inline]
    #[must_use]
    pub const fn context(&self) -> MarketContext {
        self.context
    }

    /// Returns the owning exchange name.
    #[inline]
    #[must_use]
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Returns the limit bands.
    #[inline]
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the fee schedule.
    #[inline]
    #[must_use]
    pub const fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Merges new limit information into the market.
    pub fn merge_limits(&mut self, limits: &Limits) {
        self.limits.merge(limits);
    }

    /// Merges new fee information into the market.
    pub fn merge_fees(&mut self, fees: &FeeSchedule) {
        self.fees.merge(fees);
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.exchange, self.context, self.symbol)
    }
}

/// Immutable lookup of markets by (exchange, symbol, context).
///
/// Built once, then shared read-only (typically behind an `Arc`);
/// concurrent resolution against the same catalog is safe because the
/// catalog carries no resolver-owned mutable state.
#[derive(Debug, Clone, Default)]
pub struct MarketCatalog {
    markets: HashMap<(String, String, MarketContext), Market>,
}

impl MarketCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a market, replacing any previous entry for the same key.
    pub fn insert(&mut self, market: Market) {
        let key = (
            market.exchange().to_string(),
            market.symbol().to_string(),
            market.context(),
        );
        self.markets.insert(key, market);
    }

    /// Looks up a pair market.
    #[must_use]
    pub fn pair_market(&self, exchange: &str, pair: &Pair, context: MarketContext) -> Option<&Market> {
        // Pair display is base/quote of construction order; probe the
        // inverse spelling too since pair equality is unordered.
        self.lookup(exchange, &pair.to_string(), context)
            .or_else(|| self.lookup(exchange, &pair.inverted().to_string(), context))
    }

    /// Looks up a funding market.
    #[must_use]
    pub fn funding_market(&self, exchange: &str, instrument: &Instrument) -> Option<&Market> {
        self.lookup(exchange, instrument.code(), MarketContext::Funding)
    }

    fn lookup(&self, exchange: &str, symbol: &str, context: MarketContext) -> Option<&Market> {
        self.markets
            .get(&(exchange.to_string(), symbol.to_string(), context))
    }

    /// Returns the number of catalogued markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Returns true if the catalog holds no markets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn btc_usd() -> Pair {
        "BTC/USD".parse().unwrap()
    }

    mod limits {
        use super::*;

        #[test]
        fn defaults_are_all_none() {
            let limits = Limits::default();
            assert!(limits.amount.precision.is_none());
            assert!(limits.price.min.is_none());
        }

        #[test]
        fn merge_is_field_wise() {
            let mut limits = Limits::default();
            limits.amount = LimitBand {
                min: Some(dec("0.001")),
                max: None,
                precision: Some(8),
                significant_digits: None,
            };

            let mut update = Limits::default();
            update.price = LimitBand::with_precision(5);
            update.amount.max = Some(dec("2000"));
            limits.merge(&update);

            // Updated members land, previously known members survive.
            assert_eq!(limits.amount.min, Some(dec("0.001")));
            assert_eq!(limits.amount.max, Some(dec("2000")));
            assert_eq!(limits.amount.precision, Some(8));
            assert_eq!(limits.price.precision, Some(5));
        }
    }

    mod fees {
        use super::*;

        #[test]
        fn merge_does_not_clear() {
            let mut fees = FeeSchedule::trading(dec("0.001"), dec("0.002"));
            fees.merge(&FeeSchedule {
                taker: Some(dec("0.0025")),
                ..FeeSchedule::default()
            });
            assert_eq!(fees.maker, Some(dec("0.001")));
            assert_eq!(fees.taker, Some(dec("0.0025")));
        }
    }

    mod catalog {
        use super::*;

        #[test]
        fn finds_pair_market_in_either_spelling() {
            let mut catalog = MarketCatalog::new();
            catalog.insert(Market::spot(btc_usd(), "bitfinex"));

            let reversed: Pair = "USD/BTC".parse().unwrap();
            assert!(
                catalog
                    .pair_market("bitfinex", &reversed, MarketContext::Spot)
                    .is_some()
            );
        }

        #[test]
        fn contexts_are_distinct() {
            let mut catalog = MarketCatalog::new();
            catalog.insert(Market::spot(btc_usd(), "bitfinex"));
            assert!(
                catalog
                    .pair_market("bitfinex", &btc_usd(), MarketContext::Margin)
                    .is_none()
            );
        }

        #[test]
        fn finds_funding_market() {
            let mut catalog = MarketCatalog::new();
            let usd = Instrument::new("USD").unwrap();
            catalog.insert(Market::funding(usd.clone(), "bitfinex"));
            assert!(catalog.funding_market("bitfinex", &usd).is_some());
            assert_eq!(catalog.len(), 1);
        }
    }
}
