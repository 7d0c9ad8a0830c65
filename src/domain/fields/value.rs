//! # Field Values
//!
//! Untyped input values and the sanitized typed values the resolver
//! stores.
//!
//! [`RawValue`] is what callers and exchange confirmations hand in;
//! [`coerce`] turns a raw value into a [`FieldValue`] of the field's
//! declared kind, failing with `TypeMismatch` for uncoercible input and
//! with `InvalidEnum` for values outside a closed vocabulary.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::fields::{EntityTag, Field, ValueKind};
use crate::domain::value_objects::enums::{OfferKind, OfferSide, OrderKind, Side, TradeContext};
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::market::Market;
use crate::domain::value_objects::pair::Pair;
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;

/// An untyped incoming field value.
///
/// Built via `From` conversions so patches read naturally:
///
/// ```
/// use trade_resolver::domain::fields::{Field, FieldPatch};
///
/// let patch = FieldPatch::new()
///     .set(Field::Side, "buy")
///     .set(Field::Amount, 2)
///     .set(Field::Hidden, true);
/// assert_eq!(patch.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    /// Explicit null; merging removes the field.
    Null,
    /// Boolean input.
    Flag(bool),
    /// Numeric input.
    Num(Decimal),
    /// Text input; also carries shortcut spellings before substitution.
    Text(String),
    /// A pair value.
    Pair(Pair),
    /// An instrument value.
    Instrument(Instrument),
    /// A full market value.
    Market(Market),
    /// A timestamp value.
    Timestamp(Timestamp),
    /// Opaque metadata mapping.
    Metadata(JsonMap<String, JsonValue>),
}

impl RawValue {
    /// Short description of the value, used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Flag(b) => format!("flag `{b}`"),
            Self::Num(n) => format!("number `{n}`"),
            Self::Text(t) => format!("text `{t}`"),
            Self::Pair(p) => format!("pair `{p}`"),
            Self::Instrument(i) => format!("instrument `{i}`"),
            Self::Market(m) => format!("market `{m}`"),
            Self::Timestamp(t) => format!("timestamp `{t}`"),
            Self::Metadata(_) => "metadata mapping".to_string(),
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<Decimal> for RawValue {
    fn from(v: Decimal) -> Self {
        Self::Num(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Num(Decimal::from(v))
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Pair> for RawValue {
    fn from(v: Pair) -> Self {
        Self::Pair(v)
    }
}

impl From<Instrument> for RawValue {
    fn from(v: Instrument) -> Self {
        Self::Instrument(v)
    }
}

impl From<Market> for RawValue {
    fn from(v: Market) -> Self {
        Self::Market(v)
    }
}

impl From<Timestamp> for RawValue {
    fn from(v: Timestamp) -> Self {
        Self::Timestamp(v)
    }
}

impl From<Side> for RawValue {
    fn from(v: Side) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<OfferSide> for RawValue {
    fn from(v: OfferSide) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<OrderKind> for RawValue {
    fn from(v: OrderKind) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<OfferKind> for RawValue {
    fn from(v: OfferKind) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<TradeContext> for RawValue {
    fn from(v: TradeContext) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<JsonMap<String, JsonValue>> for RawValue {
    fn from(v: JsonMap<String, JsonValue>) -> Self {
        Self::Metadata(v)
    }
}

/// A sanitized, typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValue {
    /// Exact decimal.
    Num(Decimal),
    /// Boolean flag.
    Flag(bool),
    /// Free-form text.
    Text(String),
    /// Buy/sell side.
    Side(Side),
    /// Lend/borrow side.
    OfferSide(OfferSide),
    /// Limit/market kind.
    OrderKind(OrderKind),
    /// Normal/hidden kind.
    OfferKind(OfferKind),
    /// Spot/margin context.
    Context(TradeContext),
    /// Trading pair.
    Pair(Pair),
    /// Single instrument.
    Instrument(Instrument),
    /// Full market.
    Market(Market),
    /// Point in time.
    Timestamp(Timestamp),
}

impl FieldValue {
    /// Returns the decimal, if this is a numeric value.
    #[must_use]
    pub const fn as_num(&self) -> Option<Decimal> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag, if this is a boolean value.
    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the side, if this is a buy/sell value.
    #[must_use]
    pub const fn as_side(&self) -> Option<Side> {
        match self {
            Self::Side(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the offer side, if this is a lend/borrow value.
    #[must_use]
    pub const fn as_offer_side(&self) -> Option<OfferSide> {
        match self {
            Self::OfferSide(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the order kind, if this is a limit/market value.
    #[must_use]
    pub const fn as_order_kind(&self) -> Option<OrderKind> {
        match self {
            Self::OrderKind(k) => Some(*k),
            _ => None,
        }
    }

    /// Returns the offer kind, if this is a normal/hidden value.
    #[must_use]
    pub const fn as_offer_kind(&self) -> Option<OfferKind> {
        match self {
            Self::OfferKind(k) => Some(*k),
            _ => None,
        }
    }

    /// Returns the context, if this is a spot/margin value.
    #[must_use]
    pub const fn as_context(&self) -> Option<TradeContext> {
        match self {
            Self::Context(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the pair, if this is a pair value.
    #[must_use]
    pub const fn as_pair(&self) -> Option<&Pair> {
        match self {
            Self::Pair(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the instrument, if this is an instrument value.
    #[must_use]
    pub const fn as_instrument(&self) -> Option<&Instrument> {
        match self {
            Self::Instrument(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the market, if this is a market value.
    #[must_use]
    pub const fn as_market(&self) -> Option<&Market> {
        match self {
            Self::Market(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is a timestamp value.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(t) => write!(f, "{t}"),
            Self::Side(s) => write!(f, "{s}"),
            Self::OfferSide(s) => write!(f, "{s}"),
            Self::OrderKind(k) => write!(f, "{k}"),
            Self::OfferKind(k) => write!(f, "{k}"),
            Self::Context(c) => write!(f, "{c}"),
            Self::Pair(p) => write!(f, "{p}"),
            Self::Instrument(i) => write!(f, "{i}"),
            Self::Market(m) => write!(f, "{m}"),
            Self::Timestamp(t) => write!(f, "{t}"),
        }
    }
}

/// Coerces a raw value to the declared kind of `field` on `entity`.
///
/// # Errors
///
/// - `DomainError::TypeMismatch` for an uncoercible value
/// - `DomainError::InvalidEnum` for a value outside a closed vocabulary
/// - pair/instrument construction failures propagate unchanged
pub fn coerce(entity: EntityTag, field: Field, raw: &RawValue) -> DomainResult<FieldValue> {
    let kind = field.value_kind(entity);
    let mismatch = || DomainError::type_mismatch(field, kind.expected(), raw.describe());

    match kind {
        ValueKind::Decimal => match raw {
            RawValue::Num(n) => Ok(FieldValue::Num(*n)),
            RawValue::Text(t) => t
                .trim()
                .parse::<Decimal>()
                .map(FieldValue::Num)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ValueKind::Flag => match raw {
            RawValue::Flag(b) => Ok(FieldValue::Flag(*b)),
            RawValue::Text(t) => match t.to_lowercase().as_str() {
                "true" => Ok(FieldValue::Flag(true)),
                "false" => Ok(FieldValue::Flag(false)),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        },
        ValueKind::Text => match raw {
            RawValue::Text(t) => Ok(FieldValue::Text(t.clone())),
            RawValue::Num(n) => Ok(FieldValue::Text(n.to_string())),
            _ => Err(mismatch()),
        },
        ValueKind::Side => match raw {
            RawValue::Text(t) => t.parse::<Side>().map(FieldValue::Side),
            _ => Err(mismatch()),
        },
        ValueKind::OfferSide => match raw {
            RawValue::Text(t) => t.parse::<OfferSide>().map(FieldValue::OfferSide),
            _ => Err(mismatch()),
        },
        ValueKind::OrderKind => match raw {
            RawValue::Text(t) => t.parse::<OrderKind>().map(FieldValue::OrderKind),
            _ => Err(mismatch()),
        },
        ValueKind::OfferKind => match raw {
            RawValue::Text(t) => t.parse::<OfferKind>().map(FieldValue::OfferKind),
            _ => Err(mismatch()),
        },
        ValueKind::TradeContext => match raw {
            RawValue::Text(t) => t.parse::<TradeContext>().map(FieldValue::Context),
            _ => Err(mismatch()),
        },
        ValueKind::Pair => match raw {
            RawValue::Pair(p) => Ok(FieldValue::Pair(p.clone())),
            RawValue::Text(t) => t.parse::<Pair>().map(FieldValue::Pair),
            _ => Err(mismatch()),
        },
        ValueKind::Instrument => match raw {
            RawValue::Instrument(i) => Ok(FieldValue::Instrument(i.clone())),
            RawValue::Text(t) => Instrument::new(t).map(FieldValue::Instrument),
            _ => Err(mismatch()),
        },
        ValueKind::Market => match raw {
            RawValue::Market(m) => Ok(FieldValue::Market(m.clone())),
            _ => Err(mismatch()),
        },
        ValueKind::Timestamp => match raw {
            RawValue::Timestamp(t) => Ok(FieldValue::Timestamp(*t)),
            RawValue::Num(n) => n
                .to_i64()
                .and_then(Timestamp::from_millis)
                .map(FieldValue::Timestamp)
                .ok_or_else(mismatch),
            RawValue::Text(t) => Timestamp::parse_rfc3339(t)
                .map(FieldValue::Timestamp)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        // Metadata is split off before sanitation; reaching this arm
        // means a metadata value was handed to a non-metadata path.
        ValueKind::Metadata => Err(mismatch()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    mod numeric {
        use super::*;

        #[test]
        fn accepts_numbers_and_numeric_text() {
            let v = coerce(EntityTag::Order, Field::Amount, &RawValue::Num(dec("2"))).unwrap();
            assert_eq!(v.as_num(), Some(dec("2")));

            let v = coerce(EntityTag::Order, Field::Price, &"1000.5".into()).unwrap();
            assert_eq!(v.as_num(), Some(dec("1000.5")));
        }

        #[test]
        fn rejects_non_numeric_text() {
            let err = coerce(EntityTag::Order, Field::Amount, &"lots".into()).unwrap_err();
            assert!(matches!(err, DomainError::TypeMismatch { .. }));
        }

        #[test]
        fn rejects_flags() {
            let err = coerce(EntityTag::Order, Field::Total, &true.into()).unwrap_err();
            assert!(matches!(err, DomainError::TypeMismatch { .. }));
        }
    }

    mod vocabularies {
        use super::*;

        #[test]
        fn side_parses_for_each_entity() {
            let v = coerce(EntityTag::Order, Field::Side, &"BUY".into()).unwrap();
            assert_eq!(v.as_side(), Some(Side::Buy));

            let v = coerce(EntityTag::Offer, Field::Side, &"lend".into()).unwrap();
            assert_eq!(v.as_offer_side(), Some(OfferSide::Lend));
        }

        #[test]
        fn bad_vocabulary_is_a_domain_error() {
            let err = coerce(EntityTag::Order, Field::Side, &"hold".into()).unwrap_err();
            assert!(matches!(err, DomainError::InvalidEnum { .. }));
        }

        #[test]
        fn numeric_side_is_a_type_mismatch() {
            let err =
                coerce(EntityTag::Order, Field::Side, &RawValue::Num(dec("1"))).unwrap_err();
            assert!(matches!(err, DomainError::TypeMismatch { .. }));
        }

        #[test]
        fn kind_vocabulary_differs_per_entity() {
            assert!(coerce(EntityTag::Order, Field::Kind, &"limit".into()).is_ok());
            assert!(coerce(EntityTag::Offer, Field::Kind, &"limit".into()).is_err());
            assert!(coerce(EntityTag::Offer, Field::Kind, &"hidden".into()).is_ok());
        }
    }

    mod symbols {
        use super::*;

        #[test]
        fn pair_parses_from_text() {
            let v = coerce(EntityTag::Order, Field::Pair, &"BTC/USD".into()).unwrap();
            assert_eq!(v.as_pair().unwrap().to_string(), "BTC/USD");
        }

        #[test]
        fn instrument_parses_from_text() {
            let v = coerce(EntityTag::Offer, Field::Instrument, &"usd".into()).unwrap();
            assert_eq!(v.as_instrument().unwrap().code(), "USD");
        }

        #[test]
        fn identical_pair_sides_propagate_domain_error() {
            let err = coerce(EntityTag::Order, Field::Pair, &"BTC/BTC".into()).unwrap_err();
            assert!(matches!(err, DomainError::IdenticalInstruments(_)));
        }
    }

    mod timestamps {
        use super::*;

        #[test]
        fn accepts_millis_and_rfc3339() {
            let v = coerce(
                EntityTag::Order,
                Field::Timestamp,
                &RawValue::Num(dec("1704067200000")),
            )
            .unwrap();
            assert_eq!(v.as_timestamp().unwrap().timestamp_secs(), 1704067200);

            let v = coerce(
                EntityTag::Order,
                Field::Timestamp,
                &"2024-01-01T00:00:00Z".into(),
            )
            .unwrap();
            assert_eq!(v.as_timestamp().unwrap().timestamp_secs(), 1704067200);
        }
    }

    mod text_fields {
        use super::*;

        #[test]
        fn ids_accept_numeric_input() {
            let v = coerce(EntityTag::Order, Field::Id, &RawValue::Num(dec("12345"))).unwrap();
            assert_eq!(v.as_text(), Some("12345"));
        }
    }
}
