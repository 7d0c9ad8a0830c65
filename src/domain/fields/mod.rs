//! # Field Schema
//!
//! The catalog of named fields per entity kind, their declared value
//! kinds, and the provenance-tagged map the resolver operates on.
//!
//! This module provides:
//! - [`Field`] - every attribute name the engine knows
//! - [`EntityTag`] - which entity a schema belongs to (Order or Offer)
//! - [`ValueKind`] - the semantic type a field coerces to
//! - [`value::RawValue`] / [`value::FieldValue`] - untyped input and
//!   sanitized values
//! - [`map::FieldMap`] / [`map::FieldPatch`] - the resolved attribute
//!   set and the mutation input
//!
//! The externally visible value of any field is "supplied if present,
//! else derived, else absent"; the map enforces that a field never holds
//! both provenances at once.

pub mod map;
pub mod value;

pub use map::{FieldMap, FieldPatch, Provenance};
pub use value::{FieldValue, RawValue};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kind a schema belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// A trade order over a pair market.
    Order,
    /// A margin-funding offer over a funding market.
    Offer,
}

impl EntityTag {
    /// Human-readable entity name, used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Order => "Order",
            Self::Offer => "Offer",
        }
    }
}

/// Semantic type a field's values coerce to during sanitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Exact decimal number.
    Decimal,
    /// Boolean flag.
    Flag,
    /// Free-form text (ids, exchange and account names).
    Text,
    /// Buy/sell vocabulary.
    Side,
    /// Lend/borrow vocabulary.
    OfferSide,
    /// Limit/market vocabulary.
    OrderKind,
    /// Normal/hidden vocabulary.
    OfferKind,
    /// Spot/margin vocabulary.
    TradeContext,
    /// A trading pair.
    Pair,
    /// A single instrument.
    Instrument,
    /// A full market value.
    Market,
    /// A point in time.
    Timestamp,
    /// Opaque metadata mapping, excluded from derivation.
    Metadata,
}

impl ValueKind {
    /// Human-readable kind name, used in type-mismatch errors.
    #[must_use]
    pub const fn expected(self) -> &'static str {
        match self {
            Self::Decimal => "decimal number",
            Self::Flag => "boolean flag",
            Self::Text => "text",
            Self::Side => "side (buy|sell)",
            Self::OfferSide => "offer side (lend|borrow)",
            Self::OrderKind => "order type (limit|market)",
            Self::OfferKind => "offer type (normal|hidden)",
            Self::TradeContext => "context (spot|margin)",
            Self::Pair => "pair",
            Self::Instrument => "instrument",
            Self::Market => "market",
            Self::Timestamp => "timestamp",
            Self::Metadata => "metadata mapping",
        }
    }
}

/// A named attribute of an order or offer.
///
/// The wire spelling of every field is its snake_case name; the order
/// type field is spelled `type` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Field {
    /// Trading pair of an order.
    Pair,
    /// Market the entity trades on.
    Market,
    /// Owning exchange name.
    Exchange,
    /// Account identifier.
    Account,
    /// Buy/sell (orders) or lend/borrow (offers) direction.
    Side,
    /// Quantity in the base or funding instrument.
    Amount,
    /// Price in the quote instrument.
    Price,
    /// Amount times price, in the quote instrument.
    Total,
    /// Pre-fee economic proceeds.
    Gross,
    /// Post-fee economic proceeds.
    Net,
    /// Absolute fee amount.
    Fees,
    /// Fee as a fraction of gross.
    FeePercentage,
    /// What the trade consumes.
    Input,
    /// What the trade produces.
    Output,
    /// Execution kind: `type` on the wire.
    #[serde(rename = "type")]
    Kind,
    /// Spot/margin context of an order.
    Context,
    /// Whether the order is hidden from the book.
    Hidden,
    /// Creation or confirmation time.
    Timestamp,
    /// Exchange-assigned identifier.
    Id,
    /// Exchange-confirmed liveness flag.
    Active,
    /// Exchange-confirmed cancellation flag.
    Cancelled,
    /// Instrument fees are charged in.
    FeeInstrument,
    /// Instrument the input is denominated in.
    InputInstrument,
    /// Instrument the output is denominated in.
    OutputInstrument,
    /// Opaque passthrough mapping.
    Metadata,
    /// Funding instrument of an offer.
    Instrument,
    /// Funding term in days.
    Duration,
    /// Funding rate per day, as a fraction.
    DailyRate,
    /// Funding rate per 30-day month.
    MonthlyRate,
    /// Funding rate per 365-day year.
    AnnualRate,
}

impl Field {
    /// Wire spelling of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pair => "pair",
            Self::Market => "market",
            Self::Exchange => "exchange",
            Self::Account => "account",
            Self::Side => "side",
            Self::Amount => "amount",
            Self::Price => "price",
            Self::Total => "total",
            Self::Gross => "gross",
            Self::Net => "net",
            Self::Fees => "fees",
            Self::FeePercentage => "fee_percentage",
            Self::Input => "input",
            Self::Output => "output",
            Self::Kind => "type",
            Self::Context => "context",
            Self::Hidden => "hidden",
            Self::Timestamp => "timestamp",
            Self::Id => "id",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::FeeInstrument => "fee_instrument",
            Self::InputInstrument => "input_instrument",
            Self::OutputInstrument => "output_instrument",
            Self::Metadata => "metadata",
            Self::Instrument => "instrument",
            Self::Duration => "duration",
            Self::DailyRate => "daily_rate",
            Self::MonthlyRate => "monthly_rate",
            Self::AnnualRate => "annual_rate",
        }
    }

    /// Parses a wire spelling; `None` for names no schema knows.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "pair" => Some(Self::Pair),
            "market" => Some(Self::Market),
            "exchange" => Some(Self::Exchange),
            "account" => Some(Self::Account),
            "side" => Some(Self::Side),
            "amount" => Some(Self::Amount),
            "price" => Some(Self::Price),
            "total" => Some(Self::Total),
            "gross" => Some(Self::Gross),
            "net" => Some(Self::Net),
            "fees" => Some(Self::Fees),
            "fee_percentage" => Some(Self::FeePercentage),
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            "type" => Some(Self::Kind),
            "context" => Some(Self::Context),
            "hidden" => Some(Self::Hidden),
            "timestamp" => Some(Self::Timestamp),
            "id" => Some(Self::Id),
            "active" => Some(Self::Active),
            "cancelled" => Some(Self::Cancelled),
            "fee_instrument" => Some(Self::FeeInstrument),
            "input_instrument" => Some(Self::InputInstrument),
            "output_instrument" => Some(Self::OutputInstrument),
            "metadata" => Some(Self::Metadata),
            "instrument" => Some(Self::Instrument),
            "duration" => Some(Self::Duration),
            "daily_rate" => Some(Self::DailyRate),
            "monthly_rate" => Some(Self::MonthlyRate),
            "annual_rate" => Some(Self::AnnualRate),
            _ => None,
        }
    }

    /// The value kind this field coerces to for the given entity.
    ///
    /// `side` and `type` carry different vocabularies on orders and
    /// offers; everything else is entity-independent.
    #[must_use]
    pub const fn value_kind(self, entity: EntityTag) -> ValueKind {
        match self {
            Self::Side => match entity {
                EntityTag::Order => ValueKind::Side,
                EntityTag::Offer => ValueKind::OfferSide,
            },
            Self::Kind => match entity {
                EntityTag::Order => ValueKind::OrderKind,
                EntityTag::Offer => ValueKind::OfferKind,
            },
            Self::Context => ValueKind::TradeContext,
            Self::Pair => ValueKind::Pair,
            Self::Market => ValueKind::Market,
            Self::FeeInstrument | Self::InputInstrument | Self::OutputInstrument | Self::Instrument => {
                ValueKind::Instrument
            }
            Self::Hidden | Self::Active | Self::Cancelled => ValueKind::Flag,
            Self::Timestamp => ValueKind::Timestamp,
            Self::Exchange | Self::Account | Self::Id => ValueKind::Text,
            Self::Metadata => ValueKind::Metadata,
            Self::Amount
            | Self::Price
            | Self::Total
            | Self::Gross
            | Self::Net
            | Self::Fees
            | Self::FeePercentage
            | Self::Input
            | Self::Output
            | Self::Duration
            | Self::DailyRate
            | Self::MonthlyRate
            | Self::AnnualRate => ValueKind::Decimal,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Canonical field set of an Order, in derivation-pass order; context
/// precedes market so the catalog lookup sees the defaulted context in
/// the same pass.
pub const ORDER_FIELDS: &[Field] = &[
    Field::Pair,
    Field::Exchange,
    Field::Account,
    Field::Context,
    Field::Market,
    Field::Side,
    Field::Price,
    Field::Amount,
    Field::Total,
    Field::Gross,
    Field::FeePercentage,
    Field::Fees,
    Field::Net,
    Field::Input,
    Field::Output,
    Field::Kind,
    Field::Hidden,
    Field::Timestamp,
    Field::Id,
    Field::Active,
    Field::Cancelled,
    Field::FeeInstrument,
    Field::InputInstrument,
    Field::OutputInstrument,
    Field::Metadata,
];

/// Canonical field set of an Offer.
pub const OFFER_FIELDS: &[Field] = &[
    Field::Instrument,
    Field::Market,
    Field::Exchange,
    Field::Account,
    Field::Side,
    Field::Duration,
    Field::Amount,
    Field::DailyRate,
    Field::MonthlyRate,
    Field::AnnualRate,
    Field::Gross,
    Field::FeePercentage,
    Field::Fees,
    Field::Net,
    Field::Kind,
    Field::Timestamp,
    Field::Id,
    Field::Active,
    Field::Cancelled,
    Field::Metadata,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for field in ORDER_FIELDS.iter().chain(OFFER_FIELDS) {
            assert_eq!(Field::parse(field.name()), Some(*field));
        }
    }

    #[test]
    fn type_is_the_wire_spelling_of_kind() {
        assert_eq!(Field::Kind.name(), "type");
        assert_eq!(Field::parse("type"), Some(Field::Kind));
    }

    #[test]
    fn unknown_names_do_not_parse() {
        assert_eq!(Field::parse("prce"), None);
        assert_eq!(Field::parse(""), None);
    }

    #[test]
    fn side_vocabulary_depends_on_entity() {
        assert_eq!(Field::Side.value_kind(EntityTag::Order), ValueKind::Side);
        assert_eq!(
            Field::Side.value_kind(EntityTag::Offer),
            ValueKind::OfferSide
        );
        assert_eq!(
            Field::Kind.value_kind(EntityTag::Offer),
            ValueKind::OfferKind
        );
    }

    #[test]
    fn field_sets_do_not_overlap_on_symbols() {
        assert!(ORDER_FIELDS.contains(&Field::Pair));
        assert!(!ORDER_FIELDS.contains(&Field::Instrument));
        assert!(OFFER_FIELDS.contains(&Field::Instrument));
        assert!(!OFFER_FIELDS.contains(&Field::Pair));
    }
}
