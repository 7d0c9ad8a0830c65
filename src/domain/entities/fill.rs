//! # Fill Records
//!
//! Immutable execution records: [`Trade`] against an order, [`Lend`]
//! against a funding offer.
//!
//! Fill records are only ever appended to the owning entity's fill
//! list; they are never mutated after construction. They exist to feed
//! the executed/remaining projections of the lifecycle state machine.

use crate::domain::value_objects::enums::{OfferSide, Side};
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A reported execution against a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    order_id: String,
    amount: Decimal,
    price: Decimal,
    side: Side,
    timestamp: Timestamp,
    fee: Option<Decimal>,
    fee_instrument: Option<Instrument>,
}

impl Trade {
    /// Creates a trade record.
    #[must_use]
    pub fn new(
        order_id: impl Into<String>,
        amount: Decimal,
        price: Decimal,
        side: Side,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            price,
            side,
            timestamp,
            fee: None,
            fee_instrument: None,
        }
    }

    /// Attaches the charged fee to a freshly built record.
    #[must_use]
    pub fn with_fee(mut self, fee: Decimal, instrument: Instrument) -> Self {
        self.fee = Some(fee);
        self.fee_instrument = Some(instrument);
        self
    }

    /// Id of the order this trade executed against.
    #[must_use]
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Executed amount, in the base instrument.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Execution price.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Side of the execution.
    #[inline]
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// When the execution was reported.
    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Fee charged, if reported.
    #[inline]
    #[must_use]
    pub const fn fee(&self) -> Option<Decimal> {
        self.fee
    }

    /// Instrument the fee was charged in, if reported.
    #[must_use]
    pub const fn fee_instrument(&self) -> Option<&Instrument> {
        self.fee_instrument.as_ref()
    }
}

/// A reported fulfillment against a placed funding offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lend {
    offer_id: String,
    amount: Decimal,
    rate: Decimal,
    side: OfferSide,
    timestamp: Timestamp,
    fee: Option<Decimal>,
    fee_instrument: Option<Instrument>,
}

impl Lend {
    /// Creates a lend record.
    #[must_use]
    pub fn new(
        offer_id: impl Into<String>,
        amount: Decimal,
        rate: Decimal,
        side: OfferSide,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            offer_id: offer_id.into(),
            amount,
            rate,
            side,
            timestamp,
            fee: None,
            fee_instrument: None,
        }
    }

    /// Attaches the charged fee to a freshly built record.
    #[must_use]
    pub fn with_fee(mut self, fee: Decimal, instrument: Instrument) -> Self {
        self.fee = Some(fee);
        self.fee_instrument = Some(instrument);
        self
    }

    /// Id of the offer this lend fulfilled.
    #[must_use]
    pub fn offer_id(&self) -> &str {
        &self.offer_id
    }

    /// Taken amount, in the funding instrument.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Daily rate the funds were taken at.
    #[inline]
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }

    /// Side of the fulfillment.
    #[inline]
    #[must_use]
    pub const fn side(&self) -> OfferSide {
        self.side
    }

    /// When the fulfillment was reported.
    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Fee charged, if reported.
    #[inline]
    #[must_use]
    pub const fn fee(&self) -> Option<Decimal> {
        self.fee
    }

    /// Instrument the fee was charged in, if reported.
    #[must_use]
    pub const fn fee_instrument(&self) -> Option<&Instrument> {
        self.fee_instrument.as_ref()
    }
}
