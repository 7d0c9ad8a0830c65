//! # Order Entity
//!
//! A single proposed or live trade: one provenance-tagged field map,
//! opaque metadata, and the fill records reported against it.
//!
//! The entity is data plus projections; every mutation goes through the
//! [`Resolver`](crate::domain::resolver::Resolver) so the
//! supplied/derived partition stays consistent. Status is recomputed on
//! every access, never stored.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use trade_resolver::domain::entities::order::Order;
//! use trade_resolver::domain::fields::{Field, FieldMap, FieldPatch};
//! use trade_resolver::domain::resolver::Resolver;
//! use trade_resolver::domain::value_objects::lifecycle::OrderStatus;
//! use trade_resolver::domain::value_objects::market::MarketCatalog;
//!
//! let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
//! let resolution = resolver
//!     .resolve_order_local(
//!         &FieldMap::new(),
//!         FieldPatch::new()
//!             .arg("BTC/USD")
//!             .arg("buy")
//!             .set(Field::Amount, 2)
//!             .set(Field::Price, 1000),
//!     )
//!     .unwrap();
//! let order = Order::from_resolution(resolution);
//!
//! assert_eq!(order.status(), OrderStatus::Draft);
//! assert_eq!(order.total(), Some("2000".parse().unwrap()));
//! ```

use crate::domain::entities::fill::Trade;
use crate::domain::fields::value::FieldValue;
use crate::domain::fields::{Field, FieldMap, FieldPatch, Provenance};
use crate::domain::resolver::Resolution;
use crate::domain::value_objects::enums::{OrderKind, Side, TradeContext};
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::lifecycle::OrderStatus;
use crate::domain::value_objects::market::Market;
use crate::domain::value_objects::pair::Pair;
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use uuid::Uuid;

/// A single proposed or live trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    client_id: Uuid,
    fields: FieldMap,
    metadata: JsonMap<String, JsonValue>,
    trades: Vec<Trade>,
}

impl Order {
    /// Builds an order from a resolution, stamping the creation time
    /// if the caller did not supply one.
    #[must_use]
    pub fn from_resolution(resolution: Resolution) -> Self {
        let mut fields = resolution.fields;
        if !fields.contains(Field::Timestamp) {
            fields.insert(
                Field::Timestamp,
                FieldValue::Timestamp(Timestamp::now()),
                Provenance::Supplied,
            );
        }
        Self {
            client_id: Uuid::new_v4(),
            fields,
            metadata: resolution.metadata.unwrap_or_default(),
            trades: Vec::new(),
        }
    }

    /// Replaces the field set (and metadata, when the resolution
    /// carried one) with a freshly resolved state.
    pub fn apply_resolution(&mut self, resolution: Resolution) {
        self.fields = resolution.fields;
        if let Some(metadata) = resolution.metadata {
            self.metadata = metadata;
        }
    }

    /// Client-side correlation id, assigned at construction.
    #[inline]
    #[must_use]
    pub const fn client_id(&self) -> Uuid {
        self.client_id
    }

    /// The full field map (supplied and derived).
    #[inline]
    #[must_use]
    pub const fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// The supplied fields only, as re-resolution input.
    #[must_use]
    pub fn supplied(&self) -> FieldMap {
        self.fields.supplied_only()
    }

    /// Opaque metadata attached to the order.
    #[inline]
    #[must_use]
    pub const fn metadata(&self) -> &JsonMap<String, JsonValue> {
        &self.metadata
    }

    /// Fill records reported against the order.
    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Appends a reported fill.
    pub fn attach_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    // Field accessors: supplied wins over derived, absent is `None`.

    /// The trading pair.
    #[must_use]
    pub fn pair(&self) -> Option<&Pair> {
        self.fields.pair()
    }

    /// The market.
    #[must_use]
    pub fn market(&self) -> Option<&Market> {
        self.fields.market()
    }

    /// The owning exchange name.
    #[must_use]
    pub fn exchange(&self) -> Option<&str> {
        self.fields.text(Field::Exchange)
    }

    /// The account identifier.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.fields.text(Field::Account)
    }

    /// Buy or sell.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        self.fields.side()
    }

    /// Quantity in the base instrument.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        self.fields.num(Field::Amount)
    }

    /// Price in the quote instrument.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        self.fields.num(Field::Price)
    }

    /// Amount times price.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.fields.num(Field::Total)
    }

    /// Pre-fee proceeds.
    #[must_use]
    pub fn gross(&self) -> Option<Decimal> {
        self.fields.num(Field::Gross)
    }

    /// Post-fee proceeds.
    #[must_use]
    pub fn net(&self) -> Option<Decimal> {
        self.fields.num(Field::Net)
    }

    /// Absolute fee amount.
    #[must_use]
    pub fn fees(&self) -> Option<Decimal> {
        self.fields.num(Field::Fees)
    }

    /// Fee as a fraction of gross.
    #[must_use]
    pub fn fee_percentage(&self) -> Option<Decimal> {
        self.fields.num(Field::FeePercentage)
    }

    /// What the trade consumes.
    #[must_use]
    pub fn input(&self) -> Option<Decimal> {
        self.fields.num(Field::Input)
    }

    /// What the trade produces.
    #[must_use]
    pub fn output(&self) -> Option<Decimal> {
        self.fields.num(Field::Output)
    }

    /// Limit or market execution.
    #[must_use]
    pub fn kind(&self) -> Option<OrderKind> {
        self.fields.order_kind()
    }

    /// Spot or margin context.
    #[must_use]
    pub fn context(&self) -> Option<TradeContext> {
        self.fields.context()
    }

    /// Whether the order is hidden; absent reads as visible.
    #[must_use]
    pub fn hidden(&self) -> bool {
        self.fields.flag(Field::Hidden).unwrap_or(false)
    }

    /// Creation or confirmation time.
    #[must_use]
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.fields.timestamp(Field::Timestamp)
    }

    /// Exchange-assigned identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.fields.text(Field::Id)
    }

    /// Exchange-confirmed liveness flag.
    #[must_use]
    pub fn active(&self) -> Option<bool> {
        self.fields.flag(Field::Active)
    }

    /// Exchange-confirmed cancellation flag.
    #[must_use]
    pub fn cancelled(&self) -> Option<bool> {
        self.fields.flag(Field::Cancelled)
    }

    /// Instrument fees are charged in.
    #[must_use]
    pub fn fee_instrument(&self) -> Option<&Instrument> {
        self.fields.instrument(Field::FeeInstrument)
    }

    /// Instrument the input is denominated in.
    #[must_use]
    pub fn input_instrument(&self) -> Option<&Instrument> {
        self.fields.instrument(Field::InputInstrument)
    }

    /// Instrument the output is denominated in.
    #[must_use]
    pub fn output_instrument(&self) -> Option<&Instrument> {
        self.fields.instrument(Field::OutputInstrument)
    }

    // Fill projections.

    /// Sum of reported fill amounts.
    #[must_use]
    pub fn executed_amount(&self) -> Decimal {
        self.trades
            .iter()
            .fold(Decimal::ZERO, |sum, trade| sum + trade.amount())
    }

    /// Amount still unfilled; `None` until the amount itself resolves.
    #[must_use]
    pub fn remaining_amount(&self) -> Option<Decimal> {
        self.amount().map(|amount| amount - self.executed_amount())
    }

    /// Fraction of the amount already filled; `None` until the amount
    /// resolves, and for a zero amount.
    #[must_use]
    pub fn percentage_filled(&self) -> Option<Decimal> {
        let amount = self.amount()?;
        if amount.is_zero() {
            return None;
        }
        Some(self.executed_amount() / amount)
    }

    /// The projected lifecycle status.
    ///
    /// Recomputed on every access from the id/active/cancelled flags
    /// and the accumulated fills; never stored as a field.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        if self.cancelled() == Some(true) {
            return OrderStatus::Cancelled;
        }
        let has_id = self.id().is_some();
        if self.trades.is_empty() && !has_id {
            return OrderStatus::Draft;
        }
        if !has_id {
            return OrderStatus::Unknown;
        }
        let executed = self.executed_amount();
        if let Some(amount) = self.amount() {
            if !executed.is_zero() && executed >= amount {
                return OrderStatus::Executed;
            }
        }
        if !executed.is_zero() {
            return OrderStatus::PartiallyFilled;
        }
        if self.active() == Some(true) {
            return OrderStatus::Active;
        }
        OrderStatus::Placed
    }

    /// Builds the patch for the economic inverse of this order: the
    /// opposite side, with the realized output as the new input, on the
    /// same pair, exchange, and account.
    ///
    /// Returns `None` until side, pair, and output have all resolved.
    #[must_use]
    pub fn followup_patch(&self) -> Option<FieldPatch> {
        let side = self.side()?.opposite();
        let pair = self.pair()?.clone();
        let output = self.output()?;

        let mut patch = FieldPatch::new()
            .set(Field::Pair, pair)
            .set(Field::Side, side)
            .set(Field::Input, output);
        if let Some(exchange) = self.exchange() {
            patch = patch.set(Field::Exchange, exchange.to_string());
        }
        if let Some(account) = self.account() {
            patch = patch.set(Field::Account, account.to_string());
        }
        Some(patch)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::resolver::Resolver;
    use crate::domain::value_objects::market::MarketCatalog;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn draft() -> Order {
        let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
        let resolution = resolver
            .resolve_order_local(
                &FieldMap::new(),
                FieldPatch::new()
                    .arg("BTC/USD")
                    .arg("buy")
                    .set(Field::Amount, 2)
                    .set(Field::Price, 1000)
                    .set(Field::FeePercentage, dec("0.001")),
            )
            .unwrap();
        Order::from_resolution(resolution)
    }

    fn confirm(order: &mut Order, patch: FieldPatch) {
        let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
        let resolution = resolver
            .resolve_order_local(&order.supplied(), patch)
            .unwrap();
        order.apply_resolution(resolution);
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn fresh_order_is_a_draft() {
            let order = draft();
            assert_eq!(order.status(), OrderStatus::Draft);
            assert!(order.timestamp().is_some());
        }

        #[test]
        fn id_without_confirmation_is_placed() {
            let mut order = draft();
            confirm(&mut order, FieldPatch::new().set(Field::Id, "ord-1"));
            assert_eq!(order.status(), OrderStatus::Placed);
        }

        #[test]
        fn active_confirmation_activates() {
            let mut order = draft();
            confirm(
                &mut order,
                FieldPatch::new().set(Field::Id, "ord-1").set(Field::Active, true),
            );
            assert_eq!(order.status(), OrderStatus::Active);
        }

        #[test]
        fn partial_fills_then_execution() {
            let mut order = draft();
            confirm(
                &mut order,
                FieldPatch::new().set(Field::Id, "ord-1").set(Field::Active, true),
            );

            let ts = Timestamp::from_secs(1704067200).unwrap();
            order.attach_trade(Trade::new("ord-1", dec("0.5"), dec("1000"), Side::Buy, ts));
            assert_eq!(order.status(), OrderStatus::PartiallyFilled);
            assert_eq!(order.executed_amount(), dec("0.5"));
            assert_eq!(order.remaining_amount(), Some(dec("1.5")));
            assert_eq!(order.percentage_filled(), Some(dec("0.25")));

            order.attach_trade(Trade::new("ord-1", dec("1.5"), dec("1000"), Side::Buy, ts));
            assert_eq!(order.status(), OrderStatus::Executed);
            assert_eq!(order.remaining_amount(), Some(Decimal::ZERO));
        }

        #[test]
        fn cancellation_wins_over_everything() {
            let mut order = draft();
            confirm(
                &mut order,
                FieldPatch::new()
                    .set(Field::Id, "ord-1")
                    .set(Field::Active, false)
                    .set(Field::Cancelled, true),
            );
            assert_eq!(order.status(), OrderStatus::Cancelled);
        }
    }

    mod followup {
        use super::*;

        #[test]
        fn inverse_swaps_side_and_feeds_output_forward() {
            let order = draft();
            let patch = order.followup_patch().unwrap();

            let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
            let resolution = resolver
                .resolve_order_local(&FieldMap::new(), patch)
                .unwrap();
            let inverse = Order::from_resolution(resolution);

            assert_eq!(inverse.side(), Some(Side::Sell));
            assert_eq!(inverse.input(), order.output());
            assert_eq!(inverse.amount(), order.output());
        }

        #[test]
        fn unresolved_output_yields_no_followup() {
            let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
            let resolution = resolver
                .resolve_order_local(
                    &FieldMap::new(),
                    FieldPatch::new().arg("BTC/USD").arg("buy"),
                )
                .unwrap();
            let order = Order::from_resolution(resolution);
            assert!(order.followup_patch().is_none());
        }
    }

    mod accessors {
        use super::*;

        #[test]
        fn hidden_defaults_to_visible() {
            let order = draft();
            assert!(!order.hidden());
        }

        #[test]
        fn metadata_survives_updates() {
            let mut meta = JsonMap::new();
            meta.insert("strategy".to_string(), JsonValue::from("basis"));

            let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
            let resolution = resolver
                .resolve_order_local(
                    &FieldMap::new(),
                    FieldPatch::new()
                        .arg("BTC/USD")
                        .arg("buy")
                        .set(Field::Amount, 1)
                        .set(Field::Metadata, meta.clone()),
                )
                .unwrap();
            let mut order = Order::from_resolution(resolution);
            assert_eq!(order.metadata(), &meta);

            confirm(&mut order, FieldPatch::new().set(Field::Id, "ord-9"));
            assert_eq!(order.metadata(), &meta);
        }
    }
}
