//! # Offer Entity
//!
//! The funding-market analogue of [`Order`](crate::domain::entities::order::Order):
//! a margin-funding offer with its field map, metadata, and lend
//! fulfillments. Status mirrors the order lifecycle with lends in place
//! of trades.

use crate::domain::entities::fill::Lend;
use crate::domain::fields::value::FieldValue;
use crate::domain::fields::{Field, FieldMap, Provenance};
use crate::domain::resolver::Resolution;
use crate::domain::value_objects::enums::{OfferKind, OfferSide};
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::lifecycle::OfferStatus;
use crate::domain::value_objects::market::Market;
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use uuid::Uuid;

/// A single proposed or live margin-funding offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    client_id: Uuid,
    fields: FieldMap,
    metadata: JsonMap<String, JsonValue>,
    lends: Vec<Lend>,
}

impl Offer {
    /// Builds an offer from a resolution, stamping the creation time
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
            lends: Vec::new(),
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

    /// Opaque metadata attached to the offer.
    #[inline]
    #[must_use]
    pub const fn metadata(&self) -> &JsonMap<String, JsonValue> {
        &self.metadata
    }

    /// Lend fulfillments reported against the offer.
    #[must_use]
    pub fn lends(&self) -> &[Lend] {
        &self.lends
    }

    /// Appends a reported fulfillment.
    pub fn attach_lend(&mut self, lend: Lend) {
        self.lends.push(lend);
    }

    // Field accessors.

    /// The funding instrument.
    #[must_use]
    pub fn instrument(&self) -> Option<&Instrument> {
        self.fields.instrument(Field::Instrument)
    }

    /// The funding market.
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

    /// Lend or borrow.
    #[must_use]
    pub fn side(&self) -> Option<OfferSide> {
        self.fields.offer_side()
    }

    /// Funding term in days.
    #[must_use]
    pub fn duration(&self) -> Option<Decimal> {
        self.fields.num(Field::Duration)
    }

    /// Offered amount in the funding instrument.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        self.fields.num(Field::Amount)
    }

    /// Rate per day, as a fraction.
    #[must_use]
    pub fn daily_rate(&self) -> Option<Decimal> {
        self.fields.num(Field::DailyRate)
    }

    /// Rate per 30-day month.
    #[must_use]
    pub fn monthly_rate(&self) -> Option<Decimal> {
        self.fields.num(Field::MonthlyRate)
    }

    /// Rate per 365-day year.
    #[must_use]
    pub fn annual_rate(&self) -> Option<Decimal> {
        self.fields.num(Field::AnnualRate)
    }

    /// Normal or hidden offer.
    #[must_use]
    pub fn kind(&self) -> Option<OfferKind> {
        self.fields.offer_kind()
    }

    /// Interest over the full term, before fees.
    #[must_use]
    pub fn gross(&self) -> Option<Decimal> {
        self.fields.num(Field::Gross)
    }

    /// Interest over the full term, after fees.
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

    // Fulfillment projections.

    /// Sum of reported lend amounts.
    #[must_use]
    pub fn executed_amount(&self) -> Decimal {
        self.lends
            .iter()
            .fold(Decimal::ZERO, |sum, lend| sum + lend.amount())
    }

    /// Amount still untaken; `None` until the amount itself resolves.
    #[must_use]
    pub fn remaining_amount(&self) -> Option<Decimal> {
        self.amount().map(|amount| amount - self.executed_amount())
    }

    /// Fraction of the amount already taken; `None` until the amount
    /// resolves, and for a zero amount.
    #[must_use]
    pub fn percentage_filled(&self) -> Option<Decimal> {
        let amount = self.amount()?;
        if amount.is_zero() {
            return None;
        }
        Some(self.executed_amount() / amount)
    }

    /// The projected lifecycle status, mirroring the order state
    /// machine over lends.
    #[must_use]
    pub fn status(&self) -> OfferStatus {
        if self.cancelled() == Some(true) {
            return OfferStatus::Cancelled;
        }
        let has_id = self.id().is_some();
        if self.lends.is_empty() && !has_id {
            return OfferStatus::Draft;
        }
        if !has_id {
            return OfferStatus::Unknown;
        }
        let executed = self.executed_amount();
        if let Some(amount) = self.amount() {
            if !executed.is_zero() && executed >= amount {
                return OfferStatus::Executed;
            }
        }
        if !executed.is_zero() {
            return OfferStatus::PartiallyFilled;
        }
        if self.active() == Some(true) {
            return OfferStatus::Active;
        }
        OfferStatus::Placed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::fields::FieldPatch;
    use crate::domain::resolver::Resolver;
    use crate::domain::value_objects::market::MarketCatalog;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn draft() -> Offer {
        let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
        let resolution = resolver
            .resolve_offer_local(
                &FieldMap::new(),
                FieldPatch::new()
                    .arg("USD")
                    .arg("lend")
                    .set(Field::Amount, 1000)
                    .set(Field::Duration, 30)
                    .set(Field::DailyRate, dec("0.0002")),
            )
            .unwrap();
        Offer::from_resolution(resolution)
    }

    fn confirm(offer: &mut Offer, patch: FieldPatch) {
        let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
        let resolution = resolver
            .resolve_offer_local(&offer.supplied(), patch)
            .unwrap();
        offer.apply_resolution(resolution);
    }

    #[test]
    fn draft_resolves_rates_and_interest() {
        let offer = draft();
        assert_eq!(offer.status(), OfferStatus::Draft);
        assert_eq!(offer.monthly_rate(), Some(dec("0.006")));
        assert_eq!(offer.annual_rate(), Some(dec("0.073")));
        assert_eq!(offer.gross(), Some(dec("6")));
        assert_eq!(offer.kind(), Some(OfferKind::Normal));
    }

    #[test]
    fn lends_drive_the_lifecycle() {
        let mut offer = draft();
        confirm(
            &mut offer,
            FieldPatch::new().set(Field::Id, "off-1").set(Field::Active, true),
        );
        assert_eq!(offer.status(), OfferStatus::Active);

        let ts = Timestamp::from_secs(1704067200).unwrap();
        offer.attach_lend(Lend::new("off-1", dec("400"), dec("0.0002"), OfferSide::Lend, ts));
        assert_eq!(offer.status(), OfferStatus::PartiallyFilled);
        assert_eq!(offer.percentage_filled(), Some(dec("0.4")));

        offer.attach_lend(Lend::new("off-1", dec("600"), dec("0.0002"), OfferSide::Lend, ts));
        assert_eq!(offer.status(), OfferStatus::Executed);
        assert_eq!(offer.remaining_amount(), Some(Decimal::ZERO));
    }

    #[test]
    fn cancellation_is_terminal() {
        let mut offer = draft();
        confirm(
            &mut offer,
            FieldPatch::new().set(Field::Id, "off-1").set(Field::Cancelled, true),
        );
        assert_eq!(offer.status(), OfferStatus::Cancelled);
        assert!(offer.status().is_terminal());
    }
}
