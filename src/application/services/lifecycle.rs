//! # Lifecycle Service
//!
//! The caller-visible lifecycle verbs: place, update, cancel, replace,
//! and followup construction.
//!
//! Each verb delegates the network action to the exchange collaborator,
//! then feeds the confirmed fields back through the resolver so the
//! supplied/derived partition stays internally consistent after every
//! round-trip. Batches are dispatched over a tagged [`Ticket`] enum by
//! `match`, never by runtime type inspection.
//!
//! Collaborator failures propagate unchanged; nothing is retried here.

use crate::application::error::{EngineError, EngineResult};
use crate::domain::entities::{Offer, Order};
use crate::domain::fields::{FieldMap, FieldPatch};
use crate::domain::resolver::Resolver;
use crate::domain::value_objects::market::MarketCatalog;
use crate::infrastructure::exchange::{Confirmation, ExchangeOps};
use std::sync::Arc;

/// A unit of work for the lifecycle verbs: a single order or offer, or
/// a batch of either.
#[derive(Debug)]
pub enum Ticket {
    /// One order.
    Order(Order),
    /// A batch of orders, handled in sequence.
    OrderBatch(Vec<Order>),
    /// One offer.
    Offer(Offer),
    /// A batch of offers, handled in sequence.
    OfferBatch(Vec<Offer>),
}

/// Drives orders and offers through their exchange lifecycle.
pub struct ExecutionService {
    resolver: Resolver,
    ops: Arc<dyn ExchangeOps>,
}

impl ExecutionService {
    /// Creates a service over a market catalog and an exchange
    /// collaborator.
    #[must_use]
    pub fn new(catalog: Arc<MarketCatalog>, ops: Arc<dyn ExchangeOps>) -> Self {
        Self {
            resolver: Resolver::new(catalog).with_ops(ops.clone()),
            ops,
        }
    }

    /// The resolver this service feeds confirmations through.
    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolves a fresh draft order from a patch.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures.
    pub async fn draft_order(&self, patch: FieldPatch) -> EngineResult<Order> {
        let resolution = self.resolver.resolve_order(&FieldMap::new(), patch).await?;
        Ok(Order::from_resolution(resolution))
    }

    /// Resolves a fresh draft offer from a patch.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures.
    pub async fn draft_offer(&self, patch: FieldPatch) -> EngineResult<Offer> {
        let resolution = self.resolver.resolve_offer(&FieldMap::new(), patch).await?;
        Ok(Offer::from_resolution(resolution))
    }

    /// Places the ticket on the exchange and merges the confirmed
    /// fields back in.
    ///
    /// # Errors
    ///
    /// Propagates collaborator and resolution failures unchanged.
    pub async fn place(&self, ticket: &mut Ticket) -> EngineResult<()> {
        match ticket {
            Ticket::Order(order) => self.place_order(order).await,
            Ticket::OrderBatch(orders) => {
                for order in orders {
                    self.place_order(order).await?;
                }
                Ok(())
            }
            Ticket::Offer(offer) => self.place_offer(offer).await,
            Ticket::OfferBatch(offers) => {
                for offer in offers {
                    self.place_offer(offer).await?;
                }
                Ok(())
            }
        }
    }

    /// Applies a patch to every entity in the ticket, pushes the new
    /// state to the exchange, and merges the confirmation back in.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::NotPlaced`] for an entity without an
    /// exchange id; collaborator failures propagate unchanged.
    pub async fn update(&self, ticket: &mut Ticket, patch: FieldPatch) -> EngineResult<()> {
        match ticket {
            Ticket::Order(order) => self.update_order(order, patch).await,
            Ticket::OrderBatch(orders) => {
                for order in orders {
                    self.update_order(order, patch.clone()).await?;
                }
                Ok(())
            }
            Ticket::Offer(offer) => self.update_offer(offer, patch).await,
            Ticket::OfferBatch(offers) => {
                for offer in offers {
                    self.update_offer(offer, patch.clone()).await?;
                }
                Ok(())
            }
        }
    }

    /// Cancels the ticket on the exchange and merges the confirmation
    /// back in.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::NotPlaced`] for an entity without an
    /// exchange id; collaborator failures propagate unchanged.
    pub async fn cancel(&self, ticket: &mut Ticket) -> EngineResult<()> {
        match ticket {
            Ticket::Order(order) => self.cancel_order(order).await,
            Ticket::OrderBatch(orders) => {
                for order in orders {
                    self.cancel_order(order).await?;
                }
                Ok(())
            }
            Ticket::Offer(offer) => self.cancel_offer(offer).await,
            Ticket::OfferBatch(offers) => {
                for offer in offers {
                    self.cancel_offer(offer).await?;
                }
                Ok(())
            }
        }
    }

    /// Replaces `old` with `new`: cancels the former, places the
    /// latter.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step; `new` is not placed if the
    /// cancellation fails.
    pub async fn replace(&self, old: &mut Ticket, new: &mut Ticket) -> EngineResult<()> {
        self.cancel(old).await?;
        self.place(new).await
    }

    /// Builds the economic inverse of a filled order: opposite side,
    /// the realized output as new input, same pair/exchange/account.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::NoFollowup`] until side, pair, and
    /// output have resolved.
    pub async fn followup(&self, order: &Order) -> EngineResult<Order> {
        let patch = order.followup_patch().ok_or(EngineError::NoFollowup)?;
        let resolution = self.resolver.resolve_order(&FieldMap::new(), patch).await?;
        Ok(Order::from_resolution(resolution))
    }

    async fn place_order(&self, order: &mut Order) -> EngineResult<()> {
        let confirmation = self.ops.place_order(order.fields()).await?;
        self.absorb_order(order, confirmation).await
    }

    async fn update_order(&self, order: &mut Order, patch: FieldPatch) -> EngineResult<()> {
        let id = order
            .id()
            .ok_or(EngineError::not_placed("order"))?
            .to_string();
        let resolution = self.resolver.resolve_order(&order.supplied(), patch).await?;
        order.apply_resolution(resolution);
        let confirmation = self.ops.update_order(&id, order.fields()).await?;
        self.absorb_order(order, confirmation).await
    }

    async fn cancel_order(&self, order: &mut Order) -> EngineResult<()> {
        let id = order
            .id()
            .ok_or(EngineError::not_placed("order"))?
            .to_string();
        let confirmation = self.ops.cancel_order(&id).await?;
        self.absorb_order(order, confirmation).await
    }

    async fn absorb_order(&self, order: &mut Order, confirmation: Confirmation) -> EngineResult<()> {
        let resolution = self
            .resolver
            .resolve_order(&order.supplied(), confirmation_patch(confirmation))
            .await?;
        order.apply_resolution(resolution);
        Ok(())
    }

    async fn place_offer(&self, offer: &mut Offer) -> EngineResult<()> {
        let confirmation = self.ops.place_offer(offer.fields()).await?;
        self.absorb_offer(offer, confirmation).await
    }

    async fn update_offer(&self, offer: &mut Offer, patch: FieldPatch) -> EngineResult<()> {
        let id = offer
            .id()
            .ok_or(EngineError::not_placed("offer"))?
            .to_string();
        let resolution = self.resolver.resolve_offer(&offer.supplied(), patch).await?;
        offer.apply_resolution(resolution);
        let confirmation = self.ops.update_offer(&id, offer.fields()).await?;
        self.absorb_offer(offer, confirmation).await
    }

    async fn cancel_offer(&self, offer: &mut Offer) -> EngineResult<()> {
        let id = offer
            .id()
            .ok_or(EngineError::not_placed("offer"))?
            .to_string();
        let confirmation = self.ops.cancel_offer(&id).await?;
        self.absorb_offer(offer, confirmation).await
    }

    async fn absorb_offer(&self, offer: &mut Offer, confirmation: Confirmation) -> EngineResult<()> {
        let resolution = self
            .resolver
            .resolve_offer(&offer.supplied(), confirmation_patch(confirmation))
            .await?;
        offer.apply_resolution(resolution);
        Ok(())
    }
}

/// Turns confirmed fields into a resolver patch.
fn confirmation_patch(confirmation: Confirmation) -> FieldPatch {
    let mut patch = FieldPatch::new();
    for (field, value) in confirmation {
        patch = patch.set(field, value);
    }
    patch
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::fields::Field;
    use crate::domain::value_objects::enums::Side;
    use crate::domain::value_objects::lifecycle::{OfferStatus, OrderStatus};
    use crate::infrastructure::exchange::InMemoryExchange;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn service() -> ExecutionService {
        ExecutionService::new(
            Arc::new(MarketCatalog::new()),
            Arc::new(InMemoryExchange::new()),
        )
    }

    fn order_patch() -> FieldPatch {
        FieldPatch::new()
            .arg("BTC/USD")
            .arg("buy")
            .set(Field::Amount, 2)
            .set(Field::Price, 1000)
    }

    #[tokio::test]
    async fn place_confirms_id_and_activates() {
        let service = service();
        let order = service.draft_order(order_patch()).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Draft);

        let mut ticket = Ticket::Order(order);
        service.place(&mut ticket).await.unwrap();

        let Ticket::Order(order) = &ticket else {
            unreachable!()
        };
        assert!(order.id().is_some());
        assert_eq!(order.status(), OrderStatus::Active);
        // Economics survive the round-trip.
        assert_eq!(order.total(), Some(dec("2000")));
    }

    #[tokio::test]
    async fn cancel_is_terminal() {
        let service = service();
        let order = service.draft_order(order_patch()).await.unwrap();
        let mut ticket = Ticket::Order(order);
        service.place(&mut ticket).await.unwrap();
        service.cancel(&mut ticket).await.unwrap();

        let Ticket::Order(order) = &ticket else {
            unreachable!()
        };
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_before_place_fails() {
        let service = service();
        let order = service.draft_order(order_patch()).await.unwrap();
        let mut ticket = Ticket::Order(order);
        let err = service.cancel(&mut ticket).await.unwrap_err();
        assert!(matches!(err, EngineError::NotPlaced { entity: "order" }));
    }

    #[tokio::test]
    async fn update_merges_new_intent() {
        let service = service();
        let order = service.draft_order(order_patch()).await.unwrap();
        let mut ticket = Ticket::Order(order);
        service.place(&mut ticket).await.unwrap();

        service
            .update(&mut ticket, FieldPatch::new().set(Field::Price, 1100))
            .await
            .unwrap();

        let Ticket::Order(order) = &ticket else {
            unreachable!()
        };
        assert_eq!(order.price(), Some(dec("1100")));
        assert_eq!(order.total(), Some(dec("2200")));
    }

    #[tokio::test]
    async fn replace_cancels_then_places() {
        let service = service();
        let first = service.draft_order(order_patch()).await.unwrap();
        let mut old = Ticket::Order(first);
        service.place(&mut old).await.unwrap();

        let second = service
            .draft_order(order_patch().set(Field::Hidden, true))
            .await
            .unwrap();
        let mut new = Ticket::Order(second);
        service.replace(&mut old, &mut new).await.unwrap();

        let Ticket::Order(old) = &old else {
            unreachable!()
        };
        let Ticket::Order(new) = &new else {
            unreachable!()
        };
        assert_eq!(old.status(), OrderStatus::Cancelled);
        assert_eq!(new.status(), OrderStatus::Active);
    }

    #[tokio::test]
    async fn offer_lifecycle_round_trips() {
        let service = service();
        let offer = service
            .draft_offer(
                FieldPatch::new()
                    .arg("USD")
                    .arg("lend")
                    .set(Field::Amount, 1000)
                    .set(Field::Duration, 30)
                    .set(Field::DailyRate, dec("0.0002")),
            )
            .await
            .unwrap();

        let mut ticket = Ticket::Offer(offer);
        service.place(&mut ticket).await.unwrap();
        let Ticket::Offer(offer) = &ticket else {
            unreachable!()
        };
        assert_eq!(offer.status(), OfferStatus::Active);

        service.cancel(&mut ticket).await.unwrap();
        let Ticket::Offer(offer) = &ticket else {
            unreachable!()
        };
        assert_eq!(offer.status(), OfferStatus::Cancelled);
    }

    #[tokio::test]
    async fn batch_dispatch_touches_every_member() {
        let service = service();
        let a = service.draft_order(order_patch()).await.unwrap();
        let b = service.draft_order(order_patch()).await.unwrap();
        let mut ticket = Ticket::OrderBatch(vec![a, b]);
        service.place(&mut ticket).await.unwrap();

        let Ticket::OrderBatch(orders) = &ticket else {
            unreachable!()
        };
        assert!(orders.iter().all(|order| order.id().is_some()));
        // Ids are distinct per placement.
        assert_ne!(orders[0].id(), orders[1].id());
    }

    #[tokio::test]
    async fn followup_inverts_a_filled_buy() {
        let service = service();
        let order = service
            .draft_order(order_patch().set(Field::FeePercentage, dec("0.001")))
            .await
            .unwrap();

        let followup = service.followup(&order).await.unwrap();
        assert_eq!(followup.side(), Some(Side::Sell));
        assert_eq!(followup.input(), order.output());
    }
}
