//! # Exchange Collaborator Port
//!
//! Port definition for the account/exchange collaborator the resolver
//! and lifecycle verbs call out to.
//!
//! The engine consumes this as an opaque capability: market data
//! queries feed shortcut substitution and fee augmentation, the
//! lifecycle verbs perform the network actions and hand back confirmed
//! fields. Real adapters (HTTP transport, signing, response parsing)
//! implement this trait outside the engine; the in-memory adapter in
//! this module tree backs the tests.
//!
//! # Examples
//!
//! ```ignore
//! use trade_resolver::infrastructure::exchange::{ExchangeOps, ExchangeResult};
//!
//! struct MyExchange { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl ExchangeOps for MyExchange {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::fields::{Field, FieldMap, RawValue};
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::market::{FeeSchedule, Market, MarketContext};
use crate::domain::value_objects::ticker::Ticker;
use crate::infrastructure::exchange::error::ExchangeResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Confirmed fields returned by a lifecycle verb, fed back through the
/// resolver as new supplied facts.
pub type Confirmation = Vec<(Field, RawValue)>;

/// Fee schedules of an account, keyed by market symbol
/// (`"BTC/USD"`, `"USD"`, ...).
pub type AccountFees = HashMap<String, FeeSchedule>;

/// The account/exchange collaborator.
///
/// All calls are blocking and atomic from the engine's point of view:
/// they either return a value or fail, with no partial results. Retry
/// and rate limiting are the transport's concern (see
/// [`CachedExchange`](crate::infrastructure::exchange::CachedExchange)),
/// never the resolver's.
#[async_trait]
pub trait ExchangeOps: Send + Sync {
    /// Returns the account's fee schedules by market symbol.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn fee_schedule(&self, account: &str) -> ExchangeResult<AccountFees>;

    /// Returns the account's balance of an instrument in a context.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn balance(
        &self,
        account: &str,
        instrument: &Instrument,
        context: MarketContext,
    ) -> ExchangeResult<Decimal>;

    /// Returns the current quote of a market.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn ticker(&self, market: &Market) -> ExchangeResult<Ticker>;

    /// Places an order; returns the exchange-confirmed fields.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn place_order(&self, fields: &FieldMap) -> ExchangeResult<Confirmation>;

    /// Updates a live order; returns the confirmed fields.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn update_order(&self, id: &str, fields: &FieldMap) -> ExchangeResult<Confirmation>;

    /// Cancels a live order; returns the confirmed fields.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn cancel_order(&self, id: &str) -> ExchangeResult<Confirmation>;

    /// Places a funding offer; returns the confirmed fields.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn place_offer(&self, fields: &FieldMap) -> ExchangeResult<Confirmation>;

    /// Updates a live offer; returns the confirmed fields.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn update_offer(&self, id: &str, fields: &FieldMap) -> ExchangeResult<Confirmation>;

    /// Cancels a live offer; returns the confirmed fields.
    ///
    /// # Errors
    ///
    /// Propagates transport and exchange-side failures unchanged.
    async fn cancel_offer(&self, id: &str) -> ExchangeResult<Confirmation>;
}
