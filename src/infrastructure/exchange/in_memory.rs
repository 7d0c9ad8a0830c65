//! # In-Memory Exchange
//!
//! A seedable in-memory implementation of the collaborator port,
//! backing the engine's tests and offline experiments.
//!
//! Placement assigns sequential ids and confirms the entity active;
//! cancellation confirms the cancelled flag. Market data (balances,
//! tickers, fee schedules) is whatever the test seeded.

use crate::domain::fields::{Field, FieldMap, RawValue};
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::market::{FeeSchedule, Market, MarketContext};
use crate::domain::value_objects::ticker::Ticker;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::infrastructure::exchange::error::{ExchangeError, ExchangeResult};
use crate::infrastructure::exchange::traits::{AccountFees, Confirmation, ExchangeOps};
use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

type BalanceKey = (String, String, MarketContext);

/// Seedable in-memory collaborator.
#[derive(Debug, Default)]
pub struct InMemoryExchange {
    balances: Mutex<HashMap<BalanceKey, Decimal>>,
    tickers: Mutex<HashMap<String, Ticker>>,
    fees: Mutex<HashMap<String, AccountFees>>,
    next_id: AtomicU64,
    market_data_calls: AtomicU64,
}

impl InMemoryExchange {
    /// Creates an empty exchange.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account balance.
    #[must_use]
    pub fn with_balance(
        self,
        account: impl Into<String>,
        instrument: &Instrument,
        context: MarketContext,
        amount: Decimal,
    ) -> Self {
        self.balances.lock().insert(
            (account.into(), instrument.code().to_string(), context),
            amount,
        );
        self
    }

    /// Seeds a market quote.
    #[must_use]
    pub fn with_ticker(self, market: &Market, ticker: Ticker) -> Self {
        self.tickers.lock().insert(market.to_string(), ticker);
        self
    }

    /// Seeds an account's fee schedule for one market symbol.
    #[must_use]
    pub fn with_fees(
        self,
        account: impl Into<String>,
        symbol: impl Into<String>,
        schedule: FeeSchedule,
    ) -> Self {
        self.fees
            .lock()
            .entry(account.into())
            .or_default()
            .insert(symbol.into(), schedule);
        self
    }

    /// Number of market-data calls (balance/ticker/fee schedule) that
    /// reached this adapter. Used to observe cache behavior.
    #[must_use]
    pub fn market_data_calls(&self) -> u64 {
        self.market_data_calls.load(Ordering::Relaxed)
    }

    fn confirm_placement(&self, prefix: &str) -> Confirmation {
        let id = format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        vec![
            (Field::Id, RawValue::Text(id)),
            (Field::Active, RawValue::Flag(true)),
            (Field::Timestamp, RawValue::Timestamp(Timestamp::now())),
        ]
    }

    fn confirm_cancellation(id: &str) -> Confirmation {
        vec![
            (Field::Id, RawValue::Text(id.to_string())),
            (Field::Active, RawValue::Flag(false)),
            (Field::Cancelled, RawValue::Flag(true)),
        ]
    }
}

#[async_trait]
impl ExchangeOps for InMemoryExchange {
    async fn fee_schedule(&self, account: &str) -> ExchangeResult<AccountFees> {
        self.market_data_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.fees.lock().get(account).cloned().unwrap_or_default())
    }

    async fn balance(
        &self,
        account: &str,
        instrument: &Instrument,
        context: MarketContext,
    ) -> ExchangeResult<Decimal> {
        self.market_data_calls.fetch_add(1, Ordering::Relaxed);
        let key = (
            account.to_string(),
            instrument.code().to_string(),
            context,
        );
        self.balances
            .lock()
            .get(&key)
            .copied()
            .ok_or_else(|| ExchangeError::not_found(format!("balance {instrument} for {account}")))
    }

    async fn ticker(&self, market: &Market) -> ExchangeResult<Ticker> {
        self.market_data_calls.fetch_add(1, Ordering::Relaxed);
        self.tickers
            .lock()
            .get(&market.to_string())
            .copied()
            .ok_or_else(|| ExchangeError::not_found(format!("ticker for {market}")))
    }

    async fn place_order(&self, _fields: &FieldMap) -> ExchangeResult<Confirmation> {
        Ok(self.confirm_placement("ord"))
    }

    async fn update_order(&self, id: &str, _fields: &FieldMap) -> ExchangeResult<Confirmation> {
        Ok(vec![
            (Field::Id, RawValue::Text(id.to_string())),
            (Field::Active, RawValue::Flag(true)),
        ])
    }

    async fn cancel_order(&self, id: &str) -> ExchangeResult<Confirmation> {
        Ok(Self::confirm_cancellation(id))
    }

    async fn place_offer(&self, _fields: &FieldMap) -> ExchangeResult<Confirmation> {
        Ok(self.confirm_placement("off"))
    }

    async fn update_offer(&self, id: &str, _fields: &FieldMap) -> ExchangeResult<Confirmation> {
        Ok(vec![
            (Field::Id, RawValue::Text(id.to_string())),
            (Field::Active, RawValue::Flag(true)),
        ])
    }

    async fn cancel_offer(&self, id: &str) -> ExchangeResult<Confirmation> {
        Ok(Self::confirm_cancellation(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::pair::Pair;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn placement_ids_are_sequential_and_distinct() {
        let exchange = InMemoryExchange::new();
        let first = exchange.place_order(&FieldMap::new()).await.unwrap();
        let second = exchange.place_order(&FieldMap::new()).await.unwrap();
        assert_ne!(first[0].1, second[0].1);
    }

    #[tokio::test]
    async fn seeded_market_data_is_served() {
        let pair: Pair = "BTC/USD".parse().unwrap();
        let market = Market::spot(pair, "bitfinex");
        let usd = Instrument::new("USD").unwrap();
        let exchange = InMemoryExchange::new()
            .with_ticker(&market, Ticker::new(dec("100"), dec("102"), dec("101")))
            .with_balance("main", &usd, MarketContext::Spot, dec("5000"));

        assert_eq!(
            exchange.ticker(&market).await.unwrap().mid(),
            dec("101")
        );
        assert_eq!(
            exchange
                .balance("main", &usd, MarketContext::Spot)
                .await
                .unwrap(),
            dec("5000")
        );
        assert_eq!(exchange.market_data_calls(), 2);
    }

    #[tokio::test]
    async fn unknown_market_data_is_not_found() {
        let exchange = InMemoryExchange::new();
        let usd = Instrument::new("USD").unwrap();
        let err = exchange
            .balance("main", &usd, MarketContext::Spot)
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::NotFound(_)));
    }
}
