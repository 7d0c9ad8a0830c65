//! # Cached Exchange Wrapper
//!
//! An explicit cache and rate-limiter object wrapped around any
//! collaborator, replacing hidden per-instance memoization.
//!
//! Market-data queries (fee schedules, balances, tickers) are cached
//! with a TTL and a capacity bound; every call that reaches the inner
//! collaborator first waits on a direct rate limiter. Lifecycle verbs
//! are never cached — only throttled.
//!
//! # Examples
//!
//! ```ignore
//! let exchange = CachedExchange::from_settings(inner, &settings.transport);
//! let ticker = exchange.ticker(&market).await?;   // hits the wire
//! let again = exchange.ticker(&market).await?;    // served from cache
//! ```

use crate::domain::fields::FieldMap;
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::market::{Market, MarketContext};
use crate::domain::value_objects::ticker::Ticker;
use crate::infrastructure::exchange::error::ExchangeResult;
use crate::infrastructure::exchange::traits::{AccountFees, Confirmation, ExchangeOps};
use crate::infrastructure::settings::TransportSettings;
use async_trait::async_trait;
use dashmap::DashMap;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use rust_decimal::Decimal;
use std::hash::Hash;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;
type BalanceKey = (String, String, MarketContext);

/// Caching, rate-limited wrapper around a collaborator.
pub struct CachedExchange {
    inner: Arc<dyn ExchangeOps>,
    ttl: Duration,
    capacity: usize,
    limiter: DirectLimiter,
    fees: DashMap<String, (Instant, AccountFees)>,
    balances: DashMap<BalanceKey, (Instant, Decimal)>,
    tickers: DashMap<String, (Instant, Ticker)>,
}

impl CachedExchange {
    /// Wraps a collaborator with explicit cache and rate-limit bounds.
    #[must_use]
    pub fn new(
        inner: Arc<dyn ExchangeOps>,
        ttl: Duration,
        capacity: usize,
        requests_per_second: u32,
    ) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN),
        );
        Self {
            inner,
            ttl,
            capacity: capacity.max(1),
            limiter: RateLimiter::direct(quota),
            fees: DashMap::new(),
            balances: DashMap::new(),
            tickers: DashMap::new(),
        }
    }

    /// Wraps a collaborator using the transport settings.
    #[must_use]
    pub fn from_settings(inner: Arc<dyn ExchangeOps>, settings: &TransportSettings) -> Self {
        Self::new(
            inner,
            Duration::from_millis(settings.cache_ttl_ms),
            settings.cache_capacity,
            settings.rate_limit_per_second,
        )
    }

    fn cached<K, V>(&self, map: &DashMap<K, (Instant, V)>, key: &K) -> Option<V>
    where
        K: Eq + Hash,
        V: Clone,
    {
        let entry = map.get(key)?;
        let (stored_at, value) = entry.value();
        if stored_at.elapsed() < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    fn store<K, V>(&self, map: &DashMap<K, (Instant, V)>, key: K, value: V)
    where
        K: Eq + Hash,
    {
        if map.len() >= self.capacity {
            map.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
            if map.len() >= self.capacity {
                map.clear();
            }
        }
        map.insert(key, (Instant::now(), value));
    }
}

#[async_trait]
impl ExchangeOps for CachedExchange {
    async fn fee_schedule(&self, account: &str) -> ExchangeResult<AccountFees> {
        let key = account.to_string();
        if let Some(hit) = self.cached(&self.fees, &key) {
            return Ok(hit);
        }
        self.limiter.until_ready().await;
        let fresh = self.inner.fee_schedule(account).await?;
        self.store(&self.fees, key, fresh.clone());
        Ok(fresh)
    }

    async fn balance(
        &self,
        account: &str,
        instrument: &Instrument,
        context: MarketContext,
    ) -> ExchangeResult<Decimal> {
        let key = (
            account.to_string(),
            instrument.code().to_string(),
            context,
        );
        if let Some(hit) = self.cached(&self.balances, &key) {
            return Ok(hit);
        }
        self.limiter.until_ready().await;
        let fresh = self.inner.balance(account, instrument, context).await?;
        self.store(&self.balances, key, fresh);
        Ok(fresh)
    }

    async fn ticker(&self, market: &Market) -> ExchangeResult<Ticker> {
        let key = market.to_string();
        if let Some(hit) = self.cached(&self.tickers, &key) {
            return Ok(hit);
        }
        self.limiter.until_ready().await;
        let fresh = self.inner.ticker(market).await?;
        self.store(&self.tickers, key, fresh);
        Ok(fresh)
    }

    async fn place_order(&self, fields: &FieldMap) -> ExchangeResult<Confirmation> {
        self.limiter.until_ready().await;
        self.inner.place_order(fields).await
    }

    async fn update_order(&self, id: &str, fields: &FieldMap) -> ExchangeResult<Confirmation> {
        self.limiter.until_ready().await;
        self.inner.update_order(id, fields).await
    }

    async fn cancel_order(&self, id: &str) -> ExchangeResult<Confirmation> {
        self.limiter.until_ready().await;
        self.inner.cancel_order(id).await
    }

    async fn place_offer(&self, fields: &FieldMap) -> ExchangeResult<Confirmation> {
        self.limiter.until_ready().await;
        self.inner.place_offer(fields).await
    }

    async fn update_offer(&self, id: &str, fields: &FieldMap) -> ExchangeResult<Confirmation> {
        self.limiter.until_ready().await;
        self.inner.update_offer(id, fields).await
    }

    async fn cancel_offer(&self, id: &str) -> ExchangeResult<Confirmation> {
        self.limiter.until_ready().await;
        self.inner.cancel_offer(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::pair::Pair;
    use crate::infrastructure::exchange::in_memory::InMemoryExchange;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn market() -> Market {
        let pair: Pair = "BTC/USD".parse().unwrap();
        Market::spot(pair, "bitfinex")
    }

    #[tokio::test]
    async fn second_ticker_within_ttl_is_served_from_cache() {
        let market = market();
        let inner = Arc::new(
            InMemoryExchange::new()
                .with_ticker(&market, Ticker::new(dec("100"), dec("102"), dec("101"))),
        );
        let cached = CachedExchange::new(inner.clone(), Duration::from_secs(60), 16, 100);

        cached.ticker(&market).await.unwrap();
        cached.ticker(&market).await.unwrap();
        assert_eq!(inner.market_data_calls(), 1);
    }

    #[tokio::test]
    async fn expired_entries_are_refreshed() {
        let market = market();
        let inner = Arc::new(
            InMemoryExchange::new()
                .with_ticker(&market, Ticker::new(dec("100"), dec("102"), dec("101"))),
        );
        let cached = CachedExchange::new(inner.clone(), Duration::ZERO, 16, 100);

        cached.ticker(&market).await.unwrap();
        cached.ticker(&market).await.unwrap();
        assert_eq!(inner.market_data_calls(), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let inner = Arc::new(InMemoryExchange::new());
        let cached = CachedExchange::new(inner.clone(), Duration::from_secs(60), 16, 100);
        let usd = Instrument::new("USD").unwrap();

        assert!(
            cached
                .balance("main", &usd, MarketContext::Spot)
                .await
                .is_err()
        );
        assert!(
            cached
                .balance("main", &usd, MarketContext::Spot)
                .await
                .is_err()
        );
        assert_eq!(inner.market_data_calls(), 2);
    }

    #[tokio::test]
    async fn capacity_is_bounded() {
        let inner = Arc::new(InMemoryExchange::new());
        let cached = CachedExchange::new(inner, Duration::from_secs(60), 2, 100);

        for code in ["A1", "B2", "C3", "D4"] {
            let instrument = Instrument::new(code).unwrap();
            let key = (
                "main".to_string(),
                instrument.code().to_string(),
                MarketContext::Spot,
            );
            cached.store(&cached.balances, key, dec("1"));
        }
        assert!(cached.balances.len() <= 2);
    }
}
