//! # trade-resolver
//!
//! Attribute-resolution engine for exchange orders and margin-funding
//! offers.
//!
//! A caller describes a prospective trade or funding offer by supplying
//! any sufficient subset of its economic attributes — amount and price,
//! total and side, input and output — and the engine computes every
//! other attribute consistently: total, fees, net proceeds, counter
//! instruments, lifecycle status. The core is a fixed-point constraint
//! solver over a fixed schema of named financial fields, operating
//! under exact decimal arithmetic and market-specific rounding rules.
//!
//! ## Layers
//!
//! - [`domain`] — value objects, the field schema, derivation rules,
//!   the resolver, and the Order/Offer entities
//! - [`application`] — the lifecycle verbs (place/update/cancel/
//!   replace) and followup construction
//! - [`infrastructure`] — the exchange collaborator port, the
//!   in-memory and cached adapters, and engine settings
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use trade_resolver::domain::entities::Order;
//! use trade_resolver::domain::fields::{Field, FieldMap, FieldPatch};
//! use trade_resolver::domain::resolver::Resolver;
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
//!             .set(Field::Price, 1000)
//!             .set(Field::FeePercentage, "0.001".parse::<rust_decimal::Decimal>().unwrap()),
//!     )
//!     .unwrap();
//! let order = Order::from_resolution(resolution);
//!
//! assert_eq!(order.total(), Some("2000".parse().unwrap()));
//! assert_eq!(order.net(), Some("1.998".parse().unwrap()));
//! assert_eq!(order.fee_instrument().unwrap().code(), "BTC");
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{EngineError, EngineResult, ExecutionService, Ticket};
pub use domain::entities::{Lend, Offer, Order, Trade};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::fields::{Field, FieldMap, FieldPatch, Provenance};
pub use domain::resolver::{Resolution, Resolver};
pub use domain::value_objects::{
    Instrument, Market, MarketCatalog, MarketContext, OfferStatus, OrderStatus, Pair, Side,
    Ticker,
};
pub use infrastructure::exchange::{CachedExchange, ExchangeError, ExchangeOps, InMemoryExchange};
pub use infrastructure::EngineSettings;
