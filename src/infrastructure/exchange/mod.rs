//! # Exchange Collaborator
//!
//! The port the engine calls out to ([`ExchangeOps`]), its error
//! taxonomy, and the adapters shipped with the engine: a seedable
//! in-memory exchange for tests and a caching, rate-limited wrapper
//! for real transports.

pub mod cached;
pub mod error;
pub mod in_memory;
pub mod traits;

pub use cached::CachedExchange;
pub use error::{ExchangeError, ExchangeResult};
pub use in_memory::InMemoryExchange;
pub use traits::{AccountFees, Confirmation, ExchangeOps};
