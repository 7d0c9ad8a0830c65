//! # Domain Entities
//!
//! The resolvable entities of the engine and their fill records.
//!
//! - [`order::Order`] - a proposed or live trade
//! - [`offer::Offer`] - a margin-funding offer
//! - [`fill::Trade`] / [`fill::Lend`] - immutable execution records

pub mod fill;
pub mod offer;
pub mod order;

pub use fill::{Lend, Trade};
pub use offer::Offer;
pub use order::Order;
