//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`Instrument`]: a currency/asset, equal by code
//! - [`Pair`]: two distinct instruments, order-independent equality
//! - [`Market`]: symbol + context + exchange + limits + fees
//!
//! ## Arithmetic
//!
//! - [`arithmetic::CheckedArithmetic`]: safe decimal operations
//! - [`arithmetic::round_down`] / [`arithmetic::round_significant`]:
//!   the two rounding modes applied by derivation rules
//!
//! ## Vocabularies and Projections
//!
//! - [`enums`]: side/type/context vocabularies
//! - [`lifecycle`]: order and offer status projections
//! - [`ticker`]: market quotes and named price points

pub mod arithmetic;
pub mod enums;
pub mod instrument;
pub mod lifecycle;
pub mod market;
pub mod pair;
pub mod ticker;
pub mod timestamp;

pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use enums::{OfferKind, OfferSide, OrderKind, Side, TradeContext};
pub use instrument::Instrument;
pub use lifecycle::{OfferStatus, OrderStatus};
pub use market::{FeeSchedule, LimitBand, Limits, Market, MarketCatalog, MarketContext, MarketSymbol};
pub use pair::Pair;
pub use ticker::{PricePoint, Ticker};
pub use timestamp::Timestamp;
