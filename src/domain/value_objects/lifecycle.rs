//! # Lifecycle Status
//!
//! Human-facing status of an order or offer, projected from id/active/
//! cancelled flags and accumulated fill amounts.
//!
//! # State Machine
//!
//! ```text
//! Draft → Placed → Active → PartiallyFilled → Executed
//!           ↓        ↓            ↓
//!           └────────┴────────────┴→ Cancelled
//! ```
//!
//! Status is never stored; it is recomputed on every access from the
//! owning entity's fields and fill records (see
//! [`Order::status`](crate::domain::entities::order::Order::status)).
//!
//! # Examples
//!
//! ```
//! use trade_resolver::domain::value_objects::lifecycle::OrderStatus;
//!
//! assert!(!OrderStatus::Active.is_terminal());
//! assert!(OrderStatus::Executed.is_terminal());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OrderStatus {
    /// No exchange id and no fills; the order exists locally only.
    Draft = 0,
    /// An id is present but the exchange has not yet confirmed it
    /// active or cancelled.
    Placed = 1,
    /// Confirmed live on the exchange.
    Active = 2,
    /// Some, but not all, of the amount has executed.
    PartiallyFilled = 3,
    /// Fully executed (terminal).
    Executed = 4,
    /// Explicitly cancelled (terminal).
    Cancelled = 5,
    /// Fills exist without an id; the object is in an inconsistent
    /// externally-supplied state.
    Unknown = 6,
}

impl OrderStatus {
    /// Returns true if this is a terminal status.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Executed | Self::Cancelled)
    }

    /// Returns true if the order is resting or executing on the
    /// exchange.
    #[inline]
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Placed | Self::Active | Self::PartiallyFilled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Placed => write!(f, "placed"),
            Self::Active => write!(f, "active"),
            Self::PartiallyFilled => write!(f, "partially_filled"),
            Self::Executed => write!(f, "executed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Lifecycle status of a funding offer.
///
/// Mirrors [`OrderStatus`] with lends in place of trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OfferStatus {
    /// No exchange id and no fulfillments.
    Draft = 0,
    /// An id is present but not yet confirmed active or cancelled.
    Placed = 1,
    /// Confirmed live on the funding book.
    Active = 2,
    /// Some, but not all, of the amount has been taken.
    PartiallyFilled = 3,
    /// Fully taken (terminal).
    Executed = 4,
    /// Explicitly cancelled (terminal).
    Cancelled = 5,
    /// Lends exist without an id.
    Unknown = 6,
}

impl OfferStatus {
    /// Returns true if this is a terminal status.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Executed | Self::Cancelled)
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Placed => write!(f, "placed"),
            Self::Active => write!(f, "active"),
            Self::PartiallyFilled => write!(f, "partially_filled"),
            Self::Executed => write!(f, "executed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
