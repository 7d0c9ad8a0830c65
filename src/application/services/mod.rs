//! # Application Services
//!
//! Services orchestrating the domain engine against the exchange
//! collaborator.

pub mod lifecycle;

pub use lifecycle::{ExecutionService, Ticket};
