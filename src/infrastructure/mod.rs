//! # Infrastructure Layer
//!
//! The exchange collaborator port and adapters, plus engine settings.
//! Real per-exchange transports (HTTP, signing, wire parsing) live
//! outside this crate and implement
//! [`ExchangeOps`](exchange::ExchangeOps).

pub mod exchange;
pub mod settings;

pub use settings::{EngineSettings, ResolverSettings, SettingsError, TransportSettings};
