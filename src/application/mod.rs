//! # Application Layer
//!
//! Lifecycle orchestration over the domain engine: the place/update/
//! cancel/replace verbs, followup construction, and the application
//! error taxonomy.

pub mod error;
pub mod services;

pub use error::{EngineError, EngineResult};
pub use services::{ExecutionService, Ticket};
