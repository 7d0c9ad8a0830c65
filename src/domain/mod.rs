//! # Domain Layer
//!
//! Core domain model of the attribute-resolution engine: value objects,
//! the field schema, derivation rules, the fixed-point resolver, and the
//! Order/Offer entities with their lifecycle projections.

pub mod entities;
pub mod errors;
pub mod fields;
pub mod resolver;
pub mod rules;
pub mod value_objects;
