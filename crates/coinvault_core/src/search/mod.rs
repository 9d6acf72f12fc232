//! Attribute-scoped search entry points.
//!
//! # Responsibility
//! - Expose read-path filtering over a collection's records.
//! - Keep match policy driven by the attribute registry.

pub mod attr_query;
