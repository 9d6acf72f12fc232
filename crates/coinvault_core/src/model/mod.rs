//! Domain model for coin records.
//!
//! # Responsibility
//! - Define the canonical coin record stored by every collection.
//! - Expose the attribute registry that drives generic field access.
//!
//! # Invariants
//! - Every record is identified by a stable `CoinId`.
//! - The editable attribute set and its order are identical across all
//!   collections; the registry in [`attributes`] is the single source.

pub mod attributes;
pub mod coin;
