//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the collection store contract used by services and search.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Collection names are quoted before use as physical identifiers; callers
//!   never pre-sanitize.
//! - Update/delete against a missing identity are no-ops reported through the
//!   affected-row count, not errors.

pub mod coin_store;
