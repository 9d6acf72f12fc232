//! Core domain logic for CoinVault.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attributes::{attributes, Attribute, AttributeKind};
pub use model::coin::{Coin, CoinId};
pub use repo::coin_store::{
    is_protected_collection, CoinStore, SqliteCoinStore, StoreError, StoreResult,
};
pub use search::attr_query::search_collection;
pub use service::coin_service::{CoinService, CreateCoinError, MoveError};
pub use service::validate::{validate_and_build, ExpectedKind, FieldError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
