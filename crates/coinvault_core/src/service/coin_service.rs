//! Coin use-case service.
//!
//! # Responsibility
//! - Provide the API surface consumed by presentation layers: collection
//!   lifecycle, validated coin creation, CRUD, search and move.
//! - Delegate persistence to the store implementation.
//!
//! # Invariants
//! - Coin creation validates before touching the store; a validation failure
//!   performs no store mutation.
//! - Move preconditions are checked before any store access.
//! - The service holds no ambient state; the last-opened collection is owned
//!   by the presentation layer and injected as a plain parameter.

use crate::model::coin::{Coin, CoinId};
use crate::repo::coin_store::{CoinStore, StoreError, StoreResult};
use crate::search::attr_query::search_collection;
use crate::service::validate::{validate_and_build, FieldError};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Collection opened at startup when no usable last-opened name is supplied.
const DEFAULT_STARTUP_COLLECTION: &str = "Owned";

/// Error from validated coin creation.
#[derive(Debug)]
pub enum CreateCoinError {
    /// Raw input failed validation; no record was built or stored.
    Invalid(Vec<FieldError>),
    Store(StoreError),
}

impl Display for CreateCoinError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => {
                write!(f, "coin input failed validation: ")?;
                for (index, error) in errors.iter().enumerate() {
                    if index > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{error}")?;
                }
                Ok(())
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CreateCoinError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for CreateCoinError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Error from a cross-collection move.
#[derive(Debug)]
pub enum MoveError {
    /// Source or target collection name is empty.
    EmptyCollectionName,
    /// Source and target name the same collection.
    SameCollection(String),
    Store(StoreError),
}

impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCollectionName => write!(f, "move requires non-empty collection names"),
            Self::SameCollection(name) => {
                write!(f, "cannot move a coin within the same collection `{name}`")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MoveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyCollectionName => None,
            Self::SameCollection(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for MoveError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case service wrapper over a coin store.
pub struct CoinService<S: CoinStore> {
    store: S,
}

impl<S: CoinStore> CoinService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates raw text fields and inserts the resulting coin into
    /// `collection` as one operation.
    ///
    /// Returns the new coin's identity on success. On validation failure the
    /// full error batch is returned and the store is not touched.
    pub fn create_coin(
        &self,
        collection: &str,
        raw_fields: &HashMap<String, String>,
    ) -> Result<CoinId, CreateCoinError> {
        let coin = validate_and_build(raw_fields).map_err(CreateCoinError::Invalid)?;
        let id = self.store.insert_coin(collection, &coin, None, None)?;
        Ok(id)
    }

    /// Ensures a collection exists. Idempotent.
    pub fn create_collection(&self, name: &str) -> StoreResult<()> {
        self.store.create_collection(name)
    }

    /// Returns every known collection name, protected ones included.
    pub fn collection_names(&self) -> StoreResult<Vec<String>> {
        self.store.collection_names()
    }

    /// Deletes a collection unless it is protected.
    pub fn delete_collection(&self, name: &str) -> StoreResult<()> {
        self.store.delete_collection(name)
    }

    /// Returns all coins in the collection.
    pub fn list_coins(&self, collection: &str) -> StoreResult<Vec<Coin>> {
        self.store.list_coins(collection)
    }

    /// Looks up a coin by identity.
    pub fn get_coin(&self, collection: &str, id: CoinId) -> StoreResult<Option<Coin>> {
        self.store.get_coin(collection, id)
    }

    /// Persists edits to an existing coin's scalar attributes.
    ///
    /// Returns the affected-row count; 0 means the identity was absent.
    pub fn save_coin(&self, collection: &str, coin: &Coin) -> StoreResult<usize> {
        self.store.update_coin(collection, coin)
    }

    /// Deletes a coin by identity.
    ///
    /// Returns the affected-row count; 0 means the identity was absent.
    pub fn delete_coin(&self, collection: &str, id: CoinId) -> StoreResult<usize> {
        self.store.delete_coin(collection, id)
    }

    /// Searches a collection by attribute and query text.
    pub fn search_coins(
        &self,
        collection: &str,
        attribute: &str,
        query: &str,
    ) -> StoreResult<Vec<Coin>> {
        search_collection(&self.store, collection, attribute, query)
    }

    /// Moves a coin from `source` to `target`, carrying its identity and
    /// image bytes.
    ///
    /// Precondition violations fail before any store access.
    pub fn move_coin(&self, source: &str, target: &str, coin: &Coin) -> Result<(), MoveError> {
        if source.trim().is_empty() || target.trim().is_empty() {
            return Err(MoveError::EmptyCollectionName);
        }
        if source == target {
            return Err(MoveError::SameCollection(source.to_string()));
        }

        self.store.relocate_coin(source, target, coin)?;
        Ok(())
    }

    /// Resolves which collection to open at startup.
    ///
    /// Returns `last_opened` when it names a known collection, otherwise the
    /// default. The preference itself lives with the presentation layer.
    pub fn startup_collection(&self, last_opened: Option<&str>) -> StoreResult<String> {
        let names = self.store.collection_names()?;
        if let Some(last) = last_opened {
            if names.iter().any(|name| name == last) {
                return Ok(last.to_string());
            }
        }
        Ok(DEFAULT_STARTUP_COLLECTION.to_string())
    }
}
