//! Attribute-scoped filtering over one collection.
//!
//! # Responsibility
//! - Match records against a query by attribute, with the match policy
//!   selected by the attribute's kind.
//!
//! # Invariants
//! - Text attributes match by case-insensitive substring.
//! - Numeric attributes match by exact value equality after parsing both
//!   sides with the attribute's kind; a query that fails to parse matches
//!   nothing.
//! - An unknown attribute name yields an empty result, not an error.
//! - Result order follows the collection's natural iteration order.

use crate::model::attributes::{self, Attribute, AttributeKind};
use crate::model::coin::Coin;
use crate::repo::coin_store::{CoinStore, StoreResult};

/// Filters `collection` down to the records whose `attribute` matches
/// `query`.
pub fn search_collection<S: CoinStore>(
    store: &S,
    collection: &str,
    attribute: &str,
    query: &str,
) -> StoreResult<Vec<Coin>> {
    let Some(attr) = attributes::find(attribute) else {
        return Ok(Vec::new());
    };

    let coins = store.list_coins(collection)?;
    Ok(coins
        .into_iter()
        .filter(|coin| matches(attr, coin, query))
        .collect())
}

#[allow(clippy::float_cmp)] // numeric matching is exact, not tolerance-banded
fn matches(attr: &Attribute, coin: &Coin, query: &str) -> bool {
    let stored = attr.value_of(coin);
    match attr.kind {
        AttributeKind::Text => stored.to_lowercase().contains(&query.to_lowercase()),
        AttributeKind::Integer => match (stored.parse::<i32>(), query.parse::<i32>()) {
            (Ok(lhs), Ok(rhs)) => lhs == rhs,
            _ => false,
        },
        AttributeKind::Real => match (stored.parse::<f64>(), query.parse::<f64>()) {
            (Ok(lhs), Ok(rhs)) => lhs == rhs,
            _ => false,
        },
    }
}
