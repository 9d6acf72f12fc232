//! Coin domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by every collection.
//! - Provide generic attribute access driven by the attribute registry.
//!
//! # Invariants
//! - `id` is stable and never reused for another coin.
//! - Equality is by `id` only; attribute values never participate.
//! - Generic writes are all-or-nothing: a failed parse leaves the record
//!   unmodified.

use crate::model::attributes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a coin record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CoinId = Uuid;

/// Canonical coin record.
///
/// The nine scalar attributes are the editable surface; the two blob fields
/// carry image bytes opaquely and are never interpreted by core code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    /// Stable identity, generated at creation or supplied by the store on load.
    pub id: CoinId,
    pub name: String,
    /// Mint year.
    pub date: i32,
    pub grade: String,
    pub diameter: f64,
    pub thickness: f64,
    pub edge: String,
    pub weight: f64,
    pub composition: String,
    pub denomination: String,
    /// Front-side image bytes, stored but never decoded here.
    pub obverse_png: Option<Vec<u8>>,
    /// Back-side image bytes, stored but never decoded here.
    pub reverse_png: Option<Vec<u8>>,
}

impl Coin {
    /// Creates a coin with a generated stable ID and default attribute values
    /// (empty strings, zero numerics, no images).
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a coin with a caller-provided stable ID.
    ///
    /// Used by the store when loading persisted rows, where identity already
    /// exists.
    pub fn with_id(id: CoinId) -> Self {
        Self {
            id,
            name: String::new(),
            date: 0,
            grade: String::new(),
            diameter: 0.0,
            thickness: 0.0,
            edge: String::new(),
            weight: 0.0,
            composition: String::new(),
            denomination: String::new(),
            obverse_png: None,
            reverse_png: None,
        }
    }

    /// Returns the named attribute's value rendered as text.
    ///
    /// Unknown attribute names yield an empty string, never an error.
    pub fn attribute(&self, name: &str) -> String {
        match attributes::find(name) {
            Some(attr) => attr.value_of(self),
            None => String::new(),
        }
    }

    /// Sets the named attribute from its textual form, parsing numerics per
    /// the attribute's kind.
    ///
    /// Returns `false` on an unknown name or a failed parse; the record is
    /// left unmodified in both cases.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        match attributes::find(name) {
            Some(attr) => attr.apply(self, value),
            None => false,
        }
    }
}

impl Default for Coin {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Coin {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Coin {}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Coin{{id={}", self.id)?;
        for attr in attributes::attributes() {
            write!(f, ", {}={}", attr.name, attr.value_of(self))?;
        }
        write!(f, "}}")
    }
}
