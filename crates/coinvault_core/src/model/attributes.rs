//! Attribute registry for coin records.
//!
//! # Responsibility
//! - Define the authoritative ordered list of editable attributes.
//! - Dispatch generic reads/writes to typed struct fields.
//!
//! # Invariants
//! - The table's order is stable for a process lifetime and identical for
//!   every collection; forms, table headers and search menus must derive
//!   their field lists from here instead of hard-coding names.
//! - Identity and image blobs are not attributes.

use crate::model::coin::Coin;
use serde::{Deserialize, Serialize};

/// Semantic type of an editable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Stored verbatim.
    Text,
    /// Strict base-10 integer.
    Integer,
    /// Strict decimal.
    Real,
}

/// One registry entry: name, semantic kind, and typed accessors.
#[derive(Debug, Clone, Copy)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    get: fn(&Coin) -> String,
    set: fn(&mut Coin, &str) -> bool,
}

impl Attribute {
    /// Reads this attribute from `coin`, rendered as text.
    pub fn value_of(&self, coin: &Coin) -> String {
        (self.get)(coin)
    }

    /// Writes `value` into `coin`, parsing per [`AttributeKind`].
    ///
    /// Returns `false` and leaves `coin` unmodified when the parse fails.
    pub fn apply(&self, coin: &mut Coin, value: &str) -> bool {
        (self.set)(coin, value)
    }
}

const ATTRIBUTES: &[Attribute] = &[
    Attribute {
        name: "name",
        kind: AttributeKind::Text,
        get: |coin| coin.name.clone(),
        set: |coin, value| {
            coin.name = value.to_string();
            true
        },
    },
    Attribute {
        name: "date",
        kind: AttributeKind::Integer,
        get: |coin| coin.date.to_string(),
        set: |coin, value| match value.parse::<i32>() {
            Ok(parsed) => {
                coin.date = parsed;
                true
            }
            Err(_) => false,
        },
    },
    Attribute {
        name: "grade",
        kind: AttributeKind::Text,
        get: |coin| coin.grade.clone(),
        set: |coin, value| {
            coin.grade = value.to_string();
            true
        },
    },
    Attribute {
        name: "diameter",
        kind: AttributeKind::Real,
        get: |coin| coin.diameter.to_string(),
        set: |coin, value| match value.parse::<f64>() {
            Ok(parsed) => {
                coin.diameter = parsed;
                true
            }
            Err(_) => false,
        },
    },
    Attribute {
        name: "thickness",
        kind: AttributeKind::Real,
        get: |coin| coin.thickness.to_string(),
        set: |coin, value| match value.parse::<f64>() {
            Ok(parsed) => {
                coin.thickness = parsed;
                true
            }
            Err(_) => false,
        },
    },
    Attribute {
        name: "edge",
        kind: AttributeKind::Text,
        get: |coin| coin.edge.clone(),
        set: |coin, value| {
            coin.edge = value.to_string();
            true
        },
    },
    Attribute {
        name: "weight",
        kind: AttributeKind::Real,
        get: |coin| coin.weight.to_string(),
        set: |coin, value| match value.parse::<f64>() {
            Ok(parsed) => {
                coin.weight = parsed;
                true
            }
            Err(_) => false,
        },
    },
    Attribute {
        name: "composition",
        kind: AttributeKind::Text,
        get: |coin| coin.composition.clone(),
        set: |coin, value| {
            coin.composition = value.to_string();
            true
        },
    },
    Attribute {
        name: "denomination",
        kind: AttributeKind::Text,
        get: |coin| coin.denomination.clone(),
        set: |coin, value| {
            coin.denomination = value.to_string();
            true
        },
    },
];

/// Returns the fixed ordered attribute table.
pub fn attributes() -> &'static [Attribute] {
    ATTRIBUTES
}

/// Looks up one attribute by exact name.
pub fn find(name: &str) -> Option<&'static Attribute> {
    ATTRIBUTES.iter().find(|attr| attr.name == name)
}
