//! Raw-input validation pipeline.
//!
//! # Responsibility
//! - Turn a map of raw text fields into a typed coin record or a batch of
//!   field errors.
//!
//! # Invariants
//! - `name`, `date` and `grade` are required; when any is missing exactly one
//!   combined error for the trio is produced, never one per field. Downstream
//!   display keys off this aggregate.
//! - Numeric fields are checked only when non-empty; an absent numeric field
//!   means zero.
//! - Every check runs before a result is returned; callers see all errors
//!   from one submission.
//! - On any error no record is built and nothing is stored.

use crate::model::attributes::{self, AttributeKind};
use crate::model::coin::Coin;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// The kind of value a failed field was expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedKind {
    Required,
    Integer,
    Double,
}

impl Display for ExpectedKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Integer => write!(f, "Integer"),
            Self::Double => write!(f, "Double"),
        }
    }
}

/// One validation failure: the offending field and what was expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub expected: ExpectedKind,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid input for {}; {} expected", self.field, self.expected)
    }
}

/// Validates raw text fields and builds a new coin with a fresh identity.
///
/// Field values are trimmed before any check. Unknown keys in `raw` are
/// ignored; missing keys read as empty.
pub fn validate_and_build(raw: &HashMap<String, String>) -> Result<Coin, Vec<FieldError>> {
    let trimmed = |field: &str| raw.get(field).map(|value| value.trim()).unwrap_or("");

    let mut errors = Vec::new();

    if trimmed("name").is_empty() || trimmed("date").is_empty() || trimmed("grade").is_empty() {
        errors.push(FieldError {
            field: "name, date, or grade".to_string(),
            expected: ExpectedKind::Required,
        });
    }

    let mut coin = Coin::new();
    for attr in attributes::attributes() {
        let value = trimmed(attr.name);
        match attr.kind {
            AttributeKind::Text => {
                attr.apply(&mut coin, value);
            }
            AttributeKind::Integer | AttributeKind::Real => {
                if value.is_empty() {
                    continue;
                }
                if !attr.apply(&mut coin, value) {
                    let expected = match attr.kind {
                        AttributeKind::Integer => ExpectedKind::Integer,
                        _ => ExpectedKind::Double,
                    };
                    errors.push(FieldError {
                        field: attr.name.to_string(),
                        expected,
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(coin)
    } else {
        Err(errors)
    }
}
