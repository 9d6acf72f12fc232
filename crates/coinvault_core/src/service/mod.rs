//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, store calls and search into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod coin_service;
pub mod validate;
