//! Grammar model for tree-sitter grammars.
//!
//! A [`Grammar`] is the source form the table compiler consumes. It is read from
//! tree-sitter's `grammar.json` ([`Grammar::from_json`]), from a compact postcard
//! encoding ([`Grammar::from_binary`]), or assembled in Rust with the [`dsl`]
//! helpers.

mod binary;
pub mod dsl;
mod json;
mod types;

#[cfg(test)]
mod json_tests;

pub use types::{Grammar, Precedence, PrecedenceEntry, Rule};

/// Error while loading a grammar.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary decode error: {0}")]
    Binary(#[from] postcard::Error),
}
