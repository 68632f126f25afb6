#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compiled parse table format for Tessera.
//!
//! This crate contains:
//! - The immutable [`ParseTable`] (actions, gotos, symbol metadata, lex modes)
//! - Token matchers backed by serialized sparse DFAs
//! - The versioned binary artifact ([`Header`], [`ParseTable::to_bytes`])
//! - A human-readable [`dump`]
//!
//! Tables are produced by `tessera-generate` and consumed read-only by the runtime.

mod artifact;
pub mod dump;
mod error;
mod matcher;
mod table;

#[cfg(test)]
mod matcher_tests;
#[cfg(test)]
mod test_fixtures;

pub use artifact::{HEADER_SIZE, Header, MAGIC, VERSION};
pub use error::TableError;
pub use matcher::{Scan, TokenMatcher};
pub use table::{
    Action, ConflictKind, ConflictRecord, LexMode, NO_STATE, ParseTable, ProductionInfo,
    Resolution, SymbolInfo, SymbolKind, TableData, TokenDef, TokenPattern,
};
