#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Tessera grammar compiler and runtime.
//!
//! Three layers:
//! - **Grammar layer**: tree-sitter `grammar.json` model ([`grammar`])
//! - **Identifier layer**: symbol, state and production ids used by tables and trees
//! - **Position layer**: byte offsets to row/column points ([`LineIndex`])

pub mod colors;
pub mod grammar;
mod point;
mod symbol;

#[cfg(test)]
mod point_tests;

pub use colors::Colors;
pub use grammar::{Grammar, GrammarError, Precedence, PrecedenceEntry, Rule};
pub use point::{LineIndex, Point};
pub use symbol::{Assoc, FieldId, LexModeId, ProductionId, StateId, Symbol};
