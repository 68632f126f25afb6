#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Tessera grammar compiler.
//!
//! Compiles a tree-sitter [`Grammar`] into an LALR(1) [`ParseTable`]:
//! - `prepare` - token extraction, rule flattening, symbol numbering
//! - `first` - FIRST sets and nullability
//! - `lalr` - LALR(1) item-set automaton
//! - `resolve` - precedence and associativity conflict resolution, declared
//!   conflicts kept for the parser
//! - `build` - action/goto rows, lex modes, token DFAs

mod build;
mod error;
mod first;
mod lalr;
mod prepare;
mod resolve;
mod tokens;

#[cfg(test)]
mod generate_tests;
#[cfg(test)]
mod lalr_tests;
#[cfg(test)]
mod prepare_tests;
#[cfg(test)]
mod test_grammars;

use tessera_core::Grammar;
use tessera_table::{ParseTable, TableData};

pub use error::GenerateError;

/// Compile a grammar into a validated parse table.
pub fn generate(grammar: &Grammar) -> Result<ParseTable, GenerateError> {
    Ok(ParseTable::new(generate_data(grammar)?)?)
}

/// Compile a grammar into serializable table data.
pub fn generate_data(grammar: &Grammar) -> Result<TableData, GenerateError> {
    let prepared = prepare::prepare(grammar)?;
    let first = first::FirstSets::compute(&prepared);
    let automaton = lalr::build(&prepared, &first)?;
    build::build_table(&prepared, &first, &automaton)
}
