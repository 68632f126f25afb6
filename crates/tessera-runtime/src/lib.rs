#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Incremental, error-tolerant LR parsing runtime for Tessera.
//!
//! A [`Language`] wraps a compiled parse table and an optional external
//! scanner. A [`Parser`] turns text into a [`Tree`]; given the previous tree
//! and the [`Edit`]s that produced the new text it reuses every subtree the
//! edits could not have affected. Syntax errors never fail a parse: they show
//! up as ERROR and MISSING nodes.
//!
//! ```ignore
//! let mut parser = Parser::new(language);
//! let old = parser.parse("let x = 1")?.tree;
//! let edit = Edit::new(8, 9, 10);
//! let new = parser.reparse("let x = 12", &old, &[edit])?.tree;
//! ```

mod language;
mod lexer;
pub mod parser;
mod subtree;
pub mod tree;

#[cfg(test)]
mod test_grammars;

#[cfg(test)]
mod trace_tests;

pub use language::{ExternalScanner, ExternalScannerDef, Language, ScanCursor};
pub use parser::{
    DECISION_WINDOW, Exhausted, FuelLimits, NoopTracer, ParseError, ParseOutcome, ParseStats, Parser,
    PrintTracer, RECOVERY_WINDOW, RecoveryAction, Tracer, Verbosity,
};
pub use tree::{Edit, Node, Tree, TreeCursor};
