#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! The Tessera grammar.
//!
//! `src/grammar.json` is compiled into a parse table at build time and
//! embedded in the library. [`language`] decodes it once per process.
//!
//! ```ignore
//! let mut parser = tessera_runtime::Parser::new(tree_sitter_tessera::language());
//! let tree = parser.parse("fn void main() {}")?.tree;
//! ```

use std::sync::{Arc, LazyLock};

use tessera_runtime::Language;

#[cfg(test)]
mod lib_tests;

/// The grammar this crate was built from, as tree-sitter grammar JSON.
pub const GRAMMAR_JSON: &str = include_str!("grammar.json");

static TABLE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/tessera.tsra"));

static LANGUAGE: LazyLock<Arc<Language>> = LazyLock::new(|| {
    Arc::new(Language::from_bytes(TABLE).expect("embedded tessera table is valid"))
});

/// The Tessera language, shared by every caller.
pub fn language() -> Arc<Language> {
    Arc::clone(&LANGUAGE)
}

/// C entry point returning the Tessera language.
///
/// The pointer stays valid for the life of the process and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn tree_sitter_tessera() -> *const Language {
    Arc::as_ptr(&LANGUAGE)
}
