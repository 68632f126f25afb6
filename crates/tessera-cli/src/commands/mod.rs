pub mod diagnostics;
pub mod parse;
pub mod reparse;
pub mod run_common;
pub mod table;
pub mod trace;

#[cfg(test)]
mod reparse_tests;
#[cfg(test)]
mod test_grammar;
