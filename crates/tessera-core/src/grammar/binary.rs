//! Compact binary encoding for grammars using postcard.

use super::GrammarError;
use super::types::Grammar;

impl Grammar {
    /// Decode a grammar written by [`Grammar::to_binary`].
    pub fn from_binary(bytes: &[u8]) -> Result<Self, GrammarError> {
        Ok(postcard::from_bytes(bytes)?)
    }

    /// Encode the grammar in postcard format.
    pub fn to_binary(&self) -> Result<Vec<u8>, GrammarError> {
        Ok(postcard::to_allocvec(self)?)
    }
}
