//! Numeric identifiers shared by parse tables and syntax trees.

use serde::{Deserialize, Serialize};

/// Parser automaton state id.
pub type StateId = u16;

/// Index into the production list of a parse table.
pub type ProductionId = u16;

/// Field id. Field names are stored once per table; id 0 is unused.
pub type FieldId = u16;

/// Index into the lex mode list of a parse table.
pub type LexModeId = u16;

/// Grammar symbol id.
///
/// Terminals occupy the low range starting with [`Symbol::END`], followed by
/// nonterminals. [`Symbol::ERROR`] is reserved for error-marker nodes and never
/// appears in a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub u16);

impl Symbol {
    /// End of input.
    pub const END: Symbol = Symbol(0);

    /// Error-marker node kind.
    pub const ERROR: Symbol = Symbol(u16::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_end(self) -> bool {
        self == Self::END
    }

    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::END => f.write_str("#end"),
            Self::ERROR => f.write_str("#error"),
            Symbol(id) => write!(f, "#{id}"),
        }
    }
}

/// Declared associativity of a precedence level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assoc {
    Left,
    Right,
}
