//! Errors that make a parse call fail.
//!
//! Lexical and syntax errors are not here: they are recovered inside the tree
//! as ERROR and MISSING nodes.

use std::fmt;

use crate::tree::Tree;

/// Which progress budget ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exhausted {
    /// Too many parser actions.
    ExecFuel,
    /// Too many created nodes.
    NodeLimit,
}

impl fmt::Display for Exhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecFuel => f.write_str("execution fuel"),
            Self::NodeLimit => f.write_str("node limit"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A budget from [`FuelLimits`](super::FuelLimits) was exceeded.
    /// `partial` holds an ERROR root over everything built so far.
    #[error("parse aborted: {reason} exhausted after {consumed}")]
    BudgetExceeded {
        reason: Exhausted,
        consumed: u64,
        partial: Box<Tree>,
    },

    /// An edit does not fit the tree it was applied to. Nothing was parsed.
    #[error("malformed edit #{index}: {reason}")]
    MalformedEdit { index: usize, reason: String },
}
