//! Rust counterparts of the tree-sitter grammar DSL.
//!
//! ```
//! use tessera_core::grammar::dsl::*;
//! use tessera_core::Grammar;
//!
//! let grammar = Grammar::new("let")
//!     .rule("let_decl", seq([string("let"), field("name", sym("identifier"))]))
//!     .rule("identifier", pattern("[a-z]+"));
//! assert_eq!(grammar.start_rule(), Some("let_decl"));
//! ```

use super::types::{Precedence, Rule};

pub fn blank() -> Rule {
    Rule::Blank
}

pub fn string(value: impl Into<String>) -> Rule {
    Rule::String(value.into())
}

pub fn pattern(value: impl Into<String>) -> Rule {
    Rule::Pattern {
        value: value.into(),
        flags: None,
    }
}

pub fn sym(name: impl Into<String>) -> Rule {
    Rule::Symbol(name.into())
}

pub fn seq(members: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Seq(members.into_iter().collect())
}

pub fn choice(members: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Choice(members.into_iter().collect())
}

/// `choice(rule, blank)`, as tree-sitter writes `optional`.
pub fn optional(rule: Rule) -> Rule {
    Rule::Choice(vec![rule, Rule::Blank])
}

pub fn repeat(rule: Rule) -> Rule {
    Rule::Repeat(Box::new(rule))
}

pub fn repeat1(rule: Rule) -> Rule {
    Rule::Repeat1(Box::new(rule))
}

pub fn field(name: impl Into<String>, rule: Rule) -> Rule {
    Rule::Field {
        name: name.into(),
        content: Box::new(rule),
    }
}

pub fn alias(rule: Rule, value: impl Into<String>, named: bool) -> Rule {
    Rule::Alias {
        content: Box::new(rule),
        value: value.into(),
        named,
    }
}

pub fn token(rule: Rule) -> Rule {
    Rule::Token(Box::new(rule))
}

pub fn immediate_token(rule: Rule) -> Rule {
    Rule::ImmediateToken(Box::new(rule))
}

pub fn prec(value: i32, rule: Rule) -> Rule {
    Rule::Prec {
        value: Precedence::Integer(value),
        content: Box::new(rule),
    }
}

pub fn prec_left(value: i32, rule: Rule) -> Rule {
    Rule::PrecLeft {
        value: Precedence::Integer(value),
        content: Box::new(rule),
    }
}

pub fn prec_right(value: i32, rule: Rule) -> Rule {
    Rule::PrecRight {
        value: Precedence::Integer(value),
        content: Box::new(rule),
    }
}

pub fn prec_dynamic(value: i32, rule: Rule) -> Rule {
    Rule::PrecDynamic {
        value,
        content: Box::new(rule),
    }
}

/// `seq(rule, repeat(seq(separator, rule)))`.
pub fn sep_by1(separator: Rule, rule: Rule) -> Rule {
    seq([rule.clone(), repeat(seq([separator, rule]))])
}
