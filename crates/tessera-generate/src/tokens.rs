//! Token rules to regexes, and regexes to serialized DFAs.

use regex_automata::dfa::{Automaton, StartKind, dense};
use regex_automata::{Anchored, Input, MatchKind};

use tessera_core::{Precedence, Rule};

use crate::error::GenerateError;

/// Regex for a `/pattern/flags` rule.
pub(crate) fn pattern_regex(value: &str, flags: Option<&str>) -> String {
    if flags.is_some_and(|f| f.contains('i')) {
        format!("(?i:{value})")
    } else {
        format!("(?:{value})")
    }
}

/// Regex for the body of a `token(...)` rule.
pub(crate) fn token_regex(rule: &Rule, rule_name: &str) -> Result<String, GenerateError> {
    let unsupported = |construct: &str| GenerateError::Unsupported {
        rule: rule_name.to_string(),
        construct: construct.to_string(),
    };

    Ok(match rule {
        Rule::Blank => String::new(),
        Rule::String(s) => regex_syntax::escape(s),
        Rule::Pattern { value, flags } => pattern_regex(value, flags.as_deref()),
        Rule::Seq(members) => members
            .iter()
            .map(|m| token_regex(m, rule_name).map(|r| format!("(?:{r})")))
            .collect::<Result<String, _>>()?,
        Rule::Choice(members) => {
            let alternatives = members
                .iter()
                .map(|m| token_regex(m, rule_name))
                .collect::<Result<Vec<_>, _>>()?;
            format!("(?:{})", alternatives.join("|"))
        }
        Rule::Repeat(inner) => format!("(?:{})*", token_regex(inner, rule_name)?),
        Rule::Repeat1(inner) => format!("(?:{})+", token_regex(inner, rule_name)?),
        Rule::Token(inner)
        | Rule::ImmediateToken(inner)
        | Rule::Prec { content: inner, .. }
        | Rule::PrecLeft { content: inner, .. }
        | Rule::PrecRight { content: inner, .. }
        | Rule::PrecDynamic { content: inner, .. }
        | Rule::Reserved { content: inner, .. } => token_regex(inner, rule_name)?,
        Rule::Symbol(_) => return Err(unsupported("symbol inside token()")),
        Rule::Field { .. } => return Err(unsupported("field inside token()")),
        Rule::Alias { .. } => return Err(unsupported("alias inside token()")),
    })
}

/// Lexical priority: the integer precedence directly inside a token rule.
pub(crate) fn token_priority(rule: &Rule) -> i32 {
    match rule {
        Rule::Token(inner) | Rule::ImmediateToken(inner) => token_priority(inner),
        Rule::Prec {
            value: Precedence::Integer(n),
            ..
        }
        | Rule::PrecLeft {
            value: Precedence::Integer(n),
            ..
        }
        | Rule::PrecRight {
            value: Precedence::Integer(n),
            ..
        } => *n,
        _ => 0,
    }
}

/// The literal a token rule reduces to, if it is a plain string.
pub(crate) fn literal_text(rule: &Rule) -> Option<&str> {
    match rule {
        Rule::String(s) => Some(s),
        Rule::Token(inner)
        | Rule::ImmediateToken(inner)
        | Rule::Prec { content: inner, .. }
        | Rule::PrecLeft { content: inner, .. }
        | Rule::PrecRight { content: inner, .. }
        | Rule::PrecDynamic { content: inner, .. } => literal_text(inner),
        _ => None,
    }
}

pub(crate) enum DfaError {
    Build(String),
    MatchesEmpty,
}

/// Compile a regex to little-endian sparse DFA bytes.
///
/// The DFA is anchored and reports every match so the lexer can pick the longest.
pub(crate) fn compile_dfa(regex: &str) -> Result<Vec<u8>, DfaError> {
    let dense = dense::DFA::builder()
        .configure(
            dense::DFA::config()
                .start_kind(StartKind::Anchored)
                .match_kind(MatchKind::All)
                .minimize(false),
        )
        .build(regex)
        .map_err(|e| DfaError::Build(e.to_string()))?;

    let sparse = dense
        .to_sparse()
        .map_err(|e| DfaError::Build(e.to_string()))?;
    if matches_empty(&sparse) {
        return Err(DfaError::MatchesEmpty);
    }
    Ok(sparse.to_bytes_little_endian())
}

fn matches_empty<A: Automaton>(dfa: &A) -> bool {
    let input = Input::new("").anchored(Anchored::Yes);
    dfa.start_state_forward(&input)
        .map(|start| dfa.is_match_state(dfa.next_eoi_state(start)))
        .unwrap_or(false)
}
