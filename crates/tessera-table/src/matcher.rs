//! Token matchers.
//!
//! Literal tokens compare bytes directly. Pattern tokens run an anchored sparse
//! DFA one byte at a time so the lexer learns both the longest match and how far
//! it had to look to decide.

use regex_automata::dfa::Automaton;
use regex_automata::dfa::sparse::DFA;
use regex_automata::{Anchored, Input};

/// Result of running one matcher at one position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scan {
    /// Length of the longest match, if any.
    pub len: Option<usize>,
    /// Bytes inspected from the start position. End of input counts as one byte.
    pub examined: usize,
}

impl Scan {
    pub const NONE: Scan = Scan {
        len: None,
        examined: 0,
    };
}

pub enum TokenMatcher {
    Literal(Box<[u8]>),
    Dfa(DFA<Vec<u8>>),
}

impl std::fmt::Debug for TokenMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(bytes) => write!(f, "Literal({:?})", String::from_utf8_lossy(bytes)),
            Self::Dfa(dfa) => write!(f, "Dfa({} bytes)", dfa.memory_usage()),
        }
    }
}

impl TokenMatcher {
    pub fn literal(text: &str) -> Self {
        Self::Literal(text.as_bytes().into())
    }

    /// Deserialize a sparse DFA written by `DFA::to_bytes_little_endian`.
    pub fn from_dfa_bytes(bytes: &[u8]) -> Result<Self, String> {
        let (dfa, _) = DFA::from_bytes(bytes).map_err(|e| e.to_string())?;
        Ok(Self::Dfa(dfa.to_owned()))
    }

    /// Longest match starting exactly at `start`.
    pub fn scan(&self, text: &[u8], start: usize) -> Scan {
        let rest = &text[start.min(text.len())..];
        match self {
            Self::Literal(literal) => scan_literal(literal, rest),
            Self::Dfa(dfa) => scan_dfa(dfa, text, start.min(text.len())),
        }
    }
}

fn scan_literal(literal: &[u8], rest: &[u8]) -> Scan {
    for (i, &expected) in literal.iter().enumerate() {
        match rest.get(i) {
            None => {
                return Scan {
                    len: None,
                    examined: rest.len() + 1,
                };
            }
            Some(&b) if b != expected => {
                return Scan {
                    len: None,
                    examined: i + 1,
                };
            }
            Some(_) => {}
        }
    }
    Scan {
        len: Some(literal.len()),
        examined: literal.len(),
    }
}

fn scan_dfa(dfa: &DFA<Vec<u8>>, text: &[u8], start: usize) -> Scan {
    let input = Input::new(text).range(start..).anchored(Anchored::Yes);
    let Ok(mut state) = dfa.start_state_forward(&input) else {
        return Scan::NONE;
    };

    let rest = &text[start..];
    let mut last_match = None;
    for (i, &b) in rest.iter().enumerate() {
        state = dfa.next_state(state, b);
        // Matches are reported one byte late: a match state here ends before `b`.
        if dfa.is_match_state(state) {
            last_match = Some(i);
        } else if dfa.is_dead_state(state) || dfa.is_quit_state(state) {
            return Scan {
                len: last_match,
                examined: i + 1,
            };
        }
    }

    state = dfa.next_eoi_state(state);
    if dfa.is_match_state(state) {
        last_match = Some(rest.len());
    }
    Scan {
        len: last_match,
        examined: rest.len() + 1,
    }
}
