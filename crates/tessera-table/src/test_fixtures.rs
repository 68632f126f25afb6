//! Hand-built table for `pair -> "a" value:number`.

use regex_automata::MatchKind;
use regex_automata::dfa::{StartKind, dense};

use tessera_core::Symbol;

use crate::table::{
    Action, LexMode, NO_STATE, ProductionInfo, SymbolInfo, SymbolKind, TableData, TokenDef,
    TokenPattern,
};

pub fn dfa_bytes(pattern: &str) -> Vec<u8> {
    let dfa = dense::DFA::builder()
        .configure(
            dense::DFA::config()
                .start_kind(StartKind::Anchored)
                .match_kind(MatchKind::All)
                .minimize(false),
        )
        .build(pattern)
        .unwrap();
    dfa.to_sparse().unwrap().to_bytes_little_endian()
}

fn symbol(name: &str, kind: SymbolKind, visible: bool, named: bool) -> SymbolInfo {
    SymbolInfo {
        name: name.into(),
        kind,
        visible,
        named,
    }
}

pub fn pair_table() -> TableData {
    use Action::*;

    TableData {
        name: "pair".into(),
        symbols: vec![
            symbol("end", SymbolKind::End, false, false),
            symbol("a", SymbolKind::Token, true, false),
            symbol("number", SymbolKind::Token, true, true),
            symbol("pair", SymbolKind::NonTerminal, true, true),
        ],
        terminal_count: 3,
        external_start: 3,
        nonterminal_count: 1,
        state_count: 4,
        #[rustfmt::skip]
        actions: vec![
            Error,     Shift(1), Error,
            Error,     Error,    Shift(2),
            Reduce(0), Error,    Error,
            Accept,    Error,    Error,
        ],
        gotos: vec![3, NO_STATE, NO_STATE, NO_STATE],
        productions: vec![ProductionInfo {
            lhs: Symbol(3),
            rhs: vec![Symbol(1), Symbol(2)],
            precedence: 0,
            assoc: None,
            fields: vec![(1, 1)],
            aliases: vec![],
        }],
        field_names: vec![String::new(), "value".into()],
        lex_modes: vec![
            LexMode {
                tokens: vec![Symbol(1)],
                externals: vec![],
            },
            LexMode {
                tokens: vec![Symbol(2)],
                externals: vec![],
            },
            LexMode::default(),
            LexMode {
                tokens: vec![Symbol(1), Symbol(2)],
                externals: vec![],
            },
        ],
        state_lex_modes: vec![0, 1, 2, 2],
        tokens: vec![
            TokenDef {
                symbol: Symbol(1),
                priority: 0,
                pattern: TokenPattern::Literal("a".into()),
            },
            TokenDef {
                symbol: Symbol(2),
                priority: 0,
                pattern: TokenPattern::Regex {
                    source: "[0-9]+".into(),
                    dfa: dfa_bytes("[0-9]+"),
                },
            },
        ],
        extras: vec![],
        start_symbol: Symbol(3),
        conflicts: vec![],
        word: None,
        keywords: vec![],
    }
}
