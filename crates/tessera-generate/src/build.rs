//! Assemble the serializable table from the prepared grammar and automaton.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use tessera_core::{LexModeId, StateId, Symbol};
use tessera_table::{
    Action, LexMode, NO_STATE, ProductionInfo, TableData, TokenDef, TokenMatcher, TokenPattern,
};

use crate::error::GenerateError;
use crate::first::{FirstSets, TokenSet};
use crate::lalr::{Automaton, Item};
use crate::prepare::{LexicalKind, PreparedGrammar};
use crate::resolve::{Cell, resolve};
use crate::tokens::{DfaError, compile_dfa};

pub(crate) fn build_table(
    grammar: &PreparedGrammar,
    first: &FirstSets,
    automaton: &Automaton,
) -> Result<TableData, GenerateError> {
    let terminals = grammar.terminal_count as usize;
    let nonterminals = grammar.nonterminal_count as usize;
    let state_count = automaton.states.len();

    let mut actions = vec![Action::Error; state_count * terminals];
    let mut gotos = vec![NO_STATE; state_count * nonterminals];
    let mut conflicts = Vec::new();

    for (state, items) in automaton.states.iter().enumerate() {
        let transitions = &automaton.transitions[state];
        let mut cells: BTreeMap<Symbol, Cell> = BTreeMap::new();

        for (item, lookahead) in items {
            if item.prod == automaton.augmented {
                if item.dot == 1 {
                    cells.entry(Symbol::END).or_default().accept = true;
                }
                continue;
            }
            let prod = &grammar.productions[item.prod as usize];
            match prod.steps.get(item.dot as usize) {
                Some(step) if grammar.is_terminal(step.symbol) => {
                    let Some(&target) = transitions.get(&step.symbol) else {
                        continue;
                    };
                    let cell = cells.entry(step.symbol).or_default();
                    let prec = match cell.shift {
                        Some((_, prec)) => prec.max(step.precedence),
                        None => step.precedence,
                    };
                    cell.shift = Some((target, prec));
                }
                Some(_) => {}
                None => {
                    for symbol in lookahead.iter() {
                        let reduces = &mut cells.entry(symbol).or_default().reduces;
                        if !reduces.contains(&(item.prod as u16)) {
                            reduces.push(item.prod as u16);
                        }
                    }
                }
            }
        }

        for (symbol, cell) in &cells {
            let contested = cell.reduces.len() + usize::from(cell.shift.is_some()) > 1;
            let declared = contested && {
                let rules = conflicting_rules(grammar, first, automaton, items, *symbol);
                grammar.expected_conflicts.contains(&rules)
            };
            actions[state * terminals + symbol.index()] = resolve(
                state as StateId,
                *symbol,
                cell,
                declared,
                &grammar.productions,
                &mut conflicts,
            );
        }

        for (&symbol, &target) in transitions {
            if !grammar.is_terminal(symbol) {
                gotos[state * nonterminals + grammar.nonterminal_index(symbol)] = target;
            }
        }
    }

    let tokens = token_defs(grammar)?;
    let keywords = keywords(grammar, &tokens)?;
    let (lex_modes, state_lex_modes) = lex_modes(grammar, &actions, &keywords, state_count);

    Ok(TableData {
        name: grammar.name.clone(),
        symbols: grammar.symbols.clone(),
        terminal_count: grammar.terminal_count,
        external_start: grammar.external_start,
        nonterminal_count: grammar.nonterminal_count,
        state_count: state_count as u16,
        actions,
        gotos,
        productions: production_infos(grammar),
        field_names: grammar.field_names.clone(),
        lex_modes,
        state_lex_modes,
        tokens,
        extras: grammar.extras.clone(),
        start_symbol: grammar.start_symbol,
        conflicts,
        word: grammar.word,
        keywords,
    })
}

/// Rules owning an item that completes on `lookahead` or, past its first
/// step, continues with it. Sorted for comparison with declared conflicts.
fn conflicting_rules(
    grammar: &PreparedGrammar,
    first: &FirstSets,
    automaton: &Automaton,
    items: &[(Item, TokenSet)],
    lookahead: Symbol,
) -> Vec<Symbol> {
    let mut rules = Vec::new();
    for (item, item_lookahead) in items {
        if item.prod == automaton.augmented {
            continue;
        }
        let prod = &grammar.productions[item.prod as usize];
        let involved = match prod.steps.get(item.dot as usize) {
            None => item_lookahead.contains(lookahead),
            Some(step) => item.dot > 0 && first.starts_with(step.symbol, lookahead),
        };
        if involved {
            rules.push(grammar.rule_owner(prod.lhs));
        }
    }
    rules.sort();
    rules.dedup();
    rules
}

/// Literal tokens spelled entirely by the word token.
fn keywords(grammar: &PreparedGrammar, tokens: &[TokenDef]) -> Result<Vec<Symbol>, GenerateError> {
    let Some(word) = grammar.word else {
        return Ok(Vec::new());
    };
    let Some(TokenPattern::Regex { source, dfa }) = tokens
        .iter()
        .find(|t| t.symbol == word)
        .map(|t| &t.pattern)
    else {
        return Ok(Vec::new());
    };
    let matcher = TokenMatcher::from_dfa_bytes(dfa).map_err(|message| {
        GenerateError::InvalidPattern {
            rule: grammar.symbols[word.index()].name.clone(),
            pattern: source.clone(),
            message,
        }
    })?;

    Ok(tokens
        .iter()
        .filter_map(|token| match &token.pattern {
            TokenPattern::Literal(text)
                if matcher.scan(text.as_bytes(), 0).len == Some(text.len()) =>
            {
                Some(token.symbol)
            }
            _ => None,
        })
        .collect())
}

fn production_infos(grammar: &PreparedGrammar) -> Vec<ProductionInfo> {
    grammar
        .productions
        .iter()
        .map(|prod| {
            let indexed = prod.steps.iter().enumerate();
            ProductionInfo {
                lhs: prod.lhs,
                rhs: prod.steps.iter().map(|s| s.symbol).collect(),
                precedence: prod.precedence(),
                assoc: prod.assoc(),
                fields: indexed
                    .clone()
                    .filter_map(|(i, s)| s.field.map(|f| (i as u16, f)))
                    .collect(),
                aliases: indexed
                    .filter_map(|(i, s)| s.alias.map(|a| (i as u16, a)))
                    .collect(),
            }
        })
        .collect()
}

/// Per state: valid tokens plus extras, and the word token wherever a keyword
/// is valid. The last mode holds every token.
fn lex_modes(
    grammar: &PreparedGrammar,
    actions: &[Action],
    keywords: &[Symbol],
    state_count: usize,
) -> (Vec<LexMode>, Vec<LexModeId>) {
    let terminals = grammar.terminal_count as usize;
    let external_start = grammar.external_start as usize;

    let mut extras = TokenSet::new(terminals);
    for &extra in &grammar.extras {
        extras.insert(extra);
    }

    let mut modes: IndexMap<LexMode, LexModeId> = IndexMap::new();
    let mut state_modes = Vec::with_capacity(state_count);
    for state in 0..state_count {
        let row = &actions[state * terminals..(state + 1) * terminals];
        let mut mode = LexMode::default();
        for (index, action) in row.iter().enumerate().skip(1) {
            let symbol = Symbol(index as u16);
            if action.is_error() && !extras.contains(symbol) {
                continue;
            }
            if index < external_start {
                mode.tokens.push(symbol);
            } else {
                mode.externals.push(symbol);
            }
        }
        if let Some(word) = grammar.word
            && mode.tokens.iter().any(|s| keywords.contains(s))
            && !mode.tokens.contains(&word)
        {
            mode.tokens.push(word);
            mode.tokens.sort();
        }
        let next = modes.len() as LexModeId;
        state_modes.push(*modes.entry(mode).or_insert(next));
    }

    let mut modes: Vec<LexMode> = modes.into_keys().collect();
    modes.push(LexMode {
        tokens: (1..external_start).map(|i| Symbol(i as u16)).collect(),
        externals: (external_start..terminals).map(|i| Symbol(i as u16)).collect(),
    });
    (modes, state_modes)
}

fn token_defs(grammar: &PreparedGrammar) -> Result<Vec<TokenDef>, GenerateError> {
    grammar
        .tokens
        .iter()
        .map(|token| {
            let name = &grammar.symbols[token.symbol.index()].name;
            let pattern = match &token.kind {
                LexicalKind::Literal(text) if text.is_empty() => {
                    return Err(GenerateError::EmptyToken { name: name.clone() });
                }
                LexicalKind::Literal(text) => TokenPattern::Literal(text.clone()),
                LexicalKind::Regex(regex) => match compile_dfa(regex) {
                    Ok(dfa) => TokenPattern::Regex {
                        source: regex.clone(),
                        dfa,
                    },
                    Err(DfaError::MatchesEmpty) => {
                        return Err(GenerateError::EmptyToken { name: name.clone() });
                    }
                    Err(DfaError::Build(message)) => {
                        return Err(GenerateError::InvalidPattern {
                            rule: name.clone(),
                            pattern: regex.clone(),
                            message,
                        });
                    }
                },
            };
            Ok(TokenDef {
                symbol: token.symbol,
                priority: token.priority,
                pattern,
            })
        })
        .collect()
}
