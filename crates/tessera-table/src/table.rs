//! The immutable parse table.
//!
//! [`TableData`] is the plain serializable form. [`ParseTable`] wraps it after
//! validation and owns the deserialized token matchers, so lookups never fail.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tessera_core::{Assoc, FieldId, LexModeId, ProductionId, StateId, Symbol};

use crate::error::TableError;
use crate::matcher::TokenMatcher;

/// Goto entry for (state, nonterminal) pairs without a transition.
pub const NO_STATE: StateId = StateId::MAX;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Error,
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
}

impl Action {
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// End of input.
    End,
    /// Token matched by the built-in lexer.
    Token,
    /// Token produced by the external scanner.
    External,
    NonTerminal,
    /// Hidden helper introduced for repetitions.
    Auxiliary,
    /// Name that only exists as an alias on some production step.
    Alias,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    /// Visible nodes show up in the tree API; hidden ones are flattened.
    pub visible: bool,
    /// Named nodes come from named rules; anonymous ones from string literals.
    pub named: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionInfo {
    pub lhs: Symbol,
    /// Right-hand side symbols, one per child.
    pub rhs: Vec<Symbol>,
    /// Precedence of the final step, used for conflict reporting.
    pub precedence: i32,
    pub assoc: Option<Assoc>,
    /// (child index, field) pairs, sorted by child index.
    pub fields: Vec<(u16, FieldId)>,
    /// (child index, alias symbol) pairs, sorted by child index.
    pub aliases: Vec<(u16, Symbol)>,
}

impl ProductionInfo {
    pub fn child_count(&self) -> usize {
        self.rhs.len()
    }

    pub fn field_at(&self, child: usize) -> Option<FieldId> {
        self.fields
            .iter()
            .find(|&&(i, _)| i as usize == child)
            .map(|&(_, f)| f)
    }

    pub fn alias_at(&self, child: usize) -> Option<Symbol> {
        self.aliases
            .iter()
            .find(|&&(i, _)| i as usize == child)
            .map(|&(_, s)| s)
    }
}

/// Set of tokens the lexer may produce in a given parser state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LexMode {
    /// Internal tokens, ascending by symbol.
    pub tokens: Vec<Symbol>,
    /// External tokens, ascending by symbol.
    pub externals: Vec<Symbol>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenPattern {
    Literal(String),
    /// Regex source (for dumps) and little-endian sparse DFA bytes.
    Regex { source: String, dfa: Vec<u8> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDef {
    pub symbol: Symbol,
    pub priority: i32,
    pub pattern: TokenPattern,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Precedence,
    Associativity,
    /// Shift preferred on equal precedence without associativity.
    DefaultShift,
    /// Earlier production preferred.
    DeclarationOrder,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub state: StateId,
    pub lookahead: Symbol,
    pub kind: ConflictKind,
    pub chosen: Action,
    pub rejected: Action,
    pub resolution: Resolution,
    /// The grammar lists the rules involved as an expected conflict, so the
    /// parser keeps `rejected` as an alternative for this cell.
    pub declared: bool,
}

/// Serializable table contents.
///
/// Symbol layout: `[0, terminal_count)` terminals (END first, externals last,
/// starting at `external_start`), then `nonterminal_count` nonterminals, then
/// alias-only symbols.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub name: String,
    pub symbols: Vec<SymbolInfo>,
    pub terminal_count: u16,
    pub external_start: u16,
    pub nonterminal_count: u16,
    pub state_count: u16,
    /// `state_count * terminal_count`, row-major.
    pub actions: Vec<Action>,
    /// `state_count * nonterminal_count`, row-major, [`NO_STATE`] when absent.
    pub gotos: Vec<StateId>,
    pub productions: Vec<ProductionInfo>,
    /// Index 0 is unused.
    pub field_names: Vec<String>,
    /// The last mode is the error mode.
    pub lex_modes: Vec<LexMode>,
    pub state_lex_modes: Vec<LexModeId>,
    pub tokens: Vec<TokenDef>,
    pub extras: Vec<Symbol>,
    pub start_symbol: Symbol,
    pub conflicts: Vec<ConflictRecord>,
    /// Token whose matches are checked against `keywords`.
    pub word: Option<Symbol>,
    /// Literal tokens the word token also matches, ascending.
    pub keywords: Vec<Symbol>,
}

/// Validated, query-ready parse table.
#[derive(Debug)]
pub struct ParseTable {
    data: TableData,
    matchers: Vec<Option<TokenMatcher>>,
    priorities: Vec<i32>,
    extra: Vec<bool>,
    /// Actions of declared-conflict cells, resolved action first.
    alternatives: HashMap<(StateId, Symbol), Vec<Action>>,
    keywords: HashMap<Box<[u8]>, Symbol>,
}

impl ParseTable {
    pub fn new(data: TableData) -> Result<Self, TableError> {
        validate(&data)?;

        let terminals = data.terminal_count as usize;
        let mut matchers: Vec<Option<TokenMatcher>> = (0..terminals).map(|_| None).collect();
        let mut priorities = vec![0; terminals];
        for token in &data.tokens {
            let matcher = match &token.pattern {
                TokenPattern::Literal(text) => TokenMatcher::literal(text),
                TokenPattern::Regex { dfa, .. } => {
                    TokenMatcher::from_dfa_bytes(dfa).map_err(|message| TableError::Dfa {
                        symbol: data.symbols[token.symbol.index()].name.clone(),
                        message,
                    })?
                }
            };
            matchers[token.symbol.index()] = Some(matcher);
            priorities[token.symbol.index()] = token.priority;
        }

        let mut extra = vec![false; data.symbols.len()];
        for sym in &data.extras {
            extra[sym.index()] = true;
        }

        let mut alternatives: HashMap<(StateId, Symbol), Vec<Action>> = HashMap::new();
        for conflict in data.conflicts.iter().filter(|c| c.declared) {
            let actions = alternatives
                .entry((conflict.state, conflict.lookahead))
                .or_insert_with(|| vec![conflict.chosen]);
            if !actions.contains(&conflict.rejected) {
                actions.push(conflict.rejected);
            }
        }

        let mut keywords = HashMap::new();
        for token in &data.tokens {
            if let TokenPattern::Literal(text) = &token.pattern
                && data.keywords.contains(&token.symbol)
            {
                keywords.insert(text.as_bytes().into(), token.symbol);
            }
        }

        Ok(Self {
            data,
            matchers,
            priorities,
            extra,
            alternatives,
            keywords,
        })
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn into_data(self) -> TableData {
        self.data
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn symbol_count(&self) -> usize {
        self.data.symbols.len()
    }

    pub fn terminal_count(&self) -> usize {
        self.data.terminal_count as usize
    }

    pub fn state_count(&self) -> usize {
        self.data.state_count as usize
    }

    pub fn production_count(&self) -> usize {
        self.data.productions.len()
    }

    pub fn action(&self, state: StateId, symbol: Symbol) -> Action {
        if !self.is_terminal(symbol) || state as usize >= self.state_count() {
            return Action::Error;
        }
        self.data.actions[state as usize * self.terminal_count() + symbol.index()]
    }

    /// Every action allowed in a declared-conflict cell, the resolved one first.
    ///
    /// `None` for cells where [`action`](Self::action) is the only choice.
    pub fn alternatives(&self, state: StateId, symbol: Symbol) -> Option<&[Action]> {
        self.alternatives.get(&(state, symbol)).map(Vec::as_slice)
    }

    /// Terminals with a non-error action in `state`, ascending.
    pub fn valid_terminals(&self, state: StateId) -> impl Iterator<Item = Symbol> + '_ {
        let width = self.terminal_count();
        let row = &self.data.actions[state as usize * width..(state as usize + 1) * width];
        row.iter()
            .enumerate()
            .filter(|(_, a)| !a.is_error())
            .map(|(i, _)| Symbol(i as u16))
    }

    pub fn goto(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        let column = symbol.index().checked_sub(self.terminal_count())?;
        if column >= self.data.nonterminal_count as usize {
            return None;
        }
        let width = self.data.nonterminal_count as usize;
        let target = self.data.gotos[state as usize * width + column];
        (target != NO_STATE).then_some(target)
    }

    pub fn production(&self, id: ProductionId) -> &ProductionInfo {
        &self.data.productions[id as usize]
    }

    pub fn symbol_info(&self, symbol: Symbol) -> Option<&SymbolInfo> {
        self.data.symbols.get(symbol.index())
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        if symbol.is_error() {
            return "ERROR";
        }
        self.symbol_info(symbol).map_or("?", |info| info.name.as_str())
    }

    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        symbol.index() < self.terminal_count()
    }

    pub fn is_external(&self, symbol: Symbol) -> bool {
        self.is_terminal(symbol) && symbol.0 >= self.data.external_start
    }

    pub fn is_visible(&self, symbol: Symbol) -> bool {
        symbol.is_error() || self.symbol_info(symbol).is_some_and(|info| info.visible)
    }

    pub fn is_named(&self, symbol: Symbol) -> bool {
        symbol.is_error() || self.symbol_info(symbol).is_some_and(|info| info.named)
    }

    /// First symbol with this name and namedness, as node kinds are looked up.
    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol> {
        if name == "ERROR" && named {
            return Some(Symbol::ERROR);
        }
        self.data
            .symbols
            .iter()
            .position(|info| info.visible && info.named == named && info.name == name)
            .map(|i| Symbol(i as u16))
    }

    pub fn field_name(&self, id: FieldId) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.data.field_names.get(id as usize).map(String::as_str)
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.data
            .field_names
            .iter()
            .skip(1)
            .position(|f| f == name)
            .map(|i| (i + 1) as FieldId)
    }

    pub fn lex_mode_for_state(&self, state: StateId) -> LexModeId {
        self.data.state_lex_modes[state as usize]
    }

    pub fn lex_mode(&self, id: LexModeId) -> &LexMode {
        &self.data.lex_modes[id as usize]
    }

    /// Mode containing every internal token.
    pub fn error_lex_mode(&self) -> LexModeId {
        (self.data.lex_modes.len() - 1) as LexModeId
    }

    pub fn matcher(&self, symbol: Symbol) -> Option<&TokenMatcher> {
        self.matchers.get(symbol.index())?.as_ref()
    }

    pub fn token_priority(&self, symbol: Symbol) -> i32 {
        self.priorities.get(symbol.index()).copied().unwrap_or(0)
    }

    pub fn is_extra(&self, symbol: Symbol) -> bool {
        self.extra.get(symbol.index()).copied().unwrap_or(false)
    }

    pub fn external_count(&self) -> usize {
        (self.data.terminal_count - self.data.external_start) as usize
    }

    /// Symbol of the `index`th external token.
    pub fn external_symbol(&self, index: usize) -> Option<Symbol> {
        (index < self.external_count()).then(|| Symbol(self.data.external_start + index as u16))
    }

    pub fn external_index(&self, symbol: Symbol) -> Option<usize> {
        self.is_external(symbol)
            .then(|| (symbol.0 - self.data.external_start) as usize)
    }

    pub fn start_symbol(&self) -> Symbol {
        self.data.start_symbol
    }

    pub fn conflicts(&self) -> &[ConflictRecord] {
        &self.data.conflicts
    }

    pub fn word_token(&self) -> Option<Symbol> {
        self.data.word
    }

    /// Keyword spelled exactly `text`.
    pub fn keyword(&self, text: &[u8]) -> Option<Symbol> {
        self.keywords.get(text).copied()
    }
}

fn validate(data: &TableData) -> Result<(), TableError> {
    let inconsistent = |msg: String| Err(TableError::Inconsistent(msg));

    let terminals = data.terminal_count as usize;
    let nonterminals = data.nonterminal_count as usize;
    let states = data.state_count as usize;

    if terminals == 0 || data.symbols.len() < terminals + nonterminals {
        return inconsistent(format!(
            "{} symbols for {terminals} terminals and {nonterminals} nonterminals",
            data.symbols.len()
        ));
    }
    if data.external_start as usize > terminals {
        return inconsistent("external range exceeds terminals".into());
    }
    if states == 0 {
        return inconsistent("no states".into());
    }
    if data.actions.len() != states * terminals {
        return inconsistent(format!(
            "action table has {} entries, expected {}",
            data.actions.len(),
            states * terminals
        ));
    }
    if data.gotos.len() != states * nonterminals {
        return inconsistent(format!(
            "goto table has {} entries, expected {}",
            data.gotos.len(),
            states * nonterminals
        ));
    }
    if data.state_lex_modes.len() != states {
        return inconsistent("state lex mode count differs from state count".into());
    }
    if data.lex_modes.is_empty() {
        return inconsistent("no lex modes".into());
    }
    if data.field_names.is_empty() {
        return inconsistent("missing reserved field slot".into());
    }

    let alternatives = data
        .conflicts
        .iter()
        .filter(|c| c.declared)
        .map(|c| &c.rejected);
    for action in data.actions.iter().chain(alternatives) {
        match *action {
            Action::Shift(s) if s as usize >= states => {
                return inconsistent(format!("shift to unknown state {s}"));
            }
            Action::Reduce(p) if p as usize >= data.productions.len() => {
                return inconsistent(format!("reduce by unknown production {p}"));
            }
            _ => {}
        }
    }
    if let Some(&s) = data
        .gotos
        .iter()
        .find(|&&s| s != NO_STATE && s as usize >= states)
    {
        return inconsistent(format!("goto to unknown state {s}"));
    }
    if let Some(&m) = data
        .state_lex_modes
        .iter()
        .find(|&&m| m as usize >= data.lex_modes.len())
    {
        return inconsistent(format!("unknown lex mode {m}"));
    }

    let is_nonterminal = |s: Symbol| (terminals..terminals + nonterminals).contains(&s.index());
    for (i, prod) in data.productions.iter().enumerate() {
        if !is_nonterminal(prod.lhs) {
            return inconsistent(format!("production {i} has a terminal head"));
        }
        if prod.rhs.iter().any(|s| s.index() >= terminals + nonterminals) {
            return inconsistent(format!("production {i} references an unknown symbol"));
        }
        for &(_, field) in &prod.fields {
            if field == 0 || field as usize >= data.field_names.len() {
                return inconsistent(format!("production {i} references unknown field {field}"));
            }
        }
        for &(_, alias) in &prod.aliases {
            if alias.index() >= data.symbols.len() {
                return inconsistent(format!("production {i} references unknown alias {alias}"));
            }
        }
    }
    if !is_nonterminal(data.start_symbol) {
        return inconsistent("start symbol is not a nonterminal".into());
    }

    for token in &data.tokens {
        let s = token.symbol;
        if s.is_end() || s.index() >= data.external_start as usize {
            return inconsistent(format!("token definition for non-lexical symbol {s}"));
        }
    }
    let is_literal = |s: Symbol| {
        data.tokens
            .iter()
            .any(|t| t.symbol == s && matches!(t.pattern, TokenPattern::Literal(_)))
    };
    if let Some(word) = data.word
        && (word.is_end() || word.index() >= data.external_start as usize)
    {
        return inconsistent(format!("word token {word} is not a lexer token"));
    }
    if let Some(&keyword) = data.keywords.iter().find(|&&s| !is_literal(s)) {
        return inconsistent(format!("keyword {keyword} is not a literal token"));
    }

    for &extra in &data.extras {
        if extra.index() >= terminals {
            return inconsistent(format!("extra {extra} is not a terminal"));
        }
    }
    for mode in &data.lex_modes {
        if mode.tokens.iter().chain(&mode.externals).any(|s| s.index() >= terminals) {
            return inconsistent("lex mode references a nonterminal".into());
        }
    }

    Ok(())
}
