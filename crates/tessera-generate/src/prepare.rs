//! Grammar preparation.
//!
//! Turns the rule algebra into a flat symbol table and a list of productions:
//! - lexical rules and inline strings/patterns become tokens
//! - choices and optionals expand into separate productions
//! - repetitions become hidden left-recursive auxiliary symbols
//! - inline rules are substituted at their use sites
//! - field, precedence, associativity and alias are recorded per step
//!
//! Symbol numbering: END, literal tokens, pattern tokens, externals, then
//! nonterminals in rule order, auxiliaries, and alias-only symbols.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use tessera_core::{Assoc, FieldId, Grammar, Precedence, Rule, Symbol};
use tessera_table::{SymbolInfo, SymbolKind};

use crate::error::GenerateError;
use crate::tokens::{literal_text, token_priority, token_regex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LexicalKind {
    Literal(String),
    Regex(String),
}

#[derive(Clone, Debug)]
pub(crate) struct LexicalToken {
    pub symbol: Symbol,
    pub priority: i32,
    pub kind: LexicalKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub symbol: Symbol,
    pub precedence: i32,
    pub assoc: Option<Assoc>,
    pub field: Option<FieldId>,
    pub alias: Option<Symbol>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Production {
    pub lhs: Symbol,
    pub steps: Vec<Step>,
}

impl Production {
    /// Precedence of the last step; reductions are compared by it.
    pub fn precedence(&self) -> i32 {
        self.steps.last().map_or(0, |s| s.precedence)
    }

    pub fn assoc(&self) -> Option<Assoc> {
        self.steps.last().and_then(|s| s.assoc)
    }
}

#[derive(Debug)]
pub(crate) struct PreparedGrammar {
    pub name: String,
    pub symbols: Vec<SymbolInfo>,
    pub terminal_count: u16,
    pub external_start: u16,
    pub nonterminal_count: u16,
    /// Internal tokens in symbol order.
    pub tokens: Vec<LexicalToken>,
    pub productions: Vec<Production>,
    /// Index 0 is unused.
    pub field_names: Vec<String>,
    pub extras: Vec<Symbol>,
    pub start_symbol: Symbol,
    /// Per nonterminal, the grammar rule it was lowered from.
    pub rule_owners: Vec<Symbol>,
    /// Rule sets listed in the grammar's `conflicts`, each sorted.
    pub expected_conflicts: Vec<Vec<Symbol>>,
    pub word: Option<Symbol>,
}

impl PreparedGrammar {
    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        symbol.index() < self.terminal_count as usize
    }

    /// Column of a nonterminal in goto rows.
    pub fn nonterminal_index(&self, symbol: Symbol) -> usize {
        symbol.index() - self.terminal_count as usize
    }

    /// Repetition helpers belong to the rule that introduced them.
    pub fn rule_owner(&self, symbol: Symbol) -> Symbol {
        self.rule_owners[self.nonterminal_index(symbol)]
    }
}

pub(crate) fn prepare(grammar: &Grammar) -> Result<PreparedGrammar, GenerateError> {
    let Some((start_name, _)) = grammar.rules.first() else {
        return Err(GenerateError::EmptyGrammar);
    };

    let mut preparer = Preparer::new(grammar);
    if preparer.lexical.contains(start_name.as_str()) {
        return Err(GenerateError::LexicalStartRule(start_name.clone()));
    }
    if preparer.inline.contains(start_name.as_str()) {
        return Err(GenerateError::Unsupported {
            rule: start_name.clone(),
            construct: "inlining the start rule".into(),
        });
    }

    preparer.walk_extras()?;
    preparer.walk_rules()?;
    let word = match &grammar.word {
        Some(name) => Some(preparer.word_token(name)?),
        None => None,
    };
    preparer.finish(word)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum SymRef {
    Token(usize),
    External(usize),
    Var(usize),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct StepCtx {
    precedence: i32,
    assoc: Option<Assoc>,
    field: Option<String>,
    alias: Option<(String, bool)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RawStep {
    sym: SymRef,
    ctx: StepCtx,
}

type Alternatives = Vec<Vec<RawStep>>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum TokenKey {
    /// Named lexical rule.
    Named(String),
    /// Anonymous string token.
    Literal(String),
    /// Anonymous regex token, keyed by its regex.
    Anonymous(String),
}

#[derive(Debug)]
struct TokenEntry {
    name: String,
    visible: bool,
    named: bool,
    priority: i32,
    kind: LexicalKind,
}

#[derive(Debug)]
struct ExternalEntry {
    name: String,
    visible: bool,
    named: bool,
}

#[derive(Debug)]
struct Var {
    name: String,
    kind: SymbolKind,
    visible: bool,
    /// Index of the rule variable this one was created for.
    owner: usize,
    alternatives: Alternatives,
}

struct Preparer<'g> {
    grammar: &'g Grammar,
    /// Rules compiled to a single token.
    lexical: HashSet<&'g str>,
    inline: HashSet<&'g str>,
    tokens: IndexMap<TokenKey, TokenEntry>,
    externals: Vec<ExternalEntry>,
    external_names: HashMap<String, usize>,
    vars: Vec<Var>,
    var_index: HashMap<&'g str, usize>,
    /// Repetitions already turned into auxiliaries.
    repeats: Vec<(&'g Rule, StepCtx, usize)>,
    inlining: Vec<&'g str>,
    extras: Vec<SymRef>,
    current_rule: &'g str,
    aux_count: usize,
}

impl<'g> Preparer<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let anonymous = anonymous_literals(grammar);
        let lexical: HashSet<&str> = grammar
            .rules
            .iter()
            .filter(|(_, body)| match body {
                Rule::String(s) => !anonymous.contains(s.as_str()),
                body => is_lexical(body),
            })
            .map(|(name, _)| name.as_str())
            .collect();
        let inline: HashSet<&str> = grammar
            .inline
            .iter()
            .map(String::as_str)
            .filter(|name| grammar.get(name).is_some())
            .collect();

        let mut externals = Vec::new();
        let mut external_names = HashMap::new();
        for rule in &grammar.externals {
            let (name, named) = match rule {
                Rule::Symbol(name) => (name.clone(), true),
                Rule::String(s) => (s.clone(), false),
                _ => continue,
            };
            external_names.insert(name.clone(), externals.len());
            externals.push(ExternalEntry {
                visible: !named || !name.starts_with('_'),
                named,
                name,
            });
        }

        let mut vars = Vec::new();
        let mut var_index = HashMap::new();
        for (name, _) in &grammar.rules {
            if lexical.contains(name.as_str()) || inline.contains(name.as_str()) {
                continue;
            }
            var_index.insert(name.as_str(), vars.len());
            vars.push(Var {
                name: name.clone(),
                kind: SymbolKind::NonTerminal,
                visible: !name.starts_with('_'),
                owner: vars.len(),
                alternatives: Vec::new(),
            });
        }

        Self {
            grammar,
            lexical,
            inline,
            tokens: IndexMap::new(),
            externals,
            external_names,
            vars,
            var_index,
            repeats: Vec::new(),
            inlining: Vec::new(),
            extras: Vec::new(),
            current_rule: "",
            aux_count: 0,
        }
    }

    fn walk_extras(&mut self) -> Result<(), GenerateError> {
        let grammar = self.grammar;
        self.current_rule = "extras";
        for rule in &grammar.extras {
            let sym = match rule {
                Rule::String(s) => self.literal_token(s, 0),
                Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_) => {
                    self.anonymous_token(rule)?
                }
                Rule::Symbol(name) => self.resolve_symbol(name)?,
                _ => return Err(self.unsupported("non-token extra")),
            };
            if matches!(sym, SymRef::Var(_)) {
                return Err(self.unsupported("nonterminal extra"));
            }
            if !self.extras.contains(&sym) {
                self.extras.push(sym);
            }
        }
        Ok(())
    }

    fn walk_rules(&mut self) -> Result<(), GenerateError> {
        let grammar = self.grammar;
        for (name, body) in &grammar.rules {
            let Some(&var) = self.var_index.get(name.as_str()) else {
                continue;
            };
            self.current_rule = name;
            self.aux_count = 0;
            let alternatives = self.flatten(body, &StepCtx::default())?;
            self.vars[var].alternatives = alternatives;
        }
        Ok(())
    }

    fn unsupported(&self, construct: &str) -> GenerateError {
        GenerateError::Unsupported {
            rule: self.current_rule.to_string(),
            construct: construct.to_string(),
        }
    }

    fn flatten(&mut self, rule: &'g Rule, ctx: &StepCtx) -> Result<Alternatives, GenerateError> {
        let single = |sym: SymRef| {
            vec![vec![RawStep {
                sym,
                ctx: ctx.clone(),
            }]]
        };

        Ok(match rule {
            Rule::Blank => vec![vec![]],
            Rule::String(s) => single(self.literal_token(s, 0)),
            Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_) => {
                single(self.anonymous_token(rule)?)
            }
            Rule::Symbol(name) if self.inline.contains(name.as_str()) => {
                if self.inlining.contains(&name.as_str()) {
                    return Err(self.unsupported("recursive inline rule"));
                }
                let Some(body) = self.grammar.get(name) else {
                    return Err(GenerateError::UndefinedSymbol {
                        rule: self.current_rule.to_string(),
                        name: name.clone(),
                    });
                };
                self.inlining.push(name.as_str());
                let result = self.flatten(body, ctx);
                self.inlining.pop();
                result?
            }
            Rule::Symbol(name) => single(self.resolve_symbol(name)?),
            Rule::Seq(members) => {
                let mut result: Alternatives = vec![vec![]];
                for member in members {
                    let tails = self.flatten(member, ctx)?;
                    result = result
                        .iter()
                        .flat_map(|head| {
                            tails.iter().map(move |tail| {
                                let mut alt = head.clone();
                                alt.extend(tail.iter().cloned());
                                alt
                            })
                        })
                        .collect();
                }
                result
            }
            Rule::Choice(members) => {
                let mut result = Vec::new();
                for member in members {
                    result.extend(self.flatten(member, ctx)?);
                }
                result
            }
            Rule::Repeat1(inner) => single(self.repeat_aux(inner, ctx)?),
            Rule::Repeat(inner) => {
                let aux = self.repeat_aux(inner, ctx)?;
                let mut alternatives = single(aux);
                alternatives.push(vec![]);
                alternatives
            }
            Rule::Field { name, content } => {
                let ctx = StepCtx {
                    field: Some(name.clone()),
                    ..ctx.clone()
                };
                self.flatten(content, &ctx)?
            }
            Rule::Alias {
                content,
                value,
                named,
            } => {
                let ctx = StepCtx {
                    alias: Some((value.clone(), *named)),
                    ..ctx.clone()
                };
                self.flatten(content, &ctx)?
            }
            Rule::Prec { value, content } => {
                let ctx = StepCtx {
                    precedence: self.precedence(value)?,
                    ..ctx.clone()
                };
                self.flatten(content, &ctx)?
            }
            Rule::PrecLeft { value, content } | Rule::PrecRight { value, content } => {
                let assoc = if matches!(rule, Rule::PrecLeft { .. }) {
                    Assoc::Left
                } else {
                    Assoc::Right
                };
                let ctx = StepCtx {
                    precedence: self.precedence(value)?,
                    assoc: Some(assoc),
                    ..ctx.clone()
                };
                self.flatten(content, &ctx)?
            }
            Rule::PrecDynamic { content, .. } | Rule::Reserved { content, .. } => {
                self.flatten(content, ctx)?
            }
        })
    }

    fn precedence(&self, value: &Precedence) -> Result<i32, GenerateError> {
        match value {
            Precedence::Integer(n) => Ok(*n),
            Precedence::Name(_) => Err(self.unsupported("named precedence")),
        }
    }

    /// Hidden `A -> A x | x` for `repeat1(x)`.
    fn repeat_aux(&mut self, inner: &'g Rule, ctx: &StepCtx) -> Result<SymRef, GenerateError> {
        let inner_ctx = StepCtx {
            alias: None,
            ..ctx.clone()
        };
        if let Some(&(_, _, var)) = self
            .repeats
            .iter()
            .find(|(rule, c, _)| *rule == inner && *c == inner_ctx)
        {
            return Ok(SymRef::Var(var));
        }

        self.aux_count += 1;
        let var = self.vars.len();
        self.vars.push(Var {
            name: format!("{}_repeat{}", self.current_rule, self.aux_count),
            kind: SymbolKind::Auxiliary,
            visible: false,
            owner: self.var_index.get(self.current_rule).copied().unwrap_or(var),
            alternatives: Vec::new(),
        });
        self.repeats.push((inner, inner_ctx.clone(), var));

        let body = self.flatten(inner, &inner_ctx)?;
        let head = RawStep {
            sym: SymRef::Var(var),
            ctx: StepCtx {
                precedence: ctx.precedence,
                assoc: ctx.assoc,
                field: None,
                alias: None,
            },
        };
        let mut alternatives = Vec::new();
        for alt in &body {
            // `A -> A` would let the parser reduce forever.
            if !alt.is_empty() {
                let mut recursive = vec![head.clone()];
                recursive.extend(alt.iter().cloned());
                alternatives.push(recursive);
            }
        }
        alternatives.extend(body);
        self.vars[var].alternatives = alternatives;
        Ok(SymRef::Var(var))
    }

    fn resolve_symbol(&mut self, name: &str) -> Result<SymRef, GenerateError> {
        if let Some(&index) = self.external_names.get(name) {
            return Ok(SymRef::External(index));
        }
        if let Some(&var) = self.var_index.get(name) {
            return Ok(SymRef::Var(var));
        }
        if self.lexical.contains(name) {
            return self.named_token(name);
        }
        Err(GenerateError::UndefinedSymbol {
            rule: self.current_rule.to_string(),
            name: name.to_string(),
        })
    }

    fn word_token(&mut self, name: &str) -> Result<SymRef, GenerateError> {
        self.current_rule = "word";
        match self.resolve_symbol(name)? {
            sym @ SymRef::Token(_) => Ok(sym),
            _ => Err(self.unsupported("non-token word rule")),
        }
    }

    fn named_token(&mut self, name: &str) -> Result<SymRef, GenerateError> {
        let key = TokenKey::Named(name.to_string());
        if let Some(index) = self.tokens.get_index_of(&key) {
            return Ok(SymRef::Token(index));
        }

        let Some(body) = self.grammar.get(name) else {
            return Err(GenerateError::UndefinedSymbol {
                rule: self.current_rule.to_string(),
                name: name.to_string(),
            });
        };
        let body = strip_precedence(body);
        let kind = match literal_text(body) {
            Some(text) => LexicalKind::Literal(text.to_string()),
            None => LexicalKind::Regex(token_regex(body, name)?),
        };
        let entry = TokenEntry {
            name: name.to_string(),
            visible: !name.starts_with('_'),
            named: true,
            priority: token_priority(body),
            kind,
        };
        let (index, _) = self.tokens.insert_full(key, entry);
        Ok(SymRef::Token(index))
    }

    fn literal_token(&mut self, text: &str, priority: i32) -> SymRef {
        let key = TokenKey::Literal(text.to_string());
        let index = match self.tokens.get_index_of(&key) {
            Some(index) => index,
            None => {
                let entry = TokenEntry {
                    name: text.to_string(),
                    visible: true,
                    named: false,
                    priority,
                    kind: LexicalKind::Literal(text.to_string()),
                };
                self.tokens.insert_full(key, entry).0
            }
        };
        SymRef::Token(index)
    }

    /// Inline pattern or `token(...)`.
    fn anonymous_token(&mut self, rule: &Rule) -> Result<SymRef, GenerateError> {
        let priority = token_priority(rule);
        if let Some(text) = literal_text(rule) {
            return Ok(self.literal_token(text, priority));
        }

        let regex = token_regex(rule, self.current_rule)?;
        let key = TokenKey::Anonymous(regex.clone());
        let index = match self.tokens.get_index_of(&key) {
            Some(index) => index,
            None => {
                let name = match rule {
                    Rule::Pattern { value, .. } => value.clone(),
                    _ => regex.clone(),
                };
                let entry = TokenEntry {
                    name,
                    visible: false,
                    named: false,
                    priority,
                    kind: LexicalKind::Regex(regex),
                };
                self.tokens.insert_full(key, entry).0
            }
        };
        Ok(SymRef::Token(index))
    }

    /// Assign symbol ids and lower raw steps.
    fn finish(self, word: Option<SymRef>) -> Result<PreparedGrammar, GenerateError> {
        let mut symbols = vec![SymbolInfo {
            name: "end".into(),
            kind: SymbolKind::End,
            visible: false,
            named: false,
        }];

        // Literals first, then patterns, each in encounter order.
        let mut token_symbols = vec![Symbol::END; self.tokens.len()];
        let mut tokens = Vec::with_capacity(self.tokens.len());
        let literal_first = self
            .tokens
            .values()
            .enumerate()
            .filter(|(_, t)| matches!(t.kind, LexicalKind::Literal(_)))
            .chain(
                self.tokens
                    .values()
                    .enumerate()
                    .filter(|(_, t)| matches!(t.kind, LexicalKind::Regex(_))),
            );
        for (index, entry) in literal_first {
            let symbol = Symbol(symbols.len() as u16);
            token_symbols[index] = symbol;
            symbols.push(SymbolInfo {
                name: entry.name.clone(),
                kind: SymbolKind::Token,
                visible: entry.visible,
                named: entry.named,
            });
            tokens.push(LexicalToken {
                symbol,
                priority: entry.priority,
                kind: entry.kind.clone(),
            });
        }

        let external_start = symbols.len();
        for entry in &self.externals {
            symbols.push(SymbolInfo {
                name: entry.name.clone(),
                kind: SymbolKind::External,
                visible: entry.visible,
                named: entry.named,
            });
        }
        let terminal_count = symbols.len();

        for var in &self.vars {
            symbols.push(SymbolInfo {
                name: var.name.clone(),
                kind: var.kind,
                visible: var.visible,
                named: var.kind == SymbolKind::NonTerminal,
            });
        }
        let nonterminal_count = self.vars.len();

        let lower = |sym: SymRef| match sym {
            SymRef::Token(i) => token_symbols[i],
            SymRef::External(i) => Symbol((external_start + i) as u16),
            SymRef::Var(i) => Symbol((terminal_count + i) as u16),
        };

        let mut field_names: Vec<String> = self
            .vars
            .iter()
            .flat_map(|v| v.alternatives.iter().flatten())
            .filter_map(|step| step.ctx.field.clone())
            .collect();
        field_names.sort();
        field_names.dedup();
        field_names.insert(0, String::new());
        let field_id = |name: &str| {
            field_names
                .iter()
                .position(|f| f == name)
                .map(|i| i as FieldId)
        };

        let mut alias_symbols: HashMap<(String, bool), Symbol> = HashMap::new();
        let mut productions = Vec::new();
        for (var_index, var) in self.vars.iter().enumerate() {
            let lhs = Symbol((terminal_count + var_index) as u16);
            let mut seen: Vec<&Vec<RawStep>> = Vec::new();
            for alt in &var.alternatives {
                if seen.contains(&alt) {
                    continue;
                }
                seen.push(alt);

                let mut steps = Vec::with_capacity(alt.len());
                for raw in alt {
                    let alias = match &raw.ctx.alias {
                        Some(key) => Some(match alias_symbols.get(key) {
                            Some(&symbol) => symbol,
                            None => {
                                let symbol = alias_symbol(&mut symbols, &key.0, key.1);
                                alias_symbols.insert(key.clone(), symbol);
                                symbol
                            }
                        }),
                        None => None,
                    };
                    steps.push(Step {
                        symbol: lower(raw.sym),
                        precedence: raw.ctx.precedence,
                        assoc: raw.ctx.assoc,
                        field: raw.ctx.field.as_deref().and_then(field_id),
                        alias,
                    });
                }
                productions.push(Production { lhs, steps });
            }
        }

        if symbols.len() >= u16::MAX as usize {
            return Err(GenerateError::TooManySymbols(symbols.len()));
        }

        let extras = self.extras.iter().map(|&s| lower(s)).collect();
        let rule_owners = self.vars.iter().map(|v| lower(SymRef::Var(v.owner))).collect();
        let expected_conflicts = self.expected_conflicts(&lower)?;

        Ok(PreparedGrammar {
            name: self.grammar.name.clone(),
            symbols,
            terminal_count: terminal_count as u16,
            external_start: external_start as u16,
            nonterminal_count: nonterminal_count as u16,
            tokens,
            productions,
            field_names,
            extras,
            start_symbol: Symbol(terminal_count as u16),
            rule_owners,
            expected_conflicts,
            word: word.map(lower),
        })
    }

    /// Lower the grammar's `conflicts`. Tokens and inline rules never own an
    /// item, so they drop out of each set.
    fn expected_conflicts(
        &self,
        lower: &impl Fn(SymRef) -> Symbol,
    ) -> Result<Vec<Vec<Symbol>>, GenerateError> {
        let mut sets = Vec::new();
        for names in &self.grammar.conflicts {
            let mut set = Vec::with_capacity(names.len());
            for name in names {
                if let Some(&var) = self.var_index.get(name.as_str()) {
                    set.push(lower(SymRef::Var(var)));
                } else if !self.lexical.contains(name.as_str())
                    && !self.inline.contains(name.as_str())
                    && !self.external_names.contains_key(name)
                {
                    return Err(GenerateError::UndefinedSymbol {
                        rule: "conflicts".into(),
                        name: name.clone(),
                    });
                }
            }
            set.sort();
            set.dedup();
            sets.push(set);
        }
        Ok(sets)
    }
}

/// Existing visible symbol with this name and namedness, or a new alias symbol.
fn alias_symbol(symbols: &mut Vec<SymbolInfo>, name: &str, named: bool) -> Symbol {
    let existing = symbols.iter().position(|info| {
        info.visible
            && info.named == named
            && info.name == name
            && matches!(
                info.kind,
                SymbolKind::Token
                    | SymbolKind::External
                    | SymbolKind::NonTerminal
                    | SymbolKind::Alias
            )
    });
    if let Some(index) = existing {
        return Symbol(index as u16);
    }
    symbols.push(SymbolInfo {
        name: name.to_string(),
        kind: SymbolKind::Alias,
        visible: true,
        named,
    });
    Symbol((symbols.len() - 1) as u16)
}

/// A rule is lexical if, under any precedence wrappers, it is a single token.
fn is_lexical(rule: &Rule) -> bool {
    matches!(
        strip_precedence(rule),
        Rule::String(_) | Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_)
    )
}

fn strip_precedence(rule: &Rule) -> &Rule {
    match rule {
        Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. }
        | Rule::PrecDynamic { content, .. } => strip_precedence(content),
        _ => rule,
    }
}

/// Strings used as anonymous tokens outside `token(...)` in syntactic positions.
fn anonymous_literals(grammar: &Grammar) -> HashSet<&str> {
    fn walk<'g>(rule: &'g Rule, out: &mut HashSet<&'g str>) {
        match rule {
            Rule::String(s) => {
                out.insert(s);
            }
            Rule::Seq(members) | Rule::Choice(members) => {
                for m in members {
                    walk(m, out);
                }
            }
            Rule::Repeat(inner) | Rule::Repeat1(inner) => walk(inner, out),
            Rule::Field { content, .. }
            | Rule::Alias { content, .. }
            | Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. }
            | Rule::PrecDynamic { content, .. }
            | Rule::Reserved { content, .. } => walk(content, out),
            Rule::Blank
            | Rule::Pattern { .. }
            | Rule::Symbol(_)
            | Rule::Token(_)
            | Rule::ImmediateToken(_) => {}
        }
    }

    let mut out = HashSet::new();
    for (_, body) in &grammar.rules {
        if !matches!(body, Rule::String(_)) && !is_lexical(body) {
            walk(body, &mut out);
        }
    }
    for extra in &grammar.extras {
        walk(extra, &mut out);
    }
    out
}
