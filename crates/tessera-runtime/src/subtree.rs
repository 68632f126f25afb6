//! Persistent syntax tree nodes.
//!
//! A [`Subtree`] stores only its byte length, never an absolute position, so an
//! unchanged subtree can be shared between trees even when text before it was
//! edited. Children are owned through `Arc`; there are no parent links.

use std::sync::Arc;

use tessera_core::{LexModeId, ProductionId, StateId, Symbol};

use crate::lexer::Token;

#[derive(Clone, Debug)]
pub(crate) struct Subtree {
    pub symbol: Symbol,
    pub size: usize,
    /// Bytes past the end that influenced how this subtree was built.
    pub lookahead_bytes: usize,
    /// Parser state the subtree was pushed onto.
    pub parse_state: StateId,
    /// Lex mode of a leaf.
    pub lex_mode: LexModeId,
    pub production: Option<ProductionId>,
    pub extra: bool,
    pub missing: bool,
    pub has_changes: bool,
    /// Built while error recovery was running.
    pub fragile: bool,
    pub has_external_tokens: bool,
    pub error_count: u32,
    /// Scanner state after an external leaf.
    pub external_state: Option<Arc<[u8]>>,
    pub children: Vec<Arc<Subtree>>,
}

impl Subtree {
    pub fn leaf(token: &Token, parse_state: StateId, extra: bool) -> Self {
        Self {
            symbol: token.symbol,
            size: token.len(),
            lookahead_bytes: token.lookahead_bytes,
            parse_state,
            lex_mode: token.lex_mode,
            production: None,
            extra,
            missing: false,
            has_changes: false,
            fragile: false,
            has_external_tokens: token.external_state.is_some(),
            error_count: u32::from(token.symbol.is_error()),
            external_state: token.external_state.clone(),
            children: Vec::new(),
        }
    }

    /// Zero-width terminal inserted by error recovery.
    pub fn missing(symbol: Symbol, parse_state: StateId, lex_mode: LexModeId) -> Self {
        Self {
            symbol,
            size: 0,
            lookahead_bytes: 0,
            parse_state,
            lex_mode,
            production: None,
            extra: false,
            missing: true,
            has_changes: false,
            fragile: false,
            has_external_tokens: false,
            error_count: 1,
            external_state: None,
            children: Vec::new(),
        }
    }

    /// Interior node over `children`.
    ///
    /// `dependency_end` is how far past the start of the node the decision to
    /// build it looked, relative to the node start. It is widened to cover every
    /// child's own dependency.
    pub fn node(
        symbol: Symbol,
        production: Option<ProductionId>,
        children: Vec<Arc<Subtree>>,
        parse_state: StateId,
        dependency_end: usize,
    ) -> Self {
        let mut size = 0;
        let mut reach = dependency_end;
        let mut error_count = 0;
        let mut has_external_tokens = false;
        for child in &children {
            reach = reach.max(size + child.size + child.lookahead_bytes);
            size += child.size;
            error_count += child.error_count;
            has_external_tokens |= child.has_external_tokens;
        }
        if symbol.is_error() {
            error_count += 1;
        }

        Self {
            symbol,
            size,
            lookahead_bytes: reach.saturating_sub(size),
            parse_state,
            lex_mode: 0,
            production,
            extra: false,
            missing: false,
            has_changes: false,
            fragile: false,
            has_external_tokens,
            error_count,
            external_state: None,
            children,
        }
    }

    /// Error-marker node wrapping skipped or popped material.
    pub fn error(children: Vec<Arc<Subtree>>, parse_state: StateId, extra: bool) -> Self {
        let mut node = Self::node(Symbol::ERROR, None, children, parse_state, 0);
        node.extra = extra;
        node
    }

    /// Tokens, missing terminals and empty error nodes. Empty productions are not leaves.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.production.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.symbol.is_error()
    }

    /// First leaf covering input. Empty children are skipped unless every
    /// child is empty.
    pub fn first_leaf(&self) -> &Subtree {
        let mut node = self;
        while let Some(first) = node
            .children
            .iter()
            .find(|child| child.size > 0)
            .or(node.children.first())
        {
            node = first;
        }
        node
    }

    pub fn last_leaf(&self) -> &Subtree {
        let mut node = self;
        while let Some(last) = node
            .children
            .iter()
            .rfind(|child| child.size > 0)
            .or(node.children.last())
        {
            node = last;
        }
        node
    }

    /// Scanner state after the last external leaf inside this subtree.
    pub fn last_external_state(&self) -> Option<&Arc<[u8]>> {
        if !self.has_external_tokens {
            return None;
        }
        if self.children.is_empty() {
            return self.external_state.as_ref();
        }
        self.children
            .iter()
            .rev()
            .find_map(|child| child.last_external_state())
    }
}
