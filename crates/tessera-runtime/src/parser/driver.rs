//! The LR driver loop.
//!
//! One [`ParseRun`] parses one text. Lookaheads are either freshly lexed tokens,
//! subtrees offered by the reuse cursor, or MISSING terminals queued by error
//! recovery; the action table is consulted with the first leaf symbol in every
//! case.

use std::sync::Arc;

use tessera_core::{LexModeId, ProductionId, StateId, Symbol};
use tessera_table::{Action, ParseTable};

use crate::language::ExternalScanner;
use crate::lexer::{Lexer, Token};
use crate::subtree::Subtree;

use super::error::Exhausted;
use super::reuse::ReuseCursor;
use super::trace::Tracer;
use super::{FuelLimits, ParseStats};

pub(super) struct Frame {
    /// State after pushing `subtree`. Extras keep the state below them.
    pub state: StateId,
    pub subtree: Arc<Subtree>,
    /// Recovery counter when the frame was pushed.
    pub recovery_count: u32,
}

pub(super) enum Lookahead {
    Token(Token),
    Reused(Arc<Subtree>),
    Missing(Symbol),
}

impl Lookahead {
    pub fn symbol(&self) -> Symbol {
        match self {
            Self::Token(token) => token.symbol,
            Self::Reused(node) => node.first_leaf().symbol,
            Self::Missing(symbol) => *symbol,
        }
    }

    /// Absolute end of the bytes the lookahead was decided on, given that it
    /// starts at `pos`.
    pub fn dependency_end(&self, pos: usize) -> usize {
        match self {
            Self::Token(token) => token.end + token.lookahead_bytes,
            Self::Reused(node) => {
                let leaf = node.first_leaf();
                pos + leaf.size + leaf.lookahead_bytes
            }
            Self::Missing(_) => pos,
        }
    }
}

pub(super) struct ParseRun<'p, T: Tracer> {
    pub(super) table: &'p ParseTable,
    pub(super) lexer: Lexer<'p>,
    pub(super) scanner: Option<&'p mut (dyn ExternalScanner + 'static)>,
    pub(super) tracer: &'p mut T,
    limits: FuelLimits,
    pub(super) stack: Vec<Frame>,
    /// Lookaheads to process next, last first.
    pub(super) pending: Vec<Lookahead>,
    /// Start of the next lookahead.
    pub(super) pos: usize,
    pub(super) external_state: Option<Arc<[u8]>>,
    /// Lex mode of the state after the last leaf of a reused node.
    pub(super) lex_mode_override: Option<LexModeId>,
    /// Mode the lookahead at `pos` was first requested in. Reductions change
    /// the state but not the token a fresh parse sees there.
    lookahead_mode: Option<LexModeId>,
    reuse: Option<ReuseCursor>,
    /// Bumped on every recovery and every conflict decision; frames remember
    /// it to detect fragile nodes.
    pub(super) recovery_count: u32,
    /// Furthest byte lexed while deciding a conflict.
    pub(super) decision_horizon: usize,
    steps: u64,
    nodes: u64,
    pub(super) stats: ParseStats,
}

impl<'p, T: Tracer> ParseRun<'p, T> {
    pub fn new(
        table: &'p ParseTable,
        text: &'p str,
        scanner: Option<&'p mut (dyn ExternalScanner + 'static)>,
        tracer: &'p mut T,
        limits: FuelLimits,
        old_root: Option<Arc<Subtree>>,
    ) -> Self {
        Self {
            table,
            lexer: Lexer::new(table, text),
            scanner,
            tracer,
            limits,
            stack: Vec::new(),
            pending: Vec::new(),
            pos: 0,
            external_state: None,
            lex_mode_override: None,
            lookahead_mode: None,
            reuse: old_root.map(ReuseCursor::new),
            recovery_count: 0,
            decision_horizon: 0,
            steps: 0,
            nodes: 0,
            stats: ParseStats::default(),
        }
    }

    /// Run to completion, returning the root.
    pub fn parse(&mut self) -> Result<Arc<Subtree>, Exhausted> {
        loop {
            self.step()?;
            let lookahead = match self.pending.pop() {
                Some(lookahead) => lookahead,
                None => self.next_lookahead(),
            };
            let state = self.state();

            match self.choose_action(state, &lookahead)? {
                Action::Shift(next) => self.shift(state, next, lookahead)?,
                Action::Reduce(production) => {
                    let end = self.dependency_end(&lookahead);
                    self.reduce(production, end)?;
                    self.pending.push(lookahead);
                }
                Action::Accept => return self.accept(&lookahead),
                Action::Error => match lookahead {
                    Lookahead::Token(token) if self.table.is_extra(token.symbol) => {
                        let leaf = Subtree::leaf(&token, state, true);
                        self.count_node()?;
                        self.push_extra(Arc::new(leaf));
                    }
                    Lookahead::Reused(node) if node.is_leaf() && self.table.is_extra(node.symbol) => {
                        let leaf = self.take_reused_leaf(node, state, true)?;
                        self.push_extra(leaf);
                    }
                    Lookahead::Reused(node) => self.reject_reused(&node),
                    Lookahead::Token(token) => {
                        if let Some(root) = self.recover(token)? {
                            return Ok(root);
                        }
                    }
                    // Recovery only queues terminals it has simulated.
                    Lookahead::Missing(_) => {}
                },
            }
        }
    }

    pub fn state(&self) -> StateId {
        self.stack.last().map_or(0, |frame| frame.state)
    }

    pub fn lex_mode(&self) -> LexModeId {
        self.lookahead_mode
            .or(self.lex_mode_override)
            .unwrap_or_else(|| self.table.lex_mode_for_state(self.state()))
    }

    /// End of the bytes nodes reduced before `lookahead` depend on.
    pub fn dependency_end(&self, lookahead: &Lookahead) -> usize {
        lookahead
            .dependency_end(self.pos)
            .max(self.decision_horizon)
    }

    pub fn step(&mut self) -> Result<(), Exhausted> {
        self.steps += 1;
        if self.steps > self.limits.exec_fuel {
            return Err(Exhausted::ExecFuel);
        }
        Ok(())
    }

    pub fn count_node(&mut self) -> Result<(), Exhausted> {
        self.nodes += 1;
        if self.nodes > self.limits.node_limit {
            return Err(Exhausted::NodeLimit);
        }
        Ok(())
    }

    pub fn consumed(&self, reason: Exhausted) -> u64 {
        match reason {
            Exhausted::ExecFuel => self.steps,
            Exhausted::NodeLimit => self.nodes,
        }
    }

    /// ERROR root over everything on the stack, for an aborted parse.
    pub fn partial_root(&mut self) -> Arc<Subtree> {
        let children = self.stack.drain(..).map(|frame| frame.subtree).collect();
        Arc::new(Subtree::error(children, 0, false))
    }

    pub fn lex(&mut self, pos: usize, mode: LexModeId, external_state: Option<&[u8]>) -> Token {
        self.lexer
            .lex(pos, mode, self.scanner.as_deref_mut(), external_state)
    }

    fn next_lookahead(&mut self) -> Lookahead {
        let mode = self.lex_mode();
        self.lookahead_mode = Some(mode);
        if let Some(node) = self.reusable_subtree(mode) {
            return Lookahead::Reused(node);
        }
        let external_state = self.external_state.clone();
        let token = self.lex(self.pos, mode, external_state.as_deref());
        self.stats.lexed_tokens += 1;
        self.tracer
            .trace_lex(token.symbol, token.start..token.end, mode);
        Lookahead::Token(token)
    }

    /// Next subtree of the old tree that can stand in for lexing at `pos`.
    fn reusable_subtree(&mut self, mode: LexModeId) -> Option<Arc<Subtree>> {
        let reuse = self.reuse.as_mut()?;
        loop {
            let node = reuse.candidate(self.pos)?;
            let first = node.first_leaf();
            let usable = !node.has_changes
                && node.error_count == 0
                && !node.fragile
                && (node.is_leaf() || !first.extra)
                && first.lex_mode == mode
                && reuse.external_state() == self.external_state.as_deref();
            if usable {
                return Some(node);
            }
            if node.is_leaf() || !reuse.descend() {
                reuse.advance();
                return None;
            }
        }
    }

    /// A reused lookahead the parser cannot take as a whole.
    fn reject_reused(&mut self, node: &Subtree) {
        let Some(reuse) = self.reuse.as_mut() else {
            return;
        };
        if node.is_leaf() || !reuse.descend() {
            reuse.advance();
        }
    }

    fn take_reused_leaf(
        &mut self,
        node: Arc<Subtree>,
        state: StateId,
        extra: bool,
    ) -> Result<Arc<Subtree>, Exhausted> {
        if let Some(reuse) = self.reuse.as_mut() {
            reuse.advance();
        }
        self.stats.reused_leaves += 1;
        self.stats.reused_bytes += node.size;
        self.tracer
            .trace_reuse(node.symbol, self.pos..self.pos + node.size, true);

        if node.parse_state == state && node.extra == extra {
            return Ok(node);
        }
        self.count_node()?;
        let mut leaf = Subtree::clone(&node);
        leaf.parse_state = state;
        leaf.extra = extra;
        Ok(Arc::new(leaf))
    }

    fn shift(&mut self, state: StateId, next: StateId, lookahead: Lookahead) -> Result<(), Exhausted> {
        let leaf = match lookahead {
            Lookahead::Token(token) => {
                self.count_node()?;
                Arc::new(Subtree::leaf(&token, state, false))
            }
            Lookahead::Missing(symbol) => {
                self.count_node()?;
                Arc::new(Subtree::missing(symbol, state, self.lex_mode()))
            }
            Lookahead::Reused(node) if node.is_leaf() => self.take_reused_leaf(node, state, false)?,
            Lookahead::Reused(node) => {
                let target = self
                    .table
                    .goto(state, node.symbol)
                    .filter(|_| node.parse_state == state);
                let Some(target) = target else {
                    self.reject_reused(&node);
                    return Ok(());
                };
                if let Some(reuse) = self.reuse.as_mut() {
                    reuse.advance();
                }
                self.stats.reused_nodes += 1;
                self.stats.reused_bytes += node.size;
                self.tracer
                    .trace_reuse(node.symbol, self.pos..self.pos + node.size, false);
                self.tracer.trace_shift(state, node.symbol, target);
                self.lex_mode_override = self.lex_mode_after(&node);
                self.push(target, node);
                return Ok(());
            }
        };

        self.tracer.trace_shift(state, leaf.symbol, next);
        self.lex_mode_override = None;
        self.push(next, leaf);
        Ok(())
    }

    /// Lex mode a full parse would have used right after the last leaf of `node`.
    fn lex_mode_after(&self, node: &Subtree) -> Option<LexModeId> {
        let last = node.last_leaf();
        if last.extra {
            return Some(self.table.lex_mode_for_state(last.parse_state));
        }
        let primary = [self.table.action(last.parse_state, last.symbol)];
        let actions = self
            .table
            .alternatives(last.parse_state, last.symbol)
            .unwrap_or(&primary);
        actions.iter().find_map(|action| match action {
            Action::Shift(next) => Some(self.table.lex_mode_for_state(*next)),
            _ => None,
        })
    }

    /// Push consumed input, advancing the position.
    pub fn push(&mut self, state: StateId, subtree: Arc<Subtree>) {
        if let Some(external) = subtree.last_external_state() {
            self.external_state = Some(Arc::clone(external));
        }
        if subtree.size > 0 {
            self.lookahead_mode = None;
        }
        self.pos += subtree.size;
        self.push_frame(state, subtree);
    }

    pub fn push_extra(&mut self, subtree: Arc<Subtree>) {
        self.tracer
            .trace_extra(subtree.symbol, self.pos..self.pos + subtree.size);
        let state = self.state();
        self.push(state, subtree);
    }

    /// Push material that is already accounted for in the position.
    pub fn push_frame(&mut self, state: StateId, subtree: Arc<Subtree>) {
        self.stack.push(Frame {
            state,
            subtree,
            recovery_count: self.recovery_count,
        });
    }

    fn reduce(&mut self, id: ProductionId, lookahead_end: usize) -> Result<(), Exhausted> {
        let production = self.table.production(id);
        let lhs = production.lhs;
        let count = production.child_count();

        let mut trailing = Vec::new();
        while self.stack.last().is_some_and(|frame| frame.subtree.extra) {
            trailing.extend(self.stack.pop());
        }
        trailing.reverse();

        let mut children = Vec::new();
        let mut remaining = count;
        while remaining > 0 {
            let Some(frame) = self.stack.pop() else {
                break;
            };
            if !frame.subtree.extra {
                remaining -= 1;
            }
            children.push(frame);
        }
        children.reverse();

        let covered: usize = trailing
            .iter()
            .chain(&children)
            .map(|frame| frame.subtree.size)
            .sum();
        let start = self.pos - covered;
        let base = self.state();
        let recovery_count = children
            .first()
            .map_or(self.recovery_count, |frame| frame.recovery_count);

        let subtrees = children.into_iter().map(|frame| frame.subtree).collect();
        let mut node = Subtree::node(lhs, Some(id), subtrees, base, lookahead_end - start);
        node.fragile = self.recovery_count > recovery_count;
        self.count_node()?;

        let next = self.table.goto(base, lhs).unwrap_or(base);
        self.tracer.trace_reduce(id, count, next);
        self.stack.push(Frame {
            state: next,
            subtree: Arc::new(node),
            recovery_count,
        });
        for mut frame in trailing {
            frame.state = next;
            self.stack.push(frame);
        }
        Ok(())
    }

    /// Build the root: leading extras, the start node's children, trailing extras.
    fn accept(&mut self, lookahead: &Lookahead) -> Result<Arc<Subtree>, Exhausted> {
        let end = self.dependency_end(lookahead);
        let start_symbol = self.table.start_symbol();
        let frames = std::mem::take(&mut self.stack);
        self.tracer.trace_accept(self.pos);

        if let [frame] = frames.as_slice()
            && frame.subtree.symbol == start_symbol
            && !frame.subtree.extra
        {
            return Ok(Arc::clone(&frame.subtree));
        }

        let mut production = None;
        let mut children = Vec::new();
        for frame in frames {
            let subtree = frame.subtree;
            if production.is_none() && subtree.symbol == start_symbol && !subtree.extra {
                production = subtree.production;
                children.extend(subtree.children.iter().cloned());
            } else {
                children.push(subtree);
            }
        }
        self.count_node()?;
        Ok(Arc::new(Subtree::node(start_symbol, production, children, 0, end)))
    }
}
