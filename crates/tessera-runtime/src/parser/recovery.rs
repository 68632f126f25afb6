//! Error recovery.
//!
//! When a freshly lexed token has no action, repairs are tried in a fixed
//! order and the first one whose simulated continuation gets through
//! [`RECOVERY_WINDOW`] tokens (or reaches accept) is applied:
//!
//! 1. insert a MISSING terminal before the token
//! 2. delete the token
//! 3. pop the fewest stack entries into an ERROR node
//!
//! If nothing resynchronizes, the token is skipped into an ERROR node. At end
//! of input the whole stack becomes an ERROR root.
//!
//! Simulations run on a copy of the state stack and never touch the real one.

use std::sync::Arc;

use tessera_core::{StateId, Symbol};
use tessera_table::Action;

use crate::lexer::Token;
use crate::subtree::Subtree;

use super::driver::{Lookahead, ParseRun};
use super::error::Exhausted;
use super::trace::{RecoveryAction, Tracer};

/// Tokens a repair must carry the parse through to be accepted.
pub const RECOVERY_WINDOW: usize = 3;

enum Step {
    Shifted,
    Accepted,
    Failed,
}

impl<T: Tracer> ParseRun<'_, T> {
    /// Recover from `token` having no action in the current state.
    ///
    /// Returns the finished root when recovery ends the parse.
    pub(super) fn recover(&mut self, token: Token) -> Result<Option<Arc<Subtree>>, Exhausted> {
        self.recovery_count += 1;
        self.stats.recoveries += 1;
        self.lex_mode_override = None;

        let table = self.table;
        let states = self.structural_states();
        let external_state = token
            .external_state
            .clone()
            .or_else(|| self.external_state.clone());

        if !token.symbol.is_error() {
            let candidates: Vec<Symbol> = table
                .valid_terminals(self.state())
                .filter(|symbol| !symbol.is_end())
                .collect();
            for symbol in candidates {
                let prefix = [symbol, token.symbol];
                if self.simulate(states.clone(), &prefix, token.end, external_state.clone(), RECOVERY_WINDOW - 1)? {
                    self.tracer
                        .trace_recover(RecoveryAction::Insert(symbol), token.start..token.start);
                    self.pending.push(Lookahead::Token(token));
                    self.pending.push(Lookahead::Missing(symbol));
                    return Ok(None);
                }
            }
        }

        if !token.symbol.is_end()
            && self.simulate(states.clone(), &[], token.end, external_state.clone(), RECOVERY_WINDOW)?
        {
            self.skip_token(token, RecoveryAction::Delete)?;
            return Ok(None);
        }

        if !token.symbol.is_error() {
            for popped in 1..states.len() {
                let kept = states[..states.len() - popped].to_vec();
                let prefix = [token.symbol];
                if self.simulate(kept, &prefix, token.end, external_state.clone(), RECOVERY_WINDOW - 1)? {
                    self.pop_into_error(popped)?;
                    self.pending.push(Lookahead::Token(token));
                    return Ok(None);
                }
            }
        }

        if !token.symbol.is_end() {
            self.skip_token(token, RecoveryAction::Skip)?;
            return Ok(None);
        }

        let end = (token.end + token.lookahead_bytes).max(self.decision_horizon);
        self.tracer
            .trace_recover(RecoveryAction::Collapse, 0..self.pos);
        let children = self.stack.drain(..).map(|frame| frame.subtree).collect();
        self.count_node()?;
        Ok(Some(Arc::new(Subtree::node(Symbol::ERROR, None, children, 0, end))))
    }

    /// States of the non-extra frames, on top of the implicit start state.
    pub(super) fn structural_states(&self) -> Vec<StateId> {
        let mut states = vec![0];
        states.extend(
            self.stack
                .iter()
                .filter(|frame| !frame.subtree.extra)
                .map(|frame| frame.state),
        );
        states
    }

    /// Feed `prefix`, then up to `tokens` freshly lexed tokens starting at
    /// `pos`, through a copy of the state stack.
    fn simulate(
        &mut self,
        mut states: Vec<StateId>,
        prefix: &[Symbol],
        mut pos: usize,
        mut external_state: Option<Arc<[u8]>>,
        tokens: usize,
    ) -> Result<bool, Exhausted> {
        for &symbol in prefix {
            match self.simulate_symbol(&mut states, symbol)? {
                Step::Shifted => {}
                Step::Accepted => return Ok(true),
                Step::Failed => return Ok(false),
            }
        }

        let mut remaining = tokens;
        while remaining > 0 {
            self.step()?;
            let state = states.last().copied().unwrap_or(0);
            let mode = self.table.lex_mode_for_state(state);
            let token = self.lex(pos, mode, external_state.as_deref());
            if token.symbol.is_error() {
                return Ok(false);
            }
            if let Some(external) = &token.external_state {
                external_state = Some(Arc::clone(external));
            }

            if self.table.action(state, token.symbol).is_error() && self.table.is_extra(token.symbol) {
                if token.end == pos {
                    return Ok(false);
                }
                pos = token.end;
                continue;
            }

            match self.simulate_symbol(&mut states, token.symbol)? {
                Step::Shifted => {
                    pos = token.end;
                    remaining -= 1;
                }
                Step::Accepted => return Ok(true),
                Step::Failed => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Apply reductions for `symbol` until it shifts, accepts or fails.
    fn simulate_symbol(&mut self, states: &mut Vec<StateId>, symbol: Symbol) -> Result<Step, Exhausted> {
        loop {
            self.step()?;
            let state = states.last().copied().unwrap_or(0);
            match self.table.action(state, symbol) {
                Action::Shift(next) => {
                    states.push(next);
                    return Ok(Step::Shifted);
                }
                Action::Reduce(id) => {
                    let production = self.table.production(id);
                    let count = production.child_count();
                    if count >= states.len() {
                        return Ok(Step::Failed);
                    }
                    states.truncate(states.len() - count);
                    let base = states.last().copied().unwrap_or(0);
                    let Some(next) = self.table.goto(base, production.lhs) else {
                        return Ok(Step::Failed);
                    };
                    states.push(next);
                }
                Action::Accept => return Ok(Step::Accepted),
                Action::Error => return Ok(Step::Failed),
            }
        }
    }

    /// Push `token` as skipped input, merging with an ERROR node on top.
    fn skip_token(&mut self, token: Token, action: RecoveryAction) -> Result<(), Exhausted> {
        self.tracer.trace_recover(action, token.start..token.end);

        let merge = self
            .stack
            .last()
            .is_some_and(|frame| frame.subtree.extra && frame.subtree.is_error());
        let previous = if merge { self.stack.pop() } else { None };
        if let Some(frame) = &previous {
            self.pos -= frame.subtree.size;
        }
        let state = self.state();

        self.count_node()?;
        let leaf = Subtree::leaf(&token, state, false);
        let skipped = match previous {
            Some(frame) => {
                let mut children = if frame.subtree.is_leaf() {
                    vec![frame.subtree]
                } else {
                    frame.subtree.children.clone()
                };
                children.push(Arc::new(leaf));
                self.count_node()?;
                Subtree::error(children, state, true)
            }
            None if token.symbol.is_error() => Subtree { extra: true, ..leaf },
            None => {
                self.count_node()?;
                Subtree::error(vec![Arc::new(leaf)], state, true)
            }
        };
        self.push(state, Arc::new(skipped));
        Ok(())
    }

    /// Wrap the top `count` non-extra frames, and the extras among them, in an
    /// extra ERROR node.
    fn pop_into_error(&mut self, count: usize) -> Result<(), Exhausted> {
        let mut popped = Vec::new();
        let mut remaining = count;
        while remaining > 0 {
            let Some(frame) = self.stack.pop() else {
                break;
            };
            if !frame.subtree.extra {
                remaining -= 1;
            }
            popped.push(frame.subtree);
        }
        popped.reverse();

        let size: usize = popped.iter().map(|subtree| subtree.size).sum();
        self.tracer
            .trace_recover(RecoveryAction::Pop(count), self.pos - size..self.pos);
        let state = self.state();
        self.count_node()?;
        self.push_frame(state, Arc::new(Subtree::error(popped, state, true)));
        Ok(())
    }
}
