//! Declared conflicts.
//!
//! A grammar may list rules whose conflicts it expects; the table then keeps
//! every action of such a cell instead of resolving it statically. When the
//! driver lands on one, each action is tried on copies of the state stack
//! against the upcoming tokens, forking again at any further declared cell,
//! and the action whose branches survive longest wins. Ties go to the action
//! static resolution would have picked.
//!
//! Nodes built across a decision are marked fragile and depend on every byte
//! the exploration lexed, so incremental reparses never reuse a node whose
//! shape rested on text that changed.

use std::sync::Arc;

use tessera_core::{StateId, Symbol};
use tessera_table::Action;

use crate::lexer::Token;

use super::driver::{Lookahead, ParseRun};
use super::error::Exhausted;
use super::trace::Tracer;

/// Tokens past the conflict an action has to survive to count as viable.
pub const DECISION_WINDOW: usize = 12;

/// Live branches kept per exploration round.
const MAX_BRANCHES: usize = 16;

/// Tokens survived by an action whose branch reached accept.
const ACCEPTED: usize = usize::MAX;

struct Branch {
    states: Vec<StateId>,
    pos: usize,
    external_state: Option<Arc<[u8]>>,
}

impl<T: Tracer> ParseRun<'_, T> {
    /// Action to take in `state` on `lookahead`.
    pub(super) fn choose_action(
        &mut self,
        state: StateId,
        lookahead: &Lookahead,
    ) -> Result<Action, Exhausted> {
        let table = self.table;
        let symbol = lookahead.symbol();
        let primary = table.action(state, symbol);
        let Some(candidates) = table.alternatives(state, symbol) else {
            return Ok(primary);
        };
        let (next_pos, external_state) = match lookahead {
            Lookahead::Token(token) => (token.end, token.external_state.clone()),
            Lookahead::Reused(node) => {
                let leaf = node.first_leaf();
                (self.pos + leaf.size, leaf.external_state.clone())
            }
            // Recovery already simulated the primary action for these.
            Lookahead::Missing(_) => return Ok(primary),
        };
        let external_state = external_state.or_else(|| self.external_state.clone());

        self.recovery_count += 1;
        self.stats.decisions += 1;
        let states = self.structural_states();
        let mut best: Option<(Action, usize)> = None;
        for &action in candidates {
            let reach =
                self.explore(states.clone(), action, symbol, next_pos, external_state.clone())?;
            if best.is_none_or(|(_, longest)| reach > longest) {
                best = Some((action, reach));
            }
        }
        let chosen = best.map_or(primary, |(action, _)| action);
        self.tracer
            .trace_decide(state, symbol, chosen, candidates.len());
        Ok(chosen)
    }

    /// How many tokens the parse survives after taking `first` on `symbol`,
    /// counting `symbol` itself. [`ACCEPTED`] if some branch accepts.
    fn explore(
        &mut self,
        states: Vec<StateId>,
        first: Action,
        symbol: Symbol,
        pos: usize,
        external_state: Option<Arc<[u8]>>,
    ) -> Result<usize, Exhausted> {
        let mut shifted = Vec::new();
        if self.fork_symbol(states, Some(first), symbol, &mut shifted)? {
            return Ok(ACCEPTED);
        }
        let mut branches: Vec<Branch> = shifted
            .into_iter()
            .map(|states| Branch {
                states,
                pos,
                external_state: external_state.clone(),
            })
            .collect();

        let mut reach = 0;
        while !branches.is_empty() && reach < DECISION_WINDOW {
            reach += 1;
            let mut next: Vec<Branch> = Vec::new();
            for mut branch in branches {
                let Some(token) = self.branch_token(&mut branch)? else {
                    continue;
                };
                let mut shifted = Vec::new();
                if self.fork_symbol(branch.states, None, token.symbol, &mut shifted)? {
                    return Ok(ACCEPTED);
                }
                let external_state = token.external_state.or(branch.external_state);
                for states in shifted {
                    let seen = next
                        .iter()
                        .any(|other| other.pos == token.end && other.states == states);
                    if !seen && next.len() < MAX_BRANCHES {
                        next.push(Branch {
                            states,
                            pos: token.end,
                            external_state: external_state.clone(),
                        });
                    }
                }
            }
            branches = next;
        }
        Ok(reach + usize::from(!branches.is_empty()))
    }

    /// Next token for `branch`, stepping over extras the branch cannot shift.
    /// `None` when nothing lexes.
    fn branch_token(&mut self, branch: &mut Branch) -> Result<Option<Token>, Exhausted> {
        loop {
            self.step()?;
            let state = branch.states.last().copied().unwrap_or(0);
            let mode = self.table.lex_mode_for_state(state);
            let token = self.lex(branch.pos, mode, branch.external_state.as_deref());
            self.decision_horizon = self
                .decision_horizon
                .max(token.end + token.lookahead_bytes);
            if token.symbol.is_error() {
                return Ok(None);
            }
            let skippable = self.table.action(state, token.symbol).is_error()
                && self.table.is_extra(token.symbol)
                && token.end > branch.pos;
            if !skippable {
                return Ok(Some(token));
            }
            branch.pos = token.end;
            if let Some(external) = token.external_state {
                branch.external_state = Some(external);
            }
        }
    }

    /// Run `symbol` through `states`, following every action of declared
    /// cells, and collect each stack that ends up shifting it. `first`
    /// replaces the table's choice in the starting state.
    ///
    /// Returns `true` if some path accepts.
    fn fork_symbol(
        &mut self,
        states: Vec<StateId>,
        first: Option<Action>,
        symbol: Symbol,
        shifted: &mut Vec<Vec<StateId>>,
    ) -> Result<bool, Exhausted> {
        let table = self.table;
        let mut work = vec![(states, first)];
        while let Some((states, forced)) = work.pop() {
            self.step()?;
            let state = states.last().copied().unwrap_or(0);
            let single;
            let actions = match forced {
                Some(action) => {
                    single = [action];
                    &single[..]
                }
                None => match table.alternatives(state, symbol) {
                    Some(actions) => actions,
                    None => {
                        single = [table.action(state, symbol)];
                        &single[..]
                    }
                },
            };
            for &action in actions {
                match action {
                    Action::Shift(next) => {
                        let mut after = states.clone();
                        after.push(next);
                        shifted.push(after);
                    }
                    Action::Reduce(id) => {
                        let production = table.production(id);
                        let count = production.child_count();
                        if count >= states.len() {
                            continue;
                        }
                        let mut after = states[..states.len() - count].to_vec();
                        let base = after.last().copied().unwrap_or(0);
                        if let Some(next) = table.goto(base, production.lhs) {
                            after.push(next);
                            work.push((after, None));
                        }
                    }
                    Action::Accept => return Ok(true),
                    Action::Error => {}
                }
            }
        }
        Ok(false)
    }
}
