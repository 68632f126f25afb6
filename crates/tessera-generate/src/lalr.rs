//! LALR(1) automaton.
//!
//! LR(1) item sets are built breadth-first and merged by LR(0) core as they are
//! discovered. A state whose lookaheads grow after merging is processed again, so
//! the result is the LALR(1) fixpoint. Successors are visited in symbol order,
//! which makes state numbering deterministic.

use std::collections::{BTreeMap, HashMap, VecDeque};

use indexmap::IndexMap;

use tessera_core::{StateId, Symbol};
use tessera_table::NO_STATE;

use crate::error::GenerateError;
use crate::first::{FirstSets, TokenSet};
use crate::prepare::PreparedGrammar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Item {
    pub prod: u32,
    pub dot: u16,
}

impl Item {
    fn advance(self) -> Self {
        Self {
            prod: self.prod,
            dot: self.dot + 1,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Automaton {
    /// Closed item sets with their final lookaheads.
    pub states: Vec<Vec<(Item, TokenSet)>>,
    pub transitions: Vec<BTreeMap<Symbol, StateId>>,
    /// Index of the internal `start' -> start` production.
    pub augmented: u32,
}

struct Builder<'a> {
    grammar: &'a PreparedGrammar,
    first: &'a FirstSets,
    augmented: u32,
    /// Production indices per nonterminal column.
    by_lhs: Vec<Vec<u32>>,
    empty_suffix: (TokenSet, bool),
}

impl Builder<'_> {
    fn next_symbol(&self, item: Item) -> Option<Symbol> {
        if item.prod == self.augmented {
            return (item.dot == 0).then_some(self.grammar.start_symbol);
        }
        self.grammar.productions[item.prod as usize]
            .steps
            .get(item.dot as usize)
            .map(|step| step.symbol)
    }

    fn suffix(&self, item: Item) -> &(TokenSet, bool) {
        if item.prod == self.augmented {
            return &self.empty_suffix;
        }
        self.first.suffix(item.prod as usize, item.dot as usize)
    }

    fn closure(&self, kernel: &[(Item, TokenSet)]) -> Vec<(Item, TokenSet)> {
        let mut items: IndexMap<Item, TokenSet> = kernel.iter().cloned().collect();
        let mut pending: Vec<usize> = (0..items.len()).rev().collect();

        while let Some(index) = pending.pop() {
            let Some((&item, lookahead)) = items.get_index(index) else {
                continue;
            };
            let Some(next) = self.next_symbol(item) else {
                continue;
            };
            if self.grammar.is_terminal(next) {
                continue;
            }

            let (first, nullable) = self.suffix(item.advance());
            let mut propagated = first.clone();
            if *nullable {
                propagated.union_with(lookahead);
            }

            for &prod in &self.by_lhs[self.grammar.nonterminal_index(next)] {
                let start = Item { prod, dot: 0 };
                match items.get_index_of(&start) {
                    Some(existing) => {
                        if items[existing].union_with(&propagated) {
                            pending.push(existing);
                        }
                    }
                    None => {
                        items.insert(start, propagated.clone());
                        pending.push(items.len() - 1);
                    }
                }
            }
        }

        items.into_iter().collect()
    }
}

pub(crate) fn build(
    grammar: &PreparedGrammar,
    first: &FirstSets,
) -> Result<Automaton, GenerateError> {
    let terminals = grammar.terminal_count as usize;
    let augmented = grammar.productions.len() as u32;
    let mut by_lhs = vec![Vec::new(); grammar.nonterminal_count as usize];
    for (index, prod) in grammar.productions.iter().enumerate() {
        by_lhs[grammar.nonterminal_index(prod.lhs)].push(index as u32);
    }
    let builder = Builder {
        grammar,
        first,
        augmented,
        by_lhs,
        empty_suffix: (TokenSet::new(terminals), true),
    };

    let start = Item {
        prod: augmented,
        dot: 0,
    };
    let mut end = TokenSet::new(terminals);
    end.insert(Symbol::END);

    let mut kernels: Vec<Vec<(Item, TokenSet)>> = vec![vec![(start, end)]];
    let mut cores: HashMap<Vec<Item>, usize> = HashMap::from([(vec![start], 0)]);
    let mut transitions: Vec<BTreeMap<Symbol, StateId>> = vec![BTreeMap::new()];
    let mut queue = VecDeque::from([0usize]);
    let mut queued = vec![true];

    while let Some(state) = queue.pop_front() {
        queued[state] = false;

        let mut successors: BTreeMap<Symbol, Vec<(Item, TokenSet)>> = BTreeMap::new();
        for (item, lookahead) in builder.closure(&kernels[state]) {
            if let Some(symbol) = builder.next_symbol(item) {
                successors
                    .entry(symbol)
                    .or_default()
                    .push((item.advance(), lookahead));
            }
        }

        for (symbol, mut kernel) in successors {
            kernel.sort_by_key(|(item, _)| *item);
            let core: Vec<Item> = kernel.iter().map(|(item, _)| *item).collect();

            let target = match cores.get(&core) {
                Some(&target) => {
                    let mut grew = false;
                    for ((_, lookahead), (_, existing)) in kernel.iter().zip(&mut kernels[target]) {
                        grew |= existing.union_with(lookahead);
                    }
                    if grew && !queued[target] {
                        queued[target] = true;
                        queue.push_back(target);
                    }
                    target
                }
                None => {
                    let target = kernels.len();
                    if target >= NO_STATE as usize {
                        return Err(GenerateError::TooManyStates(target));
                    }
                    kernels.push(kernel);
                    cores.insert(core, target);
                    transitions.push(BTreeMap::new());
                    queued.push(true);
                    queue.push_back(target);
                    target
                }
            };
            transitions[state].insert(symbol, target as StateId);
        }
    }

    let states = kernels.iter().map(|kernel| builder.closure(kernel)).collect();
    Ok(Automaton {
        states,
        transitions,
        augmented,
    })
}
