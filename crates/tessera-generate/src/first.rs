//! FIRST sets and nullability.

use tessera_core::Symbol;

use crate::prepare::PreparedGrammar;

/// Bitset over terminal symbols.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TokenSet {
    words: Vec<u64>,
}

impl TokenSet {
    pub fn new(terminal_count: usize) -> Self {
        Self {
            words: vec![0; terminal_count.div_ceil(64)],
        }
    }

    pub fn insert(&mut self, symbol: Symbol) -> bool {
        let (word, bit) = (symbol.index() / 64, symbol.index() % 64);
        let mask = 1u64 << bit;
        let added = self.words[word] & mask == 0;
        self.words[word] |= mask;
        added
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        let (word, bit) = (symbol.index() / 64, symbol.index() % 64);
        self.words.get(word).is_some_and(|w| w & (1u64 << bit) != 0)
    }

    /// Union in place. Returns whether anything was added.
    pub fn union_with(&mut self, other: &TokenSet) -> bool {
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            let merged = *a | *b;
            changed |= merged != *a;
            *a = merged;
        }
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..64)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| Symbol((i * 64 + bit) as u16))
        })
    }
}

/// FIRST set of every production suffix.
#[derive(Debug)]
pub(crate) struct FirstSets {
    /// `suffixes[p][d]`: FIRST and nullability of `rhs[d..]` of production `p`.
    suffixes: Vec<Vec<(TokenSet, bool)>>,
    /// FIRST of each nonterminal.
    symbols: Vec<TokenSet>,
    terminal_count: usize,
}

impl FirstSets {
    pub fn compute(grammar: &PreparedGrammar) -> Self {
        let terminals = grammar.terminal_count as usize;
        let nonterminals = grammar.nonterminal_count as usize;
        let mut first = vec![TokenSet::new(terminals); nonterminals];
        let mut nullable = vec![false; nonterminals];

        let mut changed = true;
        while changed {
            changed = false;
            for prod in &grammar.productions {
                let lhs = grammar.nonterminal_index(prod.lhs);
                let mut all_nullable = true;
                for step in &prod.steps {
                    if grammar.is_terminal(step.symbol) {
                        changed |= first[lhs].insert(step.symbol);
                        all_nullable = false;
                        break;
                    }
                    let rhs = grammar.nonterminal_index(step.symbol);
                    if rhs != lhs {
                        let (target, source) = pair_mut(&mut first, lhs, rhs);
                        changed |= target.union_with(source);
                    }
                    if !nullable[rhs] {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable && !nullable[lhs] {
                    nullable[lhs] = true;
                    changed = true;
                }
            }
        }

        let suffixes = grammar
            .productions
            .iter()
            .map(|prod| {
                let mut out = vec![(TokenSet::new(terminals), true); prod.steps.len() + 1];
                for dot in (0..prod.steps.len()).rev() {
                    let symbol = prod.steps[dot].symbol;
                    let mut set = TokenSet::new(terminals);
                    let is_nullable = if grammar.is_terminal(symbol) {
                        set.insert(symbol);
                        false
                    } else {
                        let index = grammar.nonterminal_index(symbol);
                        set.union_with(&first[index]);
                        nullable[index]
                    };
                    let rest_nullable = is_nullable && out[dot + 1].1;
                    if is_nullable {
                        let rest = out[dot + 1].0.clone();
                        set.union_with(&rest);
                    }
                    out[dot] = (set, rest_nullable);
                }
                out
            })
            .collect();

        Self {
            suffixes,
            symbols: first,
            terminal_count: terminals,
        }
    }

    /// FIRST and nullability of production `prod` from position `dot` on.
    pub fn suffix(&self, prod: usize, dot: usize) -> &(TokenSet, bool) {
        &self.suffixes[prod][dot]
    }

    /// Whether a derivation of `symbol` can begin with `terminal`.
    pub fn starts_with(&self, symbol: Symbol, terminal: Symbol) -> bool {
        match symbol.index().checked_sub(self.terminal_count) {
            None => symbol == terminal,
            Some(index) => self.symbols[index].contains(terminal),
        }
    }
}

/// Mutable `a` and shared `b` from one slice, `a != b`.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &T) {
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &left[b])
    }
}
