use std::collections::BTreeMap;

use tessera_core::{StateId, Symbol};

use crate::first::FirstSets;
use crate::lalr::{Automaton, Item, build};
use crate::prepare::prepare;
use crate::test_grammars::let_grammar;

fn let_automaton() -> Automaton {
    let prepared = prepare(&let_grammar()).unwrap();
    let first = FirstSets::compute(&prepared);
    build(&prepared, &first).unwrap()
}

fn edges(pairs: &[(u16, StateId)]) -> BTreeMap<Symbol, StateId> {
    pairs.iter().map(|&(s, t)| (Symbol(s), t)).collect()
}

#[test]
fn states_are_numbered_breadth_first() {
    let automaton = let_automaton();

    assert_eq!(automaton.states.len(), 11);
    // "let" then let_decl
    assert_eq!(automaton.transitions[0], edges(&[(1, 1), (7, 2)]));
    // identifier, number, _expression, binary
    assert_eq!(automaton.transitions[4], edges(&[(5, 5), (6, 6), (8, 7), (9, 8)]));
}

#[test]
fn equal_cores_share_a_state() {
    let automaton = let_automaton();

    // After `+`, the operand states reached from state 4 are reused.
    assert_eq!(automaton.transitions[9], edges(&[(5, 5), (6, 6), (8, 10), (9, 8)]));
    assert_eq!(automaton.transitions[10], edges(&[(3, 9)]));
}

#[test]
fn merged_state_carries_union_of_lookaheads() {
    let automaton = let_automaton();

    let [(item, lookahead)] = automaton.states[5].as_slice() else {
        panic!("expected a single item");
    };
    assert_eq!(*item, Item { prod: 2, dot: 1 });
    assert_eq!(lookahead.iter().collect::<Vec<_>>(), [Symbol::END, Symbol(3)]);
}

#[test]
fn accept_state_holds_augmented_item() {
    let automaton = let_automaton();

    let [(item, lookahead)] = automaton.states[2].as_slice() else {
        panic!("expected a single item");
    };
    assert_eq!(
        *item,
        Item {
            prod: automaton.augmented,
            dot: 1
        }
    );
    assert_eq!(lookahead.iter().collect::<Vec<_>>(), [Symbol::END]);
}
