//! Conflict resolution.
//!
//! The order is fixed and part of the table contract:
//! - reduce/reduce: higher precedence, then a production with declared
//!   associativity, then the earlier production
//! - shift/reduce: higher precedence wins; on a tie left associativity reduces,
//!   right associativity shifts, and no associativity shifts
//!
//! When the grammar declares the conflict, ties that precedence cannot break
//! are recorded as declared and the rejected action stays available to the
//! parser.

use std::cmp::Reverse;

use tessera_core::{Assoc, ProductionId, StateId, Symbol};
use tessera_table::{Action, ConflictKind, ConflictRecord, Resolution};

use crate::prepare::Production;

/// Candidate actions for one (state, lookahead) cell.
#[derive(Debug, Default)]
pub(crate) struct Cell {
    /// Shift target and the highest precedence among the shifting items.
    pub shift: Option<(StateId, i32)>,
    pub reduces: Vec<ProductionId>,
    pub accept: bool,
}

pub(crate) fn resolve(
    state: StateId,
    lookahead: Symbol,
    cell: &Cell,
    declared: bool,
    productions: &[Production],
    conflicts: &mut Vec<ConflictRecord>,
) -> Action {
    if cell.accept {
        return Action::Accept;
    }

    let mut record =
        |kind: ConflictKind, chosen: Action, rejected: Action, resolution: Resolution| {
            let unresolved = match kind {
                ConflictKind::ShiftReduce => resolution == Resolution::DefaultShift,
                ConflictKind::ReduceReduce => resolution != Resolution::Precedence,
            };
            conflicts.push(ConflictRecord {
                state,
                lookahead,
                kind,
                chosen,
                rejected,
                resolution,
                declared: declared && unresolved,
            });
        };

    let reduce = cell.reduces.iter().copied().min_by_key(|&p| {
        let prod = &productions[p as usize];
        (Reverse(prod.precedence()), prod.assoc().is_none(), p)
    });

    if let Some(best) = reduce {
        let winner = &productions[best as usize];
        for &other in cell.reduces.iter().filter(|&&p| p != best) {
            let loser = &productions[other as usize];
            let resolution = if winner.precedence() != loser.precedence() {
                Resolution::Precedence
            } else if winner.assoc().is_some() != loser.assoc().is_some() {
                Resolution::Associativity
            } else {
                Resolution::DeclarationOrder
            };
            record(
                ConflictKind::ReduceReduce,
                Action::Reduce(best),
                Action::Reduce(other),
                resolution,
            );
        }
    }

    match (cell.shift, reduce) {
        (Some((target, _)), None) => Action::Shift(target),
        (None, Some(p)) => Action::Reduce(p),
        (None, None) => Action::Error,
        (Some((target, shift_prec)), Some(p)) => {
            let prod = &productions[p as usize];
            let reduce_prec = prod.precedence();
            let (reduce_wins, resolution) = if reduce_prec != shift_prec {
                (reduce_prec > shift_prec, Resolution::Precedence)
            } else {
                match prod.assoc() {
                    Some(Assoc::Left) => (true, Resolution::Associativity),
                    Some(Assoc::Right) => (false, Resolution::Associativity),
                    None => (false, Resolution::DefaultShift),
                }
            };
            let (chosen, rejected) = if reduce_wins {
                (Action::Reduce(p), Action::Shift(target))
            } else {
                (Action::Shift(target), Action::Reduce(p))
            };
            record(ConflictKind::ShiftReduce, chosen, rejected, resolution);
            chosen
        }
    }
}
