use tessera_core::grammar::dsl::*;
use tessera_core::{Grammar, Symbol};
use tessera_table::dump::{DumpOptions, dump};
use tessera_table::{Action, ConflictKind, ConflictRecord, ParseTable, Resolution};

use crate::test_grammars::{arithmetic_grammar, let_grammar, let_grammar_with};
use crate::{GenerateError, generate};

fn conflict_on<'t>(table: &'t ParseTable, lookahead: &str) -> Vec<&'t ConflictRecord> {
    let Some(symbol) = table.symbol_for_name(lookahead, false) else {
        panic!("no token {lookahead:?}");
    };
    table
        .conflicts()
        .iter()
        .filter(|c| c.lookahead == symbol)
        .collect()
}

#[test]
fn let_grammar_summary() {
    let table = generate(&let_grammar()).unwrap();
    insta::assert_snapshot!(dump(&table, &DumpOptions::default()), @r#"
    [symbols]
    0 end      $end hidden
    1 token    "let"
    2 token    "="
    3 token    "+"
    4 token    "\\s+" hidden extra
    5 token    identifier
    6 token    number
    7 rule     let_decl
    8 rule     _expression hidden
    9 rule     binary

    [tokens]
    1 "let"
    2 "="
    3 "+"
    4 /(?:\s+)/
    5 /(?:[a-z]+)/
    6 /(?:[0-9]+)/

    [productions]
    P0 let_decl -> "let" name:identifier "=" value:_expression
    P1 _expression -> number
    P2 _expression -> identifier
    P3 _expression -> binary
    P4 binary -> left:_expression "+" right:_expression  ; prec 1, left

    [lex_modes]
    L0 "let" "\\s+"
    L1 "\\s+" identifier
    L2 "\\s+"
    L3 "=" "\\s+"
    L4 "\\s+" identifier number
    L5 "+" "\\s+"
    L6 "let" "=" "+" "\\s+" identifier number  ; error mode

    [conflicts]
    S10 "+" shift/reduce: reduce P4 over shift S09  ; associativity
    "#);
}

#[test]
fn let_grammar_actions() {
    let table = generate(&let_grammar()).unwrap();
    let plus = Symbol(3);

    assert_eq!(table.state_count(), 11);
    assert_eq!(table.action(0, Symbol(1)), Action::Shift(1));
    assert_eq!(table.action(2, Symbol::END), Action::Accept);
    assert_eq!(table.action(7, Symbol::END), Action::Reduce(0));
    assert_eq!(table.action(7, plus), Action::Shift(9));
    assert_eq!(table.action(10, plus), Action::Reduce(4));
    assert_eq!(table.action(10, Symbol::END), Action::Reduce(4));
    assert_eq!(table.goto(4, Symbol(8)), Some(7));
    assert_eq!(table.goto(0, Symbol(8)), None);
    assert_eq!(table.field_id("value"), Some(4));
    assert!(table.is_extra(Symbol(4)));
}

#[test]
fn right_associativity_shifts() {
    let table = generate(&let_grammar_with(|body| prec_right(1, body))).unwrap();

    assert_eq!(table.action(10, Symbol(3)), Action::Shift(9));
    let conflicts = conflict_on(&table, "+");
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].rejected, Action::Reduce(4));
    assert_eq!(conflicts[0].resolution, Resolution::Associativity);
}

#[test]
fn unresolved_shift_reduce_defaults_to_shift() {
    let table = generate(&let_grammar_with(|body| body)).unwrap();

    assert_eq!(table.action(10, Symbol(3)), Action::Shift(9));
    let conflicts = conflict_on(&table, "+");
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::ShiftReduce);
    assert_eq!(conflicts[0].resolution, Resolution::DefaultShift);
}

#[test]
fn higher_precedence_binds_tighter() {
    let table = generate(&arithmetic_grammar()).unwrap();
    let sum = 3;
    let product = 4;

    // `a + b . * c` shifts.
    let star = conflict_on(&table, "*");
    let after_sum = star
        .iter()
        .find(|c| c.rejected == Action::Reduce(sum) || c.chosen == Action::Reduce(sum));
    let Some(after_sum) = after_sum else {
        panic!("no conflict between sum and `*`");
    };
    assert!(matches!(after_sum.chosen, Action::Shift(_)));
    assert_eq!(after_sum.resolution, Resolution::Precedence);

    // `a * b . + c` reduces.
    let plus = conflict_on(&table, "+");
    let Some(after_product) = plus.iter().find(|c| c.chosen == Action::Reduce(product)) else {
        panic!("no conflict between product and `+`");
    };
    assert_eq!(after_product.resolution, Resolution::Precedence);
}

#[test]
fn reduce_reduce_prefers_earlier_production() {
    let grammar = Grammar::new("rr")
        .rule("start", choice([sym("a"), sym("b")]))
        .rule("a", sym("word"))
        .rule("b", sym("word"))
        .rule("word", pattern("[a-z]+"));
    let table = generate(&grammar).unwrap();

    let [conflict] = table.conflicts() else {
        panic!("expected one conflict");
    };
    assert_eq!(conflict.kind, ConflictKind::ReduceReduce);
    assert_eq!(conflict.lookahead, Symbol::END);
    assert_eq!(conflict.chosen, Action::Reduce(2));
    assert_eq!(conflict.rejected, Action::Reduce(3));
    assert_eq!(conflict.resolution, Resolution::DeclarationOrder);
}

#[test]
fn reduce_reduce_prefers_higher_precedence() {
    let grammar = Grammar::new("rr")
        .rule("start", choice([sym("a"), sym("b")]))
        .rule("a", sym("word"))
        .rule("b", prec(1, sym("word")))
        .rule("word", pattern("[a-z]+"));
    let table = generate(&grammar).unwrap();

    let [conflict] = table.conflicts() else {
        panic!("expected one conflict");
    };
    assert_eq!(conflict.chosen, Action::Reduce(3));
    assert_eq!(conflict.rejected, Action::Reduce(2));
    assert_eq!(conflict.resolution, Resolution::Precedence);
}

#[test]
fn external_tokens_get_their_own_lex_list() {
    let grammar = Grammar::new("ext")
        .rule("start", seq([sym("indent"), sym("word")]))
        .rule("word", pattern("[a-z]+"))
        .external(sym("indent"));
    let table = generate(&grammar).unwrap();

    let indent = Symbol(2);
    assert!(table.is_external(indent));
    assert_eq!(table.external_index(indent), Some(0));
    let mode = table.lex_mode(table.lex_mode_for_state(0));
    assert!(mode.tokens.is_empty());
    assert_eq!(mode.externals, [indent]);
}

#[test]
fn generation_is_deterministic() {
    let first = generate(&let_grammar()).unwrap().to_bytes().unwrap();
    let second = generate(&let_grammar()).unwrap().to_bytes().unwrap();
    assert_eq!(first, second);
}

#[test]
fn token_matching_empty_string() {
    let grammar = Grammar::new("empty")
        .rule("start", seq([string("x"), sym("spaces")]))
        .rule("spaces", pattern(" *"));
    let err = generate(&grammar).unwrap_err();
    insta::assert_snapshot!(err, @"token `spaces` matches the empty string");
}

#[test]
fn invalid_token_pattern() {
    let grammar = Grammar::new("bad")
        .rule("start", seq([string("x"), sym("word")]))
        .rule("word", pattern("[a-"));
    let err = generate(&grammar).unwrap_err();
    let GenerateError::InvalidPattern { rule, pattern, .. } = err else {
        panic!("expected an invalid pattern error");
    };
    assert_eq!(rule, "word");
    assert_eq!(pattern, "(?:[a-)");
}

#[test]
fn declared_conflict_keeps_both_reductions() {
    let grammar = Grammar::new("rr")
        .rule("start", choice([sym("a"), sym("b")]))
        .rule("a", sym("word"))
        .rule("b", sym("word"))
        .rule("word", pattern("[a-z]+"))
        .conflict(["a", "b"]);
    let table = generate(&grammar).unwrap();

    let [conflict] = table.conflicts() else {
        panic!("expected one conflict");
    };
    assert!(conflict.declared);
    assert_eq!(
        table.alternatives(conflict.state, Symbol::END),
        Some(&[Action::Reduce(2), Action::Reduce(3)][..])
    );
}

#[test]
fn undeclared_or_precedence_resolved_conflicts_are_not_kept() {
    let other_rules = Grammar::new("rr")
        .rule("start", choice([sym("a"), sym("b")]))
        .rule("a", sym("word"))
        .rule("b", sym("word"))
        .rule("word", pattern("[a-z]+"))
        .conflict(["start", "a"]);
    let by_precedence = Grammar::new("rr")
        .rule("start", choice([sym("a"), sym("b")]))
        .rule("a", sym("word"))
        .rule("b", prec(1, sym("word")))
        .rule("word", pattern("[a-z]+"))
        .conflict(["a", "b"]);

    for grammar in [other_rules, by_precedence] {
        let table = generate(&grammar).unwrap();
        let [conflict] = table.conflicts() else {
            panic!("expected one conflict");
        };
        assert!(!conflict.declared);
        assert_eq!(table.alternatives(conflict.state, Symbol::END), None);
    }
}

#[test]
fn word_token_extracts_keywords() {
    let grammar = Grammar::new("kw")
        .rule(
            "start",
            choice([
                seq([string("do"), string("if"), sym("name")]),
                seq([sym("name"), string("="), sym("name")]),
            ]),
        )
        .rule("name", pattern("[a-z]+"))
        .word("name");
    let table = generate(&grammar).unwrap();

    let (kw_do, kw_if, eq, name) = (Symbol(1), Symbol(2), Symbol(3), Symbol(4));
    assert_eq!(table.word_token(), Some(name));
    assert_eq!(table.data().keywords, [kw_do, kw_if]);
    assert_eq!(table.keyword(b"if"), Some(kw_if));
    assert_eq!(table.keyword(b"="), None);
    assert_eq!(table.symbol_name(eq), "=");

    // Where only `if` is valid the word token is scanned too, so `iffy` is
    // one identifier instead of `if` followed by `fy`.
    let Action::Shift(after_do) = table.action(0, kw_do) else {
        panic!("expected a shift on `do`");
    };
    let mode = table.lex_mode(table.lex_mode_for_state(after_do));
    assert_eq!(mode.tokens, [kw_if, name]);
}
