use tessera_core::grammar::dsl::*;
use tessera_core::{Grammar, Precedence, Rule, Symbol};
use tessera_table::SymbolKind;

use crate::GenerateError;
use crate::prepare::{LexicalKind, PreparedGrammar, prepare};

fn names(p: &PreparedGrammar) -> Vec<&str> {
    p.symbols.iter().map(|s| s.name.as_str()).collect()
}

fn rhs(p: &PreparedGrammar, index: usize) -> Vec<u16> {
    p.productions[index].steps.iter().map(|s| s.symbol.0).collect()
}

#[test]
fn literals_precede_patterns() {
    let grammar = Grammar::new("order")
        .rule("start", seq([sym("word"), string("="), sym("number"), string(";")]))
        .rule("word", pattern("[a-z]+"))
        .rule("number", pattern("[0-9]+"));
    let p = prepare(&grammar).unwrap();

    assert_eq!(names(&p), ["end", "=", ";", "word", "number", "start"]);
    assert_eq!(p.terminal_count, 5);
    assert_eq!(p.external_start, 5);
    assert_eq!(p.start_symbol, Symbol(5));
    assert_eq!(rhs(&p, 0), [3, 1, 4, 2]);
}

#[test]
fn repeat_becomes_hidden_left_recursive_aux() {
    let grammar = Grammar::new("list")
        .rule("list", seq([string("["), repeat(sym("item")), string("]")]))
        .rule("item", pattern("[a-z]+"));
    let p = prepare(&grammar).unwrap();

    assert_eq!(names(&p), ["end", "[", "]", "item", "list", "list_repeat1"]);
    let aux = &p.symbols[5];
    assert_eq!(aux.kind, SymbolKind::Auxiliary);
    assert!(!aux.visible);

    assert_eq!(p.productions.len(), 4);
    assert_eq!(rhs(&p, 0), [1, 5, 2]);
    assert_eq!(rhs(&p, 1), [1, 2]);
    assert_eq!(rhs(&p, 2), [5, 3]);
    assert_eq!(rhs(&p, 3), [3]);
}

#[test]
fn identical_repeats_share_one_aux() {
    let grammar = Grammar::new("list")
        .rule("start", choice([repeat1(sym("item")), seq([string("("), repeat1(sym("item"))])]))
        .rule("item", pattern("[a-z]+"));
    let p = prepare(&grammar).unwrap();

    let aux_count = p
        .symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Auxiliary)
        .count();
    assert_eq!(aux_count, 1);
}

#[test]
fn inline_rule_is_substituted() {
    let grammar = Grammar::new("inline")
        .rule("pair", seq([sym("_value"), string(","), sym("_value")]))
        .rule("_value", choice([sym("number"), sym("name")]))
        .rule("number", pattern("[0-9]+"))
        .rule("name", pattern("[a-z]+"))
        .inline_rule("_value");
    let p = prepare(&grammar).unwrap();

    assert!(!names(&p).contains(&"_value"));
    assert_eq!(p.productions.len(), 4);
}

#[test]
fn fields_are_sorted_and_start_at_one() {
    let grammar = Grammar::new("fields")
        .rule("start", seq([field("value", sym("word")), field("key", sym("word"))]))
        .rule("word", pattern("[a-z]+"));
    let p = prepare(&grammar).unwrap();

    assert_eq!(p.field_names, ["", "key", "value"]);
    let fields: Vec<_> = p.productions[0].steps.iter().map(|s| s.field).collect();
    assert_eq!(fields, [Some(2), Some(1)]);
}

#[test]
fn precedence_and_assoc_apply_to_steps() {
    let grammar = Grammar::new("prec")
        .rule("start", prec_right(3, seq([sym("word"), prec(5, sym("word"))])))
        .rule("word", pattern("[a-z]+"));
    let p = prepare(&grammar).unwrap();

    let steps = &p.productions[0].steps;
    assert_eq!(steps[0].precedence, 3);
    assert_eq!(steps[1].precedence, 5);
    assert_eq!(steps[1].assoc, Some(tessera_core::Assoc::Right));
    assert_eq!(p.productions[0].precedence(), 5);
}

#[test]
fn alias_reuses_existing_symbol_or_adds_one() {
    let grammar = Grammar::new("alias")
        .rule(
            "start",
            seq([
                sym("identifier"),
                alias(sym("word"), "identifier", true),
                alias(sym("word"), "label", true),
            ]),
        )
        .rule("identifier", pattern("[A-Z]+"))
        .rule("word", pattern("[a-z]+"));
    let p = prepare(&grammar).unwrap();

    assert_eq!(names(&p), ["end", "identifier", "word", "start", "label"]);
    assert_eq!(p.symbols[4].kind, SymbolKind::Alias);
    assert_eq!(p.nonterminal_count, 1);

    let aliases: Vec<_> = p.productions[0].steps.iter().map(|s| s.alias).collect();
    assert_eq!(aliases, [None, Some(Symbol(1)), Some(Symbol(4))]);
}

#[test]
fn string_rule_used_anonymously_stays_nonterminal() {
    let grammar = Grammar::new("kw")
        .rule("start", seq([sym("self_kw"), sym("mut_kw"), string("mut")]))
        .rule("self_kw", string("self"))
        .rule("mut_kw", string("mut"));
    let p = prepare(&grammar).unwrap();

    assert_eq!(names(&p), ["end", "self_kw", "mut", "start", "mut_kw"]);
    assert_eq!(p.symbols[1].kind, SymbolKind::Token);
    assert!(p.symbols[1].named);
    assert_eq!(p.symbols[4].kind, SymbolKind::NonTerminal);
    assert_eq!(p.tokens[0].kind, LexicalKind::Literal("self".into()));
}

#[test]
fn token_precedence_is_lexical_priority() {
    let grammar = Grammar::new("kw")
        .rule("start", seq([sym("kw_if"), sym("word")]))
        .rule("kw_if", token(prec(2, string("if"))))
        .rule("word", pattern("[a-z]+"));
    let p = prepare(&grammar).unwrap();

    assert_eq!(p.tokens[0].priority, 2);
    assert_eq!(p.tokens[0].kind, LexicalKind::Literal("if".into()));
    assert_eq!(p.tokens[1].priority, 0);
}

#[test]
fn extras_are_walked_first() {
    let grammar = Grammar::new("extras")
        .rule("start", sym("word"))
        .rule("word", pattern("[a-z]+"))
        .rule("comment", token(seq([string("#"), pattern(".*")])))
        .extra(pattern("\\s"))
        .extra(sym("comment"));
    let p = prepare(&grammar).unwrap();

    assert_eq!(p.extras, [Symbol(1), Symbol(2)]);
    assert_eq!(p.symbols[1].name, "\\s");
    assert!(!p.symbols[1].visible);
    assert_eq!(p.symbols[2].name, "comment");
    assert!(p.symbols[2].visible);
}

#[test]
fn externals_follow_internal_tokens() {
    let grammar = Grammar::new("ext")
        .rule("start", seq([sym("indent"), sym("word")]))
        .rule("word", pattern("[a-z]+"))
        .external(sym("indent"));
    let p = prepare(&grammar).unwrap();

    assert_eq!(names(&p), ["end", "word", "indent", "start"]);
    assert_eq!(p.external_start, 2);
    assert_eq!(p.terminal_count, 3);
    assert_eq!(p.symbols[2].kind, SymbolKind::External);
}

#[test]
fn empty_grammar() {
    let err = prepare(&Grammar::new("empty")).unwrap_err();
    assert!(matches!(err, GenerateError::EmptyGrammar));
}

#[test]
fn lexical_start_rule() {
    let grammar = Grammar::new("lex").rule("word", pattern("[a-z]+"));
    let err = prepare(&grammar).unwrap_err();
    insta::assert_snapshot!(err, @"start rule `word` is a token");
}

#[test]
fn undefined_symbol() {
    let grammar = Grammar::new("undef").rule("start", seq([string("x"), sym("missing")]));
    let err = prepare(&grammar).unwrap_err();
    insta::assert_snapshot!(err, @"rule `start` references undefined symbol `missing`");
}

#[test]
fn named_precedence_is_unsupported() {
    let rule = Rule::Prec {
        value: Precedence::Name("sum".into()),
        content: Box::new(string("x")),
    };
    let grammar = Grammar::new("named").rule("start", seq([rule, string("y")]));
    let err = prepare(&grammar).unwrap_err();
    insta::assert_snapshot!(err, @"rule `start`: named precedence is not supported");
}

#[test]
fn symbol_inside_token_is_unsupported() {
    let grammar = Grammar::new("tok")
        .rule("start", seq([token(sym("word")), string("x")]))
        .rule("word", pattern("[a-z]+"));
    let err = prepare(&grammar).unwrap_err();
    insta::assert_snapshot!(err, @"rule `start`: symbol inside token() is not supported");
}

#[test]
fn recursive_inline_is_unsupported() {
    let grammar = Grammar::new("rec")
        .rule("start", seq([string("x"), sym("_a")]))
        .rule("_a", seq([string("y"), sym("_a")]))
        .inline_rule("_a");
    let err = prepare(&grammar).unwrap_err();
    insta::assert_snapshot!(err, @"rule `start`: recursive inline rule is not supported");
}

#[test]
fn expected_conflicts_lower_to_owning_rules() {
    let grammar = Grammar::new("list")
        .rule("list", seq([string("["), repeat(sym("entry")), string("]")]))
        .rule("entry", choice([sym("item"), sym("_pair")]))
        .rule("_pair", seq([sym("item"), sym("item")]))
        .rule("item", pattern("[a-z]+"))
        .inline_rule("_pair")
        .conflict(["entry", "list", "item", "_pair"]);
    let p = prepare(&grammar).unwrap();

    assert_eq!(names(&p), ["end", "[", "]", "item", "list", "entry", "list_repeat1"]);
    assert_eq!(p.rule_owner(Symbol(6)), Symbol(4));
    assert_eq!(p.rule_owner(Symbol(5)), Symbol(5));
    assert_eq!(p.expected_conflicts, [vec![Symbol(4), Symbol(5)]]);
}

#[test]
fn undefined_conflict_rule() {
    let grammar = Grammar::new("c")
        .rule("start", string("x"))
        .conflict(["start", "nope"]);
    let err = prepare(&grammar).unwrap_err();
    insta::assert_snapshot!(err, @"rule `conflicts` references undefined symbol `nope`");
}

#[test]
fn word_resolves_to_its_token() {
    let grammar = Grammar::new("w")
        .rule("start", seq([string("if"), sym("name")]))
        .rule("name", pattern("[a-z]+"))
        .word("name");
    let p = prepare(&grammar).unwrap();
    assert_eq!(names(&p), ["end", "if", "name", "start"]);
    assert_eq!(p.word, Some(Symbol(2)));
}

#[test]
fn nonterminal_word_is_unsupported() {
    let grammar = Grammar::new("w")
        .rule("start", seq([string("if"), sym("name")]))
        .rule("name", pattern("[a-z]+"))
        .word("start");
    let err = prepare(&grammar).unwrap_err();
    insta::assert_snapshot!(err, @"rule `word`: non-token word rule is not supported");
}
