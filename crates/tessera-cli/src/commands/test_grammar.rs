use std::sync::Arc;

use tessera_core::Grammar;
use tessera_core::grammar::dsl::*;
use tessera_runtime::{Language, ParseOutcome, Parser};

/// `let x = a + 1`
pub fn let_language() -> Arc<Language> {
    let grammar = Grammar::new("let")
        .rule(
            "let_decl",
            seq([
                string("let"),
                field("name", sym("identifier")),
                string("="),
                field("value", sym("_expression")),
            ]),
        )
        .rule(
            "_expression",
            choice([sym("number"), sym("identifier"), sym("binary")]),
        )
        .rule(
            "binary",
            prec_left(
                1,
                seq([
                    field("left", sym("_expression")),
                    string("+"),
                    field("right", sym("_expression")),
                ]),
            ),
        )
        .rule("identifier", pattern("[a-z]+"))
        .rule("number", pattern("[0-9]+"))
        .extra(pattern("\\s+"));
    Arc::new(Language::new(tessera_generate::generate(&grammar).unwrap()))
}

pub fn parse(text: &str) -> ParseOutcome {
    Parser::new(let_language()).parse(text).unwrap()
}
