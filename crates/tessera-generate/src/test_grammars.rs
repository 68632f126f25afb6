use tessera_core::Grammar;
use tessera_core::grammar::dsl::*;

/// `let x = a + 1` with a left-associative `+`.
pub fn let_grammar() -> Grammar {
    let_grammar_with(|body| prec_left(1, body))
}

/// The let grammar with `binary` wrapped by `wrap` instead of `prec_left(1, ..)`.
pub fn let_grammar_with(wrap: impl Fn(tessera_core::Rule) -> tessera_core::Rule) -> Grammar {
    Grammar::new("let")
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
            wrap(seq([
                field("left", sym("_expression")),
                string("+"),
                field("right", sym("_expression")),
            ])),
        )
        .rule("identifier", pattern("[a-z]+"))
        .rule("number", pattern("[0-9]+"))
        .extra(pattern("\\s+"))
}

/// Sums and products with the usual binding.
pub fn arithmetic_grammar() -> Grammar {
    Grammar::new("arithmetic")
        .rule(
            "expression",
            choice([sym("sum"), sym("product"), sym("number")]),
        )
        .rule(
            "sum",
            prec_left(1, seq([sym("expression"), string("+"), sym("expression")])),
        )
        .rule(
            "product",
            prec_left(2, seq([sym("expression"), string("*"), sym("expression")])),
        )
        .rule("number", pattern("[0-9]+"))
        .extra(pattern("\\s+"))
}
