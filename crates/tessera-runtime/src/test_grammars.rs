use std::ops::Range;
use std::sync::Arc;

use tessera_core::Grammar;
use tessera_core::grammar::dsl::*;

use crate::language::{ExternalScanner, ExternalScannerDef, Language, ScanCursor};
use crate::parser::{ParseOutcome, Parser};
use crate::tree::{Node, Tree};

pub fn language(grammar: &Grammar) -> Arc<Language> {
    Arc::new(Language::new(tessera_generate::generate(grammar).unwrap()))
}

/// `let x = a + 1` with a left-associative `+`.
pub fn let_language() -> Arc<Language> {
    language(&let_grammar())
}

/// [`let_language`] with `identifier` as the word token, so `let` is a keyword.
pub fn let_keyword_language() -> Arc<Language> {
    language(&let_grammar().word("identifier"))
}

fn let_grammar() -> Grammar {
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
            .extra(pattern("\\s+"))
}

/// `a = 1; b = (a);`
pub fn statements_language() -> Arc<Language> {
    language(
        &Grammar::new("statements")
            .rule("program", repeat(sym("statement")))
            .rule(
                "statement",
                seq([
                    field("target", sym("identifier")),
                    string("="),
                    field("value", sym("_expression")),
                    string(";"),
                ]),
            )
            .rule(
                "_expression",
                choice([sym("identifier"), sym("number"), sym("parenthesized")]),
            )
            .rule(
                "parenthesized",
                seq([string("("), sym("_expression"), string(")")]),
            )
            .rule("identifier", pattern("[a-z]+"))
            .rule("number", pattern("[0-9]+"))
            .extra(pattern("\\s+")),
    )
}

/// `t * x = 1;` declares a pointer, `a * b;` multiplies. Both start with an
/// identifier followed by `*`, a declared conflict only the tokens after `b`
/// settle.
pub fn pointer_language() -> Arc<Language> {
    language(&pointer_grammar().conflict(["type", "expression"]))
}

pub fn pointer_grammar() -> Grammar {
    Grammar::new("pointer")
        .rule(
            "program",
            repeat(choice([sym("declaration"), sym("expression_statement")])),
        )
        .rule(
            "declaration",
            seq([
                field("type", sym("type")),
                string("*"),
                field("name", sym("identifier")),
                string("="),
                field("value", sym("number")),
                string(";"),
            ]),
        )
        .rule("expression_statement", seq([sym("expression"), string(";")]))
        .rule("type", sym("identifier"))
        .rule(
            "expression",
            choice([sym("identifier"), sym("number"), sym("product")]),
        )
        .rule(
            "product",
            prec_left(1, seq([sym("expression"), string("*"), sym("expression")])),
        )
        .rule("identifier", pattern("[a-z]+"))
        .rule("number", pattern("[0-9]+"))
        .extra(pattern("\\s+"))
}

/// Words and `'quoted'` strings, the latter produced by [`QuoteScanner`].
pub fn quoted_language() -> Arc<Language> {
    let grammar = Grammar::new("quoted")
        .rule(
            "document",
            repeat(choice([sym("word"), sym("quoted")])),
        )
        .rule("word", pattern("[a-z]+"))
        .extra(pattern("\\s+"))
        .external(sym("quoted"));
    let table = tessera_generate::generate(&grammar).unwrap();
    Arc::new(Language::new(table).with_scanner(ExternalScannerDef {
        create: || Box::new(QuoteScanner::default()),
    }))
}

/// Scans `'...'` with `''` as an escaped quote. Its state counts the strings
/// seen so far, so every quoted token leaves a different state behind.
#[derive(Default)]
pub struct QuoteScanner {
    seen: u32,
}

impl ExternalScanner for QuoteScanner {
    fn scan(&mut self, cursor: &mut ScanCursor<'_>, valid: &[bool]) -> Option<usize> {
        if !valid.first().copied().unwrap_or(false) || cursor.lookahead() != Some(b'\'') {
            return None;
        }
        cursor.advance();
        loop {
            match cursor.lookahead()? {
                b'\'' => {
                    cursor.advance();
                    if cursor.lookahead() == Some(b'\'') {
                        cursor.advance();
                        continue;
                    }
                    cursor.mark_end();
                    self.seen += 1;
                    return Some(0);
                }
                _ => cursor.advance(),
            }
        }
    }

    fn serialize(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.seen.to_le_bytes());
    }

    fn deserialize(&mut self, bytes: &[u8]) {
        self.seen = bytes
            .try_into()
            .map(u32::from_le_bytes)
            .unwrap_or_default();
    }
}

pub fn parse(language: &Arc<Language>, text: &str) -> ParseOutcome {
    Parser::new(Arc::clone(language)).parse(text).unwrap()
}

pub fn sexp(language: &Arc<Language>, text: &str) -> String {
    parse(language, text).tree.root_node().to_sexp()
}

/// Check every visible node of `tree`: children come in order without
/// overlapping, stay inside their parent, and only hidden leaves fill the
/// bytes between them.
pub fn assert_spans_nest(tree: &Tree, context: &str) {
    let table = tree.language().table();
    let hidden: Vec<Range<usize>> = tree
        .leaves()
        .filter(|leaf| !table.is_visible(leaf.kind_id()))
        .map(|leaf| leaf.byte_range())
        .filter(|range| !range.is_empty())
        .collect();
    let root = tree.root_node();
    assert_eq!(root.byte_range(), 0..tree.len(), "{context}");
    assert_children_nest(root, &hidden, context);
}

fn assert_children_nest(node: Node<'_>, hidden: &[Range<usize>], context: &str) {
    let mut pos = node.start_byte();
    for child in node.children() {
        assert!(
            child.start_byte() >= pos && child.end_byte() <= node.end_byte(),
            "{context}: {child:?} escapes {node:?} or overlaps its previous sibling"
        );
        assert_hidden_gap(pos..child.start_byte(), hidden, context);
        pos = child.end_byte();
        assert_children_nest(child, hidden, context);
    }
    assert_hidden_gap(pos..node.end_byte(), hidden, context);
}

fn assert_hidden_gap(gap: Range<usize>, hidden: &[Range<usize>], context: &str) {
    let mut at = gap.start;
    for leaf in hidden.iter().filter(|leaf| leaf.start < gap.end && leaf.end > gap.start) {
        assert!(
            leaf.start == at && leaf.end <= gap.end,
            "{context}: hidden leaf {leaf:?} does not tile gap {gap:?}"
        );
        at = leaf.end;
    }
    assert_eq!(at, gap.end, "{context}: gap {gap:?} holds visible text");
}
