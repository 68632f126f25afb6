use std::ops::Range;
use std::sync::Arc;

use tessera_runtime::{Edit, Node, Parser, Tree};

use crate::{GRAMMAR_JSON, language, tree_sitter_tessera};

#[test]
fn language_is_shared() {
    let a = language();
    let b = language();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.name(), "tessera");
}

#[test]
fn ffi_entry_point_is_stable() {
    let first = tree_sitter_tessera();
    let second = tree_sitter_tessera();

    assert!(!first.is_null());
    assert_eq!(first, second);
    assert_eq!(first, Arc::as_ptr(&language()));
}

#[test]
fn grammar_json_is_embedded() {
    assert!(GRAMMAR_JSON.contains(r#""name": "tessera""#));
}

#[test]
fn empty_source() {
    let tree = Parser::new(language()).parse("").unwrap().tree;

    assert_eq!(tree.root_node().kind(), "source_file");
    assert!(!tree.has_error());
}

#[test]
fn module_item() {
    let tree = Parser::new(language()).parse("module m {}").unwrap().tree;

    insta::assert_snapshot!(tree.root_node().to_sexp(), @"(source_file (module_item name: (identifier) body: (block)))");
}

#[test]
fn malformed_source_keeps_every_byte() {
    let text = "module m { fn ( }";
    let tree = Parser::new(language()).parse(text).unwrap().tree;

    assert!(tree.has_error());
    let rebuilt: String = tree.leaves().map(|leaf| leaf.text()).collect();
    assert_eq!(rebuilt, text);
    assert_eq!(tree.root_node().byte_range(), 0..text.len());
}

const VALID: &[&str] = &[
    "module m {}",
    "using std:io;",
    "fn void main() {}",
    "pub fn i32 add(i32 a, i32 b) { a + b }",
    "extern fn void puts(&str s);",
    "const i32 LIMIT := 10;",
    "pub(crate) const u8 MASK := 0xff;",
    "fn void k() { i32 x := 1 + 2 * 3; }",
    "fn void k() { mut i32 x := 0; x += 1; }",
    "fn void k() { self:f(); }",
    "fn void k() { a:b:c; }",
    "fn void k() { x := y as a:B; }",
    "fn void k() { x := y as u8; }",
    "fn void k() { foo(1, \"two\", 'c', 4.5); }",
    "fn void k() { if a < b { a } else if a = b { 0 } else { b } }",
    "fn void k() { while i < 10 { i += 1; } }",
    "fn void k() { for i32 i in items { print(i); } }",
    "fn void k() { for i32 i := 0, i < n, i += 1 { } }",
    "fn void k() { match x { 1 -> a, 2 .. 5 -> b, _ -> c } }",
    "fn void k() { match x { Some:v if v > 0 -> { v } _ -> 0 } }",
    "fn void k() { $outer: while true { break; } }",
    "fn i32 k(&mut Point p) { p.x <> p.y }",
    "fn void k() { |> -x; }",
    "fn void k() { &mut a:b:C c := &mut d; }",
    "fn void k() { std:io:print(x.len()); }",
    "fn void k(self) { self.count := self.count + 1; }",
    "// comment\nfn void k() { /* block */ }",
    "fn void k() { i32 _ := f()..; }",
    "module outer {}\nmodule inner { fn void f() {} }",
    "fn void k() { x := -1; y := !z; w := *p; }",
];

const EDITED: &[&str] = &[
    "ifas (ch*/aa.532  maé ->",
    "fn void k() { a:b:c; x := y as a:B; }",
    "module m { pub fn i32 f(i32 a) { |> a * 2; } }",
];

const SNIPPETS: &[&str] = &[
    "a", "fn", " ", "\n", ":", ";", "(", ")", "{", "}", ".", "*", "/", "->", "1", "2.5", ":=", "as",
    "if", "\"", "'", "x y", "", "é", "//", "/*",
];

/// Small deterministic generator so failures reproduce.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

/// Replace up to four characters at a random char boundary with a snippet.
fn random_edit(rng: &mut XorShift, text: &str) -> (String, Edit) {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain([text.len()])
        .collect();
    let start = rng.below(bounds.len());
    let old_end = start + rng.below(bounds.len() - start).min(4);
    let (start, old_end) = (bounds[start], bounds[old_end]);
    let snippet = SNIPPETS[rng.below(SNIPPETS.len())];

    let new_text = format!("{}{snippet}{}", &text[..start], &text[old_end..]);
    (new_text, Edit::new(start, old_end, start + snippet.len()))
}

/// Check every visible node: children come in order without overlapping, stay
/// inside their parent, and only hidden leaves fill the bytes between them.
fn assert_spans_nest(tree: &Tree, context: &str) {
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

fn assert_same_tree(incremental: &Tree, fresh: &Tree, context: &str) {
    assert_eq!(
        incremental.root_node().to_raw_sexp(),
        fresh.root_node().to_raw_sexp(),
        "{context}"
    );
    assert_eq!(incremental.error_count(), fresh.error_count(), "{context}");
    assert_spans_nest(incremental, context);
}

#[test]
fn valid_programs_parse_without_errors() {
    let mut parser = Parser::new(language());

    for &text in VALID {
        let outcome = parser.parse(text).unwrap();
        assert!(!outcome.has_error, "{text:?}: {}", outcome.tree.root_node().to_sexp());
        assert_spans_nest(&outcome.tree, text);
    }
}

#[test]
fn scoped_paths_in_statements_and_casts() {
    let mut parser = Parser::new(language());

    for text in [
        "fn void k() { self:f(); }",
        "fn void k() { a:b:c; }",
        "fn void k() { x := y as a:B; }",
    ] {
        let outcome = parser.parse(text).unwrap();
        assert!(!outcome.has_error, "{text:?}: {}", outcome.tree.root_node().to_sexp());
        assert!(outcome.stats.decisions > 0, "{text:?}");
    }
}

#[test]
fn keyword_out_of_place_is_an_error() {
    let mut parser = Parser::new(language());

    assert!(!parser.parse("using std:io;").unwrap().has_error);
    assert!(parser.parse("module m { using std:io; }").unwrap().has_error);
}

#[test]
fn reparse_after_relexing_edit_matches_fresh_parse() {
    let mut parser = Parser::new(language());
    let old_text = "ifas (ch*/aa.532  maé ->";
    let new_text = "ifif h*/aa.532  maé ->";
    let old = parser.parse(old_text).unwrap().tree;

    let outcome = parser.reparse(new_text, &old, &[Edit::new(2, 7, 5)]).unwrap();
    let fresh = parser.parse(new_text).unwrap().tree;

    assert_same_tree(&outcome.tree, &fresh, new_text);
}

#[test]
fn random_edits_match_fresh_parses() {
    let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
    let mut parser = Parser::new(language());

    for &start in EDITED {
        let mut text = start.to_string();
        let mut tree = parser.parse(&text).unwrap().tree;

        for round in 0..60 {
            let (new_text, edit) = random_edit(&mut rng, &text);
            let context = format!("{text:?} -> {new_text:?} via {edit:?} (round {round})");

            let outcome = parser.reparse(&new_text, &tree, &[edit]).unwrap();
            let fresh = parser.parse(&new_text).unwrap().tree;
            assert_same_tree(&outcome.tree, &fresh, &context);

            text = new_text;
            tree = outcome.tree;
        }
    }
}
