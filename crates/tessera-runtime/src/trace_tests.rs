use std::sync::Arc;

use tessera_core::Colors;

use crate::parser::{Parser, PrintTracer, Verbosity};
use crate::test_grammars::{let_language, statements_language};
use crate::tree::Edit;

fn trace(text: &str, verbosity: Verbosity) -> Vec<String> {
    let language = let_language();
    let tracer = PrintTracer::new(language.table(), text, verbosity, Colors::OFF);
    let mut parser = Parser::new(Arc::clone(&language)).with_tracer(tracer);
    parser.parse(text).unwrap();
    parser.into_tracer().lines().to_vec()
}

#[test]
fn default_verbosity_shows_parser_actions() {
    let lines = trace("let x = 1", Verbosity::Default);

    assert_eq!(lines.first().unwrap(), r#"shift    S0 "let" -> S1"#);
    assert!(lines.iter().any(|l| l == "reduce   P0 let_decl (4) -> S2"));
    assert_eq!(lines.last().unwrap(), "accept   9 bytes");
    assert!(!lines.iter().any(|l| l.starts_with("lex")));
    assert!(!lines.iter().any(|l| l.starts_with("extra")));
}

#[test]
fn verbose_adds_tokens() {
    let lines = trace("let x = 1", Verbosity::Verbose);

    assert!(lines.first().unwrap().starts_with(r#"lex      "let" 0..3 L"#));
    assert!(lines.iter().any(|l| l == r#"extra    "\\s+" 3..4"#));
    assert_eq!(lines.iter().filter(|l| l.starts_with("lex")).count(), 8);
}

#[test]
fn very_verbose_adds_token_text() {
    let lines = trace("let x = 1", Verbosity::VeryVerbose);

    assert!(lines.iter().any(|l| l == r#"extra    "\\s+" 3..4 " ""#));
}

#[test]
fn reuse_is_traced() {
    let language = statements_language();
    let old_text = "a = 1;\nb = 2;\n";
    let new_text = "a = 1;\nb = 3;\n";
    let old = Parser::new(Arc::clone(&language)).parse(old_text).unwrap().tree;

    let tracer = PrintTracer::new(language.table(), new_text, Verbosity::Default, Colors::OFF);
    let mut parser = Parser::new(Arc::clone(&language)).with_tracer(tracer);
    let edit = Edit::diff(old_text, new_text).unwrap();
    parser.reparse(new_text, &old, &[edit]).unwrap();
    let lines = parser.into_tracer().lines().to_vec();

    // Whole statements are reported at default verbosity, single leaves are not.
    assert!(lines.iter().any(|l| l.starts_with("reuse*") && l.ends_with(" 0..6")));
    assert!(!lines.iter().any(|l| l.starts_with("reuse ")));
}

#[test]
fn colors_wrap_event_names() {
    let language = let_language();
    let tracer = PrintTracer::new(language.table(), "let", Verbosity::Default, Colors::ON);
    let mut parser = Parser::new(Arc::clone(&language)).with_tracer(tracer);
    parser.parse("let").unwrap();
    let lines = parser.into_tracer().lines().to_vec();

    assert!(lines[0].starts_with(&format!("{}shift", Colors::ON.blue)));
}
