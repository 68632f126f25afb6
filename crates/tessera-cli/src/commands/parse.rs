//! Parse a source file and print its tree.

use std::path::PathBuf;

use serde_json::{Value, json};
use tessera_runtime::{FuelLimits, Node, Parser, Tree};

use super::diagnostics;
use super::run_common::{LanguageSource, exit_on_parse_error, load_source, or_exit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Named nodes with field labels.
    Sexp,
    /// Every visible node with byte ranges.
    Raw,
    Json,
}

pub struct ParseArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub language: LanguageSource,
    pub format: OutputFormat,
    pub limits: FuelLimits,
    pub color: bool,
}

pub fn run(args: ParseArgs) {
    let language = or_exit(args.language.load());
    let source = or_exit(load_source(
        args.source_path.as_deref(),
        args.source_text.as_deref(),
    ));

    let mut parser = Parser::new(language).with_limits(args.limits);
    let outcome = match parser.parse(&source) {
        Ok(outcome) => outcome,
        Err(e) => exit_on_parse_error(e),
    };

    println!("{}", format_tree(&outcome.tree, args.format));

    if outcome.has_error {
        let found = diagnostics::collect(&outcome.tree);
        let path = args.source_path.as_ref().map(|p| p.display().to_string());
        eprint!(
            "{}",
            diagnostics::render(&found, &source, path.as_deref(), args.color)
        );
        std::process::exit(1);
    }
}

pub fn format_tree(tree: &Tree, format: OutputFormat) -> String {
    let root = tree.root_node();
    match format {
        OutputFormat::Sexp => root.to_sexp(),
        OutputFormat::Raw => root.to_raw_sexp(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&node_to_json(root)).expect("JSON values always serialize")
        }
    }
}

/// JSON object for a node and its visible descendants.
pub fn node_to_json(node: Node<'_>) -> Value {
    let mut value = json!({
        "kind": node.kind(),
        "named": node.is_named(),
        "start_byte": node.start_byte(),
        "end_byte": node.end_byte(),
        "start_point": node.start_position(),
        "end_point": node.end_position(),
    });

    if let Some(field) = node.field_name() {
        value["field"] = json!(field);
    }
    if node.is_error() {
        value["error"] = json!(true);
    }
    if node.is_missing() {
        value["missing"] = json!(true);
    }

    let children: Vec<Value> = node.children().into_iter().map(node_to_json).collect();
    if !children.is_empty() {
        value["children"] = Value::Array(children);
    }
    value
}
