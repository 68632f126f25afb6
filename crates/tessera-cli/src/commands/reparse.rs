//! Incremental reparse of an edited file.

use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tessera_core::Colors;
use tessera_runtime::{Edit, FuelLimits, ParseStats, Parser};

use super::run_common::{LanguageSource, exit_on_parse_error, or_exit, read_file};

pub struct ReparseArgs {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub language: LanguageSource,
    pub raw: bool,
    pub verify: bool,
    pub limits: FuelLimits,
    pub color: bool,
}

pub fn run(args: ReparseArgs) {
    let language = or_exit(args.language.load());
    let old_text = or_exit(read_file(&args.old_path));
    let new_text = or_exit(read_file(&args.new_path));

    let mut parser = Parser::new(Arc::clone(&language)).with_limits(args.limits);
    let old = match parser.parse(&old_text) {
        Ok(outcome) => outcome.tree,
        Err(e) => exit_on_parse_error(e),
    };

    let edits: Vec<Edit> = Edit::diff(&old_text, &new_text).into_iter().collect();
    let outcome = match parser.reparse(&new_text, &old, &edits) {
        Ok(outcome) => outcome,
        Err(e) => exit_on_parse_error(e),
    };

    let root = outcome.tree.root_node();
    let tree_text = if args.raw {
        root.to_raw_sexp()
    } else {
        root.to_sexp()
    };
    println!("{}", tree_text);

    let colors = Colors::new(args.color);
    println!("{}---{}", colors.dim, colors.reset);
    print!("{}", format_stats(&outcome.stats, &edits, new_text.len()));

    if !args.verify {
        return;
    }

    let fresh = match Parser::new(language).with_limits(args.limits).parse(&new_text) {
        Ok(outcome) => outcome,
        Err(e) => exit_on_parse_error(e),
    };
    if fresh.tree.root_node().to_raw_sexp() != root.to_raw_sexp() {
        eprintln!(
            "{}error:{} incremental tree differs from a full parse",
            colors.red, colors.reset
        );
        eprintln!("{}", fresh.tree.root_node().to_raw_sexp());
        std::process::exit(1);
    }
    println!("{}verified{} identical to a full parse", colors.green, colors.reset);
}

/// Reuse counters, one per line.
pub fn format_stats(stats: &ParseStats, edits: &[Edit], len: usize) -> String {
    let mut out = String::new();
    let edit = match edits.first() {
        Some(edit) => format!(
            "{}..{} -> {}..{}",
            edit.start_byte, edit.old_end_byte, edit.start_byte, edit.new_end_byte
        ),
        None => "none".to_string(),
    };
    writeln!(out, "edit           {}", edit).expect("String write never fails");
    writeln!(out, "lexed tokens   {}", stats.lexed_tokens).expect("String write never fails");
    writeln!(out, "reused leaves  {}", stats.reused_leaves).expect("String write never fails");
    writeln!(out, "reused nodes   {}", stats.reused_nodes).expect("String write never fails");
    writeln!(out, "reused bytes   {}/{}", stats.reused_bytes, len)
        .expect("String write never fails");
    writeln!(out, "recoveries     {}", stats.recoveries).expect("String write never fails");
    writeln!(out, "decisions      {}", stats.decisions).expect("String write never fails");
    out
}
