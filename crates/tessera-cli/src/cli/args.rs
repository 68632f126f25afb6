//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be
//! composed into several commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Source file to parse (positional). `-` reads stdin.
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .value_parser(value_parser!(PathBuf))
        .help("Source file to parse (- for stdin)")
}

/// Inline source text (-s/--source).
pub fn source_text_arg() -> Arg {
    Arg::new("source_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .conflicts_with("source_path")
        .help("Inline source text")
}

/// Previous version of the source (positional).
pub fn old_path_arg() -> Arg {
    Arg::new("old_path")
        .value_name("OLD")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Previous version of the source")
}

/// Edited version of the source (positional).
pub fn new_path_arg() -> Arg {
    Arg::new("new_path")
        .value_name("NEW")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Edited version of the source")
}

/// Grammar to compile instead of the built-in Tessera grammar (--grammar).
pub fn grammar_arg() -> Arg {
    Arg::new("grammar")
        .long("grammar")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("tree-sitter grammar.json to compile and use")
}

/// Precompiled table artifact (--table).
pub fn table_arg() -> Arg {
    Arg::new("table")
        .long("table")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("grammar")
        .help("Precompiled parse table artifact to use")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Include anonymous nodes and ranges (--raw).
pub fn raw_arg() -> Arg {
    Arg::new("raw")
        .long("raw")
        .action(ArgAction::SetTrue)
        .help("Include anonymous nodes (literals, punctuation) and byte ranges")
}

/// Print the tree as JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .conflicts_with("raw")
        .help("Print the tree as JSON")
}

/// Compare an incremental parse with a full one (--verify).
pub fn verify_arg() -> Arg {
    Arg::new("verify")
        .long("verify")
        .action(ArgAction::SetTrue)
        .help("Check the incremental tree against a full parse")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v adds tokens, -vv adds token text)")
}

/// Parser action budget (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .default_value("10000000")
        .value_parser(value_parser!(u64))
        .help("Maximum number of parser actions")
}

/// Node budget (--node-limit).
pub fn node_limit_arg() -> Arg {
    Arg::new("node_limit")
        .long("node-limit")
        .value_name("N")
        .default_value("5000000")
        .value_parser(value_parser!(u64))
        .help("Maximum number of created nodes")
}

/// Write the table artifact to a file (-o/--emit).
pub fn emit_arg() -> Arg {
    Arg::new("emit")
        .short('o')
        .long("emit")
        .value_name("OUT")
        .value_parser(value_parser!(PathBuf))
        .help("Write the binary table artifact instead of dumping it")
}

/// Include per-state rows in the dump (--states).
pub fn states_arg() -> Arg {
    Arg::new("states")
        .long("states")
        .action(ArgAction::SetTrue)
        .help("Include the action and goto rows of every state")
}
