//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`.
//! Every command that parses accepts the same language and budget flags.

use clap::Command;

use super::args::*;

/// Add language selection args (--grammar, --table).
fn with_language_args(cmd: Command) -> Command {
    cmd.arg(grammar_arg()).arg(table_arg())
}

/// Add parser budget args (--fuel, --node-limit).
fn with_limit_args(cmd: Command) -> Command {
    cmd.arg(fuel_arg()).arg(node_limit_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("tessera")
        .about("Incremental, error-tolerant parsing for tree-sitter grammars")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(parse_command())
        .subcommand(reparse_command())
        .subcommand(trace_command())
        .subcommand(table_command())
}

/// Parse a source file and print its tree.
pub fn parse_command() -> Command {
    let cmd = Command::new("parse")
        .about("Parse a source file and print its syntax tree")
        .override_usage(
            "\
  tessera parse <SOURCE>
  tessera parse -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  tessera parse main.tsr                       # named nodes
  tessera parse main.tsr --raw                 # every node with byte ranges
  tessera parse main.tsr --json                # JSON tree
  tessera parse -s 'fn main() {}'              # inline source
  tessera parse app.js --grammar grammar.json  # any tree-sitter grammar"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(raw_arg())
        .arg(json_arg())
        .arg(color_arg());

    with_limit_args(with_language_args(cmd))
}

/// Reparse an edited file incrementally.
pub fn reparse_command() -> Command {
    let cmd = Command::new("reparse")
        .about("Parse OLD, then reparse NEW incrementally and report reuse")
        .override_usage("  tessera reparse <OLD> <NEW> [--verify]")
        .after_help(
            r#"EXAMPLES:
  tessera reparse before.tsr after.tsr           # tree and reuse stats
  tessera reparse before.tsr after.tsr --verify  # compare with a full parse"#,
        )
        .arg(old_path_arg())
        .arg(new_path_arg())
        .arg(raw_arg())
        .arg(verify_arg())
        .arg(color_arg());

    with_limit_args(with_language_args(cmd))
}

/// Trace parser actions.
pub fn trace_command() -> Command {
    let cmd = Command::new("trace")
        .about("Trace the parser's actions")
        .override_usage(
            "\
  tessera trace <SOURCE> [-v|-vv]
  tessera trace -s <TEXT> [-v|-vv]",
        )
        .after_help(
            r#"EXAMPLES:
  tessera trace main.tsr           # shifts, reductions, reuse and recovery
  tessera trace main.tsr -v        # also tokens and extras
  tessera trace -s 'let' -vv       # also token text"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(verbose_arg())
        .arg(color_arg());

    with_limit_args(with_language_args(cmd))
}

/// Dump or emit a parse table.
pub fn table_command() -> Command {
    let cmd = Command::new("table")
        .about("Show a compiled parse table or write its binary artifact")
        .override_usage("  tessera table [--grammar FILE | --table FILE] [--emit OUT] [--states]")
        .after_help(
            r#"EXAMPLES:
  tessera table                               # built-in Tessera grammar
  tessera table --grammar grammar.json        # compile and dump
  tessera table --grammar grammar.json -o out.tsra
  tessera table --table out.tsra --states     # inspect an artifact"#,
        )
        .arg(emit_arg())
        .arg(states_arg())
        .arg(color_arg());

    with_language_args(cmd)
}
