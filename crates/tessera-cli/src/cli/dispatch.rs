//! Turns clap matches into command arguments.
//!
//! Each `*Params` is read from `ArgMatches`, then converted into the
//! `*Args` its command runs with. Flags shared by every parsing command
//! live in [`ParserParams`].

use std::path::PathBuf;

use clap::ArgMatches;
use tessera_runtime::{FuelLimits, Verbosity};

use super::ColorChoice;
use crate::commands::parse::{OutputFormat, ParseArgs};
use crate::commands::reparse::ReparseArgs;
use crate::commands::run_common::LanguageSource;
use crate::commands::table::TableArgs;
use crate::commands::trace::TraceArgs;

/// Language, budgets and color: what every command that parses needs.
pub struct ParserParams {
    pub language: LanguageSource,
    pub limits: FuelLimits,
    pub color: ColorChoice,
}

impl ParserParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let defaults = FuelLimits::new();
        let fuel = m.get_one::<u64>("fuel").copied();
        let node_limit = m.get_one::<u64>("node_limit").copied();

        Self {
            language: language_source(m),
            limits: defaults
                .exec_fuel(fuel.unwrap_or(defaults.get_exec_fuel()))
                .node_limit(node_limit.unwrap_or(defaults.get_node_limit())),
            color: color_choice(m),
        }
    }
}

/// `SOURCE` or `-s TEXT`. clap rejects both at once.
pub struct SourceParams {
    pub path: Option<PathBuf>,
    pub text: Option<String>,
}

impl SourceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            path: m.get_one::<PathBuf>("source_path").cloned(),
            text: m.get_one::<String>("source_text").cloned(),
        }
    }
}

pub struct ParseParams {
    pub source: SourceParams,
    pub parser: ParserParams,
    pub format: OutputFormat,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        // --raw and --json conflict, so at most one is set.
        let format = match (m.get_flag("json"), m.get_flag("raw")) {
            (true, _) => OutputFormat::Json,
            (_, true) => OutputFormat::Raw,
            _ => OutputFormat::Sexp,
        };

        Self {
            source: SourceParams::from_matches(m),
            parser: ParserParams::from_matches(m),
            format,
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        Self {
            source_path: p.source.path,
            source_text: p.source.text,
            language: p.parser.language,
            format: p.format,
            limits: p.parser.limits,
            color: p.parser.color.enabled(),
        }
    }
}

pub struct ReparseParams {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub parser: ParserParams,
    pub raw: bool,
    pub verify: bool,
}

impl ReparseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let path = |id: &str| m.get_one::<PathBuf>(id).cloned().unwrap_or_default();

        Self {
            // Both positionals are required, so the defaults are never used.
            old_path: path("old_path"),
            new_path: path("new_path"),
            parser: ParserParams::from_matches(m),
            raw: m.get_flag("raw"),
            verify: m.get_flag("verify"),
        }
    }
}

impl From<ReparseParams> for ReparseArgs {
    fn from(p: ReparseParams) -> Self {
        Self {
            old_path: p.old_path,
            new_path: p.new_path,
            language: p.parser.language,
            raw: p.raw,
            verify: p.verify,
            limits: p.parser.limits,
            color: p.parser.color.enabled(),
        }
    }
}

pub struct TraceParams {
    pub source: SourceParams,
    pub parser: ParserParams,
    pub verbosity: Verbosity,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let verbosity = match m.get_count("verbose") {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        };

        Self {
            source: SourceParams::from_matches(m),
            parser: ParserParams::from_matches(m),
            verbosity,
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        Self {
            source_path: p.source.path,
            source_text: p.source.text,
            language: p.parser.language,
            verbosity: p.verbosity,
            limits: p.parser.limits,
            color: p.parser.color.enabled(),
        }
    }
}

pub struct TableParams {
    pub language: LanguageSource,
    pub emit: Option<PathBuf>,
    pub states: bool,
    pub color: ColorChoice,
}

impl TableParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            language: language_source(m),
            emit: m.get_one::<PathBuf>("emit").cloned(),
            states: m.get_flag("states"),
            color: color_choice(m),
        }
    }
}

impl From<TableParams> for TableArgs {
    fn from(p: TableParams) -> Self {
        Self {
            language: p.language,
            emit: p.emit,
            states: p.states,
            color: p.color.enabled(),
        }
    }
}

/// `--grammar` or `--table`, else the built-in grammar. clap rejects both at once.
fn language_source(m: &ArgMatches) -> LanguageSource {
    let grammar = m.get_one::<PathBuf>("grammar").cloned();
    let table = m.get_one::<PathBuf>("table").cloned();
    match (grammar, table) {
        (Some(path), _) => LanguageSource::Grammar(path),
        (None, Some(path)) => LanguageSource::Table(path),
        (None, None) => LanguageSource::Builtin,
    }
}

fn color_choice(m: &ArgMatches) -> ColorChoice {
    ColorChoice::from_flag(m.get_one::<String>("color").map(String::as_str))
}
