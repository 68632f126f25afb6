//! Trace parser actions for debugging grammars and recovery.

use std::path::PathBuf;
use std::sync::Arc;

use tessera_core::Colors;
use tessera_runtime::{FuelLimits, Parser, PrintTracer, Verbosity};

use super::run_common::{LanguageSource, exit_on_parse_error, load_source, or_exit};

pub struct TraceArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub language: LanguageSource,
    pub verbosity: Verbosity,
    pub limits: FuelLimits,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let language = or_exit(args.language.load());
    let source = or_exit(load_source(
        args.source_path.as_deref(),
        args.source_text.as_deref(),
    ));
    let colors = Colors::new(args.color);

    let tracer = PrintTracer::new(language.table(), &source, args.verbosity, colors);
    let mut parser = Parser::new(Arc::clone(&language))
        .with_limits(args.limits)
        .with_tracer(tracer);

    let result = parser.parse(&source);
    parser.tracer().print();

    match result {
        Ok(outcome) => {
            println!("{}---{}", colors.dim, colors.reset);
            println!("{}", outcome.tree.root_node().to_sexp());
        }
        Err(e) => exit_on_parse_error(e),
    }
}
