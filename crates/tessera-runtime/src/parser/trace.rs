//! Parser instrumentation.
//!
//! The parser is generic over a [`Tracer`]. With [`NoopTracer`] every hook is an
//! empty `#[inline(always)]` function and disappears from the compiled driver.
//! [`PrintTracer`] renders one line per event for the `trace` command.

use std::ops::Range;

use tessera_core::{Colors, LexModeId, ProductionId, StateId, Symbol};
use tessera_table::{Action, ParseTable};

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Shifts, reductions, recoveries, conflict decisions and accept.
    #[default]
    Default,
    /// (-v) Also lexed, reused and extra tokens.
    Verbose,
    /// (-vv) Also source text of every token.
    VeryVerbose,
}

/// Error recovery step taken by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryAction {
    /// A zero-width MISSING terminal was inserted.
    Insert(Symbol),
    /// The lookahead was wrapped in an ERROR node because what follows parses.
    Delete,
    /// This many stack entries were wrapped in an ERROR node.
    Pop(usize),
    /// The lookahead was wrapped in an ERROR node without resynchronizing.
    Skip,
    /// The whole stack was wrapped in an ERROR node at end of input.
    Collapse,
}

/// Parser instrumentation hooks.
///
/// Methods receive ids and byte ranges only; name resolution is up to the
/// implementation.
/// - `trace_lex` - a token was produced by the lexer
/// - `trace_reuse` - a subtree from the previous tree was taken as lookahead
/// - `trace_shift` - a terminal or reused subtree was pushed
/// - `trace_extra` - an extra was pushed without a state change
/// - `trace_reduce` - a production was reduced
/// - `trace_decide` - one of several actions a declared conflict allows was taken
/// - `trace_recover` - error recovery took a step
/// - `trace_accept` - the root was built
pub trait Tracer {
    fn trace_lex(&mut self, symbol: Symbol, range: Range<usize>, mode: LexModeId);

    fn trace_reuse(&mut self, symbol: Symbol, range: Range<usize>, leaf: bool);

    fn trace_shift(&mut self, state: StateId, symbol: Symbol, next: StateId);

    fn trace_extra(&mut self, symbol: Symbol, range: Range<usize>);

    fn trace_reduce(&mut self, production: ProductionId, child_count: usize, next: StateId);

    fn trace_recover(&mut self, action: RecoveryAction, range: Range<usize>);

    fn trace_decide(&mut self, state: StateId, symbol: Symbol, chosen: Action, candidates: usize);

    fn trace_accept(&mut self, len: usize);
}

/// Tracer that compiles to nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_lex(&mut self, _symbol: Symbol, _range: Range<usize>, _mode: LexModeId) {}

    #[inline(always)]
    fn trace_reuse(&mut self, _symbol: Symbol, _range: Range<usize>, _leaf: bool) {}

    #[inline(always)]
    fn trace_shift(&mut self, _state: StateId, _symbol: Symbol, _next: StateId) {}

    #[inline(always)]
    fn trace_extra(&mut self, _symbol: Symbol, _range: Range<usize>) {}

    #[inline(always)]
    fn trace_reduce(&mut self, _production: ProductionId, _child_count: usize, _next: StateId) {}

    #[inline(always)]
    fn trace_recover(&mut self, _action: RecoveryAction, _range: Range<usize>) {}

    #[inline(always)]
    fn trace_decide(&mut self, _state: StateId, _symbol: Symbol, _chosen: Action, _candidates: usize) {}

    #[inline(always)]
    fn trace_accept(&mut self, _len: usize) {}
}

/// Tracer that collects human-readable lines.
pub struct PrintTracer<'s> {
    table: &'s ParseTable,
    source: &'s str,
    verbosity: Verbosity,
    colors: Colors,
    lines: Vec<String>,
}

impl<'s> PrintTracer<'s> {
    pub fn new(table: &'s ParseTable, source: &'s str, verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            table,
            source,
            verbosity,
            colors,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn symbol(&self, symbol: Symbol) -> String {
        let name = self.table.symbol_name(symbol);
        if symbol.is_end() {
            "$end".to_string()
        } else if self.table.is_named(symbol) {
            name.to_string()
        } else {
            format!("{name:?}")
        }
    }

    fn token(&self, symbol: Symbol, range: &Range<usize>) -> String {
        let c = &self.colors;
        let mut out = format!("{}{}{} {range:?}", c.green, self.symbol(symbol), c.reset);
        if self.verbosity >= Verbosity::VeryVerbose
            && let Some(text) = self.source.get(range.clone())
        {
            out.push_str(&format!(" {}{text:?}{}", c.dim, c.reset));
        }
        out
    }

    fn push(&mut self, event: &str, detail: String) {
        let c = &self.colors;
        self.lines.push(format!("{}{event:<8}{} {detail}", c.blue, c.reset));
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_lex(&mut self, symbol: Symbol, range: Range<usize>, mode: LexModeId) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        let c = self.colors;
        let detail = format!("{} {}L{mode}{}", self.token(symbol, &range), c.dim, c.reset);
        self.push("lex", detail);
    }

    fn trace_reuse(&mut self, symbol: Symbol, range: Range<usize>, leaf: bool) {
        if self.verbosity < Verbosity::Verbose && leaf {
            return;
        }
        let detail = self.token(symbol, &range);
        self.push(if leaf { "reuse" } else { "reuse*" }, detail);
    }

    fn trace_shift(&mut self, state: StateId, symbol: Symbol, next: StateId) {
        let detail = format!("S{state} {} -> S{next}", self.symbol(symbol));
        self.push("shift", detail);
    }

    fn trace_extra(&mut self, symbol: Symbol, range: Range<usize>) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        let detail = self.token(symbol, &range);
        self.push("extra", detail);
    }

    fn trace_reduce(&mut self, production: ProductionId, child_count: usize, next: StateId) {
        let lhs = self.table.production(production).lhs;
        let detail = format!("P{production} {} ({child_count}) -> S{next}", self.symbol(lhs));
        self.push("reduce", detail);
    }

    fn trace_recover(&mut self, action: RecoveryAction, range: Range<usize>) {
        let c = self.colors;
        let what = match action {
            RecoveryAction::Insert(symbol) => format!("insert {}", self.symbol(symbol)),
            RecoveryAction::Delete => "delete".to_string(),
            RecoveryAction::Pop(count) => format!("pop {count}"),
            RecoveryAction::Skip => "skip".to_string(),
            RecoveryAction::Collapse => "collapse".to_string(),
        };
        self.push("recover", format!("{}{what}{} {range:?}", c.red, c.reset));
    }

    fn trace_decide(&mut self, state: StateId, symbol: Symbol, chosen: Action, candidates: usize) {
        let c = self.colors;
        let chosen = match chosen {
            Action::Shift(next) => format!("shift S{next}"),
            Action::Reduce(production) => format!("reduce P{production}"),
            Action::Accept => "accept".to_string(),
            Action::Error => "error".to_string(),
        };
        let detail = format!(
            "S{state} {} {chosen} {}(of {candidates}){}",
            self.symbol(symbol),
            c.dim,
            c.reset
        );
        self.push("decide", detail);
    }

    fn trace_accept(&mut self, len: usize) {
        self.push("accept", format!("{len} bytes"));
    }
}
