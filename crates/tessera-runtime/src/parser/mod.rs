//! The parse entry points.
//!
//! [`Parser`] owns the per-parse mutable pieces (external scanner instance,
//! tracer, limits) and hands them to a single-use driver for each call.

mod ambiguity;
mod driver;
mod error;
mod recovery;
mod reuse;
mod trace;

use std::sync::Arc;

use crate::language::{ExternalScanner, Language};
use crate::subtree::Subtree;
use crate::tree::{Edit, Tree};

use driver::ParseRun;

pub use ambiguity::DECISION_WINDOW;
pub use error::{Exhausted, ParseError};
pub use recovery::RECOVERY_WINDOW;
pub use trace::{NoopTracer, PrintTracer, RecoveryAction, Tracer, Verbosity};

/// Progress budgets. Both are counts, never wall-clock time.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum parser actions, including simulated ones (default: 10,000,000).
    pub(crate) exec_fuel: u64,
    /// Maximum subtrees created (default: 5,000,000).
    pub(crate) node_limit: u64,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 10_000_000,
            node_limit: 5_000_000,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn node_limit(mut self, limit: u64) -> Self {
        self.node_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u64 {
        self.exec_fuel
    }

    pub fn get_node_limit(&self) -> u64 {
        self.node_limit
    }
}

/// Counters describing one parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Tokens produced by the lexer for the main token stream.
    pub lexed_tokens: usize,
    /// Leaves taken from the previous tree instead of being lexed.
    pub reused_leaves: usize,
    /// Interior nodes taken whole from the previous tree.
    pub reused_nodes: usize,
    /// Bytes covered by reused leaves and nodes.
    pub reused_bytes: usize,
    /// Error recoveries performed.
    pub recoveries: usize,
    /// Declared conflicts settled by exploring the upcoming tokens.
    pub decisions: usize,
}

#[derive(Debug)]
pub struct ParseOutcome {
    pub tree: Tree,
    /// Whether the tree contains ERROR or MISSING nodes.
    pub has_error: bool,
    pub stats: ParseStats,
}

pub struct Parser<T: Tracer = NoopTracer> {
    language: Arc<Language>,
    scanner: Option<Box<dyn ExternalScanner>>,
    limits: FuelLimits,
    tracer: T,
}

impl Parser {
    pub fn new(language: Arc<Language>) -> Self {
        let scanner = language.scanner().map(|def| (def.create)());
        Self {
            language,
            scanner,
            limits: FuelLimits::default(),
            tracer: NoopTracer,
        }
    }
}

impl<T: Tracer> Parser<T> {
    pub fn with_limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_tracer<U: Tracer>(self, tracer: U) -> Parser<U> {
        Parser {
            language: self.language,
            scanner: self.scanner,
            limits: self.limits,
            tracer,
        }
    }

    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Parse `text` from scratch. Syntax errors end up inside the tree.
    pub fn parse(&mut self, text: &str) -> Result<ParseOutcome, ParseError> {
        self.run(text, None, 0)
    }

    /// Parse `text`, the result of applying `edits` to the text of `old`,
    /// reusing every subtree of `old` the edits cannot have affected.
    ///
    /// The result is the tree [`parse`](Parser::parse) would build for `text`.
    pub fn reparse(
        &mut self,
        text: &str,
        old: &Tree,
        edits: &[Edit],
    ) -> Result<ParseOutcome, ParseError> {
        let root = old.edited_root(edits)?;
        if root.size != text.len() {
            return Err(ParseError::MalformedEdit {
                index: edits.len().saturating_sub(1),
                reason: format!(
                    "edits describe a {}-byte text but the new text has {} bytes",
                    root.size,
                    text.len()
                ),
            });
        }
        let reusable = Arc::ptr_eq(old.language(), &self.language).then_some(root);
        self.run(text, reusable, old.revision() + 1)
    }

    fn run(
        &mut self,
        text: &str,
        old_root: Option<Arc<Subtree>>,
        revision: u64,
    ) -> Result<ParseOutcome, ParseError> {
        let mut run = ParseRun::new(
            self.language.table(),
            text,
            self.scanner.as_deref_mut(),
            &mut self.tracer,
            self.limits,
            old_root,
        );
        let result = run.parse();
        let stats = run.stats;

        match result {
            Ok(root) => {
                let tree = Tree::new(root, text.into(), Arc::clone(&self.language), revision);
                Ok(ParseOutcome {
                    has_error: tree.has_error(),
                    tree,
                    stats,
                })
            }
            Err(reason) => {
                let consumed = run.consumed(reason);
                let partial = run.partial_root();
                let tree = Tree::new(partial, text.into(), Arc::clone(&self.language), revision);
                Err(ParseError::BudgetExceeded {
                    reason,
                    consumed,
                    partial: Box::new(tree),
                })
            }
        }
    }
}
