//! A loaded grammar: the parse table plus an optional external scanner.

use std::fmt;

use tessera_table::{ParseTable, TableError};

/// Context-sensitive lexing routine supplied by a grammar.
///
/// The lexer calls [`scan`](ExternalScanner::scan) before trying the built-in
/// token matchers whenever an external token is valid in the current state.
/// Scanner state is serialized after every external token and restored before
/// every scan, so reparsing can resume from any earlier token.
///
/// Dropping the scanner is its destroy hook.
pub trait ExternalScanner {
    /// Try to recognize an external token at the cursor.
    ///
    /// `valid[i]` tells whether the `i`th external token can be accepted here.
    /// Returns the index of the recognized token.
    fn scan(&mut self, cursor: &mut ScanCursor<'_>, valid: &[bool]) -> Option<usize>;

    fn serialize(&self, buf: &mut Vec<u8>);

    /// Restore state written by [`serialize`](ExternalScanner::serialize).
    /// An empty slice means the initial state.
    fn deserialize(&mut self, bytes: &[u8]);
}

/// Capability record for a grammar's external scanner.
#[derive(Clone, Copy)]
pub struct ExternalScannerDef {
    pub create: fn() -> Box<dyn ExternalScanner>,
}

impl fmt::Debug for ExternalScannerDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalScannerDef").finish_non_exhaustive()
    }
}

/// Byte cursor handed to an external scanner.
///
/// The token ends at the last [`mark_end`](ScanCursor::mark_end), or at the
/// current position if it was never called. Every byte the scanner looks at is
/// recorded so incremental reparsing knows what the token depended on.
pub struct ScanCursor<'a> {
    text: &'a [u8],
    start: usize,
    pos: usize,
    end: Option<usize>,
    examined: usize,
}

impl<'a> ScanCursor<'a> {
    pub(crate) fn new(text: &'a [u8], start: usize) -> Self {
        Self {
            text,
            start,
            pos: start,
            end: None,
            examined: 0,
        }
    }

    /// The byte under the cursor, or `None` at end of input.
    pub fn lookahead(&mut self) -> Option<u8> {
        self.examined = self.examined.max(self.pos - self.start + 1);
        self.text.get(self.pos).copied()
    }

    pub fn advance(&mut self) {
        if self.pos < self.text.len() {
            self.pos += 1;
        }
    }

    pub fn mark_end(&mut self) {
        self.end = Some(self.pos);
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub(crate) fn token_end(&self) -> usize {
        self.end.unwrap_or(self.pos)
    }

    /// Bytes looked at, counted from the start position.
    pub(crate) fn examined(&self) -> usize {
        self.examined
    }
}

/// An immutable grammar shared by every parse that uses it.
pub struct Language {
    table: ParseTable,
    scanner: Option<ExternalScannerDef>,
}

impl Language {
    pub fn new(table: ParseTable) -> Self {
        Self {
            table,
            scanner: None,
        }
    }

    /// Load a language from a binary table artifact.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        Ok(Self::new(ParseTable::from_bytes(bytes)?))
    }

    pub fn with_scanner(mut self, scanner: ExternalScannerDef) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    pub fn scanner(&self) -> Option<&ExternalScannerDef> {
        self.scanner.as_ref()
    }

    /// Node kind name for a symbol, as the tree API reports it.
    pub fn kind_name(&self, symbol: tessera_core::Symbol) -> &str {
        self.table.symbol_name(symbol)
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name())
            .field("symbols", &self.table.symbol_count())
            .field("states", &self.table.state_count())
            .field("scanner", &self.scanner.is_some())
            .finish()
    }
}
