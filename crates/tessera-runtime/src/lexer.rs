//! Mode-driven lexer.
//!
//! The parser asks for one token at a time, passing the lex mode of its
//! current state. Selection among matching tokens is by lexical priority,
//! then length, then symbol id (declaration order). A word token whose text
//! spells a keyword is reported as that keyword.

use std::cmp::Reverse;
use std::sync::Arc;

use tessera_core::{LexModeId, Symbol};
use tessera_table::ParseTable;

use crate::language::{ExternalScanner, ScanCursor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub symbol: Symbol,
    pub start: usize,
    pub end: usize,
    /// Bytes examined past `end` while deciding on this token.
    pub lookahead_bytes: usize,
    /// Mode the token was requested in.
    pub lex_mode: LexModeId,
    /// Scanner state after an external token.
    pub external_state: Option<Arc<[u8]>>,
}

impl Token {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

pub(crate) struct Lexer<'a> {
    table: &'a ParseTable,
    text: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(table: &'a ParseTable, text: &'a str) -> Self {
        Self { table, text }
    }

    /// Lex the token at `pos` in `mode`.
    ///
    /// `external_state` is the scanner state left by the last external token
    /// before `pos`. Never fails: unmatched input becomes a one-character
    /// [`Symbol::ERROR`] token.
    pub fn lex(
        &self,
        pos: usize,
        mode: LexModeId,
        scanner: Option<&mut (dyn ExternalScanner + 'static)>,
        external_state: Option<&[u8]>,
    ) -> Token {
        let mut examined = 0;

        if let Some(scanner) = scanner
            && let Some(token) = self.scan_external(pos, mode, scanner, external_state, &mut examined)
        {
            return token;
        }

        if pos >= self.text.len() {
            return Token {
                symbol: Symbol::END,
                start: pos,
                end: pos,
                lookahead_bytes: examined.max(1),
                lex_mode: mode,
                external_state: None,
            };
        }

        let tokens = &self.table.lex_mode(mode).tokens;
        if let Some(token) = self.scan_internal(pos, mode, tokens, &mut examined) {
            return token;
        }

        let error_mode = self.table.error_lex_mode();
        if mode != error_mode {
            let tokens = &self.table.lex_mode(error_mode).tokens;
            if let Some(token) = self.scan_internal(pos, mode, tokens, &mut examined) {
                return token;
            }
        }

        let len = self
            .text
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .map_or(1, char::len_utf8);
        Token {
            symbol: Symbol::ERROR,
            start: pos,
            end: pos + len,
            lookahead_bytes: examined.saturating_sub(len),
            lex_mode: mode,
            external_state: None,
        }
    }

    fn scan_external(
        &self,
        pos: usize,
        mode: LexModeId,
        scanner: &mut dyn ExternalScanner,
        external_state: Option<&[u8]>,
        examined: &mut usize,
    ) -> Option<Token> {
        let externals = &self.table.lex_mode(mode).externals;
        if externals.is_empty() {
            return None;
        }

        let mut valid = vec![false; self.table.external_count()];
        for &symbol in externals {
            if let Some(index) = self.table.external_index(symbol) {
                valid[index] = true;
            }
        }

        scanner.deserialize(external_state.unwrap_or_default());
        let mut cursor = ScanCursor::new(self.text.as_bytes(), pos);
        let found = scanner.scan(&mut cursor, &valid);
        *examined = (*examined).max(cursor.examined());

        let index = found.filter(|&i| valid.get(i).copied().unwrap_or(false))?;
        let symbol = self.table.external_symbol(index)?;
        let end = cursor.token_end().max(pos);
        // Zero-width external tokens are allowed only at end of input.
        if end == pos && pos < self.text.len() {
            return None;
        }

        let mut state = Vec::new();
        scanner.serialize(&mut state);
        Some(Token {
            symbol,
            start: pos,
            end,
            lookahead_bytes: (pos + *examined).saturating_sub(end),
            lex_mode: mode,
            external_state: Some(state.into()),
        })
    }

    fn scan_internal(
        &self,
        pos: usize,
        mode: LexModeId,
        tokens: &[Symbol],
        examined: &mut usize,
    ) -> Option<Token> {
        let bytes = self.text.as_bytes();
        let mut best: Option<(i32, usize, Reverse<Symbol>)> = None;

        for &symbol in tokens {
            let Some(matcher) = self.table.matcher(symbol) else {
                continue;
            };
            let scan = matcher.scan(bytes, pos);
            *examined = (*examined).max(scan.examined);
            let Some(len) = scan.len.filter(|&len| len > 0) else {
                continue;
            };
            let key = (self.table.token_priority(symbol), len, Reverse(symbol));
            if best.is_none_or(|b| key > b) {
                best = Some(key);
            }
        }

        let (_, len, Reverse(symbol)) = best?;
        // The word token stands in for every keyword it spells.
        let symbol = match self.table.word_token() {
            Some(word) if word == symbol => bytes
                .get(pos..pos + len)
                .and_then(|text| self.table.keyword(text))
                .unwrap_or(symbol),
            _ => symbol,
        };
        Some(Token {
            symbol,
            start: pos,
            end: pos + len,
            lookahead_bytes: examined.saturating_sub(len),
            lex_mode: mode,
            external_state: None,
        })
    }
}
