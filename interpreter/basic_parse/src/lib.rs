//! Parser for the BASIC interpreter.
//!
//! Pratt expression parsing plus statement dispatch over the token stream.
//! Errors accumulate on the [`Parser`]; nothing panics and nothing is
//! thrown — a line that fails to parse leaves its errors behind and the
//! parser resynchronizes at the next `:` so later statements still parse.

mod cursor;
mod error;
mod expr;
mod stmt;

#[cfg(test)]
mod tests;

pub use error::ParseError;

use basic_ir::{Line, TokenKind};
use basic_lexer::Lexer;
use cursor::Cursor;

/// Parser state over one token stream.
pub struct Parser {
    pub(crate) cursor: Cursor,
    errors: Vec<ParseError>,
}

impl Parser {
    /// Create a parser over an already-lexed token vector.
    pub fn new(tokens: Vec<basic_ir::Token>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            errors: Vec::new(),
        }
    }

    /// Lex and wrap one source text.
    pub fn from_source(source: &str) -> Self {
        Parser::new(Lexer::tokenize(source))
    }

    /// Errors accumulated so far.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Drain the accumulated errors.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    pub(crate) fn record(&mut self, err: ParseError) {
        self.errors.push(err);
    }

    /// Skip ahead to the next statement boundary (`:` or end of input).
    pub(crate) fn synchronize(&mut self) {
        while !matches!(
            self.cursor.current_kind(),
            TokenKind::Colon | TokenKind::Eof
        ) {
            self.cursor.advance();
        }
    }
}

/// Parse a single source line, failing if any parse error occurred.
pub fn parse_line(source: &str) -> Result<Line, Vec<ParseError>> {
    let mut parser = Parser::from_source(source);
    let line = parser.parse_line();
    let errors = parser.take_errors();
    if errors.is_empty() {
        Ok(line)
    } else {
        Err(errors)
    }
}

/// Parse a multi-line program text, one statement per physical line.
///
/// Blank lines are skipped. All lines are attempted; if any line failed,
/// every collected error is returned.
pub fn parse_source(source: &str) -> Result<Vec<Line>, Vec<ParseError>> {
    let mut lines = Vec::new();
    let mut errors = Vec::new();
    for text in source.lines() {
        if text.trim().is_empty() {
            continue;
        }
        match parse_line(text) {
            Ok(line) => lines.push(line),
            Err(errs) => errors.extend(errs),
        }
    }
    if errors.is_empty() {
        Ok(lines)
    } else {
        Err(errors)
    }
}
