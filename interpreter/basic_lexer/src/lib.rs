//! Lexer for the BASIC interpreter.
//!
//! Turns a character stream into [`Token`]s with line/column/offset
//! locations. Keyword lookup is case-insensitive and identifiers are
//! uppercased; a trailing `$` or `%` sigil joins the identifier literal.
//! `REM` swallows the rest of the physical line, `?` lexes as `PRINT`, and
//! anything unrecognized becomes an `ILLEGAL` token for the parser to
//! report.

mod cursor;

use basic_ir::{lookup_keyword, Span, Token, TokenKind};
use cursor::Cursor;

/// Streaming lexer over one source text.
///
/// Every call to [`next_token`](Lexer::next_token) yields the next token;
/// after the end of input it yields `EOF` forever, so the stream is finite
/// for any input.
pub struct Lexer {
    cursor: Cursor,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
        }
    }

    /// Lex an entire source text into a token vector ending with one `EOF`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.cursor.pos();
        let line = self.cursor.line();
        let column = self.cursor.column();

        if self.cursor.is_eof() {
            return self.token(TokenKind::Eof, String::new(), start, line, column);
        }

        let c = self.cursor.current();
        match c {
            '"' => self.lex_string(start, line, column),
            '0'..='9' => self.lex_number(start, line, column),
            'A'..='Z' | 'a'..='z' | '_' => self.lex_word(start, line, column),
            '?' => {
                self.cursor.advance();
                self.token(TokenKind::Print, "?".to_string(), start, line, column)
            }
            '<' => {
                self.cursor.advance();
                match self.cursor.current() {
                    '=' => {
                        self.cursor.advance();
                        self.token(TokenKind::LtEq, "<=".to_string(), start, line, column)
                    }
                    '>' => {
                        self.cursor.advance();
                        self.token(TokenKind::NotEq, "<>".to_string(), start, line, column)
                    }
                    _ => self.token(TokenKind::Lt, "<".to_string(), start, line, column),
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.current() == '=' {
                    self.cursor.advance();
                    self.token(TokenKind::GtEq, ">=".to_string(), start, line, column)
                } else {
                    self.token(TokenKind::Gt, ">".to_string(), start, line, column)
                }
            }
            _ => {
                let kind = match c {
                    '=' => TokenKind::Assign,
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '^' => TokenKind::Caret,
                    ':' => TokenKind::Colon,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    _ => TokenKind::Illegal,
                };
                self.cursor.advance();
                self.token(kind, c.to_string(), start, line, column)
            }
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor
            .eat_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    }

    /// Identifier, keyword, or a whole `REM` comment.
    fn lex_word(&mut self, start: usize, line: u32, column: u32) -> Token {
        self.cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if matches!(self.cursor.current(), '$' | '%') {
            self.cursor.advance();
        }

        let upper = self.cursor.slice(start, self.cursor.pos()).to_uppercase();
        if upper == "REM" {
            // The comment literal is the raw remainder of the physical
            // line, the word REM included.
            self.cursor.eat_while(|c| c != '\n');
            let literal = self.cursor.slice(start, self.cursor.pos());
            return self.token(TokenKind::Rem, literal, start, line, column);
        }

        match lookup_keyword(&upper) {
            Some(kind) => self.token(kind, upper, start, line, column),
            None => self.token(TokenKind::Ident, upper, start, line, column),
        }
    }

    /// Integer or float literal: a digit run with at most one `.`.
    fn lex_number(&mut self, start: usize, line: u32, column: u32) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.cursor.current() == '.' {
            is_float = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let literal = self.cursor.slice(start, self.cursor.pos());
        let kind = if is_float {
            TokenKind::Float(literal.parse().unwrap_or_default())
        } else {
            match literal.parse::<i64>() {
                Ok(value) => TokenKind::Int(value),
                // Digit runs too long for i64 still lex; they carry the
                // float value they round to.
                Err(_) => TokenKind::Float(literal.parse().unwrap_or_default()),
            }
        };
        self.token(kind, literal, start, line, column)
    }

    /// String literal: greedy to the closing `"` or end of input, quotes
    /// excluded, no escape mechanism.
    fn lex_string(&mut self, start: usize, line: u32, column: u32) -> Token {
        self.cursor.advance(); // opening quote
        let content_start = self.cursor.pos();
        self.cursor.eat_while(|c| c != '"');
        let literal = self.cursor.slice(content_start, self.cursor.pos());
        if self.cursor.current() == '"' {
            self.cursor.advance();
        }
        self.token(TokenKind::Str, literal, start, line, column)
    }

    fn token(
        &self,
        kind: TokenKind,
        literal: String,
        start: usize,
        line: u32,
        column: u32,
    ) -> Token {
        let span = Span::new(start as u32, self.cursor.pos() as u32);
        Token::new(kind, literal, line, column, span)
    }
}
