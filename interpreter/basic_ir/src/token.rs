//! Token types for the BASIC lexer.

use super::Span;
use std::fmt;

/// A token with its literal text and source location.
///
/// The literal is kept verbatim (identifiers uppercased by the lexer) so
/// diagnostics can quote the source and `REM` lines survive untouched.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    /// 1-based source line.
    pub line: u32,
    /// 1-based column of the first character.
    pub column: u32,
    pub span: Span,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        literal: impl Into<String>,
        line: u32,
        column: u32,
        span: Span,
    ) -> Self {
        Token {
            kind,
            literal: literal.into(),
            line,
            column,
            span,
        }
    }

    /// Create a token with a dummy location, for tests and synthesized nodes.
    pub fn dummy(kind: TokenKind, literal: impl Into<String>) -> Self {
        Token {
            kind,
            literal: literal.into(),
            line: 0,
            column: 0,
            span: Span::DUMMY,
        }
    }

    /// The category this token's kind belongs to.
    #[inline]
    pub fn category(&self) -> TokenCategory {
        self.kind.category()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({:?}) @ {}:{}",
            self.kind, self.literal, self.line, self.column
        )
    }
}

/// Token kinds for the BASIC dialect.
///
/// Literal kinds carry their parsed value; the spelled-out text lives on
/// [`Token::literal`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TokenKind {
    /// Identifier, uppercased, possibly with a trailing `$` or `%` sigil.
    Ident,
    /// Integer literal: 42
    Int(i64),
    /// Float literal: 3.14
    Float(f64),
    /// String literal (quotes excluded): "hello"
    Str,

    Let,
    Print,
    Input,
    If,
    Then,
    Else,
    Goto,
    Gosub,
    Return,
    On,
    For,
    To,
    Step,
    Next,
    Rem,
    Data,
    Read,
    Restore,
    Def,
    Fn,
    Dim,
    Run,
    End,
    Cont,
    Clr,
    List,
    Load,
    Save,
    New,
    Stop,
    Graphics,
    Draw,
    Box,
    And,
    Or,
    Not,
    Mod,

    Assign,  // =
    Lt,      // <
    Gt,      // >
    LtEq,    // <=
    GtEq,    // >=
    NotEq,   // <>
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Caret,   // ^
    Colon,   // :
    Comma,   // ,
    Semicolon, // ;
    LParen,  // (
    RParen,  // )

    /// Unrecognized input; the caller decides how to respond.
    Illegal,
    Eof,
}

/// Coarse classification of a token, used by diagnostics and editors.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum TokenCategory {
    Operator,
    Statement,
    Identifier,
    Number,
    Str,
    Comment,
    Other,
}

impl TokenKind {
    /// Get a display name for the token.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::Str => "string",
            TokenKind::Let => "LET",
            TokenKind::Print => "PRINT",
            TokenKind::Input => "INPUT",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::Goto => "GOTO",
            TokenKind::Gosub => "GOSUB",
            TokenKind::Return => "RETURN",
            TokenKind::On => "ON",
            TokenKind::For => "FOR",
            TokenKind::To => "TO",
            TokenKind::Step => "STEP",
            TokenKind::Next => "NEXT",
            TokenKind::Rem => "REM",
            TokenKind::Data => "DATA",
            TokenKind::Read => "READ",
            TokenKind::Restore => "RESTORE",
            TokenKind::Def => "DEF",
            TokenKind::Fn => "FN",
            TokenKind::Dim => "DIM",
            TokenKind::Run => "RUN",
            TokenKind::End => "END",
            TokenKind::Cont => "CONT",
            TokenKind::Clr => "CLR",
            TokenKind::List => "LIST",
            TokenKind::Load => "LOAD",
            TokenKind::Save => "SAVE",
            TokenKind::New => "NEW",
            TokenKind::Stop => "STOP",
            TokenKind::Graphics => "GRAPHICS",
            TokenKind::Draw => "DRAW",
            TokenKind::Box => "BOX",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Mod => "MOD",
            TokenKind::Assign => "=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::NotEq => "<>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Caret => "^",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Illegal => "illegal character",
            TokenKind::Eof => "end of input",
        }
    }

    /// The category this kind belongs to.
    pub fn category(&self) -> TokenCategory {
        match self {
            TokenKind::Ident => TokenCategory::Identifier,
            TokenKind::Int(_) | TokenKind::Float(_) => TokenCategory::Number,
            TokenKind::Str => TokenCategory::Str,
            TokenKind::Rem => TokenCategory::Comment,
            TokenKind::And
            | TokenKind::Or
            | TokenKind::Not
            | TokenKind::Mod
            | TokenKind::Assign
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::NotEq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Caret => TokenCategory::Operator,
            TokenKind::Let
            | TokenKind::Print
            | TokenKind::Input
            | TokenKind::If
            | TokenKind::Then
            | TokenKind::Else
            | TokenKind::Goto
            | TokenKind::Gosub
            | TokenKind::Return
            | TokenKind::On
            | TokenKind::For
            | TokenKind::To
            | TokenKind::Step
            | TokenKind::Next
            | TokenKind::Data
            | TokenKind::Read
            | TokenKind::Restore
            | TokenKind::Def
            | TokenKind::Fn
            | TokenKind::Dim
            | TokenKind::Run
            | TokenKind::End
            | TokenKind::Cont
            | TokenKind::Clr
            | TokenKind::List
            | TokenKind::Load
            | TokenKind::Save
            | TokenKind::New
            | TokenKind::Stop
            | TokenKind::Graphics
            | TokenKind::Draw
            | TokenKind::Box => TokenCategory::Statement,
            TokenKind::Colon
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::Illegal
            | TokenKind::Eof => TokenCategory::Other,
        }
    }

    /// Check if this token can start a statement.
    pub fn starts_statement(&self) -> bool {
        matches!(self.category(), TokenCategory::Statement) || *self == TokenKind::Ident
    }
}

/// Look up a reserved keyword by its uppercased text.
///
/// Returns `None` for regular identifiers. Uses the identifier's length as
/// a first-pass filter (keywords range from 2-8 chars).
#[inline]
pub fn lookup_keyword(upper: &str) -> Option<TokenKind> {
    let len = upper.len();
    if !(2..=8).contains(&len) {
        return None;
    }

    match len {
        2 => match upper {
            "IF" => Some(TokenKind::If),
            "FN" => Some(TokenKind::Fn),
            "ON" => Some(TokenKind::On),
            "TO" => Some(TokenKind::To),
            "OR" => Some(TokenKind::Or),
            _ => None,
        },
        3 => match upper {
            "LET" => Some(TokenKind::Let),
            "DIM" => Some(TokenKind::Dim),
            "DEF" => Some(TokenKind::Def),
            "REM" => Some(TokenKind::Rem),
            "FOR" => Some(TokenKind::For),
            "NEW" => Some(TokenKind::New),
            "RUN" => Some(TokenKind::Run),
            "END" => Some(TokenKind::End),
            "CLR" => Some(TokenKind::Clr),
            "BOX" => Some(TokenKind::Box),
            "AND" => Some(TokenKind::And),
            "NOT" => Some(TokenKind::Not),
            "MOD" => Some(TokenKind::Mod),
            _ => None,
        },
        4 => match upper {
            "GOTO" => Some(TokenKind::Goto),
            "THEN" => Some(TokenKind::Then),
            "ELSE" => Some(TokenKind::Else),
            "NEXT" => Some(TokenKind::Next),
            "STEP" => Some(TokenKind::Step),
            "DATA" => Some(TokenKind::Data),
            "READ" => Some(TokenKind::Read),
            "STOP" => Some(TokenKind::Stop),
            "CONT" => Some(TokenKind::Cont),
            "LIST" => Some(TokenKind::List),
            "LOAD" => Some(TokenKind::Load),
            "SAVE" => Some(TokenKind::Save),
            "DRAW" => Some(TokenKind::Draw),
            _ => None,
        },
        5 => match upper {
            "PRINT" => Some(TokenKind::Print),
            "INPUT" => Some(TokenKind::Input),
            "GOSUB" => Some(TokenKind::Gosub),
            _ => None,
        },
        6 => match upper {
            "RETURN" => Some(TokenKind::Return),
            _ => None,
        },
        7 => match upper {
            "RESTORE" => Some(TokenKind::Restore),
            _ => None,
        },
        8 => match upper {
            "GRAPHICS" => Some(TokenKind::Graphics),
            _ => None,
        },
        _ => None,
    }
}
