//! Expression nodes.

use crate::{Token, TokenKind};
use std::fmt;

/// The value type an identifier's sigil selects.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ValueType {
    /// Trailing `%`.
    Integer,
    /// No sigil.
    Float,
    /// Trailing `$`.
    Str,
}

impl ValueType {
    /// The type an uppercased name's trailing sigil selects.
    pub fn from_name(name: &str) -> ValueType {
        match name.as_bytes().last() {
            Some(b'%') => ValueType::Integer,
            Some(b'$') => ValueType::Str,
            _ => ValueType::Float,
        }
    }

    /// Display name used in type-mismatch diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Str => "string",
        }
    }
}

/// An identifier, uppercased, with its sigil (if any) part of the name.
#[derive(Clone, PartialEq, Debug)]
pub struct Ident {
    pub token: Token,
    pub name: String,
}

impl Ident {
    /// Build from an identifier token; the name is the token literal.
    pub fn new(token: Token) -> Self {
        let name = token.literal.clone();
        Ident { token, name }
    }

    /// The type this identifier's trailing sigil selects.
    pub fn value_type(&self) -> ValueType {
        ValueType::from_name(&self.name)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Prefix operators.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum PrefixOp {
    /// Unary `-`.
    Neg,
    /// `NOT` (logical in condition context, bitwise elsewhere).
    Not,
    /// `FN`, applied to a call expression.
    Fn,
}

/// Infix operators.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl InfixOp {
    /// The canonical source spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Pow => "^",
            InfixOp::Mod => "MOD",
            InfixOp::Eq => "=",
            InfixOp::NotEq => "<>",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::LtEq => "<=",
            InfixOp::GtEq => ">=",
            InfixOp::And => "AND",
            InfixOp::Or => "OR",
        }
    }

    /// Map an operator token to its infix operator, `=` included (equality
    /// inside expressions).
    pub fn from_token(kind: TokenKind) -> Option<InfixOp> {
        match kind {
            TokenKind::Plus => Some(InfixOp::Add),
            TokenKind::Minus => Some(InfixOp::Sub),
            TokenKind::Star => Some(InfixOp::Mul),
            TokenKind::Slash => Some(InfixOp::Div),
            TokenKind::Caret => Some(InfixOp::Pow),
            TokenKind::Mod => Some(InfixOp::Mod),
            TokenKind::Assign => Some(InfixOp::Eq),
            TokenKind::NotEq => Some(InfixOp::NotEq),
            TokenKind::Lt => Some(InfixOp::Lt),
            TokenKind::Gt => Some(InfixOp::Gt),
            TokenKind::LtEq => Some(InfixOp::LtEq),
            TokenKind::GtEq => Some(InfixOp::GtEq),
            TokenKind::And => Some(InfixOp::And),
            TokenKind::Or => Some(InfixOp::Or),
            _ => None,
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An expression node. Each variant keeps the token it began at.
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    Ident(Ident),
    Int {
        token: Token,
        value: i64,
    },
    Float {
        token: Token,
        value: f64,
    },
    Str {
        token: Token,
        value: String,
    },
    Prefix {
        token: Token,
        op: PrefixOp,
        operand: Box<Expr>,
    },
    Infix {
        token: Token,
        op: InfixOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Grouped {
        token: Token,
        inner: Box<Expr>,
    },
    Call {
        token: Token,
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// The token this expression began at.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Ident(ident) => &ident.token,
            Expr::Int { token, .. }
            | Expr::Float { token, .. }
            | Expr::Str { token, .. }
            | Expr::Prefix { token, .. }
            | Expr::Infix { token, .. }
            | Expr::Grouped { token, .. }
            | Expr::Call { token, .. } => token,
        }
    }
}

/// Render a float literal so it survives a round trip: the shortest decimal
/// form, forced to contain a `.` so it re-lexes as a float.
pub fn render_float(value: f64) -> String {
    let mut s = format!("{value}");
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(ident) => write!(f, "{ident}"),
            Expr::Int { value, .. } => write!(f, "{value}"),
            Expr::Float { value, .. } => f.write_str(&render_float(*value)),
            Expr::Str { value, .. } => write!(f, "\"{value}\""),
            Expr::Prefix { op, operand, .. } => match op {
                PrefixOp::Neg => write!(f, "-{operand}"),
                PrefixOp::Not => write!(f, "NOT {operand}"),
                PrefixOp::Fn => write!(f, "FN {operand}"),
            },
            Expr::Infix {
                op, left, right, ..
            } => write!(f, "{left} {op} {right}"),
            Expr::Grouped { inner, .. } => write!(f, "({inner})"),
            Expr::Call { callee, args, .. } => {
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
