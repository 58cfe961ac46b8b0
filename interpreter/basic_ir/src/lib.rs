//! Token and syntax tree types for the BASIC interpreter.
//!
//! Everything downstream of the lexer speaks in terms of this crate:
//! [`Token`] and [`TokenKind`] for the lexical layer, [`Expr`] and
//! [`Statement`] for the parsed program, and the canonical `Display`
//! renderings that `LIST` and `SAVE` emit.

mod ast;
mod span;
mod token;

pub use ast::{
    render_float, AssignTarget, BranchTarget, DataValue, DimDecl, Expr, Ident, InfixOp, JumpKind,
    Line, ListRange, PrefixOp, Statement, ValueType,
};
pub use span::Span;
pub use token::{lookup_keyword, Token, TokenCategory, TokenKind};
