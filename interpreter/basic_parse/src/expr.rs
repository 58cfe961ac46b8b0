//! Pratt expression parsing.
//!
//! The ladder, lowest binding first: logical (AND/OR), equality (`=`,
//! `<>`), relational, additive, multiplicative (`*`, `/`, `^`, MOD),
//! prefix (unary `-`, NOT, FN), call. `=` is equality here; the LET
//! separator is handled at statement position.

use crate::{ParseError, Parser};
use basic_ir::{Expr, Ident, InfixOp, PrefixOp, TokenKind};

/// Binding strength, lowest first.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub(crate) enum Precedence {
    Lowest,
    Logical,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

/// The infix binding strength of a token, `Lowest` for non-operators.
fn token_precedence(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::And | TokenKind::Or => Precedence::Logical,
        TokenKind::Assign | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => {
            Precedence::LessGreater
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Star | TokenKind::Slash | TokenKind::Caret | TokenKind::Mod => {
            Precedence::Product
        }
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

impl Parser {
    /// Parse an expression, consuming operators that bind tighter than
    /// `min`.
    pub(crate) fn parse_expr(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        let mut left = self.parse_prefix()?;

        while token_precedence(self.cursor.current_kind()) > min {
            left = if self.cursor.check(TokenKind::LParen) {
                self.parse_call(left)?
            } else {
                self.parse_infix(left)?
            };
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Int(value) => {
                let token = self.cursor.bump();
                Ok(Expr::Int { token, value })
            }
            TokenKind::Float(value) => {
                let token = self.cursor.bump();
                Ok(Expr::Float { token, value })
            }
            TokenKind::Str => {
                let token = self.cursor.bump();
                let value = token.literal.clone();
                Ok(Expr::Str { token, value })
            }
            TokenKind::Ident => Ok(Expr::Ident(Ident::new(self.cursor.bump()))),
            TokenKind::Minus => {
                let token = self.cursor.bump();
                let operand = self.parse_expr(Precedence::Prefix)?;
                Ok(Expr::Prefix {
                    token,
                    op: PrefixOp::Neg,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Not => {
                let token = self.cursor.bump();
                // NOT binds looser than comparisons: NOT A = 1 negates
                // the whole comparison.
                let operand = self.parse_expr(Precedence::Logical)?;
                Ok(Expr::Prefix {
                    token,
                    op: PrefixOp::Not,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Fn => {
                let token = self.cursor.bump();
                let operand = self.parse_expr(Precedence::Prefix)?;
                if !matches!(operand, Expr::Call { .. }) {
                    return Err(ParseError::new(
                        "FN must be followed by a function call",
                        &token,
                    ));
                }
                Ok(Expr::Prefix {
                    token,
                    op: PrefixOp::Fn,
                    operand: Box::new(operand),
                })
            }
            TokenKind::LParen => {
                let token = self.cursor.bump();
                let inner = self.parse_expr(Precedence::Lowest)?;
                self.cursor.expect(TokenKind::RParen)?;
                Ok(Expr::Grouped {
                    token,
                    inner: Box::new(inner),
                })
            }
            _ => Err(ParseError::new(
                format!(
                    "unexpected token {} in expression",
                    self.cursor.current_kind().display_name()
                ),
                self.cursor.current(),
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr) -> Result<Expr, ParseError> {
        let precedence = token_precedence(self.cursor.current_kind());
        let token = self.cursor.bump();
        let op = InfixOp::from_token(token.kind)
            .ok_or_else(|| ParseError::unexpected(&token))?;
        let right = self.parse_expr(precedence)?;
        Ok(Expr::Infix {
            token,
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// `callee(arg, …)` — applied to builtins, arrays, and user functions
    /// alike; which one it is only becomes known at evaluation time.
    fn parse_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let token = self.cursor.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            args.push(self.parse_expr(Precedence::Lowest)?);
            while self.cursor.eat(TokenKind::Comma) {
                args.push(self.parse_expr(Precedence::Lowest)?);
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        Ok(Expr::Call {
            token,
            callee: Box::new(callee),
            args,
        })
    }
}
