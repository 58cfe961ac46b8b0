//! Statement parsing.
//!
//! One call to [`Parser::parse_line`] consumes one source line: an
//! optional leading line number, then `:`-separated statements. Anything
//! left over that is not a colon or the end of input is an "unexpected
//! token" error; the parser records it and resynchronizes at the next
//! statement boundary.

use crate::expr::Precedence;
use crate::{ParseError, Parser};
use basic_ir::{
    AssignTarget, BranchTarget, DataValue, DimDecl, Ident, JumpKind, Line, ListRange, Statement,
    Token, TokenKind,
};
use tracing::debug;

impl Parser {
    /// Parse one full source line.
    ///
    /// Always returns a [`Line`]; check [`errors`](Parser::errors) before
    /// executing it. A line that fails mid-way keeps the statements parsed
    /// so far, which is enough for diagnostics but not for execution.
    pub fn parse_line(&mut self) -> Line {
        debug!(token = ?self.cursor.current(), "parse_line");
        let number = self.parse_line_number();

        let mut statements = Vec::new();
        loop {
            if self.cursor.is_at_end() {
                break;
            }
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.record(err);
                    self.synchronize();
                }
            }
            if self.cursor.eat(TokenKind::Colon) {
                continue;
            }
            if self.cursor.is_at_end() {
                break;
            }
            self.record(ParseError::unexpected(self.cursor.current()));
            self.synchronize();
            if !self.cursor.eat(TokenKind::Colon) {
                break;
            }
        }

        let stmt = match statements.len() {
            0 => Statement::Empty {
                token: self.cursor.current().clone(),
            },
            1 => statements.remove(0),
            _ => Statement::Compound {
                token: statements[0].token().clone(),
                statements,
            },
        };
        Line { number, stmt }
    }

    /// A leading non-negative integer keys the line into the program.
    fn parse_line_number(&mut self) -> Option<u32> {
        if let TokenKind::Int(value) = self.cursor.current_kind() {
            let token = self.cursor.bump();
            match u32::try_from(value) {
                Ok(number) => return Some(number),
                Err(_) => {
                    self.record(ParseError::new(
                        format!("line number {value} out of range"),
                        &token,
                    ));
                    return None;
                }
            }
        }
        None
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Let => {
                let token = self.cursor.bump();
                self.parse_let(token)
            }
            TokenKind::Ident => {
                // LET keyword is optional.
                let token = self.cursor.current().clone();
                self.parse_let(token)
            }
            TokenKind::Print => self.parse_print(),
            TokenKind::Input => self.parse_input(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Next => self.parse_next(),
            TokenKind::Goto => {
                let token = self.cursor.bump();
                let line = self.parse_jump_target("GOTO")?;
                Ok(Statement::Goto { token, line })
            }
            TokenKind::Gosub => {
                let token = self.cursor.bump();
                let line = self.parse_jump_target("GOSUB")?;
                Ok(Statement::Gosub { token, line })
            }
            TokenKind::Return => Ok(Statement::Return {
                token: self.cursor.bump(),
            }),
            TokenKind::On => self.parse_on(),
            TokenKind::Rem => Ok(Statement::Rem {
                token: self.cursor.bump(),
            }),
            TokenKind::Data => self.parse_data(),
            TokenKind::Read => self.parse_read(),
            TokenKind::Restore => Ok(Statement::Restore {
                token: self.cursor.bump(),
            }),
            TokenKind::Def => self.parse_def(),
            TokenKind::Dim => self.parse_dim(),
            TokenKind::Run => Ok(Statement::Run {
                token: self.cursor.bump(),
            }),
            TokenKind::End => Ok(Statement::End {
                token: self.cursor.bump(),
            }),
            TokenKind::Cont => Ok(Statement::Cont {
                token: self.cursor.bump(),
            }),
            TokenKind::Clr => Ok(Statement::Clr {
                token: self.cursor.bump(),
            }),
            TokenKind::List => self.parse_list(),
            TokenKind::Load => {
                let token = self.cursor.bump();
                let filename = self.parse_expr(Precedence::Lowest)?;
                Ok(Statement::Load { token, filename })
            }
            TokenKind::Save => {
                let token = self.cursor.bump();
                let filename = self.parse_expr(Precedence::Lowest)?;
                Ok(Statement::Save { token, filename })
            }
            TokenKind::New => Ok(Statement::New {
                token: self.cursor.bump(),
            }),
            TokenKind::Stop => Ok(Statement::Stop {
                token: self.cursor.bump(),
            }),
            TokenKind::Graphics => self.parse_graphics(),
            TokenKind::Draw => self.parse_draw(),
            TokenKind::Box => self.parse_box(),
            TokenKind::Colon | TokenKind::Eof => Ok(Statement::Empty {
                token: self.cursor.current().clone(),
            }),
            _ => Err(ParseError::unexpected(self.cursor.current())),
        }
    }

    /// `[LET] target[, target]* = expr`
    fn parse_let(&mut self, token: Token) -> Result<Statement, ParseError> {
        let mut targets = vec![self.parse_assign_target()?];
        while self.cursor.eat(TokenKind::Comma) {
            targets.push(self.parse_assign_target()?);
        }
        self.cursor.expect(TokenKind::Assign)?;
        let value = self.parse_expr(Precedence::Lowest)?;
        Ok(Statement::Let {
            token,
            targets,
            value,
        })
    }

    /// An identifier, with array indices if a `(` follows directly.
    fn parse_assign_target(&mut self) -> Result<AssignTarget, ParseError> {
        let ident = Ident::new(self.cursor.expect(TokenKind::Ident)?);
        let mut indices = Vec::new();
        if self.cursor.eat(TokenKind::LParen) {
            indices.push(self.parse_expr(Precedence::Lowest)?);
            while self.cursor.eat(TokenKind::Comma) {
                indices.push(self.parse_expr(Precedence::Lowest)?);
            }
            self.cursor.expect(TokenKind::RParen)?;
        }
        Ok(AssignTarget { ident, indices })
    }

    /// `PRINT [expr…]` — commas and semicolons are separators with no
    /// effect on the tree.
    fn parse_print(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let mut args = Vec::new();
        loop {
            match self.cursor.current_kind() {
                TokenKind::Eof | TokenKind::Colon | TokenKind::Else => break,
                TokenKind::Comma | TokenKind::Semicolon => {
                    self.cursor.advance();
                }
                _ => args.push(self.parse_expr(Precedence::Lowest)?),
            }
        }
        Ok(Statement::Print { token, args })
    }

    /// `INPUT ["prompt";] ident[, ident]*`
    fn parse_input(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let mut prompt = None;
        if self.cursor.check(TokenKind::Str) {
            prompt = Some(self.cursor.bump().literal);
            self.cursor.expect(TokenKind::Semicolon)?;
        }
        let mut targets = vec![Ident::new(self.cursor.expect(TokenKind::Ident)?)];
        while self.cursor.eat(TokenKind::Comma) {
            targets.push(Ident::new(self.cursor.expect(TokenKind::Ident)?));
        }
        Ok(Statement::Input {
            token,
            prompt,
            targets,
        })
    }

    /// Jump targets must be integer literals; strings, floats, and
    /// variables are parse errors.
    fn parse_jump_target(&mut self, keyword: &str) -> Result<u32, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Int(value) => {
                let token = self.cursor.bump();
                u32::try_from(value).map_err(|_| {
                    ParseError::new(format!("line number {value} out of range"), &token)
                })
            }
            _ => Err(ParseError::new(
                format!("{keyword} requires an integer line number"),
                self.cursor.current(),
            )),
        }
    }

    /// `IF cond GOTO n` | `IF cond THEN n|stmt [ELSE n|stmt]`
    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let condition = self.parse_expr(Precedence::Lowest)?;

        let then_branch = if self.cursor.eat(TokenKind::Goto) {
            BranchTarget::Line(self.parse_jump_target("GOTO")?)
        } else if self.cursor.eat(TokenKind::Then) {
            self.parse_branch_target()?
        } else {
            return Err(ParseError::expected("THEN or GOTO", self.cursor.current()));
        };

        let else_branch = if self.cursor.eat(TokenKind::Else) {
            Some(self.parse_branch_target()?)
        } else {
            None
        };

        Ok(Statement::If {
            token,
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_branch_target(&mut self) -> Result<BranchTarget, ParseError> {
        if let TokenKind::Int(value) = self.cursor.current_kind() {
            let token = self.cursor.bump();
            let line = u32::try_from(value).map_err(|_| {
                ParseError::new(format!("line number {value} out of range"), &token)
            })?;
            return Ok(BranchTarget::Line(line));
        }
        let stmt = self.parse_statement()?;
        Ok(BranchTarget::Stmt(Box::new(stmt)))
    }

    /// `FOR ident = from TO to [STEP step]`
    fn parse_for(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let iterator = Ident::new(self.cursor.expect(TokenKind::Ident)?);
        self.cursor.expect(TokenKind::Assign)?;
        let from = self.parse_expr(Precedence::Lowest)?;
        self.cursor.expect(TokenKind::To)?;
        let to = self.parse_expr(Precedence::Lowest)?;
        let step = if self.cursor.eat(TokenKind::Step) {
            Some(self.parse_expr(Precedence::Lowest)?)
        } else {
            None
        };
        Ok(Statement::For {
            token,
            iterator,
            from,
            to,
            step,
        })
    }

    /// `NEXT [ident[, ident]*]` — no iterator means the top of the FOR
    /// stack.
    fn parse_next(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let mut iterators = Vec::new();
        if self.cursor.check(TokenKind::Ident) {
            iterators.push(Ident::new(self.cursor.bump()));
            while self.cursor.eat(TokenKind::Comma) {
                iterators.push(Ident::new(self.cursor.expect(TokenKind::Ident)?));
            }
        }
        Ok(Statement::Next { token, iterators })
    }

    /// `ON expr GOTO|GOSUB n[, n]*`
    fn parse_on(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let selector = self.parse_expr(Precedence::Lowest)?;
        let kind = if self.cursor.eat(TokenKind::Goto) {
            JumpKind::Goto
        } else if self.cursor.eat(TokenKind::Gosub) {
            JumpKind::Gosub
        } else {
            return Err(ParseError::expected("GOTO or GOSUB", self.cursor.current()));
        };
        let mut lines = vec![self.parse_jump_target(kind.keyword())?];
        while self.cursor.eat(TokenKind::Comma) {
            lines.push(self.parse_jump_target(kind.keyword())?);
        }
        Ok(Statement::On {
            token,
            selector,
            kind,
            lines,
        })
    }

    /// `DATA value[,|; value]*` — integers, floats, strings, bare
    /// identifiers, and negated numbers only.
    fn parse_data(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let mut values = vec![self.parse_data_value()?];
        while self.cursor.check(TokenKind::Comma) || self.cursor.check(TokenKind::Semicolon) {
            self.cursor.advance();
            values.push(self.parse_data_value()?);
        }
        Ok(Statement::Data { token, values })
    }

    fn parse_data_value(&mut self) -> Result<DataValue, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Int(value) => {
                self.cursor.advance();
                Ok(DataValue::Int(value))
            }
            TokenKind::Float(value) => {
                self.cursor.advance();
                Ok(DataValue::Float(value))
            }
            TokenKind::Str => Ok(DataValue::Str(self.cursor.bump().literal)),
            // A bare identifier reads as the string of its name.
            TokenKind::Ident => Ok(DataValue::Str(self.cursor.bump().literal)),
            TokenKind::Minus => {
                let minus = self.cursor.bump();
                match self.cursor.current_kind() {
                    TokenKind::Int(value) => {
                        self.cursor.advance();
                        Ok(DataValue::Int(-value))
                    }
                    TokenKind::Float(value) => {
                        self.cursor.advance();
                        Ok(DataValue::Float(-value))
                    }
                    _ => Err(ParseError::new("illegal DATA value", &minus)),
                }
            }
            _ => Err(ParseError::new("illegal DATA value", self.cursor.current())),
        }
    }

    /// `READ target[, target]*`
    fn parse_read(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let mut targets = vec![self.parse_assign_target()?];
        while self.cursor.eat(TokenKind::Comma) {
            targets.push(self.parse_assign_target()?);
        }
        Ok(Statement::Read { token, targets })
    }

    /// `DEF FN name([arg]) = expr`
    fn parse_def(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        self.cursor.expect(TokenKind::Fn)?;
        let name = Ident::new(self.cursor.expect(TokenKind::Ident)?);
        self.cursor.expect(TokenKind::LParen)?;
        let param = if self.cursor.check(TokenKind::Ident) {
            Some(Ident::new(self.cursor.bump()))
        } else {
            None
        };
        self.cursor.expect(TokenKind::RParen)?;
        self.cursor.expect(TokenKind::Assign)?;
        let body = self.parse_expr(Precedence::Lowest)?;
        Ok(Statement::Def {
            token,
            name,
            param,
            body,
        })
    }

    /// `DIM name(expr[, expr]*)[, name(…)]*`
    fn parse_dim(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let mut decls = vec![self.parse_dim_decl()?];
        while self.cursor.eat(TokenKind::Comma) {
            decls.push(self.parse_dim_decl()?);
        }
        Ok(Statement::Dim { token, decls })
    }

    fn parse_dim_decl(&mut self) -> Result<DimDecl, ParseError> {
        let ident = Ident::new(self.cursor.expect(TokenKind::Ident)?);
        self.cursor.expect(TokenKind::LParen)?;
        let mut dims = vec![self.parse_expr(Precedence::Lowest)?];
        while self.cursor.eat(TokenKind::Comma) {
            dims.push(self.parse_expr(Precedence::Lowest)?);
        }
        self.cursor.expect(TokenKind::RParen)?;
        Ok(DimDecl { ident, dims })
    }

    /// `LIST [a | a- | -b | a-b]` — bounds parse below additive strength
    /// so the range dash is never taken as subtraction.
    fn parse_list(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let mut range = ListRange::default();

        if self.cursor.eat(TokenKind::Minus) {
            range.dashed = true;
            range.end = Some(self.parse_expr(Precedence::Sum)?);
        } else if !matches!(
            self.cursor.current_kind(),
            TokenKind::Eof | TokenKind::Colon | TokenKind::Else
        ) {
            range.start = Some(self.parse_expr(Precedence::Sum)?);
            if self.cursor.eat(TokenKind::Minus) {
                range.dashed = true;
                if !matches!(
                    self.cursor.current_kind(),
                    TokenKind::Eof | TokenKind::Colon | TokenKind::Else
                ) {
                    range.end = Some(self.parse_expr(Precedence::Sum)?);
                }
            }
        }
        Ok(Statement::List { token, range })
    }

    /// `GRAPHICS width, height`
    fn parse_graphics(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let width = self.parse_expr(Precedence::Lowest)?;
        self.cursor.expect(TokenKind::Comma)?;
        let height = self.parse_expr(Precedence::Lowest)?;
        Ok(Statement::Graphics {
            token,
            width,
            height,
        })
    }

    /// `DRAW color, x1, y1 [TO x2, y2]`
    fn parse_draw(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let color = self.parse_expr(Precedence::Lowest)?;
        self.cursor.expect(TokenKind::Comma)?;
        let x1 = self.parse_expr(Precedence::Lowest)?;
        self.cursor.expect(TokenKind::Comma)?;
        let y1 = self.parse_expr(Precedence::Lowest)?;
        let to = if self.cursor.eat(TokenKind::To) {
            let x2 = self.parse_expr(Precedence::Lowest)?;
            self.cursor.expect(TokenKind::Comma)?;
            let y2 = self.parse_expr(Precedence::Lowest)?;
            Some((x2, y2))
        } else {
            None
        };
        Ok(Statement::Draw {
            token,
            color,
            x1,
            y1,
            to,
        })
    }

    /// `BOX color, left, top, width, height`
    fn parse_box(&mut self) -> Result<Statement, ParseError> {
        let token = self.cursor.bump();
        let color = self.parse_expr(Precedence::Lowest)?;
        self.cursor.expect(TokenKind::Comma)?;
        let left = self.parse_expr(Precedence::Lowest)?;
        self.cursor.expect(TokenKind::Comma)?;
        let top = self.parse_expr(Precedence::Lowest)?;
        self.cursor.expect(TokenKind::Comma)?;
        let width = self.parse_expr(Precedence::Lowest)?;
        self.cursor.expect(TokenKind::Comma)?;
        let height = self.parse_expr(Precedence::Lowest)?;
        Ok(Statement::Box {
            token,
            color,
            left,
            top,
            width,
            height,
        })
    }
}
