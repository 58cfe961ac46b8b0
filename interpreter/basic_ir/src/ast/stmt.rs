//! Statement nodes, the canonical `LIST` rendering, and line-reference
//! discovery.

use super::expr::{render_float, Expr, Ident};
use crate::Token;
use std::fmt;

/// One assignment destination: an identifier plus optional array indices.
#[derive(Clone, PartialEq, Debug)]
pub struct AssignTarget {
    pub ident: Ident,
    /// Empty for scalar targets.
    pub indices: Vec<Expr>,
}

impl fmt::Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ident)?;
        if !self.indices.is_empty() {
            f.write_str("(")?;
            for (i, idx) in self.indices.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{idx}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Destination of an `IF` branch: a line number or a nested statement.
#[derive(Clone, PartialEq, Debug)]
pub enum BranchTarget {
    Line(u32),
    Stmt(Box<Statement>),
}

impl fmt::Display for BranchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchTarget::Line(n) => write!(f, "{n}"),
            BranchTarget::Stmt(stmt) => write!(f, "{stmt}"),
        }
    }
}

/// Whether an `ON` statement jumps or calls.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum JumpKind {
    Goto,
    Gosub,
}

impl JumpKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JumpKind::Goto => "GOTO",
            JumpKind::Gosub => "GOSUB",
        }
    }
}

/// A pre-evaluated `DATA` constant.
///
/// The parser folds unary minus and turns bare identifiers into strings of
/// their uppercased name, so the RUN-time pool build is a plain copy.
#[derive(Clone, PartialEq, Debug)]
pub enum DataValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Int(n) => write!(f, "{n}"),
            DataValue::Float(v) => f.write_str(&render_float(*v)),
            DataValue::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

/// One `DIM` declaration: a name and its dimension expressions.
#[derive(Clone, PartialEq, Debug)]
pub struct DimDecl {
    pub ident: Ident,
    pub dims: Vec<Expr>,
}

impl fmt::Display for DimDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ident)?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dim}")?;
        }
        f.write_str(")")
    }
}

/// `LIST` range: `a`, `a-`, `-b`, or `a-b`. A single bound without a dash
/// means start and end coincide.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ListRange {
    pub start: Option<Expr>,
    pub end: Option<Expr>,
    pub dashed: bool,
}

impl ListRange {
    /// `LIST` with no range at all.
    pub fn is_all(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// A statement node. Each variant keeps the keyword token it began at.
#[derive(Clone, PartialEq, Debug)]
pub enum Statement {
    Let {
        token: Token,
        targets: Vec<AssignTarget>,
        value: Expr,
    },
    Print {
        token: Token,
        args: Vec<Expr>,
    },
    Input {
        token: Token,
        prompt: Option<String>,
        targets: Vec<Ident>,
    },
    If {
        token: Token,
        condition: Expr,
        then_branch: BranchTarget,
        else_branch: Option<BranchTarget>,
    },
    For {
        token: Token,
        iterator: Ident,
        from: Expr,
        to: Expr,
        step: Option<Expr>,
    },
    Next {
        token: Token,
        iterators: Vec<Ident>,
    },
    Goto {
        token: Token,
        line: u32,
    },
    Gosub {
        token: Token,
        line: u32,
    },
    Return {
        token: Token,
    },
    On {
        token: Token,
        selector: Expr,
        kind: JumpKind,
        lines: Vec<u32>,
    },
    /// The token literal holds the whole comment, `REM` included.
    Rem {
        token: Token,
    },
    Data {
        token: Token,
        values: Vec<DataValue>,
    },
    Read {
        token: Token,
        targets: Vec<AssignTarget>,
    },
    Restore {
        token: Token,
    },
    Def {
        token: Token,
        name: Ident,
        param: Option<Ident>,
        body: Expr,
    },
    Dim {
        token: Token,
        decls: Vec<DimDecl>,
    },
    Run {
        token: Token,
    },
    End {
        token: Token,
    },
    Cont {
        token: Token,
    },
    Clr {
        token: Token,
    },
    List {
        token: Token,
        range: ListRange,
    },
    Load {
        token: Token,
        filename: Expr,
    },
    Save {
        token: Token,
        filename: Expr,
    },
    New {
        token: Token,
    },
    Stop {
        token: Token,
    },
    Graphics {
        token: Token,
        width: Expr,
        height: Expr,
    },
    Draw {
        token: Token,
        color: Expr,
        x1: Expr,
        y1: Expr,
        to: Option<(Expr, Expr)>,
    },
    Box {
        token: Token,
        color: Expr,
        left: Expr,
        top: Expr,
        width: Expr,
        height: Expr,
    },
    /// `:`-separated statements sharing one line number.
    Compound {
        token: Token,
        statements: Vec<Statement>,
    },
    Empty {
        token: Token,
    },
}

impl Statement {
    /// The token this statement began at.
    pub fn token(&self) -> &Token {
        match self {
            Statement::Let { token, .. }
            | Statement::Print { token, .. }
            | Statement::Input { token, .. }
            | Statement::If { token, .. }
            | Statement::For { token, .. }
            | Statement::Next { token, .. }
            | Statement::Goto { token, .. }
            | Statement::Gosub { token, .. }
            | Statement::Return { token }
            | Statement::On { token, .. }
            | Statement::Rem { token }
            | Statement::Data { token, .. }
            | Statement::Read { token, .. }
            | Statement::Restore { token }
            | Statement::Def { token, .. }
            | Statement::Dim { token, .. }
            | Statement::Run { token }
            | Statement::End { token }
            | Statement::Cont { token }
            | Statement::Clr { token }
            | Statement::List { token, .. }
            | Statement::Load { token, .. }
            | Statement::Save { token, .. }
            | Statement::New { token }
            | Statement::Stop { token }
            | Statement::Graphics { token, .. }
            | Statement::Draw { token, .. }
            | Statement::Box { token, .. }
            | Statement::Compound { token, .. }
            | Statement::Empty { token } => token,
        }
    }

    /// Every line number this statement jumps to, in source order.
    ///
    /// Read-only discovery; existence is not validated here.
    pub fn line_refs(&self) -> Vec<u32> {
        fn collect(stmt: &Statement, out: &mut Vec<u32>) {
            match stmt {
                Statement::Goto { line, .. } | Statement::Gosub { line, .. } => out.push(*line),
                Statement::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    collect_branch(then_branch, out);
                    if let Some(branch) = else_branch {
                        collect_branch(branch, out);
                    }
                }
                Statement::On { lines, .. } => out.extend_from_slice(lines),
                Statement::Compound { statements, .. } => {
                    for sub in statements {
                        collect(sub, out);
                    }
                }
                _ => {}
            }
        }
        fn collect_branch(branch: &BranchTarget, out: &mut Vec<u32>) {
            match branch {
                BranchTarget::Line(n) => out.push(*n),
                BranchTarget::Stmt(stmt) => collect(stmt, out),
            }
        }

        let mut refs = Vec::new();
        collect(self, &mut refs);
        refs
    }
}

fn write_comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { targets, value, .. } => {
                f.write_str("LET ")?;
                write_comma_list(f, targets)?;
                write!(f, " = {value}")
            }
            Statement::Print { args, .. } => {
                f.write_str("PRINT")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Statement::Input {
                prompt, targets, ..
            } => {
                f.write_str("INPUT ")?;
                if let Some(prompt) = prompt {
                    write!(f, "\"{prompt}\"; ")?;
                }
                write_comma_list(f, targets)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                write!(f, "IF {condition} THEN {then_branch}")?;
                if let Some(branch) = else_branch {
                    write!(f, " ELSE {branch}")?;
                }
                Ok(())
            }
            Statement::For {
                iterator,
                from,
                to,
                step,
                ..
            } => {
                write!(f, "FOR {iterator} = {from} TO {to}")?;
                if let Some(step) = step {
                    write!(f, " STEP {step}")?;
                }
                Ok(())
            }
            Statement::Next { iterators, .. } => {
                f.write_str("NEXT")?;
                if !iterators.is_empty() {
                    f.write_str(" ")?;
                    write_comma_list(f, iterators)?;
                }
                Ok(())
            }
            Statement::Goto { line, .. } => write!(f, "GOTO {line}"),
            Statement::Gosub { line, .. } => write!(f, "GOSUB {line}"),
            Statement::Return { .. } => f.write_str("RETURN"),
            Statement::On {
                selector,
                kind,
                lines,
                ..
            } => {
                write!(f, "ON {selector} {} ", kind.keyword())?;
                write_comma_list(f, lines)
            }
            Statement::Rem { token } => f.write_str(&token.literal),
            Statement::Data { values, .. } => {
                f.write_str("DATA ")?;
                write_comma_list(f, values)
            }
            Statement::Read { targets, .. } => {
                f.write_str("READ ")?;
                write_comma_list(f, targets)
            }
            Statement::Restore { .. } => f.write_str("RESTORE"),
            Statement::Def {
                name, param, body, ..
            } => {
                write!(f, "DEF FN {name}(")?;
                if let Some(param) = param {
                    write!(f, "{param}")?;
                }
                write!(f, ") = {body}")
            }
            Statement::Dim { decls, .. } => {
                f.write_str("DIM ")?;
                write_comma_list(f, decls)
            }
            Statement::Run { .. } => f.write_str("RUN"),
            Statement::End { .. } => f.write_str("END"),
            Statement::Cont { .. } => f.write_str("CONT"),
            Statement::Clr { .. } => f.write_str("CLR"),
            Statement::List { range, .. } => {
                f.write_str("LIST")?;
                match (&range.start, &range.end, range.dashed) {
                    (Some(start), Some(end), _) => write!(f, " {start}-{end}"),
                    (Some(start), None, true) => write!(f, " {start}-"),
                    (Some(start), None, false) => write!(f, " {start}"),
                    (None, Some(end), _) => write!(f, " -{end}"),
                    (None, None, _) => Ok(()),
                }
            }
            Statement::Load { filename, .. } => write!(f, "LOAD {filename}"),
            Statement::Save { filename, .. } => write!(f, "SAVE {filename}"),
            Statement::New { .. } => f.write_str("NEW"),
            Statement::Stop { .. } => f.write_str("STOP"),
            Statement::Graphics { width, height, .. } => write!(f, "GRAPHICS {width}, {height}"),
            Statement::Draw {
                color, x1, y1, to, ..
            } => {
                write!(f, "DRAW {color}, {x1}, {y1}")?;
                if let Some((x2, y2)) = to {
                    write!(f, " TO {x2}, {y2}")?;
                }
                Ok(())
            }
            Statement::Box {
                color,
                left,
                top,
                width,
                height,
                ..
            } => write!(f, "BOX {color}, {left}, {top}, {width}, {height}"),
            Statement::Compound { statements, .. } => {
                for (i, stmt) in statements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" : ")?;
                    }
                    write!(f, "{stmt}")?;
                }
                Ok(())
            }
            Statement::Empty { .. } => Ok(()),
        }
    }
}

/// One parsed source line: an optional line number and its statement.
#[derive(Clone, PartialEq, Debug)]
pub struct Line {
    pub number: Option<u32>,
    pub stmt: Statement,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(number) => write!(f, "{number} {}", self.stmt),
            None => write!(f, "{}", self.stmt),
        }
    }
}
