//! The evaluator: a statement-linked execution loop over the stored
//! program and immediate statements.
//!
//! # Execution model
//!
//! The program store flattens into a slot list (compound members spliced
//! inline), so "the next statement" is the next slot. An execution
//! address is either a slot of the stored program or a slot of the
//! current immediate statement; jumps carry `Option<Addr>` where `None`
//! means "fall off the end". One loop iteration polls the cancellation
//! flag and wall-clock deadline, dispatches one statement, then advances
//! to whatever successor the dispatch selected.
//!
//! # State machine
//!
//! `IDLE → RUNNING` on any top-level invocation, back to `IDLE` at
//! program end, END/STOP, a runtime error, or cancellation. A second
//! immediate invocation while running fails with BUSY. END records the
//! continuation point for CONT; STOP and errors clear it; editing the
//! program invalidates it.

mod builder;


pub use builder::InterpreterBuilder;

use crate::array::{ArrayValue, Dims};
use crate::builtins::{self, Builtin};
use crate::errors::{
    self, bad_subscript, cant_continue, empty_program, illegal_quantity, next_without_for,
    out_of_data, return_without_gosub, type_mismatch, undefined_function, undefined_statement,
    wrong_argument_count, EvalError, EvalResult,
};
use crate::graphics::{self, Surface};
use crate::host::Host;
use crate::program::{self, Program};
use crate::scope::Environment;
use crate::value::{FunctionValue, Value};
use basic_ir::{
    AssignTarget, BranchTarget, Expr, Ident, InfixOp, JumpKind, Line, ListRange, PrefixOp,
    Statement, ValueType,
};
use rand::rngs::StdRng;
use smallvec::SmallVec;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Whether an execution loop is live.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum State {
    Idle,
    Running,
}

/// An execution address: a slot of the immediate statement or of the
/// stored program.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
enum Addr {
    Immediate(usize),
    Program(usize),
}

/// What a dispatched statement asks the loop to do next.
#[derive(Debug)]
enum Flow {
    /// Fall through to the default successor.
    Next,
    /// Transfer control; `None` ends the run.
    Jump(Option<Addr>),
    /// END: record the continuation point and idle.
    End,
    /// STOP: idle without a continuation point.
    Stop,
}

/// A live FOR loop.
struct ForFrame {
    /// Uppercased iterator name.
    iterator: String,
    /// The loop bound, re-evaluated at each NEXT.
    to: Expr,
    /// The step, re-evaluated at each NEXT; missing means `1`.
    step: Option<Expr>,
    /// The statement immediately after the FOR.
    resume: Option<Addr>,
}

/// Cooperative cancellation handle; safe to trigger from another thread.
#[derive(Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request cancellation; honored before the next statement dispatch.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// The interpreter instance: program, variables, stacks, DATA pool,
/// continuation point, and the host seam.
pub struct Interpreter {
    pub(crate) program: Program,
    pub(crate) env: Environment,
    pub(crate) for_stack: Vec<ForFrame>,
    pub(crate) gosub_stack: Vec<Option<Addr>>,
    pub(crate) data_pool: Vec<Value>,
    pub(crate) data_cursor: usize,
    pub(crate) cont_point: Option<Addr>,
    pub(crate) state: State,
    pub(crate) immediate: Vec<Rc<Statement>>,
    pub(crate) surface: Option<Box<dyn Surface>>,
    pub(crate) host: Box<dyn Host>,
    pub(crate) stop_flag: Arc<AtomicBool>,
    pub(crate) time_limit: Duration,
    pub(crate) rng: StdRng,
}

impl Interpreter {
    /// Build with the default configuration (10 s wall-clock cap).
    pub fn new(host: impl Host + 'static) -> Self {
        InterpreterBuilder::new(host).build()
    }

    /// Start configuring an interpreter.
    pub fn builder(host: impl Host + 'static) -> InterpreterBuilder {
        InterpreterBuilder::new(host)
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Handle for cancelling a run in progress.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: Arc::clone(&self.stop_flag),
        }
    }

    /// The graphics surface, if GRAPHICS created one.
    pub fn surface(&self) -> Option<&dyn Surface> {
        self.surface.as_deref()
    }

    /// Read a variable as the program would see it.
    pub fn variable(&self, name: &str) -> Option<Value> {
        self.env.lookup(name)
    }

    /// The canonical listing of the stored program.
    pub fn listing(&self) -> String {
        self.program.render()
    }

    /// Run one parsed line: numbered lines are stored, everything else
    /// executes immediately.
    pub fn run_immediate(&mut self, line: Line) -> Result<(), EvalError> {
        if let Some(number) = line.number {
            debug!(number, "store line");
            self.program.insert(number, line.stmt);
            self.cont_point = None;
            return Ok(());
        }
        if self.state == State::Running {
            return Err(errors::busy());
        }

        self.state = State::Running;
        self.stop_flag.store(false, Ordering::Relaxed);
        let mut flat = Vec::new();
        program::flatten(&line.stmt, &mut flat);
        self.immediate = flat;

        let deadline = Instant::now() + self.time_limit;
        let result = self.exec_loop(Addr::Immediate(0), deadline);
        self.state = State::Idle;
        if result.is_err() {
            // CONT is not available after an error.
            self.cont_point = None;
        }
        result
    }

    /// Feed multi-line source through the immediate pipeline, stopping at
    /// the first parse or runtime error.
    pub fn run_source(&mut self, source: &str) -> Result<(), EvalError> {
        for text in source.lines() {
            if text.trim().is_empty() {
                continue;
            }
            let line = basic_parse::parse_line(text).map_err(|errs| {
                let detail = errs
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                EvalError::new(format!("SYNTAX: {detail}"))
            })?;
            self.run_immediate(line)?;
        }
        Ok(())
    }

    // --- execution loop ---

    fn exec_loop(&mut self, start: Addr, deadline: Instant) -> Result<(), EvalError> {
        let mut addr = Some(start);
        while let Some(current) = addr {
            if self.stop_flag.load(Ordering::Relaxed) || Instant::now() >= deadline {
                trace!(?current, "run cancelled");
                // Cancellation is recoverable with CONT when it halted
                // inside the stored program.
                self.cont_point = match current {
                    Addr::Program(_) => Some(current),
                    Addr::Immediate(_) => None,
                };
                return Ok(());
            }
            let Some(stmt) = self.stmt_at(current) else {
                break;
            };
            let line = self.line_of(current);
            trace!(?line, stmt = %stmt, "dispatch");
            let next = self.next_addr(current);
            match self.dispatch(&stmt, current).map_err(|e| e.at_line(line))? {
                Flow::Next => addr = next,
                Flow::Jump(target) => addr = target,
                Flow::End => {
                    self.cont_point = match next {
                        Some(Addr::Program(_)) => next,
                        _ => None,
                    };
                    return Ok(());
                }
                Flow::Stop => {
                    self.cont_point = None;
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn stmt_at(&self, addr: Addr) -> Option<Rc<Statement>> {
        match addr {
            Addr::Immediate(index) => self.immediate.get(index).cloned(),
            Addr::Program(index) => self.program.slot(index).map(|slot| Rc::clone(&slot.stmt)),
        }
    }

    fn line_of(&self, addr: Addr) -> Option<u32> {
        match addr {
            Addr::Immediate(_) => None,
            Addr::Program(index) => self.program.slot(index).map(|slot| slot.line),
        }
    }

    fn next_addr(&self, addr: Addr) -> Option<Addr> {
        match addr {
            Addr::Immediate(index) if index + 1 < self.immediate.len() => {
                Some(Addr::Immediate(index + 1))
            }
            Addr::Program(index) if index + 1 < self.program.slot_count() => {
                Some(Addr::Program(index + 1))
            }
            _ => None,
        }
    }

    /// Reset the interpreter state for a fresh RUN: variables, stacks,
    /// DATA pool, continuation point.
    fn reset_run_state(&mut self) {
        self.env.clear();
        self.seed_globals();
        self.for_stack.clear();
        self.gosub_stack.clear();
        self.program.relink();
        self.data_pool = self
            .program
            .data_values()
            .into_iter()
            .map(|v| match v {
                basic_ir::DataValue::Int(n) => Value::int(n),
                basic_ir::DataValue::Float(x) => Value::float(x),
                basic_ir::DataValue::Str(s) => Value::string(s),
            })
            .collect();
        self.data_cursor = 0;
        self.cont_point = None;
    }

    pub(crate) fn seed_globals(&mut self) {
        self.env
            .define_global("PI", Value::float(std::f64::consts::PI));
    }

    // --- statement dispatch ---

    fn dispatch(&mut self, stmt: &Statement, current: Addr) -> Result<Flow, EvalError> {
        match stmt {
            Statement::Rem { .. } | Statement::Empty { .. } | Statement::Data { .. } => {
                Ok(Flow::Next)
            }

            Statement::Print { args, .. } => {
                let mut text = String::new();
                for arg in args {
                    let value = self.eval_expr(arg, false)?;
                    text.push_str(&value.display_value());
                }
                self.host.print(&text).map_err(errors::host_rejection)?;
                Ok(Flow::Next)
            }

            Statement::Let { targets, value, .. } => {
                let value = self.eval_expr(value, false)?;
                for target in targets {
                    self.assign_target(target, value.clone())?;
                }
                Ok(Flow::Next)
            }

            Statement::Input {
                prompt, targets, ..
            } => {
                if let Some(prompt) = prompt {
                    self.host.print(prompt).map_err(errors::host_rejection)?;
                }
                for target in targets {
                    let raw = self.host.input(None).map_err(errors::host_rejection)?;
                    let value = self.parse_input(&raw, target.value_type())?;
                    self.env.define(target.name.clone(), value);
                }
                Ok(Flow::Next)
            }

            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let cond = self.eval_expr(condition, true)?;
                if cond.is_truthy() {
                    self.exec_branch(then_branch, current)
                } else if let Some(branch) = else_branch {
                    self.exec_branch(branch, current)
                } else {
                    Ok(Flow::Next)
                }
            }

            Statement::Goto { line, .. } => self.goto(*line),

            Statement::Gosub { line, .. } => {
                self.gosub_stack.push(self.next_addr(current));
                self.goto(*line)
            }

            Statement::Return { .. } => match self.gosub_stack.pop() {
                Some(target) => Ok(Flow::Jump(target)),
                None => Err(return_without_gosub()),
            },

            Statement::On {
                selector,
                kind,
                lines,
                ..
            } => {
                let value = self
                    .eval_expr(selector, false)?
                    .as_number()
                    .ok_or_else(type_mismatch)?;
                let index = value.floor();
                if index < 1.0 || index > lines.len() as f64 {
                    return Err(illegal_quantity());
                }
                let target = lines[index as usize - 1];
                if *kind == JumpKind::Gosub {
                    self.gosub_stack.push(self.next_addr(current));
                }
                self.goto(target)
            }

            Statement::For {
                iterator,
                from,
                to,
                step,
                ..
            } => {
                let from = self.eval_expr(from, false)?;
                let seeded = coerce(from, iterator.value_type())?;
                self.env.define(iterator.name.clone(), seeded);
                self.for_stack.push(ForFrame {
                    iterator: iterator.name.clone(),
                    to: to.clone(),
                    step: step.clone(),
                    resume: self.next_addr(current),
                });
                Ok(Flow::Next)
            }

            Statement::Next { iterators, .. } => {
                if iterators.is_empty() {
                    return self.step_next(None);
                }
                for ident in iterators {
                    if let Flow::Jump(target) = self.step_next(Some(ident.name.as_str()))? {
                        return Ok(Flow::Jump(target));
                    }
                }
                Ok(Flow::Next)
            }

            Statement::Read { targets, .. } => {
                for target in targets {
                    if self.data_cursor >= self.data_pool.len() {
                        return Err(out_of_data());
                    }
                    let value = self.data_pool[self.data_cursor].clone();
                    self.data_cursor += 1;
                    self.assign_target(target, value)?;
                }
                Ok(Flow::Next)
            }

            Statement::Restore { .. } => {
                self.data_cursor = 0;
                Ok(Flow::Next)
            }

            Statement::Def {
                name, param, body, ..
            } => {
                let function = FunctionValue {
                    param: param.as_ref().map(|p| p.name.clone()),
                    body: Rc::new(body.clone()),
                };
                self.env
                    .define_global(name.name.clone(), Value::Function(function));
                Ok(Flow::Next)
            }

            Statement::Dim { decls, .. } => {
                for decl in decls {
                    let mut dims = Dims::new();
                    for dim in &decl.dims {
                        let bound = self
                            .eval_expr(dim, false)?
                            .as_number()
                            .ok_or_else(type_mismatch)?
                            .floor();
                        if bound < 0.0 {
                            return Err(illegal_quantity());
                        }
                        // DIM A(10) spans indices 0..=10.
                        dims.push(bound as usize + 1);
                    }
                    let array = ArrayValue::new(decl.ident.value_type(), dims);
                    self.env
                        .define(decl.ident.name.clone(), Value::Array(array.into_ref()));
                }
                Ok(Flow::Next)
            }

            Statement::Run { .. } => {
                if self.program.is_empty() {
                    return Err(empty_program());
                }
                self.reset_run_state();
                Ok(Flow::Jump(Some(Addr::Program(0))))
            }

            Statement::End { .. } => Ok(Flow::End),
            Statement::Stop { .. } => Ok(Flow::Stop),

            Statement::Cont { .. } => match self.cont_point {
                Some(addr) => Ok(Flow::Jump(Some(addr))),
                None => Err(cant_continue()),
            },

            Statement::Clr { .. } => {
                self.env.clear();
                self.seed_globals();
                self.for_stack.clear();
                self.gosub_stack.clear();
                Ok(Flow::Next)
            }

            Statement::New { .. } => {
                self.program.clear();
                self.reset_run_state();
                self.surface = None;
                Ok(Flow::Next)
            }

            Statement::List { range, .. } => {
                let (start, end) = self.list_bounds(range)?;
                let text = self.program.render_range(start, end);
                self.host.list(&text).map_err(errors::host_rejection)?;
                Ok(Flow::Next)
            }

            Statement::Load { filename, .. } => self.load(filename),

            Statement::Save { filename, .. } => {
                let name = self.eval_string(filename)?;
                let text = self.program.render();
                self.host
                    .save(&name, &text)
                    .map_err(errors::host_rejection)?;
                Ok(Flow::Next)
            }

            Statement::Graphics { width, height, .. } => {
                let w = self.eval_dimension(width)?;
                let h = self.eval_dimension(height)?;
                let surface = self
                    .host
                    .create_image(w, h)
                    .map_err(errors::host_rejection)?;
                self.surface = Some(surface);
                Ok(Flow::Next)
            }

            Statement::Draw {
                color, x1, y1, to, ..
            } => {
                let color = self.eval_string(color)?;
                let x1 = self.eval_coord(x1)?;
                let y1 = self.eval_coord(y1)?;
                let endpoint = match to {
                    Some((x2, y2)) => Some((self.eval_coord(x2)?, self.eval_coord(y2)?)),
                    None => None,
                };
                let surface = self
                    .surface
                    .as_deref_mut()
                    .ok_or_else(errors::no_graphics_surface)?;
                match endpoint {
                    Some((x2, y2)) => graphics::draw_line(surface, x1, y1, x2, y2, &color),
                    None => graphics::draw_point(surface, x1, y1, &color),
                }
                Ok(Flow::Next)
            }

            Statement::Box {
                color,
                left,
                top,
                width,
                height,
                ..
            } => {
                let color = self.eval_string(color)?;
                let left = self.eval_coord(left)?;
                let top = self.eval_coord(top)?;
                let width = self.eval_coord(width)?;
                let height = self.eval_coord(height)?;
                let surface = self
                    .surface
                    .as_deref_mut()
                    .ok_or_else(errors::no_graphics_surface)?;
                graphics::draw_box(surface, left, top, width, height, &color);
                Ok(Flow::Next)
            }

            // Compounds are flattened before execution; a nested one only
            // appears via programmatic construction.
            Statement::Compound { statements, .. } => {
                for sub in statements {
                    match self.dispatch(sub, current)? {
                        Flow::Next => {}
                        other => return Ok(other),
                    }
                }
                Ok(Flow::Next)
            }
        }
    }

    // --- dispatch helpers ---

    fn goto(&self, line: u32) -> Result<Flow, EvalError> {
        match self.program.line_slot(line) {
            Some(slot) => Ok(Flow::Jump(Some(Addr::Program(slot)))),
            None => Err(undefined_statement(line)),
        }
    }

    fn exec_branch(&mut self, branch: &BranchTarget, current: Addr) -> Result<Flow, EvalError> {
        match branch {
            BranchTarget::Line(line) => self.goto(*line),
            BranchTarget::Stmt(stmt) => self.dispatch(stmt, current),
        }
    }

    /// Step one FOR frame at a NEXT; `None` means "the top frame".
    /// Returns `Flow::Jump` to re-enter the body, `Flow::Next` when the
    /// loop completed and its frame was dropped.
    fn step_next(&mut self, name: Option<&str>) -> Result<Flow, EvalError> {
        let index = match name {
            None => self
                .for_stack
                .len()
                .checked_sub(1)
                .ok_or_else(next_without_for)?,
            Some(name) => self
                .for_stack
                .iter()
                .rposition(|frame| frame.iterator == name)
                .ok_or_else(next_without_for)?,
        };
        // NEXT on an outer loop unwinds the inner frames above it.
        self.for_stack.truncate(index + 1);

        let (iterator, to_expr, step_expr, resume) = {
            let frame = &self.for_stack[index];
            (
                frame.iterator.clone(),
                frame.to.clone(),
                frame.step.clone(),
                frame.resume,
            )
        };

        let step = match &step_expr {
            Some(expr) => self
                .eval_expr(expr, false)?
                .as_number()
                .ok_or_else(type_mismatch)?,
            None => 1.0,
        };
        let current_value = self
            .env
            .lookup(&iterator)
            .and_then(|v| v.as_number())
            .ok_or_else(type_mismatch)?;
        let stepped = current_value + step;
        let rebound = coerce(Value::float(stepped), ValueType::from_name(&iterator))?;
        self.env.define(iterator.clone(), rebound);

        let to = self
            .eval_expr(&to_expr, false)?
            .as_number()
            .ok_or_else(type_mismatch)?;
        let continuing = if step >= 0.0 {
            stepped <= to
        } else {
            stepped >= to
        };
        if continuing {
            Ok(Flow::Jump(resume))
        } else {
            self.for_stack.truncate(index);
            Ok(Flow::Next)
        }
    }

    /// Typed assignment into a scalar or an array cell.
    fn assign_target(&mut self, target: &AssignTarget, value: Value) -> Result<(), EvalError> {
        if target.indices.is_empty() {
            let coerced = coerce(value, target.ident.value_type())?;
            self.env.define(target.ident.name.clone(), coerced);
            return Ok(());
        }
        let indices = self.eval_index_list(&target.indices)?;
        let Some(Value::Array(array)) = self.env.lookup(&target.ident.name) else {
            return Err(bad_subscript());
        };
        let elem = array.borrow().elem_type();
        let coerced = coerce(value, elem)?;
        if !array.borrow_mut().set(&indices, coerced) {
            return Err(bad_subscript());
        }
        Ok(())
    }

    fn parse_input(&self, raw: &str, value_type: ValueType) -> Result<Value, EvalError> {
        match value_type {
            ValueType::Str => Ok(Value::string(raw)),
            ValueType::Integer | ValueType::Float => {
                let number: f64 = raw.trim().parse().map_err(|_| type_mismatch())?;
                coerce(Value::float(number), value_type)
            }
        }
    }

    fn list_bounds(&mut self, range: &ListRange) -> Result<(u32, u32), EvalError> {
        let bound = |me: &mut Self, expr: &Expr| -> Result<u32, EvalError> {
            let value = me
                .eval_expr(expr, false)?
                .as_number()
                .ok_or_else(type_mismatch)?
                .floor();
            Ok(value.clamp(0.0, f64::from(u32::MAX)) as u32)
        };
        Ok(match (&range.start, &range.end, range.dashed) {
            (None, None, _) => (0, u32::MAX),
            (Some(start), None, false) => {
                let s = bound(self, start)?;
                (s, s)
            }
            (Some(start), None, true) => (bound(self, start)?, u32::MAX),
            (None, Some(end), _) => (0, bound(self, end)?),
            (Some(start), Some(end), _) => (bound(self, start)?, bound(self, end)?),
        })
    }

    /// LOAD: fetch source from the host, replace the program, and replay
    /// the numbered lines.
    fn load(&mut self, filename: &Expr) -> Result<Flow, EvalError> {
        let name = self.eval_string(filename)?;
        let source = self.host.load(&name).map_err(errors::host_rejection)?;
        self.program.clear();
        self.reset_run_state();

        let lines = basic_parse::parse_source(&source).map_err(|errs| {
            let detail = errs
                .first()
                .map(ToString::to_string)
                .unwrap_or_default();
            errors::load_syntax(detail)
        })?;
        for line in lines {
            match line.number {
                Some(number) => self.program.insert(number, line.stmt),
                // Saved programs are LIST renderings, every line numbered.
                None => return Err(errors::load_syntax("unnumbered line")),
            }
        }
        Ok(Flow::Next)
    }

    fn eval_string(&mut self, expr: &Expr) -> Result<String, EvalError> {
        match self.eval_expr(expr, false)? {
            Value::Str(s) => Ok(s),
            _ => Err(type_mismatch()),
        }
    }

    fn eval_coord(&mut self, expr: &Expr) -> Result<i64, EvalError> {
        Ok(self
            .eval_expr(expr, false)?
            .as_number()
            .ok_or_else(type_mismatch)?
            .floor() as i64)
    }

    fn eval_dimension(&mut self, expr: &Expr) -> Result<u32, EvalError> {
        let value = self
            .eval_expr(expr, false)?
            .as_number()
            .ok_or_else(type_mismatch)?
            .floor();
        if value < 1.0 || value > f64::from(u32::MAX) {
            return Err(illegal_quantity());
        }
        Ok(value as u32)
    }

    fn eval_index_list(&mut self, exprs: &[Expr]) -> Result<SmallVec<[i64; 4]>, EvalError> {
        let mut indices = SmallVec::new();
        for expr in exprs {
            let value = self
                .eval_expr(expr, false)?
                .as_number()
                .ok_or_else(type_mismatch)?;
            indices.push(value.floor() as i64);
        }
        Ok(indices)
    }

    // --- expression evaluation ---

    pub(crate) fn eval_expr(&mut self, expr: &Expr, in_condition: bool) -> EvalResult {
        match expr {
            Expr::Int { value, .. } => Ok(Value::int(*value)),
            Expr::Float { value, .. } => Ok(Value::float(*value)),
            Expr::Str { value, .. } => Ok(Value::string(value.clone())),
            Expr::Ident(ident) => Ok(self.lookup_value(ident)),
            Expr::Grouped { inner, .. } => self.eval_expr(inner, in_condition),
            Expr::Prefix { op, operand, .. } => match op {
                PrefixOp::Neg => {
                    let value = self.eval_expr(operand, false)?;
                    crate::ops::eval_neg(&value)
                }
                PrefixOp::Not => {
                    let value = self.eval_expr(operand, in_condition)?;
                    crate::ops::eval_not(&value, in_condition)
                }
                PrefixOp::Fn => self.eval_fn(operand),
            },
            Expr::Infix {
                op, left, right, ..
            } => {
                // Condition context reaches through AND/OR into their
                // operands; arithmetic operands evaluate plainly.
                let operand_cond = in_condition && matches!(op, InfixOp::And | InfixOp::Or);
                let left = self.eval_expr(left, operand_cond)?;
                let right = self.eval_expr(right, operand_cond)?;
                crate::ops::eval_infix(*op, &left, &right, in_condition)
            }
            Expr::Call { callee, args, .. } => self.eval_call(callee, args),
        }
    }

    /// Identifier resolution: scope chain, then built-ins, then the
    /// sigil type's zero (unset variables read as zero).
    fn lookup_value(&self, ident: &Ident) -> Value {
        if let Some(value) = self.env.lookup(&ident.name) {
            return value;
        }
        if let Some(builtin) = Builtin::lookup(&ident.name) {
            return Value::Builtin(builtin);
        }
        Value::zero(ident.value_type())
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> EvalResult {
        match self.eval_expr(callee, false)? {
            Value::Builtin(builtin) => {
                let mut argv = Vec::with_capacity(args.len());
                for arg in args {
                    argv.push(self.eval_expr(arg, false)?);
                }
                builtins::call(builtin, &argv, &mut self.rng)
            }
            Value::Array(array) => {
                let indices = self.eval_index_list(args)?;
                let value = array.borrow().get(&indices);
                value.ok_or_else(bad_subscript)
            }
            Value::Function(function) => self.call_function(&function, args),
            _ => Err(type_mismatch()),
        }
    }

    /// `FN name(arg)` — the callee must resolve to a DEF FN function.
    fn eval_fn(&mut self, operand: &Expr) -> EvalResult {
        let Expr::Call { callee, args, .. } = operand else {
            // The parser only builds FN over calls.
            return Err(type_mismatch());
        };
        let Expr::Ident(ident) = callee.as_ref() else {
            return Err(type_mismatch());
        };
        match self.env.lookup(&ident.name) {
            Some(Value::Function(function)) => self.call_function(&function, args),
            _ => Err(undefined_function(&ident.name)),
        }
    }

    /// Push a one-binding overlay, evaluate the body, pop.
    fn call_function(&mut self, function: &FunctionValue, args: &[Expr]) -> EvalResult {
        let formal = match (&function.param, args) {
            (Some(param), [arg]) => {
                let value = self.eval_expr(arg, false)?;
                let number = value.as_number().ok_or_else(type_mismatch)?;
                Some((param.clone(), Value::float(number)))
            }
            (None, []) => None,
            _ => return Err(wrong_argument_count("FN")),
        };
        self.env.push_overlay(formal);
        let result = self.eval_expr(&function.body, false);
        self.env.pop_overlay();
        result
    }
}

/// Typed assignment coercion: numerics flow freely (integer stores
/// truncate via floor), strings only match strings.
fn coerce(value: Value, value_type: ValueType) -> Result<Value, EvalError> {
    match value_type {
        ValueType::Integer => value
            .as_number()
            .map(|x| Value::int(x.floor() as i64))
            .ok_or_else(type_mismatch),
        ValueType::Float => value.as_number().map(Value::float).ok_or_else(type_mismatch),
        ValueType::Str => match value {
            Value::Str(s) => Ok(Value::Str(s)),
            _ => Err(type_mismatch()),
        },
    }
}
