//! Runtime errors and their constructors.
//!
//! Errors abort the execution loop, which returns them to the caller and
//! idles; variables and the stored program survive. Messages follow the
//! terse uppercase convention of the dialect and render as
//! `?<MESSAGE> ERROR [IN <line>]`.

use crate::value::Value;
use std::fmt;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// A runtime error, with the program line it surfaced in when known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub message: String,
    pub line: Option<u32>,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
            line: None,
        }
    }

    /// Attach the program line, keeping the innermost one already set.
    #[must_use]
    pub fn at_line(mut self, line: Option<u32>) -> Self {
        if self.line.is_none() {
            self.line = line;
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{} ERROR", self.message)?;
        if let Some(line) = self.line {
            write!(f, " IN {line}")?;
        }
        Ok(())
    }
}

// Type errors

#[cold]
pub fn type_mismatch() -> EvalError {
    EvalError::new("TYPE MISMATCH")
}

// Domain errors

#[cold]
pub fn illegal_quantity() -> EvalError {
    EvalError::new("ILLEGAL QUANTITY")
}

#[cold]
pub fn bad_subscript() -> EvalError {
    EvalError::new("BAD SUBSCRIPT")
}

#[cold]
pub fn out_of_data() -> EvalError {
    EvalError::new("OUT OF DATA")
}

// Resolution errors

#[cold]
pub fn undefined_statement(line: u32) -> EvalError {
    EvalError::new(format!("UNDEF'D STATEMENT {line}"))
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::new(format!("UNDEF'D FUNCTION {name}"))
}

#[cold]
pub fn next_without_for() -> EvalError {
    EvalError::new("NEXT WITHOUT FOR")
}

#[cold]
pub fn return_without_gosub() -> EvalError {
    EvalError::new("RETURN WITHOUT GOSUB")
}

// Runtime-state errors

#[cold]
pub fn busy() -> EvalError {
    EvalError::new("BUSY")
}

#[cold]
pub fn empty_program() -> EvalError {
    EvalError::new("NO PROGRAM")
}

#[cold]
pub fn cant_continue() -> EvalError {
    EvalError::new("CAN'T CONTINUE")
}

// Statement-shape errors surfaced at run time

#[cold]
pub fn wrong_argument_count(name: &str) -> EvalError {
    EvalError::new(format!("WRONG NUMBER OF ARGUMENTS TO {name}"))
}

#[cold]
pub fn no_graphics_surface() -> EvalError {
    EvalError::new("GRAPHICS NOT ENABLED")
}

// Host errors

/// Wrap a host rejection message.
#[cold]
pub fn host_rejection(message: impl fmt::Display) -> EvalError {
    EvalError::new(message.to_string())
}

/// A syntax error surfacing through the runtime (LOAD of a bad program).
#[cold]
pub fn load_syntax(detail: impl fmt::Display) -> EvalError {
    EvalError::new(format!("SYNTAX IN LOAD: {detail}"))
}
