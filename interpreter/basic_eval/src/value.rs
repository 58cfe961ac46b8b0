//! Runtime values.
//!
//! A tagged enum with factory constructors. Numeric arithmetic always
//! produces floats; integers only enter through literals, `INT`, and
//! `%`-sigil assignment (which truncates via floor).

use crate::array::ArrayRef;
use crate::builtins::Builtin;
use basic_ir::{Expr, ValueType};
use std::fmt;
use std::rc::Rc;

/// A user function bound by `DEF FN`.
#[derive(Clone, Debug)]
pub struct FunctionValue {
    /// Uppercased formal parameter name, if the function takes one.
    pub param: Option<String>,
    /// The captured body expression.
    pub body: Rc<Expr>,
}

/// Runtime value in the interpreter.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    /// The absent value; false in conditions, renders as nothing.
    Null,
    /// A native built-in, resolved when a name misses the scope chain.
    Builtin(Builtin),
    /// A `DEF FN` function.
    Function(FunctionValue),
    /// Shared fixed-shape array storage.
    Array(ArrayRef),
}

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(v: f64) -> Self {
        Value::Float(v)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// The zero value of a sigil type, used for fresh variables and array
    /// cells.
    pub fn zero(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Integer => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Str => Value::Str(String::new()),
        }
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Null => "null",
            Value::Builtin(_) => "builtin",
            Value::Function(_) => "function",
            Value::Array(_) => "array",
        }
    }

    /// Numeric view of the value, if it has one.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Truthiness: null is false, numerics are true iff non-zero, strings
    /// iff non-empty. Everything else is false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Int(n) => *n != 0,
            Value::Float(v) => *v != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Builtin(_) | Value::Function(_) | Value::Array(_) => false,
        }
    }

    /// The canonical print rendering: integers bare, floats in their
    /// shortest decimal form (`6.0` prints as `6`), strings verbatim.
    pub fn display_value(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(v) => format!("{v}"),
            Value::Str(s) => s.clone(),
            Value::Null => String::new(),
            Value::Builtin(b) => b.name().to_string(),
            Value::Function(_) => "FN".to_string(),
            Value::Array(_) => "ARRAY".to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}
