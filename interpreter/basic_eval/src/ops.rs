//! Infix and prefix operator semantics.
//!
//! Direct match-based dispatch over the fixed value set. Numeric
//! arithmetic always yields floats; numeric comparisons yield the
//! relational values `-1`/`0`; string `=`/`<>` keep the historical
//! `1`/`0`. AND/OR/NOT are logical inside a condition context and
//! bitwise integer operations elsewhere.

use crate::errors::{type_mismatch, EvalResult};
use crate::value::Value;
use basic_ir::InfixOp;

/// Relational result for numeric comparisons: true is `-1`.
#[inline]
fn relational(test: bool) -> Value {
    Value::float(if test { -1.0 } else { 0.0 })
}

/// String comparison result: true is `1` (historical asymmetry).
#[inline]
fn string_relational(test: bool) -> Value {
    Value::float(if test { 1.0 } else { 0.0 })
}

/// Evaluate an infix operation on two already-evaluated operands.
pub(crate) fn eval_infix(op: InfixOp, left: &Value, right: &Value, in_condition: bool) -> EvalResult {
    if in_condition && matches!(op, InfixOp::And | InfixOp::Or) {
        let (a, b) = (left.is_truthy(), right.is_truthy());
        let test = match op {
            InfixOp::And => a && b,
            _ => a || b,
        };
        return Ok(relational(test));
    }

    match (left, right) {
        (Value::Str(a), Value::Str(b)) => eval_string_infix(op, a, b),
        _ => {
            let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
                return Err(type_mismatch());
            };
            eval_numeric_infix(op, a, b)
        }
    }
}

fn eval_numeric_infix(op: InfixOp, a: f64, b: f64) -> EvalResult {
    match op {
        InfixOp::Add => Ok(Value::float(a + b)),
        InfixOp::Sub => Ok(Value::float(a - b)),
        InfixOp::Mul => Ok(Value::float(a * b)),
        // No divide-by-zero guard: the result may be non-finite and only
        // built-ins surface that as ILLEGAL QUANTITY.
        InfixOp::Div => Ok(Value::float(a / b)),
        InfixOp::Pow => Ok(Value::float(a.powf(b))),
        InfixOp::Mod => Ok(Value::float(a % b)),
        InfixOp::Eq => Ok(relational(a == b)),
        InfixOp::NotEq => Ok(relational(a != b)),
        InfixOp::Lt => Ok(relational(a < b)),
        InfixOp::Gt => Ok(relational(a > b)),
        InfixOp::LtEq => Ok(relational(a <= b)),
        InfixOp::GtEq => Ok(relational(a >= b)),
        // Bitwise outside condition context.
        InfixOp::And => Ok(Value::int((a.floor() as i64) & (b.floor() as i64))),
        InfixOp::Or => Ok(Value::int((a.floor() as i64) | (b.floor() as i64))),
    }
}

fn eval_string_infix(op: InfixOp, a: &str, b: &str) -> EvalResult {
    match op {
        InfixOp::Add => Ok(Value::string(format!("{a}{b}"))),
        InfixOp::Eq => Ok(string_relational(a == b)),
        InfixOp::NotEq => Ok(string_relational(a != b)),
        _ => Err(type_mismatch()),
    }
}

/// Unary `-` and `NOT`. (`FN` is a call form, handled by the evaluator.)
pub(crate) fn eval_neg(value: &Value) -> EvalResult {
    match value {
        Value::Int(n) => Ok(Value::int(-n)),
        Value::Float(v) => Ok(Value::float(-v)),
        _ => Err(type_mismatch()),
    }
}

pub(crate) fn eval_not(value: &Value, in_condition: bool) -> EvalResult {
    if in_condition {
        return Ok(relational(!value.is_truthy()));
    }
    match value.as_number() {
        Some(x) => Ok(Value::int(!(x.floor() as i64))),
        None => Err(type_mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(op: InfixOp, a: f64, b: f64) -> Value {
        match eval_infix(op, &Value::float(a), &Value::float(b), false) {
            Ok(value) => value,
            Err(err) => panic!("{op:?} failed: {err}"),
        }
    }

    #[test]
    fn arithmetic_always_produces_floats() {
        assert_eq!(
            eval_infix(InfixOp::Add, &Value::int(1), &Value::int(2), false),
            Ok(Value::float(3.0))
        );
        assert_eq!(num(InfixOp::Pow, 2.0, 10.0), Value::float(1024.0));
        assert_eq!(num(InfixOp::Mod, 7.0, 3.0), Value::float(1.0));
    }

    #[test]
    fn division_by_zero_is_unguarded() {
        let Value::Float(x) = num(InfixOp::Div, 1.0, 0.0) else {
            panic!("expected float");
        };
        assert!(x.is_infinite());
    }

    #[test]
    fn numeric_comparisons_use_minus_one() {
        assert_eq!(num(InfixOp::Lt, 1.0, 2.0), Value::float(-1.0));
        assert_eq!(num(InfixOp::Lt, 2.0, 1.0), Value::float(0.0));
        assert_eq!(num(InfixOp::Eq, 2.0, 2.0), Value::float(-1.0));
        assert_eq!(num(InfixOp::GtEq, 2.0, 2.0), Value::float(-1.0));
    }

    #[test]
    fn string_comparisons_use_plus_one() {
        let (a, b) = (Value::string("A"), Value::string("A"));
        assert_eq!(eval_infix(InfixOp::Eq, &a, &b, false), Ok(Value::float(1.0)));
        assert_eq!(
            eval_infix(InfixOp::NotEq, &a, &b, false),
            Ok(Value::float(0.0))
        );
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(
            eval_infix(
                InfixOp::Add,
                &Value::string("AB"),
                &Value::string("CD"),
                false
            ),
            Ok(Value::string("ABCD"))
        );
    }

    #[test]
    fn strings_reject_other_operators() {
        let (a, b) = (Value::string("A"), Value::string("B"));
        assert!(eval_infix(InfixOp::Lt, &a, &b, false).is_err());
        assert!(eval_infix(InfixOp::Sub, &a, &b, false).is_err());
    }

    #[test]
    fn mixed_operands_are_a_type_mismatch() {
        assert!(eval_infix(InfixOp::Add, &Value::string("A"), &Value::int(1), false).is_err());
    }

    #[test]
    fn and_or_are_bitwise_outside_conditions() {
        assert_eq!(num(InfixOp::And, 6.0, 3.0), Value::int(2));
        assert_eq!(num(InfixOp::Or, 6.0, 3.0), Value::int(7));
    }

    #[test]
    fn and_or_are_logical_inside_conditions() {
        let t = Value::float(-1.0);
        let f = Value::float(0.0);
        assert_eq!(eval_infix(InfixOp::And, &t, &t, true), Ok(Value::float(-1.0)));
        assert_eq!(eval_infix(InfixOp::And, &t, &f, true), Ok(Value::float(0.0)));
        assert_eq!(eval_infix(InfixOp::Or, &f, &t, true), Ok(Value::float(-1.0)));
        assert_eq!(eval_infix(InfixOp::Or, &f, &f, true), Ok(Value::float(0.0)));
    }

    #[test]
    fn not_flips_truthiness_in_conditions() {
        assert_eq!(eval_not(&Value::float(0.0), true), Ok(Value::float(-1.0)));
        assert_eq!(eval_not(&Value::float(-1.0), true), Ok(Value::float(0.0)));
        assert_eq!(eval_not(&Value::string(""), true), Ok(Value::float(-1.0)));
    }

    #[test]
    fn not_is_bitwise_elsewhere() {
        assert_eq!(eval_not(&Value::int(0), false), Ok(Value::int(-1)));
        assert_eq!(eval_not(&Value::int(-1), false), Ok(Value::int(0)));
    }

    #[test]
    fn negation() {
        assert_eq!(eval_neg(&Value::int(3)), Ok(Value::int(-3)));
        assert_eq!(eval_neg(&Value::float(-2.5)), Ok(Value::float(2.5)));
        assert!(eval_neg(&Value::string("X")).is_err());
    }
}
