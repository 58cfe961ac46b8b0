//! Built-in functions.
//!
//! Resolved when an identifier lookup misses the scope chain, so a user
//! variable can shadow any of these names. Dispatch is a direct match on
//! a small enum — the set is fixed, and that keeps the hot call path free
//! of trait objects.

use crate::errors::{illegal_quantity, type_mismatch, wrong_argument_count, EvalError, EvalResult};
use crate::value::Value;
use rand::rngs::StdRng;
use rand::Rng;

/// The fixed set of native functions.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Builtin {
    Abs,
    Atn,
    Cos,
    Sin,
    Tan,
    Exp,
    Log,
    Sqr,
    Int,
    Sgn,
    Rnd,
    Asc,
    ChrS,
    Len,
    LeftS,
    RightS,
    MidS,
    StrS,
    Val,
    Spc,
    Rgb,
}

impl Builtin {
    /// Resolve an uppercased identifier (sigil included) to a built-in.
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "ABS" => Some(Builtin::Abs),
            "ATN" => Some(Builtin::Atn),
            "COS" => Some(Builtin::Cos),
            "SIN" => Some(Builtin::Sin),
            "TAN" => Some(Builtin::Tan),
            "EXP" => Some(Builtin::Exp),
            "LOG" => Some(Builtin::Log),
            "SQR" => Some(Builtin::Sqr),
            "INT" => Some(Builtin::Int),
            "SGN" => Some(Builtin::Sgn),
            "RND" => Some(Builtin::Rnd),
            "ASC" => Some(Builtin::Asc),
            "CHR$" => Some(Builtin::ChrS),
            "LEN" => Some(Builtin::Len),
            "LEFT$" => Some(Builtin::LeftS),
            "RIGHT$" => Some(Builtin::RightS),
            "MID$" => Some(Builtin::MidS),
            "STR$" => Some(Builtin::StrS),
            "VAL" => Some(Builtin::Val),
            "SPC" => Some(Builtin::Spc),
            "RGB" => Some(Builtin::Rgb),
            _ => None,
        }
    }

    /// The source-level name.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Abs => "ABS",
            Builtin::Atn => "ATN",
            Builtin::Cos => "COS",
            Builtin::Sin => "SIN",
            Builtin::Tan => "TAN",
            Builtin::Exp => "EXP",
            Builtin::Log => "LOG",
            Builtin::Sqr => "SQR",
            Builtin::Int => "INT",
            Builtin::Sgn => "SGN",
            Builtin::Rnd => "RND",
            Builtin::Asc => "ASC",
            Builtin::ChrS => "CHR$",
            Builtin::Len => "LEN",
            Builtin::LeftS => "LEFT$",
            Builtin::RightS => "RIGHT$",
            Builtin::MidS => "MID$",
            Builtin::StrS => "STR$",
            Builtin::Val => "VAL",
            Builtin::Spc => "SPC",
            Builtin::Rgb => "RGB",
        }
    }
}

/// Invoke a built-in with evaluated arguments.
pub fn call(builtin: Builtin, args: &[Value], rng: &mut StdRng) -> EvalResult {
    match builtin {
        Builtin::Abs => Ok(Value::float(numeric(builtin, args, 0)?.abs())),
        Builtin::Atn => finite(numeric(builtin, args, 0)?.atan()),
        Builtin::Cos => finite(numeric(builtin, args, 0)?.cos()),
        Builtin::Sin => finite(numeric(builtin, args, 0)?.sin()),
        Builtin::Tan => finite(numeric(builtin, args, 0)?.tan()),
        Builtin::Exp => finite(numeric(builtin, args, 0)?.exp()),
        Builtin::Log => finite(numeric(builtin, args, 0)?.ln()),
        Builtin::Sqr => finite(numeric(builtin, args, 0)?.sqrt()),
        Builtin::Int => Ok(Value::int(numeric(builtin, args, 0)?.floor() as i64)),
        Builtin::Sgn => {
            let x = numeric(builtin, args, 0)?;
            let sign = if x > 0.0 {
                1
            } else if x < 0.0 {
                -1
            } else {
                0
            };
            Ok(Value::int(sign))
        }
        // Historical programs pass a dummy seed argument; it is ignored.
        Builtin::Rnd => Ok(Value::float(rng.gen::<f64>())),
        Builtin::Asc => {
            let s = string(builtin, args, 0)?;
            match s.chars().next() {
                Some(c) => Ok(Value::int(i64::from(u32::from(c)))),
                None => Err(illegal_quantity()),
            }
        }
        Builtin::ChrS => {
            let code = numeric(builtin, args, 0)?.floor();
            if !(0.0..=1_114_111.0).contains(&code) {
                return Err(illegal_quantity());
            }
            match char::from_u32(code as u32) {
                Some(c) => Ok(Value::string(c.to_string())),
                None => Err(illegal_quantity()),
            }
        }
        Builtin::Len => {
            let s = string(builtin, args, 0)?;
            Ok(Value::int(s.chars().count() as i64))
        }
        Builtin::LeftS => {
            let s = string(builtin, args, 0)?;
            let n = count(numeric(builtin, args, 1)?)?;
            Ok(Value::string(s.chars().take(n).collect::<String>()))
        }
        Builtin::RightS => {
            let s = string(builtin, args, 0)?;
            let n = count(numeric(builtin, args, 1)?)?;
            let len = s.chars().count();
            let skip = len.saturating_sub(n);
            Ok(Value::string(s.chars().skip(skip).collect::<String>()))
        }
        Builtin::MidS => {
            let s = string(builtin, args, 0)?;
            let start = numeric(builtin, args, 1)?.floor();
            if start < 1.0 {
                return Err(illegal_quantity());
            }
            let skip = start as usize - 1;
            let rest = s.chars().skip(skip);
            if args.len() > 2 {
                let n = count(numeric(builtin, args, 2)?)?;
                Ok(Value::string(rest.take(n).collect::<String>()))
            } else {
                Ok(Value::string(rest.collect::<String>()))
            }
        }
        Builtin::StrS => {
            let x = numeric(builtin, args, 0)?;
            Ok(Value::string(Value::float(x).display_value()))
        }
        Builtin::Val => {
            let s = string(builtin, args, 0)?;
            Ok(Value::float(parse_leading_number(&s)))
        }
        Builtin::Spc => {
            let n = count(numeric(builtin, args, 0)?)?;
            Ok(Value::string(" ".repeat(n)))
        }
        Builtin::Rgb => {
            let r = channel(numeric(builtin, args, 0)?);
            let g = channel(numeric(builtin, args, 1)?);
            let b = channel(numeric(builtin, args, 2)?);
            Ok(Value::string(format!("{r:02X}{g:02X}{b:02X}FF")))
        }
    }
}

/// Numeric argument at position `index`.
fn numeric(builtin: Builtin, args: &[Value], index: usize) -> Result<f64, EvalError> {
    match args.get(index) {
        Some(value) => value.as_number().ok_or_else(type_mismatch),
        None => Err(wrong_argument_count(builtin.name())),
    }
}

/// String argument at position `index`.
fn string(builtin: Builtin, args: &[Value], index: usize) -> Result<String, EvalError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s.clone()),
        Some(_) => Err(type_mismatch()),
        None => Err(wrong_argument_count(builtin.name())),
    }
}

/// A substring count: floored, never negative.
fn count(x: f64) -> Result<usize, EvalError> {
    let n = x.floor();
    if n < 0.0 {
        return Err(illegal_quantity());
    }
    Ok(n as usize)
}

/// Non-finite math results surface as ILLEGAL QUANTITY.
fn finite(x: f64) -> EvalResult {
    if x.is_finite() {
        Ok(Value::float(x))
    } else {
        Err(illegal_quantity())
    }
}

/// Clamp a color channel to 0..=255 after flooring.
fn channel(x: f64) -> u8 {
    x.floor().clamp(0.0, 255.0) as u8
}

/// VAL's lenient parse: optional sign, digits, one dot; anything after
/// the numeric prefix is ignored, no prefix parses as zero.
fn parse_leading_number(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    let mut seen_digit = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return 0.0;
    }
    trimmed[..end].parse().unwrap_or_default()
}
