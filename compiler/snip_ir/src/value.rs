//! Runtime values.
//!
//! [`Value`] is the tagged union that flows through the whole engine: the
//! argument coercer produces it, the VM computes with it, and the engine hands
//! it back to the caller. Consumers must match on the variant before use.

use std::fmt;
use std::sync::Arc;

use crate::types::{ExceptionKind, SemanticType, TypeTag};

/// An exception object: a class and a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionValue {
    pub kind: ExceptionKind,
    pub message: String,
}

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Produced by a method declared `void`.
    Void,
    /// The null reference.
    Null,
    Bool(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Char(char),
    Str(Arc<str>),
    Exception(Arc<ExceptionValue>),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Create an exception object.
    pub fn exception(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Value::Exception(Arc::new(ExceptionValue {
            kind,
            message: message.into(),
        }))
    }

    /// Static type of the value. `null` reports `object`.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Void => TypeTag::Void,
            Value::Null => TypeTag::Object,
            Value::Bool(_) => TypeTag::Bool,
            Value::Byte(_) => TypeTag::Byte,
            Value::Int16(_) => TypeTag::Int16,
            Value::Int32(_) => TypeTag::Int32,
            Value::Int64(_) => TypeTag::Int64,
            Value::Single(_) => TypeTag::Single,
            Value::Double(_) => TypeTag::Double,
            Value::Char(_) => TypeTag::Char,
            Value::Str(_) => TypeTag::String,
            Value::Exception(e) => TypeTag::Exception(e.kind),
        }
    }

    /// Semantic type of a primitive value; `None` for void, null and
    /// exception objects.
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self {
            Value::Void | Value::Null | Value::Exception(_) => None,
            other => other.type_tag().semantic_type(),
        }
    }

    /// Runtime type name for fault messages (`System.Int32`, `null`).
    pub fn runtime_type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            other => other.type_tag().runtime_name(),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Format a double the way the runtime prints it.
fn format_double(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format_general(&format!("{f:e}"), 15)
    }
}

fn format_single(f: f32) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format_general(&format!("{f:e}"), 7)
    }
}

/// General (`G`) formatting of the shortest round-trip digits.
///
/// `scientific` is Rust's `{:e}` rendering. The result switches to
/// exponent form (`1E+20`, `1E-05`) when the decimal exponent reaches past
/// `precision` digits (or past the digit count, if larger) or the value is
/// below `1E-04`.
fn format_general(scientific: &str, precision: usize) -> String {
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific, "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    if digits.bytes().all(|b| b == b'0') {
        return format!("{sign}0");
    }

    let count = i64::try_from(digits.len()).unwrap_or(i64::MAX);
    let scale = exponent + 1;
    let max_digits = count.max(i64::try_from(precision).unwrap_or(i64::MAX));

    if scale > max_digits || scale < -3 {
        let (first, rest) = digits.split_at(1);
        let point = if rest.is_empty() { "" } else { "." };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{first}{point}{rest}E{exp_sign}{:02}", exponent.unsigned_abs());
    }

    if scale <= 0 {
        let zeros = "0".repeat(usize::try_from(-scale).unwrap_or(0));
        format!("{sign}0.{zeros}{digits}")
    } else if scale >= count {
        let zeros = "0".repeat(usize::try_from(scale - count).unwrap_or(0));
        format!("{sign}{digits}{zeros}")
    } else {
        let (whole, fraction) = digits.split_at(usize::try_from(scale).unwrap_or(0));
        format!("{sign}{whole}.{fraction}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void | Value::Null => Ok(()),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Byte(n) => write!(f, "{n}"),
            Value::Int16(n) => write!(f, "{n}"),
            Value::Int32(n) => write!(f, "{n}"),
            Value::Int64(n) => write!(f, "{n}"),
            Value::Single(x) => f.write_str(&format_single(*x)),
            Value::Double(x) => f.write_str(&format_double(*x)),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) => f.write_str(s),
            Value::Exception(e) => write!(f, "{}: {}", e.kind.full_name(), e.message),
        }
    }
}

#[cfg(test)]
mod tests;
