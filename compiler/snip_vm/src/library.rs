//! Built-in library routines (`Op::Intrinsic`).
//!
//! Strings are indexed by character: `Length`, the indexer, `Substring` and
//! `IndexOf` all count Unicode scalar values.

use snip_ir::{ExceptionKind, Intrinsic, Value};

use crate::convert::{convert_to, parse};
use crate::fault::{
    argument_null, argument_out_of_range, index_out_of_range, invalid_program, null_reference,
    Fault, VmResult,
};
use crate::operators::{promote, Num};
use crate::print_handler::PrintHandler;

/// Run an intrinsic over its arguments (in push order). Returns `None` for
/// routines that produce no value.
pub(crate) fn call(
    intrinsic: Intrinsic,
    args: &[Value],
    print: &PrintHandler,
) -> VmResult<Option<Value>> {
    if args.len() != intrinsic.arity() {
        return Err(invalid_program(&format!(
            "{intrinsic:?} called with {} arguments",
            args.len()
        )));
    }
    let value = match intrinsic {
        Intrinsic::WriteLine => {
            print.println(&args[0].to_string());
            return Ok(None);
        }
        Intrinsic::WriteLineEmpty => {
            print.println("");
            return Ok(None);
        }
        Intrinsic::Write => {
            print.print(&args[0].to_string());
            return Ok(None);
        }

        Intrinsic::MathAbs => abs(&args[0])?,
        Intrinsic::MathMax => max_min(&args[0], &args[1], true)?,
        Intrinsic::MathMin => max_min(&args[0], &args[1], false)?,
        Intrinsic::MathPow => Value::Double(double(&args[0])?.powf(double(&args[1])?)),
        Intrinsic::MathSqrt => Value::Double(double(&args[0])?.sqrt()),
        Intrinsic::MathFloor => Value::Double(double(&args[0])?.floor()),
        Intrinsic::MathCeiling => Value::Double(double(&args[0])?.ceil()),
        Intrinsic::MathRound => Value::Double(double(&args[0])?.round_ties_even()),

        Intrinsic::Parse(target) => parse(&args[0], target)?,
        Intrinsic::ConvertTo(target) => convert_to(&args[0], target)?,
        Intrinsic::ToString => {
            if args[0].is_null() {
                return Err(null_reference());
            }
            Value::string(args[0].to_string())
        }

        Intrinsic::StrLength => Value::Int32(count(receiver(&args[0])?)),
        Intrinsic::StrCharAt => char_at(receiver(&args[0])?, int(&args[1])?)?,
        Intrinsic::StrToUpper => Value::string(receiver(&args[0])?.to_uppercase()),
        Intrinsic::StrToLower => Value::string(receiver(&args[0])?.to_lowercase()),
        Intrinsic::StrTrim => Value::string(receiver(&args[0])?.trim()),
        Intrinsic::StrSubstring => {
            let s = receiver(&args[0])?;
            let start = int(&args[1])?;
            let length = count(s).saturating_sub(start.max(0));
            substring(s, start, length)?
        }
        Intrinsic::StrSubstringLen => {
            substring(receiver(&args[0])?, int(&args[1])?, int(&args[2])?)?
        }
        Intrinsic::StrContains => {
            let s = receiver(&args[0])?;
            Value::Bool(s.contains(argument(&args[1], "value")?))
        }
        Intrinsic::StrStartsWith => {
            let s = receiver(&args[0])?;
            Value::Bool(s.starts_with(argument(&args[1], "value")?))
        }
        Intrinsic::StrEndsWith => {
            let s = receiver(&args[0])?;
            Value::Bool(s.ends_with(argument(&args[1], "value")?))
        }
        Intrinsic::StrIndexOf => index_of(receiver(&args[0])?, &args[1])?,
        Intrinsic::StrReplace => replace(receiver(&args[0])?, &args[1], &args[2])?,
        Intrinsic::StrIsNullOrEmpty => Value::Bool(match &args[0] {
            Value::Null => true,
            Value::Str(s) => s.is_empty(),
            _ => false,
        }),
        Intrinsic::StrConcat(_) => {
            let joined: String = args.iter().map(ToString::to_string).collect();
            Value::string(joined)
        }

        Intrinsic::NewException(kind) => match &args[0] {
            Value::Str(message) => Value::exception(kind, &**message),
            _ => Value::exception(kind, kind.default_message()),
        },
        Intrinsic::NewExceptionDefault(kind) => Value::exception(kind, kind.default_message()),
        Intrinsic::ExceptionMessage => match &args[0] {
            Value::Exception(e) => Value::string(e.message.as_str()),
            Value::Null => return Err(null_reference()),
            other => return Err(unexpected(intrinsic, other)),
        },
    };
    Ok(Some(value))
}

fn unexpected(intrinsic: Intrinsic, value: &Value) -> Fault {
    invalid_program(&format!(
        "{intrinsic:?} on {}",
        value.runtime_type_name()
    ))
}

/// The string an instance member is called on.
fn receiver(value: &Value) -> VmResult<&str> {
    match value {
        Value::Str(s) => Ok(s),
        Value::Null => Err(null_reference()),
        other => Err(invalid_program(&format!(
            "string member on {}",
            other.runtime_type_name()
        ))),
    }
}

/// A string argument that must not be null.
fn argument<'a>(value: &'a Value, parameter: &str) -> VmResult<&'a str> {
    match value {
        Value::Str(s) => Ok(s),
        Value::Null => Err(argument_null(parameter)),
        other => Err(invalid_program(&format!(
            "string argument of type {}",
            other.runtime_type_name()
        ))),
    }
}

fn int(value: &Value) -> VmResult<i32> {
    match Num::of(value) {
        Some(Num::I32(n)) => Ok(n),
        _ => Err(invalid_program(&format!(
            "int argument of type {}",
            value.runtime_type_name()
        ))),
    }
}

fn double(value: &Value) -> VmResult<f64> {
    Num::of(value).map(Num::to_f64).ok_or_else(|| {
        invalid_program(&format!(
            "double argument of type {}",
            value.runtime_type_name()
        ))
    })
}

fn count(s: &str) -> i32 {
    i32::try_from(s.chars().count()).unwrap_or(i32::MAX)
}

/// Byte offset of the `index`th character (or the end of the string).
fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(at, _)| at)
}

fn abs(value: &Value) -> VmResult<Value> {
    const MESSAGE: &str = "Negating the minimum value of a twos complement number is invalid.";
    match Num::of(value) {
        Some(Num::I32(n)) => n
            .checked_abs()
            .map(Value::Int32)
            .ok_or_else(|| Fault::new(ExceptionKind::OverflowException, MESSAGE)),
        Some(Num::I64(n)) => n
            .checked_abs()
            .map(Value::Int64)
            .ok_or_else(|| Fault::new(ExceptionKind::OverflowException, MESSAGE)),
        Some(Num::F32(x)) => Ok(Value::Single(x.abs())),
        Some(Num::F64(x)) => Ok(Value::Double(x.abs())),
        None => Err(unexpected(Intrinsic::MathAbs, value)),
    }
}

/// `Math.Max` / `Math.Min`; NaN wins for floating-point operands.
fn max_min(a: &Value, b: &Value, max: bool) -> VmResult<Value> {
    let (Some(a), Some(b)) = (Num::of(a), Num::of(b)) else {
        return Err(invalid_program("Math.Max/Min on non-numeric operands"));
    };
    Ok(match promote(a, b) {
        (Num::I32(a), Num::I32(b)) => Value::Int32(if max { a.max(b) } else { a.min(b) }),
        (Num::I64(a), Num::I64(b)) => Value::Int64(if max { a.max(b) } else { a.min(b) }),
        (Num::F32(a), Num::F32(b)) => Value::Single(if a.is_nan() || b.is_nan() {
            f32::NAN
        } else if max {
            a.max(b)
        } else {
            a.min(b)
        }),
        (a, b) => {
            let (a, b) = (a.to_f64(), b.to_f64());
            Value::Double(if a.is_nan() || b.is_nan() {
                f64::NAN
            } else if max {
                a.max(b)
            } else {
                a.min(b)
            })
        }
    })
}

fn char_at(s: &str, index: i32) -> VmResult<Value> {
    usize::try_from(index)
        .ok()
        .and_then(|index| s.chars().nth(index))
        .map(Value::Char)
        .ok_or_else(index_out_of_range)
}

#[expect(clippy::cast_sign_loss, reason = "bounds are checked to be non-negative")]
fn substring(s: &str, start: i32, length: i32) -> VmResult<Value> {
    let len = count(s);
    if start < 0 {
        return Err(argument_out_of_range(
            "startIndex",
            "StartIndex cannot be less than zero.",
        ));
    }
    if start > len {
        return Err(argument_out_of_range(
            "startIndex",
            "startIndex cannot be larger than length of string.",
        ));
    }
    if length < 0 {
        return Err(argument_out_of_range(
            "length",
            "Length cannot be less than zero.",
        ));
    }
    if start.checked_add(length).map_or(true, |end| end > len) {
        return Err(argument_out_of_range(
            "length",
            "Index and length must refer to a location within the string.",
        ));
    }
    let from = byte_offset(s, start as usize);
    let to = byte_offset(s, (start + length) as usize);
    Ok(Value::string(&s[from..to]))
}

fn index_of(s: &str, needle: &Value) -> VmResult<Value> {
    let found = match needle {
        Value::Char(c) => s.find(*c),
        Value::Str(t) => s.find(&**t),
        Value::Null => return Err(argument_null("value")),
        other => return Err(unexpected(Intrinsic::StrIndexOf, other)),
    };
    Ok(Value::Int32(found.map_or(-1, |at| count(&s[..at]))))
}

fn replace(s: &str, old: &Value, new: &Value) -> VmResult<Value> {
    match (old, new) {
        (Value::Char(a), Value::Char(b)) => {
            Ok(Value::string(s.replace(*a, b.encode_utf8(&mut [0; 4]))))
        }
        (Value::Str(a), new) => {
            if a.is_empty() {
                return Err(Fault::new(
                    ExceptionKind::ArgumentException,
                    "String cannot be of zero length. (Parameter 'oldValue')",
                ));
            }
            let replacement = match new {
                Value::Str(b) => &**b,
                Value::Null => "",
                other => return Err(unexpected(Intrinsic::StrReplace, other)),
            };
            Ok(Value::string(s.replace(&**a, replacement)))
        }
        (Value::Null, _) => Err(argument_null("oldValue")),
        (other, _) => Err(unexpected(Intrinsic::StrReplace, other)),
    }
}
