//! Value conversions: casts, unboxing, `Convert.ToX`, `T.Parse` and the
//! implicit widening used to bind arguments.

use snip_ir::{parse_value, Constant, ExceptionKind, ParseFailure, TypeTag, Value};

use crate::fault::{
    argument_null, format_error, invalid_cast, invalid_program, null_reference, overflow_for,
    Fault, VmResult,
};
use crate::operators::Num;

/// Char for a UTF-16 code unit; lone surrogates become U+FFFD.
pub(crate) fn char_from_code(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

macro_rules! cast_num {
    ($num:expr, $ty:ty) => {
        match $num {
            Num::I32(n) => n as $ty,
            Num::I64(n) => n as $ty,
            Num::F32(x) => x as $ty,
            Num::F64(x) => x as $ty,
        }
    };
}

/// Unchecked conversion for `Op::Convert`.
///
/// Integer narrowing truncates; float to integer saturates (NaN becomes 0).
/// Reference and `bool` targets are identity conversions.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    reason = "unchecked conversions truncate by definition"
)]
pub(crate) fn convert(value: Value, target: TypeTag) -> VmResult<Value> {
    if matches!(
        target,
        TypeTag::Bool | TypeTag::String | TypeTag::Object | TypeTag::Exception(_)
    ) {
        return Ok(value);
    }
    let Some(num) = Num::of(&value) else {
        return Err(invalid_program(&format!(
            "convert {} to {target}",
            value.runtime_type_name()
        )));
    };
    Ok(match target {
        TypeTag::Byte => Value::Byte(cast_num!(num, u8)),
        TypeTag::Int16 => Value::Int16(cast_num!(num, i16)),
        TypeTag::Int32 => Value::Int32(cast_num!(num, i32)),
        TypeTag::Int64 => Value::Int64(cast_num!(num, i64)),
        TypeTag::Single => Value::Single(cast_num!(num, f32)),
        TypeTag::Double => Value::Double(cast_num!(num, f64)),
        TypeTag::Char => Value::Char(char_from_code(u32::from(cast_num!(num, u16)))),
        _ => return Err(invalid_program(&format!("convert to {target}"))),
    })
}

/// Checked downcast from `object`.
pub(crate) fn unbox(value: Value, target: TypeTag) -> VmResult<Value> {
    if target == TypeTag::Object {
        return Ok(value);
    }
    if value.is_null() {
        return if target.is_reference() {
            Ok(value)
        } else {
            Err(null_reference())
        };
    }
    let matches = match &value {
        Value::Exception(e) => {
            target == TypeTag::Exception(e.kind)
                || target == TypeTag::Exception(ExceptionKind::Exception)
        }
        other => other.type_tag() == target,
    };
    if matches {
        Ok(value)
    } else {
        Err(invalid_cast(
            &value.runtime_type_name(),
            &target.runtime_name(),
        ))
    }
}

/// Implicit conversion of an argument to a parameter type; `None` when the
/// value's type does not widen to it.
pub fn widen(value: &Value, target: TypeTag) -> Option<Value> {
    if value.is_null() {
        return target.is_reference().then_some(Value::Null);
    }
    let from = value.type_tag();
    if from == TypeTag::Void || !from.widens_to(target) {
        return None;
    }
    if from == target || !target.is_numeric() {
        return Some(value.clone());
    }
    convert(value.clone(), target).ok()
}

/// Article and name used in overflow messages.
fn range_name(target: TypeTag) -> &'static str {
    match target {
        TypeTag::Byte => "an unsigned byte",
        TypeTag::Int16 => "an Int16",
        TypeTag::Int32 => "an Int32",
        TypeTag::Int64 => "an Int64",
        TypeTag::Char => "a character",
        _ => "the target type",
    }
}

fn integral_range(target: TypeTag) -> (i128, i128) {
    match target {
        TypeTag::Byte => (0, i128::from(u8::MAX)),
        TypeTag::Int16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
        TypeTag::Int32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
        TypeTag::Char => (0, i128::from(u16::MAX)),
        _ => (i128::from(i64::MIN), i128::from(i64::MAX)),
    }
}

/// Build an integral (or char) value after checking its range.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "range is checked first"
)]
fn integral(n: i128, target: TypeTag) -> VmResult<Value> {
    let (min, max) = integral_range(target);
    if n < min || n > max {
        return Err(overflow_for(range_name(target)));
    }
    Ok(match target {
        TypeTag::Byte => Value::Byte(n as u8),
        TypeTag::Int16 => Value::Int16(n as i16),
        TypeTag::Int32 => Value::Int32(n as i32),
        TypeTag::Char => Value::Char(char_from_code(n as u32)),
        _ => Value::Int64(n as i64),
    })
}

/// Parse a string the way `T.Parse` does.
pub(crate) fn parse_text(text: &str, target: TypeTag) -> VmResult<Value> {
    let Some(semantic) = target.semantic_type() else {
        return Err(invalid_program(&format!("parse to {target}")));
    };
    parse_value(text, semantic).map_err(|failure| parse_fault(text, target, failure))
}

fn parse_fault(text: &str, target: TypeTag, failure: ParseFailure) -> Fault {
    match (failure, target) {
        (ParseFailure::Overflow, _) => overflow_for(range_name(target)),
        (ParseFailure::Format, TypeTag::Bool) => {
            format_error(&format!("String '{text}' was not recognized as a valid Boolean."))
        }
        (ParseFailure::Format, TypeTag::Char) => {
            format_error("String must be exactly one character long.")
        }
        (ParseFailure::Format, _) => {
            format_error(&format!("The input string '{text}' was not in a correct format."))
        }
    }
}

fn invalid_convert(value: &Value, target: TypeTag) -> Fault {
    let from = value.type_tag().runtime_name();
    let to = target.runtime_name();
    Fault::new(
        ExceptionKind::InvalidCastException,
        format!(
            "Invalid cast from '{}' to '{}'.",
            from.trim_start_matches("System."),
            to.trim_start_matches("System.")
        ),
    )
}

/// `Convert.ToX(value)`: checked conversions that round floats to the
/// nearest integer (ties to even) and parse strings.
pub(crate) fn convert_to(value: &Value, target: TypeTag) -> VmResult<Value> {
    match target {
        TypeTag::String => return Ok(Value::string(value.to_string())),
        TypeTag::Bool => {
            return match value {
                Value::Null => Ok(Value::Bool(false)),
                Value::Bool(b) => Ok(Value::Bool(*b)),
                Value::Str(s) => parse_text(s, target),
                Value::Char(_) | Value::Exception(_) | Value::Void => {
                    Err(invalid_convert(value, target))
                }
                other => match Num::of(other) {
                    Some(Num::I32(n)) => Ok(Value::Bool(n != 0)),
                    Some(Num::I64(n)) => Ok(Value::Bool(n != 0)),
                    Some(Num::F32(x)) => Ok(Value::Bool(x != 0.0)),
                    Some(Num::F64(x)) => Ok(Value::Bool(x != 0.0)),
                    None => Err(invalid_convert(value, target)),
                },
            };
        }
        _ => {}
    }

    match value {
        Value::Null => Ok(convert_default(target)),
        Value::Str(s) => parse_text(s, target),
        Value::Bool(b) => match target {
            TypeTag::Char => Err(invalid_convert(value, target)),
            TypeTag::Single | TypeTag::Double => {
                convert(Value::Int32(i32::from(*b)), target)
            }
            _ => integral(i128::from(*b), target),
        },
        Value::Char(c) => match target {
            TypeTag::Single | TypeTag::Double => Err(invalid_convert(value, target)),
            _ => integral(i128::from(u32::from(*c)), target),
        },
        Value::Exception(_) | Value::Void => Err(invalid_convert(value, target)),
        other => {
            let Some(num) = Num::of(other) else {
                return Err(invalid_convert(value, target));
            };
            match target {
                TypeTag::Single | TypeTag::Double => convert(other.clone(), target),
                TypeTag::Char => match num {
                    Num::I32(n) => integral(i128::from(n), target),
                    Num::I64(n) => integral(i128::from(n), target),
                    Num::F32(_) | Num::F64(_) => Err(invalid_convert(value, target)),
                },
                _ => match num {
                    Num::I32(n) => integral(i128::from(n), target),
                    Num::I64(n) => integral(i128::from(n), target),
                    Num::F32(x) => round_to_integral(f64::from(x), target),
                    Num::F64(x) => round_to_integral(x, target),
                },
            }
        }
    }
}

#[expect(clippy::cast_possible_truncation, reason = "range checked against i64 bounds")]
fn round_to_integral(x: f64, target: TypeTag) -> VmResult<Value> {
    let rounded = x.round_ties_even();
    // i64 bounds as floats.
    if rounded.is_nan() || rounded < -9_223_372_036_854_775_808.0 || rounded >= 9_223_372_036_854_775_808.0 {
        return Err(overflow_for(range_name(target)));
    }
    integral(i128::from(rounded as i64), target)
}

fn convert_default(target: TypeTag) -> Value {
    Constant::default_for(target).to_value()
}

/// `T.Parse(s)`.
pub(crate) fn parse(value: &Value, target: TypeTag) -> VmResult<Value> {
    match value {
        Value::Str(s) => parse_text(s, target),
        Value::Null => Err(argument_null("s")),
        other => Err(invalid_program(&format!(
            "parse of {}",
            other.runtime_type_name()
        ))),
    }
}

#[cfg(test)]
mod tests;
