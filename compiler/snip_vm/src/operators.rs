//! Arithmetic, bitwise and comparison operators.
//!
//! Operands arrive unconverted: `byte + short` pushes a byte and a short.
//! Binary numeric promotion happens here, mirroring what the checker
//! assumed when it typed the expression.

use std::cmp::Ordering;

use snip_ir::{Op, Value};

use crate::fault::{divide_by_zero, invalid_program, overflow, VmResult};

/// A promoted numeric operand.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Num {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Num {
    /// Unary numeric promotion: small integrals and chars become `int`.
    pub(crate) fn of(value: &Value) -> Option<Num> {
        Some(match *value {
            Value::Byte(n) => Num::I32(i32::from(n)),
            Value::Int16(n) => Num::I32(i32::from(n)),
            Value::Char(c) => Num::I32(char_code(c)),
            Value::Int32(n) => Num::I32(n),
            Value::Int64(n) => Num::I64(n),
            Value::Single(x) => Num::F32(x),
            Value::Double(x) => Num::F64(x),
            _ => return None,
        })
    }

    #[expect(clippy::cast_precision_loss, reason = "int to float promotion rounds")]
    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Num::I32(n) => f64::from(n),
            Num::I64(n) => n as f64,
            Num::F32(x) => f64::from(x),
            Num::F64(x) => x,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        reason = "int to float promotion rounds; the f64 arm is never reached by promotion"
    )]
    fn to_f32(self) -> f32 {
        match self {
            Num::I32(n) => n as f32,
            Num::I64(n) => n as f32,
            Num::F32(x) => x,
            Num::F64(x) => x as f32,
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "float arms are never reached by promotion"
    )]
    fn to_i64(self) -> i64 {
        match self {
            Num::I32(n) => i64::from(n),
            Num::I64(n) => n,
            Num::F32(x) => x as i64,
            Num::F64(x) => x as i64,
        }
    }
}

/// UTF-16 code of a char; chars outside the basic plane keep their scalar
/// value.
#[expect(clippy::cast_possible_wrap, reason = "scalar values fit in i32")]
pub(crate) fn char_code(c: char) -> i32 {
    u32::from(c) as i32
}

/// Binary numeric promotion: double > float > long > int.
pub(crate) fn promote(a: Num, b: Num) -> (Num, Num) {
    match (a, b) {
        (Num::F64(_), _) | (_, Num::F64(_)) => (Num::F64(a.to_f64()), Num::F64(b.to_f64())),
        (Num::F32(_), _) | (_, Num::F32(_)) => (Num::F32(a.to_f32()), Num::F32(b.to_f32())),
        (Num::I64(_), _) | (_, Num::I64(_)) => (Num::I64(a.to_i64()), Num::I64(b.to_i64())),
        _ => (a, b),
    }
}

impl From<Num> for Value {
    fn from(n: Num) -> Value {
        match n {
            Num::I32(n) => Value::Int32(n),
            Num::I64(n) => Value::Int64(n),
            Num::F32(x) => Value::Single(x),
            Num::F64(x) => Value::Double(x),
        }
    }
}

fn operands(op: Op, left: &Value, right: &Value) -> VmResult<(Num, Num)> {
    match (Num::of(left), Num::of(right)) {
        (Some(a), Some(b)) => Ok(promote(a, b)),
        _ => Err(invalid_program(&format!(
            "{op:?} on {} and {}",
            left.runtime_type_name(),
            right.runtime_type_name()
        ))),
    }
}

/// Evaluate a binary operator.
pub(crate) fn binary(op: Op, left: &Value, right: &Value) -> VmResult<Value> {
    match op {
        Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Rem => arithmetic(op, left, right),
        Op::BitAnd | Op::BitOr | Op::BitXor => bitwise(op, left, right),
        Op::Shl | Op::Shr => shift(op, left, right),
        Op::Eq => Ok(Value::Bool(equals(left, right))),
        Op::Ne => Ok(Value::Bool(!equals(left, right))),
        Op::Lt | Op::Le | Op::Gt | Op::Ge => compare(op, left, right),
        _ => Err(invalid_program(&format!("{op:?} is not a binary operator"))),
    }
}

fn arithmetic(op: Op, left: &Value, right: &Value) -> VmResult<Value> {
    let result = match operands(op, left, right)? {
        (Num::I32(a), Num::I32(b)) => Num::I32(int_arith(op, a, b)?),
        (Num::I64(a), Num::I64(b)) => Num::I64(long_arith(op, a, b)?),
        (Num::F32(a), Num::F32(b)) => Num::F32(match op {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
            Op::Div => a / b,
            _ => a % b,
        }),
        (a, b) => {
            let (a, b) = (a.to_f64(), b.to_f64());
            Num::F64(match op {
                Op::Add => a + b,
                Op::Sub => a - b,
                Op::Mul => a * b,
                Op::Div => a / b,
                _ => a % b,
            })
        }
    };
    Ok(result.into())
}

/// Integer arithmetic wraps; division checks for zero and `MIN / -1`.
macro_rules! integer_arith {
    ($name:ident, $ty:ty) => {
        fn $name(op: Op, a: $ty, b: $ty) -> VmResult<$ty> {
            match op {
                Op::Add => Ok(a.wrapping_add(b)),
                Op::Sub => Ok(a.wrapping_sub(b)),
                Op::Mul => Ok(a.wrapping_mul(b)),
                Op::Div => {
                    if b == 0 {
                        return Err(divide_by_zero());
                    }
                    a.checked_div(b).ok_or_else(overflow)
                }
                _ => {
                    if b == 0 {
                        return Err(divide_by_zero());
                    }
                    a.checked_rem(b).ok_or_else(overflow)
                }
            }
        }
    };
}

integer_arith!(int_arith, i32);
integer_arith!(long_arith, i64);

#[expect(clippy::cast_possible_truncation, reason = "i32 operands stay in i32 range")]
fn bitwise(op: Op, left: &Value, right: &Value) -> VmResult<Value> {
    if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
        return Ok(Value::Bool(match op {
            Op::BitAnd => a & b,
            Op::BitOr => a | b,
            _ => a ^ b,
        }));
    }
    let apply = |a: i64, b: i64| match op {
        Op::BitAnd => a & b,
        Op::BitOr => a | b,
        _ => a ^ b,
    };
    match operands(op, left, right)? {
        (Num::I32(a), Num::I32(b)) => Ok(Value::Int32(apply(i64::from(a), i64::from(b)) as i32)),
        (Num::I64(a), Num::I64(b)) => Ok(Value::Int64(apply(a, b))),
        _ => Err(invalid_program(&format!("{op:?} on floating-point operands"))),
    }
}

/// Shift counts are masked to the width of the left operand.
#[expect(clippy::cast_sign_loss, reason = "masked to 0..64")]
fn shift(op: Op, left: &Value, right: &Value) -> VmResult<Value> {
    let (Some(value), Some(Num::I32(count))) = (Num::of(left), Num::of(right)) else {
        return Err(invalid_program(&format!("{op:?} with a non-int count")));
    };
    match value {
        Num::I32(n) => {
            let count = (count & 31) as u32;
            Ok(Value::Int32(if op == Op::Shl { n.wrapping_shl(count) } else { n >> count }))
        }
        Num::I64(n) => {
            let count = (count & 63) as u32;
            Ok(Value::Int64(if op == Op::Shl { n.wrapping_shl(count) } else { n >> count }))
        }
        _ => Err(invalid_program(&format!("{op:?} on a floating-point operand"))),
    }
}

/// `==` semantics: numbers compare after promotion, strings by content,
/// everything else by value.
pub(crate) fn equals(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (Num::of(left), Num::of(right)) {
        return match promote(a, b) {
            (Num::I32(a), Num::I32(b)) => a == b,
            (Num::I64(a), Num::I64(b)) => a == b,
            (Num::F32(a), Num::F32(b)) => a == b,
            (a, b) => a.to_f64() == b.to_f64(),
        };
    }
    left == right
}

fn compare(op: Op, left: &Value, right: &Value) -> VmResult<Value> {
    let ordering = match operands(op, left, right)? {
        (Num::I32(a), Num::I32(b)) => Some(a.cmp(&b)),
        (Num::I64(a), Num::I64(b)) => Some(a.cmp(&b)),
        (Num::F32(a), Num::F32(b)) => a.partial_cmp(&b),
        (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
    };
    // Every comparison involving NaN is false.
    let result = ordering.is_some_and(|ordering| match op {
        Op::Lt => ordering == Ordering::Less,
        Op::Le => ordering != Ordering::Greater,
        Op::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    });
    Ok(Value::Bool(result))
}

/// Evaluate a unary operator.
pub(crate) fn unary(op: Op, operand: &Value) -> VmResult<Value> {
    match (op, operand) {
        (Op::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (Op::Neg, value) => match Num::of(value) {
            Some(Num::I32(n)) => Ok(Value::Int32(n.wrapping_neg())),
            Some(Num::I64(n)) => Ok(Value::Int64(n.wrapping_neg())),
            Some(Num::F32(x)) => Ok(Value::Single(-x)),
            Some(Num::F64(x)) => Ok(Value::Double(-x)),
            None => Err(invalid_program("Neg on a non-numeric operand")),
        },
        (Op::BitNot, value) => match Num::of(value) {
            Some(Num::I32(n)) => Ok(Value::Int32(!n)),
            Some(Num::I64(n)) => Ok(Value::Int64(!n)),
            _ => Err(invalid_program("BitNot on a non-integral operand")),
        },
        _ => Err(invalid_program(&format!(
            "{op:?} on {}",
            operand.runtime_type_name()
        ))),
    }
}

#[cfg(test)]
mod tests;
