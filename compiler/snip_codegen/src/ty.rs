//! Static types during checking, and the conversion rules between them.

use snip_ir::{Op, TypeTag};
use snip_parse::ast::BinaryOp;
use std::fmt;

/// Static type of an expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ty {
    Tag(TypeTag),
    /// The `null` literal, before it meets a reference type.
    Null,
    /// An expression that already produced a diagnostic.
    Error,
}

impl Ty {
    pub const VOID: Ty = Ty::Tag(TypeTag::Void);
    pub const BOOL: Ty = Ty::Tag(TypeTag::Bool);
    pub const INT: Ty = Ty::Tag(TypeTag::Int32);
    pub const STRING: Ty = Ty::Tag(TypeTag::String);

    #[inline]
    pub fn tag(self) -> Option<TypeTag> {
        match self {
            Ty::Tag(tag) => Some(tag),
            Ty::Null | Ty::Error => None,
        }
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == Ty::Error
    }

    /// Reference type or `null`.
    pub fn is_reference(self) -> bool {
        match self {
            Ty::Tag(tag) => tag.is_reference(),
            Ty::Null => true,
            Ty::Error => false,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Tag(tag) => f.write_str(&tag.display_name()),
            Ty::Null => f.write_str("<null>"),
            Ty::Error => f.write_str("?"),
        }
    }
}

/// What checking an expression tells its consumer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExprInfo {
    pub ty: Ty,
    /// Value of an `int` constant expression, for implicit narrowing.
    pub constant: Option<i64>,
}

impl ExprInfo {
    pub const ERROR: ExprInfo = ExprInfo {
        ty: Ty::Error,
        constant: None,
    };

    pub fn of(ty: Ty) -> Self {
        ExprInfo { ty, constant: None }
    }

    pub fn tag(tag: TypeTag) -> Self {
        ExprInfo::of(Ty::Tag(tag))
    }
}

/// How a value is converted from one type to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// Same type, or the error type.
    Identity,
    /// Boxing, `null` to a reference type, or an exception upcast. No code.
    Reference,
    /// Numeric or char conversion (`Op::Convert`).
    Numeric,
    /// Checked downcast from `object` (`Op::Unbox`).
    Unbox,
    Invalid,
}

impl Conversion {
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Conversion::Invalid
    }
}

/// Numeric types and `char`.
pub fn is_arithmetic(tag: TypeTag) -> bool {
    tag.is_numeric() || tag == TypeTag::Char
}

/// Integral types and `char`.
pub fn is_integral_like(tag: TypeTag) -> bool {
    tag.is_integral() || tag == TypeTag::Char
}

/// Unary numeric promotion: small integral types and `char` become `int`.
pub fn unary_promotion(tag: TypeTag) -> Option<TypeTag> {
    match tag {
        TypeTag::Byte | TypeTag::Int16 | TypeTag::Char | TypeTag::Int32 => Some(TypeTag::Int32),
        TypeTag::Int64 | TypeTag::Single | TypeTag::Double => Some(tag),
        _ => None,
    }
}

/// Binary numeric promotion: `double` > `float` > `long` > `int`.
pub fn binary_promotion(a: TypeTag, b: TypeTag) -> Option<TypeTag> {
    let (a, b) = (unary_promotion(a)?, unary_promotion(b)?);
    Some(if a == TypeTag::Double || b == TypeTag::Double {
        TypeTag::Double
    } else if a == TypeTag::Single || b == TypeTag::Single {
        TypeTag::Single
    } else if a == TypeTag::Int64 || b == TypeTag::Int64 {
        TypeTag::Int64
    } else {
        TypeTag::Int32
    })
}

/// Whether an `int` constant fits `target` without loss.
fn constant_fits(value: i64, target: TypeTag) -> bool {
    match target {
        TypeTag::Byte => u8::try_from(value).is_ok(),
        TypeTag::Int16 => i16::try_from(value).is_ok(),
        _ => false,
    }
}

/// Implicit conversion from `from` to `to`.
pub fn implicit(from: ExprInfo, to: TypeTag) -> Conversion {
    match from.ty {
        Ty::Error => Conversion::Identity,
        Ty::Null if to.is_reference() => Conversion::Reference,
        Ty::Null => Conversion::Invalid,
        Ty::Tag(tag) if tag == to => Conversion::Identity,
        Ty::Tag(TypeTag::Void) => Conversion::Invalid,
        Ty::Tag(tag) if tag.widens_to(to) => {
            if to.is_numeric() {
                Conversion::Numeric
            } else {
                Conversion::Reference
            }
        }
        Ty::Tag(TypeTag::Int32) => match from.constant {
            Some(value) if constant_fits(value, to) => Conversion::Numeric,
            _ => Conversion::Invalid,
        },
        Ty::Tag(_) => Conversion::Invalid,
    }
}

/// Explicit (cast) conversion from `from` to `to`.
pub fn explicit(from: ExprInfo, to: TypeTag) -> Conversion {
    let implicit = implicit(from, to);
    if implicit.is_valid() {
        return implicit;
    }
    match from.ty {
        Ty::Tag(tag) if is_arithmetic(tag) && is_arithmetic(to) => Conversion::Numeric,
        Ty::Tag(TypeTag::Object) if to != TypeTag::Void => Conversion::Unbox,
        _ => Conversion::Invalid,
    }
}

/// Result type and instruction of a binary operator. `&&` and `||` are
/// short-circuiting and handled by the emitter.
pub fn binary(op: BinaryOp, left: Ty, right: Ty) -> Option<(TypeTag, Op)> {
    let instruction = match op {
        BinaryOp::Add => Op::Add,
        BinaryOp::Sub => Op::Sub,
        BinaryOp::Mul => Op::Mul,
        BinaryOp::Div => Op::Div,
        BinaryOp::Rem => Op::Rem,
        BinaryOp::Shl => Op::Shl,
        BinaryOp::Shr => Op::Shr,
        BinaryOp::Lt => Op::Lt,
        BinaryOp::LtEq => Op::Le,
        BinaryOp::Gt => Op::Gt,
        BinaryOp::GtEq => Op::Ge,
        BinaryOp::Eq => Op::Eq,
        BinaryOp::NotEq => Op::Ne,
        BinaryOp::BitAnd => Op::BitAnd,
        BinaryOp::BitOr => Op::BitOr,
        BinaryOp::BitXor => Op::BitXor,
        BinaryOp::And | BinaryOp::Or => return None,
    };

    if op == BinaryOp::Add && (left == Ty::STRING || right == Ty::STRING) {
        let concatenable = |ty: Ty| ty != Ty::VOID && ty != Ty::Error;
        return (concatenable(left) && concatenable(right)).then_some((TypeTag::String, Op::Concat));
    }
    if op == BinaryOp::Eq || op == BinaryOp::NotEq {
        return equality_comparable(left, right).then_some((TypeTag::Bool, instruction));
    }

    let (left, right) = (left.tag()?, right.tag()?);
    let result = match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            binary_promotion(left, right)?
        }
        BinaryOp::Shl | BinaryOp::Shr => {
            if !is_integral_like(left) || !is_integral_like(right) {
                return None;
            }
            if unary_promotion(right)? != TypeTag::Int32 {
                return None;
            }
            unary_promotion(left)?
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            binary_promotion(left, right)?;
            TypeTag::Bool
        }
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
            if left == TypeTag::Bool && right == TypeTag::Bool {
                TypeTag::Bool
            } else if is_integral_like(left) && is_integral_like(right) {
                binary_promotion(left, right)?
            } else {
                return None;
            }
        }
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => return None,
    };
    Some((result, instruction))
}

/// Whether `==`/`!=` applies: numbers, bools, or related references.
fn equality_comparable(left: Ty, right: Ty) -> bool {
    match (left, right) {
        (Ty::Tag(a), Ty::Tag(b)) if is_arithmetic(a) && is_arithmetic(b) => true,
        (Ty::Tag(TypeTag::Bool), Ty::Tag(TypeTag::Bool)) => true,
        (Ty::Null, other) | (other, Ty::Null) => other.is_reference(),
        (Ty::Tag(a), Ty::Tag(b)) if a.is_reference() && b.is_reference() => {
            a.widens_to(b) || b.widens_to(a)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests;
