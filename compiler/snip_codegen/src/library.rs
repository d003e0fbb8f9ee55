//! The built-in library surface: `System` names, static members and the
//! members of built-in values.
//!
//! Every entry maps to an [`Intrinsic`] (or a constant); overload candidates
//! are listed most specific first, so the first applicable one wins.

use snip_ir::{Constant, ExceptionKind, Intrinsic, TypeTag};

/// A name that denotes a static receiver: something with members but no
/// value of its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StaticOwner {
    /// A class declared in the compilation unit.
    Class(usize),
    /// A built-in type (`int`, `Int32`, `string`, `Exception`, ...).
    Type(TypeTag),
    Math,
    Convert,
    Console,
}

/// One overload of a built-in method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<TypeTag>,
    pub ret: TypeTag,
    pub intrinsic: Intrinsic,
}

impl Signature {
    fn new(params: &[TypeTag], ret: TypeTag, intrinsic: Intrinsic) -> Self {
        Signature {
            params: params.to_vec(),
            ret,
            intrinsic,
        }
    }
}

/// Look up a name of the `System` namespace.
pub fn system_name(name: &str) -> Option<StaticOwner> {
    let owner = match name {
        "Math" => StaticOwner::Math,
        "Convert" => StaticOwner::Convert,
        "Console" => StaticOwner::Console,
        "Boolean" => StaticOwner::Type(TypeTag::Bool),
        "Byte" => StaticOwner::Type(TypeTag::Byte),
        "Int16" => StaticOwner::Type(TypeTag::Int16),
        "Int32" => StaticOwner::Type(TypeTag::Int32),
        "Int64" => StaticOwner::Type(TypeTag::Int64),
        "Single" => StaticOwner::Type(TypeTag::Single),
        "Double" => StaticOwner::Type(TypeTag::Double),
        "Char" => StaticOwner::Type(TypeTag::Char),
        "String" => StaticOwner::Type(TypeTag::String),
        "Object" => StaticOwner::Type(TypeTag::Object),
        other => StaticOwner::Type(TypeTag::Exception(ExceptionKind::from_name(other)?)),
    };
    Some(owner)
}

/// A static field or constant: `Math.PI`, `int.MaxValue`, `string.Empty`.
pub fn static_field(owner: StaticOwner, name: &str) -> Option<(Constant, TypeTag)> {
    use std::f64::consts;

    let constant = match (owner, name) {
        (StaticOwner::Math, "PI") => Constant::Double(consts::PI),
        (StaticOwner::Math, "E") => Constant::Double(consts::E),
        (StaticOwner::Type(TypeTag::String), "Empty") => Constant::Str(String::new()),
        (StaticOwner::Type(tag), "MaxValue") => max_value(tag)?,
        (StaticOwner::Type(tag), "MinValue") => min_value(tag)?,
        (StaticOwner::Type(TypeTag::Double), "NaN") => Constant::Double(f64::NAN),
        (StaticOwner::Type(TypeTag::Double), "PositiveInfinity") => Constant::Double(f64::INFINITY),
        (StaticOwner::Type(TypeTag::Double), "NegativeInfinity") => {
            Constant::Double(f64::NEG_INFINITY)
        }
        (StaticOwner::Type(TypeTag::Single), "NaN") => Constant::Single(f32::NAN),
        (StaticOwner::Type(TypeTag::Single), "PositiveInfinity") => Constant::Single(f32::INFINITY),
        (StaticOwner::Type(TypeTag::Single), "NegativeInfinity") => {
            Constant::Single(f32::NEG_INFINITY)
        }
        _ => return None,
    };
    let ty = match owner {
        StaticOwner::Type(tag) => tag,
        _ => TypeTag::Double,
    };
    Some((constant, ty))
}

fn max_value(tag: TypeTag) -> Option<Constant> {
    Some(match tag {
        TypeTag::Byte => Constant::Byte(u8::MAX),
        TypeTag::Int16 => Constant::Int16(i16::MAX),
        TypeTag::Int32 => Constant::Int32(i32::MAX),
        TypeTag::Int64 => Constant::Int64(i64::MAX),
        TypeTag::Single => Constant::Single(f32::MAX),
        TypeTag::Double => Constant::Double(f64::MAX),
        TypeTag::Char => Constant::Char('\u{ffff}'),
        _ => return None,
    })
}

fn min_value(tag: TypeTag) -> Option<Constant> {
    Some(match tag {
        TypeTag::Byte => Constant::Byte(u8::MIN),
        TypeTag::Int16 => Constant::Int16(i16::MIN),
        TypeTag::Int32 => Constant::Int32(i32::MIN),
        TypeTag::Int64 => Constant::Int64(i64::MIN),
        TypeTag::Single => Constant::Single(f32::MIN),
        TypeTag::Double => Constant::Double(f64::MIN),
        TypeTag::Char => Constant::Char('\0'),
        _ => return None,
    })
}

/// Numeric overloads of `Math.Abs`/`Max`/`Min`, narrowest first.
const MATH_OVERLOADS: [TypeTag; 4] = [
    TypeTag::Int32,
    TypeTag::Int64,
    TypeTag::Single,
    TypeTag::Double,
];

/// Overloads of a static method, or `None` if the owner has no such method.
pub fn static_methods(owner: StaticOwner, name: &str) -> Option<Vec<Signature>> {
    use TypeTag::{Bool, Double, Object, String as Str};

    let candidates = match (owner, name) {
        (StaticOwner::Math, "Abs") => MATH_OVERLOADS
            .iter()
            .map(|&t| Signature::new(&[t], t, Intrinsic::MathAbs))
            .collect(),
        (StaticOwner::Math, "Max") => MATH_OVERLOADS
            .iter()
            .map(|&t| Signature::new(&[t, t], t, Intrinsic::MathMax))
            .collect(),
        (StaticOwner::Math, "Min") => MATH_OVERLOADS
            .iter()
            .map(|&t| Signature::new(&[t, t], t, Intrinsic::MathMin))
            .collect(),
        (StaticOwner::Math, "Pow") => {
            vec![Signature::new(&[Double, Double], Double, Intrinsic::MathPow)]
        }
        (StaticOwner::Math, "Sqrt") => vec![Signature::new(&[Double], Double, Intrinsic::MathSqrt)],
        (StaticOwner::Math, "Floor") => {
            vec![Signature::new(&[Double], Double, Intrinsic::MathFloor)]
        }
        (StaticOwner::Math, "Ceiling") => {
            vec![Signature::new(&[Double], Double, Intrinsic::MathCeiling)]
        }
        (StaticOwner::Math, "Round") => {
            vec![Signature::new(&[Double], Double, Intrinsic::MathRound)]
        }
        (StaticOwner::Convert, name) => {
            let target = convert_target(name)?;
            vec![Signature::new(&[Object], target, Intrinsic::ConvertTo(target))]
        }
        (StaticOwner::Console, "WriteLine") => vec![
            Signature::new(&[], TypeTag::Void, Intrinsic::WriteLineEmpty),
            Signature::new(&[Object], TypeTag::Void, Intrinsic::WriteLine),
        ],
        (StaticOwner::Console, "Write") => {
            vec![Signature::new(&[Object], TypeTag::Void, Intrinsic::Write)]
        }
        (StaticOwner::Type(Str), "IsNullOrEmpty") => {
            vec![Signature::new(&[Str], Bool, Intrinsic::StrIsNullOrEmpty)]
        }
        (StaticOwner::Type(Str), "Concat") => (2u8..=4)
            .map(|n| Signature {
                params: vec![Object; usize::from(n)],
                ret: Str,
                intrinsic: Intrinsic::StrConcat(n),
            })
            .collect(),
        (StaticOwner::Type(tag), "Parse") if is_parsable(tag) => {
            vec![Signature::new(&[Str], tag, Intrinsic::Parse(tag))]
        }
        _ => return None,
    };
    Some(candidates)
}

fn convert_target(name: &str) -> Option<TypeTag> {
    Some(match name {
        "ToBoolean" => TypeTag::Bool,
        "ToByte" => TypeTag::Byte,
        "ToInt16" => TypeTag::Int16,
        "ToInt32" => TypeTag::Int32,
        "ToInt64" => TypeTag::Int64,
        "ToSingle" => TypeTag::Single,
        "ToDouble" => TypeTag::Double,
        "ToChar" => TypeTag::Char,
        "ToString" => TypeTag::String,
        _ => return None,
    })
}

fn is_parsable(tag: TypeTag) -> bool {
    tag.is_numeric() || matches!(tag, TypeTag::Bool | TypeTag::Char)
}

/// A read-only property of a built-in value: `s.Length`, `e.Message`.
pub fn instance_property(receiver: TypeTag, name: &str) -> Option<(Intrinsic, TypeTag)> {
    match (receiver, name) {
        (TypeTag::String, "Length") => Some((Intrinsic::StrLength, TypeTag::Int32)),
        (TypeTag::Exception(_), "Message") => Some((Intrinsic::ExceptionMessage, TypeTag::String)),
        _ => None,
    }
}

/// Overloads of a method on a built-in value. The receiver is not part of
/// `params`.
pub fn instance_methods(receiver: TypeTag, name: &str) -> Option<Vec<Signature>> {
    use TypeTag::{Bool, Char, Int32, String as Str};

    if name == "ToString" {
        return (receiver != TypeTag::Void)
            .then(|| vec![Signature::new(&[], Str, Intrinsic::ToString)]);
    }
    if receiver != Str {
        return None;
    }
    let candidates = match name {
        "ToUpper" => vec![Signature::new(&[], Str, Intrinsic::StrToUpper)],
        "ToLower" => vec![Signature::new(&[], Str, Intrinsic::StrToLower)],
        "Trim" => vec![Signature::new(&[], Str, Intrinsic::StrTrim)],
        "Substring" => vec![
            Signature::new(&[Int32], Str, Intrinsic::StrSubstring),
            Signature::new(&[Int32, Int32], Str, Intrinsic::StrSubstringLen),
        ],
        "Contains" => vec![Signature::new(&[Str], Bool, Intrinsic::StrContains)],
        "StartsWith" => vec![Signature::new(&[Str], Bool, Intrinsic::StrStartsWith)],
        "EndsWith" => vec![Signature::new(&[Str], Bool, Intrinsic::StrEndsWith)],
        "IndexOf" => vec![
            Signature::new(&[Char], Int32, Intrinsic::StrIndexOf),
            Signature::new(&[Str], Int32, Intrinsic::StrIndexOf),
        ],
        "Replace" => vec![
            Signature::new(&[Char, Char], Str, Intrinsic::StrReplace),
            Signature::new(&[Str, Str], Str, Intrinsic::StrReplace),
        ],
        _ => return None,
    };
    Some(candidates)
}
