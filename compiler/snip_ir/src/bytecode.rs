//! Bytecode for the snippet VM.
//!
//! A stack machine: every instruction pops its operands from the operand
//! stack and pushes its result. Arithmetic, bitwise and comparison operators
//! apply binary numeric promotion to their operands at run time, so the
//! checker only emits explicit conversions where a value is stored, passed
//! or cast.
//!
//! Jump targets are absolute instruction indices within the method.

use serde::{Deserialize, Serialize};

use crate::types::{ExceptionKind, TypeTag};
use crate::value::Value;

/// A single VM instruction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Push constant `n` from the method's constant pool.
    Const(u32),
    LoadLocal(u16),
    StoreLocal(u16),
    Pop,
    Dup,
    /// Placeholder left by the emitter; does nothing.
    Nop,

    // Arithmetic (operands are promoted to a common numeric type)
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Neg,

    // Bitwise / logical
    Not,
    BitNot,
    BitAnd,
    BitOr,
    BitXor,
    /// Shift; the right operand is always `int`.
    Shl,
    Shr,

    // Comparison (push bool)
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    /// Concatenate the string forms of two values (`null` is empty).
    Concat,

    /// Convert the top of stack to the given type: numeric and char
    /// conversions (unchecked), or identity for `object` and exception
    /// upcasts.
    Convert(TypeTag),
    /// Checked downcast from `object`: faults with `InvalidCastException`
    /// unless the value already has the target type.
    Unbox(TypeTag),

    Jump(u32),
    JumpIfFalse(u32),
    JumpIfTrue(u32),

    /// Call a method of the module; arguments are on the stack in order.
    Call { class: u16, method: u16 },
    /// Call a built-in library routine.
    Intrinsic(Intrinsic),

    Return,
    ReturnVoid,
    /// Pop an exception object and raise it.
    Throw,
}

/// Built-in library routines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intrinsic {
    MathAbs,
    MathMax,
    MathMin,
    MathPow,
    MathSqrt,
    MathFloor,
    MathCeiling,
    MathRound,
    /// `T.Parse(string)`.
    Parse(TypeTag),
    /// `Convert.ToT(x)`.
    ConvertTo(TypeTag),
    /// `x.ToString()`.
    ToString,
    StrLength,
    StrCharAt,
    StrToUpper,
    StrToLower,
    StrTrim,
    StrSubstring,
    StrSubstringLen,
    StrContains,
    StrStartsWith,
    StrEndsWith,
    StrIndexOf,
    StrReplace,
    StrIsNullOrEmpty,
    /// `string.Concat` over `n` string operands.
    StrConcat(u8),
    /// `new E(message)`.
    NewException(ExceptionKind),
    /// `new E()`.
    NewExceptionDefault(ExceptionKind),
    ExceptionMessage,
    WriteLine,
    WriteLineEmpty,
    Write,
}

impl Intrinsic {
    /// Number of operands popped from the stack.
    pub fn arity(self) -> usize {
        match self {
            Intrinsic::NewExceptionDefault(_) | Intrinsic::WriteLineEmpty => 0,
            Intrinsic::MathAbs
            | Intrinsic::MathSqrt
            | Intrinsic::MathFloor
            | Intrinsic::MathCeiling
            | Intrinsic::MathRound
            | Intrinsic::Parse(_)
            | Intrinsic::ConvertTo(_)
            | Intrinsic::ToString
            | Intrinsic::StrLength
            | Intrinsic::StrToUpper
            | Intrinsic::StrToLower
            | Intrinsic::StrTrim
            | Intrinsic::StrIsNullOrEmpty
            | Intrinsic::NewException(_)
            | Intrinsic::ExceptionMessage
            | Intrinsic::WriteLine
            | Intrinsic::Write => 1,
            Intrinsic::MathMax
            | Intrinsic::MathMin
            | Intrinsic::MathPow
            | Intrinsic::StrCharAt
            | Intrinsic::StrSubstring
            | Intrinsic::StrContains
            | Intrinsic::StrStartsWith
            | Intrinsic::StrEndsWith
            | Intrinsic::StrIndexOf => 2,
            Intrinsic::StrSubstringLen | Intrinsic::StrReplace => 3,
            Intrinsic::StrConcat(n) => usize::from(n),
        }
    }
}

/// A constant pool entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Null,
    Bool(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Char(char),
    Str(String),
}

impl Constant {
    /// Materialize the constant as a runtime value.
    pub fn to_value(&self) -> Value {
        match self {
            Constant::Null => Value::Null,
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Byte(n) => Value::Byte(*n),
            Constant::Int16(n) => Value::Int16(*n),
            Constant::Int32(n) => Value::Int32(*n),
            Constant::Int64(n) => Value::Int64(*n),
            Constant::Single(x) => Value::Single(*x),
            Constant::Double(x) => Value::Double(*x),
            Constant::Char(c) => Value::Char(*c),
            Constant::Str(s) => Value::string(s.as_str()),
        }
    }

    /// The default value of a type (`0`, `false`, `'\0'`, `null`).
    pub fn default_for(ty: TypeTag) -> Constant {
        match ty {
            TypeTag::Bool => Constant::Bool(false),
            TypeTag::Byte => Constant::Byte(0),
            TypeTag::Int16 => Constant::Int16(0),
            TypeTag::Int32 => Constant::Int32(0),
            TypeTag::Int64 => Constant::Int64(0),
            TypeTag::Single => Constant::Single(0.0),
            TypeTag::Double => Constant::Double(0.0),
            TypeTag::Char => Constant::Char('\0'),
            TypeTag::Void | TypeTag::String | TypeTag::Object | TypeTag::Exception(_) => {
                Constant::Null
            }
        }
    }
}

/// A compiled method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    pub params: Vec<TypeTag>,
    pub param_names: Vec<String>,
    pub return_type: TypeTag,
    /// Total local slots, parameters included (parameters occupy the first
    /// `params.len()` slots).
    pub locals: u16,
    pub constants: Vec<Constant>,
    pub code: Vec<Op>,
}

impl MethodDef {
    /// `Name(int, string)`, as diagnostics and resolution errors print it.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.display_name()).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// A compiled class: an ordered list of methods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub methods: Vec<MethodDef>,
}

/// A compiled module: everything produced from one compilation unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name: String,
    pub classes: Vec<ClassDef>,
}

impl ModuleDef {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDef {
            name: name.into(),
            classes: Vec::new(),
        }
    }
}
