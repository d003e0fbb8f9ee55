//! Type vocabularies.
//!
//! Two enumerations live here:
//! - [`SemanticType`]: the fixed set of primitive kinds a caller can assign to
//!   a parameter value before invocation.
//! - [`TypeTag`]: the type of a value inside compiled code (what the checker
//!   reasons about and what bytecode records for parameters and returns).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive value kind used for argument coercion.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SemanticType {
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Char,
    String,
    /// Fallback for unknown or absent type tokens.
    Object,
}

impl SemanticType {
    /// Every semantic type, in declaration order.
    pub const ALL: [SemanticType; 10] = [
        SemanticType::Boolean,
        SemanticType::Byte,
        SemanticType::Int16,
        SemanticType::Int32,
        SemanticType::Int64,
        SemanticType::Single,
        SemanticType::Double,
        SemanticType::Char,
        SemanticType::String,
        SemanticType::Object,
    ];

    /// The runtime type name (`Int32`, `String`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            SemanticType::Boolean => "Boolean",
            SemanticType::Byte => "Byte",
            SemanticType::Int16 => "Int16",
            SemanticType::Int32 => "Int32",
            SemanticType::Int64 => "Int64",
            SemanticType::Single => "Single",
            SemanticType::Double => "Double",
            SemanticType::Char => "Char",
            SemanticType::String => "String",
            SemanticType::Object => "Object",
        }
    }

    /// The compiled-code type that holds values of this semantic type.
    pub const fn type_tag(self) -> TypeTag {
        match self {
            SemanticType::Boolean => TypeTag::Bool,
            SemanticType::Byte => TypeTag::Byte,
            SemanticType::Int16 => TypeTag::Int16,
            SemanticType::Int32 => TypeTag::Int32,
            SemanticType::Int64 => TypeTag::Int64,
            SemanticType::Single => TypeTag::Single,
            SemanticType::Double => TypeTag::Double,
            SemanticType::Char => TypeTag::Char,
            SemanticType::String => TypeTag::String,
            SemanticType::Object => TypeTag::Object,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in exception classes.
///
/// Every kind derives from `Exception`; there is no deeper hierarchy.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum ExceptionKind {
    Exception,
    ArgumentException,
    ArgumentOutOfRangeException,
    InvalidOperationException,
    FormatException,
    OverflowException,
    DivideByZeroException,
    NotSupportedException,
    NullReferenceException,
    InvalidCastException,
    IndexOutOfRangeException,
    InsufficientExecutionStackException,
}

impl ExceptionKind {
    const ALL: [ExceptionKind; 12] = [
        ExceptionKind::Exception,
        ExceptionKind::ArgumentException,
        ExceptionKind::ArgumentOutOfRangeException,
        ExceptionKind::InvalidOperationException,
        ExceptionKind::FormatException,
        ExceptionKind::OverflowException,
        ExceptionKind::DivideByZeroException,
        ExceptionKind::NotSupportedException,
        ExceptionKind::NullReferenceException,
        ExceptionKind::InvalidCastException,
        ExceptionKind::IndexOutOfRangeException,
        ExceptionKind::InsufficientExecutionStackException,
    ];

    /// Simple class name, as written in source.
    pub const fn name(self) -> &'static str {
        match self {
            ExceptionKind::Exception => "Exception",
            ExceptionKind::ArgumentException => "ArgumentException",
            ExceptionKind::ArgumentOutOfRangeException => "ArgumentOutOfRangeException",
            ExceptionKind::InvalidOperationException => "InvalidOperationException",
            ExceptionKind::FormatException => "FormatException",
            ExceptionKind::OverflowException => "OverflowException",
            ExceptionKind::DivideByZeroException => "DivideByZeroException",
            ExceptionKind::NotSupportedException => "NotSupportedException",
            ExceptionKind::NullReferenceException => "NullReferenceException",
            ExceptionKind::InvalidCastException => "InvalidCastException",
            ExceptionKind::IndexOutOfRangeException => "IndexOutOfRangeException",
            ExceptionKind::InsufficientExecutionStackException => {
                "InsufficientExecutionStackException"
            }
        }
    }

    /// Namespace-qualified class name.
    pub fn full_name(self) -> String {
        format!("System.{}", self.name())
    }

    /// Look up an exception class by its simple name.
    pub fn from_name(name: &str) -> Option<ExceptionKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Message used when the exception is constructed without one.
    pub fn default_message(self) -> String {
        match self {
            ExceptionKind::DivideByZeroException => "Attempted to divide by zero.".to_string(),
            ExceptionKind::OverflowException => {
                "Arithmetic operation resulted in an overflow.".to_string()
            }
            ExceptionKind::NullReferenceException => {
                "Object reference not set to an instance of an object.".to_string()
            }
            ExceptionKind::IndexOutOfRangeException => {
                "Index was outside the bounds of the array.".to_string()
            }
            ExceptionKind::ArgumentException => "Value does not fall within the expected range.".to_string(),
            ExceptionKind::InvalidOperationException => {
                "Operation is not valid due to the current state of the object.".to_string()
            }
            ExceptionKind::NotSupportedException => "Specified method is not supported.".to_string(),
            ExceptionKind::InsufficientExecutionStackException => {
                "Insufficient stack to continue executing the program safely.".to_string()
            }
            _ => format!("Exception of type '{}' was thrown.", self.full_name()),
        }
    }
}

/// Type of a value in compiled code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum TypeTag {
    Void,
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Char,
    String,
    Object,
    Exception(ExceptionKind),
}

impl TypeTag {
    /// Keyword spelling used in diagnostics (`int`, `string`, ...).
    pub fn display_name(self) -> String {
        match self {
            TypeTag::Void => "void".to_string(),
            TypeTag::Bool => "bool".to_string(),
            TypeTag::Byte => "byte".to_string(),
            TypeTag::Int16 => "short".to_string(),
            TypeTag::Int32 => "int".to_string(),
            TypeTag::Int64 => "long".to_string(),
            TypeTag::Single => "float".to_string(),
            TypeTag::Double => "double".to_string(),
            TypeTag::Char => "char".to_string(),
            TypeTag::String => "string".to_string(),
            TypeTag::Object => "object".to_string(),
            TypeTag::Exception(kind) => kind.full_name(),
        }
    }

    /// Runtime type name (`System.Int32`, ...), used in runtime fault messages.
    pub fn runtime_name(self) -> String {
        match self {
            TypeTag::Void => "System.Void".to_string(),
            TypeTag::Bool => "System.Boolean".to_string(),
            TypeTag::Byte => "System.Byte".to_string(),
            TypeTag::Int16 => "System.Int16".to_string(),
            TypeTag::Int32 => "System.Int32".to_string(),
            TypeTag::Int64 => "System.Int64".to_string(),
            TypeTag::Single => "System.Single".to_string(),
            TypeTag::Double => "System.Double".to_string(),
            TypeTag::Char => "System.Char".to_string(),
            TypeTag::String => "System.String".to_string(),
            TypeTag::Object => "System.Object".to_string(),
            TypeTag::Exception(kind) => kind.full_name(),
        }
    }

    /// Integral or floating-point type (char excluded).
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeTag::Byte
                | TypeTag::Int16
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::Single
                | TypeTag::Double
        )
    }

    /// Integral type (char excluded).
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            TypeTag::Byte | TypeTag::Int16 | TypeTag::Int32 | TypeTag::Int64
        )
    }

    /// Reference type: may hold `null`.
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            TypeTag::String | TypeTag::Object | TypeTag::Exception(_)
        )
    }

    /// Whether a value of type `self` converts implicitly to `target`.
    ///
    /// Covers identity, the numeric widening table, boxing to `object` and
    /// exception upcasts.
    pub fn widens_to(self, target: TypeTag) -> bool {
        if self == target {
            return true;
        }
        match (self, target) {
            (TypeTag::Void, _) | (_, TypeTag::Void) => false,
            (_, TypeTag::Object) => true,
            (TypeTag::Exception(_), TypeTag::Exception(ExceptionKind::Exception)) => true,
            (TypeTag::Byte, TypeTag::Int16 | TypeTag::Int32 | TypeTag::Int64)
            | (TypeTag::Int16 | TypeTag::Char, TypeTag::Int32 | TypeTag::Int64)
            | (TypeTag::Int32, TypeTag::Int64) => true,
            (
                TypeTag::Byte | TypeTag::Int16 | TypeTag::Char | TypeTag::Int32 | TypeTag::Int64,
                TypeTag::Single | TypeTag::Double,
            )
            | (TypeTag::Single, TypeTag::Double) => true,
            _ => false,
        }
    }

    /// The semantic type that describes this tag, if it is one of the
    /// primitive parameter kinds.
    pub const fn semantic_type(self) -> Option<SemanticType> {
        match self {
            TypeTag::Bool => Some(SemanticType::Boolean),
            TypeTag::Byte => Some(SemanticType::Byte),
            TypeTag::Int16 => Some(SemanticType::Int16),
            TypeTag::Int32 => Some(SemanticType::Int32),
            TypeTag::Int64 => Some(SemanticType::Int64),
            TypeTag::Single => Some(SemanticType::Single),
            TypeTag::Double => Some(SemanticType::Double),
            TypeTag::Char => Some(SemanticType::Char),
            TypeTag::String => Some(SemanticType::String),
            TypeTag::Object => Some(SemanticType::Object),
            TypeTag::Void | TypeTag::Exception(_) => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
