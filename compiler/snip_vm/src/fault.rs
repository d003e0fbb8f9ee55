//! Runtime faults raised by executing code.

use snip_ir::{ExceptionKind, ExceptionValue};

/// An exception that escaped the invoked method.
///
/// The snippet language has no `catch`, so every raised exception unwinds
/// the whole call and surfaces here.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}: {message}", .exception.full_name())]
pub struct Fault {
    pub exception: ExceptionKind,
    pub message: String,
}

/// Result of VM operations.
pub type VmResult<T> = Result<T, Fault>;

impl Fault {
    pub fn new(exception: ExceptionKind, message: impl Into<String>) -> Self {
        Fault {
            exception,
            message: message.into(),
        }
    }

    /// Fault with the exception's default message.
    pub fn of(exception: ExceptionKind) -> Self {
        Fault {
            exception,
            message: exception.default_message(),
        }
    }

    /// A thrown exception object.
    pub fn thrown(value: &ExceptionValue) -> Self {
        Fault::new(value.kind, value.message.clone())
    }
}

// Constructors for the faults the runtime raises itself.

pub(crate) fn divide_by_zero() -> Fault {
    Fault::of(ExceptionKind::DivideByZeroException)
}

pub(crate) fn overflow() -> Fault {
    Fault::of(ExceptionKind::OverflowException)
}

pub(crate) fn overflow_for(type_name: &str) -> Fault {
    Fault::new(
        ExceptionKind::OverflowException,
        format!("Value was either too large or too small for {type_name}."),
    )
}

pub(crate) fn null_reference() -> Fault {
    Fault::of(ExceptionKind::NullReferenceException)
}

pub(crate) fn invalid_cast(from: &str, to: &str) -> Fault {
    Fault::new(
        ExceptionKind::InvalidCastException,
        format!("Unable to cast object of type '{from}' to type '{to}'."),
    )
}

pub(crate) fn index_out_of_range() -> Fault {
    Fault::of(ExceptionKind::IndexOutOfRangeException)
}

pub(crate) fn argument_out_of_range(parameter: &str, detail: &str) -> Fault {
    Fault::new(
        ExceptionKind::ArgumentOutOfRangeException,
        format!("{detail} (Parameter '{parameter}')"),
    )
}

pub(crate) fn argument_null(parameter: &str) -> Fault {
    Fault::new(
        ExceptionKind::ArgumentException,
        format!("Value cannot be null. (Parameter '{parameter}')"),
    )
}

pub(crate) fn format_error(message: &str) -> Fault {
    Fault::new(ExceptionKind::FormatException, message)
}

/// The program itself is malformed (stack underflow, wrong operand kinds).
/// Verified images never raise this.
pub(crate) fn invalid_program(detail: &str) -> Fault {
    Fault::new(
        ExceptionKind::InvalidOperationException,
        format!("Invalid program: {detail}."),
    )
}
