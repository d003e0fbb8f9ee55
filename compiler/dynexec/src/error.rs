//! Engine errors, one variant per pipeline stage.

use std::fmt;

use snip_ir::ExceptionKind;
use snip_vm::Fault;

use crate::coerce::CoercionError;
use crate::toolchain::{CompileFailure, LoadFailure, ResolutionFailure};

/// The pipeline stage that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Validation,
    Compile,
    Resolution,
    Coercion,
    Invocation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Validation => "validation",
            Stage::Compile => "compile",
            Stage::Resolution => "resolution",
            Stage::Coercion => "coercion",
            Stage::Invocation => "invocation",
        })
    }
}

/// Inconsistent inputs, found before anything is compiled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing method body")]
    MissingBody,
    #[error("mismatch between parameter names-values-types")]
    LengthMismatch,
    #[error("some parameter names are empty")]
    BlankNames,
    #[error("some parameter values are empty")]
    BlankValues,
}

/// The module could not be loaded or has no usable entry point.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("module failed to load: {0}")]
    Load(#[from] LoadFailure),
    #[error(transparent)]
    NotFound(#[from] ResolutionFailure),
    #[error("method '{method}' takes {expected} parameters but {found} were supplied")]
    Arity {
        method: String,
        expected: usize,
        found: usize,
    },
}

/// The invoked method raised an exception.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}: {message}", .exception.full_name())]
pub struct InvocationError {
    pub exception: ExceptionKind,
    pub message: String,
}

impl From<Fault> for InvocationError {
    fn from(fault: Fault) -> Self {
        InvocationError {
            exception: fault.exception,
            message: fault.message,
        }
    }
}

/// Why [`Engine::execute_method`](crate::Engine::execute_method) failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("compilation failed:\n{0}")]
    Compile(#[from] CompileFailure),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

impl EngineError {
    pub fn stage(&self) -> Stage {
        match self {
            EngineError::Validation(_) => Stage::Validation,
            EngineError::Compile(_) => Stage::Compile,
            EngineError::Resolution(_) => Stage::Resolution,
            EngineError::Coercion(_) => Stage::Coercion,
            EngineError::Invocation(_) => Stage::Invocation,
        }
    }
}
