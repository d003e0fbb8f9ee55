//! Binding caller-supplied arguments to a method's parameters.

use snip_ir::{MethodDef, TypeTag, Value};

use crate::convert::widen;

/// An argument list that does not fit a method's parameters.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("method '{method}' takes {expected} arguments but {found} were supplied")]
    Arity {
        method: String,
        expected: usize,
        found: usize,
    },
    #[error("argument {}: cannot convert from '{found}' to '{expected}'", .position + 1)]
    Type {
        /// Zero-based argument position.
        position: usize,
        expected: TypeTag,
        found: String,
    },
}

/// Convert each argument to its parameter type by identity or implicit
/// widening.
pub fn bind_arguments(method: &MethodDef, args: Vec<Value>) -> Result<Vec<Value>, BindError> {
    if args.len() != method.params.len() {
        return Err(BindError::Arity {
            method: method.signature(),
            expected: method.params.len(),
            found: args.len(),
        });
    }
    args.into_iter()
        .zip(&method.params)
        .enumerate()
        .map(|(position, (arg, &param))| {
            widen(&arg, param).ok_or_else(|| BindError::Type {
                position,
                expected: param,
                found: arg.type_tag().display_name(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests;
