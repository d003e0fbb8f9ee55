//! Converting textual parameter values to typed values.

use snip_ir::{parse_value, ParseFailure, SemanticType, Value};
use tracing::trace;

/// What went wrong with one value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoercionFailure {
    #[error("'{value}' is not in a valid format for {target}")]
    Format { value: String, target: SemanticType },
    #[error("'{value}' is outside the range of {target}")]
    Overflow { value: String, target: SemanticType },
    /// The parsed value has no implicit conversion to the declared
    /// parameter type.
    #[error("cannot convert from '{found}' to '{expected}'")]
    TypeMismatch { expected: String, found: String },
}

/// A parameter value that could not be coerced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for parameter {position}{}: {failure}", name_suffix(.name.as_deref()))]
pub struct CoercionError {
    /// Zero-based position of the parameter.
    pub position: usize,
    pub name: Option<String>,
    pub failure: CoercionFailure,
}

fn name_suffix(name: Option<&str>) -> String {
    name.map(|name| format!(" ('{name}')")).unwrap_or_default()
}

/// A non-blank name for `position`, if one was supplied.
pub(crate) fn name_at(names: &[String], position: usize) -> Option<String> {
    names
        .get(position)
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Parse every value as the semantic type at its position.
///
/// `values` and `types` must have the same length; `names` is only used
/// to label errors and may be shorter or empty.
pub fn coerce(
    values: &[String],
    types: &[SemanticType],
    names: &[String],
) -> Result<Vec<Value>, CoercionError> {
    let args = values
        .iter()
        .zip(types)
        .enumerate()
        .map(|(position, (text, &target))| {
            parse_value(text, target).map_err(|failure| {
                let value = text.clone();
                CoercionError {
                    position,
                    name: name_at(names, position),
                    failure: match failure {
                        ParseFailure::Format => CoercionFailure::Format { value, target },
                        ParseFailure::Overflow => CoercionFailure::Overflow { value, target },
                    },
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    trace!(count = args.len(), "arguments coerced");
    Ok(args)
}
