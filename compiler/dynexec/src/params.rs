//! Parameter names, values and types supplied with a call.

use snip_ir::SemanticType;

use crate::extract::ExtractedParameter;
use crate::types::map_type;

/// The three positional parameter sequences.
///
/// Each sequence may be absent. Absent is not the same as empty: a call
/// with every sequence absent invokes the method without arguments and
/// skips coercion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterSet {
    pub names: Option<Vec<String>>,
    pub values: Option<Vec<String>>,
    pub types: Option<Vec<SemanticType>>,
}

impl ParameterSet {
    /// No parameters at all.
    pub fn none() -> Self {
        ParameterSet::default()
    }

    pub fn new(names: Vec<String>, values: Vec<String>, types: Vec<SemanticType>) -> Self {
        ParameterSet {
            names: Some(names),
            values: Some(values),
            types: Some(types),
        }
    }

    /// Pair extracted parameters with their values: names are taken as
    /// written and types come from [`map_type`].
    pub fn from_extracted(parameters: &[ExtractedParameter], values: Vec<String>) -> Self {
        let names = parameters.iter().map(|p| p.name.clone()).collect();
        let types = parameters
            .iter()
            .map(|p| map_type(p.type_token.as_deref()))
            .collect();
        ParameterSet::new(names, values, types)
    }

    /// True when no sequence is present.
    pub fn is_absent(&self) -> bool {
        self.names.is_none() && self.values.is_none() && self.types.is_none()
    }

    /// Number of supplied values (zero when absent).
    pub fn len(&self) -> usize {
        self.values.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests;
