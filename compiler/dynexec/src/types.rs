//! Type token to semantic type mapping.

use snip_ir::SemanticType;

/// Map a declared type token to its semantic type, ignoring case.
///
/// Unknown tokens, and a missing token, map to [`SemanticType::Object`].
pub fn map_type(token: Option<&str>) -> SemanticType {
    let Some(token) = token else {
        return SemanticType::Object;
    };
    match token.to_ascii_lowercase().as_str() {
        "boolean" | "bool" => SemanticType::Boolean,
        "byte" => SemanticType::Byte,
        "int16" | "short" => SemanticType::Int16,
        "int" | "int32" => SemanticType::Int32,
        "int64" | "long" => SemanticType::Int64,
        "single" | "float" => SemanticType::Single,
        "double" => SemanticType::Double,
        "char" => SemanticType::Char,
        "string" => SemanticType::String,
        _ => SemanticType::Object,
    }
}

#[cfg(test)]
mod tests;
