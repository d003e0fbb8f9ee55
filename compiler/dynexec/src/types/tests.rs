use super::*;
use pretty_assertions::assert_eq;

#[test]
fn runtime_names() {
    assert_eq!(map_type(Some("Boolean")), SemanticType::Boolean);
    assert_eq!(map_type(Some("Byte")), SemanticType::Byte);
    assert_eq!(map_type(Some("Int16")), SemanticType::Int16);
    assert_eq!(map_type(Some("Int32")), SemanticType::Int32);
    assert_eq!(map_type(Some("Int64")), SemanticType::Int64);
    assert_eq!(map_type(Some("Single")), SemanticType::Single);
    assert_eq!(map_type(Some("Double")), SemanticType::Double);
    assert_eq!(map_type(Some("Char")), SemanticType::Char);
    assert_eq!(map_type(Some("String")), SemanticType::String);
}

#[test]
fn keywords() {
    assert_eq!(map_type(Some("bool")), SemanticType::Boolean);
    assert_eq!(map_type(Some("short")), SemanticType::Int16);
    assert_eq!(map_type(Some("int")), SemanticType::Int32);
    assert_eq!(map_type(Some("long")), SemanticType::Int64);
    assert_eq!(map_type(Some("float")), SemanticType::Single);
    assert_eq!(map_type(Some("double")), SemanticType::Double);
    assert_eq!(map_type(Some("string")), SemanticType::String);
}

#[test]
fn lookup_ignores_case() {
    assert_eq!(map_type(Some("INT")), SemanticType::Int32);
    assert_eq!(map_type(Some("sTrInG")), SemanticType::String);
}

#[test]
fn everything_else_is_object() {
    assert_eq!(map_type(None), SemanticType::Object);
    assert_eq!(map_type(Some("")), SemanticType::Object);
    assert_eq!(map_type(Some("decimal")), SemanticType::Object);
    assert_eq!(map_type(Some("System.Int32")), SemanticType::Object);
    assert_eq!(map_type(Some("List<int>")), SemanticType::Object);
}
