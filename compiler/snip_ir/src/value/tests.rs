use super::*;
use pretty_assertions::assert_eq;

#[test]
fn booleans_print_capitalized() {
    assert_eq!(Value::Bool(true).to_string(), "True");
    assert_eq!(Value::Bool(false).to_string(), "False");
}

#[test]
fn floats_print_without_trailing_zero() {
    assert_eq!(Value::Double(1.0).to_string(), "1");
    assert_eq!(Value::Double(3.5).to_string(), "3.5");
    assert_eq!(Value::Single(0.25).to_string(), "0.25");
}

#[test]
fn large_and_small_magnitudes_use_exponent_form() {
    assert_eq!(Value::Double(1e20).to_string(), "1E+20");
    assert_eq!(Value::Double(1e-7).to_string(), "1E-07");
    assert_eq!(Value::Double(-1.5e300).to_string(), "-1.5E+300");
    assert_eq!(Value::Double(1e15).to_string(), "1E+15");
    assert_eq!(Value::Double(0.00001).to_string(), "1E-05");
    assert_eq!(Value::Single(1e7).to_string(), "1E+07");
}

#[test]
fn moderate_magnitudes_stay_fixed() {
    assert_eq!(Value::Double(1e14).to_string(), "100000000000000");
    assert_eq!(Value::Double(0.0001).to_string(), "0.0001");
    assert_eq!(Value::Double(123.456).to_string(), "123.456");
    assert_eq!(Value::Double(-0.0).to_string(), "-0");
    assert_eq!(Value::Single(16_777_216.0).to_string(), "16777216");
}

#[test]
fn non_finite_floats() {
    assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::Double(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(Value::Single(f32::NEG_INFINITY).to_string(), "-Infinity");
}

#[test]
fn void_and_null_print_empty() {
    assert_eq!(Value::Void.to_string(), "");
    assert_eq!(Value::Null.to_string(), "");
}

#[test]
fn exception_display_includes_class() {
    let value = Value::exception(ExceptionKind::FormatException, "bad input");
    assert_eq!(value.to_string(), "System.FormatException: bad input");
    assert_eq!(
        value.type_tag(),
        TypeTag::Exception(ExceptionKind::FormatException)
    );
}

#[test]
fn semantic_types_of_values() {
    assert_eq!(Value::Int32(3).semantic_type(), Some(SemanticType::Int32));
    assert_eq!(Value::string("x").semantic_type(), Some(SemanticType::String));
    assert_eq!(Value::Null.semantic_type(), None);
    assert_eq!(Value::Void.semantic_type(), None);
}

#[test]
fn runtime_type_names() {
    assert_eq!(Value::Int64(1).runtime_type_name(), "System.Int64");
    assert_eq!(Value::Null.runtime_type_name(), "null");
}
