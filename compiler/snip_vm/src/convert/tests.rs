use super::*;
use pretty_assertions::assert_eq;

// === Casts ===

#[test]
fn narrowing_casts_truncate() {
    assert_eq!(convert(Value::Int32(300), TypeTag::Byte), Ok(Value::Byte(44)));
    assert_eq!(convert(Value::Int64(1 << 32), TypeTag::Int32), Ok(Value::Int32(0)));
    assert_eq!(convert(Value::Int32(65), TypeTag::Char), Ok(Value::Char('A')));
}

#[test]
fn float_to_int_casts_saturate() {
    assert_eq!(convert(Value::Double(2.9), TypeTag::Int32), Ok(Value::Int32(2)));
    assert_eq!(convert(Value::Double(-2.9), TypeTag::Int32), Ok(Value::Int32(-2)));
    assert_eq!(convert(Value::Double(1e20), TypeTag::Int32), Ok(Value::Int32(i32::MAX)));
    assert_eq!(convert(Value::Double(f64::NAN), TypeTag::Int64), Ok(Value::Int64(0)));
}

#[test]
fn widening_casts_are_exact() {
    assert_eq!(convert(Value::Char('a'), TypeTag::Int64), Ok(Value::Int64(97)));
    assert_eq!(convert(Value::Int32(3), TypeTag::Double), Ok(Value::Double(3.0)));
}

// === Unboxing ===

#[test]
fn unbox_checks_the_runtime_type() {
    assert_eq!(unbox(Value::Int32(5), TypeTag::Int32), Ok(Value::Int32(5)));
    let fault = unbox(Value::Int32(5), TypeTag::Int64).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::InvalidCastException);
    assert_eq!(
        fault.message,
        "Unable to cast object of type 'System.Int32' to type 'System.Int64'."
    );
}

#[test]
fn unbox_null() {
    assert_eq!(unbox(Value::Null, TypeTag::String), Ok(Value::Null));
    let fault = unbox(Value::Null, TypeTag::Int32).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::NullReferenceException);
}

#[test]
fn unbox_exceptions_to_the_base_class() {
    let value = Value::exception(ExceptionKind::FormatException, "bad");
    assert_eq!(
        unbox(value.clone(), TypeTag::Exception(ExceptionKind::Exception)),
        Ok(value)
    );
}

// === Widening for argument binding ===

#[test]
fn widen_follows_the_implicit_table() {
    assert_eq!(widen(&Value::Int32(3), TypeTag::Int64), Some(Value::Int64(3)));
    assert_eq!(widen(&Value::Byte(3), TypeTag::Double), Some(Value::Double(3.0)));
    assert_eq!(widen(&Value::string("x"), TypeTag::Object), Some(Value::string("x")));
    assert_eq!(widen(&Value::Int64(3), TypeTag::Int32), None);
    assert_eq!(widen(&Value::string("3"), TypeTag::Int32), None);
    assert_eq!(widen(&Value::Null, TypeTag::String), Some(Value::Null));
    assert_eq!(widen(&Value::Null, TypeTag::Int32), None);
}

// === Convert.ToX ===

#[test]
fn convert_to_int_rounds_half_to_even() {
    assert_eq!(convert_to(&Value::Double(2.5), TypeTag::Int32), Ok(Value::Int32(2)));
    assert_eq!(convert_to(&Value::Double(3.5), TypeTag::Int32), Ok(Value::Int32(4)));
    assert_eq!(convert_to(&Value::Double(-1.5), TypeTag::Int64), Ok(Value::Int64(-2)));
}

#[test]
fn convert_to_checks_ranges() {
    let fault = convert_to(&Value::Int64(1 << 40), TypeTag::Int32).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::OverflowException);
    assert_eq!(fault.message, "Value was either too large or too small for an Int32.");
    let fault = convert_to(&Value::Double(f64::NAN), TypeTag::Int32).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::OverflowException);
}

#[test]
fn convert_to_parses_strings() {
    assert_eq!(convert_to(&Value::string(" 12 "), TypeTag::Int32), Ok(Value::Int32(12)));
    assert_eq!(convert_to(&Value::string("true"), TypeTag::Bool), Ok(Value::Bool(true)));
    let fault = convert_to(&Value::string("x"), TypeTag::Double).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::FormatException);
    assert_eq!(fault.message, "The input string 'x' was not in a correct format.");
}

#[test]
fn convert_to_handles_null_and_bool() {
    assert_eq!(convert_to(&Value::Null, TypeTag::Int32), Ok(Value::Int32(0)));
    assert_eq!(convert_to(&Value::Null, TypeTag::String), Ok(Value::string("")));
    assert_eq!(convert_to(&Value::Bool(true), TypeTag::Int64), Ok(Value::Int64(1)));
    assert_eq!(convert_to(&Value::Int32(0), TypeTag::Bool), Ok(Value::Bool(false)));
}

#[test]
fn convert_to_string_uses_display() {
    assert_eq!(convert_to(&Value::Bool(true), TypeTag::String), Ok(Value::string("True")));
    assert_eq!(convert_to(&Value::Double(0.5), TypeTag::String), Ok(Value::string("0.5")));
}

#[test]
fn char_conversions() {
    assert_eq!(convert_to(&Value::Char('A'), TypeTag::Int32), Ok(Value::Int32(65)));
    let fault = convert_to(&Value::Char('A'), TypeTag::Double).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::InvalidCastException);
    assert_eq!(fault.message, "Invalid cast from 'Char' to 'Double'.");
}

// === Parse ===

#[test]
fn parse_reports_format_and_overflow() {
    assert_eq!(parse(&Value::string("-5"), TypeTag::Int16), Ok(Value::Int16(-5)));
    let fault = parse(&Value::string("70000"), TypeTag::Int16).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::OverflowException);
    let fault = parse(&Value::string("maybe"), TypeTag::Bool).unwrap_err();
    assert_eq!(fault.message, "String 'maybe' was not recognized as a valid Boolean.");
    let fault = parse(&Value::Null, TypeTag::Int32).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::ArgumentException);
}
