use super::*;
use pretty_assertions::assert_eq;

// === Integers ===

#[test]
fn integers_accept_whitespace_and_sign() {
    assert_eq!(parse_value(" 42 ", SemanticType::Int32), Ok(Value::Int32(42)));
    assert_eq!(parse_value("-7", SemanticType::Int32), Ok(Value::Int32(-7)));
    assert_eq!(parse_value("+7", SemanticType::Int64), Ok(Value::Int64(7)));
    assert_eq!(parse_value("007", SemanticType::Int16), Ok(Value::Int16(7)));
}

#[test]
fn integer_bounds() {
    assert_eq!(
        parse_value("2147483647", SemanticType::Int32),
        Ok(Value::Int32(i32::MAX))
    );
    assert_eq!(
        parse_value("-2147483648", SemanticType::Int32),
        Ok(Value::Int32(i32::MIN))
    );
    assert_eq!(
        parse_value("2147483648", SemanticType::Int32),
        Err(ParseFailure::Overflow)
    );
    assert_eq!(parse_value("256", SemanticType::Byte), Err(ParseFailure::Overflow));
    assert_eq!(parse_value("-1", SemanticType::Byte), Err(ParseFailure::Overflow));
    assert_eq!(
        parse_value("99999999999999999999999999", SemanticType::Int64),
        Err(ParseFailure::Overflow)
    );
}

#[test]
fn integers_reject_other_syntax() {
    for text in ["", "abc", "1.5", "0x10", "1 2", "-", "1e3"] {
        assert_eq!(
            parse_value(text, SemanticType::Int32),
            Err(ParseFailure::Format),
            "{text:?}"
        );
    }
}

// === Other kinds ===

#[test]
fn booleans_ignore_case() {
    assert_eq!(parse_value("TRUE", SemanticType::Boolean), Ok(Value::Bool(true)));
    assert_eq!(parse_value(" false ", SemanticType::Boolean), Ok(Value::Bool(false)));
    assert_eq!(parse_value("yes", SemanticType::Boolean), Err(ParseFailure::Format));
}

#[test]
fn chars_need_exactly_one_character() {
    assert_eq!(parse_value("x", SemanticType::Char), Ok(Value::Char('x')));
    assert_eq!(parse_value("", SemanticType::Char), Err(ParseFailure::Format));
    assert_eq!(parse_value("xy", SemanticType::Char), Err(ParseFailure::Format));
}

#[test]
fn floats_accept_exponents_and_specials() {
    assert_eq!(parse_value("1.5", SemanticType::Double), Ok(Value::Double(1.5)));
    assert_eq!(parse_value("-2e3", SemanticType::Double), Ok(Value::Double(-2000.0)));
    assert_eq!(parse_value(".5", SemanticType::Single), Ok(Value::Single(0.5)));
    assert_eq!(
        parse_value("-Infinity", SemanticType::Double),
        Ok(Value::Double(f64::NEG_INFINITY))
    );
    assert!(matches!(
        parse_value("NaN", SemanticType::Double),
        Ok(Value::Double(x)) if x.is_nan()
    ));
    assert_eq!(parse_value("1e", SemanticType::Double), Err(ParseFailure::Format));
    assert_eq!(parse_value("inf", SemanticType::Double), Err(ParseFailure::Format));
}

#[test]
fn strings_and_objects_pass_through() {
    assert_eq!(parse_value(" a b ", SemanticType::String), Ok(Value::string(" a b ")));
    assert_eq!(parse_value("12", SemanticType::Object), Ok(Value::string("12")));
}
