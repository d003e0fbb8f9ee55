use super::*;
use pretty_assertions::assert_eq;
use snip_ir::ExceptionKind;

// === Promotion ===

#[test]
fn small_integrals_promote_to_int() {
    assert_eq!(
        binary(Op::Add, &Value::Byte(200), &Value::Int16(100)),
        Ok(Value::Int32(300))
    );
    assert_eq!(
        binary(Op::Add, &Value::Char('a'), &Value::Int32(1)),
        Ok(Value::Int32(98))
    );
}

#[test]
fn mixed_operands_take_the_wider_type() {
    assert_eq!(
        binary(Op::Mul, &Value::Int32(3), &Value::Int64(4)),
        Ok(Value::Int64(12))
    );
    assert_eq!(
        binary(Op::Add, &Value::Int32(1), &Value::Single(0.5)),
        Ok(Value::Single(1.5))
    );
    assert_eq!(
        binary(Op::Div, &Value::Int32(1), &Value::Double(4.0)),
        Ok(Value::Double(0.25))
    );
}

// === Integer arithmetic ===

#[test]
fn integer_arithmetic_wraps() {
    assert_eq!(
        binary(Op::Add, &Value::Int32(i32::MAX), &Value::Int32(1)),
        Ok(Value::Int32(i32::MIN))
    );
    assert_eq!(
        binary(Op::Sub, &Value::Int64(i64::MIN), &Value::Int64(1)),
        Ok(Value::Int64(i64::MAX))
    );
}

#[test]
fn integer_division_truncates() {
    assert_eq!(binary(Op::Div, &Value::Int32(-7), &Value::Int32(2)), Ok(Value::Int32(-3)));
    assert_eq!(binary(Op::Rem, &Value::Int32(-7), &Value::Int32(2)), Ok(Value::Int32(-1)));
}

#[test]
fn division_by_zero_faults() {
    let fault = binary(Op::Div, &Value::Int32(1), &Value::Int32(0)).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::DivideByZeroException);
    let fault = binary(Op::Rem, &Value::Int64(1), &Value::Int64(0)).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::DivideByZeroException);
}

#[test]
fn min_value_divided_by_minus_one_overflows() {
    let fault = binary(Op::Div, &Value::Int32(i32::MIN), &Value::Int32(-1)).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::OverflowException);
}

#[test]
fn float_division_by_zero_is_infinite() {
    assert_eq!(
        binary(Op::Div, &Value::Double(1.0), &Value::Int32(0)),
        Ok(Value::Double(f64::INFINITY))
    );
}

// === Bitwise and shifts ===

#[test]
fn bitwise_on_bools_and_ints() {
    assert_eq!(
        binary(Op::BitXor, &Value::Bool(true), &Value::Bool(true)),
        Ok(Value::Bool(false))
    );
    assert_eq!(
        binary(Op::BitAnd, &Value::Int32(0b1100), &Value::Int32(0b1010)),
        Ok(Value::Int32(0b1000))
    );
    assert_eq!(
        binary(Op::BitOr, &Value::Int64(1), &Value::Int32(2)),
        Ok(Value::Int64(3))
    );
}

#[test]
fn shift_counts_are_masked() {
    assert_eq!(binary(Op::Shl, &Value::Int32(1), &Value::Int32(33)), Ok(Value::Int32(2)));
    assert_eq!(binary(Op::Shl, &Value::Int64(1), &Value::Int32(33)), Ok(Value::Int64(1 << 33)));
    assert_eq!(binary(Op::Shr, &Value::Int32(-8), &Value::Int32(1)), Ok(Value::Int32(-4)));
}

// === Comparison ===

#[test]
fn strings_compare_by_content() {
    assert_eq!(
        binary(Op::Eq, &Value::string("ab"), &Value::string("ab")),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        binary(Op::Ne, &Value::string("ab"), &Value::Null),
        Ok(Value::Bool(true))
    );
}

#[test]
fn numeric_equality_promotes() {
    assert_eq!(
        binary(Op::Eq, &Value::Int32(2), &Value::Double(2.0)),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        binary(Op::Eq, &Value::Char('A'), &Value::Int32(65)),
        Ok(Value::Bool(true))
    );
}

#[test]
fn nan_compares_false() {
    let nan = Value::Double(f64::NAN);
    for op in [Op::Lt, Op::Le, Op::Gt, Op::Ge, Op::Eq] {
        assert_eq!(binary(op, &nan, &nan), Ok(Value::Bool(false)), "{op:?}");
    }
    assert_eq!(binary(Op::Ne, &nan, &nan), Ok(Value::Bool(true)));
}

#[test]
fn ordering() {
    assert_eq!(binary(Op::Lt, &Value::Int32(1), &Value::Int64(2)), Ok(Value::Bool(true)));
    assert_eq!(binary(Op::Ge, &Value::Double(2.0), &Value::Int32(2)), Ok(Value::Bool(true)));
}

// === Unary ===

#[test]
fn unary_operators() {
    assert_eq!(unary(Op::Neg, &Value::Byte(5)), Ok(Value::Int32(-5)));
    assert_eq!(unary(Op::Neg, &Value::Int32(i32::MIN)), Ok(Value::Int32(i32::MIN)));
    assert_eq!(unary(Op::Not, &Value::Bool(false)), Ok(Value::Bool(true)));
    assert_eq!(unary(Op::BitNot, &Value::Int32(0)), Ok(Value::Int32(-1)));
}

#[test]
fn mismatched_operands_are_invalid_programs() {
    let fault = binary(Op::Add, &Value::string("a"), &Value::Int32(1)).unwrap_err();
    assert_eq!(fault.exception, ExceptionKind::InvalidOperationException);
}
