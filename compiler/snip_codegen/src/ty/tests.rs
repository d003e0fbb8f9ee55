use super::*;
use pretty_assertions::assert_eq;

fn constant(value: i64) -> ExprInfo {
    ExprInfo {
        ty: Ty::INT,
        constant: Some(value),
    }
}

// === Promotion ===

#[test]
fn small_types_promote_to_int() {
    assert_eq!(unary_promotion(TypeTag::Byte), Some(TypeTag::Int32));
    assert_eq!(unary_promotion(TypeTag::Char), Some(TypeTag::Int32));
    assert_eq!(unary_promotion(TypeTag::Int64), Some(TypeTag::Int64));
    assert_eq!(unary_promotion(TypeTag::Bool), None);
}

#[test]
fn binary_promotion_picks_widest() {
    assert_eq!(
        binary_promotion(TypeTag::Int32, TypeTag::Int64),
        Some(TypeTag::Int64)
    );
    assert_eq!(
        binary_promotion(TypeTag::Int64, TypeTag::Single),
        Some(TypeTag::Single)
    );
    assert_eq!(
        binary_promotion(TypeTag::Single, TypeTag::Double),
        Some(TypeTag::Double)
    );
    assert_eq!(
        binary_promotion(TypeTag::Byte, TypeTag::Char),
        Some(TypeTag::Int32)
    );
    assert_eq!(binary_promotion(TypeTag::String, TypeTag::Int32), None);
}

// === Implicit ===

#[test]
fn widening_is_numeric_and_boxing_is_reference() {
    assert_eq!(
        implicit(ExprInfo::tag(TypeTag::Int32), TypeTag::Int64),
        Conversion::Numeric
    );
    assert_eq!(
        implicit(ExprInfo::tag(TypeTag::Int32), TypeTag::Object),
        Conversion::Reference
    );
    assert_eq!(
        implicit(ExprInfo::tag(TypeTag::Int32), TypeTag::Int32),
        Conversion::Identity
    );
}

#[test]
fn null_converts_only_to_references() {
    assert_eq!(implicit(ExprInfo::of(Ty::Null), TypeTag::String), Conversion::Reference);
    assert_eq!(implicit(ExprInfo::of(Ty::Null), TypeTag::Int32), Conversion::Invalid);
}

#[test]
fn int_constants_narrow_when_in_range() {
    assert_eq!(implicit(constant(200), TypeTag::Byte), Conversion::Numeric);
    assert_eq!(implicit(constant(256), TypeTag::Byte), Conversion::Invalid);
    assert_eq!(implicit(constant(-5), TypeTag::Int16), Conversion::Numeric);
    assert_eq!(implicit(constant(65), TypeTag::Char), Conversion::Invalid);
    assert_eq!(
        implicit(ExprInfo::tag(TypeTag::Int32), TypeTag::Byte),
        Conversion::Invalid
    );
}

#[test]
fn void_never_converts() {
    assert_eq!(
        implicit(ExprInfo::tag(TypeTag::Void), TypeTag::Object),
        Conversion::Invalid
    );
}

// === Explicit ===

#[test]
fn casts_between_arithmetic_types() {
    assert_eq!(
        explicit(ExprInfo::tag(TypeTag::Double), TypeTag::Int32),
        Conversion::Numeric
    );
    assert_eq!(
        explicit(ExprInfo::tag(TypeTag::Int32), TypeTag::Char),
        Conversion::Numeric
    );
}

#[test]
fn object_casts_unbox() {
    assert_eq!(
        explicit(ExprInfo::tag(TypeTag::Object), TypeTag::Int32),
        Conversion::Unbox
    );
    assert_eq!(
        explicit(ExprInfo::tag(TypeTag::Object), TypeTag::String),
        Conversion::Unbox
    );
}

#[test]
fn unrelated_casts_are_invalid() {
    assert_eq!(
        explicit(ExprInfo::tag(TypeTag::String), TypeTag::Int32),
        Conversion::Invalid
    );
    assert_eq!(
        explicit(ExprInfo::tag(TypeTag::Bool), TypeTag::Int32),
        Conversion::Invalid
    );
}

// === Binary operators ===

fn binary_result(op: BinaryOp, left: TypeTag, right: TypeTag) -> Option<TypeTag> {
    binary(op, Ty::Tag(left), Ty::Tag(right)).map(|(ty, _)| ty)
}

#[test]
fn string_plus_anything_concatenates() {
    assert_eq!(
        binary(BinaryOp::Add, Ty::STRING, Ty::INT),
        Some((TypeTag::String, Op::Concat))
    );
    assert_eq!(
        binary(BinaryOp::Add, Ty::Null, Ty::STRING),
        Some((TypeTag::String, Op::Concat))
    );
    assert_eq!(binary(BinaryOp::Add, Ty::STRING, Ty::VOID), None);
}

#[test]
fn arithmetic_promotes() {
    assert_eq!(
        binary_result(BinaryOp::Mul, TypeTag::Int32, TypeTag::Double),
        Some(TypeTag::Double)
    );
    assert_eq!(
        binary_result(BinaryOp::Add, TypeTag::Char, TypeTag::Char),
        Some(TypeTag::Int32)
    );
    assert_eq!(binary_result(BinaryOp::Sub, TypeTag::Bool, TypeTag::Int32), None);
}

#[test]
fn shifts_keep_the_left_type() {
    assert_eq!(
        binary_result(BinaryOp::Shl, TypeTag::Int64, TypeTag::Int32),
        Some(TypeTag::Int64)
    );
    assert_eq!(
        binary_result(BinaryOp::Shr, TypeTag::Byte, TypeTag::Int32),
        Some(TypeTag::Int32)
    );
    assert_eq!(binary_result(BinaryOp::Shl, TypeTag::Int32, TypeTag::Int64), None);
    assert_eq!(binary_result(BinaryOp::Shl, TypeTag::Double, TypeTag::Int32), None);
}

#[test]
fn bitwise_on_bools_and_integers() {
    assert_eq!(
        binary_result(BinaryOp::BitAnd, TypeTag::Bool, TypeTag::Bool),
        Some(TypeTag::Bool)
    );
    assert_eq!(
        binary_result(BinaryOp::BitXor, TypeTag::Int32, TypeTag::Int64),
        Some(TypeTag::Int64)
    );
    assert_eq!(binary_result(BinaryOp::BitOr, TypeTag::Double, TypeTag::Int32), None);
}

#[test]
fn comparisons_yield_bool() {
    assert_eq!(
        binary_result(BinaryOp::Lt, TypeTag::Int32, TypeTag::Double),
        Some(TypeTag::Bool)
    );
    assert_eq!(binary_result(BinaryOp::Lt, TypeTag::String, TypeTag::String), None);
}

#[test]
fn equality_on_references() {
    assert_eq!(
        binary_result(BinaryOp::Eq, TypeTag::String, TypeTag::String),
        Some(TypeTag::Bool)
    );
    assert_eq!(
        binary(BinaryOp::NotEq, Ty::STRING, Ty::Null),
        Some((TypeTag::Bool, Op::Ne))
    );
    assert_eq!(
        binary_result(BinaryOp::Eq, TypeTag::Object, TypeTag::String),
        Some(TypeTag::Bool)
    );
    assert_eq!(binary_result(BinaryOp::Eq, TypeTag::String, TypeTag::Int32), None);
    assert_eq!(binary_result(BinaryOp::Eq, TypeTag::Bool, TypeTag::Int32), None);
}
