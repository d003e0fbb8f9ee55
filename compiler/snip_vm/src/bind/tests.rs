use super::*;
use pretty_assertions::assert_eq;

fn method(params: &[TypeTag]) -> MethodDef {
    MethodDef {
        name: "F".to_string(),
        is_public: true,
        is_static: false,
        params: params.to_vec(),
        param_names: params.iter().enumerate().map(|(i, _)| format!("p{i}")).collect(),
        return_type: TypeTag::Void,
        locals: u16::try_from(params.len()).unwrap(),
        constants: Vec::new(),
        code: Vec::new(),
    }
}

#[test]
fn exact_and_widened_arguments_bind() {
    let m = method(&[TypeTag::Int32, TypeTag::Int64, TypeTag::Object]);
    let bound = bind_arguments(
        &m,
        vec![Value::Int32(1), Value::Int32(2), Value::string("x")],
    );
    assert_eq!(
        bound,
        Ok(vec![Value::Int32(1), Value::Int64(2), Value::string("x")])
    );
}

#[test]
fn narrowing_is_rejected_with_the_position() {
    let m = method(&[TypeTag::Int32, TypeTag::Byte]);
    let err = bind_arguments(&m, vec![Value::Int32(1), Value::Int32(2)]).unwrap_err();
    assert_eq!(
        err,
        BindError::Type {
            position: 1,
            expected: TypeTag::Byte,
            found: "int".to_string(),
        }
    );
    assert_eq!(err.to_string(), "argument 2: cannot convert from 'int' to 'byte'");
}

#[test]
fn arity_mismatch() {
    let m = method(&[TypeTag::Int32]);
    let err = bind_arguments(&m, Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "method 'F(int)' takes 1 arguments but 0 were supplied");
}
