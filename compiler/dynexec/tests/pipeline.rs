//! End-to-end tests of the execution pipeline with the built-in toolchain.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use dynexec::{
    CoercionFailure, Engine, EngineError, ExceptionKind, ParameterSet, PrintHandler, SemanticType,
    SnippetToolchain, Stage, Value, VmConfig,
};
use pretty_assertions::assert_eq;

fn engine() -> Engine {
    Engine::builder()
        .toolchain(
            SnippetToolchain::new()
                .with_vm_config(VmConfig::default().with_print_handler(PrintHandler::Silent)),
        )
        .build()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn int_params(names: &[&str], values: &[&str]) -> ParameterSet {
    ParameterSet::new(
        strings(names),
        strings(values),
        vec![SemanticType::Int32; names.len()],
    )
}

const ADD: &str = "public int Add(int a, int b) { return a + b; }";

// -- Results --

#[test]
fn adds_two_ints() {
    let result = engine().execute_method(ADD, &int_params(&["a", "b"], &["3", "4"]));
    assert_eq!(result, Ok(Value::Int32(7)));
}

#[test]
fn zero_parameter_bodies_are_repeatable() {
    let engine = engine();
    let body = "public int F() { int x = 0; x += 5; return x * 2; }";
    let first = engine.execute_method(body, &ParameterSet::none());
    let second = engine.execute_method(body, &ParameterSet::none());
    assert_eq!(first, Ok(Value::Int32(10)));
    assert_eq!(first, second);
}

#[test]
fn void_methods_return_void() {
    let result = engine().execute_method("public void F() { }", &ParameterSet::none());
    assert_eq!(result, Ok(Value::Void));
}

#[test]
fn mixed_parameter_types() {
    let body = "public string Describe(string name, int age, bool admin) {
        return name + \" is \" + age + (admin ? \" (admin)\" : \"\");
    }";
    let params = ParameterSet::new(
        strings(&["name", "age", "admin"]),
        strings(&["Ada", " 36 ", "True"]),
        vec![SemanticType::String, SemanticType::Int32, SemanticType::Boolean],
    );
    assert_eq!(
        engine().execute_method(body, &params),
        Ok(Value::string("Ada is 36 (admin)"))
    );
}

#[test]
fn int_values_widen_to_long_parameters() {
    let body = "public long Square(long n) { return n * n; }";
    let result = engine().execute_method(body, &int_params(&["n"], &["100000"]));
    assert_eq!(result, Ok(Value::Int64(10_000_000_000)));
}

#[test]
fn helper_methods_and_recursion() {
    let body = "public long Run(int n) { return Fib(n); }
    static long Fib(int n) { return n < 2 ? n : Fib(n - 1) + Fib(n - 2); }";
    let result = engine().execute_method(body, &int_params(&["n"], &["20"]));
    assert_eq!(result, Ok(Value::Int64(6765)));
}

#[test]
fn template_imports_system() {
    let result = engine().execute_method(
        "public double F() { return Math.Sqrt(16); }",
        &ParameterSet::none(),
    );
    assert_eq!(result, Ok(Value::Double(4.0)));
}

// -- Validation --

#[test]
fn mismatched_lengths_fail_validation() {
    let params = ParameterSet::new(
        strings(&["a", "b"]),
        strings(&["3"]),
        vec![SemanticType::Int32, SemanticType::Int32],
    );
    let error = engine().execute_method(ADD, &params).unwrap_err();
    assert_eq!(error.stage(), Stage::Validation);
    assert_eq!(error.to_string(), "mismatch between parameter names-values-types");
}

// -- Compilation --

#[test]
fn unmatched_brace_is_a_compile_error() {
    let error = engine()
        .execute_method("public int F() { return 1;", &ParameterSet::none())
        .unwrap_err();
    assert_eq!(error.stage(), Stage::Compile);
    let EngineError::Compile(failure) = &error else {
        panic!("expected a compile error, got {error:?}");
    };
    assert!(!failure.diagnostics.is_empty());
    assert!(error.to_string().lines().count() >= 2);
}

#[test]
fn semantic_errors_are_all_reported() {
    let error = engine()
        .execute_method(
            "public int F() { int x = \"s\"; return y; }",
            &ParameterSet::none(),
        )
        .unwrap_err();
    let EngineError::Compile(failure) = error else {
        panic!("expected a compile error");
    };
    assert_eq!(failure.diagnostics.len(), 2);
    assert!(failure.diagnostics[0].contains("E2003"));
    assert!(failure.diagnostics[1].contains("E2001"));
}

// -- Resolution --

#[test]
fn body_without_public_method() {
    let error = engine()
        .execute_method("int F() { return 1; }", &ParameterSet::none())
        .unwrap_err();
    assert_eq!(error.stage(), Stage::Resolution);
}

#[test]
fn missing_arguments() {
    let error = engine().execute_method(ADD, &ParameterSet::none()).unwrap_err();
    assert_eq!(error.stage(), Stage::Resolution);
    assert_eq!(
        error.to_string(),
        "method 'Add' takes 2 parameters but 0 were supplied"
    );
}

// -- Coercion --

#[test]
fn unparsable_int_is_a_coercion_error() {
    let body = "public int F(int a) { return a; }";
    let error = engine()
        .execute_method(body, &int_params(&["a"], &["abc"]))
        .unwrap_err();
    let EngineError::Coercion(coercion) = error else {
        panic!("expected a coercion error");
    };
    assert_eq!(coercion.position, 0);
    assert!(matches!(coercion.failure, CoercionFailure::Format { .. }));
}

#[test]
fn int32_bounds() {
    let body = "public int F(int a) { return a; }";
    assert_eq!(
        engine().execute_method(body, &int_params(&["a"], &["2147483647"])),
        Ok(Value::Int32(i32::MAX))
    );
    let error = engine()
        .execute_method(body, &int_params(&["a"], &["2147483648"]))
        .unwrap_err();
    let EngineError::Coercion(coercion) = error else {
        panic!("expected a coercion error");
    };
    assert!(matches!(coercion.failure, CoercionFailure::Overflow { .. }));
}

#[test]
fn declared_type_must_accept_the_value() {
    // A string value cannot bind to an int parameter.
    let params = ParameterSet::new(
        strings(&["a"]),
        strings(&["5"]),
        vec![SemanticType::String],
    );
    let error = engine()
        .execute_method("public int F(int a) { return a; }", &params)
        .unwrap_err();
    let EngineError::Coercion(coercion) = error else {
        panic!("expected a coercion error");
    };
    assert_eq!(
        coercion.failure,
        CoercionFailure::TypeMismatch {
            expected: "int".to_string(),
            found: "string".to_string(),
        }
    );
}

// -- Invocation --

#[test]
fn thrown_exception_is_an_invocation_error() {
    let params = ParameterSet::new(
        strings(&["s"]),
        strings(&["x"]),
        vec![SemanticType::String],
    );
    let error = engine()
        .execute_method("public string F(string s) { throw new Exception(\"boom\"); }", &params)
        .unwrap_err();
    let EngineError::Invocation(invocation) = &error else {
        panic!("expected an invocation error, got {error:?}");
    };
    assert_eq!(invocation.exception, ExceptionKind::Exception);
    assert!(error.to_string().contains("boom"));
}

#[test]
fn runtime_faults_are_invocation_errors() {
    let body = "public int F(int a, int b) { return a / b; }";
    let error = engine()
        .execute_method(body, &int_params(&["a", "b"], &["1", "0"]))
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "System.DivideByZeroException: Attempted to divide by zero."
    );
}

#[test]
fn console_output_is_captured() {
    let print = PrintHandler::buffer();
    let engine = Engine::builder()
        .toolchain(
            SnippetToolchain::new()
                .with_vm_config(VmConfig::default().with_print_handler(print.clone())),
        )
        .build();
    let body = "public void Count(int n) { for (int i = 1; i <= n; i++) Console.Write(i); }";
    assert_eq!(
        engine.execute_method(body, &int_params(&["n"], &["5"])),
        Ok(Value::Void)
    );
    assert_eq!(print.output(), "12345");
}
