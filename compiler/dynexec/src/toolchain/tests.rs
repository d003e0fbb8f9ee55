use super::*;
use pretty_assertions::assert_eq;
use snip_ir::ExceptionKind;

use crate::synth::{SynthesizerConfig, UnitSynthesizer};

fn unit(body: &str) -> SynthesizedUnit {
    UnitSynthesizer::default().synthesize(body)
}

fn load(body: &str) -> Box<dyn LoadedModule> {
    let toolchain = SnippetToolchain::new();
    let image = toolchain.compile(&unit(body)).unwrap();
    toolchain.load(image).unwrap()
}

// === Compile ===

#[test]
fn compiles_to_an_image() {
    let image = SnippetToolchain::new()
        .compile(&unit("public int F() { return 1; }"))
        .unwrap();
    assert!(!image.is_empty());
    assert_eq!(&image.as_bytes()[..4], b"SNIP");
}

#[test]
fn diagnostics_use_body_coordinates() {
    let failure = SnippetToolchain::new()
        .compile(&unit("public int F() { return y; }"))
        .unwrap_err();
    assert_eq!(
        failure.diagnostics,
        vec!["(1,25): error E2001: The name 'y' does not exist in the current context".to_string()]
    );
}

#[test]
fn every_diagnostic_is_kept() {
    let failure = SnippetToolchain::new()
        .compile(&unit("public int F() { return y; }\npublic int G() { return z; }"))
        .unwrap_err();
    assert_eq!(failure.diagnostics.len(), 2);
    assert!(failure.diagnostics[1].starts_with("(2,25): error E2001"));
    assert_eq!(failure.to_string().lines().count(), 2);
}

// === Load and resolve ===

#[test]
fn garbage_does_not_load() {
    let result = SnippetToolchain::new().load(ModuleImage::new(b"nope".to_vec()));
    assert!(result.is_err());
}

#[test]
fn resolves_the_first_public_method() {
    let module = load("int Hidden() { return 0; }\npublic int First(int a) { return a; }\npublic int Second() { return 2; }");
    let entry = module.get_function("DynamicMethodClass").unwrap();
    assert_eq!(entry.name(), "First");
    assert_eq!(entry.param_types(), &[TypeTag::Int32]);
    assert_eq!(entry.arity(), 1);
}

#[test]
fn missing_container() {
    let module = load("public int F() { return 1; }");
    assert_eq!(
        module.get_function("Elsewhere").err(),
        Some(ResolutionFailure::MissingContainer("Elsewhere".to_string()))
    );
}

#[test]
fn container_without_public_methods() {
    let module = load("int F() { return 1; }");
    assert_eq!(
        module.get_function("DynamicMethodClass").err(),
        Some(ResolutionFailure::NoPublicMethod(
            "DynamicMethodClass".to_string()
        ))
    );
}

#[test]
fn custom_container_name() {
    let toolchain = SnippetToolchain::new();
    let synthesizer = UnitSynthesizer::new(SynthesizerConfig::default().with_container("Box"));
    let image = toolchain
        .compile(&synthesizer.synthesize("public int F() { return 5; }"))
        .unwrap();
    let module = toolchain.load(image).unwrap();
    assert!(module.get_function("Box").is_ok());
    assert!(module.get_function("DynamicMethodClass").is_err());
}

// === Invoke ===

#[test]
fn invokes_with_widening() {
    let module = load("public long F(long a) { return a * 2; }");
    let entry = module.get_function("DynamicMethodClass").unwrap();
    assert_eq!(entry.invoke(vec![Value::Int32(21)]), Ok(Value::Int64(42)));
}

#[test]
fn mismatched_argument_types_do_not_bind() {
    let module = load("public int F(int a) { return a; }");
    let entry = module.get_function("DynamicMethodClass").unwrap();
    let failure = entry.invoke(vec![Value::string("x")]).unwrap_err();
    assert!(matches!(
        failure,
        InvokeFailure::Bind(BindError::Type { position: 0, .. })
    ));
}

#[test]
fn faults_are_reported() {
    let module = load("public int F() { throw new Exception(\"boom\"); }");
    let entry = module.get_function("DynamicMethodClass").unwrap();
    match entry.invoke(Vec::new()) {
        Err(InvokeFailure::Fault(fault)) => {
            assert_eq!(fault.exception, ExceptionKind::Exception);
            assert_eq!(fault.message, "boom");
        }
        other => panic!("expected a fault, got {other:?}"),
    }
}

#[test]
fn console_output_uses_the_configured_handler() {
    let print = snip_vm::PrintHandler::buffer();
    let toolchain = SnippetToolchain::new()
        .with_vm_config(VmConfig::default().with_print_handler(print.clone()));
    let image = toolchain
        .compile(&unit("public void F() { Console.WriteLine(\"hi\"); }"))
        .unwrap();
    let module = toolchain.load(image).unwrap();
    let entry = module.get_function("DynamicMethodClass").unwrap();
    assert_eq!(entry.invoke(Vec::new()), Ok(Value::Void));
    assert_eq!(print.output(), "hi\n");
}
