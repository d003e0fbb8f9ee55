use super::*;
use pretty_assertions::assert_eq;
use snip_vm::{PrintHandler, VmConfig};

use crate::toolchain::SnippetToolchain;

fn quiet_engine() -> Engine {
    Engine::builder()
        .toolchain(
            SnippetToolchain::new()
                .with_vm_config(VmConfig::default().with_print_handler(PrintHandler::Silent)),
        )
        .build()
}

fn session(input: &str) -> String {
    let mut output = Vec::new();
    run_session(&quiet_engine(), input.as_bytes(), &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn prompts_for_each_parameter() {
    let transcript = session("public int Add(int a, int b) { return a + b; }\n3\n4\n");
    assert_eq!(
        transcript,
        "Enter C# method body:\n\
         Enter parameter value for parameter: int a\n\
         Enter parameter value for parameter: int b\n\
         Result: 7\n"
    );
}

#[test]
fn no_parameters() {
    assert_eq!(
        session("public string F() { return \"hi\"; }\r\n"),
        "Enter C# method body:\nResult: hi\n"
    );
}

#[test]
fn large_doubles_print_in_exponent_form() {
    assert_eq!(
        session("public double F() { return 1e20; }\n"),
        "Enter C# method body:\nResult: 1E+20\n"
    );
}

#[test]
fn void_results_print_nothing_after_the_label() {
    assert_eq!(
        session("public void F() { }\n"),
        "Enter C# method body:\nResult: \n"
    );
}

#[test]
fn errors_are_reported_as_text() {
    let transcript = session("public int F(int a) { return a; }\nabc\n");
    assert!(transcript.ends_with(
        "Error: invalid value for parameter 0 ('a'): 'abc' is not in a valid format for Int32\n"
    ));
}

#[test]
fn bare_names_are_objects() {
    // `object` maps to Object, which passes the text through as a string.
    let transcript = session("public string F(object a) { return (string)a + \"!\"; }\nx\n");
    assert!(transcript.ends_with("Result: x!\n"));
}

#[test]
fn end_of_input_is_a_missing_body() {
    assert_eq!(
        session(""),
        "Enter C# method body:\nError: missing method body\n"
    );
}
