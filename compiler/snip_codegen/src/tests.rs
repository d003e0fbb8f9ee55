use super::*;
use pretty_assertions::assert_eq;
use snip_diagnostic::ErrorCode;
use snip_ir::{Constant, Intrinsic, MethodDef, Op, TypeTag};

fn unit(members: &str) -> String {
    format!("using System;\npublic class C {{\n{members}\n}}\n")
}

fn compile_ok(members: &str) -> ModuleDef {
    match compile(&unit(members), "Test") {
        Ok(module) => module,
        Err(diagnostics) => {
            let messages: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
            panic!("unexpected diagnostics: {messages:#?}")
        }
    }
}

fn method(members: &str) -> MethodDef {
    compile_ok(members).classes.remove(0).methods.remove(0)
}

fn errors(source: &str) -> Vec<(ErrorCode, String)> {
    match compile(source, "Test") {
        Ok(_) => Vec::new(),
        Err(diagnostics) => diagnostics
            .iter()
            .map(|d| (d.code, d.message.clone()))
            .collect(),
    }
}

fn member_errors(members: &str) -> Vec<(ErrorCode, String)> {
    errors(&unit(members))
}

fn codes(members: &str) -> Vec<ErrorCode> {
    member_errors(members).into_iter().map(|(code, _)| code).collect()
}

// === Module shape ===

#[test]
fn module_keeps_classes_and_methods_in_order() {
    let module = compile_ok(
        "public int A() { return 1; }
         private static void B() { }",
    );
    assert_eq!(module.name, "Test");
    let class = &module.classes[0];
    assert_eq!(class.name, "C");
    let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert!(class.methods[0].is_public);
    assert!(!class.methods[0].is_static);
    assert!(!class.methods[1].is_public);
    assert!(class.methods[1].is_static);
}

#[test]
fn parameters_occupy_the_first_slots() {
    let add = method("public int Add(int a, int b) { return a + b; }");
    assert_eq!(add.params, vec![TypeTag::Int32, TypeTag::Int32]);
    assert_eq!(add.param_names, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(add.return_type, TypeTag::Int32);
    assert_eq!(add.locals, 2);
    assert_eq!(
        add.code,
        vec![Op::LoadLocal(0), Op::LoadLocal(1), Op::Add, Op::Return]
    );
}

#[test]
fn void_methods_end_with_return_void() {
    let m = method("public void Nothing() { }");
    assert_eq!(m.code, vec![Op::ReturnVoid]);
}

#[test]
fn uninitialized_locals_hold_the_default() {
    let m = method("public int F() { int x; return x; }");
    assert_eq!(
        m.code,
        vec![Op::Const(0), Op::StoreLocal(0), Op::LoadLocal(0), Op::Return]
    );
    assert_eq!(m.constants, vec![Constant::Int32(0)]);
}

#[test]
fn returns_widen_to_the_declared_type() {
    let m = method("public long F(int a) { return a; }");
    assert_eq!(
        m.code,
        vec![Op::LoadLocal(0), Op::Convert(TypeTag::Int64), Op::Return]
    );
}

#[test]
fn int_constants_narrow_into_byte() {
    let m = method("public byte F() { byte b = 200; return b; }");
    assert_eq!(
        m.code,
        vec![
            Op::Const(0),
            Op::Convert(TypeTag::Byte),
            Op::StoreLocal(0),
            Op::LoadLocal(0),
            Op::Return,
        ]
    );
}

#[test]
fn conditional_converts_the_narrower_branch() {
    let m = method("public double F(bool c) { return c ? 1 : 2.5; }");
    assert_eq!(
        m.code,
        vec![
            Op::LoadLocal(0),
            Op::JumpIfFalse(5),
            Op::Const(0),
            Op::Convert(TypeTag::Double),
            Op::Jump(7),
            Op::Const(1),
            Op::Nop,
            Op::Return,
        ]
    );
}

#[test]
fn logical_and_short_circuits() {
    let m = method("public bool F(bool a, bool b) { return a && b; }");
    assert_eq!(
        m.code,
        vec![
            Op::LoadLocal(0),
            Op::Dup,
            Op::JumpIfFalse(5),
            Op::Pop,
            Op::LoadLocal(1),
            Op::Return,
        ]
    );
}

#[test]
fn while_loop_jumps_back_to_the_condition() {
    let m = method("public void F(int n) { while (n > 0) n--; }");
    assert_eq!(
        m.code,
        vec![
            Op::LoadLocal(0),
            Op::Const(0),
            Op::Gt,
            Op::JumpIfFalse(11),
            Op::LoadLocal(0),
            Op::Dup,
            Op::Const(1),
            Op::Sub,
            Op::StoreLocal(0),
            Op::Pop,
            Op::Jump(0),
            Op::ReturnVoid,
        ]
    );
}

#[test]
fn string_plus_concatenates() {
    let m = method("public string F(int n) { return \"n=\" + n; }");
    assert_eq!(m.code, vec![Op::Const(0), Op::LoadLocal(0), Op::Concat, Op::Return]);
}

#[test]
fn math_max_picks_the_long_overload() {
    let m = method("public long F(int a) { return Math.Max(a, 2L); }");
    assert_eq!(
        m.code,
        vec![
            Op::LoadLocal(0),
            Op::Convert(TypeTag::Int64),
            Op::Const(0),
            Op::Nop,
            Op::Intrinsic(Intrinsic::MathMax),
            Op::Return,
        ]
    );
}

#[test]
fn int_max_value_is_a_constant() {
    let m = method("public int F() { return int.MaxValue; }");
    assert_eq!(m.constants, vec![Constant::Int32(i32::MAX)]);
}

#[test]
fn negative_int_min_is_an_int_literal() {
    let m = method("public int F() { return -2147483648; }");
    assert_eq!(m.constants, vec![Constant::Int32(i32::MIN)]);
}

#[test]
fn user_calls_reference_class_and_method_indices() {
    let module = compile_ok(
        "public static int Twice(int x) { return Helper(x) * 2; }
         static int Helper(int x) { return x + 1; }",
    );
    let twice = &module.classes[0].methods[0];
    assert_eq!(twice.code[1], Op::Call { class: 0, method: 1 });
}

#[test]
fn qualified_calls_reach_other_classes() {
    let source = "public class A { public static int F() { return B.G(); } }
                  public class B { public static int G() { return 7; } }";
    let module = compile(source, "Test").unwrap();
    assert_eq!(module.classes[0].methods[0].code[0], Op::Call { class: 1, method: 0 });
}

#[test]
fn system_qualifier_works_without_using() {
    let source = "public class A { public void F() { System.Console.WriteLine(1); } }";
    assert_eq!(errors(source), Vec::new());
}

#[test]
fn compound_assignment_narrows_back() {
    compile_ok("public byte F() { byte b = 1; b += 2; return b; }");
}

#[test]
fn infinite_loops_need_no_return() {
    compile_ok("public int F() { while (true) { } }");
    compile_ok("public int F() { for (;;) { } }");
}

#[test]
fn exceptions_can_be_thrown_and_inspected() {
    compile_ok(
        "public string F(string s) {
             Exception e = new FormatException(s);
             if (s.Length == 0) throw new ArgumentException();
             return e.Message;
         }",
    );
}

#[test]
fn string_members_and_parse() {
    compile_ok(
        "public int F(string s) {
             string t = s.Trim().ToUpper();
             if (t.StartsWith(\"X\") && t.IndexOf('Y') > 0) return int.Parse(t.Substring(1, 2));
             return t[0] + Convert.ToInt32(\"4\");
         }",
    );
}

// === Diagnostics ===

#[test]
fn syntax_errors_skip_semantic_checks() {
    let found = errors("public class C { public int F( { return x; } }");
    assert!(!found.is_empty());
    assert!(found.iter().all(|(code, _)| !code.is_semantic_error()));
}

#[test]
fn missing_return_is_reported() {
    assert_eq!(
        member_errors("public int F(bool b) { if (b) return 1; }"),
        vec![(
            ErrorCode::E2010,
            "'C.F(bool)': not all code paths return a value".to_string()
        )]
    );
}

#[test]
fn break_makes_a_true_loop_complete() {
    assert_eq!(
        codes("public int F() { while (true) { break; } }"),
        vec![ErrorCode::E2010]
    );
}

#[test]
fn implicit_conversion_errors() {
    assert_eq!(
        member_errors("public void F() { int x = \"a\"; }"),
        vec![(
            ErrorCode::E2003,
            "Cannot implicitly convert type 'string' to 'int'".to_string()
        )]
    );
    assert_eq!(
        member_errors("public void F() { int x = 1.5; }"),
        vec![(
            ErrorCode::E2003,
            "Cannot implicitly convert type 'double' to 'int'. An explicit conversion exists (are you missing a cast?)"
                .to_string()
        )]
    );
    assert_eq!(
        codes("public void F() { byte b = 300; }"),
        vec![ErrorCode::E2003]
    );
}

#[test]
fn conditions_must_be_bool() {
    assert_eq!(
        member_errors("public void F(int n) { if (n) { } }"),
        vec![(
            ErrorCode::E2003,
            "Cannot implicitly convert type 'int' to 'bool'".to_string()
        )]
    );
}

#[test]
fn unknown_names_and_types() {
    assert_eq!(
        member_errors("public int F() { return y; }"),
        vec![(
            ErrorCode::E2001,
            "The name 'y' does not exist in the current context".to_string()
        )]
    );
    assert_eq!(
        member_errors("public void F() { Foo x; }"),
        vec![(
            ErrorCode::E2002,
            "The type or namespace name 'Foo' could not be found (are you missing a using directive or an assembly reference?)"
                .to_string()
        )]
    );
}

#[test]
fn system_names_need_using() {
    let source = "public class A { public void F() { Console.WriteLine(1); } }";
    assert_eq!(
        errors(source),
        vec![(
            ErrorCode::E2001,
            "The name 'Console' does not exist in the current context".to_string()
        )]
    );
}

#[test]
fn operator_errors() {
    assert_eq!(
        member_errors("public void F() { bool b = true + 1; }"),
        vec![(
            ErrorCode::E2005,
            "Operator '+' cannot be applied to operands of type 'bool' and 'int'".to_string()
        )]
    );
    assert_eq!(codes("public void F() { bool b = !5; }"), vec![ErrorCode::E2005]);
}

#[test]
fn redeclared_locals() {
    assert_eq!(
        codes("public void F() { int x = 1; int x = 2; }"),
        vec![ErrorCode::E2006]
    );
    assert_eq!(
        codes("public void F(int x) { { int x = 2; } }"),
        vec![ErrorCode::E2006]
    );
    compile_ok("public void F() { { int x = 1; } { int x = 2; } }");
}

#[test]
fn missing_members() {
    assert_eq!(
        member_errors("public void F() { Math.Foo(1); }"),
        vec![(
            ErrorCode::E2007,
            "'Math' does not contain a definition for 'Foo'".to_string()
        )]
    );
    assert_eq!(
        codes("public int F(string s) { return s.Size; }"),
        vec![ErrorCode::E2007]
    );
}

#[test]
fn call_arity_and_argument_errors() {
    assert_eq!(
        member_errors(
            "public int F() { return G(1, 2); }
             public int G(int a) { return a; }"
        ),
        vec![(
            ErrorCode::E2008,
            "No overload for method 'G' takes 2 arguments".to_string()
        )]
    );
    assert_eq!(
        member_errors(
            "public int F() { return G(\"x\"); }
             public int G(int a) { return a; }"
        ),
        vec![(
            ErrorCode::E2009,
            "Argument 1: cannot convert from 'string' to 'int'".to_string()
        )]
    );
}

#[test]
fn break_outside_loop() {
    assert_eq!(
        member_errors("public void F() { break; }"),
        vec![(
            ErrorCode::E2011,
            "No enclosing loop out of which to break or continue".to_string()
        )]
    );
}

#[test]
fn static_methods_cannot_call_instance_methods() {
    assert_eq!(
        member_errors(
            "public static int F() { return G(); }
             public int G() { return 1; }"
        ),
        vec![(
            ErrorCode::E2012,
            "An object reference is required for the non-static field, method, or property 'C.G()'"
                .to_string()
        )]
    );
    compile_ok(
        "public int F() { return G(); }
         public static int G() { return 1; }",
    );
}

#[test]
fn duplicate_methods() {
    assert_eq!(
        member_errors(
            "public void F() { }
             public void F() { }"
        ),
        vec![(
            ErrorCode::E2013,
            "Type 'C' already defines a member called 'F'".to_string()
        )]
    );
}

#[test]
fn assignment_targets_must_be_locals() {
    assert_eq!(
        codes("public void F(string s) { s.Length = 3; }"),
        vec![ErrorCode::E2014]
    );
}

#[test]
fn return_mismatches() {
    assert_eq!(
        member_errors("public void F() { return 1; }"),
        vec![(
            ErrorCode::E2015,
            "Since 'C.F()' returns void, a return keyword must not be followed by an object expression"
                .to_string()
        )]
    );
    assert_eq!(
        member_errors("public int F() { return; }"),
        vec![(
            ErrorCode::E2015,
            "An object of a type convertible to 'int' is required".to_string()
        )]
    );
}

#[test]
fn var_declarations() {
    compile_ok("public int F() { var x = 1; return x; }");
    assert_eq!(codes("public void F() { var x; }"), vec![ErrorCode::E2016]);
    assert_eq!(codes("public void F() { var x = null; }"), vec![ErrorCode::E2016]);
    assert_eq!(
        codes("public void F() { var a = 1, b = 2; }"),
        vec![ErrorCode::E2016]
    );
}

#[test]
fn only_exceptions_are_thrown() {
    assert_eq!(
        member_errors("public void F() { throw 1; }"),
        vec![(
            ErrorCode::E2017,
            "The type caught or thrown must be derived from System.Exception".to_string()
        )]
    );
}

#[test]
fn pure_expressions_are_not_statements() {
    assert_eq!(codes("public void F(int a) { a + 1; }"), vec![ErrorCode::E2018]);
}

#[test]
fn casts() {
    compile_ok("public int F(double d) { return (int)d; }");
    compile_ok("public int F(object o) { return (int)o; }");
    assert_eq!(
        member_errors("public int F(string s) { return (int)s; }"),
        vec![(
            ErrorCode::E2004,
            "Cannot convert type 'string' to 'int'".to_string()
        )]
    );
    assert_eq!(
        codes("public byte F() { return (byte)300; }"),
        vec![ErrorCode::E2004]
    );
}

#[test]
fn conditional_without_common_type() {
    assert_eq!(
        codes("public object F(bool c) { return c ? 1 : \"a\"; }"),
        vec![ErrorCode::E2003]
    );
}
