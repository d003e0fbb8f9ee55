//! Method body checking and emission.
//!
//! A single pass over each body both type-checks and emits bytecode. Values
//! on the operand stack always carry their exact static type; conversions
//! are emitted only where a value is stored, passed, returned or cast, and
//! the VM promotes operator operands itself.

mod call;
mod expr;
mod stmt;

use snip_diagnostic::{Diagnostics, ErrorCode};
use snip_ir::{MethodDef, Op, Span, TypeTag};
use snip_parse::ast::{CompilationUnit, Expr, ExprId, MethodDecl};
use tracing::trace;

use crate::builder::MethodBuilder;
use crate::scope::{Local, Redeclaration, Scopes};
use crate::signatures::{ClassSig, MethodSig, ModuleEnv};
use crate::ty::{self, Conversion, ExprInfo, Ty};

/// Pending jumps of the innermost enclosing loop.
#[derive(Debug, Default)]
struct LoopContext {
    breaks: Vec<usize>,
    continues: Vec<usize>,
    /// A reachable `break` exits the loop.
    broke: bool,
}

/// Checks and emits one method body.
pub(crate) struct MethodChecker<'a> {
    unit: &'a CompilationUnit,
    env: &'a ModuleEnv,
    class: usize,
    method: &'a MethodSig,
    builder: MethodBuilder,
    scopes: Scopes,
    loops: Vec<LoopContext>,
    /// Whether the current point can be reached.
    reachable: bool,
    diagnostics: Diagnostics,
}

/// Check the body of method `method` of class `class` and emit its code.
pub(crate) fn check_method(
    unit: &CompilationUnit,
    env: &ModuleEnv,
    class: usize,
    method: usize,
    decl: &MethodDecl,
) -> (MethodDef, Diagnostics) {
    let sig = &env.classes[class].methods[method];
    trace!(class = %env.classes[class].name, method = %sig.name, "checking method");

    let mut checker = MethodChecker {
        unit,
        env,
        class,
        method: sig,
        builder: MethodBuilder::new(),
        scopes: Scopes::new(),
        loops: Vec::new(),
        reachable: true,
        diagnostics: Diagnostics::new(),
    };

    checker.scopes.push();
    for (name, &ty) in sig.param_names.iter().zip(&sig.params) {
        let slot = checker.builder.alloc_local();
        // Duplicate parameter names were reported with the signature.
        let _ = checker.scopes.declare(name, Local { slot, ty });
    }
    checker.check_block(&decl.body);

    if checker.reachable {
        if sig.return_type == TypeTag::Void {
            checker.builder.emit(Op::ReturnVoid);
        } else {
            let described = checker.current_class().describe(sig);
            checker.error(
                ErrorCode::E2010,
                format!("'{described}': not all code paths return a value"),
                decl.name.span,
            );
        }
    }

    let (code, constants, locals) = checker.builder.finish();
    let def = MethodDef {
        name: sig.name.clone(),
        is_public: sig.is_public,
        is_static: sig.is_static,
        params: sig.params.clone(),
        param_names: sig.param_names.clone(),
        return_type: sig.return_type,
        locals,
        constants,
        code,
    };
    (def, checker.diagnostics)
}

impl<'a> MethodChecker<'a> {
    #[inline]
    fn expr(&self, id: ExprId) -> &'a Expr {
        self.unit.arena.get_expr(id)
    }

    fn current_class(&self) -> &'a ClassSig {
        &self.env.classes[self.class]
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.diagnostics.error(code, message, span);
    }

    /// Declare a local in the innermost scope and give it a fresh slot.
    fn declare_local(&mut self, name: &str, ty: TypeTag, span: Span) -> u16 {
        let slot = self.builder.alloc_local();
        match self.scopes.declare(name, Local { slot, ty }) {
            Ok(()) => {}
            Err(Redeclaration::SameScope) => self.error(
                ErrorCode::E2006,
                format!("A local variable named '{name}' is already defined in this scope"),
                span,
            ),
            Err(Redeclaration::EnclosingScope) => self.error(
                ErrorCode::E2006,
                format!(
                    "A local or parameter named '{name}' cannot be declared in this scope because that name is used in an enclosing local scope to define a local or parameter"
                ),
                span,
            ),
        }
        slot
    }

    /// Check `id` and convert the result to `target`.
    fn check_expr_as(&mut self, id: ExprId, target: TypeTag) {
        let info = self.check_expr(id);
        let span = self.expr(id).span;
        self.coerce(info, target, span);
    }

    /// Convert a value already on the stack to `target`, or report why it
    /// cannot be converted implicitly.
    fn coerce(&mut self, info: ExprInfo, target: TypeTag, span: Span) {
        let conversion = ty::implicit(info, target);
        if conversion.is_valid() {
            self.emit_conversion(conversion, target);
        } else {
            self.report_conversion(info, target, span);
        }
    }

    fn report_conversion(&mut self, info: ExprInfo, target: TypeTag, span: Span) {
        let message = if info.ty == Ty::Null {
            format!("Cannot convert null to '{target}' because it is a non-nullable value type")
        } else if ty::explicit(info, target).is_valid() {
            format!(
                "Cannot implicitly convert type '{}' to '{target}'. An explicit conversion exists (are you missing a cast?)",
                info.ty
            )
        } else {
            format!("Cannot implicitly convert type '{}' to '{target}'", info.ty)
        };
        self.error(ErrorCode::E2003, message, span);
    }

    fn emit_conversion(&mut self, conversion: Conversion, target: TypeTag) {
        let op = conversion_op(conversion, target);
        if op != Op::Nop {
            self.builder.emit(op);
        }
    }
}

/// The instruction performing `conversion`; `Nop` when no code is needed.
fn conversion_op(conversion: Conversion, target: TypeTag) -> Op {
    match conversion {
        Conversion::Numeric => Op::Convert(target),
        Conversion::Unbox => Op::Unbox(target),
        Conversion::Identity | Conversion::Reference | Conversion::Invalid => Op::Nop,
    }
}
