//! Type checking and bytecode emission for the snippet language.
//!
//! [`compile`] runs the whole front end over one source text:
//!
//! 1. lexing and parsing (`snip_parse`), stopping at the first syntax error
//!    report;
//! 2. signature collection, so bodies can call methods declared later;
//! 3. one check-and-emit pass per method body.
//!
//! The result is a [`ModuleDef`] ready for [`snip_ir::image::encode`], or
//! every diagnostic found, in source order per phase.

mod builder;
mod check;
mod library;
mod scope;
mod signatures;
mod ty;

use snip_diagnostic::Diagnostics;
use snip_ir::{ClassDef, ModuleDef};
use snip_parse::ast::CompilationUnit;
use tracing::debug;

use crate::signatures::ModuleEnv;

/// Compile a source text into a module named `module_name`.
pub fn compile(source: &str, module_name: &str) -> Result<ModuleDef, Diagnostics> {
    let parsed = snip_parse::parse_source(source);
    if parsed.diagnostics.has_errors() {
        debug!(
            errors = parsed.diagnostics.error_count(),
            "syntax errors, skipping semantic checks"
        );
        return Err(parsed.diagnostics);
    }
    check_unit(&parsed.unit, module_name)
}

/// Check a parsed unit and emit its module.
#[tracing::instrument(level = "debug", skip_all, fields(module = module_name))]
pub fn check_unit(unit: &CompilationUnit, module_name: &str) -> Result<ModuleDef, Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let env = ModuleEnv::collect(unit, &mut diagnostics);

    let mut module = ModuleDef::new(module_name);
    for (class_index, class) in unit.classes.iter().enumerate() {
        let mut methods = Vec::with_capacity(class.methods.len());
        for (method_index, decl) in class.methods.iter().enumerate() {
            let (method, method_diagnostics) =
                check::check_method(unit, &env, class_index, method_index, decl);
            diagnostics.extend(method_diagnostics);
            methods.push(method);
        }
        module.classes.push(ClassDef {
            name: class.name.name.clone(),
            methods,
        });
    }

    if diagnostics.has_errors() {
        debug!(errors = diagnostics.error_count(), "semantic errors");
        return Err(diagnostics);
    }
    debug!(classes = module.classes.len(), "module emitted");
    Ok(module)
}

#[cfg(test)]
mod tests;
