//! First pass: classes, method signatures and type resolution.
//!
//! Method bodies may call methods declared later in the unit, so every
//! signature is resolved before any body is checked.

use rustc_hash::FxHashMap;
use snip_diagnostic::{Diagnostics, ErrorCode};
use snip_ir::{Span, TypeTag};
use snip_parse::ast::{CompilationUnit, PredefinedType, TypeRef, TypeRefKind};
use tracing::debug;

use crate::library::{self, StaticOwner};

/// Resolved signature of a user method.
#[derive(Clone, Debug)]
pub struct MethodSig {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    pub params: Vec<TypeTag>,
    pub param_names: Vec<String>,
    pub return_type: TypeTag,
}

/// A user class and its methods in declaration order.
#[derive(Debug)]
pub struct ClassSig {
    pub name: String,
    pub methods: Vec<MethodSig>,
    by_name: FxHashMap<String, usize>,
}

impl ClassSig {
    pub fn method(&self, name: &str) -> Option<(usize, &MethodSig)> {
        let index = *self.by_name.get(name)?;
        Some((index, &self.methods[index]))
    }

    /// `Class.Method(int, string)`, as C#-style diagnostics print it.
    pub fn describe(&self, method: &MethodSig) -> String {
        let params: Vec<String> = method.params.iter().map(|p| p.display_name()).collect();
        format!("{}.{}({})", self.name, method.name, params.join(", "))
    }
}

/// Everything the body checker needs to know about the unit.
#[derive(Debug)]
pub struct ModuleEnv {
    pub classes: Vec<ClassSig>,
    by_name: FxHashMap<String, usize>,
    imports_system: bool,
}

impl ModuleEnv {
    /// Resolve every class and method signature of `unit`.
    ///
    /// A duplicate class or method name is reported; the duplicate is kept
    /// in the list (so indices line up with the syntax tree) but name lookup
    /// finds the first declaration.
    pub fn collect(unit: &CompilationUnit, diagnostics: &mut Diagnostics) -> Self {
        let mut env = ModuleEnv {
            classes: Vec::with_capacity(unit.classes.len()),
            by_name: FxHashMap::default(),
            imports_system: unit.imports("System"),
        };

        for (index, class) in unit.classes.iter().enumerate() {
            if env.by_name.contains_key(&class.name.name) {
                diagnostics.error(
                    ErrorCode::E2013,
                    format!(
                        "The namespace '<global namespace>' already contains a definition for '{}'",
                        class.name.name
                    ),
                    class.name.span,
                );
            } else {
                env.by_name.insert(class.name.name.clone(), index);
            }
            env.classes.push(ClassSig {
                name: class.name.name.clone(),
                methods: Vec::new(),
                by_name: FxHashMap::default(),
            });
        }

        for (index, class) in unit.classes.iter().enumerate() {
            let mut methods = Vec::with_capacity(class.methods.len());
            let mut by_name = FxHashMap::default();
            for (method_index, method) in class.methods.iter().enumerate() {
                let return_type = env
                    .resolve_type(&method.return_type, diagnostics)
                    .unwrap_or(TypeTag::Object);
                let mut params = Vec::with_capacity(method.params.len());
                let mut param_names: Vec<String> = Vec::with_capacity(method.params.len());
                for param in &method.params {
                    let ty = match env.resolve_type(&param.ty, diagnostics) {
                        Some(TypeTag::Void) => {
                            diagnostics.error(
                                ErrorCode::E2016,
                                "Parameters cannot have type 'void'",
                                param.ty.span,
                            );
                            TypeTag::Object
                        }
                        Some(ty) => ty,
                        None => TypeTag::Object,
                    };
                    if param_names.contains(&param.name.name) {
                        diagnostics.error(
                            ErrorCode::E2006,
                            format!(
                                "The parameter name '{}' is a duplicate",
                                param.name.name
                            ),
                            param.name.span,
                        );
                    }
                    params.push(ty);
                    param_names.push(param.name.name.clone());
                }

                if method.name.name == class.name.name {
                    diagnostics.error(
                        ErrorCode::E2013,
                        format!(
                            "'{}': member names cannot be the same as their enclosing type",
                            method.name.name
                        ),
                        method.name.span,
                    );
                }
                if by_name.contains_key(&method.name.name) {
                    diagnostics.error(
                        ErrorCode::E2013,
                        format!(
                            "Type '{}' already defines a member called '{}'",
                            class.name.name, method.name.name
                        ),
                        method.name.span,
                    );
                } else {
                    by_name.insert(method.name.name.clone(), method_index);
                }

                methods.push(MethodSig {
                    name: method.name.name.clone(),
                    is_public: method.is_public(),
                    is_static: method.is_static(),
                    params,
                    param_names,
                    return_type,
                });
            }
            env.classes[index].methods = methods;
            env.classes[index].by_name = by_name;
        }

        debug!(classes = env.classes.len(), "collected signatures");
        env
    }

    pub fn class_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Resolve a simple name that denotes a type or library class.
    ///
    /// User classes shadow `System` names; `System` names need
    /// `using System;`.
    pub fn static_owner(&self, name: &str) -> Option<StaticOwner> {
        if let Some(index) = self.class_index(name) {
            return Some(StaticOwner::Class(index));
        }
        if self.imports_system {
            library::system_name(name)
        } else {
            None
        }
    }

    /// Resolve a type reference, reporting unknown names.
    pub fn resolve_type(&self, ty: &TypeRef, diagnostics: &mut Diagnostics) -> Option<TypeTag> {
        match &ty.kind {
            TypeRefKind::Void => Some(TypeTag::Void),
            TypeRefKind::Predefined(predefined) => Some(predefined_tag(*predefined)),
            TypeRefKind::Named(path) => {
                let names: Vec<&str> = path.iter().map(|ident| ident.name.as_str()).collect();
                let owner = match names.as_slice() {
                    [name] => self.static_owner(name),
                    ["System", name] => library::system_name(name),
                    _ => None,
                };
                match owner {
                    Some(StaticOwner::Type(tag)) => Some(tag),
                    Some(StaticOwner::Class(index)) => {
                        report_not_a_value_type(&self.classes[index].name, ty.span, diagnostics);
                        None
                    }
                    Some(StaticOwner::Math | StaticOwner::Convert | StaticOwner::Console) => {
                        report_not_a_value_type(&names.join("."), ty.span, diagnostics);
                        None
                    }
                    None => {
                        diagnostics.error(
                            ErrorCode::E2002,
                            format!(
                                "The type or namespace name '{ty}' could not be found (are you missing a using directive or an assembly reference?)"
                            ),
                            ty.span,
                        );
                        None
                    }
                }
            }
        }
    }
}

/// Classes have no instances that code can hold, so a class name is not a
/// usable variable type.
fn report_not_a_value_type(name: &str, span: Span, diagnostics: &mut Diagnostics) {
    diagnostics.error(
        ErrorCode::E2002,
        format!("'{name}' is a static type and cannot be used as a variable type"),
        span,
    );
}

/// The type tag of a predefined type keyword.
pub fn predefined_tag(predefined: PredefinedType) -> TypeTag {
    match predefined {
        PredefinedType::Bool => TypeTag::Bool,
        PredefinedType::Byte => TypeTag::Byte,
        PredefinedType::Short => TypeTag::Int16,
        PredefinedType::Int => TypeTag::Int32,
        PredefinedType::Long => TypeTag::Int64,
        PredefinedType::Float => TypeTag::Single,
        PredefinedType::Double => TypeTag::Double,
        PredefinedType::Char => TypeTag::Char,
        PredefinedType::String => TypeTag::String,
        PredefinedType::Object => TypeTag::Object,
    }
}
