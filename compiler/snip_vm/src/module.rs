//! Loading a module image and resolving methods in it.
//!
//! Loading decodes the image, verifies every method body and builds a
//! name table per module. After a successful load the interpreter can rely
//! on constant indices, local slots, jump targets and call targets all
//! being in range.

use rustc_hash::FxHashMap;
use snip_ir::{image, ClassDef, ImageError, MethodDef, ModuleDef, Op};
use tracing::debug;

/// Failure to load a module image.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("invalid method '{class}.{method}': {detail}")]
    Invalid {
        class: String,
        method: String,
        detail: String,
    },
    #[error("module has too many classes or methods ({0})")]
    TooLarge(usize),
}

/// Failure to find an entry point.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("type '{0}' not found in module")]
    MissingClass(String),
    #[error("type '{0}' declares no public method")]
    NoPublicMethod(String),
}

/// Reference to a method of a loaded module.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodHandle {
    pub(crate) class: u16,
    pub(crate) method: u16,
}

/// A verified, loaded module.
#[derive(Debug)]
pub struct Module {
    def: ModuleDef,
    classes: FxHashMap<String, usize>,
}

impl Module {
    /// Decode and verify a module image.
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        let def = image::decode(bytes)?;
        Self::from_def(def)
    }

    /// Verify an already decoded module.
    pub fn from_def(def: ModuleDef) -> Result<Self, LoadError> {
        if def.classes.len() > usize::from(u16::MAX) {
            return Err(LoadError::TooLarge(def.classes.len()));
        }
        let mut classes = FxHashMap::default();
        for (index, class) in def.classes.iter().enumerate() {
            if class.methods.len() > usize::from(u16::MAX) {
                return Err(LoadError::TooLarge(class.methods.len()));
            }
            for method in &class.methods {
                verify_method(&def, method).map_err(|detail| LoadError::Invalid {
                    class: class.name.clone(),
                    method: method.name.clone(),
                    detail,
                })?;
            }
            classes.entry(class.name.clone()).or_insert(index);
        }
        debug!(module = %def.name, classes = def.classes.len(), "module loaded");
        Ok(Module { def, classes })
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Look up a class by name.
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name).map(|&index| &self.def.classes[index])
    }

    /// The first public method declared on `container`, in declaration
    /// order.
    pub fn first_public_method(&self, container: &str) -> Result<MethodHandle, ResolveError> {
        let class_index = *self
            .classes
            .get(container)
            .ok_or_else(|| ResolveError::MissingClass(container.to_string()))?;
        let class = &self.def.classes[class_index];
        let method_index = class
            .methods
            .iter()
            .position(|m| m.is_public)
            .ok_or_else(|| ResolveError::NoPublicMethod(container.to_string()))?;
        debug!(
            container,
            method = %class.methods[method_index].name,
            "entry point resolved"
        );
        Ok(MethodHandle {
            class: to_u16(class_index),
            method: to_u16(method_index),
        })
    }

    /// The method a handle refers to, if it belongs to this module.
    pub fn method(&self, handle: MethodHandle) -> Option<&MethodDef> {
        self.def
            .classes
            .get(usize::from(handle.class))?
            .methods
            .get(usize::from(handle.method))
    }
}

fn to_u16(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}

/// Check that every operand of `method` refers to something that exists.
fn verify_method(module: &ModuleDef, method: &MethodDef) -> Result<(), String> {
    if method.params.len() > usize::from(method.locals) {
        return Err(format!(
            "{} parameters but only {} local slots",
            method.params.len(),
            method.locals
        ));
    }
    let code_len = method.code.len();
    for (at, op) in method.code.iter().enumerate() {
        let ok = match *op {
            Op::Const(index) => (index as usize) < method.constants.len(),
            Op::LoadLocal(slot) | Op::StoreLocal(slot) => slot < method.locals,
            Op::Jump(target) | Op::JumpIfFalse(target) | Op::JumpIfTrue(target) => {
                (target as usize) <= code_len
            }
            Op::Call { class, method } => module
                .classes
                .get(usize::from(class))
                .is_some_and(|c| usize::from(method) < c.methods.len()),
            _ => true,
        };
        if !ok {
            return Err(format!("operand out of range in {op:?} at {at}"));
        }
    }
    Ok(())
}
