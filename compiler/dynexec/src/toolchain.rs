//! The compile/load/resolve seam.
//!
//! The engine only sees these traits. [`SnippetToolchain`] implements them
//! with the snippet compiler and VM; tests substitute fakes that return
//! canned images, diagnostics or entry points.

use snip_diagnostic::LineIndex;
use snip_ir::{image, MethodDef, TypeTag, Value};
use snip_vm::{
    bind_arguments, invoke, BindError, Fault, MethodHandle, Module, ResolveError, VmConfig,
};
use tracing::debug;

use crate::synth::SynthesizedUnit;

/// An in-memory compiled module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleImage {
    bytes: Vec<u8>,
}

impl ModuleImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        ModuleImage { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Compilation failed. Holds every diagnostic, rendered, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", .diagnostics.join("\n"))]
pub struct CompileFailure {
    pub diagnostics: Vec<String>,
}

/// The image could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoadFailure {
    pub message: String,
}

/// No entry point could be selected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionFailure {
    #[error("type '{0}' not found in module")]
    MissingContainer(String),
    #[error("type '{0}' declares no public method")]
    NoPublicMethod(String),
}

impl From<ResolveError> for ResolutionFailure {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::MissingClass(name) => ResolutionFailure::MissingContainer(name),
            ResolveError::NoPublicMethod(name) => ResolutionFailure::NoPublicMethod(name),
        }
    }
}

/// Why a call through an [`EntryPoint`] did not return a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvokeFailure {
    /// The arguments do not fit the parameters.
    #[error(transparent)]
    Bind(#[from] BindError),
    /// The method raised an exception.
    #[error(transparent)]
    Fault(#[from] Fault),
}

/// Turns synthesized units into loadable modules.
pub trait Toolchain: Send + Sync {
    fn compile(&self, unit: &SynthesizedUnit) -> Result<ModuleImage, CompileFailure>;

    /// Load an image. The image is consumed and released before returning.
    fn load(&self, image: ModuleImage) -> Result<Box<dyn LoadedModule>, LoadFailure>;
}

/// A module loaded into the process.
pub trait LoadedModule {
    /// The first public method declared on `container`.
    fn get_function(&self, container: &str) -> Result<Box<dyn EntryPoint + '_>, ResolutionFailure>;
}

/// A callable method.
pub trait EntryPoint {
    fn name(&self) -> &str;

    /// Declared parameter types, in order.
    fn param_types(&self) -> &[TypeTag];

    fn arity(&self) -> usize {
        self.param_types().len()
    }

    /// Call with positional arguments. Arguments whose type does not match
    /// a parameter are widened where an implicit conversion exists.
    fn invoke(&self, args: Vec<Value>) -> Result<Value, InvokeFailure>;
}

/// The built-in toolchain: `snip_codegen` for compilation, `snip_vm` for
/// loading and execution.
#[derive(Clone, Debug, Default)]
pub struct SnippetToolchain {
    vm: VmConfig,
}

impl SnippetToolchain {
    pub fn new() -> Self {
        SnippetToolchain::default()
    }

    /// VM settings used by every module this toolchain loads.
    #[must_use]
    pub fn with_vm_config(mut self, vm: VmConfig) -> Self {
        self.vm = vm;
        self
    }

    pub fn vm_config(&self) -> &VmConfig {
        &self.vm
    }
}

impl Toolchain for SnippetToolchain {
    fn compile(&self, unit: &SynthesizedUnit) -> Result<ModuleImage, CompileFailure> {
        let def = snip_codegen::compile(unit.text(), unit.module_name()).map_err(|diagnostics| {
            // Positions are reported relative to the body, not the template.
            let index = LineIndex::new(unit.text());
            let rendered: Vec<String> = diagnostics
                .iter()
                .map(|d| d.render_at(index.position_from(unit.body_offset(), d.span.start)))
                .collect();
            debug!(count = rendered.len(), "compilation produced diagnostics");
            CompileFailure {
                diagnostics: rendered,
            }
        })?;
        let bytes = image::encode(&def).map_err(|error| CompileFailure {
            diagnostics: vec![error.to_string()],
        })?;
        debug!(bytes = bytes.len(), module = %def.name, "module image emitted");
        Ok(ModuleImage::new(bytes))
    }

    fn load(&self, image: ModuleImage) -> Result<Box<dyn LoadedModule>, LoadFailure> {
        let module = Module::load(image.as_bytes()).map_err(|error| LoadFailure {
            message: error.to_string(),
        })?;
        Ok(Box::new(SnippetModule {
            module,
            vm: self.vm.clone(),
        }))
    }
}

struct SnippetModule {
    module: Module,
    vm: VmConfig,
}

impl LoadedModule for SnippetModule {
    fn get_function(&self, container: &str) -> Result<Box<dyn EntryPoint + '_>, ResolutionFailure> {
        let handle = self.module.first_public_method(container)?;
        let method = self
            .module
            .method(handle)
            .ok_or_else(|| ResolutionFailure::NoPublicMethod(container.to_string()))?;
        Ok(Box::new(SnippetEntry {
            module: &self.module,
            vm: &self.vm,
            handle,
            method,
        }))
    }
}

struct SnippetEntry<'m> {
    module: &'m Module,
    vm: &'m VmConfig,
    handle: MethodHandle,
    method: &'m MethodDef,
}

impl EntryPoint for SnippetEntry<'_> {
    fn name(&self) -> &str {
        &self.method.name
    }

    fn param_types(&self) -> &[TypeTag] {
        &self.method.params
    }

    fn invoke(&self, args: Vec<Value>) -> Result<Value, InvokeFailure> {
        let args = bind_arguments(self.method, args)?;
        Ok(invoke(self.module, self.handle, args, self.vm)?)
    }
}

#[cfg(test)]
mod tests;
