//! Snip VM - loader and interpreter for compiled snippet modules.
//!
//! # Usage
//!
//! ```ignore
//! let module = Module::load(&image)?;
//! let entry = module.first_public_method("DynamicMethodClass")?;
//! let method = module.method(entry).unwrap();
//! let args = bind_arguments(method, vec![Value::Int32(3), Value::Int32(4)])?;
//! let result = Vm::new(&module, &VmConfig::default()).invoke(entry, args)?;
//! ```
//!
//! Loading verifies the image, so a module that loads never indexes out of
//! range at run time. Everything the running code can get wrong (division by
//! zero, bad casts, null receivers, runaway recursion) surfaces as a
//! [`Fault`] carrying an exception class and message.

mod bind;
mod config;
mod convert;
mod fault;
mod interpreter;
mod library;
mod module;
mod operators;
mod print_handler;

pub use bind::{bind_arguments, BindError};
pub use config::{VmConfig, DEFAULT_MAX_DEPTH};
pub use convert::widen;
pub use fault::{Fault, VmResult};
pub use interpreter::Vm;
pub use module::{LoadError, MethodHandle, Module, ResolveError};
pub use print_handler::PrintHandler;

use snip_ir::Value;

/// Run one method to completion with a fresh VM.
pub fn invoke(
    module: &Module,
    method: MethodHandle,
    args: Vec<Value>,
    config: &VmConfig,
) -> VmResult<Value> {
    Vm::new(module, config).invoke(method, args)
}
