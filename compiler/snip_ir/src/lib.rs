//! Snip IR - shared types for the snippet toolchain.
//!
//! This crate holds the data that crosses crate boundaries:
//! - Spans for source locations
//! - Semantic types (the engine's parameter vocabulary) and type tags (the
//!   compiler's value types)
//! - Runtime values, including exception objects
//! - Bytecode definitions and the binary module image format
//! - Text parsing shared by the runtime library and argument coercion
//!
//! # Design
//!
//! The compiler (`snip_codegen`) produces a [`ModuleDef`], encodes it with
//! [`image::encode`], and the VM (`snip_vm`) decodes it again with
//! [`image::decode`]. Nothing else is shared between the two sides, so the
//! byte buffer is the only contract between compilation and loading.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod bytecode;
pub mod image;
pub mod parse;
mod span;
mod types;
mod value;

pub use bytecode::{ClassDef, Constant, Intrinsic, MethodDef, ModuleDef, Op};
pub use image::ImageError;
pub use parse::{parse_value, ParseFailure};
pub use span::Span;
pub use types::{ExceptionKind, SemanticType, TypeTag};
pub use value::{ExceptionValue, Value};
