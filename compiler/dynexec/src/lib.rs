//! dynexec - compile and invoke a single method from source text.
//!
//! The engine takes the text of one method, wraps it in a fixed class
//! template, compiles it with a [`Toolchain`], resolves the first public
//! method of the class, converts textual argument values to the declared
//! parameter types and calls it.
//!
//! # Pipeline
//!
//! ```text
//! extract_parameters -> map_type -> UnitSynthesizer -> Toolchain::compile
//!     -> Toolchain::load -> LoadedModule::get_function -> coerce -> invoke
//! ```
//!
//! Each stage gates the next; the first failure ends the call with an
//! [`EngineError`] tagged with the failing [`Stage`].
//!
//! # Usage
//!
//! ```ignore
//! let engine = Engine::new();
//! let params = ParameterSet::new(
//!     vec!["a".into(), "b".into()],
//!     vec!["3".into(), "4".into()],
//!     vec![SemanticType::Int32, SemanticType::Int32],
//! );
//! let body = "public int Add(int a, int b) { return a + b; }";
//! assert_eq!(engine.execute_method(body, &params)?, Value::Int32(7));
//! ```

mod coerce;
pub mod console;
mod engine;
mod error;
mod extract;
pub mod form;
mod params;
mod synth;
mod toolchain;
mod types;
pub mod worker;

pub use coerce::{coerce, CoercionError, CoercionFailure};
pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, InvocationError, ResolutionError, Stage, ValidationError};
pub use extract::{extract_parameters, ExtractedParameter};
pub use params::ParameterSet;
pub use synth::{SynthesizedUnit, SynthesizerConfig, UnitSynthesizer};
pub use toolchain::{
    CompileFailure, EntryPoint, InvokeFailure, LoadFailure, LoadedModule, ModuleImage,
    ResolutionFailure, SnippetToolchain, Toolchain,
};
pub use types::map_type;

pub use snip_ir::{ExceptionKind, SemanticType, TypeTag, Value};
pub use snip_vm::{BindError, Fault, PrintHandler, VmConfig};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=dynexec=debug` or `RUST_LOG=snip_vm=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
