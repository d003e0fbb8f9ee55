//! The execution pipeline.

use snip_ir::Value;
use snip_vm::BindError;
use tracing::debug;

use crate::coerce::{coerce, name_at, CoercionError, CoercionFailure};
use crate::error::{EngineError, InvocationError, ResolutionError, ValidationError};
use crate::params::ParameterSet;
use crate::synth::{SynthesizerConfig, UnitSynthesizer};
use crate::toolchain::{InvokeFailure, SnippetToolchain, Toolchain};

/// Compiles and invokes method snippets.
///
/// Holds only configuration and the toolchain. Every call compiles its own
/// module, so one engine can serve concurrent calls from many threads.
#[derive(Debug, Default)]
pub struct Engine<T = SnippetToolchain> {
    synthesizer: UnitSynthesizer,
    toolchain: T,
}

impl Engine {
    /// An engine with the default template and the built-in toolchain.
    pub fn new() -> Self {
        Engine::default()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }
}

impl<T: Toolchain> Engine<T> {
    /// An engine with the default template and `toolchain`.
    pub fn with_toolchain(toolchain: T) -> Self {
        Engine {
            synthesizer: UnitSynthesizer::default(),
            toolchain,
        }
    }

    pub fn config(&self) -> &SynthesizerConfig {
        self.synthesizer.config()
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Compile `body`, resolve its entry point and call it with `params`.
    ///
    /// Returns the method's result; `Value::Void` for a `void` method.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(body_len = body.len(), params = params.len())
    )]
    pub fn execute_method(&self, body: &str, params: &ParameterSet) -> Result<Value, EngineError> {
        self.run(&self.synthesizer, body, params)
    }

    /// Like [`execute_method`](Self::execute_method), with a template
    /// config for this call only.
    pub fn execute_method_with(
        &self,
        config: &SynthesizerConfig,
        body: &str,
        params: &ParameterSet,
    ) -> Result<Value, EngineError> {
        self.run(&UnitSynthesizer::new(config.clone()), body, params)
    }

    fn run(
        &self,
        synthesizer: &UnitSynthesizer,
        body: &str,
        params: &ParameterSet,
    ) -> Result<Value, EngineError> {
        let result = self.pipeline(synthesizer, body, params);
        match &result {
            Ok(value) => debug!(result = %value, "execution succeeded"),
            Err(error) => debug!(stage = %error.stage(), %error, "execution failed"),
        }
        result
    }

    fn pipeline(
        &self,
        synthesizer: &UnitSynthesizer,
        body: &str,
        params: &ParameterSet,
    ) -> Result<Value, EngineError> {
        validate(body, params)?;

        let unit = synthesizer.synthesize(body);
        debug!(unit_len = unit.text().len(), "unit synthesized");
        let image = self.toolchain.compile(&unit)?;
        debug!(image_len = image.len(), "unit compiled");

        let module = self.toolchain.load(image).map_err(ResolutionError::from)?;
        let entry = module
            .get_function(&synthesizer.config().container)
            .map_err(ResolutionError::from)?;
        if entry.arity() != params.len() {
            return Err(ResolutionError::Arity {
                method: entry.name().to_string(),
                expected: entry.arity(),
                found: params.len(),
            }
            .into());
        }
        debug!(method = entry.name(), arity = entry.arity(), "entry point resolved");

        let names = params.names.as_deref().unwrap_or_default();
        let args = match (&params.values, &params.types) {
            (Some(values), Some(types)) => coerce(values, types, names)?,
            _ => Vec::new(),
        };

        entry.invoke(args).map_err(|failure| match failure {
            InvokeFailure::Fault(fault) => InvocationError::from(fault).into(),
            InvokeFailure::Bind(BindError::Type {
                position,
                expected,
                found,
            }) => CoercionError {
                position,
                name: name_at(names, position),
                failure: CoercionFailure::TypeMismatch {
                    expected: expected.display_name(),
                    found,
                },
            }
            .into(),
            InvokeFailure::Bind(BindError::Arity {
                method,
                expected,
                found,
            }) => ResolutionError::Arity {
                method,
                expected,
                found,
            }
            .into(),
        })
    }
}

/// Check the inputs before anything is compiled.
fn validate(body: &str, params: &ParameterSet) -> Result<(), ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::MissingBody);
    }
    let (names, values) = match (&params.names, &params.values, &params.types) {
        (None, None, None) => return Ok(()),
        (Some(names), Some(values), Some(types))
            if names.len() == values.len() && values.len() == types.len() =>
        {
            (names, values)
        }
        _ => return Err(ValidationError::LengthMismatch),
    };
    if all_blank(names) {
        return Err(ValidationError::BlankNames);
    }
    if all_blank(values) {
        return Err(ValidationError::BlankValues);
    }
    Ok(())
}

/// Non-empty and every entry blank.
fn all_blank(items: &[String]) -> bool {
    !items.is_empty() && items.iter().all(|item| item.trim().is_empty())
}

/// Builder for an [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder<T = SnippetToolchain> {
    config: SynthesizerConfig,
    toolchain: T,
}

impl EngineBuilder {
    pub fn new() -> Self {
        EngineBuilder::default()
    }
}

impl<T: Toolchain> EngineBuilder<T> {
    /// Template names and imports.
    #[must_use]
    pub fn config(mut self, config: SynthesizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the toolchain.
    pub fn toolchain<U: Toolchain>(self, toolchain: U) -> EngineBuilder<U> {
        EngineBuilder {
            config: self.config,
            toolchain,
        }
    }

    pub fn build(self) -> Engine<T> {
        Engine {
            synthesizer: UnitSynthesizer::new(self.config),
            toolchain: self.toolchain,
        }
    }
}
