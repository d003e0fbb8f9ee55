//! Wrapping a method body in a complete compilation unit.

use std::fmt::Write;

use tracing::trace;

/// Names and imports used by the unit template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesizerConfig {
    /// Class that holds the method.
    pub container: String,
    /// Name given to the compiled module.
    pub module_name: String,
    /// Namespaces imported at the top of the unit, in order.
    pub imports: Vec<String>,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        SynthesizerConfig {
            container: "DynamicMethodClass".to_string(),
            module_name: "DynamicMethodAssembly".to_string(),
            imports: vec!["System".to_string(), "System.Text".to_string()],
        }
    }
}

impl SynthesizerConfig {
    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    #[must_use]
    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = module_name.into();
        self
    }

    #[must_use]
    pub fn with_imports(mut self, imports: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }
}

/// A complete unit ready for compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesizedUnit {
    text: String,
    module_name: String,
    body_offset: u32,
}

impl SynthesizedUnit {
    /// Build a unit from finished text; `body_offset` is the byte offset of
    /// the first body character.
    pub fn from_parts(text: String, module_name: impl Into<String>, body_offset: u32) -> Self {
        SynthesizedUnit {
            text,
            module_name: module_name.into(),
            body_offset,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Byte offset of the body within [`text`](Self::text).
    pub fn body_offset(&self) -> u32 {
        self.body_offset
    }
}

/// Produces units from method bodies.
///
/// ```text
/// using System;
/// using System.Text;
/// public class DynamicMethodClass {
///     <body>
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct UnitSynthesizer {
    config: SynthesizerConfig,
}

impl UnitSynthesizer {
    pub fn new(config: SynthesizerConfig) -> Self {
        UnitSynthesizer { config }
    }

    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Wrap `body` verbatim. The body is not inspected.
    pub fn synthesize(&self, body: &str) -> SynthesizedUnit {
        let mut text = String::with_capacity(body.len() + 96);
        for import in &self.config.imports {
            let _ = writeln!(text, "using {import};");
        }
        let _ = write!(text, "public class {} {{\n\t", self.config.container);
        let body_offset = u32::try_from(text.len()).unwrap_or(u32::MAX);
        text.push_str(body);
        text.push_str("\n}");
        trace!(len = text.len(), body_offset, "unit synthesized");
        SynthesizedUnit {
            text,
            module_name: self.config.module_name.clone(),
            body_offset,
        }
    }
}
