//! Headless model of the form front end.
//!
//! The form has a body editor, one value field per extracted parameter, an
//! execute trigger and two output labels. The view layer binds to this
//! state; everything here is plain data so it can be driven from tests.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::engine::Engine;
use crate::extract::{extract_parameters, ExtractedParameter};
use crate::params::ParameterSet;
use crate::toolchain::{SnippetToolchain, Toolchain};
use crate::worker::{spawn_execution, ExecutionResult, PendingExecution};

pub struct FormSession<T: Toolchain + 'static = SnippetToolchain> {
    engine: Arc<Engine<T>>,
    body: String,
    parameters: Vec<ExtractedParameter>,
    values: Vec<String>,
    execute_enabled: bool,
    pending: Option<PendingExecution>,
    result_text: Option<String>,
    error_text: Option<String>,
}

impl<T: Toolchain + 'static> FormSession<T> {
    pub fn new(engine: Arc<Engine<T>>) -> Self {
        FormSession {
            engine,
            body: String::new(),
            parameters: Vec::new(),
            values: Vec::new(),
            execute_enabled: false,
            pending: None,
            result_text: None,
            error_text: None,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replace the editor text. Ignored while an execution is running.
    pub fn set_body(&mut self, text: impl Into<String>) -> bool {
        if self.busy() {
            return false;
        }
        self.body = text.into();
        true
    }

    /// The editor lost focus: rebuild the value fields from the header and
    /// enable the trigger only for a non-blank body.
    pub fn on_body_unfocused(&mut self) {
        if self.busy() {
            return;
        }
        if self.body.trim().is_empty() {
            self.execute_enabled = false;
            self.parameters.clear();
            self.values.clear();
            return;
        }
        self.execute_enabled = true;
        let parameters = extract_parameters(&self.body);
        if parameters != self.parameters {
            self.values = vec![String::new(); parameters.len()];
            self.parameters = parameters;
        }
    }

    /// One entry per value field, labelled `type name`.
    pub fn parameters(&self) -> &[ExtractedParameter] {
        &self.parameters
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Set the text of value field `index`. Returns false for an unknown
    /// field or while busy.
    pub fn set_value(&mut self, index: usize, text: impl Into<String>) -> bool {
        if self.busy() {
            return false;
        }
        match self.values.get_mut(index) {
            Some(value) => {
                *value = text.into();
                true
            }
            None => false,
        }
    }

    pub fn can_execute(&self) -> bool {
        self.execute_enabled && !self.busy()
    }

    /// An execution is running; inputs are disabled.
    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start executing the current body. Returns false when the trigger is
    /// disabled.
    pub fn execute(&mut self) -> bool {
        if !self.can_execute() {
            return false;
        }
        self.result_text = None;
        self.error_text = None;
        let params = if self.parameters.is_empty() {
            ParameterSet::none()
        } else {
            ParameterSet::from_extracted(&self.parameters, self.values.clone())
        };
        debug!(params = params.len(), "form execution started");
        self.pending = Some(spawn_execution(
            Arc::clone(&self.engine),
            self.body.clone(),
            params,
        ));
        true
    }

    /// Collect a finished result, if any. Returns true when one arrived.
    pub fn poll(&mut self) -> bool {
        let result = self.pending.as_ref().and_then(PendingExecution::try_result);
        self.finish(result)
    }

    /// Block up to `timeout` for the running execution. Returns true when
    /// its result arrived.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let result = self
            .pending
            .as_ref()
            .and_then(|pending| pending.wait_timeout(timeout));
        self.finish(result)
    }

    fn finish(&mut self, result: Option<ExecutionResult>) -> bool {
        let Some(result) = result else {
            return false;
        };
        self.pending = None;
        match result {
            Ok(value) => self.result_text = Some(value.to_string()),
            Err(error) => self.error_text = Some(error.to_string()),
        }
        true
    }

    pub fn result_text(&self) -> Option<&str> {
        self.result_text.as_deref()
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }
}
