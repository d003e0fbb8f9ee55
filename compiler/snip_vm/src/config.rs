//! VM configuration.

use crate::print_handler::PrintHandler;

/// Default limit on nested calls.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Settings for one VM run.
#[derive(Clone, Debug)]
pub struct VmConfig {
    /// Maximum number of live call frames. Exceeding it raises
    /// `InsufficientExecutionStackException`.
    pub max_depth: usize,
    pub print: PrintHandler,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            print: PrintHandler::Stdout,
        }
    }
}

impl VmConfig {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_print_handler(mut self, print: PrintHandler) -> Self {
        self.print = print;
        self
    }
}
