//! Where `Console.Write` and `Console.WriteLine` output goes.
//!
//! - `Stdout`: the process's standard output (default)
//! - `Buffer`: captured in memory, for front ends and tests
//! - `Silent`: discarded

use std::sync::Arc;

use parking_lot::Mutex;

/// Output sink for the VM.
///
/// Cloning shares the sink: a clone of a `Buffer` handler writes into the
/// same buffer.
#[derive(Clone, Debug, Default)]
pub enum PrintHandler {
    #[default]
    Stdout,
    Buffer(Arc<Mutex<String>>),
    Silent,
}

impl PrintHandler {
    /// A new, empty capture buffer.
    pub fn buffer() -> Self {
        PrintHandler::Buffer(Arc::new(Mutex::new(String::new())))
    }

    /// Print a line (with newline).
    pub fn println(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => println!("{msg}"),
            PrintHandler::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
            PrintHandler::Silent => {}
        }
    }

    /// Print without newline.
    pub fn print(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => print!("{msg}"),
            PrintHandler::Buffer(buf) => buf.lock().push_str(msg),
            PrintHandler::Silent => {}
        }
    }

    /// Everything captured so far. Empty for handlers that don't capture.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buf) => buf.lock().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    /// Clear captured output.
    pub fn clear(&self) {
        if let PrintHandler::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}
