//! Parse errors.

use snip_diagnostic::{Diagnostic, ErrorCode};
use snip_ir::Span;

/// A syntax error. Converted to a [`Diagnostic`] when reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.code, self.message, self.span)
    }
}
