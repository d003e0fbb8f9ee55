//! Diagnostics for the snippet toolchain.
//!
//! Every compiler phase reports problems as [`Diagnostic`] values tagged with
//! an [`ErrorCode`]. A [`Diagnostics`] collection keeps them in emission order;
//! [`LineIndex`] turns byte spans into line/column positions for rendering.

mod diagnostic;
mod error_code;
mod line_index;

pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error_code::ErrorCode;
pub use line_index::{LineIndex, Position};
