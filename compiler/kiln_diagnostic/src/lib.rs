//! Diagnostic system for the Kiln compiler.
//!
//! Every failure a form detects becomes a [`Diagnostic`] with:
//! - An error code for searchability
//! - A message naming the offending names and types
//! - A primary span (where it went wrong)
//!
//! Diagnostics are appended to a per-unit [`DiagnosticLog`]. The log is
//! transactional: callers that try a parse path speculatively take a
//! [`Checkpoint`] first and roll back to it when the attempt fails, so only
//! the diagnostics of the path that was finally taken survive.
//!
//! # Error Guarantees
//!
//! ```text
//! // Can only get ErrorGuaranteed by emitting an error
//! let guarantee = log.emit_error(diagnostic);
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod log;
pub mod render;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use log::{Checkpoint, DiagnosticConfig, DiagnosticLog};
pub use render::{ColorMode, Renderer};
