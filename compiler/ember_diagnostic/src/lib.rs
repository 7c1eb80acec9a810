//! Diagnostic system for error reporting.
//!
//! Every error carries an error code for searchability, a message, and a
//! primary span. Rendering is left to an emitter so the compiler core never
//! writes to the terminal itself.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
