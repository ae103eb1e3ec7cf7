//! Diagnostic types for error reporting.

mod error;
mod span;

pub use error::{FieldError, GeneratorError};
pub use span::Span;
