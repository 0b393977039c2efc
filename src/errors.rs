//! Crate-level error type

use crate::lower::LowerError;
use crate::parser::ParseError;
use thiserror::Error;

/// Failure of any stage of [`crate::compile`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Lexical or syntax error
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Translation error: {0}")]
    Lower(#[from] LowerError),
}
