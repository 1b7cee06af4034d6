//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Structural contract violations raised by the tree engine.
///
/// Missing data (absent nodes, non-array input, unknown parents) is not an
/// error: queries and mutations degrade to neutral results instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("illegal node value: {0}")]
    IllegalValue(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl TreeError {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalValue(reason.into())
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOperation(reason.into())
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
