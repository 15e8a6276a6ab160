//! Error types for symbolic parsing and matrix algebra.

use thiserror::Error;

/// Errors raised by the symbolic substrate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolicError {
    #[error("unexpected token '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix is singular")]
    Singular,
}

pub type Result<T> = std::result::Result<T, SymbolicError>;
