//! Error types for metric construction and the connection engine.

use geodesic_symbolic::SymbolicError;
use thiserror::Error;

/// Errors raised while building a [`crate::Metric`] or deriving quantities
/// from it. All of them are configuration or input errors; nothing is
/// retried and no partial result is kept.
#[derive(Error, Debug)]
pub enum MetricError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("coordinates are required {0}")]
    MissingCoordinates(&'static str),

    #[error("'{0}' is not an allowed signature hint (expected 'e', 'm+', 'm-' or an integer)")]
    InvalidSignature(String),

    #[error("signature hint {hint} exceeds the dimension {n}")]
    SignatureOutOfRange { hint: usize, n: usize },

    #[error("Christoffel symbol mode {0} is not allowed (expected 1 or 2)")]
    InvalidChristoffelMode(u8),

    #[error("basis normalization is only implemented for orthogonal metrics")]
    NonOrthogonalNormalization,

    #[error("cannot normalize basis vector {basis}: its length is zero")]
    ZeroNorm { basis: String },

    #[error("'{key}' is not an allowed option; allowed options are:\n{allowed}")]
    UnknownOption { key: String, allowed: String },

    #[error("invalid value for option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("invalid metric element '{0}'")]
    InvalidMetricElement(String),

    #[error("invalid basis: {0}")]
    InvalidBasis(String),

    #[error("metric is not symmetric: g[{i},{j}] != g[{j},{i}]")]
    NotSymmetric { i: usize, j: usize },

    #[error(transparent)]
    Symbolic(#[from] SymbolicError),

    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MetricError>;
