//! Metric signature and the sign of the pseudoscalar square.

use crate::error::{MetricError, Result};
use geodesic_symbolic::Matrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `(p, q)`: the number of basis directions squaring positive and
/// non-positive. Always `p + q = n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub p: usize,
    pub q: usize,
}

impl Signature {
    pub fn new(p: usize, q: usize) -> Self {
        Self { p, q }
    }

    pub fn dimension(&self) -> usize {
        self.p + self.q
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.p, self.q)
    }
}

impl From<(usize, usize)> for Signature {
    fn from((p, q): (usize, usize)) -> Self {
        Self { p, q }
    }
}

/// Signature to assume when it cannot be read off the metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureHint {
    /// `"e"`: `(n, 0)`.
    #[default]
    Euclidean,
    /// `"m+"`: `(n - 1, 1)`.
    MinkowskiPlus,
    /// `"m-"`: `(1, n - 1)`.
    MinkowskiMinus,
    /// `k`: `(k, n - k)`.
    Positive(usize),
}

impl SignatureHint {
    pub fn resolve(self, n: usize) -> Result<Signature> {
        match self {
            SignatureHint::Euclidean => Ok(Signature::new(n, 0)),
            SignatureHint::MinkowskiPlus => Ok(Signature::new(n.saturating_sub(1), n.min(1))),
            SignatureHint::MinkowskiMinus => Ok(Signature::new(n.min(1), n.saturating_sub(1))),
            SignatureHint::Positive(k) if k <= n => Ok(Signature::new(k, n - k)),
            SignatureHint::Positive(k) => Err(MetricError::SignatureOutOfRange { hint: k, n }),
        }
    }
}

impl FromStr for SignatureHint {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "e" => Ok(SignatureHint::Euclidean),
            "m+" => Ok(SignatureHint::MinkowskiPlus),
            "m-" => Ok(SignatureHint::MinkowskiMinus),
            other => other
                .parse::<usize>()
                .map(SignatureHint::Positive)
                .map_err(|_| MetricError::InvalidSignature(other.to_string())),
        }
    }
}

impl fmt::Display for SignatureHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureHint::Euclidean => f.write_str("e"),
            SignatureHint::MinkowskiPlus => f.write_str("m+"),
            SignatureHint::MinkowskiMinus => f.write_str("m-"),
            SignatureHint::Positive(k) => write!(f, "{k}"),
        }
    }
}

/// Sign of the square of the top-grade element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PseudoscalarSign {
    #[serde(rename = "+")]
    Plus,
    #[default]
    #[serde(rename = "-")]
    Minus,
}

impl PseudoscalarSign {
    pub fn as_char(self) -> char {
        match self {
            PseudoscalarSign::Plus => '+',
            PseudoscalarSign::Minus => '-',
        }
    }
}

impl FromStr for PseudoscalarSign {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "+" => Ok(PseudoscalarSign::Plus),
            "-" => Ok(PseudoscalarSign::Minus),
            other => Err(MetricError::InvalidOption {
                key: "Isq".to_string(),
                reason: format!("expected '+' or '-', got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for PseudoscalarSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Read the signature off an orthogonal metric whose diagonal is numeric,
/// falling back to `hint` otherwise.
pub fn resolve_signature(g: &Matrix, is_ortho: bool, hint: SignatureHint) -> Result<Signature> {
    let n = g.rows();
    if is_ortho {
        let mut p = 0;
        let mut q = 0;
        for i in 0..n {
            match g[(i, i)].is_positive() {
                Some(true) => p += 1,
                Some(false) => q += 1,
                None => break,
            }
        }
        if p + q == n {
            return Ok(Signature::new(p, q));
        }
    }
    hint.resolve(n)
}

/// `-` when `n(n-1)/2 + q` is odd, `+` otherwise.
pub fn pseudoscalar_sign(n: usize, sig: Signature) -> PseudoscalarSign {
    if (n * n.saturating_sub(1) / 2 + sig.q) % 2 == 1 {
        PseudoscalarSign::Minus
    } else {
        PseudoscalarSign::Plus
    }
}
