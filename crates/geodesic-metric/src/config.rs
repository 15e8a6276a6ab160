//! Metric construction options.
//!
//! [`MetricConfig`] is the typed form. [`MetricConfig::from_json`] accepts the
//! loose option map (`g`, `coords`, `X`, `norm`, `debug`, `gsym`, `sig`, `Isq`,
//! `wedge`) and converts it once at the boundary.

use crate::error::{MetricError, Result};
use crate::signature::{PseudoscalarSign, SignatureHint};
use crate::simp::Simplifier;
use geodesic_symbolic::number::parse_rational;
use geodesic_symbolic::{parse, Expr, Matrix, Symbol};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Recognised option keys with their descriptions.
pub const ALLOWED_OPTIONS: &[(&str, &str)] = &[
    ("g", "metric tensor: specification string, list of diagonal entries, list of rows, or null"),
    ("coords", "coordinate symbols, or null for a coordinate-free basis"),
    ("X", "embedding vector function of the coordinates"),
    ("norm", "normalize the basis to unit length (orthogonal metrics only)"),
    ("debug", "log every intermediate quantity"),
    ("gsym", "name of the symbolic determinant used for the inverse metric"),
    ("sig", "signature hint: 'e', 'm+', 'm-' or the number of positive directions"),
    ("Isq", "sign of the square of the pseudoscalar, '+' or '-'"),
    ("wedge", "print basis blades with '^'"),
];

fn scalars(values: &[RawScalar], key: &str) -> Result<Vec<Expr>> {
    values.iter().map(|v| v.to_expr(key)).collect()
}

fn allowed_options_listing() -> String {
    ALLOWED_OPTIONS
        .iter()
        .map(|(key, description)| format!("  {key}: {description}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Where the metric tensor comes from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MetricInput {
    /// Symmetric matrix of `(e_i.e_j)` symbols.
    #[default]
    Auto,
    Matrix(Matrix),
    Rows(Vec<Vec<Expr>>),
    Diagonal(Vec<Expr>),
    /// Specification string, see [`crate::spec_string`].
    Spec(String),
    /// Undefined functions `g_{x}_{y}` of the coordinates.
    Symbolic,
    /// Induced by an embedding `X(coords)`, optionally with diagonal weights
    /// for the embedding space.
    Embedding { x: Vec<Expr>, weights: Option<Vec<Expr>> },
}

impl MetricInput {
    /// `"g"` selects the fully symbolic metric; anything else is a specification string.
    pub fn from_spec(spec: impl Into<String>) -> Self {
        let spec = spec.into();
        if spec.trim() == "g" {
            MetricInput::Symbolic
        } else {
            MetricInput::Spec(spec)
        }
    }

    pub fn embedding(x: Vec<Expr>) -> Self {
        MetricInput::Embedding { x, weights: None }
    }
}

impl From<Matrix> for MetricInput {
    fn from(m: Matrix) -> Self {
        MetricInput::Matrix(m)
    }
}

impl From<&str> for MetricInput {
    fn from(spec: &str) -> Self {
        MetricInput::from_spec(spec)
    }
}

/// Options for [`crate::Metric::new`].
#[derive(Clone, Debug)]
pub struct MetricConfig {
    pub g: MetricInput,
    pub coords: Option<Vec<Symbol>>,
    pub norm: bool,
    pub debug: bool,
    pub gsym: Option<String>,
    pub sig: SignatureHint,
    pub isq: PseudoscalarSign,
    /// Display preference for downstream printers.
    pub wedge: bool,
    /// Coefficient pipeline; the process-wide default when `None`.
    pub simplifier: Option<Simplifier>,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            g: MetricInput::Auto,
            coords: None,
            norm: false,
            debug: false,
            gsym: None,
            sig: SignatureHint::Euclidean,
            isq: PseudoscalarSign::Minus,
            wedge: true,
            simplifier: None,
        }
    }
}

impl MetricConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_g(mut self, g: impl Into<MetricInput>) -> Self {
        self.g = g.into();
        self
    }

    pub fn with_coords<I, S>(mut self, coords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.coords = Some(coords.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_norm(mut self, norm: bool) -> Self {
        self.norm = norm;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_gsym(mut self, gsym: impl Into<String>) -> Self {
        self.gsym = Some(gsym.into());
        self
    }

    pub fn with_sig(mut self, sig: SignatureHint) -> Self {
        self.sig = sig;
        self
    }

    pub fn with_isq(mut self, isq: PseudoscalarSign) -> Self {
        self.isq = isq;
        self
    }

    pub fn with_wedge(mut self, wedge: bool) -> Self {
        self.wedge = wedge;
        self
    }

    pub fn with_simplifier(mut self, simplifier: Simplifier) -> Self {
        self.simplifier = Some(simplifier);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(MetricError::InvalidOption {
                key: "<root>".to_string(),
                reason: "options must be a JSON object".to_string(),
            });
        };
        if let Some(key) = map.keys().find(|k| !ALLOWED_OPTIONS.iter().any(|(allowed, _)| allowed == k)) {
            return Err(MetricError::UnknownOption {
                key: key.clone(),
                allowed: allowed_options_listing(),
            });
        }

        let raw: RawOptions = serde_json::from_value(Value::Object(map))?;
        debug!(?raw, "parsed metric options");
        raw.into_config()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawScalar {
    fn to_expr(&self, key: &str) -> Result<Expr> {
        match self {
            RawScalar::Int(n) => Ok(Expr::int(*n)),
            RawScalar::Float(x) => parse_rational(&x.to_string())
                .map(Expr::Num)
                .ok_or_else(|| MetricError::InvalidOption {
                    key: key.to_string(),
                    reason: format!("{x} is not a finite number"),
                }),
            RawScalar::Text(text) => Ok(parse(text)?),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMetric {
    Spec(String),
    Rows(Vec<Vec<RawScalar>>),
    Diagonal(Vec<RawScalar>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSignature {
    Count(i64),
    Hint(String),
}

#[derive(Debug, Deserialize)]
struct RawOptions {
    #[serde(default)]
    g: Option<RawMetric>,
    #[serde(default)]
    coords: Option<Vec<String>>,
    #[serde(default, rename = "X")]
    x: Option<Vec<RawScalar>>,
    #[serde(default)]
    norm: Option<bool>,
    #[serde(default)]
    debug: Option<bool>,
    #[serde(default)]
    gsym: Option<String>,
    #[serde(default)]
    sig: Option<RawSignature>,
    #[serde(default, rename = "Isq")]
    isq: Option<String>,
    #[serde(default)]
    wedge: Option<bool>,
}

impl RawOptions {
    fn into_config(self) -> Result<MetricConfig> {
        let mut config = MetricConfig::default();

        config.g = match (self.g, self.x) {
            (Some(g), x) => {
                if x.is_some() {
                    warn!("both 'g' and 'X' were given; using 'g'");
                }
                match g {
                    RawMetric::Spec(spec) => MetricInput::from_spec(spec),
                    RawMetric::Rows(rows) => MetricInput::Rows(
                        rows.iter()
                            .map(|row| scalars(row, "g"))
                            .collect::<Result<Vec<_>>>()?,
                    ),
                    RawMetric::Diagonal(entries) => MetricInput::Diagonal(scalars(&entries, "g")?),
                }
            }
            (None, Some(x)) => MetricInput::embedding(scalars(&x, "X")?),
            (None, None) => MetricInput::Auto,
        };

        config.coords = self.coords.map(|names| names.into_iter().map(Symbol::new).collect());
        config.norm = self.norm.unwrap_or(config.norm);
        config.debug = self.debug.unwrap_or(config.debug);
        config.gsym = self.gsym;
        config.wedge = self.wedge.unwrap_or(config.wedge);

        if let Some(sig) = self.sig {
            config.sig = match sig {
                RawSignature::Count(k) => usize::try_from(k)
                    .map(SignatureHint::Positive)
                    .map_err(|_| MetricError::InvalidSignature(k.to_string()))?,
                RawSignature::Hint(hint) => hint.parse()?,
            };
        }
        if let Some(isq) = self.isq {
            config.isq = isq.parse()?;
        }
        Ok(config)
    }
}
