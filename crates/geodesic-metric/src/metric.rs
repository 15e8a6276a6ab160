//! The metric tensor of a basis and everything derived from it.
//!
//! Construction runs in a fixed order:
//!
//! 1. resolve basis and reciprocal-basis atoms
//! 2. build `g` from the configured [`MetricInput`] and check it is a
//!    symmetric `n × n` matrix
//! 3. classify it (orthogonal, numeric)
//! 4. with coordinates, differentiate it and derive the connection
//!    (see [`crate::connection`])
//! 5. optionally normalize (see [`crate::normalize`])
//! 6. resolve the signature and the sign of the pseudoscalar square
//!
//! The inverse metric and the Christoffel symbols of the second kind are
//! computed on first use and memoized.

use crate::basis::{atoms, BasisSpec};
use crate::config::{MetricConfig, MetricInput};
use crate::error::{MetricError, Result};
use crate::signature::{pseudoscalar_sign, resolve_signature, PseudoscalarSign, Signature, SignatureHint};
use crate::simp::Simplifier;
use crate::spec_string::{default_metric, parse_metric_spec};
use crate::sqrt::square_root_of_expr;
use geodesic_symbolic::{diff, trigsimp, Expr, Matrix, Symbol};
use geodesic_tracing::{perf_event, perf_span, performance};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info};

/// Rank-3 array indexed `[i][j][k]`.
pub type Array3 = Vec<Vec<Vec<Expr>>>;

static METRIC_COUNT: AtomicUsize = AtomicUsize::new(1);

#[derive(Clone, Debug)]
pub struct Metric {
    pub(crate) name: String,
    pub(crate) basis_names: Vec<String>,
    pub(crate) basis: Vec<Expr>,
    pub(crate) r_symbols: Vec<Expr>,
    pub(crate) coords: Option<Vec<Symbol>>,
    pub(crate) n: usize,

    pub(crate) g: Matrix,
    pub(crate) g_raw: Matrix,
    pub(crate) g_inv: OnceLock<Matrix>,
    pub(crate) detg: OnceLock<Expr>,
    pub(crate) g_adj: OnceLock<Matrix>,

    pub(crate) is_ortho: bool,
    pub(crate) g_is_numeric: bool,
    pub(crate) connect_flg: bool,

    pub(crate) dg: Option<Array3>,
    pub(crate) gamma1: OnceLock<Array3>,
    pub(crate) gamma2: OnceLock<Array3>,
    pub(crate) de: Option<Vec<Vec<Expr>>>,
    pub(crate) e_norm: Option<Vec<Expr>>,

    pub(crate) sig: Signature,
    pub(crate) e_sq_sgn: PseudoscalarSign,
    pub(crate) sig_hint: SignatureHint,
    pub(crate) isq: PseudoscalarSign,
    pub(crate) gsym: Option<String>,
    pub(crate) debug: bool,
    pub(crate) wedge: bool,
    pub(crate) simp: Simplifier,
}

impl Metric {
    pub fn new(basis: BasisSpec, config: MetricConfig) -> Result<Self> {
        let _perf = perf_span!("metric_construction");
        let start = Instant::now();

        let name = format!("GA{}", METRIC_COUNT.fetch_add(1, Ordering::Relaxed));
        let MetricConfig {
            g: input,
            coords,
            norm,
            debug,
            gsym,
            sig: sig_hint,
            isq,
            wedge,
            simplifier,
        } = config;

        let (basis_names, reciprocal_names) = basis.resolve(coords.as_deref())?;
        let n = basis_names.len();
        if let Some(coords) = &coords {
            if coords.len() != n {
                return Err(MetricError::ShapeMismatch(format!(
                    "{} coordinates for a basis of {n} vectors",
                    coords.len()
                )));
            }
        }

        let basis = atoms(&basis_names);
        let r_symbols = atoms(&reciprocal_names);
        if debug {
            info!(metric = %name, "e_{{i}} = {}", join(&basis));
            info!(metric = %name, "e^{{i}} = {}", join(&r_symbols));
            if let Some(coords) = &coords {
                info!(metric = %name, "x^{{i}} = {}", join(coords));
            }
        }

        let (g, preset_inverse) = build_metric(&input, &basis_names, coords.as_deref(), debug)?;
        if g.shape() != (n, n) {
            return Err(MetricError::ShapeMismatch(format!(
                "metric is {}x{} but the basis has {n} vectors",
                g.rows(),
                g.cols()
            )));
        }
        if let Some((i, j)) = first_asymmetry(&g) {
            return Err(MetricError::NotSymmetric { i, j });
        }
        if debug {
            info!(metric = %name, "g = {g}");
        }

        let is_ortho = off_diagonal_is_zero(&g);
        let g_is_numeric = g.iter().all(Expr::is_number);
        debug!(metric = %name, n, is_ortho, g_is_numeric, "metric tensor built");

        if norm && !is_ortho {
            return Err(MetricError::NonOrthogonalNormalization);
        }

        let g_inv = OnceLock::new();
        if let Some(inverse) = preset_inverse {
            let _ = g_inv.set(inverse);
        }

        let mut metric = Metric {
            name,
            basis_names,
            basis,
            r_symbols,
            coords,
            n,
            g_raw: g.clone(),
            g,
            g_inv,
            detg: OnceLock::new(),
            g_adj: OnceLock::new(),
            is_ortho,
            g_is_numeric,
            connect_flg: false,
            dg: None,
            gamma1: OnceLock::new(),
            gamma2: OnceLock::new(),
            de: None,
            e_norm: None,
            sig: Signature::new(n, 0),
            e_sq_sgn: PseudoscalarSign::Minus,
            sig_hint,
            isq,
            gsym,
            debug,
            wedge,
            simp: simplifier.unwrap_or_else(Simplifier::global),
        };

        if metric.coords.is_some() {
            metric.derivatives_of_basis()?;
        }

        if norm {
            let e_norm: Vec<Expr> = (0..n).map(|i| square_root_of_expr(&metric.g[(i, i)])).collect();
            if debug {
                info!(metric = %metric.name, "|e_{{i}}| = {}", join(&e_norm));
            }
            metric.e_norm = Some(e_norm);
            metric.normalize_metric()?;
        }

        metric.sig = resolve_signature(&metric.g, metric.is_ortho, metric.sig_hint)?;
        metric.e_sq_sgn = pseudoscalar_sign(n, metric.sig);
        perf_event!(
            "signature_resolved",
            metric = metric.name.as_str(),
            p = metric.sig.p,
            q = metric.sig.q,
        );
        if debug {
            info!(metric = %metric.name, "signature = {}", metric.sig);
        }

        performance::record_tensor_stage("metric", n, n * n, start.elapsed().as_micros() as u64);
        debug!(
            metric = %metric.name,
            connect_flg = metric.connect_flg,
            signature = %metric.sig,
            pseudoscalar_sign = %metric.e_sq_sgn,
            "metric constructed"
        );
        Ok(metric)
    }

    /// Dot product of two vectors in an orthogonal embedding space, weighted
    /// by the diagonal `weights` when given.
    pub fn dot_orthogonal(v1: &[Expr], v2: &[Expr], weights: Option<&[Expr]>) -> Result<Expr> {
        if v1.len() != v2.len() {
            return Err(MetricError::ShapeMismatch(format!(
                "vectors of length {} and {}",
                v1.len(),
                v2.len()
            )));
        }
        match weights {
            None => Ok(Expr::add(v1.iter().zip(v2).map(|(a, b)| a * b).collect())),
            Some(w) if w.len() == v1.len() => Ok(Expr::add(
                v1.iter().zip(v2).zip(w).map(|((a, b), wi)| a * b * wi).collect(),
            )),
            Some(w) => Err(MetricError::ShapeMismatch(format!(
                "embedding metric has dimension {} but the vectors have dimension {}",
                w.len(),
                v1.len()
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension of the basis.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn basis_names(&self) -> &[String] {
        &self.basis_names
    }

    /// Basis atoms `e_i`.
    pub fn basis(&self) -> &[Expr] {
        &self.basis
    }

    /// Reciprocal basis atoms `e^i`.
    pub fn r_symbols(&self) -> &[Expr] {
        &self.r_symbols
    }

    pub fn coords(&self) -> Option<&[Symbol]> {
        self.coords.as_deref()
    }

    /// Working metric; rescaled when the basis is normalized.
    pub fn g(&self) -> &Matrix {
        &self.g
    }

    /// Metric as built, before any normalization.
    pub fn g_raw(&self) -> &Matrix {
        &self.g_raw
    }

    pub fn is_ortho(&self) -> bool {
        self.is_ortho
    }

    /// True when every entry of the metric is a number.
    pub fn g_is_numeric(&self) -> bool {
        self.g_is_numeric
    }

    /// True when some derivative of the metric is non-zero.
    pub fn connect_flg(&self) -> bool {
        self.connect_flg
    }

    /// `dg[i][j][k] = ∂g[i, j]/∂x_k`; present whenever coordinates are.
    pub fn dg(&self) -> Option<&Array3> {
        self.dg.as_ref()
    }

    /// `de[i][j] = ∂e_j/∂x_i`; `None` for a flat or coordinate-free basis.
    pub fn de(&self) -> Option<&[Vec<Expr>]> {
        self.de.as_deref()
    }

    /// Lengths `|e_i|` of the basis vectors when normalization was requested.
    pub fn e_norm(&self) -> Option<&[Expr]> {
        self.e_norm.as_deref()
    }

    pub fn signature(&self) -> Signature {
        self.sig
    }

    /// Sign of the square of the pseudoscalar implied by the signature.
    pub fn pseudoscalar_sign(&self) -> PseudoscalarSign {
        self.e_sq_sgn
    }

    pub fn signature_hint(&self) -> SignatureHint {
        self.sig_hint
    }

    /// Configured sign of the pseudoscalar square, for metrics that are not
    /// fully numeric.
    pub fn isq_hint(&self) -> PseudoscalarSign {
        self.isq
    }

    pub fn gsym(&self) -> Option<&str> {
        self.gsym.as_deref()
    }

    /// Placeholder determinant; set once the inverse has been computed with
    /// `gsym`.
    pub fn detg(&self) -> Option<&Expr> {
        self.detg.get()
    }

    pub fn g_adj(&self) -> Option<&Matrix> {
        self.g_adj.get()
    }

    pub fn wedge(&self) -> bool {
        self.wedge
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn simplifier(&self) -> &Simplifier {
        &self.simp
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: basis [{}], g = {}", self.name, join(&self.basis), self.g)
    }
}

pub(crate) fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn off_diagonal_is_zero(g: &Matrix) -> bool {
    let n = g.rows();
    (0..n).all(|i| (i + 1..n).all(|j| geodesic_symbolic::expand(&g[(i, j)]).is_zero()))
}

fn first_asymmetry(g: &Matrix) -> Option<(usize, usize)> {
    let n = g.rows();
    (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .find(|&(i, j)| !geodesic_symbolic::expand(&(&g[(i, j)] - &g[(j, i)])).is_zero())
}

/// The metric for `input` and, for the fully symbolic form, its symbolic
/// inverse.
fn build_metric(
    input: &MetricInput,
    basis_names: &[String],
    coords: Option<&[Symbol]>,
    debug: bool,
) -> Result<(Matrix, Option<Matrix>)> {
    match input {
        MetricInput::Auto => Ok((default_metric(basis_names), None)),
        MetricInput::Matrix(m) => Ok((m.clone(), None)),
        MetricInput::Rows(rows) => Ok((Matrix::from_rows(rows.clone())?, None)),
        MetricInput::Diagonal(entries) => Ok((Matrix::diagonal(entries.clone()), None)),
        MetricInput::Spec(spec) => Ok((parse_metric_spec(spec, basis_names)?, None)),
        MetricInput::Symbolic => {
            let coords = coords.ok_or(MetricError::MissingCoordinates("for a fully symbolic metric"))?;
            let (g, inverse) = symbolic_metric(coords);
            Ok((g, Some(inverse)))
        }
        MetricInput::Embedding { x, weights } => {
            let coords = coords.ok_or(MetricError::MissingCoordinates("for a metric derived from an embedding"))?;
            let tangents: Vec<Vec<Expr>> = coords
                .iter()
                .map(|coord| x.iter().map(|xi| diff(xi, coord)).collect())
                .collect();
            if debug {
                info!("X_{{i}} = {}", join(x));
                for (coord, tangent) in coords.iter().zip(&tangents) {
                    info!("D_{{{coord}}}X = [{}]", join(tangent));
                }
            }
            let n = coords.len();
            let mut g = Matrix::zeros(n, n);
            for i in 0..n {
                for j in i..n {
                    let dot = trigsimp(&Metric::dot_orthogonal(&tangents[i], &tangents[j], weights.as_deref())?);
                    g[(j, i)] = dot.clone();
                    g[(i, j)] = dot;
                }
            }
            Ok((g, None))
        }
    }
}

/// `g_{x}_{y}(coords)` and `g__{x}__{y}(coords)` with the earlier coordinate
/// first in each name.
fn symbolic_metric(coords: &[Symbol]) -> (Matrix, Matrix) {
    let n = coords.len();
    let args: Vec<Expr> = coords.iter().map(Expr::from).collect();
    let entry = |prefix: &str, sep: &str, i: usize, j: usize| {
        let (a, b) = if i <= j { (i, j) } else { (j, i) };
        let name = format!("{prefix}{}{sep}{}", coords[a].name(), coords[b].name());
        Expr::func(name, args.clone())
    };
    (
        Matrix::from_fn(n, n, |i, j| entry("g_", "_", i, j)),
        Matrix::from_fn(n, n, |i, j| entry("g__", "__", i, j)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis(names: &[&str]) -> BasisSpec {
        BasisSpec::named(names.iter().copied())
    }

    fn sq(e: Expr) -> Expr {
        Expr::pow(e, Expr::int(2))
    }

    #[test]
    fn names_are_sequential() {
        let a = Metric::new(basis(&["e1"]), MetricConfig::new().with_g("1")).unwrap();
        let b = Metric::new(basis(&["e1"]), MetricConfig::new().with_g("1")).unwrap();
        let index = |m: &Metric| m.name()[2..].parse::<usize>().unwrap();
        assert!(a.name().starts_with("GA"));
        assert!(index(&b) > index(&a));
    }

    #[test]
    fn identity_metric_from_spec() {
        let m = Metric::new(basis(&["e1", "e2", "e3"]), MetricConfig::new().with_g("1 1 1")).unwrap();
        assert_eq!(m.g(), &Matrix::identity(3));
        assert!(m.is_ortho());
        assert!(m.g_is_numeric());
        assert!(!m.connect_flg());
        assert!(m.dg().is_none());
        assert!(m.de().is_none());
        assert_eq!(m.signature(), Signature::new(3, 0));
    }

    #[test]
    fn default_metric_is_symbolic_and_general() {
        let m = Metric::new(basis(&["a", "b"]), MetricConfig::new()).unwrap();
        assert_eq!(m.g()[(0, 1)], Expr::sym("(a.b)"));
        assert_eq!(m.g()[(1, 0)], Expr::sym("(a.b)"));
        assert!(!m.is_ortho());
        assert!(!m.g_is_numeric());
        assert_eq!(m.r_symbols(), &[Expr::nc_sym("a^"), Expr::nc_sym("b^")]);
    }

    #[test]
    fn numeric_flag_covers_every_entry() {
        let g = Matrix::from_rows(vec![vec![Expr::one(), Expr::zero()], vec![Expr::zero(), Expr::sym("k")]]).unwrap();
        let m = Metric::new(basis(&["a", "b"]), MetricConfig::new().with_g(g)).unwrap();
        assert!(m.is_ortho());
        assert!(!m.g_is_numeric());
    }

    #[test]
    fn shape_and_symmetry_are_checked() {
        let err = Metric::new(basis(&["a", "b"]), MetricConfig::new().with_g(Matrix::identity(3))).unwrap_err();
        assert!(matches!(err, MetricError::ShapeMismatch(_)));

        let rows = vec![vec![Expr::one(), Expr::int(2)], vec![Expr::int(3), Expr::one()]];
        let err = Metric::new(basis(&["a", "b"]), MetricConfig::new().with_g(MetricInput::Rows(rows))).unwrap_err();
        assert!(matches!(err, MetricError::NotSymmetric { i: 0, j: 1 }));

        let coords = ["x"].map(Symbol::new);
        let err = Metric::new(basis(&["a", "b"]), MetricConfig::new().with_coords(coords)).unwrap_err();
        assert!(matches!(err, MetricError::ShapeMismatch(_)));
    }

    #[test]
    fn symbolic_metric_needs_coordinates() {
        let err = Metric::new(basis(&["a", "b"]), MetricConfig::new().with_g("g")).unwrap_err();
        assert!(matches!(err, MetricError::MissingCoordinates(_)));

        let err = Metric::new(basis(&["a"]), MetricConfig::new().with_g(MetricInput::embedding(vec![Expr::sym("x")])))
            .unwrap_err();
        assert!(matches!(err, MetricError::MissingCoordinates(_)));
    }

    #[test]
    fn symbolic_metric_names_and_inverse() {
        let coords = ["x", "y"].map(Symbol::new);
        let args: Vec<Expr> = coords.iter().map(Expr::from).collect();
        let m = Metric::new(
            BasisSpec::indexed("e"),
            MetricConfig::new().with_g("g").with_coords(coords.clone()),
        )
        .unwrap();
        assert_eq!(m.basis_names(), &["e_x".to_string(), "e_y".to_string()]);
        assert_eq!(m.g()[(1, 0)], Expr::func("g_x_y", args.clone()));
        assert_eq!(m.g()[(0, 1)], m.g()[(1, 0)]);
        assert_eq!(m.inverse_metric().unwrap()[(0, 0)], Expr::func("g__x__x", args));
        assert!(m.connect_flg());
    }

    #[test]
    fn embedding_metric_is_trig_simplified() {
        let (r, th) = (Expr::sym("r"), Expr::sym("th"));
        let x = vec![&r * Expr::cos(th.clone()), &r * Expr::sin(th.clone())];
        let m = Metric::new(
            basis(&["e_r", "e_th"]),
            MetricConfig::new()
                .with_g(MetricInput::embedding(x))
                .with_coords(["r", "th"].map(Symbol::new)),
        )
        .unwrap();
        assert_eq!(m.g(), &Matrix::diagonal(vec![Expr::one(), sq(r)]));
        assert!(m.is_ortho());
    }

    #[test]
    fn weighted_embedding() {
        let (t, x) = (Expr::sym("t"), Expr::sym("x"));
        let input = MetricInput::Embedding {
            x: vec![t.clone(), x.clone()],
            weights: Some(vec![Expr::one(), Expr::int(-1)]),
        };
        let m = Metric::new(
            basis(&["e_t", "e_x"]),
            MetricConfig::new().with_g(input).with_coords(["t", "x"].map(Symbol::new)),
        )
        .unwrap();
        assert_eq!(m.g(), &Matrix::diagonal(vec![Expr::one(), Expr::int(-1)]));
        assert_eq!(m.signature(), Signature::new(1, 1));
    }

    #[test]
    fn dot_orthogonal_checks_weight_length() {
        let v = [Expr::one(), Expr::int(2)];
        assert_eq!(Metric::dot_orthogonal(&v, &v, None).unwrap(), Expr::int(5));
        let w = [Expr::one(), Expr::int(-1)];
        assert_eq!(Metric::dot_orthogonal(&v, &v, Some(&w)).unwrap(), Expr::int(-3));
        assert!(matches!(
            Metric::dot_orthogonal(&v, &v, Some(&w[..1])),
            Err(MetricError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn signature_from_numeric_diagonal_or_hint() {
        let m = Metric::new(basis(&["t", "x", "y", "z"]), MetricConfig::new().with_g("1 -1 -1 -1")).unwrap();
        assert_eq!(m.signature(), Signature::new(1, 3));
        assert_eq!(m.pseudoscalar_sign(), PseudoscalarSign::Minus);

        let m = Metric::new(
            basis(&["a", "b"]),
            MetricConfig::new().with_sig(SignatureHint::MinkowskiPlus),
        )
        .unwrap();
        assert_eq!(m.signature(), Signature::new(1, 1));
    }

    #[test]
    fn debug_output_does_not_change_results() {
        let config = || {
            MetricConfig::new()
                .with_g(Matrix::diagonal(vec![Expr::one(), sq(Expr::sym("r"))]))
                .with_coords(["r", "th"].map(Symbol::new))
                .with_norm(true)
        };
        let quiet = Metric::new(basis(&["e_r", "e_th"]), config()).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let verbose = tracing::subscriber::with_default(subscriber, || {
            Metric::new(basis(&["e_r", "e_th"]), config().with_debug(true)).unwrap()
        });
        assert_eq!(quiet.g(), verbose.g());
        assert_eq!(quiet.de(), verbose.de());
        assert_eq!(quiet.signature(), verbose.signature());
    }

    #[test]
    fn metric_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Metric>();
    }

    #[test]
    fn configured_simplifier_is_kept() {
        let m = Metric::new(
            basis(&["a"]),
            MetricConfig::new().with_g("1").with_simplifier(Simplifier::none()),
        )
        .unwrap();
        assert!(m.simplifier().modes().is_empty());
    }
}
