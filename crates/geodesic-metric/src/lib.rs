//! # geodesic-metric
//!
//! Metric tensor and connection engine for geometric-algebra calculus on
//! arbitrary, possibly curved and non-orthogonal, coordinate bases.
//!
//! A [`Metric`] is built once from a [`BasisSpec`] and a [`MetricConfig`].
//! It exposes the metric tensor (as built and after optional normalization),
//! its inverse, the derivatives of the metric, Christoffel symbols of both
//! kinds, the derivatives of the basis vectors and the signature.
//!
//! ```
//! use geodesic_metric::{BasisSpec, ChristoffelKind, Metric, MetricConfig, MetricInput};
//! use geodesic_symbolic::{parse, Expr, Symbol};
//!
//! let x = vec![parse("r*cos(th)").unwrap(), parse("r*sin(th)").unwrap()];
//! let polar = Metric::new(
//!     BasisSpec::indexed("e"),
//!     MetricConfig::new()
//!         .with_g(MetricInput::embedding(x))
//!         .with_coords(["r", "th"].map(Symbol::new)),
//! )
//! .unwrap();
//!
//! assert_eq!(polar.g()[(1, 1)], parse("r^2").unwrap());
//! assert!(polar.connect_flg());
//! let gamma = polar.christoffel_symbols(ChristoffelKind::First).unwrap().unwrap();
//! assert_eq!(gamma[1][1][0], -Expr::sym("r"));
//! ```
//!
//! The [`linear`] module holds the coefficient/basis decomposition every
//! computation here relies on, and [`simp`] the coefficient simplification
//! pipeline.

pub mod basis;
pub mod config;
pub mod connection;
pub mod error;
pub mod linear;
pub mod metric;
mod normalize;
pub mod signature;
pub mod simp;
pub mod spec_string;
pub mod sqrt;

pub use basis::BasisSpec;
pub use config::{MetricConfig, MetricInput, ALLOWED_OPTIONS};
pub use connection::ChristoffelKind;
pub use error::{MetricError, Result};
pub use linear::{collect, linear_expand, LinearExpansion};
pub use metric::{Array3, Metric};
pub use signature::{PseudoscalarSign, Signature, SignatureHint};
pub use simp::{ProfileGuard, Simplifier, Transform};
pub use spec_string::parse_metric_spec;
pub use sqrt::square_root_of_expr;
