//! # geodesic-symbolic
//!
//! Exact symbolic expressions for the geodesic metric engine.
//!
//! The crate provides just the computer-algebra surface the engine needs:
//! canonical expression trees over arbitrary precision rationals with
//! commutative and non-commutative symbols, expansion, partial
//! differentiation, substitution, Pythagorean trig simplification, rational
//! simplification with exact polynomial cancellation, square-free factor
//! lists, and dense symbolic matrices with determinant, adjugate and inverse.
//!
//! ```
//! use geodesic_symbolic::{parse, Expr, Symbol};
//!
//! let th = Symbol::new("th");
//! let e = parse("sin(th)^2 + cos(th)^2").unwrap();
//! assert_eq!(e.trigsimp(), Expr::one());
//! assert!(e.diff(&th).is_zero());
//! ```

pub mod diff;
pub mod error;
pub mod expand;
pub mod expr;
pub mod factor;
pub mod lexer;
pub mod matrix;
pub mod number;
pub mod parser;
mod poly;
pub mod simplify;
pub mod trig;

pub use diff::diff;
pub use error::{Result, SymbolicError};
pub use expand::expand;
pub use expr::{Expr, Symbol};
pub use factor::{sqf_list, SqfList};
pub use matrix::Matrix;
pub use number::Rational;
pub use parser::parse;
pub use simplify::simplify;
pub use trig::trigsimp;
