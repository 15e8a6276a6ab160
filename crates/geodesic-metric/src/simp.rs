//! Coefficient simplification pipeline.
//!
//! A [`Simplifier`] runs an ordered list of [`Transform`]s over the scalar
//! coefficients of an expression and never touches its basis atoms, so
//! simplification cannot reorder or merge non-commutative structure.
//!
//! Every [`crate::Metric`] owns the simplifier it was configured with. The
//! process-wide default is only read when a configuration does not name one;
//! [`Simplifier::profile`] replaces it for the lifetime of the returned guard.

use crate::linear::linear_expand;
use geodesic_symbolic::{expand, simplify, trigsimp, Expr};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

type TransformFn = dyn Fn(&Expr) -> Expr + Send + Sync;

/// A named coefficient transform.
#[derive(Clone)]
pub struct Transform {
    name: String,
    func: Arc<TransformFn>,
}

impl Transform {
    pub fn new(name: impl Into<String>, func: impl Fn(&Expr) -> Expr + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn simplify() -> Self {
        Self::new("simplify", simplify)
    }

    pub fn trigsimp() -> Self {
        Self::new("trigsimp", trigsimp)
    }

    pub fn expand() -> Self {
        Self::new("expand", expand)
    }

    pub fn identity() -> Self {
        Self::new("identity", Expr::clone)
    }

    /// Built-in transform by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "simplify" => Some(Self::simplify()),
            "trigsimp" => Some(Self::trigsimp()),
            "expand" => Some(Self::expand()),
            "identity" => Some(Self::identity()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, e: &Expr) -> Expr {
        (self.func)(e)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}

/// Ordered pipeline of coefficient transforms.
#[derive(Clone, Debug)]
pub struct Simplifier {
    modes: Vec<Transform>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self {
            modes: vec![Transform::simplify()],
        }
    }
}

static GLOBAL: OnceLock<RwLock<Simplifier>> = OnceLock::new();

fn global_cell() -> &'static RwLock<Simplifier> {
    GLOBAL.get_or_init(|| RwLock::new(Simplifier::default()))
}

impl Simplifier {
    pub fn new(modes: Vec<Transform>) -> Self {
        Self { modes }
    }

    /// Pipeline that leaves coefficients untouched.
    pub fn none() -> Self {
        Self { modes: Vec::new() }
    }

    pub fn modes(&self) -> &[Transform] {
        &self.modes
    }

    pub fn mode_names(&self) -> Vec<&str> {
        self.modes.iter().map(Transform::name).collect()
    }

    /// Decompose `expr`, run every transform in order on each coefficient and
    /// recombine.
    pub fn apply(&self, expr: &Expr) -> Expr {
        let start = Instant::now();
        let before = expr.complexity();
        let result = Expr::add(
            linear_expand(expr)
                .into_pairs()
                .into_iter()
                .map(|(coefficient, basis)| {
                    let coefficient = self.modes.iter().fold(coefficient, |c, mode| mode.apply(&c));
                    coefficient * basis
                })
                .collect(),
        );
        geodesic_tracing::performance::record_simplification(
            &self.mode_names().join(","),
            before,
            result.complexity(),
            start.elapsed().as_micros() as u64,
        );
        result
    }

    /// Snapshot of the process-wide default pipeline.
    pub fn global() -> Simplifier {
        global_cell().read().clone()
    }

    /// Install `simplifier` as the process-wide default until the returned
    /// guard is dropped, at which point the previous pipeline is restored.
    #[must_use = "the previous pipeline is restored when the guard is dropped"]
    pub fn profile(simplifier: Simplifier) -> ProfileGuard {
        let previous = std::mem::replace(&mut *global_cell().write(), simplifier);
        ProfileGuard {
            previous: Some(previous),
        }
    }
}

/// Restores the previous process-wide pipeline on drop.
#[derive(Debug)]
pub struct ProfileGuard {
    previous: Option<Simplifier>,
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *global_cell().write() = previous;
        }
    }
}
