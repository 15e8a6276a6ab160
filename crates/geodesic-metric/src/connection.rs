//! Derivatives of the metric, Christoffel symbols, derivatives of the basis
//! vectors and the inverse metric.

use crate::error::{MetricError, Result};
use crate::metric::{join, Array3, Metric};
use crate::simp::Simplifier;
use geodesic_symbolic::{diff, Expr, Matrix, SymbolicError};
use geodesic_tracing::{perf_span, performance, timed_block};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Which Christoffel symbols to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChristoffelKind {
    /// `Γ_ijk`, with `∂_i e_j = Γ_ijk e^k`.
    First,
    /// `Γ_ij^k`, with `∂_i e_j = Γ_ij^k e_k`.
    Second,
}

impl ChristoffelKind {
    pub fn from_mode(mode: u8) -> Result<Self> {
        match mode {
            1 => Ok(ChristoffelKind::First),
            2 => Ok(ChristoffelKind::Second),
            other => Err(MetricError::InvalidChristoffelMode(other)),
        }
    }
}

impl TryFrom<u8> for ChristoffelKind {
    type Error = MetricError;

    fn try_from(mode: u8) -> Result<Self> {
        ChristoffelKind::from_mode(mode)
    }
}

/// True when any entry of `dg` is non-zero.
pub fn connection_flag(dg: &Array3) -> bool {
    dg.iter().flatten().flatten().any(|d| !d.is_zero())
}

fn christoffel_first_kind(dg: &Array3, simp: &Simplifier) -> Array3 {
    let n = dg.len();
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    (0..n)
                        .map(|k| {
                            let gamma = Expr::half() * (&dg[j][k][i] + &dg[i][k][j] - &dg[i][j][k]);
                            simp.apply(&gamma)
                        })
                        .collect()
                })
                .collect()
        })
        .collect()
}

fn christoffel_second_kind(gamma1: &Array3, g_inv: &Matrix, simp: &Simplifier) -> Array3 {
    let n = gamma1.len();
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    (0..n)
                        .map(|k| {
                            let gamma = Expr::add((0..n).map(|l| &gamma1[i][j][l] * &g_inv[(l, k)]).collect());
                            simp.apply(&gamma)
                        })
                        .collect()
                })
                .collect()
        })
        .collect()
}

fn format_array3(a: &Array3) -> String {
    let rows: Vec<String> = a
        .iter()
        .map(|plane| {
            let inner: Vec<String> = plane.iter().map(|row| format!("[{}]", join(row))).collect();
            format!("[{}]", inner.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

impl Metric {
    /// `dg[i][j][k] = ∂g[i, j]/∂x_k`, unsimplified.
    pub fn derivatives_of_g(&self) -> Result<Array3> {
        let coords = self
            .coords
            .as_deref()
            .ok_or(MetricError::MissingCoordinates("to differentiate the metric"))?;
        let n = self.n;
        Ok((0..n)
            .map(|i| {
                (0..n)
                    .map(|j| coords.iter().map(|x| diff(&self.g[(i, j)], x)).collect())
                    .collect()
            })
            .collect())
    }

    /// Christoffel symbols of the requested kind, or `None` when the metric
    /// is flat or has no coordinates.
    pub fn christoffel_symbols(&self, kind: ChristoffelKind) -> Result<Option<&Array3>> {
        if !self.connect_flg {
            return Ok(None);
        }
        let Some(dg) = self.dg.as_ref() else {
            return Ok(None);
        };

        let gamma1 = self.gamma1.get_or_init(|| {
            let _perf = perf_span!("christoffel_first_kind", dim = self.n);
            let (gamma, duration_us) = timed_block!("gamma1", { christoffel_first_kind(dg, &self.simp) });
            performance::record_tensor_stage("gamma1", self.n, self.n.pow(3), duration_us);
            if self.debug {
                info!(metric = %self.name, "Gamma_{{ijk}} = {}", format_array3(&gamma));
            }
            gamma
        });

        match kind {
            ChristoffelKind::First => Ok(Some(gamma1)),
            ChristoffelKind::Second => {
                if let Some(gamma2) = self.gamma2.get() {
                    return Ok(Some(gamma2));
                }
                let _perf = perf_span!("christoffel_second_kind", dim = self.n);
                let (gamma, duration_us) = timed_block!("gamma2", {
                    let g_inv = self.connection_inverse()?;
                    christoffel_second_kind(gamma1, &g_inv, &self.simp)
                });
                performance::record_tensor_stage("gamma2", self.n, self.n.pow(3), duration_us);
                if self.debug {
                    info!(metric = %self.name, "Gamma_{{ij}}^{{k}} = {}", format_array3(&gamma));
                }
                Ok(Some(self.gamma2.get_or_init(|| gamma)))
            }
        }
    }

    /// Inverse used to raise the last index of `Γ_ijk`. The first-kind symbols
    /// come from the metric as built, so this is the inverse of `g_raw` even
    /// after normalization.
    fn connection_inverse(&self) -> Result<Matrix> {
        if self.e_norm.is_none() {
            return Ok(self.inverse_metric()?.clone());
        }
        let (inverse, _) = self.invert(&self.g_raw)?;
        Ok(inverse)
    }

    /// Inverse of the working metric, memoized.
    pub fn inverse_metric(&self) -> Result<&Matrix> {
        if let Some(inverse) = self.g_inv.get() {
            return Ok(inverse);
        }
        let _perf = perf_span!("inverse_metric", dim = self.n);
        let ((inverse, symbolic_det), duration_us) = timed_block!("g_inv", { self.invert(&self.g)? });
        if let Some((detg, g_adj)) = symbolic_det {
            let _ = self.detg.set(detg);
            let _ = self.g_adj.set(g_adj);
        }
        performance::record_tensor_stage("g_inv", self.n, self.n * self.n, duration_us);
        if self.debug {
            info!(metric = %self.name, "g^{{-1}} = {inverse}");
        }
        Ok(self.g_inv.get_or_init(|| inverse))
    }

    /// Inverse of `g`, plus the placeholder determinant and adjugate when the
    /// inverse is expressed through `gsym`.
    #[allow(clippy::type_complexity)]
    fn invert(&self, g: &Matrix) -> Result<(Matrix, Option<(Expr, Matrix)>)> {
        if self.is_ortho {
            let mut diagonal = Vec::with_capacity(self.n);
            for i in 0..self.n {
                let entry = &g[(i, i)];
                if entry.is_zero() {
                    return Err(SymbolicError::Singular.into());
                }
                diagonal.push(Expr::pow(entry.clone(), Expr::int(-1)));
            }
            return Ok((Matrix::diagonal(diagonal), None));
        }

        match &self.gsym {
            None => Ok((g.inverse()?, None)),
            Some(s) => {
                let coords = self
                    .coords
                    .as_deref()
                    .ok_or(MetricError::MissingCoordinates("for a symbolic determinant"))?;
                let detg = Expr::func(format!("|{s}|"), coords.iter().map(Expr::from).collect());
                let g_adj = g.adjugate()?.simplify();
                let inv_det = Expr::pow(detg.clone(), Expr::int(-1));
                let inverse = g_adj.map(|a| a * &inv_det);
                debug!(metric = %self.name, detg = %detg, "inverse expressed through symbolic determinant");
                Ok((inverse, Some((detg, g_adj))))
            }
        }
    }

    /// Differentiate the metric, set the connection flag and, when the
    /// connection is non-zero, compute `∂_i e_j = Γ_ijk e^k`.
    pub(crate) fn derivatives_of_basis(&mut self) -> Result<()> {
        let _perf = perf_span!("derivatives_of_basis", dim = self.n);
        let start = Instant::now();
        let dg = self.derivatives_of_g()?;
        performance::record_tensor_stage("dg", self.n, self.n.pow(3), start.elapsed().as_micros() as u64);
        self.connect_flg = connection_flag(&dg);
        self.dg = Some(dg);
        debug!(metric = %self.name, connect_flg = self.connect_flg, "metric derivatives computed");

        if !self.connect_flg {
            self.de = None;
            return Ok(());
        }

        let de: Vec<Vec<Expr>> = {
            let Some(gamma1) = self.christoffel_symbols(ChristoffelKind::First)? else {
                return Ok(());
            };
            gamma1
                .iter()
                .map(|plane| {
                    plane
                        .iter()
                        .map(|row| Expr::add(row.iter().zip(&self.r_symbols).map(|(gamma, e)| gamma * e).collect()))
                        .collect()
                })
                .collect()
        };

        for (i, row) in de.iter().enumerate() {
            for (j, d) in row.iter().enumerate() {
                trace!(metric = %self.name, i, j, de = %d, "basis derivative");
            }
        }
        if self.debug {
            let rows: Vec<String> = de.iter().map(|row| format!("[{}]", join(row))).collect();
            info!(metric = %self.name, "D_{{i}}e^{{j}} = [{}]", rows.join(", "));
        }
        self.de = Some(de);
        Ok(())
    }
}
