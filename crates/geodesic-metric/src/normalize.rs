//! Rescaling an orthogonal basis to unit length.

use crate::error::{MetricError, Result};
use crate::metric::{join, Metric};
use geodesic_symbolic::{diff, expand, Expr};
use tracing::{debug, info};

impl Metric {
    /// Rescale the basis derivatives and the working metric by the lengths in
    /// `e_norm`. `g_raw` keeps the metric as built.
    pub(crate) fn normalize_metric(&mut self) -> Result<()> {
        if !self.is_ortho {
            return Err(MetricError::NonOrthogonalNormalization);
        }
        let Some(e_norm) = self.e_norm.clone() else {
            return Ok(());
        };
        if let Some(i) = e_norm.iter().position(|norm| expand(norm).is_zero()) {
            return Err(MetricError::ZeroNorm {
                basis: self.basis_names[i].clone(),
            });
        }
        let n = self.n;

        if let (Some(de), Some(coords)) = (self.de.as_mut(), self.coords.as_deref()) {
            // e^i -> e^i / |e_i|
            let renorm: Vec<(Expr, Expr)> = self
                .r_symbols
                .iter()
                .zip(&e_norm)
                .map(|(e, norm)| (e.clone(), e / norm))
                .collect();

            for (i, row) in de.iter_mut().enumerate() {
                for (j, d) in row.iter_mut().enumerate() {
                    let rescaled = d.subs(&renorm) - diff(&e_norm[j], &coords[i]) * &self.basis[j];
                    *d = self.simp.apply(&(rescaled / &e_norm[j]));
                }
            }
            if self.debug {
                for (i, row) in de.iter().enumerate() {
                    for (j, d) in row.iter().enumerate() {
                        info!(metric = %self.name, "D_{{{}}} e_{} = {d}", coords[i], self.basis_names[j]);
                    }
                }
            }
        }

        for i in 0..n {
            for j in 0..n {
                let scaled = &self.g[(i, j)] / (&e_norm[i] * &e_norm[j]);
                self.g[(i, j)] = self.simp.apply(&scaled);
            }
        }
        if self.debug {
            info!(metric = %self.name, "e^{{i}} -> e^{{i}}/|e_{{i}}| with |e_{{i}}| = {}", join(&e_norm));
            info!(metric = %self.name, "renorm(g) = {}", self.g);
        }
        debug!(metric = %self.name, "basis normalized");
        Ok(())
    }
}
