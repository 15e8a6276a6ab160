//! Metric specification strings.
//!
//! Rows are separated by `,` and entries within a row by whitespace. A single
//! row describes a diagonal metric. Each entry is `#` for the default symbol
//! `(e_i.e_j)`, a fraction `num/den`, or a decimal or integer literal.
//!
//! ```text
//! "1 1 1"            diag(1, 1, 1)
//! "# # #"            diag((e1.e1), (e2.e2), (e3.e3))
//! "1 # 0,# 1 0,0 0 -1"
//! ```

use crate::error::{MetricError, Result};
use geodesic_symbolic::number::parse_rational;
use geodesic_symbolic::{Expr, Matrix};

/// Default symbol for `g[i, j]`; the earlier basis name always comes first so
/// the result is symmetric.
pub fn default_metric_symbol(basis_names: &[String], i: usize, j: usize) -> Expr {
    let (a, b) = if i <= j { (i, j) } else { (j, i) };
    Expr::sym(format!("({}.{})", basis_names[a], basis_names[b]))
}

/// Fully symbolic default metric: every entry is a `(e_i.e_j)` symbol.
pub fn default_metric(basis_names: &[String]) -> Matrix {
    let n = basis_names.len();
    Matrix::from_fn(n, n, |i, j| default_metric_symbol(basis_names, i, j))
}

/// Parse `spec` into an `n × n` matrix where `n = basis_names.len()`.
pub fn parse_metric_spec(spec: &str, basis_names: &[String]) -> Result<Matrix> {
    let n = basis_names.len();
    let rows: Vec<Vec<&str>> = spec.split(',').map(|row| row.split_whitespace().collect()).collect();

    if rows.len() == 1 {
        let entries = &rows[0];
        if entries.len() != n {
            return Err(MetricError::ShapeMismatch(format!(
                "metric '{spec}' has {} diagonal entries but the basis has {n} vectors",
                entries.len()
            )));
        }
        let diagonal = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| parse_element(entry, basis_names, i, i))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Matrix::diagonal(diagonal));
    }

    let n_rows = rows.len();
    if let Some(row) = rows.iter().find(|row| row.len() != n_rows) {
        return Err(MetricError::ShapeMismatch(format!(
            "metric '{spec}' is not square: {n_rows} rows but a row with {} entries",
            row.len()
        )));
    }
    if n_rows != n {
        return Err(MetricError::ShapeMismatch(format!(
            "metric '{spec}' has rank {n_rows} but the basis has {n} vectors"
        )));
    }

    let mut entries = Vec::with_capacity(n);
    for (i, row) in rows.iter().enumerate() {
        entries.push(
            row.iter()
                .enumerate()
                .map(|(j, entry)| parse_element(entry, basis_names, i, j))
                .collect::<Result<Vec<_>>>()?,
        );
    }
    Ok(Matrix::from_rows(entries)?)
}

fn parse_element(entry: &str, basis_names: &[String], i: usize, j: usize) -> Result<Expr> {
    if entry == "#" {
        return Ok(default_metric_symbol(basis_names, i, j));
    }
    parse_rational(entry)
        .map(Expr::Num)
        .ok_or_else(|| MetricError::InvalidMetricElement(entry.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("e{i}")).collect()
    }

    #[test]
    fn single_row_is_diagonal() {
        let g = parse_metric_spec("1 1 1", &names(3)).unwrap();
        assert_eq!(g, Matrix::identity(3));

        let g = parse_metric_spec("1 -1 1/2", &names(3)).unwrap();
        assert_eq!(g[(1, 1)], Expr::int(-1));
        assert_eq!(g[(2, 2)], Expr::rational(1, 2));
        assert!(g[(0, 1)].is_zero());
    }

    #[test]
    fn hash_entries_are_symmetric_symbols() {
        let g = parse_metric_spec("# # #,# # #,# # #", &names(3)).unwrap();
        assert_eq!(g[(0, 2)], Expr::sym("(e1.e3)"));
        assert_eq!(g[(2, 0)], Expr::sym("(e1.e3)"));
        assert_eq!(g[(1, 1)], Expr::sym("(e2.e2)"));
        assert!(g.is_symmetric());
        assert_eq!(g, default_metric(&names(3)));
    }

    #[test]
    fn full_rows_accept_decimals() {
        let g = parse_metric_spec("1 0.5,0.5 1", &names(2)).unwrap();
        assert_eq!(g[(0, 1)], Expr::half());
    }

    #[test]
    fn shape_errors() {
        assert!(matches!(parse_metric_spec("1 1", &names(3)), Err(MetricError::ShapeMismatch(_))));
        assert!(matches!(parse_metric_spec("1 0 0,0 1", &names(2)), Err(MetricError::ShapeMismatch(_))));
        assert!(matches!(parse_metric_spec("1 0,0 1", &names(3)), Err(MetricError::ShapeMismatch(_))));
    }

    #[test]
    fn bad_elements_are_rejected() {
        let err = parse_metric_spec("1 x", &names(2)).unwrap_err();
        assert!(matches!(err, MetricError::InvalidMetricElement(ref e) if e == "x"));
    }
}
