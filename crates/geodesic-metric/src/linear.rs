//! Decomposition of an expression into scalar coefficients times basis atoms.

use geodesic_symbolic::{expand, Expr};
use tracing::warn;

/// Ordered `(coefficient, basis)` pairs. The scalar unit `1` is the basis of
/// every purely commutative term. Each basis appears once, in order of first
/// occurrence among the expanded terms.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearExpansion {
    pairs: Vec<(Expr, Expr)>,
}

impl LinearExpansion {
    pub fn pairs(&self) -> &[(Expr, Expr)] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<(Expr, Expr)> {
        self.pairs
    }

    pub fn coefficients(&self) -> Vec<Expr> {
        self.pairs.iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn bases(&self) -> Vec<Expr> {
        self.pairs.iter().map(|(_, b)| b.clone()).collect()
    }

    pub fn coefficient_of(&self, basis: &Expr) -> Option<&Expr> {
        self.pairs.iter().find(|(_, b)| b == basis).map(|(c, _)| c)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `Σ coefficient · basis`.
    pub fn reconstruct(&self) -> Expr {
        Expr::add(self.pairs.iter().map(|(c, b)| c * b).collect())
    }
}

/// Expand `expr` and split it into coefficient/basis pairs.
///
/// A term is expected to hold at most one non-commutative factor. When it
/// holds several, the ordered product of all of them is used as the basis so
/// that [`LinearExpansion::reconstruct`] stays exact, and a warning is logged.
pub fn linear_expand(expr: &Expr) -> LinearExpansion {
    let expanded = expand(expr);
    if expanded.is_zero() {
        return LinearExpansion {
            pairs: vec![(Expr::zero(), Expr::one())],
        };
    }

    let mut bases: Vec<Expr> = Vec::new();
    let mut coefficient_terms: Vec<Vec<Expr>> = Vec::new();

    for term in expanded.terms() {
        let (coefficient, basis) = if term.is_commutative() {
            (term, Expr::one())
        } else {
            let (c, nc) = term.args_cnc();
            if nc.len() > 1 {
                warn!(term = %term, factors = nc.len(), "term has several non-commutative factors; using their product as the basis");
            }
            (Expr::mul(c), Expr::mul(nc))
        };

        match bases.iter().position(|b| *b == basis) {
            Some(i) => coefficient_terms[i].push(coefficient),
            None => {
                bases.push(basis);
                coefficient_terms.push(vec![coefficient]);
            }
        }
    }

    LinearExpansion {
        pairs: coefficient_terms.into_iter().map(Expr::add).zip(bases).collect(),
    }
}

/// Project `expr` onto `atoms`: the sum of `coefficient · atom` over the atoms
/// that occur in its expansion. Terms on any other basis are dropped.
pub fn collect(expr: &Expr, atoms: &[Expr]) -> Expr {
    let expansion = linear_expand(expr);
    Expr::add(
        atoms
            .iter()
            .filter_map(|atom| expansion.coefficient_of(atom).map(|c| c * atom))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn e(i: usize) -> Expr {
        Expr::nc_sym(format!("e_{i}"))
    }

    fn x() -> Expr {
        Expr::sym("x")
    }

    #[test]
    fn zero_expands_to_scalar_zero() {
        let exp = linear_expand(&(e(1) - e(1)));
        assert_eq!(exp.pairs(), &[(Expr::zero(), Expr::one())]);
    }

    #[test]
    fn scalar_terms_share_the_unit_basis() {
        let expr = x() + Expr::int(2) + Expr::int(3) * x() * e(1);
        let exp = linear_expand(&expr);
        assert_eq!(exp.coefficient_of(&Expr::one()), Some(&(x() + Expr::int(2))));
        assert_eq!(exp.coefficient_of(&e(1)), Some(&(Expr::int(3) * x())));
        assert_eq!(exp.len(), 2);
    }

    #[test]
    fn coefficients_on_the_same_basis_are_summed() {
        let expr = x() * (e(1) + e(2)) + Expr::int(2) * e(1);
        let exp = linear_expand(&expr);
        assert_eq!(exp.coefficient_of(&e(1)), Some(&(x() + Expr::int(2))));
        assert_eq!(exp.coefficient_of(&e(2)), Some(&x()));
        assert_eq!(expand(&exp.reconstruct()), expand(&expr));
    }

    #[test]
    fn several_noncommutative_factors_keep_their_product() {
        let expr = x() * e(1) * e(2);
        let exp = linear_expand(&expr);
        assert_eq!(exp.bases(), vec![&e(1) * &e(2)]);
        assert_eq!(exp.coefficients(), vec![x()]);
        assert_eq!(exp.reconstruct(), expr);
    }

    #[test]
    fn collect_projects_onto_requested_atoms() {
        let expr = x() * e(1) + e(2) + Expr::int(5);
        assert_eq!(collect(&expr, &[e(1)]), x() * e(1));
        assert_eq!(collect(&expr, &[e(1), e(2)]), x() * e(1) + e(2));
        assert!(collect(&expr, &[e(3)]).is_zero());
    }

    fn combination() -> impl Strategy<Value = Expr> {
        prop::collection::vec((-4i64..=4, 0usize..3, 0u32..=2), 1..6).prop_map(|terms| {
            Expr::add(
                terms
                    .into_iter()
                    .map(|(c, b, p)| {
                        let coeff = Expr::int(c) * Expr::pow(x(), Expr::int(p.into()));
                        if b == 0 {
                            coeff
                        } else {
                            coeff * e(b)
                        }
                    })
                    .collect(),
            )
        })
    }

    proptest! {
        #[test]
        fn reconstruction_round_trips(expr in combination()) {
            let exp = linear_expand(&expr);
            prop_assert!(expand(&(exp.reconstruct() - &expr)).is_zero());
            let bases = exp.bases();
            for (i, b) in bases.iter().enumerate() {
                prop_assert!(!bases[..i].contains(b));
            }
        }

        #[test]
        fn projection_is_idempotent(expr in combination()) {
            let atoms = [e(1), e(2)];
            let once = collect(&expr, &atoms);
            prop_assert_eq!(collect(&once, &atoms), once);
        }
    }
}
