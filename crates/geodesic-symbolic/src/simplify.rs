//! General-purpose simplification.

use crate::expand::expand;
use crate::expr::Expr;
use crate::poly::PolyRing;
use crate::trig::trigsimp;
use std::collections::BTreeMap;
use tracing::trace;

/// Expand, bring the terms over a common denominator, cancel every
/// denominator factor that divides the numerator exactly, apply
/// [`trigsimp`], and return the least complex of the input, its expansion and
/// that result.
pub fn simplify(e: &Expr) -> Expr {
    if matches!(e, Expr::Num(_) | Expr::Sym(_)) {
        return e.clone();
    }

    let expanded = expand(e);
    let result = if e.is_commutative() {
        combine_and_cancel(&expanded)
    } else {
        expanded.clone()
    };

    let chosen = [result, expanded, e.clone()]
        .into_iter()
        .enumerate()
        .min_by_key(|(i, c)| (c.complexity(), *i))
        .map(|(_, c)| c)
        .unwrap_or_else(|| e.clone());

    trace!(before = e.complexity(), after = chosen.complexity(), "simplify");
    chosen
}

/// Numerator factors and negative-integer-power denominator factors of a term.
fn split_fraction(term: &Expr) -> (Expr, BTreeMap<Expr, i64>) {
    let mut numerator = Vec::new();
    let mut denominator = BTreeMap::new();
    for factor in term.factors() {
        if let Expr::Pow(base, exp) = &factor {
            if let Some(k) = exp.as_integer().filter(|k| *k < 0) {
                *denominator.entry((**base).clone()).or_insert(0) -= k;
                continue;
            }
        }
        numerator.push(factor);
    }
    (Expr::mul(numerator), denominator)
}

fn combine_and_cancel(expanded: &Expr) -> Expr {
    let parts: Vec<_> = expanded.terms().iter().map(split_fraction).collect();

    let mut common: BTreeMap<Expr, i64> = BTreeMap::new();
    for (_, den) in &parts {
        for (base, k) in den {
            let slot = common.entry(base.clone()).or_insert(0);
            *slot = (*slot).max(*k);
        }
    }
    if common.is_empty() {
        return trigsimp(expanded);
    }

    let numerator = Expr::add(
        parts
            .into_iter()
            .map(|(num, den)| {
                let mut factors = vec![num];
                for (base, k) in &common {
                    let missing = k - den.get(base).copied().unwrap_or(0);
                    if missing > 0 {
                        factors.push(Expr::pow(base.clone(), Expr::int(missing)));
                    }
                }
                expand(&Expr::mul(factors))
            })
            .collect(),
    );
    let mut numerator = trigsimp(&numerator);
    if numerator.is_zero() {
        return numerator;
    }

    let mut remaining = Vec::new();
    for (base, mut k) in common {
        let divisor = expand(&base);
        while k > 0 {
            match PolyRing::divide(&numerator, &divisor) {
                Some(q) => {
                    numerator = q;
                    k -= 1;
                }
                None => break,
            }
        }
        if k > 0 {
            remaining.push(Expr::pow(base, Expr::int(-k)));
        }
    }

    remaining.insert(0, numerator);
    Expr::mul(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::sym("x")
    }

    fn sq(e: Expr) -> Expr {
        Expr::pow(e, Expr::int(2))
    }

    #[test]
    fn cancels_polynomial_factors() {
        let e = (sq(x()) - Expr::one()) / (x() - Expr::one());
        assert_eq!(simplify(&e), x() + Expr::one());
    }

    #[test]
    fn combines_over_common_denominator() {
        let e = x() / (x() + Expr::one()) + Expr::one() / (x() + Expr::one());
        assert_eq!(simplify(&e), Expr::one());
    }

    #[test]
    fn symbolic_inverse_entry() {
        let (a, b, c) = (Expr::sym("a"), Expr::sym("b"), Expr::sym("c"));
        let det = &a * &c - sq(b.clone());
        // (a*c)/det - b²/det
        let e = &a * &c / &det - sq(b) / &det;
        assert_eq!(simplify(&e), Expr::one());
    }

    #[test]
    fn applies_trig_identity() {
        let th = Expr::sym("th");
        let r = Expr::sym("r");
        let e = sq(r.clone()) * sq(Expr::sin(th.clone())) + sq(r.clone()) * sq(Expr::cos(th));
        assert_eq!(simplify(&e), sq(r));
    }

    #[test]
    fn keeps_compact_input() {
        let e = sq(x() + Expr::one());
        assert_eq!(simplify(&e), e);
    }

    #[test]
    fn prefers_the_shorter_expanded_form() {
        let r = Expr::sym("r");
        let e = (Expr::pow(r.clone(), Expr::int(3)) + r.clone()) / Expr::pow(r.clone(), Expr::int(3));
        assert_eq!(simplify(&e), Expr::one() + Expr::pow(r, Expr::int(-2)));
    }

    #[test]
    fn keeps_input_when_nothing_cancels() {
        let e = Expr::one() / (x() + Expr::one()) + x();
        assert_eq!(simplify(&e), e);
    }
}
