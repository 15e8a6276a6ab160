//! Square-free factor lists.

use crate::expand::expand;
use crate::expr::Expr;
use crate::number::{self, Rational};
use num_traits::{One, Signed};
use std::collections::BTreeMap;

/// `coeff · Π factor^exponent`.
#[derive(Clone, Debug, PartialEq)]
pub struct SqfList {
    pub coeff: Expr,
    pub factors: Vec<(Expr, i64)>,
}

impl SqfList {
    pub fn to_expr(&self) -> Expr {
        let mut parts = vec![self.coeff.clone()];
        parts.extend(self.factors.iter().map(|(f, k)| Expr::pow(f.clone(), Expr::int(*k))));
        Expr::mul(parts)
    }
}

/// Factor `e` into a constant and powers of factors, reading product and
/// power structure and pulling the monomial content out of sums.
///
/// Sums are not factored beyond their content: `x² + 2x + 1` stays a single
/// factor with exponent one.
pub fn sqf_list(e: &Expr) -> SqfList {
    let mut out = SqfList {
        coeff: Expr::one(),
        factors: Vec::new(),
    };
    collect(e, 1, &mut out);
    out.factors.retain(|(_, k)| *k != 0);
    out
}

fn push(out: &mut SqfList, factor: Expr, k: i64) {
    match out.factors.iter_mut().find(|(f, _)| *f == factor) {
        Some((_, existing)) => *existing += k,
        None => out.factors.push((factor, k)),
    }
}

fn collect(e: &Expr, mult: i64, out: &mut SqfList) {
    match e {
        Expr::Num(_) => out.coeff = &out.coeff * Expr::pow(e.clone(), Expr::int(mult)),
        Expr::Mul(factors) => factors.iter().for_each(|f| collect(f, mult, out)),
        Expr::Pow(base, exp) => match exp.as_integer() {
            Some(k) => collect(base, mult * k, out),
            None => push(out, e.clone(), mult),
        },
        Expr::Add(_) => {
            let (content, monomial, primitive) = extract_content(e);
            out.coeff = &out.coeff * Expr::pow(Expr::Num(content), Expr::int(mult));
            for (atom, k) in monomial {
                push(out, atom, k * mult);
            }
            if !primitive.is_one() {
                push(out, primitive, mult);
            }
        }
        _ => push(out, e.clone(), mult),
    }
}

fn term_powers(term: &Expr) -> BTreeMap<Expr, i64> {
    let mut powers = BTreeMap::new();
    for factor in term.split_coeff().1.factors() {
        match &factor {
            Expr::Num(_) => {}
            Expr::Pow(b, exp) if exp.as_integer().is_some_and(|k| k > 0) => {
                *powers.entry((**b).clone()).or_insert(0) += exp.as_integer().unwrap_or(1);
            }
            other => *powers.entry(other.clone()).or_insert(0) += 1,
        }
    }
    powers
}

/// `(content, common monomial, primitive part)` of a sum.
fn extract_content(sum: &Expr) -> (Rational, Vec<(Expr, i64)>, Expr) {
    let terms = sum.terms();
    let coeffs: Vec<Rational> = terms.iter().map(|t| t.split_coeff().0).collect();

    let mut content = coeffs
        .iter()
        .fold(Rational::from_integer(0.into()), |g, c| number::gcd(&g, c));
    if coeffs.iter().all(Signed::is_negative) {
        content = -content;
    }

    let mut common: Option<BTreeMap<Expr, i64>> = None;
    for term in &terms {
        let powers = term_powers(term);
        common = Some(match common {
            None => powers,
            Some(prev) => prev
                .into_iter()
                .filter_map(|(atom, k)| powers.get(&atom).map(|j| (atom, k.min(*j))))
                .collect(),
        });
    }
    let monomial: Vec<(Expr, i64)> = common.unwrap_or_default().into_iter().collect();

    if content.is_one() && monomial.is_empty() {
        return (content, monomial, sum.clone());
    }

    let mut divisor = vec![sum.clone(), Expr::Num(content.recip())];
    divisor.extend(monomial.iter().map(|(atom, k)| Expr::pow(atom.clone(), Expr::int(-k))));
    (content, monomial, expand(&Expr::mul(divisor)))
}
