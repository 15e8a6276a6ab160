//! Sparse multivariate polynomials used for exact cancellation.
//!
//! Any factor of a term that is not a positive integer power is treated as an
//! opaque atom, so `sin(th)`, `g_r_r(r)` and `r^(1/2)` are all variables here.

use crate::expr::Expr;
use crate::number::Rational;
use num_traits::Zero;
use std::collections::BTreeMap;

/// Exponent vector, one slot per ring atom. Compared lexicographically.
type Monomial = Vec<u32>;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Poly {
    terms: BTreeMap<Monomial, Rational>,
}

impl Poly {
    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    fn leading(&self) -> Option<(&Monomial, &Rational)> {
        self.terms.iter().next_back()
    }

    fn add_term(&mut self, m: Monomial, c: Rational) {
        let slot = self.terms.entry(m).or_insert_with(Rational::zero);
        *slot += c;
        if slot.is_zero() {
            self.terms.retain(|_, v| !v.is_zero());
        }
    }

    fn pad(&mut self, width: usize) {
        let terms = std::mem::take(&mut self.terms);
        for (mut m, c) in terms {
            m.resize(width, 0);
            self.terms.insert(m, c);
        }
    }

    /// `self - m·c·other`
    fn sub_scaled(&mut self, other: &Poly, m: &Monomial, c: &Rational) {
        for (om, oc) in &other.terms {
            let prod: Monomial = om.iter().zip(m).map(|(a, b)| a + b).collect();
            self.add_term(prod, -(oc * c));
        }
    }

    /// Exact division. `None` as soon as a leading term fails to divide,
    /// which under a monomial order means `divisor` does not divide `self`.
    pub(crate) fn div_exact(&self, divisor: &Poly) -> Option<Poly> {
        let (lm_d, lc_d) = divisor.leading()?;
        let (lm_d, lc_d) = (lm_d.clone(), lc_d.clone());
        let mut rem = self.clone();
        let mut quotient = Poly::default();

        while let Some((lm_r, lc_r)) = rem.leading() {
            if lm_r.iter().zip(&lm_d).any(|(r, d)| r < d) {
                return None;
            }
            let m: Monomial = lm_r.iter().zip(&lm_d).map(|(r, d)| r - d).collect();
            let c = lc_r / &lc_d;
            rem.sub_scaled(divisor, &m, &c);
            quotient.add_term(m, c);
        }
        Some(quotient)
    }
}

/// Atom table shared by the polynomials taking part in one computation.
#[derive(Debug, Default)]
pub(crate) struct PolyRing {
    atoms: Vec<Expr>,
}

impl PolyRing {
    fn index(&mut self, atom: &Expr) -> usize {
        match self.atoms.iter().position(|a| a == atom) {
            Some(i) => i,
            None => {
                self.atoms.push(atom.clone());
                self.atoms.len() - 1
            }
        }
    }

    /// Read an expanded commutative expression as a polynomial over the ring's
    /// atoms, registering new atoms as they appear.
    pub(crate) fn to_poly(&mut self, e: &Expr) -> Poly {
        let mut poly = Poly::default();
        for term in e.terms() {
            let (c, rest) = term.split_coeff();
            let mut m: Monomial = Vec::new();
            for factor in rest.factors() {
                let (atom, k) = match &factor {
                    Expr::Num(_) => continue,
                    Expr::Pow(b, exp) => match exp.as_integer().and_then(|k| u32::try_from(k).ok()) {
                        Some(k) if k > 0 => ((**b).clone(), k),
                        _ => (factor.clone(), 1),
                    },
                    other => (other.clone(), 1),
                };
                let i = self.index(&atom);
                if m.len() <= i {
                    m.resize(i + 1, 0);
                }
                m[i] += k;
            }
            poly.add_term(m, c);
        }
        poly
    }

    pub(crate) fn to_expr(&self, p: &Poly) -> Expr {
        Expr::add(
            p.terms
                .iter()
                .map(|(m, c)| {
                    let mut factors = vec![Expr::Num(c.clone())];
                    for (atom, &k) in self.atoms.iter().zip(m) {
                        if k > 0 {
                            factors.push(Expr::pow(atom.clone(), Expr::int(k.into())));
                        }
                    }
                    Expr::mul(factors)
                })
                .collect(),
        )
    }

    /// Exact quotient `numerator / divisor` of two expanded expressions.
    pub(crate) fn divide(numerator: &Expr, divisor: &Expr) -> Option<Expr> {
        let mut ring = PolyRing::default();
        let mut n = ring.to_poly(numerator);
        let mut d = ring.to_poly(divisor);
        if d.is_zero() {
            return None;
        }
        let width = ring.atoms.len();
        n.pad(width);
        d.pad(width);
        n.div_exact(&d).map(|q| ring.to_expr(&q))
    }
}
