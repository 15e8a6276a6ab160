//! Pythagorean trigonometric simplification.

use crate::expand::expand;
use crate::expr::Expr;
use num_traits::Signed;

const TRIG: &[&str] = &["sin", "cos"];

/// Rewrite even powers of `sin`/`cos` through `sin² + cos² = 1` and keep the
/// shortest of the candidate forms.
///
/// Candidates, in order of preference on ties: the input, its expansion, the
/// expansion with every `sin^(2k)` replaced by `(1 - cos²)^k`, and the
/// expansion with every `cos^(2k)` replaced by `(1 - sin²)^k`. Shortest means
/// fewest additive terms, then fewest nodes.
pub fn trigsimp(e: &Expr) -> Expr {
    if !e.has_function(TRIG) {
        return e.clone();
    }
    if let Expr::Pow(base, exp) = e {
        if exp.as_number().is_some_and(Signed::is_negative) {
            return Expr::pow(trigsimp(base), (**exp).clone());
        }
    }

    let expanded = expand(e);
    let cos_form = expand(&rewrite_even_powers(&expanded, "sin", "cos"));
    let sin_form = expand(&rewrite_even_powers(&expanded, "cos", "sin"));

    [e.clone(), expanded, cos_form, sin_form]
        .into_iter()
        .enumerate()
        .min_by_key(|(i, c)| (c.terms().len(), c.complexity(), *i))
        .map(|(_, c)| c)
        .unwrap_or_else(|| e.clone())
}

/// Replace `from(a)^(2k)` by `(1 - to(a)^2)^k` everywhere in `e`.
fn rewrite_even_powers(e: &Expr, from: &str, to: &str) -> Expr {
    if let Expr::Pow(base, exp) = e {
        if let (Expr::Func(name, args), Some(n)) = (base.as_ref(), exp.as_integer()) {
            if name == from && n > 0 && n % 2 == 0 && args.len() == 1 {
                let other = Expr::func(to, args.clone());
                let identity = Expr::one() - Expr::pow(other, Expr::int(2));
                return Expr::pow(identity, Expr::int(n / 2));
            }
        }
    }
    e.map_children(&mut |child| rewrite_even_powers(child, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th() -> Expr {
        Expr::sym("th")
    }

    fn sq(e: Expr) -> Expr {
        Expr::pow(e, Expr::int(2))
    }

    #[test]
    fn pythagorean_identity() {
        let e = sq(Expr::sin(th())) + sq(Expr::cos(th()));
        assert_eq!(trigsimp(&e), Expr::one());
    }

    #[test]
    fn picks_the_single_term_form() {
        let r = Expr::sym("r");
        let e = sq(r.clone()) - sq(r.clone()) * sq(Expr::cos(th()));
        assert_eq!(trigsimp(&e), sq(r) * sq(Expr::sin(th())));
    }

    #[test]
    fn leaves_trig_free_input_alone() {
        let e = Expr::sym("x") + Expr::one();
        assert_eq!(trigsimp(&e), e);
    }

    #[test]
    fn simplifies_under_negative_powers() {
        let e = Expr::pow(sq(Expr::sin(th())) + sq(Expr::cos(th())) + Expr::one(), Expr::int(-1));
        assert_eq!(trigsimp(&e), Expr::half());
    }

    #[test]
    fn spherical_embedding_component() {
        // sin²θ sin²φ + sin²θ cos²φ
        let ph = Expr::sym("ph");
        let e = sq(Expr::sin(th())) * sq(Expr::sin(ph.clone())) + sq(Expr::sin(th())) * sq(Expr::cos(ph));
        assert_eq!(trigsimp(&e), sq(Expr::sin(th())));
    }
}
