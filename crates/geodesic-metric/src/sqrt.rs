//! Positive square roots of metric entries.

use geodesic_symbolic::{sqf_list, trigsimp, Expr};

/// Square root of `expr`, taking the root of each even-power factor.
///
/// - a number yields the root of its absolute value
/// - a product of even powers yields the product with every exponent halved
/// - anything with an odd-power factor yields `sqrt(abs(expr))`
///
/// A non-unit constant is replaced by its own root, recursively for numbers
/// and as `sqrt(abs(c))` otherwise.
pub fn square_root_of_expr(expr: &Expr) -> Expr {
    if expr.is_number() {
        return match expr.is_positive() {
            Some(true) => Expr::sqrt(expr.clone()),
            _ => Expr::sqrt(-expr),
        };
    }

    let simplified = trigsimp(expr);
    let sqf = sqf_list(&simplified);

    let mut root = if sqf.coeff.is_one() {
        Expr::one()
    } else if sqf.coeff.is_number() {
        square_root_of_expr(&sqf.coeff)
    } else {
        Expr::sqrt(Expr::abs(sqf.coeff.clone()))
    };

    for (factor, k) in sqf.factors {
        if k % 2 != 0 {
            return Expr::sqrt(Expr::abs(simplified));
        }
        root = root * Expr::pow(factor, Expr::int(k / 2));
    }
    root
}
