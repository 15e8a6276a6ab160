//! Distribution of products over sums.

use crate::expr::Expr;

/// Fully distribute products over sums and multiply out positive integer
/// powers of sums. Non-commutative factors keep their left-to-right order.
pub fn expand(e: &Expr) -> Expr {
    match e {
        Expr::Num(_) | Expr::Sym(_) => e.clone(),
        Expr::Add(terms) => Expr::add(terms.iter().map(expand).collect()),
        Expr::Mul(factors) => factors
            .iter()
            .map(expand)
            .fold(Expr::one(), |acc, f| distribute(&acc, &f)),
        Expr::Pow(base, exp) => expand_pow(&expand(base), &expand(exp)),
        Expr::Func(..) | Expr::Deriv { .. } => e.map_children(&mut expand),
    }
}

/// `a * b` with both operands already expanded.
fn distribute(a: &Expr, b: &Expr) -> Expr {
    let left = a.terms();
    let right = b.terms();
    let mut out = Vec::with_capacity(left.len() * right.len());
    for l in &left {
        for r in &right {
            out.push(Expr::mul(vec![l.clone(), r.clone()]));
        }
    }
    Expr::add(out)
}

fn expand_pow(base: &Expr, exp: &Expr) -> Expr {
    match (base, exp.as_integer()) {
        (Expr::Add(_), Some(n)) if n > 0 => (1..n).fold(base.clone(), |acc, _| distribute(&acc, base)),
        (Expr::Add(_), Some(n)) if n < 0 => Expr::pow(expand_pow(base, &Expr::int(-n)), Expr::int(-1)),
        _ => match Expr::pow(base.clone(), exp.clone()) {
            // a distributed power of a product may expose powers of sums
            Expr::Mul(factors) => factors
                .iter()
                .map(expand)
                .fold(Expr::one(), |acc, f| distribute(&acc, &f)),
            other => other,
        },
    }
}
