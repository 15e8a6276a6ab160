//! Partial differentiation.

use crate::expr::{Expr, Symbol};

/// `∂e/∂var`. Undefined functions differentiate to [`Expr::Deriv`] nodes via
/// the chain rule over their arguments.
pub fn diff(e: &Expr, var: &Symbol) -> Expr {
    if !e.has_symbol(var) {
        return Expr::zero();
    }
    match e {
        Expr::Num(_) => Expr::zero(),
        Expr::Sym(s) => {
            if s == var {
                Expr::one()
            } else {
                Expr::zero()
            }
        }
        Expr::Add(terms) => Expr::add(terms.iter().map(|t| diff(t, var)).collect()),
        Expr::Mul(factors) => {
            // product rule, keeping factor order for non-commutative operands
            let mut terms = Vec::with_capacity(factors.len());
            for (i, f) in factors.iter().enumerate() {
                let df = diff(f, var);
                if df.is_zero() {
                    continue;
                }
                let mut replaced = factors.clone();
                replaced[i] = df;
                terms.push(Expr::mul(replaced));
            }
            Expr::add(terms)
        }
        Expr::Pow(base, exp) => {
            let db = diff(base, var);
            if !exp.has_symbol(var) {
                let lowered = Expr::pow((**base).clone(), &**exp - Expr::one());
                return Expr::mul(vec![(**exp).clone(), lowered, db]);
            }
            let de = diff(exp, var);
            let log_b = Expr::func("log", vec![(**base).clone()]);
            e * (de * log_b + &**exp * db / &**base)
        }
        Expr::Func(name, args) => diff_func(name, args, var),
        Expr::Deriv { name, args, wrt } => Expr::add(
            args.iter()
                .enumerate()
                .map(|(k, a)| {
                    let mut wrt = wrt.clone();
                    wrt.push(k);
                    Expr::derivative(name.clone(), args.clone(), wrt) * diff(a, var)
                })
                .collect(),
        ),
    }
}

fn diff_func(name: &str, args: &[Expr], var: &Symbol) -> Expr {
    if let [a] = args {
        let da = diff(a, var);
        let outer = match name {
            "sin" => Some(Expr::cos(a.clone())),
            "cos" => Some(-Expr::sin(a.clone())),
            "tan" => Some(Expr::one() + Expr::pow(Expr::func("tan", vec![a.clone()]), Expr::int(2))),
            "exp" => Some(Expr::func("exp", vec![a.clone()])),
            "log" => Some(Expr::pow(a.clone(), Expr::int(-1))),
            "abs" => Some(a / Expr::abs(a.clone())),
            _ => None,
        };
        if let Some(outer) = outer {
            return outer * da;
        }
    }
    Expr::add(
        args.iter()
            .enumerate()
            .map(|(k, a)| Expr::derivative(name, args.to_vec(), vec![k]) * diff(a, var))
            .collect(),
    )
}
