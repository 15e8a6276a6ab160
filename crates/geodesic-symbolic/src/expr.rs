//! Canonical symbolic expression tree.
//!
//! Every [`Expr`] built through the constructors on this type is kept in a
//! canonical form:
//!
//! - sums and products are flattened and never have fewer than two operands
//! - numeric operands are folded into a single leading coefficient
//! - like terms in a sum are combined, zero terms dropped
//! - equal bases in a product have their exponents merged
//! - commutative factors are sorted, non-commutative factors keep their order
//!
//! Structural equality on canonical expressions is therefore a (weak) test of
//! mathematical equality. `expand(a - b).is_zero()` is the stronger one.

use crate::number::{self, Rational};
use num_traits::{One, Signed, Zero};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A named symbol. Non-commutative symbols represent basis vectors.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    name: String,
    commutative: bool,
}

impl Symbol {
    /// A commutative (scalar) symbol such as a coordinate.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commutative: true,
        }
    }

    /// A non-commutative symbol such as a basis vector.
    pub fn noncommutative(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commutative: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_commutative(&self) -> bool {
        self.commutative
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Functions with built-in evaluation and derivative rules. Any other name is
/// an undefined function.
pub const KNOWN_FUNCTIONS: &[&str] = &["sin", "cos", "tan", "exp", "log", "abs"];

/// Symbolic expression.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    Num(Rational),
    Sym(Symbol),
    /// Function application, e.g. `sin(x)` or an undefined `g_r_th(r, th)`.
    Func(String, Vec<Expr>),
    /// Partial derivative of an undefined function. `wrt` holds argument
    /// positions, sorted, one entry per differentiation.
    Deriv {
        name: String,
        args: Vec<Expr>,
        wrt: Vec<usize>,
    },
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn zero() -> Self {
        Expr::Num(Rational::zero())
    }

    pub fn one() -> Self {
        Expr::Num(Rational::one())
    }

    pub fn int(n: i64) -> Self {
        Expr::Num(number::int(n))
    }

    pub fn rational(n: i64, d: i64) -> Self {
        Expr::Num(number::frac(n, d))
    }

    pub fn half() -> Self {
        Expr::rational(1, 2)
    }

    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Sym(Symbol::new(name))
    }

    pub fn nc_sym(name: impl Into<String>) -> Self {
        Expr::Sym(Symbol::noncommutative(name))
    }

    /// Apply a function by name, evaluating the trivial cases of the known
    /// functions. `sqrt` becomes a power of one half.
    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        let name = name.into();
        if args.len() != 1 {
            return Expr::Func(name, args);
        }
        let arg = &args[0];
        match name.as_str() {
            "sqrt" => Expr::pow(arg.clone(), Expr::half()),
            "sin" | "tan" if arg.is_zero() => Expr::zero(),
            "cos" | "exp" if arg.is_zero() => Expr::one(),
            "log" if arg.is_one() => Expr::zero(),
            "sin" | "tan" if arg.has_negative_coeff() => -Expr::Func(name, vec![-arg.clone()]),
            "cos" if arg.has_negative_coeff() => Expr::Func(name, vec![-arg.clone()]),
            "abs" => Expr::abs_of(arg),
            _ => Expr::Func(name, args),
        }
    }

    pub fn sin(arg: Expr) -> Self {
        Expr::func("sin", vec![arg])
    }

    pub fn cos(arg: Expr) -> Self {
        Expr::func("cos", vec![arg])
    }

    pub fn abs(arg: Expr) -> Self {
        Expr::func("abs", vec![arg])
    }

    pub fn sqrt(arg: Expr) -> Self {
        Expr::pow(arg, Expr::half())
    }

    // Symbols are taken to be real, so even powers are already non-negative.
    fn abs_of(arg: &Expr) -> Expr {
        match arg {
            Expr::Num(n) => Expr::Num(n.abs()),
            Expr::Func(name, _) if name == "abs" => arg.clone(),
            Expr::Pow(_, e) if e.as_integer().is_some_and(|k| k % 2 == 0) => arg.clone(),
            Expr::Mul(fs) => match &fs[0] {
                Expr::Num(c) => {
                    let rest = Expr::mul(fs[1..].to_vec());
                    Expr::Num(c.abs()) * Expr::abs_of(&rest)
                }
                _ => Expr::Func("abs".to_string(), vec![arg.clone()]),
            },
            _ => Expr::Func("abs".to_string(), vec![arg.clone()]),
        }
    }

    /// Partial derivative node of the undefined function `name`.
    pub fn derivative(name: impl Into<String>, args: Vec<Expr>, mut wrt: Vec<usize>) -> Self {
        wrt.sort_unstable();
        Expr::Deriv {
            name: name.into(),
            args,
            wrt,
        }
    }

    /// Canonical sum.
    pub fn add(terms: Vec<Expr>) -> Self {
        let mut constant = Rational::zero();
        let mut collected: BTreeMap<Expr, Rational> = BTreeMap::new();

        let mut pending = terms;
        while let Some(term) = pending.pop() {
            match term {
                Expr::Add(inner) => pending.extend(inner),
                Expr::Num(n) => constant += n,
                other => {
                    let (c, rest) = other.split_coeff();
                    *collected.entry(rest).or_insert_with(Rational::zero) += c;
                }
            }
        }

        let mut out = Vec::with_capacity(collected.len() + 1);
        if !constant.is_zero() {
            out.push(Expr::Num(constant));
        }
        for (rest, c) in collected {
            if !c.is_zero() {
                out.push(Expr::with_coeff(c, rest));
            }
        }

        match out.len() {
            0 => Expr::zero(),
            1 => out.pop().unwrap_or_else(Expr::zero),
            _ => Expr::Add(out),
        }
    }

    /// Canonical product. Non-commutative factors keep their relative order.
    pub fn mul(factors: Vec<Expr>) -> Self {
        let mut coeff = Rational::one();
        let mut commuting: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
        let mut ordered: Vec<(Expr, Expr)> = Vec::new();

        let mut flat = Vec::with_capacity(factors.len());
        flatten_mul(factors, &mut flat);

        for factor in flat {
            match factor {
                Expr::Num(n) => coeff *= n,
                f if f.is_commutative() => {
                    let (base, exp) = f.into_base_exp();
                    commuting.entry(base).or_default().push(exp);
                }
                f => {
                    let (base, exp) = f.into_base_exp();
                    match ordered.last_mut() {
                        Some((last, e)) if *last == base => *e = Expr::add(vec![e.clone(), exp]),
                        _ => ordered.push((base, exp)),
                    }
                }
            }
        }

        if coeff.is_zero() {
            return Expr::zero();
        }

        let mut out: Vec<Expr> = Vec::new();
        let mut renormalize = false;
        for (base, exps) in commuting {
            match Expr::pow(base, Expr::add(exps)) {
                Expr::Num(n) => coeff *= n,
                Expr::Mul(inner) => {
                    renormalize = true;
                    out.extend(inner);
                }
                p => out.push(p),
            }
        }
        for (base, exp) in ordered {
            match Expr::pow(base, exp) {
                Expr::Num(n) => coeff *= n,
                p => out.push(p),
            }
        }

        if renormalize {
            out.insert(0, Expr::Num(coeff));
            return Expr::mul(out);
        }
        if coeff.is_zero() {
            return Expr::zero();
        }

        match (out.len(), coeff.is_one()) {
            (0, _) => Expr::Num(coeff),
            (1, true) => out.pop().unwrap_or_else(Expr::one),
            (_, true) => Expr::Mul(out),
            (_, false) => {
                out.insert(0, Expr::Num(coeff));
                Expr::Mul(out)
            }
        }
    }

    /// Canonical power.
    pub fn pow(base: Expr, exp: Expr) -> Self {
        if exp.is_zero() {
            return Expr::one();
        }
        if exp.is_one() {
            return base;
        }
        if base.is_one() {
            return Expr::one();
        }

        match (&base, &exp) {
            (Expr::Num(b), Expr::Num(e)) => {
                if b.is_zero() {
                    return if e.is_positive() {
                        Expr::zero()
                    } else {
                        Expr::Pow(Box::new(base), Box::new(exp))
                    };
                }
                if let Some(k) = number::as_integer(e) {
                    return match number::pow_int(b, k) {
                        Some(v) => Expr::Num(v),
                        None => Expr::Pow(Box::new(base), Box::new(exp)),
                    };
                }
                if b.is_positive() {
                    let q = e.denom().clone();
                    if let Some(q) = num_traits::ToPrimitive::to_u32(&q) {
                        if let Some(root) = number::exact_root(b, q) {
                            let p = num_traits::ToPrimitive::to_i64(e.numer());
                            if let Some(v) = p.and_then(|p| number::pow_int(&root, p)) {
                                return Expr::Num(v);
                            }
                        }
                    }
                }
                Expr::Pow(Box::new(base), Box::new(exp))
            }
            (Expr::Pow(inner, e2), Expr::Num(e)) if number::as_integer(e).is_some() => {
                Expr::pow((**inner).clone(), Expr::mul(vec![(**e2).clone(), exp.clone()]))
            }
            (Expr::Mul(fs), Expr::Num(e)) if number::as_integer(e).is_some() && base.is_commutative() => {
                Expr::mul(fs.iter().map(|f| Expr::pow(f.clone(), exp.clone())).collect())
            }
            (Expr::Mul(fs), Expr::Num(_)) => match &fs[0] {
                Expr::Num(c) if c.is_positive() => {
                    let rest = Expr::mul(fs[1..].to_vec());
                    Expr::mul(vec![
                        Expr::pow(Expr::Num(c.clone()), exp.clone()),
                        Expr::Pow(Box::new(rest), Box::new(exp)),
                    ])
                }
                _ => Expr::Pow(Box::new(base), Box::new(exp)),
            },
            _ => Expr::Pow(Box::new(base), Box::new(exp)),
        }
    }

    fn with_coeff(c: Rational, rest: Expr) -> Expr {
        if c.is_one() {
            return rest;
        }
        match rest {
            Expr::Mul(mut fs) => {
                fs.insert(0, Expr::Num(c));
                Expr::Mul(fs)
            }
            Expr::Num(n) => Expr::Num(n * c),
            other => Expr::Mul(vec![Expr::Num(c), other]),
        }
    }

    fn into_base_exp(self) -> (Expr, Expr) {
        match self {
            Expr::Pow(b, e) => (*b, *e),
            other => (other, Expr::one()),
        }
    }

    /// Split a term into its rational coefficient and the remaining product.
    pub fn split_coeff(&self) -> (Rational, Expr) {
        match self {
            Expr::Num(n) => (n.clone(), Expr::one()),
            Expr::Mul(fs) => match &fs[0] {
                Expr::Num(c) => {
                    let rest = if fs.len() == 2 {
                        fs[1].clone()
                    } else {
                        Expr::Mul(fs[1..].to_vec())
                    };
                    (c.clone(), rest)
                }
                _ => (Rational::one(), self.clone()),
            },
            _ => (Rational::one(), self.clone()),
        }
    }

    fn has_negative_coeff(&self) -> bool {
        self.split_coeff().0.is_negative()
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(n) if n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(n) if n.is_one())
    }

    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Expr::Num(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(number::as_integer)
    }

    /// True when the expression contains no free symbols and no undefined
    /// functions, i.e. it denotes a fixed number.
    pub fn is_number(&self) -> bool {
        match self {
            Expr::Num(_) => true,
            Expr::Sym(_) | Expr::Deriv { .. } => false,
            Expr::Func(name, args) => KNOWN_FUNCTIONS.contains(&name.as_str()) && args.iter().all(Expr::is_number),
            Expr::Add(xs) | Expr::Mul(xs) => xs.iter().all(Expr::is_number),
            Expr::Pow(b, e) => b.is_number() && e.is_number(),
        }
    }

    pub fn is_commutative(&self) -> bool {
        match self {
            Expr::Num(_) => true,
            Expr::Sym(s) => s.is_commutative(),
            Expr::Func(_, args) | Expr::Deriv { args, .. } => args.iter().all(Expr::is_commutative),
            Expr::Add(xs) | Expr::Mul(xs) => xs.iter().all(Expr::is_commutative),
            Expr::Pow(b, e) => b.is_commutative() && e.is_commutative(),
        }
    }

    /// Numeric value, when the expression is a number.
    pub fn evalf(&self) -> Option<f64> {
        match self {
            Expr::Num(n) => Some(number::to_f64(n)),
            Expr::Sym(_) | Expr::Deriv { .. } => None,
            Expr::Func(name, args) => {
                let [arg] = args.as_slice() else {
                    return None;
                };
                let x = arg.evalf()?;
                match name.as_str() {
                    "sin" => Some(x.sin()),
                    "cos" => Some(x.cos()),
                    "tan" => Some(x.tan()),
                    "exp" => Some(x.exp()),
                    "log" => Some(x.ln()),
                    "abs" => Some(x.abs()),
                    _ => None,
                }
            }
            Expr::Add(xs) => xs.iter().map(Expr::evalf).sum(),
            Expr::Mul(xs) => xs.iter().map(Expr::evalf).product(),
            Expr::Pow(b, e) => Some(b.evalf()?.powf(e.evalf()?)),
        }
    }

    /// Sign of a numeric expression; `None` for symbolic input.
    pub fn is_positive(&self) -> Option<bool> {
        match self {
            Expr::Num(n) => Some(n.is_positive()),
            _ if self.is_number() => self.evalf().map(|v| v > 0.0),
            _ => None,
        }
    }

    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(s) => {
                out.insert(s.clone());
            }
            Expr::Func(_, xs) | Expr::Deriv { args: xs, .. } | Expr::Add(xs) | Expr::Mul(xs) => {
                xs.iter().for_each(|x| x.collect_symbols(out));
            }
            Expr::Pow(b, e) => {
                b.collect_symbols(out);
                e.collect_symbols(out);
            }
        }
    }

    pub fn has_symbol(&self, sym: &Symbol) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Sym(s) => s == sym,
            Expr::Func(_, xs) | Expr::Deriv { args: xs, .. } | Expr::Add(xs) | Expr::Mul(xs) => {
                xs.iter().any(|x| x.has_symbol(sym))
            }
            Expr::Pow(b, e) => b.has_symbol(sym) || e.has_symbol(sym),
        }
    }

    /// True if any function application named in `names` occurs.
    pub fn has_function(&self, names: &[&str]) -> bool {
        match self {
            Expr::Num(_) | Expr::Sym(_) => false,
            Expr::Func(name, args) => names.contains(&name.as_str()) || args.iter().any(|a| a.has_function(names)),
            Expr::Deriv { args, .. } => args.iter().any(|a| a.has_function(names)),
            Expr::Add(xs) | Expr::Mul(xs) => xs.iter().any(|x| x.has_function(names)),
            Expr::Pow(b, e) => b.has_function(names) || e.has_function(names),
        }
    }

    /// Number of nodes in the tree.
    pub fn complexity(&self) -> usize {
        match self {
            Expr::Num(_) | Expr::Sym(_) => 1,
            Expr::Func(_, xs) | Expr::Deriv { args: xs, .. } | Expr::Add(xs) | Expr::Mul(xs) => {
                1 + xs.iter().map(Expr::complexity).sum::<usize>()
            }
            Expr::Pow(b, e) => 1 + b.complexity() + e.complexity(),
        }
    }

    /// Additive terms (the expression itself when it is not a sum).
    pub fn terms(&self) -> Vec<Expr> {
        match self {
            Expr::Add(ts) => ts.clone(),
            other => vec![other.clone()],
        }
    }

    /// Multiplicative factors (the expression itself when it is not a product).
    pub fn factors(&self) -> Vec<Expr> {
        match self {
            Expr::Mul(fs) => fs.clone(),
            other => vec![other.clone()],
        }
    }

    /// Split the factors of a term into commutative and non-commutative parts.
    /// The non-commutative part keeps its order.
    pub fn args_cnc(&self) -> (Vec<Expr>, Vec<Expr>) {
        self.factors().into_iter().partition(Expr::is_commutative)
    }

    /// Rebuild this node with `f` applied to every direct child, going back
    /// through the canonical constructors.
    pub fn map_children(&self, f: &mut impl FnMut(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Num(_) | Expr::Sym(_) => self.clone(),
            Expr::Func(name, args) => Expr::func(name.clone(), args.iter().map(&mut *f).collect()),
            Expr::Deriv { name, args, wrt } => Expr::derivative(name.clone(), args.iter().map(&mut *f).collect(), wrt.clone()),
            Expr::Add(ts) => Expr::add(ts.iter().map(&mut *f).collect()),
            Expr::Mul(fs) => Expr::mul(fs.iter().map(&mut *f).collect()),
            Expr::Pow(b, e) => Expr::pow(f(b.as_ref()), f(e.as_ref())),
        }
    }

    /// Simultaneous structural substitution.
    pub fn subs(&self, pairs: &[(Expr, Expr)]) -> Expr {
        if let Some((_, new)) = pairs.iter().find(|(old, _)| old == self) {
            return new.clone();
        }
        self.map_children(&mut |child| child.subs(pairs))
    }

    pub fn expand(&self) -> Expr {
        crate::expand::expand(self)
    }

    pub fn diff(&self, var: &Symbol) -> Expr {
        crate::diff::diff(self, var)
    }

    pub fn trigsimp(&self) -> Expr {
        crate::trig::trigsimp(self)
    }

    pub fn simplify(&self) -> Expr {
        crate::simplify::simplify(self)
    }
}

fn flatten_mul(factors: Vec<Expr>, out: &mut Vec<Expr>) {
    for f in factors {
        match f {
            Expr::Mul(inner) => flatten_mul(inner, out),
            other => out.push(other),
        }
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::int(n.into())
    }
}

impl From<Rational> for Expr {
    fn from(n: Rational) -> Self {
        Expr::Num(n)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        Expr::Sym(s)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Expr::Sym(s.clone())
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $body:expr) => {
        impl $trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                let f: fn(Expr, Expr) -> Expr = $body;
                f(self, rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                let f: fn(Expr, Expr) -> Expr = $body;
                f(self, rhs.clone())
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                let f: fn(Expr, Expr) -> Expr = $body;
                f(self.clone(), rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                let f: fn(Expr, Expr) -> Expr = $body;
                f(self.clone(), rhs.clone())
            }
        }
    };
}

impl_binary_op!(Add, add, |a, b| Expr::add(vec![a, b]));
impl_binary_op!(Sub, sub, |a, b| Expr::add(vec![a, Expr::mul(vec![Expr::int(-1), b])]));
impl_binary_op!(Mul, mul, |a, b| Expr::mul(vec![a, b]));
impl_binary_op!(Div, div, |a, b| Expr::mul(vec![a, Expr::pow(b, Expr::int(-1))]));

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::mul(vec![Expr::int(-1), self])
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::mul(vec![Expr::int(-1), self.clone()])
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(n) => write!(f, "{n}"),
            Expr::Sym(s) => write!(f, "{s}"),
            Expr::Func(name, args) => {
                write!(f, "{name}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Deriv { name, args, wrt } => {
                write!(f, "D{wrt:?}({name})(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    let (c, rest) = term.split_coeff();
                    if i == 0 {
                        write!(f, "{term}")?;
                    } else if c.is_negative() {
                        f.write_str(" - ")?;
                        write!(f, "{}", Expr::with_coeff(-c, rest))?;
                    } else {
                        write!(f, " + {term}")?;
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                let mut rest = factors.as_slice();
                if let Some(Expr::Num(c)) = factors.first() {
                    if (-c.clone()).is_one() {
                        f.write_str("-")?;
                    } else {
                        write_factor(f, &factors[0])?;
                        f.write_str("*")?;
                    }
                    rest = &factors[1..];
                }
                for (i, factor) in rest.iter().enumerate() {
                    if i > 0 {
                        f.write_str("*")?;
                    }
                    write_factor(f, factor)?;
                }
                Ok(())
            }
            Expr::Pow(b, e) => {
                write_power_operand(f, b)?;
                f.write_str("^")?;
                write_power_operand(f, e)
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_factor(f: &mut fmt::Formatter<'_>, e: &Expr) -> fmt::Result {
    let needs_parens = match e {
        Expr::Add(_) => true,
        Expr::Num(n) => n.is_negative() || !n.is_integer(),
        _ => false,
    };
    if needs_parens {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

fn write_power_operand(f: &mut fmt::Formatter<'_>, e: &Expr) -> fmt::Result {
    if matches!(e, Expr::Mul(_) | Expr::Pow(..)) {
        write!(f, "({e})")
    } else {
        write_factor(f, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::sym("x")
    }

    fn y() -> Expr {
        Expr::sym("y")
    }

    #[test]
    fn sums_fold_constants_and_like_terms() {
        let e = x() + Expr::int(2) + x() + Expr::int(-2);
        assert_eq!(e, Expr::int(2) * x());
        assert!((x() - x()).is_zero());
    }

    #[test]
    fn products_merge_powers() {
        let e = x() * y() * x();
        assert_eq!(e, Expr::pow(x(), Expr::int(2)) * y());
        assert!((x() / x()).is_one());
        assert_eq!(x() * Expr::zero(), Expr::zero());
    }

    #[test]
    fn noncommutative_order_is_preserved() {
        let a = Expr::nc_sym("a");
        let b = Expr::nc_sym("b");
        assert_ne!(&a * &b, &b * &a);
        let (c, nc) = (Expr::int(3) * x() * &a * &b).args_cnc();
        assert_eq!(nc, vec![a.clone(), b.clone()]);
        assert_eq!(Expr::mul(c), Expr::int(3) * x());
        // scalars commute past basis vectors
        assert_eq!(&a * x(), x() * &a);
    }

    #[test]
    fn numeric_powers_are_exact() {
        assert_eq!(Expr::sqrt(Expr::int(4)), Expr::int(2));
        assert_eq!(Expr::pow(Expr::rational(4, 9), Expr::rational(3, 2)), Expr::rational(8, 27));
        assert!(matches!(Expr::sqrt(Expr::int(2)), Expr::Pow(..)));
        assert_eq!(Expr::pow(Expr::int(2), Expr::int(-2)), Expr::rational(1, 4));
    }

    #[test]
    fn powers_of_products_distribute() {
        let e = Expr::pow(Expr::int(2) * x() * y(), Expr::int(2));
        assert_eq!(e, Expr::int(4) * Expr::pow(x(), Expr::int(2)) * Expr::pow(y(), Expr::int(2)));
        let r = Expr::pow(Expr::pow(x(), Expr::int(2)), Expr::int(3));
        assert_eq!(r, Expr::pow(x(), Expr::int(6)));
    }

    #[test]
    fn known_function_evaluation() {
        assert!(Expr::sin(Expr::zero()).is_zero());
        assert!(Expr::cos(Expr::zero()).is_one());
        assert_eq!(Expr::cos(-x()), Expr::cos(x()));
        assert_eq!(Expr::sin(-x()), -Expr::sin(x()));
        assert_eq!(Expr::abs(Expr::int(-3)), Expr::int(3));
        assert_eq!(Expr::abs(Expr::pow(x(), Expr::int(2))), Expr::pow(x(), Expr::int(2)));
    }

    #[test]
    fn number_predicates() {
        assert!(Expr::sqrt(Expr::int(2)).is_number());
        assert!(Expr::sin(Expr::int(1)).is_number());
        assert!(!x().is_number());
        assert!(!Expr::func("g", vec![Expr::int(1)]).is_number());
        assert_eq!(Expr::int(-2).is_positive(), Some(false));
        assert_eq!(Expr::sqrt(Expr::int(2)).is_positive(), Some(true));
        assert_eq!(x().is_positive(), None);
    }

    #[test]
    fn substitution_is_simultaneous() {
        let e = x() + Expr::int(2) * y();
        let swapped = e.subs(&[(x(), y()), (y(), x())]);
        assert_eq!(swapped, y() + Expr::int(2) * x());
    }

    #[test]
    fn display_is_readable() {
        let e = x() - Expr::int(2) * y();
        assert_eq!(e.to_string(), "x - 2*y");
        assert_eq!((-x()).to_string(), "-x");
        assert_eq!(Expr::pow(x() + y(), Expr::int(2)).to_string(), "(x + y)^2");
    }
}
