//! Exact rational arithmetic helpers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

/// Arbitrary precision rational used for every numeric coefficient.
pub type Rational = BigRational;

pub fn int(n: i64) -> Rational {
    Rational::from_integer(BigInt::from(n))
}

/// `n / d`, reduced. Panics on `d == 0` like `Ratio::new`.
pub fn frac(n: i64, d: i64) -> Rational {
    Rational::new(BigInt::from(n), BigInt::from(d))
}

pub fn to_f64(r: &Rational) -> f64 {
    match (r.numer().to_f64(), r.denom().to_f64()) {
        (Some(n), Some(d)) => n / d,
        _ => f64::NAN,
    }
}

/// The value as an `i64` when it is an integer that fits.
pub fn as_integer(r: &Rational) -> Option<i64> {
    if r.is_integer() {
        r.numer().to_i64()
    } else {
        None
    }
}

/// `r^e` for an integer exponent. `None` for `0^negative`.
pub fn pow_int(r: &Rational, e: i64) -> Option<Rational> {
    let mag = u32::try_from(e.unsigned_abs()).ok()?;
    let raised = Rational::new(r.numer().pow(mag), r.denom().pow(mag));
    if e >= 0 {
        Some(raised)
    } else if raised.is_zero() {
        None
    } else {
        Some(raised.recip())
    }
}

/// Exact `q`-th root of a non-negative rational, if numerator and denominator
/// are both perfect powers.
pub fn exact_root(r: &Rational, q: u32) -> Option<Rational> {
    if r.is_negative() || q == 0 {
        return None;
    }
    let n = r.numer().nth_root(q);
    let d = r.denom().nth_root(q);
    if &n.pow(q) == r.numer() && &d.pow(q) == r.denom() {
        Some(Rational::new(n, d))
    } else {
        None
    }
}

pub fn exact_sqrt(r: &Rational) -> Option<Rational> {
    exact_root(r, 2)
}

/// Greatest common divisor of two rationals: gcd of numerators over lcm of
/// denominators. Always non-negative.
pub fn gcd(a: &Rational, b: &Rational) -> Rational {
    if a.is_zero() {
        return b.abs();
    }
    if b.is_zero() {
        return a.abs();
    }
    let n = a.numer().gcd(b.numer());
    let d = a.denom().lcm(b.denom());
    Rational::new(n, d)
}

/// Parse an exact rational from `"3"`, `"-3"`, `"2.5"` or `"3/4"`.
pub fn parse_rational(text: &str) -> Option<Rational> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some((num, den)) = text.split_once('/') {
        let num = parse_rational(num)?;
        let den = parse_rational(den)?;
        if den.is_zero() {
            return None;
        }
        return Some(num / den);
    }

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{whole}{fraction}");
    let numer: BigInt = digits.parse().ok()?;
    let denom = BigInt::from(10u32).pow(fraction.len() as u32);
    let value = Rational::new(numer, denom);
    Some(if negative { -value } else { value })
}
