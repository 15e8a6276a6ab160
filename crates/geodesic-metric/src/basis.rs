//! Basis and reciprocal-basis atoms.

use crate::error::{MetricError, Result};
use geodesic_symbolic::{Expr, Symbol};
use std::collections::HashSet;
use std::str::FromStr;

/// How the basis vectors are named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BasisSpec {
    /// Explicit names, one per basis vector.
    Named(Vec<String>),
    /// A root name indexed by the coordinates: `root_{x}` for each coordinate
    /// `x`. Needs coordinates.
    Indexed(String),
}

impl BasisSpec {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BasisSpec::Named(names.into_iter().map(Into::into).collect())
    }

    pub fn indexed(root: impl Into<String>) -> Self {
        BasisSpec::Indexed(root.into())
    }

    /// Basis vector names and reciprocal names.
    pub fn resolve(&self, coords: Option<&[Symbol]>) -> Result<(Vec<String>, Vec<String>)> {
        let (names, reciprocal): (Vec<String>, Vec<String>) = match self {
            BasisSpec::Named(names) => names
                .iter()
                .map(|name| (name.clone(), reciprocal_name(name)))
                .unzip(),
            BasisSpec::Indexed(root) => {
                let coords = coords.ok_or(MetricError::MissingCoordinates("for an indexed basis"))?;
                coords
                    .iter()
                    .map(|x| (format!("{root}_{}", x.name()), format!("{root}^{}", x.name())))
                    .unzip()
            }
        };

        if names.is_empty() {
            return Err(MetricError::InvalidBasis("the basis has no vectors".to_string()));
        }
        if let Some(blank) = names.iter().find(|name| name.trim().is_empty()) {
            return Err(MetricError::InvalidBasis(format!("blank basis name '{blank}'")));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(MetricError::InvalidBasis(format!("duplicate basis name '{dup}'")));
        }
        Ok((names, reciprocal))
    }
}

/// `e_1` → `e^1`; a name without `_` gets `^` appended.
pub fn reciprocal_name(name: &str) -> String {
    if name.contains('_') {
        name.replacen('_', "^", 1)
    } else {
        format!("{name}^")
    }
}

/// Non-commutative atoms for a list of names.
pub fn atoms(names: &[String]) -> Vec<Expr> {
    names.iter().map(|name| Expr::nc_sym(name.as_str())).collect()
}

impl FromStr for BasisSpec {
    type Err = MetricError;

    /// `"e_1 e_2"` or `"e_1,e_2"` name the vectors explicitly, a single token
    /// is a root for an indexed basis.
    fn from_str(s: &str) -> Result<Self> {
        let names: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();
        match names.as_slice() {
            [] => Err(MetricError::InvalidBasis("empty basis string".to_string())),
            [root] if !s.contains(',') => Ok(BasisSpec::indexed(*root)),
            _ => Ok(BasisSpec::named(names)),
        }
    }
}

impl From<Vec<String>> for BasisSpec {
    fn from(names: Vec<String>) -> Self {
        BasisSpec::Named(names)
    }
}

impl From<&[&str]> for BasisSpec {
    fn from(names: &[&str]) -> Self {
        BasisSpec::named(names.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reciprocal_names() {
        assert_eq!(reciprocal_name("e_r"), "e^r");
        assert_eq!(reciprocal_name("e_a_b"), "e^a_b");
        assert_eq!(reciprocal_name("a"), "a^");
    }

    #[test]
    fn named_basis() {
        let (names, rec) = BasisSpec::named(["e_x", "e_y"]).resolve(None).unwrap();
        assert_eq!(names, vec!["e_x", "e_y"]);
        assert_eq!(rec, vec!["e^x", "e^y"]);
    }

    #[test]
    fn indexed_basis_needs_coordinates() {
        let spec = BasisSpec::indexed("e");
        assert!(matches!(spec.resolve(None), Err(MetricError::MissingCoordinates(_))));
        let coords = [Symbol::new("r"), Symbol::new("th")];
        let (names, rec) = spec.resolve(Some(&coords)).unwrap();
        assert_eq!(names, vec!["e_r", "e_th"]);
        assert_eq!(rec, vec!["e^r", "e^th"]);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert!(matches!(BasisSpec::Named(vec![]).resolve(None), Err(MetricError::InvalidBasis(_))));
        assert!(matches!(
            BasisSpec::named(["e1", "e1"]).resolve(None),
            Err(MetricError::InvalidBasis(_))
        ));
    }

    #[test]
    fn parses_basis_strings() {
        assert_eq!("e1 e2 e3".parse::<BasisSpec>().unwrap(), BasisSpec::named(["e1", "e2", "e3"]));
        assert_eq!("e_1,e_2".parse::<BasisSpec>().unwrap(), BasisSpec::named(["e_1", "e_2"]));
        assert_eq!("e".parse::<BasisSpec>().unwrap(), BasisSpec::indexed("e"));
        assert!("  ".parse::<BasisSpec>().is_err());
    }

    #[test]
    fn atoms_are_noncommutative() {
        let atoms = atoms(&["a".to_string(), "b".to_string()]);
        assert!(atoms.iter().all(|a| !a.is_commutative()));
    }
}
