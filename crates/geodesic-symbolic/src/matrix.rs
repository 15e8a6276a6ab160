//! Dense matrices of symbolic expressions.

use crate::error::{Result, SymbolicError};
use crate::expand::expand;
use crate::expr::Expr;
use crate::simplify::simplify;
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Expr>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Expr::zero(); rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = Expr::one();
        }
        m
    }

    pub fn diagonal(entries: Vec<Expr>) -> Self {
        let mut m = Self::zeros(entries.len(), entries.len());
        for (i, e) in entries.into_iter().enumerate() {
            m[(i, i)] = e;
        }
        m
    }

    /// Build from nested rows; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(SymbolicError::DimensionMismatch {
                expected: format!("rows of length {cols}"),
                actual: format!("row of length {}", bad.len()),
            });
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> Expr) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn row(&self, i: usize) -> &[Expr] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<Expr>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn map(&self, f: impl FnMut(&Expr) -> Expr) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn simplify(&self) -> Self {
        self.map(simplify)
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self[(j, i)].clone())
    }

    pub fn mul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(SymbolicError::DimensionMismatch {
                expected: format!("{} rows", self.cols),
                actual: format!("{} rows", rhs.rows),
            });
        }
        Ok(Self::from_fn(self.rows, rhs.cols, |i, j| {
            Expr::add((0..self.cols).map(|k| &self[(i, k)] * &rhs[(k, j)]).collect())
        }))
    }

    /// Matrix with row `row` and column `col` removed.
    pub fn minor(&self, row: usize, col: usize) -> Self {
        let mut data = Vec::with_capacity((self.rows - 1) * (self.cols - 1));
        for i in (0..self.rows).filter(|&i| i != row) {
            for j in (0..self.cols).filter(|&j| j != col) {
                data.push(self[(i, j)].clone());
            }
        }
        Self {
            rows: self.rows - 1,
            cols: self.cols - 1,
            data,
        }
    }

    fn require_square(&self) -> Result<()> {
        if self.is_square() {
            Ok(())
        } else {
            Err(SymbolicError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Expanded determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> Result<Expr> {
        self.require_square()?;
        Ok(expand(&self.laplace()))
    }

    fn laplace(&self) -> Expr {
        match self.rows {
            0 => Expr::one(),
            1 => self.data[0].clone(),
            2 => &self[(0, 0)] * &self[(1, 1)] - &self[(0, 1)] * &self[(1, 0)],
            n => Expr::add(
                (0..n)
                    .filter(|&j| !self[(0, j)].is_zero())
                    .map(|j| {
                        let sign = if j % 2 == 0 { Expr::one() } else { Expr::int(-1) };
                        Expr::mul(vec![sign, self[(0, j)].clone(), self.minor(0, j).laplace()])
                    })
                    .collect(),
            ),
        }
    }

    pub fn cofactor(&self, row: usize, col: usize) -> Result<Expr> {
        self.require_square()?;
        let minor = expand(&self.minor(row, col).laplace());
        Ok(if (row + col) % 2 == 0 { minor } else { -minor })
    }

    /// Transposed cofactor matrix, so that `A · adj(A) = det(A) · I`.
    pub fn adjugate(&self) -> Result<Matrix> {
        self.require_square()?;
        if self.rows == 1 {
            return Ok(Matrix::identity(1));
        }
        let mut adj = Matrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                adj[(i, j)] = self.cofactor(j, i)?;
            }
        }
        Ok(adj)
    }

    /// Simplified inverse, `adj(A) / det(A)` entry by entry.
    pub fn inverse(&self) -> Result<Matrix> {
        self.require_square()?;
        let det = simplify(&self.determinant()?);
        if det.is_zero() {
            return Err(SymbolicError::Singular);
        }
        let inv_det = Expr::pow(det, Expr::int(-1));
        Ok(self.adjugate()?.map(|a| simplify(&(a * &inv_det))))
    }

    /// Symmetric when every `(i, j)` and `(j, i)` pair expands to the same value.
    pub fn is_symmetric(&self) -> bool {
        self.is_square()
            && (0..self.rows).all(|i| (i + 1..self.cols).all(|j| expand(&(&self[(i, j)] - &self[(j, i)])).is_zero()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expr> {
        self.data.iter()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Expr;

    fn index(&self, (i, j): (usize, usize)) -> &Expr {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Expr {
        &mut self.data[i * self.cols + j]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for i in 0..self.rows {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("[")?;
            for (j, e) in self.row(i).iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{e}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}
