//! Dense matrix arithmetic.
//!
//! [`Matrix`] is a dense, row-major `f64` matrix sized at construction. Any
//! arithmetic that depends on two shapes lining up returns [`Result`] and
//! leaves its operands untouched on failure; nothing is broadcast or
//! truncated silently.

use std::fmt;
use std::ops::Mul;

use rand::Rng;

use crate::{Error, Result};

/// A dense `rows x cols` matrix of `f64` cells, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a `rows x cols` matrix with every cell set to 0.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_elem(rows, cols, 0.0)
    }

    /// Creates a `rows x cols` matrix with every cell set to `value`.
    pub fn from_elem(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Adopts `data` as a `rows x cols` matrix in row-major order.
    ///
    /// Fails with [`Error::InvalidData`] when `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidData(format!(
                "a {rows}x{cols} matrix needs {} cells, got {}",
                rows * cols,
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates the `n x n` identity matrix.
    pub fn eye(n: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            out.data[i * n + i] = 1.0;
        }
        out
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Cells in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable cells in row-major order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    fn checked_offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.offset(row, col))
    }

    /// Reads the cell at (`row`, `col`).
    ///
    /// Fails with [`Error::IndexOutOfRange`] instead of panicking.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let offset = self.checked_offset(row, col)?;
        Ok(self.data[offset])
    }

    /// Mutable access to the cell at (`row`, `col`), with the same bounds
    /// check as [`Matrix::get`].
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut f64> {
        let offset = self.checked_offset(row, col)?;
        Ok(&mut self.data[offset])
    }

    /// Writes `value` to the cell at (`row`, `col`).
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let offset = self.checked_offset(row, col)?;
        self.data[offset] = value;
        Ok(())
    }

    #[inline]
    fn check_same_shape(&self, rhs: &Self, op: &'static str) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(Error::DimensionMismatch {
                op,
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        Ok(())
    }

    /// Elementwise sum.
    ///
    /// Shape contract: `self.shape() == rhs.shape()`.
    pub fn add(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs, "add")?;
        let data = self.data.iter().zip(&rhs.data).map(|(a, b)| a + b).collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Elementwise difference.
    ///
    /// Shape contract: `self.shape() == rhs.shape()`.
    pub fn sub(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs, "sub")?;
        let data = self.data.iter().zip(&rhs.data).map(|(a, b)| a - b).collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Matrix product, computed with the plain triple loop.
    ///
    /// Shape contract:
    /// - `self.cols() == rhs.rows()`
    /// - the result is `(self.rows(), rhs.cols())`
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        if self.cols != rhs.rows {
            return Err(Error::DimensionMismatch {
                op: "matmul",
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }

        let mut data = vec![0.0; self.rows * rhs.cols];
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[self.offset(i, k)] * rhs.data[rhs.offset(k, j)];
                }
                data[i * rhs.cols + j] = sum;
            }
        }
        Ok(Self {
            rows: self.rows,
            cols: rhs.cols,
            data,
        })
    }

    /// Multiplies every cell by `factor`.
    ///
    /// Also available as `&m * factor` and `factor * &m`.
    pub fn scale(&self, factor: f64) -> Self {
        let data = self.data.iter().map(|v| v * factor).collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Returns the `(cols, rows)` matrix whose cell (j, i) is cell (i, j).
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for r in 0..self.rows {
            for c in 0..self.cols {
                data[c * self.rows + r] = self.data[self.offset(r, c)];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Sum of every cell. 0 for a zero-sized matrix.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Overwrites every cell with an independent uniform sample from
    /// `[min, max)`.
    ///
    /// Panics when `max <= min`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, min: f64, max: f64, rng: &mut R) -> &mut Self {
        assert!(max > min, "randomize requires max > min, got [{min}, {max})");
        for v in &mut self.data {
            *v = rng.gen_range(min..max);
        }
        self
    }

    /// Applies the logistic sigmoid `1 / (1 + e^-x)` to every cell.
    pub fn sigmoid(&mut self) -> &mut Self {
        for v in &mut self.data {
            *v = 1.0 / (1.0 + (-*v).exp());
        }
        self
    }

    /// Squares every cell.
    pub fn square(&mut self) -> &mut Self {
        for v in &mut self.data {
            *v *= *v;
        }
        self
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Matrix {
        self.scale(rhs)
    }
}

impl Mul<&Matrix> for f64 {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        rhs.scale(self)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            write!(f, "[ ")?;
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data[self.offset(r, c)])?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}
