//! Dense square matrices over genotype pairs.

use crate::errors::SimError;
use serde::{Deserialize, Serialize};

/// A dense `N x N` matrix stored row-major.
///
/// Used for per-generation mating tables, where entry `(i, j)` is the
/// probability that a mating involves parents `i` and `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// All-zero `dim x dim` matrix.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![0.0; dim * dim],
        }
    }

    /// Build from row-major values.
    ///
    /// # Errors
    /// Returns [`SimError::LengthMismatch`] unless `data.len() == dim * dim`.
    pub fn from_row_major(dim: usize, data: Vec<f64>) -> Result<Self, SimError> {
        if data.len() != dim * dim {
            return Err(SimError::LengthMismatch {
                expected: dim * dim,
                actual: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    /// Build from a function of `(row, col)`.
    pub fn from_fn(dim: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(dim * dim);
        for row in 0..dim {
            for col in 0..dim {
                data.push(f(row, col));
            }
        }
        Self { dim, data }
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Value at `(row, col)`. Panics if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.dim + col]
    }

    /// Overwrite the value at `(row, col)`. Panics if out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.dim + col] = value;
    }

    /// Borrow one row.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.dim..(row + 1) * self.dim]
    }

    /// Row-major view of every entry.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Sum of every entry.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Divide every entry by the total.
    ///
    /// # Errors
    /// Returns [`SimError::NormalizationFailure`] if the total is not a
    /// positive finite number.
    pub fn normalize(&mut self) -> Result<(), SimError> {
        let total = self.total();
        if !(total > 0.0 && total.is_finite()) {
            return Err(SimError::NormalizationFailure(total));
        }
        self.data.iter_mut().for_each(|v| *v /= total);
        Ok(())
    }
}
