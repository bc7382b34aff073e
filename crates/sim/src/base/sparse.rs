//! Sparse genotype-by-genotype probability surfaces.
//!
//! Each offspring genotype owns one [`SparseMatrix`] holding `P(offspring |
//! row parent, col parent)` for the parent pairs that can produce it. Most
//! pairs cannot, so only non-zero entries are stored, kept sorted by
//! `(row, col)` in a flat vector.

use crate::base::DenseMatrix;
use crate::errors::SimError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparseEntry {
    pub row: u32,
    pub col: u32,
    pub value: f64,
}

impl SparseEntry {
    #[inline]
    fn key(&self) -> (u32, u32) {
        (self.row, self.col)
    }
}

/// Sorted triple list over a `dim x dim` index space.
///
/// Zero values are never materialized and there is at most one entry per
/// `(row, col)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseMatrix {
    dim: usize,
    entries: Vec<SparseEntry>,
}

impl SparseMatrix {
    /// Empty matrix over a `dim x dim` index space.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Empty matrix with room for `capacity` entries.
    ///
    /// # Errors
    /// Returns [`SimError::AllocationFailure`] if the storage cannot be reserved.
    pub fn with_capacity(dim: usize, capacity: usize) -> Result<Self, SimError> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(capacity).map_err(|e| {
            SimError::AllocationFailure(format!("{capacity} sparse entries: {e}"))
        })?;
        Ok(Self { dim, entries })
    }

    /// Build from unordered triples.
    ///
    /// Zero values are dropped.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidValue`] for a value outside [0, 1], an index
    /// outside the space, or a repeated `(row, col)`.
    pub fn from_entries(
        dim: usize,
        triples: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, SimError> {
        let mut matrix = Self::new(dim);
        for (row, col, value) in triples {
            matrix.push_unsorted(row, col, value)?;
        }
        matrix.seal()?;
        Ok(matrix)
    }

    /// Append without restoring key order. Call [`Self::seal`] once done.
    pub(crate) fn push_unsorted(
        &mut self,
        row: usize,
        col: usize,
        value: f64,
    ) -> Result<(), SimError> {
        check_entry(self.dim, row, col, value)?;
        if value > 0.0 {
            self.entries.push(SparseEntry {
                row: row as u32,
                col: col as u32,
                value,
            });
        }
        Ok(())
    }

    /// Sort entries appended by [`Self::push_unsorted`] and release spare
    /// capacity.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidValue`] for a repeated `(row, col)`.
    pub(crate) fn seal(&mut self) -> Result<(), SimError> {
        self.entries.sort_unstable_by_key(SparseEntry::key);
        if let Some(dup) = self.entries.windows(2).find(|w| w[0].key() == w[1].key()) {
            return Err(SimError::InvalidValue {
                row: dup[1].row as usize,
                col: dup[1].col as usize,
                value: dup[1].value,
            });
        }
        self.entries.shrink_to_fit();
        Ok(())
    }

    /// Insert or overwrite the entry at `(row, col)`.
    ///
    /// Setting a value of zero removes any stored entry.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidValue`] if `value` is NaN, outside [0, 1],
    /// or the index is outside the space.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), SimError> {
        check_entry(self.dim, row, col, value)?;
        let key = (row as u32, col as u32);

        // Builders insert in key order, so appending is the common case.
        if self.entries.last().is_none_or(|last| last.key() < key) {
            if value > 0.0 {
                self.entries.push(SparseEntry {
                    row: key.0,
                    col: key.1,
                    value,
                });
            }
            return Ok(());
        }

        match self.search(key) {
            Ok(idx) if value > 0.0 => self.entries[idx].value = value,
            Ok(idx) => {
                self.entries.remove(idx);
            }
            Err(idx) if value > 0.0 => self.entries.insert(
                idx,
                SparseEntry {
                    row: key.0,
                    col: key.1,
                    value,
                },
            ),
            Err(_) => {}
        }
        Ok(())
    }

    /// Stored value at `(row, col)`, or `0.0` if absent.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.dim || col >= self.dim {
            return 0.0;
        }
        self.search((row as u32, col as u32))
            .map(|idx| self.entries[idx].value)
            .unwrap_or(0.0)
    }

    /// `Σ v * dense[r][c]` over stored entries `(r, c, v)`.
    ///
    /// Runs in time proportional to the number of stored entries.
    pub fn weighted_sum(&self, dense: &DenseMatrix) -> f64 {
        debug_assert_eq!(dense.dim(), self.dim);
        let dim = dense.dim();
        let values = dense.as_slice();
        self.entries
            .iter()
            .map(|e| e.value * values[e.row as usize * dim + e.col as usize])
            .sum()
    }

    /// Sum of all stored values.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    /// Side length of the index space.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in `(row, col)` order.
    pub fn iter(&self) -> impl Iterator<Item = &SparseEntry> {
        self.entries.iter()
    }

    /// Re-check every invariant; used after deserializing untrusted bytes.
    pub fn validate(&self) -> Result<(), SimError> {
        for entry in &self.entries {
            check_entry(self.dim, entry.row as usize, entry.col as usize, entry.value)?;
            if entry.value == 0.0 {
                return Err(SimError::InvalidValue {
                    row: entry.row as usize,
                    col: entry.col as usize,
                    value: entry.value,
                });
            }
        }
        if let Some(bad) = self
            .entries
            .windows(2)
            .find(|w| w[0].key().cmp(&w[1].key()) != Ordering::Less)
        {
            return Err(SimError::InvalidValue {
                row: bad[1].row as usize,
                col: bad[1].col as usize,
                value: bad[1].value,
            });
        }
        Ok(())
    }

    fn search(&self, key: (u32, u32)) -> Result<usize, usize> {
        self.entries.binary_search_by(|e| e.key().cmp(&key))
    }
}

fn check_entry(dim: usize, row: usize, col: usize, value: f64) -> Result<(), SimError> {
    if row >= dim || col >= dim || !(0.0..=1.0).contains(&value) {
        return Err(SimError::InvalidValue { row, col, value });
    }
    Ok(())
}
