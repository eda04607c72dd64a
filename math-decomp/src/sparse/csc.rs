//! Compressed Sparse Column (CSC) matrix format
//!
//! CSC format stores:
//! - `values`: Non-zero entries in column-major order
//! - `row_indices`: Row index for each value
//! - `col_ptrs`: Index into values/row_indices where each column starts
//!
//! Row indices are kept sorted within each column.

use crate::error::{DecompError, Result};
use crate::parallel::{is_parallel_available, parallel_map_indexed};
use crate::traits::ComplexField;
use ndarray::{Array1, Array2};
use num_traits::Zero;
use std::ops::Range;

/// Compressed Sparse Column (CSC) matrix format
///
/// Memory-efficient storage for sparse matrices with O(nnz) space complexity.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T: ComplexField> {
    /// Number of rows
    pub num_rows: usize,
    /// Number of columns
    pub num_cols: usize,
    /// Non-zero values in column-major order
    pub values: Vec<T>,
    /// Row indices for each value
    pub row_indices: Vec<usize>,
    /// Column pointers: col_ptrs[j] is the start index in values/row_indices for column j
    /// col_ptrs[num_cols] = nnz (total number of non-zeros)
    pub col_ptrs: Vec<usize>,
}

impl<T: ComplexField> CscMatrix<T> {
    /// Create a new empty CSC matrix
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            values: Vec::new(),
            row_indices: Vec::new(),
            col_ptrs: vec![0; num_cols + 1],
        }
    }

    /// Create a CSC matrix from raw components
    ///
    /// The components are checked for consistency: `col_ptrs` must have
    /// `num_cols + 1` non-decreasing entries ending at `nnz`, and every row
    /// index must be in range and strictly increasing within its column.
    pub fn from_raw_parts(
        num_rows: usize,
        num_cols: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if col_ptrs.len() != num_cols + 1 {
            return Err(DecompError::InvalidArgument(format!(
                "col_ptrs must have {} elements, got {}",
                num_cols + 1,
                col_ptrs.len()
            )));
        }
        if row_indices.len() != values.len() || col_ptrs[num_cols] != values.len() {
            return Err(DecompError::InvalidArgument(
                "row_indices, values and col_ptrs disagree on nnz".to_string(),
            ));
        }
        for j in 0..num_cols {
            let (start, end) = (col_ptrs[j], col_ptrs[j + 1]);
            if start > end {
                return Err(DecompError::InvalidArgument(format!(
                    "col_ptrs decreases at column {j}"
                )));
            }
            let rows = &row_indices[start..end];
            if rows.iter().any(|&r| r >= num_rows) || rows.windows(2).any(|w| w[0] >= w[1]) {
                return Err(DecompError::InvalidArgument(format!(
                    "row indices of column {j} must be in range and strictly increasing"
                )));
            }
        }

        Ok(Self {
            num_rows,
            num_cols,
            values,
            row_indices,
            col_ptrs,
        })
    }

    /// Create a CSC matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T::Real) -> Self {
        let num_rows = dense.nrows();
        let num_cols = dense.ncols();

        let mut values = Vec::new();
        let mut row_indices = Vec::new();
        let mut col_ptrs = vec![0usize; num_cols + 1];

        for j in 0..num_cols {
            for i in 0..num_rows {
                let val = dense[[i, j]];
                if val.norm() > threshold {
                    values.push(val);
                    row_indices.push(i);
                }
            }
            col_ptrs[j + 1] = values.len();
        }

        Self {
            num_rows,
            num_cols,
            values,
            row_indices,
            col_ptrs,
        }
    }

    /// Create a CSC matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value). Duplicate entries are summed. An index
    /// outside `num_rows × num_cols` is an [`DecompError::InvalidArgument`].
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        mut triplets: Vec<(usize, usize, T)>,
    ) -> Result<Self> {
        if let Some(&(row, col, _)) = triplets
            .iter()
            .find(|&&(row, col, _)| row >= num_rows || col >= num_cols)
        {
            return Err(DecompError::InvalidArgument(format!(
                "triplet ({row}, {col}) is outside a {num_rows}x{num_cols} matrix"
            )));
        }

        triplets.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut values: Vec<T> = Vec::with_capacity(triplets.len());
        let mut row_indices = Vec::with_capacity(triplets.len());
        let mut counts = vec![0usize; num_cols + 1];
        let mut prev: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            if prev == Some((row, col)) {
                if let Some(last) = values.last_mut() {
                    *last += val;
                }
            } else {
                values.push(val);
                row_indices.push(row);
                counts[col + 1] += 1;
                prev = Some((row, col));
            }
        }

        for j in 0..num_cols {
            counts[j + 1] += counts[j];
        }

        Ok(Self {
            num_rows,
            num_cols,
            values,
            row_indices,
            col_ptrs: counts,
        })
    }

    /// Create identity matrix in CSC format
    pub fn identity(n: usize) -> Self {
        Self {
            num_rows: n,
            num_cols: n,
            values: vec![T::one(); n],
            row_indices: (0..n).collect(),
            col_ptrs: (0..=n).collect(),
        }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get the range of indices in values/row_indices for a given column
    pub fn col_range(&self, col: usize) -> Range<usize> {
        self.col_ptrs[col]..self.col_ptrs[col + 1]
    }

    /// Get the (row, value) pairs for a column
    pub fn col_entries(&self, col: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.col_range(col);
        self.row_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> T {
        let range = self.col_range(j);
        match self.row_indices[range.clone()].binary_search(&i) {
            Ok(pos) => self.values[range.start + pos],
            Err(_) => T::zero(),
        }
    }

    /// Extract diagonal elements
    pub fn diagonal(&self) -> Array1<T> {
        let n = self.num_rows.min(self.num_cols);
        Array1::from_iter((0..n).map(|i| self.get(i, i)))
    }

    /// Transpose (without conjugation)
    pub fn transpose(&self) -> CscMatrix<T> {
        let mut counts = vec![0usize; self.num_rows + 1];
        for &r in &self.row_indices {
            counts[r + 1] += 1;
        }
        for i in 0..self.num_rows {
            counts[i + 1] += counts[i];
        }

        let mut next = counts.clone();
        let mut row_indices = vec![0usize; self.nnz()];
        let mut values = vec![T::zero(); self.nnz()];
        for j in 0..self.num_cols {
            for (i, v) in self.col_entries(j) {
                let dst = next[i];
                row_indices[dst] = j;
                values[dst] = v;
                next[i] += 1;
            }
        }

        CscMatrix {
            num_rows: self.num_cols,
            num_cols: self.num_rows,
            values,
            row_indices,
            col_ptrs: counts,
        }
    }

    /// Matrix-vector product: y = A * x
    pub fn matvec(&self, x: &Array1<T>) -> Array1<T> {
        assert_eq!(x.len(), self.num_cols, "Input vector size mismatch");

        let mut y = Array1::from_elem(self.num_rows, T::zero());
        for j in 0..self.num_cols {
            let xj = x[j];
            if xj.is_zero() {
                continue;
            }
            for (i, v) in self.col_entries(j) {
                y[i] += v * xj;
            }
        }
        y
    }

    /// Convert to dense matrix
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.num_rows, self.num_cols), T::zero());

        if self.num_cols >= 256 && is_parallel_available() {
            let columns: Vec<Vec<(usize, T)>> =
                parallel_map_indexed(self.num_cols, |j| self.col_entries(j).collect());
            for (j, column) in columns.into_iter().enumerate() {
                for (i, v) in column {
                    dense[[i, j]] = v;
                }
            }
            return dense;
        }

        for j in 0..self.num_cols {
            for (i, v) in self.col_entries(j) {
                dense[[i, j]] = v;
            }
        }
        dense
    }
}

/// Builder for constructing CSC matrices column by column
pub struct CscBuilder<T: ComplexField> {
    num_rows: usize,
    num_cols: usize,
    values: Vec<T>,
    row_indices: Vec<usize>,
    col_ptrs: Vec<usize>,
}

impl<T: ComplexField> CscBuilder<T> {
    /// Create a new CSC builder
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self::with_capacity(num_rows, num_cols, 0)
    }

    /// Create a new CSC builder with estimated non-zeros
    pub fn with_capacity(num_rows: usize, num_cols: usize, nnz_estimate: usize) -> Self {
        let mut col_ptrs = Vec::with_capacity(num_cols + 1);
        col_ptrs.push(0);
        Self {
            num_rows,
            num_cols,
            values: Vec::with_capacity(nnz_estimate),
            row_indices: Vec::with_capacity(nnz_estimate),
            col_ptrs,
        }
    }

    /// Add entries for the next column
    ///
    /// Entries are sorted by row; exact zeros are dropped.
    pub fn push_column(&mut self, entries: impl IntoIterator<Item = (usize, T)>) {
        let mut column: Vec<(usize, T)> = entries
            .into_iter()
            .filter(|(_, v)| v.norm() > T::Real::zero())
            .collect();
        column.sort_by_key(|&(i, _)| i);
        for (i, v) in column {
            debug_assert!(i < self.num_rows, "row index out of range");
            self.row_indices.push(i);
            self.values.push(v);
        }
        self.col_ptrs.push(self.values.len());
    }

    /// Finish building and return the CSC matrix
    pub fn finish(mut self) -> CscMatrix<T> {
        // Fill remaining columns if not all columns were added
        while self.col_ptrs.len() < self.num_cols + 1 {
            self.col_ptrs.push(self.values.len());
        }

        CscMatrix {
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            values: self.values,
            row_indices: self.row_indices,
            col_ptrs: self.col_ptrs,
        }
    }
}
