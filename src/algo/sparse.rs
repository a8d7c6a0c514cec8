//! Compressed sparse row matrices.
//!
//! Only what the diffusion operator needs: construction from triplets, row
//! access, and products with dense vectors and matrices.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// Compressed Sparse Row (CSR) matrix.
///
/// Stores a sparse matrix in CSR format for efficient matrix-vector multiplication.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row pointers: row_ptr[i] is the index in col_idx/values where row i starts.
    /// Length is rows + 1, with row_ptr[rows] = nnz.
    row_ptr: Vec<usize>,
    /// Column indices for each non-zero value.
    col_idx: Vec<usize>,
    /// Non-zero values.
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Create a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries at the same (row, col) are summed.
    pub fn from_triplets(rows: usize, cols: usize, mut triplets: Vec<(usize, usize, f64)>) -> Self {
        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(triplets.len());
        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());
        let mut last: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            debug_assert!(row < rows && col < cols, "triplet ({}, {}) out of bounds", row, col);
            if last == Some((row, col)) {
                // Same position: accumulate value
                if let Some(acc) = values.last_mut() {
                    *acc += val;
                }
                continue;
            }
            col_idx.push(col);
            values.push(val);
            row_ptr[row + 1] += 1;
            last = Some((row, col));
        }

        // Counts to offsets
        for r in 0..rows {
            row_ptr[r + 1] += row_ptr[r];
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Get the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Get the number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored `(column, value)` pairs of row `i`, in column order.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Entry `(i, j)`, zero if not stored.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let start = self.row_ptr[i];
        let cols = &self.col_idx[start..self.row_ptr[i + 1]];
        match cols.binary_search(&j) {
            Ok(k) => self.values[start + k],
            Err(_) => 0.0,
        }
    }

    /// Sum of the entries of row `i`.
    pub fn row_sum(&self, i: usize) -> f64 {
        self.row(i).map(|(_, v)| v).sum()
    }

    #[inline]
    fn row_dot(&self, i: usize, x: &DVector<f64>) -> f64 {
        self.row(i).map(|(j, v)| v * x[j]).sum()
    }

    /// Multiply matrix by vector: y = A * x.
    pub fn mul_vec(&self, x: &DVector<f64>, parallel: bool) -> DVector<f64> {
        assert_eq!(x.len(), self.cols, "Vector dimension mismatch");

        let y: Vec<f64> = if parallel {
            (0..self.rows).into_par_iter().map(|i| self.row_dot(i, x)).collect()
        } else {
            (0..self.rows).map(|i| self.row_dot(i, x)).collect()
        };
        DVector::from_vec(y)
    }

    /// Multiply matrix by a dense matrix, one column at a time: Y = A * X.
    pub fn mul_dense(&self, x: &DMatrix<f64>, parallel: bool) -> DMatrix<f64> {
        assert_eq!(x.nrows(), self.cols, "Matrix dimension mismatch");

        let columns: Vec<DVector<f64>> = x
            .column_iter()
            .map(|c| self.mul_vec(&c.into_owned(), parallel))
            .collect();
        if columns.is_empty() {
            return DMatrix::zeros(self.rows, 0);
        }
        DMatrix::from_columns(&columns)
    }
}
