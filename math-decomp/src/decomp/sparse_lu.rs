//! Sparse LU decomposition
//!
//! Left-looking (column by column) factorization of a CSC matrix:
//!
//! ```text
//! For each column k (taken in the fill-reducing order q):
//!     1. Scatter A(:, q[k]) into a dense work vector x
//!     2. For each previous step j in order, with u = x[p[j]] ≠ 0:
//!        x -= u * L(:, j)                (sparse triangular solve)
//!     3. The entries of x on pivotal rows become U(:, k)
//!     4. Choose the pivot among the remaining rows, divide, store L(:, k)
//! ```
//!
//! A pivot is chosen with threshold partial pivoting: the diagonal candidate
//! row `q[k]` is kept when `|x| ≥ τ · max|x|`, otherwise the largest entry
//! wins. `τ = 1` is plain partial pivoting.

use crate::decomp::lu::LuDecomposition;
use crate::error::{DecompError, Result};
use crate::matrix::Matrix;
use crate::sparse::{ColumnOrdering, CscBuilder, CscMatrix, column_ordering};
use crate::traits::ComplexField;
use num_traits::Zero;

/// Sparse LU decomposition with a column ordering and a pivot threshold.
///
/// Returns sparse factors with `A[p, q] = L·U`. Like the dense variant it
/// never fails on singular input; only an invalid `threshold` (outside
/// `(0, 1]`) is rejected.
pub fn lup_sparse<T: ComplexField>(
    a: &CscMatrix<T>,
    ordering: ColumnOrdering,
    threshold: f64,
) -> Result<LuDecomposition<T>> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(DecompError::InvalidArgument(format!(
            "pivot threshold must be in (0, 1], got {threshold}"
        )));
    }

    let q = column_ordering(a, ordering);
    Ok(left_looking_lu(a, q, T::real_from_f64(threshold)))
}

pub(crate) fn left_looking_lu<T: ComplexField>(
    a: &CscMatrix<T>,
    q: Option<Vec<usize>>,
    threshold: T::Real,
) -> LuDecomposition<T> {
    let (m, n) = (a.num_rows, a.num_cols);
    let k = m.min(n);

    // Work vector and the list of rows it currently touches
    let mut x = vec![T::zero(); m];
    let mut marked = vec![false; m];
    let mut touched: Vec<usize> = Vec::with_capacity(m);

    // Row -> elimination step
    let mut pinv: Vec<Option<usize>> = vec![None; m];
    let mut pivot_rows: Vec<usize> = Vec::with_capacity(m);
    // L columns in original row numbering, without the unit diagonal
    let mut l_cols: Vec<Vec<(usize, T)>> = Vec::with_capacity(k);
    let mut u = CscBuilder::with_capacity(k, n, a.nnz());
    let mut next_free = 0;
    let mut zero_pivots = 0;

    for step in 0..n {
        let col = q.as_ref().map_or(step, |q| q[step]);

        for (i, v) in a.col_entries(col) {
            x[i] = v;
            if !marked[i] {
                marked[i] = true;
                touched.push(i);
            }
        }

        // Solve with the columns of L computed so far
        let solved = step.min(k);
        let mut u_col: Vec<(usize, T)> = Vec::new();
        for j in 0..solved {
            let u_jk = x[pivot_rows[j]];
            if u_jk.is_zero() {
                continue;
            }
            u_col.push((j, u_jk));
            for &(i, l_ij) in &l_cols[j] {
                x[i] -= l_ij * u_jk;
                if !marked[i] {
                    marked[i] = true;
                    touched.push(i);
                }
            }
        }

        if step < k {
            // Largest candidate, lowest row on ties
            let mut ipiv: Option<usize> = None;
            let mut max_val = T::Real::zero();
            for &i in &touched {
                if pinv[i].is_some() {
                    continue;
                }
                let val = x[i].norm();
                let better = match ipiv {
                    None => true,
                    Some(best) => val > max_val || (val == max_val && i < best),
                };
                if better {
                    ipiv = Some(i);
                    max_val = val;
                }
            }

            // Prefer the diagonal candidate when it is large enough
            if col < m && pinv[col].is_none() && x[col].norm() >= threshold * max_val {
                ipiv = Some(col);
            }

            let ipiv = match ipiv {
                Some(i) if !x[i].is_zero() => i,
                _ => {
                    // Structurally or numerically empty sub-column
                    while pinv[next_free].is_some() {
                        next_free += 1;
                    }
                    zero_pivots += 1;
                    if col < m && pinv[col].is_none() { col } else { next_free }
                }
            };

            let pivot = x[ipiv];
            pinv[ipiv] = Some(step);
            pivot_rows.push(ipiv);
            u_col.push((step, pivot));

            let mut l_col = Vec::new();
            if !pivot.is_zero() {
                let pivot_inv = pivot.inv();
                for &i in &touched {
                    if pinv[i].is_none() && !x[i].is_zero() {
                        l_col.push((i, x[i] * pivot_inv));
                    }
                }
            }
            l_cols.push(l_col);
        }

        u.push_column(u_col);

        for &i in &touched {
            x[i] = T::zero();
            marked[i] = false;
        }
        touched.clear();
    }

    // Rows never chosen as pivot (tall input) keep their relative order
    for i in 0..m {
        if pinv[i].is_none() {
            pinv[i] = Some(pivot_rows.len());
            pivot_rows.push(i);
        }
    }
    let row_of = |i: usize| pinv[i].unwrap_or(i);

    let mut l = CscBuilder::with_capacity(m, k, l_cols.iter().map(Vec::len).sum::<usize>() + k);
    for (j, col) in l_cols.iter().enumerate() {
        l.push_column(
            std::iter::once((j, T::one())).chain(col.iter().map(|&(i, v)| (row_of(i), v))),
        );
    }

    let l = l.finish();
    let u = u.finish();
    if zero_pivots > 0 {
        log::debug!("lup_sparse: {m}x{n} matrix has {zero_pivots} zero pivot(s)");
    }
    log::debug!(
        "lup_sparse: {m}x{n}, nnz(A) = {}, nnz(L) = {}, nnz(U) = {}, fill ratio {:.2}",
        a.nnz(),
        l.nnz(),
        u.nnz(),
        (l.nnz() + u.nnz()) as f64 / a.nnz().max(1) as f64
    );

    LuDecomposition {
        l: Matrix::Sparse(l),
        u: Matrix::Sparse(u),
        p: pivot_rows,
        q,
    }
}
