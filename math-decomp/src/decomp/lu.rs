//! LU decomposition with partial pivoting
//!
//! Factors a (possibly rectangular) `m × n` matrix as `P·A = L·U` where `L` is
//! `m × k` unit lower triangular, `U` is `k × n` upper triangular and
//! `k = min(m, n)`. The factorization never fails on singular input: a zero
//! pivot is recorded in `U` and only surfaces when a solver divides by it.

use crate::decomp::sparse_lu::left_looking_lu;
use crate::matrix::Matrix;
use crate::traits::ComplexField;
use ndarray::{Array2, ArrayView2};
use num_traits::One;

/// LU factorization result
///
/// `p[i]` is the original row now occupying row `i`; `q`, present only for
/// sparse factorizations with a fill-reducing ordering, is the column
/// permutation so that `A[p, q] = L·U`.
#[derive(Debug, Clone, PartialEq)]
pub struct LuDecomposition<T: ComplexField> {
    /// Unit lower triangular factor (`m × k`)
    pub l: Matrix<T>,
    /// Upper triangular factor (`k × n`)
    pub u: Matrix<T>,
    /// Row permutation
    pub p: Vec<usize>,
    /// Column permutation (sparse factorizations only)
    pub q: Option<Vec<usize>>,
}

impl<T: ComplexField> LuDecomposition<T> {
    /// Number of rows of the factored matrix
    pub fn nrows(&self) -> usize {
        self.l.nrows()
    }

    /// Number of columns of the factored matrix
    pub fn ncols(&self) -> usize {
        self.u.ncols()
    }

    /// Pivots `U[i][i]`, in elimination order
    pub fn pivots(&self) -> Vec<T> {
        let k = self.u.nrows().min(self.u.ncols());
        (0..k).map(|i| self.u.get(i, i)).collect()
    }
}

/// LU decomposition of a dense or sparse matrix.
///
/// Dense input yields dense factors. Sparse input is factored with the
/// natural column order and plain partial pivoting, and yields sparse factors.
pub fn lup<T: ComplexField>(a: &Matrix<T>) -> LuDecomposition<T> {
    match a {
        Matrix::Dense(a) => lup_dense(a.view()),
        Matrix::Sparse(a) => left_looking_lu(a, None, T::Real::one()),
    }
}

/// Dense LU decomposition with partial pivoting (pure Rust implementation)
pub fn lup_dense<T: ComplexField>(a: ArrayView2<'_, T>) -> LuDecomposition<T> {
    let (m, n) = a.dim();
    let k = m.min(n);

    let mut lu = a.to_owned();
    let mut p: Vec<usize> = (0..m).collect();
    let mut zero_pivots = 0;

    for c in 0..k {
        // Find pivot
        let mut max_val = lu[[c, c]].norm();
        let mut max_row = c;

        for i in (c + 1)..m {
            let val = lu[[i, c]].norm();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }

        // Swap rows if needed
        if max_row != c {
            for j in 0..n {
                lu.swap([c, j], [max_row, j]);
            }
            p.swap(c, max_row);
        }

        // Whole sub-column is zero: nothing to eliminate
        let pivot = lu[[c, c]];
        if pivot.is_zero() {
            zero_pivots += 1;
            continue;
        }

        // Compute multipliers and eliminate
        let pivot_inv = pivot.inv();
        for i in (c + 1)..m {
            let mult = lu[[i, c]] * pivot_inv;
            lu[[i, c]] = mult; // Store multiplier in L part

            for j in (c + 1)..n {
                let update = mult * lu[[c, j]];
                lu[[i, j]] -= update;
            }
        }
    }

    if zero_pivots > 0 {
        log::debug!("lup: {m}x{n} matrix has {zero_pivots} zero pivot(s)");
    }

    let l = Array2::from_shape_fn((m, k), |(i, j)| match i.cmp(&j) {
        std::cmp::Ordering::Greater => lu[[i, j]],
        std::cmp::Ordering::Equal => T::one(),
        std::cmp::Ordering::Less => T::zero(),
    });
    let u = Array2::from_shape_fn((k, n), |(i, j)| if j >= i { lu[[i, j]] } else { T::zero() });

    LuDecomposition {
        l: Matrix::Dense(l),
        u: Matrix::Dense(u),
        p,
        q: None,
    }
}
