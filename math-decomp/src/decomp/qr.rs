//! QR decomposition via Householder reflections.
//!
//! Decomposes a dense matrix `A` (m x n, any shape) into `A = QR` where:
//! - `Q` is unitary (m x m) such that `Qᴴ Q = I`
//! - `R` is upper triangular (m x n) with a real, non-negative diagonal
//!
//! The diagonal sign convention makes the factorization unique for full-rank
//! input, so decomposing the same matrix twice gives identical factors.

use crate::config::DecompConfig;
use crate::error::{DecompError, Result};
use crate::matrix::Matrix;
use crate::traits::ComplexField;
use ndarray::{Array1, Array2, ArrayView2};
use num_traits::{Float, One, Zero};

/// Result of a QR decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct QrDecomposition<T: ComplexField> {
    /// Unitary factor (m x m)
    pub q: Array2<T>,
    /// Upper triangular factor (m x n)
    pub r: Array2<T>,
}

/// QR decomposition of a dense matrix, using the process-wide configuration.
///
/// Sparse input is rejected: convert it with [`Matrix::to_dense`] first.
///
/// ```
/// # use math_audio_decomp::{Matrix, qr};
/// # use ndarray::array;
/// let a = Matrix::Dense(array![[15.0_f64, 42.0], [20.0, 81.0]]);
/// let qr = qr(&a).unwrap();
/// assert!((qr.r[[0, 0]] - 25.0).abs() < 1e-10);
/// assert!((qr.q[[1, 0]] - 0.8).abs() < 1e-10);
/// ```
pub fn qr<T: ComplexField>(a: &Matrix<T>) -> Result<QrDecomposition<T>> {
    qr_with_config(a, &DecompConfig::global())
}

/// QR decomposition with an explicit configuration
pub fn qr_with_config<T: ComplexField>(
    a: &Matrix<T>,
    config: &DecompConfig,
) -> Result<QrDecomposition<T>> {
    match a {
        Matrix::Dense(a) => Ok(qr_dense(a.view(), config)),
        Matrix::Sparse(_) => Err(DecompError::UnsupportedInput { operation: "qr" }),
    }
}

/// Householder QR of a dense matrix
#[allow(clippy::many_single_char_names)]
pub fn qr_dense<T: ComplexField>(a: ArrayView2<'_, T>, config: &DecompConfig) -> QrDecomposition<T> {
    let (m, n) = a.dim();
    let k = m.min(n);

    let scale = a.iter().fold(T::Real::zero(), |acc, v| acc.max(v.norm()));
    let tol = T::real_from_f64(config.absolute_tolerance)
        .max(T::real_from_f64(config.relative_tolerance) * scale);

    let mut r = a.to_owned();
    let mut q: Array2<T> = Array2::eye(m);
    let mut v: Array1<T> = Array1::zeros(m);

    for c in 0..k {
        // Compute the norm of the c-th column below the diagonal
        let mut norm_sq = T::Real::zero();
        for i in c..m {
            norm_sq += r[[i, c]].norm_sqr();
        }
        let norm = norm_sq.sqrt();

        if norm <= tol {
            // Already (numerically) zero: the reflection is the identity
            log::debug!("qr: column {c} is rank deficient, reflection skipped");
            for i in c..m {
                r[[i, c]] = T::zero();
            }
            continue;
        }

        // Leading component gets the phase opposite to r[c][c] to avoid cancellation
        let alpha = -(r[[c, c]].signum() * T::from_real(norm));
        let mut v_norm_sq = T::Real::zero();
        for i in c..m {
            v[i] = r[[i, c]];
        }
        v[c] -= alpha;
        for i in c..m {
            v_norm_sq += v[i].norm_sqr();
        }
        let beta = T::from_real((T::Real::one() + T::Real::one()) / v_norm_sq);

        // R := H R on the trailing columns
        for j in (c + 1)..n {
            let mut s = T::zero();
            for i in c..m {
                s += v[i].conj() * r[[i, j]];
            }
            s *= beta;
            for i in c..m {
                let vi = v[i];
                r[[i, j]] -= vi * s;
            }
        }

        // Q := Q H
        for row in 0..m {
            let mut s = T::zero();
            for i in c..m {
                s += q[[row, i]] * v[i];
            }
            s *= beta;
            for i in c..m {
                let vi = v[i].conj();
                q[[row, i]] -= s * vi;
            }
        }

        r[[c, c]] = alpha;
        for i in (c + 1)..m {
            r[[i, c]] = T::zero();
        }
    }

    canonicalize(&mut q, &mut r, k);

    QrDecomposition { q, r }
}

/// Rotate row `i` of R and column `i` of Q by a unit scalar so that every
/// diagonal entry of R is real and non-negative. `Q·R` is unchanged.
fn canonicalize<T: ComplexField>(q: &mut Array2<T>, r: &mut Array2<T>, k: usize) {
    let n = r.ncols();
    for i in 0..k {
        let d = r[[i, i]];
        if d.is_zero() {
            continue;
        }
        let phase = d.signum();
        let phase_conj = phase.conj();
        for j in i..n {
            r[[i, j]] *= phase_conj;
        }
        r[[i, i]] = T::from_real(d.norm());
        q.column_mut(i).mapv_inplace(|x| x * phase);
    }
}
