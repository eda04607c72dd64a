//! Singular Value Decomposition (SVD).
//!
//! Decomposes a matrix `A` (m x n) into `A = U S Vᴴ` where:
//! - `U` is unitary (m x m)
//! - `S` is diagonal with non-negative entries in descending order (m x n)
//! - `V` is unitary (n x n)
//!
//! Implementation uses the one-sided Jacobi method: column pairs of a working
//! copy of `A` are rotated until every pair is orthogonal to within the
//! relative tolerance, or the sweep cap is reached.

use crate::config::DecompConfig;
use crate::error::{DecompError, Result};
use crate::matrix::{Matrix, adjoint};
use crate::traits::ComplexField;
use ndarray::{Array1, Array2, ArrayView2};
use num_traits::{Float, One, Zero};
use std::cmp::Ordering;

/// Result of a Singular Value Decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct SvdDecomposition<T: ComplexField> {
    /// Left singular vectors (m x m)
    pub u: Array2<T>,
    /// Singular values on the diagonal (m x n)
    pub s: Array2<T>,
    /// Right singular vectors (n x n)
    pub v: Array2<T>,
    /// Singular values in descending order (length min(m, n))
    pub singular_values: Vec<T::Real>,
    /// Number of Jacobi sweeps performed
    pub sweeps: usize,
    /// Whether all column pairs met the tolerance before the sweep cap
    pub converged: bool,
}

impl<T: ComplexField> SvdDecomposition<T> {
    /// Number of singular values above `tol`
    pub fn rank(&self, tol: T::Real) -> usize {
        self.singular_values.iter().filter(|&&s| s > tol).count()
    }
}

/// SVD of a dense matrix, using the process-wide configuration
///
/// ```
/// # use math_audio_decomp::{Matrix, svd};
/// # use ndarray::array;
/// let a = Matrix::Dense(array![[3.0_f64, 0.0], [0.0, 4.0]]);
/// let svd = svd(&a).unwrap();
/// // Singular values of diag(3,4) are 4 and 3
/// assert!((svd.singular_values[0] - 4.0).abs() < 1e-10);
/// assert!((svd.singular_values[1] - 3.0).abs() < 1e-10);
/// ```
pub fn svd<T: ComplexField>(a: &Matrix<T>) -> Result<SvdDecomposition<T>> {
    svd_with_config(a, &DecompConfig::global())
}

/// SVD with an explicit configuration
pub fn svd_with_config<T: ComplexField>(
    a: &Matrix<T>,
    config: &DecompConfig,
) -> Result<SvdDecomposition<T>> {
    match a {
        Matrix::Dense(a) => svd_dense(a.view(), config),
        Matrix::Sparse(_) => Err(DecompError::UnsupportedInput { operation: "svd" }),
    }
}

/// SVD of a dense matrix
///
/// Wide matrices are handled through their conjugate transpose: if
/// `Aᴴ = U' S' V'ᴴ` then `A = V' S'ᵗ U'ᴴ`.
pub fn svd_dense<T: ComplexField>(
    a: ArrayView2<'_, T>,
    config: &DecompConfig,
) -> Result<SvdDecomposition<T>> {
    let (m, n) = a.dim();

    let (u, sigma, v, sweeps, converged) = if m >= n {
        jacobi_tall(a.to_owned(), config)
    } else {
        let (u, sigma, v, sweeps, converged) = jacobi_tall(adjoint(a), config);
        (v, sigma, u, sweeps, converged)
    };

    if !converged {
        if config.strict_convergence {
            return Err(DecompError::ConvergenceLimitReached { sweeps });
        }
        log::warn!("svd: {m}x{n} matrix not converged after {sweeps} sweeps, returning best effort");
    } else {
        log::debug!("svd: {m}x{n} matrix converged in {sweeps} sweeps");
    }

    let mut s = Array2::zeros((m, n));
    for (i, &value) in sigma.iter().enumerate() {
        s[[i, i]] = T::from_real(value);
    }

    Ok(SvdDecomposition {
        u,
        s,
        v,
        singular_values: sigma,
        sweeps,
        converged,
    })
}

type JacobiOutput<T> = (
    Array2<T>,
    Vec<<T as ComplexField>::Real>,
    Array2<T>,
    usize,
    bool,
);

/// One-sided Jacobi for tall or square input (m >= n).
#[allow(clippy::many_single_char_names)]
fn jacobi_tall<T: ComplexField>(mut work: Array2<T>, config: &DecompConfig) -> JacobiOutput<T> {
    let (m, n) = work.dim();
    let mut v: Array2<T> = Array2::eye(n);

    let one = T::Real::one();
    let two = one + one;
    let conv_tol = T::real_from_f64(config.relative_tolerance)
        .max(T::Real::epsilon() * T::real_from_f64(8.0));
    // Columns below the absolute tolerance are replaced during basis completion
    let abs_tol = T::real_from_f64(config.absolute_tolerance);
    let negligible = abs_tol * abs_tol;

    let mut sweeps = 0;
    let mut converged = false;

    while sweeps < config.max_svd_sweeps {
        sweeps += 1;
        let mut rotated = false;

        for p in 0..n {
            for q in (p + 1)..n {
                // Gram matrix entries for columns p and q
                let mut app = T::Real::zero();
                let mut aqq = T::Real::zero();
                let mut apq = T::zero();
                for i in 0..m {
                    let wp = work[[i, p]];
                    let wq = work[[i, q]];
                    app += wp.norm_sqr();
                    aqq += wq.norm_sqr();
                    apq += wp.conj() * wq;
                }

                let abs_apq = apq.norm();
                if app <= negligible
                    || aqq <= negligible
                    || abs_apq <= conv_tol * (app * aqq).sqrt()
                {
                    continue;
                }
                rotated = true;

                // Remove the phase of apq, then rotate as in the real case
                let phase_conj = (apq * T::from_real(abs_apq.recip())).conj();
                let tau = (aqq - app) / (two * abs_apq);
                let t = if tau >= T::Real::zero() {
                    one / (tau + (one + tau * tau).sqrt())
                } else {
                    -one / (-tau + (one + tau * tau).sqrt())
                };
                let cs = one / (one + t * t).sqrt();
                let sn = t * cs;
                let (c, s) = (T::from_real(cs), T::from_real(sn));

                for i in 0..m {
                    let wp = work[[i, p]];
                    let wq = work[[i, q]] * phase_conj;
                    work[[i, p]] = c * wp - s * wq;
                    work[[i, q]] = s * wp + c * wq;
                }
                for i in 0..n {
                    let vp = v[[i, p]];
                    let vq = v[[i, q]] * phase_conj;
                    v[[i, p]] = c * vp - s * vq;
                    v[[i, q]] = s * vp + c * vq;
                }
            }
        }

        if !rotated {
            converged = true;
            break;
        }
    }

    // Singular values are the column norms of the rotated matrix
    let norms: Vec<T::Real> = (0..n)
        .map(|j| {
            work.column(j)
                .iter()
                .fold(T::Real::zero(), |acc, x| acc + x.norm_sqr())
                .sqrt()
        })
        .collect();

    // Sort in descending order; ties keep the original column order
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| norms[b].partial_cmp(&norms[a]).unwrap_or(Ordering::Equal));

    let s_max = order.first().map_or(T::Real::zero(), |&j| norms[j]);
    let cutoff = T::real_from_f64(config.absolute_tolerance)
        .max(T::real_from_f64(config.relative_tolerance) * s_max);

    let mut u: Array2<T> = Array2::zeros((m, m));
    let mut v_sorted: Array2<T> = Array2::zeros((n, n));
    let mut filled = vec![false; m];
    let mut sigma = Vec::with_capacity(n);

    for (new_j, &old_j) in order.iter().enumerate() {
        let norm = norms[old_j];
        sigma.push(norm);
        v_sorted.column_mut(new_j).assign(&v.column(old_j));
        if norm > cutoff {
            let inv = T::from_real(norm.recip());
            u.column_mut(new_j)
                .assign(&work.column(old_j).mapv(|x| x * inv));
            filled[new_j] = true;
        }
    }

    complete_basis(&mut u, &mut filled);

    (u, sigma, v_sorted, sweeps, converged)
}

/// Fill the columns of `u` not yet marked in `filled` with unit vectors
/// orthogonal to every filled column (Gram-Schmidt on standard basis vectors).
fn complete_basis<T: ComplexField>(u: &mut Array2<T>, filled: &mut [bool]) {
    let m = u.nrows();

    for j in 0..m {
        if filled[j] {
            continue;
        }

        // Standard basis vector with the largest component outside span(filled)
        let mut best = 0;
        let mut best_residual = -T::Real::one();
        for i in 0..m {
            let mut captured = T::Real::zero();
            for k in (0..m).filter(|&k| filled[k]) {
                captured += u[[i, k]].norm_sqr();
            }
            let residual = T::Real::one() - captured;
            if residual > best_residual {
                best = i;
                best_residual = residual;
            }
        }

        let mut candidate: Array1<T> = Array1::zeros(m);
        candidate[best] = T::one();

        // Two passes of classical Gram-Schmidt
        for _ in 0..2 {
            for k in (0..m).filter(|&k| filled[k]) {
                let mut dot = T::zero();
                for i in 0..m {
                    dot += u[[i, k]].conj() * candidate[i];
                }
                for i in 0..m {
                    let uik = u[[i, k]];
                    candidate[i] -= uik * dot;
                }
            }
        }

        let norm = candidate
            .iter()
            .fold(T::Real::zero(), |acc, x| acc + x.norm_sqr())
            .sqrt();
        let inv = T::from_real(norm.recip());
        u.column_mut(j).assign(&candidate.mapv(|x| x * inv));
        filled[j] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use num_complex::Complex64;

    fn assert_unitary<T: ComplexField<Real = f64>>(q: &Array2<T>) {
        let qhq = adjoint(q.view()).dot(q);
        let eye: Array2<T> = Array2::eye(q.ncols());
        for (x, y) in qhq.iter().zip(eye.iter()) {
            assert_relative_eq!((*x - *y).norm(), 0.0, epsilon = 1e-10);
        }
    }

    fn check_svd<T: ComplexField<Real = f64>>(a: &Array2<T>) -> SvdDecomposition<T> {
        let svd = svd_dense(a.view(), &DecompConfig::default()).expect("svd should succeed");
        let (m, n) = a.dim();
        assert_eq!(svd.u.dim(), (m, m));
        assert_eq!(svd.s.dim(), (m, n));
        assert_eq!(svd.v.dim(), (n, n));
        assert!(svd.converged);

        assert_unitary(&svd.u);
        assert_unitary(&svd.v);

        let product = svd.u.dot(&svd.s).dot(&adjoint(svd.v.view()));
        for (x, y) in product.iter().zip(a.iter()) {
            assert_relative_eq!((*x - *y).norm(), 0.0, epsilon = 1e-10);
        }

        for w in svd.singular_values.windows(2) {
            assert!(w[0] >= w[1], "singular values must be descending");
        }
        assert!(svd.singular_values.iter().all(|&s| s >= 0.0));
        svd
    }

    #[test]
    fn test_svd_diagonal() {
        let svd = check_svd(&array![[3.0_f64, 0.0], [0.0, 4.0]]);
        assert_relative_eq!(svd.singular_values[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(svd.singular_values[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_svd_shapes() {
        check_svd(&array![[1.0_f64, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let wide = check_svd(&array![[1.0_f64, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(wide.singular_values.len(), 2);
        check_svd(&array![[2.0_f64, -1.0, 0.5, 3.0]]);
        check_svd(&array![[7.0_f64]]);
    }

    #[test]
    fn test_svd_rank_deficient() {
        let a = array![[1.0_f64, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let svd = check_svd(&a);
        assert_relative_eq!(svd.singular_values[0], 70.0_f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(svd.singular_values[1], 0.0, epsilon = 1e-10);
        assert_eq!(svd.rank(1e-10), 1);

        let zero = Array2::<f64>::zeros((2, 3));
        let svd = check_svd(&zero);
        assert_eq!(svd.rank(1e-10), 0);
    }

    #[test]
    fn test_svd_complex() {
        let a = array![
            [Complex64::new(1.0, 2.0), Complex64::new(0.0, -1.0), Complex64::new(3.0, 0.0)],
            [Complex64::new(-2.0, 0.5), Complex64::new(1.0, 1.0), Complex64::new(0.0, 0.0)],
        ];
        check_svd(&a);
        check_svd(&a.t().to_owned());
    }

    #[test]
    fn test_svd_deterministic() {
        let a = array![[4.0_f64, 1.0, -2.0], [1.0, 2.0, 0.5], [-2.0, 0.5, 3.0], [1.0, 1.0, 1.0]];
        let config = DecompConfig::default();
        let first = svd_dense(a.view(), &config).expect("svd");
        let second = svd_dense(a.view(), &config).expect("svd");
        assert_eq!(first, second);
    }

    #[test]
    fn test_sweep_cap() {
        let a = array![[4.0_f64, 1.0, -2.0], [1.0, 2.0, 0.5], [-2.0, 0.5, 3.0]];

        let capped = DecompConfig::default().with_max_svd_sweeps(1);
        let svd = svd_dense(a.view(), &capped).expect("best effort is not an error");
        assert!(!svd.converged);
        assert_eq!(svd.sweeps, 1);

        let strict = DecompConfig {
            strict_convergence: true,
            ..capped
        };
        assert_eq!(
            svd_dense(a.view(), &strict).unwrap_err(),
            DecompError::ConvergenceLimitReached { sweeps: 1 }
        );
    }

    #[test]
    fn test_svd_rejects_sparse() {
        let a: Matrix<f64> = Matrix::Sparse(crate::sparse::CscMatrix::identity(2));
        assert!(matches!(
            svd(&a),
            Err(DecompError::UnsupportedInput { operation: "svd" })
        ));
    }
}
