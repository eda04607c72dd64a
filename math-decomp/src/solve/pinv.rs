//! Moore-Penrose pseudoinverse
//!
//! `A⁺ = V·S⁺·Uᴴ` where `S⁺` reciprocates the singular values above
//! `max(relative_tolerance · s_max, absolute_tolerance)` and zeroes the rest.

use crate::config::DecompConfig;
use crate::decomp::svd_dense;
use crate::error::{DecompError, Result};
use crate::matrix::{Matrix, adjoint};
use crate::traits::ComplexField;
use ndarray::{Array2, ArrayView2, s};
use num_traits::{Float, Zero};

/// Pseudoinverse of a dense matrix (`n × m` for an `m × n` input)
pub fn pinv<T: ComplexField>(a: &Matrix<T>) -> Result<Matrix<T>> {
    pinv_with_config(a, &DecompConfig::global())
}

/// [`pinv`] with an explicit configuration
pub fn pinv_with_config<T: ComplexField>(a: &Matrix<T>, config: &DecompConfig) -> Result<Matrix<T>> {
    match a {
        Matrix::Dense(a) => pinv_dense(a.view(), config).map(Matrix::Dense),
        Matrix::Sparse(_) => Err(DecompError::UnsupportedInput { operation: "pinv" }),
    }
}

/// Pseudoinverse of a dense matrix
pub fn pinv_dense<T: ComplexField>(a: ArrayView2<'_, T>, config: &DecompConfig) -> Result<Array2<T>> {
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Ok(Array2::zeros((n, m)));
    }

    let svd = svd_dense(a, config)?;
    let s_max = svd.singular_values.first().copied().unwrap_or_else(T::Real::zero);
    let tol = (T::real_from_f64(config.relative_tolerance) * s_max)
        .max(T::real_from_f64(config.absolute_tolerance));

    let rank = svd.rank(tol);
    log::debug!("pinv: {m}x{n} matrix has numerical rank {rank}");

    // Columns of V scaled by 1/s, then multiplied by the leading columns of Uᴴ
    let mut v_scaled = svd.v.slice(s![.., ..rank]).to_owned();
    for (k, mut column) in v_scaled.columns_mut().into_iter().enumerate() {
        let inv = T::from_real(svd.singular_values[k].recip());
        column.mapv_inplace(|x| x * inv);
    }
    let uh = adjoint(svd.u.slice(s![.., ..rank]));

    Ok(v_scaled.dot(&uh))
}
