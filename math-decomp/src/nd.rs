//! Entry points for arrays of any dimensionality
//!
//! For SVD, pinv and inv, scalars (0-d) are read as `1 × 1` matrices and
//! vectors (1-d) as `1 × n` row matrices. QR accepts only two-dimensional
//! arrays. Anything with more dimensions is rejected with
//! [`DecompError::NotTwoDimensional`].

use crate::config::DecompConfig;
use crate::decomp::{QrDecomposition, SvdDecomposition, qr_dense, svd_dense};
use crate::error::{DecompError, Result};
use crate::solve::{inv_dense, pinv_dense};
use crate::traits::ComplexField;
use ndarray::{ArrayD, ArrayView2, Ix2, IxDyn};

fn as_matrix<'a, T: ComplexField>(
    a: &'a ArrayD<T>,
    operation: &'static str,
) -> Result<ArrayView2<'a, T>> {
    let shape_error = |e: ndarray::ShapeError| DecompError::InvalidArgument(e.to_string());
    match a.ndim() {
        0 | 1 => a
            .view()
            .into_shape_with_order((1, a.len()))
            .map_err(shape_error),
        2 => a.view().into_dimensionality::<Ix2>().map_err(shape_error),
        ndim => Err(DecompError::NotTwoDimensional { operation, ndim }),
    }
}

/// SVD of a scalar, vector or matrix
pub fn svd_nd<T: ComplexField>(a: &ArrayD<T>) -> Result<SvdDecomposition<T>> {
    svd_nd_with_config(a, &DecompConfig::global())
}

/// [`svd_nd`] with an explicit configuration
pub fn svd_nd_with_config<T: ComplexField>(
    a: &ArrayD<T>,
    config: &DecompConfig,
) -> Result<SvdDecomposition<T>> {
    svd_dense(as_matrix(a, "svd")?, config)
}

/// QR of a two-dimensional array
pub fn qr_nd<T: ComplexField>(a: &ArrayD<T>) -> Result<QrDecomposition<T>> {
    qr_nd_with_config(a, &DecompConfig::global())
}

/// [`qr_nd`] with an explicit configuration
pub fn qr_nd_with_config<T: ComplexField>(
    a: &ArrayD<T>,
    config: &DecompConfig,
) -> Result<QrDecomposition<T>> {
    if a.ndim() != 2 {
        return Err(DecompError::NotTwoDimensional {
            operation: "qr",
            ndim: a.ndim(),
        });
    }
    Ok(qr_dense(as_matrix(a, "qr")?, config))
}

/// Pseudoinverse of a scalar, vector or matrix.
///
/// A scalar gives a scalar; a vector of length `n` gives an `n × 1` matrix.
pub fn pinv_nd<T: ComplexField>(a: &ArrayD<T>) -> Result<ArrayD<T>> {
    pinv_nd_with_config(a, &DecompConfig::global())
}

/// [`pinv_nd`] with an explicit configuration
pub fn pinv_nd_with_config<T: ComplexField>(a: &ArrayD<T>, config: &DecompConfig) -> Result<ArrayD<T>> {
    let p = pinv_dense(as_matrix(a, "pinv")?, config)?;
    if a.ndim() == 0 {
        return Ok(ArrayD::from_elem(IxDyn(&[]), p[[0, 0]]));
    }
    Ok(p.into_dyn())
}

/// Inverse of a scalar, a one-element vector or a square matrix.
///
/// The result keeps the dimensionality of the input.
pub fn inv_nd<T: ComplexField>(a: &ArrayD<T>) -> Result<ArrayD<T>> {
    inv_nd_with_config(a, &DecompConfig::global())
}

/// [`inv_nd`] with an explicit configuration
pub fn inv_nd_with_config<T: ComplexField>(a: &ArrayD<T>, config: &DecompConfig) -> Result<ArrayD<T>> {
    let x = inv_dense(as_matrix(a, "inv")?, config)?;
    let shape = a.shape().to_vec();
    x.into_shape_with_order(IxDyn(&shape))
        .map_err(|e| DecompError::InvalidArgument(e.to_string()))
}
