//! Matrix inverse through `lusolve(A, I)`

use crate::config::DecompConfig;
use crate::error::{DecompError, Result};
use crate::matrix::Matrix;
use crate::solve::lusolve::{LusolveOptions, lusolve_with_config};
use crate::sparse::CscMatrix;
use crate::traits::ComplexField;
use ndarray::{Array2, ArrayView2};
use num_traits::Zero;

/// Inverse of a square matrix, in the storage family of `a`.
///
/// Sparse input yields a sparse inverse (exact zeros dropped).
pub fn inv<T: ComplexField>(a: &Matrix<T>) -> Result<Matrix<T>> {
    inv_with_config(a, &DecompConfig::global())
}

/// [`inv`] with an explicit configuration
pub fn inv_with_config<T: ComplexField>(a: &Matrix<T>, config: &DecompConfig) -> Result<Matrix<T>> {
    match a {
        Matrix::Dense(a) => inv_dense(a.view(), config).map(Matrix::Dense),
        Matrix::Sparse(_) => {
            let x = invert(a, config)?;
            Ok(Matrix::Sparse(CscMatrix::from_dense(&x, T::Real::zero())))
        }
    }
}

/// Inverse of a dense square matrix
pub fn inv_dense<T: ComplexField>(a: ArrayView2<'_, T>, config: &DecompConfig) -> Result<Array2<T>> {
    invert(&Matrix::Dense(a.to_owned()), config)
}

fn invert<T: ComplexField>(a: &Matrix<T>, config: &DecompConfig) -> Result<Array2<T>> {
    let [rows, cols] = a.shape();
    if rows != cols {
        return Err(DecompError::NotSquare {
            operation: "inv",
            rows,
            cols,
        });
    }

    let identity = a.identity_like(rows).to_dense();
    lusolve_with_config(a, &identity, &LusolveOptions::default(), config).map_err(|e| match e {
        DecompError::SingularSystem => DecompError::ZeroDeterminant,
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use num_complex::Complex64;

    #[test]
    fn test_inv_dense() {
        let a = array![[4.0_f64, 7.0], [2.0, 6.0]];
        let inverse = inv(&Matrix::Dense(a.clone())).expect("invertible").to_dense();

        let expected = array![[0.6, -0.7], [-0.2, 0.4]];
        for (x, y) in inverse.iter().zip(expected.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inv_sparse_stays_sparse() {
        let a = array![[2.0_f64, 0.0, 0.0], [0.0, 4.0, 0.0], [1.0, 0.0, 1.0]];
        let inverse = inv(&Matrix::Sparse(CscMatrix::from_dense(&a, 0.0))).expect("invertible");
        assert!(inverse.is_sparse());

        let product = a.dot(&inverse.to_dense());
        for (x, y) in product.iter().zip(Array2::<f64>::eye(3).iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inv_complex() {
        let a = array![
            [Complex64::new(1.0, 1.0), Complex64::new(2.0, 0.0)],
            [Complex64::new(0.0, -1.0), Complex64::new(3.0, 2.0)],
        ];
        let inverse = inv_dense(a.view(), &DecompConfig::default()).expect("invertible");
        let product = a.dot(&inverse);
        for (x, y) in product.iter().zip(Array2::<Complex64>::eye(2).iter()) {
            assert_relative_eq!((*x - *y).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inv_errors() {
        let singular = Matrix::Dense(array![[1.0_f64, 1.0], [0.0, 0.0]]);
        let err = inv(&singular).unwrap_err();
        assert_eq!(err, DecompError::ZeroDeterminant);
        assert_eq!(err.to_string(), "Cannot calculate inverse, determinant is zero");

        let rect = Matrix::Dense(Array2::<f64>::zeros((2, 3)));
        let err = inv(&rect).unwrap_err();
        assert!(err.to_string().contains("Matrix must be square"));
    }
}
