//! Dense and sparse matrices behind one accessor interface
//!
//! [`Matrix`] tags a matrix as dense (`ndarray::Array2`) or sparse
//! ([`CscMatrix`]). Operations dispatch on the tag; conversions between the
//! two are explicit.

use crate::sparse::CscMatrix;
use crate::traits::ComplexField;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use num_traits::Zero;

/// A dense or sparse matrix
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix<T: ComplexField> {
    /// Row-major dense storage
    Dense(Array2<T>),
    /// Compressed sparse column storage
    Sparse(CscMatrix<T>),
}

impl<T: ComplexField> Matrix<T> {
    /// Number of rows
    pub fn nrows(&self) -> usize {
        match self {
            Matrix::Dense(a) => a.nrows(),
            Matrix::Sparse(a) => a.num_rows,
        }
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        match self {
            Matrix::Dense(a) => a.ncols(),
            Matrix::Sparse(a) => a.num_cols,
        }
    }

    /// `[rows, cols]`
    pub fn shape(&self) -> [usize; 2] {
        [self.nrows(), self.ncols()]
    }

    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Matrix::Sparse(_))
    }

    /// Element at `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> T {
        match self {
            Matrix::Dense(a) => a[[i, j]],
            Matrix::Sparse(a) => a.get(i, j),
        }
    }

    /// Dense copy of the matrix
    pub fn to_dense(&self) -> Array2<T> {
        match self {
            Matrix::Dense(a) => a.clone(),
            Matrix::Sparse(a) => a.to_dense(),
        }
    }

    /// Sparse copy of the matrix, dropping exact zeros
    pub fn to_sparse(&self) -> CscMatrix<T> {
        match self {
            Matrix::Dense(a) => CscMatrix::from_dense(a, T::Real::zero()),
            Matrix::Sparse(a) => a.clone(),
        }
    }

    /// Identity of size `n` in the same storage family as `self`
    pub fn identity_like(&self, n: usize) -> Matrix<T> {
        match self {
            Matrix::Dense(_) => Matrix::Dense(Array2::eye(n)),
            Matrix::Sparse(_) => Matrix::Sparse(CscMatrix::identity(n)),
        }
    }
}

impl<T: ComplexField> From<Array2<T>> for Matrix<T> {
    fn from(a: Array2<T>) -> Self {
        Matrix::Dense(a)
    }
}

impl<T: ComplexField> From<CscMatrix<T>> for Matrix<T> {
    fn from(a: CscMatrix<T>) -> Self {
        Matrix::Sparse(a)
    }
}

/// Conjugate transpose `Aᴴ` (plain transpose for real scalars)
pub fn adjoint<T: ComplexField>(a: ArrayView2<'_, T>) -> Array2<T> {
    a.t().mapv(|v| v.conj())
}

/// Right-hand side of a linear system: one column or several
///
/// Solvers work column by column on a 2-D view and hand the solution back in
/// the caller's shape.
pub trait RightHandSide<T: ComplexField> {
    /// Solution type, shaped like `self`
    type Output;

    /// View as an `n × k` matrix of columns
    fn as_columns(&self) -> ArrayView2<'_, T>;

    /// Rebuild the caller's shape from solved columns
    fn from_columns(x: Array2<T>) -> Self::Output;
}

impl<T: ComplexField> RightHandSide<T> for Array1<T> {
    type Output = Array1<T>;

    fn as_columns(&self) -> ArrayView2<'_, T> {
        self.view().insert_axis(Axis(1))
    }

    fn from_columns(x: Array2<T>) -> Array1<T> {
        x.index_axis_move(Axis(1), 0)
    }
}

impl<T: ComplexField> RightHandSide<T> for Array2<T> {
    type Output = Array2<T>;

    fn as_columns(&self) -> ArrayView2<'_, T> {
        self.view()
    }

    fn from_columns(x: Array2<T>) -> Array2<T> {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dense_sparse_accessors_agree() {
        let dense = array![[1.0_f64, 0.0], [2.0, 3.0], [0.0, 4.0]];
        let a = Matrix::from(dense.clone());
        let s = Matrix::from(a.to_sparse());

        assert_eq!(a.shape(), [3, 2]);
        assert_eq!(s.shape(), [3, 2]);
        assert!(s.is_sparse());
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(a.get(i, j), s.get(i, j));
            }
        }
        assert_eq!(s.to_dense(), dense);
    }

    #[test]
    fn test_identity_like_keeps_family() {
        let s: Matrix<f64> = Matrix::Sparse(CscMatrix::new(2, 2));
        assert!(s.identity_like(3).is_sparse());
        assert_eq!(s.identity_like(3).to_dense(), Array2::<f64>::eye(3));
    }

    #[test]
    fn test_adjoint_conjugates() {
        use num_complex::Complex64;
        let a = array![[Complex64::new(1.0, 2.0), Complex64::new(3.0, 0.0)]];
        let ah = adjoint(a.view());
        assert_eq!(ah.dim(), (2, 1));
        assert_eq!(ah[[0, 0]], Complex64::new(1.0, -2.0));
        assert_eq!(ah[[1, 0]], Complex64::new(3.0, 0.0));
    }

    #[test]
    fn test_rhs_shapes() {
        let b = array![1.0_f64, 2.0, 3.0];
        assert_eq!(b.as_columns().dim(), (3, 1));
        let back = <Array1<f64> as RightHandSide<f64>>::from_columns(b.as_columns().to_owned());
        assert_eq!(back, b);
    }
}
