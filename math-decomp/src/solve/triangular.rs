//! Forward and back substitution
//!
//! Dense matrices are solved row by row (`x[i] = (b[i] - Σ a[i][j]·x[j]) / a[i][i]`).
//! Sparse CSC matrices are solved column by column: once `x[j]` is known, the
//! entries of column `j` are subtracted from the remaining right-hand side.
//! Only the relevant triangle is read; entries on the other side of the
//! diagonal are ignored.

use crate::config::DecompConfig;
use crate::error::{DecompError, Result};
use crate::matrix::{Matrix, RightHandSide};
use crate::parallel::parallel_try_map_indexed;
use crate::traits::ComplexField;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Which triangle of the matrix a substitution reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Triangle {
    Lower,
    Upper,
}

impl Triangle {
    /// Row indices in substitution order
    pub(crate) fn order(self, n: usize) -> Box<dyn Iterator<Item = usize>> {
        match self {
            Triangle::Lower => Box::new(0..n),
            Triangle::Upper => Box::new((0..n).rev()),
        }
    }

    /// Whether row `i` is still unsolved once column `j` is done
    pub(crate) fn pending(self, i: usize, j: usize) -> bool {
        match self {
            Triangle::Lower => i > j,
            Triangle::Upper => i < j,
        }
    }
}

/// Solve `L·x = b` for lower triangular `L` (forward substitution)
pub fn lsolve<T, B>(l: &Matrix<T>, b: &B) -> Result<B::Output>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    lsolve_with_config(l, b, &DecompConfig::global())
}

/// [`lsolve`] with an explicit configuration
pub fn lsolve_with_config<T, B>(l: &Matrix<T>, b: &B, config: &DecompConfig) -> Result<B::Output>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    check_system("lsolve", l, b.as_columns().nrows())?;
    let tol = T::real_from_f64(config.absolute_tolerance);
    solve_columns(l, b.as_columns(), Triangle::Lower, tol).map(B::from_columns)
}

/// Solve `U·x = b` for upper triangular `U` (back substitution)
pub fn usolve<T, B>(u: &Matrix<T>, b: &B) -> Result<B::Output>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    usolve_with_config(u, b, &DecompConfig::global())
}

/// [`usolve`] with an explicit configuration
pub fn usolve_with_config<T, B>(u: &Matrix<T>, b: &B, config: &DecompConfig) -> Result<B::Output>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    check_system("usolve", u, b.as_columns().nrows())?;
    let tol = T::real_from_f64(config.absolute_tolerance);
    solve_columns(u, b.as_columns(), Triangle::Upper, tol).map(B::from_columns)
}

/// Square matrix whose size matches the right-hand side; returns the size.
pub(crate) fn check_system<T: ComplexField>(
    operation: &'static str,
    a: &Matrix<T>,
    rhs_rows: usize,
) -> Result<usize> {
    let [rows, cols] = a.shape();
    if rows != cols {
        return Err(DecompError::NotSquare {
            operation,
            rows,
            cols,
        });
    }
    if rhs_rows != rows {
        return Err(DecompError::DimensionMismatch {
            operation,
            expected: rows,
            got: rhs_rows,
        });
    }
    Ok(rows)
}

/// Solve every column of `b` independently
pub(crate) fn solve_columns<T: ComplexField>(
    a: &Matrix<T>,
    b: ArrayView2<'_, T>,
    triangle: Triangle,
    tol: T::Real,
) -> Result<Array2<T>> {
    let columns =
        parallel_try_map_indexed(b.ncols(), |j| substitute(a, b.column(j), triangle, tol))?;

    let mut x = Array2::zeros(b.dim());
    for (j, column) in columns.iter().enumerate() {
        x.column_mut(j).assign(column);
    }
    Ok(x)
}

fn substitute<T: ComplexField>(
    a: &Matrix<T>,
    b: ArrayView1<'_, T>,
    triangle: Triangle,
    tol: T::Real,
) -> Result<Array1<T>> {
    let n = b.len();
    let mut x = b.to_owned();

    match a {
        Matrix::Dense(a) => {
            for i in triangle.order(n) {
                let mut sum = x[i];
                for j in (0..n).filter(|&j| triangle.pending(i, j)) {
                    sum -= a[[i, j]] * x[j];
                }
                x[i] = divide_by_pivot(sum, a[[i, i]], tol)?;
            }
        }
        Matrix::Sparse(a) => {
            for j in triangle.order(n) {
                x[j] = divide_by_pivot(x[j], a.get(j, j), tol)?;
                let xj = x[j];
                for (i, v) in a.col_entries(j) {
                    if triangle.pending(i, j) {
                        x[i] -= v * xj;
                    }
                }
            }
        }
    }

    Ok(x)
}

fn divide_by_pivot<T: ComplexField>(value: T, pivot: T, tol: T::Real) -> Result<T> {
    if pivot.is_zero_approx(tol) {
        return Err(DecompError::SingularSystem);
    }
    Ok(value * pivot.inv())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use num_complex::Complex64;

    #[test]
    fn test_lsolve_dense_and_sparse() {
        let l = array![[2.0_f64, 0.0, 0.0], [1.0, 4.0, 0.0], [-1.0, 3.0, 5.0]];
        let b = array![2.0_f64, 9.0, 12.0];

        let dense = lsolve(&Matrix::Dense(l.clone()), &b).expect("solvable");
        let sparse = lsolve(&Matrix::Sparse(Matrix::Dense(l.clone()).to_sparse()), &b)
            .expect("solvable");

        let expected = array![1.0, 2.0, 1.4];
        for i in 0..3 {
            assert_relative_eq!(dense[i], expected[i], epsilon = 1e-12);
            assert_relative_eq!(sparse[i], expected[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_usolve_multiple_columns() {
        let u = array![[1.0_f64, 2.0, -1.0], [0.0, 3.0, 1.0], [0.0, 0.0, 2.0]];
        let b = array![[1.0_f64, 2.0], [5.0, 3.0], [4.0, 2.0]];

        for a in [Matrix::Dense(u.clone()), Matrix::Sparse(Matrix::Dense(u.clone()).to_sparse())] {
            let x = usolve(&a, &b).expect("solvable");
            assert_eq!(x.dim(), (3, 2));
            let ux = u.dot(&x);
            for (got, want) in ux.iter().zip(b.iter()) {
                assert_relative_eq!(*got, *want, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_other_triangle_ignored() {
        // Entries above the diagonal do not take part in forward substitution
        let a = array![[1.0_f64, 100.0], [2.0, 1.0]];
        let x = lsolve(&Matrix::Dense(a), &array![1.0, 4.0]).expect("solvable");
        assert_relative_eq!(x[0], 1.0);
        assert_relative_eq!(x[1], 2.0);
    }

    #[test]
    fn test_singular_diagonal() {
        let u = Matrix::Dense(array![[1.0_f64, 1.0], [0.0, 0.0]]);
        assert_eq!(
            usolve(&u, &array![1.0, 0.0]).unwrap_err(),
            DecompError::SingularSystem
        );

        let l = Matrix::Sparse(Matrix::Dense(array![[0.0_f64, 0.0], [1.0, 1.0]]).to_sparse());
        assert!(lsolve(&l, &array![1.0, 1.0]).unwrap_err().is_singular());
    }

    #[test]
    fn test_shape_errors() {
        let rect = Matrix::Dense(Array2::<f64>::zeros((2, 3)));
        assert!(matches!(
            lsolve(&rect, &array![1.0, 2.0]),
            Err(DecompError::NotSquare { operation: "lsolve", rows: 2, cols: 3 })
        ));

        let square = Matrix::Dense(Array2::<f64>::eye(2));
        assert!(matches!(
            usolve(&square, &array![1.0, 2.0, 3.0]),
            Err(DecompError::DimensionMismatch { expected: 2, got: 3, .. })
        ));
    }

    #[test]
    fn test_complex_usolve() {
        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        let u = array![[i, one], [Complex64::new(0.0, 0.0), one + i]];
        let b = array![one, Complex64::new(2.0, 0.0)];

        let x = usolve(&Matrix::Dense(u.clone()), &b).expect("solvable");
        let ux = u.dot(&x);
        for k in 0..2 {
            assert_relative_eq!((ux[k] - b[k]).norm(), 0.0, epsilon = 1e-12);
        }
    }
}
