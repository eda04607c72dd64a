//! Linear system solver on top of the LU decomposition
//!
//! `A·x = b` is solved as `L·y = P·b`, `U·z = y`, `x = Q·z`, where `Q` is the
//! identity unless a sparse column ordering was requested.

use crate::config::DecompConfig;
use crate::decomp::{LuDecomposition, lup_dense, lup_sparse};
use crate::error::{DecompError, Result};
use crate::matrix::{Matrix, RightHandSide};
use crate::solve::triangular::{Triangle, check_system, solve_columns};
use crate::sparse::ColumnOrdering;
use crate::traits::ComplexField;
use ndarray::{Array2, Axis};

/// Options for factoring a sparse matrix inside [`lusolve`]
///
/// Dense matrices ignore them and always use partial pivoting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LusolveOptions {
    /// Fill-reducing column ordering
    pub order: ColumnOrdering,
    /// Pivot threshold in `(0, 1]`; 1 is plain partial pivoting
    pub pivot_threshold: f64,
}

impl Default for LusolveOptions {
    fn default() -> Self {
        Self {
            order: ColumnOrdering::Natural,
            pivot_threshold: 1.0,
        }
    }
}

impl LusolveOptions {
    pub fn new(order: ColumnOrdering, pivot_threshold: f64) -> Self {
        Self {
            order,
            pivot_threshold,
        }
    }
}

impl<T: ComplexField> LuDecomposition<T> {
    /// Solve `A·x = b` with the pre-computed factors
    pub fn solve<B: RightHandSide<T>>(&self, b: &B) -> Result<B::Output> {
        self.solve_with_config(b, &DecompConfig::global())
    }

    /// [`LuDecomposition::solve`] with an explicit configuration
    pub fn solve_with_config<B: RightHandSide<T>>(
        &self,
        b: &B,
        config: &DecompConfig,
    ) -> Result<B::Output> {
        let (rows, cols) = (self.nrows(), self.ncols());
        if rows != cols {
            return Err(DecompError::NotSquare {
                operation: "lusolve",
                rows,
                cols,
            });
        }
        let b = b.as_columns();
        if b.nrows() != rows {
            return Err(DecompError::DimensionMismatch {
                operation: "lusolve",
                expected: rows,
                got: b.nrows(),
            });
        }

        let tol = T::real_from_f64(config.absolute_tolerance);

        // y[i] = b[p[i]]
        let pb = b.select(Axis(0), &self.p);
        let y = solve_columns(&self.l, pb.view(), Triangle::Lower, tol)?;
        let z = solve_columns(&self.u, y.view(), Triangle::Upper, tol)?;

        let x = match &self.q {
            None => z,
            Some(q) => {
                let mut x = Array2::zeros(z.dim());
                for (k, &col) in q.iter().enumerate() {
                    x.row_mut(col).assign(&z.row(k));
                }
                x
            }
        };

        Ok(B::from_columns(x))
    }
}

/// Solve `A·x = b` for square `A`; `x` has the shape of `b`.
///
/// ```
/// # use math_audio_decomp::{Matrix, lusolve};
/// # use ndarray::array;
/// let a = Matrix::Dense(array![[4.0_f64, 1.0], [1.0, 3.0]]);
/// let x = lusolve(&a, &array![1.0, 2.0]).unwrap();
/// assert!((4.0 * x[0] + x[1] - 1.0).abs() < 1e-12);
/// ```
pub fn lusolve<T, B>(a: &Matrix<T>, b: &B) -> Result<B::Output>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    lusolve_with_config(a, b, &LusolveOptions::default(), &DecompConfig::global())
}

/// [`lusolve`] with a sparse ordering and pivot threshold
pub fn lusolve_with_options<T, B>(a: &Matrix<T>, b: &B, options: &LusolveOptions) -> Result<B::Output>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    lusolve_with_config(a, b, options, &DecompConfig::global())
}

/// [`lusolve`] with explicit options and configuration
pub fn lusolve_with_config<T, B>(
    a: &Matrix<T>,
    b: &B,
    options: &LusolveOptions,
    config: &DecompConfig,
) -> Result<B::Output>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    check_system("lusolve", a, b.as_columns().nrows())?;

    let lu = match a {
        Matrix::Dense(a) => lup_dense(a.view()),
        Matrix::Sparse(a) => lup_sparse(a, options.order, options.pivot_threshold)?,
    };
    lu.solve_with_config(b, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomp::lup;
    use crate::sparse::CscMatrix;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};
    use num_complex::Complex64;

    fn system() -> Array2<f64> {
        array![[4.0, 1.0, 0.0, 2.0], [1.0, 3.0, 1.0, 0.0], [0.0, 1.0, 2.0, 0.0], [3.0, 0.0, 0.0, 5.0]]
    }

    #[test]
    fn test_lusolve_dense() {
        let a = system();
        let b = array![1.0_f64, 2.0, 3.0, 4.0];

        let x = lusolve(&Matrix::Dense(a.clone()), &b).expect("LU solve should succeed");

        let ax = a.dot(&x);
        for i in 0..4 {
            assert_relative_eq!(ax[i], b[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lusolve_sparse_every_ordering() {
        let a = system();
        let sparse = Matrix::Sparse(CscMatrix::from_dense(&a, 0.0));
        let b = array![[1.0_f64, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, -1.0]];

        for code in 0..=3 {
            for threshold in [1.0, 0.1] {
                let options = LusolveOptions::new(
                    ColumnOrdering::from_code(code).expect("valid code"),
                    threshold,
                );
                let x = lusolve_with_options(&sparse, &b, &options).expect("solvable");
                let ax = a.dot(&x);
                for (got, want) in ax.iter().zip(b.iter()) {
                    assert_relative_eq!(*got, *want, epsilon = 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_lusolve_complex() {
        let a = array![
            [Complex64::new(4.0, 1.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(3.0, -1.0)],
        ];
        let b = array![Complex64::new(1.0, 1.0), Complex64::new(2.0, -1.0)];

        let x = lusolve(&Matrix::Dense(a.clone()), &b).expect("LU solve should succeed");

        let ax = a.dot(&x);
        for i in 0..2 {
            assert_relative_eq!((ax[i] - b[i]).norm(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lusolve_singular() {
        let a = array![[1.0_f64, 1.0], [0.0, 0.0]];
        let b = array![1.0_f64, 1.0];

        let err = lusolve(&Matrix::Dense(a.clone()), &b).unwrap_err();
        assert_eq!(err, DecompError::SingularSystem);
        assert_eq!(
            err.to_string(),
            "Linear system cannot be solved since matrix is singular"
        );

        let sparse = Matrix::Sparse(CscMatrix::from_dense(&a, 0.0));
        assert!(lusolve(&sparse, &b).unwrap_err().is_singular());
    }

    #[test]
    fn test_reuse_factorization() {
        let a = system();
        let lu = lup(&Matrix::Dense(a.clone()));

        for b in [array![1.0_f64, 2.0, 3.0, 4.0], array![4.0, 5.0, 6.0, 7.0]] {
            let x: Array1<f64> = lu.solve(&b).expect("Solve should succeed");
            let ax = a.dot(&x);
            for i in 0..4 {
                assert_relative_eq!(ax[i], b[i], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_lusolve_rejects_bad_shapes() {
        let rect = Matrix::Dense(Array2::<f64>::zeros((2, 3)));
        assert!(matches!(
            lusolve(&rect, &array![1.0, 2.0]),
            Err(DecompError::NotSquare { operation: "lusolve", .. })
        ));

        let lu = lup(&rect);
        assert!(lu.solve(&array![1.0, 2.0]).is_err());

        let square = Matrix::Dense(Array2::<f64>::eye(3));
        assert!(matches!(
            lusolve(&square, &array![1.0, 2.0]),
            Err(DecompError::DimensionMismatch { expected: 3, got: 2, .. })
        ));
    }
}
