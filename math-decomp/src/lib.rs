//! Matrix decompositions and linear solvers for dense and sparse matrices
//!
//! This crate provides LU, QR and SVD decompositions together with the
//! solvers built on them, generic over real and complex scalars.
//!
//! # Features
//!
//! - **Decompositions**: LU with partial pivoting (dense and sparse, with
//!   fill-reducing column orderings), Householder QR, one-sided Jacobi SVD
//! - **Solvers**: forward/back substitution, all solutions of singular
//!   triangular systems, `lusolve`, inverse and Moore-Penrose pseudoinverse
//! - **Sparse Matrices**: CSC format behind the same [`Matrix`] interface as
//!   dense `ndarray` matrices
//! - **Generic Scalar Types**: Works with Complex64, Complex32, f64, f32
//! - **Configuration**: process-wide tolerances, loadable from JSON or TOML
//!
//! # Example
//!
//! ```
//! use math_audio_decomp::{Matrix, lusolve, lup};
//! use ndarray::array;
//!
//! let a = Matrix::Dense(array![[2.0_f64, 1.0], [4.0, -6.0]]);
//!
//! // Factor once, solve many times
//! let lu = lup(&a);
//! let x = lu.solve(&array![3.0, -2.0]).unwrap();
//!
//! // Or in one call
//! let y = lusolve(&a, &array![3.0, -2.0]).unwrap();
//! assert_eq!(x, y);
//! ```

pub mod config;
pub mod decomp;
pub mod error;
pub mod matrix;
pub mod nd;
pub mod parallel;
pub mod solve;
pub mod sparse;
pub mod traits;

// Re-export main types
pub use config::{
    ConfigError, ConfigFormat, DecompConfig, load_config, parse_config, serialize_config,
    set_global_config,
};
pub use error::{DecompError, Result};
pub use matrix::{Matrix, RightHandSide, adjoint};
pub use sparse::{ColumnOrdering, CscBuilder, CscMatrix, column_ordering};
pub use traits::ComplexField;

// Re-export decompositions
pub use decomp::{
    LuDecomposition, QrDecomposition, SvdDecomposition, lup, lup_dense, lup_sparse, qr, qr_dense,
    qr_with_config, svd, svd_dense, svd_with_config,
};

// Re-export solvers
pub use solve::{
    LusolveOptions, inv, inv_dense, inv_with_config, lsolve, lsolve_all, lsolve_all_with_config,
    lsolve_with_config, lusolve, lusolve_with_config, lusolve_with_options, pinv, pinv_dense,
    pinv_with_config, usolve, usolve_all, usolve_all_with_config, usolve_with_config,
};

pub use nd::{inv_nd, pinv_nd, qr_nd, svd_nd};
