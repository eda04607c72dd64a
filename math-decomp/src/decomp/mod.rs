//! Matrix decompositions
//!
//! - [`lup`]: LU with partial pivoting, dense or sparse
//! - [`lup_sparse`]: sparse LU with a fill-reducing column ordering
//! - [`qr`]: Householder QR (dense only)
//! - [`svd`]: one-sided Jacobi SVD (dense only)

mod lu;
mod qr;
mod sparse_lu;
mod svd;

pub use lu::{LuDecomposition, lup, lup_dense};
pub use qr::{QrDecomposition, qr, qr_dense, qr_with_config};
pub use sparse_lu::lup_sparse;
pub use svd::{SvdDecomposition, svd, svd_dense, svd_with_config};
