//! Solvers built on the decompositions
//!
//! - [`lsolve`] / [`usolve`]: forward and back substitution
//! - [`lsolve_all`] / [`usolve_all`]: every solution of a singular triangular system
//! - [`lusolve`]: general square systems through LU
//! - [`inv`], [`pinv`]: inverse and Moore-Penrose pseudoinverse

mod inverse;
mod lusolve;
mod pinv;
mod triangular;
mod triangular_all;

pub use inverse::{inv, inv_dense, inv_with_config};
pub use lusolve::{LusolveOptions, lusolve, lusolve_with_config, lusolve_with_options};
pub use pinv::{pinv, pinv_dense, pinv_with_config};
pub use triangular::{lsolve, lsolve_with_config, usolve, usolve_with_config};
pub use triangular_all::{lsolve_all, lsolve_all_with_config, usolve_all, usolve_all_with_config};
