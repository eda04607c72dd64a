//! Sparse matrix structures (CSC format) and fill-reducing orderings
//!
//! This module provides Compressed Sparse Column (CSC) storage, the layout
//! consumed by the sparse LU, together with the column orderings used to
//! limit fill-in.

mod csc;
mod ordering;

pub use csc::{CscBuilder, CscMatrix};
pub use ordering::{ColumnOrdering, column_ordering};
