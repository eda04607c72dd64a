//! Fill-reducing column orderings for sparse LU
//!
//! The orderings simulate symmetric elimination on a graph built from the
//! sparsity pattern and always eliminate a node of minimum degree next:
//!
//! ```text
//! 1. Build the symmetric adjacency graph (A + Aᵗ, or Aᵗ·A)
//! 2. While nodes remain:
//!    a. Select node p with minimum degree (lowest index on ties)
//!    b. Append p to the ordering
//!    c. Eliminate p: connect all neighbours of p to each other
//! ```

use crate::error::{DecompError, Result};
use crate::sparse::CscMatrix;
use crate::traits::ComplexField;
use std::collections::BTreeSet;

/// Column ordering strategy for the sparse LU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnOrdering {
    /// Keep the columns as given (code 0)
    #[default]
    Natural,
    /// Minimum degree on A + Aᵗ (code 1); falls back to Aᵗ·A for non-square input
    SymmetricAmd,
    /// Minimum degree on Aᵗ·A after dropping dense rows (code 2)
    NormalAmdDropDense,
    /// Minimum degree on Aᵗ·A (code 3)
    NormalAmd,
}

impl ColumnOrdering {
    /// Map the integer codes `0..=3` onto orderings
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(ColumnOrdering::Natural),
            1 => Ok(ColumnOrdering::SymmetricAmd),
            2 => Ok(ColumnOrdering::NormalAmdDropDense),
            3 => Ok(ColumnOrdering::NormalAmd),
            other => Err(DecompError::InvalidArgument(format!(
                "column ordering must be 0, 1, 2 or 3, got {other}"
            ))),
        }
    }
}

/// Compute the column permutation `q` for `a`, or `None` for the natural order.
///
/// `q[k]` is the original column placed at position `k`.
pub fn column_ordering<T: ComplexField>(
    a: &CscMatrix<T>,
    ordering: ColumnOrdering,
) -> Option<Vec<usize>> {
    let adjacency = match ordering {
        ColumnOrdering::Natural => return None,
        ColumnOrdering::SymmetricAmd if a.num_rows == a.num_cols => symmetric_pattern(a),
        ColumnOrdering::SymmetricAmd | ColumnOrdering::NormalAmd => normal_pattern(a, usize::MAX),
        ColumnOrdering::NormalAmdDropDense => {
            let n = a.num_cols;
            let dense = ((10.0 * (n as f64).sqrt()) as usize).max(16);
            let dense = dense.min(n.saturating_sub(2));
            normal_pattern(a, dense)
        }
    };

    let order = minimum_degree(adjacency);
    log::debug!(
        "{:?} ordering of {}x{} matrix ({} nnz)",
        ordering,
        a.num_rows,
        a.num_cols,
        a.nnz()
    );
    Some(order)
}

/// Column graph of A + Aᵗ (square input)
fn symmetric_pattern<T: ComplexField>(a: &CscMatrix<T>) -> Vec<BTreeSet<usize>> {
    let n = a.num_cols;
    let mut adjacency = vec![BTreeSet::new(); n];
    for j in 0..n {
        for &i in &a.row_indices[a.col_range(j)] {
            if i != j {
                adjacency[i].insert(j);
                adjacency[j].insert(i);
            }
        }
    }
    adjacency
}

/// Column graph of Aᵗ·A, ignoring rows with more than `dense` entries
fn normal_pattern<T: ComplexField>(a: &CscMatrix<T>, dense: usize) -> Vec<BTreeSet<usize>> {
    let n = a.num_cols;
    let mut rows: Vec<Vec<usize>> = vec![Vec::new(); a.num_rows];
    for j in 0..n {
        for &i in &a.row_indices[a.col_range(j)] {
            rows[i].push(j);
        }
    }

    let mut adjacency = vec![BTreeSet::new(); n];
    for cols in rows.iter().filter(|cols| cols.len() <= dense) {
        for &j in cols {
            for &k in cols {
                if j != k {
                    adjacency[j].insert(k);
                }
            }
        }
    }
    adjacency
}

fn minimum_degree(mut adjacency: Vec<BTreeSet<usize>>) -> Vec<usize> {
    let n = adjacency.len();
    let mut eliminated = vec![false; n];
    let mut order = Vec::with_capacity(n);

    for _ in 0..n {
        let Some(p) = (0..n)
            .filter(|&v| !eliminated[v])
            .min_by_key(|&v| (adjacency[v].len(), v))
        else {
            break;
        };

        eliminated[p] = true;
        order.push(p);

        let neighbours = std::mem::take(&mut adjacency[p]);
        for &u in &neighbours {
            adjacency[u].remove(&p);
            for &w in &neighbours {
                if w != u {
                    adjacency[u].insert(w);
                }
            }
        }
    }

    order
}
