//! All solutions of a singular triangular system
//!
//! Substitution runs over a worklist of candidate solutions. At each row:
//!
//! ```text
//! pivot ≠ 0            solve the variable in every candidate
//! pivot = 0, rhs = 0   free variable: keep 0, and the first surviving
//!                      candidate also spawns a copy with the variable set to 1
//! pivot = 0, rhs ≠ 0   inconsistent: drop that candidate
//! ```
//!
//! Branching only happens at genuinely free columns, and the number of live
//! candidates is capped by [`DecompConfig::max_candidate_solutions`].

use crate::config::DecompConfig;
use crate::error::{DecompError, Result};
use crate::matrix::{Matrix, RightHandSide};
use crate::parallel::parallel_try_map_indexed;
use crate::solve::triangular::{Triangle, check_system};
use crate::traits::ComplexField;
use ndarray::{Array1, Array2, ArrayView1};
use num_traits::{Float, Zero};

/// Every solution of `U·x = b` for a possibly singular upper triangular `U`.
///
/// An inconsistent system yields an empty list.
///
/// ```
/// # use math_audio_decomp::{Matrix, usolve_all};
/// # use ndarray::array;
/// let u = Matrix::Dense(array![[1.0_f64, 1.0, -1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 2.0]]);
/// let solutions = usolve_all(&u, &array![1.0, 2.0, 4.0]).unwrap();
/// assert_eq!(solutions, vec![array![3.0, 0.0, 2.0], array![2.0, 1.0, 2.0]]);
/// ```
pub fn usolve_all<T, B>(u: &Matrix<T>, b: &B) -> Result<Vec<B::Output>>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    usolve_all_with_config(u, b, &DecompConfig::global())
}

/// [`usolve_all`] with an explicit configuration
pub fn usolve_all_with_config<T, B>(
    u: &Matrix<T>,
    b: &B,
    config: &DecompConfig,
) -> Result<Vec<B::Output>>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    solve_all("usolve_all", u, b, Triangle::Upper, config)
}

/// Every solution of `L·x = b` for a possibly singular lower triangular `L`
pub fn lsolve_all<T, B>(l: &Matrix<T>, b: &B) -> Result<Vec<B::Output>>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    lsolve_all_with_config(l, b, &DecompConfig::global())
}

/// [`lsolve_all`] with an explicit configuration
pub fn lsolve_all_with_config<T, B>(
    l: &Matrix<T>,
    b: &B,
    config: &DecompConfig,
) -> Result<Vec<B::Output>>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    solve_all("lsolve_all", l, b, Triangle::Lower, config)
}

fn solve_all<T, B>(
    operation: &'static str,
    a: &Matrix<T>,
    b: &B,
    triangle: Triangle,
    config: &DecompConfig,
) -> Result<Vec<B::Output>>
where
    T: ComplexField,
    B: RightHandSide<T>,
{
    let b = b.as_columns();
    let n = check_system(operation, a, b.nrows())?;
    let limit = config.max_candidate_solutions;

    let per_column = parallel_try_map_indexed(b.ncols(), |j| {
        column_solutions(a, b.column(j), triangle, config)
    })?;

    // Cartesian product of the per-column solution sets, first column slowest
    let mut total: usize = 1;
    for solutions in &per_column {
        total = total.saturating_mul(solutions.len());
    }
    if total > limit {
        return Err(DecompError::SolutionLimitExceeded { limit });
    }

    let mut results = Vec::with_capacity(total);
    let mut choice = vec![0; per_column.len()];
    for _ in 0..total {
        let mut x = Array2::zeros((n, per_column.len()));
        for (j, solutions) in per_column.iter().enumerate() {
            x.column_mut(j).assign(&solutions[choice[j]]);
        }
        results.push(B::from_columns(x));

        for j in (0..choice.len()).rev() {
            choice[j] += 1;
            if choice[j] < per_column[j].len() {
                break;
            }
            choice[j] = 0;
        }
    }

    log::debug!("{operation}: {n}x{n} system has {} solution(s)", results.len());
    Ok(results)
}

struct Candidate<T: ComplexField> {
    x: Array1<T>,
    /// Right-hand side with the contribution of solved variables removed
    rhs: Array1<T>,
}

fn column_solutions<T: ComplexField>(
    a: &Matrix<T>,
    b: ArrayView1<'_, T>,
    triangle: Triangle,
    config: &DecompConfig,
) -> Result<Vec<Array1<T>>> {
    let n = b.len();
    let limit = config.max_candidate_solutions;
    let pivot_tol = T::real_from_f64(config.absolute_tolerance);
    let scale = b.iter().fold(T::Real::zero(), |acc, v| acc.max(v.norm()));
    let rhs_tol = pivot_tol.max(T::real_from_f64(config.relative_tolerance) * scale);

    let mut candidates = vec![Candidate {
        x: Array1::zeros(n),
        rhs: b.to_owned(),
    }];

    for i in triangle.order(n) {
        let pivot = a.get(i, i);
        let column = pending_entries(a, i, triangle);

        if !pivot.is_zero_approx(pivot_tol) {
            let pivot_inv = pivot.inv();
            for candidate in &mut candidates {
                let xi = candidate.rhs[i] * pivot_inv;
                candidate.x[i] = xi;
                eliminate(&mut candidate.rhs, &column, xi);
            }
            continue;
        }

        let before = candidates.len();
        candidates.retain(|c| c.rhs[i].is_zero_approx(rhs_tol));
        if candidates.len() < before {
            log::debug!(
                "row {i}: {} inconsistent candidate(s) dropped",
                before - candidates.len()
            );
        }

        // Free variable: the first survivor branches with x[i] = 1
        if let Some(first) = candidates.first() {
            let mut x = first.x.clone();
            let mut rhs = first.rhs.clone();
            x[i] = T::one();
            eliminate(&mut rhs, &column, T::one());
            candidates.push(Candidate { x, rhs });

            if candidates.len() > limit {
                return Err(DecompError::SolutionLimitExceeded { limit });
            }
        }
    }

    Ok(candidates.into_iter().map(|c| c.x).collect())
}

/// Nonzero entries of column `j` in rows not yet solved
fn pending_entries<T: ComplexField>(a: &Matrix<T>, j: usize, triangle: Triangle) -> Vec<(usize, T)> {
    match a {
        Matrix::Dense(a) => a
            .column(j)
            .indexed_iter()
            .filter(|&(i, v)| triangle.pending(i, j) && !v.is_zero())
            .map(|(i, &v)| (i, v))
            .collect(),
        Matrix::Sparse(a) => a
            .col_entries(j)
            .filter(|&(i, _)| triangle.pending(i, j))
            .collect(),
    }
}

fn eliminate<T: ComplexField>(rhs: &mut Array1<T>, column: &[(usize, T)], xj: T) {
    if xj == T::zero() {
        return;
    }
    for &(i, v) in column {
        rhs[i] -= v * xj;
    }
}
