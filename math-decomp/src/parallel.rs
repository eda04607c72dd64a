//! Parallel utilities with feature-gated implementations
//!
//! Independent work items (right-hand-side columns of a solve) run on the
//! rayon pool when the `rayon` feature is enabled, sequentially otherwise.
//! Results are returned in item order either way.

/// Check if parallel processing is available
pub fn is_parallel_available() -> bool {
    cfg!(feature = "rayon")
}

/// Parallel map with index
#[cfg(feature = "rayon")]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Sequential map with index (fallback)
#[cfg(not(feature = "rayon"))]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    (0..count).map(f).collect()
}

/// Fallible map with index; the error of the lowest failing index wins
#[cfg(feature = "rayon")]
pub fn parallel_try_map_indexed<U, E, F>(count: usize, f: F) -> Result<Vec<U>, E>
where
    U: Send,
    E: Send,
    F: Fn(usize) -> Result<U, E> + Sync + Send,
{
    use rayon::prelude::*;
    let results: Vec<Result<U, E>> = (0..count).into_par_iter().map(f).collect();
    results.into_iter().collect()
}

/// Sequential fallible map with index (fallback)
#[cfg(not(feature = "rayon"))]
pub fn parallel_try_map_indexed<U, E, F>(count: usize, f: F) -> Result<Vec<U>, E>
where
    U: Send,
    E: Send,
    F: Fn(usize) -> Result<U, E> + Sync + Send,
{
    (0..count).map(f).collect()
}
