//! Error types shared by the decomposers and solvers

use thiserror::Error;

/// Errors raised by decompositions and solvers.
///
/// Every error is raised at the point of detection and no partial result is
/// ever returned alongside it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecompError {
    /// Input has the wrong number of dimensions
    #[error("{operation}: Matrix must be two dimensional (got {ndim} dimensions)")]
    NotTwoDimensional { operation: &'static str, ndim: usize },

    /// A square matrix was required
    #[error("{operation}: Matrix must be square (size: {rows}x{cols})")]
    NotSquare {
        operation: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Operand sizes disagree
    #[error("{operation}: dimension mismatch, expected {expected}, got {got}")]
    DimensionMismatch {
        operation: &'static str,
        expected: usize,
        got: usize,
    },

    /// A (near) zero pivot was met during substitution
    #[error("Linear system cannot be solved since matrix is singular")]
    SingularSystem,

    /// Inverse requested for a singular matrix
    #[error("Cannot calculate inverse, determinant is zero")]
    ZeroDeterminant,

    /// Sparse input given to a dense-only decomposition
    #[error("{operation}: sparse matrices are not supported, convert to dense first")]
    UnsupportedInput { operation: &'static str },

    /// The SVD sweep cap was hit before the columns were orthogonal
    #[error("svd: no convergence after {sweeps} sweeps")]
    ConvergenceLimitReached { sweeps: usize },

    /// The all-solutions solver produced too many candidates
    #[error("triangular solve: more than {limit} candidate solutions")]
    SolutionLimitExceeded { limit: usize },

    /// Argument outside of its valid range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl DecompError {
    /// Whether the error stems from a singular matrix
    pub fn is_singular(&self) -> bool {
        matches!(self, DecompError::SingularSystem | DecompError::ZeroDeterminant)
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, DecompError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_condition() {
        let err = DecompError::NotSquare {
            operation: "inv",
            rows: 2,
            cols: 3,
        };
        assert!(err.to_string().contains("Matrix must be square"));
        assert!(err.to_string().starts_with("inv"));

        assert_eq!(
            DecompError::SingularSystem.to_string(),
            "Linear system cannot be solved since matrix is singular"
        );
        assert!(DecompError::ZeroDeterminant.is_singular());
        assert!(!DecompError::UnsupportedInput { operation: "qr" }.is_singular());
    }
}
