//! Error types for the solver core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SolverError>;

/// Fatal failures of the solver core.
///
/// Degenerate elements (det J ≈ 0 at a Gauss point) are logged and skipped
/// rather than reported here, and an iterative solve hitting its iteration
/// cap is a status on [`crate::solvers::SolveStats`], not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Out-of-range index passed to a sparse matrix operation. Always a
    /// programmer error in assembly or boundary-condition application.
    #[error("index ({row}, {col}) outside matrix bounds {rows}x{cols}")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Skyline construction found unequal lower/upper off-diagonal counts.
    #[error("nonzero pattern is not symmetric: {lower} lower vs {upper} upper entries")]
    AsymmetricPattern { lower: usize, upper: usize },

    /// A U diagonal rounded to zero during ILU factorization; the system
    /// is likely singular.
    #[error("zero pivot at row {0} in ILU factorization")]
    ZeroPivot(usize),

    /// A constrained degree of freedom has no stored (or a zero) diagonal
    /// entry in the assembled matrix.
    #[error("no nonzero diagonal stored at constrained dof {0}")]
    MissingDiagonal(usize),

    /// The input records describe a configuration the solver does not
    /// support (unknown element type, dof count, Gauss rule, malformed
    /// connectivity, missing material parameters).
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
}
