//! Symmetric-pattern skyline (CSLR) view of an assembled sparse matrix.
//!
//! The diagonal is stored separately; the strict-lower triangle and its
//! symmetrically-paired strict-upper entries share one set of row-pointer
//! and column-index arrays. ILU(0) and the triangular sweeps need both
//! triangles with matching sparsity, and sharing the index arrays halves
//! index storage.

use crate::error::{Result, SolverError};
use crate::sparse::SparseMatrix;

/// Immutable CSLR view derived from a reordered [`SparseMatrix`].
///
/// Invariants: `iptr[0] = 0`, `iptr[n] = tr_nonzeros`; for each row i the
/// column indices in `jptr[iptr[i]..iptr[i + 1]]` are strictly less than i
/// and ascending; `lower[k]` stores A(i, jptr[k]) for the row i owning
/// slot k, and `upper[k]` stores the paired A(jptr[k], i).
#[derive(Debug, Clone, PartialEq)]
pub struct SkylineView {
    rows_count: usize,
    nonzeros: usize,
    diag: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    jptr: Vec<usize>,
    iptr: Vec<usize>,
}

impl SkylineView {
    /// Build the skyline view of a reordered matrix.
    ///
    /// The nonzero pattern must be symmetric; lower and upper off-diagonal
    /// entry counts are compared and construction fails with
    /// [`SolverError::AsymmetricPattern`] when they differ or when a lower
    /// entry has no stored upper mate.
    ///
    /// # Panics
    ///
    /// Panics if the matrix has not been reordered; assembly must call
    /// [`SparseMatrix::reorder`] first.
    pub fn from_sparse(mtx: &SparseMatrix) -> Result<Self> {
        assert!(
            mtx.is_ordered(),
            "skyline view requires a reordered sparse matrix"
        );
        let n = mtx.rows_count();

        let mut lower_count = 0;
        let mut upper_count = 0;
        for i in 0..n {
            for (col, _) in mtx.row(i).entries() {
                if col < i {
                    lower_count += 1;
                } else if col > i {
                    upper_count += 1;
                }
            }
        }
        if lower_count != upper_count {
            return Err(SolverError::AsymmetricPattern {
                lower: lower_count,
                upper: upper_count,
            });
        }

        let mut diag = Vec::with_capacity(n);
        for i in 0..n {
            diag.push(mtx.get(i, i));
        }

        let mut lower = Vec::with_capacity(lower_count);
        let mut upper = Vec::with_capacity(lower_count);
        let mut jptr = Vec::with_capacity(lower_count);
        let mut iptr = Vec::with_capacity(n + 1);
        for i in 0..n {
            iptr.push(lower.len());
            for (col, value) in mtx.row(i).entries() {
                if col >= i {
                    continue;
                }
                let mate = mtx.element(col, i).ok_or(SolverError::AsymmetricPattern {
                    lower: lower_count,
                    upper: upper_count,
                })?;
                jptr.push(col);
                lower.push(value);
                upper.push(mate);
            }
        }
        iptr.push(lower.len());

        Ok(Self {
            rows_count: n,
            nonzeros: mtx.nnz(),
            diag,
            lower,
            upper,
            jptr,
            iptr,
        })
    }

    /// Matrix dimension
    pub fn rows_count(&self) -> usize {
        self.rows_count
    }

    /// Total stored entries of the parent matrix
    pub fn nonzeros(&self) -> usize {
        self.nonzeros
    }

    /// Number of strict-lower (equivalently strict-upper) entries
    pub fn tr_nonzeros(&self) -> usize {
        self.lower.len()
    }

    /// Diagonal values
    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    /// Strict-lower triangle values in slot order
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Strict-upper triangle values, paired slot-for-slot with the lower
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Column index of each slot
    pub fn jptr(&self) -> &[usize] {
        &self.jptr
    }

    /// Row offsets into the slot arrays, length `rows_count + 1`
    pub fn iptr(&self) -> &[usize] {
        &self.iptr
    }

    /// Slot range of row i's strict-lower entries
    pub fn row_range(&self, i: usize) -> std::ops::Range<usize> {
        self.iptr[i]..self.iptr[i + 1]
    }
}
