//! ILU(0) factorization over a skyline pattern.
//!
//! The factor introduces no fill-in: L and U live on exactly the parent's
//! sparsity, so the three value arrays (U diagonal, strict-lower L,
//! strict-upper U) reuse the parent's `jptr`/`iptr` index arrays. L has an
//! implicit unit diagonal.

use crate::error::{Result, SolverError};
use crate::skyline::SkylineView;

/// Incomplete LU decomposition M = L·U of a skyline matrix, used as the
/// PCG preconditioner.
///
/// Takes ownership of its [`SkylineView`]; dropping the factor releases
/// both.
#[derive(Debug, Clone, PartialEq)]
pub struct IluFactor {
    parent: SkylineView,
    diag: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl IluFactor {
    /// Factor the skyline matrix.
    ///
    /// For every row k the strict-lower entries L_kq, the diagonal U_kk,
    /// and the strict-upper column entries U_kj are computed with sums
    /// restricted to the intersection of the row sparsity patterns. Fails
    /// with [`SolverError::ZeroPivot`] when a U diagonal rounds to zero.
    pub fn new(parent: SkylineView) -> Result<Self> {
        let n = parent.rows_count();
        let jptr = parent.jptr();
        let mut diag = vec![0.0; n];
        let mut lower = vec![0.0; parent.tr_nonzeros()];
        let mut upper = vec![0.0; parent.tr_nonzeros()];

        for k in 0..n {
            // L_kq = (A_kq - sum_c L_kc * U_cq) / U_qq over the column
            // intersection of row k and row q, q = jptr[j]
            for j in parent.row_range(k) {
                let q = jptr[j];
                let mut sum = 0.0;
                for i in parent.row_range(k) {
                    for l in parent.row_range(q) {
                        if jptr[i] == jptr[l] {
                            sum += lower[i] * upper[l];
                        }
                    }
                }
                lower[j] = (parent.lower()[j] - sum) / diag[q];
            }

            // U_kk = A_kk - sum_c L_kc * U_ck
            let mut sum = 0.0;
            for i in parent.row_range(k) {
                sum += lower[i] * upper[i];
            }
            diag[k] = parent.diag()[k] - sum;
            if diag[k].abs() < f64::MIN_POSITIVE {
                return Err(SolverError::ZeroPivot(k));
            }

            // U_kj = A_kj - sum_c L_kc * U_cj for every j >= k whose
            // strict-lower row contains column k
            for j in k..n {
                for q in parent.row_range(j) {
                    if jptr[q] == k {
                        let mut sum = 0.0;
                        for i in parent.row_range(k) {
                            for l in parent.row_range(j) {
                                if jptr[i] == jptr[l] {
                                    sum += lower[i] * upper[l];
                                }
                            }
                        }
                        upper[q] = parent.upper()[q] - sum;
                        break;
                    }
                }
            }
        }

        Ok(Self {
            parent,
            diag,
            lower,
            upper,
        })
    }

    /// The skyline matrix this factor was built from
    pub fn parent(&self) -> &SkylineView {
        &self.parent
    }

    /// U diagonal
    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    /// Strict-lower L values in slot order
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Strict-upper U values in slot order
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// y ← L·x (unit diagonal)
    pub fn lower_mv(&self, x: &[f64], y: &mut [f64]) {
        let jptr = self.parent.jptr();
        for i in 0..self.parent.rows_count() {
            let mut sum = x[i];
            for j in self.parent.row_range(i) {
                sum += x[jptr[j]] * self.lower[j];
            }
            y[i] = sum;
        }
    }

    /// y ← U·x
    pub fn upper_mv(&self, x: &[f64], y: &mut [f64]) {
        let jptr = self.parent.jptr();
        for i in 0..self.parent.rows_count() {
            y[i] = x[i] * self.diag[i];
        }
        for i in 0..self.parent.rows_count() {
            for j in self.parent.row_range(i) {
                y[jptr[j]] += x[i] * self.upper[j];
            }
        }
    }

    /// Solve L·x = b by forward substitution.
    ///
    /// `b` is consumed as a scratch buffer and holds garbage afterwards;
    /// pass a throwaway copy, never a shared vector.
    pub fn lower_solve(&self, b: &mut [f64], x: &mut [f64]) {
        let jptr = self.parent.jptr();
        x.fill(0.0);
        for i in 0..self.parent.rows_count() {
            for j in self.parent.row_range(i) {
                b[i] -= x[jptr[j]] * self.lower[j];
            }
            x[i] = b[i];
        }
    }

    /// Solve U·x = b by backward substitution.
    ///
    /// Same contract as [`IluFactor::lower_solve`]: `b` is clobbered.
    pub fn upper_solve(&self, b: &mut [f64], x: &mut [f64]) {
        let jptr = self.parent.jptr();
        x.fill(0.0);
        for i in (0..self.parent.rows_count()).rev() {
            x[i] = b[i] / self.diag[i];
            for j in self.parent.row_range(i) {
                b[jptr[j]] -= x[i] * self.upper[j];
            }
        }
    }
}
