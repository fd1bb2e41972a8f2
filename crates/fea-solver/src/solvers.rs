//! Iterative solvers for the assembled system.
//!
//! Conjugate gradient and ILU(0)-preconditioned conjugate gradient, after
//! Saad, "Iterative Methods for Sparse Linear Systems" (2nd ed., pages 178
//! and 246). Both terminate on the infinity norm of the true residual and
//! report the best-so-far iterate when the iteration cap is reached; the
//! caller inspects [`SolveStats::converged`].

use fea_model::{SolverConfig, SolverKind};

use crate::error::{Result, SolverError};
use crate::ilu::IluFactor;
use crate::skyline::SkylineView;
use crate::sparse::SparseMatrix;

/// Outcome of an iterative solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveStats {
    /// Iterations performed
    pub iterations: usize,
    /// Final residual infinity norm
    pub residual: f64,
    /// Whether the residual dropped below the tolerance. `false` after an
    /// iteration-cap exit or a breakdown of the search-direction
    /// denominator; the returned x is still the best available iterate.
    pub converged: bool,
}

fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, &x| acc.max(x.abs()))
}

impl SparseMatrix {
    /// Solve A·x = b with the configured solver.
    ///
    /// Keeps the historical behavior of seeding the iteration with
    /// x₀ = b. The matrix must be reordered before calling.
    pub fn solve(&self, config: &SolverConfig, b: &[f64], x: &mut [f64]) -> Result<SolveStats> {
        match config.kind {
            SolverKind::Cg => Ok(self.solve_cg(b, b, config.max_iterations, config.tolerance, x)),
            SolverKind::PcgIlu => {
                self.solve_pcg(b, b, config.max_iterations, config.tolerance, x)
            }
            SolverKind::Cholesky => Err(SolverError::UnsupportedConfiguration(
                "direct skyline Cholesky solver is reserved".to_string(),
            )),
        }
    }

    /// Conjugate gradient iteration starting from `x0`.
    pub fn solve_cg(
        &self,
        b: &[f64],
        x0: &[f64],
        max_iter: usize,
        tolerance: f64,
        x: &mut [f64],
    ) -> SolveStats {
        let n = self.rows_count();
        let mut r = vec![0.0; n];
        let mut p = vec![0.0; n];
        let mut temp = vec![0.0; n];

        x.copy_from_slice(x0);

        // r_0 = b - A*x_0
        self.mv(x, &mut r);
        for i in 0..n {
            r[i] = b[i] - r[i];
        }
        let mut residual = inf_norm(&r);
        if residual < tolerance {
            return SolveStats {
                iterations: 0,
                residual,
                converged: true,
            };
        }

        // p_0 = r_0
        p.copy_from_slice(&r);

        for iter in 0..max_iter {
            // temp = A*p_j
            self.mv(&p, &mut temp);
            let a1: f64 = r.iter().map(|&ri| ri * ri).sum();
            let a2: f64 = p.iter().zip(&temp).map(|(&pi, &ti)| pi * ti).sum();
            if a2 <= f64::MIN_POSITIVE {
                // (p, A*p) lost positivity; stop with the current iterate
                return SolveStats {
                    iterations: iter,
                    residual,
                    converged: false,
                };
            }

            // alpha_j = (r_j, r_j) / (A*p_j, p_j)
            let alpha = a1 / a2;
            for i in 0..n {
                x[i] += alpha * p[i];
                r[i] -= alpha * temp[i];
            }

            residual = inf_norm(&r);
            if residual < tolerance {
                return SolveStats {
                    iterations: iter + 1,
                    residual,
                    converged: true,
                };
            }

            // beta_j = (r_{j+1}, r_{j+1}) / (r_j, r_j)
            let a2: f64 = r.iter().map(|&ri| ri * ri).sum();
            let beta = a2 / a1;
            for i in 0..n {
                p[i] = r[i] + beta * p[i];
            }
        }

        SolveStats {
            iterations: max_iter,
            residual,
            converged: false,
        }
    }

    /// ILU(0)-preconditioned conjugate gradient starting from `x0`.
    ///
    /// Builds the skyline view and its ILU(0) factor, applies
    /// z = (L·U)⁻¹·r at every residual update through the two triangular
    /// solves, and bases search directions and inner products on z.
    /// Termination is on the true residual, not the preconditioned one.
    pub fn solve_pcg(
        &self,
        b: &[f64],
        x0: &[f64],
        max_iter: usize,
        tolerance: f64,
        x: &mut [f64],
    ) -> Result<SolveStats> {
        let n = self.rows_count();
        let ilu = IluFactor::new(SkylineView::from_sparse(self)?)?;

        let mut r = vec![0.0; n];
        let mut r1 = vec![0.0; n]; // scratch copy consumed by the solves
        let mut p = vec![0.0; n];
        let mut z = vec![0.0; n];
        let mut temp = vec![0.0; n];

        x.copy_from_slice(x0);

        // r_0 = b - A*x_0
        self.mv(x, &mut r);
        for i in 0..n {
            r[i] = b[i] - r[i];
        }
        let mut residual = inf_norm(&r);
        if residual < tolerance {
            return Ok(SolveStats {
                iterations: 0,
                residual,
                converged: true,
            });
        }

        // z_0 = M^{-1}*r_0: solve L*y = r then U*z = y
        r1.copy_from_slice(&r);
        ilu.lower_solve(&mut r1, &mut temp);
        ilu.upper_solve(&mut temp, &mut z);

        // p_0 = z_0
        p.copy_from_slice(&z);

        for iter in 0..max_iter {
            // temp = A*p_j
            self.mv(&p, &mut temp);
            let a1: f64 = r.iter().zip(&z).map(|(&ri, &zi)| ri * zi).sum();
            let a2: f64 = p.iter().zip(&temp).map(|(&pi, &ti)| pi * ti).sum();
            if a2 <= f64::MIN_POSITIVE {
                return Ok(SolveStats {
                    iterations: iter,
                    residual,
                    converged: false,
                });
            }

            // alpha_j = (r_j, z_j) / (A*p_j, p_j)
            let alpha = a1 / a2;
            for i in 0..n {
                x[i] += alpha * p[i];
                r[i] -= alpha * temp[i];
            }

            residual = inf_norm(&r);
            if residual < tolerance {
                return Ok(SolveStats {
                    iterations: iter + 1,
                    residual,
                    converged: true,
                });
            }

            // z_{j+1} = M^{-1}*r_{j+1}
            r1.copy_from_slice(&r);
            ilu.lower_solve(&mut r1, &mut temp);
            ilu.upper_solve(&mut temp, &mut z);

            // beta_j = (r_{j+1}, z_{j+1}) / (r_j, z_j)
            let a2: f64 = r.iter().zip(&z).map(|(&ri, &zi)| ri * zi).sum();
            let beta = a2 / a1;
            for i in 0..n {
                p[i] = z[i] + beta * p[i];
            }
        }

        Ok(SolveStats {
            iterations: max_iter,
            residual,
            converged: false,
        })
    }
}
