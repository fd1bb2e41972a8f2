//! Prescribed-displacement enforcement on the assembled system.
//!
//! Symmetry-preserving elimination: for a constrained global dof I with
//! value ū, the coupling column K_jI is folded into the right-hand side
//! and zeroed together with the row K_Ij, while the diagonal keeps its
//! assembled scale so that the modified system yields x_I = ū exactly.

use fea_model::PrescribedBc;

use crate::assembly::DOF;
use crate::error::{Result, SolverError};
use crate::sparse::SparseMatrix;

/// Apply every masked component of the prescribed boundary set.
pub fn apply_prescribed(
    matrix: &mut SparseMatrix,
    forces: &mut [f64],
    boundary: &[PrescribedBc],
) -> Result<()> {
    for bc in boundary {
        for axis in 0..DOF {
            if bc.mask.has(axis) {
                apply_single(matrix, forces, bc.node * DOF + axis, bc.values[axis])?;
            }
        }
    }
    Ok(())
}

/// Enforce one prescribed dof on the assembled system.
///
/// The diagonal K_II must be stored and nonzero
/// ([`SolverError::MissingDiagonal`] otherwise). For every other row j,
/// a stored K_jI contributes −K_jI·ū to f_j and is zeroed; a stored K_Ij
/// is zeroed. Finally f_I = K_II·ū.
pub fn apply_single(
    matrix: &mut SparseMatrix,
    forces: &mut [f64],
    index: usize,
    value: f64,
) -> Result<()> {
    let size = matrix.rows_count();
    if index >= size {
        return Err(SolverError::IndexOutOfRange {
            row: index,
            col: index,
            rows: size,
            cols: matrix.cols_count(),
        });
    }

    let diag = matrix
        .element(index, index)
        .filter(|d| d.abs() >= f64::MIN_POSITIVE)
        .ok_or(SolverError::MissingDiagonal(index))?;

    for j in 0..size {
        if j == index {
            continue;
        }
        if let Some(entry) = matrix.element_mut(j, index) {
            forces[j] -= *entry * value;
            *entry = 0.0;
        }
        if let Some(entry) = matrix.element_mut(index, j) {
            *entry = 0.0;
        }
    }

    forces[index] = diag * value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use fea_model::DofMask;

    fn coupled_3x3() -> SparseMatrix {
        // | 4 1 0 |
        // | 1 3 2 |
        // | 0 2 5 |
        let mut mtx = SparseMatrix::new(3, 3, 3);
        let entries = [
            (0, 0, 4.0),
            (0, 1, 1.0),
            (1, 0, 1.0),
            (1, 1, 3.0),
            (1, 2, 2.0),
            (2, 1, 2.0),
            (2, 2, 5.0),
        ];
        for &(i, j, v) in &entries {
            mtx.add(i, j, v).unwrap();
        }
        mtx.reorder();
        mtx
    }

    #[test]
    fn single_bc_eliminates_coupling() {
        let mut mtx = coupled_3x3();
        let mut forces = [1.0, 1.0, 1.0];
        apply_single(&mut mtx, &mut forces, 1, 2.0).unwrap();

        // diagonal preserved, coupling zeroed
        assert_eq!(mtx.get(1, 1), 3.0);
        assert_eq!(mtx.get(0, 1), 0.0);
        assert_eq!(mtx.get(2, 1), 0.0);
        assert_eq!(mtx.get(1, 0), 0.0);
        assert_eq!(mtx.get(1, 2), 0.0);

        // right-hand side folds the eliminated column
        assert_abs_diff_eq!(forces[0], 1.0 - 1.0 * 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(forces[2], 1.0 - 2.0 * 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(forces[1], 3.0 * 2.0, epsilon = 1e-15);
    }

    #[test]
    fn enforced_dof_solves_to_prescribed_value() {
        let mut mtx = coupled_3x3();
        let mut forces = [0.0, 0.0, 0.0];
        apply_single(&mut mtx, &mut forces, 0, 1.5).unwrap();

        let mut x = [0.0; 3];
        let stats = mtx.solve_cg(&forces, &forces, 100, 1e-14, &mut x);
        assert!(stats.converged);
        assert_abs_diff_eq!(x[0], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn missing_diagonal_is_rejected() {
        let mut mtx = SparseMatrix::new(2, 2, 2);
        mtx.add(0, 0, 1.0).unwrap();
        mtx.add(0, 1, 1.0).unwrap();
        mtx.add(1, 0, 1.0).unwrap();
        mtx.reorder();
        let mut forces = [0.0, 0.0];

        let err = apply_single(&mut mtx, &mut forces, 1, 1.0).unwrap_err();
        assert_eq!(err, SolverError::MissingDiagonal(1));
    }

    #[test]
    fn mask_selects_components() {
        let mut mtx = SparseMatrix::square(6);
        for i in 0..6 {
            mtx.add(i, i, 2.0).unwrap();
        }
        mtx.reorder();
        let mut forces = [0.0; 6];

        // node 1, y and z only
        let bc = PrescribedBc::new(1, [9.0, 0.25, -0.5], DofMask::Y.union(DofMask::Z));
        apply_prescribed(&mut mtx, &mut forces, &[bc]).unwrap();

        assert_eq!(forces[3], 0.0); // x untouched, ignored value
        assert_abs_diff_eq!(forces[4], 2.0 * 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(forces[5], 2.0 * -0.5, epsilon = 1e-15);
    }
}
