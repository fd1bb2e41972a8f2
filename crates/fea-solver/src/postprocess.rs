//! Stress recovery and configuration update.
//!
//! After the linear solve the deformed node array is updated with the
//! displacement vector and the Cauchy stress is evaluated per element at a
//! Gauss point from the deformation gradient.

use fea_model::{Material, MaterialModel, Node};
use nalgebra::Matrix3;

use crate::assembly::{shape_gradients, DOF, ShapeGradientCache};
use crate::element_db::ElementDb;

/// How the deformation gradient is formed.
///
/// The two formulations agree within round-off; `Current` is canonical,
/// `Inverse` is retained for cross-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeformationFormulation {
    /// F from the cached assembly-time gradients and the deformed
    /// coordinates: F_ij = sum_a (x_a)_i dN_a/dX_j.
    #[default]
    Current,
    /// F⁻¹ from fresh deformed-configuration gradients and the reference
    /// coordinates, then inverted:
    /// F⁻¹_ij = sum_a (X_a)_i dN_a/dx_j (Bonet & Wood 7.6-7.7).
    Inverse,
}

/// Add the solved displacements onto the node array in place.
pub fn update_nodes_with_displacements(nodes: &mut [Node], displacements: &[f64]) {
    for (i, node) in nodes.iter_mut().enumerate() {
        node.x += displacements[i * DOF];
        node.y += displacements[i * DOF + 1];
        node.z += displacements[i * DOF + 2];
    }
}

/// Deformation gradient at one Gauss point of one element.
///
/// Returns `None` for a degenerate configuration (no cached gradients, or
/// a singular Jacobian / deformation gradient).
pub fn deformation_gradient(
    db: &ElementDb,
    cache: &ShapeGradientCache,
    reference: &[Node],
    deformed: &[Node],
    connectivity: &[usize],
    element: usize,
    gauss: usize,
    formulation: DeformationFormulation,
) -> Option<Matrix3<f64>> {
    match formulation {
        DeformationFormulation::Current => {
            let sg = cache[element][gauss].as_ref()?;
            let mut f = Matrix3::zeros();
            for (a, &node_id) in connectivity.iter().enumerate() {
                let coords = deformed[node_id].coords();
                for i in 0..3 {
                    for j in 0..3 {
                        f[(i, j)] += coords[i] * sg.grads[(j, a)];
                    }
                }
            }
            Some(f)
        }
        DeformationFormulation::Inverse => {
            let sg = shape_gradients(db.gauss(gauss), deformed, connectivity)?;
            let mut f_inv = Matrix3::zeros();
            for (a, &node_id) in connectivity.iter().enumerate() {
                let coords = reference[node_id].coords();
                for i in 0..3 {
                    for j in 0..3 {
                        f_inv[(i, j)] += coords[i] * sg.grads[(j, a)];
                    }
                }
            }
            f_inv.try_inverse()
        }
    }
}

/// Cauchy stress at one Gauss point of one element.
///
/// Model A5: σ = (λ·tr(C)·I + 2μ·C)/det F with C = ½(FᵀF − I).
/// Compressible neo-Hookean: σ = (μ·(F·Fᵀ − I) + λ·ln(det F)·I)/det F.
pub fn gauss_stress(
    db: &ElementDb,
    cache: &ShapeGradientCache,
    reference: &[Node],
    deformed: &[Node],
    connectivity: &[usize],
    element: usize,
    gauss: usize,
    material: &Material,
    formulation: DeformationFormulation,
) -> Option<Matrix3<f64>> {
    let f = deformation_gradient(
        db,
        cache,
        reference,
        deformed,
        connectivity,
        element,
        gauss,
        formulation,
    )?;
    let det_f = f.determinant();
    if det_f.abs() < f64::EPSILON {
        return None;
    }

    let identity = Matrix3::identity();
    let stress = match material.model {
        MaterialModel::A5 => {
            let c = (f.transpose() * f - identity) * 0.5;
            let i1 = c.trace();
            (identity * (material.lambda() * i1) + c * (2.0 * material.mu())) / det_f
        }
        MaterialModel::CompressibleNeoHookean => {
            let b = f * f.transpose();
            ((b - identity) * material.mu() + identity * (material.lambda() * det_f.ln())) / det_f
        }
    };
    Some(stress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::assemble_global;
    use crate::elements::Tet10;
    use crate::sparse::SparseMatrix;
    use approx::assert_abs_diff_eq;
    use fea_model::{Element as MeshElement, SolutionParams};

    fn unit_tet_nodes() -> Vec<Node> {
        vec![
            Node::new(0.0, 0.0, 0.0),
            Node::new(1.0, 0.0, 0.0),
            Node::new(0.0, 1.0, 0.0),
            Node::new(0.0, 0.0, 1.0),
            Node::new(0.5, 0.0, 0.0),
            Node::new(0.5, 0.5, 0.0),
            Node::new(0.0, 0.5, 0.0),
            Node::new(0.0, 0.0, 0.5),
            Node::new(0.5, 0.0, 0.5),
            Node::new(0.0, 0.5, 0.5),
        ]
    }

    fn assembled_cache(
        nodes: &[Node],
        material: &Material,
    ) -> (ElementDb, ShapeGradientCache, Vec<MeshElement>) {
        let db = ElementDb::new(
            &Tet10,
            &SolutionParams {
                nodes_per_element: 10,
                gauss_count: 5,
            },
        )
        .unwrap();
        let elements = vec![MeshElement::new((0..10).collect())];
        let mut matrix = SparseMatrix::square(30);
        let cache = assemble_global(&db, nodes, &elements, material, &mut matrix).unwrap();
        (db, cache, elements)
    }

    #[test]
    fn update_nodes_adds_displacements() {
        let mut nodes = vec![Node::new(1.0, 2.0, 3.0), Node::new(0.0, 0.0, 0.0)];
        let x = [0.1, 0.2, 0.3, -0.1, 0.0, 0.5];
        update_nodes_with_displacements(&mut nodes, &x);
        assert_eq!(nodes[0].coords(), [1.1, 2.2, 3.3]);
        assert_eq!(nodes[1].coords(), [-0.1, 0.0, 0.5]);
    }

    #[test]
    fn undeformed_gradient_is_identity() {
        let nodes = unit_tet_nodes();
        let material = Material::new(MaterialModel::A5, vec![100.0, 100.0]);
        let (db, cache, elements) = assembled_cache(&nodes, &material);

        for formulation in [DeformationFormulation::Current, DeformationFormulation::Inverse] {
            let f = deformation_gradient(
                &db,
                &cache,
                &nodes,
                &nodes,
                &elements[0].nodes,
                0,
                0,
                formulation,
            )
            .unwrap();
            for i in 0..3 {
                for j in 0..3 {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_abs_diff_eq!(f[(i, j)], expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn formulations_agree_on_a_stretched_element() {
        let nodes = unit_tet_nodes();
        let material = Material::new(MaterialModel::A5, vec![100.0, 100.0]);
        let (db, cache, elements) = assembled_cache(&nodes, &material);

        // homogeneous stretch x' = (1.01 x, y, z)
        let mut deformed = nodes.clone();
        for node in &mut deformed {
            node.x *= 1.01;
        }

        for gauss in 0..db.gauss_count() {
            let f_current = deformation_gradient(
                &db,
                &cache,
                &nodes,
                &deformed,
                &elements[0].nodes,
                0,
                gauss,
                DeformationFormulation::Current,
            )
            .unwrap();
            let f_inverse = deformation_gradient(
                &db,
                &cache,
                &nodes,
                &deformed,
                &elements[0].nodes,
                0,
                gauss,
                DeformationFormulation::Inverse,
            )
            .unwrap();
            for i in 0..3 {
                for j in 0..3 {
                    assert_abs_diff_eq!(f_current[(i, j)], f_inverse[(i, j)], epsilon = 1e-10);
                }
            }
            assert_abs_diff_eq!(f_current[(0, 0)], 1.01, epsilon = 1e-10);
        }
    }

    #[test]
    fn a5_stress_vanishes_at_rest() {
        let nodes = unit_tet_nodes();
        let material = Material::new(MaterialModel::A5, vec![100.0, 100.0]);
        let (db, cache, elements) = assembled_cache(&nodes, &material);

        let stress = gauss_stress(
            &db,
            &cache,
            &nodes,
            &nodes,
            &elements[0].nodes,
            0,
            0,
            &material,
            DeformationFormulation::Current,
        )
        .unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(stress[(i, j)], 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn neo_hookean_stress_vanishes_at_rest() {
        let nodes = unit_tet_nodes();
        let material = Material::new(MaterialModel::CompressibleNeoHookean, vec![100.0, 100.0]);
        let (db, cache, elements) = assembled_cache(&nodes, &material);

        let stress = gauss_stress(
            &db,
            &cache,
            &nodes,
            &nodes,
            &elements[0].nodes,
            0,
            0,
            &material,
            DeformationFormulation::Current,
        )
        .unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(stress[(i, j)], 0.0, epsilon = 1e-12);
            }
        }
    }
}
