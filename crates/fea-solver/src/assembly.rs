//! Element assembly engine.
//!
//! Per element and per Gauss point: the Jacobian of the isoparametric map,
//! its inverse and determinant, shape function gradients in global
//! coordinates, the fourth-rank constitutive tensor, and the local tangent
//! stiffness scattered into the global sparse matrix. Shape gradients are
//! cached per (element, Gauss point) for reuse by stress recovery.

use fea_model::{Element as MeshElement, Material, Node};
use log::warn;
use nalgebra::{DMatrix, Matrix3};

use crate::element_db::{ElementDb, GaussPoint};
use crate::error::Result;
use crate::sparse::SparseMatrix;

/// Degrees of freedom per node.
pub const DOF: usize = 3;

/// Shape function gradients in global coordinates at one Gauss point.
///
/// `grads[(i, a)]` = dN_a/dX_i; rows are the global axes, columns the
/// element nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGradients {
    /// 3 × nodes gradient matrix
    pub grads: DMatrix<f64>,
    /// Determinant of the Jacobian
    pub det_j: f64,
}

/// Cached gradients per (element, Gauss point); `None` marks a Gauss point
/// skipped as degenerate.
pub type ShapeGradientCache = Vec<Vec<Option<ShapeGradients>>>;

/// Jacobian of the parent-to-global map at one Gauss point:
/// J_ij = sum_a dN_a/dξ_i · (X_a)_j.
pub fn jacobian(point: &GaussPoint, nodes: &[Node], connectivity: &[usize]) -> Matrix3<f64> {
    let mut j = Matrix3::zeros();
    for (a, &node_id) in connectivity.iter().enumerate() {
        let coords = nodes[node_id].coords();
        for i in 0..3 {
            for k in 0..3 {
                j[(i, k)] += point.dforms[(i, a)] * coords[k];
            }
        }
    }
    j
}

/// Global-coordinate shape gradients G = J⁻¹ · dN at one Gauss point.
///
/// Returns `None` when det J rounds to zero; the caller logs and skips the
/// Gauss point.
pub fn shape_gradients(
    point: &GaussPoint,
    nodes: &[Node],
    connectivity: &[usize],
) -> Option<ShapeGradients> {
    let j = jacobian(point, nodes, connectivity);
    let det_j = j.determinant();
    if det_j.abs() < f64::EPSILON {
        return None;
    }
    let j_inv = j.try_inverse()?;
    let grads: nalgebra::Matrix3xX<f64> = j_inv * &point.dforms;
    let ncols = grads.ncols();
    Some(ShapeGradients {
        grads: grads.reshape_generic(nalgebra::Dyn(3), nalgebra::Dyn(ncols)),
        det_j,
    })
}

/// Fourth-rank constitutive tensor
/// C_ijkl = λ δ_ij δ_kl + μ (δ_ik δ_jl + δ_il δ_jk).
pub fn constitutive_tensor(material: &Material) -> [[[[f64; 3]; 3]; 3]; 3] {
    let lambda = material.lambda();
    let mu = material.mu();
    let delta = |a: usize, b: usize| if a == b { 1.0 } else { 0.0 };

    let mut ctensor = [[[[0.0; 3]; 3]; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                for l in 0..3 {
                    ctensor[i][j][k][l] = lambda * delta(i, j) * delta(k, l)
                        + mu * delta(i, k) * delta(j, l)
                        + mu * delta(i, l) * delta(j, k);
                }
            }
        }
    }
    ctensor
}

/// Assemble the global tangent stiffness.
///
/// Elements are visited in index order, so repeated assemblies of the same
/// mesh are bit-identical. Each local block
/// [K_ab]_ij = sum_kl G_ka C_ikjl G_lb |det J| w_g is scattered to
/// (DOF·n_a + i, DOF·n_b + j). Returns the shape gradient cache for stress
/// recovery; degenerate Gauss points are logged and contribute nothing.
pub fn assemble_global(
    db: &ElementDb,
    nodes: &[Node],
    elements: &[MeshElement],
    material: &Material,
    matrix: &mut SparseMatrix,
) -> Result<ShapeGradientCache> {
    let ctensor = constitutive_tensor(material);
    let mut cache: ShapeGradientCache = Vec::with_capacity(elements.len());

    for (element_id, element) in elements.iter().enumerate() {
        let nelem = element.nodes.len();
        let mut per_gauss = Vec::with_capacity(db.gauss_count());

        for gauss in 0..db.gauss_count() {
            let point = db.gauss(gauss);
            let grads = shape_gradients(point, nodes, &element.nodes);
            match &grads {
                None => warn!(
                    "element {element_id}: degenerate Jacobian at gauss point {gauss}, \
                     contribution skipped"
                ),
                Some(sg) => {
                    let volume = sg.det_j.abs() * point.weight;
                    for a in 0..nelem {
                        for b in 0..nelem {
                            for i in 0..DOF {
                                for j in 0..DOF {
                                    let mut sum = 0.0;
                                    for k in 0..DOF {
                                        for l in 0..DOF {
                                            sum += sg.grads[(k, a)]
                                                * ctensor[i][k][j][l]
                                                * sg.grads[(l, b)];
                                        }
                                    }
                                    matrix.add(
                                        element.nodes[a] * DOF + i,
                                        element.nodes[b] * DOF + j,
                                        sum * volume,
                                    )?;
                                }
                            }
                        }
                    }
                }
            }
            per_gauss.push(grads);
        }
        cache.push(per_gauss);
    }

    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Tet10;
    use approx::assert_abs_diff_eq;
    use fea_model::{MaterialModel, SolutionParams};

    /// Unit tetrahedron with mid-edge nodes at the edge midpoints; the
    /// parent map is the identity, so J = I and det J = 1.
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

    fn db(gauss_count: usize) -> ElementDb {
        ElementDb::new(
            &Tet10,
            &SolutionParams {
                nodes_per_element: 10,
                gauss_count,
            },
        )
        .unwrap()
    }

    #[test]
    fn unit_tet_jacobian_is_identity() {
        let nodes = unit_tet_nodes();
        let connectivity: Vec<usize> = (0..10).collect();
        let db = db(4);
        for gauss in 0..db.gauss_count() {
            let j = jacobian(db.gauss(gauss), &nodes, &connectivity);
            for a in 0..3 {
                for b in 0..3 {
                    let expected = if a == b { 1.0 } else { 0.0 };
                    assert_abs_diff_eq!(j[(a, b)], expected, epsilon = 1e-13);
                }
            }
            let sg = shape_gradients(db.gauss(gauss), &nodes, &connectivity).unwrap();
            assert_abs_diff_eq!(sg.det_j, 1.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn gauss_weights_integrate_unit_tet_volume() {
        let nodes = unit_tet_nodes();
        let connectivity: Vec<usize> = (0..10).collect();
        for count in [4, 5] {
            let db = db(count);
            let volume: f64 = (0..db.gauss_count())
                .map(|g| {
                    let sg = shape_gradients(db.gauss(g), &nodes, &connectivity).unwrap();
                    sg.det_j.abs() * db.gauss(g).weight
                })
                .sum();
            assert_abs_diff_eq!(volume, 1.0 / 6.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn constitutive_tensor_symmetries() {
        let material = Material::new(MaterialModel::A5, vec![100.0, 80.0]);
        let c = constitutive_tensor(&material);
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    for l in 0..3 {
                        assert_eq!(c[i][j][k][l], c[j][i][k][l]);
                        assert_eq!(c[i][j][k][l], c[i][j][l][k]);
                        assert_eq!(c[i][j][k][l], c[k][l][i][j]);
                    }
                }
            }
        }
        assert_eq!(c[0][0][0][0], 100.0 + 2.0 * 80.0);
        assert_eq!(c[0][0][1][1], 100.0);
        assert_eq!(c[0][1][0][1], 80.0);
    }

    #[test]
    fn degenerate_element_is_skipped() {
        // collapse the tetrahedron onto the z = 0 plane
        let mut nodes = unit_tet_nodes();
        for node in &mut nodes {
            node.z = 0.0;
        }
        let elements = vec![MeshElement::new((0..10).collect())];
        let material = Material::new(MaterialModel::A5, vec![100.0, 100.0]);
        let mut matrix = SparseMatrix::square(30);

        let cache = assemble_global(&db(4), &nodes, &elements, &material, &mut matrix).unwrap();
        assert!(cache[0].iter().all(Option::is_none));
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn assembled_tangent_is_symmetric() {
        let nodes = unit_tet_nodes();
        let elements = vec![MeshElement::new((0..10).collect())];
        let material = Material::new(MaterialModel::A5, vec![1.0, 1.0]);
        let mut matrix = SparseMatrix::square(30);

        assemble_global(&db(5), &nodes, &elements, &material, &mut matrix).unwrap();
        matrix.reorder();

        for i in 0..30 {
            for j in 0..30 {
                assert_abs_diff_eq!(matrix.get(i, j), matrix.get(j, i), epsilon = 1e-14);
            }
        }
    }
}
