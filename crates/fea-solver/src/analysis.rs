//! Static analysis facade.
//!
//! Owns the whole solve pipeline: validate the input records, build the
//! element database, assemble the global tangent, reorder, apply boundary
//! conditions, run the configured linear solver, update the deformed
//! configuration, and recover per-element stresses. All intermediate
//! resources are owned here and released on every exit path.

use fea_model::{Mesh, Node, PrescribedBc, SolutionParams, Task};
use log::{info, warn};

use crate::assembly::assemble_global;
use crate::boundary::apply_prescribed;
use crate::element_db::ElementDb;
use crate::elements::{Element as _, element_for};
use crate::error::{Result, SolverError};
use crate::postprocess::{
    DeformationFormulation, gauss_stress, update_nodes_with_displacements,
};
use crate::solvers::SolveStats;
use crate::sparse::SparseMatrix;

/// Gauss point index used for stress reporting (clamped to the rule size).
const STRESS_GAUSS_POINT: usize = 3;

/// Results of one static solve.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResults {
    /// Displacement vector, node-major (x, y, z per node)
    pub displacements: Vec<f64>,
    /// Node array with displacements applied
    pub deformed_nodes: Vec<Node>,
    /// Per-element Cauchy stress tensor at the reporting Gauss point
    pub stresses: Vec<[[f64; 3]; 3]>,
    /// Linear solver statistics; `converged == false` means the iteration
    /// cap was hit and the displacements are the best available iterate
    pub stats: SolveStats,
}

/// One tangent-system solve over a mesh, task, and boundary set.
#[derive(Debug)]
pub struct StaticAnalysis {
    task: Task,
    params: SolutionParams,
    mesh: Mesh,
    deformed: Vec<Node>,
    boundary: Vec<PrescribedBc>,
    formulation: DeformationFormulation,
}

impl StaticAnalysis {
    /// Validate the input records and set up the analysis.
    ///
    /// Fails with [`SolverError::UnsupportedConfiguration`] before any
    /// assembly work when the records are inconsistent.
    pub fn new(
        task: Task,
        params: SolutionParams,
        mesh: Mesh,
        boundary: Vec<PrescribedBc>,
    ) -> Result<Self> {
        if task.dof != 3 {
            return Err(SolverError::UnsupportedConfiguration(format!(
                "{} dofs per node requested, only 3 supported",
                task.dof
            )));
        }
        if !task.material.is_valid() {
            return Err(SolverError::UnsupportedConfiguration(format!(
                "material model {:?} needs at least the two Lame parameters",
                task.material.model
            )));
        }
        let element = element_for(task.element_type);
        if params.nodes_per_element != element.node_count() {
            return Err(SolverError::UnsupportedConfiguration(format!(
                "nodes_per_element is {} but {:?} has {} nodes",
                params.nodes_per_element,
                task.element_type,
                element.node_count()
            )));
        }
        if element.gauss_rule(params.gauss_count).is_none() {
            return Err(SolverError::UnsupportedConfiguration(format!(
                "no {}-point Gauss rule for {:?}",
                params.gauss_count, task.element_type
            )));
        }
        mesh.validate(params.nodes_per_element)
            .map_err(SolverError::UnsupportedConfiguration)?;
        for bc in &boundary {
            if bc.node >= mesh.nodes.len() {
                return Err(SolverError::UnsupportedConfiguration(format!(
                    "boundary condition references non-existent node {}",
                    bc.node
                )));
            }
        }

        let deformed = mesh.nodes.clone();
        Ok(Self {
            task,
            params,
            mesh,
            deformed,
            boundary,
            formulation: DeformationFormulation::default(),
        })
    }

    /// Select the deformation gradient formulation used for stress
    /// recovery (cross-checking aid; the default is canonical).
    pub fn set_formulation(&mut self, formulation: DeformationFormulation) {
        self.formulation = formulation;
    }

    /// Reference mesh
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Current deformed node array
    pub fn deformed_nodes(&self) -> &[Node] {
        &self.deformed
    }

    /// Assemble, apply boundary conditions, solve, and post-process.
    pub fn run(&mut self) -> Result<AnalysisResults> {
        let element = element_for(self.task.element_type);
        let db = ElementDb::new(element, &self.params)?;

        let num_dofs = self.mesh.dof_count(self.task.dof);
        let mut matrix = SparseMatrix::square(num_dofs);
        let cache = assemble_global(
            &db,
            &self.deformed,
            &self.mesh.elements,
            &self.task.material,
            &mut matrix,
        )?;
        matrix.reorder();
        info!(
            "assembled global tangent: {} dofs, {} stored entries",
            num_dofs,
            matrix.nnz()
        );

        // External loads enter only through the prescribed displacements.
        let mut forces = vec![0.0; num_dofs];
        apply_prescribed(&mut matrix, &mut forces, &self.boundary)?;

        let mut displacements = vec![0.0; num_dofs];
        let stats = matrix.solve(&self.task.solver, &forces, &mut displacements)?;
        if stats.converged {
            info!(
                "linear solve converged in {} iterations, residual {:e}",
                stats.iterations, stats.residual
            );
        } else {
            warn!(
                "linear solve stopped after {} iterations with residual {:e}, \
                 returning best iterate",
                stats.iterations, stats.residual
            );
        }

        update_nodes_with_displacements(&mut self.deformed, &displacements);

        let gauss = STRESS_GAUSS_POINT.min(db.gauss_count() - 1);
        let mut stresses = Vec::with_capacity(self.mesh.elements.len());
        for (element_id, mesh_element) in self.mesh.elements.iter().enumerate() {
            let tensor = gauss_stress(
                &db,
                &cache,
                &self.mesh.nodes,
                &self.deformed,
                &mesh_element.nodes,
                element_id,
                gauss,
                &self.task.material,
                self.formulation,
            );
            match tensor {
                Some(sigma) => stresses.push([
                    [sigma[(0, 0)], sigma[(0, 1)], sigma[(0, 2)]],
                    [sigma[(1, 0)], sigma[(1, 1)], sigma[(1, 2)]],
                    [sigma[(2, 0)], sigma[(2, 1)], sigma[(2, 2)]],
                ]),
                None => {
                    warn!("element {element_id}: degenerate configuration, stress reported zero");
                    stresses.push([[0.0; 3]; 3]);
                }
            }
        }

        Ok(AnalysisResults {
            displacements,
            deformed_nodes: self.deformed.clone(),
            stresses,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fea_model::{DofMask, Element, ElementType, Material, MaterialModel};

    fn unit_tet_mesh() -> Mesh {
        let nodes = vec![
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
        ];
        Mesh::new(nodes, vec![Element::new((0..10).collect())])
    }

    fn a5_task() -> Task {
        Task::new(
            ElementType::Tet10,
            Material::new(MaterialModel::A5, vec![100.0, 100.0]),
        )
    }

    #[test]
    fn rejects_unsupported_dof_count() {
        let mut task = a5_task();
        task.dof = 2;
        let err =
            StaticAnalysis::new(task, SolutionParams::default(), unit_tet_mesh(), vec![])
                .unwrap_err();
        assert!(matches!(err, SolverError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn rejects_missing_material_parameters() {
        let mut task = a5_task();
        task.material.parameters = vec![100.0];
        assert!(
            StaticAnalysis::new(task, SolutionParams::default(), unit_tet_mesh(), vec![])
                .is_err()
        );
    }

    #[test]
    fn rejects_unknown_gauss_rule() {
        let params = SolutionParams {
            nodes_per_element: 10,
            gauss_count: 6,
        };
        assert!(StaticAnalysis::new(a5_task(), params, unit_tet_mesh(), vec![]).is_err());
    }

    #[test]
    fn rejects_malformed_connectivity() {
        let mesh = Mesh::new(unit_tet_mesh().nodes, vec![Element::new(vec![0, 1, 2])]);
        assert!(StaticAnalysis::new(a5_task(), SolutionParams::default(), mesh, vec![]).is_err());
    }

    #[test]
    fn rejects_boundary_on_missing_node() {
        let bc = PrescribedBc::fixed(99, [0.0; 3]);
        assert!(
            StaticAnalysis::new(a5_task(), SolutionParams::default(), unit_tet_mesh(), vec![bc])
                .is_err()
        );
    }

    #[test]
    fn fully_clamped_element_stays_at_rest() {
        let mesh = unit_tet_mesh();
        let boundary: Vec<PrescribedBc> = (0..10)
            .map(|node| PrescribedBc::new(node, [0.0; 3], DofMask::XYZ))
            .collect();
        let mut analysis =
            StaticAnalysis::new(a5_task(), SolutionParams::default(), mesh, boundary).unwrap();
        let results = analysis.run().unwrap();

        assert!(results.stats.converged);
        assert!(results.displacements.iter().all(|&u| u.abs() < 1e-14));
        for tensor in &results.stresses {
            for row in tensor {
                for &entry in row {
                    assert!(entry.abs() < 1e-12);
                }
            }
        }
    }
}
