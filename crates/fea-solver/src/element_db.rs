//! Per-solve cache of Gauss integration point data.
//!
//! Shape function values and local derivatives depend only on the parent
//! coordinates of the Gauss points, so they are evaluated once per solve
//! and reused by every element during assembly and stress recovery.

use fea_model::SolutionParams;
use nalgebra::DMatrix;

use crate::elements::Element;
use crate::error::{Result, SolverError};

/// One Gauss point with pre-evaluated shape data.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussPoint {
    /// Integration weight (folds in the parent volume factor)
    pub weight: f64,
    /// Parent coordinates (r, s, t)
    pub coords: [f64; 3],
    /// Shape function values N_i, one per element node
    pub forms: Vec<f64>,
    /// Local derivatives, 3 × nodes: `dforms[(dof, i)]` = dN_i/dξ_dof
    pub dforms: DMatrix<f64>,
}

/// Pre-evaluated Gauss point table for the configured element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDb {
    gauss: Vec<GaussPoint>,
}

impl ElementDb {
    /// Evaluate the Gauss table for one element family.
    pub fn new(element: &dyn Element, params: &SolutionParams) -> Result<Self> {
        if params.nodes_per_element != element.node_count() {
            return Err(SolverError::UnsupportedConfiguration(format!(
                "nodes_per_element is {} but the element type has {} nodes",
                params.nodes_per_element,
                element.node_count()
            )));
        }
        let rule = element.gauss_rule(params.gauss_count).ok_or_else(|| {
            SolverError::UnsupportedConfiguration(format!(
                "no {}-point Gauss rule for the element type",
                params.gauss_count
            ))
        })?;

        let nodes = element.node_count();
        let mut gauss = Vec::with_capacity(rule.len());
        for point in rule {
            let mut forms = Vec::with_capacity(nodes);
            let mut dforms = DMatrix::zeros(3, nodes);
            for i in 0..nodes {
                forms.push(element.shape(i, point.r, point.s, point.t));
                for dof in 0..3 {
                    dforms[(dof, i)] = element.local_grad(i, dof, point.r, point.s, point.t);
                }
            }
            gauss.push(GaussPoint {
                weight: point.weight,
                coords: [point.r, point.s, point.t],
                forms,
                dforms,
            });
        }

        Ok(Self { gauss })
    }

    /// Number of Gauss points
    pub fn gauss_count(&self) -> usize {
        self.gauss.len()
    }

    /// Access one Gauss point
    pub fn gauss(&self, index: usize) -> &GaussPoint {
        &self.gauss[index]
    }

    /// Iterate over the Gauss points
    pub fn points(&self) -> impl Iterator<Item = &GaussPoint> {
        self.gauss.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Tet10;
    use approx::assert_abs_diff_eq;

    #[test]
    fn database_caches_shape_values() {
        let params = SolutionParams {
            nodes_per_element: 10,
            gauss_count: 4,
        };
        let db = ElementDb::new(&Tet10, &params).unwrap();
        assert_eq!(db.gauss_count(), 4);

        for point in db.points() {
            let sum: f64 = point.forms.iter().sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-14);
            for dof in 0..3 {
                let dsum: f64 = (0..10).map(|i| point.dforms[(dof, i)]).sum();
                assert_abs_diff_eq!(dsum, 0.0, epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn mismatched_configuration_is_rejected() {
        let bad_nodes = SolutionParams {
            nodes_per_element: 8,
            gauss_count: 4,
        };
        assert!(matches!(
            ElementDb::new(&Tet10, &bad_nodes),
            Err(SolverError::UnsupportedConfiguration(_))
        ));

        let bad_gauss = SolutionParams {
            nodes_per_element: 10,
            gauss_count: 7,
        };
        assert!(matches!(
            ElementDb::new(&Tet10, &bad_gauss),
            Err(SolverError::UnsupportedConfiguration(_))
        ));
    }
}
