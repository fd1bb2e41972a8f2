//! Nonlinear finite element solver core for 3-D solid continua.
//!
//! The crate assembles the global tangent stiffness of a TET10 mesh with a
//! hyperelastic material into a row-indexed sparse matrix, enforces
//! prescribed displacements with a symmetry-preserving elimination, solves
//! the system with CG or ILU(0)-preconditioned CG, and recovers nodal
//! displacements and per-element Cauchy stresses.
//!
//! [`analysis::StaticAnalysis`] owns the pipeline; the lower layers
//! ([`sparse`], [`skyline`], [`ilu`], [`solvers`], [`elements`],
//! [`assembly`], [`boundary`], [`postprocess`]) are usable on their own.

pub mod analysis;
pub mod assembly;
pub mod boundary;
pub mod element_db;
pub mod elements;
pub mod error;
pub mod ilu;
pub mod postprocess;
pub mod skyline;
pub mod solvers;
pub mod sparse;

pub use analysis::{AnalysisResults, StaticAnalysis};
pub use assembly::{
    DOF, ShapeGradientCache, ShapeGradients, assemble_global, constitutive_tensor, jacobian,
    shape_gradients,
};
pub use boundary::{apply_prescribed, apply_single};
pub use element_db::{ElementDb, GaussPoint};
pub use elements::{Element, GaussRule, Tet10, element_for};
pub use error::{Result, SolverError};
pub use ilu::IluFactor;
pub use postprocess::{
    DeformationFormulation, deformation_gradient, gauss_stress, update_nodes_with_displacements,
};
pub use skyline::SkylineView;
pub use solvers::SolveStats;
pub use sparse::{IndexedRow, SparseMatrix};
