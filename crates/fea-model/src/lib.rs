//! Input records for the finite element solver.
//!
//! This crate defines the five record types handed to the solver facade:
//! the task description, solution parameters, nodes, elements, and
//! prescribed boundary conditions. All types are serde-derived so the io
//! layer can deserialize an input document directly into them. Semantic
//! validation beyond structural checks belongs to the solver facade.

use serde::{Deserialize, Serialize};

/// A node in the finite element mesh. Identity is the 0-based index in the
/// owning mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Node {
    /// Create a new node
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Get coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Get a single coordinate by axis index (0 = x, 1 = y, 2 = z)
    pub fn coord(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

/// An element in the finite element mesh.
///
/// The node list follows the local ordering fixed by the element's shape
/// functions. For TET10 the first four entries are corner vertices and the
/// remaining six are mid-edge nodes (4: edge 0-1, 5: 1-2, 6: 0-2, 7: 0-3,
/// 8: 1-3, 9: 2-3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Node connectivity (0-based node indices)
    pub nodes: Vec<usize>,
}

impl Element {
    /// Create a new element
    pub fn new(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }
}

/// Element type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    /// 10-node quadratic tetrahedron
    Tet10,
}

impl ElementType {
    /// Number of nodes for this element type
    pub fn node_count(&self) -> usize {
        match self {
            ElementType::Tet10 => 10,
        }
    }
}

/// Complete finite element mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// All nodes, 0-indexed
    pub nodes: Vec<Node>,
    /// All elements, 0-indexed
    pub elements: Vec<Element>,
}

impl Mesh {
    /// Create a mesh from node and element arrays
    pub fn new(nodes: Vec<Node>, elements: Vec<Element>) -> Self {
        Self { nodes, elements }
    }

    /// Validate connectivity: every element has `nodes_per_element` nodes
    /// and references only existing node indices.
    pub fn validate(&self, nodes_per_element: usize) -> Result<(), String> {
        for (elem_id, element) in self.elements.iter().enumerate() {
            if element.nodes.len() != nodes_per_element {
                return Err(format!(
                    "element {} has {} nodes but expected {}",
                    elem_id,
                    element.nodes.len(),
                    nodes_per_element
                ));
            }
            for &node_id in &element.nodes {
                if node_id >= self.nodes.len() {
                    return Err(format!(
                        "element {} references non-existent node {}",
                        elem_id, node_id
                    ));
                }
            }
        }
        Ok(())
    }

    /// Total number of degrees of freedom for a given dof-per-node count
    pub fn dof_count(&self, dof: usize) -> usize {
        self.nodes.len() * dof
    }

    /// Get mesh statistics
    pub fn statistics(&self) -> MeshStatistics {
        MeshStatistics {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
        }
    }
}

/// Mesh statistics for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStatistics {
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
}

/// Material model type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialModel {
    /// Hyperelastic model A5
    A5,
    /// Compressible neo-Hookean
    CompressibleNeoHookean,
}

/// Maximum number of scalar material parameters
pub const MAX_MATERIAL_PARAMETERS: usize = 10;

/// A material definition.
///
/// Parameters are model-specific; both supported models read the Lamé
/// constants from the first two slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material model type
    pub model: MaterialModel,
    /// Model parameters; `parameters[0]` = λ, `parameters[1]` = μ
    pub parameters: Vec<f64>,
}

impl Material {
    /// Create a new material
    pub fn new(model: MaterialModel, parameters: Vec<f64>) -> Self {
        Self { model, parameters }
    }

    /// First Lamé constant λ
    pub fn lambda(&self) -> f64 {
        self.parameters[0]
    }

    /// Second Lamé constant (shear modulus) μ
    pub fn mu(&self) -> f64 {
        self.parameters[1]
    }

    /// Check that the minimum parameter set for the model is present
    pub fn is_valid(&self) -> bool {
        self.parameters.len() >= 2 && self.parameters.len() <= MAX_MATERIAL_PARAMETERS
    }
}

/// Linear solver selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    /// Pure conjugate gradient, no preconditioner
    Cg,
    /// Conjugate gradient preconditioned with ILU(0) over the skyline form
    PcgIlu,
    /// Direct skyline Cholesky (reserved, not implemented)
    Cholesky,
}

/// Linear solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Which solver to run
    pub kind: SolverKind,
    /// Residual infinity-norm stopping threshold
    pub tolerance: f64,
    /// Upper bound on iterations
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            kind: SolverKind::PcgIlu,
            tolerance: 1e-15,
            max_iterations: 20000,
        }
    }
}

/// Task record: input parameters independent of the geometry and loads.
///
/// The outer-loop knobs (`load_increments`, `linesearch_max`,
/// `arclength_max`, `modified_newton`, `desired_tolerance`) are carried for
/// a wrapping nonlinear driver; the core assembles and solves one tangent
/// system per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Degrees of freedom per node (3 supported)
    pub dof: usize,
    /// Element type
    pub element_type: ElementType,
    /// Material model and parameters
    pub material: Material,
    /// Linear solver configuration
    #[serde(default)]
    pub solver: SolverConfig,
    /// Number of load increments for an outer driver
    #[serde(default)]
    pub load_increments: usize,
    /// Maximum number of line searches for an outer driver
    #[serde(default)]
    pub linesearch_max: usize,
    /// Maximum number of arc-length searches for an outer driver
    #[serde(default)]
    pub arclength_max: usize,
    /// Whether an outer driver should use modified Newton
    #[serde(default)]
    pub modified_newton: bool,
    /// Desired energy tolerance for an outer driver
    #[serde(default = "Task::default_desired_tolerance")]
    pub desired_tolerance: f64,
}

impl Task {
    fn default_desired_tolerance() -> f64 {
        1e-8
    }

    /// Create a task with default solver configuration and outer-loop knobs
    pub fn new(element_type: ElementType, material: Material) -> Self {
        Self {
            dof: 3,
            element_type,
            material,
            solver: SolverConfig::default(),
            load_increments: 0,
            linesearch_max: 0,
            arclength_max: 0,
            modified_newton: true,
            desired_tolerance: Self::default_desired_tolerance(),
        }
    }
}

/// Solution parameters derived from the task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionParams {
    /// Number of nodes per element
    pub nodes_per_element: usize,
    /// Number of Gauss integration points per element
    pub gauss_count: usize,
}

impl Default for SolutionParams {
    fn default() -> Self {
        Self {
            nodes_per_element: 10,
            gauss_count: 5,
        }
    }
}

/// Bit mask selecting which of the x/y/z displacement components of a node
/// are prescribed (X = 1, Y = 2, Z = 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DofMask(pub u8);

impl DofMask {
    /// X component prescribed
    pub const X: DofMask = DofMask(1);
    /// Y component prescribed
    pub const Y: DofMask = DofMask(2);
    /// Z component prescribed
    pub const Z: DofMask = DofMask(4);
    /// All three components prescribed
    pub const XYZ: DofMask = DofMask(7);

    /// Combine two masks
    pub fn union(self, other: DofMask) -> DofMask {
        DofMask(self.0 | other.0)
    }

    /// Whether the component for `axis` (0 = x, 1 = y, 2 = z) is prescribed
    pub fn has(self, axis: usize) -> bool {
        self.0 & (1 << axis) != 0
    }

    /// Whether no component is prescribed
    pub fn is_empty(self) -> bool {
        self.0 & 7 == 0
    }
}

/// A prescribed displacement on a node.
///
/// Values for unmasked axes are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrescribedBc {
    /// Node index (0-based)
    pub node: usize,
    /// Prescribed displacement per axis
    pub values: [f64; 3],
    /// Which axes are prescribed
    pub mask: DofMask,
}

impl PrescribedBc {
    /// Create a new prescribed boundary condition
    pub fn new(node: usize, values: [f64; 3], mask: DofMask) -> Self {
        Self { node, values, mask }
    }

    /// Fix all three components of a node to the given values
    pub fn fixed(node: usize, values: [f64; 3]) -> Self {
        Self::new(node, values, DofMask::XYZ)
    }
}
