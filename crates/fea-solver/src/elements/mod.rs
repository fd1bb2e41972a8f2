//! Finite element shape function library.
//!
//! An [`Element`] value bundles the isoparametric shape functions, their
//! local derivatives, and the available Gauss quadrature rules of one
//! element family. The solver core is written against this capability, so
//! adding an element type means adding a module here and a
//! [`fea_model::ElementType`] variant.

use fea_model::ElementType;

pub mod tet10;

pub use tet10::Tet10;

/// One Gauss integration point in parent coordinates.
///
/// The weight already folds in the volume factor of the parent domain
/// (1/6 for tetrahedra); integrands must not apply it again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussRule {
    /// Integration weight
    pub weight: f64,
    /// Parent coordinate r
    pub r: f64,
    /// Parent coordinate s
    pub s: f64,
    /// Parent coordinate t
    pub t: f64,
}

/// Shape function capability of one element family.
pub trait Element {
    /// Number of nodes per element
    fn node_count(&self) -> usize;

    /// Shape function value N_i(r, s, t)
    fn shape(&self, i: usize, r: f64, s: f64, t: f64) -> f64;

    /// Local derivative dN_i/dξ_dof (dof: 0 = r, 1 = s, 2 = t)
    fn local_grad(&self, i: usize, dof: usize, r: f64, s: f64, t: f64) -> f64;

    /// Gauss rule with the requested point count, if the family has one
    fn gauss_rule(&self, count: usize) -> Option<&'static [GaussRule]>;
}

/// Look up the element capability for a mesh element type.
pub fn element_for(kind: ElementType) -> &'static dyn Element {
    match kind {
        ElementType::Tet10 => &Tet10,
    }
}
