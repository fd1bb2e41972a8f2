//! TET10: 10-node quadratic tetrahedral element.
//!
//! Parent coordinates (r, s, t) ∈ [0, 1] with the fourth barycentric
//! coordinate ℓ = 1 − r − s − t. Corner nodes 0..3 carry N = (2ξ − 1)ξ for
//! ξ ∈ {ℓ, r, s, t}; mid-edge nodes 4..9 carry N = 4·ξ_i·ξ_j for the edge
//! (i, j). Local node ordering:
//!
//! ```text
//! 0..3: corners (ℓ, r, s, t)
//! 4: edge 0-1   5: edge 1-2   6: edge 0-2
//! 7: edge 0-3   8: edge 1-3   9: edge 2-3
//! ```
//!
//! Shape functions after Dhondt, "The Finite Element Method for 3D
//! Thermomechanical Applications", p. 72.

use super::{Element, GaussRule};

/// Quadrature weights fold in the tetrahedral volume factor 1/6.
const GAUSS4_A: f64 = 0.58541020;
const GAUSS4_B: f64 = 0.13819660;

const GAUSS4: [GaussRule; 4] = [
    GaussRule { weight: 0.25 / 6.0, r: GAUSS4_A, s: GAUSS4_B, t: GAUSS4_B },
    GaussRule { weight: 0.25 / 6.0, r: GAUSS4_B, s: GAUSS4_A, t: GAUSS4_B },
    GaussRule { weight: 0.25 / 6.0, r: GAUSS4_B, s: GAUSS4_B, t: GAUSS4_A },
    GaussRule { weight: 0.25 / 6.0, r: GAUSS4_B, s: GAUSS4_B, t: GAUSS4_B },
];

const GAUSS5: [GaussRule; 5] = [
    GaussRule { weight: (-4.0 / 5.0) / 6.0, r: 0.25, s: 0.25, t: 0.25 },
    GaussRule { weight: (9.0 / 20.0) / 6.0, r: 0.5, s: 1.0 / 6.0, t: 1.0 / 6.0 },
    GaussRule { weight: (9.0 / 20.0) / 6.0, r: 1.0 / 6.0, s: 0.5, t: 1.0 / 6.0 },
    GaussRule { weight: (9.0 / 20.0) / 6.0, r: 1.0 / 6.0, s: 1.0 / 6.0, t: 0.5 },
    GaussRule { weight: (9.0 / 20.0) / 6.0, r: 1.0 / 6.0, s: 1.0 / 6.0, t: 1.0 / 6.0 },
];

/// The 10-node quadratic tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tet10;

impl Element for Tet10 {
    fn node_count(&self) -> usize {
        10
    }

    fn shape(&self, i: usize, r: f64, s: f64, t: f64) -> f64 {
        let l = 1.0 - r - s - t;
        match i {
            0 => (2.0 * l - 1.0) * l,
            1 => (2.0 * r - 1.0) * r,
            2 => (2.0 * s - 1.0) * s,
            3 => (2.0 * t - 1.0) * t,
            4 => 4.0 * r * l,
            5 => 4.0 * r * s,
            6 => 4.0 * s * l,
            7 => 4.0 * t * l,
            8 => 4.0 * r * t,
            9 => 4.0 * s * t,
            _ => 0.0,
        }
    }

    fn local_grad(&self, i: usize, dof: usize, r: f64, s: f64, t: f64) -> f64 {
        match dof {
            0 => df_dr(i, r, s, t),
            1 => df_ds(i, r, s, t),
            2 => df_dt(i, r, s, t),
            _ => 0.0,
        }
    }

    fn gauss_rule(&self, count: usize) -> Option<&'static [GaussRule]> {
        match count {
            4 => Some(&GAUSS4),
            5 => Some(&GAUSS5),
            _ => None,
        }
    }
}

fn df_dr(i: usize, r: f64, s: f64, t: f64) -> f64 {
    match i {
        0 => 4.0 * t + 4.0 * s + 4.0 * r - 3.0,
        1 => 4.0 * r - 1.0,
        2 => 0.0,
        3 => 0.0,
        4 => -4.0 * t - 4.0 * s - 8.0 * r + 4.0,
        5 => 4.0 * s,
        6 => -4.0 * s,
        7 => -4.0 * t,
        8 => 4.0 * t,
        9 => 0.0,
        _ => 0.0,
    }
}

fn df_ds(i: usize, r: f64, s: f64, t: f64) -> f64 {
    match i {
        0 => 4.0 * t + 4.0 * s + 4.0 * r - 3.0,
        1 => 0.0,
        2 => 4.0 * s - 1.0,
        3 => 0.0,
        4 => -4.0 * r,
        5 => 4.0 * r,
        6 => -4.0 * t - 8.0 * s - 4.0 * r + 4.0,
        7 => -4.0 * t,
        8 => 0.0,
        9 => 4.0 * t,
        _ => 0.0,
    }
}

fn df_dt(i: usize, r: f64, s: f64, t: f64) -> f64 {
    match i {
        0 => 4.0 * t + 4.0 * s + 4.0 * r - 3.0,
        1 => 0.0,
        2 => 0.0,
        3 => 4.0 * t - 1.0,
        4 => -4.0 * r,
        5 => 0.0,
        6 => -4.0 * s,
        7 => -8.0 * t - 4.0 * s - 4.0 * r + 4.0,
        8 => 4.0 * r,
        9 => 4.0 * s,
        _ => 0.0,
    }
}
