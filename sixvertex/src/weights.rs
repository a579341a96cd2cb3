//! The six Boltzmann weights and the Metropolis normaliser rho derived from them.

use crate::vertex::VertexType;

/// The six positive Boltzmann weights, indexed by [`VertexType`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights([f64; 6]);

impl Weights {
    /// Builds a weight table from the six named weights `a1, a2, b1, b2, c1, c2`.
    #[must_use]
    pub const fn new(a1: f64, a2: f64, b1: f64, b2: f64, c1: f64, c2: f64) -> Self {
        Self([a1, a2, b1, b2, c1, c2])
    }

    /// The weight of a given vertex type.
    #[must_use]
    pub fn get(&self, ty: VertexType) -> f64 {
        self.0[ty.index()]
    }

    /// The six weights in digit order `(a1, a2, b1, b2, c1, c2)`.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 6] {
        self.0
    }
}

/// Computes the Metropolis normaliser rho for a weight table.
///
/// Every admissible flip rewrites four cells to one of two possible post-types per cell (see the
/// relabelling tables in [`crate::flip`]); the weight product of any single-direction move is
/// therefore bounded by the product, over the four affected roles, of the larger of that role's
/// two possible post-weights. Summing the UP bound and the DOWN bound additionally bounds the
/// bi-flip case, where both directions are admissible at the same cell and the acceptance draw is
/// split between `ratio(UP)` and `ratio(DOWN)`: since both use this same rho, their sum can never
/// exceed 1.
///
/// Any rho upper-bounding every ratio is a valid normaliser; this closed form is used instead of
/// enumerating the move catalogue directly. See `DESIGN.md` for the enumeration it replaces.
#[must_use]
pub fn compute_rho(weights: &Weights) -> f64 {
    let w = |ty: VertexType| weights.get(ty);

    // UP post-types: base in {c1, a2}, upper-right in {c1, a1}, right in {c2, b1}, up in {c2, b2}.
    let max_up = w(VertexType::C1).max(w(VertexType::A2))
        * w(VertexType::C1).max(w(VertexType::A1))
        * w(VertexType::C2).max(w(VertexType::B1))
        * w(VertexType::C2).max(w(VertexType::B2));

    // DOWN post-types: base in {a2, c2}, lower-left in {a1, c2}, left in {b1, c1}, down in {b2, c1}.
    let max_down = w(VertexType::A2).max(w(VertexType::C2))
        * w(VertexType::A1).max(w(VertexType::C2))
        * w(VertexType::B1).max(w(VertexType::C1))
        * w(VertexType::B2).max(w(VertexType::C1));

    max_up + max_down
}
