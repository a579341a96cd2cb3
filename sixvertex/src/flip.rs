//! Flippability, the Metropolis weight ratio, and the atomic local move.
//!
//! This is the heart of the engine: one flippability predicate and one move-execution routine,
//! parameterised by [`Direction`] and an optional sticky partner lattice, serve both the upper
//! and the lower lattice (the source duplicates both routines per lattice; see `DESIGN.md`).

use crate::error::{Error, Result};
use crate::lattice::Lattice;
use crate::vertex::VertexType;
use crate::weights::Weights;

/// The direction of a local flip move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Rewrites `(r, c)`, `(r-1, c+1)`, `(r, c+1)`, `(r-1, c)`.
    Up,
    /// Rewrites `(r, c)`, `(r+1, c-1)`, `(r, c-1)`, `(r+1, c)`.
    Down,
}

/// Which of the two coupled lattices a flip is being attempted on.
///
/// Only meaningful for the sticky guard: it is asymmetric between UP and DOWN, and between
/// upper and lower.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LatticeRole {
    /// The lattice bounding the region from above.
    Upper,
    /// The lattice bounding the region from below.
    Lower,
}

// UP relabelling table. Each function is total over `VertexType` but only two variants are
// ever reachable given the flippability predicate below; the rest yield `None` so that a caller
// presented with an inconsistent lattice degrades to "this move has no valid post-state" instead
// of panicking or silently reusing the stale type.
const fn relabel_up_base(ty: VertexType) -> Option<VertexType> {
    match ty {
        VertexType::A1 => Some(VertexType::C1),
        VertexType::C2 => Some(VertexType::A2),
        _ => None,
    }
}

const fn relabel_up_upper_right(ty: VertexType) -> Option<VertexType> {
    match ty {
        VertexType::A2 => Some(VertexType::C1),
        VertexType::C2 => Some(VertexType::A1),
        _ => None,
    }
}

const fn relabel_up_right(ty: VertexType) -> Option<VertexType> {
    match ty {
        VertexType::B2 => Some(VertexType::C2),
        VertexType::C1 => Some(VertexType::B1),
        _ => None,
    }
}

const fn relabel_up_up(ty: VertexType) -> Option<VertexType> {
    match ty {
        VertexType::B1 => Some(VertexType::C2),
        VertexType::C1 => Some(VertexType::B2),
        _ => None,
    }
}

// DOWN relabelling table.
const fn relabel_down_base(ty: VertexType) -> Option<VertexType> {
    match ty {
        VertexType::C1 => Some(VertexType::A2),
        VertexType::A1 => Some(VertexType::C2),
        _ => None,
    }
}

const fn relabel_down_lower_left(ty: VertexType) -> Option<VertexType> {
    match ty {
        VertexType::C1 => Some(VertexType::A1),
        VertexType::A2 => Some(VertexType::C2),
        _ => None,
    }
}

const fn relabel_down_left(ty: VertexType) -> Option<VertexType> {
    match ty {
        VertexType::C2 => Some(VertexType::B1),
        VertexType::B2 => Some(VertexType::C1),
        _ => None,
    }
}

const fn relabel_down_down(ty: VertexType) -> Option<VertexType> {
    match ty {
        VertexType::C2 => Some(VertexType::B2),
        VertexType::B1 => Some(VertexType::C1),
        _ => None,
    }
}

/// Decides whether `(r, c)` is flippable in direction `dir` on `lattice`, playing the role
/// `role` (upper or lower). `sticky` is the coupled partner lattice when the sticky regime is
/// enabled, or `None` to disable it. Out-of-range rows/columns simply return `false`; this is a
/// routine boundary rejection, never an error.
#[must_use]
pub fn flippable(
    lattice: &Lattice,
    role: LatticeRole,
    r: usize,
    c: usize,
    dir: Direction,
    sticky: Option<&Lattice>,
) -> bool {
    match dir {
        Direction::Up => {
            if r == 0 || c + 1 >= lattice.cols() {
                return false;
            }
            if !matches!(lattice.vertex_type(r, c), VertexType::A1 | VertexType::C2) {
                return false;
            }
            if !matches!(
                lattice.vertex_type(r - 1, c + 1),
                VertexType::A2 | VertexType::C2
            ) {
                return false;
            }
            if role == LatticeRole::Upper {
                if let Some(partner) = sticky {
                    if lattice.height(r, c) <= partner.height(r, c) {
                        return false;
                    }
                }
            }
            true
        }
        Direction::Down => {
            if r + 1 >= lattice.rows() || c == 0 {
                return false;
            }
            if !matches!(lattice.vertex_type(r, c), VertexType::A1 | VertexType::C1) {
                return false;
            }
            if !matches!(
                lattice.vertex_type(r + 1, c - 1),
                VertexType::A2 | VertexType::C1
            ) {
                return false;
            }
            if role == LatticeRole::Lower {
                if let Some(partner) = sticky {
                    if lattice.height(r, c) >= partner.height(r, c) {
                        return false;
                    }
                }
            }
            true
        }
    }
}

/// Computes `ratio(r, c, dir) = w[base'] . w[x'] . w[y'] . w[d'] / rho`, the Metropolis
/// acceptance probability for a move already known to be flippable.
///
/// Returns `0.0` if the relabelling table has no post-state for one of the four pre-types,
/// i.e. the move is not actually realisable; under a correctly maintained lattice this never
/// happens once `flippable` has returned `true`; `rho > 0` is assumed (true for any positive
/// weight table).
#[must_use]
pub fn ratio(
    lattice: &Lattice,
    weights: &Weights,
    rho: f64,
    r: usize,
    c: usize,
    dir: Direction,
) -> f64 {
    let Some(product) = post_weight_product(lattice, weights, r, c, dir) else {
        return 0.0;
    };
    product / rho
}

fn post_weight_product(
    lattice: &Lattice,
    weights: &Weights,
    r: usize,
    c: usize,
    dir: Direction,
) -> Option<f64> {
    match dir {
        Direction::Up => {
            let base = relabel_up_base(lattice.vertex_type(r, c))?;
            let upper_right = relabel_up_upper_right(lattice.vertex_type(r - 1, c + 1))?;
            let right = relabel_up_right(lattice.vertex_type(r, c + 1))?;
            let up = relabel_up_up(lattice.vertex_type(r - 1, c))?;
            Some(
                weights.get(base) * weights.get(upper_right) * weights.get(right)
                    * weights.get(up),
            )
        }
        Direction::Down => {
            let base = relabel_down_base(lattice.vertex_type(r, c))?;
            let lower_left = relabel_down_lower_left(lattice.vertex_type(r + 1, c - 1))?;
            let left = relabel_down_left(lattice.vertex_type(r, c - 1))?;
            let down = relabel_down_down(lattice.vertex_type(r + 1, c))?;
            Some(weights.get(base) * weights.get(lower_left) * weights.get(left) * weights.get(down))
        }
    }
}

/// Atomically applies the flip at `(r, c)` in direction `dir`: all four cells are rewritten and
/// the running height/volume adjusted, or (if the lattice is inconsistent with the relabelling
/// table) nothing is mutated and an [`Error::InvariantViolation`] is returned.
///
/// Callers are expected to have already confirmed [`flippable`] for this `(r, c, dir)`.
pub fn apply(lattice: &mut Lattice, r: usize, c: usize, dir: Direction) -> Result<()> {
    match dir {
        Direction::Up => {
            let base = relabel_up_base(lattice.vertex_type(r, c))
                .ok_or_else(|| invariant_error("UP", "base"))?;
            let upper_right = relabel_up_upper_right(lattice.vertex_type(r - 1, c + 1))
                .ok_or_else(|| invariant_error("UP", "upper-right"))?;
            let right = relabel_up_right(lattice.vertex_type(r, c + 1))
                .ok_or_else(|| invariant_error("UP", "right"))?;
            let up = relabel_up_up(lattice.vertex_type(r - 1, c))
                .ok_or_else(|| invariant_error("UP", "up"))?;

            lattice.set_vertex_type(r, c, base);
            lattice.set_vertex_type(r - 1, c + 1, upper_right);
            lattice.set_vertex_type(r, c + 1, right);
            lattice.set_vertex_type(r - 1, c, up);
            lattice.adjust_height(r, c, -1);
        }
        Direction::Down => {
            let base = relabel_down_base(lattice.vertex_type(r, c))
                .ok_or_else(|| invariant_error("DOWN", "base"))?;
            let lower_left = relabel_down_lower_left(lattice.vertex_type(r + 1, c - 1))
                .ok_or_else(|| invariant_error("DOWN", "lower-left"))?;
            let left = relabel_down_left(lattice.vertex_type(r, c - 1))
                .ok_or_else(|| invariant_error("DOWN", "left"))?;
            let down = relabel_down_down(lattice.vertex_type(r + 1, c))
                .ok_or_else(|| invariant_error("DOWN", "down"))?;

            lattice.set_vertex_type(r, c, base);
            lattice.set_vertex_type(r + 1, c - 1, lower_left);
            lattice.set_vertex_type(r, c - 1, left);
            lattice.set_vertex_type(r + 1, c, down);
            lattice.adjust_height(r + 1, c - 1, 1);
        }
    }
    Ok(())
}

fn invariant_error(dir: &str, slot: &str) -> Error {
    Error::InvariantViolation(format!(
        "{dir} flip has no relabelling for its {slot} cell's pre-type"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice_of(digits: &[u8], rows: usize, cols: usize) -> Lattice {
        Lattice::from_bytes(digits, rows, cols).unwrap()
    }

    #[test]
    fn up_flip_rejected_at_top_row() {
        let lattice = lattice_of(b"0000000000000000", 4, 4);
        assert!(!flippable(
            &lattice,
            LatticeRole::Upper,
            0,
            0,
            Direction::Up,
            None
        ));
    }

    #[test]
    fn down_flip_rejected_at_bottom_row() {
        let lattice = lattice_of(b"0000000000000000", 4, 4);
        assert!(!flippable(
            &lattice,
            LatticeRole::Lower,
            3,
            1,
            Direction::Down,
            None
        ));
    }

    #[test]
    fn all_zero_lattice_has_no_up_flip_anywhere() {
        // Row r > 0 UP requires the upper-right neighbour to be a2 or c2; an all-a1 lattice has
        // neither, so no interior cell is UP-flippable either.
        let lattice = lattice_of(b"0000000000000000", 4, 4);
        for r in 1..4 {
            for c in 0..3 {
                assert!(!flippable(
                    &lattice,
                    LatticeRole::Upper,
                    r,
                    c,
                    Direction::Up,
                    None
                ));
            }
        }
    }

    // 4x4, row-major: row0 = "2500", row1 = "0300", row2 = "0000", row3 = "0000". base(1,0)=a1,
    // upper-right(0,1)=c2, right(1,1)=b2, up(0,0)=b1 -- chosen so both `flippable` and `apply`
    // succeed for an UP flip at (1, 0).
    const UP_FLIP_DIGITS: &[u8; 16] = b"2500030000000000";

    #[test]
    fn single_up_flip_transitions_and_moves_one_unit_of_volume() {
        let lattice = lattice_of(UP_FLIP_DIGITS, 4, 4);
        assert!(flippable(
            &lattice,
            LatticeRole::Upper,
            1,
            0,
            Direction::Up,
            None
        ));

        let mut lattice = lattice;
        let before_volume = lattice.volume();
        apply(&mut lattice, 1, 0, Direction::Up).unwrap();

        assert_eq!(lattice.vertex_type(1, 0), VertexType::C1);
        assert_eq!(lattice.vertex_type(0, 1), VertexType::A1);
        assert_eq!(lattice.vertex_type(1, 1), VertexType::C2);
        assert_eq!(lattice.vertex_type(0, 0), VertexType::C2);
        assert_eq!(lattice.volume(), before_volume - 1);
    }

    // 4x4, row-major: row0 = "0000", row1 = "5000", row2 = "1500", row3 = "0000". base(1,1)=a1,
    // lower-left(2,0)=a2, left(1,0)=c2, down(2,1)=c2 -- chosen so both `flippable` and `apply`
    // succeed for a DOWN flip at (1, 1).
    const DOWN_FLIP_DIGITS: &[u8; 16] = b"0000500015000000";

    #[test]
    fn single_down_flip_transitions_and_adds_one_unit_of_volume() {
        let lattice = lattice_of(DOWN_FLIP_DIGITS, 4, 4);
        assert!(flippable(
            &lattice,
            LatticeRole::Lower,
            1,
            1,
            Direction::Down,
            None
        ));

        let mut lattice = lattice;
        let before_volume = lattice.volume();
        apply(&mut lattice, 1, 1, Direction::Down).unwrap();

        assert_eq!(lattice.vertex_type(1, 1), VertexType::C2);
        assert_eq!(lattice.vertex_type(2, 0), VertexType::C2);
        assert_eq!(lattice.vertex_type(1, 0), VertexType::B1);
        assert_eq!(lattice.vertex_type(2, 1), VertexType::B2);
        assert_eq!(lattice.volume(), before_volume + 1);
    }

    #[test]
    fn sticky_guard_blocks_upper_from_dipping_below_lower() {
        let upper = lattice_of(UP_FLIP_DIGITS, 4, 4);
        // Make the lower lattice's height at (1, 0) equal to the upper's, so the sticky guard
        // must reject the UP flip (it would make upper <= lower).
        let mut lower = upper.clone();
        assert_eq!(upper.height(1, 0), lower.height(1, 0));

        assert!(flippable(
            &upper,
            LatticeRole::Upper,
            1,
            0,
            Direction::Up,
            None
        ));
        assert!(!flippable(
            &upper,
            LatticeRole::Upper,
            1,
            0,
            Direction::Up,
            Some(&lower)
        ));

        // Lowering the lower's height below the upper's makes the guard pass again.
        lower.adjust_height(1, 0, -1);
        assert!(flippable(
            &upper,
            LatticeRole::Upper,
            1,
            0,
            Direction::Up,
            Some(&lower)
        ));
    }

    #[test]
    fn ratio_is_bounded_by_one_for_any_positive_weights() {
        use crate::weights::{compute_rho, Weights};

        let lattice = lattice_of(UP_FLIP_DIGITS, 4, 4);
        let weights = Weights::new(2.0, 0.3, 1.7, 5.0, 0.1, 3.3);
        let rho = compute_rho(&weights);

        let r = ratio(&lattice, &weights, rho, 1, 0, Direction::Up);
        assert!((0.0..=1.0).contains(&r));
    }
}
