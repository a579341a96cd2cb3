//! End-to-end scenarios exercising the full engine/lattice/flip pipeline through the public API,
//! one per documented law or invariant class.

use sixvertex::flip::{self, Direction, LatticeRole};
use sixvertex::{Engine, Lattice, VertexType, Weights};

fn lattice(digits: &[u8], rows: usize, cols: usize) -> Lattice {
    Lattice::from_bytes(digits, rows, cols).unwrap()
}

/// Volume is the sum of the running row-prefix heights, derived once at load time.
#[test]
fn volume_matches_the_running_height_count_over_a_mixed_lattice() {
    // row0 = a1 a2 b1 b2 -> heights 1 1 2 2 (sum 6)
    // row1 = c1 c2 a1 a2 -> heights 0 1 2 2 (sum 5)
    // row2 = b1 b2 c1 c2 -> heights 1 1 1 2 (sum 5)
    // row3 = a1 a2 b1 b2 -> heights 1 1 2 2 (sum 6)
    let upper = lattice(b"0123450123450123", 4, 4);
    assert_eq!(upper.volume(), 22);

    let mut rebuilt = upper.clone();
    rebuilt.rebuild_heights();
    assert_eq!(rebuilt.volume(), upper.volume());
}

/// A lattice with no cell ever satisfying a relabelling table's neighbour condition never
/// admits a flip, no matter how many cells are probed.
#[test]
fn an_all_a1_lattice_admits_no_flip_anywhere() {
    let upper = lattice(b"0000000000000000", 4, 4);
    for r in 0..4 {
        for c in 0..4 {
            assert!(!flip::flippable(
                &upper,
                LatticeRole::Upper,
                r,
                c,
                Direction::Up,
                None
            ));
            assert!(!flip::flippable(
                &upper,
                LatticeRole::Upper,
                r,
                c,
                Direction::Down,
                None
            ));
        }
    }

    let mut eng = Engine::new(
        upper.clone(),
        upper,
        Weights::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
        true,
        42,
        500,
    );
    for _ in 0..500 {
        eng.step();
    }
    assert_eq!(eng.flip_completed(), 0);
}

/// A single isolated admissible UP flip transitions exactly the four participating cells and
/// moves exactly one unit of volume, with every other cell untouched.
#[test]
fn a_single_admissible_up_flip_moves_exactly_one_unit_of_volume() {
    // 4x4, row-major: "2500" "0300" "0000" "0000". base(1,0)=a1, upper-right(0,1)=c2,
    // right(1,1)=b2, up(0,0)=b1 -- the only admissible move in this lattice.
    let mut upper = lattice(b"2500030000000000", 4, 4);
    assert!(flip::flippable(
        &upper,
        LatticeRole::Upper,
        1,
        0,
        Direction::Up,
        None
    ));

    let before_volume = upper.volume();
    flip::apply(&mut upper, 1, 0, Direction::Up).unwrap();

    assert_eq!(upper.vertex_type(1, 0), VertexType::C1);
    assert_eq!(upper.vertex_type(0, 1), VertexType::A1);
    assert_eq!(upper.vertex_type(1, 1), VertexType::C2);
    assert_eq!(upper.vertex_type(0, 0), VertexType::C2);
    // Cells untouched by the move keep their original type.
    assert_eq!(upper.vertex_type(2, 2), VertexType::A1);
    assert_eq!(upper.volume(), before_volume - 1);

    // The flipped cell is no longer UP-flippable: its new base type (c1) isn't in {a1, c2}.
    assert!(!flip::flippable(
        &upper,
        LatticeRole::Upper,
        1,
        0,
        Direction::Up,
        None
    ));
}

/// Asymmetric weights still yield a finite, positive acceptance fraction over a long run, and
/// rho upper-bounds the scenario's hand-computed lower bound.
#[test]
fn asymmetric_weights_give_a_positive_finite_acceptance_fraction() {
    let weights = Weights::new(2.0, 2.0, 1.0, 1.0, 1.0, 1.0);
    let upper = lattice(b"0521053105310531", 4, 4);
    let lower = upper.clone();

    let mut eng = Engine::new(upper, lower, weights, true, 7, 50_000);
    assert!(eng.rho() >= 4.0);

    for _ in 0..50_000 {
        eng.step();
    }
    assert!(eng.flip_completed() + eng.flip_failed() > 0);
    assert!(eng.acceptance_rate() > 0.0);
    assert!(eng.acceptance_rate() <= 1.0);
}

/// In the sticky regime, the upper lattice never drops to or below the lower lattice at any
/// site, for the whole duration of a long run starting from equal lattices.
#[test]
fn sticky_regime_keeps_upper_at_or_above_lower_throughout_a_long_run() {
    let digits: Vec<u8> = (0..64).map(|i| if i % 2 == 0 { b'2' } else { b'5' }).collect();
    let upper = lattice(&digits, 8, 8);
    let lower = upper.clone();

    let mut eng = Engine::new(
        upper,
        lower,
        Weights::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
        true,
        99,
        20_000,
    );
    for _ in 0..20_000 {
        eng.step();
        for r in 0..eng.upper().rows() {
            for c in 0..eng.upper().cols() {
                assert!(eng.upper().height(r, c) >= eng.lower().height(r, c));
            }
        }
    }
}

/// Two engines built from identical seed, inputs, and configuration produce a bitwise-identical
/// trajectory: same counters, same final lattices.
#[test]
fn identical_configuration_and_seed_replay_the_same_trajectory() {
    let weights = Weights::new(1.3, 0.7, 2.1, 0.9, 1.1, 1.6);
    let upper = b"0521053105310531";
    let lower = b"0521053105310531";

    let build = || {
        Engine::new(
            lattice(upper, 4, 4),
            lattice(lower, 4, 4),
            weights,
            true,
            1234,
            10_000,
        )
    };
    let mut a = build();
    let mut b = build();

    for _ in 0..10_000 {
        a.step();
        b.step();
    }

    assert_eq!(a.flip_completed(), b.flip_completed());
    assert_eq!(a.flip_failed(), b.flip_failed());
    assert_eq!(a.upper().to_digit_string(), b.upper().to_digit_string());
    assert_eq!(a.lower().to_digit_string(), b.lower().to_digit_string());
}
