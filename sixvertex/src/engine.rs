//! The MCMC driver: owns both lattices, the PRNG, the weights/rho, and the running counters.

use crate::flip::{self, Direction, LatticeRole};
use crate::lattice::Lattice;
use crate::weights::{compute_rho, Weights};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// A single value owning both coupled lattices, the process-wide PRNG, the weight table and its
/// derived rho, the sticky-regime toggle, the flip budget, and the completed/failed counters.
///
/// There is no other mutable global state: sinks receive only read-only borrows of the lattices
/// this type owns (see [`crate::sink`]).
pub struct Engine {
    upper: Lattice,
    lower: Lattice,
    weights: Weights,
    rho: f64,
    sticky: bool,
    rng: Pcg64,
    budget: u64,
    flip_completed: u64,
    flip_failed: u64,
}

impl Engine {
    /// Builds a new engine from the initial lattices, weights, sticky-regime toggle, PRNG seed,
    /// and flip budget (`0` meaning "run until externally cancelled").
    #[must_use]
    pub fn new(
        upper: Lattice,
        lower: Lattice,
        weights: Weights,
        sticky: bool,
        seed: u64,
        budget: u64,
    ) -> Self {
        let rho = compute_rho(&weights);
        Self {
            upper,
            lower,
            weights,
            rho,
            sticky,
            rng: Pcg64::seed_from_u64(seed),
            budget,
            flip_completed: 0,
            flip_failed: 0,
        }
    }

    /// The upper lattice.
    #[must_use]
    pub const fn upper(&self) -> &Lattice {
        &self.upper
    }

    /// The lower lattice.
    #[must_use]
    pub const fn lower(&self) -> &Lattice {
        &self.lower
    }

    /// The weight table this engine was constructed with.
    #[must_use]
    pub const fn weights(&self) -> &Weights {
        &self.weights
    }

    /// The Metropolis normaliser derived from the weight table at construction.
    #[must_use]
    pub const fn rho(&self) -> f64 {
        self.rho
    }

    /// The configured flip budget (`0` means unbounded).
    #[must_use]
    pub const fn budget(&self) -> u64 {
        self.budget
    }

    /// Number of accepted flips so far (a bi-flip acceptance counts once).
    #[must_use]
    pub const fn flip_completed(&self) -> u64 {
        self.flip_completed
    }

    /// Number of rejected-but-admissible draws so far (boundary/type rejections are not
    /// counted).
    #[must_use]
    pub const fn flip_failed(&self) -> u64 {
        self.flip_failed
    }

    /// Fraction of counted draws (`flip_completed / (flip_completed + flip_failed)`) that were
    /// accepted, or `0.0` if no draw has been counted yet.
    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        let counted = self.flip_completed + self.flip_failed;
        if counted == 0 {
            0.0
        } else {
            self.flip_completed as f64 / counted as f64
        }
    }

    /// Advances exactly one iteration: one uniform cell draw, processed in turn against the
    /// upper lattice and then the lower lattice.
    pub fn step(&mut self) {
        let r = self.rng.gen_range(0..self.upper.rows());
        let c = self.rng.gen_range(0..self.upper.cols());

        self.try_cell(r, c, LatticeRole::Upper);
        self.try_cell(r, c, LatticeRole::Lower);
    }

    /// Runs [`Self::step`] until the configured budget (`flip_completed + flip_failed`) is
    /// reached, or forever if the budget is `0`. `interval` is the emission cadence, applied to
    /// `flip_completed` with a plain modulus (`flip_completed % interval == 0`, checked exactly
    /// once per newly completed flip); `interval == 0` disables emission. `on_emit` is invoked
    /// with a borrow of `self` and the current `flip_completed` count; an error from `on_emit`
    /// (e.g. a sink's underlying write failing) aborts the run and is propagated to the caller.
    /// `on_emit`'s error type is left generic so a caller can use its own error currency (the CLI
    /// binary uses `anyhow::Error`) without this crate's `Error` appearing at the call site.
    pub fn run<E>(
        &mut self,
        interval: u64,
        mut on_emit: impl FnMut(&Self, u64) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        loop {
            let completed_before = self.flip_completed;
            self.step();

            if interval != 0
                && self.flip_completed > completed_before
                && self.flip_completed % interval == 0
            {
                on_emit(self, self.flip_completed)?;
            }

            if self.budget != 0 && self.flip_completed + self.flip_failed >= self.budget {
                break;
            }
        }
        Ok(())
    }

    fn try_cell(&mut self, r: usize, c: usize, role: LatticeRole) {
        let (can_up, can_down, ratio_up, ratio_down) = {
            let (lattice, partner) = match role {
                LatticeRole::Upper => (&self.upper, &self.lower),
                LatticeRole::Lower => (&self.lower, &self.upper),
            };
            let sticky_partner = self.sticky.then_some(partner);

            let can_up = flip::flippable(lattice, role, r, c, Direction::Up, sticky_partner);
            let can_down = flip::flippable(lattice, role, r, c, Direction::Down, sticky_partner);
            let ratio_up = can_up
                .then(|| flip::ratio(lattice, &self.weights, self.rho, r, c, Direction::Up))
                .unwrap_or(0.0);
            let ratio_down = can_down
                .then(|| flip::ratio(lattice, &self.weights, self.rho, r, c, Direction::Down))
                .unwrap_or(0.0);
            (can_up, can_down, ratio_up, ratio_down)
        };

        match (can_up, can_down) {
            (true, false) => self.accept_or_reject(role, r, c, &[(Direction::Up, ratio_up)]),
            (false, true) => self.accept_or_reject(role, r, c, &[(Direction::Down, ratio_down)]),
            (true, true) => self.accept_or_reject(
                role,
                r,
                c,
                &[(Direction::Up, ratio_up), (Direction::Down, ratio_down)],
            ),
            (false, false) => {}
        }
    }

    /// Draws one uniform sample and walks `candidates` in order, accepting the first direction
    /// whose cumulative ratio interval contains the draw (the single-flip and bi-flip cases
    /// are the same algorithm specialised to one or two candidates).
    fn accept_or_reject(
        &mut self,
        role: LatticeRole,
        r: usize,
        c: usize,
        candidates: &[(Direction, f64)],
    ) {
        let u: f64 = self.rng.gen_range(0.0..1.0);
        let mut cumulative = 0.0;
        for &(dir, ratio) in candidates {
            cumulative += ratio;
            if u <= cumulative {
                let lattice = match role {
                    LatticeRole::Upper => &mut self.upper,
                    LatticeRole::Lower => &mut self.lower,
                };
                flip::apply(lattice, r, c, dir).expect("flip kernel invariant violated");
                self.flip_completed += 1;
                return;
            }
        }
        self.flip_failed += 1;
    }
}
