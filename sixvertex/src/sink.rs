//! Observation sinks: small, stateless-ish readers of a [`Lattice`] snapshot.
//!
//! Sinks never mutate the lattice they observe; each implements [`Sink`], writing its emission to
//! a caller-supplied [`Write`]r so the engine and its tests can drive them uniformly, while the
//! CLI binary owns the actual files/paths behind that writer.

use crate::error::Result;
use crate::lattice::Lattice;
use crate::vertex::VertexType;
use crate::weights::Weights;
use itertools::iproduct;
use std::io::Write;

/// A read-only observer of lattice state, invoked at the engine's configured emission cadence.
pub trait Sink {
    /// Writes this sink's emission for `label` (the observed lattice) at iteration `step` to
    /// `out`.
    fn emit(&mut self, label: &Lattice, step: u64, out: &mut dyn Write) -> Result<()>;
}

/// Emits the current lattice volume, one integer per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct VolumeSink;

impl Sink for VolumeSink {
    fn emit(&mut self, label: &Lattice, _step: u64, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", label.volume())?;
        Ok(())
    }
}

/// Emits the lattice's total configuration weight as a symbolic product `w_i^{n_i}`, one
/// vertex-type factor per nonzero count, rendered with the actual weight values.
#[derive(Clone, Copy, Debug)]
pub struct TotalWeightSink {
    weights: Weights,
}

impl TotalWeightSink {
    /// Builds a sink that renders factors using `weights`.
    #[must_use]
    pub const fn new(weights: Weights) -> Self {
        Self { weights }
    }
}

impl Sink for TotalWeightSink {
    fn emit(&mut self, label: &Lattice, _step: u64, out: &mut dyn Write) -> Result<()> {
        let mut counts = [0u64; 6];
        for (r, c) in iproduct!(0..label.rows(), 0..label.cols()) {
            counts[label.vertex_type(r, c).index()] += 1;
        }

        let mut wrote_factor = false;
        for ty in VertexType::ALL {
            let n = counts[ty.index()];
            if n == 0 {
                continue;
            }
            if wrote_factor {
                write!(out, " . ")?;
            }
            write!(out, "{}^{n}", self.weights.get(ty))?;
            wrote_factor = true;
        }
        if !wrote_factor {
            // An empty lattice (rows == 0 or cols == 0) has an empty product, conventionally 1.
            write!(out, "1")?;
        }
        writeln!(out)?;
        Ok(())
    }
}

/// Emits a c-vertex density map: for every interior cell at least `step / 2` away from every
/// edge, the fraction of cells in its `(step + 1) x (step + 1)` neighbourhood that are `c1`/`c2`.
#[derive(Clone, Copy, Debug)]
pub struct DensitySink {
    step: usize,
}

impl DensitySink {
    /// Builds a sink with the given even neighbourhood step.
    #[must_use]
    pub const fn new(step: usize) -> Self {
        Self { step }
    }
}

impl Sink for DensitySink {
    fn emit(&mut self, label: &Lattice, _step: u64, out: &mut dyn Write) -> Result<()> {
        let margin = (self.step / 2) as i64;
        let rows = label.rows() as i64;
        let cols = label.cols() as i64;

        for (i, j) in iproduct!(margin..rows - margin, margin..cols - margin) {
            let mut c_count: u64 = 0;
            let mut total: u64 = 0;
            for (di, dj) in iproduct!(-margin..=margin, -margin..=margin) {
                total += 1;
                #[allow(clippy::cast_sign_loss)]
                if label
                    .vertex_type((i + di) as usize, (j + dj) as usize)
                    .is_c()
                {
                    c_count += 1;
                }
            }
            let density = c_count as f64 / total as f64;
            writeln!(out, "{i} {j} {density:.6}")?;
        }
        Ok(())
    }
}

/// Emits the lattice as the row-major digit string the parser reads, the same format
/// [`Lattice::to_digit_string`] produces.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotSink;

impl Sink for SnapshotSink {
    fn emit(&mut self, label: &Lattice, _step: u64, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", label.to_digit_string())?;
        Ok(())
    }
}
