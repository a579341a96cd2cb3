#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

//! Core Markov-chain Monte Carlo engine for the six-vertex model.
//!
//! This crate implements the data model, flip kernel, and driver for a fixed-size lattice of
//! six-type vertices, paired as an "upper" and "lower" configuration, driven toward equilibrium by
//! local Metropolis flip moves. Rendering, file layout, and argument parsing are deliberately out
//! of scope here; see the `sixvertex-cli` binary crate for a runnable tool built on top of this
//! engine.

pub mod engine;
pub mod error;
pub mod flip;
pub mod lattice;
pub mod sink;
pub mod vertex;
pub mod weights;

pub use engine::Engine;
pub use error::{Error, Result};
pub use flip::{Direction, LatticeRole};
pub use lattice::{Cell, Lattice};
pub use sink::{DensitySink, Sink, SnapshotSink, TotalWeightSink, VolumeSink};
pub use vertex::VertexType;
pub use weights::{compute_rho, Weights};
