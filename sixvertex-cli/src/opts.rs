//! Command-line configuration surface for the six-vertex sampler.

use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;

/// Runs a Markov-chain Monte Carlo sampler for the six-vertex model on a pair of lattices.
///
/// There is exactly one run mode: the whole configuration surface is flat command-line flags,
/// following the source program's all-from-argv interface rather than introducing a new
/// configuration-file format.
#[derive(Parser, Debug)]
#[command(author, about, version)]
pub struct Opts {
    /// Path to the initial upper-lattice configuration file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub upper: PathBuf,
    /// Path to the initial lower-lattice configuration file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub lower: PathBuf,

    /// Number of lattice rows.
    #[arg(long)]
    pub rows: usize,
    /// Number of lattice columns.
    #[arg(long)]
    pub cols: usize,

    /// Weight of the `a1` vertex type.
    #[arg(long)]
    pub a1: f64,
    /// Weight of the `a2` vertex type.
    #[arg(long)]
    pub a2: f64,
    /// Weight of the `b1` vertex type.
    #[arg(long)]
    pub b1: f64,
    /// Weight of the `b2` vertex type.
    #[arg(long)]
    pub b2: f64,
    /// Weight of the `c1` vertex type.
    #[arg(long)]
    pub c1: f64,
    /// Weight of the `c2` vertex type.
    #[arg(long)]
    pub c2: f64,

    /// Emit volume/weight/density/snapshot observations every this many completed flips.
    #[arg(long, default_value_t = 1000)]
    pub interval: u64,

    /// C-density neighbourhood step; must be an even, non-negative integer.
    #[arg(long = "density-step", default_value_t = 4)]
    pub density_step: usize,

    /// Total flip budget (accepted + rejected draws); `0` means run until externally cancelled.
    #[arg(long, default_value_t = 0)]
    pub budget: u64,

    /// PRNG seed; defaults to a wall-clock-derived value when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disables the sticky regime (enabled by default), which otherwise forbids the upper
    /// lattice from dropping to or below the lower lattice at any site.
    #[arg(long = "no-sticky", action = ArgAction::SetFalse, default_value_t = true)]
    pub sticky: bool,

    /// Root directory under which the per-run output directory is created; defaults to the
    /// current directory.
    #[arg(long = "out-dir", value_hint = ValueHint::DirPath)]
    pub out_dir: Option<PathBuf>,
}
