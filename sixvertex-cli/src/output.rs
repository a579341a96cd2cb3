//! Output-directory layout for a single run: path construction and per-sink file handles.
//!
//! Owned entirely by the CLI binary; the core library knows nothing about files or paths.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use sixvertex::LatticeRole;

/// The directory tree for one run: `<root>/sixvertex_a1-..c2-..._RxC/{upper,lower}/density/`.
pub struct RunOutput {
    root: PathBuf,
}

impl RunOutput {
    /// Creates the per-run directory (and its `upper`/`lower`/`density` subdirectories) under
    /// `out_dir` (the current directory if `None`), named from the six weights and the lattice
    /// dimensions.
    pub fn create(
        out_dir: Option<&Path>,
        weights: [f64; 6],
        rows: usize,
        cols: usize,
    ) -> Result<Self> {
        let [a1, a2, b1, b2, c1, c2] = weights;
        let dirname = format!(
            "sixvertex_a1-{a1}_a2-{a2}_b1-{b1}_b2-{b2}_c1-{c1}_c2-{c2}_{rows}x{cols}"
        );
        let root = out_dir.map_or_else(|| PathBuf::from(&dirname), |dir| dir.join(&dirname));

        for role in [LatticeRole::Upper, LatticeRole::Lower] {
            let side = root.join(Self::side_name(role));
            fs::create_dir_all(side.join("density"))
                .with_context(|| format!("unable to create '{}'", side.display()))?;
        }

        Ok(Self { root })
    }

    /// The run's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    const fn side_name(role: LatticeRole) -> &'static str {
        match role {
            LatticeRole::Upper => "upper",
            LatticeRole::Lower => "lower",
        }
    }

    /// Opens (creating if necessary, appending otherwise) the log file `name` under the given
    /// lattice's subdirectory.
    pub fn open_log(&self, role: LatticeRole, name: &str) -> Result<File> {
        let path = self.root.join(Self::side_name(role)).join(name);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("unable to open '{}'", path.display()))
    }

    /// Opens (creating if necessary, appending otherwise) the c-density file for a given lattice
    /// at the given emission step.
    pub fn density_file(&self, role: LatticeRole, step: u64) -> Result<File> {
        let path = self
            .root
            .join(Self::side_name(role))
            .join("density")
            .join(format!("step-{step}.txt"));
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("unable to open '{}'", path.display()))
    }

    /// Writes the terminal run summary to `matrix.end` under the run's root directory.
    pub fn write_summary(&self, summary: &str) -> Result<()> {
        let path = self.root.join("matrix.end");
        fs::write(&path, summary).with_context(|| format!("unable to write '{}'", path.display()))
    }
}
