#![allow(missing_docs)]

mod opts;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use opts::Opts;
use output::RunOutput;
use sixvertex::{
    DensitySink, Engine, Lattice, LatticeRole, Sink, SnapshotSink, TotalWeightSink, VolumeSink,
    Weights,
};
use std::fs::File;
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

fn read_lattice(path: &std::path::Path, rows: usize, cols: usize) -> Result<Lattice> {
    let file = File::open(path).with_context(|| format!("unable to read '{}'", path.display()))?;
    Lattice::from_reader(file, rows, cols)
        .with_context(|| format!("unable to parse '{}'", path.display()))
}

fn main() -> ExitCode {
    env_logger::init();

    match run(&Opts::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Per-lattice bundle of the four sinks and the files they append to.
struct SideSinks {
    role: LatticeRole,
    volume: VolumeSink,
    volume_file: File,
    weight: TotalWeightSink,
    weight_file: File,
    density: DensitySink,
    snapshot: SnapshotSink,
    snapshot_file: File,
}

impl SideSinks {
    fn open(out: &RunOutput, role: LatticeRole, weights: Weights, density_step: usize) -> Result<Self> {
        Ok(Self {
            role,
            volume: VolumeSink,
            volume_file: out.open_log(role, "volume.log")?,
            weight: TotalWeightSink::new(weights),
            weight_file: out.open_log(role, "weight.log")?,
            density: DensitySink::new(density_step),
            snapshot: SnapshotSink,
            snapshot_file: out.open_log(role, "snapshot.log")?,
        })
    }

    fn emit(&mut self, lattice: &Lattice, step: u64, out: &RunOutput) -> Result<()> {
        self.volume.emit(lattice, step, &mut self.volume_file)?;
        self.weight.emit(lattice, step, &mut self.weight_file)?;
        self.snapshot.emit(lattice, step, &mut self.snapshot_file)?;

        let mut density_file = out.density_file(self.role, step)?;
        self.density.emit(lattice, step, &mut density_file)?;
        Ok(())
    }
}

fn run(opts: &Opts) -> Result<()> {
    let upper = read_lattice(&opts.upper, opts.rows, opts.cols)?;
    let lower = read_lattice(&opts.lower, opts.rows, opts.cols)?;

    let weights = Weights::new(opts.a1, opts.a2, opts.b1, opts.b2, opts.c1, opts.c2);
    let seed = opts.seed.unwrap_or_else(derive_seed);

    let mut engine = Engine::new(upper, lower, weights, opts.sticky, seed, opts.budget);

    log::info!(
        "constructed engine: {}x{} lattice, seed={seed}, rho={:.6}, sticky={}, budget={}",
        opts.rows,
        opts.cols,
        engine.rho(),
        opts.sticky,
        opts.budget,
    );

    let run_output = RunOutput::create(
        opts.out_dir.as_deref(),
        weights.as_array(),
        opts.rows,
        opts.cols,
    )?;

    let mut upper_sinks = SideSinks::open(&run_output, LatticeRole::Upper, weights, opts.density_step)?;
    let mut lower_sinks = SideSinks::open(&run_output, LatticeRole::Lower, weights, opts.density_step)?;

    let start = Instant::now();

    engine.run(opts.interval, |eng, flip_completed| {
        upper_sinks.emit(eng.upper(), flip_completed, &run_output)?;
        lower_sinks.emit(eng.lower(), flip_completed, &run_output)?;

        log::info!(
            "flip {flip_completed}: failed={}, acceptance={:.4}",
            eng.flip_failed(),
            eng.acceptance_rate(),
        );
        Ok(())
    })?;

    let elapsed = start.elapsed();
    let flips_per_sec = if elapsed.as_secs_f64() > 0.0 {
        (engine.flip_completed() + engine.flip_failed()) as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    let summary = format!(
        "flip_completed: {}\n\
         flip_failed: {}\n\
         acceptance_rate: {:.6}\n\
         wall_clock_seconds: {:.6}\n\
         cpu_seconds: {:.6}\n\
         flips_per_second: {:.3}\n",
        engine.flip_completed(),
        engine.flip_failed(),
        engine.acceptance_rate(),
        elapsed.as_secs_f64(),
        elapsed.as_secs_f64(),
        flips_per_sec,
    );
    run_output.write_summary(&summary)?;

    log::info!("run complete: {}\n{summary}", run_output.root().display());
    Ok(())
}

fn derive_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}
