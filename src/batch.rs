//! Batch execution of a run configuration.
//!
//! Each instance line is solved `repetitions` times with fresh solver
//! state, every solve is timed, and the results are appended to the
//! configured output file as one block per instance.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::TspResult;
use crate::io::{append_block, prepare_output, InstanceSpec, MatrixReader, RunConfig, RunRecord};
use crate::matrix::CostMatrix;
use crate::random::resolve_seed;
use crate::solver::{Algorithm, TspSolver};

/// Directory matrix files are resolved against unless overridden.
pub const DEFAULT_DATA_DIR: &str = "Test_data";

/// Results of every repetition of one instance.
#[derive(Debug, Clone)]
pub struct InstanceReport {
    pub name: String,
    pub records: Vec<RunRecord>,
}

impl InstanceReport {
    /// Cheapest run, if there was any.
    pub fn best(&self) -> Option<&RunRecord> {
        self.records
            .iter()
            .min_by(|a, b| a.solution.cost.total_cmp(&b.solution.cost))
    }

    /// Average percentage against the known optimum.
    pub fn mean_ratio(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.iter().map(RunRecord::ratio).sum();
        Some(sum / self.records.len() as f64)
    }
}

/// Runs the instances of a [`RunConfig`].
#[derive(Debug, Clone)]
pub struct BatchRunner {
    data_dir: PathBuf,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl BatchRunner {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Solves every instance and writes the result blocks to
    /// `config.output`, replacing a previous output file.
    pub fn run(&self, config: &RunConfig) -> TspResult<Vec<InstanceReport>> {
        prepare_output(&config.output)?;
        let mut reports = Vec::with_capacity(config.instances.len());
        for spec in &config.instances {
            let report = self.run_instance(spec)?;
            append_block(&config.output, &report.name, &report.records)?;
            reports.push(report);
        }
        info!(
            "batch: {} instances written to {}",
            reports.len(),
            config.output.display()
        );
        Ok(reports)
    }

    /// Loads the instance's matrix and solves it `repetitions` times.
    pub fn run_instance(&self, spec: &InstanceSpec) -> TspResult<InstanceReport> {
        let name = spec.name();
        let matrix = CostMatrix::try_read_matrix_file(self.data_dir.join(&spec.file))?;
        info!(
            "batch: {name} ({} nodes), {} x {}",
            matrix.len(),
            spec.repetitions,
            spec.algorithm.name()
        );

        let base_seed = resolve_seed(spec.algorithm.seed());
        let records = solve_repetitions(&matrix, spec, base_seed)?;

        for record in records.iter().filter(|r| r.below_optimum()) {
            warn!(
                "{name}: cost {} is below the known optimum {}",
                record.solution.cost, spec.optimal
            );
        }
        info!("batch: {name} done");
        Ok(InstanceReport { name, records })
    }
}

fn solve_once(
    matrix: &CostMatrix,
    algorithm: &Algorithm,
    optimal: f64,
) -> TspResult<RunRecord> {
    let start = Instant::now();
    let solution = algorithm.solve(matrix)?;
    Ok(RunRecord::new(start.elapsed(), solution, optimal))
}

#[cfg(not(feature = "parallel"))]
fn solve_repetitions(
    matrix: &CostMatrix,
    spec: &InstanceSpec,
    base_seed: u64,
) -> TspResult<Vec<RunRecord>> {
    (0..spec.repetitions)
        .map(|rep| {
            let algorithm = spec.algorithm.with_seed(base_seed.wrapping_add(rep as u64));
            solve_once(matrix, &algorithm, spec.optimal)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn solve_repetitions(
    matrix: &CostMatrix,
    spec: &InstanceSpec,
    base_seed: u64,
) -> TspResult<Vec<RunRecord>> {
    (0..spec.repetitions)
        .into_par_iter()
        .map(|rep| {
            let algorithm = spec.algorithm.with_seed(base_seed.wrapping_add(rep as u64));
            solve_once(matrix, &algorithm, spec.optimal)
        })
        .collect()
}
