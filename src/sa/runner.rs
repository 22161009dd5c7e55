//! SA execution loop.
//!
//! # Algorithm
//!
//! 1. Build the initial tour with the configured constructor.
//! 2. While `T > T_min`:
//!    a. run one era of Metropolis steps at the fixed temperature `T`
//!    b. advance the epoch and recompute `T` from the cooling schedule
//! 3. Return the best tour ever seen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rand::Rng;

use super::config::SaConfig;
use super::types::{AnnealingState, StepOutcome};
use crate::error::TspResult;
use crate::matrix::CostMatrix;
use crate::random::{create_rng, resolve_seed};
use crate::tour::Tour;

/// Why an annealing run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The temperature reached the floor, or the instance has no
    /// neighbors to explore.
    Converged,
    /// `max_iterations` was exhausted first.
    IterationLimit,
    /// The external cancellation flag was set.
    Cancelled,
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaResult {
    /// The best tour found.
    pub best: Tour,

    /// Cost of the best tour.
    pub best_cost: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Number of completed eras.
    pub epochs: usize,

    /// Temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    pub stop: StopReason,

    /// Best cost at the start and after every era.
    pub cost_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA with an RNG seeded from the configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::sa::{SaConfig, SaRunner};
    /// use u_tsp::CostMatrix;
    ///
    /// let m = CostMatrix::new(vec![
    ///     vec![0.0, 1.0, 4.0],
    ///     vec![1.0, 0.0, 2.0],
    ///     vec![4.0, 2.0, 0.0],
    /// ]).unwrap();
    /// let result = SaRunner::run(&m, &SaConfig::default().with_seed(1)).unwrap();
    /// assert_eq!(result.best_cost, 7.0);
    /// ```
    pub fn run(matrix: &CostMatrix, config: &SaConfig) -> TspResult<SaResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs SA with an optional cancellation token, checked once per era.
    pub fn run_with_cancel(
        matrix: &CostMatrix,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<SaResult> {
        let seed = resolve_seed(config.seed);
        debug!("annealing: seed {seed}");
        let mut rng = create_rng(seed);
        Self::run_with_rng(matrix, config, &mut rng, cancel)
    }

    /// Runs SA drawing every random decision from `rng`.
    ///
    /// `config.seed` is ignored; the caller owns the random source.
    pub fn run_with_rng<R: Rng>(
        matrix: &CostMatrix,
        config: &SaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<SaResult> {
        config.validate()?;
        info!(
            "annealing: solving {} nodes, T0 = {}, {:?}",
            matrix.len(),
            config.initial_temperature,
            config.cooling
        );

        let initial = config.initial.build(matrix, rng);
        let mut state = AnnealingState::new(matrix, initial);

        let mut temperature = config.initial_temperature;
        let mut epoch = 0usize;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cost_history = vec![state.best_cost];

        let cap_reached =
            |iterations: usize| config.max_iterations > 0 && iterations >= config.max_iterations;

        let stop = loop {
            if temperature <= config.min_temperature || state.movable() < 2 {
                break StopReason::Converged;
            }
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break StopReason::Cancelled;
            }

            for _ in 0..config.iterations_per_temperature {
                if cap_reached(total_iterations) {
                    break;
                }
                match state.step(matrix, temperature, rng) {
                    StepOutcome::Improved => {
                        improving_moves += 1;
                        accepted_moves += 1;
                    }
                    StepOutcome::AcceptedUphill => accepted_moves += 1,
                    StepOutcome::Rejected => {}
                }
                total_iterations += 1;
            }
            state.resync(matrix);
            cost_history.push(state.best_cost);

            if cap_reached(total_iterations) {
                break StopReason::IterationLimit;
            }

            epoch += 1;
            temperature = config.cooling.temperature_at(
                config.initial_temperature,
                config.min_temperature,
                epoch,
            );
            debug!(
                "annealing: epoch {epoch}, T = {temperature:.4}, best = {}",
                state.best_cost
            );
        };

        let best_cost = state.best.cost(matrix);
        info!("annealing: {stop:?} after {total_iterations} iterations, best cost {best_cost}");

        Ok(SaResult {
            best: state.best,
            best_cost,
            iterations: total_iterations,
            epochs: epoch,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            stop,
            cost_history,
        })
    }
}
