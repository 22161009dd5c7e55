//! Annealing state and the swap neighborhood.

use rand::Rng;

use crate::matrix::CostMatrix;
use crate::tour::Tour;

/// Result of one Metropolis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The neighbor was cheaper and replaced the current tour.
    Improved,
    /// The neighbor was not cheaper but passed the Metropolis test.
    AcceptedUphill,
    Rejected,
}

impl StepOutcome {
    pub fn accepted(self) -> bool {
        !matches!(self, StepOutcome::Rejected)
    }
}

/// Mutable state of one annealing run.
///
/// Tracks the current tour with its cost and the best tour seen so far.
/// `best_cost` never increases over the lifetime of a state.
#[derive(Debug, Clone)]
pub struct AnnealingState {
    pub current: Tour,
    pub current_cost: f64,
    pub best: Tour,
    pub best_cost: f64,
}

impl AnnealingState {
    pub fn new(matrix: &CostMatrix, initial: Tour) -> Self {
        let cost = initial.cost(matrix);
        Self {
            best: initial.clone(),
            best_cost: cost,
            current: initial,
            current_cost: cost,
        }
    }

    /// Number of positions that can take part in a swap.
    pub fn movable(&self) -> usize {
        self.current.len() - 2
    }

    /// Picks two distinct interior positions, uniformly over unordered
    /// pairs, returned in ascending order.
    pub fn random_pair<R: Rng>(&self, rng: &mut R) -> (usize, usize) {
        let m = self.movable();
        let a = rng.random_range(0..m);
        let mut b = rng.random_range(0..m - 1);
        if b >= a {
            b += 1;
        }
        (a.min(b) + 1, a.max(b) + 1)
    }

    /// One Metropolis step at `temperature`: propose a swap, accept it
    /// if it improves, otherwise with probability `exp(-delta / T)`.
    ///
    /// The state must have at least two movable positions.
    pub fn step<R: Rng>(&mut self, matrix: &CostMatrix, temperature: f64, rng: &mut R) -> StepOutcome {
        let (i, j) = self.random_pair(rng);
        let delta = swap_delta(matrix, self.current.nodes(), i, j);

        let outcome = if delta < 0.0 {
            StepOutcome::Improved
        } else if rng.random_range(0.0..1.0) < (-delta / temperature).exp() {
            StepOutcome::AcceptedUphill
        } else {
            StepOutcome::Rejected
        };

        if outcome.accepted() {
            self.current.as_mut_slice().swap(i, j);
            self.current_cost += delta;
            if self.current_cost < self.best_cost {
                self.best = self.current.clone();
                self.best_cost = self.current_cost;
            }
        }
        outcome
    }

    /// Re-evaluates the current tour from scratch, dropping any rounding
    /// error accumulated by incremental updates.
    pub fn resync(&mut self, matrix: &CostMatrix) {
        self.current_cost = self.current.cost(matrix);
    }
}

/// Cost change from swapping positions `i < j` of a closed tour.
///
/// Only the (at most four) edges touching the two positions change.
/// Adjacent positions share an edge, which flips direction.
pub fn swap_delta(matrix: &CostMatrix, nodes: &[usize], i: usize, j: usize) -> f64 {
    debug_assert!(0 < i && i < j && j + 1 < nodes.len());
    let c = |a: usize, b: usize| matrix.cost(a, b);
    let (before, x, y, after) = (nodes[i - 1], nodes[i], nodes[j], nodes[j + 1]);

    if j == i + 1 {
        let old = c(before, x) + c(x, y) + c(y, after);
        let new = c(before, y) + c(y, x) + c(x, after);
        new - old
    } else {
        let (x_next, y_prev) = (nodes[i + 1], nodes[j - 1]);
        let old = c(before, x) + c(x, x_next) + c(y_prev, y) + c(y, after);
        let new = c(before, y) + c(y, x_next) + c(y_prev, x) + c(x, after);
        new - old
    }
}
