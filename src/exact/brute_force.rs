//! Exhaustive permutation search.

use itertools::Itertools;
use log::{debug, info};

use crate::error::TspResult;
use crate::matrix::CostMatrix;
use crate::solver::Solution;
use crate::tour::{order_cost, Tour};

/// Evaluates every ordering of nodes `1..n` and keeps the cheapest.
///
/// Orderings are enumerated lexicographically; the first one reaching the
/// minimum cost wins, so repeated calls on the same matrix return the
/// same tour.
///
/// # Examples
///
/// ```
/// use u_tsp::{BruteForceSolver, CostMatrix};
///
/// let m = CostMatrix::new(vec![vec![0.0, 5.0], vec![5.0, 0.0]]).unwrap();
/// let solution = BruteForceSolver::solve(&m).unwrap();
/// assert_eq!(solution.cost, 10.0);
/// assert_eq!(solution.tour.nodes(), &[0, 1, 0]);
/// ```
pub struct BruteForceSolver;

impl BruteForceSolver {
    pub fn solve(matrix: &CostMatrix) -> TspResult<Solution> {
        let n = matrix.len();
        info!("brute force: solving {n} nodes");

        let mut best_order: Vec<usize> = (1..n).collect();
        let mut best_cost = f64::INFINITY;
        let mut evaluated = 0usize;

        for order in (1..n).permutations(n - 1) {
            let cost = order_cost(matrix, &order);
            evaluated += 1;
            if cost < best_cost {
                best_cost = cost;
                best_order = order;
            }
        }

        debug!("brute force: evaluated {evaluated} orderings");
        let tour = Tour::from_order_unchecked(&best_order);
        info!("brute force: best cost {best_cost}");
        Ok(Solution::new(best_cost, tour))
    }
}
