//! ACO generation loop.
//!
//! # Algorithm
//!
//! 1. Seed every pheromone entry with `initial_tau` (default
//!    `n / greedy_tour_cost`), which is also the floor.
//! 2. Each generation:
//!    a. one ant starts at every node and builds a closed tour
//!    b. every ant lays `K / tour_cost` on each edge it traversed
//!    c. evaporation: `tau = max(ro * tau, initial_tau)`
//!    d. the generation's cheapest tour updates the best-ever
//! 3. Stop after the configured number of generations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rand::Rng;

use super::config::{AcoConfig, ConstructionRule};
use super::types::{Ant, PheromoneMatrix};
use crate::construct::greedy_tour;
use crate::error::TspResult;
use crate::matrix::CostMatrix;
use crate::random::{create_rng, resolve_seed};
use crate::solver::Solution;
use crate::tour::Tour;

/// Lower bound applied to costs before inverting them, so zero-cost
/// edges and tours stay finite.
const MIN_COST: f64 = f64::EPSILON;

/// Result of an ant colony run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// The best tour found across all generations and ants.
    pub best: Tour,

    pub best_cost: f64,

    /// Generations actually executed.
    pub generations: usize,

    /// Number of tours built (ants × generations).
    pub constructions: usize,

    /// Pheromone seed and floor used for the run.
    pub initial_tau: f64,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best-ever cost after each generation.
    pub cost_history: Vec<f64>,
}

/// State of one colony: the pheromone matrix plus the best tour so far.
///
/// Exposed so callers can step generations one at a time and inspect the
/// pheromone matrix in between.
pub struct Colony<'a> {
    matrix: &'a CostMatrix,
    alpha: f64,
    ro: f64,
    deposit: f64,
    rule: ConstructionRule,
    pheromone: PheromoneMatrix,
    /// `(1 / cost)^beta`, row-major.
    visibility: Vec<f64>,
    best: Option<Solution>,
    generation: usize,
}

impl<'a> Colony<'a> {
    /// Validates `config` and seeds the pheromone matrix.
    pub fn new(matrix: &'a CostMatrix, config: &AcoConfig) -> TspResult<Self> {
        config.validate()?;
        let n = matrix.len();

        let initial_tau = config.initial_tau.unwrap_or_else(|| {
            let greedy = greedy_tour(matrix).cost(matrix);
            if greedy > 0.0 {
                n as f64 / greedy
            } else {
                n as f64
            }
        });

        let visibility = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| (1.0 / matrix.cost(i, j).max(MIN_COST)).powf(config.beta))
            .collect();

        Ok(Self {
            matrix,
            alpha: config.alpha,
            ro: config.ro,
            deposit: config.deposit,
            rule: config.rule,
            pheromone: PheromoneMatrix::new(n, initial_tau),
            visibility,
            best: None,
            generation: 0,
        })
    }

    pub fn pheromone(&self) -> &PheromoneMatrix {
        &self.pheromone
    }

    pub fn initial_tau(&self) -> f64 {
        self.pheromone.floor()
    }

    /// Best tour found so far; `None` before the first generation.
    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Attractiveness of moving from `from` to `to`.
    #[inline]
    fn score(&self, from: usize, to: usize) -> f64 {
        let n = self.matrix.len();
        self.pheromone.get(from, to).powf(self.alpha) * self.visibility[from * n + to]
    }

    /// Builds one closed tour for an ant starting at `start`.
    pub fn construct<R: Rng>(&self, start: usize, rng: &mut R) -> Ant {
        let n = self.matrix.len();
        let mut ant = Ant::new(start, n);
        while !ant.is_complete() {
            let next = match self.rule {
                ConstructionRule::Greedy => self.pick_greedy(&ant),
                ConstructionRule::Proportional => self.pick_proportional(&ant, rng),
            };
            match next {
                Some(node) => ant.visit(node),
                None => panic!(
                    "ant invariant violated: no candidate from node {} with unvisited nodes left",
                    ant.current()
                ),
            }
        }
        ant
    }

    /// Highest score wins; `>=` lets a later candidate take over a tie.
    fn pick_greedy(&self, ant: &Ant) -> Option<usize> {
        let current = ant.current();
        let mut best: Option<(usize, f64)> = None;
        for candidate in (0..self.matrix.len()).filter(|&v| !ant.is_visited(v)) {
            let score = self.score(current, candidate);
            if best.is_none_or(|(_, s)| score >= s) {
                best = Some((candidate, score));
            }
        }
        best.map(|(node, _)| node)
    }

    fn pick_proportional<R: Rng>(&self, ant: &Ant, rng: &mut R) -> Option<usize> {
        let current = ant.current();
        let candidates: Vec<(usize, f64)> = (0..self.matrix.len())
            .filter(|&v| !ant.is_visited(v))
            .map(|v| (v, self.score(current, v)))
            .collect();
        let total: f64 = candidates.iter().map(|&(_, s)| s).sum();
        if !total.is_finite() || total <= 0.0 {
            return self.pick_greedy(ant);
        }

        let r = rng.random_range(0.0..total);
        let mut cumsum = 0.0;
        for &(node, score) in &candidates {
            cumsum += score;
            if r < cumsum {
                return Some(node);
            }
        }
        candidates.last().map(|&(node, _)| node)
    }

    /// Runs one generation and returns the cheapest tour it produced.
    pub fn run_generation<R: Rng>(&mut self, rng: &mut R) -> Solution {
        let n = self.matrix.len();
        let ants: Vec<Ant> = (0..n).map(|start| self.construct(start, rng)).collect();

        let mut generation_best: Option<Solution> = None;
        for ant in &ants {
            let tour = Tour::from_cycle(&ant.path);
            let cost = tour.cost(self.matrix);

            let amount = self.deposit / cost.max(MIN_COST);
            for (from, to) in ant.edges() {
                self.pheromone.deposit(from, to, amount);
            }

            if generation_best.as_ref().is_none_or(|b| cost < b.cost) {
                generation_best = Some(Solution::new(cost, tour));
            }
        }

        self.pheromone.evaporate(self.ro);

        let Some(generation_best) = generation_best else {
            unreachable!("a colony always has at least two ants")
        };
        if self.best.as_ref().is_none_or(|b| generation_best.cost < b.cost) {
            self.best = Some(generation_best.clone());
        }
        self.generation += 1;
        generation_best
    }
}

/// Executes the ant colony algorithm.
pub struct AcoRunner;

impl AcoRunner {
    /// Runs ACO with an RNG seeded from the configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::aco::{AcoConfig, AcoRunner};
    /// use u_tsp::CostMatrix;
    ///
    /// let m = CostMatrix::new(vec![vec![0.0, 5.0], vec![5.0, 0.0]]).unwrap();
    /// let result = AcoRunner::run(&m, &AcoConfig::default().with_generations(3)).unwrap();
    /// assert_eq!(result.best_cost, 10.0);
    /// assert_eq!(result.best.nodes(), &[0, 1, 0]);
    /// ```
    pub fn run(matrix: &CostMatrix, config: &AcoConfig) -> TspResult<AcoResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs ACO with an optional cancellation token, checked before each
    /// generation.
    pub fn run_with_cancel(
        matrix: &CostMatrix,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<AcoResult> {
        let mut rng = create_rng(resolve_seed(config.seed));
        Self::run_with_rng(matrix, config, &mut rng, cancel)
    }

    /// Runs ACO drawing every random decision from `rng`.
    pub fn run_with_rng<R: Rng>(
        matrix: &CostMatrix,
        config: &AcoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<AcoResult> {
        let mut colony = Colony::new(matrix, config)?;
        info!(
            "colony: solving {} nodes, {} generations, initial tau {}",
            matrix.len(),
            config.generations,
            colony.initial_tau()
        );

        let mut cost_history = Vec::with_capacity(config.generations);
        let mut cancelled = false;

        for _ in 0..config.generations {
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }
            let generation_best = colony.run_generation(rng);
            if let Some(best) = colony.best() {
                cost_history.push(best.cost);
                debug!(
                    "colony: generation {} best {}, best-ever {}",
                    colony.generation(),
                    generation_best.cost,
                    best.cost
                );
            }
        }

        let generations = colony.generation();
        let initial_tau = colony.initial_tau();
        let best = match colony.best {
            Some(best) => best,
            // Cancelled before the first generation: fall back to the
            // greedy baseline so the caller still gets a valid tour.
            None => {
                let tour = greedy_tour(matrix);
                Solution::new(tour.cost(matrix), tour)
            }
        };
        info!("colony: {generations} generations, best cost {}", best.cost);

        Ok(AcoResult {
            best: best.tour,
            best_cost: best.cost,
            generations,
            constructions: generations * matrix.len(),
            initial_tau,
            cancelled,
            cost_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::HeldKarpSolver;
    use crate::error::TspError;

    fn five_nodes() -> CostMatrix {
        CostMatrix::new(vec![
            vec![0.0, 3.0, 4.0, 2.0, 7.0],
            vec![3.0, 0.0, 4.0, 6.0, 3.0],
            vec![4.0, 4.0, 0.0, 5.0, 8.0],
            vec![2.0, 6.0, 5.0, 0.0, 6.0],
            vec![7.0, 3.0, 8.0, 6.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_initial_tau_from_greedy() {
        let m = five_nodes();
        let colony = Colony::new(&m, &AcoConfig::default()).unwrap();
        let greedy = greedy_tour(&m).cost(&m);
        assert!((colony.initial_tau() - 5.0 / greedy).abs() < 1e-12);
        assert_eq!(colony.pheromone().min_value(), colony.initial_tau());
    }

    #[test]
    fn test_explicit_initial_tau() {
        let m = five_nodes();
        let colony = Colony::new(&m, &AcoConfig::default().with_initial_tau(0.25)).unwrap();
        assert_eq!(colony.initial_tau(), 0.25);
    }

    #[test]
    fn test_pheromone_floor_after_every_generation() {
        let m = five_nodes();
        let config = AcoConfig::default().with_ro(0.1);
        let mut colony = Colony::new(&m, &config).unwrap();
        let mut rng = create_rng(0);
        for _ in 0..20 {
            colony.run_generation(&mut rng);
            assert!(colony.pheromone().min_value() >= colony.initial_tau());
        }
    }

    #[test]
    fn test_greedy_rule_tie_takes_last() {
        // Uniform costs and pheromone: every candidate scores the same.
        let m = CostMatrix::new(vec![vec![1.0; 4]; 4]).unwrap();
        let colony = Colony::new(&m, &AcoConfig::default()).unwrap();
        let ant = colony.construct(0, &mut create_rng(0));
        assert_eq!(ant.path, vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_greedy_rule_prefers_short_edges() {
        let m = five_nodes();
        let colony = Colony::new(&m, &AcoConfig::default()).unwrap();
        let ant = colony.construct(0, &mut create_rng(0));
        // Uniform pheromone: pure nearest neighbor from node 0.
        assert_eq!(ant.path[1], 3);
        assert!(ant.is_complete());
    }

    #[test]
    fn test_every_ant_builds_a_valid_tour() {
        let m = five_nodes();
        for rule in [ConstructionRule::Greedy, ConstructionRule::Proportional] {
            let colony = Colony::new(&m, &AcoConfig::default().with_rule(rule)).unwrap();
            let mut rng = create_rng(4);
            for start in 0..5 {
                let ant = colony.construct(start, &mut rng);
                assert_eq!(ant.start(), start);
                assert!(Tour::from_cycle(&ant.path).validate(5).is_ok());
            }
        }
    }

    #[test]
    fn test_result_consistent_with_evaluator() {
        let m = five_nodes();
        let result = AcoRunner::run(&m, &AcoConfig::default().with_generations(30)).unwrap();
        assert_eq!(result.best_cost, result.best.cost(&m));
        assert!(result.best.validate(5).is_ok());
        assert_eq!(result.generations, 30);
        assert_eq!(result.constructions, 150);
        assert_eq!(result.cost_history.len(), 30);
    }

    #[test]
    fn test_history_non_increasing() {
        let m = five_nodes();
        let config = AcoConfig::default()
            .with_rule(ConstructionRule::Proportional)
            .with_generations(40)
            .with_seed(8);
        let result = AcoRunner::run(&m, &config).unwrap();
        for window in result.cost_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }

    #[test]
    fn test_proportional_finds_optimum() {
        let m = five_nodes();
        let optimal = HeldKarpSolver::solve(&m).unwrap().cost;
        let config = AcoConfig::default()
            .with_rule(ConstructionRule::Proportional)
            .with_generations(200)
            .with_seed(21);
        let result = AcoRunner::run(&m, &config).unwrap();
        assert_eq!(result.best_cost, optimal);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let m = five_nodes();
        let config = AcoConfig::default()
            .with_rule(ConstructionRule::Proportional)
            .with_generations(15)
            .with_seed(5);
        let a = AcoRunner::run(&m, &config).unwrap();
        let b = AcoRunner::run(&m, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_zero_cost_edges() {
        let m = CostMatrix::new(vec![vec![0.0; 4]; 4]).unwrap();
        let result = AcoRunner::run(&m, &AcoConfig::default().with_generations(5)).unwrap();
        assert_eq!(result.best_cost, 0.0);
        assert_eq!(result.initial_tau, 4.0);
        assert!(result.best.validate(4).is_ok());
    }

    #[test]
    fn test_cancellation() {
        let m = five_nodes();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = AcoRunner::run_with_cancel(&m, &AcoConfig::default(), Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert!(result.cost_history.is_empty());
        assert_eq!(result.best, greedy_tour(&m));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let m = five_nodes();
        let config = AcoConfig::default().with_ro(1.5);
        assert!(matches!(
            AcoRunner::run(&m, &config),
            Err(TspError::InvalidConfig(_))
        ));

        let mut rng = create_rng(1);
        assert!(matches!(
            AcoRunner::run_with_rng(&m, &config, &mut rng, None),
            Err(TspError::InvalidConfig(_))
        ));
    }
}
