//! Uniform solver interface.
//!
//! Every algorithm takes a [`CostMatrix`] plus its own parameter record
//! and returns a [`Solution`]. [`Algorithm`] bundles the choice of
//! algorithm with its parameters so callers (the batch runner, the CLI)
//! can dispatch without knowing which one they hold.

use crate::aco::{AcoConfig, AcoRunner};
use crate::error::TspResult;
use crate::exact::{BruteForceSolver, HeldKarpSolver};
use crate::matrix::CostMatrix;
use crate::sa::{SaConfig, SaRunner};
use crate::tour::Tour;

/// A tour and its total cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Total cost of [`tour`](Self::tour), closing edge included.
    pub cost: f64,
    pub tour: Tour,
}

impl Solution {
    pub fn new(cost: f64, tour: Tour) -> Self {
        Self { cost, tour }
    }

    /// Cost as a percentage of a known optimum, rounded to two decimals.
    ///
    /// ```
    /// use u_tsp::{Solution, Tour};
    ///
    /// let s = Solution::new(105.0, Tour::new(vec![0, 1, 0], 2).unwrap());
    /// assert_eq!(s.ratio_to(100.0), 105.0);
    /// ```
    pub fn ratio_to(&self, optimal: f64) -> f64 {
        (self.cost / optimal * 10_000.0).round() / 100.0
    }

    /// Whether the cost is strictly below a reference optimum.
    ///
    /// For an exact solver this signals a bug; for a heuristic it means
    /// the reference itself is wrong. Either way it is a warning, not an
    /// error.
    pub fn beats(&self, optimal: f64) -> bool {
        self.cost < optimal
    }
}

/// A TSP solving strategy.
pub trait TspSolver {
    /// Short algorithm name for logs and reports.
    fn name(&self) -> &'static str;

    /// Solves the instance described by `matrix`.
    fn solve(&self, matrix: &CostMatrix) -> TspResult<Solution>;
}

/// An algorithm together with its parameters.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    BruteForce,
    HeldKarp,
    Annealing(SaConfig),
    Colony(AcoConfig),
}

impl Algorithm {
    /// Parses a short algorithm name into an algorithm with default
    /// parameters.
    ///
    /// ```
    /// use u_tsp::Algorithm;
    ///
    /// assert!(matches!(Algorithm::parse("dp"), Some(Algorithm::HeldKarp)));
    /// assert!(matches!(Algorithm::parse("ACO"), Some(Algorithm::Colony(_))));
    /// assert!(Algorithm::parse("genetic").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bf" | "brute" | "bruteforce" | "brute-force" => Some(Self::BruteForce),
            "dp" | "hk" | "heldkarp" | "held-karp" => Some(Self::HeldKarp),
            "sa" | "annealing" => Some(Self::Annealing(SaConfig::default())),
            "aco" | "ant" | "colony" => Some(Self::Colony(AcoConfig::default())),
            _ => None,
        }
    }

    /// Returns a copy whose randomized solver uses `seed`.
    ///
    /// Exact algorithms are returned unchanged.
    pub fn with_seed(&self, seed: u64) -> Self {
        match self {
            Self::Annealing(config) => Self::Annealing(config.clone().with_seed(seed)),
            Self::Colony(config) => Self::Colony(config.clone().with_seed(seed)),
            other => other.clone(),
        }
    }

    /// Seed configured on a randomized solver, if any.
    pub fn seed(&self) -> Option<u64> {
        match self {
            Self::Annealing(config) => config.seed,
            Self::Colony(config) => config.seed,
            _ => None,
        }
    }

    /// Checks the parameter record without solving anything.
    pub fn validate(&self) -> TspResult<()> {
        match self {
            Self::Annealing(config) => config.validate(),
            Self::Colony(config) => config.validate(),
            _ => Ok(()),
        }
    }
}

impl TspSolver for Algorithm {
    fn name(&self) -> &'static str {
        match self {
            Self::BruteForce => "brute-force",
            Self::HeldKarp => "held-karp",
            Self::Annealing(_) => "annealing",
            Self::Colony(_) => "colony",
        }
    }

    fn solve(&self, matrix: &CostMatrix) -> TspResult<Solution> {
        match self {
            Self::BruteForce => BruteForceSolver::solve(matrix),
            Self::HeldKarp => HeldKarpSolver::solve(matrix),
            Self::Annealing(config) => {
                SaRunner::run(matrix, config).map(|r| Solution::new(r.best_cost, r.best))
            }
            Self::Colony(config) => {
                AcoRunner::run(matrix, config).map(|r| Solution::new(r.best_cost, r.best))
            }
        }
    }
}
