//! ACO configuration.

use crate::error::{TspError, TspResult};

/// How an ant picks its next node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructionRule {
    /// Take the unvisited node with the highest attractiveness
    /// `tau^alpha * eta^beta`. On ties the later node wins.
    #[default]
    Greedy,
    /// Ant System roulette wheel: pick proportionally to attractiveness.
    Proportional,
}

impl ConstructionRule {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "greedy" | "max" => Some(Self::Greedy),
            "proportional" | "roulette" => Some(Self::Proportional),
            _ => None,
        }
    }
}

/// Configuration for the ant colony solver.
///
/// # Examples
///
/// ```
/// use u_tsp::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_alpha(1.0)
///     .with_beta(3.0)
///     .with_ro(0.6)
///     .with_generations(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Pheromone influence exponent.
    pub alpha: f64,
    /// Inverse-distance influence exponent.
    pub beta: f64,
    /// Evaporation retention factor in (0, 1): each generation keeps
    /// `ro` of the pheromone.
    pub ro: f64,
    /// Number of generations. The only stopping criterion.
    pub generations: usize,
    /// Deposit constant `K`: an ant lays `K / tour_cost` on each edge it
    /// traversed.
    pub deposit: f64,
    /// Pheromone seed and floor. `None` derives `n / greedy_tour_cost`.
    pub initial_tau: Option<f64>,
    pub rule: ConstructionRule,
    /// Random seed; only [`ConstructionRule::Proportional`] draws from it.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 2.0,
            ro: 0.5,
            generations: 100,
            deposit: 1.0,
            initial_tau: None,
            rule: ConstructionRule::default(),
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_ro(mut self, ro: f64) -> Self {
        self.ro = ro;
        self
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    pub fn with_deposit(mut self, k: f64) -> Self {
        self.deposit = k;
        self
    }

    pub fn with_initial_tau(mut self, tau: f64) -> Self {
        self.initial_tau = Some(tau);
        self
    }

    pub fn with_rule(mut self, rule: ConstructionRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TspResult<()> {
        let invalid = |msg: String| Err(TspError::InvalidConfig(msg));

        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return invalid(format!("alpha must be non-negative, got {}", self.alpha));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return invalid(format!("beta must be non-negative, got {}", self.beta));
        }
        if self.ro <= 0.0 || self.ro >= 1.0 {
            return invalid(format!("ro must be in (0, 1), got {}", self.ro));
        }
        if self.generations == 0 {
            return invalid("generations must be at least 1".into());
        }
        if !self.deposit.is_finite() || self.deposit <= 0.0 {
            return invalid(format!("deposit must be positive, got {}", self.deposit));
        }
        if let Some(tau) = self.initial_tau {
            if !tau.is_finite() || tau <= 0.0 {
                return invalid(format!("initial_tau must be positive, got {tau}"));
            }
        }
        Ok(())
    }
}
