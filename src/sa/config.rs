//! SA configuration and cooling schedules.

use crate::construct::InitialTour;
use crate::error::{TspError, TspResult};

/// Cooling schedule: maps the epoch counter to a temperature.
///
/// Temperatures are computed in closed form from `T0` and the epoch, so
/// no rounding error accumulates over long runs.
///
/// # References
///
/// - Geometric: Kirkpatrick et al. (1983)
/// - Logarithmic: Geman & Geman (1984), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// `T = alpha^epoch * T0`. Typical `alpha`: 0.95–0.99.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// `T = T0 / (1 + ln(1 + epoch))`.
    ///
    /// Cools so slowly that the floor is practically never reached;
    /// an iteration cap is required.
    Logarithmic,

    /// `T = T0 - epoch * (T0 - T_min) / steps`, reaching the floor after
    /// `steps` epochs.
    Linear {
        /// Number of epochs from `T0` down to the floor.
        steps: usize,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.99 }
    }
}

impl CoolingSchedule {
    /// Temperature after `epoch` completed eras.
    pub fn temperature_at(&self, t0: f64, t_min: f64, epoch: usize) -> f64 {
        match *self {
            CoolingSchedule::Geometric { alpha } => t0 * alpha.powf(epoch as f64),
            CoolingSchedule::Logarithmic => t0 / (1.0 + (1.0 + epoch as f64).ln()),
            CoolingSchedule::Linear { steps } => {
                let t = t0 - epoch as f64 * (t0 - t_min) / steps.max(1) as f64;
                t.max(t_min)
            }
        }
    }

    pub fn parse(s: &str, alpha: f64, steps: usize) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "geometric" | "geo" | "exp" => Some(Self::Geometric { alpha }),
            "logarithmic" | "log" => Some(Self::Logarithmic),
            "linear" | "lin" => Some(Self::Linear { steps }),
            _ => None,
        }
    }
}

/// Configuration for the annealing solver.
///
/// # Examples
///
/// ```
/// use u_tsp::sa::{CoolingSchedule, SaConfig};
/// use u_tsp::InitialTour;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(1000.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.99 })
///     .with_iterations_per_temperature(50)
///     .with_initial_tour(InitialTour::Greedy)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature `T0`. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Temperature floor. The run converges once `T <= min_temperature`.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Era length: neighbor evaluations per temperature level.
    pub iterations_per_temperature: usize,

    /// Maximum total iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// How the starting tour is built.
    pub initial: InitialTour,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            min_temperature: 1.0,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 50,
            max_iterations: 0,
            initial: InitialTour::default(),
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_initial_tour(mut self, initial: InitialTour) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TspResult<()> {
        let invalid = |msg: String| Err(TspError::InvalidConfig(msg));

        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return invalid(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            ));
        }
        if self.min_temperature <= 0.0 {
            return invalid("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return invalid("min_temperature must be less than initial_temperature".into());
        }
        if self.iterations_per_temperature == 0 {
            return invalid("iterations_per_temperature must be at least 1".into());
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return invalid(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
            CoolingSchedule::Logarithmic => {
                if self.max_iterations == 0 {
                    return invalid("logarithmic cooling requires max_iterations > 0".into());
                }
            }
            CoolingSchedule::Linear { steps } => {
                if steps == 0 {
                    return invalid("linear cooling requires steps > 0".into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SaConfig::default();
        assert!((config.initial_temperature - 1000.0).abs() < 1e-10);
        assert!((config.min_temperature - 1.0).abs() < 1e-10);
        assert_eq!(config.iterations_per_temperature, 50);
        assert_eq!(config.initial, InitialTour::Random);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = SaConfig::default().with_initial_temperature(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(20.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_alpha() {
        let config = SaConfig::default().with_cooling(CoolingSchedule::Geometric { alpha: 1.5 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_logarithmic_needs_cap() {
        let config = SaConfig::default().with_cooling(CoolingSchedule::Logarithmic);
        assert!(matches!(config.validate(), Err(TspError::InvalidConfig(_))));
        assert!(config.with_max_iterations(10_000).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_era() {
        let config = SaConfig::default().with_iterations_per_temperature(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_geometric_schedule() {
        let s = CoolingSchedule::Geometric { alpha: 0.5 };
        assert_eq!(s.temperature_at(100.0, 1.0, 0), 100.0);
        assert_eq!(s.temperature_at(100.0, 1.0, 1), 50.0);
        assert_eq!(s.temperature_at(100.0, 1.0, 3), 12.5);
    }

    #[test]
    fn test_logarithmic_schedule() {
        let s = CoolingSchedule::Logarithmic;
        assert_eq!(s.temperature_at(100.0, 1.0, 0), 100.0);
        let t = s.temperature_at(100.0, 1.0, 1);
        assert!((t - 100.0 / (1.0 + 2f64.ln())).abs() < 1e-12);
        assert!(s.temperature_at(100.0, 1.0, 10) < t);
    }

    #[test]
    fn test_linear_schedule_hits_floor() {
        let s = CoolingSchedule::Linear { steps: 4 };
        assert_eq!(s.temperature_at(9.0, 1.0, 2), 5.0);
        assert_eq!(s.temperature_at(9.0, 1.0, 4), 1.0);
        assert_eq!(s.temperature_at(9.0, 1.0, 10), 1.0);
    }

    #[test]
    fn test_parse_schedule() {
        assert_eq!(
            CoolingSchedule::parse("geometric", 0.9, 0),
            Some(CoolingSchedule::Geometric { alpha: 0.9 })
        );
        assert_eq!(
            CoolingSchedule::parse("log", 0.9, 0),
            Some(CoolingSchedule::Logarithmic)
        );
        assert_eq!(
            CoolingSchedule::parse("linear", 0.9, 30),
            Some(CoolingSchedule::Linear { steps: 30 })
        );
        assert_eq!(CoolingSchedule::parse("cubic", 0.9, 0), None);
    }
}
