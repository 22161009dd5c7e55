//! Simulated Annealing (SA) over tours.
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Neighbors are produced by swapping two interior
//! positions of the current tour; worsening swaps are accepted with a
//! probability that decreases as the temperature cools, allowing the
//! search to escape local optima.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;
mod types;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::{SaResult, SaRunner, StopReason};
pub use types::{swap_delta, AnnealingState, StepOutcome};
