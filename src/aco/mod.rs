//! Ant Colony Optimization (ACO).
//!
//! A population-based metaheuristic: every generation one ant starts at
//! each node and builds a tour guided by a shared pheromone matrix and
//! an inverse-distance heuristic. Good tours reinforce the edges they
//! use; evaporation slowly forgets, down to a fixed floor.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod runner;
mod types;

pub use config::{AcoConfig, ConstructionRule};
pub use runner::{AcoResult, AcoRunner, Colony};
pub use types::{Ant, PheromoneMatrix};
