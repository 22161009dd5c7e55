//! Traveling Salesman solvers over dense cost matrices.
//!
//! Given an `n x n` [`CostMatrix`], every solver returns a closed
//! [`Tour`] that starts and ends at node 0 together with its total cost:
//!
//! - **Brute force**: enumerates every ordering of the non-depot nodes.
//!   Exact, factorial time.
//! - **Held–Karp**: bitmask dynamic programming over subsets. Exact,
//!   `O(2^n * n^2)` time and `O(2^n * n)` memory.
//! - **Simulated Annealing (SA)**: swap-neighborhood local search with a
//!   Metropolis acceptance rule and pluggable cooling schedules.
//! - **Ant Colony Optimization (ACO)**: one ant per start node per
//!   generation, pheromone deposit proportional to inverse tour cost,
//!   evaporation with a floor.
//!
//! [`Algorithm`] wraps the choice of solver and its parameters behind the
//! [`TspSolver`] trait. The [`io`] and [`batch`] modules read matrix files
//! and run configurations and write timed result blocks.
//!
//! # Example
//!
//! ```
//! use u_tsp::{Algorithm, CostMatrix, TspSolver};
//!
//! let matrix = CostMatrix::new(vec![
//!     vec![-1.0, 10.0, 15.0, 20.0],
//!     vec![10.0, -1.0, 35.0, 25.0],
//!     vec![15.0, 35.0, -1.0, 30.0],
//!     vec![20.0, 25.0, 30.0, -1.0],
//! ])
//! .unwrap();
//!
//! let solution = Algorithm::HeldKarp.solve(&matrix).unwrap();
//! assert_eq!(solution.cost, 80.0);
//! assert_eq!(solution.tour.nodes().first(), Some(&0));
//! ```

pub mod aco;
pub mod batch;
pub mod construct;
pub mod error;
pub mod exact;
pub mod io;
pub mod matrix;
pub mod random;
pub mod sa;
pub mod solver;
pub mod tour;

pub use construct::{greedy_tour, InitialTour};
pub use error::{TspError, TspResult};
pub use exact::{BruteForceSolver, HeldKarpSolver};
pub use matrix::CostMatrix;
pub use solver::{Algorithm, Solution, TspSolver};
pub use tour::{order_cost, tour_cost, Tour, DEPOT};
