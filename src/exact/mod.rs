//! Exact solvers.
//!
//! Both solvers are deterministic oracles with no runtime cap; keeping
//! the instance small enough is the caller's job.
//!
//! - [`BruteForceSolver`]: enumerates all `(n-1)!` orderings. Practical
//!   up to about 10 nodes.
//! - [`HeldKarpSolver`]: bitmask dynamic program over visited subsets,
//!   `O(n² · 2ⁿ)` time and `O(n · 2ⁿ)` memory. Practical up to about
//!   20 nodes.
//!
//! # References
//!
//! - Held & Karp (1962), "A Dynamic Programming Approach to Sequencing Problems"
//! - Bellman (1962), "Dynamic Programming Treatment of the Travelling Salesman Problem"

mod brute_force;
mod held_karp;

pub use brute_force::BruteForceSolver;
pub use held_karp::{DpEntry, DpTable, HeldKarpSolver};
