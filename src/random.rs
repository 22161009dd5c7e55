//! Seedable random source shared by the randomized solvers.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from a seed.
///
/// Runners accept `Option<u64>` seeds; `None` is resolved with
/// [`resolve_seed`] before calling this.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Returns the configured seed, or a fresh random one.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}
