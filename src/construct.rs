//! Initial-tour constructors shared by the metaheuristics.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::matrix::CostMatrix;
use crate::tour::{Tour, DEPOT};

/// How a metaheuristic builds the tour it starts searching from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialTour {
    /// Uniformly random permutation of the non-depot nodes.
    #[default]
    Random,
    /// Nearest-neighbor walk from the depot.
    Greedy,
}

impl InitialTour {
    pub fn build<R: Rng>(self, matrix: &CostMatrix, rng: &mut R) -> Tour {
        match self {
            InitialTour::Random => random_tour(matrix, rng),
            InitialTour::Greedy => greedy_tour(matrix),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "random" | "rand" => Some(Self::Random),
            "greedy" | "nn" | "nearest" => Some(Self::Greedy),
            _ => None,
        }
    }
}

/// Nearest-neighbor tour from the depot.
///
/// At each step the cheapest outgoing edge to an unvisited node is taken;
/// among equally cheap candidates the lowest node index wins.
pub fn greedy_tour(matrix: &CostMatrix) -> Tour {
    let n = matrix.len();
    let mut visited = vec![false; n];
    visited[DEPOT] = true;
    let mut order = Vec::with_capacity(n - 1);
    let mut current = DEPOT;

    for _ in 1..n {
        let mut next = None;
        for candidate in (1..n).filter(|&v| !visited[v]) {
            match next {
                Some(best) if matrix.cost(current, best) <= matrix.cost(current, candidate) => {}
                _ => next = Some(candidate),
            }
        }
        // n - 1 iterations over n - 1 non-depot nodes: one is always left.
        let Some(next) = next else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    Tour::from_order_unchecked(&order)
}

/// Uniformly random tour.
pub fn random_tour<R: Rng>(matrix: &CostMatrix, rng: &mut R) -> Tour {
    let mut order: Vec<usize> = (1..matrix.len()).collect();
    order.shuffle(rng);
    Tour::from_order_unchecked(&order)
}
