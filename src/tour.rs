//! Closed tours and their evaluation.
//!
//! A [`Tour`] always starts and ends at the depot (node 0):
//! `len == n + 1`, `nodes[0] == nodes[n] == 0`, and every other node
//! appears exactly once in between.
//!
//! [`tour_cost`] and [`order_cost`] are the ground truth against which
//! every solver's incremental bookkeeping is checked.

use std::fmt;

use crate::error::{TspError, TspResult};
use crate::matrix::CostMatrix;

/// The depot node every tour starts and ends at.
pub const DEPOT: usize = 0;

/// A closed tour through every node of an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour(Vec<usize>);

impl Tour {
    /// Wraps a closed node sequence after checking it against `n` nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::Tour;
    ///
    /// let tour = Tour::new(vec![0, 2, 1, 0], 3).unwrap();
    /// assert_eq!(tour.to_string(), "[0 2 1 0]");
    /// assert!(Tour::new(vec![0, 1, 1, 0], 3).is_err());
    /// ```
    pub fn new(nodes: Vec<usize>, n: usize) -> TspResult<Self> {
        let tour = Tour(nodes);
        tour.validate(n)?;
        Ok(tour)
    }

    /// Closes an ordering of the non-depot nodes through the depot.
    pub fn from_order(order: &[usize], n: usize) -> TspResult<Self> {
        Self::new(close(order), n)
    }

    /// Closes an ordering that is known to be a permutation of `1..n`.
    pub(crate) fn from_order_unchecked(order: &[usize]) -> Self {
        Tour(close(order))
    }

    /// Rotates a cycle given from an arbitrary start node so that it
    /// begins and ends at the depot. The cycle must not repeat its start.
    pub(crate) fn from_cycle(cycle: &[usize]) -> Self {
        let pivot = cycle.iter().position(|&v| v == DEPOT).unwrap_or(0);
        let mut nodes = Vec::with_capacity(cycle.len() + 1);
        nodes.extend_from_slice(&cycle[pivot..]);
        nodes.extend_from_slice(&cycle[..pivot]);
        nodes.push(DEPOT);
        Tour(nodes)
    }

    /// Checks the closed-tour invariants for an instance of `n` nodes.
    pub fn validate(&self, n: usize) -> TspResult<()> {
        let nodes = &self.0;
        if nodes.len() != n + 1 {
            return Err(TspError::InvalidTour(format!(
                "expected {} entries for {n} nodes, got {}",
                n + 1,
                nodes.len()
            )));
        }
        if nodes[0] != DEPOT || nodes[n] != DEPOT {
            return Err(TspError::InvalidTour(
                "tour must start and end at node 0".into(),
            ));
        }
        let mut seen = vec![false; n];
        for &v in &nodes[1..n] {
            if v == DEPOT || v >= n {
                return Err(TspError::InvalidTour(format!(
                    "node {v} is not a non-depot node of a {n}-node instance"
                )));
            }
            if seen[v] {
                return Err(TspError::InvalidTour(format!("node {v} visited twice")));
            }
            seen[v] = true;
        }
        Ok(())
    }

    /// The closed node sequence, depot at both ends.
    pub fn nodes(&self) -> &[usize] {
        &self.0
    }

    /// The non-depot nodes in visiting order.
    pub fn interior(&self) -> &[usize] {
        &self.0[1..self.0.len() - 1]
    }

    /// Number of entries, i.e. `n + 1`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Directed edges traversed by the tour, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// The same cycle traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut nodes = self.0.clone();
        nodes.reverse();
        Tour(nodes)
    }

    /// Total cost of this tour over `matrix`.
    pub fn cost(&self, matrix: &CostMatrix) -> f64 {
        tour_cost(matrix, &self.0)
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.0
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

fn close(order: &[usize]) -> Vec<usize> {
    let mut nodes = Vec::with_capacity(order.len() + 2);
    nodes.push(DEPOT);
    nodes.extend_from_slice(order);
    nodes.push(DEPOT);
    nodes
}

/// Sums `cost[nodes[i]][nodes[i + 1]]` over consecutive pairs of an
/// already-closed node sequence.
///
/// # Examples
///
/// ```
/// use u_tsp::{tour_cost, CostMatrix};
///
/// let m = CostMatrix::new(vec![vec![0.0, 5.0], vec![5.0, 0.0]]).unwrap();
/// assert_eq!(tour_cost(&m, &[0, 1, 0]), 10.0);
/// ```
pub fn tour_cost(matrix: &CostMatrix, nodes: &[usize]) -> f64 {
    nodes.windows(2).map(|w| matrix.cost(w[0], w[1])).sum()
}

/// Cost of visiting the non-depot nodes in `order`, implicitly starting
/// from and returning to the depot.
pub fn order_cost(matrix: &CostMatrix, order: &[usize]) -> f64 {
    let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
        return 0.0;
    };
    let inner: f64 = order.windows(2).map(|w| matrix.cost(w[0], w[1])).sum();
    matrix.cost(DEPOT, first) + inner + matrix.cost(last, DEPOT)
}
