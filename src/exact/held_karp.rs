//! Held–Karp bitmask dynamic program.
//!
//! # Algorithm
//!
//! State `(S, k)`: `S` is the set of non-depot nodes visited so far (bit
//! `k - 1` stands for node `k`), `k ∈ S` is where the path currently ends.
//! `C(S, k)` is the cheapest path from the depot through exactly `S`
//! ending at `k`.
//!
//! 1. `C({k}, k) = cost[0][k]`
//! 2. For growing `|S|`: `C(S, k) = min_{m ∈ S \ {k}} C(S \ {k}, m) + cost[m][k]`
//! 3. Answer: `min_k C(Full, k) + cost[k][0]`
//! 4. Walk the stored parents back from `(Full, k*)` to rebuild the tour.
//!
//! Subsets are enumerated as combinations of the node set, layer by
//! layer, so every state of size `s - 1` exists before size `s` is read.

use itertools::Itertools;
use log::{debug, info};

use crate::error::{TspError, TspResult};
use crate::matrix::CostMatrix;
use crate::solver::Solution;
use crate::tour::{Tour, DEPOT};

/// Best known way to reach one `(mask, node)` state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpEntry {
    /// Cheapest cost of a depot-rooted path over `mask` ending at the node.
    pub cost: f64,
    /// Node visited just before; [`DEPOT`] for single-node states.
    pub parent: usize,
}

/// Flat arena of DP states indexed by `mask * (n - 1) + (node - 1)`.
///
/// Only reachable states (`node` contained in `mask`) are ever filled.
#[derive(Debug, Clone)]
pub struct DpTable {
    width: usize,
    entries: Vec<Option<DpEntry>>,
}

impl DpTable {
    /// Allocates the arena for `n` nodes.
    ///
    /// Only a size that overflows `usize` or `isize::MAX` bytes is
    /// rejected. Smaller tables that still exceed available memory abort
    /// in the allocator; bounding `n` is the caller's job.
    fn for_nodes(n: usize) -> TspResult<Self> {
        let width = n - 1;
        let too_large = || {
            TspError::InvalidInstance(format!("{n} nodes exceed the Held-Karp table size"))
        };
        let masks = u32::try_from(width)
            .ok()
            .and_then(|w| 1usize.checked_shl(w))
            .ok_or_else(too_large)?;
        let len = masks.checked_mul(width).ok_or_else(too_large)?;
        len.checked_mul(std::mem::size_of::<Option<DpEntry>>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(too_large)?;

        Ok(Self {
            width,
            entries: vec![None; len],
        })
    }

    #[inline]
    fn index(&self, mask: usize, node: usize) -> usize {
        mask * self.width + (node - 1)
    }

    /// Looks up a state; `None` when it was never filled.
    pub fn get(&self, mask: usize, node: usize) -> Option<&DpEntry> {
        if node == DEPOT || node > self.width {
            return None;
        }
        self.entries.get(self.index(mask, node))?.as_ref()
    }

    /// Number of filled states.
    pub fn filled(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Mask with every non-depot node set.
    pub fn full_mask(&self) -> usize {
        (1usize << self.width) - 1
    }

    fn set(&mut self, mask: usize, node: usize, entry: DpEntry) {
        let idx = self.index(mask, node);
        self.entries[idx] = Some(entry);
    }

    /// Lookup of a state the recurrence guarantees to exist.
    ///
    /// # Panics
    ///
    /// A missing state means the fill order is broken, and any tour built
    /// from the table would be wrong.
    fn require(&self, mask: usize, node: usize) -> &DpEntry {
        match self.get(mask, node) {
            Some(entry) => entry,
            None => panic!("Held-Karp invariant violated: state (mask {mask:#b}, node {node}) is missing"),
        }
    }
}

#[inline]
fn bit(node: usize) -> usize {
    1 << (node - 1)
}

/// Exact solver based on the Held–Karp recurrence.
///
/// Ties are broken by the first minimum in ascending node order, both
/// when choosing a parent and when choosing the last node before the
/// depot, so the result is deterministic.
///
/// # Examples
///
/// ```
/// use u_tsp::{CostMatrix, HeldKarpSolver};
///
/// let m = CostMatrix::new(vec![
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ]).unwrap();
/// let solution = HeldKarpSolver::solve(&m).unwrap();
/// assert_eq!(solution.cost, 80.0);
/// ```
pub struct HeldKarpSolver;

impl HeldKarpSolver {
    pub fn solve(matrix: &CostMatrix) -> TspResult<Solution> {
        let n = matrix.len();
        info!("held-karp: solving {n} nodes");

        let table = Self::build_table(matrix)?;
        let full = table.full_mask();

        let mut best: Option<(f64, usize)> = None;
        for k in 1..n {
            let cost = table.require(full, k).cost + matrix.cost(k, DEPOT);
            if best.is_none_or(|(c, _)| cost < c) {
                best = Some((cost, k));
            }
        }
        let Some((best_cost, last)) = best else {
            unreachable!("a valid matrix has at least one non-depot node")
        };

        let tour = reconstruct(&table, full, last);
        info!("held-karp: best cost {best_cost}");
        Ok(Solution::new(best_cost, tour))
    }

    /// Fills the DP table for `matrix`.
    ///
    /// # Errors
    ///
    /// [`TspError::InvalidInstance`] when the table would not fit in the
    /// address space.
    pub fn build_table(matrix: &CostMatrix) -> TspResult<DpTable> {
        let n = matrix.len();
        let mut table = DpTable::for_nodes(n)?;

        for k in 1..n {
            table.set(
                bit(k),
                k,
                DpEntry {
                    cost: matrix.cost(DEPOT, k),
                    parent: DEPOT,
                },
            );
        }

        for size in 2..n {
            let mut layer = 0usize;
            for subset in (1..n).combinations(size) {
                let mask = subset.iter().fold(0, |m, &v| m | bit(v));
                for &k in &subset {
                    let prev = mask & !bit(k);
                    let mut best: Option<DpEntry> = None;
                    for &m in subset.iter().filter(|&&m| m != k) {
                        let cost = table.require(prev, m).cost + matrix.cost(m, k);
                        if best.is_none_or(|b| cost < b.cost) {
                            best = Some(DpEntry { cost, parent: m });
                        }
                    }
                    if let Some(entry) = best {
                        table.set(mask, k, entry);
                        layer += 1;
                    }
                }
            }
            debug!("held-karp: filled {layer} states of size {size}");
        }

        Ok(table)
    }
}

/// Follows parent links from `(mask, last)` back to the depot.
fn reconstruct(table: &DpTable, mut mask: usize, last: usize) -> Tour {
    let mut order = Vec::with_capacity(table.width);
    let mut node = last;
    while node != DEPOT {
        order.push(node);
        let parent = table.require(mask, node).parent;
        mask &= !bit(node);
        node = parent;
    }
    assert_eq!(
        mask, 0,
        "Held-Karp invariant violated: backtracking reached the depot with mask {mask:#b} left"
    );
    order.reverse();
    Tour::from_order_unchecked(&order)
}
