//! Immutable travel-cost matrix.

use crate::error::{TspError, TspResult};

/// Square matrix of travel costs, `cost(i, j)` being the cost of going
/// directly from node `i` to node `j`.
///
/// Storage is flat and row-major. The matrix need not be symmetric.
/// Diagonal entries are never read by any solver and are not validated,
/// so instance files that mark them with a sentinel (often `-1`) load fine.
///
/// # Examples
///
/// ```
/// use u_tsp::CostMatrix;
///
/// let m = CostMatrix::new(vec![
///     vec![0.0, 5.0],
///     vec![7.0, 0.0],
/// ]).unwrap();
/// assert_eq!(m.len(), 2);
/// assert_eq!(m.cost(1, 0), 7.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostMatrix {
    n: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Builds a matrix from rows, validating shape and off-diagonal costs.
    ///
    /// # Errors
    ///
    /// [`TspError::InvalidInstance`] if there are fewer than 2 nodes, a row
    /// has the wrong length, or an off-diagonal entry is negative or not
    /// finite.
    pub fn new(rows: Vec<Vec<f64>>) -> TspResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(TspError::InvalidInstance(format!(
                    "matrix is not square: row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Self::from_flat(n, data)
    }

    /// Builds a matrix from `n * n` row-major values.
    pub fn from_flat(n: usize, data: Vec<f64>) -> TspResult<Self> {
        if n < 2 {
            return Err(TspError::InvalidInstance(format!(
                "need at least 2 nodes, got {n}"
            )));
        }
        if data.len() != n * n {
            return Err(TspError::InvalidInstance(format!(
                "expected {} values for {n} nodes, got {}",
                n * n,
                data.len()
            )));
        }
        for i in 0..n {
            for j in (0..n).filter(|&j| j != i) {
                let c = data[i * n + j];
                if !c.is_finite() || c < 0.0 {
                    return Err(TspError::InvalidInstance(format!(
                        "cost[{i}][{j}] = {c} must be finite and non-negative"
                    )));
                }
            }
        }
        Ok(Self { n, data })
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false`: a valid matrix has at least two nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cost of traveling directly from `from` to `to`.
    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }

    /// Row of costs leaving `from`.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.n..(from + 1) * self.n]
    }

    /// Whether `cost(i, j) == cost(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.cost(i, j) == self.cost(j, i)))
    }
}
