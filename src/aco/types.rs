//! Pheromone matrix and ant records.

/// Per-edge pheromone levels with a hard floor.
///
/// The floor is the initial seed value: evaporation never takes an
/// entry below it.
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    n: usize,
    floor: f64,
    data: Vec<f64>,
}

impl PheromoneMatrix {
    /// Uniform matrix at `tau`, which also becomes the floor.
    pub fn new(n: usize, tau: f64) -> Self {
        Self {
            n,
            floor: tau,
            data: vec![tau; n * n],
        }
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }

    pub fn deposit(&mut self, from: usize, to: usize, amount: f64) {
        self.data[from * self.n + to] += amount;
    }

    /// `tau = max(ro * tau, floor)` for every entry.
    pub fn evaporate(&mut self, ro: f64) {
        let floor = self.floor;
        for tau in &mut self.data {
            *tau = (*tau * ro).max(floor);
        }
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Smallest entry of the matrix.
    pub fn min_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// One agent of a generation: where it started, where it has been.
#[derive(Debug, Clone)]
pub struct Ant {
    /// Visiting order, starting with the ant's own start node. The
    /// closing edge back to the start is implied.
    pub path: Vec<usize>,
    tabu: Vec<bool>,
}

impl Ant {
    pub fn new(start: usize, n: usize) -> Self {
        let mut tabu = vec![false; n];
        tabu[start] = true;
        let mut path = Vec::with_capacity(n);
        path.push(start);
        Self { path, tabu }
    }

    pub fn start(&self) -> usize {
        self.path[0]
    }

    pub fn current(&self) -> usize {
        self.path[self.path.len() - 1]
    }

    #[inline]
    pub fn is_visited(&self, node: usize) -> bool {
        self.tabu[node]
    }

    /// Moves to `node`.
    ///
    /// # Panics
    ///
    /// Revisiting a node means the tabu bookkeeping is broken.
    pub fn visit(&mut self, node: usize) {
        assert!(
            !self.tabu[node],
            "ant invariant violated: node {node} visited twice"
        );
        self.tabu[node] = true;
        self.path.push(node);
    }

    pub fn is_complete(&self) -> bool {
        self.path.len() == self.tabu.len()
    }

    /// Directed edges of the closed cycle, the return to start included.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.path.len();
        (0..n).map(move |i| (self.path[i], self.path[(i + 1) % n]))
    }
}
