//! Property tests across every solver.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use proptest::prelude::*;
use u_tsp::aco::{AcoConfig, AcoRunner, Colony, ConstructionRule};
use u_tsp::random::create_rng;
use u_tsp::sa::{swap_delta, CoolingSchedule, SaConfig, SaRunner, StopReason};
use u_tsp::{
    tour_cost, Algorithm, BruteForceSolver, CostMatrix, HeldKarpSolver, InitialTour, Tour,
    TspSolver,
};

/// Random integer-cost matrix, possibly asymmetric, with `n` in `lo..=hi`.
fn matrix_strategy(lo: usize, hi: usize) -> impl Strategy<Value = CostMatrix> {
    (lo..=hi).prop_flat_map(|n| {
        prop::collection::vec(0u32..60, n * n).prop_map(move |raw| {
            let data = raw
                .iter()
                .enumerate()
                .map(|(k, &c)| if k / n == k % n { 0.0 } else { c as f64 })
                .collect();
            CostMatrix::from_flat(n, data).unwrap()
        })
    })
}

fn sa_config(seed: u64) -> SaConfig {
    SaConfig::default()
        .with_initial_temperature(50.0)
        .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
        .with_iterations_per_temperature(20)
        .with_seed(seed)
}

fn aco_config(seed: u64) -> AcoConfig {
    AcoConfig::default().with_generations(10).with_seed(seed)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Both exact solvers find the same optimum.
    #[test]
    fn prop_exact_solvers_agree(m in matrix_strategy(2, 8)) {
        let bf = BruteForceSolver::solve(&m).unwrap();
        let dp = HeldKarpSolver::solve(&m).unwrap();
        prop_assert_eq!(bf.cost, dp.cost);
        prop_assert_eq!(bf.tour.cost(&m), bf.cost);
        prop_assert_eq!(dp.tour.cost(&m), dp.cost);
    }

    /// Every solver returns a valid closed tour whose reported cost
    /// matches the evaluator, and no heuristic beats the exact optimum.
    #[test]
    fn prop_solutions_are_valid(m in matrix_strategy(2, 7), seed in any::<u64>()) {
        let n = m.len();
        let optimum = HeldKarpSolver::solve(&m).unwrap().cost;
        let algorithms = [
            Algorithm::BruteForce,
            Algorithm::HeldKarp,
            Algorithm::Annealing(sa_config(seed)),
            Algorithm::Colony(aco_config(seed)),
            Algorithm::Colony(aco_config(seed).with_rule(ConstructionRule::Proportional)),
        ];
        for algorithm in &algorithms {
            let solution = algorithm.solve(&m).unwrap();
            prop_assert!(solution.tour.validate(n).is_ok(), "{}", algorithm.name());
            prop_assert_eq!(solution.tour.len(), n + 1);
            prop_assert_eq!(solution.tour.nodes()[0], 0);
            prop_assert_eq!(solution.tour.nodes()[n], 0);
            let evaluated = tour_cost(&m, solution.tour.nodes());
            prop_assert!((evaluated - solution.cost).abs() < 1e-9, "{}", algorithm.name());
            prop_assert!(solution.cost >= optimum, "{}", algorithm.name());
        }
    }

    /// Reversing a tour costs the same on a symmetric matrix.
    #[test]
    fn prop_reversal_symmetric(m in matrix_strategy(3, 8), seed in any::<u64>()) {
        let n = m.len();
        let mut sym = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                sym[i][j] = m.cost(i.min(j), i.max(j));
            }
        }
        let sym = CostMatrix::new(sym).unwrap();
        let tour = InitialTour::Random.build(&sym, &mut create_rng(seed));
        prop_assert_eq!(tour.cost(&sym), tour.reversed().cost(&sym));
    }

    /// The incremental swap delta matches a full re-evaluation.
    #[test]
    fn prop_swap_delta_matches_full_cost(
        m in matrix_strategy(4, 9),
        seed in any::<u64>(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let tour = InitialTour::Random.build(&m, &mut create_rng(seed));
        let interior = m.len() - 1;
        let (i, j) = (a.index(interior) + 1, b.index(interior) + 1);
        prop_assume!(i != j);
        let (i, j) = (i.min(j), i.max(j));

        let mut swapped = tour.nodes().to_vec();
        swapped.swap(i, j);
        let expected = tour_cost(&m, &swapped) - tour.cost(&m);
        prop_assert!((swap_delta(&m, tour.nodes(), i, j) - expected).abs() < 1e-9);
    }

    /// Pheromone never drops below its seed value.
    #[test]
    fn prop_pheromone_floor(m in matrix_strategy(2, 8), seed in any::<u64>(), ro in 0.01f64..0.99) {
        let config = AcoConfig::default().with_ro(ro);
        let mut colony = Colony::new(&m, &config).unwrap();
        let floor = colony.initial_tau();
        let mut rng = create_rng(seed);
        for _ in 0..5 {
            colony.run_generation(&mut rng);
            prop_assert!(colony.pheromone().min_value() >= floor);
        }
    }

    /// Best-so-far histories never increase.
    #[test]
    fn prop_histories_non_increasing(m in matrix_strategy(3, 9), seed in any::<u64>()) {
        let sa = SaRunner::run(&m, &sa_config(seed)).unwrap();
        prop_assert!(sa.cost_history.windows(2).all(|w| w[1] <= w[0]));
        prop_assert_eq!(sa.cost_history.last().copied(), Some(sa.best_cost));

        let aco = AcoRunner::run(&m, &aco_config(seed)).unwrap();
        prop_assert!(aco.cost_history.windows(2).all(|w| w[1] <= w[0]));
        prop_assert_eq!(aco.cost_history.len(), aco.generations);
        prop_assert_eq!(aco.constructions, aco.generations * m.len());
    }

    /// The same seed reproduces the same tour.
    #[test]
    fn prop_seeded_determinism(m in matrix_strategy(3, 9), seed in any::<u64>()) {
        let a = SaRunner::run(&m, &sa_config(seed)).unwrap();
        let b = SaRunner::run(&m, &sa_config(seed)).unwrap();
        prop_assert_eq!(a.best, b.best);
        prop_assert_eq!(a.iterations, b.iterations);

        let proportional = aco_config(seed).with_rule(ConstructionRule::Proportional);
        let a = AcoRunner::run(&m, &proportional).unwrap();
        let b = AcoRunner::run(&m, &proportional).unwrap();
        prop_assert_eq!(a.best, b.best);
    }
}

#[test]
fn greedy_rule_ignores_seed() {
    let m = CostMatrix::new(vec![
        vec![0.0, 3.0, 4.0, 2.0, 7.0],
        vec![3.0, 0.0, 4.0, 6.0, 3.0],
        vec![4.0, 4.0, 0.0, 5.0, 8.0],
        vec![2.0, 6.0, 5.0, 0.0, 6.0],
        vec![7.0, 3.0, 8.0, 6.0, 0.0],
    ])
    .unwrap();
    let a = AcoRunner::run(&m, &aco_config(1)).unwrap();
    let b = AcoRunner::run(&m, &aco_config(2)).unwrap();
    assert_eq!(a.best, b.best);
    assert_eq!(a.cost_history, b.cost_history);
}

#[test]
fn four_node_reference_instance() {
    let m = CostMatrix::new(vec![
        vec![-1.0, 10.0, 15.0, 20.0],
        vec![10.0, -1.0, 35.0, 25.0],
        vec![15.0, 35.0, -1.0, 30.0],
        vec![20.0, 25.0, 30.0, -1.0],
    ])
    .unwrap();
    let bf = BruteForceSolver::solve(&m).unwrap();
    let dp = HeldKarpSolver::solve(&m).unwrap();
    assert_eq!(bf.cost, 80.0);
    assert_eq!(dp.cost, 80.0);
    assert_eq!(bf.tour, Tour::new(vec![0, 1, 3, 2, 0], 4).unwrap());
    assert_eq!(dp.tour, Tour::new(vec![0, 2, 3, 1, 0], 4).unwrap());
}

#[test]
fn cancelled_annealing_keeps_initial_tour() {
    let m = CostMatrix::new(vec![
        vec![0.0, 1.0, 4.0, 9.0],
        vec![1.0, 0.0, 2.0, 6.0],
        vec![4.0, 2.0, 0.0, 3.0],
        vec![9.0, 6.0, 3.0, 0.0],
    ])
    .unwrap();
    let config = sa_config(3).with_initial_tour(InitialTour::Greedy);
    let cancel = Arc::new(AtomicBool::new(true));
    let result = SaRunner::run_with_cancel(&m, &config, Some(cancel)).unwrap();
    assert_eq!(result.stop, StopReason::Cancelled);
    assert_eq!(result.best, u_tsp::greedy_tour(&m));
}
