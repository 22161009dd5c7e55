//! End-to-end runs over files on disk.

use std::fs;

use u_tsp::batch::BatchRunner;
use u_tsp::io::{MatrixReader, RunConfig};
use u_tsp::{CostMatrix, HeldKarpSolver};

const FOUR: &str = "4\n-1 10 15 20\n10 -1 35 25\n15 35 -1 30\n20 25 30 -1\n";
const FIVE: &str = "\
5
0 3 4 2 7
3 0 4 6 3
4 4 0 5 8
2 6 5 0 6
7 3 8 6 0
";

#[test]
fn run_config_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("four.txt"), FOUR).unwrap();
    fs::write(data.join("five.txt"), FIVE).unwrap();

    let output = dir.path().join("results/out.txt");
    let config_text = format!(
        "instance reps optimum algorithm\n\
         four.txt 2 80 dp\n\
         # brute force on the same instance\n\
         four.txt 1 80 bf\n\
         five.txt 3 19 sa t0=100 alpha=0.9 era=30 seed=5\n\
         five.txt 2 19 aco generations=10\n\
         {}\n",
        output.display()
    );
    let config_path = dir.path().join("run.cfg");
    fs::write(&config_path, config_text).unwrap();

    // A stale output file is replaced, not appended to.
    fs::create_dir_all(output.parent().unwrap()).unwrap();
    fs::write(&output, "stale\n").unwrap();

    let config = RunConfig::try_read_file(&config_path).unwrap();
    let reports = BatchRunner::new(&data).run(&config).unwrap();
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0].records.len(), 2);
    assert_eq!(reports[2].records.len(), 3);

    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.contains("stale"));

    let blocks: Vec<&str> = text.split("\n\n").filter(|b| !b.is_empty()).collect();
    assert_eq!(blocks.len(), 4);

    let dp: Vec<&str> = blocks[0].lines().collect();
    assert_eq!(dp[0], "four.txt");
    assert_eq!(dp.len(), 3);
    for line in &dp[1..] {
        assert!(line.ends_with(" 80 (100.00 %) [0 2 3 1 0]"), "{line}");
    }
    assert!(blocks[1].lines().nth(1).unwrap().ends_with("[0 1 3 2 0]"));

    let optimum = HeldKarpSolver::solve(&CostMatrix::try_read_matrix(FIVE.as_bytes()).unwrap())
        .unwrap()
        .cost;
    assert_eq!(optimum, 19.0);
    for report in &reports[2..] {
        for record in &report.records {
            assert!(record.solution.cost >= optimum);
            assert!(record.ratio() >= 100.0);
        }
    }
}

#[test]
fn bad_instance_line_aborts_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("run.cfg");
    fs::write(&config_path, "header\nfour.txt 1 80 genetic\nout.txt\n").unwrap();
    assert!(RunConfig::try_read_file(&config_path).is_err());
}
