use std::{path::PathBuf, time::Instant};

use anyhow::{ensure, Context};
use log::{info, LevelFilter};
use structopt::StructOpt;
use u_tsp::{
    batch::BatchRunner,
    io::{parse_algorithm, MatrixReader, RunConfig, RunRecord},
    CostMatrix, TspSolver,
};

#[derive(Debug, StructOpt)]
#[structopt(name = "u-tsp", about = "Traveling Salesman solvers over cost matrices")]
struct Opt {
    /// More log output (-v debug, -vv trace)
    #[structopt(short, long, parse(from_occurrences), global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[structopt(short, long, global = true)]
    quiet: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Solve every instance of a run configuration file
    Run {
        #[structopt(parse(from_os_str))]
        config: PathBuf,

        /// Directory the matrix files are resolved against
        #[structopt(long, parse(from_os_str), default_value = "Test_data")]
        data_dir: PathBuf,

        /// Overrides the output path given in the configuration
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },

    /// Solve a single matrix file and print the result line
    Solve {
        #[structopt(parse(from_os_str))]
        matrix: PathBuf,

        /// bf, dp, sa or aco
        #[structopt(short, long, default_value = "dp")]
        algorithm: String,

        #[structopt(short, long)]
        seed: Option<u64>,

        /// Known optimal cost; adds the percentage column
        #[structopt(long)]
        optimal: Option<f64>,

        /// Solver parameters as key=value, e.g. t0=1000 alpha=0.99
        knobs: Vec<String>,
    },
}

fn init_logger(opt: &Opt) {
    let level = if opt.quiet {
        LevelFilter::Warn
    } else {
        match opt.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.as_str().to_lowercase()),
    )
    .init();
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    init_logger(&opt);

    match opt.cmd {
        Command::Run {
            config,
            data_dir,
            output,
        } => {
            let mut run_config = RunConfig::try_read_file(&config)
                .with_context(|| format!("reading run configuration {}", config.display()))?;
            if let Some(output) = output {
                run_config.output = output;
            }
            let reports = BatchRunner::new(data_dir)
                .run(&run_config)
                .context("batch run failed")?;
            for report in &reports {
                if let Some(best) = report.best() {
                    info!("{}: best {}", report.name, best);
                }
            }
        }
        Command::Solve {
            matrix,
            algorithm,
            seed,
            optimal,
            knobs,
        } => {
            let cost_matrix = CostMatrix::try_read_matrix_file(&matrix)
                .with_context(|| format!("reading matrix {}", matrix.display()))?;
            let mut algorithm = parse_algorithm(&algorithm, &knobs)?;
            if let Some(seed) = seed {
                algorithm = algorithm.with_seed(seed);
            }

            let start = Instant::now();
            let solution = algorithm.solve(&cost_matrix)?;
            let elapsed = start.elapsed();

            match optimal {
                Some(optimal) => {
                    ensure!(optimal > 0.0, "known optimal cost must be positive");
                    println!("{}", RunRecord::new(elapsed, solution, optimal));
                }
                None => println!("{} {} {}", elapsed.as_micros(), solution.cost, solution.tour),
            }
        }
    }

    Ok(())
}
