//! Run-configuration reader.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::aco::{AcoConfig, ConstructionRule};
use crate::construct::InitialTour;
use crate::error::{TspError, TspResult};
use crate::sa::{CoolingSchedule, SaConfig};
use crate::solver::Algorithm;

/// One instance line of a run configuration.
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    /// Matrix file, relative to the data directory.
    pub file: PathBuf,
    /// Number of independent solves.
    pub repetitions: usize,
    /// Known optimal cost, used for the percentage column.
    pub optimal: f64,
    pub algorithm: Algorithm,
}

impl InstanceSpec {
    /// Identifier printed at the head of the instance's result block.
    pub fn name(&self) -> String {
        self.file.display().to_string()
    }
}

/// A parsed run configuration: which instances to solve and where the
/// results go.
///
/// ```text
/// instance repetitions optimum algorithm [key=value ...]
/// tsp_6_1.txt 5 132 dp
/// tsp_10.txt 10 212 sa t0=1000 alpha=0.99 era=50 init=greedy
/// tsp_17.txt 3 39 aco alpha=1 beta=3 ro=0.5 generations=200
/// out/results.txt
/// ```
///
/// The first line is a header and is skipped. Blank lines and lines
/// starting with `#` are ignored. The last remaining line is the output
/// path.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub instances: Vec<InstanceSpec>,
    pub output: PathBuf,
}

impl RunConfig {
    pub fn try_read<R: BufRead>(reader: R) -> TspResult<Self> {
        let mut entries = Vec::new();
        for (i, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            entries.push((i + 1, trimmed.to_string()));
        }

        let Some((_, output)) = entries.pop() else {
            return Err(TspError::parse(1, "run configuration has no output path"));
        };

        let instances = entries
            .iter()
            .map(|(line_no, text)| parse_instance(*line_no, text))
            .collect::<TspResult<Vec<_>>>()?;

        Ok(Self {
            instances,
            output: PathBuf::from(output),
        })
    }

    pub fn try_read_file<P: AsRef<Path>>(path: P) -> TspResult<Self> {
        let file = File::open(path)?;
        Self::try_read(BufReader::new(file))
    }
}

fn parse_instance(line_no: usize, text: &str) -> TspResult<InstanceSpec> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [file, repetitions, optimal, algorithm, knobs @ ..] = tokens.as_slice() else {
        return Err(TspError::parse(
            line_no,
            "expected `<file> <repetitions> <optimum> <algorithm> [key=value ...]`",
        ));
    };

    let repetitions: usize = repetitions
        .parse()
        .map_err(|_| TspError::parse(line_no, format!("invalid repetitions {repetitions:?}")))?;
    let optimal: f64 = optimal
        .parse()
        .map_err(|_| TspError::parse(line_no, format!("invalid optimum {optimal:?}")))?;
    if !optimal.is_finite() || optimal <= 0.0 {
        return Err(TspError::parse(line_no, "optimum must be positive"));
    }
    let algorithm = parse_algorithm(algorithm, knobs)
        .map_err(|e| TspError::parse(line_no, e.to_string()))?;

    Ok(InstanceSpec {
        file: PathBuf::from(file),
        repetitions,
        optimal,
        algorithm,
    })
}

/// Builds an [`Algorithm`] from its short name and `key=value` knobs.
///
/// Annealing knobs: `t0`, `min`, `alpha`, `era`, `cooling`
/// (`geometric` | `logarithmic` | `linear`), `steps`, `max`, `init`
/// (`random` | `greedy`), `seed`.
///
/// Colony knobs: `alpha`, `beta`, `ro`, `generations`, `deposit`, `tau`,
/// `rule` (`greedy` | `proportional`), `seed`.
///
/// ```
/// use u_tsp::io::parse_algorithm;
/// use u_tsp::Algorithm;
///
/// let a = parse_algorithm("sa", &["t0=500", "alpha=0.95", "era=20"]).unwrap();
/// assert!(matches!(a, Algorithm::Annealing(c) if c.initial_temperature == 500.0));
/// assert!(parse_algorithm("dp", &["seed=1"]).is_err());
/// ```
pub fn parse_algorithm<S: AsRef<str>>(name: &str, knobs: &[S]) -> TspResult<Algorithm> {
    let mut algorithm = Algorithm::parse(name)
        .ok_or_else(|| TspError::InvalidConfig(format!("unknown algorithm {name:?}")))?;
    let knobs = knobs
        .iter()
        .map(|k| split_knob(k.as_ref()))
        .collect::<TspResult<Vec<_>>>()?;

    match &mut algorithm {
        Algorithm::Annealing(config) => apply_annealing_knobs(config, &knobs)?,
        Algorithm::Colony(config) => apply_colony_knobs(config, &knobs)?,
        Algorithm::BruteForce | Algorithm::HeldKarp => {
            if let Some((key, _)) = knobs.first() {
                return Err(TspError::InvalidConfig(format!(
                    "{name} takes no parameters, got {key:?}"
                )));
            }
        }
    }

    algorithm.validate()?;
    Ok(algorithm)
}

fn split_knob(knob: &str) -> TspResult<(&str, &str)> {
    knob.split_once('=')
        .ok_or_else(|| TspError::InvalidConfig(format!("expected key=value, got {knob:?}")))
}

fn value<T: FromStr>(key: &str, raw: &str) -> TspResult<T> {
    raw.parse()
        .map_err(|_| TspError::InvalidConfig(format!("invalid value {raw:?} for {key}")))
}

fn unknown(key: &str) -> TspError {
    TspError::InvalidConfig(format!("unknown parameter {key:?}"))
}

fn apply_annealing_knobs(config: &mut SaConfig, knobs: &[(&str, &str)]) -> TspResult<()> {
    let mut cooling = "geometric";
    let mut alpha = match config.cooling {
        CoolingSchedule::Geometric { alpha } => alpha,
        _ => 0.99,
    };
    let mut steps = 100usize;

    for &(key, raw) in knobs {
        match key {
            "t0" => config.initial_temperature = value(key, raw)?,
            "min" => config.min_temperature = value(key, raw)?,
            "alpha" => alpha = value(key, raw)?,
            "era" => config.iterations_per_temperature = value(key, raw)?,
            "cooling" => cooling = raw,
            "steps" => steps = value(key, raw)?,
            "max" => config.max_iterations = value(key, raw)?,
            "init" => {
                config.initial = InitialTour::parse(raw).ok_or_else(|| {
                    TspError::InvalidConfig(format!("unknown initial tour {raw:?}"))
                })?
            }
            "seed" => config.seed = Some(value(key, raw)?),
            _ => return Err(unknown(key)),
        }
    }

    config.cooling = CoolingSchedule::parse(cooling, alpha, steps)
        .ok_or_else(|| TspError::InvalidConfig(format!("unknown cooling schedule {cooling:?}")))?;
    Ok(())
}

fn apply_colony_knobs(config: &mut AcoConfig, knobs: &[(&str, &str)]) -> TspResult<()> {
    for &(key, raw) in knobs {
        match key {
            "alpha" => config.alpha = value(key, raw)?,
            "beta" => config.beta = value(key, raw)?,
            "ro" => config.ro = value(key, raw)?,
            "generations" | "gens" => config.generations = value(key, raw)?,
            "deposit" | "k" => config.deposit = value(key, raw)?,
            "tau" => config.initial_tau = Some(value(key, raw)?),
            "rule" => {
                config.rule = ConstructionRule::parse(raw).ok_or_else(|| {
                    TspError::InvalidConfig(format!("unknown construction rule {raw:?}"))
                })?
            }
            "seed" => config.seed = Some(value(key, raw)?),
            _ => return Err(unknown(key)),
        }
    }
    Ok(())
}
