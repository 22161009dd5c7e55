//! Timed run records and the result-file writer.

use std::{
    fmt,
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::Path,
    time::Duration,
};

use crate::solver::Solution;

/// Outcome of a single timed solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunRecord {
    pub elapsed: Duration,
    pub solution: Solution,
    /// Reference optimum the percentage column is computed against.
    pub optimal: f64,
}

impl RunRecord {
    pub fn new(elapsed: Duration, solution: Solution, optimal: f64) -> Self {
        Self {
            elapsed,
            solution,
            optimal,
        }
    }

    /// Cost as a percentage of the reference optimum.
    pub fn ratio(&self) -> f64 {
        self.solution.ratio_to(self.optimal)
    }

    pub fn below_optimum(&self) -> bool {
        self.solution.beats(self.optimal)
    }
}

/// `<microseconds> <cost> (<percent> %) [<tour>]`
impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({:.2} %) {}",
            self.elapsed.as_micros(),
            self.solution.cost,
            self.ratio(),
            self.solution.tour
        )
    }
}

/// Creates the output's parent directory and removes a stale output file.
pub fn prepare_output<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Writes one instance block: the name line, one line per run, then an
/// empty line.
pub fn write_block<W: Write>(writer: &mut W, name: &str, records: &[RunRecord]) -> io::Result<()> {
    writeln!(writer, "{name}")?;
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writeln!(writer)
}

/// Appends an instance block to the file at `path`, creating it if needed.
pub fn append_block<P: AsRef<Path>>(path: P, name: &str, records: &[RunRecord]) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    write_block(&mut writer, name, records)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::Tour;

    fn record(micros: u64, cost: f64, optimal: f64) -> RunRecord {
        let tour = Tour::new(vec![0, 2, 1, 0], 3).unwrap();
        RunRecord::new(
            Duration::from_micros(micros),
            Solution::new(cost, tour),
            optimal,
        )
    }

    #[test]
    fn test_record_line() {
        let r = record(1532, 212.0, 200.0);
        assert_eq!(r.to_string(), "1532 212 (106.00 %) [0 2 1 0]");
        assert!(!r.below_optimum());
        assert!(record(1, 199.0, 200.0).below_optimum());
    }

    #[test]
    fn test_block_layout() {
        let mut out = Vec::new();
        let records = [record(10, 80.0, 80.0), record(12, 95.0, 80.0)];
        write_block(&mut out, "tsp_4.txt", &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "tsp_4.txt\n10 80 (100.00 %) [0 2 1 0]\n12 95 (118.75 %) [0 2 1 0]\n\n"
        );
    }

    #[test]
    fn test_prepare_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.txt");

        prepare_output(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());

        append_block(&path, "a", &[record(1, 80.0, 80.0)]).unwrap();
        append_block(&path, "b", &[]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "a\n1 80 (100.00 %) [0 2 1 0]\n\nb\n\n");

        prepare_output(&path).unwrap();
        assert!(!path.exists());
    }
}
