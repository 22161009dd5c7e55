//! Cost-matrix text reader.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::{TspError, TspResult};
use crate::matrix::CostMatrix;

const MAX_PREALLOCATED_CELLS: usize = 1 << 20;

/// Reads a cost matrix from whitespace-delimited text.
///
/// Format: a header line whose first token is the node count `n`,
/// followed by `n` rows of `n` numbers. Blank lines are ignored.
///
/// ```text
/// 4
/// -1 10 15 20
/// 10 -1 35 25
/// 15 35 -1 30
/// 20 25 30 -1
/// ```
pub trait MatrixReader: Sized {
    fn try_read_matrix<R: BufRead>(reader: R) -> TspResult<Self>;
    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> TspResult<Self>;
}

impl MatrixReader for CostMatrix {
    fn try_read_matrix<R: BufRead>(reader: R) -> TspResult<Self> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| line.map(|l| (i + 1, l)))
            .filter(|res| res.as_ref().map_or(true, |(_, l)| !l.trim().is_empty()));

        let (header_line, header) = lines
            .next()
            .transpose()?
            .ok_or_else(|| TspError::parse(1, "empty matrix file"))?;
        let n: usize = header
            .split_whitespace()
            .next()
            .and_then(|tok| tok.parse().ok())
            .ok_or_else(|| {
                TspError::parse(header_line, format!("expected node count, got {header:?}"))
            })?;

        let cells = n.checked_mul(n).ok_or_else(|| {
            TspError::parse(header_line, format!("node count {n} is too large"))
        })?;
        // Header is untrusted until the rows confirm it.
        let mut data = Vec::with_capacity(cells.min(MAX_PREALLOCATED_CELLS));
        let mut rows = 0usize;
        let mut last_line = header_line;
        for line in lines {
            let (line_no, text) = line?;
            last_line = line_no;
            if rows == n {
                return Err(TspError::parse(
                    line_no,
                    format!("unexpected data after {n} rows"),
                ));
            }
            let before = data.len();
            for tok in text.split_whitespace() {
                let value: f64 = tok.parse().map_err(|_| {
                    TspError::parse(line_no, format!("invalid number {tok:?}"))
                })?;
                data.push(value);
            }
            let found = data.len() - before;
            if found != n {
                return Err(TspError::parse(
                    line_no,
                    format!("expected {n} values, got {found}"),
                ));
            }
            rows += 1;
        }

        if rows != n {
            return Err(TspError::parse(
                last_line + 1,
                format!("expected {n} rows, found {rows}"),
            ));
        }

        CostMatrix::from_flat(n, data)
    }

    fn try_read_matrix_file<P: AsRef<Path>>(path: P) -> TspResult<Self> {
        let file = File::open(path)?;
        Self::try_read_matrix(BufReader::new(file))
    }
}
