//! Text formats: cost matrix files, run configurations and result blocks.

mod matrix_reader;
mod result_writer;
mod run_config;

pub use matrix_reader::MatrixReader;
pub use result_writer::{append_block, prepare_output, write_block, RunRecord};
pub use run_config::{parse_algorithm, InstanceSpec, RunConfig};
