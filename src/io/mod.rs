//! Logging setup and result output

mod output;

pub use output::{open_table, setup_output, TableRow};
