//! Command-line argument parsing

use super::Temperature;
use clap::Parser;

/// Free energy, energy, specific heat and squared magnetization of the
/// square-lattice Ising model by the transfer-matrix method
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to an optional YAML configuration file
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Number of rows (transfer steps)
    #[arg(long)]
    pub lx: Option<usize>,

    /// Number of sites per row
    #[arg(long)]
    pub ly: Option<usize>,

    /// Coupling between consecutive rows
    #[arg(long, allow_hyphen_values = true)]
    pub jx: Option<f64>,

    /// Coupling within a row
    #[arg(long, allow_hyphen_values = true)]
    pub jy: Option<f64>,

    /// Lowest temperature, or "tc" for the critical temperature only
    #[arg(long)]
    pub tmin: Option<Temperature>,

    /// Highest temperature (default: tmin)
    #[arg(long)]
    pub tmax: Option<f64>,

    /// Temperature step (default: tmin)
    #[arg(long)]
    pub dt: Option<f64>,

    /// Uniform magnetic field
    #[arg(long, allow_hyphen_values = true)]
    pub field: Option<f64>,

    /// Evaluation method (tm, count, finite or infinite)
    #[arg(short, long)]
    pub method: Option<String>,

    /// Run the trace on the current thread only
    #[arg(long)]
    pub serial: bool,

    /// Skip renormalization of the state vector
    #[arg(long)]
    pub no_renormalize: bool,

    /// Digits after the decimal point in the output table
    #[arg(short, long)]
    pub precision: Option<usize>,

    /// Write the result table to this file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write log messages to this file (default: stderr)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
