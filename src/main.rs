//! Transfer-matrix Ising model command-line interface
//!
//! Sweeps a temperature range and prints the free energy, energy, specific
//! heat and squared magnetization per site as a whitespace-separated table.

mod app;
mod config;
mod io;

use app::IsingApplication;
use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    IsingApplication::from_cli()?.run()
}
