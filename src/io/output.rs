//! Output formatting and logging utilities

use color_eyre::eyre::{Result, WrapErr};
use ising_tm::Observables;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Layer, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = StdSystemTime::now();
        let duration = now
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        // HH:MM:SS
        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup logging to a file or stderr; stdout is reserved for the result table
pub fn setup_output(log_path: Option<&String>, verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    match log_path {
        Some(path) => {
            if let Ok(log) = File::create(path) {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false)
                    .with_filter(level);
                Registry::default().with(file_layer).init();
                info!("Log will be written to: {}", path);
            } else {
                eprintln!("Could not create log file: {}", path);
            }
        }
        None => {
            let stderr_layer = layer()
                .with_writer(std::io::stderr)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true)
                .with_filter(level);
            Registry::default().with(stderr_layer).init();
        }
    }
}

/// Formats `x` like C's `%.*e`: mantissa with `precision` decimals and a
/// signed exponent of at least two digits (`1.5e+00`). Non-finite values
/// print as `nan`, `inf` and `-inf`.
pub fn scientific(x: f64, precision: usize) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let formatted = format!("{:.*e}", precision, x);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => formatted,
    }
}

/// One line of the result table
#[derive(Debug, Clone, Copy)]
pub struct TableRow {
    pub lx: usize,
    pub ly: usize,
    pub jx: f64,
    pub jy: f64,
    pub temperature: f64,
    pub observables: Observables,
}

/// Whitespace-separated result table with `#` comment headers
pub struct ResultTable<W: Write> {
    writer: W,
    precision: usize,
}

impl<W: Write> ResultTable<W> {
    pub fn new(writer: W, precision: usize) -> Self {
        ResultTable { writer, precision }
    }

    pub fn write_header(&mut self, method: &str) -> Result<()> {
        writeln!(self.writer, "# lattice: square")?;
        writeln!(self.writer, "# method: {}", method)?;
        writeln!(self.writer, "# precision: {}", self.precision)?;
        writeln!(self.writer, "# Lx Ly Jx Jy T 1/T F/N E/N C/N M2/N")?;
        Ok(())
    }

    pub fn write_row(&mut self, row: &TableRow) -> Result<()> {
        let p = self.precision;
        let obs = &row.observables;
        writeln!(
            self.writer,
            "{} {} {} {} {} {} {} {} {} {}",
            row.lx,
            row.ly,
            scientific(row.jx, p),
            scientific(row.jy, p),
            scientific(row.temperature, p),
            scientific(1.0 / row.temperature, p),
            scientific(obs.free_energy, p),
            scientific(obs.energy, p),
            scientific(obs.specific_heat, p),
            scientific(obs.magnetization2.unwrap_or(f64::NAN), p),
        )?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Opens the table destination: a file if given, stdout otherwise
pub fn open_table(path: Option<&String>, precision: usize) -> Result<ResultTable<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match path {
        Some(path) => {
            info!("Results will be written to: {}", path);
            let file = File::create(path).wrap_err_with(|| format!("Unable to create output file: {}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout()),
    };
    Ok(ResultTable::new(writer, precision))
}
