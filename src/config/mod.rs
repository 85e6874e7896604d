//! Configuration management for transfer-matrix runs
//!
//! A YAML file provides the lattice, couplings, temperature sweep, field and
//! solver settings. Every field is optional; missing values fall back to
//! defaults, and command-line arguments override both.

mod args;

pub use args::Args;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub lattice: LatticeParams,
    pub couplings: CouplingParams,
    pub temperature: TemperatureParams,
    pub field: FieldParams,
    pub solver: SolverParams,
}

impl Config {
    /// Apply default values to any missing parameters
    pub fn with_defaults(self) -> Self {
        Config {
            lattice: self.lattice.with_defaults(),
            couplings: self.couplings.with_defaults(),
            temperature: self.temperature.with_defaults(),
            field: self.field.with_defaults(),
            solver: self.solver.with_defaults(),
        }
    }
}

/// Lattice extent; `lx` rows of `ly` sites
#[derive(Debug, Deserialize, Serialize)]
pub struct LatticeParams {
    pub lx: Option<usize>,
    pub ly: Option<usize>,
}

impl Default for LatticeParams {
    fn default() -> Self {
        LatticeParams {
            lx: Some(4),
            ly: Some(4),
        }
    }
}

impl LatticeParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.lx.is_none() {
            self.lx = defaults.lx;
        }
        if self.ly.is_none() {
            self.ly = defaults.ly;
        }
        self
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CouplingParams {
    pub jx: Option<f64>,
    pub jy: Option<f64>,
}

impl Default for CouplingParams {
    fn default() -> Self {
        CouplingParams {
            jx: Some(1.0),
            jy: Some(1.0),
        }
    }
}

impl CouplingParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.jx.is_none() {
            self.jx = defaults.jx;
        }
        if self.jy.is_none() {
            self.jy = defaults.jy;
        }
        self
    }
}

/// Lower end of a temperature sweep: a number or the critical temperature.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "TemperatureRepr", into = "TemperatureRepr")]
pub enum Temperature {
    Value(f64),
    Critical,
}

/// Serialized form of [`Temperature`]
#[derive(Deserialize, Serialize)]
#[serde(untagged)]
pub enum TemperatureRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<TemperatureRepr> for Temperature {
    type Error = String;

    fn try_from(repr: TemperatureRepr) -> Result<Self, String> {
        match repr {
            TemperatureRepr::Number(t) => Ok(Temperature::Value(t)),
            TemperatureRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Temperature> for TemperatureRepr {
    fn from(t: Temperature) -> Self {
        match t {
            Temperature::Value(t) => TemperatureRepr::Number(t),
            Temperature::Critical => TemperatureRepr::Text("tc".to_string()),
        }
    }
}

impl FromStr for Temperature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim() {
            "tc" | "Tc" | "TC" => Ok(Temperature::Critical),
            other => other
                .parse::<f64>()
                .map(Temperature::Value)
                .map_err(|_| format!("expected a number or \"tc\", got \"{other}\"")),
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temperature::Value(t) => write!(f, "{t}"),
            Temperature::Critical => write!(f, "tc"),
        }
    }
}

/// Temperature sweep `min, min + step, ...` up to `max`
#[derive(Debug, Deserialize, Serialize)]
pub struct TemperatureParams {
    pub min: Option<Temperature>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl Default for TemperatureParams {
    fn default() -> Self {
        TemperatureParams {
            min: Some(Temperature::Critical),
            max: None,
            step: None,
        }
    }
}

impl TemperatureParams {
    /// Fills in `min` only; `max` and `step` default to `min` once it is known.
    pub fn with_defaults(mut self) -> Self {
        if self.min.is_none() {
            self.min = Self::default().min;
        }
        self
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FieldParams {
    pub h: Option<f64>,
}

impl Default for FieldParams {
    fn default() -> Self {
        FieldParams { h: Some(0.0) }
    }
}

impl FieldParams {
    pub fn with_defaults(mut self) -> Self {
        if self.h.is_none() {
            self.h = Self::default().h;
        }
        self
    }
}

/// Solver parameters
#[derive(Debug, Deserialize, Serialize)]
pub struct SolverParams {
    /// "tm", "count", "finite" or "infinite"
    pub method: Option<String>,
    pub renormalize: Option<bool>,
    pub parallel: Option<bool>,
    pub zero_snap_tolerance: Option<f64>,
    /// Digits after the decimal point in the output table
    pub precision: Option<usize>,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            method: Some("tm".to_string()),
            renormalize: Some(true),
            parallel: Some(true),
            zero_snap_tolerance: Some(ising_tm::exp_number::ZERO_SNAP_TOLERANCE),
            precision: Some(15),
        }
    }
}

impl SolverParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.method.is_none() {
            self.method = defaults.method;
        }
        if self.renormalize.is_none() {
            self.renormalize = defaults.renormalize;
        }
        if self.parallel.is_none() {
            self.parallel = defaults.parallel;
        }
        if self.zero_snap_tolerance.is_none() {
            self.zero_snap_tolerance = defaults.zero_snap_tolerance;
        }
        if self.precision.is_none() {
            self.precision = defaults.precision;
        }
        self
    }
}
