use crate::config::{Args, Config, Temperature};
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use ising_tm::exact::{self, critical_temperature};
use ising_tm::{Observables, TransferMatrix, TransferMatrixOptions};
use tracing::info;

/// How the observables are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    TransferMatrix,
    Counting,
    Finite,
    Infinite,
}

impl Method {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "tm" | "transfer-matrix" | "transfer_matrix" => Ok(Method::TransferMatrix),
            "count" | "counting" => Ok(Method::Counting),
            "finite" => Ok(Method::Finite),
            "infinite" => Ok(Method::Infinite),
            other => bail!("Unknown method: {} (expected tm, count, finite or infinite)", other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::TransferMatrix => "transfer matrix",
            Method::Counting => "exhaustive enumeration",
            Method::Finite => "Kaufman finite lattice",
            Method::Infinite => "Onsager infinite lattice",
        }
    }

    /// Closed forms only exist at zero field
    fn supports_field(self) -> bool {
        matches!(self, Method::TransferMatrix | Method::Counting)
    }
}

/// Temperatures `min, min + step, ...` while below `max + 1e-4 step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSweep {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl TemperatureSweep {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !(min > 0.0 && max > 0.0) {
            bail!("Temperature should be positive (Tmin = {}, Tmax = {})", min, max);
        }
        if min > max {
            bail!("Tmax should be larger than Tmin (Tmin = {}, Tmax = {})", min, max);
        }
        if !(step > 0.0) {
            bail!("dT should be positive (dT = {})", step);
        }
        Ok(TemperatureSweep { min, max, step })
    }

    /// A single temperature
    pub fn single(t: f64) -> Result<Self> {
        Self::new(t, t, t)
    }

    pub fn temperatures(&self) -> Vec<f64> {
        let mut temperatures = Vec::new();
        let mut t = self.min;
        while t < self.max + 1e-4 * self.step {
            temperatures.push(t);
            t += self.step;
        }
        temperatures
    }
}

/// Fully resolved run: CLI over configuration over defaults
#[derive(Debug, Clone)]
pub struct RunParameters {
    pub lx: usize,
    pub ly: usize,
    pub jx: f64,
    pub jy: f64,
    pub h: f64,
    pub sweep: TemperatureSweep,
    pub method: Method,
    pub options: TransferMatrixOptions,
    pub precision: usize,
}

pub fn resolve_parameters(args: &Args, config: &Config) -> Result<RunParameters> {
    let missing = |name: &str| eyre!("Missing parameter: {}", name);

    let lx = args.lx.or(config.lattice.lx).ok_or_else(|| missing("lx"))?;
    let ly = args.ly.or(config.lattice.ly).ok_or_else(|| missing("ly"))?;
    let jx = args.jx.or(config.couplings.jx).ok_or_else(|| missing("jx"))?;
    let jy = args.jy.or(config.couplings.jy).ok_or_else(|| missing("jy"))?;
    let h = args.field.or(config.field.h).unwrap_or(0.0);

    let method_name = args
        .method
        .clone()
        .or_else(|| config.solver.method.clone())
        .unwrap_or_else(|| "tm".to_string());
    let method = Method::parse(&method_name)?;
    if h != 0.0 && !method.supports_field() {
        bail!("The {} solution is only available at zero field (h = {})", method.name(), h);
    }

    let sweep = match args.tmin.or(config.temperature.min).unwrap_or(Temperature::Critical) {
        Temperature::Critical => {
            let tc = critical_temperature(jx, jy).wrap_err("Unable to locate the critical temperature")?;
            info!("Critical temperature for Jx = {}, Jy = {}: {}", jx, jy, tc);
            TemperatureSweep::single(tc)?
        }
        Temperature::Value(tmin) => {
            let tmax = args.tmax.or(config.temperature.max).unwrap_or(tmin);
            let step = args.dt.or(config.temperature.step).unwrap_or(tmin);
            TemperatureSweep::new(tmin, tmax, step)?
        }
    };

    let defaults = TransferMatrixOptions::default();
    let options = TransferMatrixOptions {
        renormalize: !args.no_renormalize && config.solver.renormalize.unwrap_or(defaults.renormalize),
        parallel: !args.serial && config.solver.parallel.unwrap_or(defaults.parallel),
        zero_snap_tolerance: config
            .solver
            .zero_snap_tolerance
            .unwrap_or(defaults.zero_snap_tolerance),
    };
    let precision = args.precision.or(config.solver.precision).unwrap_or(15);

    Ok(RunParameters {
        lx,
        ly,
        jx,
        jy,
        h,
        sweep,
        method,
        options,
        precision,
    })
}

/// Observables at temperature `t` by the selected method
pub fn evaluate(params: &RunParameters, t: f64) -> Result<Observables> {
    let beta = 1.0 / t;
    let observables = match params.method {
        Method::TransferMatrix => {
            let tm = TransferMatrix::new(
                params.lx,
                params.ly,
                params.jx,
                params.jy,
                beta,
                params.h,
                params.options,
            )?;
            Observables::from_derivatives(&tm.derivatives()?)
        }
        Method::Counting => Observables::from_derivatives(&exact::enumerate(
            params.lx, params.ly, params.jx, params.jy, beta, params.h,
        )?),
        Method::Finite => exact::finite(params.lx, params.ly, params.jx, params.jy, beta)?,
        Method::Infinite => exact::infinite(params.jx, params.jy, beta)?,
    };
    Ok(observables)
}
