mod report;
mod runner;

use self::report::{report_parameters, report_point, report_summary};
use self::runner::{evaluate, resolve_parameters};
use crate::config::{Args, Config};
use crate::io::{open_table, setup_output, TableRow};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use std::time::Instant;
use tracing::info;

pub struct IsingApplication {
    args: Args,
    config: Config,
}

impl IsingApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.log_file.as_ref(), self.args.verbose);
        if let Some(path) = &self.args.config_file {
            info!("Configuration read from: {}", path);
        }

        let params = resolve_parameters(&self.args, &self.config)?;
        report_parameters(&params);

        let mut table = open_table(self.args.output.as_ref(), params.precision)?;
        table.write_header(params.method.name())?;

        let start = Instant::now();
        let temperatures = params.sweep.temperatures();
        for &t in &temperatures {
            let observables = evaluate(&params, t).wrap_err_with(|| format!("Evaluation failed at T = {}", t))?;
            report_point(t, &observables);
            table.write_row(&TableRow {
                lx: params.lx,
                ly: params.ly,
                jx: params.jx,
                jy: params.jy,
                temperature: t,
                observables,
            })?;
        }
        table.flush()?;
        report_summary(temperatures.len(), start.elapsed());

        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let Some(path) = &args.config_file else {
        return Ok(Config::default().with_defaults());
    };

    let config_content =
        fs::read_to_string(path).wrap_err_with(|| format!("Unable to read configuration file: {}", path))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}
