use super::runner::RunParameters;
use ising_tm::Observables;
use std::time::Duration;
use tracing::{debug, info};

pub fn report_parameters(params: &RunParameters) {
    info!("Evaluation method: {}", params.method.name());
    info!("Lattice: {} x {} ({} sites)", params.lx, params.ly, params.lx * params.ly);
    info!("Couplings: Jx = {}, Jy = {}", params.jx, params.jy);
    info!("Field: h = {}", params.h);
    info!(
        "Temperatures: {} to {} in steps of {}",
        params.sweep.min, params.sweep.max, params.sweep.step
    );
    debug!(
        "Transfer matrix options: renormalize = {}, parallel = {}, zero-snap tolerance = {:e}",
        params.options.renormalize, params.options.parallel, params.options.zero_snap_tolerance
    );
}

pub fn report_point(t: f64, observables: &Observables) {
    debug!(
        "T = {:.6}: F/N = {:.10}, E/N = {:.10}, C/N = {:.10}",
        t, observables.free_energy, observables.energy, observables.specific_heat
    );
    if let Some(chi) = observables.susceptibility {
        debug!("  chi/N = {:.10}", chi);
    }
}

pub fn report_summary(points: usize, elapsed: Duration) {
    info!("Finished {} temperature point(s) in {:.3} s", points, elapsed.as_secs_f64());
}
