//! Closed-form free energy of the square-lattice Ising model at zero field.
//!
//! Reference: L. Onsager, Phys. Rev. 65, 117 (1944); B. Kaufman, Phys. Rev.
//! 76, 1232 (1949).

use super::jet::Jet;
use super::simpson::simpson_1d;
use crate::error::{ensure_positive, IsingError, Result};
use crate::observables::Observables;
use std::f64::consts::{LN_2, PI};
use tracing::{debug, warn};

const INITIAL_PANELS: usize = 8;
const MAX_PANELS: usize = 1 << 16;

fn check_couplings(jx: f64, jy: f64, beta: f64) -> Result<()> {
    ensure_positive("jx", jx)?;
    ensure_positive("jy", jy)?;
    ensure_positive("beta", beta)
}

/// Thermal observables from `ln Z / N` as a jet in `β`.
fn from_log_partition(log_z: Jet, beta: f64) -> Observables {
    Observables::thermal(-log_z.v / beta, -log_z.d1, beta * beta * log_z.d2)
}

/// Kaufman's exact solution on an `lx × ly` torus.
///
/// `jx` couples consecutive rows (the `lx` direction), `jy` neighbours within
/// a row, matching [`crate::TransferMatrix`].
pub fn finite(lx: usize, ly: usize, jx: f64, jy: f64, beta: f64) -> Result<Observables> {
    if lx == 0 {
        return Err(IsingError::invalid("lx", "must be positive"));
    }
    if ly == 0 {
        return Err(IsingError::invalid("ly", "must be positive"));
    }
    check_couplings(jx, jy, beta)?;
    Ok(from_log_partition(kaufman_log_z(lx, ly, jx, jy, beta), beta))
}

fn kaufman_log_z(lx: usize, ly: usize, jx: f64, jy: f64, beta: f64) -> Jet {
    let beta_jet = Jet::variable(beta);
    let a = beta_jet * jx;
    let b = beta_jet * jy;
    let (lxf, n) = (lx as f64, (lx * ly) as f64);

    let cosh2a = (a * 2.0).cosh();
    let sinh2a = (a * 2.0).sinh();
    let cosh2b = (b * 2.0).cosh();
    let sinh2b = (b * 2.0).sinh();

    let gamma0 = ((1.0 + cosh2a) / sinh2a).ln() - b * 2.0;
    let zero = Jet::constant(0.0);
    let (mut lp0, mut lp1, mut lp2, mut lp3) = (zero, zero, zero, zero);
    for k in 0..2 * ly {
        let gamma = if k == 0 {
            gamma0.abs()
        } else {
            let cosh_g = (cosh2a * cosh2b - sinh2b * (PI * k as f64 / ly as f64).cos()) / sinh2a;
            (cosh_g + (cosh_g * cosh_g - 1.0).sqrt()).ln()
        };
        let decay = (-(gamma * lxf)).exp();
        let half = gamma * (lxf / 2.0);
        let plus = half + decay.ln_1p();
        let minus = half + (-decay).ln_1p();
        if k % 2 == 1 {
            lp0 += plus;
            lp1 += minus;
        } else {
            lp2 += plus;
            lp3 += minus;
        }
    }

    let mut bracket = 1.0 + (lp1 - lp0).exp() + (lp2 - lp0).exp();
    if gamma0.v > 0.0 {
        bracket = bracket - (lp3 - lp0).exp();
    } else if gamma0.v < 0.0 {
        bracket = bracket + (lp3 - lp0).exp();
    }

    -LN_2 / n + a + (-(a * -4.0).exp()).ln_1p() * 0.5 + (lp0 + bracket.ln()) / n
}

/// Onsager's solution of the infinite lattice.
///
/// `ln Z / N = ln 2 / 2 + (1/2π) ∫₀^π ln(cosh 2βJx cosh 2βJy + r(t)/k) dt`
/// with `k = 1/(sinh 2βJx sinh 2βJy)` and `r(t) = √(1 + k² - 2k cos 2t)`,
/// integrated with the Simpson rule, doubling the panel count until the
/// second derivative in `β` settles.
pub fn infinite(jx: f64, jy: f64, beta: f64) -> Result<Observables> {
    check_couplings(jx, jy, beta)?;

    let beta_jet = Jet::variable(beta);
    let chab = (beta_jet * (2.0 * jx)).cosh() * (beta_jet * (2.0 * jy)).cosh();
    let k = 1.0 / ((beta_jet * (2.0 * jx)).sinh() * (beta_jet * (2.0 * jy)).sinh());
    let c = 1.0 / (2.0 * PI);

    let integrand = |t: f64| {
        let radicand = 1.0 + k * k - k * (2.0 * (2.0 * t).cos());
        let r = radicand.sqrt() / k;
        // at the critical point r is not differentiable at t = 0
        let r = if radicand.v > 0.0 && r.d1.is_finite() {
            r
        } else {
            Jet {
                v: r.v.max(0.0),
                d1: 0.0,
                d2: f64::MAX,
            }
        };
        (chab + r).ln() * c
    };

    let integrate = |n: usize| -> Result<Jet> { Ok(simpson_1d(&integrand, 0.0, PI, n)? + LN_2 / 2.0) };

    let mut log_z = integrate(INITIAL_PANELS)?;
    let mut n = INITIAL_PANELS;
    loop {
        if n >= MAX_PANELS {
            warn!("Onsager integral not converged with {} panels at beta = {}", n, beta);
            break;
        }
        n *= 2;
        let next = integrate(n)?;
        let change = beta * beta * ((next.d2 - log_z.d2) / next.v).abs();
        log_z = next;
        if change < 2.0 * f64::EPSILON {
            break;
        }
    }
    debug!("Onsager integral: {} panels, ln Z / N = {}", n, log_z.v);

    Ok(from_log_partition(log_z, beta))
}
