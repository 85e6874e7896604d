//! Critical temperature of the square-lattice Ising model

use super::jet::Jet;
use crate::error::{ensure_finite, IsingError, Result};

const MAX_ITERATIONS: usize = 256;

/// Critical temperature of the isotropic model, `T_c = 2|J| / ln(1 + √2)`
/// (≈ 2.269 |J|).
pub fn isotropic_critical_temperature(j: f64) -> f64 {
    2.0 * j.abs() / (1.0 + 2.0_f64.sqrt()).ln()
}

/// Root of `f` by Newton iteration from `x`.
///
/// Stops when the step is below `2|x|ε` or `|f|` is below `2ε`. Returns the
/// root and the number of iterations taken.
pub fn newton_1d<F>(func: F, mut x: f64, max_iter: usize) -> Result<(f64, usize)>
where
    F: Fn(Jet) -> Jet,
{
    let mut v = func(Jet::variable(x));
    for iter in 0..max_iter {
        let xn = x - v.v / v.d1;
        let vn = func(Jet::variable(xn));
        if (xn - x).abs() < 2.0 * x.abs() * f64::EPSILON || vn.v.abs() < 2.0 * f64::EPSILON {
            return Ok((xn, iter + 1));
        }
        x = xn;
        v = vn;
    }
    Err(IsingError::NoConvergence { iterations: max_iter })
}

/// Critical temperature of the anisotropic model, the solution of
/// `sinh(2βJx) sinh(2βJy) = 1`. Only `|Jx|` and `|Jy|` matter.
pub fn critical_temperature(jx: f64, jy: f64) -> Result<f64> {
    ensure_finite("jx", jx)?;
    ensure_finite("jy", jy)?;
    let (jx, jy) = (jx.abs(), jy.abs());
    if jx * jy == 0.0 {
        return Err(IsingError::invalid("jx * jy", "must be non-zero"));
    }
    let (beta, _) = newton_1d(
        |beta| (beta * (2.0 * jx)).sinh() * (beta * (2.0 * jy)).sinh() - 1.0,
        1.0 / (2.0 * (jx + jy)),
        MAX_ITERATIONS,
    )?;
    Ok(1.0 / beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn test_isotropic() {
        let tc = critical_temperature(1.0, 1.0).unwrap();
        assert_relative_eq!(tc, isotropic_critical_temperature(1.0), max_relative = 1e-14);
        assert_relative_eq!(tc, 2.269185314213022, max_relative = 1e-14);
    }

    #[test]
    fn test_scaling_and_sign() {
        let tc = critical_temperature(2.0, 2.0).unwrap();
        assert_relative_eq!(tc, 2.0 * critical_temperature(1.0, 1.0).unwrap(), max_relative = 1e-14);
        assert_eq!(critical_temperature(-1.0, 0.5).unwrap(), critical_temperature(1.0, 0.5).unwrap());
    }

    #[test]
    fn test_anisotropic_root() {
        let (jx, jy) = (1.5, 0.25);
        let beta = 1.0 / critical_temperature(jx, jy).unwrap();
        assert_relative_eq!((2.0 * beta * jx).sinh() * (2.0 * beta * jy).sinh(), 1.0, max_relative = 1e-13);
        assert_relative_eq!(
            critical_temperature(jx, jy).unwrap(),
            critical_temperature(jy, jx).unwrap(),
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_zero_coupling_is_rejected() {
        assert!(critical_temperature(0.0, 1.0).is_err());
    }

    #[test]
    fn test_newton_reports_failure() {
        // x² + 1 has no real root
        let err = newton_1d(|x| x * x + 1.0, 0.5, 10).unwrap_err();
        assert_eq!(err, IsingError::NoConvergence { iterations: 10 });
    }
}
