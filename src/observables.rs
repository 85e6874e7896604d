//! Thermodynamic observables per site derived from free-energy derivatives.

use crate::derivatives::DerivativeTable;

/// Per-site observables at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    pub free_energy: f64,
    pub energy: f64,
    pub specific_heat: f64,
    /// `⟨M²⟩ / N`; only known when field derivatives were computed.
    pub magnetization2: Option<f64>,
    /// `∂⟨M⟩/∂h / N`
    pub susceptibility: Option<f64>,
}

impl Observables {
    /// With `b = β` and `d_ij = ∂^i_β ∂^j_h f`:
    ///
    /// ```text
    /// F  = d00
    /// E  = d00 + b d10
    /// C  = -b² (2 d10 + b d20)
    /// χ  = -d02
    /// M² = -d02 / b + N d01²
    /// ```
    pub fn from_derivatives(d: &DerivativeTable) -> Self {
        let b = d.beta();
        let n = d.sites() as f64;
        let (d00, d10, d20) = (d.get(0, 0), d.get(1, 0), d.get(2, 0));
        let (d01, d02) = (d.get(0, 1), d.get(0, 2));
        Observables {
            free_energy: d00,
            energy: d00 + b * d10,
            specific_heat: -b * b * (2.0 * d10 + b * d20),
            magnetization2: Some(-d02 / b + n * d01 * d01),
            susceptibility: Some(-d02),
        }
    }

    /// Observables with no field information.
    pub fn thermal(free_energy: f64, energy: f64, specific_heat: f64) -> Self {
        Observables {
            free_energy,
            energy,
            specific_heat,
            magnetization2: None,
            susceptibility: None,
        }
    }
}

impl From<&DerivativeTable> for Observables {
    fn from(d: &DerivativeTable) -> Self {
        Observables::from_derivatives(d)
    }
}
