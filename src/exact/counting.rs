//! Exhaustive enumeration of all spin configurations of a small torus.

use crate::derivatives::{DerivativeTable, PartitionSums};
use crate::error::{ensure_finite, ensure_positive, IsingError, Result};
use crate::exp_number::ExpF64;
use rayon::prelude::*;
use tracing::debug;

/// Largest number of sites accepted by [`enumerate`].
pub const MAX_SITES: usize = 30;

struct Bond {
    i: usize,
    j: usize,
    coupling: f64,
}

/// Periodic `lx × ly` bonds; site `(x, y)` is bit `x·ly + y`.
fn torus_bonds(lx: usize, ly: usize, jx: f64, jy: f64) -> Vec<Bond> {
    let site = |x: usize, y: usize| x * ly + y;
    let mut bonds = Vec::with_capacity(2 * lx * ly);
    for x in 0..lx {
        for y in 0..ly {
            bonds.push(Bond {
                i: site(x, y),
                j: site(x, (y + 1) % ly),
                coupling: jy,
            });
            bonds.push(Bond {
                i: site(x, y),
                j: site((x + 1) % lx, y),
                coupling: jx,
            });
        }
    }
    bonds
}

/// Free-energy derivatives by summing `exp(-βE)` over all `2^(lx·ly)`
/// configurations, with `E = -Σ J σ_i σ_j - h Σ σ_i`.
///
/// Same conventions as [`crate::TransferMatrix`], so the two agree to
/// rounding. Limited to `lx·ly ≤ 30` sites.
pub fn enumerate(lx: usize, ly: usize, jx: f64, jy: f64, beta: f64, h: f64) -> Result<DerivativeTable> {
    if lx == 0 {
        return Err(IsingError::invalid("lx", "must be positive"));
    }
    if ly == 0 {
        return Err(IsingError::invalid("ly", "must be positive"));
    }
    let sites = lx * ly;
    if sites > MAX_SITES {
        return Err(IsingError::invalid(
            "lx * ly",
            format!("at most {MAX_SITES} sites can be enumerated, got {sites}"),
        ));
    }
    ensure_finite("jx", jx)?;
    ensure_finite("jy", jy)?;
    ensure_positive("beta", beta)?;
    ensure_finite("h", h)?;

    let bonds = torus_bonds(lx, ly, jx, jy);
    let num_states = 1usize << sites;
    debug!("enumerating {} configurations of {} x {}", num_states, lx, ly);

    let spin = |c: usize, s: usize| 1.0 - 2.0 * ((c >> s) & 1) as f64;
    let sums = (0..num_states)
        .into_par_iter()
        .fold(PartitionSums::zero, |mut acc, c| {
            let mut energy = 0.0;
            for bond in &bonds {
                energy -= bond.coupling * spin(c, bond.i) * spin(c, bond.j);
            }
            let magnetization: f64 = (0..sites).map(|s| spin(c, s)).sum();
            energy -= h * magnetization;

            let weight = ExpF64::from_log(-beta * energy);
            let field = beta * magnetization;
            acc += PartitionSums {
                z: weight,
                z_beta: weight * -energy,
                z_beta2: weight * (energy * energy),
                z_h: weight * field,
                z_h2: weight * (field * field),
            };
            acc
        })
        .reduce(PartitionSums::zero, |a, b| a + b);

    sums.into_derivatives(sites, beta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_count() {
        let bonds = torus_bonds(3, 4, 1.0, 2.0);
        assert_eq!(bonds.len(), 24);
        assert_eq!(bonds.iter().filter(|b| b.coupling == 2.0).count(), 12);
        // (2, 3) wraps to (0, 3) along x and to (2, 0) along y
        assert!(bonds.iter().any(|b| b.i == 11 && b.j == 3));
        assert!(bonds.iter().any(|b| b.i == 11 && b.j == 8));
    }

    #[test]
    fn test_too_many_sites() {
        assert!(matches!(
            enumerate(6, 6, 1.0, 1.0, 1.0, 0.0),
            Err(IsingError::InvalidArgument { name: "lx * ly", .. })
        ));
    }
}
