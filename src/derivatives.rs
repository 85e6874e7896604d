//! Partition-function sums and the free-energy derivative table built from them.

use crate::error::{IsingError, Result};
use crate::exp_number::{ExpF64, ZERO_SNAP_TOLERANCE};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Index};

/// Derivatives of the free-energy density `f = -ln Z / (N β)`.
///
/// Entry `(i, j)` holds `∂^i_β ∂^j_h f`. Only `(0,0)`, `(1,0)`, `(2,0)`,
/// `(0,1)` and `(0,2)` are populated; the mixed entries stay zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivativeTable {
    d: [[f64; 3]; 3],
    beta: f64,
    sites: usize,
}

impl DerivativeTable {
    pub fn new(beta: f64, sites: usize) -> Self {
        DerivativeTable {
            d: [[0.0; 3]; 3],
            beta,
            sites,
        }
    }

    /// `∂^i_β ∂^j_h f`. Out-of-range orders read as zero.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i < 3 && j < 3 {
            self.d[i][j]
        } else {
            0.0
        }
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.d[i][j] = value;
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Number of lattice sites `Lx·Ly`.
    pub fn sites(&self) -> usize {
        self.sites
    }
}

impl Index<(usize, usize)> for DerivativeTable {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.d[i][j]
    }
}

/// The partition function together with its first and second derivatives
/// with respect to `β` and `h`, all kept in the log domain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartitionSums {
    pub z: ExpF64,
    pub z_beta: ExpF64,
    pub z_beta2: ExpF64,
    pub z_h: ExpF64,
    pub z_h2: ExpF64,
}

impl PartitionSums {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Turns the sums into free-energy derivatives for a lattice of `sites`
    /// sites at inverse temperature `beta`.
    ///
    /// With `L = ln Z` and `n = N β`:
    ///
    /// ```text
    /// f      = -L / n
    /// ∂β f   = (L/β - Zβ/Z) / n
    /// ∂²β f  = (-2L/β² + 2 Zβ/(Zβ) - (Zββ/Z - (Zβ/Z)²)) / n
    /// ∂h f   = -(Zh/Z) / n
    /// ∂²h f  = -(Zhh/Z - (Zh/Z)²) / n
    /// ```
    ///
    /// Fails with a domain error unless `Z` is positive and every sum is
    /// finite.
    pub fn into_derivatives(self, sites: usize, beta: f64) -> Result<DerivativeTable> {
        self.into_derivatives_with_tolerance(sites, beta, ZERO_SNAP_TOLERANCE)
    }

    /// [`into_derivatives`](Self::into_derivatives) with an explicit zero-snap
    /// tolerance for the ratios to `Z`.
    pub fn into_derivatives_with_tolerance(
        self,
        sites: usize,
        beta: f64,
        tolerance: f64,
    ) -> Result<DerivativeTable> {
        let z = self.z;
        let log_z = z.log()?;
        let all_finite = [self.z, self.z_beta, self.z_beta2, self.z_h, self.z_h2]
            .iter()
            .all(|x| x.is_zero() || x.log_magnitude().is_finite());
        if !all_finite {
            return Err(IsingError::Domain("PartitionSums: non-finite sum"));
        }
        let n = sites as f64 * beta;

        let mul = |a: ExpF64, b: ExpF64| a.mul_with_tolerance(b, tolerance);
        let ratio = |a: ExpF64| a.checked_div_with_tolerance(z, tolerance);
        let ratio_b = ratio(self.z_beta)?;
        let var_b = ratio(ratio(mul(self.z_beta2, z) - mul(self.z_beta, self.z_beta))?)?;
        let ratio_h = ratio(self.z_h)?;
        let var_h = ratio(ratio(mul(self.z_h2, z) - mul(self.z_h, self.z_h))?)?;

        let mut table = DerivativeTable::new(beta, sites);
        table.set(0, 0, -log_z / n);
        table.set(1, 0, (log_z / beta - ratio_b.value()) / n);
        table.set(
            2,
            0,
            (-2.0 * log_z / (beta * beta) + 2.0 * ratio_b.value() / beta - var_b.value()) / n,
        );
        table.set(0, 1, -ratio_h.value() / n);
        table.set(0, 2, -var_h.value() / n);
        Ok(table)
    }
}

impl Add for PartitionSums {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        PartitionSums {
            z: self.z + rhs.z,
            z_beta: self.z_beta + rhs.z_beta,
            z_beta2: self.z_beta2 + rhs.z_beta2,
            z_h: self.z_h + rhs.z_h,
            z_h2: self.z_h2 + rhs.z_h2,
        }
    }
}

impl AddAssign for PartitionSums {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for PartitionSums {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}
