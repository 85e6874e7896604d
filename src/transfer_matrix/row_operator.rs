//! The two factors of the row-to-row transfer matrix.
//!
//! A row of `Ly` spins is encoded as the bits of an index `c ∈ [0, 2^Ly)`,
//! bit `0` meaning `σ = +1`. The transfer matrix splits into a diagonal part
//! `D` (bonds inside the row and the field) and a non-diagonal part `U`
//! (bonds to the next row) which factorises into one 2×2 block per site.

use nalgebra::DVector;

/// `σ_s` of row configuration `c`.
#[inline]
pub(crate) fn spin(c: usize, s: usize) -> f64 {
    1.0 - 2.0 * ((c >> s) & 1) as f64
}

/// Diagonal operator `D` with its `β`- and `h`-derivative diagonals.
///
/// `D[c] = exp(β E_c)` with `E_c = Jy Σ σ_b σ_{b+1} + h Σ σ_s` on the
/// periodic ring of `Ly` sites. The stored diagonals are divided by
/// `exp(log_shift)`, `log_shift = β max_c E_c`, so every entry of `diag` lies
/// in `[0, 1]` whatever the temperature. Writing `M_c` for the row
/// magnetisation:
///
/// * `diag_10 = diag · E_c`, `diag_20 = diag · E_c²`
/// * `diag_01 = diag · β M_c`, `diag_02 = diag · (β M_c)²`
#[derive(Debug, Clone)]
pub struct RowOperator {
    pub diag: DVector<f64>,
    pub diag_10: DVector<f64>,
    pub diag_20: DVector<f64>,
    pub diag_01: DVector<f64>,
    pub diag_02: DVector<f64>,
    /// `ln` of the scale removed from all five diagonals.
    pub log_shift: f64,
}

impl RowOperator {
    pub fn new(ly: usize, jy: f64, beta: f64, h: f64) -> Self {
        let dim = 1usize << ly;

        let energy = DVector::from_fn(dim, |c, _| {
            let bonds: f64 = (0..ly).map(|b| spin(c, b) * spin(c, (b + 1) % ly)).sum();
            let magnetization: f64 = (0..ly).map(|s| spin(c, s)).sum();
            jy * bonds + h * magnetization
        });
        let field_factor = DVector::from_fn(dim, |c, _| beta * (0..ly).map(|s| spin(c, s)).sum::<f64>());
        let log_shift = beta * energy.max();

        let diag = energy.map(|e| (beta * e - log_shift).exp());
        let diag_10 = diag.component_mul(&energy);
        let diag_20 = diag_10.component_mul(&energy);
        let diag_01 = diag.component_mul(&field_factor);
        let diag_02 = diag_01.component_mul(&field_factor);

        RowOperator {
            diag,
            diag_10,
            diag_20,
            diag_01,
            diag_02,
            log_shift,
        }
    }

    pub fn dim(&self) -> usize {
        self.diag.len()
    }
}

/// Non-diagonal operator `U = ⊗_s [[e^{βJx}, e^{-βJx}], [e^{-βJx}, e^{βJx}]]`.
///
/// Never materialised; it is applied as `Ly` butterfly passes, one per bit.
/// Both weights are divided by `e^{β|Jx|}`, so the larger one is exactly 1;
/// the removed scale of a full application is `exp(log_shift)`.
#[derive(Debug, Clone, Copy)]
pub struct ColumnOperator {
    pub ly: usize,
    pub jx: f64,
    /// `e^{βJx - β|Jx|}`, weight of an unchanged spin.
    pub w_same: f64,
    /// `e^{-βJx - β|Jx|}`, weight of a flipped spin.
    pub w_flip: f64,
    /// `Ly β |Jx|`
    pub log_shift: f64,
}

impl ColumnOperator {
    pub fn new(ly: usize, jx: f64, beta: f64) -> Self {
        let shift = beta * jx.abs();
        ColumnOperator {
            ly,
            jx,
            w_same: (beta * jx - shift).exp(),
            w_flip: (-beta * jx - shift).exp(),
            log_shift: ly as f64 * shift,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn test_spin_encoding() {
        assert_eq!(spin(0b10, 0), 1.0);
        assert_eq!(spin(0b10, 1), -1.0);
    }

    #[test]
    fn test_diagonal_of_three_site_ring() {
        let (jy, beta, h) = (1.3, 0.4, 0.2);
        let d = RowOperator::new(3, jy, beta, h);
        assert_eq!(d.dim(), 8);

        // all up: three satisfied bonds, M = 3; also the largest weight
        let e = 3.0 * jy + 3.0 * h;
        assert_relative_eq!(d.log_shift, beta * e, max_relative = 1e-15);
        assert_eq!(d.diag[0], 1.0);
        let scale = d.log_shift.exp();
        assert_relative_eq!(scale * d.diag_10[0], (beta * e).exp() * e, max_relative = 1e-14);
        assert_relative_eq!(scale * d.diag_02[0], (beta * e).exp() * (3.0 * beta).powi(2), max_relative = 1e-14);

        // one spin down: one satisfied bond, two broken, M = 1
        let e = -jy + h;
        assert_relative_eq!(scale * d.diag[0b001], (beta * e).exp(), max_relative = 1e-14);
        assert_relative_eq!(scale * d.diag_20[0b100], (beta * e).exp() * e * e, max_relative = 1e-14);
        assert_relative_eq!(scale * d.diag_01[0b010], (beta * e).exp() * beta, max_relative = 1e-14);
    }

    #[test]
    fn test_diagonal_stays_bounded_when_cold() {
        let d = RowOperator::new(8, 1.0, 100.0, 0.0);
        assert!(d.diag.iter().all(|&w| (0.0..=1.0).contains(&w)));
        assert!(d.diag_20.iter().all(|w| w.is_finite()));
        assert_relative_eq!(d.log_shift, 800.0, max_relative = 1e-15);
    }

    #[test]
    fn test_column_weights() {
        let u = ColumnOperator::new(4, 0.5, 2.0);
        assert_eq!(u.w_same, 1.0);
        assert_relative_eq!(u.w_flip, (-2.0f64).exp(), max_relative = 1e-15);
        assert_relative_eq!(u.log_shift, 4.0, max_relative = 1e-15);

        // antiferromagnetic coupling favours the flipped spin
        let u = ColumnOperator::new(2, -0.5, 2.0);
        assert_eq!(u.w_flip, 1.0);
        assert_relative_eq!(u.w_same, (-2.0f64).exp(), max_relative = 1e-15);
    }
}
