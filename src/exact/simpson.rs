use crate::error::{IsingError, Result};
use std::ops::{Add, Mul};

/// Composite Simpson rule on `[x0, x1]` with `n` panels.
///
/// Each panel is sampled at both ends and at its midpoint. The integrand may
/// return any value that can be added and scaled, e.g. [`super::Jet`].
/// `n` must be positive and even.
pub fn simpson_1d<V, F>(func: F, x0: f64, x1: f64, n: usize) -> Result<V>
where
    V: Copy + Add<Output = V> + Mul<f64, Output = V>,
    F: Fn(f64) -> V,
{
    if n == 0 || n % 2 != 0 {
        return Err(IsingError::invalid("n", format!("must be positive and even, got {n}")));
    }
    let dx = (x1 - x0) / n as f64;
    let mut g = func(x0) + func(x1);
    for i in 0..n {
        g = g + func(x0 + dx * (i as f64 + 0.5)) * 4.0;
    }
    for i in 1..n {
        g = g + func(x0 + dx * i as f64) * 2.0;
    }
    Ok(g * (dx / 6.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;
    use std::f64::consts::PI;

    #[test]
    fn test_cubic_is_exact() {
        let i = simpson_1d(|x: f64| x * x * x - 2.0 * x, 0.0, 2.0, 2).unwrap();
        assert_relative_eq!(i, 0.0, epsilon = 1e-14);
        let i = simpson_1d(|x: f64| x * x, 1.0, 4.0, 4).unwrap();
        assert_relative_eq!(i, 21.0, max_relative = 1e-14);
    }

    #[test]
    fn test_periodic_integrand() {
        let i = simpson_1d(|t: f64| (2.0 + t.cos()).ln(), 0.0, PI, 64).unwrap();
        // ∫₀^π ln(a + cos t) dt = π ln((a + √(a²-1))/2)
        let exact = PI * ((2.0 + 3.0f64.sqrt()) / 2.0).ln();
        assert_relative_eq!(i, exact, max_relative = 1e-13);
    }

    #[test]
    fn test_odd_panel_count_is_rejected() {
        assert!(simpson_1d(|x: f64| x, 0.0, 1.0, 3).is_err());
        assert!(simpson_1d(|x: f64| x, 0.0, 1.0, 0).is_err());
    }
}
