use super::*;
use crate::observables::Observables;
use approx::*;

#[test]
fn test_enumeration_square_4x4() {
    let d = enumerate(4, 4, 1.5, 2.5, 0.5, 0.0).unwrap();
    let obs = Observables::from_derivatives(&d);
    assert_relative_eq!(obs.free_energy, -4.087359662653047, max_relative = 1e-13);
    assert_abs_diff_eq!(obs.energy, -3.994108759068211, epsilon = 1e-10);
    assert_abs_diff_eq!(obs.specific_heat, 2.452622208849045e-02, epsilon = 1e-10);
    assert_abs_diff_eq!(obs.magnetization2.unwrap(), 1.597700713244840e+01, epsilon = 1e-10);
}

#[test]
fn test_kaufman_matches_enumeration() {
    for &(lx, ly, jx, jy, beta) in &[(4, 4, 1.5, 2.5, 0.5), (5, 3, 1.2, 0.7, 0.6), (3, 6, 0.4, 1.1, 0.9)] {
        let exact = finite(lx, ly, jx, jy, beta).unwrap();
        let counted = Observables::from_derivatives(&enumerate(lx, ly, jx, jy, beta, 0.0).unwrap());
        assert_abs_diff_eq!(exact.free_energy, counted.free_energy, epsilon = 1e-10);
        assert_abs_diff_eq!(exact.energy, counted.energy, epsilon = 1e-10);
        assert_abs_diff_eq!(exact.specific_heat, counted.specific_heat, epsilon = 1e-10);
    }
}

#[test]
fn test_kaufman_large_torus_approaches_onsager() {
    for &(jx, jy) in &[(1.0, 1.0), (1.0, 0.6)] {
        let tc = critical_temperature(jx, jy).unwrap();
        for ratio in [0.5, 0.8, 1.2, 1.6] {
            let beta = 1.0 / (ratio * tc);
            let f = finite(10000, 10000, jx, jy, beta).unwrap();
            let inf = infinite(jx, jy, beta).unwrap();
            assert_abs_diff_eq!(f.free_energy, inf.free_energy, epsilon = 1e-7);
            assert_abs_diff_eq!(f.energy, inf.energy, epsilon = 1e-6);
            assert_abs_diff_eq!(f.specific_heat, inf.specific_heat, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_onsager_limits() {
    // high temperature: ln Z / N → ln 2
    let hot = infinite(1.0, 1.0, 1e-3).unwrap();
    assert_relative_eq!(hot.free_energy, -2.0f64.ln() / 1e-3, max_relative = 1e-5);
    // low temperature: E → -(Jx + Jy)
    let cold = infinite(1.0, 0.5, 10.0).unwrap();
    assert_relative_eq!(cold.energy, -1.5, max_relative = 1e-8);
    assert!(cold.magnetization2.is_none());
}

#[test]
fn test_closed_forms_reject_bad_arguments() {
    assert!(finite(0, 4, 1.0, 1.0, 1.0).is_err());
    assert!(finite(4, 4, -1.0, 1.0, 1.0).is_err());
    assert!(finite(4, 4, 1.0, 1.0, 0.0).is_err());
    assert!(infinite(1.0, 0.0, 1.0).is_err());
    assert!(infinite(1.0, 1.0, -0.5).is_err());
}
