//! Cross-validation of the transfer matrix against independent results:
//! exhaustive enumeration, Kaufman's finite-lattice solution and the
//! critical temperature condition.

use approx::*;
use ising_tm::exact::{self, critical_temperature, isotropic_critical_temperature};
use ising_tm::{calc, Observables, TransferMatrix, TransferMatrixOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_transfer_matrix_matches_enumeration() {
    let mut rng = StdRng::seed_from_u64(20240611);
    for lx in 1..=4 {
        for ly in 1..=4 {
            let jx = rng.gen_range(0.2..2.0);
            let jy = rng.gen_range(0.2..2.0);
            let beta = rng.gen_range(0.2..1.0);
            let h = rng.gen_range(-0.5..0.5);

            let tm = calc(lx, ly, jx, jy, beta, h).unwrap();
            let counted = exact::enumerate(lx, ly, jx, jy, beta, h).unwrap();
            for i in 0..3 {
                for j in 0..3 {
                    assert_abs_diff_eq!(tm.get(i, j), counted.get(i, j), epsilon = 1e-10);
                }
            }
        }
    }
}

#[test]
fn test_serial_trace_without_renormalization_matches_enumeration() {
    let options = TransferMatrixOptions {
        renormalize: false,
        parallel: false,
        ..TransferMatrixOptions::default()
    };
    let tm = TransferMatrix::new(3, 4, 0.9, -0.6, 0.7, 0.25, options).unwrap();
    let d = tm.derivatives().unwrap();
    let counted = exact::enumerate(3, 4, 0.9, -0.6, 0.7, 0.25).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            assert_abs_diff_eq!(d.get(i, j), counted.get(i, j), epsilon = 1e-10);
        }
    }
}

#[test]
fn test_transfer_matrix_matches_kaufman() {
    for &(lx, ly, jx, jy, beta) in &[
        (5, 3, 1.0, 1.0, 0.44),
        (4, 6, 1.3, 0.7, 0.5),
        (6, 4, 0.8, 1.1, 0.35),
    ] {
        let tm = Observables::from_derivatives(&calc(lx, ly, jx, jy, beta, 0.0).unwrap());
        let kaufman = exact::finite(lx, ly, jx, jy, beta).unwrap();
        assert_abs_diff_eq!(tm.free_energy, kaufman.free_energy, epsilon = 1e-10);
        assert_abs_diff_eq!(tm.energy, kaufman.energy, epsilon = 1e-10);
        assert_abs_diff_eq!(tm.specific_heat, kaufman.specific_heat, epsilon = 1e-10);
    }
}

#[test]
fn test_critical_temperature() {
    let tc = critical_temperature(1.0, 1.0).unwrap();
    assert_relative_eq!(tc, 2.269185314213022, max_relative = 1e-12);
    assert_relative_eq!(tc, isotropic_critical_temperature(1.0), max_relative = 1e-12);

    let (jx, jy) = (1.0, 0.4);
    let tc = critical_temperature(jx, jy).unwrap();
    let condition = (2.0 * jx / tc).sinh() * (2.0 * jy / tc).sinh();
    assert_abs_diff_eq!(condition, 1.0, epsilon = 1e-12);
}

#[test]
fn test_large_lattice_approaches_onsager() {
    let beta = 0.25;
    let tm = Observables::from_derivatives(&calc(32, 8, 1.0, 1.0, beta, 0.0).unwrap());
    let onsager = exact::infinite(1.0, 1.0, beta).unwrap();
    assert_abs_diff_eq!(tm.free_energy, onsager.free_energy, epsilon = 1e-3);
    assert_abs_diff_eq!(tm.energy, onsager.energy, epsilon = 1e-2);
}
