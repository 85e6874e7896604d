use super::*;
use crate::observables::Observables;
use approx::*;

fn serial() -> TransferMatrixOptions {
    TransferMatrixOptions {
        parallel: false,
        ..TransferMatrixOptions::default()
    }
}

#[test]
fn test_square_4x4_anisotropic() {
    let beta = 0.5;
    for options in [serial(), TransferMatrixOptions::default()] {
        let tm = TransferMatrix::new(4, 4, 1.5, 2.5, beta, 0.0, options).unwrap();
        let obs = Observables::from_derivatives(&tm.derivatives().unwrap());
        assert_abs_diff_eq!(obs.free_energy, -4.087359662653047, epsilon = 1e-10);
        assert_abs_diff_eq!(obs.energy, -3.994108759068211, epsilon = 1e-10);
        assert_abs_diff_eq!(obs.specific_heat, 2.452622208849045e-02, epsilon = 1e-10);
        assert_abs_diff_eq!(obs.magnetization2.unwrap(), 1.597700713244840e+01, epsilon = 1e-10);
    }
}

#[test]
fn test_calc_uses_default_options() {
    let d = calc(4, 4, 1.5, 2.5, 0.5, 0.0).unwrap();
    assert_abs_diff_eq!(d.get(0, 0), -4.087359662653047, epsilon = 1e-10);
    assert_eq!(d.sites(), 16);
    assert_eq!(d.beta(), 0.5);
}

#[test]
fn test_ring_of_single_site_rows() {
    // Ly = 1 is a periodic chain along x plus a self bond exp(βJy) per site
    let (lx, jx, jy, beta) = (6, 1.0, 0.5, 0.8);
    let d = calc(lx, 1, jx, jy, beta, 0.0).unwrap();
    let z = (2.0 * (beta * jx).cosh()).powi(lx as i32) + (2.0 * (beta * jx).sinh()).powi(lx as i32);
    let log_z = z.ln() + beta * jy * lx as f64;
    assert_relative_eq!(d.get(0, 0), -log_z / (lx as f64 * beta), max_relative = 1e-13);
}

#[test]
fn test_trace_is_order_independent() {
    let tm = TransferMatrix::new(3, 5, 0.9, 1.7, 0.35, 0.2, serial()).unwrap();
    let contributions: Vec<PartitionSums> = (0..tm.dim()).map(|i| tm.basis_contribution(i).unwrap()).collect();

    let forward: PartitionSums = contributions.iter().copied().sum();
    let backward: PartitionSums = contributions.iter().rev().copied().sum();
    let serial_sum = tm.trace_serial();
    let parallel_sum = tm.trace_parallel();

    for other in [backward, serial_sum, parallel_sum] {
        assert_relative_eq!(forward.z.log().unwrap(), other.z.log().unwrap(), max_relative = 1e-13);
        assert_relative_eq!(forward.z_beta.value(), other.z_beta.value(), max_relative = 1e-12);
        assert_relative_eq!(forward.z_beta2.value(), other.z_beta2.value(), max_relative = 1e-12);
        assert_relative_eq!(forward.z_h.value(), other.z_h.value(), max_relative = 1e-12);
        assert_relative_eq!(forward.z_h2.value(), other.z_h2.value(), max_relative = 1e-12);
    }
}

#[test]
fn test_renormalization_is_transparent() {
    let plain = TransferMatrixOptions {
        renormalize: false,
        ..serial()
    };
    for &(lx, ly, h) in &[(3, 3, 0.0), (4, 3, 0.3), (2, 5, -0.1)] {
        let a = TransferMatrix::new(lx, ly, 1.1, 0.7, 0.4, h, serial()).unwrap().derivatives().unwrap();
        let b = TransferMatrix::new(lx, ly, 1.1, 0.7, 0.4, h, plain).unwrap().derivatives().unwrap();
        for (i, j) in [(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)] {
            assert_abs_diff_eq!(a.get(i, j), b.get(i, j), epsilon = 1e-11);
        }
    }
}

#[test]
fn test_derivatives_match_finite_differences() {
    let (lx, ly, jx, jy, beta, h) = (3, 4, 0.8, 1.2, 0.45, 0.15);
    let f = |beta: f64, h: f64| calc(lx, ly, jx, jy, beta, h).unwrap().get(0, 0);
    let d = calc(lx, ly, jx, jy, beta, h).unwrap();
    let delta = 1e-4;

    let f0 = f(beta, h);
    let db = (f(beta + delta, h) - f(beta - delta, h)) / (2.0 * delta);
    let dbb = (f(beta + delta, h) - 2.0 * f0 + f(beta - delta, h)) / (delta * delta);
    let dh = (f(beta, h + delta) - f(beta, h - delta)) / (2.0 * delta);
    let dhh = (f(beta, h + delta) - 2.0 * f0 + f(beta, h - delta)) / (delta * delta);

    assert_relative_eq!(d.get(1, 0), db, max_relative = 1e-6);
    assert_relative_eq!(d.get(2, 0), dbb, max_relative = 1e-4);
    assert_relative_eq!(d.get(0, 1), dh, max_relative = 1e-6);
    assert_relative_eq!(d.get(0, 2), dhh, max_relative = 1e-4);
}

#[test]
fn test_field_flips_sign_of_magnetization_derivative() {
    let up = calc(3, 3, 1.0, 1.0, 0.3, 0.2).unwrap();
    let down = calc(3, 3, 1.0, 1.0, 0.3, -0.2).unwrap();
    assert_relative_eq!(up.get(0, 0), down.get(0, 0), max_relative = 1e-13);
    assert_relative_eq!(up.get(0, 1), -down.get(0, 1), max_relative = 1e-12);
    assert!(up.get(0, 1) < 0.0);
}

#[test]
fn test_invalid_arguments() {
    let opts = TransferMatrixOptions::default();
    assert!(matches!(
        TransferMatrix::new(0, 4, 1.0, 1.0, 1.0, 0.0, opts),
        Err(IsingError::InvalidArgument { name: "lx", .. })
    ));
    assert!(matches!(
        TransferMatrix::new(4, 0, 1.0, 1.0, 1.0, 0.0, opts),
        Err(IsingError::InvalidArgument { name: "ly", .. })
    ));
    assert!(matches!(
        TransferMatrix::new(4, 64, 1.0, 1.0, 1.0, 0.0, opts),
        Err(IsingError::InvalidArgument { name: "ly", .. })
    ));
    assert!(matches!(
        calc(4, 4, 1.0, 1.0, 0.0, 0.0),
        Err(IsingError::InvalidArgument { name: "beta", .. })
    ));
    assert!(matches!(
        calc(4, 4, 1.0, 1.0, -2.0, 0.0),
        Err(IsingError::InvalidArgument { name: "beta", .. })
    ));
    assert!(matches!(
        calc(4, 4, f64::NAN, 1.0, 1.0, 0.0),
        Err(IsingError::InvalidArgument { name: "jx", .. })
    ));
    assert!(matches!(
        calc(4, 4, 1.0, 1.0, 1.0, f64::INFINITY),
        Err(IsingError::InvalidArgument { name: "h", .. })
    ));

    let tm = TransferMatrix::new(2, 2, 1.0, 1.0, 1.0, 0.0, opts).unwrap();
    assert!(tm.basis_contribution(4).is_err());
}

#[test]
fn test_large_lattice_stays_finite() {
    // Z ~ exp(β J N) is far outside f64 range here
    let (lx, ly, beta) = (400, 6, 2.0);
    let d = calc(lx, ly, 1.0, 1.0, beta, 0.0).unwrap();
    assert!(d.get(0, 0).is_finite());
    // two ground states, single flips suppressed by exp(-8β)
    let ground = -2.0 - 2.0f64.ln() / ((lx * ly) as f64 * beta);
    assert_relative_eq!(d.get(0, 0), ground, max_relative = 1e-6);
}

#[test]
fn test_cold_lattice_does_not_overflow() {
    // β Jy Ly = 800 is beyond the range of exp in f64
    let (lx, ly, beta) = (4, 8, 100.0);
    let ground = -2.0 - 2.0f64.ln() / ((lx * ly) as f64 * beta);
    let plain = TransferMatrixOptions {
        renormalize: false,
        ..serial()
    };
    for options in [TransferMatrixOptions::default(), serial(), plain] {
        let d = TransferMatrix::new(lx, ly, 1.0, 1.0, beta, 0.0, options)
            .unwrap()
            .derivatives()
            .unwrap();
        let obs = Observables::from_derivatives(&d);
        assert_abs_diff_eq!(obs.free_energy, ground, epsilon = 1e-10);
        assert_abs_diff_eq!(obs.energy, -2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(obs.specific_heat, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(d.get(0, 1), 0.0, epsilon = 1e-12);
    }

    // antiferromagnetic rows, strong field
    let d = calc(4, 8, -1.0, 1.0, beta, 3.0).unwrap();
    assert!(d.get(0, 0).is_finite() && d.get(2, 0).is_finite() && d.get(0, 2).is_finite());
}
