//! Per-basis-vector loop state of the trace and the three steps applied to it.

use super::row_operator::{ColumnOperator, RowOperator};
use crate::exp_number::ExpF64;
use nalgebra::DVector;

/// State vector `v` of one trace iteration, its derivatives in `β`
/// (`v_10`, `v_20`) and `h` (`v_01`, `v_02`), and the running scale factor.
///
/// The represented vector is `factor · v`; the companions share the factor.
#[derive(Debug, Clone)]
pub struct IterationState {
    pub v: DVector<f64>,
    pub v_10: DVector<f64>,
    pub v_20: DVector<f64>,
    pub v_01: DVector<f64>,
    pub v_02: DVector<f64>,
    pub factor: ExpF64,
    scratch: DVector<f64>,
}

impl IterationState {
    /// Unit vector `e_i` in a space of dimension `dim`, companions zero.
    pub fn basis(dim: usize, i: usize) -> Self {
        let mut state = IterationState {
            v: DVector::zeros(dim),
            v_10: DVector::zeros(dim),
            v_20: DVector::zeros(dim),
            v_01: DVector::zeros(dim),
            v_02: DVector::zeros(dim),
            factor: ExpF64::one(),
            scratch: DVector::zeros(dim),
        };
        state.v[i] = 1.0;
        state
    }

    /// Reuses the buffers for a fresh start from `e_i`.
    pub fn reset(&mut self, i: usize) {
        self.v.fill(0.0);
        self.v_10.fill(0.0);
        self.v_20.fill(0.0);
        self.v_01.fill(0.0);
        self.v_02.fill(0.0);
        self.factor = ExpF64::one();
        self.v[i] = 1.0;
    }

    pub fn dim(&self) -> usize {
        self.v.len()
    }
}

/// Multiplies `factor` by `exp(log_shift)` without zero-snapping.
fn fold_shift(state: &mut IterationState, log_shift: f64) {
    state.factor = state.factor.mul_with_tolerance(ExpF64::from_log(log_shift), 0.0);
}

/// `v ← D v` with the product rule applied to the companions. The scale
/// removed from `D` goes into `factor`.
pub fn apply_row_operator(state: &mut IterationState, d: &RowOperator) {
    fold_shift(state, d.log_shift);
    for c in 0..state.dim() {
        let v = state.v[c];
        let (v_10, v_01) = (state.v_10[c], state.v_01[c]);
        state.v_20[c] = d.diag_20[c] * v + 2.0 * d.diag_10[c] * v_10 + d.diag[c] * state.v_20[c];
        state.v_10[c] = d.diag_10[c] * v + d.diag[c] * v_10;
        state.v_02[c] = d.diag_02[c] * v + 2.0 * d.diag_01[c] * v_01 + d.diag[c] * state.v_02[c];
        state.v_01[c] = d.diag_01[c] * v + d.diag[c] * v_01;
        state.v[c] = d.diag[c] * v;
    }
}

/// Divides all five vectors by `‖v‖₂` and moves the norm into `factor`.
///
/// A zero state has nothing to carry and sets `factor` to zero. A non-finite
/// norm leaves the state untouched; the resulting sums are rejected by
/// [`PartitionSums::into_derivatives`](crate::PartitionSums::into_derivatives).
pub fn renormalize(state: &mut IterationState, snap_tolerance: f64) {
    let norm = state.v.norm();
    if norm == 0.0 {
        state.factor = ExpF64::zero();
        return;
    }
    if !norm.is_finite() {
        return;
    }
    let norm_inv = 1.0 / norm;
    state.v.scale_mut(norm_inv);
    state.v_10.scale_mut(norm_inv);
    state.v_20.scale_mut(norm_inv);
    state.v_01.scale_mut(norm_inv);
    state.v_02.scale_mut(norm_inv);
    state.factor = state.factor.mul_with_tolerance(ExpF64::new(norm), snap_tolerance);
}

/// `v ← U v` as one butterfly pass per bit.
///
/// With `w₊ ∝ e^{βJx}`, `w₋ ∝ e^{-βJx}` and `c1 = c0 ^ (1 << s)`, the `β`
/// companions pick up the derivatives `∂β w₊ = Jx w₊`, `∂β w₋ = -Jx w₋`;
/// the `h` companions are mixed like `v`.
pub fn apply_column_operator(state: &mut IterationState, u: &ColumnOperator) {
    fold_shift(state, u.log_shift);
    let dim = state.dim();
    let (w0, w1, jx) = (u.w_same, u.w_flip, u.jx);
    for s in 0..u.ly {
        let bit = 1usize << s;

        for c0 in 0..dim {
            let c1 = c0 ^ bit;
            state.scratch[c0] = jx * jx * (w0 * state.v[c0] + w1 * state.v[c1])
                + 2.0 * jx * (w0 * state.v_10[c0] - w1 * state.v_10[c1])
                + (w0 * state.v_20[c0] + w1 * state.v_20[c1]);
        }
        std::mem::swap(&mut state.v_20, &mut state.scratch);

        for c0 in 0..dim {
            let c1 = c0 ^ bit;
            state.scratch[c0] = jx * (w0 * state.v[c0] - w1 * state.v[c1])
                + (w0 * state.v_10[c0] + w1 * state.v_10[c1]);
        }
        std::mem::swap(&mut state.v_10, &mut state.scratch);

        mix(&mut state.v_02, &mut state.scratch, bit, w0, w1);
        mix(&mut state.v_01, &mut state.scratch, bit, w0, w1);
        mix(&mut state.v, &mut state.scratch, bit, w0, w1);
    }
}

fn mix(x: &mut DVector<f64>, scratch: &mut DVector<f64>, bit: usize, w0: f64, w1: f64) {
    for c0 in 0..x.len() {
        scratch[c0] = w0 * x[c0] + w1 * x[c0 ^ bit];
    }
    std::mem::swap(x, scratch);
}
