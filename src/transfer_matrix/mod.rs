//! Transfer-matrix evaluation of the partition function of an `Lx × Ly`
//! periodic square-lattice Ising model and of its derivatives.
//!
//! ```text
//! H = -Σ Jx σ_{x,y} σ_{x+1,y} - Σ Jy σ_{x,y} σ_{x,y+1} - h Σ σ_{x,y}
//! Z = Tr (U D)^Lx
//! ```
//!
//! `D` carries the `Jy` bonds within a row of `Ly` sites and the field, `U`
//! the `Jx` bonds between consecutive rows. The trace is taken over the
//! `2^Ly` basis vectors; each one is propagated `Lx` times through `D` and
//! `U` together with its first and second derivatives in `β` and `h`. Both
//! operators are stored with their largest weight scaled to one, and the
//! vector is renormalised after every operator; all scale goes into the
//! running factor (an [`ExpF64`]).

mod row_operator;
mod state;

#[cfg(test)]
mod tests;

pub use row_operator::{ColumnOperator, RowOperator};
pub use state::{apply_column_operator, apply_row_operator, renormalize, IterationState};

use crate::derivatives::{DerivativeTable, PartitionSums};
use crate::error::{ensure_finite, ensure_positive, IsingError, Result};
use crate::exp_number::{ExpF64, ZERO_SNAP_TOLERANCE};
use rayon::prelude::*;
use tracing::debug;

/// Engine knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferMatrixOptions {
    /// Rescale the state vector after every operator application.
    pub renormalize: bool,
    /// Distribute the trace over the rayon thread pool.
    pub parallel: bool,
    /// Zero-snap tolerance used when folding norms into the running factor
    /// and when dividing the sums by `Z`.
    pub zero_snap_tolerance: f64,
}

impl Default for TransferMatrixOptions {
    fn default() -> Self {
        TransferMatrixOptions {
            renormalize: true,
            parallel: true,
            zero_snap_tolerance: ZERO_SNAP_TOLERANCE,
        }
    }
}

/// A validated lattice with its precomputed row operators.
#[derive(Debug, Clone)]
pub struct TransferMatrix {
    lx: usize,
    ly: usize,
    beta: f64,
    options: TransferMatrixOptions,
    row: RowOperator,
    column: ColumnOperator,
}

impl TransferMatrix {
    /// Checks the parameters and builds `D` and `U`.
    ///
    /// Fails with [`IsingError::InvalidArgument`] if `lx` or `ly` is zero,
    /// `ly` is too wide to index `2^ly` states, `beta` is not positive, or
    /// any parameter is not finite.
    pub fn new(
        lx: usize,
        ly: usize,
        jx: f64,
        jy: f64,
        beta: f64,
        h: f64,
        options: TransferMatrixOptions,
    ) -> Result<Self> {
        if lx == 0 {
            return Err(IsingError::invalid("lx", "must be positive"));
        }
        if ly == 0 {
            return Err(IsingError::invalid("ly", "must be positive"));
        }
        if ly >= (usize::BITS - 1) as usize {
            return Err(IsingError::invalid(
                "ly",
                format!("must be below {}, got {ly}", usize::BITS - 1),
            ));
        }
        ensure_finite("jx", jx)?;
        ensure_finite("jy", jy)?;
        ensure_positive("beta", beta)?;
        ensure_finite("h", h)?;
        if options.zero_snap_tolerance.is_nan() || options.zero_snap_tolerance < 0.0 {
            return Err(IsingError::invalid(
                "zero_snap_tolerance",
                format!("must be non-negative, got {}", options.zero_snap_tolerance),
            ));
        }

        debug!(
            "transfer matrix: Lx = {}, Ly = {}, dim = {}, renormalize = {}, parallel = {}",
            lx,
            ly,
            1usize << ly,
            options.renormalize,
            options.parallel
        );

        Ok(TransferMatrix {
            lx,
            ly,
            beta,
            options,
            row: RowOperator::new(ly, jy, beta, h),
            column: ColumnOperator::new(ly, jx, beta),
        })
    }

    /// Dimension `2^Ly` of the row space.
    pub fn dim(&self) -> usize {
        self.row.dim()
    }

    pub fn sites(&self) -> usize {
        self.lx * self.ly
    }

    pub fn options(&self) -> &TransferMatrixOptions {
        &self.options
    }

    /// Contribution `⟨i| (U D)^Lx |i⟩` of basis vector `i` to the partition
    /// sums.
    pub fn basis_contribution(&self, i: usize) -> Result<PartitionSums> {
        if i >= self.dim() {
            return Err(IsingError::invalid(
                "i",
                format!("basis index {i} out of range 0..{}", self.dim()),
            ));
        }
        let mut state = IterationState::basis(self.dim(), i);
        Ok(self.propagate(&mut state, i))
    }

    /// Sums the basis contributions in index order on the current thread.
    pub fn trace_serial(&self) -> PartitionSums {
        let mut state = IterationState::basis(self.dim(), 0);
        let mut sums = PartitionSums::zero();
        for i in 0..self.dim() {
            state.reset(i);
            sums += self.propagate(&mut state, i);
        }
        sums
    }

    /// Sums the basis contributions on the rayon pool, one scratch state per
    /// worker split.
    pub fn trace_parallel(&self) -> PartitionSums {
        let dim = self.dim();
        (0..dim)
            .into_par_iter()
            .map_init(
                || IterationState::basis(dim, 0),
                |state, i| {
                    state.reset(i);
                    self.propagate(state, i)
                },
            )
            .reduce(PartitionSums::zero, |a, b| a + b)
    }

    /// Runs the trace in the mode selected by the options.
    pub fn trace(&self) -> PartitionSums {
        if self.options.parallel {
            self.trace_parallel()
        } else {
            self.trace_serial()
        }
    }

    /// Full evaluation: trace followed by the conversion to free-energy
    /// derivatives.
    pub fn derivatives(&self) -> Result<DerivativeTable> {
        let sums = self.trace();
        debug!("transfer matrix: ln Z = {}", sums.z.log_magnitude());
        sums.into_derivatives_with_tolerance(self.sites(), self.beta, self.options.zero_snap_tolerance)
    }

    fn propagate(&self, state: &mut IterationState, i: usize) -> PartitionSums {
        let tolerance = self.options.zero_snap_tolerance;
        for _ in 0..self.lx {
            apply_row_operator(state, &self.row);
            if self.options.renormalize {
                renormalize(state, tolerance);
            }
            apply_column_operator(state, &self.column);
            if self.options.renormalize {
                renormalize(state, tolerance);
            }
        }
        let f = state.factor;
        let pick = |x: f64| f.mul_with_tolerance(ExpF64::new(x), tolerance);
        PartitionSums {
            z: pick(state.v[i]),
            z_beta: pick(state.v_10[i]),
            z_beta2: pick(state.v_20[i]),
            z_h: pick(state.v_01[i]),
            z_h2: pick(state.v_02[i]),
        }
    }
}

/// Free-energy derivatives of an `lx × ly` torus with default options.
///
/// ```no_run
/// let d = ising_tm::calc(4, 4, 1.5, 2.5, 0.5, 0.0).unwrap();
/// println!("f = {}", d.get(0, 0));
/// ```
pub fn calc(lx: usize, ly: usize, jx: f64, jy: f64, beta: f64, h: f64) -> Result<DerivativeTable> {
    TransferMatrix::new(lx, ly, jx, jy, beta, h, TransferMatrixOptions::default())?.derivatives()
}
