//! Thermodynamics of the two-dimensional Ising model on finite periodic
//! square lattices by the transfer-matrix method.
//!
//! The partition function of even a modest lattice overflows `f64`, so all
//! sums are carried in the log domain ([`ExpNumber`]). First and second
//! derivatives in the inverse temperature and the field are propagated next
//! to the state vector, which gives energy, specific heat and magnetisation
//! without numerical differentiation.
//!
//! ```no_run
//! use ising_tm::{calc, Observables};
//!
//! let d = calc(8, 8, 1.0, 1.0, 0.4, 0.0)?;
//! let obs = Observables::from_derivatives(&d);
//! println!("F/N = {}, E/N = {}, C/N = {}", obs.free_energy, obs.energy, obs.specific_heat);
//! # Ok::<(), ising_tm::IsingError>(())
//! ```

pub mod derivatives;
pub mod error;
pub mod exact;
pub mod exp_number;
pub mod observables;
pub mod transfer_matrix;

pub use derivatives::{DerivativeTable, PartitionSums};
pub use error::{IsingError, Result};
pub use exp_number::{ExpF32, ExpF64, ExpNumber, Sign};
pub use observables::Observables;
pub use transfer_matrix::{calc, TransferMatrix, TransferMatrixOptions};
