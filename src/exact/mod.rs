//! Reference results used to validate the transfer matrix.
//!
//! * [`counting`]: brute-force sums over every configuration of a small torus
//! * [`square`]: Kaufman's finite-torus and Onsager's infinite-lattice
//!   solutions at zero field
//! * [`critical`]: the critical temperature

pub mod counting;
pub mod critical;
pub mod jet;
pub mod simpson;
pub mod square;

#[cfg(test)]
mod tests;

pub use counting::enumerate;
pub use critical::{critical_temperature, isotropic_critical_temperature};
pub use jet::Jet;
pub use simpson::simpson_1d;
pub use square::{finite, infinite};
