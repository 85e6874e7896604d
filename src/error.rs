//! Error types for the ising-tm crate.

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, IsingError>;

/// Error type for all fallible operations in the ising-tm crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IsingError {
    /// A caller-supplied parameter violates a precondition.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A log-domain operation left the domain of real numbers.
    #[error("domain error in {0}")]
    Domain(&'static str),

    /// An iterative solver did not converge.
    #[error("no convergence after {iterations} iterations")]
    NoConvergence {
        /// Number of iterations performed.
        iterations: usize,
    },
}

impl IsingError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        IsingError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Fails unless `value` is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(IsingError::invalid(name, format!("must be finite, got {value}")))
    }
}

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(IsingError::invalid(name, format!("must be positive, got {value}")))
    }
}
