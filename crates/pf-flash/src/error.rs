//! Flash solver errors.

use pf_fluids::FluidError;
use thiserror::Error;

/// Result type for flash operations.
pub type FlashResult<T> = Result<T, FlashError>;

/// Errors raised by the stability/split solver and the flash drivers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlashError {
    /// Mixture-model error (invalid composition, out of range, ...).
    #[error(transparent)]
    Fluid(#[from] FluidError),

    /// Iteration cap exceeded in the stability/split solver.
    #[error("Flash did not converge: {what} after {iterations} iterations")]
    NonConvergence {
        what: &'static str,
        iterations: usize,
    },

    /// PH/TS driver could not bracket the requested target.
    #[error("Target {what} cannot be reached at the specified conditions")]
    UnreachableTarget { what: &'static str },

    /// No density root exists for the requested phase at (T, P).
    #[error("No {kind} density root at T={t} K, P={p} Pa")]
    NoDensityRoot { kind: &'static str, t: f64, p: f64 },
}

impl FlashError {
    /// Stable identifier for per-point error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            FlashError::Fluid(FluidError::InvalidComposition { .. })
            | FlashError::Fluid(FluidError::UnknownFluid { .. }) => "InvalidComposition",
            FlashError::Fluid(FluidError::OutOfRange { .. }) => "OutOfRange",
            FlashError::Fluid(FluidError::NonPhysical { .. }) => "NonPhysical",
            FlashError::NonConvergence { .. } => "FlashNonConvergence",
            FlashError::UnreachableTarget { .. } => "UnreachableTarget",
            FlashError::NoDensityRoot { .. } => "FlashNonConvergence",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        let err = FlashError::NonConvergence {
            what: "split",
            iterations: 200,
        };
        assert_eq!(err.kind(), "FlashNonConvergence");

        let err = FlashError::UnreachableTarget { what: "enthalpy" };
        assert_eq!(err.kind(), "UnreachableTarget");

        let err = FlashError::Fluid(FluidError::OutOfRange {
            what: "temperature",
            fluid: "CO2",
            value: 10.0,
        });
        assert_eq!(err.kind(), "OutOfRange");
    }
}
