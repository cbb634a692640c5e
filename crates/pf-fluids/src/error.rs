//! Fluid and mixture-model errors.

use pf_core::CoreError;
use thiserror::Error;

/// Result type for mixture-model operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors raised by the mixture model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Composition rejected before any solve (empty, bad sum, unknown fluid).
    #[error("Invalid composition: {what}")]
    InvalidComposition { what: String },

    /// Fluid identifier not present in the component data bank.
    #[error("Unknown fluid identifier: {name}")]
    UnknownFluid { name: String },

    /// State outside a component's valid range.
    #[error("{what} outside valid range for {fluid}: {value}")]
    OutOfRange {
        what: &'static str,
        fluid: &'static str,
        value: f64,
    },

    /// Non-physical values (negative density, temperature, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },
}

impl From<CoreError> for FluidError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, .. } => FluidError::NonPhysical { what },
            CoreError::InvalidArg { what } => FluidError::NonPhysical { what },
            CoreError::Invariant { what } => FluidError::NonPhysical { what },
        }
    }
}
