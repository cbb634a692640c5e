//! Request-level service errors.
//!
//! Composition-level problems abort the whole request; point-level solver
//! conditions never surface here (they are recorded per grid point or as
//! curve truncation markers).

use pf_envelope::EnvelopeError;
use pf_flash::FlashError;
use pf_fluids::FluidError;
use pf_grid::GridError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Fractions don't sum to 1, unknown fluid identifier, empty composition.
    #[error("Invalid composition: {what}")]
    InvalidComposition { what: String },

    /// Malformed request shape (missing variables, unknown property names, ...).
    #[error("Invalid request: {what}")]
    InvalidRequest { what: String },

    /// A request-level solver failure (seed not found, whole-request range error).
    #[error(transparent)]
    Flash(#[from] FlashError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

impl From<FluidError> for ApiError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::InvalidComposition { what } => ApiError::InvalidComposition { what },
            FluidError::UnknownFluid { name } => ApiError::InvalidComposition {
                what: format!("unknown fluid identifier: {name}"),
            },
            other => ApiError::Flash(FlashError::Fluid(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fluid_maps_to_invalid_composition() {
        let err: ApiError = FluidError::UnknownFluid {
            name: "KRYPTONITE".into(),
        }
        .into();
        assert!(matches!(err, ApiError::InvalidComposition { .. }));
        assert!(err.to_string().contains("KRYPTONITE"));
    }
}
