//! Envelope tracing errors.

use pf_flash::FlashError;
use thiserror::Error;

pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Request-level envelope errors. A trace that starts and later diverges is
/// not an error: it returns the partial curve with its truncation marker.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    #[error(transparent)]
    Flash(#[from] FlashError),

    #[error("No saturation seed point inside the requested range")]
    SeedNotFound,
}

impl From<pf_fluids::FluidError> for EnvelopeError {
    fn from(err: pf_fluids::FluidError) -> Self {
        EnvelopeError::Flash(FlashError::Fluid(err))
    }
}
