//! Grid evaluation errors.

use pf_flash::FlashError;
use thiserror::Error;

pub type GridResult<T> = Result<T, GridError>;

/// Request-level grid errors. Point-local failures are recorded per point
/// and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Invalid axis: {what}")]
    InvalidAxis { what: &'static str },

    #[error("Invalid grid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    #[error(transparent)]
    Flash(#[from] FlashError),
}
