//! pf-fluids: the mixture model for phaseflow.
//!
//! Provides:
//! - Fluid identifiers and the embedded component data bank
//! - Composition handling (pure fluids and mixtures)
//! - The multiparameter Helmholtz kernel and its derivatives
//! - `MixtureModel`: reduced-property evaluation (pressure, fugacity,
//!   residual Helmholtz energy) as pure functions of (T, density,
//!   composition)
//! - Transport-property oracles (viscosity, thermal conductivity)
//!
//! # Architecture
//!
//! `MixtureModel` is built once per request and read-only afterwards; every
//! derived property is obtained from `residual_helmholtz` and its
//! derivatives, so the flash and envelope layers have a single numerical
//! kernel to call.

pub mod composition;
pub mod data;
pub mod error;
pub mod fluid;
pub mod helmholtz;
pub mod mixture;
pub mod transport;

// Re-exports for ergonomics
pub use composition::{Composition, FRACTION_SUM_TOL};
pub use error::{FluidError, FluidResult};
pub use fluid::FluidId;
pub use helmholtz::HelmholtzDerivs;
pub use mixture::{MixtureModel, ThermoProps};
pub use transport::{thermal_conductivity, viscosity};
