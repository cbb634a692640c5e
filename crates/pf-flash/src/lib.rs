//! pf-flash: phase stability, phase split, and flash drivers for phaseflow.
//!
//! Layered the way the physics composes:
//! - `density`: density root solve on an isotherm
//! - `stability`: tangent-plane-distance test with Wilson K-factor trials
//! - `rachford_rice`: vapor fraction from K-values and feed
//! - `split`: two-phase simultaneous flash at fixed (T, P)
//! - `saturation`: pure-component saturation states
//! - `drivers`: PT flash (the primitive) and the PH/TS outer root-finds
//!
//! Every solve carries its own iteration cap; convergence failure is
//! reported as an error condition, never silently defaulted.

pub mod density;
pub mod drivers;
pub mod equilibrium;
pub mod error;
pub mod rachford_rice;
pub mod saturation;
pub mod split;
pub mod stability;

pub use density::{best_root, density_root, RootKind};
pub use drivers::{ph_flash, pt_flash, ts_flash, FlashOptions};
pub use equilibrium::{Equilibrium, EquilibriumProps, PhaseLabel, PhaseSplit};
pub use error::{FlashError, FlashResult};
pub use rachford_rice::RachfordRice;
pub use saturation::{pure_saturation_pressure, pure_saturation_temperature, PureSaturation};
pub use split::{solve_split, SplitOutcome};
pub use stability::{stability_test, wilson_k, StabilityReport};
