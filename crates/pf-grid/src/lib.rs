//! pf-grid: Cartesian property-grid evaluation for phaseflow.
//!
//! Enumerates the grid implied by the request's variable ranges and
//! resolutions, fans the per-point flashes out across a worker pool, and
//! recombines results by grid index. Point-local failures degrade
//! gracefully; properties without meaning in a phase regime come back as
//! explicit `Undefined` values.

pub mod error;
pub mod evaluator;
pub mod properties;
pub mod spec;

pub use error::{GridError, GridResult};
pub use evaluator::{
    evaluate_grid, GridDriver, GridResults, PointFailure, PointProperties, PointRecord,
};
pub use properties::{PropertyTag, PropertyValue};
pub use spec::{GridAxis, GridSpacing};
