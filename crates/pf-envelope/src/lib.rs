//! pf-envelope: phase-envelope tracing for phaseflow.
//!
//! Follows the saturation (bubble/dew) curve of a fixed composition as a
//! continuous path using pseudo-arclength continuation, from a low-pressure
//! seed to the critical region, a domain boundary, or truncation. Traces are
//! sequential internally; independent traces may run concurrently against
//! the same read-only mixture model.

pub mod error;
pub mod tracer;

pub use error::{EnvelopeError, EnvelopeResult};
pub use tracer::{trace_envelope, CurveBranch, EnvelopeCurve, EnvelopePoint, TraceOptions};
