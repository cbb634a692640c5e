//! pf-api: the typed service surface of phaseflow.
//!
//! Mirrors the five endpoints of the property service as plain functions
//! over serde request/response types:
//! - `pt_flash`, `ph_flash`, `ts_flash`: property grids
//! - `phase_envelope_pt`, `phase_envelope_ph`: saturation curve traces
//!
//! HTTP transport, routing, and process bootstrap are external
//! collaborators; they deserialize a body into a request struct, call the
//! matching service function, and serialize the result.

pub mod error;
pub mod request;
pub mod response;
pub mod service;

pub use error::{ApiError, ApiResult};
pub use request::{
    CalculationSpec, CompositionEntry, CurveType, EnvelopeCalculation, EnvelopeRequest,
    FlashRequest, Range, VariableSpec, Variables,
};
pub use response::{
    CurveResult, EnvelopePointResult, EnvelopeResponse, FlashResponse, GridInfo, GridPointResult,
    PointError, ReportedProperty, ReportedValue,
};
pub use service::{ph_flash, phase_envelope_ph, phase_envelope_pt, pt_flash, ts_flash};
