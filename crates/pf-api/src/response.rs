//! Typed response bodies and output-unit rendering.

use pf_core::units::{render_output, UnitsSystem};
use pf_grid::{PropertyTag, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A rendered property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportedValue {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

/// One property of one grid point, with its output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ReportedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// The property has no meaning in this phase regime
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub undefined: bool,
}

impl ReportedProperty {
    pub fn number(&self) -> Option<f64> {
        match &self.value {
            Some(ReportedValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(ReportedValue::Text(t)) => Some(t),
            _ => None,
        }
    }
}

/// Render an extracted property into the requested unit system.
pub fn render_property(
    tag: PropertyTag,
    value: &PropertyValue,
    system: UnitsSystem,
) -> ReportedProperty {
    match value {
        PropertyValue::Value(v) => {
            let (converted, unit) = render_output(tag.output_quantity(), *v, system);
            ReportedProperty {
                value: Some(ReportedValue::Number(converted)),
                unit: Some(unit.to_string()),
                undefined: false,
            }
        }
        PropertyValue::Values(vs) => ReportedProperty {
            value: Some(ReportedValue::Numbers(vs.clone())),
            unit: Some("mole fraction".to_string()),
            undefined: false,
        },
        PropertyValue::Text(t) => ReportedProperty {
            value: Some(ReportedValue::Text((*t).to_string())),
            unit: None,
            undefined: false,
        },
        PropertyValue::Undefined => ReportedProperty {
            value: None,
            unit: None,
            undefined: true,
        },
    }
}

/// A point-local failure, reported in place of property values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointError {
    pub kind: String,
    pub message: String,
}

/// One grid point of a flash response, in Cartesian enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPointResult {
    pub index: usize,
    /// First-axis index (outer loop)
    pub i: usize,
    /// Second-axis index (inner loop)
    pub j: usize,
    /// Input coordinates in request units, keyed by variable name
    pub coordinates: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ReportedProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PointError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridInfo {
    pub axis1_points: usize,
    pub axis2_points: usize,
    pub total_points: usize,
    pub failed_points: usize,
}

/// Body of a flash response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashResponse {
    pub results: Vec<GridPointResult>,
    pub grid_info: GridInfo,
}

/// One saturation point of an envelope response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePointResult {
    /// Primary coordinate (temperature in C for PT, pressure in bar for PH)
    pub primary: f64,
    /// Secondary coordinate (pressure in bar for PT, enthalpy in J/mol for PH)
    pub secondary: f64,
    /// 0 on the bubble branch, 1 on the dew branch
    pub vapor_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveResult {
    pub branch: String,
    pub points: Vec<EnvelopePointResult>,
    /// The tracer diverged repeatedly; the points are a valid prefix
    pub truncated: bool,
    pub reached_critical: bool,
}

/// Body of an envelope response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeResponse {
    pub curves: Vec<CurveResult>,
}
