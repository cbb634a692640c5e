//! Typed mirrors of the endpoint request bodies.
//!
//! Request inputs use the wire convention of the service: temperature in
//! degrees Celsius, pressure in bar, molar enthalpy in J/mol, molar entropy
//! in J/(mol·K). `resolution` is the number of grid points along an axis
//! (inclusive bounds); resolution 1 with equal bounds denotes a single
//! point.

use pf_core::units::UnitsSystem;
use serde::{Deserialize, Serialize};

/// One `{fluid, fraction}` entry of a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub fluid: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub from: f64,
    pub to: f64,
}

/// A request variable: range plus point count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub range: Range,
    pub resolution: usize,
}

/// The `variables` object; which keys must be present depends on the
/// endpoint (pressure+temperature, pressure+enthalpy, temperature+entropy,
/// or a single windowing variable for the envelope traces).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<VariableSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<VariableSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enthalpy: Option<VariableSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<VariableSpec>,
}

/// The `calculation` object of a flash request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationSpec {
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub units_system: UnitsSystem,
}

/// Body of `pt_flash`, `ph_flash`, and `ts_flash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashRequest {
    pub composition: Vec<CompositionEntry>,
    pub variables: Variables,
    #[serde(default)]
    pub calculation: CalculationSpec,
}

/// Which saturation branches an envelope request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    Bubble,
    Dew,
    #[default]
    Both,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeCalculation {
    #[serde(default)]
    pub curve_type: CurveType,
}

/// Body of `phase_envelope_pt` and `phase_envelope_ph`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeRequest {
    pub composition: Vec<CompositionEntry>,
    pub variables: Variables,
    #[serde(default)]
    pub calculation: EnvelopeCalculation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_request_parses_the_wire_shape() {
        let body = serde_json::json!({
            "composition": [
                {"fluid": "CO2", "fraction": 0.7},
                {"fluid": "N2", "fraction": 0.3}
            ],
            "variables": {
                "pressure": {"range": {"from": 10.0, "to": 50.0}, "resolution": 5},
                "temperature": {"range": {"from": -20.0, "to": 30.0}, "resolution": 11}
            },
            "calculation": {
                "properties": ["density", "phase"],
                "units_system": "CGS"
            }
        });
        let req: FlashRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.composition.len(), 2);
        assert_eq!(req.variables.pressure.unwrap().resolution, 5);
        assert_eq!(req.calculation.units_system, UnitsSystem::Cgs);
    }

    #[test]
    fn units_system_defaults_to_si() {
        let body = serde_json::json!({
            "composition": [{"fluid": "WATER", "fraction": 1.0}],
            "variables": {},
        });
        let req: FlashRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.calculation.units_system, UnitsSystem::Si);
    }

    #[test]
    fn curve_type_parses_lowercase() {
        let calc: EnvelopeCalculation =
            serde_json::from_value(serde_json::json!({"curve_type": "bubble"})).unwrap();
        assert_eq!(calc.curve_type, CurveType::Bubble);
        let calc: EnvelopeCalculation = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(calc.curve_type, CurveType::Both);
    }
}
