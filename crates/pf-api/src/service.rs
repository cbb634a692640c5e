//! Per-request service functions: the seam the HTTP layer calls into.
//!
//! Each service resolves and validates the composition (rejecting the whole
//! request before any solve on failure), builds the read-only mixture model,
//! maps request units onto solver units, runs the grid evaluator or envelope
//! tracer, and renders the response in the requested unit system.

use crate::error::{ApiError, ApiResult};
use crate::request::{
    CompositionEntry, CurveType, EnvelopeRequest, FlashRequest, VariableSpec,
};
use crate::response::{
    render_property, CurveResult, EnvelopePointResult, EnvelopeResponse, FlashResponse, GridInfo,
    GridPointResult, PointError,
};
use pf_core::units::constants::T_ZERO_C;
use pf_core::units::{bar, celsius, UnitsSystem};
use pf_envelope::{trace_envelope, CurveBranch, EnvelopeCurve, TraceOptions};
use pf_flash::FlashOptions;
use pf_fluids::{Composition, FluidId, MixtureModel};
use pf_grid::{evaluate_grid, GridAxis, GridDriver, GridResults, PropertyTag};
use std::collections::BTreeMap;
use tracing::info;

fn invalid(what: &str) -> ApiError {
    ApiError::InvalidRequest {
        what: what.to_string(),
    }
}

/// Resolve a request composition against the data bank.
pub fn resolve_composition(entries: &[CompositionEntry]) -> ApiResult<Composition> {
    if entries.is_empty() {
        return Err(ApiError::InvalidComposition {
            what: "empty composition".into(),
        });
    }
    let mut pairs = Vec::with_capacity(entries.len());
    for entry in entries {
        pairs.push((FluidId::resolve(&entry.fluid)?, entry.fraction));
    }
    Ok(Composition::new(pairs)?)
}

/// Resolve requested property names onto the closed tag enumeration, once
/// per request. Temperature, pressure, and phase are always reported.
fn resolve_properties(names: &[String]) -> ApiResult<Vec<PropertyTag>> {
    if names.is_empty() {
        return Err(invalid("no properties specified for calculation"));
    }
    let mut tags = vec![
        PropertyTag::Temperature,
        PropertyTag::Pressure,
        PropertyTag::Phase,
    ];
    for name in names {
        let tag = PropertyTag::parse(name)
            .ok_or_else(|| invalid(&format!("unknown property: {name}")))?;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

fn pressure_axis(spec: &VariableSpec) -> ApiResult<GridAxis> {
    Ok(GridAxis::new(
        "pressure",
        bar(spec.range.from).value,
        bar(spec.range.to).value,
        spec.resolution,
    )?)
}

fn temperature_axis(spec: &VariableSpec) -> ApiResult<GridAxis> {
    Ok(GridAxis::new(
        "temperature",
        celsius(spec.range.from).value,
        celsius(spec.range.to).value,
        spec.resolution,
    )?)
}

fn enthalpy_axis(spec: &VariableSpec) -> ApiResult<GridAxis> {
    Ok(GridAxis::new(
        "enthalpy",
        spec.range.from,
        spec.range.to,
        spec.resolution,
    )?)
}

fn entropy_axis(spec: &VariableSpec) -> ApiResult<GridAxis> {
    Ok(GridAxis::new(
        "entropy",
        spec.range.from,
        spec.range.to,
        spec.resolution,
    )?)
}

/// Convert a canonical axis value back into request units for the response.
fn coordinate_in_request_units(axis_name: &str, v: f64) -> f64 {
    match axis_name {
        "pressure" => v / 1e5,
        "temperature" => v - T_ZERO_C,
        _ => v,
    }
}

fn build_flash_response(
    results: GridResults,
    axis1_name: &'static str,
    axis2_name: &'static str,
    system: UnitsSystem,
) -> FlashResponse {
    let failed = results.num_failed();
    let total = results.points.len();
    let points = results
        .points
        .into_iter()
        .map(|record| {
            let mut coordinates = BTreeMap::new();
            coordinates.insert(
                axis1_name.to_string(),
                coordinate_in_request_units(axis1_name, record.v1),
            );
            coordinates.insert(
                axis2_name.to_string(),
                coordinate_in_request_units(axis2_name, record.v2),
            );

            match record.outcome {
                Ok(props) => {
                    let mut properties = BTreeMap::new();
                    for (tag, value) in &props.values {
                        properties.insert(
                            tag.name().to_string(),
                            render_property(*tag, value, system),
                        );
                    }
                    GridPointResult {
                        index: record.index,
                        i: record.i,
                        j: record.j,
                        coordinates,
                        properties,
                        error: None,
                    }
                }
                Err(failure) => GridPointResult {
                    index: record.index,
                    i: record.i,
                    j: record.j,
                    coordinates,
                    properties: BTreeMap::new(),
                    error: Some(PointError {
                        kind: failure.kind.to_string(),
                        message: failure.message,
                    }),
                },
            }
        })
        .collect();

    FlashResponse {
        results: points,
        grid_info: GridInfo {
            axis1_points: results.axis1_points,
            axis2_points: results.axis2_points,
            total_points: total,
            failed_points: failed,
        },
    }
}

/// `POST /pt_flash`: property grid over pressure [bar] x temperature [C].
pub fn pt_flash(req: &FlashRequest) -> ApiResult<FlashResponse> {
    let comp = resolve_composition(&req.composition)?;
    let model = MixtureModel::new(&comp)?;
    let p_spec = req
        .variables
        .pressure
        .as_ref()
        .ok_or_else(|| invalid("missing pressure variable"))?;
    let t_spec = req
        .variables
        .temperature
        .as_ref()
        .ok_or_else(|| invalid("missing temperature variable"))?;
    let tags = resolve_properties(&req.calculation.properties)?;

    let axis1 = pressure_axis(p_spec)?;
    let axis2 = temperature_axis(t_spec)?;
    info!(
        components = model.n_components(),
        points = axis1.points * axis2.points,
        "pt_flash request"
    );
    let results = evaluate_grid(
        &model,
        GridDriver::Pt,
        &axis1,
        &axis2,
        &tags,
        &FlashOptions::default(),
    )?;
    Ok(build_flash_response(
        results,
        "pressure",
        "temperature",
        req.calculation.units_system,
    ))
}

/// `POST /ph_flash`: property grid over pressure [bar] x enthalpy [J/mol].
pub fn ph_flash(req: &FlashRequest) -> ApiResult<FlashResponse> {
    let comp = resolve_composition(&req.composition)?;
    let model = MixtureModel::new(&comp)?;
    let p_spec = req
        .variables
        .pressure
        .as_ref()
        .ok_or_else(|| invalid("missing pressure variable"))?;
    let h_spec = req
        .variables
        .enthalpy
        .as_ref()
        .ok_or_else(|| invalid("missing enthalpy variable"))?;
    let tags = resolve_properties(&req.calculation.properties)?;

    let axis1 = pressure_axis(p_spec)?;
    let axis2 = enthalpy_axis(h_spec)?;
    info!(
        components = model.n_components(),
        points = axis1.points * axis2.points,
        "ph_flash request"
    );
    let results = evaluate_grid(
        &model,
        GridDriver::Ph,
        &axis1,
        &axis2,
        &tags,
        &FlashOptions::default(),
    )?;
    Ok(build_flash_response(
        results,
        "pressure",
        "enthalpy",
        req.calculation.units_system,
    ))
}

/// `POST /ts_flash`: property grid over temperature [C] x entropy [J/(mol K)].
pub fn ts_flash(req: &FlashRequest) -> ApiResult<FlashResponse> {
    let comp = resolve_composition(&req.composition)?;
    let model = MixtureModel::new(&comp)?;
    let t_spec = req
        .variables
        .temperature
        .as_ref()
        .ok_or_else(|| invalid("missing temperature variable"))?;
    let s_spec = req
        .variables
        .entropy
        .as_ref()
        .ok_or_else(|| invalid("missing entropy variable"))?;
    let tags = resolve_properties(&req.calculation.properties)?;

    let axis1 = temperature_axis(t_spec)?;
    let axis2 = entropy_axis(s_spec)?;
    info!(
        components = model.n_components(),
        points = axis1.points * axis2.points,
        "ts_flash request"
    );
    let results = evaluate_grid(
        &model,
        GridDriver::Ts,
        &axis1,
        &axis2,
        &tags,
        &FlashOptions::default(),
    )?;
    Ok(build_flash_response(
        results,
        "temperature",
        "entropy",
        req.calculation.units_system,
    ))
}

fn trace_options_from(req: &EnvelopeRequest) -> ApiResult<TraceOptions> {
    let mut opts = TraceOptions::default();
    let mut windowed = false;
    if let Some(t_spec) = &req.variables.temperature {
        if t_spec.range.to < t_spec.range.from {
            return Err(invalid("temperature range upper bound below lower bound"));
        }
        opts.t_range = (
            celsius(t_spec.range.from).value,
            celsius(t_spec.range.to).value,
        );
        opts.max_points = t_spec.resolution.clamp(10, 500);
        windowed = true;
    }
    if let Some(p_spec) = &req.variables.pressure {
        if p_spec.range.to < p_spec.range.from {
            return Err(invalid("pressure range upper bound below lower bound"));
        }
        opts.p_range = (bar(p_spec.range.from).value, bar(p_spec.range.to).value);
        opts.max_points = p_spec.resolution.clamp(10, 500);
        windowed = true;
    }
    if !windowed {
        return Err(invalid("missing windowing variable for envelope trace"));
    }
    Ok(opts)
}

fn branches(curve_type: CurveType) -> Vec<CurveBranch> {
    match curve_type {
        CurveType::Bubble => vec![CurveBranch::Bubble],
        CurveType::Dew => vec![CurveBranch::Dew],
        CurveType::Both => vec![CurveBranch::Bubble, CurveBranch::Dew],
    }
}

fn branch_name(branch: CurveBranch) -> &'static str {
    match branch {
        CurveBranch::Bubble => "bubble",
        CurveBranch::Dew => "dew",
    }
}

fn curve_result(
    curve: EnvelopeCurve,
    project: impl Fn(&pf_envelope::EnvelopePoint) -> (f64, f64),
) -> CurveResult {
    let points = curve
        .points
        .iter()
        .map(|p| {
            let (primary, secondary) = project(p);
            EnvelopePointResult {
                primary,
                secondary,
                vapor_fraction: p.vapor_fraction,
            }
        })
        .collect();
    CurveResult {
        branch: branch_name(curve.branch).to_string(),
        points,
        truncated: curve.truncated,
        reached_critical: curve.reached_critical,
    }
}

/// `POST /phase_envelope_pt`: saturation curves in (temperature [C],
/// pressure [bar]) space.
pub fn phase_envelope_pt(req: &EnvelopeRequest) -> ApiResult<EnvelopeResponse> {
    let comp = resolve_composition(&req.composition)?;
    let model = MixtureModel::new(&comp)?;
    let opts = trace_options_from(req)?;
    info!(
        components = model.n_components(),
        curve_type = ?req.calculation.curve_type,
        "phase_envelope_pt request"
    );

    let mut curves = Vec::new();
    for branch in branches(req.calculation.curve_type) {
        let curve = trace_envelope(&model, branch, &opts)?;
        curves.push(curve_result(curve, |p| {
            (p.t - T_ZERO_C, p.p / 1e5)
        }));
    }
    Ok(EnvelopeResponse { curves })
}

/// `POST /phase_envelope_ph`: the same saturation curves projected into
/// (pressure [bar], molar enthalpy [J/mol]) space.
pub fn phase_envelope_ph(req: &EnvelopeRequest) -> ApiResult<EnvelopeResponse> {
    let comp = resolve_composition(&req.composition)?;
    let model = MixtureModel::new(&comp)?;
    let opts = trace_options_from(req)?;
    info!(
        components = model.n_components(),
        curve_type = ?req.calculation.curve_type,
        "phase_envelope_ph request"
    );

    let mut curves = Vec::new();
    for branch in branches(req.calculation.curve_type) {
        let curve = trace_envelope(&model, branch, &opts)?;
        curves.push(curve_result(curve, |p| (p.p / 1e5, p.h)));
    }
    Ok(EnvelopeResponse { curves })
}
