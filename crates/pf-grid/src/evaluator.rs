//! Grid evaluation: Cartesian enumeration, per-point flash dispatch, and
//! index-ordered recombination.
//!
//! Grid points share nothing but the read-only mixture model, so they fan
//! out across the rayon pool; results come back keyed by grid index, never
//! by completion order. One point's failure is recorded in place and never
//! aborts its siblings.

use crate::error::{GridError, GridResult};
use crate::properties::{PropertyTag, PropertyValue};
use crate::spec::GridAxis;
use pf_flash::{ph_flash, pt_flash, ts_flash, Equilibrium, FlashOptions, PhaseLabel};
use pf_fluids::MixtureModel;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Which flash driver the grid exercises, and therefore what the two axis
/// values mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridDriver {
    /// axis1 = pressure [Pa], axis2 = temperature [K]
    Pt,
    /// axis1 = pressure [Pa], axis2 = molar enthalpy [J/mol]
    Ph,
    /// axis1 = temperature [K], axis2 = molar entropy [J/(mol K)]
    Ts,
}

/// A point-local failure, carrying the error kind for the response.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFailure {
    pub kind: &'static str,
    pub message: String,
}

/// Extracted properties of one successful grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointProperties {
    pub phase: PhaseLabel,
    /// Resolved temperature and pressure of the point [K, Pa]
    pub t: f64,
    pub p: f64,
    pub values: Vec<(PropertyTag, PropertyValue)>,
}

/// One grid point in Cartesian enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Flat index: `i * axis2.points + j`
    pub index: usize,
    /// First-axis index
    pub i: usize,
    /// Second-axis index
    pub j: usize,
    /// First-axis value (canonical units)
    pub v1: f64,
    /// Second-axis value (canonical units)
    pub v2: f64,
    pub outcome: Result<PointProperties, PointFailure>,
}

/// Evaluated grid plus its enumeration metadata.
#[derive(Debug, Clone)]
pub struct GridResults {
    pub points: Vec<PointRecord>,
    pub axis1_points: usize,
    pub axis2_points: usize,
}

impl GridResults {
    pub fn num_failed(&self) -> usize {
        self.points.iter().filter(|p| p.outcome.is_err()).count()
    }
}

/// Evaluate a full property grid.
///
/// Requests with a single point (degenerate 1x1 grid) go through exactly
/// this path; there is no separate single-point code.
pub fn evaluate_grid(
    model: &MixtureModel,
    driver: GridDriver,
    axis1: &GridAxis,
    axis2: &GridAxis,
    properties: &[PropertyTag],
    opts: &FlashOptions,
) -> GridResult<GridResults> {
    if properties.is_empty() {
        return Err(GridError::InvalidConfiguration {
            what: "no properties requested",
        });
    }

    let values1 = axis1.generate();
    let values2 = axis2.generate();
    let n2 = values2.len();
    let total = values1.len() * n2;
    debug!(
        axis1 = %axis1,
        axis2 = %axis2,
        total,
        "evaluating property grid"
    );

    let points: Vec<PointRecord> = (0..total)
        .into_par_iter()
        .map(|index| {
            let i = index / n2;
            let j = index % n2;
            let v1 = values1[i];
            let v2 = values2[j];
            let outcome = evaluate_point(model, driver, v1, v2, properties, opts);
            if let Err(failure) = &outcome {
                warn!(index, v1, v2, kind = failure.kind, "grid point failed");
            }
            PointRecord {
                index,
                i,
                j,
                v1,
                v2,
                outcome,
            }
        })
        .collect();

    Ok(GridResults {
        points,
        axis1_points: values1.len(),
        axis2_points: n2,
    })
}

fn evaluate_point(
    model: &MixtureModel,
    driver: GridDriver,
    v1: f64,
    v2: f64,
    properties: &[PropertyTag],
    opts: &FlashOptions,
) -> Result<PointProperties, PointFailure> {
    let flash = match driver {
        GridDriver::Pt => pt_flash(model, v2, v1, opts),
        GridDriver::Ph => ph_flash(model, v1, v2, opts),
        GridDriver::Ts => ts_flash(model, v1, v2, opts),
    };
    let eq: Equilibrium = flash.map_err(|e| PointFailure {
        kind: e.kind(),
        message: e.to_string(),
    })?;
    let props = eq.props(model).map_err(|e| PointFailure {
        kind: e.kind(),
        message: e.to_string(),
    })?;

    let mut values = Vec::with_capacity(properties.len());
    for tag in properties {
        let value = tag
            .extract(model, &eq, &props)
            .unwrap_or(PropertyValue::Undefined);
        values.push((*tag, value));
    }

    Ok(PointProperties {
        phase: eq.label,
        t: eq.t,
        p: eq.p,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_fluids::{Composition, FluidId};

    fn co2_n2() -> MixtureModel {
        let comp = Composition::new(vec![
            (FluidId::CarbonDioxide, 0.7),
            (FluidId::Nitrogen, 0.3),
        ])
        .unwrap();
        MixtureModel::new(&comp).unwrap()
    }

    fn props() -> Vec<PropertyTag> {
        vec![
            PropertyTag::Density,
            PropertyTag::Enthalpy,
            PropertyTag::Phase,
        ]
    }

    #[test]
    fn enumeration_order_is_cartesian() {
        let model = co2_n2();
        let axis1 = GridAxis::new("pressure", 1.0e6, 2.0e6, 2).unwrap();
        let axis2 = GridAxis::new("temperature", 280.0, 300.0, 3).unwrap();
        let results = evaluate_grid(
            &model,
            GridDriver::Pt,
            &axis1,
            &axis2,
            &props(),
            &FlashOptions::default(),
        )
        .unwrap();

        assert_eq!(results.points.len(), 6);
        for (idx, point) in results.points.iter().enumerate() {
            assert_eq!(point.index, idx);
            assert_eq!(point.i, idx / 3);
            assert_eq!(point.j, idx % 3);
        }
        // First axis outer, second inner
        assert_eq!(results.points[0].v1, 1.0e6);
        assert_eq!(results.points[2].v2, 300.0);
        assert_eq!(results.points[3].v1, 2.0e6);
    }

    #[test]
    fn results_are_deterministic_across_runs() {
        let model = co2_n2();
        let axis1 = GridAxis::new("pressure", 1.0e6, 4.0e6, 4).unwrap();
        let axis2 = GridAxis::new("temperature", 240.0, 300.0, 7).unwrap();
        let run = || {
            evaluate_grid(
                &model,
                GridDriver::Pt,
                &axis1,
                &axis2,
                &props(),
                &FlashOptions::default(),
            )
            .unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first.points, second.points);
    }

    #[test]
    fn single_point_grid_works() {
        let model = co2_n2();
        let axis1 = GridAxis::new("pressure", 2.0e6, 2.0e6, 1).unwrap();
        let axis2 = GridAxis::new("temperature", 300.0, 300.0, 1).unwrap();
        let results = evaluate_grid(
            &model,
            GridDriver::Pt,
            &axis1,
            &axis2,
            &props(),
            &FlashOptions::default(),
        )
        .unwrap();
        assert_eq!(results.points.len(), 1);
        assert!(results.points[0].outcome.is_ok());
    }

    #[test]
    fn point_failures_do_not_abort_the_grid() {
        let model = co2_n2();
        // The low end of the temperature axis is below the CO2 triple point
        let axis1 = GridAxis::new("pressure", 2.0e6, 2.0e6, 1).unwrap();
        let axis2 = GridAxis::new("temperature", 200.0, 300.0, 3).unwrap();
        let results = evaluate_grid(
            &model,
            GridDriver::Pt,
            &axis1,
            &axis2,
            &props(),
            &FlashOptions::default(),
        )
        .unwrap();

        assert_eq!(results.points.len(), 3);
        let failure = results.points[0].outcome.as_ref().unwrap_err();
        assert_eq!(failure.kind, "OutOfRange");
        assert!(results.points[2].outcome.is_ok());
    }

    #[test]
    fn rejects_empty_property_list() {
        let model = co2_n2();
        let axis1 = GridAxis::new("pressure", 1.0e6, 2.0e6, 2).unwrap();
        let axis2 = GridAxis::new("temperature", 280.0, 300.0, 2).unwrap();
        let err = evaluate_grid(
            &model,
            GridDriver::Pt,
            &axis1,
            &axis2,
            &[],
            &FlashOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidConfiguration { .. }));
    }
}
