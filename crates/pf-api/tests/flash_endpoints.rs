//! End-to-end service tests against the wire request shapes.

use pf_api::{pt_flash, FlashRequest};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn co2_n2_request(units: &str) -> FlashRequest {
    serde_json::from_value(serde_json::json!({
        "composition": [
            {"fluid": "CO2", "fraction": 0.7},
            {"fluid": "N2", "fraction": 0.3}
        ],
        "variables": {
            "pressure": {"range": {"from": 10.0, "to": 50.0}, "resolution": 5},
            "temperature": {"range": {"from": -20.0, "to": 30.0}, "resolution": 11}
        },
        "calculation": {
            "properties": [
                "density", "enthalpy", "entropy", "sound_speed",
                "viscosity", "thermal_conductivity", "phase"
            ],
            "units_system": units
        }
    }))
    .unwrap()
}

#[test]
fn co2_n2_reference_grid_covers_55_points() {
    init_tracing();
    let response = pt_flash(&co2_n2_request("SI")).unwrap();

    assert_eq!(response.grid_info.total_points, 55);
    assert_eq!(response.grid_info.axis1_points, 5);
    assert_eq!(response.grid_info.axis2_points, 11);
    assert_eq!(response.results.len(), 55);

    for point in &response.results {
        // A well-behaved mixture: no point may fail to converge
        assert!(
            point.error.is_none(),
            "point {} failed: {:?}",
            point.index,
            point.error
        );
        let props = &point.properties;
        for name in [
            "density",
            "enthalpy",
            "entropy",
            "viscosity",
            "thermal_conductivity",
            "phase",
            "temperature",
            "pressure",
        ] {
            assert!(props.contains_key(name), "missing {name}");
        }
        let phase = props["phase"].text().unwrap();
        assert!(
            ["vapor", "liquid", "supercritical", "two-phase"].contains(&phase),
            "odd phase label {phase}"
        );
        let rho = props["density"].number().unwrap();
        assert!(rho > 0.0 && rho.is_finite());
    }
}

#[test]
fn grid_enumeration_order_matches_request_axes() {
    let response = pt_flash(&co2_n2_request("SI")).unwrap();

    // Pressure is the outer axis, temperature the inner one
    for (idx, point) in response.results.iter().enumerate() {
        assert_eq!(point.index, idx);
        assert_eq!(point.i, idx / 11);
        assert_eq!(point.j, idx % 11);
    }
    let p0 = response.results[0].coordinates["pressure"];
    let p1 = response.results[11].coordinates["pressure"];
    assert!((p0 - 10.0).abs() < 1e-9);
    assert!((p1 - 20.0).abs() < 1e-9);
    let t0 = response.results[0].coordinates["temperature"];
    let t10 = response.results[10].coordinates["temperature"];
    assert!((t0 - (-20.0)).abs() < 1e-9);
    assert!((t10 - 30.0).abs() < 1e-9);
}

#[test]
fn identical_requests_give_identical_responses() {
    let first = pt_flash(&co2_n2_request("SI")).unwrap();
    let second = pt_flash(&co2_n2_request("SI")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn water_near_maximum_density_point_in_cgs() {
    let req: FlashRequest = serde_json::from_value(serde_json::json!({
        "composition": [{"fluid": "WATER", "fraction": 1.0}],
        "variables": {
            "pressure": {"range": {"from": 1.01325, "to": 1.01325}, "resolution": 1},
            "temperature": {"range": {"from": 4.0, "to": 4.0}, "resolution": 1}
        },
        "calculation": {
            "properties": ["density", "phase"],
            "units_system": "CGS"
        }
    }))
    .unwrap();

    let response = pt_flash(&req).unwrap();
    assert_eq!(response.grid_info.total_points, 1);
    let point = &response.results[0];
    assert!(point.error.is_none());
    assert_eq!(point.properties["phase"].text(), Some("liquid"));

    let rho = point.properties["density"].number().unwrap();
    assert_eq!(point.properties["density"].unit.as_deref(), Some("g/cm3"));
    // Near 1 g/cm3, within the parameterization's tolerance
    assert!(
        (rho - 1.0).abs() < 0.15,
        "liquid water density = {rho} g/cm3"
    );
}

#[test]
fn composition_sum_violation_rejected_before_any_solve() {
    let req: FlashRequest = serde_json::from_value(serde_json::json!({
        "composition": [
            {"fluid": "CO2", "fraction": 0.7},
            {"fluid": "N2", "fraction": 0.4}
        ],
        "variables": {
            "pressure": {"range": {"from": 10.0, "to": 10.0}, "resolution": 1},
            "temperature": {"range": {"from": 20.0, "to": 20.0}, "resolution": 1}
        },
        "calculation": {"properties": ["density"]}
    }))
    .unwrap();

    let err = pt_flash(&req).unwrap_err();
    assert!(matches!(err, pf_api::ApiError::InvalidComposition { .. }));
}

#[test]
fn unknown_fluid_rejected() {
    let req: FlashRequest = serde_json::from_value(serde_json::json!({
        "composition": [{"fluid": "UNOBTANIUM", "fraction": 1.0}],
        "variables": {
            "pressure": {"range": {"from": 1.0, "to": 1.0}, "resolution": 1},
            "temperature": {"range": {"from": 20.0, "to": 20.0}, "resolution": 1}
        },
        "calculation": {"properties": ["density"]}
    }))
    .unwrap();

    let err = pt_flash(&req).unwrap_err();
    assert!(matches!(err, pf_api::ApiError::InvalidComposition { .. }));
}

#[test]
fn unknown_property_rejected() {
    let mut req = co2_n2_request("SI");
    req.calculation.properties = vec!["frobnication_index".into()];
    let err = pt_flash(&req).unwrap_err();
    assert!(matches!(err, pf_api::ApiError::InvalidRequest { .. }));
}

#[test]
fn two_phase_points_report_split_details() {
    let req: FlashRequest = serde_json::from_value(serde_json::json!({
        "composition": [
            {"fluid": "CO2", "fraction": 0.7},
            {"fluid": "N2", "fraction": 0.3}
        ],
        "variables": {
            "pressure": {"range": {"from": 35.0, "to": 35.0}, "resolution": 1},
            "temperature": {"range": {"from": -33.0, "to": -33.0}, "resolution": 1}
        },
        "calculation": {
            "properties": ["vapor_fraction", "liquid_density", "vapor_density",
                           "liquid_composition", "vapor_composition", "cp"]
        }
    }))
    .unwrap();

    let response = pt_flash(&req).unwrap();
    let point = &response.results[0];
    assert!(point.error.is_none());
    assert_eq!(point.properties["phase"].text(), Some("two-phase"));

    let q = point.properties["vapor_fraction"].number().unwrap();
    assert!((0.0..=1.0).contains(&q));
    assert!(point.properties["liquid_density"].number().unwrap()
        > point.properties["vapor_density"].number().unwrap());
    // Heat capacity has no meaning in the two-phase region
    assert!(point.properties["cp"].undefined);
}
