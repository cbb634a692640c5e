//! Cross-cutting flash invariants on realistic mixtures.

use approx::assert_relative_eq;
use pf_flash::{ph_flash, pt_flash, FlashOptions, PhaseLabel};
use pf_fluids::{Composition, FluidId, MixtureModel};

fn co2_n2() -> MixtureModel {
    let comp = Composition::new(vec![
        (FluidId::CarbonDioxide, 0.7),
        (FluidId::Nitrogen, 0.3),
    ])
    .unwrap();
    MixtureModel::new(&comp).unwrap()
}

#[test]
fn two_phase_points_recombine_to_feed() {
    let model = co2_n2();
    let opts = FlashOptions::default();
    let z = [0.7, 0.3];

    let mut two_phase_seen = 0;
    for &t in &[235.0, 245.0, 255.0] {
        for &p in &[2.0e6, 3.0e6, 4.0e6] {
            let eq = pt_flash(&model, t, p, &opts).unwrap();
            if let Some(split) = &eq.split {
                two_phase_seen += 1;
                let q = split.vapor_fraction;
                assert!((0.0..=1.0).contains(&q), "q = {q} at T={t}, P={p}");
                for i in 0..2 {
                    let recombined = q * split.y[i] + (1.0 - q) * split.x[i];
                    assert_relative_eq!(recombined, z[i], epsilon = 1e-7);
                }
                assert!(split.d_liq > split.d_vap);
            }
        }
    }
    assert!(two_phase_seen > 0, "expected some two-phase points");
}

#[test]
fn every_grid_point_of_the_reference_scenario_converges() {
    // {CO2: 0.7, N2: 0.3}, P in [10, 50] bar, T in [-20, 30] C
    let model = co2_n2();
    let opts = FlashOptions::default();
    for i in 0..5 {
        let p = (10.0 + 10.0 * i as f64) * 1e5;
        for j in 0..11 {
            let t = 273.15 - 20.0 + 5.0 * j as f64;
            let eq = pt_flash(&model, t, p, &opts)
                .unwrap_or_else(|e| panic!("flash failed at T={t} K, P={p} Pa: {e}"));
            assert!(eq.density > 0.0);
        }
    }
}

#[test]
fn pure_vapor_fraction_tracks_enthalpy_linearly() {
    let model = MixtureModel::new(&Composition::pure(FluidId::Nitrogen)).unwrap();
    let opts = FlashOptions::default();
    let p = 2.0e5;

    let (t_sat, sat) = pf_flash::pure_saturation_temperature(&model, p).unwrap();
    let h_l = model.props(t_sat, sat.d_liq, &[1.0]).unwrap().h;
    let h_v = model.props(t_sat, sat.d_vap, &[1.0]).unwrap().h;

    let mut last_q = -1.0;
    for frac in [0.1, 0.35, 0.6, 0.85] {
        let h = h_l + frac * (h_v - h_l);
        let eq = ph_flash(&model, p, h, &opts).unwrap();
        assert_eq!(eq.label, PhaseLabel::TwoPhase);
        let q = eq.split.as_ref().unwrap().vapor_fraction;
        assert_relative_eq!(q, frac, epsilon = 1e-6);
        assert!(q > last_q);
        last_q = q;
    }
}

#[test]
fn single_phase_labels_cover_the_map() {
    let model = co2_n2();
    let opts = FlashOptions::default();

    // Warm and dilute: vapor
    let eq = pt_flash(&model, 320.0, 1.0e5, &opts).unwrap();
    assert_eq!(eq.label, PhaseLabel::Vapor);

    // Cold and strongly compressed: liquid
    let eq = pt_flash(&model, 230.0, 20.0e6, &opts).unwrap();
    assert_eq!(eq.label, PhaseLabel::Liquid);
}
