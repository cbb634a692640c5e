//! Pure-component saturation: Maxwell construction via fugacity equality.

use crate::density::{density_root, RootKind};
use crate::error::{FlashError, FlashResult};
use pf_fluids::MixtureModel;
use tracing::trace;

/// A pure-component saturation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PureSaturation {
    /// Saturation pressure [Pa]
    pub p: f64,
    /// Saturated liquid molar density [mol/m3]
    pub d_liq: f64,
    /// Saturated vapor molar density [mol/m3]
    pub d_vap: f64,
}

const MAX_ITER: usize = 200;
const TOL: f64 = 1e-10;

/// Saturation pressure at T for a single-component model.
///
/// Direct substitution `P <- P * phi_liq / phi_vap` from a Wilson-style
/// seed; the update is damped and the loop breaks when the density roots
/// merge near the critical point.
pub fn pure_saturation_pressure(model: &MixtureModel, t: f64) -> FlashResult<PureSaturation> {
    debug_assert_eq!(model.n_components(), 1);
    let x = [1.0];
    let tc = model.t_reduce(&x);
    if t >= tc {
        return Err(FlashError::UnreachableTarget {
            what: "saturation above the critical temperature",
        });
    }

    let r = model.records()[0];
    let mut p = r.p_crit * (5.373 * (1.0 + r.acentric) * (1.0 - r.t_crit / t)).exp();
    p = p.clamp(1e-2, 0.99 * r.p_crit);

    for iter in 0..MAX_ITER {
        let d_vap = density_root(model, t, p, &x, RootKind::Vapor)?;
        let d_liq = density_root(model, t, p, &x, RootKind::Liquid)?;

        if (d_liq - d_vap).abs() < 1e-4 * d_liq {
            // Roots merged: effectively at the critical point
            return Ok(PureSaturation { p, d_liq, d_vap });
        }

        let ln_phi_l = model.ln_phi(t, d_liq, &x)?[0];
        let ln_phi_v = model.ln_phi(t, d_vap, &x)?[0];
        let delta = ln_phi_l - ln_phi_v;
        trace!(iter, p, delta, "saturation sweep");

        if delta.abs() < TOL {
            return Ok(PureSaturation { p, d_liq, d_vap });
        }

        let step = delta.clamp(-2.0, 2.0);
        p *= step.exp();
        if !p.is_finite() || p <= 0.0 {
            return Err(FlashError::NonConvergence {
                what: "pure saturation pressure",
                iterations: iter,
            });
        }
    }

    Err(FlashError::NonConvergence {
        what: "pure saturation pressure",
        iterations: MAX_ITER,
    })
}

/// Saturation temperature at P for a single-component model.
///
/// Bisection on the monotone saturation-pressure curve between the triple
/// point and the critical point.
pub fn pure_saturation_temperature(
    model: &MixtureModel,
    p: f64,
) -> FlashResult<(f64, PureSaturation)> {
    debug_assert_eq!(model.n_components(), 1);
    let r = model.records()[0];
    let tc = model.t_reduce(&[1.0]);

    let mut lo = r.t_triple;
    let mut hi = tc * (1.0 - 1e-4);

    let sat_lo = pure_saturation_pressure(model, lo)?;
    if p < sat_lo.p {
        return Err(FlashError::UnreachableTarget {
            what: "pressure below the saturation range",
        });
    }
    let sat_hi = pure_saturation_pressure(model, hi)?;
    if p > sat_hi.p {
        return Err(FlashError::UnreachableTarget {
            what: "pressure above the critical pressure",
        });
    }

    let mut sat = sat_lo;
    for _ in 0..80 {
        let mid = 0.5 * (lo + hi);
        sat = pure_saturation_pressure(model, mid)?;
        if (sat.p - p).abs() <= 1e-8 * p || (hi - lo) <= 1e-10 * mid {
            return Ok((mid, sat));
        }
        if sat.p < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok((0.5 * (lo + hi), sat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_fluids::{Composition, FluidId};

    fn pure(id: FluidId) -> MixtureModel {
        MixtureModel::new(&Composition::pure(id)).unwrap()
    }

    #[test]
    fn methane_saturation_pressure_sanity() {
        let model = pure(FluidId::Methane);
        // Normal boiling point of methane is near 111.7 K at 1 atm; the
        // correlation should land within a modest band.
        let sat = pure_saturation_pressure(&model, 111.7).unwrap();
        assert!(
            sat.p > 0.5e5 && sat.p < 2.0e5,
            "psat = {} Pa at 111.7 K",
            sat.p
        );
        assert!(sat.d_liq > 10.0 * sat.d_vap);
    }

    #[test]
    fn saturation_pressure_increases_with_temperature() {
        let model = pure(FluidId::CarbonDioxide);
        let p1 = pure_saturation_pressure(&model, 230.0).unwrap().p;
        let p2 = pure_saturation_pressure(&model, 260.0).unwrap().p;
        let p3 = pure_saturation_pressure(&model, 290.0).unwrap().p;
        assert!(p1 < p2 && p2 < p3);
    }

    #[test]
    fn fugacities_equal_at_solution() {
        let model = pure(FluidId::Nitrogen);
        let t = 90.0;
        let sat = pure_saturation_pressure(&model, t).unwrap();
        let lp_l = model.ln_phi(t, sat.d_liq, &[1.0]).unwrap()[0];
        let lp_v = model.ln_phi(t, sat.d_vap, &[1.0]).unwrap()[0];
        assert_relative_eq!(lp_l, lp_v, epsilon = 1e-8);
    }

    #[test]
    fn saturation_temperature_inverts_pressure() {
        let model = pure(FluidId::CarbonDioxide);
        let sat = pure_saturation_pressure(&model, 250.0).unwrap();
        let (t_back, _) = pure_saturation_temperature(&model, sat.p).unwrap();
        assert_relative_eq!(t_back, 250.0, max_relative = 1e-5);
    }

    #[test]
    fn above_critical_is_unreachable() {
        let model = pure(FluidId::Methane);
        let err = pure_saturation_pressure(&model, 250.0).unwrap_err();
        assert!(matches!(err, FlashError::UnreachableTarget { .. }));
    }
}
