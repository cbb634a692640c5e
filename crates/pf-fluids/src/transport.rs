//! Transport-property oracles.
//!
//! Dilute-gas viscosity from the Chapman-Enskog expression with the Neufeld
//! collision-integral fit, thermal conductivity from the modified Eucken
//! relation, and an exponential reduced-density correction for the dense
//! fluid. These are invoked as correlations by the flash layer; their
//! derivation is outside this crate.

use crate::error::FluidResult;
use crate::helmholtz;
use crate::mixture::MixtureModel;
use pf_core::units::constants::R;

/// Collision integral Omega_v(T*) (Neufeld et al. fit).
fn collision_integral(t_star: f64) -> f64 {
    1.16145 * t_star.powf(-0.14874)
        + 0.52487 * (-0.77320 * t_star).exp()
        + 2.16178 * (-2.43787 * t_star).exp()
}

/// Dilute-gas viscosity of one component [Pa s].
fn eta_dilute(sigma: f64, epsilon: f64, molar_mass: f64, t: f64) -> f64 {
    let t_star = t / epsilon;
    let m_g_mol = molar_mass * 1e3;
    2.6693e-6 * (m_g_mol * t).sqrt() / (sigma * sigma * collision_integral(t_star))
}

/// Mixture viscosity [Pa s] at (T, d, x).
///
/// Dilute contributions combine with the Herning-Zipperer square-root-mass
/// rule; the density correction uses the reduced density of the mixture.
pub fn viscosity(model: &MixtureModel, t: f64, d: f64, x: &[f64]) -> FluidResult<f64> {
    let mut num = 0.0;
    let mut den = 0.0;
    for (xi, r) in x.iter().zip(model.records()) {
        if *xi > 0.0 {
            let wt = xi * (r.molar_mass * 1e3).sqrt();
            num += wt * eta_dilute(r.lj_sigma, r.lj_epsilon, r.molar_mass, t);
            den += wt;
        }
    }
    let eta0 = num / den;

    let delta = d / model.rho_reduce(x);
    Ok(eta0 * (0.8 * delta.powf(1.5)).exp())
}

/// Mixture thermal conductivity [W/(m K)] at (T, d, x).
pub fn thermal_conductivity(model: &MixtureModel, t: f64, d: f64, x: &[f64]) -> FluidResult<f64> {
    let mut num = 0.0;
    let mut den = 0.0;
    for (xi, r) in x.iter().zip(model.records()) {
        if *xi > 0.0 {
            let eta0 = eta_dilute(r.lj_sigma, r.lj_epsilon, r.molar_mass, t);
            // Modified Eucken factor for a polyatomic dilute gas
            let lambda0 = eta0 * (helmholtz::cp0(r, t) + 1.25 * R) / r.molar_mass;
            let wt = xi * (r.molar_mass * 1e3).sqrt();
            num += wt * lambda0;
            den += wt;
        }
    }
    let lambda0 = num / den;

    let delta = d / model.rho_reduce(x);
    Ok(lambda0 * (1.0 + 0.4 * delta * delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Composition;
    use crate::fluid::FluidId;

    #[test]
    fn dilute_nitrogen_viscosity_magnitude() {
        let comp = Composition::pure(FluidId::Nitrogen);
        let model = MixtureModel::new(&comp).unwrap();
        // Near-ambient dilute gas: tens of µPa·s
        let eta = viscosity(&model, 300.0, 40.0, &[1.0]).unwrap();
        assert!(eta > 5e-6 && eta < 5e-5, "eta = {eta}");
    }

    #[test]
    fn viscosity_grows_with_density() {
        let comp = Composition::pure(FluidId::CarbonDioxide);
        let model = MixtureModel::new(&comp).unwrap();
        let dilute = viscosity(&model, 300.0, 50.0, &[1.0]).unwrap();
        let dense = viscosity(&model, 300.0, 15_000.0, &[1.0]).unwrap();
        assert!(dense > dilute);
    }

    #[test]
    fn conductivity_positive_for_mixture() {
        let comp = Composition::new(vec![
            (FluidId::CarbonDioxide, 0.7),
            (FluidId::Nitrogen, 0.3),
        ])
        .unwrap();
        let model = MixtureModel::new(&comp).unwrap();
        let lam = thermal_conductivity(&model, 280.0, 500.0, &[0.7, 0.3]).unwrap();
        assert!(lam > 0.0 && lam.is_finite());
    }
}
