//! Multiparameter Helmholtz-energy kernel.
//!
//! Residual reduced Helmholtz energy `alpha_r(delta, tau)` and its partial
//! derivatives, from a 12-term technical correlation (six polynomial and six
//! exponential terms in reduced density delta and inverse reduced temperature
//! tau) with a corresponding-states acentric-factor correction. Ideal-gas
//! contributions come from the per-fluid cp0 polynomials in the data bank.

use crate::data::FluidRecord;
use pf_core::units::constants::{P_ATM, R};

/// Reduced residual Helmholtz energy and partial derivatives.
///
/// `a_d` is d(alpha)/d(delta), `a_t` is d(alpha)/d(tau), and so on; nothing
/// is premultiplied by delta or tau.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HelmholtzDerivs {
    pub a: f64,
    pub a_d: f64,
    pub a_dd: f64,
    pub a_t: f64,
    pub a_tt: f64,
    pub a_dt: f64,
}

impl HelmholtzDerivs {
    pub fn add_scaled(&mut self, other: &HelmholtzDerivs, w: f64) {
        self.a += w * other.a;
        self.a_d += w * other.a_d;
        self.a_dd += w * other.a_dd;
        self.a_t += w * other.a_t;
        self.a_tt += w * other.a_tt;
        self.a_dt += w * other.a_dt;
    }
}

/// Coefficients of the reference residual correlation.
const N: [f64; 12] = [
    0.892_696_76,
    -2.543_828_2,
    0.649_809_78,
    0.020_793_471,
    0.070_189_104,
    0.000_237_003_78,
    0.166_533_34,
    -0.048_556_37,
    -0.179_227_53,
    -0.068_456_134,
    -0.022_978_207,
    -0.010_788_107,
];
const D: [i32; 12] = [1, 1, 1, 2, 3, 7, 2, 5, 1, 4, 3, 4];
const T: [f64; 12] = [
    0.25, 1.125, 1.5, 1.375, 0.25, 0.875, 0.625, 1.75, 3.625, 3.625, 14.5, 12.0,
];
const C: [i32; 12] = [0, 0, 0, 0, 0, 0, 1, 1, 2, 2, 3, 3];

/// Acentric factor of the reference parameterization.
pub const OMEGA_REF: f64 = 0.011_42;

/// Slope of the acentric vapor-pressure correction.
const OMEGA_SLOPE: f64 = 0.96;

/// Evaluate the reference residual correlation at (delta, tau).
pub fn reference_residual(delta: f64, tau: f64) -> HelmholtzDerivs {
    let mut out = HelmholtzDerivs::default();
    for i in 0..12 {
        let n = N[i];
        let d = D[i];
        let t = T[i];
        let c = C[i];

        let tau_t = tau.powf(t);
        let del_d = delta.powi(d);
        let df = d as f64;

        if c == 0 {
            let a = n * del_d * tau_t;
            out.a += a;
            out.a_d += a * df / delta;
            out.a_dd += a * df * (df - 1.0) / (delta * delta);
            out.a_t += a * t / tau;
            out.a_tt += a * t * (t - 1.0) / (tau * tau);
            out.a_dt += a * df * t / (delta * tau);
        } else {
            let cf = c as f64;
            let del_c = delta.powi(c);
            let e = (-del_c).exp();
            let a = n * del_d * tau_t * e;
            // d/d(delta) brings down (d - c*delta^c)/delta
            let g = df - cf * del_c;
            out.a += a;
            out.a_d += a * g / delta;
            out.a_dd += a * (g * (g - 1.0) - cf * cf * del_c) / (delta * delta);
            out.a_t += a * t / tau;
            out.a_tt += a * t * (t - 1.0) / (tau * tau);
            out.a_dt += a * g * t / (delta * tau);
        }
    }
    out
}

/// Acentric-factor correction, per unit of (omega - OMEGA_REF).
///
/// A delta-linear (second-virial-like) term whose temperature slope is
/// calibrated so the vapor-pressure curve steepens with acentric factor the
/// way the defining relation at Tr = 0.7 requires. Vanishes at tau = 1 so
/// the critical parameters of the reference correlation are preserved.
pub fn acentric_correction(delta: f64, tau: f64) -> HelmholtzDerivs {
    let b = -OMEGA_SLOPE * (tau - 1.0);
    HelmholtzDerivs {
        a: b * delta,
        a_d: b,
        a_dd: 0.0,
        a_t: -OMEGA_SLOPE * delta,
        a_tt: 0.0,
        a_dt: -OMEGA_SLOPE,
    }
}

/// Residual contribution of one component evaluated at mixture (delta, tau).
pub fn component_residual(record: &FluidRecord, delta: f64, tau: f64) -> HelmholtzDerivs {
    let mut out = reference_residual(delta, tau);
    let corr = acentric_correction(delta, tau);
    out.add_scaled(&corr, record.acentric - OMEGA_REF);
    out
}

/// Reference temperature for the ideal-gas caloric datum [K].
pub const T_REF: f64 = 298.15;

/// Ideal-gas reference density at (T_REF, 1 atm) [mol/m3].
pub fn d_ref() -> f64 {
    P_ATM / (R * T_REF)
}

/// Ideal-gas isobaric heat capacity [J/(mol K)].
pub fn cp0(record: &FluidRecord, t: f64) -> f64 {
    let [c0, c1, c2] = record.cp0;
    R * (c0 + c1 * t + c2 * t * t)
}

/// Ideal-gas enthalpy relative to the T_REF datum [J/mol].
pub fn h_ideal(record: &FluidRecord, t: f64) -> f64 {
    let [c0, c1, c2] = record.cp0;
    R * (c0 * (t - T_REF)
        + c1 / 2.0 * (t * t - T_REF * T_REF)
        + c2 / 3.0 * (t * t * t - T_REF * T_REF * T_REF))
}

/// Temperature part of the ideal-gas entropy relative to the datum
/// [J/(mol K)]; the density part `-R ln(d/d_ref)` is added by the caller.
pub fn s_ideal_t(record: &FluidRecord, t: f64) -> f64 {
    let [c0, c1, c2] = record.cp0;
    R * (c0 * (t / T_REF).ln() + c1 * (t - T_REF) + c2 / 2.0 * (t * t - T_REF * T_REF))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Central finite differences agree with the analytic derivatives.
    #[test]
    fn reference_derivatives_consistent() {
        let delta = 1.7;
        let tau = 1.3;
        let eps = 1e-6;

        let f = reference_residual(delta, tau);
        let fp = reference_residual(delta + eps, tau);
        let fm = reference_residual(delta - eps, tau);
        assert_relative_eq!(f.a_d, (fp.a - fm.a) / (2.0 * eps), max_relative = 1e-6);
        assert_relative_eq!(f.a_dd, (fp.a_d - fm.a_d) / (2.0 * eps), max_relative = 1e-6);
        assert_relative_eq!(f.a_dt, (fp.a_t - fm.a_t) / (2.0 * eps), max_relative = 1e-6);

        let gp = reference_residual(delta, tau + eps);
        let gm = reference_residual(delta, tau - eps);
        assert_relative_eq!(f.a_t, (gp.a - gm.a) / (2.0 * eps), max_relative = 1e-6);
        assert_relative_eq!(f.a_tt, (gp.a_t - gm.a_t) / (2.0 * eps), max_relative = 1e-6);
    }

    /// alpha_r vanishes in the zero-density limit.
    #[test]
    fn ideal_gas_limit() {
        let f = reference_residual(1e-12, 1.2);
        assert!(f.a.abs() < 1e-10);
        // Z -> 1 as delta -> 0
        assert!((1e-12 * f.a_d).abs() < 1e-10);
    }

    /// The correction vanishes at tau = 1 so the critical point of the
    /// reference correlation is untouched.
    #[test]
    fn acentric_correction_vanishes_at_critical_temperature() {
        let c = acentric_correction(2.0, 1.0);
        assert_eq!(c.a, 0.0);
        assert_eq!(c.a_d, 0.0);
    }

    #[test]
    fn cp0_matches_data_bank_polynomial() {
        let rec = crate::data::record(crate::fluid::FluidId::Argon);
        // Monatomic: cp0 = 2.5 R at any temperature
        assert_relative_eq!(cp0(rec, 150.0), 2.5 * R, max_relative = 1e-12);
        assert_relative_eq!(cp0(rec, 1000.0), 2.5 * R, max_relative = 1e-12);
    }

    #[test]
    fn ideal_enthalpy_is_cp_integral() {
        let rec = crate::data::record(crate::fluid::FluidId::Nitrogen);
        let t = 350.0;
        let eps = 1e-3;
        let dh_dt = (h_ideal(rec, t + eps) - h_ideal(rec, t - eps)) / (2.0 * eps);
        assert_relative_eq!(dh_dt, cp0(rec, t), max_relative = 1e-6);
        assert_eq!(h_ideal(rec, T_REF), 0.0);
    }
}
