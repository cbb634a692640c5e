//! Resolved phase-equilibrium states.

use crate::error::FlashResult;
use pf_fluids::MixtureModel;

/// Phase tag of a resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseLabel {
    Vapor,
    Liquid,
    Supercritical,
    TwoPhase,
}

impl PhaseLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseLabel::Vapor => "vapor",
            PhaseLabel::Liquid => "liquid",
            PhaseLabel::Supercritical => "supercritical",
            PhaseLabel::TwoPhase => "two-phase",
        }
    }
}

/// Vapor-liquid split of a two-phase state.
///
/// Invariants maintained by the split solver: `vapor_fraction` in [0, 1] and
/// `q*y + (1-q)*x` reproduces the feed within solver tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSplit {
    /// Vapor mole fraction of the feed
    pub vapor_fraction: f64,
    /// Liquid-phase mole fractions
    pub x: Vec<f64>,
    /// Vapor-phase mole fractions
    pub y: Vec<f64>,
    /// Liquid molar density [mol/m3]
    pub d_liq: f64,
    /// Vapor molar density [mol/m3]
    pub d_vap: f64,
}

/// A resolved equilibrium state at (T, P) for the feed composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Equilibrium {
    /// Temperature [K]
    pub t: f64,
    /// Pressure [Pa]
    pub p: f64,
    pub label: PhaseLabel,
    /// Present exactly when `label == TwoPhase`
    pub split: Option<PhaseSplit>,
    /// Bulk molar density [mol/m3]
    pub density: f64,
}

/// Molar properties of a resolved equilibrium.
///
/// Properties without a meaning in the two-phase region (heat capacities,
/// sound speed, the pressure/temperature derivatives) are `None` there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumProps {
    /// Bulk molar enthalpy [J/mol]
    pub h: f64,
    /// Bulk molar entropy [J/(mol K)]
    pub s: f64,
    /// Bulk molar internal energy [J/mol]
    pub u: f64,
    /// Bulk molar density [mol/m3]
    pub d: f64,
    pub cp: Option<f64>,
    pub cv: Option<f64>,
    /// Speed of sound [m/s]
    pub w: Option<f64>,
    /// Joule-Thomson coefficient [K/Pa]
    pub joule_thomson: Option<f64>,
    /// Isothermal compressibility [1/Pa]
    pub kappa_t: Option<f64>,
    /// Volume expansivity [1/K]
    pub beta_v: Option<f64>,
    /// Compressibility factor of the bulk [-]
    pub z: f64,
}

impl Equilibrium {
    /// Evaluate the molar properties of this state.
    pub fn props(&self, model: &MixtureModel) -> FlashResult<EquilibriumProps> {
        match &self.split {
            None => {
                let x = model.feed().to_vec();
                let tp = model.props(self.t, self.density, &x)?;
                Ok(EquilibriumProps {
                    h: tp.h,
                    s: tp.s,
                    u: tp.u,
                    d: self.density,
                    cp: Some(tp.cp),
                    cv: Some(tp.cv),
                    w: Some(tp.w),
                    joule_thomson: Some(tp.joule_thomson),
                    kappa_t: Some(tp.kappa_t),
                    beta_v: Some(tp.beta_v),
                    z: tp.z,
                })
            }
            Some(split) => {
                let q = split.vapor_fraction;
                let liq = model.props(self.t, split.d_liq, &split.x)?;
                let vap = model.props(self.t, split.d_vap, &split.y)?;
                let h = q * vap.h + (1.0 - q) * liq.h;
                let s = q * vap.s + (1.0 - q) * liq.s;
                let u = q * vap.u + (1.0 - q) * liq.u;
                let v = q / split.d_vap + (1.0 - q) / split.d_liq;
                let d = 1.0 / v;
                let z = self.p / (d * pf_core::units::constants::R * self.t);
                Ok(EquilibriumProps {
                    h,
                    s,
                    u,
                    d,
                    cp: None,
                    cv: None,
                    w: None,
                    joule_thomson: None,
                    kappa_t: None,
                    beta_v: None,
                    z,
                })
            }
        }
    }
}
