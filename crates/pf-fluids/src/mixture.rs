//! Read-only mixture model.
//!
//! Built once per request from a resolved composition; safely shared across
//! concurrent flash evaluations. All methods are pure functions of
//! temperature [K], molar density [mol/m3], and a mole-fraction slice of the
//! same length and ordering as the feed.

use crate::composition::Composition;
use crate::data::{self, FluidRecord};
use crate::error::{FluidError, FluidResult};
use crate::fluid::FluidId;
use crate::helmholtz::{self, HelmholtzDerivs};
use pf_core::units::constants::R;

/// Derived molar properties at a resolved (T, d, x) state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermoProps {
    /// Pressure [Pa]
    pub p: f64,
    /// Compressibility factor [-]
    pub z: f64,
    /// Molar enthalpy [J/mol]
    pub h: f64,
    /// Molar entropy [J/(mol K)]
    pub s: f64,
    /// Molar internal energy [J/mol]
    pub u: f64,
    /// Isobaric molar heat capacity [J/(mol K)]
    pub cp: f64,
    /// Isochoric molar heat capacity [J/(mol K)]
    pub cv: f64,
    /// Speed of sound [m/s]
    pub w: f64,
    /// Joule-Thomson coefficient [K/Pa]
    pub joule_thomson: f64,
    /// Isothermal compressibility [1/Pa]
    pub kappa_t: f64,
    /// Volume expansivity [1/K]
    pub beta_v: f64,
}

/// Resolved composition plus per-component records and binary parameters.
///
/// Immutable after construction; `Send + Sync` so the grid evaluator can
/// share it across its worker pool by reference.
#[derive(Debug, Clone)]
pub struct MixtureModel {
    fluids: Vec<FluidId>,
    records: Vec<&'static FluidRecord>,
    feed: Vec<f64>,
    /// Pairwise reducing-temperature products (1 - kt_ij) sqrt(Tci Tcj)
    tt: Vec<f64>,
    /// Pairwise reducing volumes (vci^(1/3) + vcj^(1/3))^3 / 8
    vv: Vec<f64>,
}

impl MixtureModel {
    pub fn new(composition: &Composition) -> FluidResult<Self> {
        if composition.is_empty() {
            return Err(FluidError::InvalidComposition {
                what: "empty composition".into(),
            });
        }
        let fluids = composition.fluids();
        let records: Vec<&'static FluidRecord> =
            fluids.iter().map(|id| data::record(*id)).collect();
        let n = fluids.len();

        let mut tt = vec![0.0; n * n];
        let mut vv = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let kt = data::binary_kt(fluids[i], fluids[j]);
                tt[i * n + j] = (1.0 - kt) * (records[i].t_crit * records[j].t_crit).sqrt();
                let vci = 1.0 / records[i].rho_crit;
                let vcj = 1.0 / records[j].rho_crit;
                let cube = vci.cbrt() + vcj.cbrt();
                vv[i * n + j] = cube * cube * cube / 8.0;
            }
        }

        Ok(Self {
            fluids,
            records,
            feed: composition.fractions(),
            tt,
            vv,
        })
    }

    pub fn n_components(&self) -> usize {
        self.fluids.len()
    }

    pub fn fluids(&self) -> &[FluidId] {
        &self.fluids
    }

    pub fn records(&self) -> &[&'static FluidRecord] {
        &self.records
    }

    /// Feed mole fractions.
    pub fn feed(&self) -> &[f64] {
        &self.feed
    }

    /// Molar mass of a phase composition [kg/mol].
    pub fn molar_mass(&self, x: &[f64]) -> f64 {
        x.iter()
            .zip(&self.records)
            .map(|(xi, r)| xi * r.molar_mass)
            .sum()
    }

    /// Reducing temperature [K] for a phase composition.
    pub fn t_reduce(&self, x: &[f64]) -> f64 {
        let n = self.fluids.len();
        let mut tr = 0.0;
        for i in 0..n {
            for j in 0..n {
                tr += x[i] * x[j] * self.tt[i * n + j];
            }
        }
        tr
    }

    /// Reducing molar volume [m3/mol] for a phase composition.
    fn v_reduce(&self, x: &[f64]) -> f64 {
        let n = self.fluids.len();
        let mut vr = 0.0;
        for i in 0..n {
            for j in 0..n {
                vr += x[i] * x[j] * self.vv[i * n + j];
            }
        }
        vr
    }

    /// Reducing molar density [mol/m3] for a phase composition.
    pub fn rho_reduce(&self, x: &[f64]) -> f64 {
        1.0 / self.v_reduce(x)
    }

    /// Pseudo-critical pressure [Pa]: mole-fraction weighted.
    pub fn p_crit_mix(&self, x: &[f64]) -> f64 {
        x.iter()
            .zip(&self.records)
            .map(|(xi, r)| xi * r.p_crit)
            .sum()
    }

    /// Check (T, P) against every component's valid range.
    pub fn validate_range(&self, t: f64, p: f64) -> FluidResult<()> {
        for r in &self.records {
            if t < r.t_triple || t > r.t_max {
                return Err(FluidError::OutOfRange {
                    what: "temperature",
                    fluid: r.id.key(),
                    value: t,
                });
            }
            if p > r.p_max {
                return Err(FluidError::OutOfRange {
                    what: "pressure",
                    fluid: r.id.key(),
                    value: p,
                });
            }
        }
        Ok(())
    }

    fn check_state(&self, t: f64, d: f64, x: &[f64]) -> FluidResult<()> {
        if x.len() != self.fluids.len() || x.is_empty() {
            return Err(FluidError::InvalidComposition {
                what: "phase composition length does not match feed".into(),
            });
        }
        let sum: f64 = x.iter().sum();
        if (sum - 1.0).abs() > 1e-8 {
            return Err(FluidError::InvalidComposition {
                what: format!("phase mole fractions sum to {sum}"),
            });
        }
        if !t.is_finite() || t <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if !d.is_finite() || d <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Residual reduced Helmholtz energy and derivatives at (T, d, x).
    ///
    /// This is the single numerical kernel every higher layer calls; all
    /// derived properties follow from it via standard relations.
    pub fn residual_helmholtz(&self, t: f64, d: f64, x: &[f64]) -> FluidResult<HelmholtzDerivs> {
        self.check_state(t, d, x)?;
        let (delta, tau) = self.reduced_coords(t, d, x);
        let mut out = HelmholtzDerivs::default();
        for (xi, r) in x.iter().zip(&self.records) {
            if *xi > 0.0 {
                out.add_scaled(&helmholtz::component_residual(r, delta, tau), *xi);
            }
        }
        Ok(out)
    }

    /// Reduced coordinates (delta, tau) for a state.
    pub fn reduced_coords(&self, t: f64, d: f64, x: &[f64]) -> (f64, f64) {
        (d * self.v_reduce(x), self.t_reduce(x) / t)
    }

    /// Pressure [Pa] at (T, d, x).
    pub fn pressure(&self, t: f64, d: f64, x: &[f64]) -> FluidResult<f64> {
        let ar = self.residual_helmholtz(t, d, x)?;
        let (delta, _) = self.reduced_coords(t, d, x);
        Ok(d * R * t * (1.0 + delta * ar.a_d))
    }

    /// Pressure derivative with respect to molar density [(Pa m3)/mol].
    pub fn dp_dd(&self, t: f64, d: f64, x: &[f64]) -> FluidResult<f64> {
        let ar = self.residual_helmholtz(t, d, x)?;
        let (delta, _) = self.reduced_coords(t, d, x);
        Ok(R * t * (1.0 + 2.0 * delta * ar.a_d + delta * delta * ar.a_dd))
    }

    /// Log fugacity coefficients of every component at (T, d, x).
    ///
    /// The caller supplies the phase density root; `ln phi_i` combines the
    /// mixture residual with the composition derivatives of the reducing
    /// functions.
    pub fn ln_phi(&self, t: f64, d: f64, x: &[f64]) -> FluidResult<Vec<f64>> {
        self.check_state(t, d, x)?;
        let n = self.fluids.len();
        let tr = self.t_reduce(x);
        let vr = self.v_reduce(x);
        let delta = d * vr;
        let tau = tr / t;

        let mut ar = HelmholtzDerivs::default();
        let mut comp = Vec::with_capacity(n);
        for (xi, r) in x.iter().zip(&self.records) {
            let ci = helmholtz::component_residual(r, delta, tau);
            ar.add_scaled(&ci, *xi);
            comp.push(ci);
        }

        let z = 1.0 + delta * ar.a_d;
        if z <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "compressibility factor at requested density",
            });
        }
        let ln_z = z.ln();

        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let mut tr_xi = 0.0;
            let mut vr_xi = 0.0;
            for j in 0..n {
                tr_xi += x[j] * self.tt[i * n + j];
                vr_xi += x[j] * self.vv[i * n + j];
            }
            // Constrained composition derivatives of the reducing functions
            let dt_i = 2.0 * tr_xi - 2.0 * tr;
            let dv_i = 2.0 * vr_xi - 2.0 * vr;

            let ln_phi = delta * ar.a_d * (1.0 + dv_i / vr) + tau * ar.a_t * (dt_i / tr)
                + comp[i].a
                - ln_z;
            out.push(ln_phi);
        }
        Ok(out)
    }

    /// All derived molar properties at (T, d, x).
    pub fn props(&self, t: f64, d: f64, x: &[f64]) -> FluidResult<ThermoProps> {
        let ar = self.residual_helmholtz(t, d, x)?;
        let (delta, tau) = self.reduced_coords(t, d, x);

        let z = 1.0 + delta * ar.a_d;
        let p = d * R * t * z;

        // Ideal-gas contributions
        let mut h0 = 0.0;
        let mut s0_t = 0.0;
        let mut cp0 = 0.0;
        let mut s_mix = 0.0;
        for (xi, r) in x.iter().zip(&self.records) {
            if *xi > 0.0 {
                h0 += xi * helmholtz::h_ideal(r, t);
                s0_t += xi * helmholtz::s_ideal_t(r, t);
                cp0 += xi * helmholtz::cp0(r, t);
                s_mix -= xi * xi.ln() * R;
            }
        }
        let s0 = s0_t - R * (d / helmholtz::d_ref()).ln() + s_mix;

        let h = h0 + R * t * (tau * ar.a_t + delta * ar.a_d);
        let s = s0 + R * (tau * ar.a_t - ar.a);
        let u = h - p / d;

        let cv = (cp0 - R) - R * tau * tau * ar.a_tt;
        let dp_dd_red = 1.0 + 2.0 * delta * ar.a_d + delta * delta * ar.a_dd;
        let dp_dt_red = 1.0 + delta * ar.a_d - delta * tau * ar.a_dt;
        let cp = cv + R * dp_dt_red * dp_dt_red / dp_dd_red.max(1e-12);

        let m = self.molar_mass(x);
        let w_sq = (R * t / m) * (dp_dd_red + dp_dt_red * dp_dt_red * R / cv.max(1e-12));
        let w = w_sq.max(0.0).sqrt();

        let dp_dd = R * t * dp_dd_red;
        let dp_dt = d * R * dp_dt_red;
        let kappa_t = 1.0 / (d * dp_dd).max(1e-30);
        let beta_v = dp_dt / (d * dp_dd).max(1e-30);
        let joule_thomson = (t * beta_v - 1.0) / (d * cp.max(1e-12));

        Ok(ThermoProps {
            p,
            z,
            h,
            s,
            u,
            cp,
            cv,
            w,
            joule_thomson,
            kappa_t,
            beta_v,
        })
    }
}
