//! Flash drivers: PT primitive plus PH and TS outer solves.
//!
//! The split solver's natural inputs are (T, P); the PH and TS drivers wrap
//! it behind a bracketed 1-D root-find that reconciles the other specified
//! variable. Each solve is an explicit state machine: ideal-approximation
//! seed, bounded bracket expansion, then a secant step that falls back to
//! bisection whenever it leaves the bracket.

use crate::density::best_root;
use crate::equilibrium::{Equilibrium, PhaseLabel, PhaseSplit};
use crate::error::{FlashError, FlashResult};
use crate::saturation::{pure_saturation_pressure, pure_saturation_temperature};
use crate::split::{solve_split, SplitOutcome};
use crate::stability::{stability_test, wilson_k};
use pf_core::units::constants::R;
use pf_fluids::{FluidError, MixtureModel};
use tracing::debug;

/// Iteration caps and tolerances for a flash request.
#[derive(Debug, Clone, Copy)]
pub struct FlashOptions {
    /// Iteration cap for the split solver
    pub max_iter: usize,
    /// Convergence tolerance on K-value updates
    pub tol: f64,
}

impl Default for FlashOptions {
    fn default() -> Self {
        Self {
            max_iter: 200,
            tol: 1e-9,
        }
    }
}

const OUTER_MAX_ITER: usize = 100;
const BRACKET_EXPANSIONS: usize = 8;

/// PT flash: the primitive every other driver builds on.
pub fn pt_flash(
    model: &MixtureModel,
    t: f64,
    p: f64,
    opts: &FlashOptions,
) -> FlashResult<Equilibrium> {
    if !t.is_finite() || t <= 0.0 || !p.is_finite() || p <= 0.0 {
        return Err(FlashError::Fluid(FluidError::NonPhysical {
            what: "temperature and pressure must be positive and finite",
        }));
    }
    model.validate_range(t, p)?;

    if model.n_components() == 1 {
        return pure_pt(model, t, p);
    }

    let z = model.feed().to_vec();
    let d_feed = best_root(model, t, p, &z)?;
    let report = stability_test(model, t, p, &z, d_feed)?;

    if report.stable {
        return Ok(single_phase(model, t, p, d_feed, &z));
    }

    let k_init = report
        .trial_k
        .unwrap_or_else(|| wilson_k(model, t, p));
    match solve_split(model, t, p, &z, &k_init, opts)? {
        SplitOutcome::SinglePhase => Ok(single_phase(model, t, p, d_feed, &z)),
        SplitOutcome::TwoPhase(split) => {
            let v = split.vapor_fraction / split.d_vap
                + (1.0 - split.vapor_fraction) / split.d_liq;
            Ok(Equilibrium {
                t,
                p,
                label: PhaseLabel::TwoPhase,
                density: 1.0 / v,
                split: Some(split),
            })
        }
    }
}

/// PH flash: find T such that h(T, P) matches the target [J/mol].
pub fn ph_flash(
    model: &MixtureModel,
    p: f64,
    h_target: f64,
    opts: &FlashOptions,
) -> FlashResult<Equilibrium> {
    if !h_target.is_finite() {
        return Err(FlashError::Fluid(FluidError::NonPhysical {
            what: "target enthalpy must be finite",
        }));
    }

    // Pure fluids jump discontinuously across the saturation line; resolve
    // in-dome targets directly from the saturated states.
    if model.n_components() == 1 {
        if let Ok((t_sat, sat)) = pure_saturation_temperature(model, p) {
            let h_l = model.props(t_sat, sat.d_liq, &[1.0])?.h;
            let h_v = model.props(t_sat, sat.d_vap, &[1.0])?.h;
            if h_target >= h_l && h_target <= h_v {
                let q = (h_target - h_l) / (h_v - h_l);
                return Ok(two_phase_pure(t_sat, p, q, sat.d_liq, sat.d_vap));
            }
        }
    }

    let (t_lo_bound, t_hi_bound) = temperature_bounds(model);
    let t0 = 300.0_f64.clamp(t_lo_bound, t_hi_bound);
    let eval = |t: f64| -> FlashResult<(f64, Equilibrium)> {
        let eq = pt_flash(model, t, p, opts)?;
        let props = eq.props(model)?;
        Ok((props.h - h_target, eq))
    };

    let (f0, eq0) = eval(t0)?;
    if f0.abs() <= h_tol(h_target) {
        return Ok(eq0);
    }
    // Ideal-approximation seed for the other bracket end
    let cp_est = eq0.props(model)?.cp.unwrap_or(5.0 * R).max(2.0 * R);
    let t1 = (t0 - f0 / cp_est).clamp(t_lo_bound, t_hi_bound);

    let (mut a, mut b) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
    if (b - a).abs() < 1e-9 {
        a = (a * 0.95).max(t_lo_bound);
        b = (b * 1.05).min(t_hi_bound);
    }
    let mut fa = eval(a)?.0;
    let mut fb = eval(b)?.0;

    // h increases with T at fixed P, so expand downward when the low end is
    // still above the target, upward in the opposite case.
    for _ in 0..BRACKET_EXPANSIONS {
        if fa <= 0.0 && fb >= 0.0 {
            break;
        }
        if fa > 0.0 {
            if a <= t_lo_bound + 1e-9 {
                return Err(FlashError::UnreachableTarget { what: "enthalpy" });
            }
            a = (a * 0.8).max(t_lo_bound);
            fa = eval(a)?.0;
        } else if fb < 0.0 {
            if b >= t_hi_bound - 1e-9 {
                return Err(FlashError::UnreachableTarget { what: "enthalpy" });
            }
            b = (b * 1.25).min(t_hi_bound);
            fb = eval(b)?.0;
        }
    }
    if !(fa <= 0.0 && fb >= 0.0) {
        return Err(FlashError::UnreachableTarget { what: "enthalpy" });
    }

    debug!(a, b, "enthalpy target bracketed");
    refine_bracket(eval, a, fa, b, fb, h_tol(h_target), "PH flash temperature")
}

/// TS flash: find P such that s(T, P) matches the target [J/(mol K)].
///
/// The free variable is pressure (solved in ln P); entropy decreases
/// monotonically with pressure at fixed temperature.
pub fn ts_flash(
    model: &MixtureModel,
    t: f64,
    s_target: f64,
    opts: &FlashOptions,
) -> FlashResult<Equilibrium> {
    if !s_target.is_finite() {
        return Err(FlashError::Fluid(FluidError::NonPhysical {
            what: "target entropy must be finite",
        }));
    }

    if model.n_components() == 1 {
        if let Ok(sat) = pure_saturation_pressure(model, t) {
            let s_l = model.props(t, sat.d_liq, &[1.0])?.s;
            let s_v = model.props(t, sat.d_vap, &[1.0])?.s;
            if s_target >= s_l && s_target <= s_v {
                let q = (s_target - s_l) / (s_v - s_l);
                return Ok(two_phase_pure(t, sat.p, q, sat.d_liq, sat.d_vap));
            }
        }
    }

    let ln_p_lo = 0.0; // 1 Pa
    let ln_p_hi = (0.999
        * model
            .records()
            .iter()
            .map(|r| r.p_max)
            .fold(f64::INFINITY, f64::min))
    .ln();

    let eval = |ln_p: f64| -> FlashResult<(f64, Equilibrium)> {
        let eq = pt_flash(model, t, ln_p.exp(), opts)?;
        let props = eq.props(model)?;
        Ok((props.s - s_target, eq))
    };

    // Ideal-gas seed: s falls by R per e-fold of pressure
    let p_ref = 1e5_f64.min(ln_p_hi.exp());
    let (f_ref, eq_ref) = eval(p_ref.ln())?;
    if f_ref.abs() <= s_tol(s_target) {
        return Ok(eq_ref);
    }
    let ln_p0 = (p_ref.ln() + f_ref / R).clamp(ln_p_lo, ln_p_hi);

    // f decreases with ln P: put `a` on the high-pressure (negative) side.
    let mut a = (ln_p0 + 0.5).min(ln_p_hi);
    let mut b = (ln_p0 - 0.5).max(ln_p_lo);
    let mut fa = eval(a)?.0;
    let mut fb = eval(b)?.0;

    for _ in 0..BRACKET_EXPANSIONS {
        if fa <= 0.0 && fb >= 0.0 {
            break;
        }
        if fa > 0.0 {
            if a >= ln_p_hi - 1e-9 {
                return Err(FlashError::UnreachableTarget { what: "entropy" });
            }
            a = (a + 1.5).min(ln_p_hi);
            fa = eval(a)?.0;
        } else if fb < 0.0 {
            if b <= ln_p_lo + 1e-9 {
                return Err(FlashError::UnreachableTarget { what: "entropy" });
            }
            b = (b - 1.5).max(ln_p_lo);
            fb = eval(b)?.0;
        }
    }
    if !(fa <= 0.0 && fb >= 0.0) {
        return Err(FlashError::UnreachableTarget { what: "entropy" });
    }

    debug!(
        p_a = a.exp(),
        p_b = b.exp(),
        "entropy target bracketed"
    );
    refine_bracket(eval, a, fa, b, fb, s_tol(s_target), "TS flash pressure")
}

/// Temperature window every component's correlation covers.
fn temperature_bounds(model: &MixtureModel) -> (f64, f64) {
    let lo = model
        .records()
        .iter()
        .map(|r| r.t_triple)
        .fold(0.0, f64::max);
    let hi = model
        .records()
        .iter()
        .map(|r| r.t_max)
        .fold(f64::INFINITY, f64::min);
    (lo, hi)
}

fn h_tol(h_target: f64) -> f64 {
    (1e-9 * h_target.abs()).max(1e-6)
}

fn s_tol(s_target: f64) -> f64 {
    (1e-9 * s_target.abs()).max(1e-8)
}

/// Secant refinement inside a sign-change bracket, bisecting whenever the
/// secant proposal leaves it. `fa <= 0 <= fb`; `a` and `b` need not be
/// ordered.
fn refine_bracket<F>(
    mut eval: F,
    mut a: f64,
    mut fa: f64,
    mut b: f64,
    mut fb: f64,
    f_tol: f64,
    what: &'static str,
) -> FlashResult<Equilibrium>
where
    F: FnMut(f64) -> FlashResult<(f64, Equilibrium)>,
{
    let mut best: Option<Equilibrium> = None;
    for _ in 0..OUTER_MAX_ITER {
        let mid = 0.5 * (a + b);
        if (b - a).abs() <= 1e-10 * mid.abs().max(1.0) {
            if let Some(eq) = best {
                return Ok(eq);
            }
        }

        let mut u = if fb != fa {
            b - fb * (b - a) / (fb - fa)
        } else {
            mid
        };
        let lo = a.min(b);
        let hi = a.max(b);
        if !(u.is_finite() && u > lo && u < hi) {
            u = mid;
        }

        let (fu, eq) = eval(u)?;
        if fu.abs() <= f_tol {
            return Ok(eq);
        }
        best = Some(eq);
        if fu < 0.0 {
            a = u;
            fa = fu;
        } else {
            b = u;
            fb = fu;
        }
    }
    Err(FlashError::NonConvergence {
        what,
        iterations: OUTER_MAX_ITER,
    })
}

/// Shared single-phase assembly with the label heuristic.
fn single_phase(model: &MixtureModel, t: f64, p: f64, d: f64, x: &[f64]) -> Equilibrium {
    let t_r = model.t_reduce(x);
    let p_c = model.p_crit_mix(x);
    let label = if t > t_r && p > p_c {
        PhaseLabel::Supercritical
    } else if t > t_r {
        PhaseLabel::Vapor
    } else if d > model.rho_reduce(x) {
        PhaseLabel::Liquid
    } else {
        PhaseLabel::Vapor
    };
    Equilibrium {
        t,
        p,
        label,
        split: None,
        density: d,
    }
}

fn two_phase_pure(t: f64, p: f64, q: f64, d_liq: f64, d_vap: f64) -> Equilibrium {
    let v = q / d_vap + (1.0 - q) / d_liq;
    Equilibrium {
        t,
        p,
        label: PhaseLabel::TwoPhase,
        density: 1.0 / v,
        split: Some(PhaseSplit {
            vapor_fraction: q,
            x: vec![1.0],
            y: vec![1.0],
            d_liq,
            d_vap,
        }),
    }
}

/// Pure-component PT flash: saturation lookup instead of a stability test.
fn pure_pt(model: &MixtureModel, t: f64, p: f64) -> FlashResult<Equilibrium> {
    let x = [1.0];
    let tc = model.t_reduce(&x);
    if t >= tc {
        let d = best_root(model, t, p, &x)?;
        return Ok(single_phase(model, t, p, d, &x));
    }

    let sat = pure_saturation_pressure(model, t)?;
    let d = if p >= sat.p {
        crate::density::density_root(model, t, p, &x, crate::density::RootKind::Liquid)?
    } else {
        crate::density::density_root(model, t, p, &x, crate::density::RootKind::Vapor)?
    };
    let label = if p >= sat.p {
        PhaseLabel::Liquid
    } else {
        PhaseLabel::Vapor
    };
    Ok(Equilibrium {
        t,
        p,
        label,
        split: None,
        density: d,
    })
}
