//! Saturation-curve tracing by pseudo-arclength continuation.
//!
//! The saturation system is solved in u = (ln K_1 .. ln K_N, ln T, ln P):
//! equal-fugacity equations for every component between the feed-side phase
//! and the incipient phase, the Rachford-Rice closure specialized to
//! vapor_fraction 0 (bubble) or 1 (dew), and one specification equation.
//! The first two points pin ln P; after that the specification is the
//! hyperplane orthogonal to the secant tangent at the predicted arclength
//! step. The corrector is damped Newton with a finite-difference Jacobian;
//! on divergence the step halves a bounded number of times before the trace
//! ends with a truncation marker.

use crate::error::{EnvelopeError, EnvelopeResult};
use nalgebra::{DMatrix, DVector};
use pf_flash::{density_root, pure_saturation_pressure, wilson_k, RootKind};
use pf_fluids::MixtureModel;
use tracing::{debug, trace, warn};

/// Which side of the two-phase dome the trace follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveBranch {
    /// vapor_fraction = 0: feed is saturated liquid
    Bubble,
    /// vapor_fraction = 1: feed is saturated vapor
    Dew,
}

impl CurveBranch {
    pub fn vapor_fraction(&self) -> f64 {
        match self {
            CurveBranch::Bubble => 0.0,
            CurveBranch::Dew => 1.0,
        }
    }
}

/// Continuation controls.
#[derive(Debug, Clone, Copy)]
pub struct TraceOptions {
    /// Temperature window [K]
    pub t_range: (f64, f64),
    /// Pressure window [Pa]
    pub p_range: (f64, f64),
    pub max_points: usize,
    /// Initial pseudo-arclength step in u-space
    pub step_init: f64,
    pub step_min: f64,
    pub step_max: f64,
    pub max_newton: usize,
    pub newton_tol: f64,
    /// Step-halving retries before the trace truncates
    pub max_retries: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            t_range: (90.0, 700.0),
            p_range: (5.0e4, 2.0e7),
            max_points: 200,
            step_init: 0.05,
            step_min: 1e-4,
            step_max: 0.3,
            max_newton: 20,
            newton_tol: 1e-9,
            max_retries: 5,
        }
    }
}

/// One saturation point on a traced curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePoint {
    /// Temperature [K]
    pub t: f64,
    /// Pressure [Pa]
    pub p: f64,
    /// 0 on the bubble branch, 1 on the dew branch
    pub vapor_fraction: f64,
    /// Molar enthalpy of the saturated feed phase [J/mol]
    pub h: f64,
    /// Cumulative arclength from the seed point (u-space norm)
    pub arclength: f64,
}

/// A traced saturation curve, ordered by arclength.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeCurve {
    pub branch: CurveBranch,
    pub points: Vec<EnvelopePoint>,
    /// The corrector diverged repeatedly; the curve is a valid prefix
    pub truncated: bool,
    /// The trace ended because the K-values collapsed toward unity
    pub reached_critical: bool,
}

/// Trace the saturation curve of the feed composition in PT space.
pub fn trace_envelope(
    model: &MixtureModel,
    branch: CurveBranch,
    opts: &TraceOptions,
) -> EnvelopeResult<EnvelopeCurve> {
    if model.n_components() == 1 {
        return trace_pure(model, branch, opts);
    }

    let n = model.n_components();
    let dim = n + 2;

    // Seed at the low-pressure end of the window
    let p0 = opts.p_range.0;
    let t0 = seed_temperature(model, branch, p0, opts)?;
    let k0 = wilson_k(model, t0, p0);
    let mut u = DVector::from_fn(dim, |i, _| {
        if i < n {
            k0[i].max(1e-12).ln()
        } else if i == n {
            t0.ln()
        } else {
            p0.ln()
        }
    });

    // Correct the seed with ln P pinned
    let spec = |u: &DVector<f64>| u[n + 1] - p0.ln();
    if !newton_correct(model, branch, &mut u, &spec, opts) {
        return Err(EnvelopeError::SeedNotFound);
    }

    let mut points = Vec::with_capacity(opts.max_points);
    points.push(point_from_state(model, branch, &u, 0.0)?);

    // Second point: small pressure push, warm-started, gives the secant
    let p1 = p0 * 1.05;
    let mut u_prev = u.clone();
    let spec1 = |u: &DVector<f64>| u[n + 1] - p1.ln();
    if !newton_correct(model, branch, &mut u, &spec1, opts) {
        warn!("envelope stalled after the seed point");
        return Ok(EnvelopeCurve {
            branch,
            points,
            truncated: true,
            reached_critical: false,
        });
    }
    let mut arclength = (&u - &u_prev).norm();
    points.push(point_from_state(model, branch, &u, arclength)?);

    let mut step = opts.step_init;
    let mut truncated = false;
    let mut reached_critical = false;

    while points.len() < opts.max_points {
        let tangent = {
            let mut t = &u - &u_prev;
            let norm = t.norm();
            if norm < 1e-14 {
                truncated = true;
                break;
            }
            t /= norm;
            t
        };

        let mut accepted = false;
        for _retry in 0..=opts.max_retries {
            let u_pred = &u + &tangent * step;
            let mut u_try = u_pred.clone();
            let spec_plane =
                |v: &DVector<f64>| (v - &u_pred).dot(&tangent);
            let (ok, iters) = newton_correct_counted(model, branch, &mut u_try, &spec_plane, opts);
            if ok {
                u_prev = u.clone();
                u = u_try;
                arclength += (&u - &u_prev).norm();
                accepted = true;
                // Adapt the step to corrector effort
                if iters <= 3 {
                    step = (step * 1.3).min(opts.step_max);
                } else if iters >= 8 {
                    step = (step * 0.6).max(opts.step_min);
                }
                break;
            }
            if step <= opts.step_min {
                break;
            }
            step = (step * 0.5).max(opts.step_min);
            trace!(step, "corrector diverged, halving step");
        }
        if !accepted {
            debug!(points = points.len(), "envelope truncated");
            truncated = true;
            break;
        }

        let t_now = u[n].exp();
        let p_now = u[n + 1].exp();
        if t_now < opts.t_range.0
            || t_now > opts.t_range.1
            || p_now < opts.p_range.0 * 0.999
            || p_now > opts.p_range.1
        {
            debug!(t_now, p_now, "envelope left the requested window");
            break;
        }

        points.push(point_from_state(model, branch, &u, arclength)?);

        let max_ln_k = (0..n).map(|i| u[i].abs()).fold(0.0, f64::max);
        if max_ln_k < 0.01 {
            debug!(t_now, p_now, "K-values collapsed: critical region reached");
            reached_critical = true;
            break;
        }
    }

    Ok(EnvelopeCurve {
        branch,
        points,
        truncated,
        reached_critical,
    })
}

/// Residual of the saturation system at fixed specification.
fn residual(
    model: &MixtureModel,
    branch: CurveBranch,
    u: &DVector<f64>,
    spec: &dyn Fn(&DVector<f64>) -> f64,
) -> EnvelopeResult<DVector<f64>> {
    let n = model.n_components();
    let z = model.feed();
    let t = u[n].exp();
    let p = u[n + 1].exp();

    // Incipient-phase mole numbers from the K-values
    let w: Vec<f64> = (0..n)
        .map(|i| match branch {
            CurveBranch::Bubble => z[i] * u[i].exp(),
            CurveBranch::Dew => z[i] / u[i].exp(),
        })
        .collect();
    let sum_w: f64 = w.iter().sum();
    let inc: Vec<f64> = w.iter().map(|wi| wi / sum_w).collect();

    let (feed_kind, inc_kind) = match branch {
        CurveBranch::Bubble => (RootKind::Liquid, RootKind::Vapor),
        CurveBranch::Dew => (RootKind::Vapor, RootKind::Liquid),
    };
    let d_feed = density_root(model, t, p, z, feed_kind)?;
    let d_inc = density_root(model, t, p, &inc, inc_kind)?;
    let ln_phi_feed = model.ln_phi(t, d_feed, z)?;
    let ln_phi_inc = model.ln_phi(t, d_inc, &inc)?;

    let mut f = DVector::zeros(n + 2);
    for i in 0..n {
        // ln K_i = ln phi(feed) - ln phi(incipient), signed per branch
        let rhs = match branch {
            CurveBranch::Bubble => ln_phi_feed[i] - ln_phi_inc[i],
            CurveBranch::Dew => ln_phi_inc[i] - ln_phi_feed[i],
        };
        f[i] = u[i] - rhs;
    }
    // Rachford-Rice closure at q = 0 or 1: incipient fractions sum to 1
    f[n] = sum_w - 1.0;
    f[n + 1] = spec(u);
    Ok(f)
}

fn newton_correct(
    model: &MixtureModel,
    branch: CurveBranch,
    u: &mut DVector<f64>,
    spec: &dyn Fn(&DVector<f64>) -> f64,
    opts: &TraceOptions,
) -> bool {
    newton_correct_counted(model, branch, u, spec, opts).0
}

fn newton_correct_counted(
    model: &MixtureModel,
    branch: CurveBranch,
    u: &mut DVector<f64>,
    spec: &dyn Fn(&DVector<f64>) -> f64,
    opts: &TraceOptions,
) -> (bool, usize) {
    let dim = u.len();
    let mut f = match residual(model, branch, u, spec) {
        Ok(f) => f,
        Err(_) => return (false, 0),
    };

    for iter in 0..opts.max_newton {
        let f_norm = f.amax();
        if f_norm < opts.newton_tol {
            return (true, iter);
        }

        // Finite-difference Jacobian
        let mut jac = DMatrix::zeros(dim, dim);
        for k in 0..dim {
            let h = 1e-6 * u[k].abs().max(1.0);
            let mut u_k = u.clone();
            u_k[k] += h;
            let f_k = match residual(model, branch, &u_k, spec) {
                Ok(f) => f,
                Err(_) => return (false, iter),
            };
            for r in 0..dim {
                jac[(r, k)] = (f_k[r] - f[r]) / h;
            }
        }

        let Some(delta) = jac.lu().solve(&(-f.clone())) else {
            return (false, iter);
        };
        // Damp oversized steps
        let scale = {
            let norm = delta.norm();
            if norm > 1.0 {
                1.0 / norm
            } else {
                1.0
            }
        };
        *u += delta * scale;

        f = match residual(model, branch, u, spec) {
            Ok(f) => f,
            Err(_) => return (false, iter),
        };
        if !f.iter().all(|v| v.is_finite()) {
            return (false, iter);
        }
    }
    (false, opts.max_newton)
}

/// Bisection on the Wilson closure for the seed temperature.
fn seed_temperature(
    model: &MixtureModel,
    branch: CurveBranch,
    p: f64,
    opts: &TraceOptions,
) -> EnvelopeResult<f64> {
    let g = |t: f64| -> f64 {
        let k = wilson_k(model, t, p);
        let z = model.feed();
        let sum: f64 = z
            .iter()
            .zip(&k)
            .map(|(zi, ki)| match branch {
                CurveBranch::Bubble => zi * ki,
                CurveBranch::Dew => zi / ki.max(1e-12),
            })
            .sum();
        sum - 1.0
    };

    let (mut lo, mut hi) = opts.t_range;
    let (g_lo, g_hi) = (g(lo), g(hi));
    // sum(zK) grows with T on the bubble side, sum(z/K) shrinks on the dew side
    let increasing = match branch {
        CurveBranch::Bubble => true,
        CurveBranch::Dew => false,
    };
    let bracketed = if increasing {
        g_lo < 0.0 && g_hi > 0.0
    } else {
        g_lo > 0.0 && g_hi < 0.0
    };
    if !bracketed {
        return Err(EnvelopeError::SeedNotFound);
    }

    for _ in 0..80 {
        let mid = 0.5 * (lo + hi);
        let gm = g(mid);
        if gm.abs() < 1e-12 || (hi - lo) < 1e-9 * mid {
            return Ok(mid);
        }
        let go_up = if increasing { gm < 0.0 } else { gm > 0.0 };
        if go_up {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Assemble the reported point: the feed-side saturated phase carries the
/// enthalpy used for the PH projection.
fn point_from_state(
    model: &MixtureModel,
    branch: CurveBranch,
    u: &DVector<f64>,
    arclength: f64,
) -> EnvelopeResult<EnvelopePoint> {
    let n = model.n_components();
    let t = u[n].exp();
    let p = u[n + 1].exp();
    let z = model.feed();
    let kind = match branch {
        CurveBranch::Bubble => RootKind::Liquid,
        CurveBranch::Dew => RootKind::Vapor,
    };
    let d = density_root(model, t, p, z, kind)?;
    let h = model.props(t, d, z)?.h;
    Ok(EnvelopePoint {
        t,
        p,
        vapor_fraction: branch.vapor_fraction(),
        h,
        arclength,
    })
}

/// Pure-component envelope: the saturation curve itself, marched in
/// temperature. Both branches coincide in PT; the vapor-fraction tag tells
/// them apart.
fn trace_pure(
    model: &MixtureModel,
    branch: CurveBranch,
    opts: &TraceOptions,
) -> EnvelopeResult<EnvelopeCurve> {
    let r = model.records()[0];
    let tc = model.t_reduce(&[1.0]);
    let t_lo = opts.t_range.0.max(r.t_triple);
    let t_hi = opts.t_range.1.min(tc * (1.0 - 1e-4));
    if t_hi <= t_lo {
        return Err(EnvelopeError::SeedNotFound);
    }
    let hit_critical = t_hi >= tc * (1.0 - 2e-4);

    let steps = opts.max_points.clamp(2, 400);
    let mut points = Vec::with_capacity(steps);
    let mut arclength = 0.0;
    let mut prev: Option<(f64, f64)> = None;

    for i in 0..steps {
        let t = t_lo + (t_hi - t_lo) * i as f64 / (steps - 1) as f64;
        let sat = match pure_saturation_pressure(model, t) {
            Ok(sat) => sat,
            Err(_) => {
                return Ok(EnvelopeCurve {
                    branch,
                    points,
                    truncated: true,
                    reached_critical: false,
                })
            }
        };
        if sat.p < opts.p_range.0 || sat.p > opts.p_range.1 {
            continue;
        }
        let d = match branch {
            CurveBranch::Bubble => sat.d_liq,
            CurveBranch::Dew => sat.d_vap,
        };
        let h = model.props(t, d, &[1.0])?.h;
        if let Some((t_prev, ln_p_prev)) = prev {
            let dt = (t / t_prev).ln();
            let dp = sat.p.ln() - ln_p_prev;
            arclength += (dt * dt + dp * dp).sqrt();
        }
        prev = Some((t, sat.p.ln()));
        points.push(EnvelopePoint {
            t,
            p: sat.p,
            vapor_fraction: branch.vapor_fraction(),
            h,
            arclength,
        });
    }

    Ok(EnvelopeCurve {
        branch,
        points,
        truncated: false,
        reached_critical: hit_critical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_fluids::{Composition, FluidId};

    fn ch4_c2h6() -> MixtureModel {
        let comp = Composition::new(vec![(FluidId::Methane, 0.5), (FluidId::Ethane, 0.5)])
            .unwrap();
        MixtureModel::new(&comp).unwrap()
    }

    fn window() -> TraceOptions {
        TraceOptions {
            t_range: (95.0, 400.0),
            p_range: (2.0e5, 8.0e6),
            ..TraceOptions::default()
        }
    }

    #[test]
    fn bubble_curve_is_ordered_by_arclength() {
        let model = ch4_c2h6();
        let curve = trace_envelope(&model, CurveBranch::Bubble, &window()).unwrap();
        assert!(
            curve.points.len() >= 5,
            "only {} points traced",
            curve.points.len()
        );
        for pair in curve.points.windows(2) {
            assert!(pair[1].arclength > pair[0].arclength);
        }
        for p in &curve.points {
            assert_eq!(p.vapor_fraction, 0.0);
            assert!(p.t.is_finite() && p.p.is_finite() && p.h.is_finite());
        }
    }

    #[test]
    fn consecutive_steps_are_bounded() {
        let model = ch4_c2h6();
        let opts = window();
        let curve = trace_envelope(&model, CurveBranch::Bubble, &opts).unwrap();
        for pair in curve.points.windows(2) {
            let ds = pair[1].arclength - pair[0].arclength;
            // Predictor steps are capped; the realized arclength stays of
            // the same order
            assert!(ds <= 3.0 * opts.step_max, "step {ds} too large");
        }
    }

    #[test]
    fn dew_curve_traces_too() {
        let model = ch4_c2h6();
        let curve = trace_envelope(&model, CurveBranch::Dew, &window()).unwrap();
        assert!(curve.points.len() >= 3);
        for p in &curve.points {
            assert_eq!(p.vapor_fraction, 1.0);
        }
    }

    #[test]
    fn bubble_points_satisfy_equal_fugacity() {
        let model = ch4_c2h6();
        let curve = trace_envelope(&model, CurveBranch::Bubble, &window()).unwrap();
        let z = model.feed();
        // Spot-check an interior point: the incipient vapor recomputed from
        // the solved state must match the liquid fugacities
        let point = &curve.points[curve.points.len() / 2];
        let d_liq = density_root(&model, point.t, point.p, z, RootKind::Liquid).unwrap();
        let ln_phi_l = model.ln_phi(point.t, d_liq, z).unwrap();
        // Rebuild K from fugacity equality and confirm sum(z K) = 1
        let k: Vec<f64> = {
            // incipient composition from a fresh solve of the scalar closure
            let mut k = wilson_k(&model, point.t, point.p);
            for _ in 0..50 {
                let w: Vec<f64> = z.iter().zip(&k).map(|(zi, ki)| zi * ki).collect();
                let sum: f64 = w.iter().sum();
                let y: Vec<f64> = w.iter().map(|wi| wi / sum).collect();
                let d_vap =
                    density_root(&model, point.t, point.p, &y, RootKind::Vapor).unwrap();
                let ln_phi_v = model.ln_phi(point.t, d_vap, &y).unwrap();
                for i in 0..k.len() {
                    k[i] = (ln_phi_l[i] - ln_phi_v[i]).exp();
                }
            }
            k
        };
        let closure: f64 = z.iter().zip(&k).map(|(zi, ki)| zi * ki).sum();
        assert_relative_eq!(closure, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn pure_envelope_matches_saturation_curve() {
        let model = MixtureModel::new(&Composition::pure(FluidId::CarbonDioxide)).unwrap();
        let opts = TraceOptions {
            t_range: (220.0, 304.0),
            p_range: (1.0e5, 9.0e6),
            max_points: 40,
            ..TraceOptions::default()
        };
        let curve = trace_envelope(&model, CurveBranch::Dew, &opts).unwrap();
        assert!(curve.points.len() > 10);
        for p in curve.points.iter().step_by(7) {
            let sat = pure_saturation_pressure(&model, p.t).unwrap();
            assert_relative_eq!(p.p, sat.p, max_relative = 1e-8);
        }
    }
}
