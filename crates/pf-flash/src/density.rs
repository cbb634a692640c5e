//! Density root solve: find d such that P(T, d, x) = p.
//!
//! Newton iteration seeded from an ideal-gas (vapor) or packed-liquid guess,
//! with an isotherm-scan + bisection fallback that locates every mechanically
//! stable crossing when Newton wanders off. On a subcritical isotherm the
//! vapor root is the lowest-density crossing and the liquid root the highest;
//! a single-root isotherm serves both requests.

use crate::error::{FlashError, FlashResult};
use pf_fluids::MixtureModel;
use tracing::trace;

/// Which density root the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Vapor,
    Liquid,
}

const MAX_NEWTON: usize = 50;
/// Upper reduced density of the isotherm scan; beyond the packed-liquid wall.
const DELTA_MAX: f64 = 3.9;
const SCAN_POINTS: usize = 160;

fn rel_tol(p: f64) -> f64 {
    p.abs() * 1e-10 + 1e-7
}

/// Solve for the requested density root [mol/m3].
pub fn density_root(
    model: &MixtureModel,
    t: f64,
    p: f64,
    x: &[f64],
    kind: RootKind,
) -> FlashResult<f64> {
    let rho_r = model.rho_reduce(x);
    let seed = match kind {
        RootKind::Vapor => (p / (pf_core::units::constants::R * t)).min(0.9 * rho_r),
        RootKind::Liquid => 2.8 * rho_r,
    };

    if let Some(d) = newton(model, t, p, x, seed) {
        let delta = d / rho_r;
        let suspicious = match kind {
            RootKind::Vapor => delta > 1.0,
            RootKind::Liquid => delta < 1.0,
        };
        if !suspicious {
            return Ok(d);
        }
        // Newton crossed the spinodal hump; see whether a root of the
        // requested kind exists at all before accepting this one.
        if let Some(d_scan) = scan_root(model, t, p, x, kind)? {
            return Ok(d_scan);
        }
        return Ok(d);
    }

    match scan_root(model, t, p, x, kind)? {
        Some(d) => Ok(d),
        None => Err(FlashError::NoDensityRoot {
            kind: match kind {
                RootKind::Vapor => "vapor",
                RootKind::Liquid => "liquid",
            },
            t,
            p,
        }),
    }
}

/// Pick the more stable root when vapor- and liquid-seeded solves disagree.
///
/// Stability is judged by the normalized Gibbs energy; the common
/// `ln d + alpha_r + delta*alpha_r_d` comparison (the ideal parts cancel
/// between roots at equal T and composition).
pub fn best_root(model: &MixtureModel, t: f64, p: f64, x: &[f64]) -> FlashResult<f64> {
    let dv = density_root(model, t, p, x, RootKind::Vapor);
    let dl = density_root(model, t, p, x, RootKind::Liquid);
    match (dv, dl) {
        (Ok(dv), Ok(dl)) => {
            if (dv - dl).abs() <= 1e-6 * dl.abs() {
                return Ok(dl);
            }
            let mv = gibbs_measure(model, t, dv, x)?;
            let ml = gibbs_measure(model, t, dl, x)?;
            Ok(if mv <= ml { dv } else { dl })
        }
        (Ok(dv), Err(_)) => Ok(dv),
        (Err(_), Ok(dl)) => Ok(dl),
        (Err(e), Err(_)) => Err(e),
    }
}

fn gibbs_measure(model: &MixtureModel, t: f64, d: f64, x: &[f64]) -> FlashResult<f64> {
    let ar = model.residual_helmholtz(t, d, x)?;
    let (delta, _) = model.reduced_coords(t, d, x);
    Ok(d.ln() + ar.a + delta * ar.a_d)
}

fn newton(model: &MixtureModel, t: f64, p: f64, x: &[f64], seed: f64) -> Option<f64> {
    let rho_r = model.rho_reduce(x);
    let mut d = seed.max(1e-12);
    for iter in 0..MAX_NEWTON {
        let f = model.pressure(t, d, x).ok()? - p;
        let fp = model.dp_dd(t, d, x).ok()?;
        if fp <= 0.0 {
            // Inside the spinodal: push outward, away from the hump
            d = if d < rho_r { d * 0.7 } else { d * 1.15 };
            continue;
        }
        if f.abs() <= rel_tol(p) {
            trace!(iter, d, "density root converged");
            return Some(d);
        }
        let mut d_new = d - f / fp;
        if !d_new.is_finite() {
            return None;
        }
        if d_new <= 0.0 {
            d_new = 0.5 * d;
        }
        let delta_new = d_new / rho_r;
        if delta_new > DELTA_MAX {
            d_new = 0.5 * (d + DELTA_MAX * rho_r);
        }
        if (d_new - d).abs() <= 1e-14 * d {
            return if f.abs() <= rel_tol(p) { Some(d) } else { None };
        }
        d = d_new;
    }
    None
}

/// Scan the isotherm for (P - p) sign changes and bisect the crossing that
/// matches the requested kind. Returns `None` when no crossing exists.
fn scan_root(
    model: &MixtureModel,
    t: f64,
    p: f64,
    x: &[f64],
    kind: RootKind,
) -> FlashResult<Option<f64>> {
    let rho_r = model.rho_reduce(x);
    let ln_lo = (1e-9_f64).ln();
    let ln_hi = (DELTA_MAX).ln();

    let mut brackets: Vec<(f64, f64)> = Vec::new();
    let mut d_prev = (ln_lo).exp() * rho_r;
    let mut f_prev = model.pressure(t, d_prev, x)? - p;
    for i in 1..=SCAN_POINTS {
        let frac = i as f64 / SCAN_POINTS as f64;
        let d_i = (ln_lo + frac * (ln_hi - ln_lo)).exp() * rho_r;
        let f_i = model.pressure(t, d_i, x)? - p;
        // Upward crossings only: those are the mechanically stable roots
        if f_prev < 0.0 && f_i >= 0.0 {
            brackets.push((d_prev, d_i));
        }
        d_prev = d_i;
        f_prev = f_i;
    }

    let bracket = match kind {
        RootKind::Vapor => brackets.first().copied(),
        RootKind::Liquid => brackets.last().copied(),
    };
    let Some((mut lo, mut hi)) = bracket else {
        return Ok(None);
    };

    for _ in 0..80 {
        let mid = 0.5 * (lo + hi);
        let f = model.pressure(t, mid, x)? - p;
        if f.abs() <= rel_tol(p) || (hi - lo) <= 1e-13 * mid {
            return Ok(Some(mid));
        }
        if f < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(Some(0.5 * (lo + hi)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pf_fluids::{Composition, FluidId};

    fn methane() -> MixtureModel {
        MixtureModel::new(&Composition::pure(FluidId::Methane)).unwrap()
    }

    #[test]
    fn vapor_root_reproduces_pressure() {
        let model = methane();
        let t = 300.0;
        let p = 1.0e6;
        let d = density_root(&model, t, p, &[1.0], RootKind::Vapor).unwrap();
        let p_back = model.pressure(t, d, &[1.0]).unwrap();
        assert_relative_eq!(p_back, p, max_relative = 1e-8);
        // Near-ideal gas at these conditions
        let d_ideal = p / (pf_core::units::constants::R * t);
        assert_relative_eq!(d, d_ideal, max_relative = 0.1);
    }

    #[test]
    fn subcritical_isotherm_has_distinct_roots() {
        let model = methane();
        // Well inside the two-phase dome of the correlation
        let t = 140.0;
        let p = 5.0e5;
        let dv = density_root(&model, t, p, &[1.0], RootKind::Vapor).unwrap();
        let dl = density_root(&model, t, p, &[1.0], RootKind::Liquid).unwrap();
        assert!(dl > 5.0 * dv, "dl = {dl}, dv = {dv}");
        let p_l = model.pressure(t, dl, &[1.0]).unwrap();
        assert_relative_eq!(p_l, p, max_relative = 1e-6);
    }

    #[test]
    fn supercritical_roots_coincide() {
        let model = methane();
        let t = 250.0;
        let p = 10.0e6;
        let dv = density_root(&model, t, p, &[1.0], RootKind::Vapor).unwrap();
        let dl = density_root(&model, t, p, &[1.0], RootKind::Liquid).unwrap();
        assert_relative_eq!(dv, dl, max_relative = 1e-6);
    }

    #[test]
    fn liquid_root_is_mechanically_stable() {
        let model = methane();
        let t = 120.0;
        let p = 2.0e5;
        let dl = density_root(&model, t, p, &[1.0], RootKind::Liquid).unwrap();
        assert!(model.dp_dd(t, dl, &[1.0]).unwrap() > 0.0);
    }
}
