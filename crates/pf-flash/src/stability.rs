//! Tangent-plane-distance stability analysis.
//!
//! Trial compositions come from Wilson K-factor estimates (one vapor-like,
//! one liquid-like incipient phase); each trial is relaxed by successive
//! substitution on the unnormalized mole numbers W. A converged trial with
//! sum(W) > 1 lies below the tangent plane of the feed, so the assumed
//! single phase is not the equilibrium state.

use crate::density::{best_root, density_root, RootKind};
use crate::error::FlashResult;
use pf_fluids::MixtureModel;
use tracing::debug;

const MAX_SS_ITER: usize = 100;
const SS_TOL: f64 = 1e-8;
/// A trial that collapses onto the feed carries no information.
const TRIVIAL_TOL: f64 = 1e-4;

/// Wilson K-factor estimates at (T, P).
pub fn wilson_k(model: &MixtureModel, t: f64, p: f64) -> Vec<f64> {
    model
        .records()
        .iter()
        .map(|r| {
            (r.p_crit / p).min(1e12) * (5.373 * (1.0 + r.acentric) * (1.0 - r.t_crit / t)).exp()
        })
        .collect()
}

/// Result of the stability test at (T, P, z).
#[derive(Debug, Clone)]
pub struct StabilityReport {
    pub stable: bool,
    /// K-values from the most unstable trial, for seeding the split solver
    pub trial_k: Option<Vec<f64>>,
    /// Maximum of ln(sum W) over the trials; positive means unstable
    pub ln_sum_w: f64,
}

/// Run the tangent-plane-distance test for the feed at (T, P).
///
/// `d_feed` is the feed-phase density root already resolved by the caller.
pub fn stability_test(
    model: &MixtureModel,
    t: f64,
    p: f64,
    z: &[f64],
    d_feed: f64,
) -> FlashResult<StabilityReport> {
    let ln_phi_z = model.ln_phi(t, d_feed, z)?;
    let h: Vec<f64> = z
        .iter()
        .zip(&ln_phi_z)
        .map(|(zi, lp)| zi.max(1e-30).ln() + lp)
        .collect();

    let k_wilson = wilson_k(model, t, p);

    let mut report = StabilityReport {
        stable: true,
        trial_k: None,
        ln_sum_w: 0.0,
    };

    for kind in [RootKind::Vapor, RootKind::Liquid] {
        let w0: Vec<f64> = z
            .iter()
            .zip(&k_wilson)
            .map(|(zi, ki)| match kind {
                RootKind::Vapor => zi * ki,
                RootKind::Liquid => zi / ki.max(1e-12),
            })
            .collect();

        let Some((ln_sum_w, w)) = relax_trial(model, t, p, z, &h, w0, kind)? else {
            continue;
        };
        if ln_sum_w > 1e-8 && ln_sum_w > report.ln_sum_w {
            debug!(?kind, ln_sum_w, "tangent-plane trial unstable");
            report.stable = false;
            report.ln_sum_w = ln_sum_w;
            report.trial_k = Some(trial_k_values(z, &w, kind));
        }
    }

    Ok(report)
}

/// Successive substitution on one trial phase. Returns `None` for trials
/// that collapse onto the feed (trivial solution).
fn relax_trial(
    model: &MixtureModel,
    t: f64,
    p: f64,
    z: &[f64],
    h: &[f64],
    mut w: Vec<f64>,
    kind: RootKind,
) -> FlashResult<Option<(f64, Vec<f64>)>> {
    let n = w.len();
    for _ in 0..MAX_SS_ITER {
        let sum: f64 = w.iter().sum();
        let x: Vec<f64> = w.iter().map(|wi| wi / sum).collect();

        let d = match density_root(model, t, p, &x, kind) {
            Ok(d) => d,
            Err(_) => best_root(model, t, p, &x)?,
        };
        let ln_phi = model.ln_phi(t, d, &x)?;

        let mut max_change: f64 = 0.0;
        for i in 0..n {
            let w_new = (h[i] - ln_phi[i]).exp();
            max_change = max_change.max((w_new.ln() - w[i].max(1e-300).ln()).abs());
            w[i] = w_new;
        }
        if max_change < SS_TOL {
            break;
        }
    }

    let trivial = w
        .iter()
        .zip(z)
        .all(|(wi, zi)| (wi.max(1e-300).ln() - zi.max(1e-30).ln()).abs() < TRIVIAL_TOL);
    if trivial {
        return Ok(None);
    }

    let sum: f64 = w.iter().sum();
    Ok(Some((sum.ln(), w)))
}

fn trial_k_values(z: &[f64], w: &[f64], kind: RootKind) -> Vec<f64> {
    z.iter()
        .zip(w)
        .map(|(zi, wi)| match kind {
            // Vapor-like trial: the incipient phase is vapor, K = w/z
            RootKind::Vapor => wi / zi.max(1e-30),
            // Liquid-like trial: the incipient phase is liquid, K = z/w
            RootKind::Liquid => zi / wi.max(1e-30),
        })
        .collect()
}
