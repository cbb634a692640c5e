//! Two-phase split: simultaneous flash at fixed (T, P).
//!
//! Successive substitution on K-values with the Rachford-Rice equation
//! nested inside, accelerated every few sweeps by a dominant-eigenvalue
//! extrapolation. Collapse onto K = 1 or a Rachford-Rice boundary means the
//! feed is single phase after all.

use crate::density::{density_root, RootKind};
use crate::drivers::FlashOptions;
use crate::equilibrium::PhaseSplit;
use crate::error::{FlashError, FlashResult};
use crate::rachford_rice::{self, RachfordRice};
use pf_fluids::MixtureModel;
use tracing::{debug, trace};

/// Outcome of a split attempt.
#[derive(Debug, Clone)]
pub enum SplitOutcome {
    TwoPhase(PhaseSplit),
    /// The iteration collapsed to the trivial solution; no split exists.
    SinglePhase,
}

/// Acceleration cadence for the dominant-eigenvalue step.
const ACCEL_EVERY: usize = 5;

/// Solve the two-phase split starting from the given K-value estimates.
pub fn solve_split(
    model: &MixtureModel,
    t: f64,
    p: f64,
    z: &[f64],
    k_init: &[f64],
    opts: &FlashOptions,
) -> FlashResult<SplitOutcome> {
    let n = z.len();
    let mut ln_k: Vec<f64> = k_init.iter().map(|k| k.max(1e-12).ln()).collect();
    let mut delta_prev: Option<Vec<f64>> = None;

    for iter in 0..opts.max_iter {
        let k: Vec<f64> = ln_k.iter().map(|lk| lk.exp()).collect();

        let q = match rachford_rice::solve(z, &k) {
            RachfordRice::VaporFraction(q) => q,
            // The K-values stopped supporting a split
            RachfordRice::AllLiquid | RachfordRice::AllVapor => {
                debug!(iter, "split collapsed at Rachford-Rice boundary");
                return Ok(SplitOutcome::SinglePhase);
            }
        };

        let (x, y) = rachford_rice::phase_compositions(z, &k, q);
        let d_liq = density_root(model, t, p, &x, RootKind::Liquid)?;
        let d_vap = density_root(model, t, p, &y, RootKind::Vapor)?;
        let ln_phi_l = model.ln_phi(t, d_liq, &x)?;
        let ln_phi_v = model.ln_phi(t, d_vap, &y)?;

        let mut delta = vec![0.0; n];
        let mut err: f64 = 0.0;
        for i in 0..n {
            delta[i] = ln_phi_l[i] - ln_phi_v[i] - ln_k[i];
            err = err.max(delta[i].abs());
        }
        trace!(iter, err, q, "split sweep");

        if err < opts.tol {
            if ln_k.iter().all(|lk| lk.abs() < 1e-8) {
                return Ok(SplitOutcome::SinglePhase);
            }
            return Ok(SplitOutcome::TwoPhase(PhaseSplit {
                vapor_fraction: q,
                x,
                y,
                d_liq,
                d_vap,
            }));
        }

        // Dominant-eigenvalue extrapolation on the K-update cycle
        let mut lambda = 0.0;
        if let Some(prev) = &delta_prev {
            let num: f64 = delta.iter().zip(prev).map(|(a, b)| a * b).sum();
            let den: f64 = prev.iter().map(|b| b * b).sum();
            if den > 0.0 {
                lambda = num / den;
            }
        }
        let boost = if iter % ACCEL_EVERY == ACCEL_EVERY - 1 && lambda > 0.0 && lambda < 0.95 {
            1.0 / (1.0 - lambda)
        } else {
            1.0
        };
        for i in 0..n {
            ln_k[i] += boost * delta[i];
        }
        delta_prev = Some(delta);

        if ln_k.iter().all(|lk| lk.abs() < 1e-8) {
            debug!(iter, "split collapsed to trivial K = 1");
            return Ok(SplitOutcome::SinglePhase);
        }
    }

    Err(FlashError::NonConvergence {
        what: "two-phase split",
        iterations: opts.max_iter,
    })
}
