//! Rachford-Rice equation: vapor fraction from K-values and feed.

/// Outcome of a Rachford-Rice solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RachfordRice {
    /// Physical split with vapor fraction in (0, 1)
    VaporFraction(f64),
    /// g(0) <= 0: the feed is all liquid at these K-values
    AllLiquid,
    /// g(1) >= 0: the feed is all vapor at these K-values
    AllVapor,
}

fn g(q: f64, z: &[f64], k: &[f64]) -> f64 {
    z.iter()
        .zip(k)
        .map(|(zi, ki)| zi * (ki - 1.0) / (1.0 + q * (ki - 1.0)))
        .sum()
}

fn g_prime(q: f64, z: &[f64], k: &[f64]) -> f64 {
    -z.iter()
        .zip(k)
        .map(|(zi, ki)| {
            let u = 1.0 + q * (ki - 1.0);
            zi * (ki - 1.0) * (ki - 1.0) / (u * u)
        })
        .sum::<f64>()
}

/// Solve the Rachford-Rice equation for the vapor fraction.
///
/// `g(q)` is strictly decreasing on [0, 1] for any K-value set with both
/// K > 1 and K < 1 members, so a bracketed Newton cannot fail; boundary
/// cases are reported instead of clamped.
pub fn solve(z: &[f64], k: &[f64]) -> RachfordRice {
    debug_assert_eq!(z.len(), k.len());

    let g0 = g(0.0, z, k);
    if g0 <= 0.0 {
        return RachfordRice::AllLiquid;
    }
    let g1 = g(1.0, z, k);
    if g1 >= 0.0 {
        return RachfordRice::AllVapor;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut q = 0.5;
    for _ in 0..100 {
        let gq = g(q, z, k);
        if gq.abs() < 1e-14 {
            return RachfordRice::VaporFraction(q);
        }
        if gq > 0.0 {
            lo = q;
        } else {
            hi = q;
        }
        let gp = g_prime(q, z, k);
        let mut q_new = q - gq / gp;
        if !(q_new > lo && q_new < hi) {
            q_new = 0.5 * (lo + hi);
        }
        if (q_new - q).abs() < 1e-15 {
            return RachfordRice::VaporFraction(q_new);
        }
        q = q_new;
    }
    RachfordRice::VaporFraction(q)
}

/// Phase compositions implied by a vapor fraction and K-values.
///
/// Returns (x, y), each renormalized.
pub fn phase_compositions(z: &[f64], k: &[f64], q: f64) -> (Vec<f64>, Vec<f64>) {
    let mut x: Vec<f64> = z
        .iter()
        .zip(k)
        .map(|(zi, ki)| zi / (1.0 + q * (ki - 1.0)))
        .collect();
    let mut y: Vec<f64> = x.iter().zip(k).map(|(xi, ki)| xi * ki).collect();
    let sx: f64 = x.iter().sum();
    let sy: f64 = y.iter().sum();
    for v in &mut x {
        *v /= sx;
    }
    for v in &mut y {
        *v /= sy;
    }
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn symmetric_binary_gives_half() {
        // z = 0.5/0.5, K = {2, 1/2}: g(q) is antisymmetric about q = 0.5
        let z = [0.5, 0.5];
        let k = [2.0, 0.5];
        match solve(&z, &k) {
            RachfordRice::VaporFraction(q) => assert_relative_eq!(q, 0.5, epsilon = 1e-10),
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn all_liquid_detected() {
        let z = [0.5, 0.5];
        let k = [0.9, 0.5];
        assert_eq!(solve(&z, &k), RachfordRice::AllLiquid);
    }

    #[test]
    fn all_vapor_detected() {
        let z = [0.5, 0.5];
        let k = [4.0, 1.2];
        assert_eq!(solve(&z, &k), RachfordRice::AllVapor);
    }

    #[test]
    fn solution_zeroes_g() {
        let z = [0.3, 0.4, 0.3];
        let k = [3.0, 1.1, 0.2];
        match solve(&z, &k) {
            RachfordRice::VaporFraction(q) => {
                assert!(g(q, &z, &k).abs() < 1e-12);
                assert!(q > 0.0 && q < 1.0);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn compositions_recombine_to_feed() {
        let z = [0.3, 0.4, 0.3];
        let k = [3.0, 1.1, 0.2];
        let RachfordRice::VaporFraction(q) = solve(&z, &k) else {
            panic!("expected split");
        };
        let (x, y) = phase_compositions(&z, &k, q);
        for i in 0..3 {
            let recombined = q * y[i] + (1.0 - q) * x[i];
            assert_relative_eq!(recombined, z[i], epsilon = 1e-10);
        }
    }
}
