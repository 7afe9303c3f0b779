//! Closed-form pump curve for display.
//!
//! `H = H_shutoff - B * Q^C`, with B and C fitted in log-log space through the
//! rated point and one run-out point. Not a regression.

use serde::Serialize;
use sf_core::{SfError, SfResult};

use crate::constants::{H_RATED_M, H_SHUTOFF_M, Q_RATED_LPS};

/// Run-out point used by the solver's 3-point curve.
pub const Q_RUNOUT_LPS: f64 = 1700.0;
pub const H_RUNOUT_M: f64 = 14.50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PumpCurve {
    pub h_shutoff_m: f64,
    pub b: f64,
    pub c: f64,
}

impl PumpCurve {
    /// Fit through `(q1, h1)` and `(q2, h2)` below shutoff head.
    pub fn fit_two_point(h_shutoff_m: f64, q1: f64, h1: f64, q2: f64, h2: f64) -> SfResult<Self> {
        let dh1 = h_shutoff_m - h1;
        let dh2 = h_shutoff_m - h2;
        if q1 <= 0.0 || q2 <= 0.0 || q1 == q2 {
            return Err(SfError::InvalidArg {
                what: "curve flows must be positive and distinct",
            });
        }
        if dh1 <= 0.0 || dh2 <= 0.0 {
            return Err(SfError::InvalidArg {
                what: "curve heads must lie below shutoff head",
            });
        }
        let c = (dh2 / dh1).ln() / (q2 / q1).ln();
        let b = dh1 / q1.powf(c);
        Ok(Self { h_shutoff_m, b, c })
    }

    /// The station pump: rated point and run-out point.
    pub fn station() -> SfResult<Self> {
        Self::fit_two_point(H_SHUTOFF_M, Q_RATED_LPS, H_RATED_M, Q_RUNOUT_LPS, H_RUNOUT_M)
    }

    /// Head (m) at flow `q_lps`.
    pub fn head_at(&self, q_lps: f64) -> f64 {
        if q_lps <= 0.0 {
            return self.h_shutoff_m;
        }
        self.h_shutoff_m - self.b * q_lps.powf(self.c)
    }

    /// `n` evenly spaced points from zero flow to `q_max_lps`.
    pub fn sample(&self, q_max_lps: f64, n: usize) -> Vec<(f64, f64)> {
        if n < 2 {
            return vec![(0.0, self.h_shutoff_m)];
        }
        let step = q_max_lps / (n - 1) as f64;
        (0..n)
            .map(|i| {
                let q = i as f64 * step;
                (q, self.head_at(q))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_fit_points() {
        let curve = PumpCurve::station().unwrap();
        assert!((curve.head_at(Q_RATED_LPS) - H_RATED_M).abs() < 1e-9);
        assert!((curve.head_at(Q_RUNOUT_LPS) - H_RUNOUT_M).abs() < 1e-9);
        assert_eq!(curve.head_at(0.0), H_SHUTOFF_M);
    }

    #[test]
    fn exponent_close_to_solver_curve() {
        let curve = PumpCurve::station().unwrap();
        assert!((curve.c - 1.48).abs() < 0.05, "c = {}", curve.c);
    }

    #[test]
    fn head_decreases_with_flow() {
        let curve = PumpCurve::station().unwrap();
        let pts = curve.sample(1800.0, 50);
        assert_eq!(pts.len(), 50);
        for pair in pts.windows(2) {
            assert!(pair[1].1 < pair[0].1);
        }
    }

    #[test]
    fn rejects_degenerate_points() {
        assert!(PumpCurve::fit_two_point(46.54, 1256.0, 26.07, 1256.0, 14.5).is_err());
        assert!(PumpCurve::fit_two_point(46.54, 1256.0, 50.0, 1700.0, 14.5).is_err());
    }
}
