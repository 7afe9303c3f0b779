//! Variable-speed drive comparison.
//!
//! Without the throttling valve the pumps only need `H - dH` to deliver the
//! same flow. The speed ratio uses the near-BEP affinity approximation
//! `sqrt(H_required / H)`; the variable-speed shaft power is recomputed from
//! hydraulic power at the required head rather than the cubic affinity law.

use serde::{Deserialize, Serialize};
use sf_core::{SfError, ensure_finite};
use sf_scenarios::SteadyStateResult;

use crate::energy::{check_efficiency, hydraulic_power_kw};
use crate::error::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VfdResult {
    pub n_pumps: usize,
    pub phi_pct: u32,
    pub q_total_lps: f64,
    pub q_per_pump_lps: f64,
    pub h_pump_throttled_m: f64,
    /// Per pump.
    pub p_shaft_throttled_kw: f64,
    /// N / N_rated.
    pub speed_ratio: f64,
    pub h_pump_vfd_m: f64,
    /// Per pump.
    pub p_shaft_vfd_kw: f64,
    pub saving_per_pump_kw: f64,
    pub saving_total_kw: f64,
    pub saving_pct: f64,
}

pub fn compute_vfd_comparison(
    n_pumps: usize,
    phi_pct: u32,
    q_total_lps: f64,
    h_pump_m: f64,
    dh_valve_m: f64,
    eta_pct: f64,
) -> AnalysisResult<VfdResult> {
    if n_pumps == 0 {
        return Err(SfError::InvalidArg {
            what: "VFD comparison needs at least one pump",
        }
        .into());
    }
    let eta = check_efficiency(eta_pct)? / 100.0;
    let q_total_lps = ensure_finite(q_total_lps, "total flow")?;
    let h_pump_m = ensure_finite(h_pump_m, "pump head")?;
    let dh_valve_m = ensure_finite(dh_valve_m, "valve headloss")?;
    if h_pump_m <= 0.0 {
        return Err(SfError::OutOfRange {
            what: "pump head",
            value: h_pump_m,
        }
        .into());
    }
    if dh_valve_m < 0.0 || dh_valve_m > h_pump_m {
        return Err(SfError::OutOfRange {
            what: "valve headloss (must lie within [0, pump head])",
            value: dh_valve_m,
        }
        .into());
    }

    let q_per_pump_lps = q_total_lps / n_pumps as f64;
    let p_shaft_throttled_kw = hydraulic_power_kw(q_per_pump_lps, h_pump_m) / eta;

    let h_required = h_pump_m - dh_valve_m;
    let speed_ratio = (h_required / h_pump_m).sqrt();
    let p_shaft_vfd_kw = hydraulic_power_kw(q_per_pump_lps, h_required) / eta;

    let saving_per_pump_kw = p_shaft_throttled_kw - p_shaft_vfd_kw;
    let saving_pct = if p_shaft_throttled_kw > 0.0 {
        saving_per_pump_kw / p_shaft_throttled_kw * 100.0
    } else {
        0.0
    };

    Ok(VfdResult {
        n_pumps,
        phi_pct,
        q_total_lps,
        q_per_pump_lps,
        h_pump_throttled_m: h_pump_m,
        p_shaft_throttled_kw,
        speed_ratio,
        h_pump_vfd_m: h_required,
        p_shaft_vfd_kw,
        saving_per_pump_kw,
        saving_total_kw: saving_per_pump_kw * n_pumps as f64,
        saving_pct,
    })
}

/// VFD comparison for every solved scenario, in input order.
pub fn compute_all_vfd(results: &[SteadyStateResult], eta_pct: f64) -> AnalysisResult<Vec<VfdResult>> {
    results
        .iter()
        .map(|r| {
            compute_vfd_comparison(
                r.n_active_pumps,
                r.valve_opening_pct,
                r.q_total_lps,
                r.h_pump_m,
                r.dh_valve_m,
                eta_pct,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    const STAGING: [(usize, u32, f64, f64, f64); 4] = [
        (4, 44, 5017.0, 26.12, 7.52),
        (3, 38, 3664.0, 26.90, 8.50),
        (2, 30, 2221.0, 29.48, 11.22),
        (1, 22, 1014.0, 31.63, 13.44),
    ];

    #[test]
    fn staging_points_save_power_at_reasonable_speed() {
        for (n, phi, q, h, dh) in STAGING {
            let r = compute_vfd_comparison(n, phi, q, h, dh, 88.0).unwrap();
            assert!(r.speed_ratio >= 0.7 && r.speed_ratio < 1.0, "{phi}%: {}", r.speed_ratio);
            assert!(r.saving_total_kw > 0.0);
            assert!((r.saving_total_kw - r.saving_per_pump_kw * n as f64).abs() < 1e-9);
            assert!((r.h_pump_vfd_m - (h - dh)).abs() < 1e-12);
        }
    }

    #[test]
    fn saving_pct_is_head_fraction() {
        let r = compute_vfd_comparison(4, 44, 5017.0, 26.12, 7.52, 88.0).unwrap();
        assert!((r.saving_pct - 7.52 / 26.12 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_flow_gives_zero_saving_pct() {
        let r = compute_vfd_comparison(2, 30, 0.0, 29.48, 11.22, 88.0).unwrap();
        assert_eq!(r.p_shaft_throttled_kw, 0.0);
        assert_eq!(r.saving_pct, 0.0);
    }

    #[test]
    fn no_throttling_means_full_speed() {
        let r = compute_vfd_comparison(4, 44, 5017.0, 26.12, 0.0, 88.0).unwrap();
        assert_eq!(r.speed_ratio, 1.0);
        assert_eq!(r.saving_total_kw, 0.0);
    }

    #[test]
    fn invalid_inputs_rejected() {
        assert!(matches!(
            compute_vfd_comparison(0, 44, 5017.0, 26.12, 7.52, 88.0),
            Err(AnalysisError::Core(SfError::InvalidArg { .. }))
        ));
        assert!(compute_vfd_comparison(1, 22, 1014.0, 0.0, 0.0, 88.0).is_err());
        assert!(compute_vfd_comparison(1, 22, 1014.0, 10.0, 12.0, 88.0).is_err());
        assert!(compute_vfd_comparison(1, 22, 1014.0, 10.0, -1.0, 88.0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn speed_ratio_follows_affinity_approximation(
            n in 1usize..=4,
            q in 100.0f64..6000.0,
            h in 1.0f64..50.0,
            frac in 0.0f64..1.0,
        ) {
            let dh = h * frac;
            let r = compute_vfd_comparison(n, 44, q, h, dh, 88.0).unwrap();
            prop_assert!((r.speed_ratio - ((h - dh) / h).sqrt()).abs() < 1e-12);
            if dh > 1e-6 {
                prop_assert!(r.saving_total_kw > 0.0);
            }
        }
    }
}
