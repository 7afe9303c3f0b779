//! Comparison of solved operating points against hand-calculated references.

use serde::{Deserialize, Serialize};
use sf_catalog::{
    Q_MIN_STABLE_LPS, ReferencePoint, VALVE_QMIN_M3H, reference_for_phi, reference_for_pumps,
};
use sf_core::lps_to_m3h;
use sf_scenarios::SteadyStateResult;

/// Maximum accepted deviation from the reference, in percent.
pub const TOLERANCE_PCT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterCheck {
    pub name: String,
    pub computed: f64,
    pub reference: f64,
    pub deviation_pct: f64,
    pub passed: bool,
    pub unit: String,
}

impl ParameterCheck {
    fn new(name: &str, computed: f64, reference: f64, unit: &str) -> Self {
        let deviation_pct = deviation_pct(computed, reference);
        Self {
            name: name.to_string(),
            computed,
            reference,
            deviation_pct,
            passed: deviation_pct <= TOLERANCE_PCT,
            unit: unit.to_string(),
        }
    }
}

/// Checks and advisory warnings for one scenario.
///
/// Warnings never affect `all_passed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioValidation {
    pub n_pumps: usize,
    pub phi_pct: u32,
    pub checks: Vec<ParameterCheck>,
    pub warnings: Vec<String>,
}

impl ScenarioValidation {
    /// True when every check passed. Vacuously true without checks.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}

/// Relative deviation in percent. A zero reference gives 0 when the computed
/// value is also zero and 100 otherwise.
pub fn deviation_pct(computed: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return if computed == 0.0 { 0.0 } else { 100.0 };
    }
    (computed - reference).abs() / reference.abs() * 100.0
}

/// Validate one result against `reference`. Without a reference the result
/// carries no checks and a warning saying so.
pub fn validate_steady_state(
    result: &SteadyStateResult,
    reference: Option<&ReferencePoint>,
) -> ScenarioValidation {
    let mut validation = ScenarioValidation {
        n_pumps: result.n_active_pumps,
        phi_pct: result.valve_opening_pct,
        checks: Vec::new(),
        warnings: Vec::new(),
    };

    match reference {
        Some(r) => {
            validation.checks = vec![
                ParameterCheck::new("Q_total", result.q_total_lps, r.q_total_lps, "l/s"),
                ParameterCheck::new("Q/pump", result.q_per_pump_lps, r.q_per_pump_lps, "l/s"),
                ParameterCheck::new("H_pump", result.h_pump_m, r.h_pump_m, "m"),
                ParameterCheck::new("dH_valve", result.dh_valve_m, r.dh_valve_m, "m"),
            ];
        }
        None => validation.warnings.push(format!(
            "No reference point for {}-pump scenario at {}% opening",
            result.n_active_pumps, result.valve_opening_pct
        )),
    }

    if result.q_per_pump_lps < Q_MIN_STABLE_LPS {
        validation.warnings.push(format!(
            "Q/pump = {:.1} l/s < min stable ({Q_MIN_STABLE_LPS} l/s)",
            result.q_per_pump_lps
        ));
    }
    let q_total_m3h = lps_to_m3h(result.q_total_lps);
    if q_total_m3h < VALVE_QMIN_M3H {
        validation.warnings.push(format!(
            "Q_total = {q_total_m3h:.0} m3/h < valve Qmin ({VALVE_QMIN_M3H:.0} m3/h), \
             known system characteristic for {}-pump operation",
            result.n_active_pumps
        ));
    }

    validation
}

/// Validate canonical results, looking references up by pump count.
pub fn validate_all(results: &[SteadyStateResult]) -> Vec<ScenarioValidation> {
    results
        .iter()
        .map(|r| validate_steady_state(r, reference_for_pumps(r.n_active_pumps)))
        .collect()
}

/// Validate extended results, looking references up by valve opening.
pub fn validate_all_extended(results: &[SteadyStateResult]) -> Vec<ScenarioValidation> {
    results
        .iter()
        .map(|r| validate_steady_state(r, reference_for_phi(r.valve_opening_pct)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use sf_network::Topology;

    fn result(n: usize, phi: u32, q: f64, h: f64, dh: f64) -> SteadyStateResult {
        SteadyStateResult {
            n_active_pumps: n,
            valve_opening_pct: phi,
            topology: Topology::Simplified,
            q_total_lps: q,
            q_per_pump_lps: q / n as f64,
            h_pump_m: h,
            dh_valve_m: dh,
            h_suction_m: 1.0,
            h_manifold_m: 1.0 + h,
            h_valve_in_m: 0.0,
            h_valve_out_m: 0.0,
            pipe_velocities: BTreeMap::new(),
            pipe_headlosses: BTreeMap::new(),
        }
    }

    #[test]
    fn four_pump_reference_passes_all_checks() {
        let r = result(4, 44, 5016.0, 26.12, 7.51);
        let v = validate_steady_state(&r, reference_for_pumps(4));
        assert_eq!(v.checks.len(), 4);
        assert!(v.all_passed());
        assert!(v.warnings.is_empty());
        let names: Vec<&str> = v.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Q_total", "Q/pump", "H_pump", "dH_valve"]);
    }

    #[test]
    fn deviation_beyond_tolerance_fails() {
        let r = result(4, 44, 5016.0 * 1.06, 26.12, 7.51);
        let v = validate_steady_state(&r, reference_for_pumps(4));
        assert!(!v.all_passed());
        assert!(!v.checks[0].passed);
        assert!(v.checks[2].passed);
    }

    #[test]
    fn exactly_at_tolerance_passes() {
        assert!(ParameterCheck::new("x", 105.0, 100.0, "").passed);
    }

    #[test]
    fn missing_reference_warns_without_checks() {
        let r = result(4, 44, 5016.0, 26.12, 7.51);
        let v = validate_steady_state(&r, None);
        assert!(v.checks.is_empty());
        assert!(v.all_passed());
        assert_eq!(v.warnings.len(), 1);
        assert!(v.warnings[0].starts_with("No reference point for 4-pump scenario"));
    }

    #[test]
    fn one_pump_raises_both_advisories_but_still_passes() {
        let r = result(1, 22, 820.0, 31.63, 13.44);
        let reference = ReferencePoint {
            q_total_lps: 820.0,
            q_per_pump_lps: 820.0,
            h_pump_m: 31.63,
            dh_valve_m: 13.44,
            ..*reference_for_pumps(1).unwrap()
        };
        let v = validate_steady_state(&r, Some(&reference));
        assert!(v.all_passed());
        assert_eq!(v.warnings.len(), 2);
        assert!(v.warnings[1].contains("known system characteristic"));
    }

    #[test]
    fn batch_lookups() {
        let canonical = vec![result(4, 44, 5016.0, 26.12, 7.51), result(3, 38, 3000.0, 26.9, 8.5)];
        let v = validate_all(&canonical);
        assert_eq!(v.len(), 2);
        assert_eq!(v[1].n_pumps, 3);

        let extended = vec![result(4, 40, 4577.5, 28.72, 10.16)];
        let v = validate_all_extended(&extended);
        assert_eq!(v[0].phi_pct, 40);
        assert!(v[0].checks[0].passed);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn deviation_symmetric_about_reference(
            reference in prop_oneof![-1e4f64..-1e-3, 1e-3f64..1e4],
            d in 0.0f64..1e3,
        ) {
            let above = deviation_pct(reference + d, reference);
            let below = deviation_pct(reference - d, reference);
            prop_assert!((above - below).abs() <= 1e-9 * above.abs().max(1.0));
        }

        #[test]
        fn zero_reference_special_case(x in prop::num::f64::NORMAL) {
            prop_assert_eq!(deviation_pct(0.0, 0.0), 0.0);
            prop_assert_eq!(deviation_pct(x, 0.0), 100.0);
        }
    }
}
