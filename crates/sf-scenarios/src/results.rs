//! Scenario result value objects consumed by analysis and reporting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sf_network::Topology;

use crate::error::{ScenarioError, ScenarioResult};

/// One steady operating point as solved.
///
/// Pipe maps always carry a `P_DS` entry; for the subdivided network it is the
/// aggregate of the downstream segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteadyStateResult {
    pub n_active_pumps: usize,
    pub valve_opening_pct: u32,
    pub topology: Topology,
    pub q_total_lps: f64,
    pub q_per_pump_lps: f64,
    /// Manifold head minus suction head.
    pub h_pump_m: f64,
    /// Head drop across the active valve element.
    pub dh_valve_m: f64,
    pub h_suction_m: f64,
    pub h_manifold_m: f64,
    pub h_valve_in_m: f64,
    pub h_valve_out_m: f64,
    pub pipe_velocities: BTreeMap<String, f64>,
    pub pipe_headlosses: BTreeMap<String, f64>,
}

/// Extended-period run over the full horizon.
///
/// Every series has one entry per timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpsResult {
    pub topology: Topology,
    pub time_s: Vec<f64>,
    /// Pumps in canonical order.
    pub pump_ids: Vec<String>,
    /// Valve elements in scan priority order.
    pub valve_ids: Vec<String>,
    pub flows: BTreeMap<String, Vec<f64>>,
    pub velocities: BTreeMap<String, Vec<f64>>,
    pub headlosses: BTreeMap<String, Vec<f64>>,
    pub statuses: BTreeMap<String, Vec<i32>>,
    pub heads: BTreeMap<String, Vec<f64>>,
}

impl EpsResult {
    pub fn steps(&self) -> usize {
        self.time_s.len()
    }

    pub fn flow(&self, link_id: &str) -> Option<&[f64]> {
        self.flows.get(link_id).map(Vec::as_slice)
    }

    pub fn status(&self, link_id: &str) -> Option<&[i32]> {
        self.statuses.get(link_id).map(Vec::as_slice)
    }

    pub fn head(&self, node_id: &str) -> Option<&[f64]> {
        self.heads.get(node_id).map(Vec::as_slice)
    }

    /// Check timestamps strictly increase, every series matches their length,
    /// and every listed pump and valve has a status series.
    pub fn validate(&self) -> ScenarioResult<()> {
        let inconsistent = |what: String| ScenarioError::InconsistentSeries { what };

        if let Some(w) = self.time_s.windows(2).find(|w| !(w[0] < w[1])) {
            return Err(inconsistent(format!(
                "timestamps not strictly increasing at {} -> {}",
                w[0], w[1]
            )));
        }

        let steps = self.steps();
        let lengths = self
            .flows
            .iter()
            .chain(&self.velocities)
            .chain(&self.headlosses)
            .chain(&self.heads)
            .map(|(id, v)| (id, v.len()))
            .chain(self.statuses.iter().map(|(id, v)| (id, v.len())));
        for (id, len) in lengths {
            if len != steps {
                return Err(inconsistent(format!(
                    "series '{id}' has {len} entries, expected {steps}"
                )));
            }
        }

        for id in self.pump_ids.iter().chain(&self.valve_ids) {
            if !self.statuses.contains_key(id) {
                return Err(inconsistent(format!("no status series for '{id}'")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eps(time_s: Vec<f64>, status_len: usize) -> EpsResult {
        let mut statuses = BTreeMap::new();
        statuses.insert("PUMP_1".to_string(), vec![1; status_len]);
        EpsResult {
            topology: Topology::Simplified,
            time_s,
            pump_ids: vec!["PUMP_1".to_string()],
            valve_ids: vec![],
            flows: BTreeMap::new(),
            velocities: BTreeMap::new(),
            headlosses: BTreeMap::new(),
            statuses,
            heads: BTreeMap::new(),
        }
    }

    #[test]
    fn consistent_result_validates() {
        eps(vec![0.0, 3600.0, 7200.0], 3).validate().unwrap();
    }

    #[test]
    fn length_mismatch_rejected() {
        assert!(eps(vec![0.0, 3600.0], 3).validate().is_err());
    }

    #[test]
    fn repeated_timestamp_rejected() {
        assert!(eps(vec![0.0, 0.0], 2).validate().is_err());
    }

    #[test]
    fn missing_pump_status_rejected() {
        let mut r = eps(vec![0.0], 1);
        r.pump_ids.push("PUMP_2".to_string());
        assert!(matches!(
            r.validate(),
            Err(ScenarioError::InconsistentSeries { .. })
        ));
    }

    #[test]
    fn serde_round_trip_keeps_topology() {
        let r = eps(vec![0.0], 1);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"topology\":\"simplified\""));
        let back: EpsResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
