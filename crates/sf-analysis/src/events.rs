//! EPS event log: one row per maximal run of identical station state.
//!
//! A row is emitted at the first timestep, wherever the pump on/off vector or
//! the active valve opening differs from the previous timestep, and at the
//! last timestep.

use std::fmt;

use serde::{Deserialize, Serialize};
use sf_catalog::valve_label;
use sf_core::lps_to_m3h;
use sf_network::topology::{J_MANIFOLD, J_SUCTION, P_DS};
use sf_scenarios::EpsResult;

use crate::error::{AnalysisError, AnalysisResult};

/// Valve opening active at a timestep, shown as `44%` or `---`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ActiveValve {
    None,
    Opening(String),
}

const NO_VALVE: &str = "---";

impl fmt::Display for ActiveValve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveValve::None => write!(f, "{NO_VALVE}"),
            ActiveValve::Opening(label) => write!(f, "{label}"),
        }
    }
}

impl From<ActiveValve> for String {
    fn from(v: ActiveValve) -> Self {
        v.to_string()
    }
}

impl From<String> for ActiveValve {
    fn from(s: String) -> Self {
        if s == NO_VALVE {
            ActiveValve::None
        } else {
            ActiveValve::Opening(s)
        }
    }
}

/// Position in the run, whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    pub hours: u64,
    pub minutes: u32,
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours, self.minutes)
    }
}

pub fn format_sim_time(seconds: f64) -> SimTime {
    let s = seconds.max(0.0) as u64;
    SimTime {
        hours: s / 3600,
        minutes: ((s % 3600) / 60) as u32,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpsEventRow {
    pub time_s: f64,
    pub time: SimTime,
    /// One entry per pump, in the result's pump order.
    pub pump_on: Vec<bool>,
    pub n_active: usize,
    pub valve: ActiveValve,
    pub q_ds_lps: f64,
    pub q_ds_m3h: f64,
    pub h_pump_m: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StationState {
    pump_on: Vec<bool>,
    valve: ActiveValve,
}

fn require<'a, T>(series: Option<&'a [T]>, kind: &'static str, id: &str) -> AnalysisResult<&'a [T]> {
    series.ok_or_else(|| AnalysisError::MissingSeries {
        kind,
        id: id.to_string(),
    })
}

/// Compress an EPS result into its state-change rows.
pub fn compress_events(eps: &EpsResult) -> AnalysisResult<Vec<EpsEventRow>> {
    eps.validate()?;

    let pumps = eps
        .pump_ids
        .iter()
        .map(|id| require(eps.status(id), "status", id))
        .collect::<AnalysisResult<Vec<_>>>()?;
    let valves = eps
        .valve_ids
        .iter()
        .map(|id| Ok((id.as_str(), require(eps.status(id), "status", id)?)))
        .collect::<AnalysisResult<Vec<_>>>()?;
    let q_ds = require(eps.flow(P_DS), "flow", P_DS)?;
    let manifold = require(eps.head(J_MANIFOLD), "head", J_MANIFOLD)?;
    let suction = require(eps.head(J_SUCTION), "head", J_SUCTION)?;

    let state_at = |i: usize| StationState {
        pump_on: pumps.iter().map(|s| s[i] != 0).collect(),
        // Later entries in priority order override earlier ones.
        valve: valves
            .iter()
            .rev()
            .find(|(_, s)| s[i] != 0)
            .map_or(ActiveValve::None, |(id, _)| ActiveValve::Opening(valve_label(id))),
    };

    let states: Vec<StationState> = (0..eps.steps()).map(state_at).collect();
    let last = states.len().saturating_sub(1);

    let rows = states
        .iter()
        .enumerate()
        .filter(|&(i, state)| i == 0 || i == last || *state != states[i - 1])
        .map(|(i, state)| EpsEventRow {
            time_s: eps.time_s[i],
            time: format_sim_time(eps.time_s[i]),
            n_active: state.pump_on.iter().filter(|&&on| on).count(),
            pump_on: state.pump_on.clone(),
            valve: state.valve.clone(),
            q_ds_lps: q_ds[i],
            q_ds_m3h: lps_to_m3h(q_ds[i]),
            h_pump_m: manifold[i] - suction[i],
        })
        .collect();
    Ok(rows)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    use std::collections::BTreeMap;

    use sf_network::Topology;

    fn eps_from(pump_1: Vec<bool>, pump_2: Vec<bool>) -> EpsResult {
        let n = pump_1.len();
        let to_codes = |v: &[bool]| v.iter().map(|&b| i32::from(b)).collect::<Vec<_>>();
        let mut statuses = BTreeMap::new();
        statuses.insert("PUMP_1".to_string(), to_codes(&pump_1));
        statuses.insert("PUMP_2".to_string(), to_codes(&pump_2));
        let mut flows = BTreeMap::new();
        flows.insert("P_DS".to_string(), vec![1000.0; n]);
        let mut heads = BTreeMap::new();
        heads.insert("J_MANIFOLD".to_string(), vec![30.0; n]);
        heads.insert("J_SUCTION".to_string(), vec![1.0; n]);
        EpsResult {
            topology: Topology::Simplified,
            time_s: (0..n).map(|i| i as f64 * 3600.0).collect(),
            pump_ids: vec!["PUMP_1".to_string(), "PUMP_2".to_string()],
            valve_ids: vec![],
            flows,
            velocities: BTreeMap::new(),
            headlosses: BTreeMap::new(),
            statuses,
            heads,
        }
    }

    proptest! {
        #[test]
        fn rows_match_runs_of_identical_state(
            pairs in prop::collection::vec((any::<bool>(), any::<bool>()), 1..60)
        ) {
            let (p1, p2): (Vec<bool>, Vec<bool>) = pairs.iter().copied().unzip();
            let rows = compress_events(&eps_from(p1, p2)).unwrap();

            // Start of every maximal run, plus the final index if it does not start a run.
            let mut expected: Vec<usize> = (0..pairs.len())
                .filter(|&i| i == 0 || pairs[i] != pairs[i - 1])
                .collect();
            let last = pairs.len() - 1;
            if expected.last() != Some(&last) {
                expected.push(last);
            }

            let emitted: Vec<usize> = rows.iter().map(|r| (r.time_s / 3600.0) as usize).collect();
            prop_assert_eq!(emitted, expected);
            prop_assert_eq!(rows[0].time_s, 0.0);
            for r in &rows {
                prop_assert_eq!(r.n_active, r.pump_on.iter().filter(|&&b| b).count());
            }
        }

        #[test]
        fn whole_minutes_format_exactly(minute in 0_u64..=1440) {
            let t = format_sim_time((minute * 60) as f64);
            prop_assert_eq!(t.hours, minute / 60);
            prop_assert_eq!(u64::from(t.minutes), minute % 60);
        }
    }
}
