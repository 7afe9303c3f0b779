//! In-memory solver backend for tests.
//!
//! `ScriptedBackend` answers solves with a closure over the applied
//! configuration, and counts loads, solves, and releases so tests can check
//! the instance lifecycle.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use std::collections::BTreeMap;

use sf_catalog::{
    DUTY_PUMP_IDS, H_PLANT_M, N_DUTY_PUMPS, PUMP_IDS, ReferencePoint, VALVE_IDS_ALL,
    opening_for_pumps, opening_for_valve, reference_for_phi, reference_for_pumps,
};
use sf_core::{ElementIndex, LinkIndex, NodeIndex};

use crate::error::{NetworkError, NetworkResult};
use crate::index::{ElementKind, NameIndex};
use crate::series::{HydraulicSeries, LinkQuantity};
use crate::solver::{LinkStatus, NetworkHandle, SimpleControl, SolverBackend};
use crate::topology::{
    J_MANIFOLD, J_RIKO_IN, J_RIKO_OUT, J_SUCTION, P_DS, P_DS_1, PLANT, RESERVOIR_IDS, SEA,
    SIMPLIFIED_JUNCTION_IDS, SIMPLIFIED_PIPE_IDS, SUBDIVIDED_JUNCTION_IDS, SUBDIVIDED_PIPE_IDS,
};

/// Element names of a scripted network, in solver index order.
#[derive(Debug, Clone)]
pub struct ScriptedNetwork {
    pub link_names: Vec<String>,
    pub node_names: Vec<String>,
}

impl ScriptedNetwork {
    fn build(pipes: &[&str], junctions: &[&str]) -> Self {
        let link_names = pipes
            .iter()
            .chain(PUMP_IDS.iter())
            .chain(VALVE_IDS_ALL.iter())
            .map(|s| s.to_string())
            .collect();
        let node_names = junctions
            .iter()
            .chain(RESERVOIR_IDS.iter())
            .map(|s| s.to_string())
            .collect();
        Self {
            link_names,
            node_names,
        }
    }

    /// Station model with a single downstream pipe.
    pub fn simplified() -> Self {
        Self::build(&SIMPLIFIED_PIPE_IDS, &SIMPLIFIED_JUNCTION_IDS)
    }

    /// Station model with the downstream pipe split in four segments.
    pub fn subdivided() -> Self {
        Self::build(&SUBDIVIDED_PIPE_IDS, &SUBDIVIDED_JUNCTION_IDS)
    }

    pub fn link(&self, id: &str) -> NetworkResult<LinkIndex> {
        NameIndex::from_names(ElementKind::Link, self.link_names.clone())?.require(id)
    }

    pub fn node(&self, id: &str) -> NetworkResult<NodeIndex> {
        NameIndex::from_names(ElementKind::Node, self.node_names.clone())?.require(id)
    }

    /// All-zero series sized for this network.
    pub fn zeros(&self, time_s: Vec<f64>) -> HydraulicSeries {
        HydraulicSeries::zeros(time_s, self.link_names.len(), self.node_names.len())
    }
}

/// Configuration a handle received before it was solved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedState {
    pub initial_status: BTreeMap<String, LinkStatus>,
    pub controls: Vec<SimpleControl>,
    pub duration_s: Option<u64>,
}

impl AppliedState {
    /// Initial status was set to open. Links never touched count as closed.
    pub fn is_open(&self, link_id: &str) -> bool {
        self.initial_status
            .get(link_id)
            .is_some_and(|s| s.is_open())
    }

    pub fn open_links(&self) -> Vec<&str> {
        self.initial_status
            .iter()
            .filter(|(_, s)| s.is_open())
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct BackendStats {
    loads: AtomicUsize,
    solves: AtomicUsize,
    releases: AtomicUsize,
}

impl BackendStats {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn solves(&self) -> usize {
        self.solves.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

type SolveFn = dyn Fn(&ScriptedNetwork, &AppliedState) -> NetworkResult<HydraulicSeries> + Send + Sync;

pub struct ScriptedBackend {
    network: Arc<ScriptedNetwork>,
    solve: Arc<SolveFn>,
    stats: Arc<BackendStats>,
    solved_states: Arc<Mutex<Vec<AppliedState>>>,
    load_failure: Option<String>,
    concurrent: bool,
}

impl ScriptedBackend {
    pub fn new<F>(network: ScriptedNetwork, solve: F) -> Self
    where
        F: Fn(&ScriptedNetwork, &AppliedState) -> NetworkResult<HydraulicSeries>
            + Send
            + Sync
            + 'static,
    {
        Self {
            network: Arc::new(network),
            solve: Arc::new(solve),
            stats: Arc::new(BackendStats::default()),
            solved_states: Arc::new(Mutex::new(Vec::new())),
            load_failure: None,
            concurrent: false,
        }
    }

    /// Every load fails with `message`.
    pub fn with_load_failure(mut self, message: impl Into<String>) -> Self {
        self.load_failure = Some(message.into());
        self
    }

    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn network(&self) -> &ScriptedNetwork {
        &self.network
    }

    pub fn stats(&self) -> &BackendStats {
        &self.stats
    }

    /// States of all solved instances, in solve order.
    pub fn solved_states(&self) -> Vec<AppliedState> {
        self.solved_states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_state(&self) -> Option<AppliedState> {
        self.solved_states().pop()
    }
}

impl SolverBackend for ScriptedBackend {
    type Handle = ScriptedHandle;

    fn load(&self, path: &Path) -> NetworkResult<ScriptedHandle> {
        if let Some(message) = &self.load_failure {
            return Err(NetworkError::Load {
                path: path.to_path_buf(),
                message: message.clone(),
            });
        }
        self.stats.loads.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedHandle {
            network: Arc::clone(&self.network),
            solve: Arc::clone(&self.solve),
            stats: Arc::clone(&self.stats),
            solved_states: Arc::clone(&self.solved_states),
            state: AppliedState::default(),
            released: false,
        })
    }

    fn supports_concurrent_instances(&self) -> bool {
        self.concurrent
    }
}

pub struct ScriptedHandle {
    network: Arc<ScriptedNetwork>,
    solve: Arc<SolveFn>,
    stats: Arc<BackendStats>,
    solved_states: Arc<Mutex<Vec<AppliedState>>>,
    state: AppliedState,
    released: bool,
}

impl ScriptedHandle {
    fn link_name(&self, link: ElementIndex) -> NetworkResult<String> {
        self.network
            .link_names
            .get(link.column())
            .cloned()
            .ok_or_else(|| NetworkError::Solver {
                message: format!("link index {link} out of range"),
            })
    }

    fn ensure_live(&self) -> NetworkResult<()> {
        if self.released {
            return Err(NetworkError::Solver {
                message: "instance already released".to_string(),
            });
        }
        Ok(())
    }
}

impl NetworkHandle for ScriptedHandle {
    fn link_names(&self) -> NetworkResult<Vec<String>> {
        Ok(self.network.link_names.clone())
    }

    fn node_names(&self) -> NetworkResult<Vec<String>> {
        Ok(self.network.node_names.clone())
    }

    fn set_link_initial_status(&mut self, link: LinkIndex, status: LinkStatus) -> NetworkResult<()> {
        self.ensure_live()?;
        let name = self.link_name(link)?;
        self.state.initial_status.insert(name, status);
        Ok(())
    }

    fn add_control(&mut self, control: &SimpleControl) -> NetworkResult<()> {
        self.ensure_live()?;
        self.link_name(control.link)?;
        self.state.controls.push(control.clone());
        Ok(())
    }

    fn set_duration(&mut self, seconds: u64) -> NetworkResult<()> {
        self.ensure_live()?;
        self.state.duration_s = Some(seconds);
        Ok(())
    }

    fn compute_time_series(&mut self) -> NetworkResult<HydraulicSeries> {
        self.ensure_live()?;
        self.stats.solves.fetch_add(1, Ordering::SeqCst);
        self.solved_states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(self.state.clone());
        (self.solve)(&self.network, &self.state)
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.stats.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Backend that answers like the real station, using catalog reference points.
///
/// Steady solves (duration 0 or unset) return one step for the configured
/// initial statuses. EPS solves return hourly steps; links never configured
/// start in the model's embedded state (duty pumps and `RIKO_44` open), timed
/// controls are applied at their second, and the valve element follows the
/// number of running pumps the way the embedded rules do.
pub fn reference_station(network: ScriptedNetwork) -> ScriptedBackend {
    ScriptedBackend::new(network, station_series)
}

const SUCTION_HEAD_M: f64 = 1.2;
const MANIFOLD_TO_VALVE_LOSS_M: f64 = 0.3;

pub fn station_series(net: &ScriptedNetwork, state: &AppliedState) -> NetworkResult<HydraulicSeries> {
    let duration = state.duration_s.unwrap_or(0);
    let eps = duration > 0;
    let time_s: Vec<f64> = (0..=duration / 3600).map(|h| (h * 3600) as f64).collect();
    let mut series = net.zeros(time_s.clone());

    for (step, &t) in time_s.iter().enumerate() {
        let running: Vec<&str> = PUMP_IDS
            .iter()
            .copied()
            .filter(|id| pump_open_at(state, id, t as u64, eps))
            .collect();
        let open_valve = if eps {
            opening_for_pumps(running.len().min(N_DUTY_PUMPS)).map(|o| o.valve_link_id)
        } else {
            VALVE_IDS_ALL.iter().copied().find(|id| state.is_open(id))
        };
        let reference = match open_valve {
            Some(v) => opening_for_valve(v).and_then(|o| reference_for_phi(o.phi_pct)),
            None => reference_for_pumps(running.len().min(N_DUTY_PUMPS)),
        };
        write_step(net, &mut series, step, &running, open_valve, reference)?;
    }
    Ok(series)
}

fn pump_open_at(state: &AppliedState, pump_id: &str, t: u64, eps: bool) -> bool {
    let initial = match state.initial_status.get(pump_id) {
        Some(status) => status.is_open(),
        None => eps && DUTY_PUMP_IDS.contains(&pump_id),
    };
    let mut controls: Vec<&SimpleControl> = state
        .controls
        .iter()
        .filter(|c| c.link_id == pump_id && c.at_time_s <= t)
        .collect();
    controls.sort_by_key(|c| c.at_time_s);
    controls.last().map_or(initial, |c| c.status.is_open())
}

fn write_step(
    net: &ScriptedNetwork,
    series: &mut HydraulicSeries,
    step: usize,
    running: &[&str],
    open_valve: Option<&str>,
    reference: Option<&ReferencePoint>,
) -> NetworkResult<()> {
    let (q, h, dh, v) = match (running.is_empty(), reference) {
        (false, Some(r)) => (r.q_total_lps, r.h_pump_m, r.dh_valve_m, r.v_pipe_ms),
        _ => (0.0, 0.0, 0.0, 0.0),
    };

    for pump in running {
        let link = net.link(pump)?;
        series.set_status(step, link, 1)?;
        series.set_link_value(LinkQuantity::Flow, step, link, q / running.len() as f64)?;
    }
    if let Some(valve) = open_valve {
        let link = net.link(valve)?;
        series.set_status(step, link, 1)?;
        series.set_link_value(LinkQuantity::Flow, step, link, q)?;
        series.set_link_value(LinkQuantity::Headloss, step, link, dh)?;
    }

    let manifold = SUCTION_HEAD_M + h;
    let valve_in = manifold - MANIFOLD_TO_VALVE_LOSS_M;
    let valve_out = valve_in - dh;
    for (id, head) in [
        (SEA, 0.0),
        (J_SUCTION, SUCTION_HEAD_M),
        (J_MANIFOLD, manifold),
        (J_RIKO_IN, valve_in),
        (J_RIKO_OUT, valve_out),
        (PLANT, H_PLANT_M),
    ] {
        series.set_head(step, net.node(id)?, head)?;
    }

    let downstream_loss = valve_out - H_PLANT_M;
    let downstream: Vec<&str> = net
        .link_names
        .iter()
        .map(String::as_str)
        .filter(|id| *id == P_DS || id.starts_with("P_DS_"))
        .collect();
    let segments = downstream.len().max(1) as f64;
    for (i, id) in downstream.iter().enumerate() {
        let link = net.link(id)?;
        series.set_status(step, link, 1)?;
        series.set_link_value(LinkQuantity::Flow, step, link, q)?;
        series.set_link_value(LinkQuantity::Velocity, step, link, v)?;
        series.set_link_value(LinkQuantity::Headloss, step, link, downstream_loss / segments)?;
        if *id != P_DS && *id != P_DS_1 {
            // J_DS_i sits upstream of segment P_DS_{i+1}.
            let node = net.node(&format!("J_DS_{i}"))?;
            let head = valve_out - downstream_loss * i as f64 / segments;
            series.set_head(step, node, head)?;
        }
    }
    for id in ["P_INTAKE", "P_US"] {
        let link = net.link(id)?;
        series.set_status(step, link, 1)?;
        series.set_link_value(LinkQuantity::Flow, step, link, q)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_idempotent() {
        let backend = ScriptedBackend::new(ScriptedNetwork::simplified(), |net, _| {
            Ok(net.zeros(vec![0.0]))
        });
        let mut handle = backend.load(Path::new("x.inp")).unwrap();
        handle.release();
        handle.release();
        assert_eq!(backend.stats().releases(), 1);
        assert!(handle.compute_time_series().is_err());
    }

    #[test]
    fn load_failure_counts_nothing() {
        let backend = ScriptedBackend::new(ScriptedNetwork::simplified(), |net, _| {
            Ok(net.zeros(vec![0.0]))
        })
        .with_load_failure("file not found");
        assert!(matches!(
            backend.load(Path::new("missing.inp")),
            Err(NetworkError::Load { .. })
        ));
        assert_eq!(backend.stats().loads(), 0);
    }

    #[test]
    fn station_steady_matches_reference() {
        let net = ScriptedNetwork::simplified();
        let mut state = AppliedState::default();
        for id in ["PUMP_1", "PUMP_2", "PUMP_3", "PUMP_4", "RIKO_44"] {
            state.initial_status.insert(id.to_string(), LinkStatus::Open);
        }
        let series = station_series(&net, &state).unwrap();
        assert_eq!(series.steps(), 1);
        let q = series
            .link_value(LinkQuantity::Flow, 0, net.link("P_DS").unwrap())
            .unwrap();
        assert_eq!(q, 5016.0);
    }

    #[test]
    fn station_eps_applies_controls() {
        let net = ScriptedNetwork::simplified();
        let pump = net.link("PUMP_4").unwrap();
        let mut state = AppliedState {
            duration_s: Some(24 * 3600),
            ..AppliedState::default()
        };
        for (status, at) in [(LinkStatus::Closed, 21_600), (LinkStatus::Open, 28_800)] {
            state.controls.push(SimpleControl {
                link: pump,
                link_id: "PUMP_4".to_string(),
                status,
                at_time_s: at,
            });
        }
        let series = station_series(&net, &state).unwrap();
        assert_eq!(series.steps(), 25);
        let status = series.status_series(pump).unwrap();
        assert_eq!(&status[5..9], &[1, 0, 0, 1]);
        let riko_38 = series.status_series(net.link("RIKO_38").unwrap()).unwrap();
        assert_eq!(&riko_38[5..9], &[0, 1, 1, 0]);
    }

    #[test]
    fn networks_list_tracked_elements() {
        let net = ScriptedNetwork::subdivided();
        assert!(net.link("P_DS_4").is_ok());
        assert!(net.link("PUMP_5").is_ok());
        assert!(net.link("RIKO_26").is_ok());
        assert!(net.node("J_DS_3").is_ok());
        assert!(net.node("PLANT").is_ok());
        assert!(ScriptedNetwork::simplified().link("P_DS_1").is_err());
    }
}
