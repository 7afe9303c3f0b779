//! Steady-state (zero-duration) scenario on a fresh solver instance.

use std::path::Path;

use sf_catalog::{DUTY_PUMP_IDS, N_DUTY_PUMPS, OperatingPoint, STANDBY_PUMP_ID, VALVE_IDS_ALL};
use sf_network::{
    HydraulicSeries, LinkStatus, NameIndex, NetworkHandle, ResolvedTopology, SolverBackend,
    SolverSession, Topology,
};
use tracing::{debug, info};

use crate::error::{ScenarioError, ScenarioResult};
use crate::results::SteadyStateResult;

pub(crate) fn check_pump_count(n_pumps: usize) -> ScenarioResult<()> {
    if n_pumps == 0 || n_pumps > N_DUTY_PUMPS {
        return Err(ScenarioError::PumpCount {
            n: n_pumps,
            max: N_DUTY_PUMPS,
        });
    }
    Ok(())
}

/// Valve-opening elements present in the loaded network, in scan priority order.
pub(crate) fn valve_elements(links: &NameIndex) -> Vec<&'static str> {
    VALVE_IDS_ALL
        .iter()
        .copied()
        .filter(|id| links.contains(id))
        .collect()
}

/// Solve one operating point. The point's valve element must belong to
/// `catalog_valves`; every other valve element in the network is closed.
pub(crate) fn run_point<B: SolverBackend>(
    backend: &B,
    network_path: &Path,
    point: &OperatingPoint,
    catalog_valves: &[&str],
) -> ScenarioResult<SteadyStateResult> {
    check_pump_count(point.n_pumps)?;
    if !catalog_valves.contains(&point.valve_link_id) {
        return Err(ScenarioError::UnknownValve {
            valve_id: point.valve_link_id.to_string(),
        });
    }
    info!(
        n_pumps = point.n_pumps,
        valve = point.valve_link_id,
        "running steady scenario"
    );

    let mut session = SolverSession::open(backend, network_path)?;
    let topology = Topology::detect(session.links())?;
    debug!(?topology, "network topology detected");
    let resolved = topology.resolve(session.links(), session.nodes())?;

    session.set_duration(0)?;
    configure_pumps(&mut session, point.n_pumps)?;
    configure_valves(&mut session, point.valve_link_id)?;

    let series = session.compute()?;
    extract(&resolved, &series, point)
}

/// First `n_active` duty pumps open, the rest and the standby closed.
fn configure_pumps<H: NetworkHandle>(
    session: &mut SolverSession<H>,
    n_active: usize,
) -> ScenarioResult<()> {
    for (i, pump_id) in DUTY_PUMP_IDS.iter().enumerate() {
        session.set_link_status(pump_id, LinkStatus::from_open(i < n_active))?;
    }
    session.set_link_status(STANDBY_PUMP_ID, LinkStatus::Closed)?;
    Ok(())
}

/// `active` open, every other valve element of the network closed.
fn configure_valves<H: NetworkHandle>(
    session: &mut SolverSession<H>,
    active: &str,
) -> ScenarioResult<()> {
    session.links().require(active)?;
    for valve_id in valve_elements(session.links()) {
        session.set_link_status(valve_id, LinkStatus::from_open(valve_id == active))?;
    }
    Ok(())
}

fn extract(
    resolved: &ResolvedTopology,
    series: &HydraulicSeries,
    point: &OperatingPoint,
) -> ScenarioResult<SteadyStateResult> {
    let q_total_lps = resolved.total_flow(series, 0)?;
    let heads = resolved.key_heads(series, 0)?;
    let pipes = resolved.pipe_results(series, 0)?;

    Ok(SteadyStateResult {
        n_active_pumps: point.n_pumps,
        valve_opening_pct: point.phi_pct,
        topology: resolved.topology(),
        q_total_lps,
        q_per_pump_lps: q_total_lps / point.n_pumps as f64,
        h_pump_m: heads.pump_head_m(),
        dh_valve_m: heads.valve_drop_m(),
        h_suction_m: heads.suction_m,
        h_manifold_m: heads.manifold_m,
        h_valve_in_m: heads.valve_in_m,
        h_valve_out_m: heads.valve_out_m,
        pipe_velocities: pipes.velocities,
        pipe_headlosses: pipes.headlosses,
    })
}
