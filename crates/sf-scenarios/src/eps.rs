//! Extended-period run with scheduled pump trips.
//!
//! Trips are layered on top of the network's embedded rule-based controls as
//! plain time-triggered link controls; the embedded rules are never touched.

use std::path::Path;

use sf_catalog::{EPS_HORIZON_H, PUMP_IDS};
use sf_network::{LinkQuantity, LinkStatus, SolverBackend, SolverSession, Topology};
use tracing::{debug, info};

use crate::error::ScenarioResult;
use crate::results::EpsResult;
use crate::steady::valve_elements;
use crate::trips::{PumpTripEvent, hours_to_seconds};

pub(crate) fn run_schedule<B: SolverBackend>(
    backend: &B,
    network_path: &Path,
    trips: &[PumpTripEvent],
) -> ScenarioResult<EpsResult> {
    for trip in trips {
        trip.validate()?;
    }
    info!(trips = trips.len(), "running extended-period scenario");

    let mut session = SolverSession::open(backend, network_path)?;
    let topology = Topology::detect(session.links())?;
    debug!(?topology, "network topology detected");
    let resolved = topology.resolve(session.links(), session.nodes())?;

    session.set_duration(hours_to_seconds(EPS_HORIZON_H))?;
    for trip in trips {
        session.add_link_control(&trip.pump_id, LinkStatus::Closed, trip.trip_seconds())?;
        session.add_link_control(&trip.pump_id, LinkStatus::Open, trip.restore_seconds())?;
    }

    let series = session.compute()?;

    let valve_ids = valve_elements(session.links());
    let mut pipes = resolved.pipe_series(&series)?;
    for &link_id in PUMP_IDS.iter().chain(&valve_ids) {
        let link = session.links().require(link_id)?;
        let key = link_id.to_string();
        pipes
            .flows
            .insert(key.clone(), series.link_series(LinkQuantity::Flow, link)?);
        pipes
            .velocities
            .insert(key.clone(), series.link_series(LinkQuantity::Velocity, link)?);
        pipes
            .headlosses
            .insert(key.clone(), series.link_series(LinkQuantity::Headloss, link)?);
        pipes.statuses.insert(key, series.status_series(link)?);
    }

    let result = EpsResult {
        topology,
        time_s: series.time_s.clone(),
        pump_ids: PUMP_IDS.iter().map(|s| s.to_string()).collect(),
        valve_ids: valve_ids.iter().map(|s| s.to_string()).collect(),
        flows: pipes.flows,
        velocities: pipes.velocities,
        headlosses: pipes.headlosses,
        statuses: pipes.statuses,
        heads: resolved.node_heads(&series)?,
    };
    result.validate()?;
    Ok(result)
}
