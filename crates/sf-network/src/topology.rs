//! Network topology adapter.
//!
//! The station model exists in two variants. The simplified one carries a
//! single downstream pipe `P_DS`; the subdivided one splits it into
//! `P_DS_1..P_DS_4` joined by intermediate junctions `J_DS_1..J_DS_3`.
//! Callers always see a `P_DS` entry: in the subdivided variant its flow,
//! velocity, and status come from the first segment and its headloss is the
//! head drop from `J_RIKO_OUT` to the `PLANT` reservoir.

use std::collections::BTreeMap;

use sf_core::{LinkIndex, NodeIndex};

use crate::error::{NetworkError, NetworkResult};
use crate::index::NameIndex;
use crate::series::{HydraulicSeries, LinkQuantity};

pub const P_INTAKE: &str = "P_INTAKE";
pub const P_US: &str = "P_US";
pub const P_DS: &str = "P_DS";
pub const P_DS_1: &str = "P_DS_1";

pub const J_SUCTION: &str = "J_SUCTION";
pub const J_MANIFOLD: &str = "J_MANIFOLD";
pub const J_RIKO_IN: &str = "J_RIKO_IN";
pub const J_RIKO_OUT: &str = "J_RIKO_OUT";

pub const SEA: &str = "SEA";
pub const PLANT: &str = "PLANT";

pub const SIMPLIFIED_PIPE_IDS: [&str; 3] = [P_INTAKE, P_US, P_DS];
pub const SUBDIVIDED_PIPE_IDS: [&str; 6] =
    [P_INTAKE, P_US, P_DS_1, "P_DS_2", "P_DS_3", "P_DS_4"];

pub const SIMPLIFIED_JUNCTION_IDS: [&str; 4] = [J_SUCTION, J_MANIFOLD, J_RIKO_IN, J_RIKO_OUT];
pub const SUBDIVIDED_JUNCTION_IDS: [&str; 7] = [
    J_SUCTION, J_MANIFOLD, J_RIKO_IN, J_RIKO_OUT, "J_DS_1", "J_DS_2", "J_DS_3",
];

pub const RESERVOIR_IDS: [&str; 2] = [SEA, PLANT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Simplified,
    Subdivided,
}

impl Topology {
    /// Pick the variant from the link names: `P_DS_1` marks the subdivided model.
    pub fn detect(links: &NameIndex) -> NetworkResult<Self> {
        if links.contains(P_DS_1) {
            Ok(Self::Subdivided)
        } else if links.contains(P_DS) {
            Ok(Self::Simplified)
        } else {
            Err(NetworkError::UnknownTopology {
                simplified: P_DS,
                subdivided: P_DS_1,
            })
        }
    }

    pub fn is_subdivided(self) -> bool {
        matches!(self, Self::Subdivided)
    }

    /// Pipes present in the network definition.
    pub fn pipe_ids(self) -> &'static [&'static str] {
        match self {
            Self::Simplified => &SIMPLIFIED_PIPE_IDS,
            Self::Subdivided => &SUBDIVIDED_PIPE_IDS,
        }
    }

    pub fn junction_ids(self) -> &'static [&'static str] {
        match self {
            Self::Simplified => &SIMPLIFIED_JUNCTION_IDS,
            Self::Subdivided => &SUBDIVIDED_JUNCTION_IDS,
        }
    }

    /// Pipe whose flow equals the station total.
    pub fn total_flow_pipe(self) -> &'static str {
        match self {
            Self::Simplified => P_DS,
            Self::Subdivided => P_DS_1,
        }
    }

    /// Look up every element this variant needs.
    pub fn resolve(self, links: &NameIndex, nodes: &NameIndex) -> NetworkResult<ResolvedTopology> {
        let pipes = self
            .pipe_ids()
            .iter()
            .map(|&id| Ok((id, links.require(id)?)))
            .collect::<NetworkResult<Vec<_>>>()?;
        let junctions = self
            .junction_ids()
            .iter()
            .map(|&id| Ok((id, nodes.require(id)?)))
            .collect::<NetworkResult<Vec<_>>>()?;
        let reservoirs = RESERVOIR_IDS
            .iter()
            .map(|&id| Ok((id, nodes.require(id)?)))
            .collect::<NetworkResult<Vec<_>>>()?;

        Ok(ResolvedTopology {
            topology: self,
            total_flow: links.require(self.total_flow_pipe())?,
            suction: nodes.require(J_SUCTION)?,
            manifold: nodes.require(J_MANIFOLD)?,
            valve_in: nodes.require(J_RIKO_IN)?,
            valve_out: nodes.require(J_RIKO_OUT)?,
            plant: nodes.require(PLANT)?,
            pipes,
            junctions,
            reservoirs,
        })
    }
}

/// Heads at the four junctions that define station head and valve loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyHeads {
    pub suction_m: f64,
    pub manifold_m: f64,
    pub valve_in_m: f64,
    pub valve_out_m: f64,
}

impl KeyHeads {
    /// Station head rise (manifold minus suction).
    pub fn pump_head_m(&self) -> f64 {
        self.manifold_m - self.suction_m
    }

    /// Head drop across the active control valve.
    pub fn valve_drop_m(&self) -> f64 {
        self.valve_in_m - self.valve_out_m
    }
}

/// Per-pipe snapshot values keyed by pipe id, aggregate `P_DS` included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipeResults {
    pub velocities: BTreeMap<String, f64>,
    pub headlosses: BTreeMap<String, f64>,
}

/// Per-pipe time series keyed by pipe id, aggregate `P_DS` included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipeSeries {
    pub flows: BTreeMap<String, Vec<f64>>,
    pub velocities: BTreeMap<String, Vec<f64>>,
    pub headlosses: BTreeMap<String, Vec<f64>>,
    pub statuses: BTreeMap<String, Vec<i32>>,
}

/// A topology with every element index resolved against a loaded network.
#[derive(Debug, Clone)]
pub struct ResolvedTopology {
    topology: Topology,
    pipes: Vec<(&'static str, LinkIndex)>,
    junctions: Vec<(&'static str, NodeIndex)>,
    reservoirs: Vec<(&'static str, NodeIndex)>,
    total_flow: LinkIndex,
    suction: NodeIndex,
    manifold: NodeIndex,
    valve_in: NodeIndex,
    valve_out: NodeIndex,
    plant: NodeIndex,
}

impl ResolvedTopology {
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Station total flow (l/s) at `step`.
    pub fn total_flow(&self, series: &HydraulicSeries, step: usize) -> NetworkResult<f64> {
        series.link_value(LinkQuantity::Flow, step, self.total_flow)
    }

    pub fn key_heads(&self, series: &HydraulicSeries, step: usize) -> NetworkResult<KeyHeads> {
        Ok(KeyHeads {
            suction_m: series.head_value(step, self.suction)?,
            manifold_m: series.head_value(step, self.manifold)?,
            valve_in_m: series.head_value(step, self.valve_in)?,
            valve_out_m: series.head_value(step, self.valve_out)?,
        })
    }

    /// Velocities and headlosses for every pipe at `step`.
    pub fn pipe_results(&self, series: &HydraulicSeries, step: usize) -> NetworkResult<PipeResults> {
        let mut out = PipeResults::default();
        for &(id, link) in &self.pipes {
            out.velocities.insert(
                id.to_string(),
                series.link_value(LinkQuantity::Velocity, step, link)?,
            );
            out.headlosses.insert(
                id.to_string(),
                series.link_value(LinkQuantity::Headloss, step, link)?,
            );
        }
        if self.topology.is_subdivided() {
            out.velocities.insert(
                P_DS.to_string(),
                series.link_value(LinkQuantity::Velocity, step, self.total_flow)?,
            );
            let head_drop = series.head_value(step, self.valve_out)? - series.head_value(step, self.plant)?;
            out.headlosses.insert(P_DS.to_string(), head_drop);
        }
        Ok(out)
    }

    /// Full time series for every pipe.
    pub fn pipe_series(&self, series: &HydraulicSeries) -> NetworkResult<PipeSeries> {
        let mut out = PipeSeries::default();
        for &(id, link) in &self.pipes {
            self.insert_link(&mut out, id, link, series)?;
        }
        if self.topology.is_subdivided() {
            self.insert_link(&mut out, P_DS, self.total_flow, series)?;
            let valve_out = series.head_series(self.valve_out)?;
            let plant = series.head_series(self.plant)?;
            let head_drop: Vec<f64> = valve_out.iter().zip(&plant).map(|(o, p)| o - p).collect();
            out.headlosses.insert(P_DS.to_string(), head_drop);
        }
        Ok(out)
    }

    fn insert_link(
        &self,
        out: &mut PipeSeries,
        id: &str,
        link: LinkIndex,
        series: &HydraulicSeries,
    ) -> NetworkResult<()> {
        out.flows
            .insert(id.to_string(), series.link_series(LinkQuantity::Flow, link)?);
        out.velocities
            .insert(id.to_string(), series.link_series(LinkQuantity::Velocity, link)?);
        out.headlosses
            .insert(id.to_string(), series.link_series(LinkQuantity::Headloss, link)?);
        out.statuses
            .insert(id.to_string(), series.status_series(link)?);
        Ok(())
    }

    /// Head series for every tracked junction and both reservoirs.
    pub fn node_heads(&self, series: &HydraulicSeries) -> NetworkResult<BTreeMap<String, Vec<f64>>> {
        self.junctions
            .iter()
            .chain(&self.reservoirs)
            .map(|&(id, node)| Ok((id.to_string(), series.head_series(node)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ElementKind;
    use crate::testing::ScriptedNetwork;

    fn indices(net: &ScriptedNetwork) -> (NameIndex, NameIndex) {
        (
            NameIndex::from_names(ElementKind::Link, net.link_names.clone()).unwrap(),
            NameIndex::from_names(ElementKind::Node, net.node_names.clone()).unwrap(),
        )
    }

    #[test]
    fn detects_both_variants() {
        let (links, _) = indices(&ScriptedNetwork::simplified());
        assert_eq!(Topology::detect(&links).unwrap(), Topology::Simplified);
        let (links, _) = indices(&ScriptedNetwork::subdivided());
        assert_eq!(Topology::detect(&links).unwrap(), Topology::Subdivided);
    }

    #[test]
    fn neither_marker_is_an_error() {
        let links = NameIndex::from_names(ElementKind::Link, vec!["P_INTAKE".into()]).unwrap();
        assert!(matches!(
            Topology::detect(&links),
            Err(NetworkError::UnknownTopology { .. })
        ));
    }

    #[test]
    fn subdivided_missing_segment_fails_resolution() {
        let mut net = ScriptedNetwork::subdivided();
        net.link_names.retain(|n| n != "P_DS_3");
        let (links, nodes) = indices(&net);
        let err = Topology::Subdivided.resolve(&links, &nodes).unwrap_err();
        assert!(matches!(err, NetworkError::MissingElement { ref id, .. } if id == "P_DS_3"));
    }

    #[test]
    fn subdivided_aggregate_is_head_drop_to_plant() {
        let net = ScriptedNetwork::subdivided();
        let (links, nodes) = indices(&net);
        let resolved = Topology::Subdivided.resolve(&links, &nodes).unwrap();

        let mut series = HydraulicSeries::zeros(vec![0.0], links.len(), nodes.len());
        let heads = [("J_RIKO_OUT", 21.0), ("J_DS_1", 20.2), ("J_DS_2", 19.5), ("J_DS_3", 18.8), ("PLANT", 18.17)];
        for (id, h) in heads {
            series.set_head(0, nodes.require(id).unwrap(), h).unwrap();
        }
        let segments = [("P_DS_1", 0.8), ("P_DS_2", 0.7), ("P_DS_3", 0.7), ("P_DS_4", 0.63)];
        for (id, hl) in segments {
            series
                .set_link_value(LinkQuantity::Headloss, 0, links.require(id).unwrap(), hl)
                .unwrap();
        }
        series
            .set_link_value(LinkQuantity::Velocity, 0, links.require("P_DS_1").unwrap(), 2.1)
            .unwrap();

        let snap = resolved.pipe_results(&series, 0).unwrap();
        let segment_sum: f64 = segments.iter().map(|(_, hl)| hl).sum();
        assert!((snap.headlosses["P_DS"] - segment_sum).abs() < 1e-9);
        assert_eq!(snap.velocities["P_DS"], 2.1);
        assert!(snap.headlosses.contains_key("P_DS_4"));

        let full = resolved.pipe_series(&series).unwrap();
        assert!((full.headlosses["P_DS"][0] - 2.83).abs() < 1e-9);
        assert_eq!(full.velocities["P_DS"], vec![2.1]);
    }

    #[test]
    fn key_heads_derive_pump_head_and_valve_drop() {
        let heads = KeyHeads {
            suction_m: 1.5,
            manifold_m: 27.62,
            valve_in_m: 26.9,
            valve_out_m: 19.39,
        };
        assert!((heads.pump_head_m() - 26.12).abs() < 1e-9);
        assert!((heads.valve_drop_m() - 7.51).abs() < 1e-9);
    }

    #[test]
    fn node_heads_cover_junctions_and_reservoirs() {
        let net = ScriptedNetwork::simplified();
        let (links, nodes) = indices(&net);
        let resolved = Topology::Simplified.resolve(&links, &nodes).unwrap();
        let series = HydraulicSeries::zeros(vec![0.0, 3600.0], links.len(), nodes.len());
        let heads = resolved.node_heads(&series).unwrap();
        assert_eq!(heads.len(), 6);
        assert!(heads.contains_key("SEA"));
        assert_eq!(heads["PLANT"].len(), 2);
    }
}
