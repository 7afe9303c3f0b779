//! Discrete control configurations of the throttling valve.

use serde::{Deserialize, Serialize};

use crate::elements::{VALVE_IDS, VALVE_IDS_ALL};

/// One valve opening and the pump count it is staged with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingPoint {
    /// Valve opening (%)
    pub phi_pct: u32,
    /// Flow coefficient Kv (m³/h)
    pub kv_m3h: f64,
    /// Active duty pumps
    pub n_pumps: usize,
    /// Solver link that represents this opening
    pub valve_link_id: &'static str,
    /// Headloss curve bound to that link
    pub curve_id: &'static str,
}

impl OperatingPoint {
    /// True for the four openings staged one per pump count.
    pub fn is_canonical(&self) -> bool {
        CANONICAL_PHI.contains(&self.phi_pct)
    }
}

const CANONICAL_PHI: [u32; 4] = [44, 38, 30, 22];

/// All seven openings, largest first. Kv values are exact rows of the valve
/// manufacturer's 2 % step table.
pub static OPENINGS_ALL: [OperatingPoint; 7] = [
    OperatingPoint {
        phi_pct: 44,
        kv_m3h: 21038.45,
        n_pumps: 4,
        valve_link_id: "RIKO_44",
        curve_id: "RIKO_44pct",
    },
    OperatingPoint {
        phi_pct: 40,
        kv_m3h: 16511.59,
        n_pumps: 4,
        valve_link_id: "RIKO_40",
        curve_id: "RIKO_40pct",
    },
    OperatingPoint {
        phi_pct: 38,
        kv_m3h: 14444.21,
        n_pumps: 3,
        valve_link_id: "RIKO_38",
        curve_id: "RIKO_38pct",
    },
    OperatingPoint {
        phi_pct: 34,
        kv_m3h: 10735.54,
        n_pumps: 3,
        valve_link_id: "RIKO_34",
        curve_id: "RIKO_34pct",
    },
    OperatingPoint {
        phi_pct: 30,
        kv_m3h: 7621.47,
        n_pumps: 2,
        valve_link_id: "RIKO_30",
        curve_id: "RIKO_30pct",
    },
    OperatingPoint {
        phi_pct: 26,
        kv_m3h: 5109.57,
        n_pumps: 2,
        valve_link_id: "RIKO_26",
        curve_id: "RIKO_26pct",
    },
    OperatingPoint {
        phi_pct: 22,
        kv_m3h: 3179.78,
        n_pumps: 1,
        valve_link_id: "RIKO_22",
        curve_id: "RIKO_22pct",
    },
];

/// Which catalog a batch runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSet {
    /// One opening per pump count (44, 38, 30, 22 %).
    #[default]
    Canonical,
    /// All seven openings, including the intermediate 40, 34, 26 %.
    Extended,
}

impl CatalogSet {
    pub fn openings(self) -> Vec<OperatingPoint> {
        OPENINGS_ALL
            .iter()
            .filter(|o| self == CatalogSet::Extended || o.is_canonical())
            .copied()
            .collect()
    }

    /// Valve elements a scenario of this catalog must drive, in scan priority order.
    pub fn valve_ids(self) -> &'static [&'static str] {
        match self {
            CatalogSet::Canonical => &VALVE_IDS,
            CatalogSet::Extended => &VALVE_IDS_ALL,
        }
    }
}

/// Canonical opening for a pump count (1..=4).
pub fn opening_for_pumps(n_pumps: usize) -> Option<&'static OperatingPoint> {
    OPENINGS_ALL
        .iter()
        .find(|o| o.is_canonical() && o.n_pumps == n_pumps)
}

/// Opening for a valve percentage, across the extended catalog.
pub fn opening_for_phi(phi_pct: u32) -> Option<&'static OperatingPoint> {
    OPENINGS_ALL.iter().find(|o| o.phi_pct == phi_pct)
}

/// Opening driven by a given solver valve link.
pub fn opening_for_valve(valve_link_id: &str) -> Option<&'static OperatingPoint> {
    OPENINGS_ALL
        .iter()
        .find(|o| o.valve_link_id == valve_link_id)
}
