//! Hand-calculated operating points used to validate solver output.
//!
//! Pump curve H = 46.54 - 5.300e-4 * Q^1.480, Darcy-Weisbach friction with
//! Colebrook-White, nu = 1.05e-6 m²/s, solved by Newton iteration.

use serde::Serialize;

/// Reference physics at one operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub phi_pct: u32,
    pub n_pumps: usize,
    pub q_total_lps: f64,
    pub q_total_m3h: f64,
    pub q_per_pump_lps: f64,
    pub h_pump_m: f64,
    pub dh_valve_m: f64,
    pub v_pipe_ms: f64,
}

impl ReferencePoint {
    pub fn is_canonical(&self) -> bool {
        crate::openings::opening_for_phi(self.phi_pct).is_some_and(|o| o.is_canonical())
    }
}

/// All seven reference points, largest opening first.
pub static REFERENCE_POINTS_ALL: [ReferencePoint; 7] = [
    ReferencePoint {
        phi_pct: 44,
        n_pumps: 4,
        q_total_lps: 5016.0,
        q_total_m3h: 18059.0,
        q_per_pump_lps: 1254.0,
        h_pump_m: 26.12,
        dh_valve_m: 7.51,
        v_pipe_ms: 1.971,
    },
    ReferencePoint {
        phi_pct: 40,
        n_pumps: 4,
        q_total_lps: 4577.5,
        q_total_m3h: 16479.0,
        q_per_pump_lps: 1144.4,
        h_pump_m: 28.72,
        dh_valve_m: 10.16,
        v_pipe_ms: 1.799,
    },
    ReferencePoint {
        phi_pct: 38,
        n_pumps: 3,
        q_total_lps: 3664.0,
        q_total_m3h: 13189.0,
        q_per_pump_lps: 1221.0,
        h_pump_m: 26.90,
        dh_valve_m: 8.50,
        v_pipe_ms: 1.440,
    },
    ReferencePoint {
        phi_pct: 34,
        n_pumps: 3,
        q_total_lps: 3224.8,
        q_total_m3h: 11609.0,
        q_per_pump_lps: 1074.9,
        h_pump_m: 30.30,
        dh_valve_m: 11.92,
        v_pipe_ms: 1.267,
    },
    ReferencePoint {
        phi_pct: 30,
        n_pumps: 2,
        q_total_lps: 2221.0,
        q_total_m3h: 7996.0,
        q_per_pump_lps: 1111.0,
        h_pump_m: 29.48,
        dh_valve_m: 11.22,
        v_pipe_ms: 0.873,
    },
    ReferencePoint {
        phi_pct: 26,
        n_pumps: 2,
        q_total_lps: 1779.3,
        q_total_m3h: 6405.0,
        q_per_pump_lps: 889.7,
        h_pump_m: 34.26,
        dh_valve_m: 16.03,
        v_pipe_ms: 0.699,
    },
    ReferencePoint {
        phi_pct: 22,
        n_pumps: 1,
        q_total_lps: 1014.0,
        q_total_m3h: 3651.0,
        q_per_pump_lps: 1014.0,
        h_pump_m: 31.63,
        dh_valve_m: 13.44,
        v_pipe_ms: 0.398,
    },
];

/// Canonical reference for a pump count.
pub fn reference_for_pumps(n_pumps: usize) -> Option<&'static ReferencePoint> {
    REFERENCE_POINTS_ALL
        .iter()
        .find(|r| r.is_canonical() && r.n_pumps == n_pumps)
}

/// Reference for a valve opening, across the extended catalog.
pub fn reference_for_phi(phi_pct: u32) -> Option<&'static ReferencePoint> {
    REFERENCE_POINTS_ALL.iter().find(|r| r.phi_pct == phi_pct)
}
