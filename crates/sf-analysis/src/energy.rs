//! Pump power and energy at steady operating points.
//!
//! `P_hyd = rho * g * Q * H`, `P_shaft = P_hyd / eta`, motor load relative to
//! the installed motor rating.

use serde::{Deserialize, Serialize};
use sf_catalog::{ETA_DUTY_PCT, G, MOTOR_POWER_KW, RHO_SEAWATER};
use sf_core::{SfError, SfResult, ensure_finite, hydraulic_power, kg_per_m3, lps, m, mps2, to_kw};
use sf_scenarios::SteadyStateResult;

use crate::error::AnalysisResult;

/// Hours in one day of continuous operation.
pub const HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpEnergyResult {
    pub q_lps: f64,
    pub h_m: f64,
    pub eta_pct: f64,
    pub p_hydraulic_kw: f64,
    pub p_shaft_kw: f64,
    pub motor_load_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEnergyResult {
    pub n_pumps: usize,
    pub pump: PumpEnergyResult,
    pub p_total_shaft_kw: f64,
    pub hours: f64,
    pub energy_kwh: f64,
}

/// Power dissipated across the throttling valve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrottleLoss {
    pub q_total_lps: f64,
    pub dh_valve_m: f64,
    pub p_throttle_kw: f64,
    pub daily_kwh: f64,
}

/// Seawater hydraulic power in kW for a flow (l/s) against a head (m).
pub(crate) fn hydraulic_power_kw(q_lps: f64, h_m: f64) -> f64 {
    to_kw(hydraulic_power(
        kg_per_m3(RHO_SEAWATER),
        mps2(G),
        lps(q_lps),
        m(h_m),
    ))
}

pub(crate) fn check_efficiency(eta_pct: f64) -> SfResult<f64> {
    let eta_pct = ensure_finite(eta_pct, "pump efficiency")?;
    if eta_pct <= 0.0 || eta_pct > 100.0 {
        return Err(SfError::OutOfRange {
            what: "pump efficiency (%)",
            value: eta_pct,
        });
    }
    Ok(eta_pct)
}

/// Hydraulic and shaft power of one pump.
pub fn compute_pump_power(q_lps: f64, h_m: f64, eta_pct: f64) -> AnalysisResult<PumpEnergyResult> {
    let eta_pct = check_efficiency(eta_pct)?;
    let q_lps = ensure_finite(q_lps, "pump flow")?;
    let h_m = ensure_finite(h_m, "pump head")?;

    let p_hydraulic_kw = hydraulic_power_kw(q_lps, h_m);
    let p_shaft_kw = p_hydraulic_kw / (eta_pct / 100.0);
    Ok(PumpEnergyResult {
        q_lps,
        h_m,
        eta_pct,
        p_hydraulic_kw,
        p_shaft_kw,
        motor_load_pct: p_shaft_kw / MOTOR_POWER_KW * 100.0,
    })
}

/// Energy of `n_pumps` identical pumps running for `hours`.
pub fn compute_scenario_energy(
    n_pumps: usize,
    q_per_pump_lps: f64,
    h_m: f64,
    eta_pct: f64,
    hours: f64,
) -> AnalysisResult<ScenarioEnergyResult> {
    let hours = ensure_finite(hours, "operating hours")?;
    if hours <= 0.0 {
        return Err(SfError::OutOfRange {
            what: "operating hours",
            value: hours,
        }
        .into());
    }
    let pump = compute_pump_power(q_per_pump_lps, h_m, eta_pct)?;
    let p_total_shaft_kw = pump.p_shaft_kw * n_pumps as f64;
    Ok(ScenarioEnergyResult {
        n_pumps,
        pump,
        p_total_shaft_kw,
        hours,
        energy_kwh: p_total_shaft_kw * hours,
    })
}

/// One day of continuous operation at the duty-point efficiency.
pub fn compute_scenario_energy_daily(
    n_pumps: usize,
    q_per_pump_lps: f64,
    h_m: f64,
) -> AnalysisResult<ScenarioEnergyResult> {
    compute_scenario_energy(n_pumps, q_per_pump_lps, h_m, ETA_DUTY_PCT, HOURS_PER_DAY)
}

/// Energy for every solved scenario, in input order.
pub fn compute_all_scenario_energies(
    results: &[SteadyStateResult],
    eta_pct: f64,
    hours: f64,
) -> AnalysisResult<Vec<ScenarioEnergyResult>> {
    results
        .iter()
        .map(|r| compute_scenario_energy(r.n_active_pumps, r.q_per_pump_lps, r.h_pump_m, eta_pct, hours))
        .collect()
}

/// Power burnt across the valve at total flow `q_total_lps` and drop `dh_valve_m`.
pub fn compute_throttle_loss(q_total_lps: f64, dh_valve_m: f64) -> ThrottleLoss {
    let p_throttle_kw = hydraulic_power_kw(q_total_lps, dh_valve_m);
    ThrottleLoss {
        q_total_lps,
        dh_valve_m,
        p_throttle_kw,
        daily_kwh: p_throttle_kw * HOURS_PER_DAY,
    }
}
