//! sf-analysis: pure post-processing of scenario results.
//!
//! - `events`: compress an EPS run into state-change rows
//! - `energy`: hydraulic/shaft power, scenario energy, throttle loss
//! - `validation`: comparison against hand-calculated reference points
//! - `optimizer`: variable-speed vs. throttled operation

pub mod energy;
pub mod error;
pub mod events;
pub mod optimizer;
pub mod validation;

pub use energy::{
    HOURS_PER_DAY, PumpEnergyResult, ScenarioEnergyResult, ThrottleLoss, compute_all_scenario_energies,
    compute_pump_power, compute_scenario_energy, compute_scenario_energy_daily,
    compute_throttle_loss,
};
pub use error::{AnalysisError, AnalysisResult};
pub use events::{ActiveValve, EpsEventRow, SimTime, compress_events, format_sim_time};
pub use optimizer::{VfdResult, compute_all_vfd, compute_vfd_comparison};
pub use validation::{
    ParameterCheck, ScenarioValidation, TOLERANCE_PCT, deviation_pct, validate_all,
    validate_all_extended, validate_steady_state,
};
