//! sf-scenarios: steady-state staging and extended-period scenario runners.
//!
//! Every scenario loads its own solver instance through a `SolverSession`, so
//! pump/valve state and control schedules never leak between runs.

pub mod eps;
pub mod error;
pub mod results;
pub mod runner;
pub mod steady;
pub mod trips;

pub use error::{ScenarioError, ScenarioResult};
pub use results::{EpsResult, SteadyStateResult};
pub use runner::{RunnerOptions, ScenarioRunner};
pub use trips::{PumpTripEvent, default_trips, hours_to_seconds};
