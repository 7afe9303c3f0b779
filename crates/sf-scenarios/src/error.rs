use sf_network::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Active pump count {n} outside 1..={max}")]
    PumpCount { n: usize, max: usize },

    #[error("Valve element '{valve_id}' is not part of the configured catalog")]
    UnknownValve { valve_id: String },

    #[error("Invalid pump trip for '{pump_id}': {reason}")]
    InvalidTrip { pump_id: String, reason: String },

    #[error("Inconsistent EPS result: {what}")]
    InconsistentSeries { what: String },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
