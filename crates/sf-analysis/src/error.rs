use sf_core::SfError;
use sf_scenarios::ScenarioError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("EPS result has no {kind} series for '{id}'")]
    MissingSeries { kind: &'static str, id: String },

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Core(#[from] SfError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
