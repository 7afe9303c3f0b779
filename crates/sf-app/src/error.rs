//! Error types for the sf-app service layer.

use std::path::PathBuf;

/// Application error wrapping the library crates' errors behind one interface
/// for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<sf_scenarios::ScenarioError> for AppError {
    fn from(err: sf_scenarios::ScenarioError) -> Self {
        AppError::Scenario(err.to_string())
    }
}

impl From<sf_network::NetworkError> for AppError {
    fn from(err: sf_network::NetworkError) -> Self {
        AppError::Scenario(err.to_string())
    }
}

impl From<sf_analysis::AnalysisError> for AppError {
    fn from(err: sf_analysis::AnalysisError) -> Self {
        AppError::Analysis(err.to_string())
    }
}

impl From<sf_core::SfError> for AppError {
    fn from(err: sf_core::SfError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
