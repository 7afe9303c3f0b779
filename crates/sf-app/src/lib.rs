//! Shared application service layer for the intake scenario tools.
//!
//! Wires configuration, the scenario runner, and the analyses into the two
//! study pipelines (steady staging and 24 h EPS), and reads previously computed
//! results from JSON.

pub mod config;
pub mod error;
pub mod progress;
pub mod results_io;
pub mod study_service;

pub use config::{StudyConfig, load_config, save_config};
pub use error::{AppError, AppResult};
pub use progress::{PointProgress, StudyKind, StudyProgressEvent, StudyStage};
pub use results_io::{load_eps_json, load_staging_json};
pub use study_service::{
    EpsReport, StagingReport, analyze_eps, analyze_staging, run_eps_study,
    run_eps_study_with_progress, run_staging_study, run_staging_study_with_progress,
};
