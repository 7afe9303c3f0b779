//! Reads previously computed scenario results from JSON.

use std::path::Path;

use serde::de::DeserializeOwned;
use sf_scenarios::{EpsResult, SteadyStateResult};

use crate::error::{AppError, AppResult};

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Steady results of a staging batch, in catalog order.
pub fn load_staging_json(path: &Path) -> AppResult<Vec<SteadyStateResult>> {
    let results: Vec<SteadyStateResult> = read_json(path)?;
    if results.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{} contains no steady results",
            path.display()
        )));
    }
    Ok(results)
}

/// A consistency-checked EPS result.
pub fn load_eps_json(path: &Path) -> AppResult<EpsResult> {
    let eps: EpsResult = read_json(path)?;
    eps.validate()?;
    Ok(eps)
}
