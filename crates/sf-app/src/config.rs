//! Study configuration loaded from YAML.
//!
//! ```yaml
//! network: intake_subdivided.inp
//! catalog: extended
//! parallel: false
//! efficiency_pct: 88.0
//! hours: 24.0
//! trips:
//!   - { pump_id: PUMP_4, trip_hour: 6.0, restore_hour: 8.0 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sf_catalog::{CatalogSet, ETA_DUTY_PCT};
use sf_scenarios::{PumpTripEvent, RunnerOptions, default_trips};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudyConfig {
    /// Network definition file; relative paths resolve against the config file.
    pub network: PathBuf,
    #[serde(default)]
    pub catalog: CatalogSet,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_efficiency_pct")]
    pub efficiency_pct: f64,
    #[serde(default = "default_hours")]
    pub hours: f64,
    #[serde(default = "default_trips")]
    pub trips: Vec<PumpTripEvent>,
}

fn default_efficiency_pct() -> f64 {
    ETA_DUTY_PCT
}

fn default_hours() -> f64 {
    24.0
}

impl StudyConfig {
    pub fn new(network: impl Into<PathBuf>) -> Self {
        Self {
            network: network.into(),
            catalog: CatalogSet::default(),
            parallel: false,
            efficiency_pct: default_efficiency_pct(),
            hours: default_hours(),
            trips: default_trips(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.network.as_os_str().is_empty() {
            return Err(AppError::Config("network path must not be empty".to_string()));
        }
        if !(self.efficiency_pct > 0.0 && self.efficiency_pct <= 100.0) {
            return Err(AppError::Config(format!(
                "efficiency_pct must lie in (0, 100], got {}",
                self.efficiency_pct
            )));
        }
        if !(self.hours.is_finite() && self.hours > 0.0) {
            return Err(AppError::Config(format!(
                "hours must be positive, got {}",
                self.hours
            )));
        }
        for trip in &self.trips {
            trip.validate()
                .map_err(|e| AppError::Config(e.to_string()))?;
        }
        Ok(())
    }

    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            catalog: self.catalog,
            parallel: self.parallel,
        }
    }
}

/// Load, resolve, and validate a study configuration.
pub fn load_config(path: &Path) -> AppResult<StudyConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config: StudyConfig = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse study YAML: {}", e)))?;

    if config.network.is_relative() {
        if let Some(dir) = path.parent() {
            config.network = dir.join(&config.network);
        }
    }
    config.validate()?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &StudyConfig) -> AppResult<()> {
    config.validate()?;
    let content = serde_yaml::to_string(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize study: {}", e)))?;
    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> StudyConfig {
        serde_yaml::from_str(yaml).expect("yaml should parse")
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = parse("network: intake.inp\n");
        assert_eq!(cfg.catalog, CatalogSet::Canonical);
        assert!(!cfg.parallel);
        assert_eq!(cfg.efficiency_pct, 88.0);
        assert_eq!(cfg.hours, 24.0);
        assert_eq!(cfg.trips, default_trips());
        cfg.validate().unwrap();
    }

    #[test]
    fn full_config_parses() {
        let cfg = parse(
            "network: sub.inp\ncatalog: extended\nparallel: true\nefficiency_pct: 85\nhours: 12\ntrips:\n  - { pump_id: PUMP_1, trip_hour: 1.5, restore_hour: 2.0 }\n",
        );
        assert_eq!(cfg.catalog, CatalogSet::Extended);
        assert_eq!(cfg.trips.len(), 1);
        assert_eq!(cfg.trips[0].trip_seconds(), 5400);
        assert!(cfg.runner_options().parallel);
    }

    #[test]
    fn empty_trip_list_is_baseline() {
        let cfg = parse("network: a.inp\ntrips: []\n");
        assert!(cfg.trips.is_empty());
        cfg.validate().unwrap();
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(serde_yaml::from_str::<StudyConfig>("network: a.inp\nsolver: x\n").is_err());
    }

    #[test]
    fn invalid_values_rejected() {
        let mut cfg = StudyConfig::new("a.inp");
        cfg.efficiency_pct = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = StudyConfig::new("a.inp");
        cfg.hours = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = StudyConfig::new("a.inp");
        cfg.trips[0].restore_hour = 30.0;
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn load_resolves_network_next_to_config() {
        let dir = std::env::temp_dir().join(format!("sf_app_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("study.yaml");
        save_config(&path, &StudyConfig::new("intake.inp")).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.network, dir.join("intake.inp"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/study.yaml")).unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
    }
}
