//! Scenario runner: batches of steady operating points and EPS runs.

use std::path::PathBuf;

use rayon::prelude::*;
use sf_catalog::{CatalogSet, OperatingPoint, opening_for_pumps};
use sf_core::timing::Timer;
use sf_network::SolverBackend;
use tracing::warn;

use crate::eps;
use crate::error::{ScenarioError, ScenarioResult};
use crate::results::{EpsResult, SteadyStateResult};
use crate::steady;
use crate::trips::{PumpTripEvent, default_trips};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerOptions {
    /// Openings run by `run_staging`; steady points must belong to it.
    pub catalog: CatalogSet,
    /// Solve batch points concurrently when the backend allows it.
    pub parallel: bool,
}

/// Runs scenarios against one network definition.
pub struct ScenarioRunner<B: SolverBackend> {
    backend: B,
    network_path: PathBuf,
    options: RunnerOptions,
}

impl<B: SolverBackend> ScenarioRunner<B> {
    pub fn new(backend: B, network_path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            network_path: network_path.into(),
            options: RunnerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> RunnerOptions {
        self.options
    }

    /// Solve a single operating point on a fresh instance.
    pub fn run_steady(&self, point: &OperatingPoint) -> ScenarioResult<SteadyStateResult> {
        steady::run_point(
            &self.backend,
            &self.network_path,
            point,
            self.options.catalog.valve_ids(),
        )
    }

    /// Solve the canonical opening staged with `n_pumps` duty pumps.
    pub fn run_for_pumps(&self, n_pumps: usize) -> ScenarioResult<SteadyStateResult> {
        steady::check_pump_count(n_pumps)?;
        let point = opening_for_pumps(n_pumps).ok_or(ScenarioError::PumpCount {
            n: n_pumps,
            max: sf_catalog::N_DUTY_PUMPS,
        })?;
        self.run_steady(point)
    }

    /// Solve `points` in order. Results come back in the same order even when
    /// solved in parallel.
    pub fn run_points(&self, points: &[OperatingPoint]) -> ScenarioResult<Vec<SteadyStateResult>> {
        let timer = Timer::start("scenarios.run_points");
        let results: ScenarioResult<Vec<_>> = if self.options.parallel && self.backend.supports_concurrent_instances() {
            points.par_iter().map(|p| self.run_steady(p)).collect()
        } else {
            if self.options.parallel {
                warn!("solver backend does not support concurrent instances, running sequentially");
            }
            points.iter().map(|p| self.run_steady(p)).collect()
        };
        timer.stop();
        results
    }

    /// Every opening of the configured catalog, largest first.
    pub fn run_staging(&self) -> ScenarioResult<Vec<SteadyStateResult>> {
        self.run_points(&self.options.catalog.openings())
    }

    /// Full-horizon run with the given trip schedule.
    pub fn run_eps(&self, trips: &[PumpTripEvent]) -> ScenarioResult<EpsResult> {
        eps::run_schedule(&self.backend, &self.network_path, trips)
    }

    /// Full-horizon run with the standard three-trip schedule.
    pub fn run_eps_default(&self) -> ScenarioResult<EpsResult> {
        self.run_eps(&default_trips())
    }

    /// Full-horizon run with no trips.
    pub fn run_eps_baseline(&self) -> ScenarioResult<EpsResult> {
        self.run_eps(&[])
    }
}
