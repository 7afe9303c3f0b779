//! Study pipelines: solve, then validate and analyze.

use std::time::Instant;

use serde::Serialize;
use sf_analysis::{
    EpsEventRow, ScenarioEnergyResult, ScenarioValidation, ThrottleLoss, VfdResult,
    compress_events, compute_all_scenario_energies, compute_all_vfd, compute_throttle_loss,
    validate_all, validate_all_extended,
};
use sf_catalog::CatalogSet;
use sf_network::SolverBackend;
use sf_scenarios::{EpsResult, ScenarioRunner, SteadyStateResult};
use tracing::info;

use crate::config::StudyConfig;
use crate::error::AppResult;
use crate::progress::{PointProgress, StudyKind, StudyProgressEvent, StudyStage};

/// Steady staging results with every derived analysis, one entry per point.
#[derive(Debug, Clone, Serialize)]
pub struct StagingReport {
    pub catalog: CatalogSet,
    pub results: Vec<SteadyStateResult>,
    pub validations: Vec<ScenarioValidation>,
    pub energies: Vec<ScenarioEnergyResult>,
    pub vfd: Vec<VfdResult>,
    pub throttle: Vec<ThrottleLoss>,
}

impl StagingReport {
    pub fn all_passed(&self) -> bool {
        self.validations.iter().all(ScenarioValidation::all_passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EpsReport {
    pub result: EpsResult,
    pub events: Vec<EpsEventRow>,
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(StudyProgressEvent)>;

fn emit_progress(
    progress_cb: &mut ProgressCallback<'_>,
    kind: StudyKind,
    stage: StudyStage,
    started: Instant,
    point: Option<PointProgress>,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        let mut event =
            StudyProgressEvent::stage(kind, stage, started.elapsed().as_secs_f64(), message);
        event.point = point;
        cb(event);
    }
}

fn analyze_with(
    results: Vec<SteadyStateResult>,
    catalog: CatalogSet,
    eta_pct: f64,
    hours: f64,
    on_stage: &mut dyn FnMut(StudyStage),
) -> AppResult<StagingReport> {
    on_stage(StudyStage::Validating);
    let validations = match catalog {
        CatalogSet::Canonical => validate_all(&results),
        CatalogSet::Extended => validate_all_extended(&results),
    };

    on_stage(StudyStage::ComputingEnergy);
    let energies = compute_all_scenario_energies(&results, eta_pct, hours)?;
    let throttle = results
        .iter()
        .map(|r| compute_throttle_loss(r.q_total_lps, r.dh_valve_m))
        .collect();

    on_stage(StudyStage::ComparingVfd);
    let vfd = compute_all_vfd(&results, eta_pct)?;

    Ok(StagingReport {
        catalog,
        results,
        validations,
        energies,
        vfd,
        throttle,
    })
}

/// Analyze previously solved staging results.
pub fn analyze_staging(
    results: Vec<SteadyStateResult>,
    catalog: CatalogSet,
    eta_pct: f64,
    hours: f64,
) -> AppResult<StagingReport> {
    analyze_with(results, catalog, eta_pct, hours, &mut |_| {})
}

/// Compress a previously solved EPS run into its event log.
pub fn analyze_eps(result: EpsResult) -> AppResult<EpsReport> {
    let events = compress_events(&result)?;
    Ok(EpsReport { result, events })
}

pub fn run_staging_study<B: SolverBackend>(
    backend: B,
    config: &StudyConfig,
) -> AppResult<StagingReport> {
    run_staging_study_with_progress(backend, config, None)
}

/// Solve every opening of the configured catalog and analyze the batch.
pub fn run_staging_study_with_progress<B: SolverBackend>(
    backend: B,
    config: &StudyConfig,
    mut progress_cb: ProgressCallback<'_>,
) -> AppResult<StagingReport> {
    config.validate()?;
    let started = Instant::now();
    let runner =
        ScenarioRunner::new(backend, &config.network).with_options(config.runner_options());
    let points = config.catalog.openings();
    info!(
        network = %config.network.display(),
        points = points.len(),
        "starting staging study"
    );

    let results = if config.parallel {
        emit_progress(
            &mut progress_cb,
            StudyKind::Staging,
            StudyStage::SolvingBatch,
            started,
            None,
            None,
        );
        runner.run_points(&points)?
    } else {
        let mut results = Vec::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            let progress = PointProgress {
                index: i + 1,
                total: points.len(),
                phi_pct: point.phi_pct,
                n_pumps: point.n_pumps,
            };
            emit_progress(
                &mut progress_cb,
                StudyKind::Staging,
                StudyStage::SolvingPoint,
                started,
                Some(progress),
                Some(format!("{}-pump scenario at {}%", point.n_pumps, point.phi_pct)),
            );
            results.push(runner.run_steady(point)?);
        }
        results
    };

    let report = analyze_with(
        results,
        config.catalog,
        config.efficiency_pct,
        config.hours,
        &mut |stage| {
            emit_progress(&mut progress_cb, StudyKind::Staging, stage, started, None, None)
        },
    )?;

    let summary = if report.all_passed() {
        "all scenarios within tolerance"
    } else {
        "deviations beyond tolerance"
    };
    emit_progress(
        &mut progress_cb,
        StudyKind::Staging,
        StudyStage::Completed,
        started,
        None,
        Some(summary.to_string()),
    );
    info!(
        all_passed = report.all_passed(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "staging study finished"
    );
    Ok(report)
}

pub fn run_eps_study<B: SolverBackend>(backend: B, config: &StudyConfig) -> AppResult<EpsReport> {
    run_eps_study_with_progress(backend, config, None)
}

/// Run the configured trip schedule over the full horizon and build the event log.
pub fn run_eps_study_with_progress<B: SolverBackend>(
    backend: B,
    config: &StudyConfig,
    mut progress_cb: ProgressCallback<'_>,
) -> AppResult<EpsReport> {
    config.validate()?;
    let started = Instant::now();
    let runner =
        ScenarioRunner::new(backend, &config.network).with_options(config.runner_options());
    info!(trips = config.trips.len(), "starting EPS study");

    emit_progress(
        &mut progress_cb,
        StudyKind::Eps,
        StudyStage::RunningEps,
        started,
        None,
        None,
    );
    let result = runner.run_eps(&config.trips)?;

    emit_progress(
        &mut progress_cb,
        StudyKind::Eps,
        StudyStage::CompressingEvents,
        started,
        None,
        None,
    );
    let report = analyze_eps(result)?;

    emit_progress(
        &mut progress_cb,
        StudyKind::Eps,
        StudyStage::Completed,
        started,
        None,
        Some(format!("{} event rows", report.events.len())),
    );
    info!(events = report.events.len(), "EPS study finished");
    Ok(report)
}
