use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use sf_analysis::{
    EpsEventRow, ScenarioEnergyResult, ScenarioValidation, ThrottleLoss, VfdResult,
    compute_scenario_energy, compute_throttle_loss, compute_vfd_comparison,
};
use sf_app::{
    AppError, AppResult, StudyConfig, analyze_eps, analyze_staging, load_config, load_eps_json,
    load_staging_json, save_config,
};
use sf_catalog::curve::Q_RUNOUT_LPS;
use sf_catalog::{
    CatalogSet, ETA_DUTY_PCT, H_SHUTOFF_M, PumpCurve, REFERENCE_POINTS_ALL, ReferencePoint,
    kv_headloss_m, opening_for_phi,
};
use sf_core::lps_to_m3h;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(about = "Seawater intake scenario analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List valve openings and their reference points
    Catalog {
        /// Include the intermediate openings
        #[arg(long)]
        extended: bool,
    },
    /// Pump power and energy at one operating point
    Energy {
        /// Active pumps
        #[arg(long)]
        pumps: usize,
        /// Flow per pump (l/s)
        #[arg(long)]
        q_per_pump: f64,
        /// Pump head (m)
        #[arg(long)]
        head: f64,
        #[arg(long, default_value_t = ETA_DUTY_PCT)]
        eta: f64,
        #[arg(long, default_value_t = 24.0)]
        hours: f64,
        #[arg(long)]
        json: bool,
    },
    /// Variable-speed vs. throttled operation; all reference points if no point is given
    Vfd {
        /// Valve opening (%) of a catalog reference point
        #[arg(long)]
        phi: Option<u32>,
        #[arg(long, default_value_t = ETA_DUTY_PCT)]
        eta: f64,
        #[arg(long)]
        json: bool,
    },
    /// Power dissipated across the valve at every reference point
    Throttle {
        #[arg(long)]
        json: bool,
    },
    /// Sample the two-point fitted pump curve
    PumpCurve {
        /// Number of samples between zero and runout flow
        #[arg(long, default_value_t = 11)]
        points: usize,
    },
    /// Validate and analyze previously computed steady results
    Validate {
        /// JSON array of steady results
        results_path: PathBuf,
        /// Look references up by valve opening instead of pump count
        #[arg(long)]
        extended: bool,
        #[arg(long, default_value_t = ETA_DUTY_PCT)]
        eta: f64,
        #[arg(long)]
        json: bool,
    },
    /// Event log of a previously computed EPS run
    Events {
        /// JSON EPS result
        eps_path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Write a study configuration with default settings
    InitConfig {
        /// Path of the study YAML file to create
        config_path: PathBuf,
        /// Network definition the study runs against
        #[arg(long)]
        network: PathBuf,
        /// Stage all seven openings
        #[arg(long)]
        extended: bool,
    },
    /// Check a study configuration file
    CheckConfig {
        /// Path to the study YAML file
        config_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog { extended } => cmd_catalog(extended),
        Commands::Energy {
            pumps,
            q_per_pump,
            head,
            eta,
            hours,
            json,
        } => cmd_energy(pumps, q_per_pump, head, eta, hours, json),
        Commands::Vfd { phi, eta, json } => cmd_vfd(phi, eta, json),
        Commands::Throttle { json } => cmd_throttle(json),
        Commands::PumpCurve { points } => cmd_pump_curve(points),
        Commands::Validate {
            results_path,
            extended,
            eta,
            json,
        } => cmd_validate(&results_path, extended, eta, json),
        Commands::Events { eps_path, json } => cmd_events(&eps_path, json),
        Commands::InitConfig {
            config_path,
            network,
            extended,
        } => cmd_init_config(&config_path, network, extended),
        Commands::CheckConfig { config_path } => cmd_check_config(&config_path),
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn reference_points(extended: bool) -> Vec<&'static ReferencePoint> {
    REFERENCE_POINTS_ALL
        .iter()
        .filter(|r| extended || r.is_canonical())
        .collect()
}

fn cmd_catalog(extended: bool) -> AppResult<()> {
    println!(
        "{:>6}  {:>3}  {:>9}  {:>10}  {:>10}  {:>8}  {:>8}  {:>9}",
        "phi%", "N", "Kv", "Q_total", "Q/pump", "H_pump", "dH", "dH(Kv)"
    );
    println!(
        "{:>6}  {:>3}  {:>9}  {:>10}  {:>10}  {:>8}  {:>8}  {:>9}",
        "", "", "(m3/h)", "(l/s)", "(l/s)", "(m)", "(m)", "(m)"
    );
    println!("{}", "-".repeat(78));
    for r in reference_points(extended) {
        let kv = opening_for_phi(r.phi_pct).map_or(f64::NAN, |o| o.kv_m3h);
        println!(
            "{:>5}%  {:>3}  {:>9.2}  {:>10.1}  {:>10.1}  {:>8.2}  {:>8.2}  {:>9.2}",
            r.phi_pct,
            r.n_pumps,
            kv,
            r.q_total_lps,
            r.q_per_pump_lps,
            r.h_pump_m,
            r.dh_valve_m,
            kv_headloss_m(r.q_total_lps, kv)
        );
    }
    Ok(())
}

fn cmd_energy(
    pumps: usize,
    q_per_pump: f64,
    head: f64,
    eta: f64,
    hours: f64,
    json: bool,
) -> AppResult<()> {
    let e: ScenarioEnergyResult = compute_scenario_energy(pumps, q_per_pump, head, eta, hours)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    if json {
        return print_json(&e);
    }
    println!("Per pump:");
    println!("  P_hydraulic = {:.1} kW", e.pump.p_hydraulic_kw);
    println!("  P_shaft     = {:.1} kW", e.pump.p_shaft_kw);
    println!("  Motor load  = {:.1} %", e.pump.motor_load_pct);
    println!("Station ({} pumps):", e.n_pumps);
    println!("  P_shaft     = {:.1} kW", e.p_total_shaft_kw);
    println!("  Energy      = {:.0} kWh over {} h", e.energy_kwh, e.hours);
    Ok(())
}

fn cmd_vfd(phi: Option<u32>, eta: f64, json: bool) -> AppResult<()> {
    let points: Vec<&ReferencePoint> = match phi {
        Some(phi) => vec![
            REFERENCE_POINTS_ALL
                .iter()
                .find(|r| r.phi_pct == phi)
                .ok_or_else(|| AppError::InvalidInput(format!("no reference point at {phi}%")))?,
        ],
        None => reference_points(false),
    };
    let results = points
        .iter()
        .map(|r| {
            compute_vfd_comparison(r.n_pumps, r.phi_pct, r.q_total_lps, r.h_pump_m, r.dh_valve_m, eta)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    if json {
        return print_json(&results);
    }
    print_vfd_table(&results);
    Ok(())
}

fn print_vfd_table(results: &[VfdResult]) {
    println!(
        "{:>6}  {:>3}  {:>8}  {:>7}  {:>7}  {:>6}  {:>11}  {:>8}  {:>10}  {:>9}  {:>6}",
        "phi%", "N", "Q_total", "H_pump", "dH", "N/N_r", "P_throttle", "P_VFD", "Save/pump",
        "Save_tot", "Save"
    );
    println!("{}", "-".repeat(104));
    for r in results {
        println!(
            "{:>5}%  {:>3}  {:>8.0}  {:>7.2}  {:>7.2}  {:>6.3}  {:>11.1}  {:>8.1}  {:>10.1}  {:>9.1}  {:>5.1}%",
            r.phi_pct,
            r.n_pumps,
            r.q_total_lps,
            r.h_pump_throttled_m,
            r.h_pump_throttled_m - r.h_pump_vfd_m,
            r.speed_ratio,
            r.p_shaft_throttled_kw,
            r.p_shaft_vfd_kw,
            r.saving_per_pump_kw,
            r.saving_total_kw,
            r.saving_pct
        );
    }
}

fn cmd_throttle(json: bool) -> AppResult<()> {
    let rows: Vec<(u32, ThrottleLoss)> = reference_points(true)
        .into_iter()
        .map(|r| (r.phi_pct, compute_throttle_loss(r.q_total_lps, r.dh_valve_m)))
        .collect();
    if json {
        return print_json(&rows);
    }
    println!(
        "{:>6}  {:>10}  {:>10}  {:>8}  {:>12}  {:>10}",
        "phi%", "Q_total", "Q_total", "dH", "P_throttle", "E_24h"
    );
    println!(
        "{:>6}  {:>10}  {:>10}  {:>8}  {:>12}  {:>10}",
        "", "(l/s)", "(m3/h)", "(m)", "(kW)", "(kWh)"
    );
    println!("{}", "-".repeat(66));
    for (phi, t) in rows {
        println!(
            "{:>5}%  {:>10.1}  {:>10.0}  {:>8.2}  {:>12.1}  {:>10.0}",
            phi,
            t.q_total_lps,
            lps_to_m3h(t.q_total_lps),
            t.dh_valve_m,
            t.p_throttle_kw,
            t.daily_kwh
        );
    }
    Ok(())
}

fn cmd_pump_curve(points: usize) -> AppResult<()> {
    let curve = PumpCurve::station()?;
    println!(
        "H = {:.2} - {:.4e} * Q^{:.3}",
        H_SHUTOFF_M, curve.b, curve.c
    );
    println!("{:>10}  {:>8}", "Q (l/s)", "H (m)");
    for (q, h) in curve.sample(Q_RUNOUT_LPS, points) {
        println!("{:>10.1}  {:>8.2}", q, h);
    }
    Ok(())
}

fn cmd_validate(results_path: &Path, extended: bool, eta: f64, json: bool) -> AppResult<()> {
    let results = load_staging_json(results_path)?;
    let catalog = if extended {
        CatalogSet::Extended
    } else {
        CatalogSet::Canonical
    };
    let report = analyze_staging(results, catalog, eta, 24.0)?;
    if json {
        return print_json(&report);
    }

    for v in &report.validations {
        print_validation(v);
    }
    print_vfd_table(&report.vfd);
    if report.all_passed() {
        println!("✓ All scenarios within tolerance");
    } else {
        println!("✗ Some scenarios deviate beyond tolerance");
    }
    Ok(())
}

fn print_validation(v: &ScenarioValidation) {
    let mark = if v.all_passed() { "PASS" } else { "FAIL" };
    println!("{}-pump / {}%: {}", v.n_pumps, v.phi_pct, mark);
    for c in &v.checks {
        println!(
            "  {:<10} {:>10.2} {:>10.2} {:<4} {:>6.2}%  {}",
            c.name,
            c.computed,
            c.reference,
            c.unit,
            c.deviation_pct,
            if c.passed { "ok" } else { "DEVIATES" }
        );
    }
    for w in &v.warnings {
        println!("  ! {w}");
    }
}

fn cmd_events(eps_path: &Path, json: bool) -> AppResult<()> {
    let report = analyze_eps(load_eps_json(eps_path)?)?;
    if json {
        return print_json(&report.events);
    }
    print_event_table(&report.result.pump_ids, &report.events);
    Ok(())
}

fn print_event_table(pump_ids: &[String], rows: &[EpsEventRow]) {
    let pumps: String = pump_ids
        .iter()
        .map(|id| format!("  {:>6}", id.trim_start_matches("PUMP_")))
        .collect();
    println!(
        "{:>8}{}  {:>5}  {:>8}  {:>10}  {:>10}  {:>8}",
        "Time", pumps, "N_act", "Valve", "Q_DS", "Q_DS", "H_pump"
    );
    for row in rows {
        let status: String = row
            .pump_on
            .iter()
            .map(|on| format!("  {:>6}", if *on { "ON" } else { "OFF" }))
            .collect();
        println!(
            "{:>8}{}  {:>5}  {:>8}  {:>10.1}  {:>10.0}  {:>8.2}",
            row.time.to_string(),
            status,
            row.n_active,
            row.valve.to_string(),
            row.q_ds_lps,
            row.q_ds_m3h,
            row.h_pump_m
        );
    }
}

fn cmd_init_config(config_path: &Path, network: PathBuf, extended: bool) -> AppResult<()> {
    if config_path.exists() {
        return Err(AppError::InvalidInput(format!(
            "{} already exists",
            config_path.display()
        )));
    }
    let mut config = StudyConfig::new(network);
    if extended {
        config.catalog = CatalogSet::Extended;
    }
    save_config(config_path, &config)?;
    println!("✓ Wrote study configuration: {}", config_path.display());
    Ok(())
}

fn cmd_check_config(config_path: &Path) -> AppResult<()> {
    println!("Checking study configuration: {}", config_path.display());
    let config = load_config(config_path)?;
    println!("✓ Configuration is valid");
    println!("  Network:    {}", config.network.display());
    println!("  Catalog:    {:?}", config.catalog);
    println!("  Parallel:   {}", config.parallel);
    println!("  Efficiency: {} %", config.efficiency_pct);
    println!("  Horizon:    {} h", config.hours);
    println!("  Trips:      {}", config.trips.len());
    for t in &config.trips {
        println!("    {} off {} h -> on {} h", t.pump_id, t.trip_hour, t.restore_hour);
    }
    Ok(())
}
