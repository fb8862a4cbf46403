//! voltgridd — the VoltGrid runner.
//!
//! Thin wrapper around the decision engine: loads (or defaults) the
//! configuration, optionally seeds realistic demo data, runs decision
//! cycles, and prints the records and final status as JSON. All
//! decision logic lives in the engine crates.
//!
//! # Usage
//!
//! ```text
//! voltgridd demo --cycles 5
//! voltgridd demo --config voltgrid.toml --no-seed
//! ```

use std::path::PathBuf;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use volt_core::EngineConfig;
use voltgrid_carbon::CarbonReading;
use voltgrid_queue::Job;
use voltgrid_scheduler::Scheduler;
use voltgrid_telemetry::RawTelemetry;

#[derive(Parser)]
#[command(name = "voltgridd", about = "VoltGrid — carbon-aware GPU job decision engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run decision cycles against seeded or externally-set state.
    Demo {
        /// Path to a voltgrid.toml config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of decision cycles to run.
        #[arg(long, default_value = "5")]
        cycles: u32,

        /// Skip seeding demo carbon/telemetry/job data.
        #[arg(long)]
        no_seed: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,voltgrid=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Demo {
            config,
            cycles,
            no_seed,
        } => {
            let config = match config {
                Some(path) => EngineConfig::from_file(&path)?,
                None => EngineConfig::default(),
            };
            run_demo(config, cycles, !no_seed)
        }
    }
}

fn run_demo(config: EngineConfig, cycles: u32, seed: bool) -> anyhow::Result<()> {
    let mut scheduler = Scheduler::new(config);
    info!("engine initialized");

    if seed {
        seed_demo_data(&mut scheduler)?;
        info!(jobs = scheduler.queue().len(), "demo data seeded");
    }

    for _ in 0..cycles {
        let decision = scheduler.decide(None);
        println!("{}", serde_json::to_string_pretty(&decision)?);
    }

    println!("{}", serde_json::to_string_pretty(&scheduler.status())?);
    Ok(())
}

/// Populate the engine with a realistic snapshot: moderate-to-high
/// grid intensity with a dip four hours out, a busy device, and a
/// small mixed-priority job backlog.
fn seed_demo_data(scheduler: &mut Scheduler) -> anyhow::Result<()> {
    let now = Utc::now();

    let intensities = [
        320.0, 280.0, 210.0, 150.0, 90.0, 130.0, 180.0, 250.0, 310.0, 350.0, 290.0, 220.0,
    ];
    let forecast = intensities
        .iter()
        .enumerate()
        .map(|(i, &intensity_gco2)| CarbonReading {
            timestamp: now + Duration::minutes(30 * i as i64),
            intensity_gco2,
        })
        .collect();
    scheduler.set_carbon(345.0, Some(forecast));

    scheduler.set_telemetry(&RawTelemetry {
        current_watts: Some(285.0),
        core_temp_c: Some(72.0),
        tdp_cap_watts: Some(400.0),
        clock_mhz: Some(1980.0),
        vram_used_gb: Some(64.0),
        vram_total_gb: Some(192.0),
    });

    let jobs = [
        ("LLM-TRAIN-7B", 1, 80.0, 4),
        ("IMG-INFER-BATCH", 2, 24.0, 1),
        ("RAG-INDEX-REBUILD", 3, 16.0, 6),
        ("FINE-TUNE-13B", 4, 120.0, 8),
        ("EMBEDDINGS-GEN", 5, 8.0, 2),
    ];
    for (task_id, priority, vram_req_gb, deadline_hours) in jobs {
        let deadline = (now + Duration::hours(deadline_hours)).to_rfc3339();
        scheduler
            .queue_mut()
            .add(Job::new(task_id, priority, vram_req_gb, deadline))?;
    }

    Ok(())
}
