/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

use remind_engine::config::EngineConfigManager;
use remind_engine::scheduler::{LoggingAlarmScheduler, ReminderService};
use remind_engine::task::{ReminderFlags, Task};
use remind_engine::ReminderEngine;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Compute the next reminder alarm for one task.
///
/// Example:
///   remind-engine --due 2026-10-20T09:00:00Z --flag at-deadline \
///                 --period-secs 3600 --config engine.yaml
#[derive(Debug, Parser)]
#[command(
    name = "remind-engine",
    about = "Reminder scheduling decision engine",
    long_about = None,
)]
struct Cli {
    /// Task id used in log output.
    #[arg(long, default_value_t = 1)]
    id: u64,

    /// Task title used in log output.
    #[arg(short = 't', long, default_value = "task")]
    title: String,

    /// Due date (RFC 3339, e.g. 2026-10-20T09:00:00Z).
    #[arg(short = 'd', long)]
    due: Option<DateTime<Utc>>,

    /// Reminder flag to enable: at-deadline | after-deadline (repeatable).
    #[arg(short = 'f', long = "flag", value_name = "FLAG")]
    flags: Vec<ReminderFlags>,

    /// Random reminder period in seconds (0 disables).
    #[arg(short = 'p', long = "period-secs")]
    period_secs: Option<i64>,

    /// Evaluate as of this instant instead of the system clock.
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Seed the jitter for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to the YAML engine configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        id          = cli.id,
        due         = ?cli.due,
        flags       = ?cli.flags,
        period_secs = ?cli.period_secs,
        now         = ?cli.now,
        seed        = ?cli.seed,
        config      = ?cli.config,
        "Configuration"
    );

    // ── Load engine configuration ─────────────────────────────────────────────
    let mut config_manager = EngineConfigManager::new();

    match &cli.config {
        Some(path) => {
            if let Err(e) = config_manager.load_from_file(path) {
                error!("Failed to load engine configuration: {:#}", e);
                process::exit(1);
            }
        }
        None => {
            warn!("No engine configuration file provided, using default jitter settings");
        }
    }

    // ── Build the task snapshot ───────────────────────────────────────────────
    let mut task = Task::new(cli.id, cli.title);
    task.due_date = cli.due;
    task.reminder_flags = cli
        .flags
        .iter()
        .fold(ReminderFlags::NONE, |acc, f| acc | *f);
    task.reminder_period = match cli.period_secs.map(Duration::try_seconds) {
        Some(Some(period)) => Some(period),
        Some(None) => {
            warn!("Reminder period out of range, random reminders disabled");
            None
        }
        None => None,
    };

    // ── Decide and arm ────────────────────────────────────────────────────────
    let service = ReminderService::new(ReminderEngine::new(config_manager.config().clone()));
    let now = cli.now.unwrap_or_else(Utc::now);
    let mut scheduler = LoggingAlarmScheduler::new();

    let decision = match cli.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            service.schedule_alarm_with_rng(&task, now, &mut scheduler, &mut rng)
        }
        None => service.schedule_alarm(&task, now, &mut scheduler),
    };

    match decision {
        Some(alarm) => println!(
            "{} in {}s",
            alarm,
            alarm.time.signed_duration_since(now).num_seconds()
        ),
        None => println!("no alarm"),
    }
}
