/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Manual simulator for the task-save trigger point.  NOT for production.
//!
//! Reads a task YAML, replays `--saves` saves of every task on a simulated
//! clock and prints what the in-memory alarm book ends up holding.
//!
//! ```yaml
//! tasks:
//!   water:
//!     due_in_secs: 86400        # relative to the simulation start, may be negative
//!     notify: [at_deadline]
//!     period_secs: 3600
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::{info, warn};

use remind_engine::config::EngineConfigManager;
use remind_engine::engine::AlarmType;
use remind_engine::scheduler::{InMemoryAlarmScheduler, ReminderService};
use remind_engine::task::{ReminderFlags, Task};
use remind_engine::ReminderEngine;

// ── Task file ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TaskFile {
    tasks: BTreeMap<String, TaskEntry>,
}

#[derive(Debug, Deserialize)]
struct TaskEntry {
    #[serde(default)]
    due_in_secs: Option<i64>,
    #[serde(default)]
    notify: Vec<String>,
    #[serde(default)]
    period_secs: Option<i64>,
}

fn load_tasks(path: &Path, start: DateTime<Utc>) -> Result<Vec<Task>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open task file: {}", path.display()))?;
    let file: TaskFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

    let mut tasks = Vec::with_capacity(file.tasks.len());
    for (idx, (name, entry)) in file.tasks.into_iter().enumerate() {
        let mut task = Task::new(idx as u64 + 1, name.clone());

        task.due_date = entry
            .due_in_secs
            .and_then(Duration::try_seconds)
            .and_then(|offset| start.checked_add_signed(offset));

        for flag in &entry.notify {
            let flag: ReminderFlags = flag
                .parse()
                .with_context(|| format!("task '{name}'"))?;
            task.reminder_flags |= flag;
        }

        task.reminder_period = entry.period_secs.and_then(Duration::try_seconds);
        tasks.push(task);
    }
    Ok(tasks)
}

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "save-sim", about = "Replay task saves against the reminder engine")]
struct Cli {
    /// YAML file with the tasks to simulate.
    #[arg(short = 'w', long = "tasks")]
    tasks: PathBuf,

    /// Optional engine configuration YAML.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Number of save rounds per task.
    #[arg(short = 'n', long, default_value_t = 3)]
    saves: u32,

    /// Simulated time between save rounds, in seconds.
    #[arg(short = 's', long = "step-secs", default_value_t = 3_600)]
    step_secs: i64,

    /// Jitter seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config_manager = EngineConfigManager::new();
    if let Some(path) = &cli.config {
        config_manager.load_from_file(path)?;
    }

    let start = Utc::now();
    let tasks = load_tasks(&cli.tasks, start)?;
    if tasks.is_empty() {
        warn!("No tasks in {}, nothing to simulate", cli.tasks.display());
        return Ok(());
    }

    let service = ReminderService::new(ReminderEngine::new(config_manager.config().clone()));
    let mut book = InMemoryAlarmScheduler::new();
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let step = Duration::try_seconds(cli.step_secs).context("--step-secs out of range")?;

    let mut decided: BTreeMap<AlarmType, usize> = BTreeMap::new();
    let mut rang = 0usize;
    let mut now = start;

    for round in 0..cli.saves {
        for task in &tasks {
            if let Some(alarm) = service.schedule_alarm_with_rng(task, now, &mut book, &mut rng) {
                *decided.entry(alarm.kind).or_default() += 1;
            }
        }

        now = now
            .checked_add_signed(step)
            .context("simulated clock overflowed")?;

        for fired in book.take_due(now) {
            rang += 1;
            info!(
                round = round,
                task  = %fired.title,
                alarm = %fired.alarm,
                "alarm rang"
            );
        }
    }

    info!(
        tasks      = tasks.len(),
        saves      = cli.saves,
        rang       = rang,
        superseded = book.superseded(),
        "=== Simulation complete ==="
    );

    for (kind, count) in &decided {
        println!("{kind:>8}: {count} decision(s)");
    }
    for pending in book.iter() {
        println!(
            "{:<16} {} (+{}s)",
            pending.title,
            pending.alarm,
            pending.alarm.time.signed_duration_since(now).num_seconds()
        );
    }

    Ok(())
}
