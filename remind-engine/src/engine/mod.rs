/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Reminder decision engine.
//!
//! [`ReminderEngine`] turns a [`Task`] snapshot and the current instant into
//! at most one [`Alarm`].  Three independent rules each propose a candidate:
//!
//! | Rule | Precondition | Candidate time |
//! |---|---|---|
//! | DUE | `due_date > now`, `NOTIFY_AT_DEADLINE` | `due_date` exactly |
//! | OVERDUE | `due_date <= now`, `NOTIFY_AFTER_DEADLINE` | `now + (0, overdue_window]` |
//! | RANDOM | `reminder_period > 0` | `now + (0, 1.2 × period)` |
//!
//! A RANDOM candidate is dropped when a pending DUE candidate arrives no later
//! than one nominal period from now (`due_date <= now + period`): the deadline
//! alarm already reminds the user before the next regular reminder would.
//! The earliest surviving candidate wins; ties resolve DUE > OVERDUE > RANDOM.
//!
//! # Properties
//! * Stateless — every call recomputes from the task's current fields, so
//!   calling it on every save is idempotent apart from the jitter.
//! * Total — missing, disabled or overflowing inputs exclude a rule instead of
//!   failing.
//! * `Send + Sync` — the randomness source is supplied per call.
//!
//! # Example
//! ```rust
//! use chrono::{Duration, Utc};
//! use remind_engine::engine::{AlarmType, ReminderEngine};
//! use remind_engine::task::{ReminderFlags, Task};
//!
//! let engine = ReminderEngine::default();
//! let now = Utc::now();
//!
//! let mut task = Task::new(1, "water");
//! task.due_date = Some(now + Duration::days(1));
//! task.reminder_flags = ReminderFlags::NOTIFY_AT_DEADLINE;
//!
//! let alarm = engine
//!     .compute_next_alarm(&task, now, &mut rand::thread_rng())
//!     .unwrap();
//! assert_eq!(alarm.kind, AlarmType::Due);
//! assert_eq!(Some(alarm.time), task.due_date);
//! ```

pub mod alarm;
pub mod jitter;

pub use alarm::{Alarm, AlarmDecision, AlarmType};

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::config::EngineConfig;
use crate::task::{ReminderFlags, Task};

use jitter::{offset_up_to, offset_within, scale_duration};

// ── ReminderEngine ────────────────────────────────────────────────────────────

/// Computes the next alarm for a task.
///
/// Holds only the immutable [`EngineConfig`]; all per-call state is local.
#[derive(Debug, Clone, Default)]
pub struct ReminderEngine {
    config: EngineConfig,
}

impl ReminderEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Public entry point ────────────────────────────────────────────────────

    /// Decide which alarm, if any, should be armed for `task` as of `now`.
    ///
    /// `rng` supplies the jitter for OVERDUE and RANDOM candidates; it is only
    /// drawn from when the corresponding rule applies.
    pub fn compute_next_alarm<R: Rng + ?Sized>(
        &self,
        task: &Task,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> AlarmDecision {
        let winner = self
            .candidates(task, now, rng)
            .into_iter()
            .min_by_key(Alarm::selection_key);

        match &winner {
            Some(alarm) => debug!(
                task = task.id,
                kind = %alarm.kind,
                time = %alarm.time,
                "next alarm selected"
            ),
            None => debug!(task = task.id, "no alarm applicable"),
        }

        winner
    }

    /// Every candidate that survives its precondition and the deadline yield,
    /// in rule order (DUE, OVERDUE, RANDOM).
    pub fn candidates<R: Rng + ?Sized>(
        &self,
        task: &Task,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Alarm> {
        let due = self.due_candidate(task, now);
        let overdue = self.overdue_candidate(task, now, rng);
        let mut random = self.random_candidate(task, now, rng);

        if let (Some(d), Some(r)) = (&due, &random) {
            if self.random_yields_to(d.time, task, now) {
                debug!(
                    task = task.id,
                    random = %r.time,
                    due = %d.time,
                    "deadline within one reminder period, random candidate dropped"
                );
                random = None;
            }
        }

        [due, overdue, random].into_iter().flatten().collect()
    }

    // ── Rules ─────────────────────────────────────────────────────────────────

    /// DUE: exactly at a future deadline.  No jitter.
    fn due_candidate(&self, task: &Task, now: DateTime<Utc>) -> Option<Alarm> {
        if !task.notifies(ReminderFlags::NOTIFY_AT_DEADLINE) {
            return None;
        }
        let due = task.due_date.filter(|due| *due > now)?;
        debug!(task = task.id, time = %due, "due candidate");
        Some(Alarm::new(due, AlarmType::Due))
    }

    /// OVERDUE: a near-future nag once the deadline has passed.
    ///
    /// Uniform in `(now, now + overdue_window]`, independent of how long ago
    /// the deadline was.
    fn overdue_candidate<R: Rng + ?Sized>(
        &self,
        task: &Task,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<Alarm> {
        if !task.notifies(ReminderFlags::NOTIFY_AFTER_DEADLINE) {
            return None;
        }
        task.due_date.filter(|due| *due <= now)?;

        let offset = offset_up_to(rng, self.config.overdue_window)?;
        let time = now.checked_add_signed(offset)?;
        debug!(task = task.id, time = %time, "overdue candidate");
        Some(Alarm::new(time, AlarmType::Overdue))
    }

    /// RANDOM: uniform in `(now, now + random_jitter_factor × period)`.
    fn random_candidate<R: Rng + ?Sized>(
        &self,
        task: &Task,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<Alarm> {
        let period = task.active_reminder_period()?;
        let window = scale_duration(period, self.config.random_jitter_factor)?;

        let offset = offset_within(rng, window)?;
        let time = now.checked_add_signed(offset)?;
        debug!(task = task.id, time = %time, period_secs = period.num_seconds(), "random candidate");
        Some(Alarm::new(time, AlarmType::Random))
    }

    /// `true` if the deadline at `due` comes no later than the next nominal
    /// reminder, `now + period`.
    fn random_yields_to(&self, due: DateTime<Utc>, task: &Task, now: DateTime<Utc>) -> bool {
        if !self.config.random_yields_to_deadline {
            return false;
        }
        task.active_reminder_period()
            .and_then(|period| now.checked_add_signed(period))
            .is_some_and(|next_nominal| due <= next_nominal)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
